//! Chat items and per-agent chat contexts

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One entry of a chat context
///
/// Every item carries an `id` that stays with it when it is transplanted
/// into another agent's context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatItem {
    Message {
        id: String,
        role: Role,
        content: String,
    },
    FunctionCall {
        id: String,
        call_id: String,
        name: String,
        arguments: Value,
    },
    FunctionCallOutput {
        id: String,
        call_id: String,
        output: String,
    },
}

impl ChatItem {
    pub fn message(role: Role, content: impl Into<String>) -> Self {
        ChatItem::Message {
            id: new_item_id(),
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::message(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::message(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::message(Role::Assistant, content)
    }

    pub fn function_call(
        call_id: impl Into<String>,
        name: impl Into<String>,
        arguments: Value,
    ) -> Self {
        ChatItem::FunctionCall {
            id: new_item_id(),
            call_id: call_id.into(),
            name: name.into(),
            arguments,
        }
    }

    pub fn function_call_output(call_id: impl Into<String>, output: impl Into<String>) -> Self {
        ChatItem::FunctionCallOutput {
            id: new_item_id(),
            call_id: call_id.into(),
            output: output.into(),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            ChatItem::Message { id, .. }
            | ChatItem::FunctionCall { id, .. }
            | ChatItem::FunctionCallOutput { id, .. } => id,
        }
    }

    pub fn is_system_message(&self) -> bool {
        matches!(
            self,
            ChatItem::Message {
                role: Role::System,
                ..
            }
        )
    }

    /// Either half of a tool invocation
    pub fn is_tool_item(&self) -> bool {
        matches!(
            self,
            ChatItem::FunctionCall { .. } | ChatItem::FunctionCallOutput { .. }
        )
    }
}

fn new_item_id() -> String {
    format!("item_{}", Uuid::new_v4().simple())
}

/// Ordered chat history owned by a single agent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatContext {
    items: Vec<ChatItem>,
}

impl ChatContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<ChatItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[ChatItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, item: ChatItem) {
        self.items.push(item);
    }

    /// Append items in order, skipping any whose id is already present
    pub fn extend_unique(&mut self, items: impl IntoIterator<Item = ChatItem>) -> usize {
        let mut seen: HashSet<String> = self.items.iter().map(|i| i.id().to_string()).collect();
        let before = self.items.len();
        for item in items {
            if seen.insert(item.id().to_string()) {
                self.items.push(item);
            }
        }
        self.items.len() - before
    }

    /// Text of the most recent assistant message
    pub fn last_assistant_message(&self) -> Option<&str> {
        self.items.iter().rev().find_map(|item| match item {
            ChatItem::Message {
                role: Role::Assistant,
                content,
                ..
            } => Some(content.as_str()),
            _ => None,
        })
    }
}
