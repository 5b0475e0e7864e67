//! Bounded history transplant between agents
//!
//! Information Hiding:
//! - Filtering rules hidden behind TruncationPolicy
//! - Backward scan and front trimming internalized

use super::chat::ChatItem;
use serde::{Deserialize, Serialize};

/// Which prior items survive a handoff, and how many
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TruncationPolicy {
    pub keep_last: usize,
    pub keep_system_messages: bool,
    pub keep_function_calls: bool,
}

impl Default for TruncationPolicy {
    fn default() -> Self {
        Self {
            keep_last: 6,
            keep_system_messages: false,
            keep_function_calls: true,
        }
    }
}

impl TruncationPolicy {
    fn retains(&self, item: &ChatItem) -> bool {
        if item.is_system_message() && !self.keep_system_messages {
            return false;
        }
        if item.is_tool_item() && !self.keep_function_calls {
            return false;
        }
        true
    }
}

/// Take at most `policy.keep_last` retained items from the end of `items`
///
/// The result is in chronological order and never starts with a function
/// call or function call output, since the receiving agent has no matching
/// call to resume. It may be empty.
pub fn truncate(items: &[ChatItem], policy: &TruncationPolicy) -> Vec<ChatItem> {
    let mut kept: Vec<ChatItem> = items
        .iter()
        .rev()
        .filter(|item| policy.retains(item))
        .take(policy.keep_last)
        .cloned()
        .collect();
    kept.reverse();

    let leading_tool_items = kept.iter().take_while(|item| item.is_tool_item()).count();
    kept.drain(..leading_tool_items);
    kept
}
