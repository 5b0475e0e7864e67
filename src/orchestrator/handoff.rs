//! On-enter protocol shared by every specialist
//!
//! Building the entering agent's context is pure; the orchestrator runs the
//! grounding model turn and commits the result.

use crate::agents::SpecialistAgent;
use crate::core::chat::{ChatContext, ChatItem};
use crate::core::truncate::{truncate, TruncationPolicy};
use crate::session::UserData;

/// System message that re-grounds an agent on entry; ends with the summary
pub fn entry_message(agent: &SpecialistAgent, userdata: &UserData) -> String {
    format!(
        "You are the {} agent. The current user data is:\n{}",
        agent.kind().display_name(),
        userdata.summarize()
    )
}

/// Context the agent should hold once it becomes current
///
/// Starts from the agent's own context, appends the truncated tail of the
/// previous agent's history minus items it already has, then the summary.
pub fn prepare_entry(
    agent: &SpecialistAgent,
    previous: Option<&ChatContext>,
    userdata: &UserData,
    policy: &TruncationPolicy,
) -> ChatContext {
    let mut context = agent.context().clone();

    if let Some(previous) = previous {
        let carried = truncate(previous.items(), policy);
        let added = context.extend_unique(carried);
        tracing::debug!(
            "[Handoff] Carried {} items into '{}'",
            added,
            agent.name()
        );
    }

    context.push(ChatItem::system(entry_message(agent, userdata)));
    context
}
