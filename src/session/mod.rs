//! Per-conversation state shared by every specialist agent

pub mod user_data;

pub use user_data::{FieldUpdate, SessionError, UserData};
