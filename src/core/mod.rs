pub mod chat;
pub mod llm;
pub mod openai;
pub mod truncate;
