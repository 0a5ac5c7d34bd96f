//! Ready-made schemas.

pub mod chat;

pub use chat::chat_schema;
