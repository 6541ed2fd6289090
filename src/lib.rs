pub mod app;
pub mod client;
pub mod config;
pub mod conversation;
pub mod handler;
pub mod input;
pub mod logging;
pub mod message;
pub mod tui;
pub mod ui;

// Re-export main types for convenience
pub use client::{QueryClient, QueryError, QueryResponse};
pub use config::Config;
pub use conversation::{Conversation, ConversationView, Phase, ERROR_REPLY};
pub use message::{Message, MessageId, MessageRole, GREETING};
