pub mod ai;
pub mod config;
pub mod conversation;
pub mod profile;
pub mod state;

// Re-export main types for convenience
pub use ai::{AskError, ResumeClient, ResumeQuery};
pub use config::Config;
pub use conversation::{Conversation, ConversationError, ConversationView, Status, STARTER_PROMPTS};
pub use profile::PROFILE;
pub use state::{ChatMessage, ChatResponse, ChatRole};
