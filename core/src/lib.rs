// Core campus assistant functionality:
// - Canned response catalog and quick actions
// - Keyword matcher
// - Conversation state and reply timing
// - Configuration loading
// - Shared error types

// Export types module - Message and quick action data structures
pub mod types;
pub use types::*;

// Export catalog module - Ordered lookup table of canned responses
pub mod catalog;
pub use catalog::*;

// Export matcher module - Query to canned response resolution
pub mod matcher;
pub use matcher::{find_relevant_info, MatchKind, MatchResult, GENERAL_CATEGORY};

// Export conversation module - Append-only message list and composing state
pub mod conversation;
pub use conversation::{Conversation, PendingReply, ReplyDelay, SubmitRejected};

// Export config module - Configuration loading
pub mod config;
pub use config::*;

// Export errors module - Shared error types
pub mod errors;
pub use errors::*;
