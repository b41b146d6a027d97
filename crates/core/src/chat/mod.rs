//! Chat front door.
//!
//! Common requests ("add ...", "list tasks", "show top 3") are answered
//! straight from the task tools; everything else goes through the
//! orchestrator.

pub mod command;
pub mod service;

pub use command::{has_quick_keyword, QuickCommand, QUICK_KEYWORDS};
pub use service::ChatService;
