pub mod provider;
pub mod tool;

pub use provider::{ChatMessage, Provider};
pub use tool::{Tool, ToolName};
