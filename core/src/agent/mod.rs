pub mod loop_;
pub mod prompt;
pub mod protocol;
pub mod registry;

pub use loop_::Session;
pub use protocol::{AgentError, Decision, Turn};
pub use registry::ToolRegistry;
