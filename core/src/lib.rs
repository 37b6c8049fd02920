pub mod agent;
pub mod config;
pub mod providers;
pub mod tools;
pub mod traits;

pub use agent::{AgentError, Decision, Session, ToolRegistry, Turn};
pub use config::*;
pub use providers::*;
pub use tools::*;
pub use traits::*;
