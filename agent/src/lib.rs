mod agent;
pub mod callbacks;
mod error;
pub mod llm;
mod state;
pub mod tools;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;

pub use agent::{Agent, AgentBuilder, FinalResponse, StopCondition, final_response};
pub use state::State;
