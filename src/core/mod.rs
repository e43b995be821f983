// src/core/mod.rs — Generation flow: retry, output validation, failure mapping

pub mod agent;
pub mod failure;
pub mod fallback;
pub mod retry;
pub mod validate;

pub use agent::{AgentEvent, DietAgent, EventFn, Generation};
pub use failure::{Failure, FailureCategory};
