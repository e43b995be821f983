// src/lib.rs — Library root for diet-agent

pub mod chat;
pub mod cli;
pub mod core;
pub mod history;
pub mod infra;
pub mod onboarding;
pub mod planner;
pub mod remote;
pub mod util;
