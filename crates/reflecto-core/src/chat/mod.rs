//! Completion orchestration.

pub mod orchestrator;

pub use orchestrator::ChatOrchestrator;
