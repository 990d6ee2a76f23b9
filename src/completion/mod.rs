pub mod orchestrator;

pub use orchestrator::{CompletionOrchestrator, CompletionPhase, EndDecision};
