// Resume tailoring workflow: a router-driven state machine over a single
// PipelineState. The router picks the next step from which fields are set,
// the orchestrator dispatches it and merges the result, until Terminal.
// Collaborators are injected; see tools/ for the production implementations.

pub mod collaborators;
pub mod orchestrator;
pub mod router;
pub mod state;

#[cfg(test)]
pub mod testing;

pub use collaborators::{Collaborators, StepError};
pub use orchestrator::Orchestrator;
pub use state::{JobSource, PipelineState};
