//! Model-backed pro/con product debate.
//!
//! Two advocate agents argue for and against buying a product over a fixed
//! number of rounds, drawing on review search and the product page. A judge
//! agent then reads the transcript and decides buy or skip. Turn order and
//! the round limit are enforced by `coordination::Moderator`.

pub mod agents;
pub mod backend;
pub mod config;
pub mod contracts;
pub mod errors;
pub mod prompts;
pub mod tools;
pub mod workflow;

pub use agents::Collaborators;
pub use config::{DebateSettings, WorkflowConfig};
pub use errors::{DebateError, Stage};
pub use workflow::DebateWorkflow;
