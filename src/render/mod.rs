/// Page-description artifact state machine.
pub mod artifact;

/// Draw calls and the external renderer boundary.
pub mod call;

/// Layer-to-draw-call lowering.
pub mod lower;

/// The sequential layer pipeline orchestrator.
pub mod pipeline;
