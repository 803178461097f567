//! Chat turn orchestration.
//!
//! The [`turn::ChatTurnOrchestrator`] ties the room query layer, the history
//! formatter, and the generation service together into one user turn.

pub mod turn;
