//! Fire lifecycle controller
//!
//! - [`FireInstance`]: per-fire state machine (water, ramp, damage gate, tree deadline)
//! - [`Collaborators`]: optional outbound sinks a fire reports through
//! - [`FirePhase`] / [`PendingDestruction`]: lifecycle and termination records

pub mod instance;
pub mod phase;
pub mod sinks;

pub use instance::{ContactKind, FireInstance, FireSnapshot};
pub use phase::{DestructionCause, FirePhase, PendingDestruction};
pub use sinks::{
    Collaborators, CurrencySink, DamageSink, EmissionSink, RecordingSinks, RewardSink, SinkCall,
    StructureSink,
};
