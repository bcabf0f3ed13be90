//! Fire Controller Core Library
//!
//! Lifecycle controller for individual fires in a game world. Each fire burns
//! at an intensity scaled by world health, hurts actors standing in it on a
//! fixed cadence, goes out gradually once enough water has been poured on
//! it, and burns down its parent tree if nobody gets to it in time.
//!
//! ## Structure
//!
//! - [`fire`]: the per-fire state machine and its outbound collaborator traits
//! - [`world`]: the frame driver that owns the clock, the fires and the sinks
//! - [`config`]: tuning parameters, JSON loading and difficulty scaling
//!
//! Everything is deterministic: the same sequence of `tick`, water and contact
//! calls always produces the same collaborator calls.

// Core types and utilities
pub mod core_types;

pub mod config;
pub mod error;
pub mod fire;
pub mod world;

// Re-export core types
pub use core_types::{ActorId, FireId, StructureId, Vec3};

pub use config::{FireConfig, FireDifficulty};
pub use error::FireError;
pub use fire::{
    Collaborators, ContactKind, CurrencySink, DamageSink, DestructionCause, EmissionSink,
    FireInstance, FirePhase, FireSnapshot, PendingDestruction, RecordingSinks, RewardSink,
    SinkCall, StructureSink,
};
pub use world::{ContactEvent, FireDestroyed, FireWorld, FireWorldStats, Ignition};
