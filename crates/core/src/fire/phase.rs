//! Lifecycle phase and termination records

use serde::{Deserialize, Serialize};

/// Lifecycle stage of a fire
///
/// Transitions only move forward: `Burning` → `Extinguishing` →
/// `Extinguished`. A fire can also be terminated while still `Burning` or
/// `Extinguishing` when it destroys its tree; see [`DestructionCause`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FirePhase {
    /// Burning at full (health-scaled) intensity, accumulating water
    Burning,
    /// Enough water arrived; emission ramps down to zero
    Extinguishing,
    /// Put out; awaiting despawn
    Extinguished,
}

/// Why a fire is being destroyed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DestructionCause {
    /// Put out in time; destroyed after the despawn delay
    Extinguished,
    /// Tree-destruction deadline passed first; destroyed immediately
    TreeDestroyed,
}

/// Scheduled destruction of a fire
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingDestruction {
    /// Simulation time at which the fire should be removed
    pub at: f32,
    pub cause: DestructionCause,
}

impl PendingDestruction {
    /// Whether the removal time has been reached
    #[inline]
    pub fn is_due(&self, now: f32) -> bool {
        now >= self.at
    }
}
