//! Fire tuning parameters
//!
//! Defaults reproduce the shipped fire prefab: three units of water put a
//! fire out over one second, standing in it costs 10 health every half
//! second, and an untouched fire takes its tree down after 40 seconds.

pub mod difficulty;

pub use difficulty::FireDifficulty;

use crate::error::FireError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Tuning shared by every fire a `FireWorld` ignites
///
/// Deserialization fills missing fields from [`FireConfig::default`], so a
/// JSON file only needs the values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireConfig {
    /// Seconds the emission ramp takes from its start rate down to zero
    pub extinguish_duration: f32,
    /// Damage per tick at zero world health
    pub damage_amount: f32,
    /// Minimum seconds between two damage ticks on the contacting actor
    pub damage_interval: f32,
    /// Accumulated water that starts the extinguish ramp
    pub water_needed: f32,
    /// Seconds after ignition at which an unextinguished fire destroys its tree
    pub tree_destruction_time: f32,
    /// Particle emission rate at zero world health
    pub base_emission_rate: f32,
    /// Emission multiplier reached at full world health
    pub max_emission_multiplier: f32,
    /// Damage multiplier reached at full world health
    pub max_damage_multiplier: f32,
    /// World damage dealt when a fire destroys its tree
    pub tree_world_damage: f32,
    /// Coins awarded when a fire is put out
    pub extinguish_coin_award: u32,
    /// Seconds an extinguished fire lingers before it is destroyed
    pub despawn_delay: f32,
    /// Radius of the spherical trigger volume used for actor overlap
    pub trigger_radius: f32,
}

impl Default for FireConfig {
    fn default() -> Self {
        Self {
            extinguish_duration: 1.0,
            damage_amount: 10.0,
            damage_interval: 0.5,
            water_needed: 3.0,
            tree_destruction_time: 40.0,
            base_emission_rate: 40.0,
            max_emission_multiplier: 2.0,
            max_damage_multiplier: 2.0,
            tree_world_damage: 0.5,
            extinguish_coin_award: 4,
            despawn_delay: 2.0,
            trigger_radius: 1.5,
        }
    }
}

impl FireConfig {
    /// Check every field is usable
    ///
    /// # Errors
    /// Returns [`FireError::InvalidConfig`] naming the first field that is
    /// non-finite or negative, or a `tree_destruction_time` that is not
    /// strictly positive.
    pub fn validate(&self) -> Result<(), FireError> {
        let non_negative = [
            ("extinguish_duration", self.extinguish_duration),
            ("damage_amount", self.damage_amount),
            ("damage_interval", self.damage_interval),
            ("water_needed", self.water_needed),
            ("base_emission_rate", self.base_emission_rate),
            ("max_emission_multiplier", self.max_emission_multiplier),
            ("max_damage_multiplier", self.max_damage_multiplier),
            ("tree_world_damage", self.tree_world_damage),
            ("despawn_delay", self.despawn_delay),
            ("trigger_radius", self.trigger_radius),
        ];

        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(FireError::InvalidConfig {
                    field,
                    value,
                    reason: "must be finite and non-negative",
                });
            }
        }

        if !self.tree_destruction_time.is_finite() || self.tree_destruction_time <= 0.0 {
            return Err(FireError::InvalidConfig {
                field: "tree_destruction_time",
                value: self.tree_destruction_time,
                reason: "must be finite and positive",
            });
        }

        Ok(())
    }

    /// Parse and validate a JSON document
    ///
    /// # Errors
    /// Returns [`FireError::ConfigParse`] for malformed JSON and
    /// [`FireError::InvalidConfig`] if the parsed values fail validation.
    pub fn from_json_str(contents: &str) -> Result<Self, FireError> {
        let config: Self =
            serde_json::from_str(contents).map_err(|e| FireError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    ///
    /// # Errors
    /// Returns [`FireError::ConfigLoad`] if the file cannot be read, otherwise
    /// the errors of [`FireConfig::from_json_str`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, FireError> {
        let contents =
            fs::read_to_string(path).map_err(|e| FireError::ConfigLoad(e.to_string()))?;
        Self::from_json_str(&contents)
    }

    /// Serialize to pretty JSON
    ///
    /// # Errors
    /// Returns [`FireError::ConfigParse`] if serialization fails.
    pub fn to_json_string(&self) -> Result<String, FireError> {
        serde_json::to_string_pretty(self).map_err(|e| FireError::ConfigParse(e.to_string()))
    }

    /// Copy of this config scaled for a difficulty level
    pub fn with_difficulty(mut self, difficulty: FireDifficulty) -> Self {
        difficulty.apply_to_config(&mut self);
        self
    }
}
