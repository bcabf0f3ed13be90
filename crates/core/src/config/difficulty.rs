//! Difficulty scaling for fire tuning
//!
//! Scales how much water a fire needs, how long its tree survives and how
//! hard it hits, so the same scene can be played gently or under pressure.

use super::FireConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Difficulty mode for gameplay scaling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FireDifficulty {
    /// Trainee mode: forgiving fires for learning
    /// - 2/3 of the water needed
    /// - +50% time before the tree is lost
    /// - half damage
    Trainee,

    /// Standard mode: prefab tuning (no scaling)
    #[default]
    Standard,

    /// Wildfire mode: fires that fight back
    /// - +50% water needed
    /// - 25% less time before the tree is lost
    /// - +50% damage
    Wildfire,
}

impl FireDifficulty {
    /// Get water-needed multiplier
    pub fn water_needed_multiplier(&self) -> f32 {
        match self {
            FireDifficulty::Trainee => 2.0 / 3.0,
            FireDifficulty::Standard => 1.0,
            FireDifficulty::Wildfire => 1.5,
        }
    }

    /// Get tree-destruction-time multiplier
    pub fn tree_time_multiplier(&self) -> f32 {
        match self {
            FireDifficulty::Trainee => 1.5,
            FireDifficulty::Standard => 1.0,
            FireDifficulty::Wildfire => 0.75,
        }
    }

    /// Get damage multiplier
    pub fn damage_multiplier(&self) -> f32 {
        match self {
            FireDifficulty::Trainee => 0.5,
            FireDifficulty::Standard => 1.0,
            FireDifficulty::Wildfire => 1.5,
        }
    }

    /// Apply difficulty scaling to a config in place
    pub fn apply_to_config(&self, config: &mut FireConfig) {
        config.water_needed *= self.water_needed_multiplier();
        config.tree_destruction_time *= self.tree_time_multiplier();
        config.damage_amount *= self.damage_multiplier();
    }
}

impl fmt::Display for FireDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FireDifficulty::Trainee => "trainee",
            FireDifficulty::Standard => "standard",
            FireDifficulty::Wildfire => "wildfire",
        };
        f.write_str(name)
    }
}

impl FromStr for FireDifficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trainee" => Ok(FireDifficulty::Trainee),
            "standard" => Ok(FireDifficulty::Standard),
            "wildfire" => Ok(FireDifficulty::Wildfire),
            other => Err(format!(
                "unknown difficulty '{other}' (expected trainee, standard or wildfire)"
            )),
        }
    }
}
