use crate::error::DefaultControllerError;
use fire_controller_core::{FireConfig, FireDifficulty};

/// C mirror of the controller tuning.
///
/// Start from `fire_controller_default_config()` and override only the fields
/// you need. `difficulty` scales the water, tree time and damage fields when
/// the controller is created: 0 = trainee, 1 = standard, 2 = wildfire.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireControllerConfig {
    pub extinguish_duration: f32,
    pub damage_amount: f32,
    pub damage_interval: f32,
    pub water_needed: f32,
    pub tree_destruction_time: f32,
    pub base_emission_rate: f32,
    pub max_emission_multiplier: f32,
    pub max_damage_multiplier: f32,
    pub tree_world_damage: f32,
    pub extinguish_coin_award: u32,
    pub despawn_delay: f32,
    pub trigger_radius: f32,
    pub difficulty: u8,
}

impl FireControllerConfig {
    /// Convert to the core config, applying difficulty scaling
    pub(crate) fn to_core(self) -> Result<FireConfig, DefaultControllerError> {
        let difficulty = match self.difficulty {
            0 => FireDifficulty::Trainee,
            1 => FireDifficulty::Standard,
            2 => FireDifficulty::Wildfire,
            other => {
                return Err(DefaultControllerError::invalid_parameter(format!(
                    "difficulty must be 0, 1 or 2, got {other}"
                )))
            }
        };

        let config = FireConfig {
            extinguish_duration: self.extinguish_duration,
            damage_amount: self.damage_amount,
            damage_interval: self.damage_interval,
            water_needed: self.water_needed,
            tree_destruction_time: self.tree_destruction_time,
            base_emission_rate: self.base_emission_rate,
            max_emission_multiplier: self.max_emission_multiplier,
            max_damage_multiplier: self.max_damage_multiplier,
            tree_world_damage: self.tree_world_damage,
            extinguish_coin_award: self.extinguish_coin_award,
            despawn_delay: self.despawn_delay,
            trigger_radius: self.trigger_radius,
        };

        Ok(config.with_difficulty(difficulty))
    }
}

impl From<&FireConfig> for FireControllerConfig {
    fn from(config: &FireConfig) -> Self {
        Self {
            extinguish_duration: config.extinguish_duration,
            damage_amount: config.damage_amount,
            damage_interval: config.damage_interval,
            water_needed: config.water_needed,
            tree_destruction_time: config.tree_destruction_time,
            base_emission_rate: config.base_emission_rate,
            max_emission_multiplier: config.max_emission_multiplier,
            max_damage_multiplier: config.max_damage_multiplier,
            tree_world_damage: config.tree_world_damage,
            extinguish_coin_award: config.extinguish_coin_award,
            despawn_delay: config.despawn_delay,
            trigger_radius: config.trigger_radius,
            difficulty: 1,
        }
    }
}

/// Default tuning (standard difficulty)
#[no_mangle]
pub extern "C" fn fire_controller_default_config() -> FireControllerConfig {
    FireControllerConfig::from(&FireConfig::default())
}
