//! Outbound collaborator interfaces
//!
//! A fire never owns the systems it affects. Player and world health, tree
//! removal, reward spawning, currency and the particle system are reached
//! through the narrow traits below, bundled into [`Collaborators`] by the
//! composition root. Every slot is optional: an unbound slot turns the
//! corresponding side effect into a logged no-op.

use crate::core_types::{ActorId, FireId, StructureId, Vec3};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{trace, warn};

/// Player and world health
pub trait DamageSink {
    /// Damage the actor standing in the fire
    fn damage_actor(&mut self, actor: ActorId, amount: f32);

    /// Damage overall world health (a tree was lost)
    fn damage_world(&mut self, amount: f32);
}

/// Removes the structure a fire burned down
pub trait StructureSink {
    fn remove_structure(&mut self, structure: StructureId);
}

/// Spawns the pickup a fire drops when put out
pub trait RewardSink {
    fn spawn_reward(&mut self, fire: FireId, position: Vec3);
}

/// Player currency
pub trait CurrencySink {
    fn add_coins(&mut self, amount: u32);
}

/// Particle system driving the flames and steam of a fire
pub trait EmissionSink {
    /// Start the flame effect (ignition)
    fn play(&mut self, fire: FireId);

    /// Set the flame emission rate
    fn set_rate(&mut self, fire: FireId, rate: f32);

    /// Start the steam cue shown while water hits the fire
    fn start_steam(&mut self, fire: FireId);

    /// Stop the flame effect (extinguished)
    fn stop(&mut self, fire: FireId);
}

/// Bound collaborators, one optional slot per interface
#[derive(Default)]
pub struct Collaborators {
    damage: Option<Box<dyn DamageSink>>,
    structures: Option<Box<dyn StructureSink>>,
    rewards: Option<Box<dyn RewardSink>>,
    currency: Option<Box<dyn CurrencySink>>,
    emission: Option<Box<dyn EmissionSink>>,
}

impl Collaborators {
    /// No collaborators bound
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_damage(mut self, sink: impl DamageSink + 'static) -> Self {
        self.damage = Some(Box::new(sink));
        self
    }

    pub fn with_structures(mut self, sink: impl StructureSink + 'static) -> Self {
        self.structures = Some(Box::new(sink));
        self
    }

    pub fn with_rewards(mut self, sink: impl RewardSink + 'static) -> Self {
        self.rewards = Some(Box::new(sink));
        self
    }

    pub fn with_currency(mut self, sink: impl CurrencySink + 'static) -> Self {
        self.currency = Some(Box::new(sink));
        self
    }

    pub fn with_emission(mut self, sink: impl EmissionSink + 'static) -> Self {
        self.emission = Some(Box::new(sink));
        self
    }

    pub(crate) fn has_damage(&self) -> bool {
        self.damage.is_some()
    }

    pub(crate) fn has_structures(&self) -> bool {
        self.structures.is_some()
    }

    pub(crate) fn has_currency(&self) -> bool {
        self.currency.is_some()
    }

    pub(crate) fn damage_actor(&mut self, fire: FireId, actor: ActorId, amount: f32) {
        match self.damage.as_mut() {
            Some(sink) => sink.damage_actor(actor, amount),
            None => warn!("{fire}: no damage sink bound, skipping {amount:.1} damage to {actor}"),
        }
    }

    pub(crate) fn damage_world(&mut self, fire: FireId, amount: f32) {
        match self.damage.as_mut() {
            Some(sink) => sink.damage_world(amount),
            None => warn!("{fire}: no damage sink bound, skipping {amount:.2} world damage"),
        }
    }

    pub(crate) fn remove_structure(&mut self, fire: FireId, structure: StructureId) {
        match self.structures.as_mut() {
            Some(sink) => sink.remove_structure(structure),
            None => warn!("{fire}: no structure sink bound, {structure} left standing"),
        }
    }

    pub(crate) fn spawn_reward(&mut self, fire: FireId, position: Vec3) {
        match self.rewards.as_mut() {
            Some(sink) => sink.spawn_reward(fire, position),
            None => warn!("{fire}: reward configured but no reward sink bound"),
        }
    }

    pub(crate) fn add_coins(&mut self, fire: FireId, amount: u32) {
        match self.currency.as_mut() {
            Some(sink) => sink.add_coins(amount),
            None => warn!("{fire}: no currency sink bound, {amount} coins not awarded"),
        }
    }

    // Emission is pushed every frame; a missing sink only traces.
    pub(crate) fn play(&mut self, fire: FireId) {
        match self.emission.as_mut() {
            Some(sink) => sink.play(fire),
            None => trace!("{fire}: no emission sink bound"),
        }
    }

    pub(crate) fn set_rate(&mut self, fire: FireId, rate: f32) {
        match self.emission.as_mut() {
            Some(sink) => sink.set_rate(fire, rate),
            None => trace!("{fire}: no emission sink bound"),
        }
    }

    pub(crate) fn start_steam(&mut self, fire: FireId) {
        match self.emission.as_mut() {
            Some(sink) => sink.start_steam(fire),
            None => trace!("{fire}: no emission sink bound"),
        }
    }

    pub(crate) fn stop_emission(&mut self, fire: FireId) {
        match self.emission.as_mut() {
            Some(sink) => sink.stop(fire),
            None => trace!("{fire}: no emission sink bound"),
        }
    }
}

/// One recorded collaborator call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum SinkCall {
    DamageActor { actor: ActorId, amount: f32 },
    DamageWorld { amount: f32 },
    RemoveStructure { structure: StructureId },
    SpawnReward { fire: FireId, position: [f32; 3] },
    AddCoins { amount: u32 },
    Play { fire: FireId },
    SetRate { fire: FireId, rate: f32 },
    StartSteam { fire: FireId },
    Stop { fire: FireId },
}

/// In-memory collaborator that records every call in order
///
/// Clones share one log, so a clone can be bound into [`Collaborators`]
/// while another handle is kept for inspection. Used by headless runs for
/// reporting and by tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingSinks {
    log: Rc<RefCell<Vec<SinkCall>>>,
}

impl RecordingSinks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collaborators with every slot bound to this recorder
    pub fn collaborators(&self) -> Collaborators {
        Collaborators::new()
            .with_damage(self.clone())
            .with_structures(self.clone())
            .with_rewards(self.clone())
            .with_currency(self.clone())
            .with_emission(self.clone())
    }

    /// Snapshot of every call so far
    pub fn calls(&self) -> Vec<SinkCall> {
        self.log.borrow().clone()
    }

    /// Number of recorded calls matching a predicate
    pub fn count(&self, predicate: impl Fn(&SinkCall) -> bool) -> usize {
        self.log.borrow().iter().filter(|&call| predicate(call)).count()
    }

    /// Drop every recorded call
    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }

    fn push(&self, call: SinkCall) {
        self.log.borrow_mut().push(call);
    }
}

impl DamageSink for RecordingSinks {
    fn damage_actor(&mut self, actor: ActorId, amount: f32) {
        self.push(SinkCall::DamageActor { actor, amount });
    }

    fn damage_world(&mut self, amount: f32) {
        self.push(SinkCall::DamageWorld { amount });
    }
}

impl StructureSink for RecordingSinks {
    fn remove_structure(&mut self, structure: StructureId) {
        self.push(SinkCall::RemoveStructure { structure });
    }
}

impl RewardSink for RecordingSinks {
    fn spawn_reward(&mut self, fire: FireId, position: Vec3) {
        self.push(SinkCall::SpawnReward {
            fire,
            position: [position.x, position.y, position.z],
        });
    }
}

impl CurrencySink for RecordingSinks {
    fn add_coins(&mut self, amount: u32) {
        self.push(SinkCall::AddCoins { amount });
    }
}

impl EmissionSink for RecordingSinks {
    fn play(&mut self, fire: FireId) {
        self.push(SinkCall::Play { fire });
    }

    fn set_rate(&mut self, fire: FireId, rate: f32) {
        self.push(SinkCall::SetRate { fire, rate });
    }

    fn start_steam(&mut self, fire: FireId) {
        self.push(SinkCall::StartSteam { fire });
    }

    fn stop(&mut self, fire: FireId) {
        self.push(SinkCall::Stop { fire });
    }
}
