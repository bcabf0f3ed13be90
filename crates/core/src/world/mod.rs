//! Frame driver and composition root for a set of fires
//!
//! `FireWorld` owns the simulation clock, every live [`FireInstance`], the
//! bound [`Collaborators`] and the destruction timers. Hosts call
//! [`FireWorld::tick`] once per frame and feed water and contact in between;
//! fires are ticked in ascending id order so runs are reproducible.

pub mod contact;

pub use contact::ContactEvent;

use crate::config::FireConfig;
use crate::core_types::{ActorId, FireId, StructureId, Vec3};
use crate::error::FireError;
use crate::fire::{
    Collaborators, ContactKind, DestructionCause, FireInstance, FirePhase, FireSnapshot,
};
use contact::ContactTracker;
use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::{debug, info};

/// Where and how a new fire starts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ignition {
    pub position: Vec3,
    /// Tree the fire burns down if not put out in time
    pub parent: Option<StructureId>,
    /// Drop a reward when put out
    pub reward: bool,
}

impl Ignition {
    /// Bare fire at a position (no tree, no reward)
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            parent: None,
            reward: false,
        }
    }

    pub fn under(mut self, structure: StructureId) -> Self {
        self.parent = Some(structure);
        self
    }

    pub fn with_reward(mut self) -> Self {
        self.reward = true;
        self
    }
}

/// Destruction signal: a fire has been removed from the world
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FireDestroyed {
    pub fire: FireId,
    pub cause: DestructionCause,
    /// Simulation time of removal
    pub at: f32,
}

/// Running totals for a world
///
/// `coins_awarded`, `damage_ticks` and `trees_destroyed` count side effects
/// actually delivered to a bound collaborator. With the matching slot unbound
/// the fire still runs its lifecycle but these stay untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FireWorldStats {
    pub ignited: u32,
    pub extinguished: u32,
    /// Trees removed through the structure sink
    pub trees_destroyed: u32,
    pub despawned: u32,
    /// Coins handed to the currency sink
    pub coins_awarded: u32,
    /// Damage ticks delivered to the damage sink
    pub damage_ticks: u32,
    /// Water actually absorbed by burning fires
    pub water_applied: f32,
}

/// All live fires plus the clock and collaborators that drive them
pub struct FireWorld {
    config: FireConfig,
    sinks: Collaborators,
    fires: FxHashMap<FireId, FireInstance>,
    contacts: ContactTracker,
    next_fire_id: u32,
    simulation_time: f32,
    stats: FireWorldStats,
}

impl FireWorld {
    /// Create an empty world
    ///
    /// # Errors
    /// Returns [`FireError::InvalidConfig`] if `config` fails validation.
    pub fn new(config: FireConfig, sinks: Collaborators) -> Result<Self, FireError> {
        config.validate()?;
        info!(
            "Fire world created: water_needed={:.1}, tree_destruction_time={:.1}s",
            config.water_needed, config.tree_destruction_time
        );

        Ok(Self {
            config,
            sinks,
            fires: FxHashMap::default(),
            contacts: ContactTracker::default(),
            next_fire_id: 1,
            simulation_time: 0.0,
            stats: FireWorldStats::default(),
        })
    }

    /// Start a new fire at the current simulation time
    pub fn ignite(&mut self, ignition: Ignition) -> FireId {
        let id = FireId::new(self.next_fire_id);
        self.next_fire_id += 1;

        let mut fire = FireInstance::new(id, ignition.position, &self.config, self.simulation_time);
        if let Some(structure) = ignition.parent {
            fire = fire.with_parent(structure);
        }
        if ignition.reward {
            fire = fire.with_reward();
        }

        self.sinks.play(id);
        info!(
            "Ignited {} at ({:.1}, {:.1}, {:.1}), tree deadline {:.1}s",
            id,
            ignition.position.x,
            ignition.position.y,
            ignition.position.z,
            fire.tree_destruction_deadline()
        );

        self.fires.insert(id, fire);
        self.stats.ignited += 1;
        id
    }

    /// Pour water on one fire
    ///
    /// # Errors
    /// Returns [`FireError::UnknownFire`] if `id` is not live. Water on a fire
    /// that is already going out is not an error.
    pub fn apply_water(&mut self, id: FireId, amount: f32) -> Result<(), FireError> {
        let fire = self.fires.get_mut(&id).ok_or(FireError::UnknownFire(id))?;
        let before = fire.water_accumulated();
        fire.apply_water(amount, &mut self.sinks);
        self.stats.water_applied += fire.water_accumulated() - before;
        Ok(())
    }

    /// Pour `amount` of water on every fire within `radius` of `origin`
    ///
    /// Returns how many fires were hit.
    pub fn spray_water(&mut self, origin: Vec3, radius: f32, amount: f32) -> usize {
        let hit = self.fires_within(origin, radius);
        for &id in &hit {
            if let Some(fire) = self.fires.get_mut(&id) {
                let before = fire.water_accumulated();
                fire.apply_water(amount, &mut self.sinks);
                self.stats.water_applied += fire.water_accumulated() - before;
            }
        }
        debug!(
            "Sprayed {:.2} water at ({:.1}, {:.1}, {:.1}) r={:.1}: {} fires hit",
            amount,
            origin.x,
            origin.y,
            origin.z,
            radius,
            hit.len()
        );
        hit.len()
    }

    /// Deliver an explicit contact event from the host's collision system
    ///
    /// # Errors
    /// Returns [`FireError::UnknownFire`] if `id` is not live.
    pub fn contact(&mut self, id: FireId, actor: ActorId, kind: ContactKind) -> Result<(), FireError> {
        let fire = self.fires.get_mut(&id).ok_or(FireError::UnknownFire(id))?;
        fire.handle_contact(actor, kind);
        self.contacts.record(ContactEvent {
            fire: id,
            actor,
            kind,
        });
        Ok(())
    }

    /// Report an actor's position to the built-in trigger-volume detector
    ///
    /// Every live fire within `trigger_radius` receives enter (first overlap)
    /// or stay; fires the actor has left receive exit. Returns the events
    /// delivered.
    pub fn update_actor_position(&mut self, actor: ActorId, position: Vec3) -> Vec<ContactEvent> {
        let inside = self.fires_within(position, self.config.trigger_radius);
        let events = self.contacts.update(actor, inside);
        self.deliver(&events);
        events
    }

    /// Remove an actor (despawned, teleported), exiting every overlap
    pub fn remove_actor(&mut self, actor: ActorId) -> Vec<ContactEvent> {
        let events = self.contacts.remove_actor(actor);
        self.deliver(&events);
        events
    }

    /// Advance the clock by `dt` and tick every live fire once
    ///
    /// `world_health` is the normalized `[0, 1]` environment signal. Returns
    /// one [`FireDestroyed`] per fire removed this step: extinguished fires
    /// `despawn_delay` after going out, tree-destroying fires on the same
    /// step.
    pub fn tick(&mut self, dt: f32, world_health: f32) -> Vec<FireDestroyed> {
        let dt = dt.max(0.0);
        self.simulation_time += dt;
        let now = self.simulation_time;
        let damage_bound = self.sinks.has_damage();
        let structures_bound = self.sinks.has_structures();
        let currency_bound = self.sinks.has_currency();

        for id in self.sorted_ids() {
            let Some(fire) = self.fires.get_mut(&id) else {
                continue;
            };

            let damage_gate = fire.next_damage_time();
            if let Some(pending) = fire.tick(dt, now, world_health, &mut self.sinks) {
                match pending.cause {
                    DestructionCause::Extinguished => {
                        self.stats.extinguished += 1;
                        if currency_bound {
                            self.stats.coins_awarded += self.config.extinguish_coin_award;
                        }
                    }
                    DestructionCause::TreeDestroyed => {
                        if structures_bound && fire.parent().is_some() {
                            self.stats.trees_destroyed += 1;
                        }
                    }
                }
            }
            if damage_bound && fire.next_damage_time() != damage_gate {
                self.stats.damage_ticks += 1;
            }
        }

        self.despawn_due(now)
    }

    fn despawn_due(&mut self, now: f32) -> Vec<FireDestroyed> {
        let mut due: Vec<(FireId, DestructionCause)> = self
            .fires
            .values()
            .filter_map(|fire| {
                fire.pending_destruction()
                    .filter(|pending| pending.is_due(now))
                    .map(|pending| (fire.id(), pending.cause))
            })
            .collect();
        due.sort_unstable_by_key(|(id, _)| *id);

        due.into_iter()
            .map(|(fire, cause)| {
                self.fires.remove(&fire);
                self.contacts.forget_fire(fire);
                self.stats.despawned += 1;
                info!("Destroyed {} ({:?}) at {:.2}s", fire, cause, now);
                FireDestroyed {
                    fire,
                    cause,
                    at: now,
                }
            })
            .collect()
    }

    fn deliver(&mut self, events: &[ContactEvent]) {
        for event in events {
            if let Some(fire) = self.fires.get_mut(&event.fire) {
                fire.handle_contact(event.actor, event.kind);
            }
        }
    }

    fn fires_within(&self, origin: Vec3, radius: f32) -> Vec<FireId> {
        let mut hit: Vec<FireId> = self
            .fires
            .values()
            .filter(|fire| (fire.position() - origin).norm() <= radius)
            .map(FireInstance::id)
            .collect();
        hit.sort_unstable();
        hit
    }

    fn sorted_ids(&self) -> Vec<FireId> {
        let mut ids: Vec<FireId> = self.fires.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Look up a live fire
    pub fn fire(&self, id: FireId) -> Option<&FireInstance> {
        self.fires.get(&id)
    }

    /// Live fires in ascending id order
    pub fn fires(&self) -> Vec<&FireInstance> {
        let mut fires: Vec<&FireInstance> = self.fires.values().collect();
        fires.sort_unstable_by_key(|fire| fire.id());
        fires
    }

    pub fn active_fire_count(&self) -> usize {
        self.fires.len()
    }

    /// Number of live fires in a phase
    pub fn count_in_phase(&self, phase: FirePhase) -> usize {
        self.fires.values().filter(|fire| fire.phase() == phase).count()
    }

    /// Whether the overlap detector currently has `actor` inside `fire`
    pub fn is_overlapping(&self, actor: ActorId, fire: FireId) -> bool {
        self.contacts.is_overlapping(actor, fire)
    }

    pub fn simulation_time(&self) -> f32 {
        self.simulation_time
    }

    pub fn config(&self) -> &FireConfig {
        &self.config
    }

    pub fn stats(&self) -> &FireWorldStats {
        &self.stats
    }

    /// Snapshots of every live fire in ascending id order
    pub fn snapshots(&self) -> Vec<FireSnapshot> {
        self.fires().into_iter().map(FireInstance::snapshot).collect()
    }
}
