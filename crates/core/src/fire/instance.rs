//! Per-fire lifecycle state machine
//!
//! A [`FireInstance`] burns at an intensity scaled by world health, soaks up
//! water until it starts going out, ramps its emission down over
//! `extinguish_duration`, and burns down its parent tree if the deadline
//! passes first. It is driven entirely by [`FireInstance::tick`] with a
//! caller-supplied monotonic clock, so the same inputs always produce the
//! same sink calls.
//!
//! # Timing
//!
//! All times are simulation seconds on the driver's clock:
//! - `next_damage_time` gates damage ticks (`now >= next_damage_time`)
//! - `extinguish_elapsed` advances by `dt` while extinguishing
//! - `tree_destruction_deadline = ignited_at + tree_destruction_time`

use super::phase::{DestructionCause, FirePhase, PendingDestruction};
use super::sinks::Collaborators;
use crate::config::FireConfig;
use crate::core_types::{ActorId, FireId, StructureId, Vec3};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

/// Overlap event reported by a collision/trigger system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactKind {
    /// Actor started overlapping the fire's trigger volume
    Enter,
    /// Actor is still overlapping
    Stay,
    /// Actor left the trigger volume
    Exit,
}

/// Linear interpolation between `from` and `to`
#[inline]
fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// One burning object and all of its lifecycle state
#[derive(Debug, Clone)]
pub struct FireInstance {
    id: FireId,
    position: Vec3,
    parent: Option<StructureId>,
    reward: bool,
    config: FireConfig,

    phase: FirePhase,
    ignited_at: f32,

    // Extinguishing
    water_accumulated: f32,
    extinguish_elapsed: f32,
    /// Emission rate captured when the ramp started
    extinguish_start_rate: f32,
    steam_active: bool,

    // Intensity (recomputed every tick while alight)
    damage_amount: f32,
    emission_rate: f32,
    next_damage_time: f32,

    tree_destruction_deadline: f32,
    contact: Option<ActorId>,
    destruction: Option<PendingDestruction>,
}

impl FireInstance {
    /// Ignite a fire at `now`
    ///
    /// The tree-destruction deadline is armed here, once. The damage gate
    /// opens at `now`, so an actor already in contact is hurt on the very
    /// first tick rather than one `damage_interval` later. With contact from
    /// ignition and 0.1s frames, hits land at 0.1, 0.6, 1.1, 1.6 and so on
    /// instead of on interval multiples.
    pub fn new(id: FireId, position: Vec3, config: &FireConfig, now: f32) -> Self {
        Self {
            id,
            position,
            parent: None,
            reward: false,
            config: config.clone(),
            phase: FirePhase::Burning,
            ignited_at: now,
            water_accumulated: 0.0,
            extinguish_elapsed: 0.0,
            extinguish_start_rate: config.base_emission_rate,
            steam_active: false,
            damage_amount: config.damage_amount,
            emission_rate: config.base_emission_rate,
            next_damage_time: now,
            tree_destruction_deadline: now + config.tree_destruction_time,
            contact: None,
            destruction: None,
        }
    }

    /// Attach the fire to the tree it will burn down
    pub fn with_parent(mut self, structure: StructureId) -> Self {
        self.parent = Some(structure);
        self
    }

    /// Drop a reward when this fire is put out
    pub fn with_reward(mut self) -> Self {
        self.reward = true;
        self
    }

    /// Pour water on the fire
    ///
    /// Negative or NaN amounts count as zero. Ignored unless the fire is
    /// `Burning`. Returns `true` on the call that starts the extinguish ramp;
    /// overshooting the threshold still starts it exactly once.
    pub fn apply_water(&mut self, amount: f32, sinks: &mut Collaborators) -> bool {
        if self.phase != FirePhase::Burning || self.destruction.is_some() {
            trace!("{}: water ignored in phase {:?}", self.id, self.phase);
            return false;
        }

        self.water_accumulated += amount.max(0.0);
        debug!(
            "{}: water accumulated {:.2}/{:.2}",
            self.id, self.water_accumulated, self.config.water_needed
        );

        if !self.steam_active {
            self.steam_active = true;
            sinks.start_steam(self.id);
        }

        if self.water_accumulated >= self.config.water_needed {
            self.phase = FirePhase::Extinguishing;
            self.extinguish_elapsed = 0.0;
            self.extinguish_start_rate = self.emission_rate;
            info!(
                "{}: extinguishing from emission rate {:.1}",
                self.id, self.extinguish_start_rate
            );
            return true;
        }

        false
    }

    /// Advance the fire by one simulation step
    ///
    /// `now` must be monotonic across calls. `world_health` is clamped to
    /// `[0, 1]` (NaN counts as 0). Returns the destruction this step
    /// scheduled, if any; after that every later tick is a no-op.
    pub fn tick(
        &mut self,
        dt: f32,
        now: f32,
        world_health: f32,
        sinks: &mut Collaborators,
    ) -> Option<PendingDestruction> {
        if self.destruction.is_some() {
            return None;
        }

        let health = if world_health.is_nan() {
            0.0
        } else {
            world_health.clamp(0.0, 1.0)
        };

        match self.phase {
            FirePhase::Burning => {
                self.emission_rate = self.scaled_emission(health);
                self.damage_amount = self.scaled_damage(health);
                sinks.set_rate(self.id, self.emission_rate);
            }
            FirePhase::Extinguishing => {
                self.damage_amount = self.scaled_damage(health);
                self.extinguish_elapsed += dt.max(0.0);
                self.emission_rate =
                    lerp(self.extinguish_start_rate, 0.0, self.extinguish_fraction());

                if self.extinguish_elapsed >= self.config.extinguish_duration {
                    return Some(self.finish_extinguishing(now, sinks));
                }

                sinks.set_rate(self.id, self.emission_rate);
            }
            FirePhase::Extinguished => return None,
        }

        self.apply_contact_damage(now, sinks);
        self.check_tree_deadline(now, sinks)
    }

    /// Route a contact event to the matching handler
    pub fn handle_contact(&mut self, actor: ActorId, kind: ContactKind) {
        match kind {
            ContactKind::Enter => self.on_contact_enter(actor),
            ContactKind::Stay => self.on_contact_stay(actor),
            ContactKind::Exit => self.on_contact_exit(actor),
        }
    }

    /// Track `actor` as the one being hurt
    ///
    /// A fire damages a single actor. Whoever entered first keeps the slot
    /// until they exit; later actors are ignored until then.
    pub fn on_contact_enter(&mut self, actor: ActorId) {
        self.claim_contact(actor);
    }

    /// Same as enter; lets a waiting actor take over once the slot frees up
    pub fn on_contact_stay(&mut self, actor: ActorId) {
        self.claim_contact(actor);
    }

    /// Clear contact if `actor` is the one currently in the fire
    pub fn on_contact_exit(&mut self, actor: ActorId) {
        if self.contact == Some(actor) {
            self.contact = None;
        }
    }

    fn claim_contact(&mut self, actor: ActorId) {
        if self.contact.is_none() {
            self.contact = Some(actor);
        }
    }

    fn scaled_emission(&self, health: f32) -> f32 {
        self.config.base_emission_rate
            * (1.0 + health * (self.config.max_emission_multiplier - 1.0))
    }

    fn scaled_damage(&self, health: f32) -> f32 {
        self.config.damage_amount * (1.0 + health * (self.config.max_damage_multiplier - 1.0))
    }

    /// Ramp progress in `[0, 1]`; a zero-length ramp is immediately complete
    fn extinguish_fraction(&self) -> f32 {
        if self.config.extinguish_duration <= 0.0 {
            return 1.0;
        }
        (self.extinguish_elapsed / self.config.extinguish_duration).clamp(0.0, 1.0)
    }

    fn apply_contact_damage(&mut self, now: f32, sinks: &mut Collaborators) {
        let Some(actor) = self.contact else {
            return;
        };
        if now < self.next_damage_time {
            return;
        }

        sinks.damage_actor(self.id, actor, self.damage_amount);
        self.next_damage_time = now + self.config.damage_interval;
        debug!(
            "{}: damaged {} for {:.1}, next damage at {:.2}s",
            self.id, actor, self.damage_amount, self.next_damage_time
        );
    }

    fn check_tree_deadline(
        &mut self,
        now: f32,
        sinks: &mut Collaborators,
    ) -> Option<PendingDestruction> {
        if now < self.tree_destruction_deadline {
            return None;
        }

        match self.parent {
            Some(structure) => {
                info!(
                    "{}: not extinguished by {:.1}s, destroying {}",
                    self.id, self.tree_destruction_deadline, structure
                );
                sinks.remove_structure(self.id, structure);
                sinks.damage_world(self.id, self.config.tree_world_damage);
            }
            None => warn!(
                "{}: tree-destruction deadline passed but no parent structure is attached",
                self.id
            ),
        }

        let pending = PendingDestruction {
            at: now,
            cause: DestructionCause::TreeDestroyed,
        };
        self.destruction = Some(pending);
        Some(pending)
    }

    fn finish_extinguishing(&mut self, now: f32, sinks: &mut Collaborators) -> PendingDestruction {
        self.phase = FirePhase::Extinguished;
        self.emission_rate = 0.0;
        self.damage_amount = 0.0;

        sinks.set_rate(self.id, 0.0);
        sinks.stop_emission(self.id);
        sinks.add_coins(self.id, self.config.extinguish_coin_award);

        if self.reward {
            sinks.spawn_reward(self.id, self.position);
        } else {
            debug!("{}: no reward configured", self.id);
        }

        let pending = PendingDestruction {
            at: now + self.config.despawn_delay,
            cause: DestructionCause::Extinguished,
        };
        self.destruction = Some(pending);
        info!(
            "{}: extinguished at {:.2}s, despawning at {:.2}s",
            self.id, now, pending.at
        );
        pending
    }

    pub fn id(&self) -> FireId {
        self.id
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn parent(&self) -> Option<StructureId> {
        self.parent
    }

    pub fn has_reward(&self) -> bool {
        self.reward
    }

    pub fn phase(&self) -> FirePhase {
        self.phase
    }

    pub fn ignited_at(&self) -> f32 {
        self.ignited_at
    }

    pub fn water_accumulated(&self) -> f32 {
        self.water_accumulated
    }

    pub fn water_needed(&self) -> f32 {
        self.config.water_needed
    }

    pub fn extinguish_elapsed(&self) -> f32 {
        self.extinguish_elapsed
    }

    pub fn extinguish_duration(&self) -> f32 {
        self.config.extinguish_duration
    }

    /// Current particle emission rate
    pub fn emission_rate(&self) -> f32 {
        self.emission_rate
    }

    /// Damage dealt per damage tick at the current world health
    pub fn damage_amount(&self) -> f32 {
        self.damage_amount
    }

    pub fn damage_interval(&self) -> f32 {
        self.config.damage_interval
    }

    pub fn next_damage_time(&self) -> f32 {
        self.next_damage_time
    }

    pub fn tree_destruction_deadline(&self) -> f32 {
        self.tree_destruction_deadline
    }

    pub fn contact_active(&self) -> bool {
        self.contact.is_some()
    }

    pub fn contact_actor(&self) -> Option<ActorId> {
        self.contact
    }

    pub fn steam_active(&self) -> bool {
        self.steam_active
    }

    /// Destruction scheduled by extinguishing or by the tree deadline
    pub fn pending_destruction(&self) -> Option<PendingDestruction> {
        self.destruction
    }

    /// Whether the fire has reached a terminal state
    pub fn is_terminated(&self) -> bool {
        self.destruction.is_some()
    }

    /// Serializable view of the current state
    pub fn snapshot(&self) -> FireSnapshot {
        FireSnapshot {
            id: self.id,
            position: self.position,
            parent: self.parent,
            phase: self.phase,
            water_accumulated: self.water_accumulated,
            water_needed: self.config.water_needed,
            emission_rate: self.emission_rate,
            damage_amount: self.damage_amount,
            contact_actor: self.contact,
            tree_destruction_deadline: self.tree_destruction_deadline,
            destruction: self.destruction,
        }
    }
}

/// Point-in-time view of a fire for reporting and host inspection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireSnapshot {
    pub id: FireId,
    pub position: Vec3,
    pub parent: Option<StructureId>,
    pub phase: FirePhase,
    pub water_accumulated: f32,
    pub water_needed: f32,
    pub emission_rate: f32,
    pub damage_amount: f32,
    pub contact_actor: Option<ActorId>,
    pub tree_destruction_deadline: f32,
    pub destruction: Option<PendingDestruction>,
}
