use fire_controller_core::{
    ActorId, Collaborators, CurrencySink, DamageSink, DestructionCause, EmissionSink, FireId,
    RewardSink, StructureId, StructureSink, Vec3,
};
use std::os::raw::c_void;

/// Host callbacks the controller reports through.
///
/// Every function pointer is optional. Callbacks are grouped the same way
/// the controller's collaborators are: if every pointer in a group is null,
/// that collaborator stays unbound and its side effects are skipped (and
/// logged). `user_data` is passed back unchanged as the first argument of
/// every callback.
///
/// | Group     | Callbacks                                        |
/// |-----------|--------------------------------------------------|
/// | damage    | `damage_actor`, `damage_world`                   |
/// | structure | `remove_structure`                               |
/// | reward    | `spawn_reward`                                   |
/// | currency  | `add_coins`                                      |
/// | emission  | `play`, `set_rate`, `start_steam`, `stop`        |
///
/// `fire_destroyed` is invoked from `fire_controller_tick` once per fire
/// removed from the world (`cause`: 0 = extinguished, 1 = tree destroyed).
///
/// # Threading
/// Callbacks run synchronously on the thread that called into the
/// controller.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct FireCallbacks {
    pub user_data: *mut c_void,
    pub damage_actor: Option<extern "C" fn(user_data: *mut c_void, actor: u32, amount: f32)>,
    pub damage_world: Option<extern "C" fn(user_data: *mut c_void, amount: f32)>,
    pub remove_structure: Option<extern "C" fn(user_data: *mut c_void, structure: u32)>,
    pub spawn_reward:
        Option<extern "C" fn(user_data: *mut c_void, fire: u32, x: f32, y: f32, z: f32)>,
    pub add_coins: Option<extern "C" fn(user_data: *mut c_void, amount: u32)>,
    pub play: Option<extern "C" fn(user_data: *mut c_void, fire: u32)>,
    pub set_rate: Option<extern "C" fn(user_data: *mut c_void, fire: u32, rate: f32)>,
    pub start_steam: Option<extern "C" fn(user_data: *mut c_void, fire: u32)>,
    pub stop: Option<extern "C" fn(user_data: *mut c_void, fire: u32)>,
    pub fire_destroyed: Option<extern "C" fn(user_data: *mut c_void, fire: u32, cause: u8)>,
}

impl FireCallbacks {
    /// No callbacks bound
    pub(crate) fn none() -> Self {
        Self {
            user_data: std::ptr::null_mut(),
            damage_actor: None,
            damage_world: None,
            remove_structure: None,
            spawn_reward: None,
            add_coins: None,
            play: None,
            set_rate: None,
            start_steam: None,
            stop: None,
            fire_destroyed: None,
        }
    }

    /// Bind one collaborator per group that has at least one callback
    pub(crate) fn to_collaborators(self) -> Collaborators {
        let mut sinks = Collaborators::new();
        let adapter = CallbackSink(self);

        if self.damage_actor.is_some() || self.damage_world.is_some() {
            sinks = sinks.with_damage(adapter);
        }
        if self.remove_structure.is_some() {
            sinks = sinks.with_structures(adapter);
        }
        if self.spawn_reward.is_some() {
            sinks = sinks.with_rewards(adapter);
        }
        if self.add_coins.is_some() {
            sinks = sinks.with_currency(adapter);
        }
        if self.play.is_some()
            || self.set_rate.is_some()
            || self.start_steam.is_some()
            || self.stop.is_some()
        {
            sinks = sinks.with_emission(adapter);
        }

        sinks
    }

    /// Report a fire leaving the world
    pub(crate) fn fire_destroyed(&self, fire: FireId, cause: DestructionCause) {
        if let Some(callback) = self.fire_destroyed {
            let cause = match cause {
                DestructionCause::Extinguished => 0,
                DestructionCause::TreeDestroyed => 1,
            };
            callback(self.user_data, fire.get(), cause);
        }
    }
}

/// Routes collaborator calls to the host's function pointers
#[derive(Clone, Copy)]
struct CallbackSink(FireCallbacks);

impl DamageSink for CallbackSink {
    fn damage_actor(&mut self, actor: ActorId, amount: f32) {
        if let Some(callback) = self.0.damage_actor {
            callback(self.0.user_data, actor.get(), amount);
        }
    }

    fn damage_world(&mut self, amount: f32) {
        if let Some(callback) = self.0.damage_world {
            callback(self.0.user_data, amount);
        }
    }
}

impl StructureSink for CallbackSink {
    fn remove_structure(&mut self, structure: StructureId) {
        if let Some(callback) = self.0.remove_structure {
            callback(self.0.user_data, structure.get());
        }
    }
}

impl RewardSink for CallbackSink {
    fn spawn_reward(&mut self, fire: FireId, position: Vec3) {
        if let Some(callback) = self.0.spawn_reward {
            callback(self.0.user_data, fire.get(), position.x, position.y, position.z);
        }
    }
}

impl CurrencySink for CallbackSink {
    fn add_coins(&mut self, amount: u32) {
        if let Some(callback) = self.0.add_coins {
            callback(self.0.user_data, amount);
        }
    }
}

impl EmissionSink for CallbackSink {
    fn play(&mut self, fire: FireId) {
        if let Some(callback) = self.0.play {
            callback(self.0.user_data, fire.get());
        }
    }

    fn set_rate(&mut self, fire: FireId, rate: f32) {
        if let Some(callback) = self.0.set_rate {
            callback(self.0.user_data, fire.get(), rate);
        }
    }

    fn start_steam(&mut self, fire: FireId) {
        if let Some(callback) = self.0.start_steam {
            callback(self.0.user_data, fire.get());
        }
    }

    fn stop(&mut self, fire: FireId) {
        if let Some(callback) = self.0.stop {
            callback(self.0.user_data, fire.get());
        }
    }
}
