use fire_controller_core::{
    ActorId, ContactKind, FireError, FireId, FirePhase, FireWorld, Ignition, StructureId, Vec3,
};
use std::ptr;

use crate::callbacks::FireCallbacks;
use crate::config::{fire_controller_default_config, FireControllerConfig};
use crate::error::{DefaultControllerError, FireControllerErrorCode};
use crate::helpers::{clear_last_error, track_error, track_result};

/// A fire controller: every live fire plus the clock and host callbacks
/// that drive them.
///
/// # Threading
/// The instance is not thread-safe. Create it, tick it and feed it water
/// and contact events from a single thread (the game thread). Host callbacks
/// are invoked synchronously from inside those calls.
///
/// # Usage
/// ```cpp
/// FireCallbacks callbacks = {0};
/// callbacks.user_data = this;
/// callbacks.damage_actor = &OnDamageActor;
/// callbacks.remove_structure = &OnRemoveTree;
///
/// FireControllerConfig config = fire_controller_default_config();
/// FireControllerInstance* controller = nullptr;
/// if (fire_controller_new(&config, &callbacks, &controller) != FireControllerErrorCode_Ok) {
///     return;
/// }
///
/// uint32_t fire = 0;
/// fire_controller_ignite(controller, x, y, z, true, tree_id, true, &fire);
///
/// // once per frame
/// fire_controller_tick(controller, delta_time, world_health, nullptr);
///
/// fire_controller_destroy(controller);
/// ```
pub struct FireControllerInstance {
    pub(crate) world: FireWorld,
    pub(crate) callbacks: FireCallbacks,
}

impl FireControllerInstance {
    /// Creates a controller bound to the host's callbacks.
    ///
    /// # Errors
    ///
    /// Returns `FireControllerErrorCode::InvalidParameter` for an unknown difficulty.
    /// Returns `FireControllerErrorCode::InvalidConfig` if any tuning value is rejected.
    pub(crate) fn new(
        config: FireControllerConfig,
        callbacks: FireCallbacks,
    ) -> Result<Box<Self>, DefaultControllerError> {
        let config = config.to_core()?;
        let world = FireWorld::new(config, callbacks.to_collaborators())?;

        Ok(Box::new(Self { world, callbacks }))
    }
}

/// C view of a fire's lifecycle phase.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireControllerPhase {
    Burning = 0,
    Extinguishing = 1,
    Extinguished = 2,
}

impl From<FirePhase> for FireControllerPhase {
    fn from(phase: FirePhase) -> Self {
        match phase {
            FirePhase::Burning => Self::Burning,
            FirePhase::Extinguishing => Self::Extinguishing,
            FirePhase::Extinguished => Self::Extinguished,
        }
    }
}

/// Point-in-time state of one fire.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireState {
    pub phase: FireControllerPhase,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub water_accumulated: f32,
    pub water_needed: f32,
    pub emission_rate: f32,
    pub damage_amount: f32,
    pub contact_active: bool,
    pub tree_destruction_deadline: f32,
    /// True once the fire has been extinguished or has destroyed its tree
    pub terminated: bool,
}

/// Borrow the instance behind a caller pointer, recording a null-pointer error.
unsafe fn instance_mut<'a>(
    ptr: *mut FireControllerInstance,
) -> Result<&'a mut FireControllerInstance, FireControllerErrorCode> {
    // SAFETY: the caller guarantees a non-null `ptr` came from `fire_controller_new`.
    unsafe { ptr.as_mut() }
        .ok_or_else(|| track_error(&DefaultControllerError::null_pointer("instance")))
}

/// Create a new controller and return it via out-parameter.
///
/// Parameters
/// - `config`: tuning, or null for `fire_controller_default_config()`.
/// - `callbacks`: host callbacks, or null to run with every collaborator unbound.
///   The struct is copied; `user_data` must stay valid for the controller's lifetime.
/// - `out_instance`: receives the controller on success, null on failure.
///
/// Returns
/// - `FireControllerErrorCode::Ok` (0) on success
/// - `FireControllerErrorCode::NullPointer` if `out_instance` is null
/// - `FireControllerErrorCode::InvalidConfig` if a tuning value is rejected
/// - `FireControllerErrorCode::InvalidParameter` if `difficulty` is unknown
///
/// # Safety
/// - `out_instance` must be a valid, non-null pointer to writable memory.
/// - `config` and `callbacks` must each be null or point to a valid value.
/// - The caller owns the returned instance and MUST call
///   `fire_controller_destroy` exactly once.
#[no_mangle]
pub unsafe extern "C" fn fire_controller_new(
    config: *const FireControllerConfig,
    callbacks: *const FireCallbacks,
    out_instance: *mut *mut FireControllerInstance,
) -> FireControllerErrorCode {
    if out_instance.is_null() {
        return track_error(&DefaultControllerError::null_pointer("out_instance"));
    }

    // SAFETY: both pointers are null or valid per the contract above.
    let config = unsafe { config.as_ref() }
        .copied()
        .unwrap_or_else(|| fire_controller_default_config());
    let callbacks = unsafe { callbacks.as_ref() }
        .copied()
        .unwrap_or_else(FireCallbacks::none);

    match track_result(FireControllerInstance::new(config, callbacks)) {
        Ok(instance) => {
            unsafe {
                *out_instance = Box::into_raw(instance);
            }
            FireControllerErrorCode::Ok
        }
        Err(code) => {
            unsafe {
                *out_instance = ptr::null_mut();
            }
            code
        }
    }
}

/// Destroy a controller previously created by `fire_controller_new`.
///
/// Null is a no-op. No callbacks are invoked for fires still alive.
///
/// # Safety
/// - The pointer MUST have been created by `fire_controller_new` and not
///   destroyed already.
/// - The caller must not use the pointer again.
#[no_mangle]
pub unsafe extern "C" fn fire_controller_destroy(ptr: *mut FireControllerInstance) {
    if ptr.is_null() {
        return;
    }

    // SAFETY: `ptr` came from `Box::into_raw` in `fire_controller_new`.
    unsafe {
        drop(Box::from_raw(ptr));
    }
}

/// Ignite a fire at the current simulation time.
///
/// Parameters
/// - `has_parent` / `parent_structure`: the tree this fire burns down if not
///   put out in time. `parent_structure` is ignored when `has_parent` is false.
/// - `reward`: drop a reward (via `spawn_reward`) when the fire is put out.
/// - `out_fire`: receives the new fire id (ids start at 1).
///
/// Returns
/// - `FireControllerErrorCode::Ok` (0) on success
/// - `FireControllerErrorCode::NullPointer` if `instance` or `out_fire` is null
///
/// # Safety
/// `instance` must come from `fire_controller_new`; `out_fire` must be writable.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn fire_controller_ignite(
    instance: *mut FireControllerInstance,
    x: f32,
    y: f32,
    z: f32,
    has_parent: bool,
    parent_structure: u32,
    reward: bool,
    out_fire: *mut u32,
) -> FireControllerErrorCode {
    let instance = match unsafe { instance_mut(instance) } {
        Ok(instance) => instance,
        Err(code) => return code,
    };
    if out_fire.is_null() {
        return track_error(&DefaultControllerError::null_pointer("out_fire"));
    }

    let mut ignition = Ignition::at(Vec3::new(x, y, z));
    if has_parent {
        ignition = ignition.under(StructureId::new(parent_structure));
    }
    if reward {
        ignition = ignition.with_reward();
    }

    let fire = instance.world.ignite(ignition);
    unsafe {
        *out_fire = fire.get();
    }
    clear_last_error();
    FireControllerErrorCode::Ok
}

/// Pour water on a fire.
///
/// Negative amounts count as zero. Water on a fire that is already going
/// out is accepted and ignored.
///
/// Returns
/// - `FireControllerErrorCode::Ok` (0) on success
/// - `FireControllerErrorCode::NullPointer` if `instance` is null
/// - `FireControllerErrorCode::UnknownFire` if `fire` is not live
///
/// # Safety
/// `instance` must come from `fire_controller_new`.
#[no_mangle]
pub unsafe extern "C" fn fire_controller_apply_water(
    instance: *mut FireControllerInstance,
    fire: u32,
    amount: f32,
) -> FireControllerErrorCode {
    let instance = match unsafe { instance_mut(instance) } {
        Ok(instance) => instance,
        Err(code) => return code,
    };

    let result = instance
        .world
        .apply_water(FireId::new(fire), amount)
        .map_err(DefaultControllerError::from);
    match track_result(result) {
        Ok(()) => FireControllerErrorCode::Ok,
        Err(code) => code,
    }
}

/// Deliver a trigger-volume event from the host's collision system.
///
/// `kind`: 0 = enter, 1 = stay, 2 = exit.
///
/// Returns
/// - `FireControllerErrorCode::Ok` (0) on success
/// - `FireControllerErrorCode::NullPointer` if `instance` is null
/// - `FireControllerErrorCode::InvalidParameter` if `kind` is out of range
/// - `FireControllerErrorCode::UnknownFire` if `fire` is not live
///
/// # Safety
/// `instance` must come from `fire_controller_new`.
#[no_mangle]
pub unsafe extern "C" fn fire_controller_contact(
    instance: *mut FireControllerInstance,
    fire: u32,
    actor: u32,
    kind: u8,
) -> FireControllerErrorCode {
    let instance = match unsafe { instance_mut(instance) } {
        Ok(instance) => instance,
        Err(code) => return code,
    };

    let kind = match kind {
        0 => ContactKind::Enter,
        1 => ContactKind::Stay,
        2 => ContactKind::Exit,
        other => {
            return track_error(&DefaultControllerError::invalid_parameter(format!(
                "contact kind must be 0, 1 or 2, got {other}"
            )))
        }
    };

    let result = instance
        .world
        .contact(FireId::new(fire), ActorId::new(actor), kind)
        .map_err(DefaultControllerError::from);
    match track_result(result) {
        Ok(()) => FireControllerErrorCode::Ok,
        Err(code) => code,
    }
}

/// Advance every fire by one frame.
///
/// `world_health` is clamped to `[0, 1]`. Fires removed this frame are
/// reported through the `fire_destroyed` callback in ascending id order;
/// their count is written to `out_destroyed` when it is non-null.
///
/// Returns
/// - `FireControllerErrorCode::Ok` (0) on success
/// - `FireControllerErrorCode::NullPointer` if `instance` is null
///
/// # Safety
/// `instance` must come from `fire_controller_new`; `out_destroyed` must be
/// null or writable.
#[no_mangle]
pub unsafe extern "C" fn fire_controller_tick(
    instance: *mut FireControllerInstance,
    dt: f32,
    world_health: f32,
    out_destroyed: *mut u32,
) -> FireControllerErrorCode {
    let instance = match unsafe { instance_mut(instance) } {
        Ok(instance) => instance,
        Err(code) => return code,
    };

    let destroyed = instance.world.tick(dt, world_health);
    for signal in &destroyed {
        instance.callbacks.fire_destroyed(signal.fire, signal.cause);
    }

    // SAFETY: null or writable per the contract above.
    if let Some(out) = unsafe { out_destroyed.as_mut() } {
        *out = u32::try_from(destroyed.len()).unwrap_or(u32::MAX);
    }
    clear_last_error();
    FireControllerErrorCode::Ok
}

/// Read the current state of a live fire.
///
/// Returns
/// - `FireControllerErrorCode::Ok` (0) on success, with `out_state` populated
/// - `FireControllerErrorCode::NullPointer` if `instance` or `out_state` is null
/// - `FireControllerErrorCode::UnknownFire` if `fire` is not live
///
/// # Safety
/// `instance` must come from `fire_controller_new`; `out_state` must be writable.
#[no_mangle]
pub unsafe extern "C" fn fire_controller_get_fire_state(
    instance: *const FireControllerInstance,
    fire: u32,
    out_state: *mut FireState,
) -> FireControllerErrorCode {
    // SAFETY: null or a live instance per the contract above.
    let Some(instance) = (unsafe { instance.as_ref() }) else {
        return track_error(&DefaultControllerError::null_pointer("instance"));
    };
    if out_state.is_null() {
        return track_error(&DefaultControllerError::null_pointer("out_state"));
    }

    let id = FireId::new(fire);
    let Some(fire) = instance.world.fire(id) else {
        return track_error(&DefaultControllerError::from(FireError::UnknownFire(id)));
    };

    let position = fire.position();
    unsafe {
        *out_state = FireState {
            phase: fire.phase().into(),
            x: position.x,
            y: position.y,
            z: position.z,
            water_accumulated: fire.water_accumulated(),
            water_needed: fire.water_needed(),
            emission_rate: fire.emission_rate(),
            damage_amount: fire.damage_amount(),
            contact_active: fire.contact_active(),
            tree_destruction_deadline: fire.tree_destruction_deadline(),
            terminated: fire.is_terminated(),
        };
    }
    clear_last_error();
    FireControllerErrorCode::Ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{fire_controller_get_last_error, fire_controller_get_last_error_code};
    use std::ffi::CStr;
    use std::os::raw::c_void;

    #[derive(Default)]
    struct HostLog {
        damage: Vec<(u32, f32)>,
        removed: Vec<u32>,
        rewards: Vec<u32>,
        coins: u32,
        destroyed: Vec<(u32, u8)>,
    }

    fn log<'a>(user_data: *mut c_void) -> &'a mut HostLog {
        unsafe { &mut *user_data.cast::<HostLog>() }
    }

    extern "C" fn on_damage_actor(user_data: *mut c_void, actor: u32, amount: f32) {
        log(user_data).damage.push((actor, amount));
    }

    extern "C" fn on_remove_structure(user_data: *mut c_void, structure: u32) {
        log(user_data).removed.push(structure);
    }

    extern "C" fn on_spawn_reward(user_data: *mut c_void, fire: u32, _x: f32, _y: f32, _z: f32) {
        log(user_data).rewards.push(fire);
    }

    extern "C" fn on_add_coins(user_data: *mut c_void, amount: u32) {
        log(user_data).coins += amount;
    }

    extern "C" fn on_fire_destroyed(user_data: *mut c_void, fire: u32, cause: u8) {
        log(user_data).destroyed.push((fire, cause));
    }

    fn callbacks_for(host: &mut HostLog) -> FireCallbacks {
        FireCallbacks {
            user_data: ptr::from_mut(host).cast(),
            damage_actor: Some(on_damage_actor),
            remove_structure: Some(on_remove_structure),
            spawn_reward: Some(on_spawn_reward),
            add_coins: Some(on_add_coins),
            fire_destroyed: Some(on_fire_destroyed),
            ..FireCallbacks::none()
        }
    }

    fn new_controller(callbacks: &FireCallbacks) -> *mut FireControllerInstance {
        let mut instance = ptr::null_mut();
        let code = unsafe { fire_controller_new(ptr::null(), callbacks, &mut instance) };
        assert_eq!(code, FireControllerErrorCode::Ok);
        assert!(!instance.is_null());
        instance
    }

    fn ignite(instance: *mut FireControllerInstance, parent: Option<u32>, reward: bool) -> u32 {
        let mut fire = 0;
        let code = unsafe {
            fire_controller_ignite(
                instance,
                0.0,
                0.0,
                0.0,
                parent.is_some(),
                parent.unwrap_or(0),
                reward,
                &mut fire,
            )
        };
        assert_eq!(code, FireControllerErrorCode::Ok);
        fire
    }

    #[test]
    fn test_null_out_instance_sets_last_error() {
        let code = unsafe { fire_controller_new(ptr::null(), ptr::null(), ptr::null_mut()) };
        assert_eq!(code, FireControllerErrorCode::NullPointer);
        assert_eq!(fire_controller_get_last_error_code(), FireControllerErrorCode::NullPointer);

        let message = unsafe { CStr::from_ptr(fire_controller_get_last_error()) };
        assert!(message.to_string_lossy().contains("out_instance"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = FireControllerConfig {
            water_needed: -1.0,
            ..fire_controller_default_config()
        };
        let mut instance = ptr::null_mut();
        let code = unsafe { fire_controller_new(&config, ptr::null(), &mut instance) };
        assert_eq!(code, FireControllerErrorCode::InvalidConfig);
        assert!(instance.is_null());

        let config = FireControllerConfig {
            difficulty: 7,
            ..fire_controller_default_config()
        };
        let code = unsafe { fire_controller_new(&config, ptr::null(), &mut instance) };
        assert_eq!(code, FireControllerErrorCode::InvalidParameter);
    }

    #[test]
    fn test_extinguish_reports_coins_reward_and_destruction() {
        let mut host = HostLog::default();
        let callbacks = callbacks_for(&mut host);
        let instance = new_controller(&callbacks);
        let fire = ignite(instance, Some(3), true);

        unsafe {
            assert_eq!(
                fire_controller_apply_water(instance, fire, 3.0),
                FireControllerErrorCode::Ok
            );
            for _ in 0..40 {
                fire_controller_tick(instance, 0.1, 0.5, ptr::null_mut());
            }
            fire_controller_destroy(instance);
        }

        assert_eq!(host.coins, 4);
        assert_eq!(host.rewards, vec![fire]);
        assert!(host.removed.is_empty());
        assert_eq!(host.destroyed, vec![(fire, 0)]);
    }

    #[test]
    fn test_unattended_fire_removes_tree() {
        let mut host = HostLog::default();
        let callbacks = callbacks_for(&mut host);
        let instance = new_controller(&callbacks);
        let fire = ignite(instance, Some(9), false);

        let mut destroyed_total = 0;
        unsafe {
            for _ in 0..40 {
                let mut destroyed = 0;
                fire_controller_tick(instance, 1.0, 0.0, &mut destroyed);
                destroyed_total += destroyed;
            }
            fire_controller_destroy(instance);
        }

        assert_eq!(destroyed_total, 1);
        assert_eq!(host.removed, vec![9]);
        assert_eq!(host.destroyed, vec![(fire, 1)]);
        assert_eq!(host.coins, 0);
    }

    #[test]
    fn test_contact_damages_through_callback() {
        let mut host = HostLog::default();
        let callbacks = callbacks_for(&mut host);
        let instance = new_controller(&callbacks);
        let fire = ignite(instance, None, false);

        unsafe {
            assert_eq!(
                fire_controller_contact(instance, fire, 42, 0),
                FireControllerErrorCode::Ok
            );
            fire_controller_tick(instance, 0.1, 1.0, ptr::null_mut());
            fire_controller_destroy(instance);
        }

        assert_eq!(host.damage, vec![(42, 20.0)]);
    }

    #[test]
    fn test_bad_arguments_return_codes() {
        let instance = new_controller(&FireCallbacks::none());
        let fire = ignite(instance, None, false);

        unsafe {
            assert_eq!(
                fire_controller_apply_water(instance, fire + 100, 1.0),
                FireControllerErrorCode::UnknownFire
            );
            assert_eq!(
                fire_controller_contact(instance, fire, 1, 9),
                FireControllerErrorCode::InvalidParameter
            );
            assert_eq!(
                fire_controller_tick(ptr::null_mut(), 0.1, 0.0, ptr::null_mut()),
                FireControllerErrorCode::NullPointer
            );
            fire_controller_destroy(instance);
        }
    }

    #[test]
    fn test_fire_state_snapshot() {
        let instance = new_controller(&FireCallbacks::none());
        let fire = ignite(instance, Some(1), false);
        let mut state = FireState {
            phase: FireControllerPhase::Extinguished,
            x: 0.0,
            y: 0.0,
            z: 0.0,
            water_accumulated: 0.0,
            water_needed: 0.0,
            emission_rate: 0.0,
            damage_amount: 0.0,
            contact_active: false,
            tree_destruction_deadline: 0.0,
            terminated: true,
        };

        unsafe {
            fire_controller_apply_water(instance, fire, 1.5);
            fire_controller_tick(instance, 0.1, 1.0, ptr::null_mut());
            assert_eq!(
                fire_controller_get_fire_state(instance, fire, &mut state),
                FireControllerErrorCode::Ok
            );
            fire_controller_destroy(instance);
        }

        assert_eq!(state.phase, FireControllerPhase::Burning);
        assert_eq!(state.water_accumulated, 1.5);
        assert_eq!(state.water_needed, 3.0);
        assert_eq!(state.emission_rate, 80.0);
        assert_eq!(state.tree_destruction_deadline, 40.0);
        assert!(!state.terminated);
    }
}
