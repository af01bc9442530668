//! Per-tick orchestration of an avatar, branching on ownership.
//!
//! Owned avatars sample input, resolve firing, move, steer their camera and
//! check for death. Observed avatars never simulate: their state arrives
//! through replication. Presentation, such as the hazard beams, follows the
//! firing flag on every avatar regardless of role.

mod spawn;

pub use spawn::{spawn_avatar, AvatarRequest};

use bevy::input::ButtonInput;
use bevy::prelude::*;
use log::{debug, info};

use crate::components::{
    CameraState, EntityHandle, Facing, Firing, HazardVisual, Health, LeaveRequested, Motion,
    NetId, Role,
};
use crate::input::{
    process_fire_edge, InputFrame, InputSampler, InputSourceKind, InputState, KeyBindings,
    KeyboardSampler, TouchControls,
};
use crate::movement::{advance_camera, MovementSimulator};
use crate::session::Session;
use crate::settings::AvatarSettings;

/// What the controller does with an avatar this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationGate {
    /// Owned avatar: run the full simulation.
    Simulate,
    /// Observed avatar in a live session: replication drives it.
    Suppress,
    /// Observed avatar with no session: nothing drives it.
    Idle,
}

impl SimulationGate {
    /// Decides the gate from the avatar's role and the session state.
    #[must_use]
    pub const fn for_role(role: Role, session_connected: bool) -> Self {
        match (role, session_connected) {
            (Role::Authority, _) => Self::Simulate,
            (Role::Observer, true) => Self::Suppress,
            (Role::Observer, false) => Self::Idle,
        }
    }
}

/// Triggered once when an owned avatar's health reaches zero.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct HealthDepleted {
    /// Avatar that died.
    pub entity: NetId,
    /// Health at the moment of death.
    pub health: f32,
}

/// Samples the configured input device for every owned avatar.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn sample_input_system(
    touch: Res<TouchControls>,
    keys: Option<Res<ButtonInput<KeyCode>>>,
    bindings: Res<KeyBindings>,
    mut avatars: Query<(&EntityHandle, &InputSourceKind, &mut InputState)>,
) {
    for (handle, source, mut input) in &mut avatars {
        if !handle.role.is_authority() {
            continue;
        }
        input.frame = match source {
            InputSourceKind::Touch => touch.sample(),
            InputSourceKind::Keyboard => keys.as_deref().map_or_else(InputFrame::default, |held| {
                KeyboardSampler::new(held, &bindings).sample()
            }),
        };
    }
}

type DriveRow<'w> = (
    &'w EntityHandle,
    &'w InputState,
    &'w InputSourceKind,
    &'w mut Firing,
    &'w mut Motion,
    &'w mut Facing,
    &'w mut Transform,
    &'w mut CameraState,
);

/// Applies the sampled frame to every owned avatar.
///
/// Order within the tick: firing policy, movement from the current camera
/// yaw, transform integration, then the camera orbit update.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn drive_authority_system(
    settings: Res<AvatarSettings>,
    time: Res<Time>,
    session: Res<Session>,
    mut avatars: Query<DriveRow<'_>>,
) {
    let dt = settings.tick_seconds(time.delta_secs());
    let simulator = MovementSimulator::from_settings(&settings);
    let connected = session.is_connected();
    for (handle, input, source, mut firing, mut motion, mut facing, mut transform, mut camera) in
        &mut avatars
    {
        if SimulationGate::for_role(handle.role, connected) != SimulationGate::Simulate {
            continue;
        }
        let frame = &input.frame;

        let sequence = process_fire_edge(source.fire_policy(), firing.0, frame);
        if !sequence.states().is_empty() {
            debug!("avatar {} firing states {:?}", handle.id, sequence.states());
            firing.0 = sequence.settle(firing.0);
        }

        let result = simulator.step(frame, camera.yaw, motion.velocity, *facing);
        motion.velocity = result.velocity;
        *facing = result.facing;
        transform.translation += result.velocity * dt;
        transform.rotation = facing.to_quat();

        *camera = advance_camera(*camera, frame, &settings);
    }
}

/// Leaves the session when an owned avatar's health is depleted.
///
/// Each avatar is handled only once. The session is left at most once per
/// process, however many owned avatars die and on whichever ticks.
pub fn enforce_health_system(
    mut commands: Commands,
    mut session: ResMut<Session>,
    avatars: Query<(Entity, &EntityHandle, &Health), Without<LeaveRequested>>,
) {
    for (entity, handle, health) in &avatars {
        if !handle.role.is_authority() || !health.is_depleted() {
            continue;
        }
        if !session.has_left() {
            info!("avatar {} health depleted ({}), leaving session", handle.id, health.0);
            session.leave_session();
        }
        commands.entity(entity).insert(LeaveRequested);
        commands.trigger(HealthDepleted {
            entity: handle.id,
            health: health.0,
        });
    }
}

/// Shows or hides hazard beams to follow the firing flag.
pub fn sync_hazard_visual_system(mut avatars: Query<(&Firing, &mut HazardVisual)>) {
    for (firing, mut visual) in &mut avatars {
        if visual.active != firing.0 {
            visual.active = firing.0;
        }
    }
}
