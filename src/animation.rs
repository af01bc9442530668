//! Locomotion signals for animation blending.
//!
//! The core produces a `speed`/`direction` pair and jump pulses; playback is
//! left to the renderer. Avatars spawned without an [`AnimationRig`] still
//! receive a [`Locomotion`] signal and simply show no animation feedback.

use bevy::prelude::*;

use crate::components::EntityHandle;
use crate::input::{InputFrame, InputState};
use crate::settings::{AvatarSettings, SpeedMetric};

/// Speed and direction signal produced each tick for owned avatars.
#[derive(Component, Reflect, Debug, Clone, Copy, Default, PartialEq)]
pub struct Locomotion {
    /// Stick magnitude measure, see [`SpeedMetric`].
    pub speed: f32,
    /// Damped horizontal stick value.
    pub direction: f32,
}

/// Animation parameters consumed by the renderer.
#[derive(Component, Reflect, Debug, Clone, Copy, Default, PartialEq)]
pub struct AnimationRig {
    /// Last speed written.
    pub speed: f32,
    /// Last direction written.
    pub direction: f32,
    /// Number of jump triggers fired since spawn.
    pub jump_triggers: u32,
}

/// Computes the speed signal for a frame.
#[must_use]
pub fn locomotion_speed(frame: &InputFrame, metric: SpeedMetric) -> f32 {
    let forward = match metric {
        SpeedMetric::Squared => frame.move_z,
        SpeedMetric::ForwardClamped => frame.move_z.max(0.0),
    };
    frame.move_x * frame.move_x + forward * forward
}

/// Moves `current` toward `target` with time constant `damp_time`.
///
/// A non-positive time constant snaps straight to the target.
///
/// # Examples
/// ```
/// use beamline::animation::damp;
/// assert_eq!(damp(0.0, 1.0, 0.0, 0.016), 1.0);
/// let halfway = damp(0.0, 1.0, 0.25, 0.25);
/// assert!(halfway > 0.6 && halfway < 0.65);
/// ```
#[must_use]
pub fn damp(current: f32, target: f32, damp_time: f32, dt: f32) -> f32 {
    if damp_time <= 0.0 {
        return target;
    }
    let blend = 1.0 - (-dt.max(0.0) / damp_time).exp();
    current + (target - current) * blend
}

/// Updates the locomotion signal and rig of every owned avatar.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn animation_system(
    settings: Res<AvatarSettings>,
    time: Res<Time>,
    mut avatars: Query<(
        &EntityHandle,
        &InputState,
        &mut Locomotion,
        Option<&mut AnimationRig>,
    )>,
) {
    let dt = settings.tick_seconds(time.delta_secs());
    for (handle, input, mut locomotion, rig_slot) in &mut avatars {
        if !handle.role.is_authority() {
            continue;
        }
        let frame = &input.frame;
        locomotion.speed = locomotion_speed(frame, settings.speed_metric);
        locomotion.direction = damp(
            locomotion.direction,
            frame.move_x,
            settings.direction_damp_time,
            dt,
        );
        let Some(mut rig) = rig_slot else {
            continue;
        };
        rig.speed = locomotion.speed;
        rig.direction = locomotion.direction;
        if frame.jump_pressed {
            rig.jump_triggers = rig.jump_triggers.saturating_add(1);
        }
    }
}
