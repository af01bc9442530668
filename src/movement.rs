//! Stick-driven planar movement relative to the camera.
//!
//! Movement is a pure function of the sampled frame, the camera yaw and the
//! previous tick's motion. The camera sits behind the avatar, so every
//! heading is offset by [`BEHIND_CAMERA_DEGREES`].

use bevy::prelude::*;

use crate::components::{CameraState, Facing};
use crate::constants::BEHIND_CAMERA_DEGREES;
use crate::input::InputFrame;
use crate::settings::AvatarSettings;
use crate::vector_math::{rotate_around_up, signed_angle, vec_normalize, FORWARD, UP};

/// Velocity and heading produced for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementResult {
    /// New velocity; the vertical component is carried over unchanged.
    pub velocity: Vec3,
    /// New heading.
    pub facing: Facing,
}

/// Converts stick input into velocity and facing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementSimulator {
    move_speed: f32,
    deadzone_sq: f32,
}

impl MovementSimulator {
    /// Creates a simulator.
    #[must_use]
    pub const fn new(move_speed: f32, deadzone_sq: f32) -> Self {
        Self {
            move_speed,
            deadzone_sq,
        }
    }

    /// Creates a simulator from the configured speed and deadzone.
    #[must_use]
    pub const fn from_settings(settings: &AvatarSettings) -> Self {
        Self::new(settings.move_speed, settings.input_deadzone_sq)
    }

    /// Advances movement by one tick.
    ///
    /// Inputs whose squared planar magnitude is at or below the deadzone
    /// zero the planar velocity and keep the previous heading, so resting
    /// thumbs do not drift the avatar.
    ///
    /// # Examples
    /// ```
    /// use beamline::components::Facing;
    /// use beamline::input::InputFrame;
    /// use beamline::movement::MovementSimulator;
    /// use glam::Vec3;
    ///
    /// let sim = MovementSimulator::new(5.0, 0.01);
    /// let frame = InputFrame { move_z: 1.0, ..InputFrame::default() };
    /// let result = sim.step(&frame, 0.0, Vec3::ZERO, Facing::default());
    /// // Camera yaw 0 looks down -Z, so forward on the stick moves along -Z.
    /// assert!((result.velocity.z + 5.0).abs() < 1e-5);
    /// assert!((result.facing.degrees - 180.0).abs() < 1e-5);
    /// ```
    #[must_use]
    pub fn step(
        &self,
        frame: &InputFrame,
        camera_yaw: f32,
        previous_velocity: Vec3,
        previous_facing: Facing,
    ) -> MovementResult {
        let input = frame.planar();
        if input.length_squared() <= self.deadzone_sq {
            return MovementResult {
                velocity: Vec3::new(0.0, previous_velocity.y, 0.0),
                facing: previous_facing,
            };
        }

        let heading = camera_yaw + BEHIND_CAMERA_DEGREES;
        let planar = rotate_around_up(heading, input) * self.move_speed;
        let turn = signed_angle(FORWARD, vec_normalize(input), UP);
        MovementResult {
            velocity: Vec3::new(planar.x, previous_velocity.y, planar.z),
            facing: Facing::from_degrees(heading + turn),
        }
    }
}

/// Applies look input to the owner-local camera orbit.
///
/// Yaw advances by `look_x * yaw_speed` and the camera height offset by
/// `look_y * pitch_distance_speed`.
#[must_use]
pub fn advance_camera(
    state: CameraState,
    frame: &InputFrame,
    settings: &AvatarSettings,
) -> CameraState {
    CameraState {
        yaw: state.yaw + frame.look_x * settings.yaw_speed,
        pitch_distance: state.pitch_distance + frame.look_y * settings.pitch_distance_speed,
    }
}
