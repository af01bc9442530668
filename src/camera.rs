//! Third-person camera rig following the locally owned avatar.
//!
//! The rig is a pure consumer of avatar state: it reads the owner's position
//! and [`CameraState`] and writes only the camera entity's transform. Nothing
//! here feeds back into gameplay or replication.

use bevy::prelude::*;

use crate::components::{CameraState, EntityHandle};
use crate::settings::AvatarSettings;
use crate::vector_math::{yaw_rotation, UP};

/// Marker component for the avatar camera.
///
/// Exactly one such entity is expected; the plugin spawns it at startup when
/// none exists. Renderers attach their camera to this entity's transform.
#[derive(Component, Reflect, Default, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Component, Default)]
pub struct CameraController;

/// Orbit framing derived from avatar position and accumulated offsets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    offset: Vec3,
    look_height: f32,
}

impl CameraRig {
    /// Creates a rig with an explicit offset and look height.
    #[must_use]
    pub const fn new(offset: Vec3, look_height: f32) -> Self {
        Self {
            offset,
            look_height,
        }
    }

    /// Creates a rig from the configured framing.
    #[must_use]
    pub const fn from_settings(settings: &AvatarSettings) -> Self {
        Self::new(settings.camera_offset_vec(), settings.camera_look_height)
    }

    /// World-space camera position for an avatar at `position`.
    ///
    /// # Examples
    /// ```
    /// use beamline::camera::CameraRig;
    /// use beamline::components::CameraState;
    /// use glam::Vec3;
    ///
    /// let rig = CameraRig::new(Vec3::new(0.0, 3.0, 4.0), 2.0);
    /// let eye = rig.eye(Vec3::ZERO, CameraState::default());
    /// assert!((eye - Vec3::new(0.0, 3.0, 4.0)).length() < 1e-6);
    /// ```
    #[must_use]
    pub fn eye(&self, position: Vec3, state: CameraState) -> Vec3 {
        let offset = self.offset + Vec3::new(0.0, state.pitch_distance, 0.0);
        position + yaw_rotation(state.yaw) * offset
    }

    /// Point the camera aims at.
    #[must_use]
    pub fn focus(&self, position: Vec3) -> Vec3 {
        position + UP * self.look_height
    }

    /// Camera transform framing an avatar at `position`.
    #[must_use]
    pub fn frame(&self, position: Vec3, state: CameraState) -> Transform {
        Transform::from_translation(self.eye(position, state)).looking_at(self.focus(position), UP)
    }
}

/// Moves the camera to frame the locally owned avatar.
///
/// Observers never drive the camera. If no owned avatar exists the camera is
/// left where it is.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn camera_follow_system(
    settings: Res<AvatarSettings>,
    avatars: Query<(&EntityHandle, &Transform, &CameraState), Without<CameraController>>,
    mut camera_query: Query<&mut Transform, With<CameraController>>,
) {
    let Ok(mut camera) = camera_query.single_mut() else {
        return;
    };
    let Some((_, transform, state)) = avatars
        .iter()
        .find(|(handle, _, _)| handle.role.is_authority())
    else {
        return;
    };
    *camera = CameraRig::from_settings(&settings).frame(transform.translation, *state);
}

/// Spawns the camera rig entity at startup if none exists.
pub fn camera_setup(mut commands: Commands, cameras: Query<(), With<CameraController>>) {
    if cameras.is_empty() {
        commands.spawn((Transform::default(), CameraController, Name::new("AvatarCamera")));
    }
}
