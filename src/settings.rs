//! Runtime configuration for avatar simulation and replication.
//!
//! [`AvatarSettings`] is a Bevy resource. Every field has a default drawn from
//! [`crate::constants`], and a JSON file may override any subset of them.

use std::fs;
use std::path::Path;

use bevy::prelude::*;
use serde::Deserialize;
use thiserror::Error;

use crate::constants::{
    CAMERA_LOOK_HEIGHT, CAMERA_OFFSET, CONTACT_ENTER_DAMAGE, CONTACT_STAY_DAMAGE_RATE,
    DIRECTION_DAMP_TIME, HAZARD_CLASS, INPUT_DEADZONE_SQ, MOVE_SPEED,
    OBSERVER_INTERPOLATION_RATE, PITCH_DISTANCE_SPEED, YAW_SPEED,
};
use crate::input::InputSourceKind;

/// How the locomotion `speed` signal is derived from the move stick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedMetric {
    /// `moveX² + moveZ²`.
    #[default]
    Squared,
    /// As [`SpeedMetric::Squared`], but backward stick input counts as zero.
    ForwardClamped,
}

/// Errors raised while loading [`AvatarSettings`].
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("failed to read settings from {path}: {source}")]
    Read {
        /// Path that was requested.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The settings document was not valid JSON for this schema.
    #[error("invalid settings document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tunables for movement, damage, camera framing and replication.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AvatarSettings {
    /// Planar speed at full stick deflection.
    pub move_speed: f32,
    /// Degrees of yaw per tick of full horizontal look input.
    pub yaw_speed: f32,
    /// Camera height gained per tick of full vertical look input.
    pub pitch_distance_speed: f32,
    /// Squared stick magnitude treated as no input.
    pub input_deadzone_sq: f32,
    /// Substring a collider tag must contain to count as a hazard.
    pub hazard_class: String,
    /// Instantaneous deduction on contact enter.
    pub contact_enter_damage: f32,
    /// Deduction per second of sustained contact.
    pub contact_stay_damage_rate: f32,
    /// Camera offset before yaw is applied.
    pub camera_offset: [f32; 3],
    /// Height above the avatar the camera looks at.
    pub camera_look_height: f32,
    /// Smoothing time constant for the direction signal.
    pub direction_damp_time: f32,
    /// Catch-up rate for observer transform interpolation.
    pub observer_interpolation_rate: f32,
    /// Fixed tick length. `None` uses the frame delta from [`Time`].
    pub fixed_delta_seconds: Option<f32>,
    /// Input device driving locally owned avatars.
    pub input_source: InputSourceKind,
    /// Formula for the locomotion speed signal.
    pub speed_metric: SpeedMetric,
}

impl Default for AvatarSettings {
    fn default() -> Self {
        Self {
            move_speed: MOVE_SPEED,
            yaw_speed: YAW_SPEED,
            pitch_distance_speed: PITCH_DISTANCE_SPEED,
            input_deadzone_sq: INPUT_DEADZONE_SQ,
            hazard_class: HAZARD_CLASS.to_owned(),
            contact_enter_damage: CONTACT_ENTER_DAMAGE,
            contact_stay_damage_rate: CONTACT_STAY_DAMAGE_RATE,
            camera_offset: CAMERA_OFFSET,
            camera_look_height: CAMERA_LOOK_HEIGHT,
            direction_damp_time: DIRECTION_DAMP_TIME,
            observer_interpolation_rate: OBSERVER_INTERPOLATION_RATE,
            fixed_delta_seconds: None,
            input_source: InputSourceKind::default(),
            speed_metric: SpeedMetric::default(),
        }
    }
}

impl AvatarSettings {
    /// Parses settings from a JSON document. Missing keys keep their defaults.
    ///
    /// # Errors
    /// Returns [`SettingsError::Parse`] when the document is malformed.
    ///
    /// # Examples
    /// ```
    /// use beamline::settings::AvatarSettings;
    /// let settings = AvatarSettings::from_json_str(r#"{ "move_speed": 7.5 }"#)
    ///     .expect("valid settings");
    /// assert!((settings.move_speed - 7.5).abs() < f32::EPSILON);
    /// assert_eq!(settings.hazard_class, "Beam");
    /// ```
    pub fn from_json_str(document: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(document)?)
    }

    /// Reads and parses a JSON settings file.
    ///
    /// # Errors
    /// Returns [`SettingsError::Read`] if the file cannot be read and
    /// [`SettingsError::Parse`] if its contents are invalid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path_ref = path.as_ref();
        let document = fs::read_to_string(path_ref).map_err(|source| SettingsError::Read {
            path: path_ref.display().to_string(),
            source,
        })?;
        Self::from_json_str(&document)
    }

    /// Returns the tick length, preferring the fixed delta when configured.
    #[must_use]
    pub fn tick_seconds(&self, frame_delta: f32) -> f32 {
        self.fixed_delta_seconds.unwrap_or(frame_delta)
    }

    /// Camera offset as a vector.
    #[must_use]
    pub const fn camera_offset_vec(&self) -> Vec3 {
        let [x, y, z] = self.camera_offset;
        Vec3::new(x, y, z)
    }
}
