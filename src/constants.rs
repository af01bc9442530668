//! Avatar tuning constants shared across systems.
//!
//! These are the defaults behind [`crate::settings::AvatarSettings`]; a
//! settings file may override any of them at startup.

/// Planar speed of the avatar at full stick deflection.
pub const MOVE_SPEED: f32 = 5.0;
/// Degrees of camera yaw per tick of full horizontal look input.
pub const YAW_SPEED: f32 = 2.0;
/// Units of camera height gained per tick of full vertical look input.
pub const PITCH_DISTANCE_SPEED: f32 = 0.1;
/// Squared planar stick magnitude at or below which movement is suppressed.
pub const INPUT_DEADZONE_SQ: f32 = 0.01;
/// Offset in degrees that places the camera behind the avatar.
pub const BEHIND_CAMERA_DEGREES: f32 = 180.0;
/// Health assigned at spawn.
pub const MAX_HEALTH: f32 = 1.0;
/// Health at or below which the owning process leaves the session.
pub const DEATH_THRESHOLD: f32 = 0.0;
/// Health lost once when a hazard contact begins.
pub const CONTACT_ENTER_DAMAGE: f32 = 0.1;
/// Health lost per second of sustained hazard contact.
pub const CONTACT_STAY_DAMAGE_RATE: f32 = 0.1;
/// Substring identifying hazard colliders.
pub const HAZARD_CLASS: &str = "Beam";
/// Camera offset from the avatar before yaw is applied.
pub const CAMERA_OFFSET: [f32; 3] = [0.0, 3.0, 4.0];
/// Height above the avatar origin that the camera looks at.
pub const CAMERA_LOOK_HEIGHT: f32 = 2.0;
/// Time constant in seconds for smoothing the animation direction.
pub const DIRECTION_DAMP_TIME: f32 = 0.25;
/// Rate (per second) at which observers close the gap to the last received
/// transform.
pub const OBSERVER_INTERPOLATION_RATE: f32 = 10.0;
