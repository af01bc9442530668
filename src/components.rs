//! ECS component types used by the avatar systems.
//! Includes the ownership handle, replicated fields, and owner-local motion
//! and camera state.
use std::fmt;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constants::MAX_HEALTH;

/// Session-wide avatar identifier assigned at spawn.
#[derive(
    Component, Reflect, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct NetId(pub u64);

impl fmt::Display for NetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which side of the replication channel this process is for an avatar.
///
/// Chosen once at spawn and never changed while the avatar lives.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Simulates the avatar and serializes its state out.
    Authority,
    /// Applies received state and never simulates locally.
    Observer,
}

impl Role {
    /// Maps the session's ownership answer onto a role.
    #[must_use]
    pub const fn from_ownership(is_owner: bool) -> Self {
        if is_owner {
            Self::Authority
        } else {
            Self::Observer
        }
    }

    /// Returns `true` for [`Role::Authority`].
    #[must_use]
    pub const fn is_authority(self) -> bool {
        matches!(self, Self::Authority)
    }
}

/// Identity and ownership of an avatar, threaded through every system in
/// place of a process-wide "local player" lookup.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityHandle {
    /// Session identifier.
    pub id: NetId,
    /// Fixed role for the avatar's lifetime.
    pub role: Role,
}

impl EntityHandle {
    /// Creates a handle.
    #[must_use]
    pub const fn new(id: NetId, role: Role) -> Self {
        Self { id, role }
    }
}

/// Remaining health. Meaningful while `> 0`; may go arbitrarily negative.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq)]
pub struct Health(pub f32);

impl Health {
    /// Returns `true` once health has reached the death threshold.
    #[must_use]
    pub fn is_depleted(self) -> bool {
        self.0 <= crate::constants::DEATH_THRESHOLD
    }
}

impl Default for Health {
    fn default() -> Self {
        Self(MAX_HEALTH)
    }
}

/// Whether the avatar is currently firing its hazard beams.
#[derive(Component, Reflect, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Firing(pub bool);

/// Name shown above the avatar; fixed at spawn.
#[derive(Component, Reflect, Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayName(pub String);

/// Heading in degrees about the world up axis.
#[derive(Component, Reflect, Debug, Clone, Copy, Default, PartialEq)]
pub struct Facing {
    /// Yaw in degrees; not wrapped.
    pub degrees: f32,
}

impl Facing {
    /// Creates a heading from degrees.
    #[must_use]
    pub const fn from_degrees(degrees: f32) -> Self {
        Self { degrees }
    }

    /// Rotation equivalent of this heading.
    #[must_use]
    pub fn to_quat(self) -> Quat {
        crate::vector_math::yaw_rotation(self.degrees)
    }
}

/// Current avatar velocity. The vertical component belongs to gravity and
/// jumping and is never touched by stick input.
#[derive(Component, Reflect, Debug, Clone, Copy, Default, PartialEq)]
pub struct Motion {
    /// World-space velocity in units per second.
    pub velocity: Vec3,
}

/// Owner-local camera orbit state. Never replicated.
#[derive(Component, Reflect, Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraState {
    /// Accumulated yaw in degrees.
    pub yaw: f32,
    /// Accumulated camera height offset.
    pub pitch_distance: f32,
}

/// Beam effect toggled to follow [`Firing`].
#[derive(Component, Reflect, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HazardVisual {
    /// Whether the beams are currently shown.
    pub active: bool,
}

/// Tag carried by colliders that may hurt avatars.
#[derive(Component, Reflect, Debug, Clone, Default, PartialEq, Eq)]
pub struct HazardTag(pub String);

impl HazardTag {
    /// Creates a tag.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Returns `true` when the tag belongs to `class`.
    ///
    /// Matching is by substring, so `"Beam (left)"` belongs to `"Beam"`.
    #[must_use]
    pub fn matches(&self, class: &str) -> bool {
        self.0.contains(class)
    }
}

/// Marker added once an authority has asked the session to leave.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct LeaveRequested;
