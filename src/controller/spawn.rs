//! Avatar spawning.
//!
//! Ownership is decided here, once, by asking the session. The resulting
//! [`EntityHandle`] is attached to the avatar and is the only place any
//! system learns whether it owns that avatar.

use bevy::prelude::*;
use log::{error, info};

use crate::animation::{AnimationRig, Locomotion};
use crate::components::{
    CameraState, DisplayName, EntityHandle, Facing, Firing, HazardVisual, Health, Motion, NetId,
    Role,
};
use crate::fault::{AvatarFault, FaultContext};
use crate::input::InputState;
use crate::lifecycle::LifecycleHub;
use crate::replication::{RemoteTransform, TransformState};
use crate::session::Session;
use crate::settings::AvatarSettings;

/// Parameters for [`spawn_avatar`].
#[derive(Debug, Clone, PartialEq)]
pub struct AvatarRequest {
    /// Session-wide identifier.
    pub id: NetId,
    /// Name shown above the avatar.
    pub display_name: String,
    /// Initial position.
    pub position: Vec3,
    /// Initial heading.
    pub facing: Facing,
    /// Attach an animation rig.
    pub with_rig: bool,
    /// Attach a hazard beam visual.
    pub with_hazard_visual: bool,
}

impl AvatarRequest {
    /// A fully equipped avatar at the origin.
    #[must_use]
    pub fn new(id: NetId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            position: Vec3::ZERO,
            facing: Facing::default(),
            with_rig: true,
            with_hazard_visual: true,
        }
    }

    /// Sets the initial position.
    #[must_use]
    pub const fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Spawns without an animation rig.
    #[must_use]
    pub const fn without_rig(mut self) -> Self {
        self.with_rig = false;
        self
    }

    /// Spawns without a hazard beam visual.
    #[must_use]
    pub const fn without_hazard_visual(mut self) -> Self {
        self.with_hazard_visual = false;
        self
    }
}

fn report_missing(world: &mut World, id: NetId, part: &str, consequence: &str) {
    error!("avatar {id} has no {part}; {consequence}");
    world.trigger(AvatarFault::new(
        id,
        FaultContext::Configuration,
        format!("missing {part}"),
    ));
}

/// Spawns an avatar and returns its entity.
///
/// The session is asked whether this process owns `request.id`; the answer
/// fixes the avatar's [`Role`] for its lifetime. Missing optional parts are
/// reported once as configuration faults and the avatar runs without them.
pub fn spawn_avatar(world: &mut World, request: AvatarRequest) -> Entity {
    let AvatarRequest {
        id,
        display_name,
        position,
        facing,
        with_rig,
        with_hazard_visual,
    } = request;
    let is_owner = world.get_resource_or_init::<Session>().spawn_entity(id);
    let role = Role::from_ownership(is_owner);
    let source = world.get_resource_or_init::<AvatarSettings>().input_source;
    info!("spawning avatar {id} ({display_name:?}) as {role:?}");

    let entity = world
        .spawn((
            Name::new(format!("Avatar {id}")),
            EntityHandle::new(id, role),
            Health::default(),
            Firing(false),
            DisplayName(display_name),
            facing,
            Motion::default(),
            Transform::from_translation(position).with_rotation(facing.to_quat()),
            source,
            InputState::default(),
            CameraState::default(),
            Locomotion::default(),
        ))
        .id();

    if role == Role::Observer {
        let pose = TransformState::capture(position, facing);
        world.entity_mut(entity).insert(RemoteTransform(pose));
    }
    if with_rig {
        world.entity_mut(entity).insert(AnimationRig::default());
    } else {
        report_missing(world, id, "animation rig", "moving without animation feedback");
    }
    if with_hazard_visual {
        world.entity_mut(entity).insert(HazardVisual::default());
    } else {
        report_missing(world, id, "hazard visual", "firing will not be shown");
    }

    let subscription = world.get_resource_or_init::<LifecycleHub>().subscribe(entity);
    world.entity_mut(entity).insert(subscription);
    entity
}
