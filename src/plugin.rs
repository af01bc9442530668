//! Bevy plugin wiring avatar systems into the schedule.

use bevy::ecs::prelude::On;
use bevy::prelude::*;
use log::{error, info};

use crate::animation::animation_system;
use crate::camera::{camera_follow_system, camera_setup};
use crate::controller::{
    drive_authority_system, enforce_health_system, sample_input_system,
    sync_hazard_visual_system, HealthDepleted,
};
use crate::damage::{apply_contacts_system, ContactInbox};
use crate::fault::AvatarFault;
use crate::input::{KeyBindings, TouchControls};
use crate::lifecycle::{handle_scene_event, LifecycleHub};
use crate::replication::{
    interpolate_observers_system, publish_replication_system, receive_replication_system,
    ReplicationInbox, ReplicationOutbox,
};
use crate::session::Session;
use crate::settings::AvatarSettings;

/// Ordered stages of one avatar tick.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AvatarSet {
    /// Apply packets received from peers.
    Receive,
    /// Owned-avatar input, movement, damage and death.
    Simulate,
    /// Camera, animation signals, beams and observer smoothing.
    Present,
    /// Serialize owned avatars for peers.
    Publish,
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
fn log_avatar_fault(event: On<AvatarFault>) {
    let AvatarFault {
        entity,
        context,
        detail,
    } = event.event();
    error!("avatar {entity} fault during {context:?}: {detail}");
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
fn log_health_depleted(event: On<HealthDepleted>) {
    let HealthDepleted { entity, health } = event.event();
    info!("avatar {entity} died with health {health}");
}

/// Bevy plugin installing avatar simulation and replication.
///
/// Resources already present in the app, such as a custom [`Session`] or
/// [`AvatarSettings`], are left untouched.
#[derive(Default)]
pub struct AvatarPlugin;

impl Plugin for AvatarPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AvatarSettings>()
            .init_resource::<Session>()
            .init_resource::<LifecycleHub>()
            .init_resource::<ContactInbox>()
            .init_resource::<ReplicationInbox>()
            .init_resource::<ReplicationOutbox>()
            .init_resource::<TouchControls>()
            .init_resource::<KeyBindings>();

        app.add_observer(log_avatar_fault)
            .add_observer(log_health_depleted)
            .add_observer(handle_scene_event);

        app.configure_sets(
            Update,
            (
                AvatarSet::Receive,
                AvatarSet::Simulate,
                AvatarSet::Present,
                AvatarSet::Publish,
            )
                .chain(),
        );

        app.add_systems(Startup, camera_setup);
        app.add_systems(
            Update,
            (
                receive_replication_system.in_set(AvatarSet::Receive),
                (
                    sample_input_system,
                    drive_authority_system,
                    apply_contacts_system,
                    enforce_health_system,
                )
                    .chain()
                    .in_set(AvatarSet::Simulate),
                (
                    interpolate_observers_system,
                    sync_hazard_visual_system,
                    animation_system,
                    camera_follow_system,
                )
                    .chain()
                    .in_set(AvatarSet::Present),
                publish_replication_system.in_set(AvatarSet::Publish),
            ),
        );
    }
}
