//! Systems moving replicated state between avatars and the packet queues.

use bevy::prelude::*;
use hashbrown::{HashMap, HashSet};
use log::{debug, error};

use crate::components::{DisplayName, EntityHandle, Facing, Firing, Health, NetId};
use crate::fault::{AvatarFault, FaultContext};
use crate::settings::AvatarSettings;
use crate::vector_math::wrap_degrees;

use super::{
    Packet, PacketKind, ReplicatedState, ReplicationChannel, ReplicationError, ReplicationInbox,
    ReplicationOutbox, TransformState,
};

/// Marks an observed avatar whose stream desynchronised.
///
/// Marked avatars ignore every later packet for the rest of the session.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Desynced;

/// Last transform received for an observed avatar.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct RemoteTransform(pub TransformState);

type PublishRow<'w> = (
    &'w EntityHandle,
    &'w Firing,
    &'w Health,
    &'w DisplayName,
    &'w Transform,
    &'w Facing,
);

type ReceiveRow<'w> = (
    Entity,
    &'w EntityHandle,
    &'w mut Firing,
    &'w mut Health,
    &'w mut DisplayName,
    Option<&'w mut RemoteTransform>,
);

fn encode_packets(
    channel: &ReplicationChannel,
    id: NetId,
    state: &ReplicatedState,
    transform: &TransformState,
) -> Result<[Packet; 2], ReplicationError> {
    let state_payload = channel.serialize(state)?;
    let transform_payload = channel.serialize_transform(transform)?;
    Ok([
        Packet::state(id, state_payload),
        Packet::transform(id, transform_payload),
    ])
}

/// Serializes every owned avatar into the outbox.
///
/// Runs unconditionally each tick: no batching, deltas or acknowledgement.
pub fn publish_replication_system(
    mut commands: Commands,
    mut outbox: ResMut<ReplicationOutbox>,
    avatars: Query<PublishRow<'_>>,
) {
    for (handle, firing, health, name, transform, facing) in &avatars {
        if !handle.role.is_authority() {
            continue;
        }
        let channel = ReplicationChannel::for_handle(handle);
        let state = ReplicatedState::capture(*firing, *health, name);
        let pose = TransformState::capture(transform.translation, *facing);
        match encode_packets(&channel, handle.id, &state, &pose) {
            Ok(packets) => outbox.extend(packets),
            Err(err) => {
                error!("failed to publish avatar {}: {err}", handle.id);
                commands.trigger(AvatarFault::new(
                    handle.id,
                    FaultContext::Encode,
                    err.to_string(),
                ));
            }
        }
    }
}

/// Applies received packets to observed avatars.
///
/// Packets for unknown ids, for owned avatars or for desynchronised avatars
/// are dropped. A packet that fails to decode marks its avatar [`Desynced`]
/// and raises an [`AvatarFault`].
pub fn receive_replication_system(
    mut commands: Commands,
    mut inbox: ResMut<ReplicationInbox>,
    mut avatars: Query<ReceiveRow<'_>, Without<Desynced>>,
) {
    if inbox.is_empty() {
        return;
    }
    let observers: HashMap<NetId, Entity> = avatars
        .iter()
        .filter(|(_, handle, ..)| !handle.role.is_authority())
        .map(|(entity, handle, ..)| (handle.id, entity))
        .collect();
    let mut desynced: HashSet<Entity> = HashSet::new();

    for packet in inbox.drain() {
        let Some(&target) = observers.get(&packet.entity) else {
            debug!("dropping {:?} packet for unobserved avatar {}", packet.kind, packet.entity);
            continue;
        };
        if desynced.contains(&target) {
            continue;
        }
        let Ok((entity, handle, mut firing, mut health, mut name, remote)) =
            avatars.get_mut(target)
        else {
            continue;
        };
        let channel = ReplicationChannel::for_handle(handle);
        let outcome = match packet.kind {
            PacketKind::State => channel
                .deserialize(&packet.payload)
                .map(|state| state.apply(&mut firing, &mut health, &mut name)),
            PacketKind::Transform => {
                channel
                    .deserialize_transform(&packet.payload)
                    .map(|pose| match remote {
                        Some(mut current) => current.0 = pose,
                        None => {
                            commands.entity(entity).insert(RemoteTransform(pose));
                        }
                    })
            }
        };
        if let Err(err) = outcome {
            error!("{err}; ignoring further packets for avatar {}", handle.id);
            desynced.insert(entity);
            commands.entity(entity).insert(Desynced);
            commands.trigger(AvatarFault::new(
                handle.id,
                FaultContext::Desync,
                err.to_string(),
            ));
        }
    }
}

/// Fraction of the remaining distance covered in `dt` seconds at `rate`.
#[must_use]
pub fn catch_up_fraction(rate: f32, dt: f32) -> f32 {
    1.0 - (-rate.max(0.0) * dt.max(0.0)).exp()
}

/// Moves observed avatars toward their last received transform.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn interpolate_observers_system(
    settings: Res<AvatarSettings>,
    time: Res<Time>,
    mut avatars: Query<
        (&EntityHandle, &RemoteTransform, &mut Transform, &mut Facing),
        Without<Desynced>,
    >,
) {
    let dt = settings.tick_seconds(time.delta_secs());
    let fraction = catch_up_fraction(settings.observer_interpolation_rate, dt);
    for (handle, remote, mut transform, mut facing) in &mut avatars {
        if handle.role.is_authority() {
            continue;
        }
        let target = remote.0;
        transform.translation = transform.translation.lerp(target.position(), fraction);
        let turn = wrap_degrees(target.facing_degrees - facing.degrees + 180.0) - 180.0;
        facing.degrees += turn * fraction;
        transform.rotation = facing.to_quat();
    }
}
