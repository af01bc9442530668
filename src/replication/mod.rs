//! Ownership-gated state replication.
//!
//! Each avatar has one authority, which serializes its state every tick, and
//! any number of observers, which overwrite their local copy with whatever
//! they receive. The wire tuple is [`ReplicatedState`]: its field order is
//! the protocol, fixed at compile time by the struct definition and shared by
//! both directions. There is no header, no version and no delta encoding, so
//! any change to the struct requires redeploying every peer at once.
//!
//! Avatar transforms travel separately as [`TransformState`] packets so the
//! three-field state tuple stays exactly as peers expect it.

mod systems;
mod transport;

pub use systems::{
    interpolate_observers_system, publish_replication_system, receive_replication_system,
    Desynced, RemoteTransform,
};
pub use transport::{Packet, PacketKind, ReplicationInbox, ReplicationOutbox};

use bincode::Options;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

use crate::components::{DisplayName, Facing, Firing, Health, NetId, Role};

/// The replicated state tuple, in wire order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicatedState {
    /// Firing flag.
    pub is_firing: bool,
    /// Health as a 32-bit float, sent verbatim.
    pub health: f32,
    /// UTF-8 display name.
    pub display_name: String,
}

impl ReplicatedState {
    /// Captures the replicated fields of an avatar.
    #[must_use]
    pub fn capture(firing: Firing, health: Health, name: &DisplayName) -> Self {
        Self {
            is_firing: firing.0,
            health: health.0,
            display_name: name.0.clone(),
        }
    }

    /// Overwrites an avatar's replicated fields, in wire order.
    pub fn apply(self, firing: &mut Firing, health: &mut Health, name: &mut DisplayName) {
        firing.0 = self.is_firing;
        health.0 = self.health;
        name.0 = self.display_name;
    }
}

/// Authority transform sent alongside the state tuple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformState {
    /// World-space position.
    pub position: [f32; 3],
    /// Heading in degrees about the up axis.
    pub facing_degrees: f32,
}

impl TransformState {
    /// Captures a transform from position and heading.
    #[must_use]
    pub const fn capture(position: glam::Vec3, facing: Facing) -> Self {
        Self {
            position: [position.x, position.y, position.z],
            facing_degrees: facing.degrees,
        }
    }

    /// Position as a vector.
    #[must_use]
    pub const fn position(&self) -> glam::Vec3 {
        let [x, y, z] = self.position;
        glam::Vec3::new(x, y, z)
    }
}

/// Why a received payload could not be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DesyncReason {
    /// The payload ended before every field was read.
    ShortRead,
    /// A field did not decode as its expected type, or bytes were left over.
    TypeMismatch(String),
}

impl std::fmt::Display for DesyncReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ShortRead => f.write_str("short read"),
            Self::TypeMismatch(detail) => write!(f, "type mismatch: {detail}"),
        }
    }
}

/// Errors raised by [`ReplicationChannel`].
#[derive(Debug, Error)]
pub enum ReplicationError {
    /// The channel was used in the direction its role forbids.
    #[error("{role:?} channel for {entity} cannot {operation}")]
    RoleMismatch {
        /// Avatar the channel belongs to.
        entity: NetId,
        /// The channel's role.
        role: Role,
        /// Attempted direction.
        operation: &'static str,
    },
    /// The outgoing state could not be encoded.
    #[error("failed to encode state for {entity}: {source}")]
    Encode {
        /// Avatar being serialized.
        entity: NetId,
        /// Codec failure.
        #[source]
        source: bincode::Error,
    },
    /// The incoming stream no longer matches the expected tuple.
    #[error("replication stream for {entity} desynchronised: {reason}")]
    Desync {
        /// Avatar being deserialized.
        entity: NetId,
        /// What went wrong.
        reason: DesyncReason,
    },
}

fn codec() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
        .reject_trailing_bytes()
}

fn classify(error: &bincode::ErrorKind) -> DesyncReason {
    match error {
        bincode::ErrorKind::Io(io) if io.kind() == std::io::ErrorKind::UnexpectedEof => {
            DesyncReason::ShortRead
        }
        other => DesyncReason::TypeMismatch(other.to_string()),
    }
}

/// Role-bound serializer for one avatar.
///
/// The role is fixed when the channel is built from the avatar's handle; an
/// authority channel only serializes and an observer channel only
/// deserializes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplicationChannel {
    entity: NetId,
    role: Role,
}

impl ReplicationChannel {
    /// Creates a channel for the avatar `entity` with `role`.
    #[must_use]
    pub const fn new(entity: NetId, role: Role) -> Self {
        Self { entity, role }
    }

    /// Creates the channel matching an avatar handle.
    #[must_use]
    pub const fn for_handle(handle: &crate::components::EntityHandle) -> Self {
        Self::new(handle.id, handle.role)
    }

    /// Encodes the state tuple.
    ///
    /// # Errors
    /// [`ReplicationError::RoleMismatch`] on an observer channel and
    /// [`ReplicationError::Encode`] if encoding fails.
    ///
    /// # Examples
    /// ```
    /// use beamline::components::{NetId, Role};
    /// use beamline::replication::{ReplicatedState, ReplicationChannel};
    ///
    /// let state = ReplicatedState { is_firing: true, health: 0.42, display_name: "X".into() };
    /// let bytes = ReplicationChannel::new(NetId(1), Role::Authority)
    ///     .serialize(&state)
    ///     .expect("authority can serialize");
    /// let decoded = ReplicationChannel::new(NetId(1), Role::Observer)
    ///     .deserialize(&bytes)
    ///     .expect("observer can deserialize");
    /// assert_eq!(decoded, state);
    /// ```
    pub fn serialize(&self, state: &ReplicatedState) -> Result<Vec<u8>, ReplicationError> {
        self.encode(state, Role::Authority, "serialize")
    }

    /// Decodes the state tuple.
    ///
    /// # Errors
    /// [`ReplicationError::RoleMismatch`] on an authority channel and
    /// [`ReplicationError::Desync`] if the payload is short or malformed.
    pub fn deserialize(&self, payload: &[u8]) -> Result<ReplicatedState, ReplicationError> {
        self.decode(payload, Role::Observer, "deserialize")
    }

    /// Encodes the transform side channel.
    ///
    /// # Errors
    /// As for [`ReplicationChannel::serialize`].
    pub fn serialize_transform(&self, state: &TransformState) -> Result<Vec<u8>, ReplicationError> {
        self.encode(state, Role::Authority, "serialize transforms")
    }

    /// Decodes the transform side channel.
    ///
    /// # Errors
    /// As for [`ReplicationChannel::deserialize`].
    pub fn deserialize_transform(&self, payload: &[u8]) -> Result<TransformState, ReplicationError> {
        self.decode(payload, Role::Observer, "deserialize transforms")
    }

    fn require(&self, role: Role, operation: &'static str) -> Result<(), ReplicationError> {
        if self.role == role {
            Ok(())
        } else {
            Err(ReplicationError::RoleMismatch {
                entity: self.entity,
                role: self.role,
                operation,
            })
        }
    }

    fn encode<T: Serialize>(
        &self,
        value: &T,
        role: Role,
        operation: &'static str,
    ) -> Result<Vec<u8>, ReplicationError> {
        self.require(role, operation)?;
        codec()
            .serialize(value)
            .map_err(|source| ReplicationError::Encode {
                entity: self.entity,
                source,
            })
    }

    fn decode<T: DeserializeOwned>(
        &self,
        payload: &[u8],
        role: Role,
        operation: &'static str,
    ) -> Result<T, ReplicationError> {
        self.require(role, operation)?;
        codec()
            .deserialize(payload)
            .map_err(|error| ReplicationError::Desync {
                entity: self.entity,
                reason: classify(&error),
            })
    }
}
