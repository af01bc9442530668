//! Error events surfaced to the session layer.

use bevy::prelude::*;
use thiserror::Error;

use crate::components::NetId;

/// Where an [`AvatarFault`] originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultContext {
    /// A required part was missing at spawn; the avatar runs degraded.
    Configuration,
    /// The outgoing state could not be encoded this tick.
    Encode,
    /// The incoming stream desynchronised; the observer view is frozen.
    Desync,
}

/// Event raised whenever an avatar hits an error path.
///
/// The plugin logs every fault. Session layers may add their own observers,
/// for instance to drop a peer whose stream desynchronised.
#[derive(Event, Debug, Clone, PartialEq, Eq, Error)]
#[error("{context:?} fault on {entity}: {detail}")]
pub struct AvatarFault {
    /// Avatar the fault concerns.
    pub entity: NetId,
    /// Where the fault occurred.
    pub context: FaultContext,
    /// Description of the underlying error.
    pub detail: String,
}

impl AvatarFault {
    /// Convenience constructor used by systems to emit fault events.
    #[must_use]
    pub fn new(entity: NetId, context: FaultContext, detail: impl Into<String>) -> Self {
        Self {
            entity,
            context,
            detail: detail.into(),
        }
    }
}
