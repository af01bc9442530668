//! Library crate providing ownership-gated avatar simulation and replication.
//!
//! Each avatar is simulated by exactly one process, its authority, which
//! streams a fixed-order state tuple to every observer. Observers apply what
//! they receive and never simulate locally. [`AvatarPlugin`] wires the whole
//! tick into a Bevy app; the algorithms underneath are plain types usable on
//! their own.
pub mod animation;
pub mod camera;
pub mod components;
pub mod constants;
pub mod controller;
pub mod damage;
pub mod fault;
pub mod input;
pub mod lifecycle;
pub mod logging;
pub mod movement;
pub mod plugin;
pub mod replication;
pub mod session;
pub mod settings;
pub mod vector_math;
pub use constants::*;

// Re-export commonly used items
pub use components::{DisplayName, EntityHandle, Firing, Health, NetId, Role};
pub use controller::{spawn_avatar, AvatarRequest, HealthDepleted};
pub use damage::{ContactEvent, ContactInbox, DamageAccumulator};
pub use fault::{AvatarFault, FaultContext};
pub use logging::init as init_logging;
pub use movement::{MovementResult, MovementSimulator};
pub use plugin::{AvatarPlugin, AvatarSet};
pub use replication::{ReplicatedState, ReplicationChannel, ReplicationError};
pub use session::{LoopbackSession, Session, SessionLink};
pub use settings::AvatarSettings;
pub use vector_math::{signed_angle, vec_normalize};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use beamline::prelude::*;
    //! ```

    pub use crate::components::{EntityHandle, Facing, Firing, Health, NetId, Role};
    pub use crate::controller::{spawn_avatar, AvatarRequest};
    pub use crate::damage::{ContactEvent, ContactInbox};
    pub use crate::input::TouchControls;
    pub use crate::replication::{ReplicationInbox, ReplicationOutbox};
    pub use crate::session::{LoopbackSession, Session};
    pub use crate::AvatarPlugin;
    pub use crate::AvatarSettings;
}
