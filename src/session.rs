//! Session collaborator boundary.
//!
//! Room membership, ownership assignment and connection state belong to the
//! session layer. The core reaches it only through [`SessionLink`], held in
//! the [`Session`] resource.

use bevy::prelude::*;
use hashbrown::HashSet;
use log::{debug, info};

use crate::components::NetId;

/// Operations the core needs from the session layer.
///
/// Implementations must grant ownership of an id to exactly one process.
#[cfg_attr(test, mockall::automock)]
pub trait SessionLink: Send + Sync + 'static {
    /// Registers an avatar and reports whether this process owns it.
    fn spawn_entity(&mut self, id: NetId) -> bool;
    /// Leaves the session.
    fn leave_session(&mut self);
    /// Whether the session is connected.
    fn is_session_connected(&self) -> bool;
}

/// Resource holding the active session link.
///
/// The link is asked to leave at most once per process.
#[derive(Resource)]
pub struct Session {
    link: Box<dyn SessionLink>,
    left: bool,
}

impl Session {
    /// Wraps a session link.
    #[must_use]
    pub fn new(link: impl SessionLink) -> Self {
        Self {
            link: Box::new(link),
            left: false,
        }
    }

    /// See [`SessionLink::spawn_entity`].
    pub fn spawn_entity(&mut self, id: NetId) -> bool {
        self.link.spawn_entity(id)
    }

    /// See [`SessionLink::leave_session`]. Calls after the first are ignored.
    pub fn leave_session(&mut self) {
        if self.left {
            debug!("session already left");
            return;
        }
        self.left = true;
        self.link.leave_session();
    }

    /// Whether this process has asked to leave.
    #[must_use]
    pub const fn has_left(&self) -> bool {
        self.left
    }

    /// See [`SessionLink::is_session_connected`].
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.link.is_session_connected()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(LoopbackSession::default())
    }
}

/// In-process session that owns the first claim on every id.
///
/// Later claims on the same id observe it, which models a second peer in
/// the same room.
#[derive(Debug, Default)]
pub struct LoopbackSession {
    claimed: HashSet<NetId>,
    left: bool,
}

impl LoopbackSession {
    /// Whether [`SessionLink::leave_session`] has been called.
    #[must_use]
    pub const fn has_left(&self) -> bool {
        self.left
    }
}

impl SessionLink for LoopbackSession {
    fn spawn_entity(&mut self, id: NetId) -> bool {
        self.claimed.insert(id)
    }

    fn leave_session(&mut self) {
        if !self.left {
            info!("leaving loopback session");
        }
        self.left = true;
    }

    fn is_session_connected(&self) -> bool {
        !self.left
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn loopback_grants_first_claim_only() {
        let mut session = LoopbackSession::default();
        assert!(session.spawn_entity(NetId(1)));
        assert!(!session.spawn_entity(NetId(1)));
        assert!(session.spawn_entity(NetId(2)));
    }

    #[rstest]
    fn leaving_disconnects() {
        let mut session = LoopbackSession::default();
        assert!(session.is_session_connected());
        session.leave_session();
        assert!(session.has_left());
        assert!(!session.is_session_connected());
    }

    #[rstest]
    fn session_resource_forwards_to_link() {
        let mut link = MockSessionLink::new();
        link.expect_spawn_entity()
            .withf(|id| *id == NetId(9))
            .times(1)
            .return_const(false);
        link.expect_is_session_connected().return_const(true);
        link.expect_leave_session().times(1).return_const(());

        let mut session = Session::new(link);
        assert!(!session.spawn_entity(NetId(9)));
        assert!(session.is_connected());
        session.leave_session();
        session.leave_session();
        assert!(session.has_left());
    }
}
