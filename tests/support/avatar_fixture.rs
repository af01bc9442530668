//! Shared fixture for avatar behaviour suites.
//!
//! Builds a headless app with [`AvatarPlugin`] and a fixed tick, and exposes
//! the handful of operations the suites need: spawning, ticking, forwarding
//! packets between peers, and reading components back.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, MutexGuard};

use bevy::ecs::prelude::On;
use bevy::prelude::*;
use beamline::components::NetId;
use beamline::replication::{ReplicationInbox, ReplicationOutbox};
use beamline::{
    spawn_avatar, AvatarFault, AvatarPlugin, AvatarRequest, AvatarSettings, ContactEvent,
    ContactInbox, HealthDepleted, Session, SessionLink,
};
use hashbrown::HashSet;

use crate::thread_safe_app::{lock_app, share, SharedApp, ThreadSafeApp};

/// Tick length used by every suite.
pub const TICK: f32 = 0.1;

/// Faults and deaths observed since the fixture was built.
#[derive(Resource, Debug, Default, Clone)]
pub struct EventLog {
    /// Every [`AvatarFault`] triggered.
    pub faults: Vec<AvatarFault>,
    /// Every [`HealthDepleted`] triggered.
    pub deaths: Vec<HealthDepleted>,
}

/// Session counters shared with the test body.
#[derive(Debug, Clone, Default)]
pub struct SessionProbe {
    leaves: Arc<AtomicUsize>,
    connected: Arc<AtomicBool>,
}

impl SessionProbe {
    /// Times the core asked to leave.
    pub fn leave_count(&self) -> usize {
        self.leaves.load(Ordering::SeqCst)
    }

    /// Forces the session's connection state.
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }
}

/// Session granting the first claim on each id and counting leaves.
#[derive(Debug)]
struct ProbeSession {
    claimed: HashSet<NetId>,
    probe: SessionProbe,
}

impl SessionLink for ProbeSession {
    fn spawn_entity(&mut self, id: NetId) -> bool {
        self.claimed.insert(id)
    }

    fn leave_session(&mut self) {
        self.probe.leaves.fetch_add(1, Ordering::SeqCst);
    }

    fn is_session_connected(&self) -> bool {
        self.probe.connected.load(Ordering::SeqCst)
    }
}

fn record_fault(event: On<AvatarFault>, mut log: ResMut<EventLog>) {
    log.faults.push(event.event().clone());
}

fn record_death(event: On<HealthDepleted>, mut log: ResMut<EventLog>) {
    log.deaths.push(*event.event());
}

/// Headless app with the avatar plugin installed.
#[derive(Debug, Clone)]
pub struct AvatarFixture {
    app: SharedApp,
    probe: SessionProbe,
}

impl AvatarFixture {
    /// Builds the app with default settings.
    pub fn bootstrap() -> Self {
        Self::with_settings(AvatarSettings::default())
    }

    /// Builds the app with `settings`, forcing the fixed [`TICK`].
    pub fn with_settings(settings: AvatarSettings) -> Self {
        let probe = SessionProbe::default();
        probe.set_connected(true);
        let session = ProbeSession {
            claimed: HashSet::new(),
            probe: probe.clone(),
        };

        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(AvatarSettings {
                fixed_delta_seconds: Some(TICK),
                ..settings
            })
            .insert_resource(Session::new(session))
            .init_resource::<EventLog>()
            .add_plugins(AvatarPlugin)
            .add_observer(record_fault)
            .add_observer(record_death);
        app.finish();
        app.cleanup();

        Self {
            app: share(app),
            probe,
        }
    }

    /// Locks the underlying `App`.
    pub fn app_guard(&self) -> MutexGuard<'_, ThreadSafeApp> {
        lock_app(&self.app)
    }

    /// Session counters.
    pub fn session(&self) -> &SessionProbe {
        &self.probe
    }

    /// Runs `f` against the world.
    pub fn with_world<R>(&self, f: impl FnOnce(&mut World) -> R) -> R {
        let mut app = self.app_guard();
        f(app.world_mut())
    }

    /// Spawns an avatar through the session.
    pub fn spawn(&self, request: AvatarRequest) -> Entity {
        self.with_world(|world| spawn_avatar(world, request))
    }

    /// Advances one tick.
    pub fn tick(&self) {
        self.app_guard().update();
    }

    /// Advances one tick, then delivers this tick's packets to the inbox.
    pub fn tick_and_deliver(&self) {
        self.tick();
        self.deliver();
    }

    /// Moves every queued outgoing packet into the inbox.
    pub fn deliver(&self) {
        self.with_world(|world| {
            let packets: Vec<_> = world.resource_mut::<ReplicationOutbox>().drain().collect();
            world.resource_mut::<ReplicationInbox>().extend(packets);
        });
    }

    /// Queues a contact for the next damage pass.
    pub fn push_contact(&self, contact: ContactEvent) {
        self.with_world(|world| world.resource_mut::<ContactInbox>().push(contact));
    }

    /// Reads a component back.
    pub fn get<T: Component + Clone>(&self, entity: Entity) -> Option<T> {
        self.with_world(|world| world.get::<T>(entity).cloned())
    }

    /// Events recorded so far.
    pub fn events(&self) -> EventLog {
        self.with_world(|world| world.resource::<EventLog>().clone())
    }
}
