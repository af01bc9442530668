//! Scene lifecycle subscriptions scoped to avatar lifetimes.
//!
//! Avatars subscribe to the [`LifecycleHub`] when spawned and hold the
//! returned [`LifecycleSubscription`] as a component. Despawning the avatar
//! drops the component, which removes the registration. Scene notifications
//! arrive as [`SceneEvent`]s and reach only subscribed avatars.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bevy::ecs::prelude::On;
use bevy::prelude::*;
use hashbrown::HashMap;
use log::info;

use crate::components::{EntityHandle, Motion};

#[derive(Debug, Default)]
struct Registry {
    next_key: u64,
    subscribers: HashMap<u64, Entity>,
}

/// Registry of avatars listening for scene notifications.
#[derive(Resource, Debug, Clone, Default)]
pub struct LifecycleHub {
    registry: Arc<Mutex<Registry>>,
}

impl LifecycleHub {
    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers `entity` until the returned subscription is dropped.
    #[must_use = "dropping the subscription deregisters immediately"]
    pub fn subscribe(&self, entity: Entity) -> LifecycleSubscription {
        let mut registry = self.lock();
        let key = registry.next_key;
        registry.next_key = registry.next_key.wrapping_add(1);
        registry.subscribers.insert(key, entity);
        LifecycleSubscription {
            key,
            registry: Arc::clone(&self.registry),
        }
    }

    /// Entities currently subscribed.
    #[must_use]
    pub fn subscribers(&self) -> Vec<Entity> {
        self.lock().subscribers.values().copied().collect()
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().subscribers.len()
    }

    /// Whether nothing is subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().subscribers.is_empty()
    }
}

/// Registration held by an avatar; deregisters on drop.
#[derive(Component, Debug)]
pub struct LifecycleSubscription {
    key: u64,
    registry: Arc<Mutex<Registry>>,
}

impl Drop for LifecycleSubscription {
    fn drop(&mut self) {
        let mut registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        registry.subscribers.remove(&self.key);
    }
}

/// Scene notifications delivered to subscribed avatars.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum SceneEvent {
    /// A scene finished loading; owned avatars move to `safe_spawn`.
    Loaded {
        /// Position guaranteed to stand on solid ground.
        safe_spawn: Vec3,
    },
    /// The current scene is about to unload.
    Unloading,
}

/// Dispatches a [`SceneEvent`] to subscribed avatars.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
pub fn handle_scene_event(
    event: On<SceneEvent>,
    hub: Res<LifecycleHub>,
    mut avatars: Query<(&EntityHandle, &mut Transform, Option<&mut Motion>)>,
) {
    let scene = *event.event();
    for entity in hub.subscribers() {
        let Ok((handle, mut transform, motion)) = avatars.get_mut(entity) else {
            continue;
        };
        match scene {
            SceneEvent::Loaded { safe_spawn } => {
                if !handle.role.is_authority() {
                    continue;
                }
                transform.translation = safe_spawn;
                if let Some(mut moving) = motion {
                    moving.velocity = Vec3::ZERO;
                }
                info!("avatar {} placed at safe spawn {safe_spawn}", handle.id);
            }
            SceneEvent::Unloading => info!("scene unloading under avatar {}", handle.id),
        }
    }
}
