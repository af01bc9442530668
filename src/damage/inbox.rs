//! Buffered hazard contacts awaiting the damage pass.

use bevy::prelude::{Entity, Resource};

use crate::components::HazardTag;

/// Stage of a contact between an avatar and a collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContactPhase {
    /// The contact began this tick.
    Enter,
    /// The contact persisted for `dt` seconds.
    Stay {
        /// Seconds of contact this tick.
        dt: f32,
    },
}

/// Contact reported by the collision layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactEvent {
    /// Avatar entity that was touched.
    pub target: Entity,
    /// Tag of the touching collider.
    pub hazard: HazardTag,
    /// Contact stage.
    pub phase: ContactPhase,
}

impl ContactEvent {
    /// A contact that began this tick.
    #[must_use]
    pub fn enter(target: Entity, hazard: impl Into<String>) -> Self {
        Self {
            target,
            hazard: HazardTag::new(hazard),
            phase: ContactPhase::Enter,
        }
    }

    /// A contact that persisted for `dt` seconds.
    #[must_use]
    pub fn stay(target: Entity, hazard: impl Into<String>, dt: f32) -> Self {
        Self {
            target,
            hazard: HazardTag::new(hazard),
            phase: ContactPhase::Stay { dt },
        }
    }
}

/// Contacts reported since the last damage pass.
#[derive(Resource, Debug, Default)]
pub struct ContactInbox {
    events: Vec<ContactEvent>,
}

impl ContactInbox {
    /// Queues one contact.
    pub fn push(&mut self, event: ContactEvent) {
        self.events.push(event);
    }

    /// Queues several contacts in order.
    pub fn extend<I>(&mut self, events: I)
    where
        I: IntoIterator<Item = ContactEvent>,
    {
        self.events.extend(events);
    }

    /// Removes and yields every queued contact in arrival order.
    pub fn drain(&mut self) -> std::vec::Drain<'_, ContactEvent> {
        self.events.drain(..)
    }

    /// Whether no contacts are queued.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn push_appends_single_event() {
        let mut inbox = ContactInbox::default();
        let event = ContactEvent::enter(Entity::PLACEHOLDER, "Beam");
        assert!(inbox.is_empty());
        inbox.push(event.clone());
        assert!(!inbox.is_empty());
        let drained: Vec<_> = inbox.drain().collect();
        assert_eq!(drained, vec![event]);
        assert!(inbox.is_empty());
    }

    #[rstest]
    fn extend_preserves_order() {
        let mut inbox = ContactInbox::default();
        let first = ContactEvent::enter(Entity::PLACEHOLDER, "Beam");
        let second = ContactEvent::stay(Entity::PLACEHOLDER, "Beam", 0.5);
        inbox.extend(vec![first.clone(), second.clone()]);
        let drained: Vec<_> = inbox.drain().collect();
        assert_eq!(drained, vec![first, second]);
    }
}
