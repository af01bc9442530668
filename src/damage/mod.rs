//! Hazard contact damage.
//!
//! The collision layer reports contacts into [`ContactInbox`]. Each tick the
//! inbox is drained and every contact is handed to the [`DamageAccumulator`],
//! which deducts health only on avatars this process owns.

mod inbox;

pub use inbox::{ContactEvent, ContactInbox, ContactPhase};

use bevy::prelude::*;
use log::debug;

use crate::components::{EntityHandle, HazardTag, Health, Role};
use crate::settings::AvatarSettings;

/// Why a contact left health untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The avatar is observed, not owned.
    Observer,
    /// The collider is not a hazard.
    NotHazard,
}

/// Result of offering a contact to the accumulator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageOutcome {
    /// Health was reduced by the contained amount.
    Applied(f32),
    /// Health was left untouched.
    Ignored(IgnoreReason),
}

/// Deducts health for hazard contacts.
///
/// Deductions are never negative, so health is monotonically non-increasing
/// under this type. Health is not clamped below; death is judged elsewhere.
#[derive(Debug, Clone, PartialEq)]
pub struct DamageAccumulator {
    hazard_class: String,
    enter_damage: f32,
    stay_rate: f32,
}

impl DamageAccumulator {
    /// Creates an accumulator for colliders tagged with `hazard_class`.
    #[must_use]
    pub fn new(hazard_class: impl Into<String>, enter_damage: f32, stay_rate: f32) -> Self {
        Self {
            hazard_class: hazard_class.into(),
            enter_damage: enter_damage.max(0.0),
            stay_rate: stay_rate.max(0.0),
        }
    }

    /// Creates an accumulator from the configured damage values.
    #[must_use]
    pub fn from_settings(settings: &AvatarSettings) -> Self {
        Self::new(
            settings.hazard_class.clone(),
            settings.contact_enter_damage,
            settings.contact_stay_damage_rate,
        )
    }

    /// Applies the one-off deduction for a contact that just began.
    ///
    /// # Examples
    /// ```
    /// use beamline::components::{HazardTag, Health, Role};
    /// use beamline::damage::{DamageAccumulator, DamageOutcome};
    ///
    /// let damage = DamageAccumulator::new("Beam", 0.1, 0.1);
    /// let mut health = Health(1.0);
    /// let outcome = damage.on_contact_enter(Role::Authority, &mut health, &HazardTag::new("Beam"));
    /// assert_eq!(outcome, DamageOutcome::Applied(0.1));
    /// assert_eq!(health, Health(1.0 - 0.1));
    /// ```
    pub fn on_contact_enter(
        &self,
        role: Role,
        health: &mut Health,
        tag: &HazardTag,
    ) -> DamageOutcome {
        self.deduct(role, health, tag, self.enter_damage)
    }

    /// Applies the time-scaled deduction for a contact that persists for `dt`
    /// seconds.
    pub fn on_contact_stay(
        &self,
        role: Role,
        health: &mut Health,
        tag: &HazardTag,
        dt: f32,
    ) -> DamageOutcome {
        self.deduct(role, health, tag, self.stay_rate * dt.max(0.0))
    }

    /// Dispatches a contact by phase.
    pub fn on_contact(
        &self,
        role: Role,
        health: &mut Health,
        tag: &HazardTag,
        phase: ContactPhase,
    ) -> DamageOutcome {
        match phase {
            ContactPhase::Enter => self.on_contact_enter(role, health, tag),
            ContactPhase::Stay { dt } => self.on_contact_stay(role, health, tag, dt),
        }
    }

    fn deduct(&self, role: Role, health: &mut Health, tag: &HazardTag, amount: f32) -> DamageOutcome {
        if !role.is_authority() {
            return DamageOutcome::Ignored(IgnoreReason::Observer);
        }
        if !tag.matches(&self.hazard_class) {
            return DamageOutcome::Ignored(IgnoreReason::NotHazard);
        }
        health.0 -= amount;
        DamageOutcome::Applied(amount)
    }
}

/// Drains the contact inbox and applies damage to owned avatars.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn apply_contacts_system(
    settings: Res<AvatarSettings>,
    mut inbox: ResMut<ContactInbox>,
    mut avatars: Query<(&EntityHandle, &mut Health)>,
) {
    if inbox.is_empty() {
        return;
    }
    let accumulator = DamageAccumulator::from_settings(&settings);
    for contact in inbox.drain() {
        let Ok((handle, mut health)) = avatars.get_mut(contact.target) else {
            debug!("contact for entity {:?} without an avatar", contact.target);
            continue;
        };
        match accumulator.on_contact(handle.role, &mut health, &contact.hazard, contact.phase) {
            DamageOutcome::Applied(amount) => {
                debug!("avatar {} took {amount} damage, health {}", handle.id, health.0);
            }
            DamageOutcome::Ignored(IgnoreReason::Observer) => {
                debug!("contact on observed avatar {} ignored", handle.id);
            }
            DamageOutcome::Ignored(IgnoreReason::NotHazard) => {}
        }
    }
}
