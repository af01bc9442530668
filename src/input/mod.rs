//! Input sampling and firing-trigger policies.
//!
//! Input devices are polled once per tick into an [`InputFrame`]. The two
//! supported sources differ in how they drive the firing flag: discrete
//! devices report press/release edges, while touch buttons report the raw
//! held state. [`FirePolicy`] keeps those two behaviours distinct.

mod keyboard;
mod touch;

pub use keyboard::{KeyBindings, KeyboardSampler};
pub use touch::{TouchControls, VirtualButton, VirtualStick};

use bevy::prelude::*;
use serde::Deserialize;

/// Press and release pulses observed for a button during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonEdges {
    /// The button went down this tick.
    pub pressed: bool,
    /// The button came up this tick.
    pub released: bool,
}

/// One tick of sampled input. Axes lie in `[-1, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputFrame {
    /// Move stick, horizontal.
    pub move_x: f32,
    /// Move stick, forward.
    pub move_z: f32,
    /// Look stick, horizontal.
    pub look_x: f32,
    /// Look stick, vertical.
    pub look_y: f32,
    /// Jump button is held.
    pub jump_pressed: bool,
    /// Fire button is held.
    pub fire_pressed: bool,
    /// Fire button edges for discrete sources.
    pub fire_edges: ButtonEdges,
}

impl InputFrame {
    /// Planar movement vector `(moveX, 0, moveZ)`.
    #[must_use]
    pub const fn planar(&self) -> Vec3 {
        Vec3::new(self.move_x, 0.0, self.move_z)
    }
}

/// Clamps an axis reading into `[-1, 1]`, mapping non-finite values to zero.
#[must_use]
pub const fn normalize_axis(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

/// A polled input device. Sampling never blocks and has no side effects.
pub trait InputSampler {
    /// Reads the device into a frame.
    fn sample(&self) -> InputFrame;
}

/// Device family driving an owned avatar.
#[derive(Component, Reflect, Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputSourceKind {
    /// On-screen sticks and buttons.
    #[default]
    Touch,
    /// Keyboard keys.
    Keyboard,
}

impl InputSourceKind {
    /// Firing policy used by this source.
    #[must_use]
    pub const fn fire_policy(self) -> FirePolicy {
        match self {
            Self::Touch => FirePolicy::Held,
            Self::Keyboard => FirePolicy::Edge,
        }
    }
}

/// How the firing flag reacts to the fire button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirePolicy {
    /// Rising edge sets firing, falling edge clears it.
    Edge,
    /// Firing mirrors the held state with no latch.
    Held,
}

/// Ordered states the firing flag passed through during one tick.
///
/// An empty sequence means the flag did not change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FireSequence(Vec<bool>);

impl FireSequence {
    /// States in the order they were applied.
    #[must_use]
    pub fn states(&self) -> &[bool] {
        &self.0
    }

    /// Flag value after the tick, given its value before.
    #[must_use]
    pub fn settle(&self, before: bool) -> bool {
        self.0.last().copied().unwrap_or(before)
    }

    fn push_change(&mut self, current: &mut bool, next: bool) {
        if *current != next {
            *current = next;
            self.0.push(next);
        }
    }
}

/// Applies the fire button to the firing flag under `policy`.
///
/// With [`FirePolicy::Edge`] a press and release inside one tick produces
/// `[true, false]`. The press edge is always applied before the release
/// edge, so a release followed by a re-press within one tick while firing
/// settles to `false` even though the key is down again. With
/// [`FirePolicy::Held`] the flag simply follows `frame.fire_pressed`.
///
/// # Examples
/// ```
/// use beamline::input::{process_fire_edge, ButtonEdges, FirePolicy, InputFrame};
/// let frame = InputFrame {
///     fire_edges: ButtonEdges { pressed: true, released: true },
///     ..InputFrame::default()
/// };
/// let sequence = process_fire_edge(FirePolicy::Edge, false, &frame);
/// assert_eq!(sequence.states(), &[true, false]);
/// ```
#[must_use]
pub fn process_fire_edge(policy: FirePolicy, firing: bool, frame: &InputFrame) -> FireSequence {
    let mut sequence = FireSequence::default();
    let mut current = firing;
    match policy {
        FirePolicy::Edge => {
            if frame.fire_edges.pressed {
                sequence.push_change(&mut current, true);
            }
            if frame.fire_edges.released {
                sequence.push_change(&mut current, false);
            }
        }
        FirePolicy::Held => sequence.push_change(&mut current, frame.fire_pressed),
    }
    sequence
}

/// Latest frame sampled for an owned avatar.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct InputState {
    /// Frame sampled this tick.
    pub frame: InputFrame,
}
