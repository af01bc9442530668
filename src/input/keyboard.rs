//! Keyboard sampling for desktop builds.

use bevy::input::ButtonInput;
use bevy::prelude::*;

use super::{ButtonEdges, InputFrame, InputSampler};

/// Keys bound to each virtual control.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    /// Move forward.
    pub forward: KeyCode,
    /// Move backward.
    pub back: KeyCode,
    /// Strafe left.
    pub left: KeyCode,
    /// Strafe right.
    pub right: KeyCode,
    /// Turn the camera left.
    pub look_left: KeyCode,
    /// Turn the camera right.
    pub look_right: KeyCode,
    /// Raise the camera.
    pub look_up: KeyCode,
    /// Lower the camera.
    pub look_down: KeyCode,
    /// Jump.
    pub jump: KeyCode,
    /// Fire.
    pub fire: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: KeyCode::KeyW,
            back: KeyCode::KeyS,
            left: KeyCode::KeyA,
            right: KeyCode::KeyD,
            look_left: KeyCode::ArrowLeft,
            look_right: KeyCode::ArrowRight,
            look_up: KeyCode::ArrowUp,
            look_down: KeyCode::ArrowDown,
            jump: KeyCode::Space,
            fire: KeyCode::ControlLeft,
        }
    }
}

/// Borrowed view of the keyboard state under a set of bindings.
#[derive(Debug, Clone, Copy)]
pub struct KeyboardSampler<'a> {
    keys: &'a ButtonInput<KeyCode>,
    bindings: &'a KeyBindings,
}

impl<'a> KeyboardSampler<'a> {
    /// Wraps the keyboard resource.
    #[must_use]
    pub const fn new(keys: &'a ButtonInput<KeyCode>, bindings: &'a KeyBindings) -> Self {
        Self { keys, bindings }
    }

    fn axis(&self, negative: KeyCode, positive: KeyCode) -> f32 {
        match (self.keys.pressed(negative), self.keys.pressed(positive)) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

impl InputSampler for KeyboardSampler<'_> {
    fn sample(&self) -> InputFrame {
        let fire = self.bindings.fire;
        InputFrame {
            move_x: self.axis(self.bindings.left, self.bindings.right),
            move_z: self.axis(self.bindings.back, self.bindings.forward),
            look_x: self.axis(self.bindings.look_left, self.bindings.look_right),
            look_y: self.axis(self.bindings.look_down, self.bindings.look_up),
            jump_pressed: self.keys.just_pressed(self.bindings.jump),
            fire_pressed: self.keys.pressed(fire),
            fire_edges: ButtonEdges {
                pressed: self.keys.just_pressed(fire),
                released: self.keys.just_released(fire),
            },
        }
    }
}
