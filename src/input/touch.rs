//! On-screen joystick and button state written by the UI layer.

use bevy::prelude::*;

use super::{normalize_axis, ButtonEdges, InputFrame, InputSampler};

/// Two-axis virtual stick.
#[derive(Reflect, Debug, Clone, Copy, Default, PartialEq)]
pub struct VirtualStick {
    /// Horizontal deflection.
    pub horizontal: f32,
    /// Vertical deflection.
    pub vertical: f32,
}

impl VirtualStick {
    /// Creates a stick reading.
    #[must_use]
    pub const fn new(horizontal: f32, vertical: f32) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }
}

/// Momentary on-screen button.
#[derive(Reflect, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VirtualButton {
    /// Whether a finger is on the button.
    pub pressed: bool,
}

/// The touch control surface, addressed by named fields.
#[derive(Resource, Reflect, Debug, Clone, Copy, Default, PartialEq)]
#[reflect(Resource, Default)]
pub struct TouchControls {
    /// Left stick, drives movement.
    pub move_stick: VirtualStick,
    /// Right stick, drives the camera.
    pub look_stick: VirtualStick,
    /// Jump button.
    pub jump_button: VirtualButton,
    /// Fire button.
    pub fire_button: VirtualButton,
}

impl InputSampler for TouchControls {
    fn sample(&self) -> InputFrame {
        InputFrame {
            move_x: normalize_axis(self.move_stick.horizontal),
            move_z: normalize_axis(self.move_stick.vertical),
            look_x: normalize_axis(self.look_stick.horizontal),
            look_y: normalize_axis(self.look_stick.vertical),
            jump_pressed: self.jump_button.pressed,
            fire_pressed: self.fire_button.pressed,
            fire_edges: ButtonEdges::default(),
        }
    }
}
