//! Behavioural tests: owned-avatar simulation inside the plugin schedule.
//!
//! Covers sustained hazard damage, the two firing policies, death handling
//! and the suppression of local simulation on observed avatars.

#[path = "support/thread_safe_app.rs"]
mod thread_safe_app;

#[path = "support/rspec_runner.rs"]
mod rspec_runner;

#[path = "support/avatar_fixture.rs"]
#[expect(
    dead_code,
    reason = "Each suite compiles the shared fixture and uses a different subset of it."
)]
mod avatar_fixture;

use approx::assert_relative_eq;
use avatar_fixture::{AvatarFixture, TICK};
use beamline::animation::{AnimationRig, Locomotion};
use beamline::camera::{CameraController, CameraRig};
use beamline::components::{CameraState, Firing, HazardVisual, Health, LeaveRequested, NetId};
use beamline::input::{InputSourceKind, KeyBindings, TouchControls, VirtualStick};
use beamline::{AvatarRequest, AvatarSettings, ContactEvent, FaultContext, HAZARD_CLASS};
use bevy::input::ButtonInput;
use bevy::prelude::*;
use rspec::block::Context as Scenario;
use rspec_runner::run_serial;

#[test]
fn ten_short_stays_cost_a_tenth_of_health() {
    let fixture = AvatarFixture::bootstrap();
    let avatar = fixture.spawn(AvatarRequest::new(NetId(1), "Ada"));
    for _ in 0..10 {
        fixture.push_contact(ContactEvent::stay(avatar, HAZARD_CLASS, 0.1));
        fixture.tick();
    }
    let health = fixture.get::<Health>(avatar).expect("health");
    assert_relative_eq!(health.0, 0.9, epsilon = 1e-5);
}

#[test]
fn non_hazard_contacts_leave_health_alone() {
    let fixture = AvatarFixture::bootstrap();
    let avatar = fixture.spawn(AvatarRequest::new(NetId(1), "Ada"));
    fixture.push_contact(ContactEvent::enter(avatar, "Wall"));
    fixture.tick();
    assert_eq!(fixture.get::<Health>(avatar), Some(Health(1.0)));
}

#[derive(Debug, Clone)]
struct KeyboardAvatar {
    fixture: AvatarFixture,
    avatar: Entity,
}

impl KeyboardAvatar {
    fn bootstrap() -> Self {
        let fixture = AvatarFixture::with_settings(AvatarSettings {
            input_source: InputSourceKind::Keyboard,
            ..AvatarSettings::default()
        });
        fixture.with_world(|world| world.init_resource::<ButtonInput<KeyCode>>());
        let avatar = fixture.spawn(AvatarRequest::new(NetId(2), "Keys"));
        Self { fixture, avatar }
    }

    fn keys(&self, f: impl FnOnce(&mut ButtonInput<KeyCode>, KeyCode)) {
        self.fixture.with_world(|world| {
            let fire = world.resource::<KeyBindings>().fire;
            let mut keys = world.resource_mut::<ButtonInput<KeyCode>>();
            keys.clear();
            f(&mut *keys, fire);
        });
    }

    fn firing(&self) -> bool {
        self.fixture
            .get::<Firing>(self.avatar)
            .is_some_and(|firing| firing.0)
    }

    fn beams_shown(&self) -> bool {
        self.fixture
            .get::<HazardVisual>(self.avatar)
            .is_some_and(|visual| visual.active)
    }
}

#[test]
fn keyboard_fire_follows_edges() {
    run_serial(&rspec::given(
        "an avatar driven by the keyboard",
        KeyboardAvatar::bootstrap(),
        |scenario: &mut Scenario<KeyboardAvatar>| {
            scenario.when("fire goes down, is held, then comes up", |ctx| {
                ctx.then("firing latches on the press and clears on release", |state| {
                    state.keys(|keys, fire| keys.press(fire));
                    state.fixture.tick();
                    assert!(state.firing());
                    assert!(state.beams_shown());

                    state.keys(|_, _| {});
                    state.fixture.tick();
                    assert!(state.firing(), "held key keeps firing without new edges");

                    state.keys(|keys, fire| keys.release(fire));
                    state.fixture.tick();
                    assert!(!state.firing());
                    assert!(!state.beams_shown());
                });
            });

            scenario.when("fire is pressed and released inside one tick", |ctx| {
                ctx.then("firing ends the tick cleared", |state| {
                    state.keys(|keys, fire| {
                        keys.press(fire);
                        keys.release(fire);
                    });
                    state.fixture.tick();
                    assert!(!state.firing());
                });
            });
        },
    ));
}

#[test]
fn touch_fire_mirrors_held_button() {
    let fixture = AvatarFixture::bootstrap();
    let avatar = fixture.spawn(AvatarRequest::new(NetId(3), "Touch"));
    for held in [true, true, false, true, false] {
        fixture.with_world(|world| {
            world.resource_mut::<TouchControls>().fire_button.pressed = held;
        });
        fixture.tick();
        assert_eq!(fixture.get::<Firing>(avatar), Some(Firing(held)));
    }
}

#[test]
fn death_leaves_the_session_once() {
    run_serial(&rspec::given(
        "an owned avatar hit twice by a heavy beam",
        {
            let fixture = AvatarFixture::with_settings(AvatarSettings {
                contact_enter_damage: 0.5,
                ..AvatarSettings::default()
            });
            let avatar = fixture.spawn(AvatarRequest::new(NetId(4), "Doomed"));
            fixture.push_contact(ContactEvent::enter(avatar, HAZARD_CLASS));
            fixture.push_contact(ContactEvent::enter(avatar, HAZARD_CLASS));
            fixture.tick();
            fixture.tick();
            fixture.tick();
            (fixture, avatar)
        },
        |scenario: &mut Scenario<(AvatarFixture, Entity)>| {
            scenario.then("health has reached zero", |(fixture, avatar)| {
                assert_eq!(fixture.get::<Health>(*avatar), Some(Health(0.0)));
            });

            scenario.then("the session was left exactly once", |(fixture, _)| {
                assert_eq!(fixture.session().leave_count(), 1);
            });

            scenario.then("the avatar is marked as leaving", |(fixture, avatar)| {
                assert!(fixture.get::<LeaveRequested>(*avatar).is_some());
            });

            scenario.then("one death event was raised", |(fixture, _)| {
                let deaths = fixture.events().deaths;
                assert_eq!(deaths.len(), 1);
                assert!(deaths.iter().all(|death| death.entity == NetId(4)));
            });
        },
    ));
}

#[test]
fn observers_do_not_simulate() {
    for connected in [true, false] {
        let fixture = AvatarFixture::bootstrap();
        let owned = fixture.spawn(AvatarRequest::new(NetId(5), "Owner").at(Vec3::X));
        let observed = fixture.spawn(AvatarRequest::new(NetId(5), "Owner").at(Vec3::X));
        fixture.session().set_connected(connected);
        fixture.with_world(|world| {
            let mut touch = world.resource_mut::<TouchControls>();
            touch.move_stick = VirtualStick::new(0.0, 1.0);
            touch.fire_button.pressed = true;
        });
        fixture.tick();

        let observed_at = fixture.get::<Transform>(observed).expect("transform");
        assert_eq!(observed_at.translation, Vec3::X);
        assert_eq!(fixture.get::<Firing>(observed), Some(Firing(false)));
        let owned_at = fixture.get::<Transform>(owned).expect("transform");
        assert_relative_eq!(owned_at.translation.z, -5.0 * TICK, epsilon = 1e-5);
    }
}

#[test]
fn camera_frames_the_owned_avatar() {
    let fixture = AvatarFixture::bootstrap();
    let avatar = fixture.spawn(AvatarRequest::new(NetId(6), "Framed"));
    fixture.with_world(|world| {
        let mut touch = world.resource_mut::<TouchControls>();
        touch.move_stick = VirtualStick::new(1.0, 0.0);
        touch.look_stick = VirtualStick::new(1.0, 1.0);
    });
    for _ in 0..3 {
        fixture.tick();
    }

    let position = fixture.get::<Transform>(avatar).expect("transform").translation;
    let orbit = fixture.get::<CameraState>(avatar).expect("camera state");
    assert_relative_eq!(orbit.yaw, 6.0, epsilon = 1e-5);
    assert_relative_eq!(orbit.pitch_distance, 0.3, epsilon = 1e-5);

    let camera = fixture.with_world(|world| {
        let mut cameras = world.query_filtered::<&Transform, With<CameraController>>();
        cameras.single(world).copied().expect("one camera")
    });
    let expected = CameraRig::from_settings(&AvatarSettings::default()).eye(position, orbit);
    assert!(camera.translation.distance(expected) < 1e-4);
}

#[derive(Debug, Clone)]
struct Rigs {
    fixture: AvatarFixture,
    rigged: Entity,
    bare: Entity,
    observed: Entity,
}

impl Rigs {
    fn bootstrap() -> Self {
        let fixture = AvatarFixture::bootstrap();
        let rigged = fixture.spawn(AvatarRequest::new(NetId(7), "Rigged"));
        let bare = fixture.spawn(AvatarRequest::new(NetId(8), "Bare").without_rig());
        let observed = fixture.spawn(AvatarRequest::new(NetId(7), "Rigged"));
        fixture.with_world(|world| {
            let mut touch = world.resource_mut::<TouchControls>();
            touch.move_stick = VirtualStick::new(0.5, 1.0);
            touch.jump_button.pressed = true;
        });
        for _ in 0..3 {
            fixture.tick();
        }
        Self {
            fixture,
            rigged,
            bare,
            observed,
        }
    }

    fn configuration_faults(&self) -> Vec<NetId> {
        self.fixture
            .events()
            .faults
            .iter()
            .filter(|fault| fault.context == FaultContext::Configuration)
            .map(|fault| fault.entity)
            .collect()
    }
}

#[test]
fn animation_rig_follows_the_owned_avatar() {
    run_serial(&rspec::given(
        "a rigged, a bare and an observed avatar with jump held for three ticks",
        Rigs::bootstrap(),
        |scenario: &mut Scenario<Rigs>| {
            scenario.then("the rig mirrors the locomotion signal", |rigs| {
                let locomotion = rigs.fixture.get::<Locomotion>(rigs.rigged).expect("locomotion");
                let rig = rigs.fixture.get::<AnimationRig>(rigs.rigged).expect("rig");
                assert_relative_eq!(locomotion.speed, 1.25, epsilon = 1e-5);
                assert_relative_eq!(rig.speed, locomotion.speed);
                assert_relative_eq!(rig.direction, locomotion.direction);
                assert!(rig.direction > 0.0 && rig.direction < 0.5);
            });

            scenario.then("every held tick fires a jump trigger", |rigs| {
                let rig = rigs.fixture.get::<AnimationRig>(rigs.rigged).expect("rig");
                assert_eq!(rig.jump_triggers, 3);
            });

            scenario.then("the observed rig is left untouched", |rigs| {
                let rig = rigs.fixture.get::<AnimationRig>(rigs.observed).expect("rig");
                assert_eq!(rig, AnimationRig::default());
            });

            scenario.then("the bare avatar still gets a locomotion signal", |rigs| {
                assert!(rigs.fixture.get::<AnimationRig>(rigs.bare).is_none());
                let locomotion = rigs.fixture.get::<Locomotion>(rigs.bare).expect("locomotion");
                assert_relative_eq!(locomotion.speed, 1.25, epsilon = 1e-5);
            });

            scenario.then("the missing rig is reported once", |rigs| {
                assert_eq!(rigs.configuration_faults(), vec![NetId(8)]);
            });
        },
    ));
}

#[test]
fn later_deaths_do_not_leave_again() {
    let fixture = AvatarFixture::with_settings(AvatarSettings {
        contact_enter_damage: 0.5,
        ..AvatarSettings::default()
    });
    let first = fixture.spawn(AvatarRequest::new(NetId(10), "First"));
    let second = fixture.spawn(AvatarRequest::new(NetId(11), "Second"));
    for avatar in [first, second] {
        fixture.push_contact(ContactEvent::enter(avatar, HAZARD_CLASS));
        fixture.push_contact(ContactEvent::enter(avatar, HAZARD_CLASS));
        fixture.tick();
        assert!(fixture.get::<LeaveRequested>(avatar).is_some());
    }
    assert_eq!(fixture.session().leave_count(), 1);
    let died: Vec<_> = fixture.events().deaths.iter().map(|death| death.entity).collect();
    assert_eq!(died, vec![NetId(10), NetId(11)]);
}
