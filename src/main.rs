//! Headless demo: an owned avatar and its observer mirror over a loopback session.

use anyhow::{Context, Result};
use bevy::prelude::*;
use clap::Parser;
use log::info;

use beamline::components::{DisplayName, Firing, Health, LeaveRequested, NetId};
use beamline::input::{TouchControls, VirtualStick};
use beamline::replication::{ReplicationInbox, ReplicationOutbox};
use beamline::{
    init_logging, spawn_avatar, AvatarPlugin, AvatarRequest, AvatarSettings, ContactEvent,
    ContactInbox, HAZARD_CLASS,
};

const AVATAR_ID: NetId = NetId(1);
const DEMO_TICK_SECONDS: f32 = 1.0 / 60.0;

/// Runs an owned avatar and its mirrored observer over a loopback session
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
    /// JSON settings file
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,
    /// Number of ticks to simulate
    #[arg(short, long, default_value_t = 120)]
    ticks: u32,
    /// Display name of the avatar
    #[arg(short, long, default_value = "Runner")]
    name: String,
}

fn script_input(world: &mut World, tick: u32) {
    let mut touch = world.resource_mut::<TouchControls>();
    touch.move_stick = VirtualStick::new(0.0, 1.0);
    touch.look_stick = VirtualStick::new(0.25, 0.0);
    touch.fire_button.pressed = tick % 40 < 20;
}

fn forward_packets(world: &mut World) {
    let packets: Vec<_> = world.resource_mut::<ReplicationOutbox>().drain().collect();
    world.resource_mut::<ReplicationInbox>().extend(packets);
}

fn log_mirror(world: &World, mirror: Entity, tick: u32) {
    let (Some(firing), Some(health), Some(name), Some(transform)) = (
        world.get::<Firing>(mirror),
        world.get::<Health>(mirror),
        world.get::<DisplayName>(mirror),
        world.get::<Transform>(mirror),
    ) else {
        return;
    };
    info!(
        "tick {tick}: observer sees {:?} firing={} health={:.3} at {}",
        name.0, firing.0, health.0, transform.translation
    );
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut settings = args
        .config
        .as_deref()
        .map(AvatarSettings::load)
        .transpose()
        .context("failed to load settings")?
        .unwrap_or_default();
    settings.fixed_delta_seconds = Some(settings.fixed_delta_seconds.unwrap_or(DEMO_TICK_SECONDS));
    let dt = settings.tick_seconds(DEMO_TICK_SECONDS);

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(settings)
        .add_plugins(AvatarPlugin);

    let owned = spawn_avatar(app.world_mut(), AvatarRequest::new(AVATAR_ID, &args.name));
    let mirror = spawn_avatar(app.world_mut(), AvatarRequest::new(AVATAR_ID, &args.name));

    for tick in 0..args.ticks {
        script_input(app.world_mut(), tick);
        if tick >= 30 {
            app.world_mut()
                .resource_mut::<ContactInbox>()
                .push(ContactEvent::stay(owned, HAZARD_CLASS, dt));
        }
        app.update();
        forward_packets(app.world_mut());
        log_mirror(app.world(), mirror, tick);
        if app.world().get::<LeaveRequested>(owned).is_some() {
            info!("owned avatar left the session after {tick} ticks");
            break;
        }
    }
    Ok(())
}
