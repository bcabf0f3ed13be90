use clap::Parser;
use fire_controller_core::{
    ActorId, FireConfig, FireDestroyed, FireDifficulty, FirePhase, FireWorld, Ignition,
    RecordingSinks, SinkCall, StructureId, Vec3,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const PLAYER: ActorId = ActorId::new(1);

/// Headless fire controller run with configurable parameters
#[derive(Parser, Debug)]
#[command(name = "fire-controller-demo")]
#[command(about = "Headless fire lifecycle demo: a player walks a row of burning trees with a hose", long_about = None)]
struct Args {
    /// Simulation duration in seconds
    #[arg(short, long, default_value_t = 60.0)]
    duration: f32,

    /// Fixed time step in seconds
    #[arg(long, default_value_t = 0.05)]
    dt: f32,

    /// Number of fires to ignite (one per tree)
    #[arg(short, long, default_value_t = 5)]
    fires: u32,

    /// Distance between neighbouring trees in meters
    #[arg(long, default_value_t = 6.0)]
    spacing: f32,

    /// Normalized world health (0-1) scaling fire intensity
    #[arg(short, long, default_value_t = 0.5)]
    world_health: f32,

    /// Difficulty (trainee, standard, wildfire)
    #[arg(long, default_value = "standard")]
    difficulty: FireDifficulty,

    /// JSON config file overriding the default tuning
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// RNG seed for the water spray
    #[arg(short, long, default_value_t = 7)]
    seed: u64,

    /// Probability per step that the player sprays water
    #[arg(long, default_value_t = 0.2)]
    water_probability: f64,

    /// Water poured per spray
    #[arg(long, default_value_t = 0.25)]
    water_amount: f32,

    /// Player walking speed in m/s
    #[arg(long, default_value_t = 1.5)]
    walk_speed: f32,

    /// Report interval in seconds
    #[arg(short, long, default_value_t = 5.0)]
    report_interval: f32,

    /// Print a JSON summary instead of the table
    #[arg(long)]
    json: bool,
}

/// Hose reach around the player
const SPRAY_RADIUS: f32 = 2.5;

impl Args {
    /// Reject timing values that would stall or flood the run loop
    fn validate(&self) -> Result<(), String> {
        let positive = [
            ("dt", self.dt),
            ("duration", self.duration),
            ("report-interval", self.report_interval),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("--{name} must be finite and positive, got {value}"));
            }
        }
        Ok(())
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = args.validate() {
        error!("Invalid arguments: {}", e);
        return ExitCode::FAILURE;
    }

    let config = match &args.config {
        Some(path) => match FireConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => FireConfig::default(),
    }
    .with_difficulty(args.difficulty);

    let recorder = RecordingSinks::new();
    let mut world = match FireWorld::new(config, recorder.collaborators()) {
        Ok(world) => world,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    for i in 0..args.fires {
        let position = Vec3::new(i as f32 * args.spacing, 0.0, 0.0);
        let mut ignition = Ignition::at(position).under(StructureId::new(i + 1));
        if i % 2 == 0 {
            ignition = ignition.with_reward();
        }
        world.ignite(ignition);
    }
    info!(
        "Ignited {} fires, difficulty {}, world health {:.2}",
        args.fires, args.difficulty, args.world_health
    );

    let destroyed = run(&args, &mut world);

    if args.json {
        print_json(&world, &recorder, &destroyed);
    } else {
        print_summary(&world, &recorder, &destroyed);
    }

    ExitCode::SUCCESS
}

/// Walk the player back and forth along the row, spraying at random
fn run(args: &Args, world: &mut FireWorld) -> Vec<FireDestroyed> {
    let mut rng = StdRng::seed_from_u64(args.seed);
    let row_end = args.fires.saturating_sub(1) as f32 * args.spacing;
    let mut player_x = -SPRAY_RADIUS;
    let mut heading = 1.0;
    let mut destroyed = Vec::new();
    let mut next_report = 0.0;

    if !args.json {
        println!("=== Fire Controller Demo ===\n");
        println!("Time(s) | Burning | Extinguishing | Live | Destroyed");
        println!("--------|---------|---------------|------|----------");
    }

    while world.simulation_time() < args.duration {
        player_x += heading * args.walk_speed * args.dt;
        if player_x > row_end + SPRAY_RADIUS || player_x < -SPRAY_RADIUS {
            heading = -heading;
        }
        let player = Vec3::new(player_x, 0.0, 0.0);

        world.update_actor_position(PLAYER, player);
        if rng.random_bool(args.water_probability.clamp(0.0, 1.0)) {
            world.spray_water(player, SPRAY_RADIUS, args.water_amount);
        }
        destroyed.extend(world.tick(args.dt, args.world_health));

        if !args.json && world.simulation_time() >= next_report {
            println!(
                "{:7.1} | {:7} | {:13} | {:4} | {:9}",
                world.simulation_time(),
                world.count_in_phase(FirePhase::Burning),
                world.count_in_phase(FirePhase::Extinguishing),
                world.active_fire_count(),
                destroyed.len()
            );
            next_report += args.report_interval;
        }

        if world.active_fire_count() == 0 {
            info!("All fires gone at {:.2}s", world.simulation_time());
            break;
        }
    }

    destroyed
}

fn damage_taken(recorder: &RecordingSinks) -> f32 {
    recorder
        .calls()
        .iter()
        .map(|call| match call {
            SinkCall::DamageActor { amount, .. } => *amount,
            _ => 0.0,
        })
        .sum()
}

fn print_summary(world: &FireWorld, recorder: &RecordingSinks, destroyed: &[FireDestroyed]) {
    let stats = world.stats();

    println!("\n=== Run Complete ===");
    println!("Final time: {:.2}s", world.simulation_time());
    println!("Fires ignited: {}", stats.ignited);
    println!("Fires extinguished: {}", stats.extinguished);
    println!("Trees destroyed: {}", stats.trees_destroyed);
    println!("Fires still live: {}", world.active_fire_count());
    println!("Coins awarded: {}", stats.coins_awarded);
    println!("Water absorbed: {:.2}", stats.water_applied);
    println!(
        "Player damage: {:.1} over {} ticks",
        damage_taken(recorder),
        stats.damage_ticks
    );
    println!(
        "Rewards spawned: {}",
        recorder.count(|c| matches!(c, SinkCall::SpawnReward { .. }))
    );

    if !destroyed.is_empty() {
        println!("\nDestroyed:");
        for signal in destroyed {
            println!("  {} at {:.2}s ({:?})", signal.fire, signal.at, signal.cause);
        }
    }
}

fn print_json(world: &FireWorld, recorder: &RecordingSinks, destroyed: &[FireDestroyed]) {
    let summary = serde_json::json!({
        "simulation_time": world.simulation_time(),
        "stats": world.stats(),
        "player_damage": damage_taken(recorder),
        "sink_calls": recorder.calls().len(),
        "destroyed": destroyed,
        "live_fires": world.snapshots(),
    });

    match serde_json::to_string_pretty(&summary) {
        Ok(text) => println!("{text}"),
        Err(e) => error!("Failed to serialize summary: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec!["demo-headless"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).expect("arguments should parse")
    }

    #[test]
    fn test_default_args_are_valid() {
        assert!(parse(&[]).validate().is_ok());
    }

    #[test]
    fn test_zero_or_nan_step_rejected() {
        assert!(parse(&["--dt", "0"]).validate().is_err());
        assert!(parse(&["--dt", "NaN"]).validate().is_err());
        assert!(parse(&["--dt=-0.1"]).validate().is_err());
    }

    #[test]
    fn test_zero_duration_and_report_interval_rejected() {
        let err = parse(&["--duration", "0"]).validate().unwrap_err();
        assert!(err.contains("--duration"));

        let err = parse(&["--report-interval", "0"]).validate().unwrap_err();
        assert!(err.contains("--report-interval"));
    }

    #[test]
    fn test_validated_run_terminates() {
        let args = parse(&["--dt", "0.1", "--duration", "1", "--json"]);
        assert!(args.validate().is_ok());

        let recorder = RecordingSinks::new();
        let mut world = FireWorld::new(FireConfig::default(), recorder.collaborators()).unwrap();
        world.ignite(Ignition::at(Vec3::zeros()).under(StructureId::new(1)));

        run(&args, &mut world);
        assert!(world.simulation_time() >= 1.0);
    }
}
