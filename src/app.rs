use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use glam::Vec2;
use instant::Instant;

use fishbowl::config::SimConfig;
use fishbowl::debug::TickStats;
use fishbowl::fish::behavior::BehaviorName;
use fishbowl::fish::target::TrackTarget;
use fishbowl::fish::Fish;
use fishbowl::simulation::Simulation;

/// Default simulation tick length (milliseconds).
const TICK_MS: f64 = 1000.0 / 60.0;
/// Max accumulated time before we clamp (prevents spiral of death), ms.
const MAX_ACCUMULATOR: f64 = 250.0;
/// How often to log simulation stats (simulated ms).
const STATS_LOG_INTERVAL: f64 = 5_000.0;
/// How often an idle lured fish is sent back after the lure (simulated ms).
const LURE_INTERVAL: f64 = 3_000.0;
/// Seconds for the lure to circle the tank once.
const LURE_PERIOD: f64 = 20.0;

/// Headless fish tank.
#[derive(Parser, Debug)]
#[command(name = "fishbowl", version, about)]
pub struct Args {
    /// TOML config; missing keys keep their defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of ticks to run.
    #[arg(short, long, default_value_t = 3_600)]
    ticks: u64,

    /// Simulated milliseconds per tick.
    #[arg(long, default_value_t = TICK_MS)]
    tick_ms: f64,

    /// Seed for a reproducible run.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Override the number of fish.
    #[arg(long)]
    fish: Option<usize>,

    /// Override the number of plants.
    #[arg(long)]
    plants: Option<usize>,

    /// Drag a lure around the tank for the first fish to chase.
    #[arg(long)]
    lure: bool,

    /// Pace ticks against the wall clock instead of running flat out.
    #[arg(long)]
    realtime: bool,

    /// Print the effective config as TOML and exit.
    #[arg(long)]
    print_config: bool,
}

impl Args {
    fn sim_config(&self) -> Result<SimConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => SimConfig::load(path)?,
            None => SimConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.world.seed = Some(seed);
        }
        if let Some(fish) = self.fish {
            config.world.fish_count = fish;
        }
        if let Some(plants) = self.plants {
            config.world.plant_count = plants;
        }
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Lure
// ---------------------------------------------------------------------------

/// A point circling the tank, shared with the chasing fish's pursuit target.
struct Lure {
    point: Arc<Mutex<Vec2>>,
    fish: hecs::Entity,
    center: Vec2,
    radius: Vec2,
    since_nudge: f64,
}

impl Lure {
    fn new(fish: hecs::Entity, config: &SimConfig) -> Self {
        let size = Vec2::new(config.world.width, config.world.height);
        Self {
            point: Arc::new(Mutex::new(size * 0.5)),
            fish,
            center: size * 0.5,
            radius: size * 0.35,
            since_nudge: LURE_INTERVAL,
        }
    }

    fn target(&self) -> TrackTarget {
        let point = Arc::clone(&self.point);
        TrackTarget::dynamic(move || *point.lock().unwrap_or_else(|e| e.into_inner()))
    }

    /// Move the lure along its orbit and re-bait the fish if it has wandered
    /// off to explore.
    fn update(&mut self, sim: &mut Simulation, elapsed_ms: f64, dt: f64) {
        let t = (elapsed_ms / 1000.0 / LURE_PERIOD * std::f64::consts::TAU) as f32;
        let at = self.center + self.radius * Vec2::new(t.cos(), (2.0 * t).sin());
        *self.point.lock().unwrap_or_else(|e| e.into_inner()) = at;

        self.since_nudge += dt;
        if self.since_nudge < LURE_INTERVAL {
            return;
        }
        self.since_nudge = 0.0;

        let exploring = sim
            .registry()
            .get::<Fish>(self.fish)
            .is_some_and(|f| f.behavior() == Some(BehaviorName::Explore));
        if exploring {
            match sim.lure(self.fish, self.target()) {
                Ok(true) => log::debug!("lure at {at} caught {:?}'s eye", self.fish),
                Ok(false) => log::warn!("lured fish {:?} is gone", self.fish),
                Err(e) => log::warn!("could not lure {:?}: {e}", self.fish),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// Top-level driver state.
struct App {
    sim: Simulation,
    lure: Option<Lure>,

    // Fixed timestep
    tick_ms: f64,
    accumulator: f64,
    elapsed_ms: f64,
    target_ticks: u64,

    // Tick timing
    tick_stats: TickStats,
    since_stats_log: f64,
}

impl App {
    fn new(args: &Args) -> Result<Self, Box<dyn std::error::Error>> {
        if args.tick_ms <= 0.0 || !args.tick_ms.is_finite() {
            return Err(format!("--tick-ms must be positive, got {}", args.tick_ms).into());
        }

        let config = args.sim_config()?;
        let mut sim = Simulation::new(config)?;
        sim.populate()?;
        log::info!("seed {}", sim.seed());

        let lure = if args.lure {
            let first = sim.registry().world().query::<&Fish>().iter().map(|(e, _)| e).next();
            match first {
                Some(fish) => Some(Lure::new(fish, &config)),
                None => {
                    log::warn!("--lure given but there are no fish");
                    None
                }
            }
        } else {
            None
        };

        Ok(Self {
            sim,
            lure,
            tick_ms: args.tick_ms,
            accumulator: 0.0,
            elapsed_ms: 0.0,
            target_ticks: args.ticks,
            tick_stats: TickStats::new(),
            since_stats_log: 0.0,
        })
    }

    fn finished(&self) -> bool {
        self.sim.tick_count() >= self.target_ticks
    }

    /// Run fixed-timestep simulation ticks for `dt` ms of wall time.
    fn run_fixed_update(&mut self, dt: f64) {
        self.accumulator += dt;

        let cap = MAX_ACCUMULATOR.max(self.tick_ms);
        if self.accumulator > cap {
            self.accumulator = cap;
        }

        while self.accumulator >= self.tick_ms && !self.finished() {
            self.step();
            self.accumulator -= self.tick_ms;
        }
    }

    fn step(&mut self) {
        if let Some(lure) = self.lure.as_mut() {
            lure.update(&mut self.sim, self.elapsed_ms, self.tick_ms);
        }

        let started = Instant::now();
        let report = self.sim.tick(self.tick_ms as f32);
        let cost = started.elapsed().as_secs_f64();
        self.elapsed_ms += self.tick_ms;

        if report.bites > 0 {
            log::trace!("tick {}: {} bites", self.sim.tick_count(), report.bites);
        }

        if self.tick_stats.record_tick(cost, self.tick_ms / 1000.0) {
            log::info!("timers: {}", self.sim.timers().summary());
        }

        self.since_stats_log += self.tick_ms;
        if self.since_stats_log >= STATS_LOG_INTERVAL {
            self.since_stats_log = 0.0;
            log::info!("{}", self.sim.stats());
        }
    }

    fn run(&mut self, realtime: bool) {
        if !realtime {
            while !self.finished() {
                self.run_fixed_update(self.tick_ms);
            }
            return;
        }

        let pace = Duration::from_secs_f64(self.tick_ms / 1000.0);
        let mut last_frame_time = Instant::now();
        while !self.finished() {
            std::thread::sleep(pace);
            let now = Instant::now();
            let dt = now.duration_since(last_frame_time).as_secs_f64() * 1000.0;
            last_frame_time = now;
            self.run_fixed_update(dt);
        }
    }
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.print_config {
        print!("{}", toml::to_string_pretty(&args.sim_config()?)?);
        return Ok(());
    }

    let mut app = App::new(&args)?;
    app.run(args.realtime);

    log::info!(
        "done after {} ticks ({:.1}s simulated): {}",
        app.sim.tick_count(),
        app.elapsed_ms / 1000.0,
        app.sim.stats(),
    );
    Ok(())
}
