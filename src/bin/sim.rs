//! Jump simulator - synthetic sensor feed generator
//!
//! Emits a full jump profile (ground, climb, exit, freefall, canopy,
//! landing) in the NDJSON feed format on stdout, with `wait` records pacing
//! the replay. Pipe into the engine:
//!
//!   cargo run --bin sim | cargo run --bin jumptrack -- --feed /dev/stdin
//!
//! Pressure values are derived from the target altitude profile by inverting
//! the hypsometric formula, so the engine's converter reproduces the profile.

use clap::Parser;
use jumptrack::io::SensorEvent;

/// Synthetic skydive sensor feed generator
#[derive(Parser, Debug)]
#[command(name = "sim", about = "Generate a synthetic jump sensor feed")]
struct Args {
    /// Exit altitude above ground, meters
    #[arg(long, default_value = "4000.0")]
    exit_altitude: f32,

    /// Aircraft climb rate, m/s
    #[arg(long, default_value = "8.0")]
    climb_rate: f32,

    /// Freefall descent rate, m/s
    #[arg(long, default_value = "55.0")]
    freefall_rate: f32,

    /// Canopy descent rate, m/s
    #[arg(long, default_value = "6.0")]
    canopy_rate: f32,

    /// Deployment altitude above ground, meters
    #[arg(long, default_value = "1200.0")]
    deploy_altitude: f32,

    /// Seconds between emitted sensor samples
    #[arg(long, default_value = "1.0")]
    sample_period: f32,

    /// Wall-clock milliseconds per simulated second (replay pacing)
    #[arg(long, default_value = "1000")]
    pace_ms: u64,

    /// Ground-level pressure, hPa
    #[arg(long, default_value = "1013.25")]
    ground_hpa: f32,
}

/// Invert the hypsometric formula: altitude above the simulated ground back
/// to a pressure reading the engine will convert to that altitude.
fn altitude_to_hpa(ground_hpa: f32, altitude_m: f32) -> f32 {
    let ground_offset_m = 44330.0 * (1.0 - (ground_hpa / 1013.25).powf(1.0 / 5.255));
    let absolute_m = ground_offset_m + altitude_m;
    1013.25 * (1.0 - absolute_m / 44330.0).powf(5.255)
}

struct Emitter {
    sim_clock_ms: u64,
    pace_ms: u64,
}

impl Emitter {
    fn emit(&self, event: &SensorEvent) {
        println!("{}", serde_json::to_string(event).expect("feed events serialize"));
    }

    /// One sensor sample pair plus pacing for `period_s` simulated seconds
    fn step(&mut self, args: &Args, altitude_m: f32, ground_speed_mps: f64, period_s: f32) {
        self.sim_clock_ms += (period_s * 1000.0) as u64;
        self.emit(&SensorEvent::Pressure { hpa: altitude_to_hpa(args.ground_hpa, altitude_m) });
        self.emit(&SensorEvent::Location {
            lat: 52.9200 + self.sim_clock_ms as f64 * 1e-7,
            lon: -1.3100 + self.sim_clock_ms as f64 * 5e-8,
            ground_speed_mps,
            ts: self.sim_clock_ms,
        });
        let wait = (period_s * self.pace_ms as f32) as u64;
        if wait > 0 {
            self.emit(&SensorEvent::Wait { ms: wait });
        }
    }
}

fn main() {
    let args = Args::parse();
    let period = args.sample_period;
    let mut emitter = Emitter { sim_clock_ms: 0, pace_ms: args.pace_ms };

    // Ground: walking pace for a bit
    let mut t = 0.0_f32;
    while t < 10.0 {
        emitter.step(&args, 0.0, 1.5, period);
        t += period;
    }

    // Climb to exit altitude at jump-run ground speed
    let mut altitude = 0.0_f32;
    while altitude < args.exit_altitude {
        altitude = (altitude + args.climb_rate * period).min(args.exit_altitude);
        emitter.step(&args, altitude, 40.0, period);
    }

    // Freefall to deployment: ground speed collapses
    while altitude > args.deploy_altitude {
        altitude = (altitude - args.freefall_rate * period).max(args.deploy_altitude);
        emitter.step(&args, altitude, 12.0, period);
    }

    // Canopy ride to the ground
    while altitude > 0.0 {
        altitude = (altitude - args.canopy_rate * period).max(0.0);
        emitter.step(&args, altitude, 5.0, period);
    }

    // Landed: a few quiet samples so the engine can settle
    let mut t = 0.0_f32;
    while t < 15.0 {
        emitter.step(&args, 0.0, 0.5, period);
        t += period;
    }
}
