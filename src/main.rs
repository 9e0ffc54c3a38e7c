//! Arena Shooter headless runner
//!
//! Drives the simulation with a scripted input pattern, logs the scoreboard,
//! and optionally resumes from or writes a save.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::{Parser, ValueEnum};
    use glam::Vec2;

    use arena_shooter::logging;
    use arena_shooter::persistence::{self, SaveFormat};
    use arena_shooter::renderer::FrameSnapshot;
    use arena_shooter::sim::{GameState, StepOutcome, TickInput, tick};
    use arena_shooter::tuning::Tuning;

    /// Save format selector
    #[derive(Debug, Clone, Copy, ValueEnum)]
    enum Format {
        /// Whitespace-separated text records
        Legacy,
        /// Versioned JSON
        Json,
    }

    impl From<Format> for SaveFormat {
        fn from(format: Format) -> Self {
            match format {
                Format::Legacy => SaveFormat::Legacy,
                Format::Json => SaveFormat::Envelope,
            }
        }
    }

    /// Headless arena simulation
    #[derive(Parser)]
    #[command(author, version, about, long_about = None)]
    struct Args {
        /// Run seed
        #[arg(long, default_value_t = 1)]
        seed: u64,

        /// Number of frames to simulate
        #[arg(long, default_value_t = 600)]
        frames: u32,

        /// Wall-clock seconds per frame
        #[arg(long, default_value_t = 1.0 / 60.0)]
        frame_time: f32,

        /// Tuning overrides (JSON)
        #[arg(long)]
        tuning: Option<PathBuf>,

        /// Resume from a save
        #[arg(long)]
        load: Option<PathBuf>,

        /// Write a save when the run ends
        #[arg(long)]
        save: Option<PathBuf>,

        /// Save format for --load and --save
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,

        /// Hold fast-forward for the whole run
        #[arg(long)]
        fast_forward: bool,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    }

    /// Deterministic input script: turn slowly, walk, keep both triggers busy
    fn scripted_input(frame: u32, fast_forward: bool) -> TickInput {
        TickInput {
            move_axis: Vec2::new(0.0, if frame % 240 < 120 { 1.0 } else { -1.0 }),
            look_delta: Vec2::new(2.0, 0.0),
            fire_primary: true,
            fire_secondary: frame % 120 == 0,
            fast_forward,
            slow_motion: false,
        }
    }

    pub fn run() -> Result<()> {
        let args = Args::parse();
        logging::init(args.verbose);

        let tuning = match &args.tuning {
            Some(path) => Tuning::load(path)
                .with_context(|| format!("loading tuning from {}", path.display()))?,
            None => Tuning::default(),
        };

        let format = SaveFormat::from(args.format);
        let mut state = match &args.load {
            Some(path) => persistence::load_from_file(path, format, args.seed, tuning)
                .with_context(|| format!("loading save {}", path.display()))?,
            None => GameState::with_tuning(args.seed, tuning)?,
        };

        log::info!("Arena Shooter starting: seed {}, {} frames", state.seed, args.frames);

        for frame in 0..args.frames {
            let input = scripted_input(frame, args.fast_forward);
            let outcome = tick(&mut state, &input, args.frame_time);

            if frame % 60 == 0 {
                let board = state.scoreboard();
                log::info!(
                    "t={:.1}s hp={:.1} kills={} targets={}",
                    state.now(),
                    board.player_hp,
                    board.kills,
                    board.hostiles
                );
            }
            if outcome == StepOutcome::GameOver {
                break;
            }
        }

        let frame = FrameSnapshot::capture(&state);
        log::info!(
            "Final frame: {} instances ({} bytes), kills {}",
            frame.instances.len(),
            frame.instance_bytes().len(),
            frame.scoreboard.kills
        );

        if let Some(path) = &args.save {
            persistence::save_to_file(&state, path, format)
                .with_context(|| format!("writing save {}", path.display()))?;
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is embedded by a host renderer on the web; there is no runner
}
