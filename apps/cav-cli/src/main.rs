mod error;
mod output;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use cav_core::Phasor;
use cav_model::Cavity;
use cav_sim::{BeamSchedule, DriveSchedule, RunOptions};

use crate::error::CliResult;

#[derive(Parser)]
#[command(name = "cav-cli")]
#[command(about = "RF cavity electrical model simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a cavity definition file
    Validate {
        /// Path to the cavity YAML or JSON file
        cavity_path: PathBuf,
    },
    /// List the modes of a cavity with their derived coefficients
    Modes {
        /// Path to the cavity YAML or JSON file
        cavity_path: PathBuf,
    },
    /// Run a fixed-step simulation from a fresh state
    Run {
        /// Path to the cavity YAML or JSON file
        cavity_path: PathBuf,
        /// Number of steps
        #[arg(long)]
        steps: usize,
        /// Forward drive, real part
        #[arg(long, default_value_t = 1.0)]
        drive_re: f64,
        /// Forward drive, imaginary part
        #[arg(long, default_value_t = 0.0)]
        drive_im: f64,
        /// Switch the drive on at this step
        #[arg(long, default_value_t = 0)]
        drive_on: usize,
        /// Switch the drive off at this step (decay measurement)
        #[arg(long, conflicts_with = "drive_on")]
        drive_off: Option<usize>,
        /// Beam charge per step (pC)
        #[arg(long, default_value_t = 0.0)]
        beam: f64,
        /// Bunch arrival offset (s)
        #[arg(long, default_value_t = 0.0)]
        beam_delay: f64,
        /// Record every N-th step
        #[arg(long, default_value_t = 1)]
        every: usize,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Report wall-clock run time
        #[arg(long)]
        timing: bool,
    },
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { cavity_path } => cmd_validate(&cavity_path),
        Commands::Modes { cavity_path } => cmd_modes(&cavity_path),
        Commands::Run {
            cavity_path,
            steps,
            drive_re,
            drive_im,
            drive_on,
            drive_off,
            beam,
            beam_delay,
            every,
            output,
            timing,
        } => {
            let amplitude = Phasor::new(drive_re, drive_im);
            let drive = match drive_off {
                Some(off_step) => DriveSchedule::Pulse {
                    off_step,
                    amplitude,
                },
                None if drive_on > 0 => DriveSchedule::Step {
                    on_step: drive_on,
                    amplitude,
                },
                None => DriveSchedule::Constant(amplitude),
            };
            let beam = if beam == 0.0 {
                BeamSchedule::Off
            } else {
                BeamSchedule::Constant {
                    charge: beam,
                    delta_tz: beam_delay,
                }
            };
            let opts = RunOptions {
                steps,
                record_every: every,
                tstep: None,
            };
            cmd_run(&cavity_path, &opts, &drive, &beam, output.as_deref(), timing)
        }
    };

    if let Err(err) = &result {
        tracing::error!("command failed: {err}");
    }
    result
}

/// Filter from `RUST_LOG`-style directives, `info` when unset or invalid.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn load_cavity(cavity_path: &Path) -> CliResult<(cav_project::CavityDef, Cavity)> {
    let def = cav_project::load(cavity_path)?;
    let cavity = cav_project::build_cavity(&def)?;
    Ok((def, cavity))
}

fn cmd_validate(cavity_path: &Path) -> CliResult<()> {
    println!("Validating cavity: {}", cavity_path.display());
    let (def, cavity) = load_cavity(cavity_path)?;
    println!("✓ Cavity '{}' is valid ({} modes)", def.name, cavity.n_modes());
    Ok(())
}

fn cmd_modes(cavity_path: &Path) -> CliResult<()> {
    let (def, cavity) = load_cavity(cavity_path)?;

    if cavity.n_modes() == 0 {
        println!("No modes in cavity '{}'", def.name);
        return Ok(());
    }

    println!("Modes of cavity '{}':", def.name);
    for (index, (mode_def, mode)) in def.modes.iter().zip(cavity.modes()).enumerate() {
        let marker = if index == def.fundamental_index { "*" } else { " " };
        println!("{marker} [{index}] {}", mode_def.id);
        println!("      Q_L       = {:.4e}", mode.loaded_q());
        println!("      omega_f   = {:.4e} rad/s", mode.omega_f());
        println!("      omega_d_0 = {:.4e} rad/s", mode.omega_d_0());
        println!("      k_drive   = {:.4e}", mode.k_drive());
        println!("      k_beam    = {}", output::fmt_phasor(mode.k_beam()));
        println!("      k_probe   = {}", output::fmt_phasor(mode.k_probe()));
        println!("      k_em      = {}", output::fmt_phasor(mode.k_em()));
        for (i, (a, c)) in mode.a().iter().zip(mode.c()).enumerate() {
            println!("      mech[{i}]   A = {a:.4e}  C = {c:.4e}");
        }
    }
    Ok(())
}

fn cmd_run(
    cavity_path: &Path,
    opts: &RunOptions,
    drive: &DriveSchedule,
    beam: &BeamSchedule,
    output: Option<&Path>,
    timing: bool,
) -> CliResult<()> {
    if timing {
        cav_core::timing::enable_timing();
    }

    let (def, cavity) = load_cavity(cavity_path)?;
    let opts = RunOptions {
        tstep: Some(def.tstep_s),
        ..opts.clone()
    };
    let record = cav_sim::run(&cavity, &opts, drive, beam)?;
    let csv = output::samples_csv(&record.samples);

    if let Some(path) = output {
        std::fs::write(path, csv)?;
        println!(
            "✓ Exported {} samples to {}",
            record.samples.len(),
            path.display()
        );
        if let Some(last) = record.last() {
            println!(
                "  Final |V| = {:.6e} V at t = {:.6e} s",
                last.v.norm(),
                last.t
            );
        }
    } else {
        print!("{csv}");
    }

    if let Some(elapsed) = record.elapsed_s {
        eprintln!("Run time: {:.3} ms", elapsed * 1e3);
    }
    if let Some(stats) = record.step_stats {
        eprintln!(
            "Step cost: mean {:.1} ns, max {:.1} ns over {} steps",
            stats.mean_seconds() * 1e9,
            stats.max_seconds() * 1e9,
            stats.count()
        );
    }

    Ok(())
}
