//! Simulation runner and result recording.

use cav_core::Phasor;
use cav_core::timing::{StepStats, Timer};
use cav_model::{Cavity, CavityState, StepInput};
use tracing::info;

use crate::detuning::{DetuningModel, NoDetuning};
use crate::error::{SimError, SimResult};
use crate::schedule::{BeamSchedule, DriveSchedule};

/// Options for simulation runs.
#[derive(Clone, Debug)]
pub struct RunOptions {
    /// Number of steps to run
    pub steps: usize,
    /// Record every N-th step (decimation)
    pub record_every: usize,
    /// Sample spacing (s) for the recorded time axis. Defaults to the
    /// fundamental mode's time step.
    pub tstep: Option<f64>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            steps: 1000,
            record_every: 1,
            tstep: None,
        }
    }
}

/// Cavity observables after one step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    /// Number of completed steps.
    pub step: usize,
    /// Simulation time (s).
    pub t: f64,
    pub v: Phasor,
    pub e_probe: Phasor,
    pub e_reverse: Phasor,
    pub kg: Phasor,
}

impl Sample {
    fn capture(step: usize, tstep: f64, state: &CavityState<'_>) -> Self {
        Self {
            step,
            t: step as f64 * tstep,
            v: state.v(),
            e_probe: state.e_probe(),
            e_reverse: state.e_reverse(),
            kg: state.kg(),
        }
    }
}

/// Record of simulation results.
#[derive(Clone, Debug, Default)]
pub struct RunRecord {
    pub samples: Vec<Sample>,
    /// Wall-clock run time when timing is enabled.
    pub elapsed_s: Option<f64>,
    /// Cost of the individual cavity steps when timing is enabled.
    pub step_stats: Option<StepStats>,
}

impl RunRecord {
    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }
}

/// Run `cavity` from a fresh state with no detuning perturbation.
pub fn run(
    cavity: &Cavity,
    opts: &RunOptions,
    drive: &DriveSchedule,
    beam: &BeamSchedule,
) -> SimResult<RunRecord> {
    run_with_detuning(cavity, opts, drive, beam, &mut NoDetuning)
}

/// Run `cavity` from a fresh state, asking `detuning` for the perturbation
/// of every step after the first.
pub fn run_with_detuning<D: DetuningModel>(
    cavity: &Cavity,
    opts: &RunOptions,
    drive: &DriveSchedule,
    beam: &BeamSchedule,
    detuning: &mut D,
) -> SimResult<RunRecord> {
    if opts.steps == 0 {
        return Err(SimError::InvalidArg {
            what: "steps must be positive",
        });
    }
    if opts.record_every == 0 {
        return Err(SimError::InvalidArg {
            what: "record_every must be positive",
        });
    }

    if let Some(tstep) = opts.tstep
        && !(tstep.is_finite() && tstep > 0.0)
    {
        return Err(SimError::InvalidArg {
            what: "tstep must be positive and finite",
        });
    }

    let timer = Timer::start();
    let mut stats = timer.is_running().then(StepStats::default);
    let tstep = opts
        .tstep
        .or_else(|| cavity.fundamental().map(|m| m.tstep()))
        .unwrap_or(0.0);
    info!(
        steps = opts.steps,
        n_modes = cavity.n_modes(),
        tstep,
        "starting cavity run"
    );

    let mut state = cavity.new_state();
    let mut delta_omega = vec![0.0; cavity.n_modes()];
    let mut samples = vec![Sample::capture(0, tstep, &state)];

    for step in 0..opts.steps {
        let (charge, delta_tz) = beam.at(step);
        let input = StepInput::new(delta_tz, drive.at(step), charge)
            .with_detuning(&delta_omega);
        let step_timer = Timer::start_if(stats.is_some());
        cavity
            .step(&input, &mut state)
            .map_err(|source| SimError::Step { step, source })?;
        if let (Some(stats), Some(dt)) = (stats.as_mut(), step_timer.stop()) {
            stats.record(dt);
        }

        detuning.update(step, cavity, &state, &mut delta_omega);

        let done = step + 1;
        if done % opts.record_every == 0 || done == opts.steps {
            samples.push(Sample::capture(done, tstep, &state));
        }
    }

    let elapsed_s = timer.stop();
    if let Some(last) = samples.last() {
        info!(
            samples = samples.len(),
            v_final = last.v.norm(),
            "cavity run finished"
        );
    }

    Ok(RunRecord {
        samples,
        elapsed_s,
        step_stats: stats,
    })
}
