//! Collage assembly loop
//!
//! One attempt is a small state machine: a canvas is `Filling` while any
//! pixel is uncovered and `Complete` afterwards. Each step moves the canvas
//! through [`Assembler::step`] and hands it back, so no state outlives the
//! attempt except the patch pool and the random source. Completed canvases
//! go to a [`CollageSink`] and a fresh canvas starts, until the
//! [`StopCondition`] says otherwise.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use rand::Rng;

use crate::algorithm::compositor::composite;
use crate::algorithm::placement::PlacementPolicy;
use crate::io::configuration::{CANVAS_COLS, CANVAS_ROWS};
use crate::io::error::{CollageError, Result, invalid_parameter};
use crate::spatial::canvas::Canvas;
use crate::spatial::patch::PatchPool;
use crate::spatial::raster::Channel;

/// Canvas size and placement rule for every attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AssemblyConfig {
    /// Canvas height
    pub rows: usize,
    /// Canvas width
    pub cols: usize,
    /// How sampled pixels become compositing centers
    pub policy: PlacementPolicy,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            rows: CANVAS_ROWS,
            cols: CANVAS_COLS,
            policy: PlacementPolicy::default(),
        }
    }
}

/// Progress of one assembly attempt
#[derive(Debug, Clone)]
pub enum Attempt<T> {
    /// At least one canvas pixel is uncovered
    Filling(Canvas<T>),
    /// Every canvas pixel is covered
    Complete(Canvas<T>),
}

impl<T: Channel> Attempt<T> {
    /// Start an attempt on an empty `rows x cols` canvas
    pub fn start(rows: usize, cols: usize) -> Self {
        Self::classify(Canvas::new(rows, cols))
    }

    /// Place a canvas in the state matching its coverage
    pub fn classify(canvas: Canvas<T>) -> Self {
        if canvas.is_complete() {
            Self::Complete(canvas)
        } else {
            Self::Filling(canvas)
        }
    }

    /// Canvas in either state
    pub const fn canvas(&self) -> &Canvas<T> {
        match self {
            Self::Filling(canvas) | Self::Complete(canvas) => canvas,
        }
    }

    /// True in the `Complete` state
    pub const fn is_complete(&self) -> bool {
        matches!(self, Self::Complete(_))
    }

    /// Take the canvas out of the state
    pub fn into_canvas(self) -> Canvas<T> {
        match self {
            Self::Filling(canvas) | Self::Complete(canvas) => canvas,
        }
    }
}

/// What one step did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepReport {
    /// Pool index of the pasted patch
    pub patch_index: usize,
    /// Uncovered pixel sampled for this step
    pub target: [usize; 2],
    /// Center handed to the compositor
    pub center: [i64; 2],
    /// Pixels that became covered
    pub newly_covered: usize,
    /// Pixels still uncovered after the step
    pub remaining: usize,
}

/// Why a run or an attempt stopped
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The configured number of collages was produced
    AttemptLimit,
    /// The wall-clock budget ran out
    TimeLimit,
    /// The cancellation flag was raised
    Cancelled,
}

/// External stop criteria, checked before every step and between attempts
#[derive(Clone, Debug, Default)]
pub struct StopCondition {
    max_attempts: Option<usize>,
    deadline: Option<Instant>,
    cancelled: Arc<AtomicBool>,
}

impl StopCondition {
    /// Never stop on its own
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Stop after `attempts` completed collages
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    /// Stop once `budget` has elapsed from now
    #[must_use]
    pub fn with_time_limit(mut self, budget: Duration) -> Self {
        self.deadline = Instant::now().checked_add(budget);
        self
    }

    /// Shared flag; storing `true` stops the run at the next check
    pub fn cancellation_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    /// Raise the cancellation flag
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Check the criteria that may interrupt an attempt in progress
    pub fn interrupt(&self) -> Option<StopReason> {
        if self.cancelled.load(Ordering::Relaxed) {
            return Some(StopReason::Cancelled);
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Some(StopReason::TimeLimit);
        }
        None
    }

    /// Check every criterion given the number of collages produced so far
    pub fn check(&self, completed_attempts: usize) -> Option<StopReason> {
        if self
            .max_attempts
            .is_some_and(|limit| completed_attempts >= limit)
        {
            return Some(StopReason::AttemptLimit);
        }
        self.interrupt()
    }
}

/// Receives assembly events, for progress display
pub trait AssemblyObserver<T> {
    /// A new attempt begins; `attempt` counts from 1
    fn attempt_started(&mut self, _attempt: usize, _canvas: &Canvas<T>) {}

    /// One compositing step finished
    fn step_completed(&mut self, _report: &StepReport, _canvas: &Canvas<T>) {}

    /// The canvas of `attempt` is fully covered
    fn attempt_completed(&mut self, _attempt: usize, _steps: usize) {}
}

/// Observer that ignores every event
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl<T> AssemblyObserver<T> for NoopObserver {}

/// Destination of finished collages
pub trait CollageSink<T> {
    /// Persist or display one completed canvas
    ///
    /// # Errors
    ///
    /// Implementations report environment failures; the run logs them and
    /// continues with the next attempt.
    fn deliver(&mut self, attempt: usize, canvas: &Canvas<T>) -> Result<()>;
}

/// Result of a single attempt
#[derive(Debug, Clone)]
pub enum AttemptOutcome<T> {
    /// The canvas was fully covered after `steps` steps
    Completed {
        /// Finished canvas
        canvas: Canvas<T>,
        /// Number of compositing steps taken
        steps: usize,
    },
    /// The stop condition fired before completion
    Interrupted {
        /// Partially covered canvas
        canvas: Canvas<T>,
        /// Criterion that fired
        reason: StopReason,
    },
}

/// Summary of a whole run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunReport {
    /// Collages that reached full coverage
    pub completed_attempts: usize,
    /// Completed collages the sink failed to deliver
    pub delivery_failures: usize,
    /// Compositing steps across all attempts
    pub total_steps: usize,
    /// Criterion that ended the run
    pub stop_reason: StopReason,
}

/// Drives patches from a pool onto successive canvases
pub struct Assembler<'a, T, R> {
    pool: &'a PatchPool<T>,
    config: AssemblyConfig,
    rng: R,
}

impl<'a, T: Channel, R: Rng> Assembler<'a, T, R> {
    /// Create an assembler over a non-empty pool
    ///
    /// # Errors
    ///
    /// Returns `EmptyPatchPool` if the pool has no patch and
    /// `InvalidParameter` for a canvas with a zero dimension.
    pub fn new(pool: &'a PatchPool<T>, config: AssemblyConfig, rng: R) -> Result<Self> {
        if pool.is_empty() {
            return Err(CollageError::EmptyPatchPool);
        }
        if config.rows == 0 || config.cols == 0 {
            return Err(invalid_parameter(
                "canvas",
                &format!("{}x{}", config.rows, config.cols),
                &"canvas dimensions must be positive",
            ));
        }
        Ok(Self { pool, config, rng })
    }

    /// Active configuration
    pub const fn config(&self) -> &AssemblyConfig {
        &self.config
    }

    /// Fresh attempt on an empty canvas of the configured size
    pub fn start_attempt(&self) -> Attempt<T> {
        Attempt::start(self.config.rows, self.config.cols)
    }

    /// Perform one transition of the attempt state machine
    ///
    /// A `Filling` attempt gets one patch composited and is reclassified; a
    /// `Complete` attempt is returned unchanged with no report.
    pub fn step(&mut self, attempt: Attempt<T>) -> (Attempt<T>, Option<StepReport>) {
        let mut canvas = match attempt {
            Attempt::Complete(canvas) => return (Attempt::Complete(canvas), None),
            Attempt::Filling(canvas) => canvas,
        };

        let Some(placement) = self.config.policy.choose(&canvas, self.pool, &mut self.rng) else {
            return (Attempt::classify(canvas), None);
        };
        let Some(patch) = self.pool.get(placement.patch_index) else {
            return (Attempt::classify(canvas), None);
        };

        debug!(
            "Pasting patch {} at [{}, {}]",
            placement.patch_index, placement.target[0], placement.target[1]
        );
        let newly_covered = composite(&mut canvas, patch, placement.center);
        let report = StepReport {
            patch_index: placement.patch_index,
            target: placement.target,
            center: placement.center,
            newly_covered,
            remaining: canvas.uncovered_count(),
        };

        (Attempt::classify(canvas), Some(report))
    }

    /// Step a fresh canvas until it is complete or `stop` interrupts
    pub fn run_attempt<O>(&mut self, attempt: usize, stop: &StopCondition, observer: &mut O) -> AttemptOutcome<T>
    where
        O: AssemblyObserver<T> + ?Sized,
    {
        let mut state = self.start_attempt();
        observer.attempt_started(attempt, state.canvas());
        let mut steps = 0;

        loop {
            if state.is_complete() {
                observer.attempt_completed(attempt, steps);
                return AttemptOutcome::Completed {
                    canvas: state.into_canvas(),
                    steps,
                };
            }
            if let Some(reason) = stop.interrupt() {
                return AttemptOutcome::Interrupted {
                    canvas: state.into_canvas(),
                    reason,
                };
            }

            let (next, report) = self.step(state);
            state = next;
            if let Some(report) = report {
                steps += 1;
                observer.step_completed(&report, state.canvas());
            }
        }
    }

    /// Produce collages until `stop` fires, delivering each to `sink`
    ///
    /// With an unbounded stop condition this only returns through
    /// cancellation. Delivery failures are logged and counted; they never
    /// end the run.
    pub fn run<S, O>(&mut self, stop: &StopCondition, sink: &mut S, observer: &mut O) -> RunReport
    where
        S: CollageSink<T> + ?Sized,
        O: AssemblyObserver<T> + ?Sized,
    {
        let mut completed_attempts = 0;
        let mut delivery_failures = 0;
        let mut total_steps = 0;

        let stop_reason = loop {
            if let Some(reason) = stop.check(completed_attempts) {
                break reason;
            }

            match self.run_attempt(completed_attempts + 1, stop, observer) {
                AttemptOutcome::Completed { canvas, steps } => {
                    completed_attempts += 1;
                    total_steps += steps;
                    info!("Collage {completed_attempts} complete after {steps} placements");
                    if let Err(error) = sink.deliver(completed_attempts, &canvas) {
                        delivery_failures += 1;
                        warn!("Collage {completed_attempts} could not be delivered: {error}");
                    }
                }
                AttemptOutcome::Interrupted { canvas, reason } => {
                    info!(
                        "Collage {} interrupted with {} of {} pixels covered",
                        completed_attempts + 1,
                        canvas.covered_count(),
                        canvas.area()
                    );
                    break reason;
                }
            }
        };

        RunReport {
            completed_attempts,
            delivery_failures,
            total_steps,
            stop_reason,
        }
    }
}
