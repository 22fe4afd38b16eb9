use std::cell::Cell;
use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use super::input::Input;
use super::resources::Resources;
use super::surface::DrawSurface;
use super::ui::UiOverlay;
use super::world::{World, WorldContext, WorldManager};

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub target_sps: u32,
    pub max_iteration_delta: Duration,
    pub max_steps_per_iteration: u32,
    pub metrics_log_interval: Duration,
    /// Stop after this many loop iterations. `None` runs until a world quits.
    pub max_iterations: Option<u64>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            target_sps: 60,
            max_iteration_delta: Duration::from_millis(250),
            max_steps_per_iteration: 5,
            metrics_log_interval: Duration::from_secs(1),
            max_iterations: None,
        }
    }
}

/// Loop rates observed over one publish interval. `backlog_dropped_ms` is
/// simulation time the step clamp discarded during the interval; a nonzero
/// value means the machine is not keeping up with `target_sps`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoopMetrics {
    pub steps_per_sec: f32,
    pub draws_per_sec: f32,
    pub backlog_dropped_ms: f32,
}

/// Shared handle onto the most recently published [`LoopMetrics`]. The loop
/// is single threaded, so a `Cell` suffices; HUD elements keep a clone and
/// read it while drawing.
#[derive(Clone, Debug, Default)]
pub struct MetricsHandle {
    latest: Rc<Cell<LoopMetrics>>,
}

impl MetricsHandle {
    pub fn latest(&self) -> LoopMetrics {
        self.latest.get()
    }

    pub(crate) fn publish(&self, metrics: LoopMetrics) {
        self.latest.set(metrics);
    }
}

/// Tallies loop activity between publishes.
#[derive(Debug)]
struct MetricsWindow {
    opened_at: Instant,
    interval: Duration,
    steps: u32,
    draws: u32,
    backlog_dropped: Duration,
}

impl MetricsWindow {
    fn new(interval: Duration) -> Self {
        Self {
            opened_at: Instant::now(),
            interval,
            steps: 0,
            draws: 0,
            backlog_dropped: Duration::ZERO,
        }
    }

    /// Records one loop iteration: the steps it ran and any backlog the
    /// clamp discarded. Every iteration draws exactly once.
    fn record(&mut self, steps_run: u32, backlog_dropped: Duration) {
        self.steps = self.steps.saturating_add(steps_run);
        self.draws = self.draws.saturating_add(1);
        self.backlog_dropped = self.backlog_dropped.saturating_add(backlog_dropped);
    }

    fn publish_due(&mut self, now: Instant) -> Option<LoopMetrics> {
        let elapsed = now.saturating_duration_since(self.opened_at);
        if elapsed < self.interval {
            return None;
        }

        let seconds = elapsed.as_secs_f32().max(f32::EPSILON);
        let metrics = LoopMetrics {
            steps_per_sec: self.steps as f32 / seconds,
            draws_per_sec: self.draws as f32 / seconds,
            backlog_dropped_ms: self.backlog_dropped.as_secs_f32() * 1000.0,
        };

        self.opened_at = now;
        self.steps = 0;
        self.draws = 0;
        self.backlog_dropped = Duration::ZERO;

        Some(metrics)
    }
}

/// The engine services threaded through every world step.
pub struct Services {
    pub input: Input,
    pub resources: Resources,
    pub ui: UiOverlay,
    pub surface: DrawSurface,
    pub metrics: MetricsHandle,
}

impl Services {
    pub fn new(resources: Resources) -> Self {
        Self {
            input: Input::new(),
            resources,
            ui: UiOverlay::new(),
            surface: DrawSurface::new(),
            metrics: MetricsHandle::default(),
        }
    }

    pub fn context(&mut self) -> WorldContext<'_> {
        WorldContext {
            input: &mut self.input,
            resources: &mut self.resources,
            ui: &mut self.ui,
            metrics: &self.metrics,
        }
    }
}

/// Runs the fixed-timestep loop until a world requests quit or the configured
/// iteration cap is reached.
///
/// Each iteration accumulates wall-clock time, runs the planned number of
/// simulation steps at a fixed dt, records one presentation pass onto the
/// surface, then sleeps toward the step cadence. The sleep is drift-corrected:
/// the previous iteration's oversleep is subtracted from the next request so
/// the average rate holds even though `thread::sleep` overshoots.
pub fn run_loop(
    config: LoopConfig,
    services: &mut Services,
    manager: &mut WorldManager,
    initial: Box<dyn World>,
) -> u64 {
    let target_sps = config.target_sps.max(1);
    let fixed_dt = Duration::from_secs_f64(1.0 / target_sps as f64);
    let max_iteration_delta =
        normalize_non_zero_duration(config.max_iteration_delta, Duration::from_millis(250));
    let max_steps_per_iteration = config.max_steps_per_iteration.max(1);
    let metrics_log_interval =
        normalize_non_zero_duration(config.metrics_log_interval, Duration::from_secs(1));

    info!(
        target_sps,
        max_iteration_delta_ms = max_iteration_delta.as_millis() as u64,
        max_steps_per_iteration,
        metrics_log_interval_ms = metrics_log_interval.as_millis() as u64,
        "loop_config"
    );

    manager.transition(initial, &mut services.context());

    let mut accumulator = Duration::ZERO;
    let mut last_iteration_instant = Instant::now();
    let mut window = MetricsWindow::new(metrics_log_interval);
    let mut sleep_debt = Duration::ZERO;
    let mut step_count: u64 = 0;
    let mut iterations: u64 = 0;

    loop {
        let now = Instant::now();
        let raw_iteration_dt = now.saturating_duration_since(last_iteration_instant);
        last_iteration_instant = now;

        let clamped_dt = raw_iteration_dt.min(max_iteration_delta);
        accumulator = accumulator.saturating_add(clamped_dt);

        let plan = plan_sim_steps(accumulator, fixed_dt, max_steps_per_iteration);
        let mut quit = false;
        let mut steps_run = 0u32;
        for _ in 0..plan.steps_to_run {
            services.input.step();
            quit = manager.step(&mut services.context(), step_count);
            step_count = step_count.saturating_add(1);
            steps_run += 1;
            if quit {
                break;
            }
        }
        accumulator = plan.remaining_accumulator;

        if plan.dropped_backlog > Duration::ZERO {
            warn!(
                dropped_backlog_ms = plan.dropped_backlog.as_millis() as u64,
                max_steps_per_iteration, "sim_clamp_triggered"
            );
        }

        services.surface.clear();
        manager.draw(&mut services.surface);
        services.ui.step(step_count);
        services.ui.draw(&mut services.surface);
        window.record(steps_run, plan.dropped_backlog);

        if let Some(metrics) = window.publish_due(now) {
            services.metrics.publish(metrics);
            info!(
                steps_per_sec = metrics.steps_per_sec,
                draws_per_sec = metrics.draws_per_sec,
                backlog_dropped_ms = metrics.backlog_dropped_ms,
                world = manager.current_label().unwrap_or("<none>"),
                "loop_metrics"
            );
        }

        iterations = iterations.saturating_add(1);
        if quit {
            break;
        }
        if let Some(cap) = config.max_iterations {
            if iterations >= cap {
                info!(iterations, "iteration_cap_reached");
                break;
            }
        }

        let work_elapsed = Instant::now().saturating_duration_since(now);
        let intended_sleep = fixed_dt
            .saturating_sub(work_elapsed)
            .saturating_sub(sleep_debt);
        if intended_sleep > Duration::ZERO {
            let sleep_started = Instant::now();
            thread::sleep(intended_sleep);
            let actual_sleep = Instant::now().saturating_duration_since(sleep_started);
            sleep_debt = actual_sleep.saturating_sub(intended_sleep);
        } else {
            sleep_debt = Duration::ZERO;
        }
    }

    manager.shutdown(&mut services.context());
    info!(iterations, steps = step_count, "loop_finished");
    step_count
}

#[derive(Debug, Clone, Copy)]
struct StepPlan {
    steps_to_run: u32,
    remaining_accumulator: Duration,
    dropped_backlog: Duration,
}

/// Converts accumulated wall-clock time into whole simulation steps. Time
/// beyond `max_steps_per_iteration` worth of steps is discarded rather than
/// carried, so a long stall cannot trigger a catch-up spiral.
fn plan_sim_steps(
    accumulator: Duration,
    fixed_dt: Duration,
    max_steps_per_iteration: u32,
) -> StepPlan {
    let ready = accumulator.as_nanos() / fixed_dt.as_nanos().max(1);

    if ready > u128::from(max_steps_per_iteration) {
        StepPlan {
            steps_to_run: max_steps_per_iteration,
            remaining_accumulator: Duration::ZERO,
            dropped_backlog: accumulator.saturating_sub(fixed_dt * max_steps_per_iteration),
        }
    } else {
        let steps_to_run = ready as u32;
        StepPlan {
            steps_to_run,
            remaining_accumulator: accumulator.saturating_sub(fixed_dt * steps_to_run),
            dropped_backlog: Duration::ZERO,
        }
    }
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}
