// dispatcher.rs - Bounded parallel execution of comparison pairs

use crate::core::comparator::Comparator;
use crate::core::planner::ComparisonPair;
use crate::core::process::CancelToken;
use crate::error::{PaniError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// Bar currently drawn on the terminal, if any
static ACTIVE_BAR: Mutex<Option<ProgressBar>> = Mutex::new(None);

/// Run `f` with the active progress bar cleared from the terminal.
///
/// Anything printing to stderr during a run goes through here so its lines
/// do not land inside the bar.
pub fn suspend_progress<R>(f: impl FnOnce() -> R) -> R {
    let active = ACTIVE_BAR.lock().ok().and_then(|bar| bar.clone());
    match active {
        Some(bar) => bar.suspend(f),
        None => f(),
    }
}

/// Registers a bar as active until dropped
struct ActiveBarGuard;

impl ActiveBarGuard {
    fn register(bar: &ProgressBar) -> Option<Self> {
        if bar.is_hidden() {
            return None;
        }
        let mut slot = ACTIVE_BAR.lock().ok()?;
        *slot = Some(bar.clone());
        Some(ActiveBarGuard)
    }
}

impl Drop for ActiveBarGuard {
    fn drop(&mut self) {
        if let Ok(mut slot) = ACTIVE_BAR.lock() {
            *slot = None;
        }
    }
}

/// What to do when individual comparisons fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Abort on the first failure and cancel everything still running
    #[default]
    FailFast,
    /// Run every pair, report all failures, then abort
    CollectAll,
    /// Run every pair and keep going with empty cells for failures
    AllowPartial,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fail-fast" => Ok(FailurePolicy::FailFast),
            "collect-all" | "keep-going" => Ok(FailurePolicy::CollectAll),
            "allow-partial" | "partial" => Ok(FailurePolicy::AllowPartial),
            _ => Err(format!(
                "Invalid failure policy: {}. Use: fail-fast, collect-all, allow-partial",
                s
            )),
        }
    }
}

impl FailurePolicy {
    pub fn from_flags(keep_going: bool, allow_partial: bool) -> Self {
        if allow_partial {
            FailurePolicy::AllowPartial
        } else if keep_going {
            FailurePolicy::CollectAll
        } else {
            FailurePolicy::FailFast
        }
    }

    /// Level for logging a failure as soon as a worker hits it.
    ///
    /// Fail-fast hands the first failure back to the caller, which reports it,
    /// so nothing is logged from the worker.
    pub fn live_failure_level(&self) -> Option<log::Level> {
        match self {
            FailurePolicy::FailFast => None,
            FailurePolicy::CollectAll => Some(log::Level::Error),
            FailurePolicy::AllowPartial => Some(log::Level::Warn),
        }
    }

    pub fn description(&self) -> &str {
        match self {
            FailurePolicy::FailFast => "fail fast",
            FailurePolicy::CollectAll => "run all, then fail on errors",
            FailurePolicy::AllowPartial => "run all, allow partial matrix",
        }
    }
}

/// A pair together with its score or the reason it has none
#[derive(Debug)]
pub struct PairOutcome {
    pub pair: ComparisonPair,
    pub result: Result<f64>,
}

/// Completed / total counter shared with the workers
#[derive(Debug, Clone)]
pub struct Progress {
    completed: Arc<AtomicUsize>,
    total: usize,
}

impl Progress {
    fn new(total: usize) -> Self {
        Self {
            completed: Arc::new(AtomicUsize::new(0)),
            total,
        }
    }

    fn tick(&self) -> usize {
        self.completed.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> usize {
        self.total
    }
}

/// Dispatcher settings
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Maximum concurrent comparisons
    pub workers: usize,
    pub policy: FailurePolicy,
    pub show_progress: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            workers: 10,
            policy: FailurePolicy::FailFast,
            show_progress: false,
        }
    }
}

/// Runs comparison pairs on a fixed-size worker pool
pub struct Dispatcher<'a> {
    comparator: &'a dyn Comparator,
    config: DispatchConfig,
    cancel: CancelToken,
}

impl<'a> Dispatcher<'a> {
    pub fn new(comparator: &'a dyn Comparator, config: DispatchConfig) -> Self {
        Self {
            comparator,
            config,
            cancel: CancelToken::new(),
        }
    }

    /// Token tripped on fail-fast; also usable to abort a run from outside
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    fn progress_bar(&self, total: usize) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) ETA: {eta}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    }

    /// Compare every pair; slot `i` of the result always belongs to `pairs[i]`.
    pub fn run(&self, pairs: &[ComparisonPair]) -> Result<Vec<PairOutcome>> {
        self.run_with_progress(pairs, &Progress::new(pairs.len()))
    }

    fn run_with_progress(&self, pairs: &[ComparisonPair], progress: &Progress) -> Result<Vec<PairOutcome>> {
        let workers = self.config.workers.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("pani-worker-{}", i))
            .build()
            .map_err(|e| PaniError::InvalidConfig(format!("Failed to build worker pool: {}", e)))?;

        log::info!("Running {} comparisons on {} workers", pairs.len(), workers);
        let start = Instant::now();
        let pb = self.progress_bar(pairs.len());
        let _active = ActiveBarGuard::register(&pb);
        let fail_fast = self.config.policy == FailurePolicy::FailFast;
        let live_level = self.config.policy.live_failure_level();

        let outcomes: Vec<PairOutcome> = pool.install(|| {
            pairs
                .par_iter()
                .with_max_len(1)
                .map(|pair| {
                    let result = if self.cancel.is_cancelled() {
                        Err(PaniError::Cancelled)
                    } else {
                        self.comparator.compare(&pair.reference, &pair.query, &self.cancel)
                    };

                    if let Err(e) = &result {
                        if !e.is_cancelled() {
                            if let Some(level) = live_level {
                                log::log!(level, "{}", e);
                            }
                            if fail_fast {
                                self.cancel.cancel();
                            }
                        }
                    }

                    progress.tick();
                    pb.inc(1);
                    PairOutcome {
                        pair: pair.clone(),
                        result,
                    }
                })
                .collect()
        });

        pb.finish_and_clear();
        log::info!(
            "Finished {}/{} comparisons in {:.2}s",
            progress.completed(),
            progress.total(),
            start.elapsed().as_secs_f64()
        );
        Ok(outcomes)
    }

    /// Run and apply the failure policy.
    ///
    /// Returns outcomes that are all `Ok` unless the policy is `AllowPartial`.
    pub fn run_and_settle(&self, pairs: &[ComparisonPair]) -> Result<Vec<PairOutcome>> {
        let outcomes = self.run(pairs)?;
        settle(outcomes, self.config.policy)
    }
}

/// Apply `policy` to a finished run
pub fn settle(outcomes: Vec<PairOutcome>, policy: FailurePolicy) -> Result<Vec<PairOutcome>> {
    let total = outcomes.len();
    let failed = outcomes
        .iter()
        .filter(|o| matches!(&o.result, Err(e) if !e.is_cancelled()))
        .count();
    let cancelled = outcomes
        .iter()
        .filter(|o| matches!(&o.result, Err(e) if e.is_cancelled()))
        .count();

    if failed == 0 && cancelled == 0 {
        return Ok(outcomes);
    }

    match policy {
        FailurePolicy::FailFast => {
            if cancelled > 0 {
                log::warn!("Cancelled {} outstanding comparisons", cancelled);
            }
            // The first genuine failure in submission order is the one reported
            let first = outcomes
                .into_iter()
                .filter_map(|o| o.result.err())
                .find(|e| !e.is_cancelled());
            Err(first.unwrap_or(PaniError::Cancelled))
        }
        FailurePolicy::CollectAll => {
            report_failures(&outcomes, log::Level::Error);
            Err(PaniError::ComparisonsFailed {
                failed: failed + cancelled,
                total,
            })
        }
        FailurePolicy::AllowPartial => {
            report_failures(&outcomes, log::Level::Warn);
            log::warn!("{} of {} comparisons failed; their cells will be NA", failed + cancelled, total);
            Ok(outcomes)
        }
    }
}

fn report_failures(outcomes: &[PairOutcome], level: log::Level) {
    for outcome in outcomes {
        if let Err(e) = &outcome.result {
            log::log!(
                level,
                "Failed: {} vs {}: {}",
                outcome.pair.reference.display(),
                outcome.pair.query.display(),
                e
            );
        }
    }
}
