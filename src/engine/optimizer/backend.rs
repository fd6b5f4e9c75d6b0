// ==========================================
// Metro Induction Planner - MILP solving capability
// ==========================================
// The search itself is delegated; callers see one blocking call with a
// wall-clock limit that yields a full assignment or a failure status.
// ==========================================

use crate::domain::types::TrainStatus;
use crate::engine::optimizer::model::AssignmentModel;
use good_lp::{
    constraint, default_solver, variable, Expression, ProblemVariables, ResolutionError,
    Solution as LpSolution, SolverModel, Variable,
};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Search limits handed to the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolvePolicy {
    pub time_limit: Duration,
    /// Parallel worker hint; backends may ignore it
    pub search_workers: u32,
}

impl SolvePolicy {
    pub fn new(time_limit_secs: u64, search_workers: u32) -> Self {
        Self {
            time_limit: Duration::from_secs(time_limit_secs),
            search_workers,
        }
    }
}

/// Backend result; choices are aligned with `AssignmentModel::trains`
#[derive(Debug, Clone, PartialEq)]
pub enum SolveOutcome {
    Optimal(Vec<TrainStatus>),
    Feasible(Vec<TrainStatus>),
    Infeasible,
    Unknown,
    /// Time limit hit with no incumbent
    TimedOut,
}

impl SolveOutcome {
    pub fn status_name(&self) -> &'static str {
        match self {
            SolveOutcome::Optimal(_) => "OPTIMAL",
            SolveOutcome::Feasible(_) => "FEASIBLE",
            SolveOutcome::Infeasible => "INFEASIBLE",
            SolveOutcome::Unknown => "UNKNOWN",
            SolveOutcome::TimedOut => "TIMED_OUT",
        }
    }
}

/// Integer-programming solver behind the optimizer
pub trait MilpBackend {
    fn name(&self) -> &'static str;

    fn solve(&self, model: &AssignmentModel, policy: &SolvePolicy) -> SolveOutcome;
}

// ==========================================
// GoodLpBackend - good_lp + microlp
// ==========================================
/// Solves on a worker thread bounded by `SolvePolicy::time_limit`.
///
/// microlp cannot be cancelled: on timeout the caller gets `TimedOut`
/// while the detached worker keeps searching until it finishes on its
/// own, holding its model and one CPU core. Its late result is dropped.
#[derive(Debug, Clone, Default)]
pub struct GoodLpBackend;

impl GoodLpBackend {
    pub fn new() -> Self {
        Self
    }
}

impl MilpBackend for GoodLpBackend {
    fn name(&self) -> &'static str {
        "good_lp/microlp"
    }

    fn solve(&self, model: &AssignmentModel, policy: &SolvePolicy) -> SolveOutcome {
        if policy.search_workers > 1 {
            debug!(
                workers = policy.search_workers,
                "microlp searches single-threaded; worker hint recorded only"
            );
        }

        let owned = model.clone();
        let (tx, rx) = mpsc::channel();
        let spawned = thread::Builder::new()
            .name("milp-solve".to_string())
            .spawn(move || {
                // receiver gone means the caller already timed out
                let _ = tx.send(solve_blocking(&owned));
            });
        if let Err(e) = spawned {
            warn!(error = %e, "failed to start solver thread");
            return SolveOutcome::Unknown;
        }

        match rx.recv_timeout(policy.time_limit) {
            Ok(outcome) => outcome,
            Err(RecvTimeoutError::Timeout) => {
                warn!(
                    time_limit_ms = policy.time_limit.as_millis() as u64,
                    "solver time limit reached; worker left running detached"
                );
                SolveOutcome::TimedOut
            }
            Err(RecvTimeoutError::Disconnected) => {
                warn!("solver thread ended without a result");
                SolveOutcome::Unknown
            }
        }
    }
}

/// Builds and solves the model on the current thread
fn solve_blocking(model: &AssignmentModel) -> SolveOutcome {
    let mut vars = ProblemVariables::new();
    let mut x: Vec<[Option<Variable>; 3]> = Vec::with_capacity(model.trains.len());
    let mut objective = Expression::from(0.0);

    for row in &model.trains {
        let mut slots: [Option<Variable>; 3] = [None; 3];
        for status in row.allowed_statuses() {
            let v = vars.add(variable().binary());
            objective += v * row.cost(status);
            slots[status.index()] = Some(v);
        }
        x.push(slots);
    }

    let mut problem = vars.minimise(objective).using(default_solver);

    for slots in &x {
        let mut one = Expression::from(0.0);
        for v in slots.iter().flatten() {
            one += *v;
        }
        problem = problem.with(constraint!(one == 1.0));
    }

    let maintenance = TrainStatus::Maintenance.index();
    if let Some(cap) = model.bay_capacity {
        let mut bays = Expression::from(0.0);
        for v in x.iter().filter_map(|slots| slots[maintenance]) {
            bays += v;
        }
        problem = problem.with(constraint!(bays <= cap));
    }

    if let Some(cap) = model.man_hour_capacity {
        let mut hours = Expression::from(0.0);
        for (row, slots) in model.trains.iter().zip(&x) {
            if let Some(v) = slots[maintenance] {
                hours += v * row.pending_hours;
            }
        }
        problem = problem.with(constraint!(hours <= cap));
    }

    if let Some(min) = model.min_revenue {
        let service = TrainStatus::RevenueService.index();
        let min = min as f64;
        let mut count = Expression::from(0.0);
        for v in x.iter().filter_map(|slots| slots[service]) {
            count += v;
        }
        problem = problem.with(constraint!(count >= min));
    }

    match problem.solve() {
        Ok(solution) => {
            let choices = x
                .iter()
                .map(|slots| {
                    TrainStatus::ALL
                        .into_iter()
                        .filter_map(|s| slots[s.index()].map(|v| (s, solution.value(v))))
                        .max_by(|(_, a), (_, b)| a.total_cmp(b))
                        .map(|(s, _)| s)
                        .unwrap_or(TrainStatus::Maintenance)
                })
                .collect();
            SolveOutcome::Optimal(choices)
        }
        Err(ResolutionError::Infeasible) => SolveOutcome::Infeasible,
        Err(e) => {
            warn!(error = %e, "solver returned no assignment");
            SolveOutcome::Unknown
        }
    }
}
