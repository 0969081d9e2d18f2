//! Workouts: named scenario lists and the runner that executes them.
//!
//! A [`Workout`] declares what must be benchmarked. A [`Suite`] is an
//! implementation that registers runnable scenarios under those names.
//! [`plan`] checks the two against each other before anything runs.

use tracing::{info, warn};

use crate::error::{BenchError, BenchResult};
use crate::harness::BenchmarkRecord;

/// Reason recorded for declared scenarios the suite does not provide.
pub const NOT_IMPLEMENTED: &str = "not implemented";

/// A scenario a workout requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioSpec {
    pub name: &'static str,
    pub description: &'static str,
}

/// A named list of required scenarios.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workout {
    pub name: &'static str,
    pub scenarios: Vec<ScenarioSpec>,
}

impl Workout {
    /// Create an empty workout.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            scenarios: Vec::new(),
        }
    }

    /// Declare a scenario.
    #[must_use]
    pub fn with_scenario(mut self, name: &'static str, description: &'static str) -> Self {
        self.scenarios.push(ScenarioSpec { name, description });
        self
    }

    /// Look up a declared scenario.
    pub fn scenario(&self, name: &str) -> Option<&ScenarioSpec> {
        self.scenarios.iter().find(|s| s.name == name)
    }

    /// Declared scenario names in order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.scenarios.iter().map(|s| s.name)
    }
}

/// The device transpile workout at 100 qubits.
pub fn device_transpile_100q() -> Workout {
    Workout::new("device_transpile_100q")
        .with_scenario(
            "QFT_100_transpile",
            "Compile 100Q QFT circuit against target backend",
        )
        .with_scenario(
            "QV_100_transpile",
            "Compile 100Q QV circuit against target backend",
        )
        .with_scenario(
            "circSU2_100_transpile",
            "Compile 100Q circSU2 circuit against target backend",
        )
        .with_scenario(
            "BV_100_transpile",
            "Compile 100Q BV circuit against target backend",
        )
        .with_scenario(
            "square_heisenberg_100_transpile",
            "Compile 100Q square-Heisenberg circuit against target backend",
        )
        .with_scenario(
            "QAOA_100_transpile",
            "Compile 100Q QAOA circuit against target backend",
        )
        .with_scenario(
            "BVlike_simplification_transpile",
            "Transpile a BV-like circuit that should collapse to a single X and Z on the target device",
        )
}

/// An implementation of a workout.
pub trait Suite {
    /// The workout this suite implements.
    fn workout(&self) -> &Workout;

    /// Names of the scenarios this suite can run.
    fn registered(&self) -> Vec<&'static str>;

    /// Run one registered scenario.
    fn run_scenario(&self, name: &str) -> BenchResult<BenchmarkRecord>;
}

/// What happened to one scenario.
#[derive(Debug)]
pub enum ScenarioOutcome {
    Passed(BenchmarkRecord),
    Failed { name: String, error: BenchError },
    Skipped { name: String, reason: String },
}

impl ScenarioOutcome {
    /// Scenario name.
    pub fn name(&self) -> &str {
        match self {
            ScenarioOutcome::Passed(record) => &record.name,
            ScenarioOutcome::Failed { name, .. } | ScenarioOutcome::Skipped { name, .. } => name,
        }
    }

    /// Whether the scenario failed.
    pub fn is_failure(&self) -> bool {
        matches!(self, ScenarioOutcome::Failed { .. })
    }

    /// The record of a passed scenario.
    pub fn record(&self) -> Option<&BenchmarkRecord> {
        match self {
            ScenarioOutcome::Passed(record) => Some(record),
            _ => None,
        }
    }
}

/// A validated, filtered selection of scenarios.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    /// Selected scenarios in declaration order, with whether the suite
    /// provides them.
    pub entries: Vec<(&'static str, bool)>,
}

impl Plan {
    /// Number of selected scenarios.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was selected.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names of the selected scenarios the suite does not provide.
    pub fn missing(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries
            .iter()
            .filter(|(_, implemented)| !implemented)
            .map(|(name, _)| *name)
    }
}

/// Check a suite against its workout.
///
/// Returns the declared scenarios the suite is missing. A registered
/// scenario the workout does not declare is an error.
pub fn validate_workout(workout: &Workout, registered: &[&str]) -> BenchResult<Vec<&'static str>> {
    let undeclared: Vec<&str> = registered
        .iter()
        .copied()
        .filter(|name| workout.scenario(name).is_none())
        .collect();
    if !undeclared.is_empty() {
        return Err(BenchError::Workout(format!(
            "scenarios not declared by {}: {}",
            workout.name,
            undeclared.join(", ")
        )));
    }
    Ok(workout
        .names()
        .filter(|name| !registered.contains(name))
        .collect())
}

/// Validate `suite` and select the scenarios whose name contains `filter`.
pub fn plan(suite: &dyn Suite, filter: Option<&str>) -> BenchResult<Plan> {
    let registered = suite.registered();
    let missing = validate_workout(suite.workout(), &registered)?;
    let entries = suite
        .workout()
        .names()
        .filter(|name| filter.is_none_or(|f| name.contains(f)))
        .map(|name| (name, !missing.contains(&name)))
        .collect();
    Ok(Plan { entries })
}

/// Run a plan, calling `on_done` after each scenario.
///
/// Scenarios run in plan order. A failure is recorded and the next
/// scenario still runs.
pub fn run_plan(
    suite: &dyn Suite,
    plan: &Plan,
    mut on_done: impl FnMut(&ScenarioOutcome),
) -> Vec<ScenarioOutcome> {
    let mut outcomes = Vec::with_capacity(plan.len());
    for &(name, implemented) in &plan.entries {
        let outcome = if implemented {
            info!("Running {}", name);
            match suite.run_scenario(name) {
                Ok(record) => ScenarioOutcome::Passed(record),
                Err(error) => {
                    warn!("{} failed: {}", name, error);
                    ScenarioOutcome::Failed {
                        name: name.to_string(),
                        error,
                    }
                }
            }
        } else {
            warn!("Skipping {}: {}", name, NOT_IMPLEMENTED);
            ScenarioOutcome::Skipped {
                name: name.to_string(),
                reason: NOT_IMPLEMENTED.to_string(),
            }
        };
        on_done(&outcome);
        outcomes.push(outcome);
    }
    outcomes
}

/// Validate, select and run in one step.
pub fn run_workout(suite: &dyn Suite, filter: Option<&str>) -> BenchResult<Vec<ScenarioOutcome>> {
    let plan = plan(suite, filter)?;
    Ok(run_plan(suite, &plan, |_| {}))
}
