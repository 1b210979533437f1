//! Progress notification port
//!
//! Defines the interface for reporting progress while a scenario runs.

use crate::use_cases::run_scenario::{ScenarioReport, StepReport};

/// Callback for progress updates during scenario execution
///
/// Implementations live in the presentation layer (progress bar, plain
/// text lines, or nothing at all).
pub trait ScenarioProgress: Send + Sync {
    /// Called once, before the first step
    fn on_scenario_start(&self, name: &str, total_steps: usize);

    /// Called after each step, whether it succeeded or not
    fn on_step_complete(&self, step: &StepReport);

    /// Called after the last step with the final report
    fn on_scenario_complete(&self, _report: &ScenarioReport) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoScenarioProgress;

impl ScenarioProgress for NoScenarioProgress {
    fn on_scenario_start(&self, _name: &str, _total_steps: usize) {}
    fn on_step_complete(&self, _step: &StepReport) {}
}
