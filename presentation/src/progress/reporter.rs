//! Progress reporting for scenario execution

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use tripvote_application::{ScenarioProgress, ScenarioReport, StepReport};

/// Reports progress during a scenario with a progress bar
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn step_mark(step: &StepReport) -> String {
        if step.outcome.is_failure() {
            format!("{} {}", "x".red(), step.description)
        } else if step.outcome.promoted() {
            format!("{} {}", "*".green(), step.description)
        } else {
            format!("{} {}", "v".green(), step.description)
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ScenarioProgress for ProgressReporter {
    fn on_scenario_start(&self, name: &str, total_steps: usize) {
        let pb = ProgressBar::new(total_steps as u64);
        pb.set_style(Self::bar_style());
        pb.set_prefix(name.to_string());
        pb.set_message("Starting...");

        if let Ok(mut bar) = self.bar.lock() {
            *bar = Some(pb);
        }
    }

    fn on_step_complete(&self, step: &StepReport) {
        if let Ok(bar) = self.bar.lock()
            && let Some(pb) = bar.as_ref()
        {
            pb.set_message(Self::step_mark(step));
            pb.inc(1);
        }
    }

    fn on_scenario_complete(&self, report: &ScenarioReport) {
        if let Ok(mut bar) = self.bar.lock()
            && let Some(pb) = bar.take()
        {
            pb.finish_with_message(format!(
                "{} ({} promoted)",
                "complete!".green(),
                report.itinerary.len()
            ));
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl ScenarioProgress for SimpleProgress {
    fn on_scenario_start(&self, name: &str, total_steps: usize) {
        println!("{} {} ({} steps)", "->".cyan(), name.bold(), total_steps);
    }

    fn on_step_complete(&self, step: &StepReport) {
        println!("  {}", ProgressReporter::step_mark(step));
    }

    fn on_scenario_complete(&self, _report: &ScenarioReport) {
        println!();
    }
}
