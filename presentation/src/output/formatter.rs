//! Output formatter trait

use tripvote_application::ScenarioReport;

/// Trait for formatting scenario reports
pub trait OutputFormatter {
    /// Format the complete report
    fn format(&self, report: &ScenarioReport) -> String;

    /// Format as JSON
    fn format_json(&self, report: &ScenarioReport) -> String;

    /// Format the final itinerary only (concise output)
    fn format_itinerary_only(&self, report: &ScenarioReport) -> String;
}
