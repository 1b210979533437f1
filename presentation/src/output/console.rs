//! Console output formatter for scenario reports

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use tripvote_application::{ScenarioReport, StepOutcome};
use tripvote_domain::{MemberCount, QuorumRule, VoteOutcome};

/// Formats scenario reports for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Force colors on or off for everything formatted afterwards
    pub fn set_color(enabled: bool) {
        colored::control::set_override(enabled);
    }

    /// Format the complete report
    pub fn format(report: &ScenarioReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::header(&report.name));
        output.push('\n');

        output.push_str(&format!("{} {}\n", "Trip:".cyan().bold(), report.trip));
        output.push_str(&format!(
            "{} {} members, {} ({} likes to promote)\n",
            "Quorum:".cyan().bold(),
            report.total_members,
            report.rule,
            report.threshold
        ));

        output.push_str(&Self::section_header("Steps"));
        for step in &report.steps {
            output.push_str(&format!(
                "{:>3}. {:<40} {}\n",
                step.index,
                step.description,
                Self::outcome_line(&step.outcome)
            ));
        }

        output.push_str(&Self::itinerary_section(report));

        if !report.tallies.is_empty() {
            output.push_str(&Self::section_header("Tallies"));
            for tally in &report.tallies {
                let state = if tally.state.is_promoted() {
                    tally.state.to_string().green().to_string()
                } else {
                    tally.state.to_string().dimmed().to_string()
                };
                output.push_str(&format!(
                    "  {:<16} {} {}/{} likes, {} passes  {}\n",
                    tally.candidate.as_str(),
                    tally.vote_summary(),
                    tally.likes,
                    tally.threshold,
                    tally.passes,
                    state
                ));
            }
        }

        if !report.decks.is_empty() {
            output.push_str(&Self::section_header("Next decks"));
            for deck in &report.decks {
                let next = match deck.category {
                    Some(category) => format!("{} ({} left)", category, deck.remaining),
                    None => "nothing left to swipe".dimmed().to_string(),
                };
                output.push_str(&format!("  {:<16} {}\n", deck.member.as_str(), next));
            }
        }

        let failed = report.failed_steps();
        if failed > 0 {
            output.push_str(&format!(
                "\n{}\n",
                format!("{} step(s) failed", failed).red().bold()
            ));
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(report: &ScenarioReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the final itinerary only (concise output)
    pub fn format_itinerary_only(report: &ScenarioReport) -> String {
        let mut output = format!("{}\n", format!("=== {} ===", report.name).cyan().bold());
        if report.itinerary.is_empty() {
            output.push_str("No candidate reached quorum.\n");
        }
        for item in &report.itinerary {
            output.push_str(&format!("  * {}\n", item.candidate));
        }
        output
    }

    /// Threshold table for the given trip sizes
    pub fn format_thresholds(rule: &QuorumRule, sizes: &[usize]) -> String {
        let mut output = format!("{} {}\n\n", "Rule:".cyan().bold(), rule);
        output.push_str(&format!("  {:>8}  {:>9}\n", "members", "threshold"));
        output.push_str(&format!("  {}\n", "-".repeat(19)));
        for &total in sizes {
            let members = MemberCount::from_collaborators(total.saturating_sub(1));
            output.push_str(&format!(
                "  {:>8}  {:>9}\n",
                members.total(),
                rule.threshold(members)
            ));
        }
        output
    }

    fn itinerary_section(report: &ScenarioReport) -> String {
        let mut output = Self::section_header("Itinerary");
        if report.itinerary.is_empty() {
            output.push_str(&format!("  {}\n", "(empty)".dimmed()));
        }
        for item in &report.itinerary {
            let day = if item.is_scheduled() {
                format!("day {}", item.day_index)
            } else {
                "unscheduled".to_string()
            };
            output.push_str(&format!(
                "  {} {:<16} {}  {}\n",
                "*".green(),
                item.candidate.as_str(),
                day.dimmed(),
                item.promoted_at.format("%H:%M:%S%.3f").to_string().dimmed()
            ));
        }
        output
    }

    fn vote_outcome(outcome: &VoteOutcome) -> String {
        if outcome.is_first_promotion() {
            "PROMOTED".green().bold().to_string()
        } else if outcome.already_promoted {
            "already promoted".yellow().to_string()
        } else {
            "recorded".dimmed().to_string()
        }
    }

    fn outcome_line(outcome: &StepOutcome) -> String {
        match outcome {
            StepOutcome::Voted { outcome } | StepOutcome::Retried { outcome } => {
                Self::vote_outcome(outcome)
            }
            StepOutcome::Burst { summary } => {
                let line = format!(
                    "{} promoted, {} already promoted, {} pending, {} failed",
                    summary.promoted, summary.already_promoted, summary.not_matched, summary.failed
                );
                if summary.promoted > 0 {
                    line.green().to_string()
                } else {
                    line
                }
            }
            StepOutcome::Joined { outcome } => outcome.as_str().to_string(),
            StepOutcome::RoleChanged { change } => {
                format!("{} -> {}", change.previous, change.current)
            }
            StepOutcome::Deck { deck: Some(deck) } => {
                format!("{}: {} candidate(s)", deck.category, deck.len())
            }
            StepOutcome::Deck { deck: None } => "nothing left to swipe".dimmed().to_string(),
            StepOutcome::Failed { error } => format!("failed: {}", error).red().to_string(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, report: &ScenarioReport) -> String {
        Self::format(report)
    }

    fn format_json(&self, report: &ScenarioReport) -> String {
        Self::format_json(report)
    }

    fn format_itinerary_only(&self, report: &ScenarioReport) -> String {
        Self::format_itinerary_only(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tripvote_application::{BurstSummary, MemberDeck, StepReport};
    use tripvote_domain::{
        CandidateCategory, CandidateId, CandidateState, TripId, TripItem, UserId, VoteTally,
    };

    fn report() -> ScenarioReport {
        ScenarioReport {
            name: "Lisbon weekend".to_string(),
            trip: TripId::new("lisbon"),
            rule: QuorumRule::Majority,
            total_members: 3,
            threshold: 2,
            steps: vec![
                StepReport {
                    index: 1,
                    description: "olivia votes like on h1".to_string(),
                    outcome: StepOutcome::Voted {
                        outcome: VoteOutcome::not_matched(),
                    },
                },
                StepReport {
                    index: 2,
                    description: "2 concurrent like votes on h1".to_string(),
                    outcome: StepOutcome::Burst {
                        summary: BurstSummary {
                            promoted: 1,
                            already_promoted: 1,
                            not_matched: 0,
                            failed: 0,
                        },
                    },
                },
                StepReport {
                    index: 3,
                    description: "mallory votes like on h2".to_string(),
                    outcome: StepOutcome::Failed {
                        error: "User mallory is not a member of trip lisbon".to_string(),
                    },
                },
            ],
            itinerary: vec![TripItem::promoted(
                TripId::new("lisbon"),
                CandidateId::new("h1"),
            )],
            tallies: vec![VoteTally {
                candidate: CandidateId::new("h1"),
                likes: 3,
                passes: 0,
                total_members: 3,
                threshold: 2,
                state: CandidateState::Promoted,
            }],
            decks: vec![MemberDeck {
                member: UserId::new("ana"),
                category: Some(CandidateCategory::Restaurant),
                remaining: 2,
            }],
        }
    }

    #[test]
    fn test_full_format_lists_everything() {
        let output = ConsoleFormatter::format(&report());
        assert!(output.contains("Lisbon weekend"));
        assert!(output.contains("olivia votes like on h1"));
        assert!(output.contains("1 promoted, 1 already promoted"));
        assert!(output.contains("not a member"));
        assert!(output.contains("[●●●]"));
        assert!(output.contains("restaurant (2 left)"));
        assert!(output.contains("1 step(s) failed"));
    }

    #[test]
    fn test_itinerary_only() {
        let output = ConsoleFormatter::format_itinerary_only(&report());
        assert!(output.contains("* h1"));
        assert!(!output.contains("Tallies"));
    }

    #[test]
    fn test_json_round_trips_key_fields() {
        let json: serde_json::Value =
            serde_json::from_str(&ConsoleFormatter::format_json(&report())).unwrap();
        assert_eq!(json["trip"], "lisbon");
        assert_eq!(json["threshold"], 2);
        assert_eq!(json["steps"][1]["outcome"]["kind"], "burst");
        assert_eq!(json["itinerary"][0]["candidate"], "h1");
    }

    #[test]
    fn test_threshold_table() {
        let output = ConsoleFormatter::format_thresholds(&QuorumRule::Majority, &[1, 2, 3, 4, 5]);
        let rows: Vec<(usize, usize)> = output
            .lines()
            .skip(4)
            .map(|line| {
                let mut cols = line.split_whitespace().map(|c| c.parse::<usize>().unwrap());
                (cols.next().unwrap(), cols.next().unwrap())
            })
            .collect();
        assert_eq!(rows, vec![(1, 1), (2, 2), (3, 2), (4, 3), (5, 3)]);
    }
}
