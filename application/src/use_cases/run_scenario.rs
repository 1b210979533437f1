//! Run Scenario use case
//!
//! Replays a scripted group-planning session against the ports: registers the
//! trip, joins members, offers candidates, then executes steps in order.
//! `burst` steps cast their votes concurrently to exercise promotion races.
//!
//! A failing step is recorded in the report and the run goes on. Only setup
//! failures abort the scenario.

use crate::config::ConsensusConfig;
use crate::ports::activity_logger::ActivityLogger;
use crate::ports::candidate_catalog::{CandidateCatalog, CatalogError};
use crate::ports::fanout::FanoutNotifier;
use crate::ports::itinerary_store::{ItineraryError, ItineraryStore};
use crate::ports::membership_store::MembershipStore;
use crate::ports::progress::{NoScenarioProgress, ScenarioProgress};
use crate::ports::vote_ledger::{LedgerError, VoteLedger};
use crate::use_cases::build_deck::{BuildDeckUseCase, Deck};
use crate::use_cases::cast_vote::{CastVoteError, CastVoteInput, CastVoteUseCase};
use crate::use_cases::manage_membership::{
    JoinOutcome, ManageMembershipError, ManageMembershipUseCase, RoleChange,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{info, warn};
use tripvote_domain::{
    Candidate, CandidateCategory, CandidateId, CollaboratorRole, Decision, DestinationId,
    QuorumRule, Trip, TripId, TripItem, UserId, VoteOutcome, VoteTally,
};

/// Errors that abort a scenario before or after its steps
#[derive(Error, Debug)]
pub enum RunScenarioError {
    #[error("Scenario setup failed: {0}")]
    Setup(#[from] ManageMembershipError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Vote ledger error: {0}")]
    VoteLedger(#[from] LedgerError),

    #[error("Itinerary error: {0}")]
    Itinerary(#[from] ItineraryError),

    #[error("Reading tallies failed: {0}")]
    Tally(#[from] CastVoteError),
}

// ==================== Scenario definition ====================

/// The trip a scenario plays on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioTrip {
    pub id: TripId,
    pub owner: UserId,
    #[serde(default)]
    pub destination: Option<DestinationId>,
    #[serde(default)]
    pub title: Option<String>,
}

impl ScenarioTrip {
    fn to_trip(&self) -> Trip {
        let destination = self
            .destination
            .clone()
            .unwrap_or_else(|| DestinationId::new(self.id.as_str()));
        let title = self.title.clone().unwrap_or_else(|| self.id.to_string());
        Trip::new(self.id.clone(), self.owner.clone(), destination, title)
    }
}

/// A scripted session, usually loaded from a TOML or JSON file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub trip: ScenarioTrip,
    /// Collaborators joined before the first step (owner excluded)
    #[serde(default)]
    pub members: Vec<UserId>,
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub steps: Vec<ScenarioStep>,
}

fn default_decision() -> Decision {
    Decision::Like
}

/// One scripted action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScenarioStep {
    /// A single vote
    Vote {
        voter: UserId,
        candidate: CandidateId,
        decision: Decision,
    },
    /// Several voters voting on one candidate at the same time
    Burst {
        candidate: CandidateId,
        voters: Vec<UserId>,
        #[serde(default = "default_decision")]
        decision: Decision,
    },
    Join {
        user: UserId,
    },
    Escalate {
        actor: UserId,
        target: UserId,
        role: CollaboratorRole,
    },
    /// Re-run promotion for a candidate without voting
    Retry {
        requester: UserId,
        candidate: CandidateId,
    },
    /// Peek at a member's next deck
    Deck {
        voter: UserId,
    },
}

impl ScenarioStep {
    pub fn describe(&self) -> String {
        match self {
            ScenarioStep::Vote {
                voter,
                candidate,
                decision,
            } => format!("{} votes {} on {}", voter, decision, candidate),
            ScenarioStep::Burst {
                candidate,
                voters,
                decision,
            } => format!(
                "{} concurrent {} votes on {}",
                voters.len(),
                decision,
                candidate
            ),
            ScenarioStep::Join { user } => format!("{} joins", user),
            ScenarioStep::Escalate {
                actor,
                target,
                role,
            } => format!("{} sets {} to {}", actor, target, role),
            ScenarioStep::Retry {
                requester,
                candidate,
            } => format!("{} retries promotion of {}", requester, candidate),
            ScenarioStep::Deck { voter } => format!("next deck for {}", voter),
        }
    }
}

// ==================== Report ====================

/// Aggregated outcomes of a burst
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurstSummary {
    pub promoted: usize,
    pub already_promoted: usize,
    pub not_matched: usize,
    pub failed: usize,
}

impl BurstSummary {
    fn record(&mut self, result: &Result<VoteOutcome, CastVoteError>) {
        match result {
            Ok(outcome) if outcome.is_first_promotion() => self.promoted += 1,
            Ok(outcome) if outcome.already_promoted => self.already_promoted += 1,
            Ok(_) => self.not_matched += 1,
            Err(_) => self.failed += 1,
        }
    }
}

/// What a step produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepOutcome {
    Voted { outcome: VoteOutcome },
    Burst { summary: BurstSummary },
    Joined { outcome: JoinOutcome },
    RoleChanged { change: RoleChange },
    Retried { outcome: VoteOutcome },
    Deck { deck: Option<Deck> },
    Failed { error: String },
}

impl StepOutcome {
    fn failed(error: impl std::fmt::Display) -> Self {
        StepOutcome::Failed {
            error: error.to_string(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, StepOutcome::Failed { .. })
    }

    /// Whether this step performed the first promotion of a candidate
    pub fn promoted(&self) -> bool {
        match self {
            StepOutcome::Voted { outcome } | StepOutcome::Retried { outcome } => {
                outcome.is_first_promotion()
            }
            StepOutcome::Burst { summary } => summary.promoted > 0,
            _ => false,
        }
    }
}

/// One executed step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    /// 1-based position in the scenario
    pub index: usize,
    pub description: String,
    pub outcome: StepOutcome,
}

/// A member's next deck at the end of the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDeck {
    pub member: UserId,
    pub category: Option<CandidateCategory>,
    pub remaining: usize,
}

/// Final state of a scenario run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub name: String,
    pub trip: TripId,
    pub rule: QuorumRule,
    pub total_members: usize,
    pub threshold: usize,
    pub steps: Vec<StepReport>,
    pub itinerary: Vec<TripItem>,
    pub tallies: Vec<VoteTally>,
    pub decks: Vec<MemberDeck>,
}

impl ScenarioReport {
    pub fn failed_steps(&self) -> usize {
        self.steps.iter().filter(|s| s.outcome.is_failure()).count()
    }
}

// ==================== Use case ====================

/// Use case for running a scripted scenario
pub struct RunScenarioUseCase<M, V, I, C>
where
    M: MembershipStore + 'static,
    V: VoteLedger + 'static,
    I: ItineraryStore + 'static,
    C: CandidateCatalog + 'static,
{
    membership: Arc<M>,
    ledger: Arc<V>,
    itinerary: Arc<I>,
    catalog: Arc<C>,
    cast_vote: CastVoteUseCase<M, V, I>,
    manage: ManageMembershipUseCase<M>,
    deck: BuildDeckUseCase<M, V, I, C>,
}

impl<M, V, I, C> RunScenarioUseCase<M, V, I, C>
where
    M: MembershipStore + 'static,
    V: VoteLedger + 'static,
    I: ItineraryStore + 'static,
    C: CandidateCatalog + 'static,
{
    pub fn new(membership: Arc<M>, ledger: Arc<V>, itinerary: Arc<I>, catalog: Arc<C>) -> Self {
        Self {
            cast_vote: CastVoteUseCase::new(membership.clone(), ledger.clone(), itinerary.clone()),
            manage: ManageMembershipUseCase::new(membership.clone()),
            deck: BuildDeckUseCase::new(
                membership.clone(),
                ledger.clone(),
                itinerary.clone(),
                catalog.clone(),
            ),
            membership,
            ledger,
            itinerary,
            catalog,
        }
    }

    pub fn with_config(mut self, config: ConsensusConfig) -> Self {
        self.cast_vote = self.cast_vote.with_config(config);
        self
    }

    pub fn with_fanout(mut self, fanout: Arc<dyn FanoutNotifier>) -> Self {
        self.cast_vote = self.cast_vote.with_fanout(fanout);
        self
    }

    pub fn with_activity_logger(mut self, logger: Arc<dyn ActivityLogger>) -> Self {
        self.cast_vote = self.cast_vote.with_activity_logger(logger.clone());
        self.manage = self.manage.with_activity_logger(logger);
        self
    }

    /// Execute the scenario with default (no-op) progress
    pub async fn execute(&self, scenario: Scenario) -> Result<ScenarioReport, RunScenarioError> {
        self.execute_with_progress(scenario, &NoScenarioProgress)
            .await
    }

    /// Execute the scenario with progress callbacks
    pub async fn execute_with_progress(
        &self,
        scenario: Scenario,
        progress: &dyn ScenarioProgress,
    ) -> Result<ScenarioReport, RunScenarioError> {
        let trip = scenario.trip.id.clone();
        info!(scenario = %scenario.name, %trip, steps = scenario.steps.len(), "Starting scenario");

        self.setup(&scenario).await?;
        progress.on_scenario_start(&scenario.name, scenario.steps.len());

        let mut steps = Vec::with_capacity(scenario.steps.len());
        for (i, step) in scenario.steps.iter().enumerate() {
            let outcome = self.run_step(&trip, step).await;
            if let StepOutcome::Failed { error } = &outcome {
                warn!(step = i + 1, %error, "Scenario step failed");
            }
            let report = StepReport {
                index: i + 1,
                description: step.describe(),
                outcome,
            };
            progress.on_step_complete(&report);
            steps.push(report);
        }

        let report = self.finish(&scenario, steps).await?;
        info!(
            scenario = %report.name,
            promoted = report.itinerary.len(),
            failed_steps = report.failed_steps(),
            "Scenario complete"
        );
        progress.on_scenario_complete(&report);
        Ok(report)
    }

    async fn setup(&self, scenario: &Scenario) -> Result<(), RunScenarioError> {
        let trip = &scenario.trip.id;
        self.manage.create_trip(scenario.trip.to_trip()).await?;
        for member in &scenario.members {
            self.manage.join_trip(trip, member).await?;
        }
        self.catalog
            .offer(trip, scenario.candidates.clone())
            .await?;
        Ok(())
    }

    async fn run_step(&self, trip: &TripId, step: &ScenarioStep) -> StepOutcome {
        match step {
            ScenarioStep::Vote {
                voter,
                candidate,
                decision,
            } => {
                let input =
                    CastVoteInput::new(trip.clone(), candidate.clone(), voter.clone(), *decision);
                match self.cast_vote.execute(input).await {
                    Ok(outcome) => StepOutcome::Voted { outcome },
                    Err(e) => StepOutcome::failed(e),
                }
            }
            ScenarioStep::Burst {
                candidate,
                voters,
                decision,
            } => StepOutcome::Burst {
                summary: self.burst(trip, candidate, voters, *decision).await,
            },
            ScenarioStep::Join { user } => match self.manage.join_trip(trip, user).await {
                Ok(outcome) => StepOutcome::Joined { outcome },
                Err(e) => StepOutcome::failed(e),
            },
            ScenarioStep::Escalate {
                actor,
                target,
                role,
            } => match self.manage.escalate_role(trip, actor, target, *role).await {
                Ok(change) => StepOutcome::RoleChanged { change },
                Err(e) => StepOutcome::failed(e),
            },
            ScenarioStep::Retry {
                requester,
                candidate,
            } => match self
                .cast_vote
                .retry_promotion(trip, candidate, requester)
                .await
            {
                Ok(outcome) => StepOutcome::Retried { outcome },
                Err(e) => StepOutcome::failed(e),
            },
            ScenarioStep::Deck { voter } => match self.deck.next_deck(trip, voter).await {
                Ok(deck) => StepOutcome::Deck { deck },
                Err(e) => StepOutcome::failed(e),
            },
        }
    }

    /// Cast one vote per voter, all spawned at once
    async fn burst(
        &self,
        trip: &TripId,
        candidate: &CandidateId,
        voters: &[UserId],
        decision: Decision,
    ) -> BurstSummary {
        let mut join_set = JoinSet::new();

        for voter in voters {
            let engine = self.cast_vote.clone();
            let input = CastVoteInput::new(trip.clone(), candidate.clone(), voter.clone(), decision);
            join_set.spawn(async move { engine.execute(input).await });
        }

        let mut summary = BurstSummary::default();
        while let Some(result) = join_set.join_next().await {
            match result {
                Ok(vote_result) => {
                    if let Err(e) = &vote_result {
                        warn!(%trip, %candidate, error = %e, "Burst vote failed");
                    }
                    summary.record(&vote_result);
                }
                Err(e) => {
                    warn!("Task join error: {}", e);
                    summary.failed += 1;
                }
            }
        }
        summary
    }

    async fn finish(
        &self,
        scenario: &Scenario,
        steps: Vec<StepReport>,
    ) -> Result<ScenarioReport, RunScenarioError> {
        let trip = &scenario.trip.id;
        let owner = &scenario.trip.owner;
        let rule = self.cast_vote.config().rule;

        let members = self
            .membership
            .member_count(trip)
            .await
            .map_err(ManageMembershipError::from)?;
        let itinerary = self.itinerary.items(trip).await?;

        let mut tallies = Vec::new();
        for candidate in self.ledger.candidates_with_votes(trip).await? {
            tallies.push(self.cast_vote.tally(trip, &candidate, owner).await?);
        }

        let mut everyone = vec![owner.clone()];
        everyone.extend(
            self.membership
                .collaborators(trip)
                .await
                .map_err(ManageMembershipError::from)?
                .into_iter()
                .map(|c| c.user),
        );
        let mut decks = Vec::with_capacity(everyone.len());
        for member in everyone {
            // Members without a readable deck are reported as exhausted
            let next = self.deck.next_deck(trip, &member).await.ok().flatten();
            decks.push(MemberDeck {
                member,
                category: next.as_ref().map(|d| d.category),
                remaining: next.as_ref().map_or(0, Deck::len),
            });
        }

        Ok(ScenarioReport {
            name: scenario.name.clone(),
            trip: trip.clone(),
            rule,
            total_members: members.total(),
            threshold: rule.threshold(members),
            steps,
            itinerary,
            tallies,
            decks,
        })
    }
}
