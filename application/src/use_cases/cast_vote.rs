//! Cast Vote use case
//!
//! The consensus engine: records a member's like/pass, recomputes the quorum
//! and promotes the candidate into the itinerary exactly once.
//!
//! Promotion is check-then-insert. Two members can cross the threshold at the
//! same time; both see `likes >= threshold`, both try to insert. The itinerary
//! store's uniqueness constraint decides the winner and the loser reports
//! `already_promoted = true` instead of an error.

use crate::config::ConsensusConfig;
use crate::ports::activity_logger::{ActivityEvent, ActivityLogger};
use crate::ports::fanout::FanoutNotifier;
use crate::ports::itinerary_store::{InsertOutcome, ItineraryError, ItineraryStore};
use crate::ports::membership_store::{MembershipError, MembershipStore};
use crate::ports::vote_ledger::{LedgerError, VoteLedger};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};
use tripvote_domain::{
    CandidateId, Decision, PromotionEvent, TripId, TripItem, UserId, Vote, VoteOutcome, VoteTally,
};

/// Errors that can occur while casting a vote
#[derive(Error, Debug)]
pub enum CastVoteError {
    #[error("User {user} is not a member of trip {trip}")]
    Unauthorized { trip: TripId, user: UserId },

    #[error("Vote ledger error: {0}")]
    VoteLedger(#[from] LedgerError),

    #[error("Membership error: {0}")]
    Membership(#[from] MembershipError),

    /// The vote (if any) is recorded; only the itinerary insert failed.
    #[error("Promotion of {candidate} failed: {source}")]
    Promotion {
        candidate: CandidateId,
        #[source]
        source: ItineraryError,
    },
}

impl CastVoteError {
    /// Whether the caller may retry. Authorization failures are final.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, CastVoteError::Unauthorized { .. })
    }

    /// Partial success: the vote was written, retry promotion only
    pub fn is_promotion_failure(&self) -> bool {
        matches!(self, CastVoteError::Promotion { .. })
    }
}

/// Input for the CastVote use case
#[derive(Debug, Clone)]
pub struct CastVoteInput {
    pub trip: TripId,
    pub candidate: CandidateId,
    pub voter: UserId,
    pub decision: Decision,
}

impl CastVoteInput {
    pub fn new(
        trip: impl Into<TripId>,
        candidate: impl Into<CandidateId>,
        voter: impl Into<UserId>,
        decision: Decision,
    ) -> Self {
        Self {
            trip: trip.into(),
            candidate: candidate.into(),
            voter: voter.into(),
            decision,
        }
    }

    pub fn like(
        trip: impl Into<TripId>,
        candidate: impl Into<CandidateId>,
        voter: impl Into<UserId>,
    ) -> Self {
        Self::new(trip, candidate, voter, Decision::Like)
    }

    pub fn pass(
        trip: impl Into<TripId>,
        candidate: impl Into<CandidateId>,
        voter: impl Into<UserId>,
    ) -> Self {
        Self::new(trip, candidate, voter, Decision::Pass)
    }
}

/// Use case for casting votes and promoting candidates
pub struct CastVoteUseCase<M, V, I>
where
    M: MembershipStore + 'static,
    V: VoteLedger + 'static,
    I: ItineraryStore + 'static,
{
    membership: Arc<M>,
    ledger: Arc<V>,
    itinerary: Arc<I>,
    config: ConsensusConfig,
    fanout: Option<Arc<dyn FanoutNotifier>>,
    activity: Option<Arc<dyn ActivityLogger>>,
}

impl<M, V, I> Clone for CastVoteUseCase<M, V, I>
where
    M: MembershipStore + 'static,
    V: VoteLedger + 'static,
    I: ItineraryStore + 'static,
{
    fn clone(&self) -> Self {
        Self {
            membership: self.membership.clone(),
            ledger: self.ledger.clone(),
            itinerary: self.itinerary.clone(),
            config: self.config,
            fanout: self.fanout.clone(),
            activity: self.activity.clone(),
        }
    }
}

impl<M, V, I> CastVoteUseCase<M, V, I>
where
    M: MembershipStore + 'static,
    V: VoteLedger + 'static,
    I: ItineraryStore + 'static,
{
    pub fn new(membership: Arc<M>, ledger: Arc<V>, itinerary: Arc<I>) -> Self {
        Self {
            membership,
            ledger,
            itinerary,
            config: ConsensusConfig::default(),
            fanout: None,
            activity: None,
        }
    }

    pub fn with_config(mut self, config: ConsensusConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_fanout(mut self, fanout: Arc<dyn FanoutNotifier>) -> Self {
        self.fanout = Some(fanout);
        self
    }

    pub fn with_activity_logger(mut self, logger: Arc<dyn ActivityLogger>) -> Self {
        self.activity = Some(logger);
        self
    }

    pub fn config(&self) -> &ConsensusConfig {
        &self.config
    }

    /// Cast (or re-cast) a vote
    ///
    /// A pass is recorded and returns `matched = false` without looking at
    /// the quorum. A like is recorded and then evaluated.
    pub async fn execute(&self, input: CastVoteInput) -> Result<VoteOutcome, CastVoteError> {
        self.ensure_member(&input.trip, &input.voter).await?;

        let vote = Vote::new(
            input.trip.clone(),
            input.candidate.clone(),
            input.voter.clone(),
            input.decision,
        );
        self.ledger.upsert_vote(vote).await?;

        debug!(
            trip = %input.trip,
            candidate = %input.candidate,
            voter = %input.voter,
            decision = %input.decision,
            "Vote recorded"
        );
        self.log_activity(
            "vote_cast",
            json!({
                "trip": input.trip,
                "candidate": input.candidate,
                "voter": input.voter,
                "decision": input.decision,
            }),
        );

        if !input.decision.is_like() {
            return Ok(VoteOutcome::not_matched());
        }

        self.evaluate_and_promote(&input.trip, &input.candidate)
            .await
    }

    /// Re-run quorum evaluation and promotion without casting a vote
    ///
    /// Used after a [`CastVoteError::Promotion`]: the vote is already in the
    /// ledger, re-casting it is unnecessary.
    pub async fn retry_promotion(
        &self,
        trip: &TripId,
        candidate: &CandidateId,
        requester: &UserId,
    ) -> Result<VoteOutcome, CastVoteError> {
        self.ensure_member(trip, requester).await?;
        info!(%trip, %candidate, %requester, "Retrying promotion");
        self.evaluate_and_promote(trip, candidate).await
    }

    /// Current likes/passes/threshold for a candidate, members only
    pub async fn tally(
        &self,
        trip: &TripId,
        candidate: &CandidateId,
        requester: &UserId,
    ) -> Result<VoteTally, CastVoteError> {
        self.ensure_member(trip, requester).await?;

        let members = self.membership.member_count(trip).await?;
        let votes = self.ledger.votes_for(trip, candidate).await?;
        let promoted = self.is_promoted(trip, candidate).await?;

        Ok(VoteTally::from_votes(
            candidate.clone(),
            &votes,
            members,
            &self.config.rule,
            promoted,
        ))
    }

    async fn ensure_member(&self, trip: &TripId, user: &UserId) -> Result<(), CastVoteError> {
        if self.membership.is_member(trip, user).await? {
            Ok(())
        } else {
            warn!(%trip, %user, "Rejected vote from non-member");
            Err(CastVoteError::Unauthorized {
                trip: trip.clone(),
                user: user.clone(),
            })
        }
    }

    /// Quorum evaluation. Any read failure fails the call; reporting
    /// `matched = false` after a failed read could drop a quorum-reaching vote.
    async fn evaluate_and_promote(
        &self,
        trip: &TripId,
        candidate: &CandidateId,
    ) -> Result<VoteOutcome, CastVoteError> {
        let members = self.membership.member_count(trip).await?;
        let threshold = self.config.rule.threshold(members);
        let likes = self.ledger.count_positive_votes(trip, candidate).await?;

        debug!(
            %trip,
            %candidate,
            likes,
            threshold,
            total_members = members.total(),
            "Quorum evaluated"
        );

        // Promoted is terminal, even once the trip has grown past the likes
        if self.is_promoted(trip, candidate).await? {
            return Ok(VoteOutcome::already_promoted());
        }
        if !self.config.rule.is_reached(likes, members) {
            return Ok(VoteOutcome::not_matched());
        }

        self.promote(trip, candidate).await
    }

    async fn is_promoted(
        &self,
        trip: &TripId,
        candidate: &CandidateId,
    ) -> Result<bool, CastVoteError> {
        self.itinerary
            .exists(trip, candidate)
            .await
            .map_err(|source| CastVoteError::Promotion {
                candidate: candidate.clone(),
                source,
            })
    }

    /// Insert the itinerary item; a unique violation means another call won
    async fn promote(
        &self,
        trip: &TripId,
        candidate: &CandidateId,
    ) -> Result<VoteOutcome, CastVoteError> {
        let promotion_error = |source: ItineraryError| CastVoteError::Promotion {
            candidate: candidate.clone(),
            source,
        };

        let item = TripItem::promoted(trip.clone(), candidate.clone());
        match self.itinerary.insert_if_absent(item.clone()).await {
            Ok(InsertOutcome::Inserted) => {
                info!(%trip, %candidate, "Candidate promoted into itinerary");
                self.log_activity(
                    "candidate_promoted",
                    json!({
                        "trip": trip,
                        "candidate": candidate,
                        "day_index": item.day_index,
                    }),
                );
                self.broadcast(PromotionEvent::from(&item)).await;
                Ok(VoteOutcome::promoted())
            }
            Ok(InsertOutcome::AlreadyPresent) => Ok(VoteOutcome::already_promoted()),
            Err(e) if e.is_unique_violation() => {
                debug!(%trip, %candidate, "Concurrent promotion won the insert");
                self.log_activity(
                    "promotion_conflict",
                    json!({ "trip": trip, "candidate": candidate }),
                );
                Ok(VoteOutcome::already_promoted())
            }
            Err(e) => {
                warn!(%trip, %candidate, error = %e, "Promotion insert failed");
                Err(promotion_error(e))
            }
        }
    }

    async fn broadcast(&self, event: PromotionEvent) {
        let Some(fanout) = &self.fanout else {
            return;
        };
        // The item is already stored; a lost broadcast must not fail the vote.
        if let Err(e) = fanout.publish_promotion(&event).await {
            warn!(
                trip = %event.trip,
                candidate = %event.candidate,
                error = %e,
                "Failed to broadcast promotion"
            );
        }
    }

    fn log_activity(&self, event_type: &'static str, payload: serde_json::Value) {
        if let Some(logger) = &self.activity {
            logger.log(ActivityEvent::new(event_type, payload));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::activity_logger::ActivityLogger;
    use crate::ports::fanout::FanoutError;
    use async_trait::async_trait;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tripvote_domain::{Collaborator, CollaboratorRole, QuorumRule, Trip};

    // ==================== Mock ports ====================

    struct MockMembership {
        owner: UserId,
        collaborators: Mutex<Vec<UserId>>,
        fail_count: AtomicBool,
    }

    impl MockMembership {
        fn new(owner: &str, collaborators: &[&str]) -> Self {
            Self {
                owner: UserId::new(owner),
                collaborators: Mutex::new(collaborators.iter().map(|c| UserId::new(*c)).collect()),
                fail_count: AtomicBool::new(false),
            }
        }

        fn join(&self, user: &str) {
            self.collaborators.lock().unwrap().push(UserId::new(user));
        }
    }

    #[async_trait]
    impl MembershipStore for MockMembership {
        async fn register_trip(&self, _trip: Trip) -> Result<(), MembershipError> {
            Ok(())
        }

        async fn trip(&self, trip: &TripId) -> Result<Option<Trip>, MembershipError> {
            Ok(Some(Trip::new(trip.clone(), self.owner.clone(), "dest", "Trip")))
        }

        async fn is_member(&self, _trip: &TripId, user: &UserId) -> Result<bool, MembershipError> {
            Ok(user == &self.owner || self.collaborators.lock().unwrap().contains(user))
        }

        async fn collaborator_count(&self, _trip: &TripId) -> Result<usize, MembershipError> {
            if self.fail_count.load(Ordering::SeqCst) {
                return Err(MembershipError::Storage("read timeout".to_string()));
            }
            Ok(self.collaborators.lock().unwrap().len())
        }

        async fn role(
            &self,
            _trip: &TripId,
            _user: &UserId,
        ) -> Result<Option<CollaboratorRole>, MembershipError> {
            Ok(None)
        }

        async fn add_member(
            &self,
            _trip: &TripId,
            _user: &UserId,
            _role: CollaboratorRole,
        ) -> Result<crate::ports::membership_store::MembershipChange, MembershipError> {
            unimplemented!("not used by the engine")
        }

        async fn set_role(
            &self,
            _trip: &TripId,
            _user: &UserId,
            _role: CollaboratorRole,
        ) -> Result<(), MembershipError> {
            Ok(())
        }

        async fn collaborators(&self, _trip: &TripId) -> Result<Vec<Collaborator>, MembershipError> {
            Ok(vec![])
        }
    }

    #[derive(Default)]
    struct MockLedger {
        votes: Mutex<HashMap<(TripId, CandidateId, UserId), Vote>>,
        fail_writes: AtomicBool,
        writes: AtomicUsize,
    }

    #[async_trait]
    impl VoteLedger for MockLedger {
        async fn upsert_vote(&self, vote: Vote) -> Result<(), LedgerError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(LedgerError::Storage("write rejected".to_string()));
            }
            self.writes.fetch_add(1, Ordering::SeqCst);
            let key = (vote.trip.clone(), vote.candidate.clone(), vote.voter.clone());
            let mut votes = self.votes.lock().unwrap();
            let vote = match votes.get(&key) {
                Some(previous) => vote.superseding(previous),
                None => vote,
            };
            votes.insert(key, vote);
            Ok(())
        }

        async fn count_positive_votes(
            &self,
            trip: &TripId,
            candidate: &CandidateId,
        ) -> Result<usize, LedgerError> {
            Ok(self
                .votes_for(trip, candidate)
                .await?
                .iter()
                .filter(|v| v.has_liked())
                .count())
        }

        async fn votes_for(
            &self,
            trip: &TripId,
            candidate: &CandidateId,
        ) -> Result<Vec<Vote>, LedgerError> {
            Ok(self
                .votes
                .lock()
                .unwrap()
                .values()
                .filter(|v| &v.trip == trip && &v.candidate == candidate)
                .cloned()
                .collect())
        }

        async fn voted_candidates(
            &self,
            _trip: &TripId,
            _voter: &UserId,
        ) -> Result<HashSet<CandidateId>, LedgerError> {
            Ok(HashSet::new())
        }

        async fn candidates_with_votes(
            &self,
            _trip: &TripId,
        ) -> Result<Vec<CandidateId>, LedgerError> {
            Ok(vec![])
        }
    }

    /// How the mock itinerary reacts to inserts
    #[derive(Clone, Copy, PartialEq)]
    enum InsertMode {
        /// Atomic insert-if-absent
        Normal,
        /// `exists` always says no; a second insert hits the constraint
        RaceOnInsert,
        /// Every insert fails with a non-conflict error
        Broken,
    }

    struct MockItinerary {
        items: Mutex<HashMap<(TripId, CandidateId), TripItem>>,
        mode: Mutex<InsertMode>,
    }

    impl MockItinerary {
        fn new(mode: InsertMode) -> Self {
            Self {
                items: Mutex::new(HashMap::new()),
                mode: Mutex::new(mode),
            }
        }

        fn set_mode(&self, mode: InsertMode) {
            *self.mode.lock().unwrap() = mode;
        }

        fn count(&self) -> usize {
            self.items.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ItineraryStore for MockItinerary {
        async fn exists(
            &self,
            trip: &TripId,
            candidate: &CandidateId,
        ) -> Result<bool, ItineraryError> {
            if *self.mode.lock().unwrap() == InsertMode::RaceOnInsert {
                return Ok(false);
            }
            Ok(self
                .items
                .lock()
                .unwrap()
                .contains_key(&(trip.clone(), candidate.clone())))
        }

        async fn insert_if_absent(&self, item: TripItem) -> Result<InsertOutcome, ItineraryError> {
            let mode = *self.mode.lock().unwrap();
            if mode == InsertMode::Broken {
                return Err(ItineraryError::Storage("connection reset".to_string()));
            }
            let mut items = self.items.lock().unwrap();
            let key = (item.trip.clone(), item.candidate.clone());
            if items.contains_key(&key) {
                return match mode {
                    InsertMode::RaceOnInsert => Err(ItineraryError::UniqueViolation {
                        trip: key.0,
                        candidate: key.1,
                    }),
                    _ => Ok(InsertOutcome::AlreadyPresent),
                };
            }
            items.insert(key, item);
            Ok(InsertOutcome::Inserted)
        }

        async fn items(&self, trip: &TripId) -> Result<Vec<TripItem>, ItineraryError> {
            Ok(self
                .items
                .lock()
                .unwrap()
                .values()
                .filter(|i| &i.trip == trip)
                .cloned()
                .collect())
        }
    }

    #[derive(Default)]
    struct RecordingFanout {
        events: Mutex<Vec<PromotionEvent>>,
        fail: bool,
    }

    #[async_trait]
    impl FanoutNotifier for RecordingFanout {
        async fn publish_promotion(&self, event: &PromotionEvent) -> Result<(), FanoutError> {
            self.events.lock().unwrap().push(event.clone());
            if self.fail {
                return Err(FanoutError::ChannelClosed);
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingActivity {
        types: Mutex<Vec<&'static str>>,
    }

    impl ActivityLogger for RecordingActivity {
        fn log(&self, event: ActivityEvent) {
            self.types.lock().unwrap().push(event.event_type);
        }
    }

    // ==================== Helpers ====================

    type Engine = CastVoteUseCase<MockMembership, MockLedger, MockItinerary>;

    struct Fixture {
        engine: Engine,
        membership: Arc<MockMembership>,
        ledger: Arc<MockLedger>,
        itinerary: Arc<MockItinerary>,
        fanout: Arc<RecordingFanout>,
    }

    /// Owner "olivia" plus the given collaborators on trip "lisbon"
    fn fixture(collaborators: &[&str], mode: InsertMode) -> Fixture {
        let membership = Arc::new(MockMembership::new("olivia", collaborators));
        let ledger = Arc::new(MockLedger::default());
        let itinerary = Arc::new(MockItinerary::new(mode));
        let fanout = Arc::new(RecordingFanout::default());
        let engine = CastVoteUseCase::new(membership.clone(), ledger.clone(), itinerary.clone())
            .with_fanout(fanout.clone());
        Fixture {
            engine,
            membership,
            ledger,
            itinerary,
            fanout,
        }
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_owner_plus_two_collaborators_scenario() {
        let f = fixture(&["ana", "ben"], InsertMode::Normal);

        let first = f
            .engine
            .execute(CastVoteInput::like("lisbon", "x", "olivia"))
            .await
            .unwrap();
        assert_eq!(first, VoteOutcome::not_matched());
        assert_eq!(f.itinerary.count(), 0);

        let second = f
            .engine
            .execute(CastVoteInput::like("lisbon", "x", "ana"))
            .await
            .unwrap();
        assert_eq!(second, VoteOutcome::promoted());
        assert_eq!(f.itinerary.count(), 1);

        let third = f
            .engine
            .execute(CastVoteInput::like("lisbon", "x", "ben"))
            .await
            .unwrap();
        assert_eq!(third, VoteOutcome::already_promoted());
        assert_eq!(f.itinerary.count(), 1);

        let likes = f
            .ledger
            .count_positive_votes(&TripId::new("lisbon"), &CandidateId::new("x"))
            .await
            .unwrap();
        assert_eq!(likes, 3);
        assert_eq!(f.fanout.events.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_repeated_like_does_not_double_count() {
        let f = fixture(&["ana", "ben", "cai"], InsertMode::Normal);

        for _ in 0..3 {
            let outcome = f
                .engine
                .execute(CastVoteInput::like("lisbon", "x", "ana"))
                .await
                .unwrap();
            assert!(!outcome.matched);
        }

        let votes = f
            .ledger
            .votes_for(&TripId::new("lisbon"), &CandidateId::new("x"))
            .await
            .unwrap();
        assert_eq!(votes.len(), 1);
        assert_eq!(f.itinerary.count(), 0);
    }

    #[tokio::test]
    async fn test_pass_never_promotes() {
        let f = fixture(&["ana"], InsertMode::Normal);

        for voter in ["olivia", "ana", "olivia", "ana"] {
            let outcome = f
                .engine
                .execute(CastVoteInput::pass("lisbon", "x", voter))
                .await
                .unwrap();
            assert_eq!(outcome, VoteOutcome::not_matched());
        }
        assert_eq!(f.itinerary.count(), 0);
    }

    #[tokio::test]
    async fn test_pass_after_promotion_keeps_item() {
        let f = fixture(&["ana"], InsertMode::Normal);

        f.engine
            .execute(CastVoteInput::like("lisbon", "x", "olivia"))
            .await
            .unwrap();
        let promoted = f
            .engine
            .execute(CastVoteInput::like("lisbon", "x", "ana"))
            .await
            .unwrap();
        assert!(promoted.is_first_promotion());

        let outcome = f
            .engine
            .execute(CastVoteInput::pass("lisbon", "x", "ana"))
            .await
            .unwrap();
        assert!(!outcome.matched);
        assert_eq!(f.itinerary.count(), 1);

        // ana's like stays on record behind the pass
        let tally = f
            .engine
            .tally(&TripId::new("lisbon"), &CandidateId::new("x"), &UserId::new("olivia"))
            .await
            .unwrap();
        assert_eq!(tally.likes, 2);
        assert_eq!(tally.passes, 0);
        assert!(tally.state.is_promoted());
    }

    #[tokio::test]
    async fn test_like_after_everyone_passed_stays_promoted() {
        let f = fixture(&["ana", "ben"], InsertMode::Normal);

        for voter in ["olivia", "ana"] {
            f.engine
                .execute(CastVoteInput::like("lisbon", "x", voter))
                .await
                .unwrap();
        }
        assert_eq!(f.itinerary.count(), 1);
        for voter in ["olivia", "ana"] {
            f.engine
                .execute(CastVoteInput::pass("lisbon", "x", voter))
                .await
                .unwrap();
        }

        let late = f
            .engine
            .execute(CastVoteInput::like("lisbon", "x", "ben"))
            .await
            .unwrap();
        assert_eq!(late, VoteOutcome::already_promoted());
        assert_eq!(f.itinerary.count(), 1);
        assert_eq!(f.fanout.events.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_like_after_trip_grew_stays_promoted() {
        let f = fixture(&["ana"], InsertMode::Normal);

        // 2 members, threshold 2
        for voter in ["olivia", "ana"] {
            f.engine
                .execute(CastVoteInput::like("lisbon", "x", voter))
                .await
                .unwrap();
        }
        assert_eq!(f.itinerary.count(), 1);

        // 6 members, threshold 4: three likes no longer reach it
        for user in ["ben", "cai", "dee", "eli"] {
            f.membership.join(user);
        }
        let late = f
            .engine
            .execute(CastVoteInput::like("lisbon", "x", "ben"))
            .await
            .unwrap();

        assert_eq!(late, VoteOutcome::already_promoted());
        assert_eq!(f.itinerary.count(), 1);
        assert_eq!(f.fanout.events.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_withdrawn_like_still_counts_toward_quorum() {
        let f = fixture(&["ana", "ben"], InsertMode::Normal);

        f.engine
            .execute(CastVoteInput::like("lisbon", "x", "olivia"))
            .await
            .unwrap();
        let pass = f
            .engine
            .execute(CastVoteInput::pass("lisbon", "x", "olivia"))
            .await
            .unwrap();
        assert_eq!(pass, VoteOutcome::not_matched());

        let outcome = f
            .engine
            .execute(CastVoteInput::like("lisbon", "x", "ana"))
            .await
            .unwrap();
        assert_eq!(outcome, VoteOutcome::promoted());
        assert_eq!(f.itinerary.count(), 1);
    }

    #[tokio::test]
    async fn test_non_member_is_rejected_without_write() {
        let f = fixture(&["ana"], InsertMode::Normal);

        let err = f
            .engine
            .execute(CastVoteInput::like("lisbon", "x", "mallory"))
            .await
            .unwrap_err();

        assert!(matches!(err, CastVoteError::Unauthorized { .. }));
        assert!(!err.is_retryable());
        assert_eq!(f.ledger.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_ledger_failure_is_surfaced() {
        let f = fixture(&["ana"], InsertMode::Normal);
        f.ledger.fail_writes.store(true, Ordering::SeqCst);

        let err = f
            .engine
            .execute(CastVoteInput::like("lisbon", "x", "olivia"))
            .await
            .unwrap_err();

        assert!(matches!(err, CastVoteError::VoteLedger(_)));
        assert!(err.is_retryable());
        assert_eq!(f.itinerary.count(), 0);
    }

    #[tokio::test]
    async fn test_member_count_failure_fails_the_call() {
        let f = fixture(&[], InsertMode::Normal);
        f.membership.fail_count.store(true, Ordering::SeqCst);

        // Single-member trip: this like would reach quorum.
        let err = f
            .engine
            .execute(CastVoteInput::like("lisbon", "x", "olivia"))
            .await
            .unwrap_err();

        assert!(matches!(err, CastVoteError::Membership(_)));
        assert_eq!(f.itinerary.count(), 0);
    }

    #[tokio::test]
    async fn test_lost_insert_race_reports_already_promoted() {
        let f = fixture(&["ana", "ben"], InsertMode::RaceOnInsert);

        f.engine
            .execute(CastVoteInput::like("lisbon", "x", "olivia"))
            .await
            .unwrap();
        let winner = f
            .engine
            .execute(CastVoteInput::like("lisbon", "x", "ana"))
            .await
            .unwrap();
        // `exists` lies under RaceOnInsert, so this caller reaches the insert
        // and must absorb the unique violation.
        let loser = f
            .engine
            .execute(CastVoteInput::like("lisbon", "x", "ben"))
            .await
            .unwrap();

        assert_eq!(winner, VoteOutcome::promoted());
        assert_eq!(loser, VoteOutcome::already_promoted());
        assert_eq!(f.itinerary.count(), 1);
        assert_eq!(f.fanout.events.lock().unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_likes_promote_exactly_once() {
        let voters = ["ana", "ben", "cai", "dee", "eli", "fay"];
        let f = fixture(&voters, InsertMode::RaceOnInsert);

        // 7 members, threshold 4: prime three likes, then race the rest.
        for voter in ["olivia", "ana", "ben"] {
            f.engine
                .execute(CastVoteInput::like("lisbon", "x", voter))
                .await
                .unwrap();
        }

        let mut handles = Vec::new();
        for voter in ["cai", "dee", "eli", "fay"] {
            let engine = f.engine.clone();
            handles.push(tokio::spawn(async move {
                engine
                    .execute(CastVoteInput::like("lisbon", "x", voter))
                    .await
            }));
        }

        let mut first_promotions = 0;
        for handle in handles {
            let outcome = handle.await.unwrap().unwrap();
            assert!(outcome.matched);
            if outcome.is_first_promotion() {
                first_promotions += 1;
            }
        }

        assert_eq!(first_promotions, 1);
        assert_eq!(f.itinerary.count(), 1);
        assert_eq!(f.fanout.events.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_promotion_error_then_retry() {
        let f = fixture(&["ana"], InsertMode::Broken);

        f.engine
            .execute(CastVoteInput::like("lisbon", "x", "olivia"))
            .await
            .unwrap();
        let err = f
            .engine
            .execute(CastVoteInput::like("lisbon", "x", "ana"))
            .await
            .unwrap_err();
        assert!(err.is_promotion_failure());
        // The vote itself was recorded
        assert_eq!(f.ledger.writes.load(Ordering::SeqCst), 2);

        f.itinerary.set_mode(InsertMode::Normal);
        let outcome = f
            .engine
            .retry_promotion(
                &TripId::new("lisbon"),
                &CandidateId::new("x"),
                &UserId::new("ana"),
            )
            .await
            .unwrap();

        assert_eq!(outcome, VoteOutcome::promoted());
        assert_eq!(f.itinerary.count(), 1);
        assert_eq!(f.ledger.writes.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fanout_failure_does_not_fail_vote() {
        let membership = Arc::new(MockMembership::new("olivia", &[]));
        let fanout = Arc::new(RecordingFanout {
            events: Mutex::new(vec![]),
            fail: true,
        });
        let engine = CastVoteUseCase::new(
            membership,
            Arc::new(MockLedger::default()),
            Arc::new(MockItinerary::new(InsertMode::Normal)),
        )
        .with_fanout(fanout.clone());

        let outcome = engine
            .execute(CastVoteInput::like("solo", "x", "olivia"))
            .await
            .unwrap();

        assert_eq!(outcome, VoteOutcome::promoted());
        assert_eq!(fanout.events.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_activity_log_records_votes_and_promotion() {
        let activity = Arc::new(RecordingActivity::default());
        let f = fixture(&[], InsertMode::Normal);
        let engine = f.engine.clone().with_activity_logger(activity.clone());

        engine
            .execute(CastVoteInput::like("lisbon", "x", "olivia"))
            .await
            .unwrap();

        assert_eq!(
            *activity.types.lock().unwrap(),
            vec!["vote_cast", "candidate_promoted"]
        );
    }

    #[tokio::test]
    async fn test_unanimous_rule_from_config() {
        let f = fixture(&["ana", "ben"], InsertMode::Normal);
        let engine = f
            .engine
            .clone()
            .with_config(ConsensusConfig::new(QuorumRule::Unanimous));

        for voter in ["olivia", "ana"] {
            let outcome = engine
                .execute(CastVoteInput::like("lisbon", "x", voter))
                .await
                .unwrap();
            assert!(!outcome.matched);
        }
        let last = engine
            .execute(CastVoteInput::like("lisbon", "x", "ben"))
            .await
            .unwrap();
        assert!(last.is_first_promotion());
    }

    #[tokio::test]
    async fn test_tally_requires_membership() {
        let f = fixture(&["ana"], InsertMode::Normal);
        let err = f
            .engine
            .tally(&TripId::new("lisbon"), &CandidateId::new("x"), &UserId::new("eve"))
            .await
            .unwrap_err();
        assert!(matches!(err, CastVoteError::Unauthorized { .. }));
    }
}
