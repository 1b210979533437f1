//! Candidate Catalog port
//!
//! Source of candidates for swipe decks, per trip and category.

use async_trait::async_trait;
use thiserror::Error;
use tripvote_domain::{Candidate, CandidateCategory, TripId};

/// Errors that can occur when reading the catalog
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

/// Port for the candidate feed
#[async_trait]
pub trait CandidateCatalog: Send + Sync {
    /// Candidates of one category offered for the trip, in display order
    async fn candidates(
        &self,
        trip: &TripId,
        category: CandidateCategory,
    ) -> Result<Vec<Candidate>, CatalogError>;

    /// Offer additional candidates for the trip; ids already offered are kept
    /// as they are
    async fn offer(&self, trip: &TripId, candidates: Vec<Candidate>) -> Result<(), CatalogError>;
}
