//! In-memory candidate catalog

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tripvote_application::ports::candidate_catalog::{CandidateCatalog, CatalogError};
use tripvote_domain::{Candidate, CandidateCategory, TripId};

/// Candidates offered per trip, in the order they were offered
#[derive(Default)]
pub struct MemoryCandidateCatalog {
    offered: Mutex<HashMap<TripId, Vec<Candidate>>>,
}

impl MemoryCandidateCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<TripId, Vec<Candidate>>>, CatalogError> {
        self.offered
            .lock()
            .map_err(|_| CatalogError::Unavailable("catalog lock poisoned".to_string()))
    }
}

#[async_trait]
impl CandidateCatalog for MemoryCandidateCatalog {
    async fn candidates(
        &self,
        trip: &TripId,
        category: CandidateCategory,
    ) -> Result<Vec<Candidate>, CatalogError> {
        Ok(self
            .lock()?
            .get(trip)
            .map(|all| {
                all.iter()
                    .filter(|c| c.category == category)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn offer(&self, trip: &TripId, candidates: Vec<Candidate>) -> Result<(), CatalogError> {
        let mut offered = self.lock()?;
        let list = offered.entry(trip.clone()).or_default();
        for candidate in candidates {
            if !list.iter().any(|c| c.id == candidate.id) {
                list.push(candidate);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_offer_filters_by_category_and_dedupes() {
        let catalog = MemoryCandidateCatalog::new();
        let trip = TripId::new("lisbon");
        catalog
            .offer(
                &trip,
                vec![
                    Candidate::new("h1", "Casa Azul", CandidateCategory::Hotel),
                    Candidate::new("r1", "Taberna", CandidateCategory::Restaurant),
                    Candidate::new("h2", "Miradouro", CandidateCategory::Hotel),
                ],
            )
            .await
            .unwrap();
        catalog
            .offer(
                &trip,
                vec![Candidate::new("h1", "Renamed", CandidateCategory::Hotel)],
            )
            .await
            .unwrap();

        let hotels = catalog
            .candidates(&trip, CandidateCategory::Hotel)
            .await
            .unwrap();
        assert_eq!(hotels.len(), 2);
        assert_eq!(hotels[0].name, "Casa Azul");
        assert!(
            catalog
                .candidates(&TripId::new("porto"), CandidateCategory::Hotel)
                .await
                .unwrap()
                .is_empty()
        );
    }
}
