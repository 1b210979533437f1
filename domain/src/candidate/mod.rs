//! Candidates offered to members in swipe decks.

use crate::core::error::DomainError;
use crate::trip::CandidateId;
use serde::{Deserialize, Serialize};

/// Deck category; decks are served in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateCategory {
    Hotel,
    Restaurant,
    Activity,
}

impl CandidateCategory {
    /// All categories in deck order: hotel → restaurant → activity
    pub const ORDER: [CandidateCategory; 3] = [
        CandidateCategory::Hotel,
        CandidateCategory::Restaurant,
        CandidateCategory::Activity,
    ];

    /// The category served after this one, if any
    pub fn next(&self) -> Option<Self> {
        match self {
            CandidateCategory::Hotel => Some(CandidateCategory::Restaurant),
            CandidateCategory::Restaurant => Some(CandidateCategory::Activity),
            CandidateCategory::Activity => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateCategory::Hotel => "hotel",
            CandidateCategory::Restaurant => "restaurant",
            CandidateCategory::Activity => "activity",
        }
    }
}

impl std::fmt::Display for CandidateCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CandidateCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hotel" | "hotels" => Ok(CandidateCategory::Hotel),
            "restaurant" | "restaurants" => Ok(CandidateCategory::Restaurant),
            "activity" | "activities" => Ok(CandidateCategory::Activity),
            other => Err(DomainError::UnknownCategory(other.to_string())),
        }
    }
}

/// A bookable place or activity (business/location record)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    pub category: CandidateCategory,
}

impl Candidate {
    pub fn new(
        id: impl Into<CandidateId>,
        name: impl Into<String>,
        category: CandidateCategory,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_order() {
        assert_eq!(CandidateCategory::Hotel.next(), Some(CandidateCategory::Restaurant));
        assert_eq!(
            CandidateCategory::Restaurant.next(),
            Some(CandidateCategory::Activity)
        );
        assert_eq!(CandidateCategory::Activity.next(), None);

        let mut sorted = vec![
            CandidateCategory::Activity,
            CandidateCategory::Hotel,
            CandidateCategory::Restaurant,
        ];
        sorted.sort();
        assert_eq!(sorted, CandidateCategory::ORDER.to_vec());
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(
            "Hotels".parse::<CandidateCategory>().ok(),
            Some(CandidateCategory::Hotel)
        );
        assert!("museum".parse::<CandidateCategory>().is_err());
    }
}
