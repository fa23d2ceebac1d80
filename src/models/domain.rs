use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use validator::Validate;

/// Number of match reasons shown on a recommendation card
pub const DISPLAY_REASON_LIMIT: usize = 2;

/// Current tenant living in a listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roommate {
    pub name: String,
    pub age: u8,
    pub major: String,
    #[serde(default)]
    pub bio: String,
}

/// Listing from the candidate pool. Read-only to the assistant.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Property {
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(length(min = 1))]
    pub title: String,
    /// Monthly rent in dollars
    pub price: u32,
    #[serde(default)]
    pub location: String,
    /// Miles from campus
    #[serde(rename = "distance")]
    #[validate(range(min = 0.0))]
    pub distance_miles: f64,
    #[serde(default)]
    pub bedrooms: u8,
    #[serde(default)]
    pub bathrooms: u8,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[validate(range(min = 0.0, max = 5.0))]
    pub rating: f64,
    #[serde(default)]
    pub reviews: u32,
    #[serde(default)]
    pub roommates: Vec<Roommate>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Property {
    pub fn has_roommates(&self) -> bool {
        !self.roommates.is_empty()
    }
}

/// Monthly budget bracket picked during the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetBand {
    #[serde(rename = "under-600")]
    Under600,
    #[serde(rename = "600-800")]
    From600To800,
    #[serde(rename = "800-1200")]
    From800To1200,
    #[serde(rename = "1200-plus")]
    Over1200,
}

impl BudgetBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetBand::Under600 => "under-600",
            BudgetBand::From600To800 => "600-800",
            BudgetBand::From800To1200 => "800-1200",
            BudgetBand::Over1200 => "1200-plus",
        }
    }
}

impl fmt::Display for BudgetBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampusProximity {
    Walking,
    Transport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LivingEnvironment {
    Quiet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HousingType {
    Apartment,
    Dorm,
    House,
    Studio,
}

/// Housing preferences collected over one conversation
///
/// Facets start unset and are only ever overwritten, never cleared.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreferenceRecord {
    #[serde(rename = "budgetBand")]
    pub budget_band: Option<BudgetBand>,
    #[serde(rename = "needsRoommates")]
    pub needs_roommates: Option<bool>,
    #[serde(rename = "campusProximity")]
    pub campus_proximity: Option<CampusProximity>,
    #[serde(rename = "livingEnvironment")]
    pub living_environment: Option<LivingEnvironment>,
    #[serde(rename = "housingType")]
    pub housing_type: Option<HousingType>,
    #[serde(rename = "desiredAmenities", default)]
    pub desired_amenities: BTreeSet<String>,
}

impl PreferenceRecord {
    /// Whether any desired amenity is offered by the listing
    pub fn shares_amenity_with(&self, property: &Property) -> bool {
        property
            .amenities
            .iter()
            .any(|amenity| self.desired_amenities.contains(amenity))
    }
}

/// Candidate annotated for display in a recommendation card
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredProperty {
    #[serde(flatten)]
    pub property: Property,
    /// Decorative percentage, not a ranking signal
    #[serde(rename = "matchScore")]
    pub match_score: u8,
    #[serde(rename = "matchReasons")]
    pub match_reasons: Vec<String>,
}

impl ScoredProperty {
    /// Reasons rendered on the card; the full list stays on `match_reasons`
    pub fn display_reasons(&self) -> &[String] {
        let end = self.match_reasons.len().min(DISPLAY_REASON_LIMIT);
        &self.match_reasons[..end]
    }
}
