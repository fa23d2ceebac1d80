use rand::Rng;

use crate::models::{CampusProximity, PreferenceRecord, Property};

/// Listings at or below this rent count as within any budget band
pub const BUDGET_PRICE_CEILING: u32 = 1000;

/// Listings closer than this many miles count as walking distance
pub const WALKING_DISTANCE_MILES: f64 = 1.0;

pub const HIGH_RATING: f64 = 4.5;

pub const FALLBACK_REASON: &str = "Great match for students";

/// Derive the reasons shown on a recommendation card
///
/// Reason order:
///   1. budget band set and rent within the ceiling
///   2. walking proximity requested and listing under a mile away
///   3. roommates requested and listing has current tenants
///   4. desired amenities overlap with listing amenities
///   5. rating at or above 4.5
///
/// Never empty: falls back to a generic reason.
pub fn match_reasons(preferences: &PreferenceRecord, property: &Property) -> Vec<String> {
    let mut reasons = Vec::new();

    if preferences.budget_band.is_some() && property.price <= BUDGET_PRICE_CEILING {
        reasons.push("Within your budget range".to_string());
    }

    if preferences.campus_proximity == Some(CampusProximity::Walking)
        && property.distance_miles < WALKING_DISTANCE_MILES
    {
        reasons.push("Walking distance to campus".to_string());
    }

    if preferences.needs_roommates == Some(true) && property.has_roommates() {
        reasons.push("Has potential roommates".to_string());
    }

    if preferences.shares_amenity_with(property) {
        reasons.push("Includes your preferred amenities".to_string());
    }

    if property.rating >= HIGH_RATING {
        reasons.push("Highly rated by students".to_string());
    }

    if reasons.is_empty() {
        reasons.push(FALLBACK_REASON.to_string());
    }

    reasons
}

/// Decorative match percentage in 80..=99
///
/// Not derived from the listing; recommendation order is pool order.
#[inline]
pub fn display_score<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    rng.gen_range(80..100)
}
