//! Sub-keyword refinement of a classified turn into preference values.
//!
//! Every refiner receives lowercased text. A refiner that finds nothing
//! leaves the record untouched so earlier answers survive.

use crate::core::intent::contains_any;
use crate::models::{BudgetBand, CampusProximity, HousingType, LivingEnvironment, PreferenceRecord};

/// Amenities the assistant recognizes, as (keyword, canonical name)
const AMENITY_NAMES: &[(&str, &str)] = &[
    ("wifi", "WiFi"),
    ("furnished", "Furnished"),
    ("gym", "Gym"),
    ("parking", "Parking"),
];

/// Location answers fill one of two facets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationAnswer {
    Proximity(CampusProximity),
    Environment(LivingEnvironment),
}

pub fn refine_budget(lower: &str) -> Option<BudgetBand> {
    if lower.contains("600") {
        if lower.contains("under") {
            Some(BudgetBand::Under600)
        } else {
            Some(BudgetBand::From600To800)
        }
    } else if lower.contains("800") {
        Some(BudgetBand::From800To1200)
    } else if lower.contains("1200") {
        Some(BudgetBand::Over1200)
    } else {
        None
    }
}

pub fn refine_roommates(lower: &str) -> Option<bool> {
    if contains_any(lower, &["need to find", "looking for"]) {
        Some(true)
    } else if contains_any(lower, &["alone", "prefer"]) {
        Some(false)
    } else {
        None
    }
}

pub fn refine_location(lower: &str) -> Option<LocationAnswer> {
    if contains_any(lower, &["walking", "close"]) {
        Some(LocationAnswer::Proximity(CampusProximity::Walking))
    } else if lower.contains("transport") {
        Some(LocationAnswer::Proximity(CampusProximity::Transport))
    } else if lower.contains("quiet") {
        Some(LocationAnswer::Environment(LivingEnvironment::Quiet))
    } else {
        None
    }
}

pub fn refine_housing_type(lower: &str) -> Option<HousingType> {
    [
        ("apartment", HousingType::Apartment),
        ("dorm", HousingType::Dorm),
        ("house", HousingType::House),
        ("studio", HousingType::Studio),
    ]
    .into_iter()
    .find(|(keyword, _)| lower.contains(keyword))
    .map(|(_, kind)| kind)
}

/// Canonical amenity names mentioned in the text, in table order
pub fn refine_amenities(lower: &str) -> Vec<&'static str> {
    AMENITY_NAMES
        .iter()
        .filter(|(keyword, _)| lower.contains(keyword))
        .map(|(_, name)| *name)
        .collect()
}

// Facet writers. Each returns whether it wrote anything.

pub fn write_budget(record: &mut PreferenceRecord, lower: &str) -> bool {
    match refine_budget(lower) {
        Some(band) => {
            record.budget_band = Some(band);
            true
        }
        None => false,
    }
}

pub fn write_roommates(record: &mut PreferenceRecord, lower: &str) -> bool {
    match refine_roommates(lower) {
        Some(needs) => {
            record.needs_roommates = Some(needs);
            true
        }
        None => false,
    }
}

pub fn write_location(record: &mut PreferenceRecord, lower: &str) -> bool {
    match refine_location(lower) {
        Some(LocationAnswer::Proximity(proximity)) => {
            record.campus_proximity = Some(proximity);
            true
        }
        Some(LocationAnswer::Environment(environment)) => {
            record.living_environment = Some(environment);
            true
        }
        None => false,
    }
}

pub fn write_housing_type(record: &mut PreferenceRecord, lower: &str) -> bool {
    match refine_housing_type(lower) {
        Some(kind) => {
            record.housing_type = Some(kind);
            true
        }
        None => false,
    }
}

/// Replaces the whole amenity set
pub fn write_amenities(record: &mut PreferenceRecord, lower: &str) -> bool {
    let amenities = refine_amenities(lower);
    if amenities.is_empty() {
        return false;
    }
    record.desired_amenities = amenities.into_iter().map(str::to_string).collect();
    true
}

pub fn write_nothing(_record: &mut PreferenceRecord, _lower: &str) -> bool {
    false
}
