use serde::{Deserialize, Serialize};

/// Topic of a user utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Budget,
    Roommates,
    Location,
    HousingType,
    Amenities,
    HelpRequest,
    Fallback,
}

/// Keyword tables in priority order. The first intent with a keyword
/// contained in the utterance wins, so "furnished apartment under $800"
/// is a Budget turn.
const KEYWORD_TABLE: &[(Intent, &[&str])] = &[
    (Intent::Budget, &["budget", "$", "rent"]),
    (Intent::Roommates, &["roommate", "living"]),
    (Intent::Location, &["campus", "location", "transport"]),
    (Intent::HousingType, &["apartment", "dorm", "house", "studio"]),
    (Intent::Amenities, &["wifi", "furnished", "gym", "parking"]),
    (Intent::HelpRequest, &["help", "start", "find"]),
];

impl Intent {
    /// Keywords that select this intent. Empty for `Fallback`.
    pub fn keywords(&self) -> &'static [&'static str] {
        KEYWORD_TABLE
            .iter()
            .find(|(intent, _)| intent == self)
            .map(|(_, keywords)| *keywords)
            .unwrap_or(&[])
    }
}

/// Classify an utterance by case-insensitive keyword containment
///
/// Total and pure: anything without a known keyword is `Fallback`.
pub fn classify(utterance: &str) -> Intent {
    let lower = utterance.to_lowercase();
    classify_lowercase(&lower)
}

/// Same as [`classify`] for text that is already lowercased
pub(crate) fn classify_lowercase(lower: &str) -> Intent {
    KEYWORD_TABLE
        .iter()
        .find(|(_, keywords)| contains_any(lower, keywords))
        .map(|(intent, _)| *intent)
        .unwrap_or(Intent::Fallback)
}

#[inline]
pub(crate) fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| text.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_intent_has_a_trigger() {
        assert_eq!(classify("What's my budget range?"), Intent::Budget);
        assert_eq!(classify("I need roommates"), Intent::Roommates);
        assert_eq!(classify("Show me options near campus"), Intent::Location);
        assert_eq!(classify("Student dorms"), Intent::HousingType);
        assert_eq!(classify("Gym/fitness center"), Intent::Amenities);
        assert_eq!(classify("Help me find housing"), Intent::HelpRequest);
        assert_eq!(classify("hello there"), Intent::Fallback);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(classify("WIFI PLEASE"), Intent::Amenities);
        assert_eq!(classify("Apartment"), Intent::HousingType);
    }

    #[test]
    fn test_priority_budget_beats_housing_type() {
        assert_eq!(
            classify("I need a furnished apartment under $800"),
            Intent::Budget
        );
    }

    #[test]
    fn test_priority_roommates_beats_help() {
        // "find" is a help keyword but roommates is checked first
        assert_eq!(classify("I need to find roommates"), Intent::Roommates);
    }

    #[test]
    fn test_housing_does_not_match_house() {
        assert_ne!(classify("housing"), Intent::HousingType);
    }

    #[test]
    fn test_fallback_has_no_keywords() {
        assert!(Intent::Fallback.keywords().is_empty());
        assert_eq!(Intent::Budget.keywords(), &["budget", "$", "rent"]);
    }
}
