//! Scripted dialogue flow
//!
//! The assistant walks a fixed script: Budget → Roommates → Location →
//! HousingType → Amenities → Recommendations. Each classified intent maps to
//! exactly one row of [`TRANSITIONS`], which names the facet writer to run
//! and the script that follows it. The row depends on the intent only, so
//! a user who answers the budget prompt with amenities jumps straight to
//! recommendations and the skipped facets are never asked for.

use serde::{Deserialize, Serialize};

use crate::core::facets;
use crate::core::intent::{classify_lowercase, Intent};
use crate::models::PreferenceRecord;

/// Which prompt the assistant showed last
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogueState {
    Init,
    AwaitingBudget,
    AwaitingRoommates,
    AwaitingLocation,
    AwaitingHousingType,
    AwaitingAmenities,
    Recommending,
}

impl DialogueState {
    /// Intent whose answer the current prompt asked for
    pub fn awaited_intent(&self) -> Option<Intent> {
        match self {
            DialogueState::AwaitingBudget => Some(Intent::Budget),
            DialogueState::AwaitingRoommates => Some(Intent::Roommates),
            DialogueState::AwaitingLocation => Some(Intent::Location),
            DialogueState::AwaitingHousingType => Some(Intent::HousingType),
            DialogueState::AwaitingAmenities => Some(Intent::Amenities),
            DialogueState::Init | DialogueState::Recommending => None,
        }
    }
}

/// Canned assistant replies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Script {
    Welcome,
    Budget,
    Roommates,
    Location,
    HousingType,
    Amenities,
    Recommendations,
    Clarify,
}

impl Script {
    pub fn content(&self) -> &'static str {
        match self {
            Script::Welcome => "Hi! I'm VYBR AI, your personal housing assistant! 🏠 I'm here to help you find the perfect student accommodation based on your preferences and needs. Let's start by getting to know you better!",
            Script::Budget => "Great! Budget is super important for students. What's your monthly rent budget? 💰",
            Script::Roommates => "Perfect! Living with roommates can be both fun and cost-effective. Are you looking for roommates or do you already have some in mind? 👥",
            Script::Location => "Location is key for student life! How important is being close to campus vs other factors like nightlife, quietness, or public transport? 📍",
            Script::HousingType => "What type of housing are you most interested in? Each has its own benefits! 🏘️",
            Script::Amenities => "What amenities are must-haves for you? Don't worry, we can find something that fits your needs! ✨",
            Script::Recommendations => "Perfect! Based on our conversation, I've found some great options that match your preferences. Here are my top recommendations:",
            Script::Clarify => "I understand! Let me help you find the perfect housing. Can you tell me more about what you're looking for? 🤔",
        }
    }

    pub fn suggestions(&self) -> &'static [&'static str] {
        match self {
            Script::Welcome => &[
                "Help me find housing",
                "What's my budget range?",
                "I need roommates",
                "Show me options near campus",
            ],
            Script::Budget => &["Under $600", "$600-800", "$800-1200", "$1200+", "I'm flexible"],
            Script::Roommates => &[
                "I need to find roommates",
                "I have roommates already",
                "I prefer living alone",
                "Either works for me",
            ],
            Script::Location => &[
                "Walking distance to campus",
                "Near public transport",
                "Quiet neighborhood",
                "Close to nightlife",
                "Mix of everything",
            ],
            Script::HousingType => &[
                "Apartment",
                "Student dorms",
                "Shared house",
                "Studio",
                "I'm open to all",
            ],
            Script::Amenities => &[
                "WiFi & utilities included",
                "Furnished",
                "Gym/fitness center",
                "Parking",
                "Laundry facilities",
                "Pet-friendly",
            ],
            Script::Recommendations => &[
                "Tell me more",
                "Show different options",
                "Help me contact landlords",
                "Save these properties",
            ],
            Script::Clarify => &[
                "My budget range",
                "Location preferences",
                "Housing type",
                "Amenities I need",
            ],
        }
    }
}

/// Writes a refined facet value; returns whether anything was written
pub type FacetWriter = fn(&mut PreferenceRecord, &str) -> bool;

/// One row of the dialogue table
#[derive(Clone, Copy)]
pub struct Transition {
    pub intent: Intent,
    pub next: DialogueState,
    pub script: Script,
    pub write: FacetWriter,
    pub recommend: bool,
}

impl std::fmt::Debug for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transition")
            .field("intent", &self.intent)
            .field("next", &self.next)
            .field("script", &self.script)
            .field("recommend", &self.recommend)
            .finish_non_exhaustive()
    }
}

pub static TRANSITIONS: [Transition; 7] = [
    Transition {
        intent: Intent::Budget,
        next: DialogueState::AwaitingRoommates,
        script: Script::Roommates,
        write: facets::write_budget,
        recommend: false,
    },
    Transition {
        intent: Intent::Roommates,
        next: DialogueState::AwaitingLocation,
        script: Script::Location,
        write: facets::write_roommates,
        recommend: false,
    },
    Transition {
        intent: Intent::Location,
        next: DialogueState::AwaitingHousingType,
        script: Script::HousingType,
        write: facets::write_location,
        recommend: false,
    },
    Transition {
        intent: Intent::HousingType,
        next: DialogueState::AwaitingAmenities,
        script: Script::Amenities,
        write: facets::write_housing_type,
        recommend: false,
    },
    Transition {
        intent: Intent::Amenities,
        next: DialogueState::Recommending,
        script: Script::Recommendations,
        write: facets::write_amenities,
        recommend: true,
    },
    Transition {
        intent: Intent::HelpRequest,
        next: DialogueState::AwaitingBudget,
        script: Script::Budget,
        write: facets::write_nothing,
        recommend: false,
    },
    Transition {
        intent: Intent::Fallback,
        // Overridden with the current state, see `Transition::target`
        next: DialogueState::Init,
        script: Script::Clarify,
        write: facets::write_nothing,
        recommend: false,
    },
];

impl Transition {
    pub fn for_intent(intent: Intent) -> &'static Transition {
        TRANSITIONS
            .iter()
            .find(|row| row.intent == intent)
            .unwrap_or(&TRANSITIONS[TRANSITIONS.len() - 1])
    }

    /// State after taking this row from `current`
    pub fn target(&self, current: DialogueState) -> DialogueState {
        if self.intent == Intent::Fallback {
            current
        } else {
            self.next
        }
    }
}

/// Outcome of applying one user turn
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub classified: Intent,
    pub resolved: Intent,
    pub next_state: DialogueState,
    pub script: Script,
    pub facet_written: bool,
    pub recommend: bool,
}

/// Apply one user turn to the preference record
///
/// A reply with no intent keyword is read as an answer to the prompt the
/// user is looking at ("under 600" after the budget prompt) when the awaited
/// facet's refiner finds a value in it. Otherwise it gets the clarify script.
pub fn advance(
    state: DialogueState,
    preferences: &mut PreferenceRecord,
    utterance: &str,
) -> TurnOutcome {
    let lower = utterance.to_lowercase();
    let classified = classify_lowercase(&lower);

    let mut resolved = classified;
    let mut facet_written = false;

    if classified == Intent::Fallback {
        if let Some(awaited) = state.awaited_intent() {
            let row = Transition::for_intent(awaited);
            if (row.write)(preferences, &lower) {
                resolved = awaited;
                facet_written = true;
            }
        }
    } else {
        facet_written = (Transition::for_intent(classified).write)(preferences, &lower);
    }

    let row = Transition::for_intent(resolved);

    tracing::debug!(
        ?classified,
        ?resolved,
        from = ?state,
        to = ?row.target(state),
        facet_written,
        "dialogue turn"
    );

    TurnOutcome {
        classified,
        resolved,
        next_state: row.target(state),
        script: row.script,
        facet_written,
        recommend: row.recommend,
    }
}
