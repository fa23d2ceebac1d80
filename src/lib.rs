//! VYBR Assistant - rule-based housing assistant for the VYBR student housing app
//!
//! This library provides the conversational core behind the in-app housing
//! assistant: a keyword intent classifier, a scripted dialogue table that
//! collects housing preferences turn by turn, and a recommendation scorer
//! that annotates listings from a fixed candidate pool.

pub mod config;
pub mod core;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use core::{
    classify, spawn_assistant, AssistantHandle, Conversation, Intent, Recommender, Script,
};
pub use models::{Message, PreferenceRecord, Property, ScoredProperty};
pub use services::PropertyCatalog;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        assert_eq!(classify("$600-800"), Intent::Budget);
        assert!(PropertyCatalog::builtin().is_ok());
    }
}
