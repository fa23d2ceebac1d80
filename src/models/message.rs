use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::ScoredProperty;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    Assistant,
    User,
}

/// Transcript entry. Never modified after it is appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub author: Author,
    pub text: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "suggestedReplies", skip_serializing_if = "Option::is_none")]
    pub suggested_replies: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<ScoredProperty>>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            author: Author::User,
            text: text.into(),
            created_at: Utc::now(),
            suggested_replies: None,
            recommendations: None,
        }
    }

    pub fn assistant(text: impl Into<String>, suggestions: &[&str]) -> Self {
        Self {
            id: Uuid::new_v4(),
            author: Author::Assistant,
            text: text.into(),
            created_at: Utc::now(),
            suggested_replies: Some(suggestions.iter().map(|s| s.to_string()).collect()),
            recommendations: None,
        }
    }

    pub fn with_recommendations(mut self, recommendations: Vec<ScoredProperty>) -> Self {
        self.recommendations = Some(recommendations);
        self
    }

    pub fn is_assistant(&self) -> bool {
        self.author == Author::Assistant
    }

    /// Suggestion chips offered with this message, if any
    pub fn suggestions(&self) -> &[String] {
        self.suggested_replies.as_deref().unwrap_or(&[])
    }
}
