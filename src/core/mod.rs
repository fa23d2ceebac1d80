// Core engine exports
pub mod assistant;
pub mod dialogue;
pub mod facets;
pub mod intent;
pub mod matcher;
pub mod scoring;
pub mod session;

pub use assistant::{spawn_assistant, AssistantHandle};
pub use dialogue::{advance, DialogueState, Script, Transition, TurnOutcome};
pub use intent::{classify, Intent};
pub use matcher::{RecommendationResult, Recommender};
pub use scoring::{display_score, match_reasons};
pub use session::{
    Conversation, IgnoreReason, PropertySelector, ReplyTiming, ScheduledReply, SessionError,
    Submission,
};
