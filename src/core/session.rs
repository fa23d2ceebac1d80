//! Conversation session: one transcript, one preference record, one script
//! position. Owned by the caller; nothing here is global.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::core::dialogue::{self, DialogueState, Script, TurnOutcome};
use crate::core::matcher::Recommender;
use crate::models::{Message, PreferenceRecord, Property};

/// Errors that can occur while driving a conversation
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No reply is pending")]
    NoPendingReply,

    #[error("Assistant task has stopped")]
    Closed,
}

/// Receives the id of a recommendation the user tapped
pub trait PropertySelector: Send + Sync {
    fn on_property_selected(&self, property_id: &str);
}

impl<F> PropertySelector for F
where
    F: Fn(&str) + Send + Sync,
{
    fn on_property_selected(&self, property_id: &str) {
        self(property_id)
    }
}

/// Bounds of the simulated "thinking" delay before a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyTiming {
    min: Duration,
    max: Duration,
}

impl ReplyTiming {
    /// `max` below `min` is raised to `min`
    pub fn new(min: Duration, max: Duration) -> Self {
        Self { min, max: max.max(min) }
    }

    pub fn instant() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    pub fn min(&self) -> Duration {
        self.min
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }
}

impl Default for ReplyTiming {
    fn default() -> Self {
        Self::new(Duration::from_millis(1000), Duration::from_millis(3000))
    }
}

/// Why a submission did not start a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Empty or whitespace-only input
    Empty,
    /// A reply to the previous turn has not been delivered yet
    AwaitingReply,
}

/// Receipt for a reply the session is holding until its delay elapses
#[derive(Debug, Clone)]
pub struct ScheduledReply {
    reply_id: Uuid,
    delay: Duration,
    outcome: TurnOutcome,
}

impl ScheduledReply {
    pub fn reply_id(&self) -> Uuid {
        self.reply_id
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn outcome(&self) -> &TurnOutcome {
        &self.outcome
    }
}

#[derive(Debug)]
pub enum Submission {
    Ignored(IgnoreReason),
    Scheduled(ScheduledReply),
}

impl Submission {
    pub fn is_scheduled(&self) -> bool {
        matches!(self, Submission::Scheduled(_))
    }
}

pub struct Conversation {
    id: Uuid,
    state: DialogueState,
    preferences: PreferenceRecord,
    transcript: Vec<Message>,
    pending: Option<Message>,
    pool: Arc<[Property]>,
    recommender: Recommender,
    timing: ReplyTiming,
    rng: StdRng,
    selector: Option<Arc<dyn PropertySelector>>,
}

impl Conversation {
    /// Start a session over a candidate pool; the welcome message is
    /// already in the transcript.
    pub fn new(pool: impl Into<Arc<[Property]>>) -> Self {
        let welcome = Message::assistant(Script::Welcome.content(), Script::Welcome.suggestions());
        let conversation = Self {
            id: Uuid::new_v4(),
            state: DialogueState::Init,
            preferences: PreferenceRecord::default(),
            transcript: vec![welcome],
            pending: None,
            pool: pool.into(),
            recommender: Recommender::default(),
            timing: ReplyTiming::default(),
            rng: StdRng::from_entropy(),
            selector: None,
        };

        tracing::info!(
            conversation = %conversation.id,
            candidates = conversation.pool.len(),
            "conversation started"
        );
        conversation
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_timing(mut self, timing: ReplyTiming) -> Self {
        self.timing = timing;
        self
    }

    pub fn with_recommender(mut self, recommender: Recommender) -> Self {
        self.recommender = recommender;
        self
    }

    pub fn with_selector(mut self, selector: Arc<dyn PropertySelector>) -> Self {
        self.selector = Some(selector);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> DialogueState {
        self.state
    }

    pub fn preferences(&self) -> &PreferenceRecord {
        &self.preferences
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    /// Input is disabled while this is true
    pub fn is_awaiting_reply(&self) -> bool {
        self.pending.is_some()
    }

    /// Append the user's message and prepare the assistant's reply
    ///
    /// Preferences and dialogue state change immediately. The reply is held
    /// by the session and only reaches the transcript through
    /// [`Conversation::deliver`]; dropping the returned receipt does not
    /// cancel it.
    pub fn submit_utterance(&mut self, text: &str) -> Submission {
        if text.trim().is_empty() {
            tracing::debug!(conversation = %self.id, "ignoring empty input");
            return Submission::Ignored(IgnoreReason::Empty);
        }
        if self.pending.is_some() {
            tracing::warn!(conversation = %self.id, "input rejected while a reply is pending");
            return Submission::Ignored(IgnoreReason::AwaitingReply);
        }

        self.transcript.push(Message::user(text));

        let outcome = dialogue::advance(self.state, &mut self.preferences, text);
        self.state = outcome.next_state;

        let script = outcome.script;
        let mut reply = Message::assistant(script.content(), script.suggestions());
        if outcome.recommend {
            let result = self
                .recommender
                .recommend(&self.preferences, &self.pool, &mut self.rng);
            tracing::debug!(
                conversation = %self.id,
                recommended = result.recommendations.len(),
                total_candidates = result.total_candidates,
                "attached recommendations"
            );
            reply = reply.with_recommendations(result.recommendations);
        }

        let delay = self.timing.sample(&mut self.rng);
        let reply_id = reply.id;
        self.pending = Some(reply);

        Submission::Scheduled(ScheduledReply {
            reply_id,
            delay,
            outcome,
        })
    }

    /// Suggestion chips are pre-filled input
    pub fn select_suggestion(&mut self, text: &str) -> Submission {
        self.submit_utterance(text)
    }

    /// Append the held reply and reopen input
    pub fn deliver(&mut self) -> Result<&Message, SessionError> {
        let reply = self.pending.take().ok_or(SessionError::NoPendingReply)?;
        self.transcript.push(reply);
        Ok(&self.transcript[self.transcript.len() - 1])
    }

    /// Submit and deliver in one step, skipping the delay
    pub fn exchange(&mut self, text: &str) -> Option<&Message> {
        match self.submit_utterance(text) {
            Submission::Scheduled(_) => self.deliver().ok(),
            Submission::Ignored(_) => None,
        }
    }

    /// Forward a tapped recommendation to the selection collaborator
    pub fn on_recommendation_selected(&self, property_id: &str) {
        tracing::info!(conversation = %self.id, property_id, "recommendation selected");
        match &self.selector {
            Some(selector) => selector.on_property_selected(property_id),
            None => tracing::debug!(conversation = %self.id, "no property selector attached"),
        }
    }
}

impl std::fmt::Debug for Conversation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Conversation")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("preferences", &self.preferences)
            .field("messages", &self.transcript.len())
            .field("pending", &self.pending.as_ref().map(|reply| reply.id))
            .finish_non_exhaustive()
    }
}
