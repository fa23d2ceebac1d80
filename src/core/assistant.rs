//! Runs a [`Conversation`] on its own task.
//!
//! The task owns the session. Callers talk to it through an
//! [`AssistantHandle`]; every message appended to the transcript is
//! broadcast to subscribers. The session holds a scheduled reply; the task
//! only tracks when to deliver it. Submissions arriving in the meantime are
//! dropped by the session's busy flag.

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

use crate::core::session::{Conversation, SessionError, Submission};
use crate::models::{Message, PreferenceRecord};

const COMMAND_BUFFER: usize = 32;
const EVENT_BUFFER: usize = 64;

enum Command {
    Submit(String),
    SelectRecommendation(String),
    Transcript(oneshot::Sender<Vec<Message>>),
    Preferences(oneshot::Sender<PreferenceRecord>),
}

/// Cloneable handle to a running conversation
#[derive(Clone)]
pub struct AssistantHandle {
    commands: mpsc::Sender<Command>,
    events: broadcast::Sender<Message>,
}

impl AssistantHandle {
    /// Queue user input; the reply arrives on [`AssistantHandle::subscribe`]
    pub async fn submit_utterance(&self, text: impl Into<String>) -> Result<(), SessionError> {
        self.send(Command::Submit(text.into())).await
    }

    pub async fn select_suggestion(&self, text: impl Into<String>) -> Result<(), SessionError> {
        self.submit_utterance(text).await
    }

    pub async fn select_recommendation(
        &self,
        property_id: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.send(Command::SelectRecommendation(property_id.into())).await
    }

    /// Snapshot of the transcript as the task currently sees it
    pub async fn transcript(&self) -> Result<Vec<Message>, SessionError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Transcript(tx)).await?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    pub async fn preferences(&self) -> Result<PreferenceRecord, SessionError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Preferences(tx)).await?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    /// Messages appended after this call
    pub fn subscribe(&self) -> broadcast::Receiver<Message> {
        self.events.subscribe()
    }

    async fn send(&self, command: Command) -> Result<(), SessionError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| SessionError::Closed)
    }
}

/// Spawn the conversation task
///
/// The task ends once every handle is dropped and any pending reply has
/// been delivered; it yields the session back.
pub fn spawn_assistant(conversation: Conversation) -> (AssistantHandle, JoinHandle<Conversation>) {
    let (commands_tx, commands_rx) = mpsc::channel(COMMAND_BUFFER);
    let (events_tx, _) = broadcast::channel(EVENT_BUFFER);

    let handle = AssistantHandle {
        commands: commands_tx,
        events: events_tx.clone(),
    };
    let task = tokio::spawn(run(conversation, commands_rx, events_tx));

    (handle, task)
}

async fn run(
    mut conversation: Conversation,
    mut commands: mpsc::Receiver<Command>,
    events: broadcast::Sender<Message>,
) -> Conversation {
    let mut deadline: Option<Instant> = None;

    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(command) => handle_command(&mut conversation, command, &mut deadline, &events),
                None => break,
            },
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                deadline = None;
                deliver(&mut conversation, &events);
            }
        }
    }

    // A scheduled reply always lands, even after the caller hung up
    if let Some(at) = deadline.take() {
        sleep_until(at).await;
        deliver(&mut conversation, &events);
    }

    tracing::info!(conversation = %conversation.id(), "assistant task stopped");
    conversation
}

fn handle_command(
    conversation: &mut Conversation,
    command: Command,
    deadline: &mut Option<Instant>,
    events: &broadcast::Sender<Message>,
) {
    match command {
        Command::Submit(text) => {
            if let Submission::Scheduled(reply) = conversation.submit_utterance(&text) {
                if let Some(user_message) = conversation.transcript().last() {
                    let _ = events.send(user_message.clone());
                }
                *deadline = Some(Instant::now() + reply.delay());
            }
        }
        Command::SelectRecommendation(property_id) => {
            conversation.on_recommendation_selected(&property_id);
        }
        Command::Transcript(reply_to) => {
            let _ = reply_to.send(conversation.transcript().to_vec());
        }
        Command::Preferences(reply_to) => {
            let _ = reply_to.send(conversation.preferences().clone());
        }
    }
}

fn deliver(conversation: &mut Conversation, events: &broadcast::Sender<Message>) {
    let id = conversation.id();
    match conversation.deliver() {
        Ok(message) => {
            // No subscribers is fine
            let _ = events.send(message.clone());
        }
        Err(e) => tracing::error!(conversation = %id, "failed to deliver reply: {}", e),
    }
}
