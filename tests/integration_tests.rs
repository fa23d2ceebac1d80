// Integration tests for VYBR Assistant

use std::sync::{Arc, Mutex};
use std::time::Duration;
use vybr_assistant::core::{
    spawn_assistant, Conversation, DialogueState, IgnoreReason, ReplyTiming, Script, Submission,
};
use vybr_assistant::models::{Author, BudgetBand, Message};
use vybr_assistant::services::PropertyCatalog;

fn create_conversation() -> Conversation {
    let catalog = PropertyCatalog::builtin().expect("builtin catalog");
    Conversation::new(catalog.shared())
        .with_seed(2024)
        .with_timing(ReplyTiming::instant())
}

fn last_reply(conversation: &Conversation) -> &Message {
    conversation
        .transcript()
        .iter()
        .rev()
        .find(|message| message.is_assistant())
        .expect("assistant message")
}

#[test]
fn test_scenario_help_request_asks_for_budget() {
    let mut conversation = create_conversation();

    conversation.exchange("Help me find housing");

    let reply = last_reply(&conversation);
    assert_eq!(reply.text, Script::Budget.content());
    assert_eq!(
        reply.suggestions(),
        ["Under $600", "$600-800", "$800-1200", "$1200+", "I'm flexible"]
    );
    assert_eq!(conversation.state(), DialogueState::AwaitingBudget);
}

#[test]
fn test_scenario_bare_budget_answer() {
    let mut conversation = create_conversation();
    conversation.exchange("Help me find housing");

    conversation.exchange("under 600");

    assert_eq!(conversation.preferences().budget_band, Some(BudgetBand::Under600));
    assert_eq!(last_reply(&conversation).text, Script::Roommates.content());
    assert_eq!(conversation.state(), DialogueState::AwaitingRoommates);
}

#[test]
fn test_scenario_amenities_produce_recommendations() {
    let mut conversation = create_conversation();

    conversation.exchange("I want wifi and a gym");

    let amenities: Vec<_> = conversation.preferences().desired_amenities.iter().cloned().collect();
    assert_eq!(amenities, vec!["Gym".to_string(), "WiFi".to_string()]);

    let reply = last_reply(&conversation);
    assert_eq!(reply.text, Script::Recommendations.content());
    let recommendations = reply.recommendations.as_ref().expect("recommendations attached");
    assert!(!recommendations.is_empty() && recommendations.len() <= 2);
    for scored in recommendations {
        assert!((80..=100).contains(&scored.match_score));
        assert!(!scored.match_reasons.is_empty());
        // Both builtin listings offer WiFi
        assert!(scored
            .match_reasons
            .contains(&"Includes your preferred amenities".to_string()));
    }
}

#[test]
fn test_scenario_whitespace_is_ignored() {
    let mut conversation = create_conversation();
    conversation.exchange("Help me find housing");
    let before = conversation.transcript().len();

    let submission = conversation.submit_utterance("   ");

    assert!(matches!(submission, Submission::Ignored(IgnoreReason::Empty)));
    assert_eq!(conversation.transcript().len(), before);
    assert_eq!(conversation.state(), DialogueState::AwaitingBudget);
}

#[test]
fn test_full_walkthrough_with_chips() {
    let mut conversation = create_conversation();
    let chips = [
        "Help me find housing",
        "$600-800",
        "I need to find roommates",
        "Walking distance to campus",
        "Apartment",
        "WiFi & utilities included",
    ];
    let scripts = [
        Script::Budget,
        Script::Roommates,
        Script::Location,
        Script::HousingType,
        Script::Amenities,
        Script::Recommendations,
    ];

    for (chip, script) in chips.iter().zip(scripts) {
        let reply = conversation.exchange(chip).expect("reply delivered");
        assert_eq!(reply.text, script.content(), "after {}", chip);
    }

    assert_eq!(conversation.state(), DialogueState::Recommending);
    // welcome + six user turns + six replies
    assert_eq!(conversation.transcript().len(), 13);

    let recommendations: Vec<_> = conversation
        .transcript()
        .iter()
        .filter(|message| message.recommendations.is_some())
        .collect();
    assert_eq!(recommendations.len(), 1);
    assert_eq!(recommendations[0].author, Author::Assistant);

    let first = &recommendations[0].recommendations.as_ref().unwrap()[0];
    assert_eq!(first.property.id, "1");
    assert_eq!(
        first.match_reasons,
        vec![
            "Walking distance to campus",
            "Has potential roommates",
            "Includes your preferred amenities",
            "Highly rated by students",
        ]
    );
}

#[test]
fn test_fallback_offers_facet_chips() {
    let mut conversation = create_conversation();

    let reply = conversation.exchange("hello there").expect("reply delivered");

    assert_eq!(reply.text, Script::Clarify.content());
    assert_eq!(
        reply.suggestions(),
        ["My budget range", "Location preferences", "Housing type", "Amenities I need"]
    );
}

#[test]
fn test_same_seed_same_transcript_scores() {
    let run = || {
        let mut conversation = create_conversation();
        conversation
            .exchange("Parking")
            .and_then(|reply| reply.recommendations.clone())
            .unwrap()
            .into_iter()
            .map(|scored| scored.match_score)
            .collect::<Vec<_>>()
    };

    assert_eq!(run(), run());
}

#[tokio::test(start_paused = true)]
async fn test_assistant_reply_arrives_after_delay() {
    let catalog = PropertyCatalog::builtin().unwrap();
    let conversation = Conversation::new(catalog.shared())
        .with_seed(9)
        .with_timing(ReplyTiming::new(Duration::from_millis(1000), Duration::from_millis(3000)));

    let (handle, task) = spawn_assistant(conversation);
    let mut events = handle.subscribe();
    let started = tokio::time::Instant::now();

    handle.submit_utterance("Help me find housing").await.unwrap();

    let user = events.recv().await.unwrap();
    assert_eq!(user.author, Author::User);

    let reply = events.recv().await.unwrap();
    let waited = started.elapsed();
    assert_eq!(reply.text, Script::Budget.content());
    assert!(waited >= Duration::from_millis(1000), "waited {:?}", waited);
    assert!(waited <= Duration::from_millis(3100), "waited {:?}", waited);

    drop(handle);
    let conversation = task.await.unwrap();
    assert_eq!(conversation.transcript().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_assistant_drops_input_while_reply_pending() {
    let catalog = PropertyCatalog::builtin().unwrap();
    let conversation = Conversation::new(catalog.shared()).with_seed(3);

    let (handle, task) = spawn_assistant(conversation);

    handle.submit_utterance("$600-800").await.unwrap();
    handle.submit_utterance("$1200+").await.unwrap();

    let preferences = handle.preferences().await.unwrap();
    assert_eq!(preferences.budget_band, Some(BudgetBand::From600To800));

    tokio::time::sleep(Duration::from_secs(5)).await;

    let transcript = handle.transcript().await.unwrap();
    let authors: Vec<_> = transcript.iter().map(|message| message.author).collect();
    assert_eq!(authors, vec![Author::Assistant, Author::User, Author::Assistant]);
    assert_eq!(transcript[2].text, Script::Roommates.content());

    // Input opens up again once the reply landed
    handle.submit_utterance("$1200+").await.unwrap();
    assert_eq!(
        handle.preferences().await.unwrap().budget_band,
        Some(BudgetBand::Over1200)
    );

    drop(handle);
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_pending_reply_lands_after_hang_up() {
    let catalog = PropertyCatalog::builtin().unwrap();
    let conversation = Conversation::new(catalog.shared()).with_seed(5);

    let (handle, task) = spawn_assistant(conversation);
    handle.submit_utterance("Furnished").await.unwrap();
    drop(handle);

    let conversation = task.await.unwrap();
    let reply = conversation.transcript().last().unwrap();
    assert_eq!(reply.text, Script::Recommendations.content());
    assert!(!conversation.is_awaiting_reply());
}

#[tokio::test(start_paused = true)]
async fn test_recommendation_selection_forwarded() {
    let selected = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&selected);
    let catalog = PropertyCatalog::builtin().unwrap();
    let conversation = Conversation::new(catalog.shared()).with_selector(Arc::new(move |id: &str| {
        sink.lock().unwrap().push(id.to_string());
    }));

    let (handle, task) = spawn_assistant(conversation);
    handle.select_recommendation("2").await.unwrap();
    drop(handle);
    task.await.unwrap();

    assert_eq!(*selected.lock().unwrap(), vec!["2".to_string()]);
}

#[test]
fn test_transcript_snapshot_without_paused_clock() {
    tokio_test::block_on(async {
        let catalog = PropertyCatalog::builtin().unwrap();
        let conversation = Conversation::new(catalog.shared()).with_timing(ReplyTiming::instant());

        let (handle, task) = spawn_assistant(conversation);
        let mut events = handle.subscribe();

        handle.select_suggestion("Show me options near campus").await.unwrap();
        events.recv().await.unwrap();
        let reply = events.recv().await.unwrap();
        assert_eq!(reply.text, Script::HousingType.content());

        let transcript = handle.transcript().await.unwrap();
        assert_eq!(transcript.len(), 3);

        drop(handle);
        task.await.unwrap();
    });
}
