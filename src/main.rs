use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use vybr_assistant::config::{LoggingSettings, Settings};
use vybr_assistant::core::{spawn_assistant, Conversation};
use vybr_assistant::models::{Message, Property};
use vybr_assistant::services::PropertyCatalog;

/// One line of terminal input
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Quit,
    Preferences,
    Select(&'a str),
    Chip(usize),
    Text(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    let trimmed = line.trim();
    if trimmed == "/quit" {
        return Input::Quit;
    }
    if trimmed == "/prefs" {
        return Input::Preferences;
    }
    if let Some(id) = trimmed.strip_prefix("/select ") {
        return Input::Select(id.trim());
    }
    if let Some(number) = trimmed.strip_prefix('#') {
        if let Ok(n) = number.parse::<usize>() {
            return Input::Chip(n);
        }
    }
    Input::Text(line)
}

fn init_logging(settings: &LoggingSettings) {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.format.clone());

    let filter = EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    // Chat goes to stdout, logs to stderr
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    match log_format.as_str() {
        "pretty" => subscriber.pretty().init(),
        "json" => subscriber.json().init(),
        _ => subscriber.init(),
    }
}

fn render_message(message: &Message) {
    println!("\nVYBR AI: {}", message.text);

    if let Some(recommendations) = &message.recommendations {
        for scored in recommendations {
            let property = &scored.property;
            println!(
                "  [{}] {} - {}% match",
                property.id, property.title, scored.match_score
            );
            println!(
                "      ${}/month, {}mi from campus",
                property.price, property.distance_miles
            );
            println!("      {}", scored.display_reasons().join(" | "));
        }
    }

    for (index, suggestion) in message.suggestions().iter().enumerate() {
        println!("  #{} {}", index + 1, suggestion);
    }
}

fn render_property(property: &Property) {
    println!("\n{} ({})", property.title, property.location);
    println!(
        "  ${}/month | {} bed / {} bath | {}mi from campus",
        property.price, property.bedrooms, property.bathrooms, property.distance_miles
    );
    println!("  Rated {} ({} reviews)", property.rating, property.reviews);
    if !property.amenities.is_empty() {
        println!("  Amenities: {}", property.amenities.join(", "));
    }
    for roommate in &property.roommates {
        println!("  Roommate: {}, {} ({})", roommate.name, roommate.age, roommate.major);
    }
    if let Some(description) = &property.description {
        println!("  {}", description);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&settings.logging);

    info!("Starting VYBR housing assistant...");

    let catalog = PropertyCatalog::load_or_builtin(settings.catalog.path.as_deref())
        .map_err(|e| {
            error!("Failed to load property catalog: {}", e);
            e
        })?;

    info!("Catalog loaded ({} properties)", catalog.len());

    let detail_catalog = catalog.clone();
    let selector = Arc::new(move |property_id: &str| match detail_catalog.get(property_id) {
        Some(property) => render_property(property),
        None => println!("\nNo listing with id {}", property_id),
    });

    let mut conversation = Conversation::new(catalog.shared())
        .with_timing(settings.assistant.reply_timing()?)
        .with_recommender(settings.assistant.recommender()?)
        .with_selector(selector);

    if let Some(seed) = settings.assistant.seed {
        conversation = conversation.with_seed(seed);
    }

    for message in conversation.transcript() {
        render_message(message);
    }

    let (handle, task) = spawn_assistant(conversation);

    let mut events = handle.subscribe();
    let printer = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(message) if message.is_assistant() => render_message(&message),
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => warn!("Skipped {} transcript updates", skipped),
                Err(RecvError::Closed) => break,
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_input(&line) {
            Input::Quit => break,
            Input::Preferences => {
                let preferences = handle.preferences().await?;
                println!("{}", serde_json::to_string_pretty(&preferences)?);
            }
            Input::Select(property_id) => handle.select_recommendation(property_id).await?,
            Input::Chip(number) => {
                let transcript = handle.transcript().await?;
                let chip = transcript
                    .iter()
                    .rev()
                    .find(|message| message.is_assistant())
                    .and_then(|message| message.suggestions().get(number.wrapping_sub(1)))
                    .cloned();

                match chip {
                    Some(chip) => {
                        println!("> {}", chip);
                        handle.select_suggestion(chip).await?;
                    }
                    None => println!("No suggestion #{}", number),
                }
            }
            Input::Text(text) => handle.submit_utterance(text).await?,
        }
    }

    // Let the last reply land before exiting
    drop(handle);
    let conversation = task.await?;
    printer.await?;

    info!(
        conversation = %conversation.id(),
        messages = conversation.transcript().len(),
        "Session ended"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_input("/quit"), Input::Quit);
        assert_eq!(parse_input(" /prefs "), Input::Preferences);
        assert_eq!(parse_input("/select 2"), Input::Select("2"));
        assert_eq!(parse_input("#3"), Input::Chip(3));
    }

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(parse_input("#wifi please"), Input::Text("#wifi please"));
        assert_eq!(parse_input("   "), Input::Text("   "));
    }
}
