use anyhow::Result;
use std::sync::Arc;

use course4me::api::http::HttpApi;
use course4me::config::Config;
use course4me::constants::{ERROR_NO_API_TOKEN, NOT_ENOUGH_REVIEWS};
use course4me::logger::Logger;
use course4me::stats::{display_average, CourseRatingField};
use course4me::storage::{LocalStorage, Session};
use course4me::sync::{SignalHub, SyncOptions, SyncService, SyncStatus};

#[tokio::main]
async fn main() -> Result<()> {
    if std::env::args().nth(1).as_deref() == Some("--generate-config") {
        return Config::generate_default_config(Config::get_default_config_path()?);
    }

    let config = Config::load()?;
    let _logger = Logger::from_config(config.logging.enabled)?;

    let storage = Arc::new(LocalStorage::from_config(&config).await?);
    let hub = SignalHub::new(Arc::clone(&storage));

    let session = Session::load(&storage).await?;
    let Some(token) = session.token.clone().or_else(|| config.env_token()) else {
        eprintln!("{ERROR_NO_API_TOKEN}");
        eprintln!("\n💡 To use this client:");
        eprintln!("1. Sign in on the Course4Me website and copy your token");
        eprintln!("2. Set it as environment variable: export {}=your_token_here", config.api.token_env);
        eprintln!("3. Run the client again to see your dashboard");
        return Ok(());
    };

    let api = Arc::new(HttpApi::new(&config.resolved_base_url(), Some(token))?);
    let service = SyncService::new(api, &hub, SyncOptions::from(&config));

    match service.sync().await? {
        SyncStatus::Error { message } => {
            eprintln!("❌ {message}");
            return Ok(());
        }
        SyncStatus::InProgress | SyncStatus::Success => {}
    }

    let dashboard = service.dashboard().await?;
    if let Some(name) = session.user_full_name.as_deref() {
        println!("👋 {name}");
    }
    println!("📚 Followed courses: {}", dashboard.tracked_courses.len());
    for card in &dashboard.tracked_courses {
        let overall = card.stats.as_ref().and_then(|stats| stats.overall);
        let interest = card
            .stats
            .as_ref()
            .and_then(|stats| stats.average(CourseRatingField::Interest));
        println!(
            "  • {} ({}) - {} review(s), overall {}, interest {}",
            card.course.title,
            card.course.course_number,
            card.review_count,
            if card.review_count == 0 {
                NOT_ENOUGH_REVIEWS.to_string()
            } else {
                display_average(overall)
            },
            display_average(interest),
        );
    }
    println!("👩‍🏫 Followed lecturers: {}", dashboard.tracked_lecturer_count);
    println!("✉️  Open contact requests: {}", dashboard.open_contact_requests);

    Ok(())
}
