use room_scanner::{
    CityCatalog, Config, HttpListingClient, Intent, ScannerRuntime, Status, Update,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🏠 Room Scanner");
    info!("===============");

    let config = Config::from_env()?;
    let client = HttpListingClient::with_config(&config)?;
    let mut runtime = ScannerRuntime::new(
        Arc::new(client),
        CityCatalog::default(),
        config.request_timeout,
    );

    let input = std::env::args().nth(1).unwrap_or_else(|| "London".to_string());
    if let Update::Search(state) = runtime.dispatch(Intent::InputChanged(input.clone())) {
        info!("Suggestions for {:?}: {}", input, state.candidate_cities.join(", "));
    }

    // Commit the input the way a user would pick it from the dropdown
    runtime.dispatch(Intent::SubmitSearch);

    for page in 1..=config.pages {
        if page > 1 {
            runtime.dispatch(Intent::LoadMore);
        }
        while runtime.search_state().status == Status::Loading {
            if runtime.next_update().await.is_none() {
                break;
            }
        }
        if runtime.search_state().status == Status::Error {
            break;
        }
    }

    let state = runtime.search_state().clone();
    if let Some(message) = &state.error_message {
        warn!("{}", message);
    }

    info!(
        "\n✅ {} rooms in {} (page {})\n",
        state.listings.len(),
        state.selected_city,
        state.current_page
    );

    for (i, listing) in state.listings.iter().enumerate() {
        println!("{}. {} ({})", i + 1, listing.header, listing.price);
        println!("   {}", listing.title);
        if !listing.description.is_empty() {
            println!("   {}", listing.description);
        }
        println!("   ID: {}", listing.id);
        println!("   URL: {}", listing.link);
        println!();
    }

    let Some(first) = state.listings.first() else {
        return Ok(());
    };

    info!("📷 Loading photos for {}", first.title);
    runtime.dispatch(Intent::OpenDetail(first.handoff()));
    while let Some(update) = runtime.next_update().await {
        if let Update::Detail(Some(detail)) = update {
            match detail.status {
                Status::Error => warn!("{}", detail.error_message.unwrap_or_default()),
                _ if detail.photos.is_empty() => println!("No photos available."),
                _ => {
                    for photo in &detail.photos {
                        println!("   {}", photo);
                    }
                }
            }
            break;
        }
    }

    Ok(())
}
