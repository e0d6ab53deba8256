//! Commenter Pay client - composition root binary.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commenter_client::application::services::{CountdownDriver, Services};
use commenter_client::infrastructure::http::{AccountApi, AdminApi, RestClient, SlotApi};
use commenter_client::infrastructure::platform::DesktopPlatform;
use commenter_client::ports::outbound::{storage_keys, PlatformPort};
use commenter_client::presentation::UserIntents;
use commenter_client::LifecycleEvent;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "commenter_client=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Commenter Pay client");

    // Platform
    let platform: Arc<dyn PlatformPort> = Arc::new(DesktopPlatform::new());
    tracing::debug!("User identity: {}", platform.get_user_id());

    // HTTP; a backend URL saved on this device wins over the environment.
    let mut rest = RestClient::from_env();
    if let Some(saved) = platform.storage_load(storage_keys::API_URL) {
        rest = rest.with_base_url(&saved);
    }
    platform.storage_save(storage_keys::API_URL, rest.base_url());
    let rest = Arc::new(rest);
    tracing::info!("Backend: {}", rest.base_url());

    let services = Services::new(
        Arc::new(SlotApi::new(rest.clone())),
        Arc::new(AccountApi::new(rest.clone())),
        Arc::new(AdminApi::new(rest)),
        platform.clone(),
    );

    // Surface lifecycle movements in the log; ticks are too chatty to keep.
    services
        .lifecycle
        .events()
        .subscribe(|event| match event {
            LifecycleEvent::CountdownTick { .. } => {}
            other => tracing::info!(event = ?other, "lifecycle"),
        })
        .await;

    // Pick up a reservation that survived a restart.
    let driver = match services.lifecycle.resume_if_active().await {
        Ok(Some(reservation)) => {
            tracing::info!(
                slot_id = %reservation.slot_id(),
                company = reservation.company().name(),
                "Resumed held reservation"
            );
            Some(CountdownDriver::spawn(
                services.lifecycle.clone(),
                platform.clone(),
            ))
        }
        Ok(None) => None,
        Err(err) => {
            tracing::warn!("Resume check failed: {err}");
            None
        }
    };

    // Prime the availability feed so the first browse paint has data.
    match services.feed.refresh().await {
        Ok(companies) => tracing::info!("{} companies with open capacity", companies.len()),
        Err(err) => tracing::warn!("Could not refresh availability: {err}"),
    }

    let intents = UserIntents::new(services);
    tracing::info!("Lifecycle phase: {}", intents.current_view().phase_label);

    // With a hold active the client stays up until the countdown resolves;
    // the driver ends itself on the terminal transition.
    if let Some(handle) = driver {
        handle.await?;
        tracing::info!(
            "Reservation resolved; phase now {}",
            intents.current_view().phase_label
        );
    }

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
