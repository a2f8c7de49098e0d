//! Smart Parking Service
//!
//! Slot reservation, parking fee billing and no-show reclamation.
//! Reads configuration from TOML file (~/.config/parking-service/config.toml).

use std::sync::Arc;

use tracing::{error, info};

use smart_parking::application::services::{
    seed_default_slots, start_slot_release_task, BookingService, PaymentService, SlotService,
};
use smart_parking::config::AppConfig;
use smart_parking::shared::clock::system_clock;
use smart_parking::shared::shutdown::ShutdownCoordinator;
use smart_parking::{create_api_router, create_event_bus, default_config_path, InMemoryStorage, Storage};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("PARKING_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting Smart Parking Service...");

    // ── Storage ────────────────────────────────────────────────
    let storage: Arc<dyn Storage> = Arc::new(InMemoryStorage::new());
    if app_cfg.scheduler.seed_slots {
        let created = seed_default_slots(&storage).await?;
        if created > 0 {
            info!(created, "Slot registry seeded");
        }
    }

    // Initialize event bus for real-time notifications
    let event_bus = create_event_bus();
    info!("🔔 Event bus initialized for real-time notifications");

    // ── Services ───────────────────────────────────────────────
    let clock = system_clock();
    let booking_service = Arc::new(BookingService::new(
        storage.clone(),
        clock.clone(),
        event_bus.clone(),
    ));
    let payment_service = Arc::new(PaymentService::new(
        storage.clone(),
        clock.clone(),
        event_bus.clone(),
    ));
    let slot_service = Arc::new(SlotService::new(storage.clone()));

    // Initialize shutdown coordinator
    let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout_secs);
    let shutdown_signal = shutdown.signal();

    // Start listening for shutdown signals (SIGTERM, SIGINT)
    shutdown.start_signal_listener();

    // Start the no-show sweep
    let release_task = start_slot_release_task(
        storage.clone(),
        event_bus.clone(),
        clock.clone(),
        shutdown_signal.clone(),
        app_cfg.scheduler.check_interval_secs,
    );

    // Create REST API router
    let api_router = create_api_router(
        storage,
        booking_service,
        payment_service,
        slot_service,
        event_bus,
    );

    // Start REST API server with graceful shutdown
    let api_addr = app_cfg.server.address();
    let listener = tokio::net::TcpListener::bind(&api_addr).await?;
    info!("REST API server listening on http://{}", api_addr);
    info!("Swagger UI available at http://{}/docs/", api_addr);

    let api_shutdown = shutdown_signal.clone();
    let api_server = axum::serve(listener, api_router).with_graceful_shutdown(async move {
        api_shutdown.wait().await;
        info!("🛑 REST API server received shutdown signal");
    });

    info!("🚀 Server started. Press Ctrl+C to shutdown gracefully.");

    // Waits for the shutdown signal, then joins the sweep task within
    // the configured timeout.
    let cleanup = tokio::spawn(async move {
        shutdown
            .shutdown_with_cleanup(|| async {
                if let Err(e) = release_task.await {
                    error!("Slot release task panicked: {}", e);
                }
            })
            .await
    });

    if let Err(e) = api_server.await {
        error!("REST API server error: {}", e);
    }

    // Make sure the sweep stops even if the server exited on its own
    shutdown_signal.trigger();
    if let Err(e) = cleanup.await {
        error!("Cleanup task panicked: {}", e);
    }

    info!("👋 Smart Parking Service shutdown complete");
    Ok(())
}
