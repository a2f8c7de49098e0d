//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{BookingService, PaymentService, SlotService};
use crate::infrastructure::Storage;
use crate::interfaces::http::common::ApiResponse;
use crate::interfaces::ws::{create_notification_state, ws_notifications_handler};
use crate::notifications::SharedEventBus;

use super::modules::{bookings, health, payments, slots};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::handlers::health_check,
        // Slots
        slots::handlers::list_slots,
        slots::handlers::list_available_slots,
        slots::handlers::get_slot,
        // Bookings
        bookings::handlers::create_booking,
        bookings::handlers::list_bookings,
        bookings::handlers::get_booking,
        bookings::handlers::check_in,
        bookings::handlers::check_out,
        bookings::handlers::cancel_booking,
        // Payments
        payments::handlers::record_payment,
        payments::handlers::get_pricing_info,
    ),
    components(
        schemas(
            ApiResponse<String>,
            health::HealthResponse,
            health::ComponentHealth,
            slots::SlotDto,
            bookings::BookingDto,
            bookings::PaymentDto,
            bookings::CreateBookingRequest,
            bookings::CheckOutResponse,
            bookings::FeeDto,
            payments::RecordPaymentRequest,
            payments::PricingInfoDto,
        )
    ),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Slots", description = "Parking slot registry and availability"),
        (name = "Bookings", description = "Booking lifecycle: create, check-in, check-out, cancel"),
        (name = "Payments", description = "Fee settlement and pricing information"),
        (name = "WebSocket Notifications", description = "Real-time event notifications via WebSocket"),
    ),
    info(
        title = "Smart Parking API",
        version = "1.0.0",
        description = "REST API for parking slot reservation and billing",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(
    storage: Arc<dyn Storage>,
    booking_service: Arc<BookingService>,
    payment_service: Arc<PaymentService>,
    slot_service: Arc<SlotService>,
    event_bus: SharedEventBus,
) -> Router {
    let health_state = health::HealthState {
        storage,
        event_bus: event_bus.clone(),
        started_at: Arc::new(Instant::now()),
    };

    let slot_routes = Router::new()
        .route("/", get(slots::list_slots))
        .route("/available", get(slots::list_available_slots))
        .route("/{slot_id}", get(slots::get_slot))
        .with_state(slots::SlotAppState { slot_service });

    let booking_routes = Router::new()
        .route(
            "/",
            post(bookings::create_booking).get(bookings::list_bookings),
        )
        .route("/{booking_id}", get(bookings::get_booking))
        .route("/{booking_id}/check-in", post(bookings::check_in))
        .route("/{booking_id}/check-out", post(bookings::check_out))
        .route("/{booking_id}/cancel", post(bookings::cancel_booking))
        .with_state(bookings::BookingAppState { booking_service });

    let payment_routes = Router::new()
        .route("/bookings/{booking_id}/payment", post(payments::record_payment))
        .route("/pricing", get(payments::get_pricing_info))
        .with_state(payments::PaymentAppState { payment_service });

    let notification_state = create_notification_state(event_bus);
    let ws_routes = Router::new()
        .route("/ws", get(ws_notifications_handler))
        .with_state(notification_state);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health::health_check))
        .with_state(health_state)
        .nest("/api/v1/slots", slot_routes)
        .nest("/api/v1/bookings", booking_routes)
        .nest("/api/v1", payment_routes)
        .merge(ws_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
