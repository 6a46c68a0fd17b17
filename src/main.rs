mod access;
mod auth;
mod bookings;
mod config;
mod db;
mod discounts;
mod lockers;
mod validation;

use axum::{
    extract::FromRef,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use access::{AccessCodeResponse, AccessCodeService, AccessCodeType, AccessCodesRepository};
use bookings::{BookingService, BookingStatus, BookingsRepository};
use config::AppConfig;
use discounts::DiscountsRepository;
use lockers::{
    AvailabilityResponse, ConflictSummary, LockerListing, LockerRepository, LockerSize,
    LockerStatus,
};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        lockers::handlers::list_lockers_handler,
        lockers::handlers::get_locker_by_id_handler,
        lockers::handlers::check_availability_handler,
    ),
    components(
        schemas(
            LockerListing,
            LockerSize,
            LockerStatus,
            AvailabilityResponse,
            ConflictSummary,
            BookingStatus,
            AccessCodeResponse,
            AccessCodeType,
        )
    ),
    tags(
        (name = "lockers", description = "Locker registry and availability endpoints")
    ),
    info(
        title = "Lockspot API",
        version = "1.0.0",
        description = "RESTful API for smart locker reservations"
    )
)]
struct ApiDoc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: AppConfig,
    pub booking_service: BookingService,
    pub access_service: AccessCodeService,
    pub locker_repo: LockerRepository,
    pub discounts_repo: DiscountsRepository,
}

impl AppState {
    fn new(db: PgPool, config: AppConfig) -> Self {
        let locker_repo = LockerRepository::new(db.clone());
        let bookings_repo = BookingsRepository::new(db.clone());
        let discounts_repo = DiscountsRepository::new(db.clone());
        let access_repo = AccessCodesRepository::new(db.clone());

        let booking_service = BookingService::new(
            db.clone(),
            bookings_repo,
            locker_repo.clone(),
            config.clone(),
        );
        let access_service = AccessCodeService::new(db.clone(), access_repo);

        Self {
            db,
            config,
            booking_service,
            access_service,
            locker_repo,
            discounts_repo,
        }
    }
}

// Lets the AuthenticatedUser extractor reach the JWT secret through state
impl FromRef<AppState> for AppConfig {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

/// Creates and configures the application router
/// Maps all API endpoints to their handlers and adds CORS middleware
fn create_router(state: AppState) -> Router {
    use tower_http::cors::{Any, CorsLayer};

    // Configure CORS to allow all origins, methods, and headers
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Locker registry
        .route("/api/lockers", get(lockers::list_lockers_handler))
        .route("/api/lockers/:id", get(lockers::get_locker_by_id_handler))
        .route(
            "/api/lockers/:id/availability",
            get(lockers::check_availability_handler),
        )
        // Bookings
        .route("/api/bookings", post(bookings::create_booking_handler))
        .route("/api/bookings", get(bookings::get_bookings_handler))
        .route("/api/bookings/:id", get(bookings::get_booking_by_id_handler))
        .route(
            "/api/bookings/:id/cancel",
            post(bookings::cancel_booking_handler),
        )
        .route(
            "/api/bookings/:id/access-code",
            get(access::get_access_code_handler),
        )
        // Access codes
        .route(
            "/api/access-codes/:id/use",
            post(access::use_access_code_handler),
        )
        // Discounts
        .route(
            "/api/discounts/validate",
            post(discounts::validate_discount_handler),
        )
        .route(
            "/api/discounts/active",
            get(discounts::get_active_discounts_handler),
        )
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    tracing::info!("Lockspot API - Starting...");

    let config = AppConfig::from_env().expect("Invalid configuration");

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");

    // Run SQLx migrations on startup
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations completed successfully");

    // Background sweeper settles lapsed bookings and frees their lockers
    tokio::spawn(bookings::sweeper::run(
        db_pool.clone(),
        config.sweep_interval,
        config.lock_wait_timeout,
    ));

    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState::new(db_pool, config);
    let app = create_router(state);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Lockspot API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app).await.expect("Server error");
}

#[cfg(test)]
mod tests;
