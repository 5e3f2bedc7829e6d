pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{any, get, post},
    Router,
};
use std::{future::Future, net::SocketAddr, path::PathBuf, sync::Arc};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use sea_orm::DatabaseConnection;

/// Application state shared across handlers
pub struct AppState {
    pub db: DatabaseConnection,
    pub allow_signup: bool,
    pub jwt_secret: String,
    pub session_ttl: chrono::Duration,
    pub secure_cookies: bool,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "HC Dashboard API",
        version = "0.1.0",
        description = "Human-capital metrics of a holding company and its subsidiaries"
    ),
    paths(
        handlers::system::health_check,
        handlers::auth::signup,
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::me,
        handlers::companies::list_companies,
        handlers::data_center::get_record,
        handlers::data_center::save_record,
        handlers::input::submit_metric,
        handlers::input::submit_kpi,
        handlers::input::submit_workforce,
        handlers::charts::get_chart,
        handlers::charts::get_kpi_chart,
        handlers::charts::get_scores_chart,
        handlers::dashboard::get_summary,
        handlers::filters::available_periods,
        handlers::upload::upload_workbook,
        handlers::admin::list_companies,
        handlers::admin::create_company,
        handlers::admin::update_company,
        handlers::admin::delete_company,
    ),
    components(
        schemas(
            models::HealthResponse,
            models::ErrorResponse,
            models::FieldError,
            models::MessageResponse,
            models::UserRole,
            models::User,
            models::SignupRequest,
            models::LoginRequest,
            models::AuthResponse,
            models::CompanyType,
            models::CompanySummary,
            models::Company,
            models::CompanyRequest,
            models::MetricPayload,
            models::SavedMetric,
            models::KpiInput,
            models::WorkforceInput,
            models::Kpi,
            models::PeriodQuery,
            models::ChartQuery,
            models::PeriodInfo,
            models::Series,
            models::ChartResponse,
            models::ScoreCard,
            models::FormationCard,
            models::ScoresChart,
            models::KpiQuarter,
            models::KpiChart,
            models::DashboardSummary,
            models::AvailablePeriod,
            models::AvailablePeriods,
            models::UploadResponse,
        )
    ),
    tags(
        (name = "auth", description = "Signup, login and session endpoints"),
        (name = "companies", description = "Company filter"),
        (name = "data-center", description = "Read and edit stored records"),
        (name = "input", description = "Metric and KPI entry"),
        (name = "charts", description = "Chart-ready aggregates"),
        (name = "dashboard", description = "Monthly summary cards"),
        (name = "filters", description = "Filter options"),
        (name = "upload", description = "Spreadsheet import"),
        (name = "admin", description = "Company management (super-admin)"),
        (name = "system", description = "System health and info endpoints")
    )
)]
pub struct ApiDoc;

/// API server configuration
pub struct ApiServerConfig {
    /// Address to bind the API server
    pub bind_addr: SocketAddr,
    /// Allow credentialed requests from localhost origins (for development)
    pub enable_cors: bool,
    /// Secret for signing session tokens
    pub jwt_secret: String,
    /// Session lifetime
    pub session_ttl: chrono::Duration,
    /// Whether anyone may create an account
    pub allow_signup: bool,
    /// Mark the session cookie `Secure`
    pub secure_cookies: bool,
    /// Built front-end bundle to serve for non-API paths
    pub static_dir: Option<PathBuf>,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            enable_cors: true,
            jwt_secret: String::new(),
            session_ttl: chrono::Duration::hours(24),
            allow_signup: true,
            secure_cookies: false,
            static_dir: None,
        }
    }
}

/// API Server
pub struct ApiServer {
    config: ApiServerConfig,
    state: Arc<AppState>,
}

impl ApiServer {
    pub fn new(config: ApiServerConfig, db: DatabaseConnection) -> Self {
        let state = Arc::new(AppState {
            db,
            allow_signup: config.allow_signup,
            jwt_secret: config.jwt_secret.clone(),
            session_ttl: config.session_ttl,
            secure_cookies: config.secure_cookies,
        });

        Self { config, state }
    }

    /// Build the router with all routes
    pub fn build_router(&self) -> Router {
        let api_doc = ApiDoc::openapi();
        let jwt_state = Arc::new(middleware::JwtState::new(self.config.jwt_secret.as_bytes()));

        // PUBLIC routes
        let public_router = Router::new()
            .route("/api/health", get(handlers::system::health_check))
            .route("/api/auth/signup", post(handlers::auth::signup))
            .route("/api/auth/login", post(handlers::auth::login))
            .route("/api/auth/logout", post(handlers::auth::logout))
            .route("/api/{*rest}", any(handlers::api_not_found))
            .with_state(self.state.clone());

        // SUPER_ADMIN routes; the session is checked by the outer layer
        let admin_router = Router::new()
            .route(
                "/api/admin/companies",
                get(handlers::admin::list_companies).post(handlers::admin::create_company),
            )
            .route(
                "/api/admin/companies/{id}",
                axum::routing::put(handlers::admin::update_company)
                    .delete(handlers::admin::delete_company),
            )
            .with_state(self.state.clone())
            .layer(axum_middleware::from_fn(middleware::require_super_admin));

        // PROTECTED routes (require a session)
        let protected_router = Router::new()
            .route("/api/auth/me", get(handlers::auth::me))
            .route("/api/companies", get(handlers::companies::list_companies))
            .route(
                "/api/data-center/{metric}",
                get(handlers::data_center::get_record).post(handlers::data_center::save_record),
            )
            .route("/api/input/kpi", post(handlers::input::submit_kpi))
            .route("/api/input/workforce", post(handlers::input::submit_workforce))
            .route("/api/input/{metric}", post(handlers::input::submit_metric))
            .route("/api/charts/kpi", get(handlers::charts::get_kpi_chart))
            .route("/api/charts/scores", get(handlers::charts::get_scores_chart))
            .route("/api/charts/{chart}", get(handlers::charts::get_chart))
            .route("/api/dashboard/summary", get(handlers::dashboard::get_summary))
            .route(
                "/api/filters/available-periods",
                get(handlers::filters::available_periods),
            )
            .route(
                "/api/upload",
                post(handlers::upload::upload_workbook)
                    .layer(DefaultBodyLimit::max(handlers::upload::MAX_UPLOAD_BYTES)),
            )
            .with_state(self.state.clone())
            .merge(admin_router)
            .layer(axum_middleware::from_fn_with_state(
                jwt_state.clone(),
                middleware::require_auth,
            ));

        let api_router = public_router.merge(protected_router);

        // Pages: the front-end bundle behind the login redirect
        let pages = match &self.config.static_dir {
            Some(dir) => Router::new().fallback_service(
                ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html"))),
            ),
            None => Router::new().fallback(handlers::page_not_found),
        }
        .layer(axum_middleware::from_fn_with_state(
            jwt_state,
            middleware::require_page_session,
        ));

        // SwaggerUi creates the /api/openapi.json route itself
        let router = Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api/openapi.json", api_doc))
            .merge(api_router)
            .fallback_service(pages);

        let mut router = router.layer(TraceLayer::new_for_http());

        if self.config.enable_cors {
            // Cookies need credentials, and credentials rule out a wildcard origin
            let cors = CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::COOKIE])
                .allow_credentials(true)
                .allow_origin(AllowOrigin::predicate(|origin: &HeaderValue, _| {
                    let origin_str = origin.to_str().unwrap_or("");
                    origin_str.starts_with("http://localhost:")
                        || origin_str.starts_with("http://127.0.0.1:")
                        || origin_str.starts_with("https://localhost:")
                        || origin_str.starts_with("https://127.0.0.1:")
                }));
            router = router.layer(cors);
        }

        router
    }

    /// Serve until `shutdown` resolves
    pub async fn start<F>(self, shutdown: F) -> Result<(), anyhow::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let router = self.build_router();

        info!("Starting API server on {}", self.config.bind_addr);
        info!(
            "OpenAPI document: http://{}/api/openapi.json",
            self.config.bind_addr
        );
        info!("Swagger UI: http://{}/swagger-ui", self.config.bind_addr);

        let listener = tokio::net::TcpListener::bind(self.config.bind_addr).await?;

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

        info!("API server stopped");
        Ok(())
    }
}

/// Convenience function to create and start an API server
pub async fn run_api_server<F>(
    config: ApiServerConfig,
    db: DatabaseConnection,
    shutdown: F,
) -> Result<(), anyhow::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    ApiServer::new(config, db).start(shutdown).await
}
