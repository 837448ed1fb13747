use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::extract::MatchedPath;
use dotenvy::dotenv;
use http::HeaderValue;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use facility_api::bootstrap::app_context::{AppContext, AppServices};
use facility_api::bootstrap::config::Config;
use facility_api::infrastructure::db::repositories::facility_repository_sqlx::SqlxFacilityRepository;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
        paths(
            facility_api::presentation::http::facilities::list_facilities,
            facility_api::presentation::http::facilities::search_facilities,
            facility_api::presentation::http::facilities::get_facility,
            facility_api::presentation::http::facilities::create_facility,
            facility_api::presentation::http::facilities::update_facility,
            facility_api::presentation::http::facilities::delete_facility,
        ),
        components(schemas(
            facility_api::domain::facilities::facility::Facility,
            facility_api::domain::facilities::facility::Location,
            facility_api::domain::facilities::facility::TagRef,
            facility_api::application::use_cases::facilities::delete_facility::DeletedFacility,
            facility_api::presentation::http::facilities::FacilityRequest,
            facility_api::presentation::http::facilities::ErrorBody,
        )),
        tags(
            (name = "Facilities", description = "Facilities, their location and tags")
        )
    )]
struct ApiDoc;

fn cors_layer(cfg: &Config) -> CorsLayer {
    let origin = match cfg.frontend_url.as_deref().map(HeaderValue::from_str) {
        Some(Ok(v)) => AllowOrigin::exact(v),
        // Production always has a valid FRONTEND_URL (enforced by Config)
        _ if cfg.is_production => AllowOrigin::exact(HeaderValue::from_static("http://invalid")),
        _ => AllowOrigin::mirror_request(),
    };
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            http::Method::GET,
            http::Method::POST,
            http::Method::PUT,
            http::Method::DELETE,
            http::Method::OPTIONS,
        ])
        .allow_headers([http::header::CONTENT_TYPE])
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = ?e, "shutdown_signal_failed");
    }
    info!("shutdown_requested");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "facility_api=debug,axum=info,tower_http=info".into()),
        )
        .init();

    let cfg = Config::from_env()?;
    info!(api_port = cfg.api_port, production = cfg.is_production, "Starting facility API");

    let pool =
        facility_api::infrastructure::db::connect_pool(&cfg.database_url, cfg.db_max_connections)
            .await?;
    let facility_repo = Arc::new(SqlxFacilityRepository::new(pool));
    let ctx = AppContext::new(cfg.clone(), AppServices::new(facility_repo));

    let app = Router::new()
        .merge(facility_api::presentation::http::facilities::routes(ctx))
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(CatchPanicLayer::custom(
            facility_api::presentation::http::facilities::panic_response,
        ))
        .layer(cors_layer(&cfg))
        .layer(DefaultBodyLimit::max(cfg.body_max_bytes))
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &http::Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().clone();
                let matched = req
                    .extensions()
                    .get::<MatchedPath>()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default();
                tracing::info_span!("http", %method, %uri, matched_path = %matched)
            }),
        );

    let api_addr = SocketAddr::from(([0, 0, 0, 0], cfg.api_port));
    info!(%api_addr, "HTTP API listening");
    let listener = tokio::net::TcpListener::bind(api_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
