use actix_web::{middleware, web, App, HttpServer};
use std::sync::Arc;
use swiftloan::config::{LoggingSettings, Settings};
use swiftloan::core::LoanScorer;
use swiftloan::routes::{self, build_cors, handle_json_payload_error, AppState};
use swiftloan::services::RandomForest;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Initialize logging
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    init_tracing(&settings.logging);

    info!("Starting SwiftLoan scoring service...");

    // No model, no service: never answer with fabricated predictions
    let forest = match RandomForest::load(&settings.model.path) {
        Ok(forest) => forest,
        Err(e) => {
            error!("Model unavailable, refusing to start: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::NotFound, e.to_string()));
        }
    };

    let scorer = LoanScorer::new(Arc::new(forest));
    let app_state = AppState::new(scorer, Some(settings.model.name.clone()));

    info!("Scorer initialized with model '{}'", app_state.model_name);

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);
    let cors_settings = settings.cors.clone();

    info!(
        "Starting HTTP server on {}:{} (CORS origins: {:?})",
        host, port, cors_settings.allowed_origins
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .wrap(build_cors(&cors_settings))
            .wrap(middleware::Logger::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
