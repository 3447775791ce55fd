use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use travel_guide_api::app::{configure, AppState};
use travel_guide_api::config::AppConfig;
use travel_guide_api::middleware::session::SessionMiddleware;
use travel_guide_api::services::trip_service::TripPlanner;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    println!("Application starting...");

    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    } else {
        println!("Release mode");
    }

    env_logger::init_from_env(Env::default().default_filter_or("info"));
    println!("Logger initialized");

    let config = AppConfig::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    let planner = TripPlanner::from_config(&config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    log::info!(
        "Using {} for completions, {} for embeddings, airports from {}",
        config.completion_model,
        config.embedding_model,
        config.airports_csv.display()
    );

    let state = web::Data::new(AppState::new(planner));

    println!("Attempting to bind to {}:{}", config.host, config.port);
    println!("Starting HTTP server...");

    HttpServer::new(move || {
        App::new()
            .wrap(SessionMiddleware)
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((config.host.clone(), config.port))?
    .run()
    .await
}
