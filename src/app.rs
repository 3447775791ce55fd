use actix_cors::Cors;
use actix_web::web;

use crate::routes;
use crate::services::session_store::SessionStore;
use crate::services::trip_service::TripPlanner;

pub struct AppState {
    pub planner: TripPlanner,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(planner: TripPlanner) -> Self {
        Self {
            planner,
            sessions: SessionStore::new(),
        }
    }
}

/// Registers every page and API route. The caller wraps the app in `SessionMiddleware`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(routes::home::index))
        .route("/health", web::get().to(routes::health::health_check))
        .route("/ticket-info", web::get().to(routes::ticket_info::get_page))
        .route("/ticket-info", web::post().to(routes::ticket_info::extract))
        .route("/itinerary", web::get().to(routes::itinerary::get_page))
        .route("/hotels", web::get().to(routes::hotels::get_page))
        .service(
            web::scope("/api")
                .wrap(
                    Cors::default()
                        .allow_any_origin()
                        .allowed_methods(vec!["GET"])
                        .max_age(3600),
                )
                .route("/tickets", web::get().to(routes::ticket_info::get_json))
                .route("/itinerary", web::get().to(routes::itinerary::get_json))
                .route("/hotels", web::get().to(routes::hotels::get_json)),
        );
}
