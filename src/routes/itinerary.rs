use actix_web::{http::header::ContentType, web, HttpResponse, Responder};

use crate::app::AppState;
use crate::middleware::session::SessionId;
use crate::routes::views::{self, layout, Notice, NoticeKind, Page, NOT_YET_EXTRACTED};
use crate::services::response_parser::parse_itinerary;

/*
    GET /itinerary
*/
pub async fn get_page(session: SessionId, state: web::Data<AppState>) -> impl Responder {
    let current = state.sessions.get(&session.0);
    let mut body = String::from("<h1>Planned Itinerary</h1>");

    let text = match current.itinerary.as_ready() {
        Some(text) => text,
        None => {
            body.push_str(&views::notice(&Notice::new(NoticeKind::Info, NOT_YET_EXTRACTED)));
            return HttpResponse::Ok()
                .content_type(ContentType::html())
                .body(layout(Page::Itinerary, &body));
        }
    };

    match parse_itinerary(text) {
        Ok(days) => {
            body.push_str(&views::itinerary(&days));
            HttpResponse::Ok()
                .content_type(ContentType::html())
                .body(layout(Page::Itinerary, &body))
        }
        Err(err) => {
            log::error!("{}", err);
            body.push_str(&views::notice(&Notice::new(NoticeKind::Error, err.to_string())));
            HttpResponse::BadGateway()
                .content_type(ContentType::html())
                .body(layout(Page::Itinerary, &body))
        }
    }
}

/*
    GET /api/itinerary
*/
pub async fn get_json(session: SessionId, state: web::Data<AppState>) -> impl Responder {
    let current = state.sessions.get(&session.0);
    let text = match current.itinerary.as_ready() {
        Some(text) => text,
        None => {
            return HttpResponse::NotFound().json(serde_json::json!({ "error": NOT_YET_EXTRACTED }))
        }
    };

    match parse_itinerary(text) {
        Ok(days) => HttpResponse::Ok().json(days),
        Err(err) => HttpResponse::BadGateway().json(serde_json::json!({ "error": err.to_string() })),
    }
}
