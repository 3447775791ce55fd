use actix_web::{http::header::ContentType, web, HttpResponse, Responder};

use crate::app::AppState;
use crate::middleware::session::SessionId;
use crate::routes::views::{self, layout, Notice, NoticeKind, Page, NOT_YET_EXTRACTED};
use crate::services::response_parser::parse_hotels;

/*
    GET /hotels
*/
pub async fn get_page(session: SessionId, state: web::Data<AppState>) -> impl Responder {
    let current = state.sessions.get(&session.0);
    let mut body = String::from("<h1>Hotels</h1>");

    let (mut builder, content) = match current.hotels.as_ready().map(|text| parse_hotels(text)) {
        None => (
            HttpResponse::Ok(),
            views::notice(&Notice::new(NoticeKind::Info, NOT_YET_EXTRACTED)),
        ),
        Some(Ok(hotels)) => (HttpResponse::Ok(), views::hotels(&hotels)),
        Some(Err(err)) => {
            log::error!("{}", err);
            (
                HttpResponse::BadGateway(),
                views::notice(&Notice::new(NoticeKind::Error, err.to_string())),
            )
        }
    };
    body.push_str(&content);

    builder
        .content_type(ContentType::html())
        .body(layout(Page::Hotels, &body))
}

/*
    GET /api/hotels
*/
pub async fn get_json(session: SessionId, state: web::Data<AppState>) -> impl Responder {
    match state.sessions.get(&session.0).hotels.as_ready().map(|text| parse_hotels(text)) {
        None => HttpResponse::NotFound().json(serde_json::json!({ "error": NOT_YET_EXTRACTED })),
        Some(Ok(hotels)) => HttpResponse::Ok().json(hotels),
        Some(Err(err)) => {
            HttpResponse::BadGateway().json(serde_json::json!({ "error": err.to_string() }))
        }
    }
}
