use actix_multipart::{Multipart, MultipartError};
use actix_web::{http::header::ContentType, web, HttpResponse, Responder};
use futures::TryStreamExt;

use crate::app::AppState;
use crate::middleware::session::SessionId;
use crate::models::session::TripSession;
use crate::models::ticket::UploadedTicket;
use crate::routes::views::{self, layout, Notice, NoticeKind, Page, UPLOAD_HINT};
use crate::services::trip_service::PlanOutcome;

const PDF_MIME: &str = "application/pdf";

#[derive(Debug, Default)]
pub struct TicketForm {
    pub uploads: Vec<UploadedTicket>,
    pub days: Option<String>,
}

fn is_pdf(file_name: &str, content_type: Option<&str>) -> bool {
    content_type == Some(PDF_MIME) || file_name.to_ascii_lowercase().ends_with(".pdf")
}

/// Reads the `tickets` file parts and the `days` field. Non-PDF files are dropped.
pub async fn read_ticket_form(mut payload: Multipart) -> Result<TicketForm, MultipartError> {
    let mut form = TicketForm::default();

    while let Some(mut field) = payload.try_next().await? {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);
        let content_type = field.content_type().map(|mime| mime.essence_str().to_string());

        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await? {
            bytes.extend_from_slice(&chunk);
        }

        match (name.as_str(), file_name) {
            ("tickets", Some(file_name)) => {
                if is_pdf(&file_name, content_type.as_deref()) {
                    form.uploads.push(UploadedTicket { file_name, bytes });
                } else {
                    log::warn!("Ignoring non-PDF upload {}", file_name);
                }
            }
            ("days", _) => form.days = Some(String::from_utf8_lossy(&bytes).trim().to_string()),
            _ => {}
        }
    }

    Ok(form)
}

pub fn parse_days(days: Option<&str>) -> Result<u32, String> {
    let raw = days.unwrap_or("1");
    match raw.parse::<u32>() {
        Ok(days) if days >= 1 => Ok(days),
        _ => Err(format!(
            "The number of days must be a whole number of at least 1, got '{}'",
            raw
        )),
    }
}

fn render(notice: Option<&Notice>, session: &TripSession) -> String {
    let mut body = String::from(
        r#"<h1>Ticket Information Extraction</h1>
<hr>
<p>Upload your travel ticket and enter your stay duration to get personalized trip details.</p>
<form method="post" action="/ticket-info" enctype="multipart/form-data">
<details open><summary>Step 1: Upload Your Ticket</summary>
<label>Upload Ticket here (PDF only) <input type="file" name="tickets" accept="application/pdf,.pdf" multiple></label>
<p>Make sure your ticket is in PDF format.</p>
</details>
<details open><summary>Step 2: Enter Stay Duration</summary>
<label>Enter the number of days of your stay <input type="number" name="days" min="1" step="1" value="1"></label>
<p>Specify the number of days you'll be staying at your destination.</p>
</details>
<hr>
<button type="submit" title="Click to extract information from your ticket">Extract Data</button>
</form>"#,
    );

    if let Some(notice) = notice {
        body.push_str(&views::notice(notice));
    }

    match session.ticket_data.as_ready() {
        Some(table) => {
            body.push_str("<h2>Extracted Ticket Information:</h2>");
            body.push_str(&views::ticket_table(table));
        }
        None => body.push_str(&views::notice(&Notice::new(NoticeKind::Info, UPLOAD_HINT))),
    }

    layout(Page::TicketInfo, &body)
}

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok().content_type(ContentType::html()).body(body)
}

/*
    GET /ticket-info
*/
pub async fn get_page(session: SessionId, state: web::Data<AppState>) -> impl Responder {
    let current = state.sessions.get(&session.0);
    html(render(None, &current))
}

/*
    POST /ticket-info
*/
pub async fn extract(
    session: SessionId,
    state: web::Data<AppState>,
    payload: Multipart,
) -> impl Responder {
    let form = match read_ticket_form(payload).await {
        Ok(form) => form,
        Err(err) => {
            log::warn!("Failed to read upload: {}", err);
            return HttpResponse::BadRequest().body(format!("Invalid upload: {}", err));
        }
    };

    let days = match parse_days(form.days.as_deref()) {
        Ok(days) => days,
        Err(msg) => return HttpResponse::BadRequest().body(msg),
    };

    if form.uploads.is_empty() {
        let current = state.sessions.get(&session.0);
        return html(render(None, &current));
    }

    log::info!(
        "Extracting {} ticket(s) for a {} day stay",
        form.uploads.len(),
        days
    );

    let notice = match state.planner.plan(&form.uploads, days).await {
        Ok(PlanOutcome::Planned(plan)) => {
            log::info!("Planned trip to {}", plan.city);
            state.sessions.update(session.0, |current| {
                current.record(plan.tickets, plan.itinerary, plan.hotels)
            });
            Notice::new(NoticeKind::Success, "Data extracted successfully!")
        }
        Ok(PlanOutcome::NoTicketData) => {
            Notice::new(NoticeKind::Warning, "No data extracted from the provided PDF.")
        }
        Err(err) => {
            log::error!("Trip planning failed: {}", err);
            Notice::new(NoticeKind::Error, format!("An error occurred: {}", err))
        }
    };

    let current = state.sessions.get(&session.0);
    html(render(Some(&notice), &current))
}

/*
    GET /api/tickets
*/
pub async fn get_json(session: SessionId, state: web::Data<AppState>) -> impl Responder {
    match state.sessions.get(&session.0).ticket_data.as_ready() {
        Some(table) => HttpResponse::Ok().json(table),
        None => HttpResponse::NotFound().json(serde_json::json!({ "error": views::NOT_YET_EXTRACTED })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_filter() {
        assert!(is_pdf("ticket.PDF", None));
        assert!(is_pdf("scan", Some("application/pdf")));
        assert!(!is_pdf("photo.jpg", Some("image/jpeg")));
    }

    #[test]
    fn test_parse_days() {
        assert_eq!(parse_days(Some("4")), Ok(4));
        assert_eq!(parse_days(None), Ok(1));
        assert!(parse_days(Some("0")).is_err());
        assert!(parse_days(Some("-2")).is_err());
        assert!(parse_days(Some("two")).is_err());
    }
}
