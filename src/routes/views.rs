//! Server-rendered HTML for the four pages.

use serde_json::Value;

use crate::models::hotel::Hotel;
use crate::models::itinerary::ItineraryDay;
use crate::models::ticket::{TicketRecord, TicketTable};

pub const NOT_YET_EXTRACTED: &str = "Please upload your ticket and extract data first.";
pub const UPLOAD_HINT: &str =
    "Upload a ticket and click 'Extract Data' to see the extracted information here.";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Page {
    Home,
    TicketInfo,
    Itinerary,
    Hotels,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Home, Page::TicketInfo, Page::Itinerary, Page::Hotels];

    pub fn path(&self) -> &'static str {
        match self {
            Page::Home => "/",
            Page::TicketInfo => "/ticket-info",
            Page::Itinerary => "/itinerary",
            Page::Hotels => "/hotels",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Page::Home => "🏠 Home",
            Page::TicketInfo => "🎫 Ticket Info",
            Page::Itinerary => "🗺️ Itinerary",
            Page::Hotels => "🏨 Hotels",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoticeKind {
    Success,
    Warning,
    Info,
    Error,
}

impl NoticeKind {
    fn class(&self) -> &'static str {
        match self {
            NoticeKind::Success => "success",
            NoticeKind::Warning => "warning",
            NoticeKind::Info => "info",
            NoticeKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

pub fn notice(notice: &Notice) -> String {
    format!(
        "<div class=\"notice {}\">{}</div>",
        notice.kind.class(),
        escape(&notice.text)
    )
}

pub fn layout(active: Page, body: &str) -> String {
    let nav = Page::ALL
        .iter()
        .map(|page| {
            let class = if *page == active { " class=\"active\"" } else { "" };
            format!(
                "<li><a href=\"{}\"{}>{}</a></li>",
                page.path(),
                class,
                page.label()
            )
        })
        .collect::<Vec<_>>()
        .join("");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Travel Guide Assistant</title>
<style>
body {{ margin: 0; display: flex; font-family: sans-serif; }}
nav {{ width: 14rem; min-height: 100vh; background: #f0f2f6; padding: 1rem; }}
nav ul {{ list-style: none; padding: 0; }}
nav a.active {{ font-weight: bold; }}
main {{ flex: 1; padding: 2rem; }}
.notice {{ padding: .75rem; border-radius: .25rem; margin: 1rem 0; }}
.success {{ background: #dff0d8; }} .warning {{ background: #fcf8e3; }}
.info {{ background: #d9edf7; }} .error {{ background: #f2dede; }}
.indent {{ margin-left: 2rem; }}
table {{ border-collapse: collapse; }} td, th {{ border: 1px solid #ccc; padding: .25rem .5rem; }}
</style>
</head>
<body>
<nav><h2>Navigation</h2><p>📌 Go to</p><ul>{}</ul></nav>
<main>
{}
</main>
</body>
</html>"#,
        nav, body
    )
}

pub fn ticket_table(table: &TicketTable) -> String {
    let header = TicketRecord::COLUMNS
        .iter()
        .map(|column| format!("<th>{}</th>", escape(column)))
        .collect::<String>();
    let rows = table
        .rows
        .iter()
        .map(|record| {
            let cells = record
                .cells()
                .iter()
                .map(|cell| format!("<td>{}</td>", escape(cell)))
                .collect::<String>();
            format!("<tr>{}</tr>", cells)
        })
        .collect::<String>();

    format!(
        "<table><thead><tr>{}</tr></thead><tbody>{}</tbody></table>",
        header, rows
    )
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn itinerary(days: &[ItineraryDay]) -> String {
    let mut html = String::new();
    for day in days {
        if let Some(heading) = &day.heading {
            html.push_str(&format!("<h3>{}</h3>", escape(heading)));
        }
        for (key, value) in &day.fields {
            match value {
                Value::Object(nested) => {
                    html.push_str(&format!("<p>{}</p>", escape(key)));
                    for (k, v) in nested {
                        html.push_str(&format!(
                            "<p class=\"indent\">{}: {}</p>",
                            escape(k),
                            escape(&display_value(v))
                        ));
                    }
                }
                other => html.push_str(&format!(
                    "<p>{} : {}</p>",
                    escape(key),
                    escape(&display_value(other))
                )),
            }
        }
    }
    html
}

pub fn hotels(hotels: &[Hotel]) -> String {
    hotels
        .iter()
        .map(|hotel| {
            format!(
                "<div class=\"hotel\"><p>Hotel : {}</p><p>Website : {}</p></div>",
                escape(&hotel.name),
                escape(&hotel.website)
            )
        })
        .collect()
}
