use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use std::collections::HashMap;
use std::env;

use crate::app::AppState;
use crate::services::city_resolver_service::AirportIndex;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let llm_result = check_llm_key();
    health
        .services
        .insert("language_model".to_string(), llm_result.clone());

    let airports_result = check_airports(&state);
    health
        .services
        .insert("airports".to_string(), airports_result.clone());

    if llm_result.status != "ok" || airports_result.status != "ok" {
        health.status = "degraded".to_string();
    }

    HttpResponse::Ok().json(health)
}

fn check_llm_key() -> ServiceStatus {
    match env::var("OPENAI_API_KEY") {
        Ok(key) => {
            ServiceStatus {
                status: "ok".to_string(),
                details: Some(format!("API key configured ({})", mask_key(&key))),
            }
        }
        Err(_) => ServiceStatus {
            status: "error".to_string(),
            details: Some("OPENAI_API_KEY not configured".to_string()),
        },
    }
}

/// First and last four characters of the key; short keys are hidden entirely.
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "***".to_string();
    }

    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}***{}", head, tail)
}

fn check_airports(state: &AppState) -> ServiceStatus {
    let path = state.planner.city_resolver().airports_csv();
    match AirportIndex::load(path) {
        Ok(index) => ServiceStatus {
            status: "ok".to_string(),
            details: Some(format!(
                "{} airports in {}",
                index.airports.len(),
                path.display()
            )),
        },
        Err(e) => {
            log::warn!("Airport table health check failed: {}", e);

            ServiceStatus {
                status: "error".to_string(),
                details: Some(e.to_string()),
            }
        }
    }
}
