use chrono::{Duration, NaiveDate};
use std::error::Error;
use std::fmt;
use std::sync::Arc;

use crate::services::llm_service::{CompletionModel, CompletionOptions, LlmError};
use crate::services::prompt_templates::{places_prompt, schedule_prompt};

const PLANNER_MAX_TOKENS: u32 = 3000;
const DISPLAY_DATE_FORMAT: &str = "%d %B %Y";
// ticket dates are asked for as "10 April 2020" but the model is not consistent
const START_DATE_FORMATS: [&str; 4] = ["%d %B %Y", "%d %b %Y", "%d.%m.%Y", "%Y-%m-%d"];

#[derive(Debug)]
pub enum PlanningError {
    InvalidStartDate(String),
    LlmError(LlmError),
}

impl fmt::Display for PlanningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanningError::InvalidStartDate(date) => {
                write!(f, "Could not read '{}' as a start date", date)
            }
            PlanningError::LlmError(err) => write!(f, "Itinerary planning failed: {}", err),
        }
    }
}

impl Error for PlanningError {}

impl From<LlmError> for PlanningError {
    fn from(err: LlmError) -> Self {
        PlanningError::LlmError(err)
    }
}

pub fn parse_start_date(date: &str) -> Result<NaiveDate, PlanningError> {
    let trimmed = date.trim();
    START_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| PlanningError::InvalidStartDate(date.to_string()))
}

/// Rewrites every line that starts with `Day` to `Day n: dd Month yyyy`, counting from
/// `start`. Other lines are kept as they are.
pub fn add_dates_to_schedule(schedule: &str, start: NaiveDate) -> String {
    let mut current_day: i64 = 0;

    schedule
        .split('\n')
        .map(|line| {
            if line.starts_with("Day") {
                current_day += 1;
                let date = start + Duration::days(current_day - 1);
                format!("Day {}: {}", current_day, date.format(DISPLAY_DATE_FORMAT))
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub struct ItineraryPlanner {
    llm: Arc<dyn CompletionModel>,
}

impl ItineraryPlanner {
    pub fn new(llm: Arc<dyn CompletionModel>) -> Self {
        Self { llm }
    }

    /// Asks for the sights of `city`, then for a `days`-long schedule of them starting on
    /// `date`. The returned text is the model's schedule with real dates filled in.
    pub async fn plan(&self, city: &str, date: &str, days: u32) -> Result<String, PlanningError> {
        let start = parse_start_date(date)?;
        let options = CompletionOptions::with_max_tokens(PLANNER_MAX_TOKENS);

        let places = self.llm.complete(&places_prompt(city), options).await?;
        log::info!("Got {} chars of sights for {}", places.len(), city);

        let schedule = self
            .llm
            .complete(&schedule_prompt(&places, date, days), options)
            .await?;

        Ok(add_dates_to_schedule(&schedule, start))
    }
}
