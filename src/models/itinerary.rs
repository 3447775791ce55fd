use serde::Serialize;
use serde_json::{Map, Value};

/// One day of a planned itinerary as read back from the model's schedule text.
///
/// `heading` is the dated `Day n: dd Month yyyy` line that preceded the entries, if the
/// schedule had one. `fields` keeps the model's own keys in the order it wrote them
/// (`day1`, `- Morning`, ...); values are strings or one-level nested objects.
#[derive(Debug, Serialize, Clone, PartialEq, Default)]
pub struct ItineraryDay {
    pub heading: Option<String>,
    pub fields: Map<String, Value>,
}

impl ItineraryDay {
    pub fn is_empty(&self) -> bool {
        self.heading.is_none() && self.fields.is_empty()
    }
}
