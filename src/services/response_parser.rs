//! Reads the itinerary and hotel answers back into structured data.
//!
//! The model is asked for fenced JSON but does not always comply. Only a few complete
//! shapes are accepted: a JSON array of objects, objects separated by commas, or objects
//! separated by whitespace. The itinerary may also be plain `key: value` lines under
//! `Day n` headings. Anything else is a `ResponseParseError::Malformed`. Characters
//! are never patched in, so a `}` inside a string value stays where it is.

use serde_json::{Map, Value};
use std::error::Error;
use std::fmt;

use crate::models::hotel::Hotel;
use crate::models::itinerary::ItineraryDay;

#[derive(Debug, PartialEq)]
pub enum ResponseParseError {
    Malformed { what: &'static str, reason: String },
}

impl fmt::Display for ResponseParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseParseError::Malformed { what, reason } => {
                write!(f, "Malformed {} from the language model: {}", what, reason)
            }
        }
    }
}

impl Error for ResponseParseError {}

fn malformed(what: &'static str, reason: impl fmt::Display) -> ResponseParseError {
    ResponseParseError::Malformed {
        what,
        reason: reason.to_string(),
    }
}

pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "")
}

/// Parses `body` as a list of JSON objects in one of the accepted shapes.
pub fn parse_object_sequence(
    body: &str,
    what: &'static str,
) -> Result<Vec<Map<String, Value>>, ResponseParseError> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(malformed(what, "empty response"));
    }

    let values: Vec<Value> = if trimmed.starts_with('[') {
        serde_json::from_str(trimmed).map_err(|e| malformed(what, e))?
    } else {
        match serde_json::from_str::<Vec<Value>>(&format!("[{}]", trimmed)) {
            Ok(values) => values,
            Err(_) => serde_json::Deserializer::from_str(trimmed)
                .into_iter::<Value>()
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| malformed(what, e))?,
        }
    };

    let mut objects = Vec::with_capacity(values.len());
    for value in values {
        match value {
            Value::Object(object) => objects.push(object),
            Value::Array(items) => {
                for item in items {
                    match item {
                        Value::Object(object) => objects.push(object),
                        other => return Err(malformed(what, format!("expected an object, got {}", other))),
                    }
                }
            }
            other => return Err(malformed(what, format!("expected an object, got {}", other))),
        }
    }

    Ok(objects)
}

fn parse_key_value_lines(
    block: &str,
    what: &'static str,
) -> Result<Map<String, Value>, ResponseParseError> {
    let mut fields = Map::new();
    for line in block.lines().map(str::trim).filter(|line| !line.is_empty()) {
        let (key, value) = line
            .split_once(':')
            .ok_or_else(|| malformed(what, format!("expected 'key: value', got '{}'", line)))?;
        fields.insert(key.trim().to_string(), Value::String(value.trim().to_string()));
    }
    Ok(fields)
}

fn push_block(
    heading: Option<String>,
    block: &str,
    days: &mut Vec<ItineraryDay>,
) -> Result<(), ResponseParseError> {
    const WHAT: &str = "itinerary";
    let trimmed = block.trim();

    if trimmed.is_empty() {
        if heading.is_some() {
            days.push(ItineraryDay {
                heading,
                fields: Map::new(),
            });
        }
        return Ok(());
    }

    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        let mut heading = heading;
        for fields in parse_object_sequence(trimmed, WHAT)? {
            days.push(ItineraryDay {
                heading: heading.take(),
                fields,
            });
        }
    } else {
        days.push(ItineraryDay {
            heading,
            fields: parse_key_value_lines(trimmed, WHAT)?,
        });
    }
    Ok(())
}

/// Splits a schedule into days. A line starting with `Day` opens a new day; the text
/// below it is JSON objects or `key: value` lines.
pub fn parse_itinerary(text: &str) -> Result<Vec<ItineraryDay>, ResponseParseError> {
    let cleaned = strip_code_fences(text);
    let mut days = Vec::new();
    let mut heading: Option<String> = None;
    let mut block = String::new();

    for line in cleaned.lines() {
        if line.starts_with("Day") {
            push_block(heading.take(), &block, &mut days)?;
            block.clear();
            heading = Some(line.trim().to_string());
        } else {
            block.push_str(line);
            block.push('\n');
        }
    }
    push_block(heading, &block, &mut days)?;

    if days.is_empty() {
        return Err(malformed("itinerary", "empty response"));
    }
    Ok(days)
}

/// Each object must carry string `Hotel` and `Website` fields.
pub fn parse_hotels(text: &str) -> Result<Vec<Hotel>, ResponseParseError> {
    const WHAT: &str = "hotel list";
    let cleaned = strip_code_fences(text);

    parse_object_sequence(&cleaned, WHAT)?
        .into_iter()
        .map(|object| serde_json::from_value::<Hotel>(Value::Object(object)).map_err(|e| malformed(WHAT, e)))
        .collect()
}
