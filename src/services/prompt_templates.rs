//! Prompt text for every model call the planner makes.
//!
//! A `ResponseSchema` only renders formatting instructions into a prompt. It does not
//! validate what comes back.

pub struct ResponseSchema {
    pub name: &'static str,
    pub description: &'static str,
}

pub const ITINERARY_SCHEMA: [ResponseSchema; 4] = [
    ResponseSchema {
        name: "day1",
        description: "date",
    },
    ResponseSchema {
        name: "- Morning",
        description: "The name of a tourist place",
    },
    ResponseSchema {
        name: "- Noon",
        description: "The name of a tourist place",
    },
    ResponseSchema {
        name: "- Night",
        description: "The name of a tourist place",
    },
];

pub const HOTEL_SCHEMA: [ResponseSchema; 2] = [
    ResponseSchema {
        name: "Hotel",
        description: "Name the Hotels",
    },
    ResponseSchema {
        name: "Website",
        description: "Whats the Website of that Hotel",
    },
];

pub const HOTEL_COUNT: usize = 5;

pub fn format_instructions(schema: &[ResponseSchema]) -> String {
    let fields = schema
        .iter()
        .map(|field| format!("\t\"{}\": string  // {}", field.name, field.description))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "The output should be a markdown code snippet formatted in the following schema, \
         including the leading and trailing \"```json\" and \"```\":\n\n```json\n{{\n{}\n}}\n```",
        fields
    )
}

const TICKET_TEMPLATE: &str = r#"Extract all of the following values: Full Name, Depart, Date of Depart, Arrive, Date of Arrive(just dd.mm.yyyy) from the following data:
Format the output in JSON and leave missing data blank.

Example 1:
{
    "Full Name": "Amir Santoshi",
    "Depart": "London Airport",
    "Date of Depart": "10 April 2020",
    "Arrive": "Berlin Airport",
    "Date of Arrive": "11 April 2020"
}

Example 2:
{
    "Full Name": "John Doe",
    "Depart": "New York JFK",
    "Date of Depart": "05 March 2021",
    "Arrive": "Los Angeles LAX",
    "Date of Arrive": "05 March 2021"
}

Here comes the data:
"#;

pub fn ticket_prompt(contents: &str) -> String {
    format!("{}{}\n", TICKET_TEMPLATE, contents)
}

pub fn places_prompt(city: &str) -> String {
    format!(
        "You should suggest all tourist places to visit in {}.\nYOUR RESPONSE:\n",
        city
    )
}

pub fn schedule_prompt(places: &str, date: &str, days: u32) -> String {
    format!(
        "With this list of places: {} , please plan visits from {} only within {} days.\n\n{}\nYOUR RESPONSE:\n",
        places,
        date,
        days,
        format_instructions(&ITINERARY_SCHEMA)
    )
}

pub fn hotel_prompt(query: &str, search_results: &str) -> String {
    format!(
        "Between >>> and <<< are the raw search result text from a web search.\n>>> {} <<<\n\
         Just Name {} of the best hotels along with their website address.\n{}\n{} .\n",
        search_results,
        HOTEL_COUNT,
        format_instructions(&HOTEL_SCHEMA),
        query
    )
}
