use serde::{Deserialize, Deserializer, Serialize};

/// Fields pulled out of one uploaded ticket. Anything the model left out stays an empty
/// string; `days` is the stay length the traveller typed in, never extracted.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct TicketRecord {
    #[serde(rename = "Full Name", default, deserialize_with = "blank_if_null")]
    pub full_name: String,
    #[serde(rename = "Depart", default, deserialize_with = "blank_if_null")]
    pub depart: String,
    #[serde(rename = "Date of Depart", default, deserialize_with = "blank_if_null")]
    pub date_of_depart: String,
    #[serde(rename = "Arrive", default, deserialize_with = "blank_if_null")]
    pub arrive: String,
    #[serde(rename = "Date of Arrive", default, deserialize_with = "blank_if_null")]
    pub date_of_arrive: String,
    #[serde(rename = "Days", default)]
    pub days: u32,
}

impl TicketRecord {
    pub const COLUMNS: [&'static str; 6] = [
        "Full Name",
        "Depart",
        "Date of Depart",
        "Arrive",
        "Date of Arrive",
        "Days",
    ];

    /// Cell values in `COLUMNS` order.
    pub fn cells(&self) -> [String; 6] {
        [
            self.full_name.clone(),
            self.depart.clone(),
            self.date_of_depart.clone(),
            self.arrive.clone(),
            self.date_of_arrive.clone(),
            self.days.to_string(),
        ]
    }
}

fn blank_if_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// One row per successfully extracted upload, in upload order.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(transparent)]
pub struct TicketTable {
    pub rows: Vec<TicketRecord>,
}

impl TicketTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// The row that drives planning. Later tickets are listed but never composed into the trip.
    pub fn first(&self) -> Option<&TicketRecord> {
        self.rows.first()
    }
}

/// A PDF as received from the upload form.
#[derive(Debug, Clone)]
pub struct UploadedTicket {
    pub file_name: String,
    pub bytes: Vec<u8>,
}
