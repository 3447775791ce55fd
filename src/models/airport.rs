use serde::{Deserialize, Serialize};

/// A row of the airport reference table. Extra CSV columns are ignored.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Airport {
    #[serde(rename = "Airport Name")]
    pub airport_name: String,
    #[serde(rename = "City")]
    pub city: String,
}
