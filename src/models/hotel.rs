use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Hotel {
    #[serde(rename = "Hotel")]
    pub name: String,
    #[serde(rename = "Website")]
    pub website: String,
}
