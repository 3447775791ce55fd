use serde::Serialize;

use crate::models::ticket::TicketTable;

/// A value a page reads from the session, which may not have been produced yet.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Computed<T> {
    NotYetComputed,
    Ready(T),
}

impl<T> Computed<T> {
    pub fn as_ready(&self) -> Option<&T> {
        match self {
            Computed::Ready(value) => Some(value),
            Computed::NotYetComputed => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Computed::Ready(_))
    }
}

impl<T> Default for Computed<T> {
    fn default() -> Self {
        Computed::NotYetComputed
    }
}

/// Everything one visitor's pages share. The itinerary and hotel texts are stored as the
/// model returned them and parsed again by each page that shows them.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TripSession {
    pub ticket_data: Computed<TicketTable>,
    pub itinerary: Computed<String>,
    pub hotels: Computed<String>,
}

impl TripSession {
    /// Replaces all three results at once; partial results are never stored.
    pub fn record(&mut self, tickets: TicketTable, itinerary: String, hotels: String) {
        self.ticket_data = Computed::Ready(tickets);
        self.itinerary = Computed::Ready(itinerary);
        self.hotels = Computed::Ready(hotels);
    }
}
