pub mod airport;
pub mod hotel;
pub mod itinerary;
pub mod session;
pub mod ticket;
