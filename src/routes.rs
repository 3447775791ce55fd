pub mod health;
pub mod home;
pub mod hotels;
pub mod itinerary;
pub mod ticket_info;
pub mod views;
