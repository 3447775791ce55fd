pub mod city_resolver_service;
pub mod embedding_service;
pub mod hotel_finder_service;
pub mod itinerary_planner_service;
pub mod llm_service;
pub mod pdf_text_service;
pub mod prompt_templates;
pub mod response_parser;
pub mod session_store;
pub mod ticket_extraction_service;
pub mod trip_service;
