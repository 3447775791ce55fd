use std::error::Error;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::ticket::{TicketTable, UploadedTicket};
use crate::services::city_resolver_service::{CityResolveError, CityResolver};
use crate::services::embedding_service::{Embedder, EmbeddingError, OpenAiEmbeddingClient};
use crate::services::hotel_finder_service::{
    hotel_query, HotelFinder, HotelSearchError, HttpWebFetcher, WebFetcher,
};
use crate::services::itinerary_planner_service::{ItineraryPlanner, PlanningError};
use crate::services::llm_service::{CompletionModel, LlmError, OpenAiCompletionClient};
use crate::services::pdf_text_service::{PdfTextExtractor, TextExtractor};
use crate::services::ticket_extraction_service::{TicketExtractionError, TicketExtractor};

#[derive(Debug)]
pub enum TripPlanError {
    Tickets(TicketExtractionError),
    City(CityResolveError),
    Itinerary(PlanningError),
    Hotels(HotelSearchError),
}

impl fmt::Display for TripPlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TripPlanError::Tickets(err) => write!(f, "{}", err),
            TripPlanError::City(err) => write!(f, "{}", err),
            TripPlanError::Itinerary(err) => write!(f, "{}", err),
            TripPlanError::Hotels(err) => write!(f, "{}", err),
        }
    }
}

impl Error for TripPlanError {}

impl From<TicketExtractionError> for TripPlanError {
    fn from(err: TicketExtractionError) -> Self {
        TripPlanError::Tickets(err)
    }
}

impl From<CityResolveError> for TripPlanError {
    fn from(err: CityResolveError) -> Self {
        TripPlanError::City(err)
    }
}

impl From<PlanningError> for TripPlanError {
    fn from(err: PlanningError) -> Self {
        TripPlanError::Itinerary(err)
    }
}

impl From<HotelSearchError> for TripPlanError {
    fn from(err: HotelSearchError) -> Self {
        TripPlanError::Hotels(err)
    }
}

#[derive(Debug)]
pub enum ServiceInitError {
    Llm(LlmError),
    Embedding(EmbeddingError),
    Search(HotelSearchError),
}

impl fmt::Display for ServiceInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceInitError::Llm(err) => write!(f, "Completion client: {}", err),
            ServiceInitError::Embedding(err) => write!(f, "Embedding client: {}", err),
            ServiceInitError::Search(err) => write!(f, "Search client: {}", err),
        }
    }
}

impl Error for ServiceInitError {}

#[derive(Debug, Clone, PartialEq)]
pub struct TripPlan {
    pub tickets: TicketTable,
    pub city: String,
    pub itinerary: String,
    pub hotels: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlanOutcome {
    NoTicketData,
    Planned(TripPlan),
}

/// Upstream collaborators, swappable as a unit.
#[derive(Clone)]
pub struct Collaborators {
    pub llm: Arc<dyn CompletionModel>,
    pub embedder: Arc<dyn Embedder>,
    pub fetcher: Arc<dyn WebFetcher>,
    pub text_extractor: Arc<dyn TextExtractor>,
}

impl Collaborators {
    pub fn from_config(config: &AppConfig) -> Result<Self, ServiceInitError> {
        let llm = OpenAiCompletionClient::from_config(config).map_err(ServiceInitError::Llm)?;
        let embedder =
            OpenAiEmbeddingClient::from_config(config).map_err(ServiceInitError::Embedding)?;
        let fetcher =
            HttpWebFetcher::new(config.upstream_timeout).map_err(ServiceInitError::Search)?;

        Ok(Self {
            llm: Arc::new(llm),
            embedder: Arc::new(embedder),
            fetcher: Arc::new(fetcher),
            text_extractor: Arc::new(PdfTextExtractor),
        })
    }
}

/// Ticket upload to itinerary and hotel suggestions.
pub struct TripPlanner {
    tickets: TicketExtractor,
    cities: CityResolver,
    itineraries: ItineraryPlanner,
    hotels: HotelFinder,
}

impl TripPlanner {
    pub fn new(collaborators: Collaborators, airports_csv: PathBuf, search_base_url: &str) -> Self {
        let Collaborators {
            llm,
            embedder,
            fetcher,
            text_extractor,
        } = collaborators;

        Self {
            tickets: TicketExtractor::new(llm.clone(), text_extractor),
            cities: CityResolver::new(embedder, airports_csv),
            itineraries: ItineraryPlanner::new(llm.clone()),
            hotels: HotelFinder::new(llm, fetcher, search_base_url),
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ServiceInitError> {
        Ok(Self::new(
            Collaborators::from_config(config)?,
            config.airports_csv.clone(),
            &config.search_base_url,
        ))
    }

    pub fn city_resolver(&self) -> &CityResolver {
        &self.cities
    }

    /// Only the first ticket's arrival drives the plan, even when several were uploaded.
    pub async fn plan(
        &self,
        uploads: &[UploadedTicket],
        days: u32,
    ) -> Result<PlanOutcome, TripPlanError> {
        let tickets = self.tickets.create_table(uploads, days).await?;

        let (arrive, date_of_arrive, days) = match tickets.first() {
            Some(first) => (
                first.arrive.clone(),
                first.date_of_arrive.clone(),
                first.days,
            ),
            None => return Ok(PlanOutcome::NoTicketData),
        };

        let city = self.cities.resolve(&arrive).await?;

        let query = hotel_query(&city, days, &date_of_arrive);
        let (itinerary, hotels) = futures::try_join!(
            async {
                self.itineraries
                    .plan(&city, &date_of_arrive, days)
                    .await
                    .map_err(TripPlanError::from)
            },
            async { self.hotels.search(&query).await.map_err(TripPlanError::from) },
        )?;

        Ok(PlanOutcome::Planned(TripPlan {
            tickets,
            city,
            itinerary,
            hotels,
        }))
    }
}
