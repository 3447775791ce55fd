#![allow(dead_code)]

use actix_web::{
    cookie::Cookie,
    http::header,
    test::TestRequest,
    web, App,
};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use travel_guide_api::app::{configure, AppState};
use travel_guide_api::middleware::session::{SessionMiddleware, SESSION_COOKIE};
use travel_guide_api::models::session::TripSession;
use travel_guide_api::services::embedding_service::{Embedder, EmbeddingError};
use travel_guide_api::services::hotel_finder_service::{HotelSearchError, WebFetcher};
use travel_guide_api::services::llm_service::{CompletionModel, CompletionOptions, LlmError};
use travel_guide_api::services::pdf_text_service::{PdfTextError, TextExtractor};
use travel_guide_api::services::trip_service::{Collaborators, TripPlanner};

pub const BOUNDARY: &str = "----travel-guide-test-boundary";

pub const BERLIN_TICKET: &str = r#"{"Full Name":"Jane Roe","Depart":"London Heathrow","Date of Depart":"10 April 2020","Arrive":"Berlin Brandenburg","Date of Arrive":"11 April 2020"}"#;
pub const PARIS_TICKET: &str = r#"{"Full Name":"John Doe","Depart":"Berlin Brandenburg","Date of Depart":"14 April 2020","Arrive":"Paris Charles de Gaulle","Date of Arrive":"14 April 2020"}"#;

pub const PLACES: &str = "1. Brandenburg Gate\n2. Museum Island\n3. East Side Gallery";
pub const TEXT_SCHEDULE: &str = "Day 1\n- Morning: Brandenburg Gate\n- Noon: Museum Island\n- Night: East Side Gallery\nDay 2\n- Morning: Reichstag\n- Noon: Tiergarten\n- Night: Potsdamer Platz";
pub const HOTELS: &str = "```json\n{\"Hotel\": \"Hotel Adlon Kempinski\", \"Website\": \"https://www.kempinski.com/adlon\"}\n{\"Hotel\": \"Regent Berlin\", \"Website\": \"https://www.regenthotels.com/berlin\"}\n```";

/// Answers each prompt kind with canned text. A ticket prompt is answered with the
/// document text it carries, so the uploaded bytes decide what gets extracted.
pub struct FakeLlm {
    pub schedule: String,
    pub hotels: String,
    pub prompts: Mutex<Vec<String>>,
}

impl FakeLlm {
    pub fn new(schedule: &str, hotels: &str) -> Arc<Self> {
        Arc::new(Self {
            schedule: schedule.to_string(),
            hotels: hotels.to_string(),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn prompts_containing(&self, needle: &str) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap()
            .iter()
            .filter(|prompt| prompt.contains(needle))
            .cloned()
            .collect()
    }
}

impl CompletionModel for FakeLlm {
    fn complete<'a>(
        &'a self,
        prompt: &'a str,
        _options: CompletionOptions,
    ) -> BoxFuture<'a, Result<String, LlmError>> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        let answer = if let Some((_, data)) = prompt.split_once("Here comes the data:\n") {
            format!("Here is the extracted data:\n{}", data.trim())
        } else if prompt.contains("tourist places to visit") {
            PLACES.to_string()
        } else if prompt.contains("please plan visits") {
            self.schedule.clone()
        } else if prompt.contains("best hotels") {
            self.hotels.clone()
        } else {
            String::new()
        };

        async move { Ok(answer) }.boxed()
    }
}

/// Treats uploaded bytes as the document's text.
pub struct Utf8Text;

impl TextExtractor for Utf8Text {
    fn extract_text<'a>(&'a self, bytes: &'a [u8]) -> BoxFuture<'a, Result<String, PdfTextError>> {
        let result = String::from_utf8(bytes.to_vec())
            .map_err(|e| PdfTextError::Decode(e.to_string()));
        async move { result }.boxed()
    }
}

/// Letter-frequency vectors: deterministic, and similar spellings land close together.
pub struct LetterCounts;

impl Embedder for LetterCounts {
    fn embed<'a>(&'a self, texts: &'a [String]) -> BoxFuture<'a, Result<Vec<Vec<f32>>, EmbeddingError>> {
        let vectors = texts
            .iter()
            .map(|text| {
                let mut counts = vec![0f32; 26];
                for c in text.to_ascii_lowercase().bytes() {
                    if c.is_ascii_lowercase() {
                        counts[(c - b'a') as usize] += 1.0;
                    }
                }
                counts
            })
            .collect();
        async move { Ok(vectors) }.boxed()
    }
}

pub struct StaticPage {
    pub urls: Mutex<Vec<String>>,
}

impl StaticPage {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            urls: Mutex::new(Vec::new()),
        })
    }
}

impl WebFetcher for StaticPage {
    fn fetch_text<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<String, HotelSearchError>> {
        self.urls.lock().unwrap().push(url.to_string());
        async move { Ok("Top hotels: Hotel Adlon Kempinski, Regent Berlin".to_string()) }.boxed()
    }
}

pub fn airports_csv() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/airports.csv")
}

pub fn planner(llm: Arc<FakeLlm>, fetcher: Arc<StaticPage>) -> TripPlanner {
    TripPlanner::new(
        Collaborators {
            llm,
            embedder: Arc::new(LetterCounts),
            fetcher,
            text_extractor: Arc::new(Utf8Text),
        },
        airports_csv(),
        "https://search.test/search",
    )
}

pub struct TestApp {
    pub state: web::Data<AppState>,
    pub llm: Arc<FakeLlm>,
    pub fetcher: Arc<StaticPage>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_answers(TEXT_SCHEDULE, HOTELS)
    }

    pub fn with_answers(schedule: &str, hotels: &str) -> Self {
        let llm = FakeLlm::new(schedule, hotels);
        let fetcher = StaticPage::new();
        let state = web::Data::new(AppState::new(planner(llm.clone(), fetcher.clone())));

        Self {
            state,
            llm,
            fetcher,
        }
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .wrap(SessionMiddleware)
            .app_data(self.state.clone())
            .configure(configure)
    }

    /// Stores a session directly and returns its id.
    pub fn seed_session(&self, session: TripSession) -> Uuid {
        let id = Uuid::new_v4();
        self.state.sessions.update(id, |current| *current = session);
        id
    }
}

pub fn session_cookie(id: Uuid) -> Cookie<'static> {
    Cookie::new(SESSION_COOKIE, id.to_string())
}

pub struct UploadPart<'a> {
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub bytes: &'a [u8],
}

pub fn pdf(file_name: &'static str, text: &'static str) -> UploadPart<'static> {
    UploadPart {
        file_name,
        content_type: "application/pdf",
        bytes: text.as_bytes(),
    }
}

pub fn multipart_body(files: &[UploadPart<'_>], days: Option<&str>) -> Vec<u8> {
    let mut body = Vec::new();
    for file in files {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"tickets\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                file.file_name, file.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(file.bytes);
        body.extend_from_slice(b"\r\n");
    }
    if let Some(days) = days {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(b"Content-Disposition: form-data; name=\"days\"\r\n\r\n");
        body.extend_from_slice(days.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn upload_request(files: &[UploadPart<'_>], days: Option<&str>) -> TestRequest {
    TestRequest::post()
        .uri("/ticket-info")
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        ))
        .set_payload(multipart_body(files, days))
}
