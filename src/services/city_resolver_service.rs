use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::models::airport::Airport;
use crate::services::embedding_service::{Embedder, EmbeddingError};

#[derive(Debug)]
pub enum CityResolveError {
    CsvError(csv::Error),
    EmptyIndex(PathBuf),
    EmbeddingError(EmbeddingError),
    EmbeddingMismatch { expected: usize, received: usize },
}

impl fmt::Display for CityResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CityResolveError::CsvError(err) => write!(f, "Failed to read airport table: {}", err),
            CityResolveError::EmptyIndex(path) => {
                write!(f, "Airport table {} has no rows", path.display())
            }
            CityResolveError::EmbeddingError(err) => write!(f, "Embedding error: {}", err),
            CityResolveError::EmbeddingMismatch { expected, received } => write!(
                f,
                "Embedder returned {} vectors for {} texts",
                received, expected
            ),
        }
    }
}

impl Error for CityResolveError {}

impl From<csv::Error> for CityResolveError {
    fn from(err: csv::Error) -> Self {
        CityResolveError::CsvError(err)
    }
}

impl From<EmbeddingError> for CityResolveError {
    fn from(err: EmbeddingError) -> Self {
        CityResolveError::EmbeddingError(err)
    }
}

/// `dot(a, b) / (|a| * |b|)`. A zero vector is similar to nothing.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0f32;
    let mut norm_a = 0f32;
    let mut norm_b = 0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a.sqrt() * norm_b.sqrt())
    }
}

/// Index of the highest score. Ties go to the earliest row.
pub fn best_match(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &score) in scores.iter().enumerate() {
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((i, score)),
        }
    }
    best.map(|(i, _)| i)
}

pub struct AirportIndex {
    pub airports: Vec<Airport>,
}

impl AirportIndex {
    /// Reads the reference CSV. It needs `Airport Name` and `City` columns.
    pub fn load(path: &Path) -> Result<Self, CityResolveError> {
        let mut reader = csv::Reader::from_path(path)?;
        let airports = reader
            .deserialize::<Airport>()
            .collect::<Result<Vec<_>, _>>()?;

        if airports.is_empty() {
            return Err(CityResolveError::EmptyIndex(path.to_path_buf()));
        }

        Ok(Self { airports })
    }
}

/// Maps a free-text arrival airport to a city by nearest airport name in embedding space.
///
/// There is no threshold: the best match is returned however weak it is.
pub struct CityResolver {
    embedder: Arc<dyn Embedder>,
    airports_csv: PathBuf,
}

impl CityResolver {
    pub fn new(embedder: Arc<dyn Embedder>, airports_csv: PathBuf) -> Self {
        Self {
            embedder,
            airports_csv,
        }
    }

    pub fn airports_csv(&self) -> &Path {
        &self.airports_csv
    }

    pub async fn resolve(&self, arrive: &str) -> Result<String, CityResolveError> {
        // re-read on every call so edits to the table apply without a restart
        let index = AirportIndex::load(&self.airports_csv)?;
        let airport = self.nearest(&index, arrive).await?;

        log::info!(
            "Resolved '{}' to {} ({})",
            arrive,
            airport.city,
            airport.airport_name
        );
        Ok(airport.city.clone())
    }

    pub async fn nearest<'i>(
        &self,
        index: &'i AirportIndex,
        query: &str,
    ) -> Result<&'i Airport, CityResolveError> {
        let mut texts: Vec<String> = index
            .airports
            .iter()
            .map(|airport| airport.airport_name.clone())
            .collect();
        texts.push(query.to_string());

        let mut vectors = self.embedder.embed(&texts).await?;
        if vectors.len() != texts.len() {
            return Err(CityResolveError::EmbeddingMismatch {
                expected: texts.len(),
                received: vectors.len(),
            });
        }

        let query_vector = vectors.pop().unwrap_or_default();
        let scores: Vec<f32> = vectors
            .iter()
            .map(|vector| cosine_similarity(vector, &query_vector))
            .collect();

        best_match(&scores)
            .map(|i| &index.airports[i])
            .ok_or_else(|| CityResolveError::EmptyIndex(self.airports_csv.clone()))
    }
}
