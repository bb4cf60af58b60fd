// API client module: a small blocking HTTP client for the OMDb catalog
// service. One lookup-by-title call; the stringly-typed OMDb response is
// mapped into the internal movie shape here so the rest of the crate never
// sees raw catalog JSON.

use log::debug;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_BASE_URL: &str = "http://www.omdbapi.com";

/// Errors from a remote catalog lookup. `NotFound` is an expected business
/// condition; `Connection` covers transport failures (unreachable host,
/// timeout); `Api` covers payloads we cannot make sense of.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("movie \"{title}\" not found in catalog")]
    NotFound { title: String },

    #[error("catalog connection failed: {0}")]
    Connection(#[from] reqwest::Error),

    #[error("unexpected catalog response: {0}")]
    Api(String),
}

/// A movie as resolved by the catalog: the canonical title plus the fields
/// we persist.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieData {
    pub title: String,
    pub year: i32,
    pub rating: f64,
    pub poster: String,
}

/// Raw OMDb response shape. Every field is a string on the wire; `response`
/// is the literal "True"/"False" the API uses to signal found/not-found.
#[derive(Debug, Deserialize)]
struct OmdbResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
    #[serde(rename = "Poster")]
    poster: Option<String>,
}

/// Client for the OMDb API. Holds a reqwest blocking client, the base URL
/// and the API key; constructed once at startup and reused for every lookup.
pub struct OmdbClient {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    /// Create a client configured from the environment: `OMDB_API_KEY`
    /// (required) and `OMDB_API_URL` (optional base URL override).
    pub fn from_env() -> anyhow::Result<Self> {
        let api_key = std::env::var("OMDB_API_KEY")
            .map_err(|_| anyhow::anyhow!("OMDB_API_KEY environment variable is not set"))?;
        let base_url =
            std::env::var("OMDB_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Ok(Self::new(base_url, api_key))
    }

    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            base_url,
            api_key,
        }
    }

    /// Look up a movie by title. Returns the mapped record, `NotFound` when
    /// the catalog has no match, or `Connection`/`Api` on failure.
    pub fn lookup(&self, title: &str) -> Result<MovieData, LookupError> {
        let res = self
            .client
            .get(&self.base_url)
            .query(&[("apikey", self.api_key.as_str()), ("t", title)])
            .send()?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().unwrap_or_default();
            return Err(LookupError::Api(format!("HTTP {status}: {body}")));
        }

        let parsed: OmdbResponse = res
            .json()
            .map_err(|e| LookupError::Api(format!("invalid JSON: {e}")))?;
        debug!("catalog response for {title:?}: {parsed:?}");
        map_response(title, parsed)
    }
}

/// Map the raw OMDb payload into `MovieData`, applying the parsing rules for
/// OMDb's string fields (year ranges, "N/A" ratings).
fn map_response(requested: &str, parsed: OmdbResponse) -> Result<MovieData, LookupError> {
    if parsed.response != "True" {
        return Err(LookupError::NotFound {
            title: requested.to_string(),
        });
    }

    let title = parsed
        .title
        .ok_or_else(|| LookupError::Api("response without Title".to_string()))?;
    let year_raw = parsed
        .year
        .ok_or_else(|| LookupError::Api("response without Year".to_string()))?;
    let year = parse_year(&year_raw)
        .ok_or_else(|| LookupError::Api(format!("unparseable Year {year_raw:?}")))?;
    let rating = parse_rating(parsed.imdb_rating.as_deref());
    let poster = parsed.poster.unwrap_or_else(|| "N/A".to_string());

    Ok(MovieData {
        title,
        year,
        rating,
        poster,
    })
}

/// OMDb reports series as a range ("2008–2013") or open range ("2008–");
/// take the leading run of digits.
fn parse_year(raw: &str) -> Option<i32> {
    let digits: String = raw.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// "N/A" and other unrated entries map to 0.0 rather than failing the add.
fn parse_rating(raw: Option<&str>) -> f64 {
    raw.and_then(|r| r.parse().ok()).unwrap_or(0.0)
}
