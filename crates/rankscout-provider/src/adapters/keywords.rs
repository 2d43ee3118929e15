//! Keywords adapter: search-volume task payloads and normalized volume
//! result items, including the trailing twelve months of monthly searches.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{DEFAULT_LANGUAGE_CODE, DEFAULT_LOCATION_CODE};

/// A search-volume request for a batch of keywords.
#[derive(Debug, Clone)]
pub struct VolumeRequest {
    pub keywords: Vec<String>,
    pub location_code: Option<u32>,
    pub language_code: Option<String>,
}

impl VolumeRequest {
    #[must_use]
    pub fn new(keywords: Vec<String>) -> Self {
        Self {
            keywords,
            location_code: None,
            language_code: None,
        }
    }
}

/// Build the provider payload for a search-volume task.
#[must_use]
pub fn search_volume_payload(request: &VolumeRequest) -> Value {
    json!({
        "keywords": request.keywords,
        "location_code": request.location_code.unwrap_or(DEFAULT_LOCATION_CODE),
        "language_code": request
            .language_code
            .as_deref()
            .unwrap_or(DEFAULT_LANGUAGE_CODE),
        "include_serp_info": false,
    })
}

/// One keyword's volume data, normalized from the provider result array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordVolumeItem {
    pub keyword: String,
    #[serde(default)]
    pub search_volume: i64,
    /// Provider competition bucket: `LOW`, `MEDIUM`, or `HIGH`.
    #[serde(default)]
    pub competition: Option<String>,
    #[serde(default)]
    pub monthly_searches: Vec<MonthlySearch>,
}

/// One month of historical search volume.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MonthlySearch {
    pub year: i32,
    pub month: u32,
    pub search_volume: i64,
}

impl KeywordVolumeItem {
    /// The trailing monthly volumes in chronological order, oldest first.
    ///
    /// The provider returns `monthly_searches` newest-first; seasonality
    /// math wants them oldest-first.
    #[must_use]
    pub fn monthly_volumes(&self) -> Vec<i64> {
        let mut months = self.monthly_searches.clone();
        months.sort_by_key(|m| (m.year, m.month));
        months.iter().map(|m| m.search_volume).collect()
    }
}
