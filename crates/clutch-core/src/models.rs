use serde::{Deserialize, Serialize};

/// One company listing extracted from a search-results page.
///
/// All optional fields hold the provider-supplied text verbatim — no numeric
/// parsing, no locale handling. Consumers that need structure (a numeric
/// rating, a rate range) parse the strings downstream.
///
/// A `Company` is assembled in full by the card parser from exactly one card
/// fragment and never mutated afterwards; cards without both a name and a
/// profile URL never become a `Company` at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub name: String,
    /// Site-relative path of the company's Clutch profile page.
    pub profile_url: String,
    pub website: Option<String>,
    pub rating: Option<String>,
    pub review_count: Option<String>,
    pub hourly_rate: Option<String>,
    pub min_project_size: Option<String>,
    pub employee_count: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    /// Absolute URL, already resolved against the page base URL.
    pub logo_url: Option<String>,
    pub verified: bool,
}

impl Company {
    /// Identity used for cross-page deduplication.
    pub fn dedup_key(&self) -> (&str, &str) {
        (&self.name, &self.profile_url)
    }
}
