//! Sequential pagination and aggregation across search URLs.

use std::collections::HashSet;

use url::Url;

use crate::models::Company;
use crate::parse;
use crate::traits::Fetcher;

/// Aggregate outcome of one scraping run.
#[derive(Debug)]
pub struct ScrapeSummary {
    /// Unique records in encounter order.
    pub companies: Vec<Company>,
    pub urls_processed: usize,
    pub pages_fetched: usize,
}

/// Pagination driver: fetches page after page for each search URL, parses
/// each into records, and deduplicates across everything collected.
///
/// Per URL, pagination stops on the first fetch failure, the first page
/// with zero records, or the configured page cap — whichever comes first.
/// A failing URL never affects the others, and the driver itself never
/// errors.
pub struct ScrapeService<F: Fetcher> {
    fetcher: F,
    max_pages: u32,
}

impl<F: Fetcher> ScrapeService<F> {
    pub fn new(fetcher: F, max_pages: u32) -> Self {
        Self { fetcher, max_pages }
    }

    pub async fn run(&self, search_urls: &[String]) -> ScrapeSummary {
        let mut collected = Vec::new();
        let mut pages_fetched = 0usize;

        for url in search_urls {
            tracing::info!("Scraping {} (up to {} pages)", url, self.max_pages);

            for page in 1..=self.max_pages {
                let page_url = build_paged_url(url, page);
                tracing::info!(page, "Fetching {}", page_url);

                let html = match self.fetcher.fetch(&page_url).await {
                    Ok(html) => html,
                    Err(e) => {
                        tracing::warn!(
                            "Stopping pagination for {} after fetch failure: {}",
                            url,
                            e
                        );
                        break;
                    }
                };
                pages_fetched += 1;

                // Records resolve relative URLs against the un-paged search
                // URL, not the page=N variant.
                let companies = parse::parse_page(&html, url);
                if companies.is_empty() {
                    tracing::info!(
                        "No listings found on page {}; stopping pagination for this URL",
                        page
                    );
                    break;
                }
                collected.extend(companies);
            }
        }

        let companies = dedup(collected);
        tracing::info!(
            "Scraping complete: {} unique companies from {} search URLs",
            companies.len(),
            search_urls.len()
        );

        ScrapeSummary {
            companies,
            urls_processed: search_urls.len(),
            pages_fetched,
        }
    }
}

/// Drop records whose `(name, profileUrl)` pair has already been seen,
/// keeping first occurrences in encounter order.
fn dedup(companies: Vec<Company>) -> Vec<Company> {
    let mut seen = HashSet::new();
    companies
        .into_iter()
        .filter(|company| {
            let (name, profile_url) = company.dedup_key();
            seen.insert((name.to_string(), profile_url.to_string()))
        })
        .collect()
}

/// Build the URL for a given result page using a 1-based `page` query
/// parameter. Page 1 is the base URL untouched; an existing `page`
/// parameter is replaced.
pub fn build_paged_url(base_url: &str, page: u32) -> String {
    if page <= 1 {
        return base_url.to_string();
    }
    let Ok(mut url) = Url::parse(base_url) else {
        return base_url.to_string();
    };

    let retained: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .filter(|(k, _)| k != "page")
        .collect();
    {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        pairs.extend_pairs(retained);
        pairs.append_pair("page", &page.to_string());
    }
    url.to_string()
}
