//! Card location and record assembly over a parsed results page.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::extract;
use crate::models::Company;

/// Modern result layouts: provider cards and rows.
static PROVIDER_CARDS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div.provider-card, div.provider-row, li.provider-row").unwrap()
});

/// Older generic directory-listing layout.
static DIRECTORY_LISTINGS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.directory-listing, li.directory-listing").unwrap());

/// Find the DOM fragments that each represent one company entry, in
/// document order.
///
/// An empty result is a valid "no listings on this page" signal, not an
/// error; pagination uses it as a stop condition.
pub fn locate_cards(document: &Html) -> Vec<ElementRef<'_>> {
    let cards: Vec<_> = document.select(&PROVIDER_CARDS).collect();
    if !cards.is_empty() {
        return cards;
    }
    document.select(&DIRECTORY_LISTINGS).collect()
}

/// Assemble one [`Company`] from a card fragment.
///
/// Every field extractor runs exactly once. A card without both a name and
/// a profile URL yields `None` — a structurally absent result, never a
/// partial record.
pub fn parse_card(card: &ElementRef<'_>, base_url: &str) -> Option<Company> {
    let name_el = extract::name_element(card);
    let name = name_el.as_ref().and_then(extract::text_of);

    let href = match name_el {
        Some(el) if el.value().name() == "a" => el.value().attr("href").map(str::to_string),
        _ => extract::profile_link_href(card),
    };
    let profile_url = href.as_deref().and_then(extract::normalize_profile_href);

    let (Some(name), Some(profile_url)) = (name, profile_url) else {
        tracing::debug!("Skipping card: missing name or profile URL");
        return None;
    };

    Some(Company {
        name,
        profile_url,
        website: extract::website(card),
        rating: extract::rating(card),
        review_count: extract::review_count(card),
        hourly_rate: extract::hourly_rate(card),
        min_project_size: extract::min_project_size(card),
        employee_count: extract::employee_count(card),
        location: extract::location(card),
        description: extract::description(card),
        logo_url: extract::logo_url(card, base_url),
        verified: extract::verified(card),
    })
}

/// Parse a full search-results page into company records, preserving
/// document order. Cardless pages and pages where every card is incomplete
/// both produce an empty vector.
pub fn parse_page(html: &str, base_url: &str) -> Vec<Company> {
    let document = Html::parse_document(html);
    let cards = locate_cards(&document);
    if cards.is_empty() {
        tracing::warn!("No company cards found in the provided HTML");
        return Vec::new();
    }

    let companies: Vec<Company> = cards
        .iter()
        .filter_map(|card| parse_card(card, base_url))
        .collect();

    tracing::info!(
        "Parsed {} company listings from search results",
        companies.len()
    );
    companies
}
