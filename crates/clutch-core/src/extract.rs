//! Heuristic field extractors for a single company card.
//!
//! Each extractor is a pure function over the card's subtree: try a precise
//! selector or attribute lookup first, then degrade to a keyword or pattern
//! scan over generic child elements, returning the first non-empty hit.
//! A miss is `None`, never an error. Clutch serves several markup variants
//! depending on category and viewport, so every extractor carries at least
//! one fallback.

use std::sync::LazyLock;

use scraper::{ElementRef, Selector};
use url::Url;

/// Host fragment identifying links that stay on the platform itself.
pub const PLATFORM_DOMAIN: &str = "clutch.co";

macro_rules! selector {
    ($name:ident, $css:expr) => {
        static $name: LazyLock<Selector> = LazyLock::new(|| Selector::parse($css).unwrap());
    };
}

selector!(NAME_ANCHOR, "h3 a, h2 a, .company_title a, .company-name a");
selector!(NAME_ANY, "h3, h2, .company_title, .company-name");
selector!(PROFILE_LINK, r#"a[href*="clutch.co/profile"]"#);
selector!(NEW_TAB_HTTP_LINK, r#"a[href^="http"][target="_blank"]"#);
selector!(HTTP_LINK, r#"a[href^="http"]"#);
selector!(RATING_VALUE, r#"[itemprop="ratingValue"]"#);
selector!(RATING_FALLBACK, ".rating .rating-number, .rating span");
selector!(REVIEWS, r##".reviews-link, .rating-reviews, a[href*="#reviews"]"##);
selector!(SPANS_AND_ANCHORS, "span, a");
selector!(KEYWORD_SCAN, "li, div, span, p");
selector!(LIST_SCAN, "li, div, span");
selector!(LOCATION, ".locality, .location, .provider-location");
selector!(LOCATION_FALLBACK, "span, div");
selector!(DESCRIPTION, ".company_info, .provider-short-description, p");
selector!(IMG, "img");
selector!(VERIFIED_BADGE, ".verified, .clutch-verified, .verification-badge");

/// Collapsed, trimmed text of an element's subtree; empty text is a miss.
pub(crate) fn text_of(el: &ElementRef<'_>) -> Option<String> {
    let joined = el.text().collect::<Vec<_>>().join(" ");
    let collapsed = joined.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

/// The element carrying the company name.
///
/// Anchors are preferred so the profile link can be read off the same node;
/// heading and title-class elements without an anchor are the fallback.
pub fn name_element<'a>(card: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    card.select(&NAME_ANCHOR)
        .next()
        .or_else(|| card.select(&NAME_ANY).next())
}

/// First in-card link pointing at a Clutch profile page, for cards whose
/// name element is not itself a link.
pub fn profile_link_href(card: &ElementRef<'_>) -> Option<String> {
    card.select(&PROFILE_LINK)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string)
}

/// Normalize a profile href to a site-relative path.
///
/// Absolute links on the platform's own host keep only their path (an empty
/// path becomes `/`); relative links pass through unchanged. Absolute links
/// on a foreign host also pass through unchanged: dedup keys on the exact
/// value, so the ambiguity is preserved rather than resolved here.
pub fn normalize_profile_href(href: &str) -> Option<String> {
    if href.is_empty() {
        return None;
    }
    match Url::parse(href) {
        Ok(url) if url.host_str().is_some_and(|h| h.contains(PLATFORM_DOMAIN)) => {
            let path = url.path();
            if path.is_empty() {
                Some("/".to_string())
            } else {
                Some(path.to_string())
            }
        }
        _ => Some(href.to_string()),
    }
}

/// External website link: prefer an explicit "Visit website" style link
/// opening in a new tab, else the first off-platform http(s) link.
pub fn website(card: &ElementRef<'_>) -> Option<String> {
    if let Some(link) = card.select(&NEW_TAB_HTTP_LINK).next() {
        let label = text_of(&link).unwrap_or_default();
        if label.to_lowercase().contains("website") {
            if let Some(href) = link.value().attr("href") {
                return Some(href.to_string());
            }
        }
    }

    card.select(&HTTP_LINK)
        .filter_map(|a| a.value().attr("href"))
        .find(|href| !href.contains(PLATFORM_DOMAIN))
        .map(str::to_string)
}

/// Rating text, e.g. "4.8".
pub fn rating(card: &ElementRef<'_>) -> Option<String> {
    if let Some(el) = card.select(&RATING_VALUE).next() {
        return text_of(&el);
    }
    card.select(&RATING_FALLBACK).next().as_ref().and_then(text_of)
}

/// Review count text, e.g. "12 reviews".
pub fn review_count(card: &ElementRef<'_>) -> Option<String> {
    if let Some(el) = card.select(&REVIEWS).next() {
        return text_of(&el);
    }
    card.select(&SPANS_AND_ANCHORS)
        .filter_map(|el| text_of(&el))
        .find(|text| text.to_lowercase().contains("review"))
}

/// Hourly rate text, e.g. "$25 - $49 / hr".
pub fn hourly_rate(card: &ElementRef<'_>) -> Option<String> {
    card.select(&LIST_SCAN)
        .filter_map(|el| text_of(&el))
        .find(|text| text.contains("/ hr") || text.replace(' ', "").contains("/hr"))
}

/// Minimum project size, e.g. "Min. project size $5,000+" or "$5,000+".
pub fn min_project_size(card: &ElementRef<'_>) -> Option<String> {
    keyword_scan(card, "min. project size").or_else(|| {
        card.select(&LIST_SCAN)
            .filter_map(|el| text_of(&el))
            .find(|text| text.starts_with('$') && text.ends_with('+'))
    })
}

/// Team size text, e.g. "10 - 49 employees".
pub fn employee_count(card: &ElementRef<'_>) -> Option<String> {
    keyword_scan(card, "employees").or_else(|| {
        card.select(&LIST_SCAN)
            .filter_map(|el| text_of(&el))
            .find(|text| text.to_lowercase().contains("employees"))
    })
}

/// Location text, e.g. "Austin, TX, United States".
pub fn location(card: &ElementRef<'_>) -> Option<String> {
    if let Some(el) = card.select(&LOCATION).next() {
        return text_of(&el);
    }
    // "City, Region, Country"-shaped text: exactly three comma-separated
    // segments. Misses two-segment "City, Country" locations.
    card.select(&LOCATION_FALLBACK)
        .filter_map(|el| text_of(&el))
        .find(|text| {
            text.contains(',')
                && text.chars().any(|c| c.is_alphabetic())
                && text.split(',').count() == 3
        })
}

/// Short company description.
pub fn description(card: &ElementRef<'_>) -> Option<String> {
    card.select(&DESCRIPTION).next().as_ref().and_then(text_of)
}

/// Logo image URL, resolved against the page base URL.
///
/// Lazy-load sources (`data-src`) win over the eager `src`, which on lazy
/// pages is usually a placeholder.
pub fn logo_url(card: &ElementRef<'_>, base_url: &str) -> Option<String> {
    let img = card.select(&IMG).next()?;
    let src = [img.value().attr("data-src"), img.value().attr("src")]
        .into_iter()
        .flatten()
        .find(|s| !s.is_empty())?;

    match Url::parse(base_url).and_then(|base| base.join(src)) {
        Ok(resolved) => Some(resolved.to_string()),
        Err(_) => Some(src.to_string()),
    }
}

/// Whether the card carries a verification badge, or merely mentions
/// "verified" anywhere in its text. Intentionally loose.
pub fn verified(card: &ElementRef<'_>) -> bool {
    if card.select(&VERIFIED_BADGE).next().is_some() {
        return true;
    }
    text_of(card).is_some_and(|text| text.to_lowercase().contains("verified"))
}

/// First `li`/`div`/`span`/`p` whose text contains the keyword
/// (case-insensitive substring).
fn keyword_scan(card: &ElementRef<'_>, keyword: &str) -> Option<String> {
    let keyword = keyword.to_lowercase();
    card.select(&KEYWORD_SCAN)
        .filter_map(|el| text_of(&el))
        .find(|text| text.to_lowercase().contains(&keyword))
}

#[cfg(test)]
mod tests {
    use scraper::Html;

    use super::*;

    fn card_doc(inner: &str) -> Html {
        Html::parse_document(&format!(r#"<div class="provider-card">{inner}</div>"#))
    }

    fn first_card(document: &Html) -> ElementRef<'_> {
        let sel = Selector::parse("div.provider-card").unwrap();
        document.select(&sel).next().unwrap()
    }

    #[test]
    fn name_prefers_heading_anchor() {
        let doc = card_doc(r#"<h3><a href="/profile/acme">Acme Co</a></h3><h2>Wrong</h2>"#);
        let card = first_card(&doc);
        let el = name_element(&card).unwrap();
        assert_eq!(el.value().name(), "a");
        assert_eq!(text_of(&el).as_deref(), Some("Acme Co"));
    }

    #[test]
    fn name_falls_back_to_plain_heading() {
        let doc = card_doc(r#"<h3>Acme Co</h3>"#);
        let card = first_card(&doc);
        let el = name_element(&card).unwrap();
        assert_eq!(el.value().name(), "h3");
        assert_eq!(text_of(&el).as_deref(), Some("Acme Co"));
    }

    #[test]
    fn name_falls_back_to_company_name_class() {
        let doc = card_doc(r#"<span class="company-name"><a href="/profile/x">X Labs</a></span>"#);
        let card = first_card(&doc);
        assert_eq!(
            name_element(&card).as_ref().and_then(text_of).as_deref(),
            Some("X Labs")
        );
    }

    #[test]
    fn profile_link_found_by_href_marker() {
        let doc = card_doc(
            r#"<h3>Acme Co</h3><a href="https://clutch.co/profile/acme">View profile</a>"#,
        );
        let card = first_card(&doc);
        assert_eq!(
            profile_link_href(&card).as_deref(),
            Some("https://clutch.co/profile/acme")
        );
    }

    #[test]
    fn normalize_keeps_path_of_platform_absolute_url() {
        assert_eq!(
            normalize_profile_href("https://clutch.co/profile/acme").as_deref(),
            Some("/profile/acme")
        );
        assert_eq!(
            normalize_profile_href("https://www.clutch.co/profile/acme?ref=1").as_deref(),
            Some("/profile/acme")
        );
    }

    #[test]
    fn normalize_keeps_relative_url_unchanged() {
        assert_eq!(
            normalize_profile_href("/profile/acme").as_deref(),
            Some("/profile/acme")
        );
    }

    // Foreign-host links pass through untouched; dedup depends on the raw
    // value staying stable.
    #[test]
    fn normalize_keeps_foreign_absolute_url_unchanged() {
        assert_eq!(
            normalize_profile_href("https://example.org/profile/acme").as_deref(),
            Some("https://example.org/profile/acme")
        );
    }

    #[test]
    fn normalize_rejects_empty_href() {
        assert_eq!(normalize_profile_href(""), None);
    }

    #[test]
    fn website_prefers_labeled_new_tab_link() {
        let doc = card_doc(
            r#"<a href="https://clutch.co/profile/acme">Profile</a>
               <a href="https://acme.example" target="_blank">Visit Website</a>"#,
        );
        let card = first_card(&doc);
        assert_eq!(website(&card).as_deref(), Some("https://acme.example"));
    }

    #[test]
    fn website_falls_back_to_first_off_platform_link() {
        let doc = card_doc(
            r#"<a href="https://clutch.co/profile/acme">Profile</a>
               <a href="https://acme.example/about">About us</a>"#,
        );
        let card = first_card(&doc);
        assert_eq!(
            website(&card).as_deref(),
            Some("https://acme.example/about")
        );
    }

    #[test]
    fn website_none_when_only_platform_links() {
        let doc = card_doc(r#"<a href="https://clutch.co/profile/acme">Profile</a>"#);
        let card = first_card(&doc);
        assert_eq!(website(&card), None);
    }

    #[test]
    fn rating_reads_semantic_attribute_first() {
        let doc = card_doc(
            r#"<span itemprop="ratingValue">4.8</span>
               <div class="rating"><span>1.0</span></div>"#,
        );
        let card = first_card(&doc);
        assert_eq!(rating(&card).as_deref(), Some("4.8"));
    }

    #[test]
    fn rating_falls_back_to_rating_span() {
        let doc = card_doc(r#"<div class="rating"><span class="rating-number">4.2</span></div>"#);
        let card = first_card(&doc);
        assert_eq!(rating(&card).as_deref(), Some("4.2"));
    }

    #[test]
    fn review_count_via_reviews_anchor() {
        let doc = card_doc(r#"<a href="/profile/acme#reviews">12 reviews</a>"#);
        let card = first_card(&doc);
        assert_eq!(review_count(&card).as_deref(), Some("12 reviews"));
    }

    #[test]
    fn review_count_via_text_scan() {
        let doc = card_doc(r#"<span>Based on 3 Reviews</span>"#);
        let card = first_card(&doc);
        assert_eq!(review_count(&card).as_deref(), Some("Based on 3 Reviews"));
    }

    #[test]
    fn hourly_rate_matches_spaced_and_compact_forms() {
        let doc = card_doc(r#"<li>$25 - $49 / hr</li>"#);
        let card = first_card(&doc);
        assert_eq!(hourly_rate(&card).as_deref(), Some("$25 - $49 / hr"));

        let doc = card_doc(r#"<li>$100+/hr</li>"#);
        let card = first_card(&doc);
        assert_eq!(hourly_rate(&card).as_deref(), Some("$100+/hr"));
    }

    #[test]
    fn min_project_size_by_keyword_then_pattern() {
        let doc = card_doc(r#"<li>Min. project size: $10,000+</li>"#);
        let card = first_card(&doc);
        assert_eq!(
            min_project_size(&card).as_deref(),
            Some("Min. project size: $10,000+")
        );

        let doc = card_doc(r#"<span>$5,000+</span>"#);
        let card = first_card(&doc);
        assert_eq!(min_project_size(&card).as_deref(), Some("$5,000+"));
    }

    #[test]
    fn employee_count_by_keyword() {
        let doc = card_doc(r#"<li>10 - 49 Employees</li>"#);
        let card = first_card(&doc);
        assert_eq!(employee_count(&card).as_deref(), Some("10 - 49 Employees"));
    }

    #[test]
    fn location_reads_locality_class_first() {
        let doc = card_doc(r#"<span class="locality">Austin, TX</span>"#);
        let card = first_card(&doc);
        assert_eq!(location(&card).as_deref(), Some("Austin, TX"));
    }

    #[test]
    fn location_heuristic_requires_three_segments() {
        let doc = card_doc(r#"<span>Austin, TX, United States</span>"#);
        let card = first_card(&doc);
        assert_eq!(location(&card).as_deref(), Some("Austin, TX, United States"));

        // Known-incomplete heuristic: two-segment locations are missed.
        let doc = card_doc(r#"<span>Berlin, Germany</span>"#);
        let card = first_card(&doc);
        assert_eq!(location(&card), None);
    }

    #[test]
    fn description_from_class_or_paragraph() {
        let doc = card_doc(r#"<p class="provider-short-description">We build things.</p>"#);
        let card = first_card(&doc);
        assert_eq!(description(&card).as_deref(), Some("We build things."));

        let doc = card_doc(r#"<p>Plain paragraph pitch.</p>"#);
        let card = first_card(&doc);
        assert_eq!(description(&card).as_deref(), Some("Plain paragraph pitch."));
    }

    #[test]
    fn logo_prefers_lazy_source_and_resolves_relative() {
        let doc = card_doc(r#"<img data-src="/img/logo.png" src="/img/placeholder.gif">"#);
        let card = first_card(&doc);
        assert_eq!(
            logo_url(&card, "https://clutch.co/web-developers").as_deref(),
            Some("https://clutch.co/img/logo.png")
        );
    }

    #[test]
    fn logo_empty_lazy_source_falls_back_to_src() {
        let doc = card_doc(r#"<img data-src="" src="https://cdn.example/logo.png">"#);
        let card = first_card(&doc);
        assert_eq!(
            logo_url(&card, "https://clutch.co/web-developers").as_deref(),
            Some("https://cdn.example/logo.png")
        );
    }

    #[test]
    fn logo_none_without_image() {
        let doc = card_doc(r#"<h3>Acme Co</h3>"#);
        let card = first_card(&doc);
        assert_eq!(logo_url(&card, "https://clutch.co/list"), None);
    }

    #[test]
    fn verified_by_badge_class() {
        let doc = card_doc(r#"<span class="verification-badge"></span>"#);
        let card = first_card(&doc);
        assert!(verified(&card));
    }

    #[test]
    fn verified_by_text_mention() {
        let doc = card_doc(r#"<span>Clutch Verified</span>"#);
        let card = first_card(&doc);
        assert!(verified(&card));
    }

    #[test]
    fn verified_defaults_to_false() {
        let doc = card_doc(r#"<h3>Acme Co</h3>"#);
        let card = first_card(&doc);
        assert!(!verified(&card));
    }
}
