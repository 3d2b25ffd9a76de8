//! HTML parsing for scraped pages and search result pages.

use scraper::{Html, Selector};
use url::Url;

use crate::ports::PageContent;

/// Query parameter search engines use to wrap the real result URL.
const REDIRECT_TARGET_PARAM: &str = "uddg";

fn selector(css: &str) -> Selector {
    // Selectors are compile-time literals.
    Selector::parse(css).expect("static CSS selector is valid")
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn element_texts(document: &Html, css: &str) -> Vec<String> {
    document
        .select(&selector(css))
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .filter(|text| !text.is_empty())
        .collect()
}

/// Resolves `href` against `base`, keeping only http(s) targets.
fn absolute_link(base: &Url, href: &str) -> Option<Url> {
    let resolved = base.join(href.trim()).ok()?;
    match resolved.scheme() {
        "http" | "https" => Some(resolved),
        _ => None,
    }
}

/// Extracts title, headings, paragraphs, and absolute links from a page.
pub fn extract_page(html: &str, base: &Url) -> PageContent {
    let document = Html::parse_document(html);

    let page_title = element_texts(&document, "title").into_iter().next();
    let headings = element_texts(&document, "h1, h2, h3");
    let paragraphs = element_texts(&document, "p");

    let mut links: Vec<String> = Vec::new();
    for anchor in document.select(&selector("a[href]")) {
        if let Some(link) = anchor
            .value()
            .attr("href")
            .and_then(|href| absolute_link(base, href))
        {
            let link = link.to_string();
            if !links.contains(&link) {
                links.push(link);
            }
        }
    }

    PageContent {
        page_title,
        headings,
        paragraphs,
        links,
    }
}

/// Extracts outbound result links from a search result page.
///
/// Links back to the search engine itself are dropped unless they wrap a
/// redirect target, which is unwrapped.
pub fn extract_search_results(html: &str, search_base: &Url, max_links: usize) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut results: Vec<String> = Vec::new();

    for anchor in document.select(&selector("a[href]")) {
        if results.len() >= max_links {
            break;
        }
        let Some(link) = anchor
            .value()
            .attr("href")
            .and_then(|href| absolute_link(search_base, href))
        else {
            continue;
        };

        let target = if link.host_str() == search_base.host_str() {
            match unwrap_redirect(&link) {
                Some(target) => target,
                None => continue,
            }
        } else {
            link
        };

        let target = target.to_string();
        if !results.contains(&target) {
            results.push(target);
        }
    }

    results
}

fn unwrap_redirect(link: &Url) -> Option<Url> {
    link.query_pairs()
        .find(|(key, _)| key == REDIRECT_TARGET_PARAM)
        .and_then(|(_, value)| Url::parse(&value).ok())
        .filter(|url| matches!(url.scheme(), "http" | "https"))
}
