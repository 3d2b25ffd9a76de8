//! reqwest-backed `ContentScraper`.

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use super::html_extract::{extract_page, extract_search_results};
use crate::ports::{ContentScraper, PageContent, ScrapeError};

pub const DEFAULT_SEARCH_URL: &str = "https://html.duckduckgo.com/html/";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; OdinCrawler/0.1)";

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Search endpoint; the keyword is sent as the `q` query parameter.
    pub search_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    /// Upper bound on links returned by one search.
    pub max_links: usize,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            search_url: DEFAULT_SEARCH_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(15),
            max_links: 50,
        }
    }
}

pub struct HttpContentScraper {
    config: ScraperConfig,
    http_client: reqwest::Client,
}

impl HttpContentScraper {
    pub fn new(config: ScraperConfig) -> Result<Self, ScrapeError> {
        let http_client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()
            .map_err(|e| ScrapeError::Fetch(e.to_string()))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    async fn fetch(&self, url: Url) -> Result<(Url, String), ScrapeError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| ScrapeError::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status(status.as_u16()));
        }

        // Relative links resolve against the final URL after redirects.
        let final_url = response.url().clone();
        let body = response
            .text()
            .await
            .map_err(|e| ScrapeError::Fetch(e.to_string()))?;
        Ok((final_url, body))
    }
}

/// Parses `raw` and rejects anything that is not http(s).
pub fn parse_http_url(raw: &str) -> Result<Url, ScrapeError> {
    let url = Url::parse(raw.trim()).map_err(|e| ScrapeError::InvalidUrl(e.to_string()))?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url),
        scheme => Err(ScrapeError::InvalidUrl(format!(
            "unsupported scheme: {}",
            scheme
        ))),
    }
}

#[async_trait]
impl ContentScraper for HttpContentScraper {
    async fn scrape_page(&self, url: &str) -> Result<PageContent, ScrapeError> {
        let url = parse_http_url(url)?;
        let (final_url, body) = self.fetch(url).await?;
        let page = extract_page(&body, &final_url);

        tracing::debug!(
            url = %final_url,
            headings = page.headings.len(),
            paragraphs = page.paragraphs.len(),
            links = page.links.len(),
            "page scraped"
        );
        Ok(page)
    }

    async fn search(&self, keyword: &str) -> Result<Vec<String>, ScrapeError> {
        let mut url = parse_http_url(&self.config.search_url)?;
        url.query_pairs_mut().append_pair("q", keyword);

        let (final_url, body) = self.fetch(url).await?;
        let links = extract_search_results(&body, &final_url, self.config.max_links);

        tracing::debug!(keyword, results = links.len(), "search completed");
        Ok(links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn scraper_for(server: &MockServer) -> HttpContentScraper {
        HttpContentScraper::new(ScraperConfig {
            search_url: format!("{}/html/", server.uri()),
            max_links: 2,
            ..ScraperConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn rejects_non_http_urls() {
        assert!(matches!(
            parse_http_url("ftp://example.com/file"),
            Err(ScrapeError::InvalidUrl(_))
        ));
        assert!(matches!(
            parse_http_url("not a url"),
            Err(ScrapeError::InvalidUrl(_))
        ));
        assert!(parse_http_url(" https://example.com ").is_ok());
    }

    #[tokio::test]
    async fn scrape_page_extracts_content() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/article"))
            .and(header("user-agent", DEFAULT_USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "<html><head><title>Article</title></head>\
                 <body><h1>Heading</h1><p>Body text</p><a href=\"/next\">n</a></body></html>",
            ))
            .mount(&server)
            .await;

        let page = scraper_for(&server)
            .scrape_page(&format!("{}/article", server.uri()))
            .await
            .unwrap();

        assert_eq!(page.page_title.as_deref(), Some("Article"));
        assert_eq!(page.headings, vec!["Heading"]);
        assert_eq!(page.links, vec![format!("{}/next", server.uri())]);
    }

    #[tokio::test]
    async fn scrape_page_reports_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = scraper_for(&server)
            .scrape_page(&format!("{}/down", server.uri()))
            .await
            .unwrap_err();

        assert!(matches!(err, ScrapeError::Status(503)));
    }

    #[tokio::test]
    async fn search_sends_keyword_and_caps_links() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/html/"))
            .and(query_param("q", "rust crawler"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<a href="https://a.example/">a</a>
                   <a href="https://b.example/">b</a>
                   <a href="https://c.example/">c</a>"#,
            ))
            .mount(&server)
            .await;

        let links = scraper_for(&server).search("rust crawler").await.unwrap();

        assert_eq!(links, vec!["https://a.example/", "https://b.example/"]);
    }
}
