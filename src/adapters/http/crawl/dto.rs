//! Request and response DTOs for the crawl endpoint.

use serde::{Deserialize, Serialize};

use crate::application::handlers::crawl::{CrawlData, CrawlResult};
use crate::domain::foundation::UserId;
use crate::ports::PageContent;

/// Body of `POST /api/crawl`. Keyword wins when both are given.
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlRequest {
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CrawlResponse {
    pub status: &'static str,
    pub title: String,
    #[serde(flatten)]
    pub data: CrawlPayload,
}

/// Extracted data, flattened into the response body.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CrawlPayload {
    Links { links: Vec<String> },
    Page(PageContent),
}

impl From<CrawlResult> for CrawlResponse {
    fn from(result: CrawlResult) -> Self {
        let data = match result.data {
            CrawlData::Links(links) => CrawlPayload::Links { links },
            CrawlData::Page(page) => CrawlPayload::Page(page),
        };
        Self {
            status: "success",
            title: result.title,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keyword_results_flatten_links() {
        let response = CrawlResponse::from(CrawlResult {
            title: "Results for keyword: rust".into(),
            data: CrawlData::Links(vec!["https://a.example".into()]),
        });

        assert_eq!(
            serde_json::to_value(response).unwrap(),
            json!({
                "status": "success",
                "title": "Results for keyword: rust",
                "links": ["https://a.example"]
            })
        );
    }

    #[test]
    fn page_results_flatten_content() {
        let response = CrawlResponse::from(CrawlResult {
            title: "Results for URL: https://a.example".into(),
            data: CrawlData::Page(PageContent {
                page_title: Some("A".into()),
                headings: vec!["H".into()],
                paragraphs: vec![],
                links: vec![],
            }),
        });

        let value = serde_json::to_value(response).unwrap();
        assert_eq!(value["page_title"], "A");
        assert_eq!(value["headings"], json!(["H"]));
        assert_eq!(value["status"], "success");
    }
}
