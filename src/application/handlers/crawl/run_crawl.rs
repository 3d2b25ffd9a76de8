//! CrawlHandler - the protected scraping action.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::subscription::{SubscriptionError, TrialPolicy};
use crate::ports::{ContentScraper, PageContent, ScrapeError, SubscriptionRepository};

use crate::application::handlers::subscription::{AuthorizeActionCommand, AuthorizeActionHandler};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlTarget {
    Keyword(String),
    Url(String),
}

impl CrawlTarget {
    /// Picks the first non-blank of keyword and url, keyword first.
    pub fn from_inputs(keyword: Option<&str>, url: Option<&str>) -> Option<Self> {
        let non_blank = |s: Option<&str>| s.map(str::trim).filter(|s| !s.is_empty()).map(String::from);
        non_blank(keyword)
            .map(CrawlTarget::Keyword)
            .or_else(|| non_blank(url).map(CrawlTarget::Url))
    }
}

#[derive(Debug, Clone)]
pub struct CrawlCommand {
    pub user_id: UserId,
    pub target: CrawlTarget,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlData {
    Links(Vec<String>),
    Page(PageContent),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlResult {
    pub title: String,
    pub data: CrawlData,
}

pub struct CrawlHandler {
    authorizer: AuthorizeActionHandler,
    scraper: Arc<dyn ContentScraper>,
}

impl CrawlHandler {
    pub fn new(
        repository: Arc<dyn SubscriptionRepository>,
        scraper: Arc<dyn ContentScraper>,
        policy: TrialPolicy,
    ) -> Self {
        Self {
            authorizer: AuthorizeActionHandler::new(repository, policy),
            scraper,
        }
    }

    pub async fn handle(&self, cmd: CrawlCommand) -> Result<CrawlResult, SubscriptionError> {
        let action = self
            .authorizer
            .handle(AuthorizeActionCommand { user_id: cmd.user_id })
            .await?;

        match cmd.target {
            CrawlTarget::Keyword(keyword) => {
                let links = self.scraper.search(&keyword).await.map_err(scrape_error)?;
                let links = action.cap(links);
                tracing::debug!(user_id = %cmd.user_id, count = links.len(), "search completed");
                Ok(CrawlResult {
                    title: format!("Results for keyword: {}", keyword),
                    data: CrawlData::Links(links),
                })
            }
            CrawlTarget::Url(url) => {
                let page = self.scraper.scrape_page(&url).await.map_err(scrape_error)?;
                if page.is_empty() {
                    return Err(SubscriptionError::invalid_input("url", "No data extracted."));
                }
                Ok(CrawlResult {
                    title: format!("Results for URL: {}", url),
                    data: CrawlData::Page(page),
                })
            }
        }
    }
}

fn scrape_error(err: ScrapeError) -> SubscriptionError {
    tracing::warn!(error = %err, "scrape failed");
    match err {
        ScrapeError::InvalidUrl(_) => SubscriptionError::invalid_input("url", err.to_string()),
        _ => SubscriptionError::upstream(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemorySubscriptionRepository;
    use crate::domain::foundation::Timestamp;
    use crate::domain::subscription::{AccessDeniedReason, SubscriptionRecord};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct MockScraper {
        links: Vec<String>,
        page: PageContent,
        calls: Mutex<usize>,
    }

    impl MockScraper {
        fn with_links(n: usize) -> Self {
            Self {
                links: (0..n).map(|i| format!("https://site{}.example", i)).collect(),
                page: PageContent::default(),
                calls: Mutex::new(0),
            }
        }

        fn with_page(page: PageContent) -> Self {
            Self {
                links: vec![],
                page,
                calls: Mutex::new(0),
            }
        }
    }

    #[async_trait]
    impl ContentScraper for MockScraper {
        async fn scrape_page(&self, url: &str) -> Result<PageContent, ScrapeError> {
            *self.calls.lock().unwrap() += 1;
            if !url.starts_with("http") {
                return Err(ScrapeError::InvalidUrl(url.to_string()));
            }
            Ok(self.page.clone())
        }

        async fn search(&self, _keyword: &str) -> Result<Vec<String>, ScrapeError> {
            *self.calls.lock().unwrap() += 1;
            Ok(self.links.clone())
        }
    }

    fn keyword(user: i64, k: &str) -> CrawlCommand {
        CrawlCommand {
            user_id: UserId::new(user),
            target: CrawlTarget::Keyword(k.into()),
        }
    }

    #[test]
    fn target_prefers_keyword_and_skips_blanks() {
        assert_eq!(
            CrawlTarget::from_inputs(Some(" rust "), Some("https://x")),
            Some(CrawlTarget::Keyword("rust".into()))
        );
        assert_eq!(
            CrawlTarget::from_inputs(Some("  "), Some("https://x")),
            Some(CrawlTarget::Url("https://x".into()))
        );
        assert_eq!(CrawlTarget::from_inputs(None, Some("")), None);
    }

    #[tokio::test]
    async fn trial_search_is_capped_at_twenty() {
        let repo = Arc::new(InMemorySubscriptionRepository::new());
        let handler = CrawlHandler::new(repo, Arc::new(MockScraper::with_links(45)), TrialPolicy::default());

        let result = handler.handle(keyword(1, "rust")).await.unwrap();

        assert_eq!(result.title, "Results for keyword: rust");
        match result.data {
            CrawlData::Links(links) => assert_eq!(links.len(), 20),
            other => panic!("expected links, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn expired_user_is_denied_before_scraping() {
        let repo = Arc::new(InMemorySubscriptionRepository::new());
        repo.seed(SubscriptionRecord::start_trial(
            UserId::new(2),
            Timestamp::now().minus_days(9),
            3,
        ))
        .await;
        let scraper = Arc::new(MockScraper::with_links(5));
        let handler = CrawlHandler::new(repo, scraper.clone(), TrialPolicy::default());

        let err = handler.handle(keyword(2, "rust")).await.unwrap_err();

        assert_eq!(err, SubscriptionError::AccessDenied(AccessDeniedReason::TrialExpired));
        assert_eq!(*scraper.calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn url_crawl_returns_page() {
        let page = PageContent {
            page_title: Some("Example".into()),
            paragraphs: vec!["hello".into()],
            ..Default::default()
        };
        let repo = Arc::new(InMemorySubscriptionRepository::new());
        let handler = CrawlHandler::new(repo, Arc::new(MockScraper::with_page(page.clone())), TrialPolicy::default());

        let result = handler
            .handle(CrawlCommand {
                user_id: UserId::new(3),
                target: CrawlTarget::Url("https://example.com".into()),
            })
            .await
            .unwrap();

        assert_eq!(result.title, "Results for URL: https://example.com");
        assert_eq!(result.data, CrawlData::Page(page));
    }

    #[tokio::test]
    async fn empty_page_is_no_data() {
        let repo = Arc::new(InMemorySubscriptionRepository::new());
        let handler = CrawlHandler::new(
            repo,
            Arc::new(MockScraper::with_page(PageContent::default())),
            TrialPolicy::default(),
        );

        let err = handler
            .handle(CrawlCommand {
                user_id: UserId::new(4),
                target: CrawlTarget::Url("https://empty.example".into()),
            })
            .await
            .unwrap_err();

        assert_eq!(err.message(), "No data extracted.");
    }

    #[tokio::test]
    async fn invalid_url_is_invalid_input() {
        let repo = Arc::new(InMemorySubscriptionRepository::new());
        let handler = CrawlHandler::new(repo, Arc::new(MockScraper::with_links(0)), TrialPolicy::default());

        let err = handler
            .handle(CrawlCommand {
                user_id: UserId::new(5),
                target: CrawlTarget::Url("ftp://nope".into()),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, SubscriptionError::InvalidInput { .. }));
    }
}
