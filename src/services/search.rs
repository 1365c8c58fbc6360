//! Book search service.
//!
//! Fetches one search result page and turns it into book records.

use reqwest::Client;

use crate::error::Result;
use crate::models::{BookRecord, Config, EndpointConfig};
use crate::services::extractor::RecordExtractor;
use crate::services::scrape::{HtmlPageScraper, PageScraper};
use crate::utils::http::fetch_page;

/// Service for searching the catalog.
pub struct BookSearcher {
    client: Client,
    endpoints: EndpointConfig,
    scraper: Box<dyn PageScraper>,
    extractor: RecordExtractor,
}

impl BookSearcher {
    /// Create a searcher using the configured endpoints and selectors.
    pub fn new(client: Client, config: &Config) -> Result<Self> {
        let scraper = HtmlPageScraper::new(&config.selectors)?;
        Ok(Self::with_scraper(
            client,
            config.endpoints.clone(),
            Box::new(scraper),
            RecordExtractor::new(&config.selectors.record_path_prefix),
        ))
    }

    /// Create a searcher with a custom page scraper.
    pub fn with_scraper(
        client: Client,
        endpoints: EndpointConfig,
        scraper: Box<dyn PageScraper>,
        extractor: RecordExtractor,
    ) -> Self {
        Self {
            client,
            endpoints,
            scraper,
            extractor,
        }
    }

    /// Search for books matching `query`.
    ///
    /// Records are returned in page order. No matches is an empty list,
    /// not an error.
    pub async fn search(&self, query: &str) -> Result<Vec<BookRecord>> {
        let url = self.endpoints.search_url(query)?;
        log::info!("Visiting URL {}", url);

        let (base, html) = fetch_page(&self.client, url).await?;
        let fragments = self.scraper.scrape(&html)?;
        log::debug!("Found {} result fragments", fragments.len());

        let mut books = Vec::with_capacity(fragments.len());
        for fragment in fragments {
            let href = fragment.href.clone();
            match self.extractor.extract(fragment, &base) {
                Some(book) => books.push(book),
                None => log::debug!("Skipping result without identifier: {:?}", href),
            }
        }

        log::debug!("Extracted {} books for {:?}", books.len(), query);
        Ok(books)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::services::scrape::RawFragment;
    use crate::services::scrape::tests::{page, result_block};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn searcher(server: &MockServer) -> BookSearcher {
        let config = Config {
            endpoints: EndpointConfig::with_base_url(server.uri()),
            ..Config::default()
        };
        BookSearcher::new(Client::new(), &config).unwrap()
    }

    #[tokio::test]
    async fn test_search_dedupes_cover_and_title_links() {
        let server = MockServer::start().await;
        let html = page(&[result_block(
            "0123456789abcdef",
            "Dune",
            "✅ English [en] · EPUB · 0.7MB · 2015",
        )]);

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "dune"))
            .respond_with(ResponseTemplate::new(200).set_body_string(html))
            .mount(&server)
            .await;

        let books = searcher(&server).search("dune").await.unwrap();

        assert_eq!(books.len(), 1);
        let book = &books[0];
        assert_eq!(book.title, "Dune");
        assert_eq!(book.authors, "Frank Herbert");
        assert_eq!(book.publisher, "Ace Books, 1990");
        assert_eq!(book.language, "English");
        assert_eq!(book.format, "EPUB");
        assert_eq!(book.size, "0.7MB");
        assert_eq!(book.hash, "0123456789abcdef");
        assert_eq!(book.url, format!("{}/md5/0123456789abcdef", server.uri()));
    }

    #[tokio::test]
    async fn test_search_encodes_query_and_keeps_order() {
        let server = MockServer::start().await;
        let html = page(&[
            result_block("aaa", "Dune Messiah", "English [en] · PDF · 3.1MB"),
            result_block("bbb", "Children of Dune", "English [en] · Hindi [hi] · MOBI · 900KB"),
        ]);

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "dune & sequels"))
            .respond_with(ResponseTemplate::new(200).set_body_string(html))
            .mount(&server)
            .await;

        let books = searcher(&server).search("dune & sequels").await.unwrap();

        let titles: Vec<&str> = books.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Dune Messiah", "Children of Dune"]);
        assert_eq!(books[1].format, "MOBI");
        assert_eq!(books[1].size, "900KB");
    }

    #[tokio::test]
    async fn test_search_without_matches_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string(page(&[])))
            .mount(&server)
            .await;

        let books = searcher(&server).search("nothing").await.unwrap();
        assert!(books.is_empty());
    }

    #[tokio::test]
    async fn test_search_propagates_fetch_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let result = searcher(&server).search("dune").await;
        assert!(matches!(result, Err(AppError::Fetch(_))));
    }

    struct FixedScraper(Vec<RawFragment>);

    impl PageScraper for FixedScraper {
        fn scrape(&self, _html: &str) -> Result<Vec<RawFragment>> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_search_with_custom_scraper_skips_unresolvable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let scraper = FixedScraper(vec![
            RawFragment {
                href: "/md5/keep".to_string(),
                title: " Kept ".to_string(),
                ..RawFragment::default()
            },
            RawFragment {
                href: "/elsewhere".to_string(),
                title: "Dropped".to_string(),
                ..RawFragment::default()
            },
        ]);
        let searcher = BookSearcher::with_scraper(
            Client::new(),
            EndpointConfig::with_base_url(server.uri()),
            Box::new(scraper),
            RecordExtractor::new("/md5/"),
        );

        let books = searcher.search("anything").await.unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].title, "Kept");
        assert_eq!(books[0].hash, "keep");
    }
}
