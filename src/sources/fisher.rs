//! Fisher Scientific SDS search.
//!
//! `GET {base}/us/en/catalog/search/sds?selectLang=EN&msdsKeyword={cas}`.
//! Fisher falls back to a fuzzy search when nothing matches and says so with
//! an error-message banner; a page carrying that banner is a miss. Otherwise
//! the first catalog item's link is the sheet.

use super::SdsSource;
use super::html::selector;
use super::http::{resolve_href, send_direct};
use crate::error::LookupError;
use crate::types::SdsLink;
use async_trait::async_trait;
use scraper::Html;
use std::time::Duration;

/// Label recorded for sheets found here
pub const FISHER_LABEL: &str = "Fisher";

/// Fisher Scientific adapter
pub struct Fisher {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl Fisher {
    /// Create the adapter against `base_url` (normally `https://www.fishersci.com`)
    pub fn new(client: reqwest::Client, base_url: &str, timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }
}

#[async_trait]
impl SdsSource for Fisher {
    fn name(&self) -> &'static str {
        FISHER_LABEL
    }

    async fn lookup(&self, cas_nr: &str) -> Result<SdsLink, LookupError> {
        let search_url = format!("{}/us/en/catalog/search/sds", self.base_url);
        let request = self
            .client
            .get(&search_url)
            .query(&[("selectLang", "EN"), ("msdsKeyword", cas_nr)])
            .timeout(self.timeout);
        let body = send_direct(request).await?.text().await?;

        let href = first_catalog_href(&body)?.ok_or_else(|| LookupError::NoMatch {
            cas_nr: cas_nr.to_string(),
        })?;

        Ok(SdsLink::new(FISHER_LABEL, resolve_href(&self.base_url, &href)?))
    }
}

/// Link of the first catalog item, `None` on an error banner or an empty listing
fn first_catalog_href(body: &str) -> Result<Option<String>, LookupError> {
    let doc = Html::parse_document(body);

    let error_banner = selector(".errormessage.search_results_error_message")?;
    if doc.select(&error_banner).next().is_some() {
        return Ok(None);
    }

    let items = selector(".catlog_items")?;
    let Some(first_item) = doc.select(&items).next() else {
        return Ok(None);
    };

    let anchors = selector("a")?;
    let anchor = first_item
        .select(&anchors)
        .next()
        .ok_or_else(|| LookupError::structure("catalog item without a link"))?;

    anchor
        .value()
        .attr("href")
        .map(|href| Some(href.to_string()))
        .ok_or_else(|| LookupError::structure("catalog link without href"))
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::build_client;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const RESULTS_PAGE: &str = r#"<html><body>
        <div class="catalog_num">
          <div class="catlog_items">
            <a href="/store/msds?partNumber=AAA1432136&productDescription=ethyl-mercaptoacetate-&vendorId=VN00024248&keyword=true&countryCode=US&language=en">AAA1432136</a>
            <a href="/store/msds?partNumber=AAA1432122">AAA1432122</a>
          </div>
          <div class="catlog_items">
            <a href="/store/msds?partNumber=OTHER">OTHER</a>
          </div>
        </div>
        </body></html>"#;

    const FUZZY_PAGE: &str = r#"<html><body>
        <div class="errormessage search_results_error_message">No results found for 1450-76-6. Showing similar results.</div>
        <div class="catlog_items"><a href="/store/msds?partNumber=WRONG">WRONG</a></div>
        </body></html>"#;

    fn adapter(mock_server: &MockServer) -> Fisher {
        let client = build_client("test-agent", false).unwrap();
        Fisher::new(client, &mock_server.uri(), Duration::from_secs(5))
    }

    #[test]
    fn test_first_catalog_href() {
        assert_eq!(
            first_catalog_href(RESULTS_PAGE).unwrap().as_deref(),
            Some(
                "/store/msds?partNumber=AAA1432136&productDescription=ethyl-mercaptoacetate-&vendorId=VN00024248&keyword=true&countryCode=US&language=en"
            )
        );
    }

    #[test]
    fn test_error_banner_means_no_match() {
        assert_eq!(first_catalog_href(FUZZY_PAGE).unwrap(), None);
    }

    #[test]
    fn test_empty_listing_means_no_match() {
        assert_eq!(first_catalog_href("<html><body></body></html>").unwrap(), None);
    }

    #[tokio::test]
    async fn test_lookup_sends_keyword_and_returns_first_item() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/us/en/catalog/search/sds"))
            .and(query_param("selectLang", "EN"))
            .and(query_param("msdsKeyword", "623-51-8"))
            .respond_with(ResponseTemplate::new(200).set_body_string(RESULTS_PAGE))
            .expect(1)
            .mount(&mock_server)
            .await;

        let link = adapter(&mock_server).find("623-51-8").await.unwrap();
        assert_eq!(link.source, "Fisher");
        assert_eq!(
            link.url,
            format!(
                "{}/store/msds?partNumber=AAA1432136&productDescription=ethyl-mercaptoacetate-&vendorId=VN00024248&keyword=true&countryCode=US&language=en",
                mock_server.uri()
            )
        );
    }

    #[tokio::test]
    async fn test_lookup_with_fuzzy_results_is_not_found() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/us/en/catalog/search/sds"))
            .respond_with(ResponseTemplate::new(200).set_body_string(FUZZY_PAGE))
            .mount(&mock_server)
            .await;

        assert!(adapter(&mock_server).find("1450-76-6").await.is_none());
    }

    #[tokio::test]
    async fn test_lookup_rejects_redirect() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/us/en/catalog/search/sds"))
            .respond_with(
                ResponseTemplate::new(302).insert_header("Location", "/us/en/home.html"),
            )
            .mount(&mock_server)
            .await;

        assert!(adapter(&mock_server).find("623-51-8").await.is_none());
    }

    #[tokio::test]
    async fn test_lookup_connection_refused_is_not_found() {
        let client = build_client("test-agent", false).unwrap();
        let fisher = Fisher::new(client, "http://127.0.0.1:1", Duration::from_secs(1));
        assert!(fisher.find("623-51-8").await.is_none());
    }
}
