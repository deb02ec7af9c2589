//! Fluorochem product search.
//!
//! The search endpoint takes a JSON body and answers with an HTML fragment.
//! A fragment with result cells carries the product code on its detail link
//! (`<a class="textLink prodDetailLink" prodcode="...">`); the sheet itself is
//! served by a separate document service keyed by that code.

use super::SdsSource;
use super::html::selector;
use super::http::send_direct;
use crate::error::LookupError;
use crate::types::SdsLink;
use async_trait::async_trait;
use scraper::Html;
use serde::Serialize;
use std::time::Duration;

/// Label recorded for sheets found here
pub const FLUOROCHEM_LABEL: &str = "Fluorochem";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    lst_search_type: &'static str,
    txt_search_text: &'a str,
    show_prices: &'static str,
    show_structures: &'static str,
    group_filters: Vec<String>,
}

impl<'a> SearchRequest<'a> {
    fn by_cas(cas_nr: &'a str) -> Self {
        Self {
            lst_search_type: "C",
            txt_search_text: cas_nr,
            show_prices: "false",
            show_structures: "false",
            group_filters: Vec::new(),
        }
    }
}

/// Fluorochem adapter
pub struct Fluorochem {
    client: reqwest::Client,
    search_url: String,
    sds_template: String,
    timeout: Duration,
}

impl Fluorochem {
    /// Create the adapter.
    ///
    /// `sds_template` is the document URL with `{}` standing for the product code.
    pub fn new(
        client: reqwest::Client,
        base_url: &str,
        sds_template: &str,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            search_url: format!("{}/Products/Search", base_url.trim_end_matches('/')),
            sds_template: sds_template.to_string(),
            timeout,
        }
    }

    fn sds_url(&self, product_code: &str) -> String {
        self.sds_template
            .replacen("{}", &urlencoding::encode(product_code), 1)
    }
}

#[async_trait]
impl SdsSource for Fluorochem {
    fn name(&self) -> &'static str {
        FLUOROCHEM_LABEL
    }

    async fn lookup(&self, cas_nr: &str) -> Result<SdsLink, LookupError> {
        let request = self
            .client
            .post(&self.search_url)
            .json(&SearchRequest::by_cas(cas_nr))
            .timeout(self.timeout);
        let body = send_direct(request).await?.text().await?;

        let code = parse_product_code(&body)?.ok_or_else(|| LookupError::NoMatch {
            cas_nr: cas_nr.to_string(),
        })?;

        Ok(SdsLink::new(FLUOROCHEM_LABEL, self.sds_url(&code)))
    }
}

/// Product code of the first hit, `None` when the result table is empty
fn parse_product_code(body: &str) -> Result<Option<String>, LookupError> {
    // Rows outside a table are dropped by the HTML parser
    let doc = if body.contains("<table") {
        Html::parse_fragment(body)
    } else {
        Html::parse_fragment(&format!("<table>{body}</table>"))
    };

    if doc.select(&selector("td")?).next().is_none() {
        return Ok(None);
    }

    let link = doc
        .select(&selector(".textLink.prodDetailLink")?)
        .next()
        .ok_or_else(|| LookupError::structure("result rows without a product link"))?;

    match link.value().attr("prodcode").map(str::trim) {
        Some(code) if !code.is_empty() => Ok(Some(code.to_string())),
        _ => Err(LookupError::structure("product link without prodcode")),
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourcesConfig;
    use crate::sources::build_client;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const RESULTS_FRAGMENT: &str = r#"<table>
        <tr>
          <td><a class="textLink prodDetailLink" prodcode="F093422" href="/p/F093422">F093422</a></td>
          <td>Ethyl thioglycolate</td>
          <td>623-51-8</td>
        </tr>
        <tr>
          <td><a class="textLink prodDetailLink" prodcode="F999999" href="/p/F999999">F999999</a></td>
        </tr>
        </table>"#;

    fn adapter(mock_server: &MockServer) -> Fluorochem {
        let client = build_client("test-agent", false).unwrap();
        let sources = SourcesConfig::with_base_url(&mock_server.uri());
        Fluorochem::new(
            client,
            &sources.fluorochem_url,
            &sources.fluorochem_sds_template,
            Duration::from_secs(5),
        )
    }

    #[test]
    fn test_parse_product_code_takes_first_link() {
        assert_eq!(
            parse_product_code(RESULTS_FRAGMENT).unwrap().as_deref(),
            Some("F093422")
        );
    }

    #[test]
    fn test_parse_product_code_from_bare_rows() {
        let rows = r#"<tr>
          <td><a class="textLink prodDetailLink" prodcode="F093422" href="/p/F093422">F093422</a></td>
          <td>623-51-8</td>
        </tr>"#;
        assert_eq!(parse_product_code(rows).unwrap().as_deref(), Some("F093422"));
    }

    #[test]
    fn test_parse_product_code_without_cells() {
        assert_eq!(parse_product_code("<div>No products found</div>").unwrap(), None);
        assert_eq!(parse_product_code("").unwrap(), None);
    }

    #[test]
    fn test_parse_product_code_cells_without_link_is_an_error() {
        let err = parse_product_code("<table><tr><td>odd</td></tr></table>").unwrap_err();
        assert!(matches!(err, LookupError::Structure(_)));
    }

    #[test]
    fn test_sds_url_uses_default_template() {
        let client = build_client("test-agent", false).unwrap();
        let sources = SourcesConfig::default();
        let fluorochem = Fluorochem::new(
            client,
            &sources.fluorochem_url,
            &sources.fluorochem_sds_template,
            sources.fluorochem_timeout,
        );
        assert_eq!(
            fluorochem.sds_url("F093422"),
            "https://www.cheminfo.org/webservices/msds?brand=fluorochem&catalog=F093422&embed=true"
        );
    }

    #[tokio::test]
    async fn test_lookup_posts_search_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/Products/Search"))
            .and(body_json(json!({
                "lstSearchType": "C",
                "txtSearchText": "623-51-8",
                "showPrices": "false",
                "showStructures": "false",
                "groupFilters": []
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string(RESULTS_FRAGMENT))
            .expect(1)
            .mount(&mock_server)
            .await;

        let link = adapter(&mock_server).find("623-51-8").await.unwrap();
        assert_eq!(link.source, "Fluorochem");
        assert_eq!(
            link.url,
            format!(
                "{}/webservices/msds?brand=fluorochem&catalog=F093422&embed=true",
                mock_server.uri()
            )
        );
    }

    #[tokio::test]
    async fn test_lookup_empty_result_is_not_found() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/Products/Search"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<p>0 results</p>"))
            .mount(&mock_server)
            .await;

        let adapter = adapter(&mock_server);
        assert!(matches!(
            adapter.lookup("00000-00-0").await,
            Err(LookupError::NoMatch { .. })
        ));
        assert!(adapter.find("00000-00-0").await.is_none());
    }

    #[tokio::test]
    async fn test_lookup_server_error_is_not_found() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string(RESULTS_FRAGMENT))
            .mount(&mock_server)
            .await;

        assert!(adapter(&mock_server).find("623-51-8").await.is_none());
    }
}
