//! TCI Chemicals, the source of last resort.
//!
//! TCI does not serve its sheets from a stable URL: the document endpoint only
//! answers inside a session that has first visited the product page. Each
//! fetch therefore runs on its own cookie-carrying client and returns the PDF
//! bytes instead of a link.
//!
//! The search result page lists hits as a `table.comp-tbl` of properties
//! followed by an order form; the first hit's form is `form#cart1_0` and holds
//! the product code in `input#commodityCode`. The CAS number shown in the table
//! must equal the query before the code is trusted.

use super::DirectSdsSource;
use super::html::{selector, text_of};
use super::http::{build_client, send_direct};
use crate::config::SourcesConfig;
use crate::error::LookupError;
use crate::types::SdsDocument;
use async_trait::async_trait;
use scraper::{ElementRef, Html};
use std::time::Duration;

/// Label recorded for sheets fetched here
pub const TCI_LABEL: &str = "TCI";

/// TCI adapter
pub struct Tci {
    user_agent: String,
    base_url: String,
    search_timeout: Duration,
    document_timeout: Duration,
}

impl Tci {
    /// Create the adapter against `base_url` (normally `https://www.tcichemicals.com`)
    pub fn new(
        user_agent: &str,
        base_url: &str,
        search_timeout: Duration,
        document_timeout: Duration,
    ) -> Self {
        Self {
            user_agent: user_agent.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            search_timeout,
            document_timeout,
        }
    }

    /// Create the adapter from the sources section of the configuration
    pub fn from_config(config: &SourcesConfig) -> Self {
        Self::new(
            &config.tci_user_agent,
            &config.tci_url,
            config.tci_search_timeout,
            config.tci_document_timeout,
        )
    }
}

#[async_trait]
impl DirectSdsSource for Tci {
    fn name(&self) -> &'static str {
        TCI_LABEL
    }

    async fn fetch(&self, cas_nr: &str) -> Result<SdsDocument, LookupError> {
        let session = build_client(&self.user_agent, true)?;

        let search_url = format!("{}/eshop/en/us/catalog/list/search", self.base_url);
        let request = session
            .get(&search_url)
            .query(&[("searchCasNo", cas_nr), ("mode", "1")])
            .timeout(self.search_timeout);
        let body = send_direct(request).await?.text().await?;

        let code = parse_commodity_code(&body, cas_nr)?;

        // The document endpoint refuses sessions that skipped the product page
        let product_url = format!("{}/eshop/en/us/commodity/{}/", self.base_url, code);
        send_direct(session.get(&product_url).timeout(self.document_timeout)).await?;

        let document_url = format!(
            "{}/eshop/en/us/catalog/detail/msds/en/{}/",
            self.base_url, code
        );
        let bytes = send_direct(session.get(&document_url).timeout(self.document_timeout))
            .await?
            .bytes()
            .await?;

        Ok(SdsDocument {
            source: TCI_LABEL.to_string(),
            bytes: bytes.to_vec(),
        })
    }
}

/// Product code of the first search hit, checked against `cas_nr`
fn parse_commodity_code(body: &str, cas_nr: &str) -> Result<String, LookupError> {
    let doc = Html::parse_document(body);
    let no_match = || LookupError::NoMatch {
        cas_nr: cas_nr.to_string(),
    };

    let hit_count = doc
        .select(&selector(".search-sum")?)
        .next()
        .map(|e| text_of(&e))
        .unwrap_or_default();
    if hit_count.is_empty() {
        return Err(no_match());
    }

    let form = doc
        .select(&selector("form#cart1_0")?)
        .next()
        .ok_or_else(no_match)?;

    let info_table = selector("table.comp-tbl")?;
    let table = form
        .prev_siblings()
        .filter_map(ElementRef::wrap)
        .find(|e| info_table.matches(e))
        .ok_or_else(|| LookupError::structure("first hit has no property table"))?;

    let found_cas = listed_cas(&table)?
        .ok_or_else(|| LookupError::structure("property table has no CAS RN row"))?;
    if found_cas != cas_nr {
        return Err(LookupError::CasMismatch {
            expected: cas_nr.to_string(),
            found: found_cas,
        });
    }

    let code = form
        .select(&selector("input#commodityCode")?)
        .next()
        .and_then(|input| input.value().attr("value"))
        .map(str::trim)
        .unwrap_or_default();
    if code.is_empty() {
        return Err(LookupError::structure("order form has no commodity code"));
    }
    Ok(code.to_string())
}

/// Value next to the "CAS RN" label of a property table
fn listed_cas(table: &ElementRef<'_>) -> Result<Option<String>, LookupError> {
    let spans = selector("span")?;

    let Some(label) = table.select(&spans).find(|s| text_of(s) == "CAS RN") else {
        return Ok(None);
    };

    Ok(label
        .parent()
        .and_then(ElementRef::wrap)
        .and_then(|header| header.next_siblings().find_map(ElementRef::wrap))
        .and_then(|cell| cell.select(&spans).next())
        .map(|value| text_of(&value)))
}
