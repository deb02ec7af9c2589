//! ChemBlink: one MSDS listing page per CAS number.
//!
//! `GET {base}/MSDS/{cas}_MSDS.htm` lists sheets contributed by several
//! vendors. The first "View / download" link wins, and the vendor label is
//! taken from its file name (`/MSDS/MSDSFiles/64-19-7_Alfa-Aesar.pdf` is
//! labelled `Alfa-Aesar`).

use super::SdsSource;
use super::html::{selector, text_of};
use super::http::{resolve_href, send_direct};
use crate::error::LookupError;
use crate::types::SdsLink;
use async_trait::async_trait;
use regex::Regex;
use scraper::Html;
use std::sync::LazyLock;
use std::time::Duration;

/// Visible text of the download anchor
const DOWNLOAD_LINK_TEXT: &str = "View / download";

#[allow(clippy::expect_used)]
static LABEL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+_(\S*)\.pdf").expect("label pattern is valid"));

/// ChemBlink adapter
pub struct ChemBlink {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl ChemBlink {
    /// Create the adapter against `base_url` (normally `https://www.chemblink.com`)
    pub fn new(client: reqwest::Client, base_url: &str, timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }
}

#[async_trait]
impl SdsSource for ChemBlink {
    fn name(&self) -> &'static str {
        "ChemBlink"
    }

    async fn lookup(&self, cas_nr: &str) -> Result<SdsLink, LookupError> {
        let page_url = format!("{}/MSDS/{}_MSDS.htm", self.base_url, cas_nr);
        let response = send_direct(self.client.get(&page_url).timeout(self.timeout)).await?;
        let body = response.text().await?;

        let href = find_download_href(&body)?.ok_or_else(|| LookupError::NoMatch {
            cas_nr: cas_nr.to_string(),
        })?;
        let source = label_from_link(&href)
            .ok_or_else(|| LookupError::structure(format!("no vendor label in link {href}")))?;

        Ok(SdsLink::new(source, resolve_href(&self.base_url, &href)?))
    }
}

/// `href` of the first anchor whose text contains "View / download"
fn find_download_href(body: &str) -> Result<Option<String>, LookupError> {
    let doc = Html::parse_document(body);
    let anchors = selector("a")?;

    Ok(doc
        .select(&anchors)
        .find(|a| text_of(a).contains(DOWNLOAD_LINK_TEXT))
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string))
}

/// Vendor label embedded in a sheet link, `<cas>_<Label>.pdf` → `Label`
pub fn label_from_link(link: &str) -> Option<String> {
    LABEL_PATTERN
        .captures(link)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
