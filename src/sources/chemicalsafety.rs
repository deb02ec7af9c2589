//! ChemicalSafety SDS search: three calls against one JSON RPC endpoint.
//!
//! 1. `search` by CAS returns rows; the row whose 4th field is the CAS gives
//!    the internal MSDS id (1st field).
//! 2. `msdsdetail` by id returns the record again; id and CAS must both match
//!    the query, then the 11th field names the PDF (with a trailing comma).
//! 3. `getpdfurl` turns that PDF name into the final URL.
//!
//! The chain runs as one lookup; a mismatch at any step is a miss.

use super::SdsSource;
use super::http::send_direct;
use crate::error::LookupError;
use crate::types::SdsLink;
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::time::Duration;

/// Label recorded for sheets found here
pub const CHEMICALSAFETY_LABEL: &str = "ChemicalSafety";

const ID_FIELD: usize = 0;
const CAS_FIELD: usize = 3;
const PDF_FIELD: usize = 10;

#[derive(Debug, Deserialize)]
struct RowsResponse {
    rows: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct PdfUrlResponse {
    url: String,
}

/// ChemicalSafety adapter
pub struct ChemicalSafety {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl ChemicalSafety {
    /// Create the adapter against `base_url` (normally `https://chemicalsafety.com`)
    pub fn new(client: reqwest::Client, base_url: &str, timeout: Duration) -> Self {
        Self {
            client,
            endpoint: format!("{}/sds1/retriever.php", base_url.trim_end_matches('/')),
            timeout,
        }
    }

    async fn call<T: DeserializeOwned>(&self, form: &Value) -> Result<T, LookupError> {
        let request = self
            .client
            .post(&self.endpoint)
            .json(form)
            .timeout(self.timeout);
        let body = send_direct(request).await?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl SdsSource for ChemicalSafety {
    fn name(&self) -> &'static str {
        CHEMICALSAFETY_LABEL
    }

    async fn lookup(&self, cas_nr: &str) -> Result<SdsLink, LookupError> {
        let search: RowsResponse = self.call(&search_form(cas_nr)).await?;
        let msds_id = find_msds_id(&search.rows, cas_nr)?;

        let detail: RowsResponse = self.call(&detail_form(&msds_id)).await?;
        let pdf_file = pdf_file_from_detail(&detail.rows, &msds_id, cas_nr)?;

        let pdf: PdfUrlResponse = self.call(&pdf_url_form(&pdf_file)).await?;
        if pdf.url.is_empty() {
            return Err(LookupError::structure("getpdfurl returned an empty url"));
        }

        Ok(SdsLink::new(CHEMICALSAFETY_LABEL, pdf.url))
    }
}

fn search_form(cas_nr: &str) -> Value {
    json!({
        "action": "search",
        "p1": "MSMSDS.COMMON|",
        "p2": "MSMSDS.MANUFACT|",
        "p3": format!("MSCHEM.CAS|{cas_nr}"),
        "hostName": "chemicalsafety.com",
        "isContains": "0"
    })
}

fn detail_form(msds_id: &Value) -> Value {
    json!({
        "action": "msdsdetail",
        "p1": msds_id,
        "p2": "",
        "p3": "",
        "isContains": ""
    })
}

fn pdf_url_form(pdf_file: &str) -> Value {
    json!({
        "action": "getpdfurl",
        "p1": pdf_file,
        "p2": "",
        "p3": "",
        "isContains": ""
    })
}

/// Render a JSON scalar the way the endpoint compares it
fn field_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn field(row: &[Value], index: usize) -> Option<&Value> {
    row.get(index)
}

fn find_msds_id(rows: &[Vec<Value>], cas_nr: &str) -> Result<Value, LookupError> {
    rows.iter()
        .find(|row| field(row, CAS_FIELD).and_then(field_text).as_deref() == Some(cas_nr))
        .and_then(|row| field(row, ID_FIELD))
        .filter(|id| field_text(id).is_some_and(|s| !s.is_empty()))
        .cloned()
        .ok_or_else(|| LookupError::NoMatch {
            cas_nr: cas_nr.to_string(),
        })
}

fn pdf_file_from_detail(
    rows: &[Vec<Value>],
    msds_id: &Value,
    cas_nr: &str,
) -> Result<String, LookupError> {
    let row = rows
        .first()
        .ok_or_else(|| LookupError::structure("msdsdetail returned no rows"))?;

    if field(row, ID_FIELD) != Some(msds_id) {
        return Err(LookupError::structure(format!(
            "msdsdetail returned id {:?}, expected {}",
            field(row, ID_FIELD),
            msds_id
        )));
    }

    let found_cas = field(row, CAS_FIELD).and_then(field_text).unwrap_or_default();
    if found_cas != cas_nr {
        return Err(LookupError::CasMismatch {
            expected: cas_nr.to_string(),
            found: found_cas,
        });
    }

    let pdf_file = field(row, PDF_FIELD)
        .and_then(field_text)
        .map(|s| s.trim_end_matches(',').to_string())
        .unwrap_or_default();
    if pdf_file.is_empty() {
        return Err(LookupError::structure("msdsdetail has no PDF file name"));
    }
    Ok(pdf_file)
}
