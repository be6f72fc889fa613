//! EU VIES VAT number check over SOAP

use std::collections::HashMap;

use chrono::NaiveDate;
use helpkit_common::vat::VatNumber;
use helpkit_domain::{HelpkitError, Result, ViesConfig};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::to_helpkit;
use crate::http::HttpClient;

static LEAF_ELEMENT: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"<(?:[\w.-]+:)?(\w+)(?:\s[^>]*)?>([^<]*)</(?:[\w.-]+:)?\w+>").ok()
});

/// Placeholder VIES returns when a member state does not disclose a field
const UNDISCLOSED: &str = "---";

/// Answer of the `checkVat` operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VatCheckResult {
    pub country_code: String,
    pub vat_number: String,
    pub valid: bool,
    pub name: Option<String>,
    pub address: Option<String>,
    pub request_date: Option<NaiveDate>,
}

/// Client for the `checkVatService` endpoint
pub struct ViesClient {
    http_client: HttpClient,
    endpoint: String,
}

impl ViesClient {
    pub fn new(config: ViesConfig) -> Result<Self> {
        let http_client = HttpClient::builder().timeout_secs(config.timeout_seconds).build()?;
        Ok(Self::with_client(config, http_client))
    }

    pub fn with_client(config: ViesConfig, http_client: HttpClient) -> Self {
        Self { http_client, endpoint: config.endpoint }
    }

    /// Ask the member state registry whether `vat` is currently assigned
    ///
    /// # Errors
    /// - `InvalidInput` when VIES rejects the number (`INVALID_INPUT` fault)
    /// - `Network` when the service or the member state is unavailable
    /// - `Serialization` when the answer is neither a result nor a fault
    pub async fn check(&self, vat: &VatNumber) -> Result<VatCheckResult> {
        let envelope = check_vat_envelope(vat);
        let request = self
            .http_client
            .request(Method::POST, &self.endpoint)
            .header("Content-Type", "text/xml; charset=utf-8")
            .header("SOAPAction", "")
            .body(envelope);

        // faults come back as HTTP 500 with a SOAP body worth reading, and
        // retrying them would only repeat the same answer
        let response = self.http_client.send_without_status_retry(request).await?;
        let status = response.status();
        let body = response.text().await.map_err(to_helpkit)?;
        debug!(%vat, status = status.as_u16(), "VIES answered");

        match parse_check_vat_response(&body) {
            Err(HelpkitError::Serialization(_)) if status.is_server_error() => {
                Err(HelpkitError::Network(format!("VIES answered HTTP {status}")))
            }
            parsed => parsed,
        }
    }

    /// `Some(valid)` from VIES, `Some(false)` for malformed input, `None` when
    /// VIES could not answer
    pub async fn is_valid(&self, input: &str) -> Option<bool> {
        let vat = match VatNumber::parse(input) {
            Ok(vat) => vat,
            Err(err) => {
                debug!(input, error = %err, "VAT number rejected before calling VIES");
                return Some(false);
            }
        };

        match self.check(&vat).await {
            Ok(result) => Some(result.valid),
            Err(HelpkitError::InvalidInput(_)) => Some(false),
            Err(err) => {
                warn!(%vat, error = %err, "VIES check unavailable");
                None
            }
        }
    }
}

fn check_vat_envelope(vat: &VatNumber) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8"?>"#,
            r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" "#,
            r#"xmlns:urn="urn:ec.europa.eu:taxud:vies:services:checkVat:types">"#,
            "<soapenv:Header/><soapenv:Body><urn:checkVat>",
            "<urn:countryCode>{}</urn:countryCode><urn:vatNumber>{}</urn:vatNumber>",
            "</urn:checkVat></soapenv:Body></soapenv:Envelope>"
        ),
        vat.country_code(),
        vat.number()
    )
}

/// Leaf elements by local name, namespace prefixes dropped
fn leaf_elements(body: &str) -> HashMap<String, String> {
    LEAF_ELEMENT
        .iter()
        .flat_map(|re| re.captures_iter(body))
        .map(|caps| (caps[1].to_string(), unescape_xml(caps[2].trim())))
        .collect()
}

fn unescape_xml(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

fn disclosed(value: Option<&String>) -> Option<String> {
    value.filter(|text| !text.is_empty() && text.as_str() != UNDISCLOSED).cloned()
}

fn parse_check_vat_response(body: &str) -> Result<VatCheckResult> {
    let elements = leaf_elements(body);

    if let Some(fault) = elements.get("faultstring") {
        return Err(match fault.as_str() {
            "INVALID_INPUT" => HelpkitError::InvalidInput(format!("VIES rejected the number: {fault}")),
            _ => HelpkitError::Network(format!("VIES unavailable: {fault}")),
        });
    }

    let valid = match elements.get("valid").map(String::as_str) {
        Some("true") => true,
        Some("false") => false,
        _ => {
            return Err(HelpkitError::Serialization(
                "VIES response has no checkVatResponse/valid element".into(),
            ))
        }
    };

    // requestDate carries an offset suffix, e.g. 2025-03-01+01:00
    let request_date = elements
        .get("requestDate")
        .and_then(|date| date.get(..10))
        .and_then(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok());

    Ok(VatCheckResult {
        country_code: elements.get("countryCode").cloned().unwrap_or_default(),
        vat_number: elements.get("vatNumber").cloned().unwrap_or_default(),
        valid,
        name: disclosed(elements.get("name")),
        address: disclosed(elements.get("address")),
        request_date,
    })
}
