// API client module: contains a small blocking HTTP client that performs
// the deposit query against the traceability service. The service
// authenticates through cleartext query parameters on a GET; there is no
// session, token or cookie involved.

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::QueryError;

/// Sub-resource under the configured base URL that lists the deposits
/// registered for a CUIT.
const DEPOSIT_RESOURCE: &str = "Consulta_Deposito";

/// Hard bound on how long a query may block.
const QUERY_TIMEOUT: Duration = Duration::from_secs(10);

/// One registered storage facility as returned by the service. The fields
/// pass through untouched: nothing is validated locally beyond their
/// presence. `deposit_id` is kept as a `serde_json::Value` because the
/// service does not guarantee whether it arrives as a number or a string,
/// and keeping it flexible avoids parsing issues.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DepositRecord {
    pub deposit_id: serde_json::Value,
    pub company_name: String,
    pub deposit_name: String,
    pub address_street: String,
}

impl DepositRecord {
    /// The deposit id as display text: strings verbatim, anything else in
    /// its JSON rendering.
    pub fn deposit_id_text(&self) -> String {
        match &self.deposit_id {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Simple API client that holds a reqwest blocking client with the fixed
/// query timeout baked in. The base URL is not held here: it belongs to the
/// stored configuration and is read fresh on every query.
pub struct ApiClient {
    client: Client,
}

impl ApiClient {
    /// Builds the underlying HTTP client once.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(QUERY_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient { client })
    }

    /// Fetches the list of deposits registered for the configured CUIT.
    /// Records come back in exactly the order the service sent them: no
    /// reordering, filtering or deduplication happens on this side.
    pub fn fetch_deposits(&self, config: &Config) -> Result<Vec<DepositRecord>, QueryError> {
        let url = deposit_query_url(config);
        debug!("GET {}", url);

        let response = self.client.get(&url).query(&auth_params(config)).send()?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!("deposit query answered with status {}", status);
            return Err(QueryError::Remote(status));
        }

        let body = response.text()?;
        parse_deposits(&body)
    }
}

/// Full URL of the deposit query for a given configuration.
pub fn deposit_query_url(config: &Config) -> String {
    format!("{}{}", config.url, DEPOSIT_RESOURCE)
}

/// The three cleartext authentication parameters the service expects.
pub fn auth_params(config: &Config) -> [(&'static str, &str); 3] {
    [
        ("authUser", config.user.as_str()),
        ("authPass", config.password.as_str()),
        ("userTaxId", config.cuit.as_str()),
    ]
}

/// Parses a response body into deposit records. Anything that is not a JSON
/// array of well-formed deposit objects is rejected, so the caller keeps
/// whatever it was displaying before.
pub fn parse_deposits(body: &str) -> Result<Vec<DepositRecord>, QueryError> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| QueryError::InvalidResponse(format!("the body is not valid JSON: {}", e)))?;

    if !value.is_array() {
        return Err(QueryError::InvalidResponse(
            "expected a list of deposits".to_string(),
        ));
    }

    serde_json::from_value(value)
        .map_err(|e| QueryError::InvalidResponse(format!("malformed deposit entry: {}", e)))
}
