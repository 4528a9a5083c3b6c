// Error types shared by the library modules. Each component gets its own
// small enum so the UI can match on exactly the failures that component
// can produce; everything is surfaced to the user through the status
// channel in `ui`, never propagated past the triggering action.

use thiserror::Error;

/// Failures of the configuration store (`config` module).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// One of the required text fields was empty after trimming.
    #[error("all required fields (CUIT, user and password) must be completed")]
    MissingFields,

    /// No configuration file has been saved yet.
    #[error("no saved configuration was found")]
    NotFound,

    /// The file exists but could not be read or written.
    #[error("could not access the configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// The file exists but does not contain valid configuration JSON.
    #[error("the configuration file is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Failures of the deposit query (`api` module).
#[derive(Debug, Error)]
pub enum QueryError {
    /// Transport-level failure: connection refused, DNS, timeout.
    #[error("could not reach the service: {0}")]
    Network(#[from] reqwest::Error),

    /// The service answered with an HTTP status other than 200.
    #[error("the service answered with status {0}")]
    Remote(reqwest::StatusCode),

    /// The body was not the expected JSON array of deposits.
    #[error("unexpected response from the service: {0}")]
    InvalidResponse(String),
}

/// Failures of the spreadsheet export (`export` module).
#[derive(Debug, Error)]
pub enum ExportError {
    /// There is no result set to export; run a query first.
    #[error("there are no results to export")]
    NoData,

    /// The xlsx file could not be produced.
    #[error("could not write the spreadsheet: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}
