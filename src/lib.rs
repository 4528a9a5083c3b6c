// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) uses these modules to implement the interactive client.
//
// Module responsibilities:
// - `config`: Persists the service credentials and environment choice to a
//   JSON file and validates them before a query is allowed.
// - `api`: Encapsulates the HTTP query against the traceability service
//   and the parsing of its response into deposit records.
// - `export`: Writes the last query result to an xlsx spreadsheet.
// - `error`: Typed failures of the modules above.
// - `ui`: Implements the terminal flows (menu, table, status channel) and
//   delegates the work to the other modules.
//
// Keeping this separation makes it easier to test each piece on its own or
// to replace the UI in the future (for example, adding a TUI or GUI).
pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod ui;
