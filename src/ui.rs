// UI layer: provides a simple interactive menu using `dialoguer`, covering
// the two views of the tool: the deposit query (table plus export) and the
// configuration form. Every failure is handled at the action that caused
// it and shown through the status channel; nothing propagates further.

use crate::api::{ApiClient, DepositRecord};
use crate::config::{ConfigStore, Environment};
use crate::error::{ConfigError, QueryError};
use crate::export::{export_deposits, DEFAULT_EXPORT_PATH};
use anyhow::Result;
use crossterm::style::{Color, Stylize};
use dialoguer::{Input, Password, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

// Table column widths in characters; longer values are truncated to fit.
const ID_WIDTH: usize = 14;
const COMPANY_WIDTH: usize = 28;
const NAME_WIDTH: usize = 21;
const STREET_WIDTH: usize = 21;

/// Background of the banded table rows (a light blue).
const BAND_COLOR: Color = Color::Rgb {
    r: 230,
    g: 247,
    b: 255,
};

/// Visual tag of a table row. Alternates purely by position for
/// readability; it carries no meaning beyond the banding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowTag {
    Even,
    Odd,
}

/// Tag for the row at `index`, starting with `Even` on the first row.
pub fn row_tag(index: usize) -> RowTag {
    if index % 2 == 0 {
        RowTag::Even
    } else {
        RowTag::Odd
    }
}

/// Kind of a status message: decides the color and whether the line stays
/// in the log area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

/// The persistent status area shown above the main menu. A success replaces
/// the whole content, errors pile up under each other, info notices are
/// transient and never retained.
#[derive(Default)]
pub struct StatusLog {
    lines: Vec<(StatusKind, String)>,
}

impl StatusLog {
    /// Applies one message according to its kind.
    pub fn record(&mut self, kind: StatusKind, message: &str) {
        match kind {
            StatusKind::Success => {
                self.lines.clear();
                self.lines.push((kind, message.to_string()));
            }
            StatusKind::Error => self.lines.push((kind, message.to_string())),
            StatusKind::Info => {}
        }
    }

    /// The retained lines, oldest first.
    pub fn lines(&self) -> &[(StatusKind, String)] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Coordinates the query and the export, and therefore owns the last
/// result set: the table shown on screen and the rows a later export
/// writes are always this same vector, replaced wholesale on each
/// successful query.
pub struct App {
    store: ConfigStore,
    api: ApiClient,
    results: Vec<DepositRecord>,
    log: StatusLog,
}

impl App {
    pub fn new(store: ConfigStore, api: ApiClient) -> Self {
        App {
            store,
            api,
            results: Vec::new(),
            log: StatusLog::default(),
        }
    }

    /// The records currently held for display and export.
    pub fn results(&self) -> &[DepositRecord] {
        &self.results
    }

    /// Replaces the held result set wholesale with a fresh server response.
    pub fn replace_results(&mut self, records: Vec<DepositRecord>) {
        self.results = records;
    }

    /// Query flow: precondition check, reload of the stored file, blocking
    /// fetch behind a spinner, then the table is replaced wholesale. On any
    /// failure the previous results stay on screen untouched.
    fn run_query(&mut self) -> Result<()> {
        if !self.store.is_valid() {
            return self.show_status(
                StatusKind::Error,
                "Configure your credentials before running queries.",
            );
        }

        let config = match self.store.load() {
            Ok(config) => config,
            Err(e) => {
                return self.show_status(
                    StatusKind::Error,
                    &format!("Configure your credentials before running queries ({}).", e),
                );
            }
        };

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
        spinner.set_message("Querying deposits...");
        spinner.enable_steady_tick(Duration::from_millis(100));

        let outcome = self.api.fetch_deposits(&config);
        spinner.finish_and_clear();

        let (kind, message) = self.apply_query_outcome(outcome);
        if kind == StatusKind::Success {
            render_table(&self.results);
        }
        self.show_status(kind, &message)
    }

    /// Applies a fetch outcome to the held results: a success replaces them
    /// wholesale (an empty list included), any failure leaves them exactly
    /// as they were. Returns the status to show; the interactive parts of
    /// the flow stay in `run_query`.
    fn apply_query_outcome(
        &mut self,
        outcome: Result<Vec<DepositRecord>, QueryError>,
    ) -> (StatusKind, String) {
        match outcome {
            Ok(records) => {
                self.replace_results(records);
                (
                    StatusKind::Success,
                    "Query completed successfully".to_string(),
                )
            }
            Err(e) => (
                StatusKind::Error,
                format!("Could not complete the query: {}", e),
            ),
        }
    }

    /// Export flow: writes the held results to the fixed spreadsheet path.
    fn export_results(&mut self) -> Result<()> {
        match export_deposits(&self.results, Path::new(DEFAULT_EXPORT_PATH)) {
            Ok(()) => self.show_status(
                StatusKind::Info,
                &format!("Results exported to '{}'.", DEFAULT_EXPORT_PATH),
            ),
            Err(e) => self.show_status(
                StatusKind::Error,
                &format!("Could not export the results: {}", e),
            ),
        }
    }

    /// Configuration flow: pre-fills the form from the stored file when
    /// there is one, prompts for the three fields and the environment, and
    /// saves. Inputs may be left empty on purpose; the store is the one
    /// that validates.
    fn configure(&mut self) -> Result<()> {
        let existing = match self.store.load() {
            Ok(config) => Some(config),
            Err(ConfigError::NotFound) => {
                self.show_status(StatusKind::Error, "No saved configuration was found.")?;
                None
            }
            Err(e) => {
                self.show_status(
                    StatusKind::Error,
                    &format!("Could not read the saved configuration: {}", e),
                )?;
                None
            }
        };

        let cuit: String = Input::new()
            .with_prompt("CUIT")
            .with_initial_text(existing.as_ref().map(|c| c.cuit.clone()).unwrap_or_default())
            .allow_empty(true)
            .interact_text()?;
        let user: String = Input::new()
            .with_prompt("User")
            .with_initial_text(existing.as_ref().map(|c| c.user.clone()).unwrap_or_default())
            .allow_empty(true)
            .interact_text()?;

        // `Password` hides input in the terminal. A stored password cannot
        // be shown back for editing, so an empty entry keeps it.
        let password_prompt = if existing.is_some() {
            "Password (empty keeps the current one)"
        } else {
            "Password"
        };
        let typed: String = Password::new()
            .with_prompt(password_prompt)
            .allow_empty_password(true)
            .interact()?;
        let password = if typed.is_empty() {
            existing
                .as_ref()
                .map(|c| c.password.clone())
                .unwrap_or_default()
        } else {
            typed
        };

        let environments = vec!["Test", "Production"];
        let current = match existing.as_ref().map(|c| c.environment()) {
            Some(Environment::Production) => 1,
            _ => 0,
        };
        let selection = Select::new()
            .with_prompt("Environment")
            .items(&environments)
            .default(current)
            .interact()?;
        let environment = if selection == 0 {
            Environment::Test
        } else {
            Environment::Production
        };

        match self.store.save(&cuit, &user, &password, environment) {
            Ok(_) => self.show_status(StatusKind::Info, "Configuration saved successfully.")?,
            Err(e) => self.show_status(
                StatusKind::Error,
                &format!("Could not save the configuration: {}", e),
            )?,
        }
        Ok(())
    }

    /// Single user-facing outcome channel. Errors land in the log and block
    /// until acknowledged; successes replace the log content; info notices
    /// just block until acknowledged.
    fn show_status(&mut self, kind: StatusKind, message: &str) -> Result<()> {
        self.log.record(kind, message);
        match kind {
            StatusKind::Info => {
                println!("{}", message);
                pause()?;
            }
            StatusKind::Success => {
                println!("{}", message.green());
            }
            StatusKind::Error => {
                println!("{}", format!("ERROR: {}", message).red());
                pause()?;
            }
        }
        Ok(())
    }

    /// Reprints the retained status lines, keeping the log area visible
    /// above the menu like a fixed widget would be.
    fn render_log(&self) {
        if self.log.is_empty() {
            return;
        }
        for (kind, message) in self.log.lines() {
            match kind {
                StatusKind::Error => println!("{}", format!("ERROR: {}", message).red()),
                _ => println!("{}", message.as_str().green()),
            }
        }
        println!();
    }
}

/// Main interactive menu. Receives the `App` and runs a simple select loop
/// until the user chooses "Exit".
///
/// Note: `Select::interact()` is keyboard-driven: you can use arrow keys
/// and Enter to choose an option.
pub fn main_menu(mut app: App) -> Result<()> {
    loop {
        app.render_log();
        let items = vec![
            "Query deposits",
            "Export results to Excel",
            "Configuration",
            "Exit",
        ];
        // `Select` shows a keyboard-navigable list in the terminal.
        let selection = Select::new().items(&items).default(0).interact()?;
        match selection {
            0 => app.run_query()?,
            1 => app.export_results()?,
            2 => app.configure()?,
            3 => break,
            _ => {}
        }
    }
    Ok(())
}

/// Header plus one fixed-width line per record, in server order. Plain
/// text; colors are applied at print time.
pub fn table_lines(records: &[DepositRecord]) -> Vec<String> {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(format_row(
        "ID Depósito",
        "Compañía",
        "Nombre Depósito",
        "Dirección",
    ));
    for record in records {
        lines.push(format_row(
            &record.deposit_id_text(),
            &record.company_name,
            &record.deposit_name,
            &record.address_street,
        ));
    }
    lines
}

fn format_row(id: &str, company: &str, name: &str, street: &str) -> String {
    format!(
        "{:<iw$.iw$}  {:<cw$.cw$}  {:<nw$.nw$}  {:<sw$.sw$}",
        id,
        company,
        name,
        street,
        iw = ID_WIDTH,
        cw = COMPANY_WIDTH,
        nw = NAME_WIDTH,
        sw = STREET_WIDTH,
    )
}

/// Prints the full table, replacing whatever was shown before: bold header,
/// then the rows with their alternating banding.
fn render_table(records: &[DepositRecord]) {
    let lines = table_lines(records);
    println!();
    println!("{}", lines[0].clone().bold());
    for (i, line) in lines[1..].iter().enumerate() {
        match row_tag(i) {
            RowTag::Even => println!(
                "{}",
                line.clone().with(Color::Black).on(BAND_COLOR)
            ),
            RowTag::Odd => println!("{}", line),
        }
    }
    println!();
}

/// Blocking acknowledgment standing in for a modal dialog: the flow does
/// not continue until the user presses Enter.
fn pause() -> Result<()> {
    let _: String = Input::new()
        .with_prompt("Press Enter to continue")
        .allow_empty(true)
        .interact_text()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tempfile::TempDir;

    fn record(id: &str) -> DepositRecord {
        DepositRecord {
            deposit_id: Value::String(id.to_string()),
            company_name: "Acopios del Sur SA".to_string(),
            deposit_name: "Planta Rosario".to_string(),
            address_street: "Av. Belgrano 1500".to_string(),
        }
    }

    #[test]
    fn table_has_a_header_plus_one_line_per_record_in_order() {
        let records = vec![record("D-1"), record("D-2"), record("D-3")];
        let lines = table_lines(&records);
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("ID Depósito"));
        assert!(lines[1].starts_with("D-1"));
        assert!(lines[2].starts_with("D-2"));
        assert!(lines[3].starts_with("D-3"));
    }

    #[test]
    fn table_lines_share_a_fixed_width() {
        let mut long = record("D-1");
        long.company_name =
            "Compañía Cerealera del Litoral y del Noroeste Argentino SA".to_string();
        let lines = table_lines(&[long, record("D-2")]);
        let width = lines[0].chars().count();
        assert!(lines.iter().all(|l| l.chars().count() == width));
    }

    #[test]
    fn row_tags_alternate_starting_even() {
        assert_eq!(row_tag(0), RowTag::Even);
        assert_eq!(row_tag(1), RowTag::Odd);
        assert_eq!(row_tag(2), RowTag::Even);
        assert_eq!(row_tag(3), RowTag::Odd);
    }

    #[test]
    fn status_log_errors_pile_up() {
        let mut log = StatusLog::default();
        log.record(StatusKind::Error, "first");
        log.record(StatusKind::Error, "second");
        assert_eq!(log.lines().len(), 2);
        assert_eq!(log.lines()[1].1, "second");
    }

    #[test]
    fn status_log_success_replaces_content() {
        let mut log = StatusLog::default();
        log.record(StatusKind::Error, "first");
        log.record(StatusKind::Error, "second");
        log.record(StatusKind::Success, "done");
        assert_eq!(log.lines().len(), 1);
        assert_eq!(log.lines()[0], (StatusKind::Success, "done".to_string()));
    }

    #[test]
    fn status_log_does_not_retain_info_notices() {
        let mut log = StatusLog::default();
        log.record(StatusKind::Info, "saved");
        assert!(log.is_empty());
    }

    #[test]
    fn replace_results_swaps_the_whole_set() {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::new(dir.path().join("config.json"));
        let mut app = App::new(store, ApiClient::new().unwrap());

        app.replace_results(vec![record("D-1"), record("D-2")]);
        assert_eq!(app.results().len(), 2);

        app.replace_results(vec![record("D-9")]);
        assert_eq!(app.results().len(), 1);
        assert_eq!(app.results()[0].deposit_id_text(), "D-9");
    }

    #[test]
    fn failed_query_outcome_keeps_previous_results() {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::new(dir.path().join("config.json"));
        let mut app = App::new(store, ApiClient::new().unwrap());
        app.replace_results(vec![record("D-1"), record("D-2")]);

        let (kind, message) = app.apply_query_outcome(Err(QueryError::InvalidResponse(
            "expected a list of deposits".to_string(),
        )));
        assert_eq!(kind, StatusKind::Error);
        assert!(message.contains("expected a list of deposits"));
        assert_eq!(app.results().len(), 2);
        assert_eq!(app.results()[0].deposit_id_text(), "D-1");

        let (kind, _) = app.apply_query_outcome(Ok(vec![record("D-9")]));
        assert_eq!(kind, StatusKind::Success);
        assert_eq!(app.results().len(), 1);
        assert_eq!(app.results()[0].deposit_id_text(), "D-9");
    }
}
