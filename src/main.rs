// Entrypoint for the CLI application.
// - Keeps `main` small: wire up logging, the configuration store and the
//   API client, then hand everything to the UI loop.
// - Returns `anyhow::Result` to simplify error handling at the top level.

use agrotraza_cli::{api::ApiClient, config::ConfigStore, ui::main_menu, ui::App};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Diagnostic logging stays quiet unless RUST_LOG asks for more;
    // user-facing outcomes go through the status channel in `ui`.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let store = ConfigStore::default_location();
    let api = ApiClient::new()?;

    // Start the interactive menu. This call blocks until the user exits.
    main_menu(App::new(store, api))?;
    Ok(())
}
