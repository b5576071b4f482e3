use api::{AppState, ServerConfig};
use note_index::{IndexConfig, SearchState, telemetry};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; the process environment still applies.
    dotenvy::dotenv().ok();

    telemetry::init("info")?;

    let server = ServerConfig::from_env()?;

    let (search, notes_folder) = match IndexConfig::from_env() {
        Ok(cfg) => {
            info!(
                folder = %cfg.notes_folder.display(),
                extension = %cfg.extension,
                backend = ?cfg.embedding.backend,
                model = %cfg.embedding.model,
                "building note index"
            );
            let search = SearchState::initialize(&cfg).await;
            (search, cfg.notes_folder)
        }
        Err(err) => {
            error!(error = %err, "invalid index configuration; search disabled");
            let folder = IndexConfig::default().notes_folder;
            (SearchState::degraded(err.to_string()), folder)
        }
    };

    api::start(AppState::new(search, notes_folder), &server).await?;
    Ok(())
}
