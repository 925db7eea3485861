use crate::infra::{open_store, OutboundMail};
use clap::Args;
use club_desk::config::AppConfig;
use club_desk::error::AppError;
use club_desk::telemetry;
use club_desk::workflows::registration::{CardCatalog, RegistrationService};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

#[derive(Args, Debug)]
pub(crate) struct SeedArgs {
    /// CSV file with one card per row
    #[arg(long)]
    pub(crate) file: PathBuf,
    /// Override the configured database file
    #[arg(long)]
    pub(crate) database: Option<PathBuf>,
}

pub(crate) async fn run_seed(args: SeedArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    if let Some(database) = args.database {
        config.store.database_path = Some(database);
    }
    telemetry::init(&config.telemetry)?;

    if config.store.database_path.is_none() {
        warn!("no database path configured; seeded cards will not outlive this command");
    }

    let cards = CardCatalog::from_path(&args.file)?;
    let store = Arc::new(open_store(&config.store).await?);
    let service = RegistrationService::new(store.clone(), store, Arc::new(OutboundMail::Log));
    let written = service.seed_cards(cards).await?;

    println!("seeded {written} card(s) from {}", args.file.display());
    Ok(())
}
