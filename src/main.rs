use dotenvy::dotenv;
use rawaj_store::{
    api::{self, AppState},
    config::{self, database},
    core::{auth, session},
    errors::Result,
};
use std::{sync::Arc, time::Duration};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// How often expired admin sessions are swept
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the main application configuration
    let app_config = config::load_app_configuration()?;

    // 4. Connect to the database. Without one the server still starts.
    let target = database::database_target_from_env();
    let db = match database::create_connection(&target).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {e}");
            None
        }
    };

    // 5. Create tables and seed the admin account
    match &db {
        Some(db) => {
            database::create_tables(db)
                .await
                .inspect(|()| info!("Database initialized successfully."))
                .inspect_err(|e| error!("Failed to create tables: {e}"))?;
            auth::seed_admin(
                db,
                &app_config.admin.username,
                app_config.admin.seed_password(),
                app_config.admin.bcrypt_cost,
            )
            .await
            .inspect_err(|e| error!("Failed to seed admin account: {e}"))?;
        }
        None => warn!("Running without a database; catalog and order lists will be empty."),
    }

    // 6. Make sure uploads have somewhere to go
    tokio::fs::create_dir_all(&app_config.storage.upload_dir).await?;

    // 7. Serve
    let state = AppState::new(db, Arc::new(app_config));
    let reaper = session::spawn_reaper(Arc::clone(&state.sessions), SESSION_SWEEP_INTERVAL);

    api::serve(state).await?;
    reaper.abort();

    Ok(())
}
