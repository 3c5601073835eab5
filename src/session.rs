//! Authentication and background token refresh

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::api::client::FleetApi;
use crate::config::{AppConfig, AppContext, ConfigError};
use crate::fleet::error::FetchError;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No auth token configured in {0:?}")]
    MissingToken(PathBuf),

    #[error("Token refresh failed: {0}")]
    Refresh(#[from] FetchError),

    #[error("Failed to persist refreshed token: {0}")]
    Persist(#[from] ConfigError),
}

/// Build an API client authenticated with the token loaded at start
pub fn login_with_token(ctx: &AppContext) -> Result<Arc<FleetApi>, SessionError> {
    if ctx.config.auth_token.trim().is_empty() {
        return Err(SessionError::MissingToken(ctx.config_path.clone()));
    }

    info!("Authenticated against {}", ctx.config.api_endpoint);

    Ok(Arc::new(FleetApi::new(
        &ctx.config.api_endpoint,
        &ctx.config.auth_token,
    )))
}

/// Fetch a fresh token and store it in the config file at `config_path`
pub async fn refresh_and_persist(api: &FleetApi, config_path: &Path) -> Result<(), SessionError> {
    let token = api.refresh_token().await?;

    let config = AppConfig {
        api_endpoint: api.base_url().to_string(),
        auth_token: token,
    };
    config.save(config_path)?;

    info!("Refreshed token written to {:?}", config_path);
    Ok(())
}

/// Refresh the token in the background.
///
/// The current run keeps using the token it logged in with. Failures are
/// logged and never surface to the caller.
pub fn spawn_token_refresh(api: Arc<FleetApi>, config_path: PathBuf) -> JoinHandle<()> {
    tokio::spawn(async move {
        let _ = refresh_and_persist(&api, &config_path)
            .await
            .inspect_err(|e| error!("Failed to refresh token: {}", e));
    })
}
