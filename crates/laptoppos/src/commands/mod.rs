//! Command handlers.

pub mod config_cmd;
pub mod resources;
pub mod watch;

use std::path::PathBuf;

use laptoppos_config::Config;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Config file selected by `--config`, or the platform default.
pub fn config_file(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(laptoppos_config::config_path)
}

/// Load the config file + env, then apply global flag overrides.
pub fn effective_config(global: &GlobalOpts) -> Result<Config, CliError> {
    let path = config_file(global);

    let mut cfg =
        laptoppos_config::load_config_from(&path).map_err(|e| CliError::config(&path, e))?;

    if let Some(ref origin) = global.origin {
        cfg.origin.clone_from(origin);
    }
    if let Some(ref tenant) = global.tenant {
        cfg.tenant_id = Some(tenant.clone());
    }
    if let Some(ref user) = global.user {
        cfg.user_id = Some(user.clone());
    }

    Ok(cfg)
}
