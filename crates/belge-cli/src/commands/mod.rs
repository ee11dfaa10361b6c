pub mod extract;
pub mod master;
pub mod process;

use belge_core::config::{load_config, ReconcileConfig};
use belge_core::error::BelgeError;

use crate::StoreArgs;

/// Config file (or defaults) with command-line overrides applied.
fn resolve_config(args: &StoreArgs) -> Result<ReconcileConfig, BelgeError> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ReconcileConfig::default(),
    };
    if let Some(dir) = &args.store_dir {
        config.store_dir = dir.clone();
    }
    Ok(config)
}
