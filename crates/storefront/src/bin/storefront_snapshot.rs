//! Prints what a storefront directory holds as JSON.
//!
//! Usage: `storefront-snapshot [CONFIG_DIR]`
//!
//! With a directory, `storefront.json` is loaded (or created) there and
//! snapshots default to its `snapshots/` subdirectory. Without one, defaults
//! apply.
//! `STOREFRONT_STORAGE_DIR` and `STOREFRONT_KEY_PREFIX` override both.

use std::io::Write;
use std::path::PathBuf;

use serde_json::json;
use storefront::config::load_config_dir;
use storefront::storage::{FileBackend, KvBackend};
use storefront::{Storefront, StorefrontConfig, StorefrontReport, StorefrontResult};

fn main() {
    let _ = dotenvy::dotenv();
    env_logger::init();

    if let Err(error) = run() {
        eprintln!("storefront-snapshot: {error}");
        std::process::exit(1);
    }
}

fn run() -> StorefrontResult<()> {
    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(dir) => load_config_dir(&dir)?,
        None => StorefrontConfig::default(),
    }
    .apply_env();

    let files = match config.resolved_storage_dir() {
        Some(dir) => {
            let backend = FileBackend::new(dir);
            let mut files = Vec::new();
            for key in backend.keys()? {
                let bytes = backend.read(&key)?.map(|text| text.len()).unwrap_or(0);
                files.push(json!({ "key": key, "bytes": bytes }));
            }
            files
        }
        None => Vec::new(),
    };

    let storefront = Storefront::open(config)?;
    let report = json!({
        "files": files,
        "storefront": StorefrontReport::build(&storefront),
    });

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", serde_json::to_string_pretty(&report)?)?;
    storefront.close();
    Ok(())
}
