use std::{
    path::{Path, PathBuf},
    sync::Mutex,
    time::{Duration, Instant},
};

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher, recommended_watcher};
use tracing::{error, info, warn};

use crate::config::{AppConfig, loader};

const DEBOUNCE: Duration = Duration::from_millis(500);

/// Keeps the file watcher alive; dropping it stops hot reload.
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
    path: PathBuf,
}

impl ConfigWatcher {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Watches the configuration file and reloads it on change (debounced, 500ms).
///
/// A reload that fails to parse or validate is logged and ignored. A valid one
/// re-applies the log level; every other setting takes effect on the next
/// restart.
pub fn start_config_watcher(path: PathBuf) -> Option<ConfigWatcher> {
    if !path.exists() {
        warn!(path = %path.display(), "config file does not exist; watcher disabled");
        return None;
    }

    let last_reload = Mutex::new(Instant::now() - DEBOUNCE);
    let watched = path.clone();

    let mut watcher = match recommended_watcher(move |res: Result<Event, notify::Error>| {
        match res {
            Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                let Ok(mut last) = last_reload.lock() else {
                    return;
                };
                let now = Instant::now();
                if now.duration_since(*last) < DEBOUNCE {
                    return;
                }
                *last = now;
                let _ = reload(&watched);
            }
            Ok(_) => {}
            Err(e) => error!("watch error: {}", e),
        }
    }) {
        Ok(w) => w,
        Err(e) => {
            error!("failed to start config watcher: {}", e);
            return None;
        }
    };

    if let Err(e) = watcher.watch(&path, RecursiveMode::NonRecursive) {
        error!("failed to watch config file: {}", e);
        return None;
    }

    info!(path = %path.display(), "watching configuration for changes");
    Some(ConfigWatcher {
        _watcher: watcher,
        path,
    })
}

/// Loads and validates `path`, applying the hot-reloadable settings of a
/// valid config.
fn reload(path: &Path) -> Option<AppConfig> {
    match loader::load_config(path.to_str()) {
        Ok(new_cfg) => {
            crate::observability::apply_logging_level(&new_cfg.logging.level);
            info!(level = %new_cfg.logging.level, "configuration reloaded successfully");
            Some(new_cfg)
        }
        Err(e) => {
            error!("configuration reload failed: {}", e);
            None
        }
    }
}
