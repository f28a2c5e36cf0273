//! Focus coordination settings for dockfocus.
//!
//! Configuration is a single RON struct, [`FocusConfig`]. All fields are
//! optional; see the field docs for defaults.
#![warn(unsafe_op_in_unsafe_fn)]

use std::{
    env,
    path::{Path, PathBuf},
};

mod error;
mod focus;
mod loader;

pub use error::Error;
pub use focus::FocusConfig;
pub use loader::{from_ron, load_from_path};

/// Determine the preferred user config path (`%APPDATA%\dockfocus\focus.ron`,
/// or `~/.dockfocus/focus.ron` where `APPDATA` is unset).
pub fn default_config_path() -> PathBuf {
    if let Some(appdata) = env::var_os("APPDATA") {
        let mut p = PathBuf::from(appdata);
        p.push("dockfocus");
        p.push("focus.ron");
        return p;
    }
    let mut p = PathBuf::from(env::var_os("HOME").unwrap_or_default());
    p.push(".dockfocus");
    p.push("focus.ron");
    p
}

/// Resolve and load the effective configuration.
///
/// Policy:
/// 1) Load `explicit` when provided; errors propagate.
/// 2) Else load the default path when it exists.
/// 3) Else use [`FocusConfig::default`].
pub fn load_or_default(explicit: Option<&Path>) -> Result<FocusConfig, Error> {
    if let Some(path) = explicit {
        return load_from_path(path);
    }
    let path = default_config_path();
    if path.exists() {
        load_from_path(&path)
    } else {
        Ok(FocusConfig::default())
    }
}
