//! Parse and load user configuration.

use std::{ffi::OsStr, fs, path::Path};

use tracing::debug;

use crate::{Error, FocusConfig};

/// Parse a `FocusConfig` from RON text and validate it.
pub fn from_ron(text: &str) -> Result<FocusConfig, Error> {
    let config: FocusConfig = ron::from_str(text).map_err(|e| Error::Parse {
        path: None,
        message: e.to_string(),
    })?;
    config.validate()?;
    Ok(config)
}

/// Load a `FocusConfig` from a `.ron` file at `path`.
pub fn load_from_path(path: &Path) -> Result<FocusConfig, Error> {
    if path.extension() != Some(OsStr::new("ron")) {
        return Err(Error::Read {
            path: Some(path.to_path_buf()),
            message: "Unsupported config format (expected a .ron file)".to_string(),
        });
    }
    let text = fs::read_to_string(path).map_err(|e| Error::Read {
        path: Some(path.to_path_buf()),
        message: e.to_string(),
    })?;
    let config = from_ron(&text).map_err(|e| e.at_path(path))?;
    debug!(path = %path.display(), ?config, "focus_config_loaded");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::{io::Write, path::PathBuf};

    use super::*;

    #[test]
    fn empty_struct_is_all_defaults() {
        assert_eq!(from_ron("()").unwrap(), FocusConfig::default());
    }

    #[test]
    fn partial_fields_keep_defaults() {
        let c = from_ron("(alt_tab_fix: false, focus_toggle: Some(\"ctrl+alt+f\"))").unwrap();
        assert!(!c.alt_tab_fix);
        assert!(c.keep_caption_active);
        assert_eq!(c.focus_toggle.as_deref(), Some("ctrl+alt+f"));
    }

    #[test]
    fn unknown_fields_are_parse_errors() {
        let err = from_ron("(alt_tab_fixx: false)").unwrap_err();
        assert!(matches!(err, Error::Parse { path: None, .. }));
    }

    #[test]
    fn invalid_toggle_is_validation_error() {
        let err = from_ron("(focus_toggle: Some(\"alt+tab\"))").unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[test]
    fn load_requires_ron_extension() {
        let err = load_from_path(&PathBuf::from("focus.toml")).unwrap_err();
        assert!(err.pretty().contains("expected a .ron file"));
    }

    #[test]
    fn load_reads_file_and_tags_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("focus.ron");
        fs::write(&good, "(keep_caption_active: false)").unwrap();
        assert!(!load_from_path(&good).unwrap().keep_caption_active);

        let bad = dir.path().join("bad.ron");
        let mut f = fs::File::create(&bad).unwrap();
        f.write_all(b"(alt_tab_fix: maybe)").unwrap();
        drop(f);
        let err = load_from_path(&bad).unwrap_err();
        assert_eq!(err.path(), Some(bad.as_path()));
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_from_path(&dir.path().join("absent.ron")).unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
    }
}
