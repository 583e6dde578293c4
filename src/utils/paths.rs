use std::{
    env,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

const DEFAULT_DIR_NAME: &str = "pocketbank";
const HIDDEN_DIR_NAME: &str = ".pocketbank";
const HOME_ENV: &str = "POCKETBANK_HOME";
const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";

/// Returns the application data directory.
///
/// Resolution order: `$POCKETBANK_HOME`, the platform data directory, `~/.pocketbank`,
/// then `./.pocketbank`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    if let Some(data) = dirs::data_dir() {
        return data.join(DEFAULT_DIR_NAME);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(HIDDEN_DIR_NAME)
}

/// Directory holding `config.json` under `base`.
pub fn config_dir_in(base: &Path) -> PathBuf {
    base.join(CONFIG_DIR)
}

pub fn config_file_in(base: &Path) -> PathBuf {
    config_dir_in(base).join(CONFIG_FILE)
}

pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Sibling path used while writing `path`, e.g. `doc.json.tmp`.
pub fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

/// Writes `data` to a temp file next to `path`, then renames it into place.
///
/// On failure the previous contents of `path` are left as they were.
pub fn write_atomic(path: &Path, data: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    drop(file);
    fs::rename(&tmp, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn tmp_path_appends_suffix() {
        assert_eq!(
            tmp_path(Path::new("/data/doc.json")),
            PathBuf::from("/data/doc.json.tmp")
        );
        assert_eq!(tmp_path(Path::new("/data/doc")), PathBuf::from("/data/doc.tmp"));
    }

    #[test]
    fn write_atomic_replaces_contents_without_leftovers() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("doc.json");
        write_atomic(&path, "one").unwrap();
        write_atomic(&path, "two").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "two");
        assert!(!tmp_path(&path).exists());
    }

    #[test]
    fn failed_write_keeps_previous_contents() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("doc.json");
        write_atomic(&path, "kept").unwrap();
        fs::create_dir_all(tmp_path(&path)).unwrap();
        assert!(write_atomic(&path, "lost").is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "kept");
    }
}
