use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    errors::LedgerError,
    utils::paths::{ensure_dir, write_atomic},
};

use super::{Result, StorageBackend};

const DOCUMENT_EXTENSION: &str = "json";
const BACKUP_DIR: &str = "backups";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S_%6f";
const DEFAULT_RETENTION: usize = 5;

/// Stores each key as a JSON file under a root directory.
///
/// Overwriting a document first copies the previous version into
/// `backups/<key>/`, keeping at most `retention` copies.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    root: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonStorage {
    pub fn new(root: PathBuf, retention: Option<usize>) -> Result<Self> {
        ensure_dir(&root)?;
        let backups_dir = root.join(BACKUP_DIR);
        ensure_dir(&backups_dir)?;
        Ok(Self {
            root,
            backups_dir,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn document_path(&self, key: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}", canonical_name(key), DOCUMENT_EXTENSION))
    }

    fn backup_dir(&self, key: &str) -> PathBuf {
        self.backups_dir.join(canonical_name(key))
    }

    pub fn backup_path(&self, key: &str, backup_name: &str) -> PathBuf {
        self.backup_dir(key).join(backup_name)
    }

    /// Snapshots the current document under `key`, optionally tagging the file name with a
    /// note. Returns the backup file name, or `None` when there is nothing to back up.
    pub fn backup(&self, key: &str, note: Option<&str>) -> Result<Option<String>> {
        let path = self.document_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let name = self.copy_to_backup(key, &path, note)?;
        Ok(Some(name))
    }

    /// Backup file names for `key`, newest first.
    pub fn list_backups(&self, key: &str) -> Result<Vec<String>> {
        let dir = self.backup_dir(key);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(DOCUMENT_EXTENSION) {
                continue;
            }
            let file_name = match path.file_name().and_then(|name| name.to_str()) {
                Some(name) => name.to_string(),
                None => continue,
            };
            entries.push(file_name);
        }
        entries.sort_by(|a, b| {
            parse_backup_timestamp(b)
                .cmp(&parse_backup_timestamp(a))
                .then_with(|| b.cmp(a))
        });
        Ok(entries)
    }

    /// Replaces the live document with a backup and returns the restored blob.
    ///
    /// Only names returned by [`JsonStorage::list_backups`] are accepted.
    pub fn restore(&self, key: &str, backup_name: &str) -> Result<String> {
        let known = self
            .list_backups(key)?
            .iter()
            .any(|name| name == backup_name);
        if !known {
            return Err(LedgerError::Persistence(format!(
                "backup `{backup_name}` not found"
            )));
        }
        let backup_path = self.backup_path(key, backup_name);
        let data = fs::read_to_string(&backup_path)?;
        self.write_document(key, &data)?;
        tracing::info!(key, backup = backup_name, "restored backup");
        Ok(data)
    }

    fn copy_to_backup(&self, key: &str, path: &Path, note: Option<&str>) -> Result<String> {
        let dir = self.backup_dir(key);
        ensure_dir(&dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let stem = format!("{}_{}", canonical_name(key), timestamp);
        let label = sanitize_backup_note(note);
        let mut name = backup_file_name(&stem, None, label.as_deref());
        let mut counter = 0u32;
        while dir.join(&name).exists() {
            counter += 1;
            name = backup_file_name(&stem, Some(counter), label.as_deref());
        }
        fs::copy(path, dir.join(&name))?;
        self.prune_backups(key)?;
        Ok(name)
    }

    fn prune_backups(&self, key: &str) -> Result<()> {
        let backups = self.list_backups(key)?;
        if backups.len() <= self.retention {
            return Ok(());
        }
        for entry in backups.iter().skip(self.retention) {
            let path = self.backup_path(key, entry);
            if let Err(err) = fs::remove_file(&path) {
                tracing::warn!(path = %path.display(), %err, "failed to prune backup");
            }
        }
        Ok(())
    }

    fn write_document(&self, key: &str, data: &str) -> Result<()> {
        write_atomic(&self.document_path(key), data)?;
        Ok(())
    }
}

impl StorageBackend for JsonStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.document_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&self, key: &str, blob: &str) -> Result<()> {
        let path = self.document_path(key);
        if path.exists() {
            self.copy_to_backup(key, &path, None)?;
        }
        self.write_document(key, blob)
    }
}

fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches(|c| c == '_' || c == '-').is_empty() {
        "ledger".into()
    } else {
        sanitized
    }
}

fn backup_file_name(stem: &str, counter: Option<u32>, label: Option<&str>) -> String {
    let mut name = stem.to_string();
    if let Some(counter) = counter {
        name.push_str(&format!("_{counter}"));
    }
    if let Some(label) = label {
        name.push('_');
        name.push_str(label);
    }
    format!("{name}.{DOCUMENT_EXTENSION}")
}

fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    if raw.is_empty() {
        return None;
    }
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || matches!(ch, '-' | '.'))
            && !sanitized.is_empty()
            && !last_dash
        {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-').to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Extracts the `YYYYmmdd_HHMMSS_ffffff` stamp that follows the key in a backup file name.
///
/// The microsecond part is optional so second-precision names still sort.
fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let stem = name.strip_suffix(&format!(".{DOCUMENT_EXTENSION}"))?;
    let parts: Vec<&str> = stem.split('_').collect();
    let position = parts
        .windows(2)
        .position(|pair| is_digits(pair[0], 8) && is_digits(pair[1], 6))?;
    let micros = parts
        .get(position + 2)
        .filter(|part| is_digits(part, 6))
        .and_then(|part| part.parse::<i64>().ok())
        .unwrap_or(0);
    let raw = format!("{}{}", parts[position], parts[position + 1]);
    NaiveDateTime::parse_from_str(&raw, "%Y%m%d%H%M%S")
        .ok()
        .map(|naive| naive + Duration::microseconds(micros))
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}
