use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::Utc;
use serde::{Serialize, de::DeserializeOwned};
use tracing::warn;

use crate::config::Config;
use crate::store::schema::{EXPORT_VERSION, ExportData, TimingData};

const TIMINGS_FILE: &str = "timings.json";

pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_base_dir(config.data_path())
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)
            .with_context(|| format!("creating data dir {}", base_dir.display()))?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    fn load<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let path = self.file_path(name);
        if !path.exists() {
            return T::default();
        }
        let parsed: Result<T> = fs::read_to_string(&path)
            .map_err(anyhow::Error::from)
            .and_then(|content| Ok(serde_json::from_str(&content)?));
        match parsed {
            Ok(data) => data,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "unreadable store file, using defaults");
                T::default()
            }
        }
    }

    fn write_tmp(path: &Path, json: &str) -> Result<()> {
        let mut file = fs::File::create(path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        Ok(())
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("json.tmp");

        let json = serde_json::to_string_pretty(data)?;
        Self::write_tmp(&tmp_path, &json)?;
        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    /// Load saved averages. A missing, corrupt or stale-schema file loads
    /// as empty.
    pub fn load_timings(&self) -> TimingData {
        let data: TimingData = self.load(TIMINGS_FILE);
        if data.needs_reset() {
            warn!(
                schema_version = data.schema_version,
                "timings schema mismatch, starting fresh"
            );
            return TimingData::default();
        }
        data
    }

    pub fn save_timings(&self, data: &TimingData) -> Result<()> {
        self.save(TIMINGS_FILE, data)
    }

    pub fn export_all(&self, config: &Config) -> ExportData {
        ExportData {
            quicklearn_export_version: EXPORT_VERSION,
            exported_at: Utc::now(),
            config: config.clone(),
            timings: self.load_timings(),
        }
    }

    /// Replace the stored timings with those in `data`.
    ///
    /// The new file is staged as `.tmp` first; the current file is moved to
    /// `.bak` and restored if the final rename fails. The config half of the
    /// export is left to the caller.
    pub fn import_all(&self, data: &ExportData) -> Result<()> {
        if data.quicklearn_export_version != EXPORT_VERSION {
            bail!(
                "Unsupported export version: {} (expected {})",
                data.quicklearn_export_version,
                EXPORT_VERSION
            );
        }
        if data.timings.needs_reset() {
            bail!(
                "Unsupported timings schema version: {}",
                data.timings.schema_version
            );
        }

        let json = serde_json::to_string_pretty(&data.timings)?;
        let final_path = self.file_path(TIMINGS_FILE);
        let tmp_path = final_path.with_extension("json.tmp");
        let bak_path = final_path.with_extension("json.bak");

        if let Err(e) = Self::write_tmp(&tmp_path, &json) {
            let _ = fs::remove_file(&tmp_path);
            bail!("Import failed during staging: {e}");
        }

        let had_original = final_path.exists();
        if had_original && let Err(e) = fs::rename(&final_path, &bak_path) {
            let _ = fs::remove_file(&tmp_path);
            bail!("Import failed during commit (backup): {e}");
        }

        if let Err(e) = fs::rename(&tmp_path, &final_path) {
            if had_original {
                let _ = fs::rename(&bak_path, &final_path);
            }
            let _ = fs::remove_file(&tmp_path);
            bail!("Import failed during commit (rename): {e}");
        }

        if had_original {
            let _ = fs::remove_file(&bak_path);
        }
        Ok(())
    }

    /// Restore a `.bak` left by an interrupted import. Returns true if one
    /// was found.
    pub fn check_interrupted_import(&self) -> bool {
        let final_path = self.file_path(TIMINGS_FILE);
        let bak_path = final_path.with_extension("json.bak");
        if !bak_path.exists() {
            return false;
        }
        if final_path.exists() {
            let _ = fs::remove_file(&bak_path);
        } else if let Err(e) = fs::rename(&bak_path, &final_path) {
            warn!(error = %e, "could not restore timings backup");
        }
        true
    }

    pub fn write_export(path: &Path, data: &ExportData) -> Result<()> {
        let json = serde_json::to_string_pretty(data)?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    pub fn read_export(path: &Path) -> Result<ExportData> {
        let content =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let data = serde_json::from_str(&content)
            .with_context(|| format!("parsing export file {}", path.display()))?;
        Ok(data)
    }
}
