#![forbid(unsafe_code)]

//! Writes the emulator configuration for a bundle into a scratch file.
//!
//! # Invariants
//!
//! 1. The config file only exists between a successful [`MachineLoader::load`]
//!    and the loader being dropped.
//! 2. A failed load leaves no partial file behind.

use std::fs;
use std::path::{Path, PathBuf};

use crate::description::MachineDescription;
use crate::error::MachineError;

/// Description file names, in lookup order.
pub const DESCRIPTION_FILES: [&str; 2] = ["machine.toml", "machine.json"];

/// Name of the rendered configuration file.
pub const CONFIG_FILE_NAME: &str = "temu.cfg";

#[derive(Debug)]
pub struct MachineLoader {
    config_path: PathBuf,
}

impl MachineLoader {
    /// Loader writing into `scratch_dir`.
    #[must_use]
    pub fn new(scratch_dir: impl AsRef<Path>) -> Self {
        Self {
            config_path: scratch_dir.as_ref().join(CONFIG_FILE_NAME),
        }
    }

    /// Loader writing into the system temporary directory.
    #[must_use]
    pub fn in_temp_dir() -> Self {
        Self::new(std::env::temp_dir())
    }

    /// Where the rendered configuration goes.
    #[must_use]
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Read the description from `bundle_dir` without writing anything.
    pub fn read_description(bundle_dir: &Path) -> Result<MachineDescription, MachineError> {
        for name in DESCRIPTION_FILES {
            let path = bundle_dir.join(name);
            if !path.is_file() {
                continue;
            }
            let content = fs::read_to_string(&path)?;
            return if name.ends_with(".json") {
                MachineDescription::from_json_str(&content)
            } else {
                MachineDescription::from_toml_str(&content)
            };
        }
        Err(MachineError::MissingDescription {
            bundle: bundle_dir.to_path_buf(),
        })
    }

    /// Render the configuration for `bundle_dir` and write it to
    /// [`config_path`](Self::config_path).
    pub fn load(&self, bundle_dir: &Path) -> Result<MachineDescription, MachineError> {
        let description = Self::read_description(bundle_dir)?;
        let config = description.render(bundle_dir);

        let staging = self.config_path.with_extension("cfg.tmp");
        if let Err(err) = fs::write(&staging, config).and_then(|()| fs::rename(&staging, &self.config_path)) {
            let _ = fs::remove_file(&staging);
            return Err(err.into());
        }
        tracing::info!(
            bundle = %bundle_dir.display(),
            config = %self.config_path.display(),
            "machine config written"
        );
        Ok(description)
    }
}

impl Drop for MachineLoader {
    fn drop(&mut self) {
        // Best-effort cleanup.
        let _ = fs::remove_file(&self.config_path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle_with(name: &str, body: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(name), body).unwrap();
        dir
    }

    #[test]
    fn load_writes_and_drop_removes() {
        let bundle = bundle_with("machine.toml", "BIOS = \"bbl64.bin\"\nKernel = \"k.bin\"\n");
        let scratch = tempfile::tempdir().unwrap();

        let loader = MachineLoader::new(scratch.path());
        let description = loader.load(bundle.path()).unwrap();
        assert_eq!(description.kernel.as_deref(), Some("k.bin"));

        let path = loader.config_path().to_path_buf();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("bbl64.bin"));
        assert!(!scratch.path().join("temu.cfg.tmp").exists());

        drop(loader);
        assert!(!path.exists());
    }

    #[test]
    fn json_description_is_accepted() {
        let bundle = bundle_with("machine.json", r#"{"BIOS":"bios.bin","RootDrive":"root.bin"}"#);
        let description = MachineLoader::read_description(bundle.path()).unwrap();
        assert_eq!(description.root_drive.as_deref(), Some("root.bin"));
    }

    #[test]
    fn toml_wins_over_json() {
        let bundle = bundle_with("machine.toml", "BIOS = \"from-toml.bin\"\n");
        fs::write(bundle.path().join("machine.json"), r#"{"BIOS":"from-json.bin"}"#).unwrap();
        let description = MachineLoader::read_description(bundle.path()).unwrap();
        assert_eq!(description.bios, "from-toml.bin");
    }

    #[test]
    fn missing_description_is_reported() {
        let bundle = tempfile::tempdir().unwrap();
        let err = MachineLoader::read_description(bundle.path()).unwrap_err();
        assert!(matches!(err, MachineError::MissingDescription { .. }));
        assert!(err.to_string().contains("machine.toml"));
    }

    #[test]
    fn malformed_description_writes_nothing() {
        let bundle = bundle_with("machine.toml", "BIOS = [\n");
        let scratch = tempfile::tempdir().unwrap();
        let loader = MachineLoader::new(scratch.path());
        let err = loader.load(bundle.path()).unwrap_err();
        assert!(matches!(err, MachineError::InvalidDescription(_)));
        assert!(!loader.config_path().exists());
    }
}
