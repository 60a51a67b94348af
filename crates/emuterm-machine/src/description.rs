#![forbid(unsafe_code)]

//! The machine description shipped in a bundle, and the emulator config
//! rendered from it.

use std::fmt::Write as _;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::MachineError;

/// Guest architecture the emulator is configured for.
pub const MACHINE: &str = "riscv64";

/// Guest RAM in MiB.
pub const MEMORY_SIZE_MIB: u32 = 128;

/// Which images to boot, relative to the bundle directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineDescription {
    #[serde(rename = "BIOS")]
    pub bios: String,
    #[serde(rename = "Kernel", default, skip_serializing_if = "Option::is_none")]
    pub kernel: Option<String>,
    #[serde(
        rename = "KernelCommandLine",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub kernel_command_line: Option<String>,
    #[serde(rename = "RootDrive", default, skip_serializing_if = "Option::is_none")]
    pub root_drive: Option<String>,
}

impl MachineDescription {
    /// Parse a TOML description.
    pub fn from_toml_str(s: &str) -> Result<Self, MachineError> {
        let description: Self =
            toml::from_str(s).map_err(|err| MachineError::InvalidDescription(err.to_string()))?;
        description.validate()?;
        Ok(description)
    }

    /// Parse a JSON description.
    pub fn from_json_str(s: &str) -> Result<Self, MachineError> {
        let description: Self = serde_json::from_str(s)
            .map_err(|err| MachineError::InvalidDescription(err.to_string()))?;
        description.validate()?;
        Ok(description)
    }

    fn validate(&self) -> Result<(), MachineError> {
        if self.bios.trim().is_empty() {
            return Err(MachineError::InvalidDescription(
                "BIOS must name an image".to_string(),
            ));
        }
        Ok(())
    }

    /// Render the emulator configuration, with image paths under `bundle_dir`.
    #[must_use]
    pub fn render(&self, bundle_dir: &Path) -> String {
        let image = |name: &str| quote(&bundle_dir.join(name).to_string_lossy());

        let mut config = String::new();
        config.push_str("{\n");
        let _ = writeln!(config, "    version: 1,");
        let _ = writeln!(config, "    machine: {},", quote(MACHINE));
        let _ = writeln!(config, "    memory_size: {MEMORY_SIZE_MIB},");
        let _ = writeln!(config, "    bios: {},", image(&self.bios));
        if let Some(kernel) = &self.kernel {
            let _ = writeln!(config, "    kernel: {},", image(kernel));
        }
        if let Some(cmdline) = &self.kernel_command_line {
            let _ = writeln!(config, "    cmdline: {},", quote(cmdline));
        }
        if let Some(drive) = &self.root_drive {
            let _ = writeln!(config, "    drive0: {{ file: {} }},", image(drive));
        }
        let _ = writeln!(config, "    eth0: {{ driver: \"user\" }},");
        config.push('}');
        config
    }
}

/// Double-quoted string literal with `"` and `\` escaped.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        if matches!(ch, '"' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');
    out
}
