//! Compiler configuration.
//!
//! `CompilerConfig` is the compiler surface spec.md §6 enumerates: the one
//! documented option (`debug_comments`) plus the CLI-level convenience of an
//! output path. Mirrors the teacher's `CompilerConfig` in shape (a small
//! builder-style struct, loadable from a TOML file), scaled down to the one
//! knob this backend actually has.

use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct CompilerConfig {
    /// Emit the header banner, per-operator origin comments, and epilogue
    /// commentary (spec.md §6 "Configuration options"). Never affects
    /// generated code semantics.
    pub debug_comments: bool,
    /// Ambient CLI convenience, not a semantic option: where `staqc build`
    /// writes its assembly output. `None` means stdout.
    pub output_path: Option<PathBuf>,
}

impl CompilerConfig {
    pub fn new() -> Self {
        CompilerConfig::default()
    }

    pub fn with_debug_comments(mut self, enabled: bool) -> Self {
        self.debug_comments = enabled;
        self
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Loads a config from a TOML file, for pinning `debug_comments` on
    /// scripted/CI invocations without a CLI flag. Only `debug_comments` is
    /// recognized on disk; `output_path` is always a CLI-time concern.
    pub fn from_toml_file(path: &Path) -> Result<Self, String> {
        let text = fs::read_to_string(path)
            .map_err(|e| format!("failed to read config file '{}': {e}", path.display()))?;
        let parsed: TomlConfig = toml::from_str(&text)
            .map_err(|e| format!("failed to parse config file '{}': {e}", path.display()))?;
        Ok(CompilerConfig {
            debug_comments: parsed.debug_comments.unwrap_or(false),
            output_path: None,
        })
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct TomlConfig {
    #[serde(default)]
    debug_comments: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_debug_comments_disabled() {
        assert!(!CompilerConfig::new().debug_comments);
    }

    #[test]
    fn builder_methods_set_fields() {
        let config = CompilerConfig::new()
            .with_debug_comments(true)
            .with_output_path("out.s");
        assert!(config.debug_comments);
        assert_eq!(config.output_path, Some(PathBuf::from("out.s")));
    }

    #[test]
    fn loads_debug_comments_from_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("staqc.toml");
        fs::write(&path, "debug_comments = true\n").expect("write config");
        let config = CompilerConfig::from_toml_file(&path).expect("parses");
        assert!(config.debug_comments);
    }
}
