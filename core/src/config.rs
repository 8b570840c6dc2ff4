//! Generator configuration.
//!
//! A small YAML file that records how a table should be generated, so build
//! scripts can check it in next to the record file instead of repeating
//! command-line flags.
//!
//! # Example YAML
//!
//! ```yaml
//! mode: definitions
//! input: options.json
//! output: Options.inc
//! ```

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::emit::EmitMode;
use crate::error::Result;

/// Settings for one generation run.
///
/// # Examples
///
/// ```
/// use opt_table_core::{EmitMode, GeneratorConfig};
///
/// let config: GeneratorConfig = serde_yaml::from_str("mode: table\n").unwrap();
/// assert_eq!(config.mode, EmitMode::Table);
/// assert!(config.input.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Artifact to produce.
    #[serde(default)]
    pub mode: EmitMode,
    /// Record file to read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<PathBuf>,
    /// Destination file; standard output when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

impl GeneratorConfig {
    /// Loads configuration from a YAML file.
    ///
    /// Relative `input` and `output` paths are resolved against the
    /// directory containing the configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::TableGenError::Io) if the file cannot be read,
    /// or [`Yaml`](crate::TableGenError::Yaml) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let mut config: Self = serde_yaml::from_reader(reader)?;

        if let Some(base) = path.parent() {
            config.input = config.input.map(|p| base.join(p));
            config.output = config.output.map(|p| base.join(p));
        }
        Ok(config)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Applies command-line overrides; `Some` values win.
    pub fn with_overrides(
        mut self,
        mode: Option<EmitMode>,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
    ) -> Self {
        if let Some(mode) = mode {
            self.mode = mode;
        }
        if input.is_some() {
            self.input = input;
        }
        if output.is_some() {
            self.output = output;
        }
        self
    }
}
