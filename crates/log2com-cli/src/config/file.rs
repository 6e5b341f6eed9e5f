use crate::error::{CliError, Result};
use log2com::core::bonding::perception::UnknownElementPolicy;
use log2com::core::bonding::search::SearchStrategy;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileInputConfig {
    pub extension: Option<String>,
    pub allow_unconverged: Option<bool>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileJobConfig {
    pub charge: Option<String>,
    #[serde(alias = "mul")]
    pub multiplicity: Option<String>,
    pub job: Option<String>,
    pub theory: Option<String>,
    pub basis: Option<String>,
    pub cores: Option<String>,
    pub memory: Option<String>,
    pub linda: Option<String>,
}

impl FileJobConfig {
    /// Present values as `(key, value)` pairs accepted by `JobSettings::set`.
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        [
            ("charge", &self.charge),
            ("multiplicity", &self.multiplicity),
            ("job", &self.job),
            ("theory", &self.theory),
            ("basis", &self.basis),
            ("cores", &self.cores),
            ("memory", &self.memory),
            ("linda", &self.linda),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_deref().map(|v| (key, v)))
        .collect()
    }

    pub fn slot_mut(&mut self, key: &str) -> Option<&mut Option<String>> {
        match key {
            "charge" => Some(&mut self.charge),
            "mul" | "multiplicity" => Some(&mut self.multiplicity),
            "job" => Some(&mut self.job),
            "theory" => Some(&mut self.theory),
            "basis" => Some(&mut self.basis),
            "cores" => Some(&mut self.cores),
            "memory" => Some(&mut self.memory),
            "linda" => Some(&mut self.linda),
            _ => None,
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileBondsConfig {
    pub tolerance: Option<f64>,
    pub unknown_elements: Option<UnknownElementPolicy>,
    pub search: Option<SearchStrategy>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub input: Option<FileInputConfig>,
    pub job: Option<FileJobConfig>,
    pub bonds: Option<FileBondsConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
