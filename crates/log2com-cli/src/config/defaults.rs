use log2com::core::bonding::perception::PerceptionConfig;
use log2com::core::io::settings::JobSettings;
use serde::Serialize;

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct InputDefaults {
    pub extension: String,
    pub allow_unconverged: bool,
}

impl Default for InputDefaults {
    fn default() -> Self {
        Self {
            extension: "log".to_string(),
            allow_unconverged: false,
        }
    }
}

/// Values used when neither the command line nor the config file set them.
///
/// Serializes to a complete config file, which is what `log2com defaults`
/// prints.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct DefaultsConfig {
    pub input: InputDefaults,
    pub job: JobSettings,
    pub bonds: PerceptionConfig,
}

impl DefaultsConfig {
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }
}
