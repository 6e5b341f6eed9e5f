use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use crate::cli::ConvertArgs;
use crate::error::{CliError, Result};
use log2com::core::bonding::perception::PerceptionConfig;
use log2com::core::io::settings::JobSettings;
use log2com::workflows::convert::ConvertConfig;
use serde::de::value::{Error as DeError, StrDeserializer};
use serde::de::{DeserializeOwned, IntoDeserializer};
use std::path::PathBuf;
use tracing::debug;

/// Fully resolved settings for one `convert` invocation.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub input: PathBuf,
    pub extension: String,
    pub allow_unconverged: bool,
    pub convert: ConvertConfig,
}

/// Merges, highest precedence first: command-line flags, `-S` overrides,
/// the config file, built-in defaults.
pub fn build_config(args: &ConvertArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let input_file = file_config.input.take().unwrap_or_default();
    let extension = args
        .extension
        .clone()
        .or(input_file.extension)
        .unwrap_or(defaults.input.extension);
    let allow_unconverged = args.allow_unconverged
        || input_file
            .allow_unconverged
            .unwrap_or(defaults.input.allow_unconverged);

    let settings = merge_job_settings(defaults.job, &file_config, args)?;
    let perception = merge_perception(defaults.bonds, &file_config, args)?;

    debug!(?settings, ?perception, %extension, allow_unconverged, "Resolved configuration.");

    Ok(AppConfig {
        input: args.input.clone(),
        extension,
        allow_unconverged,
        convert: ConvertConfig::new(&args.output)
            .with_settings(settings)
            .with_perception(perception),
    })
}

fn merge_job_settings(
    mut settings: JobSettings,
    file_config: &FileConfig,
    args: &ConvertArgs,
) -> Result<JobSettings> {
    if let Some(job) = &file_config.job {
        for (key, value) in job.entries() {
            settings.set(key, value)?;
        }
    }

    let cli_values = [
        ("charge", &args.charge),
        ("multiplicity", &args.multiplicity),
        ("job", &args.job),
        ("theory", &args.theory),
        ("basis", &args.basis),
        ("cores", &args.cores),
        ("memory", &args.memory),
        ("linda", &args.linda),
    ];
    for (key, value) in cli_values {
        if let Some(value) = value {
            settings.set(key, value)?;
        }
    }
    Ok(settings)
}

fn merge_perception(
    defaults: PerceptionConfig,
    file_config: &FileConfig,
    args: &ConvertArgs,
) -> Result<PerceptionConfig> {
    let bonds = file_config.bonds.clone().unwrap_or_default();
    let tolerance = args
        .tolerance
        .or(bonds.tolerance)
        .unwrap_or(defaults.tolerance);
    if !(tolerance.is_finite() && tolerance > 0.0) {
        return Err(CliError::Config(format!(
            "Bond tolerance must be a positive number, got {}",
            tolerance
        )));
    }

    Ok(PerceptionConfig {
        tolerance,
        unknown_elements: bonds.unknown_elements.unwrap_or(defaults.unknown_elements),
        search: bonds.search.unwrap_or(defaults.search),
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    if set_values.is_empty() {
        return Ok(config);
    }
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };
        let key = key.trim();
        let value_str = value_str.trim();

        match key {
            "input.extension" => {
                config.input.get_or_insert_with(Default::default).extension =
                    Some(value_str.to_string());
            }
            "input.allow-unconverged" => {
                config
                    .input
                    .get_or_insert_with(Default::default)
                    .allow_unconverged = Some(value_str.parse().map_err(|_| {
                    CliError::Config(format!("Invalid boolean value for {}: {}", key, value_str))
                })?);
            }
            "bonds.tolerance" => {
                config.bonds.get_or_insert_with(Default::default).tolerance =
                    Some(value_str.parse().map_err(|_| {
                        CliError::Config(format!("Invalid float value for {}: {}", key, value_str))
                    })?);
            }
            "bonds.unknown-elements" => {
                config
                    .bonds
                    .get_or_insert_with(Default::default)
                    .unknown_elements = Some(parse_enum(key, value_str)?);
            }
            "bonds.search" => {
                config.bonds.get_or_insert_with(Default::default).search =
                    Some(parse_enum(key, value_str)?);
            }
            _ => {
                let job_key = key.strip_prefix("job.").unwrap_or(key);
                let slot = config
                    .job
                    .get_or_insert_with(Default::default)
                    .slot_mut(job_key)
                    .ok_or_else(|| {
                        CliError::Config(format!(
                            "Unsupported configuration key for --set: '{}'",
                            key
                        ))
                    })?;
                *slot = Some(value_str.to_string());
            }
        }
    }
    Ok(config)
}

/// Parses a kebab-case enum value the same way the config file does.
fn parse_enum<T: DeserializeOwned>(key: &str, value: &str) -> Result<T> {
    let de: StrDeserializer<'_, DeError> = value.into_deserializer();
    T::deserialize(de)
        .map_err(|_| CliError::Config(format!("Invalid value for {}: {}", key, value)))
}
