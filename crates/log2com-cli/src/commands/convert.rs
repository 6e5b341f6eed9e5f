use crate::cli::ConvertArgs;
use crate::config::build_config;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use log2com::core::io::registry::SourceRegistry;
use log2com::workflows::{self, progress::ProgressReporter};
use tracing::{error, info, warn};

pub fn run(args: ConvertArgs) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let config = build_config(&args)?;

    let inputs = workflows::convert::collect_inputs(&config.input, &config.extension)?;
    if inputs.is_empty() {
        return Err(CliError::Argument(format!(
            "No '.{}' files found in {}",
            config.extension,
            config.input.display()
        )));
    }
    info!(
        "Found {} input file(s); writing decks to {}",
        inputs.len(),
        config.convert.output_dir.display()
    );

    let registry = SourceRegistry::with_defaults(config.allow_unconverged);
    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let report = workflows::convert::run(&inputs, &config.convert, &registry, &reporter);

    for failure in &report.failed {
        error!("{}", failure);
    }

    if report.converted.is_empty() {
        return Err(CliError::Argument(format!(
            "None of the {} input file(s) could be converted",
            report.total()
        )));
    }

    if report.is_complete_success() {
        println!(
            "Converted {} file(s) into {}",
            report.converted.len(),
            config.convert.output_dir.display()
        );
    } else {
        warn!("{} file(s) failed to convert.", report.failed.len());
        println!(
            "Converted {} of {} file(s) into {}; {} failed:",
            report.converted.len(),
            report.total(),
            config.convert.output_dir.display(),
            report.failed.len()
        );
        for failure in &report.failed {
            println!("  {}", failure.path().display());
        }
    }
    Ok(())
}
