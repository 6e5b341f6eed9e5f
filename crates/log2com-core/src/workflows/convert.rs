use crate::core::bonding::perception::PerceptionConfig;
use crate::core::io::error::IoError;
use crate::core::io::gaussian_input::GaussianInput;
use crate::core::io::registry::SourceRegistry;
use crate::core::io::settings::JobSettings;
use crate::core::io::traits::JobWriter;
use crate::core::models::atom::Atom;
use crate::core::models::molecule::{Molecule, MoleculeError};
use crate::workflows::progress::ProgressReporter;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

const UNTITLED: &str = "untitled";

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Failed to read geometry from '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: IoError,
    },
    #[error("Failed to write job deck for '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: IoError,
    },
    #[error("Invalid molecule in '{path}': {source}")]
    Molecule {
        path: PathBuf,
        #[source]
        source: MoleculeError,
    },
    #[error("Failed to scan input '{path}': {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(
        "Deck '{output}' for '{path}' would overwrite the one written for '{first}'",
        output = output.display(),
        path = path.display(),
        first = first.display()
    )]
    OutputCollision {
        path: PathBuf,
        output: PathBuf,
        first: PathBuf,
    },
}

impl WorkflowError {
    pub fn path(&self) -> &Path {
        match self {
            Self::Read { path, .. }
            | Self::Write { path, .. }
            | Self::Molecule { path, .. }
            | Self::Scan { path, .. }
            | Self::OutputCollision { path, .. } => path,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConvertConfig {
    pub output_dir: PathBuf,
    pub settings: JobSettings,
    pub perception: PerceptionConfig,
}

impl ConvertConfig {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            settings: JobSettings::default(),
            perception: PerceptionConfig::default(),
        }
    }

    pub fn with_settings(mut self, settings: JobSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_perception(mut self, perception: PerceptionConfig) -> Self {
        self.perception = perception;
        self
    }

    /// Where the deck titled `title` is written.
    pub fn deck_path(&self, title: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", title, GaussianInput.extension()))
    }
}

/// Outcome of converting one input file.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertedFile {
    pub input: PathBuf,
    pub output: PathBuf,
    pub atom_count: usize,
    pub bond_count: usize,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub converted: Vec<ConvertedFile>,
    pub failed: Vec<WorkflowError>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.converted.len() + self.failed.len()
    }

    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Resolves `input` into the list of files to convert.
///
/// A file path is returned as-is. A directory yields every regular file
/// directly inside it whose extension matches `extension`
/// (case-insensitive), sorted by path.
///
/// # Errors
///
/// Returns [`WorkflowError::Scan`] if `input` does not exist or the
/// directory cannot be listed.
pub fn collect_inputs(input: &Path, extension: &str) -> Result<Vec<PathBuf>, WorkflowError> {
    let scan_err = |source| WorkflowError::Scan {
        path: input.to_path_buf(),
        source,
    };
    let metadata = fs::metadata(input).map_err(scan_err)?;
    if !metadata.is_dir() {
        return Ok(vec![input.to_path_buf()]);
    }

    let wanted = extension.trim_start_matches('.');
    let mut files = Vec::new();
    for entry in fs::read_dir(input).map_err(scan_err)? {
        let path = entry.map_err(scan_err)?.path();
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(wanted));
        if matches && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    debug!(dir = %input.display(), count = files.len(), "Collected input files.");
    Ok(files)
}

/// Deck title for an input path: its file stem.
pub fn title_for(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| UNTITLED.to_string())
}

/// Reads the geometry in `path` with the matching registered source and
/// builds a molecule titled after the file stem.
///
/// # Errors
///
/// Returns [`WorkflowError::Read`] if no source handles the extension or
/// parsing fails, and [`WorkflowError::Molecule`] if an atom is malformed.
pub fn load_molecule(path: &Path, registry: &SourceRegistry) -> Result<Molecule, WorkflowError> {
    let read_err = |source| WorkflowError::Read {
        path: path.to_path_buf(),
        source,
    };
    let source = registry.lookup(path).map_err(read_err)?;
    let records = source.read_from_path(path).map_err(read_err)?;
    debug!(
        file = %path.display(),
        format = source.format_name(),
        atoms = records.len(),
        "Parsed geometry."
    );

    let atoms: Vec<Atom> = records.iter().map(Atom::from).collect();
    Molecule::from_atoms(&title_for(path), &atoms).map_err(|source| WorkflowError::Molecule {
        path: path.to_path_buf(),
        source,
    })
}

/// Converts one geometry file into a Gaussian input deck in
/// `config.output_dir`.
///
/// # Errors
///
/// Any read, molecule, bond perception or write failure, tagged with the
/// input path.
#[instrument(skip_all, fields(file = %path.display()))]
pub fn convert_file(
    path: &Path,
    config: &ConvertConfig,
    registry: &SourceRegistry,
) -> Result<ConvertedFile, WorkflowError> {
    let mut molecule =
        load_molecule(path, registry)?.with_perception(config.perception);

    let bond_count = molecule
        .compute_bonds()
        .map_err(|source| WorkflowError::Molecule {
            path: path.to_path_buf(),
            source,
        })?
        .edge_count();

    let planned = config.deck_path(molecule.name());
    if planned.exists() {
        warn!(output = %planned.display(), "Overwriting an existing deck.");
    }
    let output = GaussianInput
        .write_to_dir(
            molecule.atoms(),
            molecule.name(),
            &config.output_dir,
            &config.settings,
        )
        .map_err(|source| WorkflowError::Write {
            path: path.to_path_buf(),
            source,
        })?;

    info!(
        output = %output.display(),
        atoms = molecule.len(),
        bonds = bond_count,
        "Wrote job deck."
    );
    Ok(ConvertedFile {
        input: path.to_path_buf(),
        output,
        atom_count: molecule.len(),
        bond_count,
    })
}

/// Converts every file in `inputs`. A failing file is recorded in the
/// report and the batch moves on.
///
/// Two inputs that map to the same deck name (compared case-insensitively)
/// would overwrite each other; the later one fails with
/// [`WorkflowError::OutputCollision`] and the first deck is kept.
#[instrument(skip_all, name = "convert_workflow", fields(files = inputs.len()))]
pub fn run(
    inputs: &[PathBuf],
    config: &ConvertConfig,
    registry: &SourceRegistry,
    reporter: &ProgressReporter,
) -> BatchReport {
    reporter.batch_started(inputs.len());

    let mut report = BatchReport::default();
    let mut written: HashMap<String, PathBuf> = HashMap::new();
    for path in inputs {
        reporter.file_started(path);

        let deck_key = title_for(path).to_lowercase();
        let result = match written.get(&deck_key) {
            Some(first) => Err(WorkflowError::OutputCollision {
                path: path.clone(),
                output: config.deck_path(&title_for(path)),
                first: first.clone(),
            }),
            None => convert_file(path, config, registry),
        };

        match result {
            Ok(converted) => {
                reporter.file_converted(path, &converted.output, converted.bond_count);
                written.insert(deck_key, path.clone());
                report.converted.push(converted);
            }
            Err(e) => {
                warn!("{}", e);
                reporter.file_failed(path, &e);
                report.failed.push(e);
            }
        }
    }

    reporter.batch_finished(report.converted.len(), report.failed.len());
    info!(
        converted = report.converted.len(),
        failed = report.failed.len(),
        "Batch conversion finished."
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::progress::Progress;
    use std::sync::{Arc, Mutex};
    use tempfile::tempdir;

    const WATER_XYZ: &str = "3\nwater\nO 0.0 0.0 0.117\nH 0.0 0.757 -0.467\nH 0.0 -0.757 -0.467\n";

    const METHANE_LOG: &str = "\
 Entering Gaussian System
                         Standard orientation:
 ---------------------------------------------------------------------
 Center     Atomic      Atomic             Coordinates (Angstroms)
 Number     Number       Type             X           Y           Z
 ---------------------------------------------------------------------
      1          6           0        0.000000    0.000000    0.000000
      2          1           0        0.629118    0.629118    0.629118
      3          1           0       -0.629118   -0.629118    0.629118
      4          1           0       -0.629118    0.629118   -0.629118
      5          1           0        0.629118   -0.629118   -0.629118
 ---------------------------------------------------------------------
    Optimization completed.
 Normal termination of Gaussian 16
";

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn converts_gaussian_log_to_com_deck() {
        let input_dir = tempdir().unwrap();
        let output_dir = tempdir().unwrap();
        let log = write(input_dir.path(), "methane.log", METHANE_LOG);
        let config = ConvertConfig::new(output_dir.path());

        let converted = convert_file(&log, &config, &SourceRegistry::default()).unwrap();

        assert_eq!(converted.output, output_dir.path().join("methane.com"));
        assert_eq!(converted.atom_count, 5);
        assert_eq!(converted.bond_count, 4);
        let deck = fs::read_to_string(&converted.output).unwrap();
        assert!(deck.starts_with("%chk=methane.chk\n"));
        assert!(deck.contains("# Opt Freq B3LYP/6-311G(2df,2p)\n"));
        assert!(deck.contains("\n0 1\nC       0.000000      0.000000      0.000000\n"));
    }

    #[test]
    fn settings_flow_into_deck() {
        let input_dir = tempdir().unwrap();
        let output_dir = tempdir().unwrap();
        let xyz = write(input_dir.path(), "water.xyz", WATER_XYZ);
        let mut settings = JobSettings::default();
        settings.set("charge", "-1").unwrap();
        settings.set("mul", "2").unwrap();
        let config = ConvertConfig::new(output_dir.path()).with_settings(settings);

        let converted = convert_file(&xyz, &config, &SourceRegistry::default()).unwrap();

        assert_eq!(converted.bond_count, 2);
        let deck = fs::read_to_string(converted.output).unwrap();
        assert!(deck.contains("\n-1 2\n"));
    }

    #[test]
    fn load_molecule_titles_by_file_stem() {
        let dir = tempdir().unwrap();
        let xyz = write(dir.path(), "h2o-opt.xyz", WATER_XYZ);
        let molecule = load_molecule(&xyz, &SourceRegistry::default()).unwrap();
        assert_eq!(molecule.name(), "h2o-opt");
        assert_eq!(molecule.len(), 3);
    }

    #[test]
    fn unsupported_extension_is_a_read_error() {
        let dir = tempdir().unwrap();
        let path = write(dir.path(), "water.pdb", WATER_XYZ);
        let err = load_molecule(&path, &SourceRegistry::default()).unwrap_err();
        assert!(matches!(
            &err,
            WorkflowError::Read { source: IoError::UnsupportedExtension(ext), .. } if ext == "pdb"
        ));
        assert_eq!(err.path(), path.as_path());
    }

    #[test]
    fn collect_inputs_filters_and_sorts_directory() {
        let dir = tempdir().unwrap();
        write(dir.path(), "b.log", METHANE_LOG);
        write(dir.path(), "a.LOG", METHANE_LOG);
        write(dir.path(), "notes.txt", "");
        fs::create_dir(dir.path().join("nested.log")).unwrap();

        let files = collect_inputs(dir.path(), "log").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.LOG", "b.log"]);
    }

    #[test]
    fn collect_inputs_passes_single_file_through() {
        let dir = tempdir().unwrap();
        let file = write(dir.path(), "water.xyz", WATER_XYZ);
        assert_eq!(collect_inputs(&file, "log").unwrap(), vec![file]);
    }

    #[test]
    fn collect_inputs_reports_missing_path() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            collect_inputs(&missing, "log"),
            Err(WorkflowError::Scan { .. })
        ));
    }

    #[test]
    fn batch_continues_past_failures_and_reports_progress() {
        let input_dir = tempdir().unwrap();
        let output_dir = tempdir().unwrap();
        let good = write(input_dir.path(), "methane.log", METHANE_LOG);
        let unconverged = write(
            input_dir.path(),
            "aborted.log",
            " Entering Gaussian System\n Error termination\n",
        );
        let water = write(input_dir.path(), "water.xyz", WATER_XYZ);
        let inputs = vec![unconverged.clone(), good, water];

        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let reporter = ProgressReporter::with_callback(Box::new(move |event| {
            sink.lock().unwrap().push(event);
        }));

        let config = ConvertConfig::new(output_dir.path());
        let report = run(&inputs, &config, &SourceRegistry::default(), &reporter);

        assert_eq!(report.total(), 3);
        assert_eq!(report.converted.len(), 2);
        assert!(!report.is_complete_success());
        assert_eq!(report.failed[0].path(), unconverged.as_path());
        assert!(output_dir.path().join("methane.com").exists());
        assert!(output_dir.path().join("water.com").exists());

        let events = events.lock().unwrap();
        let started = events
            .iter()
            .filter(|e| matches!(e, Progress::FileStarted { .. }))
            .count();
        assert_eq!(started, 3);
        assert_eq!(events.first(), Some(&Progress::BatchStarted { total_files: 3 }));
        assert!(events.iter().any(|e| matches!(
            e,
            Progress::FileFailed { path, .. } if path == &unconverged
        )));
        assert!(events.iter().any(|e| matches!(
            e,
            Progress::FileConverted { output, bonds: 4, .. } if output.ends_with("methane.com")
        )));
        assert_eq!(
            events.last(),
            Some(&Progress::BatchFinished {
                converted: 2,
                failed: 1
            })
        );
    }

    #[test]
    fn decks_with_the_same_name_are_not_overwritten() {
        let input_dir = tempdir().unwrap();
        let output_dir = tempdir().unwrap();
        let upper = write(input_dir.path(), "h2.XYZ", "2\nfirst\nH 0 0 0\nH 0 0 0.74\n");
        let lower = write(input_dir.path(), "H2.xyz", "2\nsecond\nH 0 0 0\nH 0 0 0.80\n");
        let inputs = vec![upper.clone(), lower.clone()];

        let config = ConvertConfig::new(output_dir.path());
        let report = run(
            &inputs,
            &config,
            &SourceRegistry::default(),
            &ProgressReporter::silent(),
        );

        assert_eq!(report.converted.len(), 1);
        assert_eq!(report.converted[0].input, upper);
        match &report.failed[..] {
            [WorkflowError::OutputCollision { path, first, .. }] => {
                assert_eq!(path, &lower);
                assert_eq!(first, &upper);
            }
            other => panic!("expected one collision, got {:?}", other),
        }
        let deck = fs::read_to_string(output_dir.path().join("h2.com")).unwrap();
        assert!(deck.contains("0.740000"));
    }

    #[test]
    fn failed_input_does_not_reserve_its_deck_name() {
        let first_dir = tempdir().unwrap();
        let second_dir = tempdir().unwrap();
        let output_dir = tempdir().unwrap();
        let broken = write(first_dir.path(), "h2.xyz", "two\n\n");
        let good = write(second_dir.path(), "h2.xyz", "2\n\nH 0 0 0\nH 0 0 0.74\n");

        let config = ConvertConfig::new(output_dir.path());
        let report = run(
            &[broken, good.clone()],
            &config,
            &SourceRegistry::default(),
            &ProgressReporter::silent(),
        );

        assert_eq!(report.converted.len(), 1);
        assert_eq!(report.converted[0].input, good);
        assert!(matches!(report.failed[..], [WorkflowError::Read { .. }]));
    }

    #[test]
    fn strict_perception_failure_is_a_molecule_error() {
        let input_dir = tempdir().unwrap();
        let output_dir = tempdir().unwrap();
        let xyz = write(input_dir.path(), "ghost.xyz", "2\n\nC 0 0 0\nQq 0 0 1\n");
        let config =
            ConvertConfig::new(output_dir.path()).with_perception(PerceptionConfig::default().strict());

        let err = convert_file(&xyz, &config, &SourceRegistry::default()).unwrap_err();
        assert!(matches!(err, WorkflowError::Molecule { .. }));
        assert!(!output_dir.path().join("ghost.com").exists());
    }
}
