use super::error::IoError;
use super::settings::JobSettings;
use crate::core::models::atom::Atom;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// One parsed `(symbol, x, y, z)` line of a geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryRecord {
    pub symbol: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl GeometryRecord {
    pub fn new(symbol: &str, x: f64, y: f64, z: f64) -> Self {
        Self {
            symbol: symbol.to_string(),
            x,
            y,
            z,
        }
    }
}

impl From<&GeometryRecord> for Atom {
    fn from(record: &GeometryRecord) -> Self {
        Atom::from_record(&record.symbol, record.x, record.y, record.z)
    }
}

/// A file format that yields one molecular geometry.
///
/// Sources are looked up at runtime by file extension, so the trait works on
/// `&self` and trait-object readers.
pub trait GeometrySource {
    /// Short human-readable format name used in logs and error messages.
    fn format_name(&self) -> &'static str;

    /// Parses a single geometry from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if the data is malformed, holds no geometry, or the
    /// underlying reader fails.
    fn read_from(&self, reader: &mut dyn BufRead) -> Result<Vec<GeometryRecord>, IoError>;

    /// Parses a single geometry from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path(&self, path: &Path) -> Result<Vec<GeometryRecord>, IoError> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        self.read_from(&mut reader)
    }
}

/// A job-deck format that renders atoms and settings into an input file.
pub trait JobWriter {
    /// File extension (without the dot) for decks produced by this writer.
    fn extension(&self) -> &'static str;

    /// Writes a deck for `atoms` to `writer`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_to(
        &self,
        atoms: &[Atom],
        title: &str,
        settings: &JobSettings,
        writer: &mut dyn Write,
    ) -> Result<(), IoError>;

    /// Writes `<output_dir>/<title>.<extension>`, creating the directory if
    /// needed, and returns the path written.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be created or writing fails.
    fn write_to_dir(
        &self,
        atoms: &[Atom],
        title: &str,
        output_dir: &Path,
        settings: &JobSettings,
    ) -> Result<PathBuf, IoError> {
        fs::create_dir_all(output_dir)?;
        let path = output_dir.join(format!("{}.{}", title, self.extension()));
        let file = File::create(&path)?;
        let mut writer = BufWriter::new(file);
        self.write_to(atoms, title, settings, &mut writer)?;
        writer.flush()?;
        Ok(path)
    }
}
