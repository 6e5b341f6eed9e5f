use super::error::IoError;
use super::settings::JobSettings;
use super::traits::JobWriter;
use crate::core::models::atom::Atom;
use std::io::Write;

/// Writes Gaussian input decks (`.com`).
///
/// Layout: Link 0 commands, the route line, title, charge/multiplicity,
/// Cartesian coordinates, and the blank lines Gaussian needs to terminate
/// the molecule section.
#[derive(Debug, Clone, Copy, Default)]
pub struct GaussianInput;

impl JobWriter for GaussianInput {
    fn extension(&self) -> &'static str {
        "com"
    }

    fn write_to(
        &self,
        atoms: &[Atom],
        title: &str,
        settings: &JobSettings,
        writer: &mut dyn Write,
    ) -> Result<(), IoError> {
        writeln!(writer, "%chk={}.chk", title)?;
        writeln!(writer, "%nprocshared={}", settings.cores)?;
        writeln!(writer, "%mem={}", settings.memory)?;
        if settings.linda.trim() != "1" && !settings.linda.trim().is_empty() {
            writeln!(writer, "%nproclinda={}", settings.linda)?;
        }
        writeln!(
            writer,
            "# {} {}/{}",
            settings.job, settings.theory, settings.basis
        )?;
        writeln!(writer)?;
        writeln!(writer, "{}", title)?;
        writeln!(writer)?;
        writeln!(writer, "{} {}", settings.charge, settings.multiplicity)?;
        for atom in atoms {
            writeln!(writer, "{}", atom)?;
        }
        writeln!(writer)?;
        writeln!(writer)?;
        Ok(())
    }
}
