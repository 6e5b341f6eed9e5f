use super::elements::symbol_for_atomic_number;
use super::error::IoError;
use super::traits::{GeometryRecord, GeometrySource};
use std::io::BufRead;
use tracing::{debug, warn};

const FORMAT: &str = "Gaussian log";

const ORIENTATION_HEADERS: [&str; 2] = ["Input orientation:", "Standard orientation:"];
const CONVERGED_MARKERS: [&str; 2] = ["Optimization completed", "Stationary point found"];

/// Reads the optimized geometry from a Gaussian output (`.log`/`.out`) file.
///
/// Every `Input orientation` / `Standard orientation` table in the log is a
/// candidate geometry. The optimized one is the last table printed before an
/// `Optimization completed` marker. Logs without that marker are rejected
/// unless the reader was built with [`GaussianLog::last_geometry`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GaussianLog {
    accept_unconverged: bool,
}

/// Position inside an orientation table, counted by its dashed separators.
enum TableState {
    Outside,
    Header { separators: u8 },
    Rows,
}

impl GaussianLog {
    /// Reader that requires a converged optimization.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reader that falls back to the last printed geometry when the log
    /// reports no converged optimization (single points, aborted jobs).
    pub fn last_geometry() -> Self {
        Self {
            accept_unconverged: true,
        }
    }

    fn parse_row(line: &str, line_num: usize) -> Result<GeometryRecord, IoError> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        // Older versions omit the "Atomic Type" column.
        if fields.len() != 6 && fields.len() != 5 {
            return Err(IoError::parse(
                FORMAT,
                line_num,
                format!("expected 5 or 6 columns in orientation row, found {}", fields.len()),
            ));
        }
        let number: i32 = fields[1].parse().map_err(|_| {
            IoError::parse(FORMAT, line_num, format!("invalid atomic number '{}'", fields[1]))
        })?;
        let symbol = symbol_for_atomic_number(number).ok_or_else(|| {
            IoError::parse(FORMAT, line_num, format!("unknown atomic number {}", number))
        })?;

        let n = fields.len();
        let coord = |s: &str| -> Result<f64, IoError> {
            s.parse()
                .map_err(|_| IoError::parse(FORMAT, line_num, format!("invalid coordinate '{}'", s)))
        };
        Ok(GeometryRecord::new(
            symbol,
            coord(fields[n - 3])?,
            coord(fields[n - 2])?,
            coord(fields[n - 1])?,
        ))
    }
}

fn is_separator(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && trimmed.chars().all(|c| c == '-')
}

impl GeometrySource for GaussianLog {
    fn format_name(&self) -> &'static str {
        FORMAT
    }

    fn read_from(&self, reader: &mut dyn BufRead) -> Result<Vec<GeometryRecord>, IoError> {
        let mut state = TableState::Outside;
        let mut current: Vec<GeometryRecord> = Vec::new();
        let mut last_table: Option<Vec<GeometryRecord>> = None;
        let mut converged: Option<Vec<GeometryRecord>> = None;
        let mut tables_seen = 0usize;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            state = match state {
                TableState::Outside => {
                    if ORIENTATION_HEADERS.iter().any(|h| line.contains(h)) {
                        current.clear();
                        TableState::Header { separators: 0 }
                    } else {
                        if CONVERGED_MARKERS.iter().any(|m| line.contains(m)) {
                            if let Some(table) = &last_table {
                                debug!(line = line_num, atoms = table.len(), "Optimization converged.");
                                converged = Some(table.clone());
                            }
                        }
                        TableState::Outside
                    }
                }
                TableState::Header { separators } => {
                    if is_separator(&line) {
                        if separators + 1 == 2 {
                            TableState::Rows
                        } else {
                            TableState::Header {
                                separators: separators + 1,
                            }
                        }
                    } else {
                        TableState::Header { separators }
                    }
                }
                TableState::Rows => {
                    if is_separator(&line) {
                        tables_seen += 1;
                        last_table = Some(std::mem::take(&mut current));
                        TableState::Outside
                    } else {
                        current.push(Self::parse_row(&line, line_num)?);
                        TableState::Rows
                    }
                }
            };
        }

        if let Some(geometry) = converged {
            debug!(tables = tables_seen, atoms = geometry.len(), "Using converged geometry.");
            return Ok(geometry);
        }
        match last_table {
            Some(geometry) if self.accept_unconverged && !geometry.is_empty() => {
                warn!(
                    tables = tables_seen,
                    "No converged optimization found; using the last printed geometry."
                );
                Ok(geometry)
            }
            Some(_) if !self.accept_unconverged => Err(IoError::NotConverged),
            _ => Err(IoError::MissingGeometry(FORMAT)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn orientation(kind: &str, rows: &[(i32, f64, f64, f64)]) -> String {
        let mut s = String::new();
        s.push_str(&format!("                         {} orientation:\n", kind));
        s.push_str(" ---------------------------------------------------------------------\n");
        s.push_str(" Center     Atomic      Atomic             Coordinates (Angstroms)\n");
        s.push_str(" Number     Number       Type             X           Y           Z\n");
        s.push_str(" ---------------------------------------------------------------------\n");
        for (i, (z, x, y, zc)) in rows.iter().enumerate() {
            s.push_str(&format!(
                "    {:>3}    {:>6}           0    {:>12.6}{:>12.6}{:>12.6}\n",
                i + 1,
                z,
                x,
                y,
                zc
            ));
        }
        s.push_str(" ---------------------------------------------------------------------\n");
        s
    }

    fn read(log: &str, reader: GaussianLog) -> Result<Vec<GeometryRecord>, IoError> {
        reader.read_from(&mut Cursor::new(log.as_bytes()))
    }

    #[test]
    fn picks_last_table_before_convergence_marker() {
        let mut log = String::from(" Entering Gaussian System\n");
        log.push_str(&orientation("Input", &[(6, 0.0, 0.0, 0.0), (8, 0.0, 0.0, 1.3)]));
        log.push_str(" SCF Done:  E(RB3LYP) =  -113.3\n");
        log.push_str(&orientation("Standard", &[(6, 0.0, 0.0, -0.6), (8, 0.0, 0.0, 0.55)]));
        log.push_str("    Optimization completed.\n");
        log.push_str("       -- Stationary point found.\n");
        // Frequency step re-prints a geometry in another frame.
        log.push_str(&orientation("Input", &[(6, 9.0, 9.0, 9.0), (8, 9.0, 9.0, 10.0)]));

        let geometry = read(&log, GaussianLog::new()).unwrap();
        assert_eq!(
            geometry,
            vec![
                GeometryRecord::new("C", 0.0, 0.0, -0.6),
                GeometryRecord::new("O", 0.0, 0.0, 0.55),
            ]
        );
    }

    #[test]
    fn unconverged_log_is_rejected_by_default() {
        let log = orientation("Standard", &[(1, 0.0, 0.0, 0.0), (1, 0.0, 0.0, 0.74)]);
        assert!(matches!(read(&log, GaussianLog::new()), Err(IoError::NotConverged)));
    }

    #[test]
    fn last_geometry_mode_accepts_unconverged_log() {
        let mut log = orientation("Standard", &[(1, 0.0, 0.0, 0.0), (1, 0.0, 0.0, 0.80)]);
        log.push_str(&orientation("Standard", &[(1, 0.0, 0.0, 0.0), (1, 0.0, 0.0, 0.74)]));
        let geometry = read(&log, GaussianLog::last_geometry()).unwrap();
        assert_eq!(geometry[1], GeometryRecord::new("H", 0.0, 0.0, 0.74));
    }

    #[test]
    fn log_without_tables_reports_missing_geometry() {
        let log = " Entering Gaussian System\n Normal termination of Gaussian 16\n";
        assert!(matches!(
            read(log, GaussianLog::last_geometry()),
            Err(IoError::MissingGeometry(_))
        ));
        assert!(matches!(
            read(log, GaussianLog::new()),
            Err(IoError::MissingGeometry(_))
        ));
    }

    #[test]
    fn five_column_rows_are_accepted() {
        let log = "\
 Standard orientation:
 ----------------------------------------------------------
 Center     Atomic              Coordinates (Angstroms)
 Number     Number             X           Y           Z
 ----------------------------------------------------------
    1          7             0.000000    0.000000    0.109000
 ----------------------------------------------------------
 Optimization completed.
";
        let geometry = read(log, GaussianLog::new()).unwrap();
        assert_eq!(geometry, vec![GeometryRecord::new("N", 0.0, 0.0, 0.109)]);
    }

    #[test]
    fn malformed_row_reports_line_number() {
        let log = "\
 Standard orientation:
 ----------------------------------------------------------
 Center     Atomic      Atomic             Coordinates (Angstroms)
 Number     Number       Type             X           Y           Z
 ----------------------------------------------------------
    1          6           0        0.000000    abc    0.000000
 ----------------------------------------------------------
";
        match read(log, GaussianLog::new()) {
            Err(IoError::Parse { line, details, .. }) => {
                assert_eq!(line, 6);
                assert!(details.contains("abc"));
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn unknown_atomic_number_is_a_parse_error() {
        let log = orientation("Standard", &[(150, 0.0, 0.0, 0.0)]);
        assert!(matches!(
            read(&log, GaussianLog::last_geometry()),
            Err(IoError::Parse { .. })
        ));
    }
}
