use super::elements::symbol_for_atomic_number;
use super::error::IoError;
use super::traits::{GeometryRecord, GeometrySource};
use std::io::BufRead;
use tracing::debug;

const FORMAT: &str = "XYZ";

/// Reads the plain XYZ format: an atom count, a comment line, then one
/// `symbol x y z` row per atom.
///
/// Multi-frame files (optimization trajectories) are accepted and the last
/// frame is returned. Numeric symbols are read as atomic numbers.
#[derive(Debug, Clone, Copy, Default)]
pub struct XyzFile;

impl XyzFile {
    fn parse_row(line: &str, line_num: usize) -> Result<GeometryRecord, IoError> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 4 {
            return Err(IoError::parse(
                FORMAT,
                line_num,
                format!("expected 'symbol x y z', found '{}'", line.trim()),
            ));
        }
        let symbol = match fields[0].parse::<i32>() {
            Ok(number) => symbol_for_atomic_number(number).ok_or_else(|| {
                IoError::parse(FORMAT, line_num, format!("unknown atomic number {}", number))
            })?,
            Err(_) => fields[0],
        };
        let coord = |s: &str| -> Result<f64, IoError> {
            s.parse()
                .map_err(|_| IoError::parse(FORMAT, line_num, format!("invalid coordinate '{}'", s)))
        };
        Ok(GeometryRecord::new(
            symbol,
            coord(fields[1])?,
            coord(fields[2])?,
            coord(fields[3])?,
        ))
    }
}

impl GeometrySource for XyzFile {
    fn format_name(&self) -> &'static str {
        FORMAT
    }

    fn read_from(&self, reader: &mut dyn BufRead) -> Result<Vec<GeometryRecord>, IoError> {
        let mut lines = reader
            .lines()
            .enumerate()
            .map(|(i, l)| l.map(|content| (i + 1, content)));
        let mut last_frame: Option<Vec<GeometryRecord>> = None;
        let mut frames = 0usize;

        while let Some(next) = lines.next() {
            let (line_num, count_line) = next?;
            if count_line.trim().is_empty() {
                continue;
            }
            let count: usize = count_line.trim().parse().map_err(|_| {
                IoError::parse(
                    FORMAT,
                    line_num,
                    format!("invalid atom count '{}'", count_line.trim()),
                )
            })?;

            if lines.next().transpose()?.is_none() {
                return Err(IoError::parse(FORMAT, line_num + 1, "missing comment line"));
            }

            let mut frame = Vec::new();
            for found in 0..count {
                let Some((row_num, row)) = lines.next().transpose()? else {
                    return Err(IoError::parse(
                        FORMAT,
                        line_num + 1 + found,
                        format!("expected {} atoms, found {}", count, found),
                    ));
                };
                frame.push(Self::parse_row(&row, row_num)?);
            }
            frames += 1;
            last_frame = Some(frame);
        }

        debug!(frames, "Read XYZ frames.");
        match last_frame {
            Some(frame) if !frame.is_empty() => Ok(frame),
            _ => Err(IoError::MissingGeometry(FORMAT)),
        }
    }
}
