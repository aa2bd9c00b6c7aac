//! Persistence of envelopes, reference intervals and sweep results
//!
//! Every artifact kind goes through the narrow [`ArtifactStore`] interface so
//! callers never depend on a concrete file format.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::core::signal::{validate_intervals, Interval};
use crate::core::sweep::{PrPoint, ThresholdSweep};
use crate::error::{StorageError, StorageResult};

/// Read and write one kind of artifact
pub trait ArtifactStore<T> {
    fn read(&self, path: &Path) -> StorageResult<T>;
    fn write(&self, path: &Path, value: &T) -> StorageResult<()>;
}

/// Pretty-printed JSON for any serde type
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonStore;

impl<T: Serialize + DeserializeOwned> ArtifactStore<T> for JsonStore {
    fn read(&self, path: &Path) -> StorageResult<T> {
        let text = read_text(path)?;
        serde_json::from_str(&text).map_err(|source| StorageError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    fn write(&self, path: &Path, value: &T) -> StorageResult<()> {
        let file = create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, value).map_err(|source| StorageError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        writer.flush().map_err(|source| io_error(path, source))
    }
}

/// Reference intervals as `start,stop` lines.
///
/// Columns may be separated by a comma or whitespace. Blank lines and lines
/// starting with `#` are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntervalCsvStore;

impl ArtifactStore<Vec<Interval>> for IntervalCsvStore {
    fn read(&self, path: &Path) -> StorageResult<Vec<Interval>> {
        let text = read_text(path)?;
        let intervals: Vec<Interval> = parse_rows(path, &text, &["start", "stop"], None)?
            .into_iter()
            .map(|(_, row)| Interval {
                start: row[0],
                stop: row[1],
            })
            .collect();

        validate_intervals(&intervals).map_err(|source| StorageError::Invalid {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(intervals)
    }

    fn write(&self, path: &Path, value: &Vec<Interval>) -> StorageResult<()> {
        let mut out = String::from("# start,stop (seconds)\n");
        for interval in value {
            out.push_str(&format!("{},{}\n", interval.start, interval.stop));
        }
        write_text(path, &out)
    }
}

/// `threshold,precision,recall` curve of a sweep, for plotting.
///
/// Points are stored in descending threshold order, as [`ThresholdSweep::pr_curve`]
/// returns them. Reading checks that order and that precision and recall lie
/// in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrCurveCsvStore;

const PR_CURVE_HEADER: &str = "threshold,precision,recall";

impl PrCurveCsvStore {
    pub fn format(points: &[PrPoint]) -> String {
        let mut out = format!("{}\n", PR_CURVE_HEADER);
        for p in points {
            out.push_str(&format!("{},{},{}\n", p.threshold, p.precision, p.recall));
        }
        out
    }
}

impl ArtifactStore<Vec<PrPoint>> for PrCurveCsvStore {
    fn read(&self, path: &Path) -> StorageResult<Vec<PrPoint>> {
        let text = read_text(path)?;
        let rows = parse_rows(
            path,
            &text,
            &["threshold", "precision", "recall"],
            Some(PR_CURVE_HEADER),
        )?;

        let mut points: Vec<PrPoint> = Vec::with_capacity(rows.len());
        for (line, row) in rows {
            let point = PrPoint {
                threshold: row[0],
                precision: row[1],
                recall: row[2],
            };
            let reason = if !(0.0..=1.0).contains(&point.precision) {
                Some(format!("precision {} outside [0, 1]", point.precision))
            } else if !(0.0..=1.0).contains(&point.recall) {
                Some(format!("recall {} outside [0, 1]", point.recall))
            } else {
                points
                    .last()
                    .filter(|prev| prev.threshold <= point.threshold)
                    .map(|prev| {
                        format!(
                            "threshold {} does not descend from {}",
                            point.threshold, prev.threshold
                        )
                    })
            };
            if let Some(reason) = reason {
                return Err(StorageError::Parse {
                    path: path.to_path_buf(),
                    line,
                    reason,
                });
            }
            points.push(point);
        }
        Ok(points)
    }

    fn write(&self, path: &Path, value: &Vec<PrPoint>) -> StorageResult<()> {
        write_text(path, &Self::format(value))
    }
}

/// Write the precision-recall curve of `sweep`
pub fn save_pr_curve(path: &Path, sweep: &ThresholdSweep) -> StorageResult<()> {
    log::debug!("Writing {}-point curve to {}", sweep.len(), path.display());
    PrCurveCsvStore.write(path, &sweep.pr_curve())
}

/// Parse finite numeric rows with one column per name.
///
/// Columns are separated by a comma or whitespace. Blank lines, `#` comments
/// and an optional header line are skipped. Rows come back with their
/// 1-based line numbers.
fn parse_rows(
    path: &Path,
    text: &str,
    columns: &[&str],
    header: Option<&str>,
) -> StorageResult<Vec<(usize, Vec<f64>)>> {
    let mut rows = Vec::new();

    for (n, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || Some(line) == header {
            continue;
        }
        let parse_err = |reason: String| StorageError::Parse {
            path: path.to_path_buf(),
            line: n + 1,
            reason,
        };
        let fields: Vec<&str> = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|f| !f.is_empty())
            .collect();
        if fields.len() != columns.len() {
            return Err(parse_err(format!(
                "expected {} columns, found {}",
                columns.len(),
                fields.len()
            )));
        }

        let mut row = Vec::with_capacity(columns.len());
        for (field, name) in fields.iter().zip(columns) {
            match field.parse::<f64>() {
                Ok(value) if value.is_finite() => row.push(value),
                _ => return Err(parse_err(format!("invalid {}: {}", name, field))),
            }
        }
        rows.push((n + 1, row));
    }

    Ok(rows)
}

/// Persist a sweep through any store
pub fn save_sweep<S: ArtifactStore<ThresholdSweep>>(
    store: &S,
    path: &Path,
    sweep: &ThresholdSweep,
) -> StorageResult<()> {
    log::debug!("Writing sweep with {} evaluations to {}", sweep.len(), path.display());
    store.write(path, sweep)
}

fn read_text(path: &Path) -> StorageResult<String> {
    fs::read_to_string(path).map_err(|source| io_error(path, source))
}

fn write_text(path: &Path, text: &str) -> StorageResult<()> {
    fs::write(path, text).map_err(|source| io_error(path, source))
}

fn create(path: &Path) -> StorageResult<fs::File> {
    fs::File::create(path).map_err(|source| io_error(path, source))
}

fn io_error(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}
