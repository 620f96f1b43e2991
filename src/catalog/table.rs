use super::annotation::FigureEntry;
use super::naming::segment_stem;
use crate::error::CatalogError;
use std::fs;
use std::path::Path;

pub const COLUMNS: [&str; 7] = [
    "Measure start",
    "Figure",
    "Species",
    "Modal final",
    "Cantus firmus",
    "Measure end",
    "Measure Count",
];

pub const SEGMENT_COLUMNS: [&str; 3] = ["File", "Measure start", "Measure end"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FigureRow {
    pub entry: FigureEntry,
    pub measure_end: u32,
    pub measure_count: u32,
}

impl FigureRow {
    /// Cell text in [`COLUMNS`] order.
    pub fn cells(&self) -> [String; 7] {
        [
            self.entry.measure_start.to_string(),
            self.entry.figure.clone(),
            self.entry.species.clone(),
            self.entry.modal_final.clone(),
            self.entry.cantus_firmus.clone(),
            self.measure_end.to_string(),
            self.measure_count.to_string(),
        ]
    }
}

/// Each figure runs until the measure before the next one starts; the last
/// runs to `last_measure`.
pub fn build_rows(entries: Vec<FigureEntry>, last_measure: u32) -> Result<Vec<FigureRow>, CatalogError> {
    if entries.is_empty() {
        return Err(CatalogError::Empty);
    }

    let mut previous = 0;
    for entry in &entries {
        if entry.measure_start <= previous {
            return Err(CatalogError::Unordered {
                previous,
                start: entry.measure_start,
            });
        }
        if entry.measure_start > last_measure {
            return Err(CatalogError::OutOfRange {
                start: entry.measure_start,
                last: last_measure,
            });
        }
        previous = entry.measure_start;
    }

    let next_starts: Vec<u32> = entries.iter().skip(1).map(|e| e.measure_start).collect();
    let rows = entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| {
            let measure_end = next_starts.get(i).map(|next| next - 1).unwrap_or(last_measure);
            let measure_count = measure_end - entry.measure_start + 1;
            FigureRow {
                entry,
                measure_end,
                measure_count,
            }
        })
        .collect();

    Ok(rows)
}

pub fn to_tsv(rows: &[FigureRow]) -> String {
    let mut out = COLUMNS.join("\t");
    out.push('\n');
    for row in rows {
        let cells: Vec<String> = row.cells().iter().map(|c| sanitize_cell(c)).collect();
        out.push_str(&cells.join("\t"));
        out.push('\n');
    }
    out
}

pub fn parse_tsv(content: &str) -> Result<Vec<FigureRow>, CatalogError> {
    let mut lines = content.lines().map(|l| l.trim_end_matches('\r'));

    let header = lines.next().unwrap_or_default();
    let columns: Vec<&str> = header.split('\t').collect();
    if columns != COLUMNS {
        return Err(CatalogError::BadHeader(header.to_string()));
    }

    let mut rows = Vec::new();
    for (idx, line) in lines.enumerate() {
        // header is line 1
        let line_no = idx + 2;
        if line.trim().is_empty() {
            continue;
        }

        let cells: Vec<&str> = line.split('\t').collect();
        if cells.len() != COLUMNS.len() {
            return Err(CatalogError::Listing {
                line: line_no,
                reason: format!("expected {} columns, got {}", COLUMNS.len(), cells.len()),
            });
        }

        let number = |i: usize| -> Result<u32, CatalogError> {
            cells[i].trim().parse().map_err(|_| CatalogError::Listing {
                line: line_no,
                reason: format!("invalid {} '{}'", COLUMNS[i], cells[i]),
            })
        };

        rows.push(FigureRow {
            entry: FigureEntry {
                measure_start: number(0)?,
                figure: cells[1].to_string(),
                species: cells[2].to_string(),
                modal_final: cells[3].to_string(),
                cantus_firmus: cells[4].to_string(),
            },
            measure_end: number(5)?,
            measure_count: number(6)?,
        });
    }

    Ok(rows)
}

pub fn write_tsv(rows: &[FigureRow], output_dir: &Path) -> Result<std::path::PathBuf, CatalogError> {
    let path = output_dir.join("data.tsv");
    fs::write(&path, to_tsv(rows))?;
    tracing::info!("Wrote data to {}", path.display());
    Ok(path)
}

pub fn read_tsv(path: &Path) -> Result<Vec<FigureRow>, CatalogError> {
    parse_tsv(&fs::read_to_string(path)?)
}

/// One line per figure naming its single-figure score and the measures it
/// covers in the section score.
pub fn to_segment_tsv(rows: &[FigureRow], ext: &str) -> String {
    let mut out = SEGMENT_COLUMNS.join("\t");
    out.push('\n');
    for row in rows {
        out.push_str(&format!(
            "{}.{}\t{}\t{}\n",
            sanitize_cell(&segment_stem(&row.entry.figure)),
            ext,
            row.entry.measure_start,
            row.measure_end
        ));
    }
    out
}

pub fn write_segments(rows: &[FigureRow], ext: &str, output_dir: &Path) -> Result<std::path::PathBuf, CatalogError> {
    let path = output_dir.join(super::SEGMENTS_FILE);
    fs::write(&path, to_segment_tsv(rows, ext))?;
    tracing::info!("Wrote segment index to {}", path.display());
    Ok(path)
}

fn sanitize_cell(cell: &str) -> String {
    cell.replace(['\t', '\n', '\r'], " ")
}
