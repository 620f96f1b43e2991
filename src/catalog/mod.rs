//! Figure catalog for each section of the exercises.
//!
//! A section (`I`, `II`, `III`) is described either by an annotation
//! listing, from which measure ranges are computed, or by an existing
//! `data.tsv`. From that the section's `data.tsv` and `search.html` are
//! written, and optionally `segments.tsv`, which names the single-figure
//! score file for each figure and the measures it is cut from.

pub mod annotation;
pub mod html;
pub mod naming;
pub mod table;

pub use annotation::{parse_annotation, parse_listing, FigureEntry};
pub use naming::{figure_name, segment_stem};
pub use table::{build_rows, FigureRow};

use crate::error::CatalogError;
use std::path::{Path, PathBuf};

pub const SECTIONS: [&str; 3] = ["I", "II", "III"];
pub const ANNOTATIONS_FILE: &str = "annotations.tsv";
pub const DATA_FILE: &str = "data.tsv";
pub const SEGMENTS_FILE: &str = "segments.tsv";

#[derive(Debug, Clone)]
pub struct SectionOptions {
    pub write_data: bool,
    pub html_table: bool,
    pub base_url: String,
    /// Extension of the per-figure score files; `None` skips `segments.tsv`.
    pub segment_ext: Option<String>,
}

impl SectionOptions {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            write_data: true,
            html_table: true,
            base_url: base_url.into(),
            segment_ext: None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum SectionSource {
    /// `<measure>\t<annotation>` lines plus the number of the final measure.
    Annotations { listing: PathBuf, last_measure: u32 },
    Data(PathBuf),
}

impl SectionSource {
    pub fn load(&self) -> Result<Vec<FigureRow>, CatalogError> {
        match self {
            SectionSource::Annotations { listing, last_measure } => {
                let entries = annotation::read_listing(listing)?;
                build_rows(entries, *last_measure)
            }
            SectionSource::Data(path) => table::read_tsv(path),
        }
    }
}

#[derive(Debug, Default)]
pub struct SectionOutput {
    pub rows: usize,
    pub written: Vec<PathBuf>,
}

pub fn process_section(
    source: &SectionSource,
    output_dir: &Path,
    options: &SectionOptions,
) -> Result<SectionOutput, CatalogError> {
    let rows = source.load()?;
    let mut output = SectionOutput {
        rows: rows.len(),
        ..SectionOutput::default()
    };

    if options.write_data {
        output.written.push(table::write_tsv(&rows, output_dir)?);
    }
    if options.html_table {
        output.written.push(html::write_html(&rows, &options.base_url, output_dir)?);
    }
    if let Some(ext) = &options.segment_ext {
        output.written.push(table::write_segments(&rows, ext, output_dir)?);
    }

    Ok(output)
}

/// Picks the source for a section directory. An annotation listing needs
/// its last measure, so without one the existing `data.tsv` is used.
pub fn section_source(dir: &Path, last_measure: Option<u32>) -> Option<SectionSource> {
    let listing = dir.join(ANNOTATIONS_FILE);
    if let Some(last_measure) = last_measure {
        if listing.is_file() {
            return Some(SectionSource::Annotations { listing, last_measure });
        }
    }

    let data = dir.join(DATA_FILE);
    data.is_file().then_some(SectionSource::Data(data))
}

/// Processes every section under `root`. A failing or missing section is
/// logged and does not stop the others; the number of sections that
/// succeeded is returned.
pub fn process_all(root: &Path, options: &SectionOptions) -> usize {
    let mut done = 0;

    for part in SECTIONS {
        let dir = root.join(part);
        let Some(source) = section_source(&dir, None) else {
            tracing::warn!("No catalog data for section {} in {}", part, dir.display());
            continue;
        };

        match process_section(&source, &dir, options) {
            Ok(output) => {
                tracing::info!("Successfully processed {} ({} figures)", dir.display(), output.rows);
                done += 1;
            }
            Err(e) => tracing::error!("Failed to process {}: {}", dir.display(), e),
        }
    }

    done
}
