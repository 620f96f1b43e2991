use crate::error::CatalogError;
use std::path::Path;

pub const SEARCH_HEADERS: [&str; 4] = ["Fig. ", "Species: ", "Modal final: ", "Cantus firmus: "];
const SEPARATOR: &str = "; ";

/// One exercise as announced by the text above its first measure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FigureEntry {
    pub measure_start: u32,
    pub figure: String,
    pub species: String,
    pub modal_final: String,
    pub cantus_firmus: String,
}

/// Parses `Fig. 5; Species: 1; Modal final: D; Cantus firmus: lower`.
pub fn parse_annotation(measure: u32, text: &str) -> Result<FigureEntry, CatalogError> {
    let components: Vec<&str> = text.split(SEPARATOR).collect();

    let [figure, species, modal_final, cantus_firmus]: [&str; 4] =
        components.try_into().map_err(|components: Vec<&str>| CatalogError::ComponentCount {
            measure,
            expected: SEARCH_HEADERS.len(),
            got: components.len(),
            raw: text.to_string(),
        })?;

    let strip = |index: usize, component: &str| -> Result<String, CatalogError> {
        let header = SEARCH_HEADERS[index];
        component
            .strip_prefix(header)
            .map(String::from)
            .ok_or_else(|| CatalogError::Header {
                measure,
                index,
                header,
                got: component.to_string(),
            })
    };

    Ok(FigureEntry {
        measure_start: measure,
        figure: strip(0, figure)?,
        species: strip(1, species)?,
        modal_final: strip(2, modal_final)?,
        cantus_firmus: strip(3, cantus_firmus)?,
    })
}

/// Reads a listing of `<measure>\t<annotation>` lines. Blank lines are
/// ignored.
pub fn parse_listing(content: &str) -> Result<Vec<FigureEntry>, CatalogError> {
    let mut entries = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim_end_matches('\r');
        if trimmed.trim().is_empty() {
            continue;
        }

        let (measure, text) = trimmed.split_once('\t').ok_or_else(|| CatalogError::Listing {
            line: line_no,
            reason: "expected <measure><TAB><annotation>".to_string(),
        })?;
        let measure: u32 = measure.trim().parse().map_err(|_| CatalogError::Listing {
            line: line_no,
            reason: format!("invalid measure number '{}'", measure.trim()),
        })?;

        entries.push(parse_annotation(measure, text.trim())?);
    }

    Ok(entries)
}

pub fn read_listing(path: &Path) -> Result<Vec<FigureEntry>, CatalogError> {
    let content = std::fs::read_to_string(path)?;
    parse_listing(&content)
}
