/// The figure number without any trailing comment: `"82 (corrected)"` → `"82"`.
pub fn figure_name(figure: &str) -> &str {
    figure.split(' ').next().unwrap_or(figure)
}

/// File stem of a single-figure score.
///
/// Numbers are padded to three digits, except figures starting with `8`,
/// which get exactly one leading zero, following the printed edition.
pub fn segment_stem(figure: &str) -> String {
    let name = figure_name(figure);
    if name.starts_with('8') {
        format!("0{name}")
    } else {
        format!("{name:0>3}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_figure_name() {
        assert_eq!(figure_name("5"), "5");
        assert_eq!(figure_name("82 (corrected)"), "82");
        assert_eq!(figure_name(""), "");
    }

    #[test]
    fn test_segment_stem() {
        assert_eq!(segment_stem("5"), "005");
        assert_eq!(segment_stem("23 extra"), "023");
        assert_eq!(segment_stem("120"), "120");
        assert_eq!(segment_stem("8"), "08");
        assert_eq!(segment_stem("82"), "082");
        assert_eq!(segment_stem("8a"), "08a");
    }
}
