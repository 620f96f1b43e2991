use species::catalog::{self, table, SectionOptions, SectionSource};
use species::CatalogError;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const BASE: &str = "https://raw.githubusercontent.com/MarkGotham/species/refs/heads/main/scores/1x1/";

const LISTING: &str = "\
1\tFig. 5; Species: 1; Modal final: D; Cantus firmus: lower
12\tFig. 6; Species: 1; Modal final: D; Cantus firmus: upper
23\tFig. 82 (corrected); Species: 5; Modal final: E; Cantus firmus: lower
";

fn write_listing(dir: &Path) -> std::path::PathBuf {
    let path = dir.join(catalog::ANNOTATIONS_FILE);
    fs::write(&path, LISTING).unwrap();
    path
}

#[test]
fn annotations_to_data_and_search_page() {
    let temp = tempdir().unwrap();
    let dir = temp.path();
    let listing = write_listing(dir);

    let source = SectionSource::Annotations {
        listing,
        last_measure: 34,
    };
    let output = catalog::process_section(&source, dir, &SectionOptions::new(BASE)).unwrap();

    assert_eq!(output.rows, 3);
    assert_eq!(output.written, vec![dir.join("data.tsv"), dir.join("search.html")]);

    let rows = table::read_tsv(&dir.join("data.tsv")).unwrap();
    let ranges: Vec<(u32, u32, u32)> = rows
        .iter()
        .map(|r| (r.entry.measure_start, r.measure_end, r.measure_count))
        .collect();
    assert_eq!(ranges, vec![(1, 11, 11), (12, 22, 11), (23, 34, 12)]);

    let html = fs::read_to_string(dir.join("search.html")).unwrap();
    assert!(html.contains(&format!(r#"<a href="{BASE}82.krn">.krn</a>"#)));
    assert!(html.contains(&format!(r#"<a href="https://verovio.humdrum.org/?file={BASE}5.krn">click here</a>"#)));
    assert!(html.contains("<td>82 (corrected)</td>"));
}

#[test]
fn data_file_can_be_rerendered() {
    let temp = tempdir().unwrap();
    let dir = temp.path();
    let listing = write_listing(dir);
    let first = SectionSource::Annotations {
        listing,
        last_measure: 30,
    };
    catalog::process_section(&first, dir, &SectionOptions::new(BASE)).unwrap();
    let original = fs::read_to_string(dir.join("data.tsv")).unwrap();
    fs::remove_file(dir.join("search.html")).unwrap();

    let options = SectionOptions {
        write_data: false,
        ..SectionOptions::new(BASE)
    };
    let output = catalog::process_section(&SectionSource::Data(dir.join("data.tsv")), dir, &options).unwrap();

    assert_eq!(output.written, vec![dir.join("search.html")]);
    assert_eq!(fs::read_to_string(dir.join("data.tsv")).unwrap(), original);
}

#[test]
fn segment_index_names_each_figure_score() {
    let temp = tempdir().unwrap();
    let dir = temp.path();
    let listing = write_listing(dir);

    let source = SectionSource::Annotations {
        listing,
        last_measure: 34,
    };
    let options = SectionOptions {
        html_table: false,
        segment_ext: Some("mxl".to_string()),
        ..SectionOptions::new(BASE)
    };
    let output = catalog::process_section(&source, dir, &options).unwrap();

    assert_eq!(output.written, vec![dir.join("data.tsv"), dir.join("segments.tsv")]);
    assert_eq!(
        fs::read_to_string(dir.join("segments.tsv")).unwrap(),
        "File\tMeasure start\tMeasure end\n005.mxl\t1\t11\n006.mxl\t12\t22\n082.mxl\t23\t34\n"
    );
}

#[test]
fn malformed_annotation_names_the_measure() {
    let temp = tempdir().unwrap();
    let listing = temp.path().join("bad.tsv");
    fs::write(&listing, "1\tFig. 5; Species: 1; Modal final: D; Cantus firmus: lower\n9\tFig. 6; Species: 1\n").unwrap();

    let source = SectionSource::Annotations {
        listing,
        last_measure: 20,
    };
    let err = catalog::process_section(&source, temp.path(), &SectionOptions::new(BASE)).unwrap_err();

    assert!(matches!(err, CatalogError::ComponentCount { measure: 9, .. }));
    assert!(err.to_string().contains("Raw content: Fig. 6; Species: 1"));
    assert!(!temp.path().join("data.tsv").exists());
}

#[test]
fn section_source_prefers_annotations_only_with_a_last_measure() {
    let temp = tempdir().unwrap();
    let dir = temp.path();
    write_listing(dir);

    assert!(catalog::section_source(dir, None).is_none());
    assert!(matches!(
        catalog::section_source(dir, Some(40)),
        Some(SectionSource::Annotations { last_measure: 40, .. })
    ));

    fs::write(dir.join("data.tsv"), table::COLUMNS.join("\t")).unwrap();
    assert!(matches!(catalog::section_source(dir, None), Some(SectionSource::Data(_))));
}

#[test]
fn process_all_skips_missing_and_broken_sections() {
    let temp = tempdir().unwrap();
    let root = temp.path();

    let one = root.join("I");
    fs::create_dir(&one).unwrap();
    let rows = catalog::build_rows(catalog::parse_listing(LISTING).unwrap(), 30).unwrap();
    table::write_tsv(&rows, &one).unwrap();

    let two = root.join("II");
    fs::create_dir(&two).unwrap();
    fs::write(two.join("data.tsv"), "not\ta\tcatalog\n").unwrap();

    let done = catalog::process_all(root, &SectionOptions::new(BASE));

    assert_eq!(done, 1);
    assert!(one.join("search.html").exists());
    assert!(!two.join("search.html").exists());
}
