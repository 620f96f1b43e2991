use super::naming::figure_name;
use super::table::{FigureRow, COLUMNS};
use crate::error::CatalogError;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

pub const VHV_VIEWER: &str = "https://verovio.humdrum.org/?file=";
pub const TABLE_ID: &str = "dataframe";
pub const TABLE_CLASSES: &str = "table table-striped table-hover";

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>"Gradus" Scores. Search and Sort.</title>
    <link rel="stylesheet" type="text/css" href="https://cdn.datatables.net/1.13.4/css/jquery.dataTables.css">
    <style>
        /* Table width to prevent horizontal scroll */
        .container { max-width: 100%; }
        .table { width: 100%; }
    </style>
</head>
<body>
    <div class="container">
"#;

const PAGE_TAIL: &str = r#"    </div>

<script src="https://code.jquery.com/jquery-3.6.0.min.js"></script>
<script src="https://cdn.datatables.net/1.13.4/js/jquery.dataTables.js"></script>
<script>
    $(document).ready(function() {
        $('#dataframe').DataTable({
            paging: false,
            searching: true,
            ordering: true,
            search: {
                name: 'search_input'
            }
        });
    });
</script>
</body>
</html>
"#;

pub fn download_links(figure: &str, base_url: &str) -> String {
    let shared = format!("{}{}", base_url, figure_name(figure));
    format!(
        r#"<a href="{0}.mxl">.mxl</a> <a href="{0}.krn">.krn</a>"#,
        escape(&shared)
    )
}

pub fn vhv_link(figure: &str, base_url: &str) -> String {
    format!(
        r#"<a href="{}{}{}.krn">click here</a>"#,
        VHV_VIEWER,
        escape(base_url),
        escape(figure_name(figure))
    )
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render_table(rows: &[FigureRow], base_url: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, r#"<table id="{TABLE_ID}" class="{TABLE_CLASSES}">"#);

    out.push_str("  <thead>\n    <tr>\n");
    for column in COLUMNS.iter().chain(["Direct download", "View on VHV"].iter()) {
        let _ = writeln!(out, "      <th>{}</th>", escape(column));
    }
    out.push_str("    </tr>\n  </thead>\n  <tbody>\n");

    for row in rows {
        out.push_str("    <tr>\n");
        for cell in row.cells() {
            let _ = writeln!(out, "      <td>{}</td>", escape(&cell));
        }
        let _ = writeln!(out, "      <td>{}</td>", download_links(&row.entry.figure, base_url));
        let _ = writeln!(out, "      <td>{}</td>", vhv_link(&row.entry.figure, base_url));
        out.push_str("    </tr>\n");
    }

    out.push_str("  </tbody>\n</table>\n");
    out
}

pub fn render_page(rows: &[FigureRow], base_url: &str) -> String {
    let mut page = String::from(PAGE_HEAD);
    for line in render_table(rows, base_url).lines() {
        page.push_str("        ");
        page.push_str(line);
        page.push('\n');
    }
    page.push_str(PAGE_TAIL);
    page
}

pub fn write_html(rows: &[FigureRow], base_url: &str, output_dir: &Path) -> Result<PathBuf, CatalogError> {
    let path = output_dir.join("search.html");
    fs::write(&path, render_page(rows, base_url))?;
    tracing::info!("Wrote HTML to {}", path.display());
    Ok(path)
}
