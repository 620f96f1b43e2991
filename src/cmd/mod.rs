use anyhow::{bail, Context, Result};
use species::batch::{self, BatchConverter, BatchOptions, ExternalConverter};
use species::catalog::{self, SectionOptions, SectionSource};
use species::envconfig::{normalize_ext, EnvConfig};
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
pub struct ConvertArgs {
    pub dir: Option<PathBuf>,
    pub from_ext: Option<String>,
    pub to_ext: Option<String>,
    pub converter: Option<String>,
    pub fail_fast: bool,
    pub dry_run: bool,
    pub check: bool,
    pub report: Option<PathBuf>,
}

pub fn convert(config: EnvConfig, args: ConvertArgs) -> Result<()> {
    let mut config = config;
    if let Some(ext) = args.from_ext {
        config.formats.source_ext = normalize_ext(&ext);
    }
    if let Some(ext) = args.to_ext {
        config.formats.target_ext = normalize_ext(&ext);
    }
    if let Some(program) = args.converter {
        config.converter.program = program;
    }
    let dir = args.dir.unwrap_or_else(|| config.scores_dir.clone());

    let converter = ExternalConverter::new(&config.converter, &config.formats);

    if args.check {
        if !converter.is_available() {
            bail!("converter `{}` not found or not runnable", converter.program());
        }
        println!("{} is available", converter.program());
        return Ok(());
    }

    let jobs = batch::plan(&dir, &config.formats)
        .with_context(|| format!("Failed to list .{} files", config.formats.source_ext))?;
    if jobs.is_empty() {
        tracing::info!("No .{} files in {}", config.formats.source_ext, dir.display());
    }

    let stdout = io::stdout();
    let report = BatchConverter::new(&converter)
        .with_options(BatchOptions {
            fail_fast: args.fail_fast,
            dry_run: args.dry_run,
        })
        .run(jobs, &mut stdout.lock())
        .context("Failed to write progress")?;

    if let Some(path) = args.report {
        write_report(&path, &report)?;
    }

    if !report.is_success() {
        bail!(
            "{} of {} conversions failed",
            report.failed.len(),
            report.total()
        );
    }
    Ok(())
}

fn write_report(path: &Path, report: &batch::BatchReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write report {}", path.display()))?;
    tracing::info!("Wrote report to {}", path.display());
    Ok(())
}

#[derive(Debug, Default)]
pub struct CatalogArgs {
    pub section_dir: PathBuf,
    pub annotations: Option<PathBuf>,
    pub last_measure: Option<u32>,
    pub output_dir: Option<PathBuf>,
    pub no_tsv: bool,
    pub no_html: bool,
    pub segments: bool,
}

pub fn catalog(config: EnvConfig, args: CatalogArgs) -> Result<()> {
    let source = match (args.annotations, args.last_measure) {
        (Some(listing), Some(last_measure)) => SectionSource::Annotations { listing, last_measure },
        (Some(_), None) => bail!("--annotations needs --last-measure"),
        (None, last_measure) => catalog::section_source(&args.section_dir, last_measure)
            .with_context(|| format!("No annotations or data.tsv in {}", args.section_dir.display()))?,
    };

    let options = SectionOptions {
        write_data: !args.no_tsv,
        html_table: !args.no_html,
        base_url: config.base_url,
        segment_ext: args.segments.then_some(config.formats.source_ext),
    };
    let output_dir = args.output_dir.unwrap_or(args.section_dir);

    let output = catalog::process_section(&source, &output_dir, &options)
        .with_context(|| format!("Failed to process {}", output_dir.display()))?;
    tracing::info!("Catalogued {} figures", output.rows);
    Ok(())
}

pub fn catalog_all(config: EnvConfig, root: PathBuf) -> Result<()> {
    let options = SectionOptions::new(config.base_url);
    let done = catalog::process_all(&root, &options);
    if done == 0 {
        bail!("No section processed under {}", root.display());
    }
    Ok(())
}

pub fn version() -> Result<()> {
    println!("species version {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
