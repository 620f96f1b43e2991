mod cmd;

use clap::{Parser, Subcommand};
use species::envconfig::EnvConfig;
use species::telemetry::{init_logging, LogConfig};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "species")]
#[command(version)]
#[command(about = "Convert and catalog the species counterpoint scores", long_about = None)]
struct Cli {
    /// Increase log verbosity (overridden by SPECIES_LOG / RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert every source file in a directory with the external converter
    Convert {
        /// Directory to scan (default: SPECIES_SCORES_DIR or scores/1x1)
        dir: Option<PathBuf>,
        #[arg(long)]
        from_ext: Option<String>,
        #[arg(long)]
        to_ext: Option<String>,
        /// Converter program (default: SPECIES_CONVERTER or converter21)
        #[arg(long)]
        converter: Option<String>,
        /// Stop at the first failed conversion
        #[arg(long)]
        fail_fast: bool,
        /// Print what would be converted without running the converter
        #[arg(short = 'n', long)]
        dry_run: bool,
        /// Only check that the converter can be run
        #[arg(long)]
        check: bool,
        /// Write a JSON summary of the batch to this file
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Write data.tsv and search.html for one section
    Catalog {
        section_dir: PathBuf,
        /// Annotation listing: one `<measure>\t<annotation>` per line
        #[arg(short, long, requires = "last_measure")]
        annotations: Option<PathBuf>,
        /// Number of the final measure of the section score
        #[arg(long)]
        last_measure: Option<u32>,
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
        #[arg(long)]
        no_tsv: bool,
        #[arg(long)]
        no_html: bool,
        /// Also write segments.tsv: the score file and measure range of each figure
        #[arg(long)]
        segments: bool,
    },
    /// Rebuild the catalog of sections I, II and III
    CatalogAll {
        #[arg(default_value = ".")]
        root: PathBuf,
    },
    Version,
}

fn main() {
    let cli = Cli::parse();

    init_logging(&LogConfig {
        default_level: if cli.verbose { "debug" } else { "info" }.to_string(),
        ansi: std::io::stderr().is_terminal(),
    });

    let config = EnvConfig::from_env();

    // No subcommand keeps the plain "convert the scores directory" behaviour.
    let command = cli.command.unwrap_or(Commands::Convert {
        dir: None,
        from_ext: None,
        to_ext: None,
        converter: None,
        fail_fast: false,
        dry_run: false,
        check: false,
        report: None,
    });

    let result = match command {
        Commands::Convert {
            dir,
            from_ext,
            to_ext,
            converter,
            fail_fast,
            dry_run,
            check,
            report,
        } => cmd::convert(
            config,
            cmd::ConvertArgs {
                dir,
                from_ext,
                to_ext,
                converter,
                fail_fast,
                dry_run,
                check,
                report,
            },
        ),
        Commands::Catalog {
            section_dir,
            annotations,
            last_measure,
            output_dir,
            no_tsv,
            no_html,
            segments,
        } => cmd::catalog(
            config,
            cmd::CatalogArgs {
                section_dir,
                annotations,
                last_measure,
                output_dir,
                no_tsv,
                no_html,
                segments,
            },
        ),
        Commands::CatalogAll { root } => cmd::catalog_all(config, root),
        Commands::Version => cmd::version(),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
