//! Batch conversion of score archives.
//!
//! Every file with the source extension directly inside a directory is
//! handed to a [`ScoreConverter`], which writes a sibling file with the
//! target extension. Jobs run one at a time, in file name order.

pub mod external;

pub use external::ExternalConverter;

use crate::envconfig::Formats;
use crate::error::ConvertError;
use serde::{Serialize, Serializer};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionJob {
    pub input: PathBuf,
    pub output: PathBuf,
}

pub trait ScoreConverter {
    /// Converts `job.input` into `job.output`, replacing whatever is there.
    fn convert(&self, job: &ConversionJob) -> Result<(), ConvertError>;
}

impl<T: ScoreConverter + ?Sized> ScoreConverter for &T {
    fn convert(&self, job: &ConversionJob) -> Result<(), ConvertError> {
        (**self).convert(job)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOptions {
    pub fail_fast: bool,
    pub dry_run: bool,
}

#[derive(Debug, Serialize)]
pub struct Failure {
    pub job: ConversionJob,
    #[serde(serialize_with = "serialize_display")]
    pub error: ConvertError,
}

#[derive(Debug, Default, Serialize)]
pub struct BatchReport {
    pub converted: Vec<ConversionJob>,
    pub failed: Vec<Failure>,
    /// Jobs listed by a dry run; the converter was not invoked.
    pub planned: Vec<ConversionJob>,
    /// Jobs never attempted because `fail_fast` stopped the batch.
    pub skipped: Vec<ConversionJob>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.converted.len() + self.failed.len() + self.planned.len() + self.skipped.len()
    }
}

/// Replaces the trailing extension: `foo/bar.mxl` becomes `foo/bar.krn`.
pub fn output_path(input: &Path, target_ext: &str) -> PathBuf {
    input.with_extension(target_ext)
}

/// Regular files directly inside `dir` whose extension is exactly
/// `source_ext`, sorted by path.
pub fn discover(dir: &Path, source_ext: &str) -> Result<Vec<PathBuf>, ConvertError> {
    let scan_err = |source: io::Error| ConvertError::Scan {
        dir: dir.to_path_buf(),
        source,
    };

    let mut found = Vec::new();
    for entry in fs::read_dir(dir).map_err(scan_err)? {
        let entry = entry.map_err(scan_err)?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        if path.extension().is_some_and(|ext| ext == source_ext) {
            found.push(path);
        }
    }

    found.sort();
    Ok(found)
}

pub fn plan(dir: &Path, formats: &Formats) -> Result<Vec<ConversionJob>, ConvertError> {
    let jobs: Vec<ConversionJob> = discover(dir, &formats.source_ext)?
        .into_iter()
        .map(|input| {
            let output = output_path(&input, &formats.target_ext);
            ConversionJob { input, output }
        })
        .collect();

    tracing::debug!(dir = %dir.display(), count = jobs.len(), "planned conversions");
    Ok(jobs)
}

pub fn progress_line(job: &ConversionJob) -> String {
    format!("Converting {} -> {}", job.input.display(), job.output.display())
}

pub struct BatchConverter<C> {
    converter: C,
    options: BatchOptions,
}

impl<C: ScoreConverter> BatchConverter<C> {
    pub fn new(converter: C) -> Self {
        Self {
            converter,
            options: BatchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: BatchOptions) -> Self {
        self.options = options;
        self
    }

    /// Writes one progress line per job to `progress`, then converts it.
    ///
    /// Only a failure to write progress aborts the batch; conversion
    /// failures are collected in the report.
    pub fn run<W: Write>(&self, jobs: Vec<ConversionJob>, progress: &mut W) -> io::Result<BatchReport> {
        let mut report = BatchReport::default();
        let mut jobs = jobs.into_iter();

        while let Some(job) = jobs.next() {
            writeln!(progress, "{}", progress_line(&job))?;
            progress.flush()?;

            if self.options.dry_run {
                report.planned.push(job);
                continue;
            }

            match self.converter.convert(&job) {
                Ok(()) => report.converted.push(job),
                Err(error) => {
                    tracing::error!(input = %job.input.display(), "{}", error);
                    report.failed.push(Failure { job, error });

                    if self.options.fail_fast {
                        report.skipped.extend(jobs.by_ref());
                        break;
                    }
                }
            }
        }

        tracing::info!(
            converted = report.converted.len(),
            failed = report.failed.len(),
            planned = report.planned.len(),
            skipped = report.skipped.len(),
            "batch finished"
        );
        Ok(report)
    }
}

fn serialize_display<T: std::fmt::Display, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Recorder {
        calls: RefCell<Vec<ConversionJob>>,
        fail_on: Option<&'static str>,
    }

    impl Recorder {
        fn new() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                fail_on: None,
            }
        }
    }

    impl ScoreConverter for Recorder {
        fn convert(&self, job: &ConversionJob) -> Result<(), ConvertError> {
            self.calls.borrow_mut().push(job.clone());
            if self.fail_on.is_some_and(|name| job.input.ends_with(name)) {
                return Err(ConvertError::Spawn {
                    program: "recorder".to_string(),
                    source: io::Error::new(io::ErrorKind::Other, "boom"),
                });
            }
            Ok(())
        }
    }

    fn jobs(names: &[&str]) -> Vec<ConversionJob> {
        names
            .iter()
            .map(|n| {
                let input = PathBuf::from(n);
                let output = output_path(&input, "krn");
                ConversionJob { input, output }
            })
            .collect()
    }

    #[test]
    fn test_output_path_replaces_trailing_extension() {
        assert_eq!(output_path(Path::new("foo/bar.mxl"), "krn"), PathBuf::from("foo/bar.krn"));
        assert_eq!(output_path(Path::new("a.b.mxl"), "krn"), PathBuf::from("a.b.krn"));
        assert_eq!(output_path(Path::new("II/008.mxl"), "krn"), PathBuf::from("II/008.krn"));
    }

    #[test]
    fn test_progress_line_names_both_paths() {
        let planned = jobs(&["scores/001.mxl"]);
        assert_eq!(progress_line(&planned[0]), "Converting scores/001.mxl -> scores/001.krn");
    }

    #[test]
    fn test_one_call_and_one_line_per_job() {
        let recorder = Recorder::new();
        let mut out = Vec::new();

        let report = BatchConverter::new(&recorder)
            .run(jobs(&["a.mxl", "b.mxl"]), &mut out)
            .unwrap();

        assert!(report.is_success());
        assert_eq!(report.converted.len(), 2);
        let calls = recorder.calls.borrow();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].output, PathBuf::from("a.krn"));
        assert_eq!(calls[1].output, PathBuf::from("b.krn"));

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["Converting a.mxl -> a.krn", "Converting b.mxl -> b.krn"]);
    }

    #[test]
    fn test_empty_batch() {
        let recorder = Recorder::new();
        let mut out = Vec::new();

        let report = BatchConverter::new(&recorder).run(Vec::new(), &mut out).unwrap();

        assert!(report.is_success());
        assert_eq!(report.total(), 0);
        assert!(recorder.calls.borrow().is_empty());
        assert!(out.is_empty());
    }

    #[test]
    fn test_failure_does_not_stop_batch() {
        let recorder = Recorder {
            fail_on: Some("b.mxl"),
            ..Recorder::new()
        };
        let mut out = Vec::new();

        let report = BatchConverter::new(&recorder)
            .run(jobs(&["a.mxl", "b.mxl", "c.mxl"]), &mut out)
            .unwrap();

        assert!(!report.is_success());
        assert_eq!(report.converted.len(), 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].job.input, PathBuf::from("b.mxl"));
        assert_eq!(recorder.calls.borrow().len(), 3);
    }

    #[test]
    fn test_fail_fast_skips_the_rest() {
        let recorder = Recorder {
            fail_on: Some("b.mxl"),
            ..Recorder::new()
        };
        let mut out = Vec::new();

        let report = BatchConverter::new(&recorder)
            .with_options(BatchOptions {
                fail_fast: true,
                ..BatchOptions::default()
            })
            .run(jobs(&["a.mxl", "b.mxl", "c.mxl", "d.mxl"]), &mut out)
            .unwrap();

        assert_eq!(report.converted.len(), 1);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.skipped.len(), 2);
        assert_eq!(recorder.calls.borrow().len(), 2);
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 2);
    }

    #[test]
    fn test_dry_run_never_invokes() {
        let recorder = Recorder::new();
        let mut out = Vec::new();

        let report = BatchConverter::new(&recorder)
            .with_options(BatchOptions {
                dry_run: true,
                ..BatchOptions::default()
            })
            .run(jobs(&["a.mxl"]), &mut out)
            .unwrap();

        assert!(report.converted.is_empty());
        assert_eq!(report.planned, jobs(&["a.mxl"]));
        assert_eq!(report.total(), 1);
        assert!(recorder.calls.borrow().is_empty());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["converted"].as_array().unwrap().len(), 0);
        assert_eq!(json["planned"][0]["output"], "a.krn");
        assert_eq!(String::from_utf8(out).unwrap(), "Converting a.mxl -> a.krn\n");
    }

    #[test]
    fn test_report_serializes_errors_as_text() {
        let recorder = Recorder {
            fail_on: Some("a.mxl"),
            ..Recorder::new()
        };
        let report = BatchConverter::new(&recorder)
            .run(jobs(&["a.mxl"]), &mut Vec::<u8>::new())
            .unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["failed"][0]["job"]["input"], "a.mxl");
        assert!(json["failed"][0]["error"].as_str().unwrap().contains("recorder"));
    }
}
