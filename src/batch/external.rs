use super::{ConversionJob, ScoreConverter};
use crate::envconfig::{ConverterCommand, Formats};
use crate::error::ConvertError;
use std::ffi::OsString;
use std::process::Command;

/// Runs a third-party converter once per job.
///
/// `args` is a template: `{from}`, `{to}`, `{input}` and `{output}` are
/// replaced per job. An argument that is exactly `{input}` or `{output}` is
/// passed as the raw path, so non-UTF-8 file names survive.
#[derive(Debug, Clone)]
pub struct ExternalConverter {
    program: String,
    args: Vec<String>,
    source_format: String,
    target_format: String,
}

impl ExternalConverter {
    pub fn new(command: &ConverterCommand, formats: &Formats) -> Self {
        Self {
            program: command.program.clone(),
            args: command.args.clone(),
            source_format: formats.source_format.clone(),
            target_format: formats.target_format.clone(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    pub fn build_args(&self, job: &ConversionJob) -> Vec<OsString> {
        self.args
            .iter()
            .map(|arg| match arg.as_str() {
                "{input}" => job.input.clone().into_os_string(),
                "{output}" => job.output.clone().into_os_string(),
                _ => OsString::from(self.expand(arg, job)),
            })
            .collect()
    }

    /// Substitutes placeholders in a single pass; substituted text is never
    /// rescanned, and unknown `{...}` tokens are kept as written.
    fn expand(&self, template: &str, job: &ConversionJob) -> String {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let tail = &rest[open..];

            let value = tail.find('}').and_then(|close| {
                let value = match &tail[1..close] {
                    "from" => self.source_format.clone(),
                    "to" => self.target_format.clone(),
                    "input" => job.input.to_string_lossy().into_owned(),
                    "output" => job.output.to_string_lossy().into_owned(),
                    _ => return None,
                };
                Some((value, close))
            });

            match value {
                Some((value, close)) => {
                    out.push_str(&value);
                    rest = &tail[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = &tail[1..];
                }
            }
        }

        out.push_str(rest);
        out
    }
}

impl ScoreConverter for ExternalConverter {
    fn convert(&self, job: &ConversionJob) -> Result<(), ConvertError> {
        let args = self.build_args(job);
        tracing::debug!(program = %self.program, ?args, "spawning converter");

        // stdout and stderr are inherited so the tool reports for itself.
        let status = Command::new(&self.program)
            .args(&args)
            .status()
            .map_err(|source| ConvertError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(ConvertError::Failed {
                program: self.program.clone(),
                input: job.input.clone(),
                status,
            });
        }

        Ok(())
    }
}
