use std::env;
use std::path::PathBuf;

pub const DEFAULT_SCORES_DIR: &str = "scores/1x1";
/// converter21 is a Python library, not a command. The default expects a
/// wrapper script of that name on `PATH` taking `<from> <to> <input> <output>`.
pub const DEFAULT_CONVERTER: &str = "converter21";
pub const DEFAULT_CONVERTER_ARGS: &str = "{from} {to} {input} {output}";
pub const DEFAULT_SOURCE_EXT: &str = "mxl";
pub const DEFAULT_TARGET_EXT: &str = "krn";
pub const DEFAULT_SOURCE_FORMAT: &str = "musicxml";
pub const DEFAULT_TARGET_FORMAT: &str = "humdrum";
pub const DEFAULT_BASE_URL: &str =
    "https://raw.githubusercontent.com/MarkGotham/species/refs/heads/main/scores/1x1/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvConfig {
    pub scores_dir: PathBuf,
    pub converter: ConverterCommand,
    pub formats: Formats,
    pub base_url: String,
}

/// `args` comes from `SPECIES_CONVERTER_ARGS` split on whitespace, with no
/// shell quoting. A template that needs spaces inside one argument belongs in
/// a wrapper script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterCommand {
    pub program: String,
    pub args: Vec<String>,
}

/// Extensions pick files on disk; format ids are what the converter is told.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formats {
    pub source_ext: String,
    pub target_ext: String,
    pub source_format: String,
    pub target_format: String,
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, so callers other than the
    /// process environment (tests, wrappers) can feed values in.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            scores_dir: PathBuf::from(get("SPECIES_SCORES_DIR", DEFAULT_SCORES_DIR)),
            converter: ConverterCommand {
                program: get("SPECIES_CONVERTER", DEFAULT_CONVERTER),
                args: get("SPECIES_CONVERTER_ARGS", DEFAULT_CONVERTER_ARGS)
                    .split_whitespace()
                    .map(String::from)
                    .collect(),
            },
            formats: Formats {
                source_ext: normalize_ext(&get("SPECIES_SOURCE_EXT", DEFAULT_SOURCE_EXT)),
                target_ext: normalize_ext(&get("SPECIES_TARGET_EXT", DEFAULT_TARGET_EXT)),
                source_format: get("SPECIES_SOURCE_FORMAT", DEFAULT_SOURCE_FORMAT),
                target_format: get("SPECIES_TARGET_FORMAT", DEFAULT_TARGET_FORMAT),
            },
            base_url: with_trailing_slash(get("SPECIES_BASE_URL", DEFAULT_BASE_URL)),
        }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl Default for Formats {
    fn default() -> Self {
        Self {
            source_ext: DEFAULT_SOURCE_EXT.to_string(),
            target_ext: DEFAULT_TARGET_EXT.to_string(),
            source_format: DEFAULT_SOURCE_FORMAT.to_string(),
            target_format: DEFAULT_TARGET_FORMAT.to_string(),
        }
    }
}

/// Accepts `krn` and `.krn` alike.
pub fn normalize_ext(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_string()
}

fn with_trailing_slash(mut url: String) -> String {
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}
