pub mod batch;
pub mod catalog;
pub mod envconfig;
pub mod error;
pub mod telemetry;

pub use batch::{
    discover, output_path, plan, BatchConverter, BatchOptions, BatchReport, ConversionJob, ExternalConverter,
    ScoreConverter,
};
pub use catalog::{FigureEntry, FigureRow, SectionOptions, SectionSource};
pub use envconfig::EnvConfig;
pub use error::{CatalogError, ConvertError};
