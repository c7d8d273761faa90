pub mod analysis;
pub mod error;
pub mod query;

pub use analysis::{ParameterAnalyzer, Report};
pub use error::{Error, Result};
pub use query::{NormalizedParameters, RawParameterSet};
