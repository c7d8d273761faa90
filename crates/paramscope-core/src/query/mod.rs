mod normalize;
mod reader;

pub use normalize::{NormalizedParameters, NormalizedValue};
pub use reader::RawParameterSet;
