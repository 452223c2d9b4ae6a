#![warn(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::module_name_repetitions
)]

pub mod classify;
pub mod decompose;
pub mod models;
pub mod normalize;
pub mod parser;
mod pipeline;

pub use classify::{ClassifiedEntities, classify, find_large_location_entity};
pub use decompose::{Decomposition, decompose};
pub use normalize::{GeoScheme, GeoTagNormalizer, NerNormalizer, NormalizerRegistry, StructuredNormalizer};
pub use parser::{ParsedAddress, parse_address};
pub use pipeline::ExtractionPipeline;
