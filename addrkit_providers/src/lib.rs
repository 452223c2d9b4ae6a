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
    clippy::missing_errors_doc
)]

mod dashscope;
mod llm_backend;
pub mod retry;
mod tagger;

pub use dashscope::DashScopeProvider;
pub use llm_backend::{LlmAddressBackend, extract_json_object};
pub use tagger::HttpTaggerBackend;
