//! Identifiers of the supported extraction models.

/// LLM backend that returns a structured address block.
pub const QWEN_FLASH: &str = "qwen-flash";

/// NER taggers whose spans go through the entity classifier.
pub const MACBERT: &str = "chinese-macbert-base";
pub const SIAMESE_UIE: &str = "nlp_structbert_siamese-uie_chinese-base";

/// Geographic taggers with their own label sets.
pub const MGEO_COMPOSITION: &str = "mgeo_geographic_composition_analysis_chinese_base";
pub const MGEO_TAGGING: &str = "mgeo_geographic_elements_tagging_chinese_base";

pub const DEFAULT_MODEL: &str = QWEN_FLASH;

/// Every model id with a built-in normalizer.
pub const SUPPORTED_MODELS: &[&str] = &[
    QWEN_FLASH,
    MACBERT,
    SIAMESE_UIE,
    MGEO_COMPOSITION,
    MGEO_TAGGING,
];
