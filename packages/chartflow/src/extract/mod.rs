//! Data extraction: prompt (AI + regex fallback), file (spreadsheet/CSV),
//! and normalization into the unified structure.

pub mod file;
pub mod normalize;
pub mod patterns;
pub mod prompt;

pub use file::extract_from_file;
pub use normalize::normalize;
pub use patterns::{
    extract_bracketed_list, extract_key_value, extract_simple_list, extract_with_patterns,
};
pub use prompt::{
    parse_ai_response, strip_code_fences, AiParseResponse, PromptExtractor, DATA_PARSE_PROMPT,
};
