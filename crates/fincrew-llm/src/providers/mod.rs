//! Concrete provider implementations

mod openai_compat;

pub use openai_compat::{OpenAiCompatConfig, OpenAiCompatProvider};
