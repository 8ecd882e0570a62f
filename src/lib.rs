pub mod ranking;
pub mod report;
pub mod snippet;
pub mod summarize;
pub mod text;

pub mod error;
pub mod types;
pub mod config;

pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use summarize::Summarizer;
