//! Converter module for turning single documents into PDF files.
//!
//! This module provides the `DocumentConverter` trait and the retrying
//! implementation that drives a pluggable `ConversionStrategy` (plus an
//! optional fallback strategy) with per-attempt timeouts, output validation
//! and capped backoff between attempts.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use docpress_core::converter::{
//!     CommandStrategy, ConverterConfig, DocumentConverter, RetryingConverter,
//! };
//!
//! let converter = RetryingConverter::new(ConverterConfig::default())
//!     .with_primary(Arc::new(CommandStrategy::libreoffice()));
//!
//! let outcome = converter
//!     .convert(Path::new("/docs/report.docx"), Path::new("/tmp/out"))
//!     .await;
//! if outcome.is_success() {
//!     println!("produced {:?} in {} attempt(s)", outcome.output_path, outcome.attempts);
//! }
//! ```

mod command;
mod config;
mod error;
mod retrying;
mod traits;
mod types;

pub use command::CommandStrategy;
pub use config::ConverterConfig;
pub use error::StrategyError;
pub use retrying::RetryingConverter;
pub use traits::{ConversionStrategy, DocumentConverter};
pub use types::{ConversionOutcome, ConversionStatus};
