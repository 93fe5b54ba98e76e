//! Packager module for bundling produced files into one archive.
//!
//! The orchestrator hands the packager an ordered list of output files plus
//! an optional password; the packager produces a single archive with one
//! entry per file. The concrete format lives behind the `Packager` trait so
//! batch logic can be tested with a mock.

mod config;
mod error;
mod traits;
mod types;
mod zip;

pub use config::{Compression, EncryptionMethod, PackagerConfig};
pub use error::PackagerError;
pub use self::zip::ZipPackager;
pub use traits::Packager;
pub use types::PackageSummary;
