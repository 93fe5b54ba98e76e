pub mod config;
pub mod converter;
pub mod orchestrator;
pub mod packager;
pub mod progress;
pub mod report;
pub mod testing;

pub use config::{load_config, load_config_from_str, validate_config, Config, ConfigError};
pub use converter::{
    CommandStrategy, ConversionOutcome, ConversionStatus, ConversionStrategy, ConverterConfig,
    DocumentConverter, RetryingConverter, StrategyError,
};
pub use orchestrator::{
    BatchOrchestrator, BatchOutput, CancelFlag, NoopMonitor, OrchestratorConfig,
    OrchestratorError, ResourceMonitor, MAX_PARALLEL_ALLOWED,
};
pub use packager::{PackageSummary, Packager, PackagerConfig, PackagerError, ZipPackager};
pub use progress::{FinishedPayload, ProgressEvent, ProgressHandle, Severity};
pub use report::{ConversionReport, ReportSummary};
