//! External-command conversion strategy.
//!
//! Drives a headless converter tool (LibreOffice by default) as a child
//! process. The tool is expected to write `<stem>.<ext>` into the requested
//! output directory, which is exactly the path the retry loop validates.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use super::error::StrategyError;
use super::traits::ConversionStrategy;

/// Strategy that shells out to an external document converter.
pub struct CommandStrategy {
    program: PathBuf,
    extra_args: Vec<String>,
    name: String,
}

impl CommandStrategy {
    /// Creates a strategy for the given converter binary.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        let program = program.into();
        let name = program
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "command".to_string());
        Self {
            program,
            extra_args: Vec::new(),
            name,
        }
    }

    /// Creates a strategy for a LibreOffice installation on PATH.
    pub fn libreoffice() -> Self {
        Self::new("soffice")
    }

    /// Appends extra arguments to every invocation.
    pub fn with_extra_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    /// Builds the command line for one conversion.
    fn build_args(&self, input: &Path, output: &Path) -> Vec<String> {
        let target_format = output
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_else(|| "pdf".to_string());
        let out_dir = output
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_string_lossy()
            .to_string();

        let mut args = vec![
            "--headless".to_string(),
            "--convert-to".to_string(),
            target_format,
            "--outdir".to_string(),
            out_dir,
        ];
        args.extend(self.extra_args.iter().cloned());
        args.push(input.to_string_lossy().to_string());
        args
    }
}

#[async_trait]
impl ConversionStrategy for CommandStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    async fn convert(&self, input: &Path, output: &Path) -> Result<(), StrategyError> {
        let args = self.build_args(input, output);
        debug!(
            "running {} {} for {}",
            self.program.display(),
            args.join(" "),
            input.display()
        );

        let result = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    StrategyError::ToolNotFound {
                        path: self.program.clone(),
                    }
                } else {
                    StrategyError::Io(e)
                }
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr).trim().to_string();
            return Err(StrategyError::failed(
                format!("{} exited with {}", self.name, result.status),
                if stderr.is_empty() { None } else { Some(stderr) },
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_args() {
        let strategy = CommandStrategy::libreoffice();
        let args = strategy.build_args(
            Path::new("/docs/report.docx"),
            Path::new("/tmp/scratch/report.pdf"),
        );
        assert_eq!(
            args,
            vec![
                "--headless",
                "--convert-to",
                "pdf",
                "--outdir",
                "/tmp/scratch",
                "/docs/report.docx",
            ]
        );
    }

    #[test]
    fn test_build_args_with_extra() {
        let strategy =
            CommandStrategy::new("soffice").with_extra_args(vec!["--norestore".to_string()]);
        let args = strategy.build_args(Path::new("a.docx"), Path::new("/out/a.pdf"));
        assert!(args.contains(&"--norestore".to_string()));
        assert_eq!(args.last().unwrap(), "a.docx");
    }

    #[test]
    fn test_name_from_program() {
        assert_eq!(CommandStrategy::new("/opt/libreoffice/soffice").name(), "soffice");
        assert_eq!(CommandStrategy::new("unoconv").name(), "unoconv");
    }

    #[tokio::test]
    async fn test_missing_tool_reported() {
        let strategy = CommandStrategy::new("/nonexistent/bin/soffice");
        let err = strategy
            .convert(Path::new("/in/a.docx"), Path::new("/out/a.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, StrategyError::ToolNotFound { .. }));
    }
}
