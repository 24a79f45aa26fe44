use crate::domain::ports::PathPublisher;
use crate::utils::error::{Result, SetupError};
use std::ffi::{OsStr, OsString};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Workflow command files exposed by the runner to the current step.
#[derive(Debug, Clone, Default)]
pub struct RunnerFiles {
    pub path_file: Option<PathBuf>,
    pub output_file: Option<PathBuf>,
}

impl RunnerFiles {
    pub fn from_env() -> Self {
        let file = |name: &str| {
            std::env::var_os(name)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        };
        Self {
            path_file: file("GITHUB_PATH"),
            output_file: file("GITHUB_OUTPUT"),
        }
    }

    /// Sets a step output, falling back to the legacy workflow command.
    pub fn set_output(&self, name: &str, value: &str) -> Result<()> {
        match &self.output_file {
            Some(file) => append_line(file, &heredoc_entry(name, value)?),
            None => {
                println!("::set-output name={}::{}", name, escape_command_value(value));
                Ok(())
            }
        }
    }
}

fn append_line(file: &Path, line: &str) -> Result<()> {
    let mut handle = OpenOptions::new().create(true).append(true).open(file)?;
    writeln!(handle, "{}", line)?;
    Ok(())
}

fn heredoc_entry(name: &str, value: &str) -> Result<String> {
    let delimiter = format!("ghadelimiter_{}", Uuid::new_v4());

    if name.contains(&delimiter) || value.contains(&delimiter) {
        return Err(SetupError::ConfigError {
            message: format!("Output {} contains the heredoc delimiter", name),
        });
    }

    Ok(format!("{}<<{}\n{}\n{}", name, delimiter, value, delimiter))
}

fn escape_command_value(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Puts `dir` in front of an existing search path.
pub fn prepend_path(dir: &Path, current: Option<&OsStr>) -> Result<OsString> {
    let mut paths = vec![dir.to_path_buf()];
    if let Some(current) = current {
        paths.extend(std::env::split_paths(current));
    }
    std::env::join_paths(paths).map_err(|e| SetupError::ConfigError {
        message: format!("Cannot add {} to PATH: {}", dir.display(), e),
    })
}

/// Publishes directories through `GITHUB_PATH` and, unless built with
/// `files_only`, the current process `PATH`.
#[derive(Debug, Clone)]
pub struct RunnerPath {
    files: RunnerFiles,
    update_process_path: bool,
}

impl RunnerPath {
    pub fn new(files: RunnerFiles) -> Self {
        Self {
            files,
            update_process_path: true,
        }
    }

    pub fn files_only(files: RunnerFiles) -> Self {
        Self {
            files,
            update_process_path: false,
        }
    }
}

impl PathPublisher for RunnerPath {
    fn add_path(&self, dir: &Path) -> Result<()> {
        match &self.files.path_file {
            Some(file) => append_line(file, &dir.to_string_lossy())?,
            None => println!("::add-path::{}", dir.display()),
        }

        if self.update_process_path {
            let current = std::env::var_os("PATH");
            std::env::set_var("PATH", prepend_path(dir, current.as_deref())?);
        }

        tracing::info!("Added {} to the path", dir.display());
        Ok(())
    }
}
