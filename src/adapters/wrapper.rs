use crate::adapters::runner::RunnerFiles;
use crate::domain::model::Os;
use crate::domain::ports::WrapperInstaller;
use crate::utils::error::Result;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Installs a shim that routes calls through `setup-kced wrap`, which records
/// the wrapped binary's stdout, stderr and exit code as step outputs.
#[derive(Debug, Clone)]
pub struct ShimWrapper {
    shim_dir: PathBuf,
    launcher: PathBuf,
    os: Os,
}

impl ShimWrapper {
    pub fn new(shim_dir: PathBuf, launcher: PathBuf, os: Os) -> Self {
        Self {
            shim_dir,
            launcher,
            os,
        }
    }

    fn script(&self, binary: &Path) -> String {
        match self.os {
            Os::Windows => format!(
                "@echo off\r\n\"{}\" wrap --binary \"{}\" -- %*\r\n",
                self.launcher.display(),
                binary.display()
            ),
            _ => format!(
                "#!/bin/sh\nexec '{}' wrap --binary '{}' -- \"$@\"\n",
                sh_quote(&self.launcher),
                sh_quote(binary)
            ),
        }
    }
}

// Escapes single quotes for use inside a single-quoted sh string.
fn sh_quote(path: &Path) -> String {
    path.to_string_lossy().replace('\'', r"'\''")
}

impl WrapperInstaller for ShimWrapper {
    fn install(&self, original_name: &str, binary_dir: &Path) -> Result<PathBuf> {
        let binary = binary_dir.join(self.os.executable_name(original_name));
        let shim_name = match self.os {
            Os::Windows => format!("{}.cmd", original_name),
            _ => original_name.to_string(),
        };
        let shim = self.shim_dir.join(shim_name);

        std::fs::create_dir_all(&self.shim_dir)?;
        std::fs::write(&shim, self.script(&binary))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&shim)?.permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(&shim, perms)?;
        }

        tracing::info!("Installed {} wrapper at {}", original_name, shim.display());
        Ok(self.shim_dir.clone())
    }
}

/// Runs `binary` with `args`, mirrors its output and records it as step outputs.
///
/// Returns the child's exit code; a signal-terminated child reports 1.
pub async fn run_wrapped(binary: &Path, args: &[String], files: &RunnerFiles) -> Result<i32> {
    tracing::debug!("Running wrapped {} {:?}", binary.display(), args);
    let output = tokio::process::Command::new(binary)
        .args(args)
        .stdin(std::process::Stdio::inherit())
        .output()
        .await?;

    std::io::stdout().write_all(&output.stdout)?;
    std::io::stderr().write_all(&output.stderr)?;

    let exit_code = output.status.code().unwrap_or(1);
    files.set_output("stdout", &String::from_utf8_lossy(&output.stdout))?;
    files.set_output("stderr", &String::from_utf8_lossy(&output.stderr))?;
    files.set_output("exitcode", &exit_code.to_string())?;

    Ok(exit_code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[cfg(unix)]
    #[test]
    fn test_install_unix_shim() {
        let temp = TempDir::new().unwrap();
        let wrapper = ShimWrapper::new(
            temp.path().join("kced-wrapper"),
            PathBuf::from("/usr/local/bin/setup-kced"),
            Os::Linux,
        );

        let dir = wrapper
            .install("kced", Path::new("/opt/toolcache/kced/0.1.11-linux/x64"))
            .unwrap();

        assert_eq!(dir, temp.path().join("kced-wrapper"));
        let script = std::fs::read_to_string(dir.join("kced")).unwrap();
        assert_eq!(
            script,
            "#!/bin/sh\nexec '/usr/local/bin/setup-kced' wrap --binary '/opt/toolcache/kced/0.1.11-linux/x64/kced' -- \"$@\"\n"
        );

        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(dir.join("kced")).unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0o111);
    }

    #[test]
    fn test_install_windows_shim() {
        let temp = TempDir::new().unwrap();
        let wrapper = ShimWrapper::new(
            temp.path().to_path_buf(),
            PathBuf::from("setup-kced.exe"),
            Os::Windows,
        );

        wrapper.install("kced", Path::new("tools")).unwrap();

        let script = std::fs::read_to_string(temp.path().join("kced.cmd")).unwrap();
        assert!(script.starts_with("@echo off\r\n"));
        assert!(script.contains("wrap --binary"));
        assert!(script.contains("kced.exe"));
    }

    #[test]
    fn test_sh_quote_escapes_single_quotes() {
        assert_eq!(sh_quote(Path::new("/tmp/it's")), r"/tmp/it'\''s");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_wrapped_records_outputs() {
        let temp = TempDir::new().unwrap();
        let output_file = temp.path().join("github_output");
        let files = RunnerFiles {
            path_file: None,
            output_file: Some(output_file.clone()),
        };

        let code = run_wrapped(
            Path::new("/bin/sh"),
            &["-c".to_string(), "echo hello; exit 3".to_string()],
            &files,
        )
        .await
        .unwrap();

        assert_eq!(code, 3);
        let content = std::fs::read_to_string(&output_file).unwrap();
        assert!(content.contains("stdout<<"));
        assert!(content.contains("hello"));
        assert!(content.contains("exitcode<<"));
        assert!(content.lines().any(|l| l == "3"));
    }
}
