//! Handing an invocation over to the legacy component-cli.

use std::convert::Infallible;
use std::env;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LegacyError {
    #[error("legacy program '{program}' not found on PATH")]
    NotFound { program: String },
    #[error("failed to execute {}", path.display())]
    Exec {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Directory of the running executable, canonicalized.
pub fn own_dir() -> Option<PathBuf> {
    let exe = env::current_exe().ok()?;
    let exe = fs::canonicalize(&exe).unwrap_or(exe);
    exe.parent().map(Path::to_path_buf)
}

/// Search `PATH` for `program`, skipping `exclude`.
pub fn find_program(program: &str, exclude: Option<&Path>) -> Option<PathBuf> {
    let path = env::var_os("PATH")?;
    find_in(program, env::split_paths(&path), exclude)
}

/// Search `dirs` in order for an executable named `program`.
pub fn find_in<I>(program: &str, dirs: I, exclude: Option<&Path>) -> Option<PathBuf>
where
    I: IntoIterator<Item = PathBuf>,
{
    let exclude = exclude.map(|dir| fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf()));

    dirs.into_iter()
        .filter(|dir| !dir.as_os_str().is_empty())
        .filter(|dir| match &exclude {
            Some(excluded) => fs::canonicalize(dir).map_or(true, |dir| &dir != excluded),
            None => true,
        })
        .map(|dir| dir.join(program))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Locate the legacy program, excluding this executable's directory, and
/// hand `argv` over to it. `argv[0]` is forwarded unchanged.
pub fn delegate(program: &str, argv: &[OsString]) -> Result<Infallible, LegacyError> {
    let Some(path) = find_program(program, own_dir().as_deref()) else {
        return Err(LegacyError::NotFound {
            program: program.to_string(),
        });
    };
    handoff(&path, argv)
}

/// Replace the current process with `path`.
#[cfg(unix)]
pub fn handoff(path: &Path, argv: &[OsString]) -> Result<Infallible, LegacyError> {
    use std::os::unix::process::CommandExt;

    let mut command = Command::new(path);
    if let Some((arg0, rest)) = argv.split_first() {
        command.arg0(arg0).args(rest);
    }

    // exec only returns on failure
    let source = command.exec();
    Err(LegacyError::Exec {
        path: path.to_path_buf(),
        source,
    })
}

/// Run `path` to completion and exit with its status.
#[cfg(not(unix))]
pub fn handoff(path: &Path, argv: &[OsString]) -> Result<Infallible, LegacyError> {
    let status = Command::new(path)
        .args(argv.iter().skip(1))
        .status()
        .map_err(|source| LegacyError::Exec {
            path: path.to_path_buf(),
            source,
        })?;
    std::process::exit(status.code().unwrap_or(1))
}
