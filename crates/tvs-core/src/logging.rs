//! Tracing setup: append to a log file under the XDG state dir, or stderr.

use anyhow::Result;
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

const FILE_FILTER: &str = "info,tvs=debug,tvs_core=debug";
const STDERR_FILTER: &str = "warn";
const VERBOSE_FILTER: &str = "debug";

/// Where log output ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    File(PathBuf),
    Stderr,
}

/// Writer that is either a file or stderr (used when file clone fails).
enum FileOrStderr {
    File(std::fs::File),
    Stderr,
}

impl io::Write for FileOrStderr {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            FileOrStderr::File(f) => f.write(buf),
            FileOrStderr::Stderr => io::stderr().lock().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            FileOrStderr::File(f) => f.flush(),
            FileOrStderr::Stderr => io::stderr().lock().flush(),
        }
    }
}

struct FileMakeWriter(std::fs::File);

impl<'a> MakeWriter<'a> for FileMakeWriter {
    type Writer = FileOrStderr;

    fn make_writer(&'a self) -> Self::Writer {
        self.0
            .try_clone()
            .map(FileOrStderr::File)
            .unwrap_or(FileOrStderr::Stderr)
    }
}

/// `~/.local/state/tvs/tvs.log`, creating the directory.
pub fn log_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("tvs")?;
    Ok(xdg_dirs.place_state_file("tvs.log")?)
}

/// `RUST_LOG` wins; otherwise the filter for the chosen target.
fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

fn default_filter(target_is_file: bool, verbose: bool) -> &'static str {
    match (verbose, target_is_file) {
        (true, _) => VERBOSE_FILTER,
        (false, true) => FILE_FILTER,
        (false, false) => STDERR_FILTER,
    }
}

/// Install the global subscriber writing to the log file.
pub fn init_file_logging(verbose: bool) -> Result<PathBuf> {
    let path = log_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = fs::OpenOptions::new().create(true).append(true).open(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_filter(true, verbose)))
        .with_writer(BoxMakeWriter::new(FileMakeWriter(file)))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!("tvs logging initialized at {}", path.display());
    Ok(path)
}

/// Install the global subscriber writing to stderr.
pub fn init_stderr_logging(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_filter(false, verbose)))
        .with_writer(io::stderr)
        .with_ansi(false)
        .try_init();
}

/// File logging when possible, stderr otherwise. Never fails.
pub fn init(verbose: bool) -> LogTarget {
    match init_file_logging(verbose) {
        Ok(path) => LogTarget::File(path),
        Err(e) => {
            init_stderr_logging(verbose);
            tracing::warn!("file logging unavailable ({:#}), logging to stderr", e);
            LogTarget::Stderr
        }
    }
}
