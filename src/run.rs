//! Layout of a tracker run's output directory.

use std::path::{Component, Path, PathBuf};

use crate::render::OutputFormat;
use crate::views::ViewKind;
use crate::{Error, Result};

pub const RESIDUALS_FILE: &str = "residuals.csv";
pub const TRACKS_FILE: &str = "tracks.csv";
pub const TRUTH_FILE: &str = "truth.csv";
/// Default directory for rendered charts, relative to the working directory.
pub const PLOTS_DIR: &str = "plots";

/// A directory holding one run's CSV logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunDirectory {
    root: PathBuf,
}

impl RunDirectory {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Name of the run: the last normal component of the path.
    ///
    /// Paths like `.` or `out/run/..` are resolved through the filesystem
    /// first; `"run"` is used when nothing better is available.
    pub fn name(&self) -> String {
        last_normal(&self.root)
            .or_else(|| {
                self.root
                    .canonicalize()
                    .ok()
                    .and_then(|p| last_normal(&p))
            })
            .unwrap_or_else(|| "run".to_string())
    }

    pub fn residuals_path(&self) -> PathBuf {
        self.root.join(RESIDUALS_FILE)
    }

    pub fn tracks_path(&self) -> PathBuf {
        self.root.join(TRACKS_FILE)
    }

    pub fn truth_path(&self) -> PathBuf {
        self.root.join(TRUTH_FILE)
    }

    pub fn require_residuals(&self) -> Result<PathBuf> {
        require(self.residuals_path())
    }

    pub fn require_tracks(&self) -> Result<PathBuf> {
        require(self.tracks_path())
    }

    pub fn require_truth(&self) -> Result<PathBuf> {
        require(self.truth_path())
    }

    /// `plots/<prefix>_<name>.<ext>`
    pub fn default_output(&self, kind: ViewKind, format: OutputFormat) -> PathBuf {
        Path::new(PLOTS_DIR).join(format!(
            "{}_{}.{}",
            kind.file_prefix(),
            self.name(),
            format.extension()
        ))
    }
}

fn require(path: PathBuf) -> Result<PathBuf> {
    if path.is_file() {
        Ok(path)
    } else {
        Err(Error::MissingInputSource(path))
    }
}

fn last_normal(path: &Path) -> Option<String> {
    // `..` cancels the component before it, so only trust a trailing normal one.
    match path.components().last()? {
        Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
        _ => None,
    }
}
