//! JSON sink.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::RenderSink;
use crate::views::RenderRequest;
use crate::{Error, Result};

/// Writes the render request as pretty-printed JSON.
///
/// Unlike the PNG sink this keeps the title, axis labels and legend text.
pub struct JsonSink {
    path: PathBuf,
}

impl JsonSink {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RenderSink for JsonSink {
    fn render(&mut self, request: &RenderRequest) -> Result<()> {
        let file = File::create(&self.path).map_err(|e| {
            Error::IoError(std::io::Error::new(
                e.kind(),
                format!("failed to create output file '{}': {}", self.path.display(), e),
            ))
        })?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, request)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}
