//! Snapshot sinks: where saved canvases go.
//!
//! DESIGN
//! ======
//! The canvas core stops at producing a `CanvasSnapshot`. Whatever persists
//! it sits behind `SnapshotSink`. The CLI writes one JSON document per save
//! (JSON lines), which keeps the output pipeable into any backend loader.

#[cfg(test)]
#[path = "sink_test.rs"]
mod sink_test;

use std::io::Write;

use canvas::snapshot::CanvasSnapshot;

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to write snapshot: {0}")]
    Io(#[from] std::io::Error),
}

/// Persistence collaborator for exported canvases.
pub trait SnapshotSink {
    /// Hand off one snapshot.
    ///
    /// # Errors
    ///
    /// Implementations report encoding or transport failures.
    fn persist(&mut self, snapshot: &CanvasSnapshot) -> Result<(), SinkError>;
}

/// Writes each snapshot as a single JSON line (or a pretty block) and flushes.
pub struct JsonLinesSink<W> {
    writer: W,
    pretty: bool,
}

impl<W: Write> JsonLinesSink<W> {
    #[must_use]
    pub fn new(writer: W, pretty: bool) -> Self {
        Self { writer, pretty }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> SnapshotSink for JsonLinesSink<W> {
    fn persist(&mut self, snapshot: &CanvasSnapshot) -> Result<(), SinkError> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, snapshot)?;
        } else {
            serde_json::to_writer(&mut self.writer, snapshot)?;
        }
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Keeps snapshots in memory.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemorySink {
    pub saved: Vec<CanvasSnapshot>,
}

#[cfg(test)]
impl SnapshotSink for MemorySink {
    fn persist(&mut self, snapshot: &CanvasSnapshot) -> Result<(), SinkError> {
        self.saved.push(snapshot.clone());
        Ok(())
    }
}
