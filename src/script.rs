//! Intent scripts: replay a canvas editing session from JSON lines.
//!
//! DESIGN
//! ======
//! Each non-blank line is one UI intent (`{"op": "add", "kind": "text", "as": "e1"}`).
//! Elements are referred to by the alias given when they were added, since
//! real ids are only known once the factory issues them. Lines starting with
//! `#` are comments.
//!
//! The session plays the host page: it owns a simulated surface that can be
//! mounted and unmounted, and forwards `save` snapshots to a sink. Unknown
//! elements are the canvas's business (silent no-ops); unknown aliases are
//! script mistakes and stop the replay. Deleting an element frees its alias
//! for reuse, after which the old name is unknown until rebound.

#[cfg(test)]
#[path = "script_test.rs"]
mod script_test;

use std::collections::HashMap;
use std::io::BufRead;

use canvas::doc::{ElementId, ElementKind, Size, SizeError};
use canvas::engine::{Action, Engine, EngineCore};
use canvas::surface::{SurfaceGeometry, SurfaceRect};
use serde::Deserialize;
use tracing::{debug, info};

use crate::sink::{SinkError, SnapshotSink};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("line {line}: invalid intent: {source}")]
    Parse { line: usize, source: serde_json::Error },
    #[error("line {line}: unknown element alias `{alias}`")]
    UnknownAlias { line: usize, alias: String },
    #[error("line {line}: alias `{alias}` is already bound")]
    DuplicateAlias { line: usize, alias: String },
    #[error("line {line}: {source}")]
    InvalidSize { line: usize, source: SizeError },
    #[error("failed to read script: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to save canvas: {0}")]
    Sink(#[from] SinkError),
}

/// One UI intent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Intent {
    /// Toolbar button: add an element, optionally binding an alias to it.
    Add {
        kind: ElementKind,
        #[serde(rename = "as", default)]
        alias: Option<String>,
    },
    /// Text or URL edit.
    Edit { target: String, content: String },
    Resize { target: String, width: f64, height: f64 },
    Delete { target: String },
    /// Click on an element, or on nothing when `target` is absent.
    Select {
        #[serde(default)]
        target: Option<String>,
    },
    DragStart { target: String },
    /// Release at viewport coordinates.
    Drop { target: String, x: f64, y: f64 },
    /// Pointer released outside any drop target.
    Cancel,
    /// The surface is (re)mounted at the given viewport offset.
    Mount { left: f64, top: f64 },
    Unmount,
    Save,
}

/// The host's view of the canvas surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedSurface {
    rect: Option<SurfaceRect>,
}

impl SimulatedSurface {
    #[must_use]
    pub fn mounted(left: f64, top: f64) -> Self {
        Self { rect: Some(SurfaceRect::at(left, top)) }
    }

    pub fn mount(&mut self, left: f64, top: f64) {
        self.rect = Some(SurfaceRect::at(left, top));
    }

    pub fn unmount(&mut self) {
        self.rect = None;
    }
}

impl SurfaceGeometry for SimulatedSurface {
    fn bounding_rect(&self) -> Option<SurfaceRect> {
        self.rect
    }
}

/// Counts from a finished replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayReport {
    pub intents: usize,
    /// Intents that changed the canvas.
    pub changes: usize,
    pub saves: usize,
}

// =============================================================================
// SESSION
// =============================================================================

/// A canvas editing session driven by intents.
pub struct Session<'a> {
    engine: Engine<SimulatedSurface>,
    aliases: HashMap<String, ElementId>,
    sink: &'a mut dyn SnapshotSink,
    report: ReplayReport,
}

impl<'a> Session<'a> {
    #[must_use]
    pub fn new(title: &str, surface: SimulatedSurface, sink: &'a mut dyn SnapshotSink) -> Self {
        Self {
            engine: Engine::with_core(surface, EngineCore::with_title(title)),
            aliases: HashMap::new(),
            sink,
            report: ReplayReport::default(),
        }
    }

    #[must_use]
    pub fn engine(&self) -> &Engine<SimulatedSurface> {
        &self.engine
    }

    /// Id bound to `alias`, if any.
    #[must_use]
    pub fn resolve(&self, alias: &str) -> Option<ElementId> {
        self.aliases.get(alias).copied()
    }

    #[must_use]
    pub fn report(&self) -> ReplayReport {
        self.report
    }

    /// Apply every intent in `reader`, one JSON object per line.
    ///
    /// # Errors
    ///
    /// Stops at the first unreadable line, malformed intent, unknown alias,
    /// invalid size, or sink failure.
    pub fn replay(&mut self, reader: impl BufRead) -> Result<ReplayReport, ScriptError> {
        for (index, line) in reader.lines().enumerate() {
            let line_no = index + 1;
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let intent: Intent =
                serde_json::from_str(trimmed).map_err(|source| ScriptError::Parse { line: line_no, source })?;
            self.apply(line_no, intent)?;
        }
        info!(
            intents = self.report.intents,
            changes = self.report.changes,
            saves = self.report.saves,
            "replay finished"
        );
        Ok(self.report)
    }

    /// Apply a single intent.
    ///
    /// # Errors
    ///
    /// See [`Session::replay`].
    pub fn apply(&mut self, line: usize, intent: Intent) -> Result<(), ScriptError> {
        debug!(line, ?intent, "applying intent");
        self.report.intents += 1;

        let action = match intent {
            Intent::Add { kind, alias } => {
                if let Some(ref alias) = alias {
                    if self.aliases.contains_key(alias) {
                        return Err(ScriptError::DuplicateAlias { line, alias: alias.clone() });
                    }
                }
                let action = self.engine.add_element(kind);
                if let (Some(alias), Action::ElementCreated(record)) = (alias, &action) {
                    self.aliases.insert(alias, record.id);
                }
                action
            }
            Intent::Edit { target, content } => {
                let id = self.lookup(line, &target)?;
                self.engine.update_element_content(id, content)
            }
            Intent::Resize { target, width, height } => {
                let id = self.lookup(line, &target)?;
                let size = Size::new(width, height).map_err(|source| ScriptError::InvalidSize { line, source })?;
                self.engine.resize_element(id, size)
            }
            Intent::Delete { target } => {
                let id = self.lookup(line, &target)?;
                let action = self.engine.delete_element(id);
                if action != Action::None {
                    self.aliases.retain(|_, bound| *bound != id);
                }
                action
            }
            Intent::Select { target } => {
                let id = target.map(|t| self.lookup(line, &t)).transpose()?;
                self.engine.select_element(id)
            }
            Intent::DragStart { target } => {
                let id = self.lookup(line, &target)?;
                self.engine.begin_drag(id)
            }
            Intent::Drop { target, x, y } => {
                let id = self.lookup(line, &target)?;
                self.engine.on_drop(id, x, y)
            }
            Intent::Cancel => self.engine.cancel_drag(),
            Intent::Mount { left, top } => {
                self.engine.surface_mut().mount(left, top);
                Action::None
            }
            Intent::Unmount => {
                self.engine.surface_mut().unmount();
                Action::None
            }
            Intent::Save => {
                self.save()?;
                Action::None
            }
        };

        if action != Action::None {
            self.report.changes += 1;
        }
        Ok(())
    }

    fn save(&mut self) -> Result<(), ScriptError> {
        let snapshot = self.engine.export();
        info!(canvas_id = %snapshot.canvas_id, elements = snapshot.len(), "canvas saved");
        self.sink.persist(&snapshot)?;
        self.report.saves += 1;
        Ok(())
    }

    fn lookup(&self, line: usize, alias: &str) -> Result<ElementId, ScriptError> {
        self.resolve(alias).ok_or_else(|| ScriptError::UnknownAlias { line, alias: alias.to_owned() })
    }
}
