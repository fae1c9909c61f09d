//! Shared numeric and textual constants for the canvas crate.

// ── Placement ───────────────────────────────────────────────────

/// Canvas-local x of a freshly created element.
pub const DEFAULT_X: f64 = 100.0;

/// Canvas-local y of a freshly created element.
pub const DEFAULT_Y: f64 = 100.0;

// ── Sizing ──────────────────────────────────────────────────────

/// Width shared by every element kind at creation.
pub const DEFAULT_WIDTH: f64 = 200.0;

/// Height of a new text block.
pub const TEXT_HEIGHT: f64 = 100.0;

/// Height of a new image or link card; taller to leave room for a preview.
pub const MEDIA_HEIGHT: f64 = 150.0;

// ── Placeholders ────────────────────────────────────────────────

/// Initial payload of a text block.
pub const TEXT_PLACEHOLDER: &str = "New Text";

/// Initial payload of an image reference.
pub const IMAGE_PLACEHOLDER: &str = "Image URL";

/// Initial payload of a link reference.
pub const LINK_PLACEHOLDER: &str = "Link URL";

// ── Session ─────────────────────────────────────────────────────

/// Title attached to exported snapshots unless the host supplies one.
pub const DEFAULT_TITLE: &str = "Coaching Framework Canvas";
