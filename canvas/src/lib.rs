//! Freeform coaching canvas: element model, drag interaction, and export.
//!
//! A coach places text blocks, image references, and link references on an
//! open surface, moves them by dragging, edits their payloads, and deletes
//! them. This crate owns that state and the rules around it. The host page
//! (or any other driver) only forwards intents and surface measurements, and
//! hands exported snapshots to whatever persists them.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Intent surface: [`engine::EngineCore`] and the surface-bound [`engine::Engine`] |
//! | [`doc`] | Element types and the in-memory [`doc::ElementStore`] |
//! | [`factory`] | Element creation with per-kind defaults and unique ids |
//! | [`surface`] | Surface geometry and viewport-to-canvas mapping |
//! | [`input`] | The [`input::DragSession`] state machine |
//! | [`snapshot`] | Owned copies of canvas state for persistence |
//! | [`consts`] | Default positions, sizes, and placeholder text |

pub mod consts;
pub mod doc;
#[cfg(target_arch = "wasm32")]
pub mod dom;
pub mod engine;
pub mod factory;
pub mod input;
pub mod snapshot;
pub mod surface;
