//! `patchview-core` turns unified-diff text into a navigable, virtualized line view with a
//! synchronized minimap.
//!
//! The crate is host-agnostic: it owns no terminal, window or event loop. Hosts feed it patch
//! text, viewport geometry and input gestures, and read back the lines to draw plus minimap
//! geometry. The `patchview` crate is a ratatui host built on top of it.
//!
//! ## Pipeline
//!
//! 1. [`patch::parse_unified_diff`] classifies hunk lines and resolves line numbers.
//! 2. [`reconstruct::reconstruct`] merges them into the full file when its content is known.
//! 3. [`modified::detect_modifications`] folds same-line delete/add pairs into modified lines
//!    with Myers-aligned [`line::DiffSegment`]s.
//! 4. [`blocks::index_change_blocks`] groups contiguous changes for next/previous navigation.
//!
//! [`engine::process`] runs steps 2-4 in one call.
//!
//! ## Display state
//!
//! [`engine::DiffEngine`] is the single owner of everything that changes while a diff is shown:
//! scroll geometry, the virtualized [`viewport::ViewportWindow`], the current block, the minimap
//! drag mode and the frame-coalesced indicator position. Full-file reads are asynchronous and
//! go through [`source::FileContentSource`]; responses for a previous selection are dropped.
//!
//! ## Logging
//!
//! Diagnostics are emitted with `tracing`. The crate never installs a subscriber.
pub mod blocks;
pub mod engine;
pub mod error;
pub mod frame;
pub mod line;
pub mod minimap;
pub mod modified;
pub mod overlay;
pub mod patch;
pub mod reconstruct;
pub mod segments;
pub mod source;
pub mod viewport;

pub use engine::DiffEngine;
pub use engine::DiffEngineOptions;
pub use error::ReadError;
pub use line::LineKind;
pub use line::PatchLine;
pub use patch::parse_unified_diff;
pub use source::FileContentSource;
pub use source::FileKey;
