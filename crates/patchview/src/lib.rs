//! Terminal diff viewer built on [`patchview_core`].
//!
//! [`DiffView`](diff_view::DiffView) renders one file's diff into a ratatui buffer: a line-number
//! gutter, modified lines with their changed characters emphasized, and a minimap column with
//! change bars and a visible-region indicator. Only the rows on screen are drawn.
//!
//! Input is backend neutral ([`input::InputEvent`]); enable the `crossterm` feature for a
//! converter and the `syntect` feature for syntax coloring.

pub use patchview_core as core;

pub mod bindings;
pub mod diff_view;
pub mod input;
pub mod minimap_view;
pub mod render;
pub mod text;
pub mod theme;

#[cfg(feature = "crossterm")]
pub mod crossterm_input;
#[cfg(feature = "syntect")]
pub mod syntect;

pub use diff_view::DiffView;
pub use diff_view::DiffViewOptions;
pub use theme::Theme;
