//! Monitor rendering: screen content in, pixels out.
//!
//! [`ScreenCompositor::commands`] turns a [`ScreenContent`](crate::models::ScreenContent)
//! into an ordered list of [`DrawCommand`]s; [`ScreenCompositor::render`]
//! applies them to a [`Surface`] and marks it dirty. Rendering is
//! synchronous and deterministic for a given content.

mod draw;
pub mod font;
mod layout;
mod surface;
mod terminal;

pub use draw::{apply_all, DrawCommand, TextAlign};
pub use layout::{truncate_to_width, ScreenCompositor, BORDER_WIDTH, MARGIN, MAX_TERMINAL_LINES};
pub use surface::{create_surface, Rect, Surface, DEFAULT_SURFACE_SIZE, MAX_SURFACE_SIZE};
pub use terminal::{terminal_lines, terminal_lines_at};
