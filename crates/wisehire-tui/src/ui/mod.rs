//! Terminal UI module using ratatui.
//!
//! - `render`: Main frame rendering, layout and overlays
//! - `input`: Keyboard event handling
//! - `styles`: Color schemes and text styling
//! - `screens`: Per-route content (entity tables, candidate detail, dashboard)

pub mod input;
pub mod render;
pub mod screens;
pub mod styles;
