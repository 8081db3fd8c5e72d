//! Display rendering
//!
//! Every transition ends with a full redraw: the [`Renderer`] builds a
//! [`Screen`] from the session, and the screen is pushed to the display.

pub mod renderer;
pub mod screen;

pub use renderer::Renderer;
pub use screen::{Screen, LINE_LEN};
