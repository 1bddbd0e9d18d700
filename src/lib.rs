//! Retained-mode UI scene graph.
//!
//! Elements live in a [`SceneTree`] arena. Each frame the [`Viewport`] feeds
//! pointer input through the per-element hit tester, flushes dispatch groups
//! and cleans whatever was marked dirty, parents before children.

pub mod config;
pub mod error;
pub mod style;
pub mod ui;
pub mod view;

pub use config::*;
pub use error::*;
pub use style::*;
pub use ui::*;
pub use view::*;
