mod base_component;
mod dirty;
mod display;
mod hit_test;
mod scene_tree;
mod scissor;
mod viewport;

pub use base_component::*;
pub use dirty::*;
pub use display::*;
pub use hit_test::*;
pub use scene_tree::*;
pub use scissor::*;
pub use viewport::*;
