mod element;
mod transform;

pub use element::*;
pub use transform::*;
