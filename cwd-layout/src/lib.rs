//! Non-overlapping circle placement inside a waterdrop outline.

pub mod cache;
pub mod error;
pub mod packer;
pub mod relax;
pub mod teardrop;

pub use cache::LayoutCache;
pub use error::{LayoutError, Result};
pub use packer::{Circle, PackedCircle, PackedLayout, Packer};
pub use relax::{RelaxConfig, RelaxationPacker};
pub use teardrop::Teardrop;
