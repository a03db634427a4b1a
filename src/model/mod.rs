//! Document structure model.
//!
//! This module defines the intermediate representation that bridges the
//! package container and the splitting pipeline: an ordered sequence of
//! opaque block-level nodes plus the body envelope around them.

mod body;
mod node;

pub use body::DocumentBody;
pub use node::{BlockNode, NodeKind};
