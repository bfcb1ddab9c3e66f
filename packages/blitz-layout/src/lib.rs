//! Block, flexbox and grid layout over a node arena.
//!
//! A [`LayoutTree`] owns every node: its [`Style`], its ordered children and the results of the
//! last layout. Mutations mark the affected nodes dirty and drop their cached measurements, and
//! [`LayoutTree::compute_layout`] re-lays out the tree within the given available space:
//!
//! ```
//! use blitz_layout::{Dimension, Display, LayoutTree, Size, Style};
//!
//! let mut tree: LayoutTree = LayoutTree::new();
//! let child = tree.new_leaf(Style {
//!     flex_grow: 1.0,
//!     ..Default::default()
//! });
//! let root = tree
//!     .new_with_children(
//!         Style {
//!             display: Display::Flex,
//!             size: Size::<Dimension>::from_lengths(100.0, 50.0),
//!             ..Default::default()
//!         },
//!         &[child],
//!     )
//!     .unwrap();
//!
//! tree.compute_layout(root, Size::MAX_CONTENT).unwrap();
//! assert_eq!(tree.layout(child).unwrap().size.width, 100.0);
//! ```
//!
//! Leaves that carry a context are sized by the measure function passed to
//! [`LayoutTree::compute_layout_with_measure`]. If it fails, the tree is left exactly as it was
//! before the call.
//!
//! ## Feature flags
//!  - `tracing` (default): trace-level logs of each layout pass.
//!  - `serde`: `Serialize`/`Deserialize` for styles and layouts.

mod compute;
mod error;
pub mod geometry;
pub mod style;
pub mod tree;

pub use error::{LayoutResult, LayoutTreeError, MeasureError};
pub use geometry::{AbsoluteAxis, Line, Point, Rect, Size};
pub use style::*;
pub use tree::{
    DetailedGridInfo, DetailedGridItemsInfo, DetailedGridTracksInfo, DetailedLayoutInfo, Layout,
    LayoutTree, NodeId, NodeKind, TreeConfig,
};
