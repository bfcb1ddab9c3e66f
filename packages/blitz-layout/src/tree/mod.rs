//! The node arena and the interfaces between it and the layout algorithms.

mod arena;
mod cache;
mod config;
mod layout;
mod node;
mod traits;
mod view;

pub use arena::LayoutTree;
pub use cache::{Cache, ClearState};
pub use config::TreeConfig;
pub use layout::{
    DetailedGridInfo, DetailedGridItemsInfo, DetailedGridTracksInfo, DetailedLayoutInfo, Layout,
    LayoutInput, LayoutOutput, RunMode, SizingMode,
};
pub use node::{NodeId, NodeKind};
pub use traits::{CacheTree, LayoutPartialTree, RoundTree, TraverseTree};

pub(crate) use node::{NodeData, NodeFlags};
pub(crate) use view::TreeView;
