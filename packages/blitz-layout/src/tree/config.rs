/// Options that apply to a whole [`LayoutTree`](crate::LayoutTree)
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TreeConfig {
    /// Snap final layouts to whole pixels
    pub use_rounding: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self { use_rounding: true }
    }
}
