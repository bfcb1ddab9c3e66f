//! Per-node memoization of layout results.

use crate::geometry::Size;
use crate::style::AvailableSpace;
use crate::tree::{LayoutInput, LayoutOutput, RunMode, SizingMode};

/// Number of size-only entries kept per node
const MEASURE_SLOTS: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq)]
struct CacheEntry<T> {
    sizing_mode: SizingMode,
    known_dimensions: Size<Option<f32>>,
    available_space: Size<AvailableSpace>,
    parent_size: Size<Option<f32>>,
    content: T,
}

impl<T> CacheEntry<T> {
    fn new(inputs: &LayoutInput, content: T) -> Self {
        Self {
            sizing_mode: inputs.sizing_mode,
            known_dimensions: inputs.known_dimensions,
            available_space: inputs.available_space,
            parent_size: inputs.parent_size,
            content,
        }
    }

    /// Entries match only on the exact constraint tuple: known dimensions compare by value and
    /// each available space compares by kind, plus by value when definite. The percentage basis
    /// must match too, since it changes how the node's own style resolves, and so must the
    /// sizing mode.
    fn matches(&self, inputs: &LayoutInput) -> bool {
        self.sizing_mode == inputs.sizing_mode
            && self.known_dimensions == inputs.known_dimensions
            && self.parent_size == inputs.parent_size
            && self.available_space.width.is_same_constraint(inputs.available_space.width)
            && self.available_space.height.is_same_constraint(inputs.available_space.height)
    }
}

/// Cached results of laying out a single node.
///
/// One entry holds the last full layout, the rest hold size-only measurements. The whole cache
/// is cleared whenever the node is marked dirty.
#[derive(Debug, Clone, PartialEq)]
pub struct Cache {
    final_layout_entry: Option<CacheEntry<LayoutOutput>>,
    measure_entries: [Option<CacheEntry<Size<f32>>>; MEASURE_SLOTS],
}

impl Default for Cache {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of [`Cache::clear`]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ClearState {
    Cleared,
    AlreadyEmpty,
}

impl Cache {
    pub const fn new() -> Self {
        Self {
            final_layout_entry: None,
            measure_entries: [None; MEASURE_SLOTS],
        }
    }

    /// Slot for a size-only measurement.
    ///
    /// - 0: both dimensions known
    /// - 1, 2: only width known, height is max-content / min-content-or-definite
    /// - 3, 4: only height known, width is max-content / min-content-or-definite
    /// - 5..=8: neither known, one slot per pair of (max-content, other) categories
    fn compute_cache_slot(known_dimensions: Size<Option<f32>>, available_space: Size<AvailableSpace>) -> usize {
        let is_max_content = |space: AvailableSpace| matches!(space, AvailableSpace::MaxContent);

        match (known_dimensions.width.is_some(), known_dimensions.height.is_some()) {
            (true, true) => 0,
            (true, false) => 1 + usize::from(!is_max_content(available_space.height)),
            (false, true) => 3 + usize::from(!is_max_content(available_space.width)),
            (false, false) => {
                5 + usize::from(!is_max_content(available_space.width))
                    + 2 * usize::from(!is_max_content(available_space.height))
            }
        }
    }

    pub fn get(&self, inputs: &LayoutInput) -> Option<LayoutOutput> {
        match inputs.run_mode {
            RunMode::PerformLayout => self
                .final_layout_entry
                .filter(|entry| entry.matches(inputs))
                .map(|entry| entry.content),
            RunMode::ComputeSize => {
                let slot = Self::compute_cache_slot(inputs.known_dimensions, inputs.available_space);
                self.measure_entries[slot]
                    .filter(|entry| entry.matches(inputs))
                    .map(|entry| LayoutOutput::from_outer_size(entry.content))
            }
            RunMode::PerformHiddenLayout => None,
        }
    }

    /// Store a result, replacing whatever previously occupied its slot
    pub fn store(&mut self, inputs: &LayoutInput, layout_output: LayoutOutput) {
        match inputs.run_mode {
            RunMode::PerformLayout => {
                self.final_layout_entry = Some(CacheEntry::new(inputs, layout_output));
            }
            RunMode::ComputeSize => {
                let slot = Self::compute_cache_slot(inputs.known_dimensions, inputs.available_space);
                self.measure_entries[slot] = Some(CacheEntry::new(inputs, layout_output.size));
            }
            RunMode::PerformHiddenLayout => {}
        }
    }

    pub fn clear(&mut self) -> ClearState {
        if self.is_empty() {
            return ClearState::AlreadyEmpty;
        }
        self.final_layout_entry = None;
        self.measure_entries = [None; MEASURE_SLOTS];
        ClearState::Cleared
    }

    pub fn is_empty(&self) -> bool {
        self.final_layout_entry.is_none() && self.measure_entries.iter().all(Option::is_none)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(width: f32, height: f32) -> LayoutOutput {
        LayoutOutput::from_outer_size(Size { width, height })
    }

    fn inputs(run_mode: RunMode, available_space: Size<AvailableSpace>) -> LayoutInput {
        LayoutInput {
            run_mode,
            sizing_mode: SizingMode::InherentSize,
            known_dimensions: Size::NONE,
            parent_size: Size::NONE,
            available_space,
        }
    }

    #[test]
    fn hit_requires_exact_definite_value() {
        let mut cache = Cache::new();
        let request = inputs(RunMode::ComputeSize, Size::from_definite(100.0, 50.0));
        cache.store(&request, output(10.0, 20.0));

        assert_eq!(cache.get(&request), Some(output(10.0, 20.0)));
        let other = inputs(RunMode::ComputeSize, Size::from_definite(100.5, 50.0));
        assert_eq!(cache.get(&other), None, "a different definite width must miss");
    }

    #[test]
    fn indefinite_constraints_match_by_kind() {
        let mut cache = Cache::new();
        cache.store(&inputs(RunMode::ComputeSize, Size::MIN_CONTENT), output(3.0, 4.0));

        assert!(cache.get(&inputs(RunMode::ComputeSize, Size::MIN_CONTENT)).is_some());
        assert!(cache.get(&inputs(RunMode::ComputeSize, Size::MAX_CONTENT)).is_none());
    }

    #[test]
    fn percentage_basis_is_part_of_the_key() {
        let mut cache = Cache::new();
        let request = inputs(RunMode::ComputeSize, Size::MAX_CONTENT);
        cache.store(&request, output(3.0, 4.0));

        let resized_parent = LayoutInput {
            parent_size: Size::new(200.0, 100.0),
            ..request
        };
        assert!(cache.get(&resized_parent).is_none());
    }

    #[test]
    fn sizing_mode_is_part_of_the_key() {
        let mut cache = Cache::new();
        let request = inputs(RunMode::ComputeSize, Size::MIN_CONTENT);
        cache.store(&request, output(100.0, 0.0));

        let content_only = LayoutInput {
            sizing_mode: SizingMode::ContentSize,
            ..request
        };
        assert!(cache.get(&content_only).is_none());
    }

    #[test]
    fn final_layout_and_measurements_are_separate() {
        let mut cache = Cache::new();
        cache.store(&inputs(RunMode::PerformLayout, Size::MAX_CONTENT), output(1.0, 1.0));
        assert!(cache.get(&inputs(RunMode::ComputeSize, Size::MAX_CONTENT)).is_none());
        assert!(cache.get(&inputs(RunMode::PerformLayout, Size::MAX_CONTENT)).is_some());
    }

    #[test]
    fn clear_reports_state() {
        let mut cache = Cache::new();
        assert_eq!(cache.clear(), ClearState::AlreadyEmpty);
        cache.store(&inputs(RunMode::ComputeSize, Size::MAX_CONTENT), output(1.0, 1.0));
        assert_eq!(cache.clear(), ClearState::Cleared);
        assert!(cache.is_empty());
    }
}
