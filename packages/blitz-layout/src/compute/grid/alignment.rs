//! Positioning tracks within the container and items within their grid areas.

use crate::compute::common::{apply_alignment_fallback, compute_alignment_offset};
use crate::style::{AlignContent, AlignItems};

use super::types::GridTrack;

/// Set each track's offset, distributing the free space per `justify-content`/`align-content`.
///
/// Collapsed tracks sit at the position of the track before them and take no share.
pub(super) fn align_tracks(tracks: &mut [GridTrack], inner_size: f32, alignment: AlignContent) {
    let used: f32 = tracks
        .iter()
        .map(|track| track.base_size + track.gutter_before)
        .sum();
    let free_space = inner_size - used;
    let track_count = tracks.iter().filter(|track| !track.is_collapsed).count();
    let alignment = match apply_alignment_fallback(free_space, track_count, alignment) {
        // Stretching has already been applied to auto tracks
        AlignContent::Stretch => AlignContent::Start,
        alignment => alignment,
    };

    let mut cursor = 0.0;
    let mut seen_first = false;
    for track in tracks.iter_mut() {
        if track.is_collapsed {
            track.offset = cursor;
            continue;
        }
        cursor += compute_alignment_offset(
            free_space,
            track_count,
            track.gutter_before,
            alignment,
            false,
            !seen_first,
        );
        seen_first = true;
        track.offset = cursor;
        cursor += track.base_size;
    }
}

/// The offset of an item's margin box within its area along one axis.
///
/// `auto` margins take the free space first. `free_space` is the area size minus the item's
/// margin-box size and may be negative.
pub(super) fn align_item_within_area(
    free_space: f32,
    alignment: AlignItems,
    auto_start: bool,
    auto_end: bool,
) -> (f32, f32, f32) {
    if auto_start || auto_end {
        let free_space = free_space.max(0.0);
        return match (auto_start, auto_end) {
            (true, true) => (0.0, free_space / 2.0, free_space / 2.0),
            (true, false) => (0.0, free_space, 0.0),
            _ => (0.0, 0.0, free_space),
        };
    }
    let offset = match alignment {
        AlignItems::Start | AlignItems::FlexStart | AlignItems::Stretch | AlignItems::Baseline => 0.0,
        AlignItems::End | AlignItems::FlexEnd => free_space,
        AlignItems::Center => free_space / 2.0,
    };
    (offset, 0.0, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::TrackSizingFunction;

    fn sized_tracks(sizes: &[f32], gutter: f32) -> Vec<GridTrack> {
        sizes
            .iter()
            .enumerate()
            .map(|(index, size)| {
                let mut track = GridTrack::new(TrackSizingFunction::length(*size));
                track.base_size = *size;
                track.gutter_before = if index == 0 { 0.0 } else { gutter };
                track
            })
            .collect()
    }

    #[test]
    fn tracks_are_separated_by_gutters() {
        let mut tracks = sized_tracks(&[50.0, 100.0], 10.0);
        align_tracks(&mut tracks, 160.0, AlignContent::Start);
        assert_eq!(tracks[1].offset, 60.0);
    }

    #[test]
    fn space_between_pushes_tracks_to_the_edges() {
        let mut tracks = sized_tracks(&[20.0, 20.0], 0.0);
        align_tracks(&mut tracks, 100.0, AlignContent::SpaceBetween);
        assert_eq!(tracks[0].offset, 0.0);
        assert_eq!(tracks[1].offset, 80.0);
    }

    #[test]
    fn collapsed_tracks_take_no_space() {
        let mut tracks = sized_tracks(&[20.0, 0.0, 20.0], 5.0);
        tracks[1] = GridTrack::collapsed();
        tracks[2].gutter_before = 5.0;
        align_tracks(&mut tracks, 45.0, AlignContent::Center);
        assert_eq!(tracks[1].offset, 20.0);
        assert_eq!(tracks[2].offset, 25.0);
    }

    #[test]
    fn auto_margins_win_over_alignment() {
        assert_eq!(
            align_item_within_area(30.0, AlignItems::End, true, true),
            (0.0, 15.0, 15.0)
        );
        assert_eq!(
            align_item_within_area(30.0, AlignItems::Center, false, false),
            (15.0, 0.0, 0.0)
        );
    }
}
