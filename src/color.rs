//! Deterministic color assignment for vertex label sets.
//!
//! Every distinct label value present in a label vector receives one evenly
//! spaced hue around the color wheel, so the same labels always map to the
//! same colors. Label 0 is the conventional unlabelled background: it keeps
//! its palette slot, which preserves the hue positions of all other labels,
//! but is rendered in a fixed neutral gray.

use std::collections::{BTreeMap, BTreeSet};

/// Label value reserved for unlabelled vertices.
pub const UNLABELED: i32 = 0;

/// Color used for unlabelled vertices and for labels missing from a
/// palette.
pub const NEUTRAL_GRAY: [f32; 3] = [128.0 / 255.0; 3];

const PALETTE_SATURATION: f32 = 0.8;
const PALETTE_VALUE: f32 = 0.9;

/// A mapping from label value to an RGB triple with components in [0, 1].
///
/// Built once per label vector and owned by the caller; building the same
/// distinct label set always yields bit-identical colors.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelPalette {
    pub colors: BTreeMap<i32, [f32; 3]>,
}

impl LabelPalette {
    /// Assign a color to every distinct label value in `labels`.
    ///
    /// The distinct values are sorted ascending and the i-th of N receives
    /// hue `i / N * 360` at fixed saturation and value.
    pub fn build(labels: &[i32]) -> LabelPalette {
        let distinct: BTreeSet<i32> = labels.iter().copied().collect();
        let n = distinct.len();

        let mut colors = BTreeMap::new();
        for (i, label) in distinct.into_iter().enumerate() {
            let hue = i as f32 / n as f32 * 360.0;
            colors.insert(label, hsv_to_rgb(hue, PALETTE_SATURATION, PALETTE_VALUE));
        }
        LabelPalette { colors }
    }

    /// The palette color of `label`, if it has one.
    pub fn color(&self, label: i32) -> Option<[f32; 3]> {
        self.colors.get(&label).copied()
    }

    /// Number of labels in the palette.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether the palette holds no labels at all.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// A flat RGB buffer with one color per element of `labels`.
    ///
    /// Label 0 always maps to [`NEUTRAL_GRAY`] regardless of its palette
    /// slot, as do labels the palette does not know.
    pub fn vertex_colors(&self, labels: &[i32]) -> Vec<f32> {
        let mut buffer = Vec::with_capacity(labels.len() * 3);
        for &label in labels {
            let color = if label == UNLABELED {
                NEUTRAL_GRAY
            } else {
                self.color(label).unwrap_or(NEUTRAL_GRAY)
            };
            buffer.extend_from_slice(&color);
        }
        buffer
    }
}

/// Standard sextant HSV to RGB conversion. `hue` is in degrees, the other
/// components in [0, 1].
fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> [f32; 3] {
    let sector = (hue / 60.0).floor();
    let f = hue / 60.0 - sector;
    let p = value * (1.0 - saturation);
    let q = value * (1.0 - f * saturation);
    let t = value * (1.0 - (1.0 - f) * saturation);

    match (sector as u32) % 6 {
        0 => [value, t, p],
        1 => [q, value, p],
        2 => [p, value, t],
        3 => [p, q, value],
        4 => [t, p, value],
        _ => [value, p, q],
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn distinct_labels_get_evenly_spaced_hues_in_ascending_order() {
        let palette = LabelPalette::build(&[3, 1, 2, 1, 3]);

        assert_eq!(3, palette.len());
        assert_eq!(
            Some(hsv_to_rgb(0.0 / 3.0 * 360.0, PALETTE_SATURATION, PALETTE_VALUE)),
            palette.color(1)
        );
        assert_eq!(
            Some(hsv_to_rgb(1.0 / 3.0 * 360.0, PALETTE_SATURATION, PALETTE_VALUE)),
            palette.color(2)
        );
        assert_eq!(
            Some(hsv_to_rgb(2.0 / 3.0 * 360.0, PALETTE_SATURATION, PALETTE_VALUE)),
            palette.color(3)
        );
    }

    #[test]
    fn palettes_are_bit_identical_across_calls() {
        let first = LabelPalette::build(&[4, 8, 15, 16, 23, 42]);
        let second = LabelPalette::build(&[42, 23, 16, 15, 8, 4, 42, 4]);

        assert_eq!(first, second);
    }

    #[test]
    fn label_zero_keeps_its_palette_slot_but_renders_gray() {
        let palette = LabelPalette::build(&[0, 5]);

        assert_eq!(2, palette.len());
        assert!(palette.color(0).is_some());

        let colors = palette.vertex_colors(&[0, 5, 0]);
        assert_eq!(&NEUTRAL_GRAY, &colors[0..3]);
        assert_eq!(palette.color(5).unwrap().as_slice(), &colors[3..6]);
        assert_eq!(&NEUTRAL_GRAY, &colors[6..9]);
    }

    #[test]
    fn labels_missing_from_the_palette_fall_back_to_gray() {
        let palette = LabelPalette::build(&[1]);
        assert_eq!(NEUTRAL_GRAY.to_vec(), palette.vertex_colors(&[2]));
    }

    #[test]
    fn primary_hues_peak_in_the_expected_channel() {
        assert_eq!(PALETTE_VALUE, hsv_to_rgb(0.0, PALETTE_SATURATION, PALETTE_VALUE)[0]);
        assert_eq!(PALETTE_VALUE, hsv_to_rgb(120.0, PALETTE_SATURATION, PALETTE_VALUE)[1]);
        assert_eq!(PALETTE_VALUE, hsv_to_rgb(240.0, PALETTE_SATURATION, PALETTE_VALUE)[2]);
    }

    #[test]
    fn empty_label_vector_builds_an_empty_palette() {
        let palette = LabelPalette::build(&[]);

        assert!(palette.is_empty());
        assert!(palette.vertex_colors(&[]).is_empty());
    }
}
