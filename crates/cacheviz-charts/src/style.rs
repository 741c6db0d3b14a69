//! Shared palette and label helpers. The variant colors are the fixed ones
//! the thesis figures were produced with; keep them stable so regenerated
//! charts stay comparable with older ones.

use cacheviz_core::model::Variant;
use plotters::style::RGBColor;

pub const BASELINE_COLOR: RGBColor = RGBColor(0xFF, 0x6B, 0x6B);
pub const SELF_HEALING_COLOR: RGBColor = RGBColor(0xFF, 0xD9, 0x3D);
pub const ML_COLOR: RGBColor = RGBColor(0x4E, 0xCD, 0xC4);
/// Highlight color for "winner" cells and derived-delta bars.
pub const ACCENT_COLOR: RGBColor = RGBColor(0x51, 0xCF, 0x66);
/// Softer teal used for tertiary series (e.g. F1 score bars).
pub const MINT_COLOR: RGBColor = RGBColor(0x95, 0xE1, 0xD3);

pub fn variant_color(variant: Variant) -> RGBColor {
    match variant {
        Variant::Baseline => BASELINE_COLOR,
        Variant::SelfHealing => SELF_HEALING_COLOR,
        Variant::SelfHealingMl => ML_COLOR,
    }
}

/// `cascading_failure` → `Cascading Failure`.
pub fn pretty_label(name: &str) -> String {
    name.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
