//! Color palette
//!
//! Fixed palette for price tiers and areas, plus the reserved state colors
//! used by the customer-facing seat picker.

use shared::models::PriceTier;

/// Fixed tier/area palette, cycled in order
pub const PALETTE: [&str; 10] = [
    "#e6194b", "#3cb44b", "#ffe119", "#4363d8", "#f58231", "#911eb4", "#46f0f0", "#f032e6",
    "#bcf60c", "#008080",
];

/// Gold outline for selected elements
pub const SELECTED_OUTLINE: &str = "#ffd700";
/// Red fill for occupied elements
pub const OCCUPIED_FILL: &str = "#e53935";

/// Assign a unique palette color to every tier missing one or sharing one
///
/// Cycles through [`PALETTE`], skipping colors already in use; existing
/// unique colors are kept as-is. With more tiers than palette entries the
/// palette wraps.
pub fn ensure_tier_colors(tiers: &mut [PriceTier]) {
    let mut used: Vec<String> = Vec::new();
    let mut cursor = 0;
    for tier in tiers.iter_mut() {
        let keep = tier
            .color
            .as_ref()
            .is_some_and(|c| !used.iter().any(|u| u == c));
        if !keep {
            let mut candidate = PALETTE[cursor % PALETTE.len()];
            let mut tried = 0;
            while used.iter().any(|u| u == candidate) && tried < PALETTE.len() {
                cursor += 1;
                tried += 1;
                candidate = PALETTE[cursor % PALETTE.len()];
            }
            tier.color = Some(candidate.to_string());
            cursor += 1;
        }
        if let Some(c) = &tier.color {
            used.push(c.clone());
        }
    }
}

/// Palette color for the n-th area created
pub fn area_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}
