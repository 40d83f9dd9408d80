//! Compute one layout for a synthetic membership.

use serde::Serialize;
use stagemix_common::config::RecordingDefaults;
use stagemix_layout_engine::featured::select_tier;
use stagemix_layout_engine::grid::best_fit_tier;
use stagemix_layout_engine::LayoutSelector;
use stagemix_layout_model::{Canvas, LayoutMode, MixingLayout, Participant, Resolution};

#[derive(Serialize)]
struct LayoutReport {
    mode: LayoutMode,
    participants: usize,
    /// Arrangement chosen for the participant count, when the mode has tiers.
    #[serde(skip_serializing_if = "Option::is_none")]
    tier: Option<String>,
    layout: Option<MixingLayout>,
}

pub fn run(
    defaults: &RecordingDefaults,
    mode: LayoutMode,
    count: usize,
    width: Option<u32>,
    height: Option<u32>,
    source: Resolution,
    featured: Option<String>,
) -> anyhow::Result<()> {
    let canvas = Canvas::new(
        width.unwrap_or(defaults.canvas_width),
        height.unwrap_or(defaults.canvas_height),
        defaults.fps,
    );
    if !canvas.is_valid() {
        anyhow::bail!("canvas must be non-zero, got {}x{}", canvas.width, canvas.height);
    }

    let participants: Vec<Participant> = (1..=count)
        .map(|i| Participant::with_resolution(format!("p{i:02}"), source.width, source.height))
        .collect();

    let featured_present = featured
        .as_deref()
        .is_some_and(|id| participants.iter().any(|p| p.id == id));
    let tier = match mode {
        LayoutMode::BestFit => best_fit_tier(count).ok().map(|t| format!("{t:?}")),
        LayoutMode::VerticalPresentation => select_tier(count, featured_present)
            .ok()
            .map(|t| format!("{}-slot", t.slots())),
        LayoutMode::Default => None,
    };

    let layout = LayoutSelector::new(mode)
        .with_featured(featured)
        .compute(&canvas, &participants)
        .map_err(|e| anyhow::anyhow!("Failed to compute layout: {e}"))?;

    let report = LayoutReport {
        mode,
        participants: count,
        tier,
        layout,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
