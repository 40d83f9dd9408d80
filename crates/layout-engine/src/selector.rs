//! Strategy dispatch: picks the tiling for the configured mode and the
//! current participant count, then stamps per-participant rotation.

use std::collections::HashMap;

use stagemix_common::error::StagemixResult;
use stagemix_layout_model::{
    Canvas, LayoutMode, MixingLayout, Participant, ParticipantId, Rotation,
};

use crate::{featured, grid, ReadyParticipant};

/// Layout settings fixed for the lifetime of a session.
#[derive(Debug, Clone, Default)]
pub struct LayoutSelector {
    mode: LayoutMode,
    featured: Option<ParticipantId>,
    rotations: HashMap<ParticipantId, Rotation>,
}

impl LayoutSelector {
    pub fn new(mode: LayoutMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Participant reserved for the large slot in vertical presentation.
    pub fn with_featured(mut self, featured: Option<ParticipantId>) -> Self {
        self.featured = featured.filter(|id| !id.is_empty());
        self
    }

    pub fn with_rotations(mut self, rotations: HashMap<ParticipantId, Rotation>) -> Self {
        self.rotations = rotations;
        self
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn featured(&self) -> Option<&str> {
        self.featured.as_deref()
    }

    /// Compute the layout for `participants`, given in join order.
    ///
    /// Participants without a decoded resolution are left out. Returns
    /// `Ok(None)` when nobody is ready, and an error when the ready count
    /// exceeds the largest tier of the configured mode.
    pub fn compute(
        &self,
        canvas: &Canvas,
        participants: &[Participant],
    ) -> StagemixResult<Option<MixingLayout>> {
        let mut ready: Vec<ReadyParticipant<'_>> = participants
            .iter()
            .filter_map(|p| {
                p.resolution.map(|resolution| ReadyParticipant {
                    id: p.id.as_str(),
                    resolution,
                })
            })
            .collect();

        if ready.is_empty() {
            return Ok(None);
        }

        let mut regions = match self.mode {
            LayoutMode::Default => grid::default_layout(canvas, &ready)?,
            LayoutMode::BestFit => {
                ready.sort_by(|a, b| a.id.cmp(b.id));
                grid::best_fit_layout(canvas, &ready)?
            }
            LayoutMode::VerticalPresentation => {
                ready.sort_by(|a, b| a.id.cmp(b.id));
                featured::featured_layout(canvas, &ready, self.featured())?
            }
        };

        for region in &mut regions {
            if let Some(rotation) = self.rotations.get(&region.participant_id) {
                region.rotation = *rotation;
            }
        }

        tracing::debug!(
            mode = %self.mode,
            ready = ready.len(),
            regions = regions.len(),
            "Computed mixing layout"
        );

        Ok(Some(MixingLayout {
            canvas: canvas.clone(),
            regions,
        }))
    }
}
