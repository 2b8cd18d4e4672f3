//! Mask-split compositor
//!
//! Splits one overlay into two copies: the part under the hazard grid (the annulus between the
//! safe and hazard radii) at a faded alpha, and the part inside the safe disc at full alpha.
//! The masks are arena constants and never look at the overlay's own geometry.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::future::Future;

use crate::consts::{DEFAULT_FADE_ALPHA, HAZARD_RADIUS, SAFE_RADIUS, YM_TO_PX};
use crate::error::{OverlayError, OverlayResult, ensure_positive, ensure_unit_alpha};
use crate::renderer::{Fill, Node, ShapePath};

pub const COVERED_LABEL: &str = "grid_covered";
pub const SAFE_LABEL: &str = "safe_zone";

/// Safe-zone / hazard-grid geometry in world units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskConfig {
    pub safe_radius: f64,
    pub hazard_radius: f64,
    pub fade_alpha: f32,
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            safe_radius: SAFE_RADIUS,
            hazard_radius: HAZARD_RADIUS,
            fade_alpha: DEFAULT_FADE_ALPHA,
        }
    }
}

impl MaskConfig {
    pub fn with_fade_alpha(mut self, alpha: f32) -> Self {
        self.fade_alpha = alpha;
        self
    }

    pub fn validate(&self) -> OverlayResult<()> {
        ensure_positive("safe radius", self.safe_radius)?;
        ensure_positive("hazard radius", self.hazard_radius)?;
        if self.safe_radius >= self.hazard_radius {
            return Err(OverlayError::validation(format!(
                "safe radius {} must be less than hazard radius {}",
                self.safe_radius, self.hazard_radius
            )));
        }
        ensure_unit_alpha("fade alpha", self.fade_alpha)?;
        Ok(())
    }
}

/// White mask shape in canvas pixels: the hazard annulus when `inverse`, else the safe disc
pub fn create_mask(inverse: bool, config: &MaskConfig) -> Node {
    let safe = config.safe_radius * YM_TO_PX;
    if inverse {
        let hazard = config.hazard_radius * YM_TO_PX;
        Node::graphics("hazard_mask", ShapePath::ring(DVec2::ZERO, safe, hazard), Fill::white())
    } else {
        Node::graphics("safe_mask", ShapePath::circle(DVec2::ZERO, safe), Fill::white())
    }
}

/// The two masked copies of one overlay
#[derive(Debug, Clone, PartialEq)]
pub struct MaskSplit {
    pub covered: Node,
    pub safe: Node,
}

impl MaskSplit {
    /// Group both copies under one container, covered copy first
    pub fn into_node(self) -> Node {
        let mut group = Node::container("mask_split");
        group.add_child(self.covered);
        group.add_child(self.safe);
        group
    }
}

fn mask_copies(covered: Node, safe: Node, config: &MaskConfig) -> MaskSplit {
    let mut covered_group = Node::container(COVERED_LABEL).with_alpha(config.fade_alpha);
    covered_group.add_child(covered);
    covered_group.set_mask(create_mask(true, config));

    let mut safe_group = Node::container(SAFE_LABEL);
    safe_group.add_child(safe);
    safe_group.set_mask(create_mask(false, config));

    MaskSplit {
        covered: covered_group,
        safe: safe_group,
    }
}

/// Run `generator` twice and mask each result. Sprites should already be baked.
pub fn split_container<F>(mut generator: F, config: &MaskConfig) -> OverlayResult<MaskSplit>
where
    F: FnMut() -> OverlayResult<Node>,
{
    config.validate()?;
    let covered = generator()?;
    let safe = generator()?;
    log::debug!(
        "mask split '{}' at fade {} ({} nodes per copy)",
        covered.label,
        config.fade_alpha,
        covered.node_count()
    );
    Ok(mask_copies(covered, safe, config))
}

/// Async variant for generators that await asset loads
pub async fn split_container_async<F, Fut>(
    mut generator: F,
    config: &MaskConfig,
) -> OverlayResult<MaskSplit>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = OverlayResult<Node>>,
{
    config.validate()?;
    let covered = generator().await?;
    let safe = generator().await?;
    log::debug!(
        "async mask split '{}' at fade {}",
        covered.label,
        config.fade_alpha
    );
    Ok(mask_copies(covered, safe, config))
}
