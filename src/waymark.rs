//! Waymark placement
//!
//! A waymark goes `Uninitialized -> Hydrating -> Placed` exactly once: it loads its background
//! and foreground sprites, then gets a fixed position, alpha and icon rotation. A failed load
//! leaves it `Failed` for good; there is no way back to `Uninitialized`.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::assets::{AssetLoader, AssetRef};
use crate::error::{OverlayError, OverlayResult, ensure_finite};
use crate::renderer::Node;

/// Foreground icons are drawn at half size
const FOREGROUND_SCALE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WaymarkLabel {
    A,
    B,
    C,
    D,
    One,
    Two,
    Three,
    Four,
}

impl WaymarkLabel {
    pub const ALL: [WaymarkLabel; 8] = [
        WaymarkLabel::A,
        WaymarkLabel::B,
        WaymarkLabel::C,
        WaymarkLabel::D,
        WaymarkLabel::One,
        WaymarkLabel::Two,
        WaymarkLabel::Three,
        WaymarkLabel::Four,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WaymarkLabel::A => "A",
            WaymarkLabel::B => "B",
            WaymarkLabel::C => "C",
            WaymarkLabel::D => "D",
            WaymarkLabel::One => "One",
            WaymarkLabel::Two => "Two",
            WaymarkLabel::Three => "Three",
            WaymarkLabel::Four => "Four",
        }
    }

    pub fn background_asset(&self) -> AssetRef {
        AssetRef(match self {
            WaymarkLabel::A => "waymark/a_bg@3x.png",
            WaymarkLabel::B => "waymark/b_bg@3x.png",
            WaymarkLabel::C => "waymark/c_bg@3x.png",
            WaymarkLabel::D => "waymark/d_bg@3x.png",
            WaymarkLabel::One => "waymark/1_bg@3x.png",
            WaymarkLabel::Two => "waymark/2_bg@3x.png",
            WaymarkLabel::Three => "waymark/3_bg@3x.png",
            WaymarkLabel::Four => "waymark/4_bg@3x.png",
        })
    }

    pub fn foreground_asset(&self) -> AssetRef {
        AssetRef(match self {
            WaymarkLabel::A => "waymark/a@3x.png",
            WaymarkLabel::B => "waymark/b@3x.png",
            WaymarkLabel::C => "waymark/c@3x.png",
            WaymarkLabel::D => "waymark/d@3x.png",
            WaymarkLabel::One => "waymark/1@3x.png",
            WaymarkLabel::Two => "waymark/2@3x.png",
            WaymarkLabel::Three => "waymark/3@3x.png",
            WaymarkLabel::Four => "waymark/4@3x.png",
        })
    }

    fn node_label(&self) -> String {
        format!("waymark_{}", self.as_str())
    }
}

/// World position of a waymark (`X`/`Z` as in game data)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaymarkPosition {
    #[serde(rename = "X")]
    pub x: f64,
    #[serde(rename = "Z")]
    pub z: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f32>,
    /// Foreground icon rotation in radians
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
}

impl WaymarkPosition {
    pub const fn at(x: f64, z: f64) -> Self {
        Self {
            x,
            z,
            alpha: None,
            rotation: None,
        }
    }

    /// Canvas position in pixels
    pub fn to_canvas(&self) -> OverlayResult<DVec2> {
        let x = ensure_finite("waymark X", self.x)?;
        let z = ensure_finite("waymark Z", self.z)?;
        Ok(crate::world_to_canvas(DVec2::new(x, z)))
    }
}

pub type WaymarkData = BTreeMap<WaymarkLabel, WaymarkPosition>;

/// `Hydrating` starts with the first sprite load and lasts until placement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaymarkState {
    Uninitialized,
    Hydrating,
    Placed,
    /// A sprite load failed; terminal
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Waymark {
    label: WaymarkLabel,
    state: WaymarkState,
    background: Option<Node>,
    foreground: Option<Node>,
    position: DVec2,
    alpha: f32,
}

impl Waymark {
    pub fn new(label: WaymarkLabel) -> Self {
        Self {
            label,
            state: WaymarkState::Uninitialized,
            background: None,
            foreground: None,
            position: DVec2::ZERO,
            alpha: 1.0,
        }
    }

    pub fn label(&self) -> WaymarkLabel {
        self.label
    }

    pub fn state(&self) -> WaymarkState {
        self.state
    }

    pub fn is_hydrated(&self) -> bool {
        self.background.is_some() && self.foreground.is_some()
    }

    /// Load both sprite layers. `view_scale` sizes the background plate.
    pub async fn hydrate<L: AssetLoader + ?Sized>(
        &mut self,
        loader: &L,
        view_scale: f64,
    ) -> OverlayResult<()> {
        if self.state != WaymarkState::Uninitialized {
            return Err(OverlayError::validation(format!(
                "waymark {} can only be hydrated once (state {:?})",
                self.label.as_str(),
                self.state
            )));
        }
        self.state = WaymarkState::Hydrating;
        match self.load_sprites(loader, view_scale).await {
            Ok(()) => {
                log::debug!("hydrated waymark {}", self.label.as_str());
                Ok(())
            }
            Err(e) => {
                log::warn!("waymark {} failed to hydrate: {e}", self.label.as_str());
                self.state = WaymarkState::Failed;
                self.background = None;
                self.foreground = None;
                Err(e)
            }
        }
    }

    async fn load_sprites<L: AssetLoader + ?Sized>(
        &mut self,
        loader: &L,
        view_scale: f64,
    ) -> OverlayResult<()> {
        let bg_texture = loader.load(&self.label.background_asset()).await?;
        let mut background = Node::sprite("background", bg_texture);
        background.set_anchor(DVec2::splat(0.5));
        background.set_scale(view_scale);

        let fg_texture = loader.load(&self.label.foreground_asset()).await?;
        let mut foreground = Node::sprite("foreground", fg_texture);
        foreground.set_anchor(DVec2::splat(0.5));
        foreground.set_scale(FOREGROUND_SCALE);

        self.background = Some(background);
        self.foreground = Some(foreground);
        Ok(())
    }

    /// Fix position, alpha and icon rotation. Only valid once, after hydration.
    pub fn place(&mut self, position: &WaymarkPosition, default_alpha: f32) -> OverlayResult<()> {
        if self.state != WaymarkState::Hydrating || !self.is_hydrated() {
            return Err(OverlayError::validation(format!(
                "waymark {} must be hydrated and unplaced before placement (state {:?})",
                self.label.as_str(),
                self.state
            )));
        }
        let canvas = position.to_canvas()?;
        let rotation = ensure_finite("waymark rotation", position.rotation.unwrap_or(0.0))?;
        self.position = canvas;
        self.alpha = position.alpha.unwrap_or(default_alpha);
        if let Some(fg) = self.foreground.as_mut() {
            fg.rotation = rotation;
        }
        self.state = WaymarkState::Placed;
        Ok(())
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Scene node with the background under the foreground
    pub fn to_node(&self) -> OverlayResult<Node> {
        if self.state != WaymarkState::Placed {
            return Err(OverlayError::validation(format!(
                "waymark {} is not placed",
                self.label.as_str()
            )));
        }
        let mut node = Node::container(self.label.node_label())
            .with_position(self.position)
            .with_alpha(self.alpha);
        node.add_child(self.background.clone().unwrap_or_else(|| Node::container("background")));
        node.add_child(self.foreground.clone().unwrap_or_else(|| Node::container("foreground")));
        Ok(node)
    }
}

/// What was placed for one label
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedWaymark {
    pub label: WaymarkLabel,
    /// Canvas pixels
    pub position: DVec2,
    pub alpha: f32,
    pub rotation: f64,
    pub background: AssetRef,
    pub foreground: AssetRef,
}

/// Hydrate and place every waymark in `data`, adding each to `container`
pub async fn set_waymark<L: AssetLoader + ?Sized>(
    container: &mut Node,
    data: &WaymarkData,
    alpha: f32,
    view_scale: f64,
    loader: &L,
) -> OverlayResult<BTreeMap<WaymarkLabel, PlacedWaymark>> {
    let mut placed = BTreeMap::new();
    for (&label, position) in data {
        let mut waymark = Waymark::new(label);
        waymark.hydrate(loader, view_scale).await?;
        waymark.place(position, alpha)?;
        container.add_child(waymark.to_node()?);
        placed.insert(
            label,
            PlacedWaymark {
                label,
                position: waymark.position(),
                alpha: waymark.alpha(),
                rotation: position.rotation.unwrap_or(0.0),
                background: label.background_asset(),
                foreground: label.foreground_asset(),
            },
        );
    }
    log::debug!("placed {} waymarks", placed.len());
    Ok(placed)
}

/// Detach a previously placed waymark from `container`
pub fn remove_waymark(container: &mut Node, label: WaymarkLabel) -> Option<Node> {
    container.remove_child(&label.node_label())
}
