//! Role and enemy icons
//!
//! A role string is either a single role (`"healer"`, `"boss"`) or two base roles joined by
//! `|` (`"tank|healer"`), drawn as one icon split down the middle.

use glam::DVec2;
use std::fmt;
use std::str::FromStr;

use crate::assets::{AssetLoader, AssetRef};
use crate::error::{OverlayError, OverlayResult};
use crate::renderer::{Fill, Node, ShapePath};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleKind {
    Any,
    All,
    Tank,
    Healer,
    Dps,
    Melee,
    Ranged,
    Magic,
    RangedMagic,
    Boss,
    EnemyLevel1,
}

impl RoleKind {
    pub const ALL: [RoleKind; 11] = [
        RoleKind::Any,
        RoleKind::All,
        RoleKind::Tank,
        RoleKind::Healer,
        RoleKind::Dps,
        RoleKind::Melee,
        RoleKind::Ranged,
        RoleKind::Magic,
        RoleKind::RangedMagic,
        RoleKind::Boss,
        RoleKind::EnemyLevel1,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoleKind::Any => "any",
            RoleKind::All => "all",
            RoleKind::Tank => "tank",
            RoleKind::Healer => "healer",
            RoleKind::Dps => "dps",
            RoleKind::Melee => "melee",
            RoleKind::Ranged => "ranged",
            RoleKind::Magic => "magic",
            RoleKind::RangedMagic => "ranged_magic",
            RoleKind::Boss => "boss",
            RoleKind::EnemyLevel1 => "enemy_level1",
        }
    }

    pub fn asset(&self) -> AssetRef {
        AssetRef(match self {
            RoleKind::Any => "role/any.png",
            RoleKind::All => "role/all.png",
            RoleKind::Tank => "role/tank.png",
            RoleKind::Healer => "role/healer.png",
            RoleKind::Dps => "role/dps.png",
            RoleKind::Melee => "role/melee.png",
            RoleKind::Ranged => "role/ranged.png",
            RoleKind::Magic => "role/magic.png",
            RoleKind::RangedMagic => "role/ranged_magic.png",
            RoleKind::Boss => "enemy/061712.png",
            RoleKind::EnemyLevel1 => "enemy/061707.png",
        })
    }

    /// Tank, healer and dps can be paired into a combined icon
    pub fn is_base(&self) -> bool {
        matches!(self, RoleKind::Tank | RoleKind::Healer | RoleKind::Dps)
    }
}

impl FromStr for RoleKind {
    type Err = OverlayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoleKind::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| OverlayError::validation(format!("unknown role '{s}'")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleIconKind {
    Single(RoleKind),
    /// Left half, right half
    Combined(RoleKind, RoleKind),
}

impl FromStr for RoleIconKind {
    type Err = OverlayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((left, right)) = s.split_once('|') else {
            return Ok(RoleIconKind::Single(s.parse()?));
        };
        let left: RoleKind = left.parse()?;
        let right: RoleKind = right.parse()?;
        if !(left.is_base() && right.is_base()) {
            return Err(OverlayError::validation(format!(
                "combined role '{s}' must pair tank, healer or dps"
            )));
        }
        Ok(RoleIconKind::Combined(left, right))
    }
}

impl fmt::Display for RoleIconKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleIconKind::Single(role) => f.write_str(role.as_str()),
            RoleIconKind::Combined(left, right) => {
                write!(f, "{}|{}", left.as_str(), right.as_str())
            }
        }
    }
}

/// A hydrated icon, ready to be positioned by the caller
#[derive(Debug, Clone, PartialEq)]
pub struct RoleIcon {
    pub kind: RoleIconKind,
    pub tag: String,
    pub node: Node,
}

async fn icon_sprite<L: AssetLoader + ?Sized>(
    role: RoleKind,
    loader: &L,
    scale: f64,
) -> OverlayResult<Node> {
    let texture = loader.load(&role.asset()).await?;
    let mut sprite = Node::sprite(role.as_str(), texture);
    sprite.set_anchor(DVec2::splat(0.5));
    sprite.set_scale(scale);
    Ok(sprite)
}

/// Keep only the left (`x < 0`) or right half of a centered sprite
fn half(sprite: Node, left: bool) -> Node {
    let extent = sprite
        .local_bounds()
        .map(|b| b.transformed(&sprite.local_transform()))
        .map(|b| b.min.abs().max(b.max.abs()).max_element())
        .unwrap_or(0.0)
        + 1.0;
    let x = if left { -extent } else { 0.0 };
    let mut group = Node::container(if left { "left" } else { "right" });
    group.add_child(sprite);
    group.set_mask(Node::graphics(
        "half_mask",
        ShapePath::rect(x, -extent, extent, extent * 2.0),
        Fill::white(),
    ));
    group
}

/// Parse `role` and hydrate its icon through `loader`
pub async fn create_role_icon<L: AssetLoader + ?Sized>(
    role: &str,
    tag: &str,
    loader: &L,
    scale: f64,
) -> OverlayResult<RoleIcon> {
    let kind: RoleIconKind = role.parse()?;
    let mut node = Node::container(format!("role_{kind}"));
    match kind {
        RoleIconKind::Single(role) => node.add_child(icon_sprite(role, loader, scale).await?),
        RoleIconKind::Combined(left, right) => {
            node.add_child(half(icon_sprite(left, loader, scale).await?, true));
            node.add_child(half(icon_sprite(right, loader, scale).await?, false));
        }
    }
    log::debug!("hydrated role icon {kind} tag '{tag}'");
    Ok(RoleIcon {
        kind,
        tag: tag.to_string(),
        node,
    })
}
