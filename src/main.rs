//! AoE Overlay entry point
//!
//! Builds one of the arena scenarios, renders it with the CPU renderer and writes a PNG.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use glam::DVec2;

use aoe_overlay::assets::FsAssetLoader;
use aoe_overlay::effects;
use aoe_overlay::encounter::{self, CrossRotation};
use aoe_overlay::renderer::{Bounds, CpuRenderer, Node, Renderer};
use aoe_overlay::settings::OverlaySettings;
use aoe_overlay::waymark::set_waymark;

/// Half extent of the rendered arena in world units
const ARENA_HALF_EXTENT: f64 = 20.0;
/// Radius of each circle in the radial scenario
const RADIAL_RADIUS: f64 = 6.0;
/// Polar offsets `(r, degrees)` of the radial circles
const RADIAL_OFFSETS: [(f64, f64); 4] = [(10.0, 45.0), (10.0, 135.0), (10.0, 225.0), (10.0, 315.0)];
/// Inner and outer radius of the gradient ring scenario
const RING_RADII: (f64, f64) = (8.0, 15.0);
/// Tether span in canvas pixels
const TETHER_LENGTH: f64 = 300.0;

#[derive(Parser, Debug)]
#[command(name = "aoe-overlay", version)]
struct Cli {
    /// Scenario to render.
    #[arg(long, value_enum, default_value_t = ScenarioChoice::CrossFang)]
    scenario: ScenarioChoice,

    /// Orientation of the cross-fang rects.
    #[arg(long, value_enum, default_value_t = RotateChoice::Straight)]
    rotate: RotateChoice,

    /// Use Ring(8, 15) instead of Circle(9) in the cross-fang center.
    #[arg(long)]
    ring: bool,

    /// Draw the cross-fang in its activated palettes.
    #[arg(long)]
    activate: bool,

    /// Asset root for waymark sprites; waymarks are drawn when set.
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Settings JSON; defaults are used when absent.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ScenarioChoice {
    CrossFang,
    RadialCircles,
    Waymarks,
    GradientRing,
    DarkTether,
    ArrowTether,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RotateChoice {
    Straight,
    Diagonal,
    Both,
}

impl From<RotateChoice> for CrossRotation {
    fn from(choice: RotateChoice) -> Self {
        match choice {
            RotateChoice::Straight => CrossRotation::Straight,
            RotateChoice::Diagonal => CrossRotation::Diagonal,
            RotateChoice::Both => CrossRotation::Both,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let settings = match &cli.settings {
        Some(path) => OverlaySettings::load(path)
            .with_context(|| format!("load settings {}", path.display()))?,
        None => OverlaySettings::default(),
    };
    let options = settings.aoe_options();
    let mut renderer = CpuRenderer::new();
    let mut scene = Node::container("scene");

    match cli.scenario {
        ScenarioChoice::CrossFang => scene.add_child(encounter::cross_fang(
            &mut renderer,
            cli.rotate.into(),
            cli.ring,
            cli.activate,
            &options,
            &settings.mask,
        )?),
        ScenarioChoice::RadialCircles => scene.add_child(encounter::radial_circles(
            &mut renderer,
            RADIAL_RADIUS,
            &RADIAL_OFFSETS,
            &options,
            &settings.mask,
        )?),
        ScenarioChoice::GradientRing => scene.add_child(effects::create_gradient_ring(
            &mut renderer,
            DVec2::ZERO,
            RING_RADII.0,
            RING_RADII.1,
            settings.camera.view_scale()?,
        )?),
        ScenarioChoice::DarkTether | ScenarioChoice::ArrowTether => {
            let root = cli
                .assets
                .as_ref()
                .context("the tether scenarios need --assets <dir>")?;
            let loader = FsAssetLoader::new(root);
            let tether = if matches!(cli.scenario, ScenarioChoice::DarkTether) {
                pollster::block_on(effects::create_dark_tether(
                    &mut renderer,
                    &loader,
                    TETHER_LENGTH,
                ))
            } else {
                pollster::block_on(effects::create_arrow_tether(
                    &mut renderer,
                    &loader,
                    TETHER_LENGTH,
                ))
            };
            scene.add_child(
                tether.with_context(|| format!("build tether from {}", root.display()))?,
            );
        }
        ScenarioChoice::Waymarks => {}
    }

    match &cli.assets {
        Some(root) => {
            let loader = FsAssetLoader::new(root);
            let view_scale = settings.camera.view_scale()?;
            let mut waymarks = Node::container("waymarks");
            pollster::block_on(set_waymark(
                &mut waymarks,
                &encounter::arena_waymarks(),
                1.0,
                view_scale,
                &loader,
            ))
            .with_context(|| format!("place waymarks from {}", root.display()))?;
            scene.add_child(waymarks);
        }
        None if matches!(cli.scenario, ScenarioChoice::Waymarks) => {
            anyhow::bail!("the waymarks scenario needs --assets <dir>");
        }
        None => {}
    }

    let half = DVec2::splat(ARENA_HALF_EXTENT * aoe_overlay::consts::YM_TO_PX);
    let texture = renderer
        .extract_texture(&scene, Bounds::new(-half, half))
        .context("render scene")?;
    texture
        .to_rgba_image()
        .save(&cli.out)
        .with_context(|| format!("write {}", cli.out.display()))?;

    log::info!(
        "Wrote {:?} scene ({}x{}, {} bakes) to {}",
        cli.scenario,
        texture.width(),
        texture.height(),
        renderer.extract_count(),
        cli.out.display()
    );
    Ok(())
}
