//! CPU reference renderer
//!
//! Paths and sprites are rasterized by `vello_cpu` in scene passes. Each pass is flushed into a
//! premultiplied f32 layer, where the glow and range-area filters, masks and node alpha are
//! applied before compositing onto the parent layer. Tiling sprites and radial gradients are
//! paints of the same passes.

use glam::DAffine2;
use std::f32::consts::TAU;
use std::sync::Arc;

use vello_cpu::kurbo as cpu_kurbo;
use vello_cpu::peniko;

use super::Renderer;
use super::color::Color;
use super::filter::{DropShadowFilter, Filter, GlowFilter, RangeAreaFilter};
use super::node::{Content, GradientStop, Node};
use super::shapes::{Bounds, PATH_TOLERANCE, ShapePath};
use super::texture::{Rgba8, Texture};
use crate::error::{OverlayError, OverlayResult};

/// Caps on glow sampling so large glows stay affordable
const MAX_GLOW_DIRECTIONS: usize = 24;
const MAX_GLOW_STEPS: usize = 12;
const RANGE_AREA_DIRECTIONS: usize = 16;

pub struct CpuRenderer {
    max_texture_size: u32,
    extracted: usize,
}

impl Default for CpuRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuRenderer {
    pub fn new() -> Self {
        Self {
            max_texture_size: 8192,
            extracted: 0,
        }
    }

    pub fn with_max_texture_size(mut self, size: u32) -> Self {
        self.max_texture_size = size;
        self
    }

    /// Number of textures extracted so far
    pub fn extract_count(&self) -> usize {
        self.extracted
    }

    fn render_node(
        &self,
        node: &Node,
        world: DAffine2,
        alpha: f32,
        layer: &mut Layer,
    ) -> OverlayResult<()> {
        let alpha = alpha * node.alpha;
        if alpha <= 0.0 {
            return Ok(());
        }
        if !needs_offscreen(node) {
            let mut pass = ScenePass::new(layer.width, layer.height);
            self.draw_subtree(node, world, alpha, &mut pass, layer)?;
            pass.flush_into(layer);
            return Ok(());
        }

        let mut offscreen = Layer::new(layer.width, layer.height);
        let mut pass = ScenePass::new(layer.width, layer.height);
        self.draw_subtree(node, world, 1.0, &mut pass, &mut offscreen)?;
        pass.flush_into(&mut offscreen);
        for filter in &node.filters {
            offscreen = match filter {
                Filter::Glow(glow) => apply_glow(&offscreen, glow),
                Filter::RangeArea(area) => apply_range_area(&offscreen, area),
                Filter::DropShadow(shadow) => apply_drop_shadow(&offscreen, shadow),
            };
        }
        if let Some(mask) = &node.mask {
            let mut coverage = Layer::new(layer.width, layer.height);
            self.render_node(mask, world * mask.local_transform(), 1.0, &mut coverage)?;
            offscreen.mask_by(&coverage);
        }
        layer.composite(&offscreen, alpha);
        Ok(())
    }

    /// Queue `node` and its plain descendants on `pass`; filtered or masked children flush the
    /// pass and go through their own offscreen layer so draw order is kept.
    fn draw_subtree(
        &self,
        node: &Node,
        world: DAffine2,
        alpha: f32,
        pass: &mut ScenePass,
        layer: &mut Layer,
    ) -> OverlayResult<()> {
        match &node.content {
            Content::Empty => {}
            Content::Graphics { path, fill } => {
                pass.fill_path(path, world, fill.color, fill.alpha * alpha)
            }
            Content::Sprite(texture) => pass.draw_texture(texture, world, alpha)?,
            Content::TilingSprite {
                texture,
                width,
                height,
            } => pass.draw_tiling(texture, *width, *height, world, alpha)?,
            Content::RadialGradient { radius, stops } => {
                pass.fill_radial_gradient(*radius, stops, world, alpha)
            }
        }
        for child in node.children() {
            let child_world = world * child.local_transform();
            if needs_offscreen(child) {
                pass.flush_into(layer);
                self.render_node(child, child_world, alpha, layer)?;
            } else {
                let child_alpha = alpha * child.alpha;
                if child_alpha > 0.0 {
                    self.draw_subtree(child, child_world, child_alpha, pass, layer)?;
                }
            }
        }
        Ok(())
    }
}

fn needs_offscreen(node: &Node) -> bool {
    !node.filters.is_empty() || node.mask.is_some()
}

impl Renderer for CpuRenderer {
    fn extract_texture(&mut self, target: &Node, frame: Bounds) -> OverlayResult<Texture> {
        if !frame.is_finite() || frame.width() <= 0.0 || frame.height() <= 0.0 {
            return Err(OverlayError::resource(format!(
                "cannot extract '{}' from an empty frame {frame:?}",
                target.label
            )));
        }
        let width = frame.width().ceil();
        let height = frame.height().ceil();
        let limit = (self.max_texture_size as f64).min(u16::MAX as f64);
        if width > limit || height > limit {
            return Err(OverlayError::resource(format!(
                "frame {width}x{height} for '{}' exceeds max texture size {}",
                target.label, self.max_texture_size
            )));
        }

        let mut canvas = Layer::new(width as u16, height as u16);
        // The target is rendered in its own local frame; its placement is ignored
        let base = DAffine2::from_translation(-frame.min);
        self.render_node(target, base, 1.0, &mut canvas)?;
        self.extracted += 1;
        log::debug!(
            "extracted '{}' as {}x{} texture",
            target.label,
            canvas.width,
            canvas.height
        );
        canvas.into_texture()
    }
}

/// Batch of vector draws rasterized together by `vello_cpu`
struct ScenePass {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
    pending: bool,
}

impl ScenePass {
    fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            ctx: vello_cpu::RenderContext::new(width, height),
            pending: false,
        }
    }

    fn fill_path(&mut self, path: &ShapePath, world: DAffine2, color: Color, alpha: f32) {
        let alpha = alpha.clamp(0.0, 1.0);
        if alpha <= 0.0 || path.is_empty() {
            return;
        }
        let a = (alpha * 255.0).round() as u8;
        self.ctx.set_transform(affine_to_cpu(world));
        self.ctx
            .set_paint(peniko::Color::from_rgba8(color.r, color.g, color.b, a));
        self.ctx.set_fill_rule(peniko::Fill::EvenOdd);
        self.ctx.fill_path(&bezpath_to_cpu(path.as_bezpath()));
        self.pending = true;
    }

    fn draw_texture(
        &mut self,
        texture: &Texture,
        world: DAffine2,
        alpha: f32,
    ) -> OverlayResult<()> {
        if alpha <= 0.0 || world.matrix2.determinant().abs() < f64::EPSILON {
            return Ok(());
        }
        let paint = texture_to_image(texture, peniko::ImageSampler::default())?;
        self.fill_image(
            paint,
            f64::from(texture.width()),
            f64::from(texture.height()),
            world,
            alpha,
        );
        Ok(())
    }

    /// Repeat `texture` across a `width` x `height` rect anchored at the local origin
    fn draw_tiling(
        &mut self,
        texture: &Texture,
        width: f64,
        height: f64,
        world: DAffine2,
        alpha: f32,
    ) -> OverlayResult<()> {
        if alpha <= 0.0 || width <= 0.0 || height <= 0.0 {
            return Ok(());
        }
        if world.matrix2.determinant().abs() < f64::EPSILON {
            return Ok(());
        }
        let sampler = peniko::ImageSampler {
            x_extend: peniko::Extend::Repeat,
            y_extend: peniko::Extend::Repeat,
            ..Default::default()
        };
        let paint = texture_to_image(texture, sampler)?;
        self.fill_image(paint, width, height, world, alpha);
        Ok(())
    }

    fn fill_image(
        &mut self,
        paint: vello_cpu::Image,
        width: f64,
        height: f64,
        world: DAffine2,
        alpha: f32,
    ) {
        self.ctx.set_transform(affine_to_cpu(world));
        self.ctx.set_paint(paint);
        if alpha < 1.0 {
            self.ctx.push_opacity_layer(alpha);
        }
        self.ctx.fill_rect(&cpu_kurbo::Rect::new(0.0, 0.0, width, height));
        if alpha < 1.0 {
            self.ctx.pop_layer();
        }
        self.pending = true;
    }

    /// Disc of `radius` around the local origin shaded by a radial gradient
    fn fill_radial_gradient(
        &mut self,
        radius: f64,
        stops: &[GradientStop],
        world: DAffine2,
        alpha: f32,
    ) {
        if alpha <= 0.0 || radius <= 0.0 || stops.is_empty() {
            return;
        }
        let stops: Vec<(f32, peniko::Color)> = stops
            .iter()
            .map(|stop| {
                let a = (stop.alpha * alpha).clamp(0.0, 1.0);
                let c = stop.color;
                let color = peniko::Color::from_rgba8(c.r, c.g, c.b, (a * 255.0).round() as u8);
                (stop.offset.clamp(0.0, 1.0), color)
            })
            .collect();
        let gradient = peniko::Gradient::new_radial(cpu_kurbo::Point::ORIGIN, radius as f32)
            .with_stops(stops.as_slice());
        self.ctx.set_transform(affine_to_cpu(world));
        self.ctx.set_paint(gradient);
        self.ctx.set_fill_rule(peniko::Fill::NonZero);
        let disc = cpu_kurbo::Circle::new(cpu_kurbo::Point::ORIGIN, radius);
        self.ctx.fill_path(&cpu_kurbo::Shape::to_path(&disc, PATH_TOLERANCE));
        self.pending = true;
    }

    /// Rasterize queued draws and source-over them onto `layer`
    fn flush_into(&mut self, layer: &mut Layer) {
        if !self.pending {
            return;
        }
        self.ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.render_to_pixmap(&mut pixmap);
        layer.composite_rgba8(pixmap.data_as_u8_slice());
        self.ctx = vello_cpu::RenderContext::new(self.width, self.height);
        self.pending = false;
    }
}

fn affine_to_cpu(a: DAffine2) -> cpu_kurbo::Affine {
    cpu_kurbo::Affine::new([
        a.matrix2.x_axis.x,
        a.matrix2.x_axis.y,
        a.matrix2.y_axis.x,
        a.matrix2.y_axis.y,
        a.translation.x,
        a.translation.y,
    ])
}

fn point_to_cpu(p: kurbo::Point) -> cpu_kurbo::Point {
    cpu_kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &kurbo::BezPath) -> cpu_kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = cpu_kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

/// Wrap a premultiplied texture as a `vello_cpu` image paint
fn texture_to_image(
    texture: &Texture,
    sampler: peniko::ImageSampler,
) -> OverlayResult<vello_cpu::Image> {
    let too_large = || {
        OverlayError::resource(format!(
            "texture {}x{} exceeds the rasterizer limit",
            texture.width(),
            texture.height()
        ))
    };
    let w: u16 = texture.width().try_into().map_err(|_| too_large())?;
    let h: u16 = texture.height().try_into().map_err(|_| too_large())?;

    let mut may_have_opacities = false;
    let pixels = texture
        .pixels()
        .iter()
        .map(|px| {
            may_have_opacities |= px.a != 255;
            peniko::color::PremulRgba8 {
                r: px.r,
                g: px.g,
                b: px.b,
                a: px.a,
            }
        })
        .collect();
    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, may_have_opacities);
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler,
    })
}

/// Premultiplied float RGBA raster
struct Layer {
    width: u16,
    height: u16,
    data: Vec<[f32; 4]>,
}

impl Layer {
    fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            data: vec![[0.0; 4]; usize::from(width) * usize::from(height)],
        }
    }

    #[inline]
    fn blend_over(&mut self, idx: usize, src: [f32; 4]) {
        let dst = &mut self.data[idx];
        let inv = 1.0 - src[3];
        for c in 0..4 {
            dst[c] = src[c] + dst[c] * inv;
        }
    }

    /// Alpha at integer coordinates; transparent outside the raster
    #[inline]
    fn alpha_at(&self, x: i64, y: i64) -> f32 {
        let (w, h) = (i64::from(self.width), i64::from(self.height));
        if x < 0 || y < 0 || x >= w || y >= h {
            return 0.0;
        }
        self.data[(y * w + x) as usize][3]
    }

    /// Source-over premultiplied RGBA8 bytes of the same size
    fn composite_rgba8(&mut self, bytes: &[u8]) {
        for (idx, px) in bytes.chunks_exact(4).enumerate().take(self.data.len()) {
            if px[3] > 0 {
                let src = Rgba8::new(px[0], px[1], px[2], px[3]).to_premul_f32();
                self.blend_over(idx, src);
            }
        }
    }

    /// Source-over another layer scaled by `opacity`
    fn composite(&mut self, layer: &Layer, opacity: f32) {
        for idx in 0..self.data.len() {
            let src = layer.data[idx];
            if src[3] > 0.0 {
                self.blend_over(idx, src.map(|c| c * opacity));
            }
        }
    }

    /// Multiply every pixel by the mask's alpha
    fn mask_by(&mut self, mask: &Layer) {
        for (px, m) in self.data.iter_mut().zip(&mask.data) {
            let k = m[3].clamp(0.0, 1.0);
            *px = px.map(|c| c * k);
        }
    }

    fn into_texture(self) -> OverlayResult<Texture> {
        let pixels = self.data.into_iter().map(Rgba8::from_premul_f32).collect();
        Texture::new(u32::from(self.width), u32::from(self.height), pixels)
    }
}

/// Sample offsets and weights for a glow of the given reach
fn glow_kernel(glow: &GlowFilter) -> Vec<(i64, i64, f32)> {
    let distance = glow.distance;
    let directions =
        ((TAU * glow.quality.max(0.0) * distance).round() as usize).clamp(8, MAX_GLOW_DIRECTIONS);
    let steps = (distance.round() as usize).clamp(1, MAX_GLOW_STEPS);
    let mut kernel = Vec::with_capacity(directions * steps);
    for d in 0..directions {
        let theta = d as f32 / directions as f32 * TAU;
        let (sin, cos) = theta.sin_cos();
        for k in 0..steps {
            let reach = (k + 1) as f32 * distance / steps as f32;
            kernel.push((
                (cos * reach).round() as i64,
                (sin * reach).round() as i64,
                (steps - k) as f32,
            ));
        }
    }
    kernel
}

fn apply_glow(src: &Layer, glow: &GlowFilter) -> Layer {
    let mut out = Layer::new(src.width, src.height);
    if glow.distance < 1.0 {
        if !glow.knockout {
            out.data.clone_from(&src.data);
        }
        return out;
    }

    let kernel = glow_kernel(glow);
    let max_total: f32 = kernel.iter().map(|k| k.2).sum();
    let [gr, gg, gb] = glow.color.to_f32();
    let glow_px = [gr, gg, gb, 1.0];

    let (width, height) = (usize::from(src.width), usize::from(src.height));
    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            let cur = src.data[idx];
            let a = cur[3];
            // Outside the shape only an outer glow can contribute
            if a <= 0.0 && glow.outer_strength <= 0.0 {
                continue;
            }

            let total: f32 = kernel
                .iter()
                .map(|&(dx, dy, w)| w * src.alpha_at(x as i64 + dx, y as i64 + dy))
                .sum();
            let ratio = total / max_total;

            let inner = ((1.0 - ratio) * glow.inner_strength * a).min(1.0);
            let inner_color: [f32; 4] =
                std::array::from_fn(|c| cur[c] * (1.0 - inner) + glow_px[c] * inner);
            let outer = (ratio * glow.outer_strength * (1.0 - a))
                .min(1.0 - inner_color[3])
                .max(0.0);

            out.data[idx] = if glow.knockout {
                let ra = ((outer + inner) * glow.alpha).clamp(0.0, 1.0);
                [gr * ra, gg * ra, gb * ra, ra]
            } else {
                std::array::from_fn(|c| {
                    (inner_color[c] + glow_px[c] * outer * glow.alpha).clamp(0.0, 1.0)
                })
            };
        }
    }
    out
}

fn apply_range_area(src: &Layer, area: &RangeAreaFilter) -> Layer {
    let mut out = Layer::new(src.width, src.height);
    let band = area.inner_shadow1_size.max(area.inner_shadow2_size).max(1.0);
    let max_steps = band.ceil() as usize;
    let directions: Vec<(f32, f32)> = (0..RANGE_AREA_DIRECTIONS)
        .map(|d| (d as f32 / RANGE_AREA_DIRECTIONS as f32 * TAU).sin_cos())
        .map(|(sin, cos)| (cos, sin))
        .collect();

    let (width, height) = (usize::from(src.width), usize::from(src.height));
    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            let coverage = src.data[idx][3];
            if coverage <= 0.0 {
                continue;
            }

            let mut edge = band;
            for &(cos, sin) in &directions {
                let hit = (1..=max_steps).find(|&k| {
                    let k = k as f32;
                    src.alpha_at(
                        (x as f32 + cos * k).round() as i64,
                        (y as f32 + sin * k).round() as i64,
                    ) < 0.5
                });
                if let Some(k) = hit {
                    edge = edge.min(k as f32);
                }
            }

            let mut color = area.base_color;
            for (shadow, size) in [
                (area.inner_shadow2_color, area.inner_shadow2_size),
                (area.inner_shadow1_color, area.inner_shadow1_size),
            ] {
                if size <= 0.0 {
                    continue;
                }
                let t = (1.0 - edge / size).clamp(0.0, 1.0);
                color = std::array::from_fn(|c| color[c] + (shadow[c] - color[c]) * t);
            }

            let a = (color[3] * coverage).clamp(0.0, 1.0);
            out.data[idx] = [color[0] * a, color[1] * a, color[2] * a, a];
        }
    }
    out
}

/// Normalized gaussian weights over `-radius..=radius`
fn gaussian_kernel(radius: u32, sigma: f32) -> Vec<f32> {
    let r = radius as i64;
    let denom = 2.0 * sigma * sigma;
    let weights: Vec<f32> = (-r..=r)
        .map(|i| (-((i * i) as f32) / denom).exp())
        .collect();
    let sum: f32 = weights.iter().sum();
    weights.into_iter().map(|w| w / sum).collect()
}

/// Separable blur of the alpha channel; the raster is transparent past its edges
fn blur_alpha(src: &Layer, radius: u32, sigma: f32) -> Vec<f32> {
    let (width, height) = (usize::from(src.width), usize::from(src.height));
    let alpha: Vec<f32> = src.data.iter().map(|px| px[3]).collect();
    if radius == 0 {
        return alpha;
    }
    let kernel = gaussian_kernel(radius, sigma);
    let r = radius as i64;

    let mut tmp = vec![0.0; alpha.len()];
    for y in 0..height {
        for x in 0..width {
            tmp[y * width + x] = kernel
                .iter()
                .enumerate()
                .map(|(k, w)| w * src.alpha_at(x as i64 + k as i64 - r, y as i64))
                .sum();
        }
    }
    let mut out = vec![0.0; alpha.len()];
    for y in 0..height {
        for x in 0..width {
            out[y * width + x] = kernel
                .iter()
                .enumerate()
                .filter_map(|(k, w)| {
                    let sy = y as i64 + k as i64 - r;
                    (0..height as i64)
                        .contains(&sy)
                        .then(|| w * tmp[sy as usize * width + x])
                })
                .sum();
        }
    }
    out
}

fn apply_drop_shadow(src: &Layer, shadow: &DropShadowFilter) -> Layer {
    let blurred = blur_alpha(src, shadow.blur_radius, shadow.sigma());
    let (dx, dy) = (
        shadow.offset[0].round() as i64,
        shadow.offset[1].round() as i64,
    );
    let [sr, sg, sb] = shadow.color.to_f32();
    let (width, height) = (usize::from(src.width), usize::from(src.height));

    let mut out = Layer::new(src.width, src.height);
    for y in 0..height {
        for x in 0..width {
            let (sx, sy) = (x as i64 - dx, y as i64 - dy);
            if sx < 0 || sy < 0 || sx >= width as i64 || sy >= height as i64 {
                continue;
            }
            let a = (blurred[sy as usize * width + sx as usize] * shadow.alpha).clamp(0.0, 1.0);
            out.data[y * width + x] = [sr * a, sg * a, sb * a, a];
        }
    }
    if !shadow.shadow_only {
        out.composite(src, 1.0);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::node::Fill;
    use glam::DVec2;

    fn disc(radius: f64) -> Node {
        Node::graphics("disc", ShapePath::circle(DVec2::ZERO, radius), Fill::white())
    }

    fn frame(half: f64) -> Bounds {
        Bounds::new(DVec2::splat(-half), DVec2::splat(half))
    }

    fn alpha(tex: &Texture, x: u32, y: u32) -> u8 {
        tex.pixel(x, y).map(|p| p.a).unwrap_or(0)
    }

    #[test]
    fn test_fill_covers_inside_only() {
        let mut renderer = CpuRenderer::new();
        let tex = renderer.extract_texture(&disc(8.0), frame(10.0)).unwrap();
        assert_eq!((tex.width(), tex.height()), (20, 20));
        assert_eq!(alpha(&tex, 10, 10), 255);
        assert_eq!(alpha(&tex, 0, 0), 0);
        assert_eq!(alpha(&tex, 19, 10), 0);
        assert_eq!(renderer.extract_count(), 1);
    }

    #[test]
    fn test_rect_edges_are_antialiased() {
        let node = Node::graphics(
            "rect",
            ShapePath::rect(0.0, 0.0, 4.5, 2.0),
            Fill::new(Color::WHITE, 1.0),
        );
        let tex = CpuRenderer::new()
            .extract_texture(&node, Bounds::from_rect(0.0, 0.0, 6.0, 2.0))
            .unwrap();
        assert_eq!(alpha(&tex, 3, 0), 255);
        // Half-covered column
        assert!((i32::from(alpha(&tex, 4, 1)) - 128).abs() <= 2);
        assert_eq!(alpha(&tex, 5, 1), 0);
    }

    #[test]
    fn test_node_alpha_and_mask() {
        let mut node = disc(8.0).with_alpha(0.5);
        node.set_mask(Node::graphics(
            "half",
            ShapePath::rect(0.0, -10.0, 10.0, 20.0),
            Fill::white(),
        ));
        let tex = CpuRenderer::new().extract_texture(&node, frame(10.0)).unwrap();
        assert_eq!(alpha(&tex, 14, 10), 128);
        assert_eq!(alpha(&tex, 5, 10), 0);
    }

    #[test]
    fn test_knockout_inner_glow_is_a_rim() {
        let glow = GlowFilter {
            distance: 4.0,
            inner_strength: 4.0,
            outer_strength: 0.0,
            quality: 0.5,
            knockout: true,
            ..Default::default()
        };
        let mut layer = Node::container("glow").with_filter(glow);
        layer.add_child(disc(8.0));
        let tex = CpuRenderer::new().extract_texture(&layer, frame(10.0)).unwrap();
        // Deep inside the disc the knockout glow is empty, near the edge it is not
        assert_eq!(alpha(&tex, 10, 10), 0);
        assert!(alpha(&tex, 17, 10) > 0);
        // Nothing spills outside with zero outer strength
        assert_eq!(alpha(&tex, 19, 10), 0);
    }

    #[test]
    fn test_outer_glow_spills() {
        let glow = GlowFilter {
            distance: 3.0,
            outer_strength: 4.0,
            ..Default::default()
        };
        let mut layer = Node::container("glow").with_filter(glow);
        layer.add_child(disc(5.0));
        let tex = CpuRenderer::new().extract_texture(&layer, frame(10.0)).unwrap();
        assert!(alpha(&tex, 16, 10) > 0);
        assert_eq!(alpha(&tex, 10, 10), 255);
    }

    #[test]
    fn test_sprite_draw_with_pivot() {
        let tex = Texture::solid(4, 4, Rgba8::new(255, 0, 0, 255)).unwrap();
        let mut sprite = Node::sprite("s", tex);
        sprite.set_anchor(DVec2::splat(0.5));
        let mut root = Node::container("root");
        root.add_child(sprite);
        let out = CpuRenderer::new().extract_texture(&root, frame(4.0)).unwrap();
        assert_eq!(out.pixel(4, 4), Some(Rgba8::new(255, 0, 0, 255)));
        assert_eq!(alpha(&out, 1, 1), 0);
    }

    #[test]
    fn test_range_area_darkens_edges() {
        let area = RangeAreaFilter {
            base_color: [1.0, 1.0, 1.0, 0.3],
            inner_shadow1_color: [1.0, 0.0, 0.0, 1.0],
            inner_shadow1_size: 2.0,
            inner_shadow2_color: [1.0, 0.0, 0.0, 1.0],
            inner_shadow2_size: 4.0,
        };
        let mut layer = Node::container("area").with_filter(area);
        layer.add_child(disc(9.0));
        let tex = CpuRenderer::new().extract_texture(&layer, frame(10.0)).unwrap();
        let center = tex.pixel(10, 10).unwrap();
        let edge = tex.pixel(18, 10).unwrap();
        assert!(edge.a > center.a);
        assert_eq!(center.a, (0.3f32 * 255.0).round() as u8);
    }

    #[test]
    fn test_tiling_sprite_repeats() {
        let mut pixels = vec![Rgba8::new(0, 0, 255, 255); 4];
        pixels[0] = Rgba8::new(255, 0, 0, 255);
        let tile = Texture::new(2, 2, pixels).unwrap();
        let strip = Node::tiling_sprite("strip", tile, 8.0, 2.0);
        let tex = CpuRenderer::new()
            .extract_texture(&strip, Bounds::from_rect(0.0, 0.0, 8.0, 2.0))
            .unwrap();
        for x in [0, 2, 4, 6] {
            let red = tex.pixel(x, 0).unwrap();
            let blue = tex.pixel(x + 1, 0).unwrap();
            assert!(red.r > 200 && red.b < 55, "texel {x}: {red:?}");
            assert!(blue.b > 200 && blue.r < 55, "texel {}: {blue:?}", x + 1);
        }
        assert!(tex.pixels().iter().all(|px| px.a == 255));
    }

    #[test]
    fn test_shadow_only_drop_shadow_is_a_silhouette() {
        let shadow = DropShadowFilter {
            alpha: 1.0,
            offset: [0.0, 0.0],
            blur_radius: 2,
            shadow_only: true,
            ..Default::default()
        };
        let mut layer = Node::container("shadow").with_filter(shadow);
        layer.add_child(disc(6.0));
        let tex = CpuRenderer::new().extract_texture(&layer, frame(10.0)).unwrap();
        // The white disc is gone, only its black blurred silhouette remains
        assert_eq!(tex.pixel(10, 10), Some(Rgba8::new(0, 0, 0, 255)));
        let rim = tex.pixel(16, 10).unwrap();
        assert!(rim.a > 0 && rim.a < 255);
        assert_eq!((rim.r, rim.g, rim.b), (0, 0, 0));
        assert_eq!(alpha(&tex, 0, 0), 0);
    }

    #[test]
    fn test_drop_shadow_keeps_source_on_top() {
        let shadow = DropShadowFilter {
            alpha: 1.0,
            offset: [4.0, 0.0],
            blur_radius: 0,
            ..Default::default()
        };
        let mut layer = Node::container("shadow").with_filter(shadow);
        layer.add_child(disc(4.0));
        let tex = CpuRenderer::new().extract_texture(&layer, frame(10.0)).unwrap();
        assert_eq!(tex.pixel(10, 10), Some(Rgba8::new(255, 255, 255, 255)));
        // Past the disc's right edge the offset shadow shows through
        assert_eq!(tex.pixel(16, 10), Some(Rgba8::new(0, 0, 0, 255)));
        assert_eq!(alpha(&tex, 3, 10), 0);
    }

    #[test]
    fn test_radial_gradient_fades_outward() {
        let stops = vec![
            GradientStop::new(0.0, Color::WHITE, 0.4),
            GradientStop::new(1.0, Color::WHITE, 0.0),
        ];
        let node = Node::radial_gradient("glow", 10.0, stops);
        let tex = CpuRenderer::new().extract_texture(&node, frame(10.0)).unwrap();
        let center = i32::from(alpha(&tex, 10, 10));
        assert!((center - 102).abs() <= 4, "center alpha {center}");
        assert!(alpha(&tex, 15, 10) < alpha(&tex, 11, 10));
        assert_eq!(alpha(&tex, 0, 0), 0);
    }

    #[test]
    fn test_bad_frames_are_resource_errors() {
        let mut renderer = CpuRenderer::new().with_max_texture_size(16);
        let err = renderer.extract_texture(&disc(1.0), frame(10.0)).unwrap_err();
        assert!(matches!(err, OverlayError::Resource(_)));
        let empty = Bounds::new(DVec2::ZERO, DVec2::ZERO);
        assert!(renderer.extract_texture(&disc(1.0), empty).is_err());
        assert_eq!(renderer.extract_count(), 0);
    }
}
