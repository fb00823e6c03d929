//! Vello-based renderer implementation.

use crate::ops::{DrawOp, build_ops};
use kurbo::{Affine, Point, Rect, Stroke};
use parley::layout::PositionedLayoutItem;
use parley::{FontContext, LayoutContext};
use peniko::{Brush, Color, Fill};
use steel_core::geometry::{Shadow, TextAlign, WheelFrame};
use steel_core::surface::{SurfaceResult, WheelSurface};
use vello::Scene;

/// Vello-based renderer for GPU-accelerated wheel drawing.
///
/// Presenting a frame rebuilds the scene; the host submits [`Self::scene`]
/// to its `vello::Renderer`.
pub struct VelloRenderer {
    /// The Vello scene being built.
    scene: Scene,
    /// Font context for text rendering (cached between frames).
    font_cx: FontContext,
    /// Layout context for text rendering.
    layout_cx: LayoutContext<Brush>,
}

impl Default for VelloRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloRenderer {
    /// Create a new Vello renderer using system fonts.
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            font_cx: FontContext::new(),
            layout_cx: LayoutContext::new(),
        }
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Rebuild the scene from a frame.
    pub fn build_scene(&mut self, frame: &WheelFrame) {
        self.scene.reset();
        for op in build_ops(frame) {
            match op {
                // The host clears the render target; reset() above drops
                // the previous frame's encoding.
                DrawOp::Clear { .. } => {}
                DrawOp::Fill { path, color } => {
                    self.scene.fill(Fill::NonZero, Affine::IDENTITY, color, None, &path);
                }
                DrawOp::Stroke { path, color, width } => {
                    self.scene.stroke(&Stroke::new(width), Affine::IDENTITY, color, None, &path);
                }
                DrawOp::Text {
                    text,
                    transform,
                    anchor,
                    align,
                    font_size,
                    bold,
                    color,
                    shadow,
                } => {
                    if let Some(Shadow { color: shadow_color, offset, .. }) = shadow {
                        // Offset in device space, like a canvas shadow.
                        let shifted = Affine::translate(offset) * transform;
                        self.render_text(&text, shifted, anchor, align, font_size, bold, shadow_color);
                    }
                    self.render_text(&text, transform, anchor, align, font_size, bold, color);
                }
            }
        }
    }

    /// Lay out one line with Parley and draw its glyphs.
    #[allow(clippy::too_many_arguments)]
    fn render_text(
        &mut self,
        text: &str,
        transform: Affine,
        anchor: Point,
        align: TextAlign,
        font_size: f64,
        bold: bool,
        color: Color,
    ) {
        use parley::StyleProperty;

        if text.is_empty() {
            return;
        }

        let brush = Brush::Solid(color);
        let weight = if bold {
            parley::FontWeight::BOLD
        } else {
            parley::FontWeight::NORMAL
        };

        let mut builder = self.layout_cx.ranged_builder(&mut self.font_cx, text, 1.0, false);
        builder.push_default(StyleProperty::FontSize(font_size as f32));
        builder.push_default(StyleProperty::Brush(brush.clone()));
        builder.push_default(StyleProperty::FontWeight(weight));
        builder.push_default(StyleProperty::FontStack(parley::FontStack::Single(
            parley::FontFamily::Generic(parley::GenericFamily::Monospace),
        )));
        let mut layout = builder.build(text);
        layout.break_all_lines(None);
        layout.align(None, parley::Alignment::Start, parley::AlignmentOptions::default());

        let width = layout.width() as f64;
        let height = layout.height() as f64;
        let x = match align {
            TextAlign::Start => anchor.x,
            TextAlign::Center => anchor.x - width / 2.0,
            TextAlign::End => anchor.x - width,
        };
        let text_transform = transform * Affine::translate((x, anchor.y - height / 2.0));

        let mut glyph_count = 0;
        for line in layout.lines() {
            for item in line.items() {
                let PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let mut x = glyph_run.offset();
                let y = glyph_run.baseline();
                let run = glyph_run.run();
                let font = run.font();
                let font_size = run.font_size();
                let synthesis = run.synthesis();
                let glyph_xform = synthesis
                    .skew()
                    .map(|angle| Affine::skew(angle.to_radians().tan() as f64, 0.0));

                let glyphs: Vec<vello::Glyph> = glyph_run
                    .glyphs()
                    .map(|glyph| {
                        let gx = x + glyph.x;
                        let gy = y - glyph.y;
                        x += glyph.advance;
                        glyph_count += 1;
                        vello::Glyph { id: glyph.id, x: gx, y: gy }
                    })
                    .collect();

                if !glyphs.is_empty() {
                    self.scene
                        .draw_glyphs(font)
                        .brush(&brush)
                        .hint(true)
                        .transform(text_transform)
                        .glyph_transform(glyph_xform)
                        .font_size(font_size)
                        .normalized_coords(run.normalized_coords())
                        .draw(Fill::NonZero, glyphs.into_iter());
                }
            }
        }

        // No font available: mark where the label would be.
        if glyph_count == 0 {
            let approx_width = text.chars().count() as f64 * font_size * 0.6;
            let rect = Rect::new(0.0, 0.0, approx_width, font_size * 1.2);
            let x = match align {
                TextAlign::Start => anchor.x,
                TextAlign::Center => anchor.x - approx_width / 2.0,
                TextAlign::End => anchor.x - approx_width,
            };
            let placement = transform * Affine::translate((x, anchor.y - font_size * 0.6));
            self.scene.fill(Fill::NonZero, placement, Color::from_rgba8(255, 255, 255, 60), None, &rect);
        }
    }
}

impl WheelSurface for VelloRenderer {
    fn present(&mut self, frame: &WheelFrame) -> SurfaceResult<()> {
        self.build_scene(frame);
        Ok(())
    }

    fn release(&mut self) {
        self.scene.reset();
    }
}
