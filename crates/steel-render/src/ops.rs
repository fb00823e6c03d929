//! Display list shared by all backends.

use kurbo::{Affine, BezPath, Point};
use peniko::Color;
use steel_core::geometry::{Decoration, Label, Shadow, TextAlign, WheelFrame};

/// A single drawing command.
#[derive(Debug, Clone)]
pub enum DrawOp {
    /// Clear the whole surface.
    Clear { width: f64, height: f64 },
    /// Fill a closed path (non-zero rule).
    Fill { path: BezPath, color: Color },
    /// Outline a path.
    Stroke { path: BezPath, color: Color, width: f64 },
    /// Draw one line of text, vertically centered on `anchor`.
    Text {
        text: String,
        transform: Affine,
        anchor: Point,
        align: TextAlign,
        font_size: f64,
        bold: bool,
        color: Color,
        shadow: Option<Shadow>,
    },
}

/// Flatten a frame into paint-ordered draw commands.
///
/// Order: clear, placeholder, segment fills (each followed by its border),
/// labels, hub, pointer. Labels are drawn after every segment so no wedge
/// covers a neighbour's text.
pub fn build_ops(frame: &WheelFrame) -> Vec<DrawOp> {
    let mut ops = Vec::with_capacity(4 + frame.segments.len() * 3 + 4);
    ops.push(DrawOp::Clear {
        width: frame.size,
        height: frame.size,
    });

    if let Some(placeholder) = &frame.placeholder {
        push_decoration(&mut ops, placeholder);
    }

    for segment in &frame.segments {
        ops.push(DrawOp::Fill {
            path: segment.path.clone(),
            color: segment.fill,
        });
        if let Some(border) = segment.border {
            ops.push(DrawOp::Stroke {
                path: segment.path.clone(),
                color: border.color,
                width: border.width,
            });
        }
    }

    ops.extend(frame.labels.iter().map(text_op));

    if let Some(hub) = &frame.hub {
        push_decoration(&mut ops, hub);
    }
    if let Some(pointer) = &frame.pointer {
        push_decoration(&mut ops, pointer);
    }
    ops
}

/// CSS font shorthand for a label, e.g. `bold 12px monospace`.
pub fn font_css(font_size: f64, bold: bool) -> String {
    if bold {
        format!("bold {}px monospace", font_size)
    } else {
        format!("{}px monospace", font_size)
    }
}

fn push_decoration(ops: &mut Vec<DrawOp>, decoration: &Decoration) {
    ops.push(DrawOp::Fill {
        path: decoration.path.clone(),
        color: decoration.fill,
    });
    ops.push(DrawOp::Stroke {
        path: decoration.path.clone(),
        color: decoration.stroke.color,
        width: decoration.stroke.width,
    });
}

fn text_op(label: &Label) -> DrawOp {
    DrawOp::Text {
        text: label.text.clone(),
        transform: label.transform,
        anchor: label.anchor,
        align: label.align,
        font_size: label.font_size,
        bold: label.bold,
        color: label.color,
        shadow: label.shadow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use steel_core::{Roster, layout_frame};

    fn kinds(ops: &[DrawOp]) -> Vec<&'static str> {
        ops.iter()
            .map(|op| match op {
                DrawOp::Clear { .. } => "clear",
                DrawOp::Fill { .. } => "fill",
                DrawOp::Stroke { .. } => "stroke",
                DrawOp::Text { .. } => "text",
            })
            .collect()
    }

    #[test]
    fn test_multi_segment_order() {
        let roster: Roster = ["A", "B"].into_iter().collect();
        let ops = build_ops(&layout_frame(&roster, 230.0, 0.0));
        assert_eq!(
            kinds(&ops),
            [
                "clear", "fill", "stroke", "fill", "stroke", "text", "text", "fill", "stroke", "fill", "stroke",
            ]
        );
    }

    #[test]
    fn test_single_segment_has_no_border() {
        let roster: Roster = ["Solo"].into_iter().collect();
        let ops = build_ops(&layout_frame(&roster, 230.0, 0.0));
        assert_eq!(kinds(&ops), ["clear", "fill", "text", "fill", "stroke", "fill", "stroke"]);
    }

    #[test]
    fn test_empty_placeholder() {
        let ops = build_ops(&layout_frame(&Roster::new(), 230.0, 0.0));
        assert_eq!(kinds(&ops), ["clear", "fill", "stroke", "text", "text"]);
    }

    #[test]
    fn test_font_css() {
        assert_eq!(font_css(12.0, true), "bold 12px monospace");
        assert_eq!(font_css(11.0, false), "11px monospace");
    }
}
