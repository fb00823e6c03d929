//! Per-frame wheel geometry.
//!
//! [`layout_frame`] turns a roster, a pixel size and a rotation into a
//! [`WheelFrame`]: a backend-independent description of everything drawn
//! in one frame. Backends only have to fill paths and place text.

use crate::palette;
use crate::roster::{Roster, truncate_label};
use crate::spin::segment_angle;
use kurbo::{Affine, BezPath, Circle, Point, Shape};
use peniko::Color;
use std::f64::consts::{FRAC_PI_2, TAU};

/// Tolerance used when flattening arcs into paths.
pub const PATH_TOLERANCE: f64 = 0.1;

/// Pixel size the font breakpoints are tuned for.
pub const REFERENCE_SIZE: f64 = 220.0;

/// Gap between the wheel edge and the canvas edge.
pub const EDGE_MARGIN: f64 = 10.0;

/// Distance from the wheel edge to the end of a segment label.
pub const LABEL_INSET: f64 = 12.0;

/// Character budget for labels on a multi-segment wheel.
pub const SEGMENT_LABEL_CHARS: usize = 10;

/// Character budget for the label on a single-name wheel.
pub const SINGLE_LABEL_CHARS: usize = 12;

/// Font size used for centered single-name and placeholder text.
pub const CENTER_FONT_SIZE: f64 = 11.0;

/// Horizontal text anchoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Start,
    Center,
    End,
}

/// Solid outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f64,
}

/// Offset drop shadow behind text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub color: Color,
    pub blur: f64,
    pub offset: (f64, f64),
}

/// One wedge of the wheel.
#[derive(Debug, Clone)]
pub struct Segment {
    /// Roster index this wedge represents.
    pub index: usize,
    /// Canvas angle (radians, clockwise from +x) where the wedge begins.
    pub start_angle: f64,
    pub sweep_angle: f64,
    pub fill: Color,
    pub border: Option<StrokeStyle>,
    /// Outline of the wedge in canvas coordinates.
    pub path: BezPath,
}

impl Segment {
    /// Angle of the wedge bisector.
    pub fn mid_angle(&self) -> f64 {
        self.start_angle + self.sweep_angle / 2.0
    }
}

/// A run of text placed on the wheel.
#[derive(Debug, Clone)]
pub struct Label {
    pub text: String,
    /// Maps label space to canvas space.
    pub transform: Affine,
    /// Anchor point in label space (vertically centered on the text).
    pub anchor: Point,
    pub align: TextAlign,
    pub font_size: f64,
    pub bold: bool,
    pub color: Color,
    pub shadow: Option<Shadow>,
}

/// A filled and outlined path.
#[derive(Debug, Clone)]
pub struct Decoration {
    pub path: BezPath,
    pub fill: Color,
    pub stroke: StrokeStyle,
}

/// Everything drawn in a single frame, in paint order:
/// placeholder, segments, labels, hub, pointer.
#[derive(Debug, Clone)]
pub struct WheelFrame {
    /// Canvas width and height.
    pub size: f64,
    pub center: Point,
    pub radius: f64,
    pub rotation: f64,
    /// Neutral disc shown when the roster is empty.
    pub placeholder: Option<Decoration>,
    pub segments: Vec<Segment>,
    pub labels: Vec<Label>,
    pub hub: Option<Decoration>,
    pub pointer: Option<Decoration>,
}

impl WheelFrame {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Start angle of every segment for a wheel of `count` entries at `rotation`.
pub fn segment_start_angles(count: usize, rotation: f64) -> impl Iterator<Item = f64> {
    let sweep = if count == 0 { 0.0 } else { segment_angle(count) };
    (0..count).map(move |i| rotation + i as f64 * sweep - FRAC_PI_2)
}

/// Font size for segment labels: fewer names get a larger font, scaled to
/// the wheel's pixel size.
pub fn label_font_size(count: usize, size: f64) -> f64 {
    let base = match count {
        0..=3 => 12.0,
        4..=5 => 11.0,
        6..=8 => 10.0,
        _ => 9.0,
    };
    (base * size / REFERENCE_SIZE).round()
}

/// Radius of the wheel inside a `size`-pixel canvas.
pub fn wheel_radius(size: f64) -> f64 {
    size / 2.0 - EDGE_MARGIN
}

/// Lay out a frame of the wheel.
pub fn layout_frame(roster: &Roster, size: f64, rotation: f64) -> WheelFrame {
    let center = Point::new(size / 2.0, size / 2.0);
    let radius = wheel_radius(size);
    let mut frame = WheelFrame {
        size,
        center,
        radius,
        rotation,
        placeholder: None,
        segments: Vec::new(),
        labels: Vec::new(),
        hub: None,
        pointer: None,
    };

    if roster.is_empty() {
        layout_placeholder(&mut frame);
        return frame;
    }

    let count = roster.len();
    let sweep = segment_angle(count);
    let circle = Circle::new(center, radius.max(0.0));
    let border = (count > 1).then(|| StrokeStyle {
        color: palette::segment_border(),
        width: 1.0,
    });

    for (index, start_angle) in segment_start_angles(count, rotation).enumerate() {
        let path = if count == 1 {
            circle.to_path(PATH_TOLERANCE)
        } else {
            circle.segment(0.0, start_angle, sweep).to_path(PATH_TOLERANCE)
        };
        frame.segments.push(Segment {
            index,
            start_angle,
            sweep_angle: sweep,
            fill: palette::segment_color(index),
            border,
            path,
        });
    }

    let shadow = Some(Shadow {
        color: palette::label_shadow(),
        blur: 2.0,
        offset: (1.0, 1.0),
    });

    if count == 1 {
        let name = roster.get(0).unwrap_or_default();
        frame.labels.push(Label {
            text: truncate_label(name, SINGLE_LABEL_CHARS).into_owned(),
            transform: Affine::translate(center.to_vec2()),
            anchor: Point::new(0.0, -radius / 2.0),
            align: TextAlign::Center,
            font_size: CENTER_FONT_SIZE,
            bold: true,
            color: palette::label_text(),
            shadow,
        });
    } else {
        let font_size = label_font_size(count, size);
        for (segment, name) in frame.segments.iter().zip(roster.iter()) {
            frame.labels.push(Label {
                text: truncate_label(name, SEGMENT_LABEL_CHARS).into_owned(),
                transform: Affine::translate(center.to_vec2()) * Affine::rotate(segment.mid_angle()),
                anchor: Point::new(radius - LABEL_INSET, 0.0),
                align: TextAlign::End,
                font_size,
                bold: true,
                color: palette::label_text(),
                shadow,
            });
        }
    }

    let hub_radius = (size / 18.0).max(8.0);
    frame.hub = Some(Decoration {
        path: Circle::new(center, hub_radius).to_path(PATH_TOLERANCE),
        fill: palette::hub_fill(),
        stroke: StrokeStyle {
            color: palette::outline(),
            width: 2.0,
        },
    });
    frame.pointer = Some(Decoration {
        path: pointer_path(center.x, (size / 12.0).max(12.0)),
        fill: palette::pointer_fill(),
        stroke: StrokeStyle {
            color: palette::outline(),
            width: 1.0,
        },
    });

    frame
}

/// Downward triangle at the top of the canvas.
fn pointer_path(center_x: f64, pointer_size: f64) -> BezPath {
    const TOP: f64 = 3.0;
    let mut path = BezPath::new();
    path.move_to((center_x - pointer_size / 2.0, TOP));
    path.line_to((center_x + pointer_size / 2.0, TOP));
    path.line_to((center_x, pointer_size + TOP));
    path.close_path();
    path
}

fn layout_placeholder(frame: &mut WheelFrame) {
    let disc = Circle::new(frame.center, frame.radius.max(0.0));
    frame.placeholder = Some(Decoration {
        path: disc.to_path(PATH_TOLERANCE),
        fill: palette::placeholder_fill(),
        stroke: StrokeStyle {
            color: palette::placeholder_stroke(),
            width: 2.0,
        },
    });
    for (text, dy) in [("No names", -8.0), ("Click Edit", 8.0)] {
        frame.labels.push(Label {
            text: text.to_string(),
            transform: Affine::translate(frame.center.to_vec2()),
            anchor: Point::new(0.0, dy),
            align: TextAlign::Center,
            font_size: CENTER_FONT_SIZE,
            bold: false,
            color: palette::placeholder_text(),
            shadow: None,
        });
    }
}

/// Fold an angle into `[0, 2π)` for comparisons.
pub fn wrap_angle(angle: f64) -> f64 {
    angle.rem_euclid(TAU)
}
