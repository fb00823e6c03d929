//! Fixed colors used by the wheel.

use peniko::Color;

/// Segment fill colors, picked for contrast against white label text.
///
/// Stored as `0xRRGGBB`. Segment `i` uses entry `i % PALETTE.len()`, so the
/// same roster order always produces the same colors.
pub const PALETTE: [u32; 12] = [
    0xE53935, // Red
    0x8E24AA, // Purple
    0x3949AB, // Indigo
    0x00897B, // Teal
    0x43A047, // Green
    0xF4511E, // Deep orange
    0x6D4C41, // Brown
    0x5E35B1, // Deep purple
    0x1E88E5, // Blue
    0x00ACC1, // Cyan (darker)
    0x7CB342, // Light green (darker)
    0xC0CA33, // Lime (darker)
];

/// Convert a `0xRRGGBB` value into an opaque color.
pub fn rgb(hex: u32) -> Color {
    Color::from_rgba8((hex >> 16) as u8, (hex >> 8) as u8, hex as u8, 255)
}

/// Fill color for the segment at `index`.
pub fn segment_color(index: usize) -> Color {
    rgb(PALETTE[index % PALETTE.len()])
}

/// Thin border between segments (white at 30% alpha).
pub fn segment_border() -> Color {
    Color::from_rgba8(255, 255, 255, 77)
}

/// Label text color.
pub fn label_text() -> Color {
    Color::from_rgba8(255, 255, 255, 255)
}

/// Drop shadow behind labels (black at 60% alpha).
pub fn label_shadow() -> Color {
    Color::from_rgba8(0, 0, 0, 153)
}

/// Center hub fill.
pub fn hub_fill() -> Color {
    rgb(0x222222)
}

/// Pointer fill.
pub fn pointer_fill() -> Color {
    rgb(0xFF0044)
}

/// Outline used on the hub and pointer.
pub fn outline() -> Color {
    rgb(0xFFFFFF)
}

/// Placeholder disc shown when there are no names.
pub fn placeholder_fill() -> Color {
    rgb(0x3A3A3A)
}

pub fn placeholder_stroke() -> Color {
    rgb(0x555555)
}

pub fn placeholder_text() -> Color {
    rgb(0x888888)
}
