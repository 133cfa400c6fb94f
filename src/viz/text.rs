//! Text measurement and legend flow layout.

/// Heuristic: estimate pixel width of text (Plotters has no built-in text measuring).
/// Wide (CJK) characters count double.
pub fn estimate_text_width_px(text: &str, font_px: u32) -> u32 {
    let units: f32 = text
        .chars()
        .map(|c| if (c as u32) >= 0x2E80 { 1.0 } else { 0.6 })
        .sum();
    (units * font_px as f32).ceil() as u32
}

/// Legend entry placement in pixels relative to the legend band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegendSlot {
    pub x: i32,
    pub y: i32,
}

/// Swatch width plus gap before the label.
pub const SWATCH_PX: i32 = 18;
pub const ITEM_GAP_PX: i32 = 16;

/// Flow legend entries left to right, wrapping into new rows when `max_width_px` is exceeded.
/// Returns one slot per label and the total band height.
pub fn layout_legend(
    labels: &[String],
    font_px: u32,
    start_x: i32,
    max_width_px: i32,
) -> (Vec<LegendSlot>, i32) {
    let row_h = font_px as i32 + 10;
    let mut slots = Vec::with_capacity(labels.len());
    let (mut x, mut y) = (start_x, 6);
    for label in labels {
        let w = SWATCH_PX + estimate_text_width_px(label, font_px) as i32;
        if x > start_x && x + w > max_width_px {
            x = start_x;
            y += row_h;
        }
        slots.push(LegendSlot { x, y });
        x += w + ITEM_GAP_PX;
    }
    let height = if labels.is_empty() { 0 } else { y + row_h + 4 };
    (slots, height)
}
