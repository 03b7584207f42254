//! Pure drawing primitives.
//!
//! A screen is described as a list of [`DrawCommand`] values and then
//! applied in order. Commands carry no reference to a surface, so layouts
//! can be built and inspected without touching pixels.

use super::font::{self, CELL_WIDTH, GLYPH_HEIGHT, GLYPH_WIDTH};
use super::surface::{Rect, Surface};
use crate::models::Color;

/// Horizontal anchor of a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Fill `rect` with a top-to-bottom gradient.
    VerticalGradient { rect: Rect, top: Color, bottom: Color },
    /// Fill `rect` with a left-to-right gradient.
    HorizontalGradient { rect: Rect, left: Color, right: Color },
    FillRect { rect: Rect, color: Color },
    /// Border of `width` pixels drawn inside `rect`.
    StrokeRect { rect: Rect, color: Color, width: u32 },
    FillCircle {
        cx: i32,
        cy: i32,
        radius: u32,
        color: Color,
    },
    /// Text whose glyph bottoms sit on `baseline`.
    Text {
        text: String,
        x: i32,
        baseline: i32,
        scale: u32,
        color: Color,
        align: TextAlign,
        bold: bool,
    },
}

impl DrawCommand {
    pub fn apply(&self, surface: &mut Surface) {
        match self {
            DrawCommand::VerticalGradient { rect, top, bottom } => {
                let Some((x0, y0, x1, y1)) = surface.clip(*rect) else {
                    return;
                };
                let span = rect.height.saturating_sub(1).max(1) as f32;
                for y in y0..y1 {
                    let t = (y as i64 - rect.y as i64) as f32 / span;
                    let row = Rect::new(x0 as i32, y as i32, x1 - x0, 1);
                    surface.fill_rect(row, top.lerp(*bottom, t).to_rgba());
                }
            }
            DrawCommand::HorizontalGradient { rect, left, right } => {
                let Some((x0, y0, x1, y1)) = surface.clip(*rect) else {
                    return;
                };
                let span = rect.width.saturating_sub(1).max(1) as f32;
                for x in x0..x1 {
                    let t = (x as i64 - rect.x as i64) as f32 / span;
                    let column = Rect::new(x as i32, y0 as i32, 1, y1 - y0);
                    surface.fill_rect(column, left.lerp(*right, t).to_rgba());
                }
            }
            DrawCommand::FillRect { rect, color } => {
                surface.fill_rect(*rect, color.to_rgba());
            }
            DrawCommand::StrokeRect { rect, color, width } => {
                let pixel = color.to_rgba();
                let band = (*width).min(rect.width).min(rect.height);
                let right = rect.x + rect.width as i32 - band as i32;
                let bottom = rect.y + rect.height as i32 - band as i32;
                surface.fill_rect(Rect::new(rect.x, rect.y, rect.width, band), pixel);
                surface.fill_rect(Rect::new(rect.x, bottom, rect.width, band), pixel);
                surface.fill_rect(Rect::new(rect.x, rect.y, band, rect.height), pixel);
                surface.fill_rect(Rect::new(right, rect.y, band, rect.height), pixel);
            }
            DrawCommand::FillCircle {
                cx,
                cy,
                radius,
                color,
            } => {
                let pixel = color.to_rgba();
                let r = *radius as i32;
                let limit = r * r;
                for dy in -r..=r {
                    for dx in -r..=r {
                        if dx * dx + dy * dy <= limit {
                            surface.put(cx + dx, cy + dy, pixel);
                        }
                    }
                }
            }
            DrawCommand::Text {
                text,
                x,
                baseline,
                scale,
                color,
                align,
                bold,
            } => {
                let width = font::text_width(text, *scale) as i32;
                let left = match align {
                    TextAlign::Left => *x,
                    TextAlign::Center => *x - width / 2,
                    TextAlign::Right => *x - width,
                };
                draw_text(surface, text, left, *baseline, *scale, *color);
                if *bold {
                    draw_text(surface, text, left + 1, *baseline, *scale, *color);
                }
            }
        }
    }
}

/// Apply `commands` in order.
pub fn apply_all(surface: &mut Surface, commands: &[DrawCommand]) {
    for command in commands {
        command.apply(surface);
    }
}

fn draw_text(surface: &mut Surface, text: &str, left: i32, baseline: i32, scale: u32, color: Color) {
    let pixel = color.to_rgba();
    let scale = scale.max(1) as i32;
    let top = baseline - GLYPH_HEIGHT as i32 * scale;
    let mut pen = left;

    for c in text.chars() {
        let cells = font::char_cells(c) as i32;
        if cells == 0 {
            continue;
        }
        let cell_width = CELL_WIDTH as i32 * scale;
        // wide glyphs are centred in their double cell
        let offset = (cells - 1) * cell_width / 2;
        let rows = font::glyph(c);

        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                    continue;
                }
                let gx = pen + offset + col as i32 * scale;
                let gy = top + row as i32 * scale;
                surface.fill_rect(Rect::new(gx, gy, scale as u32, scale as u32), pixel);
            }
        }
        pen += cells * cell_width;
    }
}
