//! Monitor layout.
//!
//! Everything is positioned for a 512-pixel-wide screen: a fixed left
//! margin, right-aligned header elements measured from the right edge, and
//! fixed baselines down the page. Wider or narrower surfaces stretch the
//! horizontal elements only.

use super::draw::{apply_all, DrawCommand, TextAlign};
use super::font::{char_cells, scale_for_px, text_width, CELL_WIDTH};
use super::surface::{Rect, Surface};
use crate::models::palette::{
    LINE_NUMBER, PROGRESS_TRACK, SCREEN_ACCENT, SCREEN_BACKGROUND_BOTTOM, SCREEN_BACKGROUND_TOP,
    SCREEN_SUCCESS, SCREEN_TEXT,
};
use crate::models::{clamp_progress, AgentId, ScreenContent};

pub const MARGIN: i32 = 20;
pub const BORDER_WIDTH: u32 = 4;
pub const MAX_TERMINAL_LINES: usize = 8;

const TITLE_PX: u32 = 24;
const SUBTITLE_PX: u32 = 16;
const BODY_PX: u32 = 14;
const TERMINAL_PX: u32 = 12;

const HEADER_BASELINE: i32 = 40;
const STATUS_DOT_INSET: i32 = 40;
const STATUS_DOT_Y: i32 = 30;
const STATUS_DOT_RADIUS: u32 = 10;
const STATUS_TEXT_INSET: i32 = 60;
const STATUS_TEXT_BASELINE: i32 = 35;

const TITLE_BASELINE: i32 = 80;
const SUBTITLE_BASELINE: i32 = 110;

const PROGRESS_TOP: i32 = 140;
const PROGRESS_HEIGHT: u32 = 20;
const PROGRESS_LABEL_OFFSET: i32 = 15;

const TERMINAL_TOP: i32 = 190;
const TERMINAL_LINE_HEIGHT: i32 = TERMINAL_PX as i32 + 8;
const TERMINAL_TEXT_X: i32 = 50;

const ELLIPSIS: &str = "...";

/// Shorten `text` so it fits in `max_width` pixels at `scale`.
///
/// Keeps the longest prefix that still leaves room for `...`. When not even
/// `...` fits, returns as much of it as does, possibly nothing. Runs in one
/// pass over the characters.
pub fn truncate_to_width(text: &str, max_width: u32, scale: u32) -> String {
    if text_width(text, scale) <= max_width {
        return text.to_string();
    }

    let cell = u64::from(CELL_WIDTH * scale);
    let max_width = u64::from(max_width);
    let ellipsis_width = text_width(ELLIPSIS, scale) as u64;

    if ellipsis_width > max_width {
        let dots = (max_width / cell.max(1)) as usize;
        return ELLIPSIS.chars().take(dots).collect();
    }

    let budget = max_width - ellipsis_width;
    let mut used = 0u64;
    let mut end = 0;
    for (index, c) in text.char_indices() {
        used += u64::from(char_cells(c)) * cell;
        if used > budget {
            break;
        }
        end = index + c.len_utf8();
    }

    let mut display = String::with_capacity(end + ELLIPSIS.len());
    display.push_str(&text[..end]);
    display.push_str(ELLIPSIS);
    display
}

/// Builds the draw list for one monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenCompositor {
    width: u32,
    height: u32,
}

impl ScreenCompositor {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn for_surface(surface: &Surface) -> Self {
        Self::new(surface.width(), surface.height())
    }

    /// Widest a title may be drawn.
    pub fn title_max_width(&self) -> u32 {
        self.width.saturating_sub(2 * MARGIN as u32)
    }

    pub fn commands(&self, agent: AgentId, content: &ScreenContent) -> Vec<DrawCommand> {
        let mut commands = Vec::with_capacity(32);
        self.background(content, &mut commands);
        self.header(agent, content, &mut commands);
        self.task(content, &mut commands);
        self.progress(content.progress, &mut commands);
        self.terminal(&content.terminal_lines, &mut commands);
        commands
    }

    /// Draw `content` onto `surface` and mark it dirty.
    pub fn render(&self, surface: &mut Surface, agent: AgentId, content: &ScreenContent) {
        apply_all(surface, &self.commands(agent, content));
        surface.mark_dirty();
    }

    fn full(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    fn background(&self, content: &ScreenContent, commands: &mut Vec<DrawCommand>) {
        commands.push(DrawCommand::VerticalGradient {
            rect: self.full(),
            top: SCREEN_BACKGROUND_TOP,
            bottom: SCREEN_BACKGROUND_BOTTOM,
        });
        commands.push(DrawCommand::StrokeRect {
            rect: self.full(),
            color: content.status.color(),
            width: BORDER_WIDTH,
        });
    }

    fn header(&self, agent: AgentId, content: &ScreenContent, commands: &mut Vec<DrawCommand>) {
        let right = self.width as i32;

        commands.push(DrawCommand::Text {
            text: agent.as_str().to_uppercase(),
            x: MARGIN,
            baseline: HEADER_BASELINE,
            scale: scale_for_px(TITLE_PX),
            color: agent.colors().primary,
            align: TextAlign::Left,
            bold: true,
        });
        commands.push(DrawCommand::FillCircle {
            cx: right - STATUS_DOT_INSET,
            cy: STATUS_DOT_Y,
            radius: STATUS_DOT_RADIUS,
            color: content.status.color(),
        });
        commands.push(DrawCommand::Text {
            text: content.status.as_str().to_uppercase(),
            x: right - STATUS_TEXT_INSET,
            baseline: STATUS_TEXT_BASELINE,
            scale: scale_for_px(SUBTITLE_PX),
            color: SCREEN_TEXT,
            align: TextAlign::Right,
            bold: false,
        });
    }

    fn task(&self, content: &ScreenContent, commands: &mut Vec<DrawCommand>) {
        let scale = scale_for_px(SUBTITLE_PX);
        commands.push(DrawCommand::Text {
            text: truncate_to_width(&content.title, self.title_max_width(), scale),
            x: MARGIN,
            baseline: TITLE_BASELINE,
            scale,
            color: SCREEN_ACCENT,
            align: TextAlign::Left,
            bold: false,
        });

        if let Some(subtitle) = &content.subtitle {
            commands.push(DrawCommand::Text {
                text: subtitle.clone(),
                x: MARGIN,
                baseline: SUBTITLE_BASELINE,
                scale: scale_for_px(BODY_PX),
                color: SCREEN_TEXT,
                align: TextAlign::Left,
                bold: false,
            });
        }
    }

    fn progress(&self, progress: f64, commands: &mut Vec<DrawCommand>) {
        let progress = clamp_progress(progress);
        let bar_width = self.title_max_width();
        let fill_width = ((progress / 100.0) * f64::from(bar_width)).round() as u32;

        commands.push(DrawCommand::FillRect {
            rect: Rect::new(MARGIN, PROGRESS_TOP, bar_width, PROGRESS_HEIGHT),
            color: PROGRESS_TRACK,
        });
        if fill_width > 0 {
            commands.push(DrawCommand::HorizontalGradient {
                rect: Rect::new(MARGIN, PROGRESS_TOP, fill_width, PROGRESS_HEIGHT),
                left: SCREEN_ACCENT,
                right: SCREEN_SUCCESS,
            });
        }
        commands.push(DrawCommand::Text {
            text: format!("{}%", progress.round() as u32),
            x: self.width as i32 / 2,
            baseline: PROGRESS_TOP + PROGRESS_LABEL_OFFSET,
            scale: scale_for_px(BODY_PX),
            color: SCREEN_TEXT,
            align: TextAlign::Center,
            bold: true,
        });
    }

    fn terminal(&self, lines: &[String], commands: &mut Vec<DrawCommand>) {
        let visible = &lines[lines.len().saturating_sub(MAX_TERMINAL_LINES)..];
        let scale = scale_for_px(TERMINAL_PX);

        for (index, line) in visible.iter().enumerate() {
            let baseline = TERMINAL_TOP + index as i32 * TERMINAL_LINE_HEIGHT;
            commands.push(DrawCommand::Text {
                text: format!("{:02}", index + 1),
                x: MARGIN,
                baseline,
                scale,
                color: LINE_NUMBER,
                align: TextAlign::Left,
                bold: false,
            });
            commands.push(DrawCommand::Text {
                text: line.clone(),
                x: TERMINAL_TEXT_X,
                baseline,
                scale,
                color: SCREEN_TEXT,
                align: TextAlign::Left,
                bold: false,
            });
        }
    }
}
