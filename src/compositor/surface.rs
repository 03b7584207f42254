//! Owned pixel buffer backing one workstation screen.

use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, Rgba, RgbaImage};

use crate::error::RenderError;

/// Default screen resolution (square).
pub const DEFAULT_SURFACE_SIZE: u32 = 512;

/// Largest accepted edge length.
pub const MAX_SURFACE_SIZE: u32 = 8192;

/// Axis-aligned rectangle in surface pixels. May extend past the edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// RGBA surface with a dirty flag for the presentation layer.
#[derive(Debug, Clone)]
pub struct Surface {
    buffer: RgbaImage,
    dirty: bool,
}

/// Acquire a `width` x `height` surface.
///
/// Fails when either edge is zero or larger than [`MAX_SURFACE_SIZE`], or
/// when the pixel buffer cannot be allocated.
pub fn create_surface(width: u32, height: u32) -> Result<Surface, RenderError> {
    if width == 0 || height == 0 || width > MAX_SURFACE_SIZE || height > MAX_SURFACE_SIZE {
        return Err(RenderError::InvalidSurfaceSize { width, height });
    }

    let len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(4))
        .ok_or(RenderError::AllocationFailed { width, height })?;

    let mut raw = Vec::new();
    raw.try_reserve_exact(len)
        .map_err(|_| RenderError::AllocationFailed { width, height })?;
    raw.resize(len, 0);

    let buffer = RgbaImage::from_raw(width, height, raw)
        .ok_or(RenderError::AllocationFailed { width, height })?;

    Ok(Surface {
        buffer,
        dirty: false,
    })
}

impl Surface {
    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.buffer
    }

    /// Pixel at (`x`, `y`), or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        self.buffer.get_pixel_checked(x, y).copied()
    }

    /// Set one pixel; coordinates outside the surface are ignored.
    pub fn put(&mut self, x: i32, y: i32, color: Rgba<u8>) {
        if x < 0 || y < 0 {
            return;
        }
        if let Some(pixel) = self.buffer.get_pixel_mut_checked(x as u32, y as u32) {
            *pixel = color;
        }
    }

    /// Fill `rect`, clipped to the surface.
    pub fn fill_rect(&mut self, rect: Rect, color: Rgba<u8>) {
        let Some((x0, y0, x1, y1)) = self.clip(rect) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                self.buffer.put_pixel(x, y, color);
            }
        }
    }

    /// Clip `rect` to the surface as half-open `(x0, y0, x1, y1)`.
    pub fn clip(&self, rect: Rect) -> Option<(u32, u32, u32, u32)> {
        let x0 = i64::from(rect.x).max(0);
        let y0 = i64::from(rect.y).max(0);
        let x1 = (i64::from(rect.x) + i64::from(rect.width)).min(i64::from(self.width()));
        let y1 = (i64::from(rect.y) + i64::from(rect.height)).min(i64::from(self.height()));
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Read and clear the dirty flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Encode the current contents as PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>, RenderError> {
        let mut cursor = Cursor::new(Vec::new());
        self.buffer.write_to(&mut cursor, ImageFormat::Png)?;
        Ok(cursor.into_inner())
    }

    /// Encode as PNG and write it to `path`.
    pub fn save_png(&self, path: &Path) -> Result<(), RenderError> {
        let bytes = self.encode_png()?;
        std::fs::write(path, bytes).map_err(|err| RenderError::Write {
            path: path.display().to_string(),
            message: err.to_string(),
        })
    }
}
