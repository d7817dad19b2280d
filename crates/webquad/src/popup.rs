//! Popup overlay tracking (dropdowns, select menus, autofill lists).

use image::{Rgba, RgbaImage};

use crate::frame::{BgraPixel, RgbaPixel, BYTES_PER_PIXEL};

/// State of the engine's popup layer.
///
/// Visibility, placement and pixels are driven by three independent engine
/// callbacks; this type only records them.
#[derive(Debug, Clone)]
pub struct PopupOverlay {
    visible: bool,
    origin: (i32, i32),
    image: RgbaImage,
}

impl Default for PopupOverlay {
    fn default() -> Self {
        Self {
            visible: false,
            origin: (0, 0),
            image: RgbaImage::new(0, 0),
        }
    }
}

impl PopupOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Top-left placement inside the composited surface.
    pub fn origin(&self) -> (i32, i32) {
        self.origin
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn on_popup_show(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Discard the current popup pixels and start over with a transparent
    /// image of the new size. The next popup paint supplies the content.
    pub fn on_popup_size(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.origin = (x, y);
        self.image = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]));
    }

    /// Accept a top-left BGRA popup paint.
    ///
    /// Paints whose declared size differs from the tracked size are stale
    /// (the popup was resized while the paint was in flight) and are dropped.
    pub(crate) fn accept_paint(&mut self, buffer: &[u8], width: u32, height: u32) -> bool {
        if self.image.dimensions() != (width, height) {
            return false;
        }
        let needed = width as usize * height as usize * BYTES_PER_PIXEL;
        if buffer.len() < needed {
            return false;
        }

        let src: &[BgraPixel] = bytemuck::cast_slice(&buffer[..needed]);
        for (dst, px) in self.image.pixels_mut().zip(src) {
            let RgbaPixel { r, g, b, a } = RgbaPixel::from(*px);
            *dst = Rgba([r, g, b, a]);
        }
        true
    }
}
