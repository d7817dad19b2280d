//! Composited surface and pixel types.

use bytemuck::{Pod, Zeroable};
use image::RgbaImage;

/// Bytes per pixel for every buffer the bridge handles.
pub const BYTES_PER_PIXEL: usize = 4;

/// BGRA pixel for direct memory mapping.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct BgraPixel {
    pub b: u8,
    pub g: u8,
    pub r: u8,
    pub a: u8,
}

/// RGBA pixel as stored in the popup layer.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct RgbaPixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl From<BgraPixel> for RgbaPixel {
    fn from(bgra: BgraPixel) -> Self {
        Self {
            r: bgra.r,
            g: bgra.g,
            b: bgra.b,
            a: bgra.a,
        }
    }
}

impl From<RgbaPixel> for BgraPixel {
    fn from(rgba: RgbaPixel) -> Self {
        Self {
            b: rgba.b,
            g: rgba.g,
            r: rgba.r,
            a: rgba.a,
        }
    }
}

/// The single image the host renders on its quad.
///
/// Pixels are BGRA and rows are stored bottom-left first, the layout texture
/// uploads expect. Every coordinate taken by the public accessors is in the
/// browser's top-left space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl Surface {
    /// Create a fully transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        let size = width as usize * height as usize * BYTES_PER_PIXEL;
        Self {
            data: vec![0u8; size],
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Whether a paint declaring `width x height` belongs to this surface.
    pub fn matches(&self, width: u32, height: u32) -> bool {
        self.width == width && self.height == height
    }

    /// Raw bottom-up BGRA bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    fn stride(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }

    /// Memory row index for a top-left row.
    fn memory_row(&self, y: u32) -> usize {
        (self.height - 1 - y) as usize
    }

    /// Replace the whole surface with a top-left BGRA view buffer.
    ///
    /// Returns `false` without touching the surface when the buffer is too
    /// short for the current dimensions.
    pub(crate) fn replace_from_view(&mut self, buffer: &[u8]) -> bool {
        let stride = self.stride();
        if buffer.len() < self.data.len() {
            return false;
        }
        if stride == 0 {
            return true;
        }

        for (src_row, chunk) in buffer.chunks_exact(stride).take(self.height as usize).enumerate() {
            let dst = (self.height as usize - 1 - src_row) * stride;
            self.data[dst..dst + stride].copy_from_slice(chunk);
        }
        true
    }

    /// Overwrite the sub-rectangle at `origin` with `image`, clipped to the
    /// surface bounds. No blending: the image's alpha replaces the surface's.
    pub(crate) fn stamp(&mut self, image: &RgbaImage, origin: (i32, i32)) {
        let (ox, oy) = (i64::from(origin.0), i64::from(origin.1));
        let x0 = ox.max(0);
        let x1 = (ox + i64::from(image.width())).min(i64::from(self.width));
        if x0 >= x1 {
            return;
        }

        let stride = self.stride();
        for py in 0..image.height() {
            let y = oy + i64::from(py);
            if y < 0 || y >= i64::from(self.height) {
                continue;
            }

            let row_start = self.memory_row(y as u32) * stride;
            let row: &mut [BgraPixel] =
                bytemuck::cast_slice_mut(&mut self.data[row_start..row_start + stride]);
            for x in x0..x1 {
                let [r, g, b, a] = image.get_pixel((x - ox) as u32, py).0;
                row[x as usize] = BgraPixel::from(RgbaPixel { r, g, b, a });
            }
        }
    }

    /// Pixel at top-left coordinates.
    pub fn pixel(&self, x: u32, y: u32) -> Option<BgraPixel> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = self.memory_row(y) * self.stride() + x as usize * BYTES_PER_PIXEL;
        Some(*bytemuck::from_bytes(&self.data[offset..offset + BYTES_PER_PIXEL]))
    }

    /// Copy the surface out with rows in top-left order, as GPU uploads expect.
    pub fn to_top_down(&self) -> Vec<u8> {
        let stride = self.stride();
        if stride == 0 {
            return Vec::new();
        }
        let mut out = Vec::with_capacity(self.data.len());
        for row in self.data.chunks_exact(stride).rev() {
            out.extend_from_slice(row);
        }
        out
    }

    /// Whether every pixel is fully transparent black.
    pub fn is_blank(&self) -> bool {
        self.data.iter().all(|&b| b == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn view_buffer(width: u32, height: u32) -> Vec<u8> {
        // Each pixel encodes its own top-left coordinates.
        let mut buf = Vec::new();
        for y in 0..height {
            for x in 0..width {
                buf.extend_from_slice(&[x as u8, y as u8, 0x80, 0xff]);
            }
        }
        buf
    }

    #[test]
    fn new_surface_is_transparent() {
        let surface = Surface::new(4, 3);
        assert_eq!(surface.as_bytes().len(), 4 * 3 * 4);
        assert!(surface.is_blank());
    }

    #[test]
    fn view_paint_is_stored_bottom_up() {
        let mut surface = Surface::new(3, 2);
        assert!(surface.replace_from_view(&view_buffer(3, 2)));

        // First memory row holds the bottom row of the page.
        assert_eq!(&surface.as_bytes()[..4], &[0, 1, 0x80, 0xff]);
        assert_eq!(
            surface.pixel(2, 0),
            Some(BgraPixel { b: 2, g: 0, r: 0x80, a: 0xff })
        );
        assert_eq!(surface.to_top_down(), view_buffer(3, 2));
    }

    #[test]
    fn short_buffer_leaves_surface_untouched() {
        let mut surface = Surface::new(3, 2);
        let before = surface.clone();
        assert!(!surface.replace_from_view(&[1, 2, 3, 4]));
        assert_eq!(surface, before);
    }

    #[test]
    fn stamp_is_clipped_to_bounds() {
        let mut surface = Surface::new(4, 4);
        let image = RgbaImage::from_pixel(3, 3, Rgba([10, 20, 30, 40]));
        surface.stamp(&image, (2, -1));

        let stamped = BgraPixel { b: 30, g: 20, r: 10, a: 40 };
        assert_eq!(surface.pixel(2, 0), Some(stamped));
        assert_eq!(surface.pixel(3, 1), Some(stamped));
        assert_eq!(surface.pixel(3, 2), Some(BgraPixel::default()));
        assert_eq!(surface.pixel(1, 0), Some(BgraPixel::default()));
    }

    #[test]
    fn stamp_fully_outside_is_ignored() {
        let mut surface = Surface::new(4, 4);
        let image = RgbaImage::from_pixel(2, 2, Rgba([1, 1, 1, 1]));
        surface.stamp(&image, (10, 10));
        surface.stamp(&image, (-5, 0));
        assert!(surface.is_blank());
    }

    #[test]
    fn pixel_conversions_swap_channels() {
        let bgra = BgraPixel { b: 1, g: 2, r: 3, a: 4 };
        let rgba = RgbaPixel::from(bgra);
        assert_eq!(rgba, RgbaPixel { r: 3, g: 2, b: 1, a: 4 });
        assert_eq!(BgraPixel::from(rgba), bgra);
    }
}
