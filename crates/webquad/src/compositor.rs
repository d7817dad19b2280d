//! Folds the engine's view and popup paints into one composited surface.

use crate::frame::Surface;
use crate::popup::PopupOverlay;
use crate::session::PaintLayer;

#[derive(Debug)]
pub struct Compositor {
    surface: Surface,
    dirty: bool,
}

impl Compositor {
    /// Create a compositor with a fully transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            surface: Surface::new(width, height),
            dirty: true,
        }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.surface.dimensions()
    }

    /// Whether the surface changed since the texture last saw it.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag, returning whether it was set.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Recreate the surface as a blank transparent image of the new size.
    pub fn reallocate(&mut self, width: u32, height: u32) {
        self.surface = Surface::new(width, height);
        self.dirty = true;
    }

    /// Apply a paint callback. Returns `false` when the paint was stale and
    /// nothing changed.
    pub fn on_paint(
        &mut self,
        layer: PaintLayer,
        buffer: &[u8],
        width: u32,
        height: u32,
        popup: &mut PopupOverlay,
    ) -> bool {
        match layer {
            PaintLayer::View => {
                if !self.surface.matches(width, height) {
                    log::trace!(
                        "dropping stale view paint {}x{} (surface is {}x{})",
                        width,
                        height,
                        self.surface.width(),
                        self.surface.height()
                    );
                    return false;
                }
                if !self.surface.replace_from_view(buffer) {
                    log::warn!("view paint buffer too short for {}x{}", width, height);
                    return false;
                }
                self.dirty = true;

                // The base replacement just overwrote the popup area.
                if popup.is_visible() {
                    self.stamp_popup(popup);
                }
                true
            }
            PaintLayer::Popup => {
                if !popup.accept_paint(buffer, width, height) {
                    log::trace!(
                        "dropping stale popup paint {}x{} (popup is {:?})",
                        width,
                        height,
                        popup.dimensions()
                    );
                    return false;
                }
                self.stamp_popup(popup);
                true
            }
        }
    }

    /// Overwrite the popup's rectangle on the surface with its current pixels.
    pub fn stamp_popup(&mut self, popup: &PopupOverlay) {
        self.surface.stamp(popup.image(), popup.origin());
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::BgraPixel;

    fn solid(width: u32, height: u32, px: [u8; 4]) -> Vec<u8> {
        px.repeat((width * height) as usize)
    }

    #[test]
    fn stale_view_paint_is_a_no_op() {
        let mut compositor = Compositor::new(4, 4);
        let mut popup = PopupOverlay::new();
        compositor.take_dirty();
        let before = compositor.surface().clone();

        assert!(!compositor.on_paint(PaintLayer::View, &solid(3, 4, [1; 4]), 3, 4, &mut popup));
        assert_eq!(compositor.surface(), &before);
        assert!(!compositor.is_dirty());
    }

    #[test]
    fn view_paint_marks_dirty() {
        let mut compositor = Compositor::new(2, 2);
        let mut popup = PopupOverlay::new();
        compositor.take_dirty();

        assert!(compositor.on_paint(PaintLayer::View, &solid(2, 2, [9, 8, 7, 6]), 2, 2, &mut popup));
        assert!(compositor.take_dirty());
        assert_eq!(
            compositor.surface().pixel(1, 1),
            Some(BgraPixel { b: 9, g: 8, r: 7, a: 6 })
        );
    }

    #[test]
    fn visible_popup_survives_view_repaint() {
        let mut compositor = Compositor::new(4, 4);
        let mut popup = PopupOverlay::new();
        popup.on_popup_size(1, 1, 2, 2);
        popup.on_popup_show(true);
        assert!(compositor.on_paint(PaintLayer::Popup, &solid(2, 2, [50, 60, 70, 80]), 2, 2, &mut popup));

        assert!(compositor.on_paint(PaintLayer::View, &solid(4, 4, [1, 1, 1, 255]), 4, 4, &mut popup));
        let popup_px = BgraPixel { b: 50, g: 60, r: 70, a: 80 };
        assert_eq!(compositor.surface().pixel(1, 1), Some(popup_px));
        assert_eq!(compositor.surface().pixel(2, 2), Some(popup_px));
        assert_eq!(
            compositor.surface().pixel(0, 0),
            Some(BgraPixel { b: 1, g: 1, r: 1, a: 255 })
        );
    }

    #[test]
    fn hidden_popup_is_not_restamped() {
        let mut compositor = Compositor::new(4, 4);
        let mut popup = PopupOverlay::new();
        popup.on_popup_size(0, 0, 2, 2);
        assert!(compositor.on_paint(PaintLayer::Popup, &solid(2, 2, [5; 4]), 2, 2, &mut popup));

        assert!(compositor.on_paint(PaintLayer::View, &solid(4, 4, [0, 0, 0, 255]), 4, 4, &mut popup));
        assert_eq!(
            compositor.surface().pixel(0, 0),
            Some(BgraPixel { b: 0, g: 0, r: 0, a: 255 })
        );
    }

    #[test]
    fn stamping_twice_matches_stamping_once() {
        let mut compositor = Compositor::new(5, 5);
        let mut popup = PopupOverlay::new();
        popup.on_popup_size(2, 1, 3, 2);
        assert!(compositor.on_paint(PaintLayer::Popup, &solid(3, 2, [3, 4, 5, 6]), 3, 2, &mut popup));
        let once = compositor.surface().clone();

        compositor.stamp_popup(&popup);
        assert_eq!(compositor.surface(), &once);
    }

    #[test]
    fn reallocate_blanks_the_surface() {
        let mut compositor = Compositor::new(2, 2);
        let mut popup = PopupOverlay::new();
        compositor.on_paint(PaintLayer::View, &solid(2, 2, [255; 4]), 2, 2, &mut popup);
        compositor.take_dirty();

        compositor.reallocate(3, 1);
        assert_eq!(compositor.dimensions(), (3, 1));
        assert!(compositor.surface().is_blank());
        assert!(compositor.is_dirty());
    }
}
