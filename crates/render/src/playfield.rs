use glam::Vec2;
use plumbfield_common::{Color, Rect, Size};

use crate::DrawingContext;

/// Screen-space placement of the level inside the display.
///
/// A world smaller than the display is centered and surrounded by a black
/// border; a larger world is clipped to the display and scrolled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playfield {
    display: Size,
    rect: Rect,
}

impl Playfield {
    pub fn centered(display: Size, world: Size) -> Self {
        let left = display.width.saturating_sub(world.width) / 2;
        let top = display.height.saturating_sub(world.height) / 2;
        let width = display.width.min(world.width);
        let height = display.height.min(world.height);
        Self {
            display,
            rect: Rect::from_origin(
                Vec2::new(left as f32, top as f32),
                width as f32,
                height as f32,
            ),
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Whether the playfield covers the whole display.
    pub fn fills_display(&self) -> bool {
        self.rect == Rect::new(0.0, 0.0, self.display.width as f32, self.display.height as f32)
    }

    /// Recompute placement after the display was resized.
    pub fn resize(&mut self, display: Size, world: Size) {
        *self = Self::centered(display, world);
    }

    /// Draw the border around a playfield that does not fill the display.
    pub fn draw_border(&self, gc: &mut dyn DrawingContext) {
        if self.fills_display() {
            return;
        }
        let w = self.display.width as f32;
        let h = self.display.height as f32;
        let r = self.rect;
        gc.fill_rect(Rect::new(0.0, 0.0, w, r.top), Color::BLACK);
        gc.fill_rect(Rect::new(0.0, r.bottom, w, h), Color::BLACK);
        gc.fill_rect(Rect::new(0.0, r.top, r.left, r.bottom), Color::BLACK);
        gc.fill_rect(Rect::new(r.right, r.top, w, r.bottom), Color::BLACK);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DrawCommand, DrawList};

    #[test]
    fn small_world_is_centered() {
        let pf = Playfield::centered(Size::new(800, 600), Size::new(400, 200));
        assert_eq!(pf.rect(), Rect::new(200.0, 200.0, 600.0, 400.0));
        assert!(!pf.fills_display());
    }

    #[test]
    fn large_world_is_clipped() {
        let pf = Playfield::centered(Size::new(800, 600), Size::new(2000, 900));
        assert_eq!(pf.rect(), Rect::new(0.0, 0.0, 800.0, 600.0));
        assert!(pf.fills_display());
    }

    #[test]
    fn border_drawn_only_when_needed() {
        let mut list = DrawList::new();
        Playfield::centered(Size::new(800, 600), Size::new(800, 600)).draw_border(&mut list);
        assert!(list.is_empty());

        Playfield::centered(Size::new(800, 600), Size::new(400, 600)).draw_border(&mut list);
        assert_eq!(list.len(), 4);
        assert!(
            list.commands()
                .iter()
                .all(|c| matches!(c, DrawCommand::FillRect { color, .. } if *color == Color::BLACK))
        );
    }

    #[test]
    fn resize_recenters() {
        let mut pf = Playfield::centered(Size::new(800, 600), Size::new(400, 200));
        pf.resize(Size::new(1000, 600), Size::new(400, 200));
        assert_eq!(pf.rect().left, 300.0);
    }
}
