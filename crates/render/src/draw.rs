use glam::Vec2;
use plumbfield_common::{Color, Rect};

/// Backend-agnostic drawing interface.
///
/// Implementations turn these calls into pixels, text, or recorded commands.
/// Callers issue them in back-to-front order.
pub trait DrawingContext {
    /// Fill a rectangle with a solid color.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Draw a named sprite with its origin at `pos`.
    fn draw_sprite(&mut self, sprite: &str, pos: Vec2, frame: u32);

    /// Draw a single agent. `facing` is -1 or 1.
    fn draw_agent(&mut self, pos: Vec2, facing: i8);
}

/// A recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect { rect: Rect, color: Color },
    Sprite { sprite: String, pos: Vec2, frame: u32 },
    Agent { pos: Vec2, facing: i8 },
}

/// Drawing context that records commands instead of rasterizing them.
///
/// Used for headless runs and tests.
#[derive(Debug, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Render the recorded commands as one line each.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for cmd in &self.commands {
            match cmd {
                DrawCommand::FillRect { rect, color } => out.push_str(&format!(
                    "fill ({:.0}, {:.0})-({:.0}, {:.0}) rgba({:.2}, {:.2}, {:.2}, {:.2})\n",
                    rect.left,
                    rect.top,
                    rect.right,
                    rect.bottom,
                    color.red,
                    color.green,
                    color.blue,
                    color.alpha
                )),
                DrawCommand::Sprite { sprite, pos, frame } => out.push_str(&format!(
                    "sprite {sprite}#{frame} at ({:.1}, {:.1})\n",
                    pos.x, pos.y
                )),
                DrawCommand::Agent { pos, facing } => {
                    let arrow = if *facing < 0 { '<' } else { '>' };
                    out.push_str(&format!("agent {arrow} at ({:.1}, {:.1})\n", pos.x, pos.y));
                }
            }
        }
        out
    }
}

impl DrawingContext for DrawList {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn draw_sprite(&mut self, sprite: &str, pos: Vec2, frame: u32) {
        self.commands.push(DrawCommand::Sprite {
            sprite: sprite.to_string(),
            pos,
            frame,
        });
    }

    fn draw_agent(&mut self, pos: Vec2, facing: i8) {
        self.commands.push(DrawCommand::Agent { pos, facing });
    }
}
