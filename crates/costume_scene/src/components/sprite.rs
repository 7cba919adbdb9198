use super::{ComponentBase, ComponentHooks};
use crate::render::{DrawCommand, RenderContext};

/// `SPRT`: a billboard sprite. A key of `0` hides it; `n >= 1` shows frame `n - 1`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpriteComponent {
    frame: usize,
}

impl SpriteComponent {
    #[must_use]
    pub fn frame(&self) -> usize {
        self.frame
    }
}

impl ComponentHooks for SpriteComponent {
    fn set_key(&mut self, base: &mut ComponentBase, value: f32) {
        let key = value.round().max(0.0) as usize;
        if key == 0 {
            base.visible = false;
        } else {
            base.visible = true;
            self.frame = key - 1;
        }
    }

    fn draw(&self, base: &ComponentBase, ctx: &mut RenderContext<'_>) {
        ctx.submit(DrawCommand::DrawSprite {
            component: ctx.component,
            sprite: base.name.clone(),
            frame: self.frame,
            world: *base.world_matrix(),
        });
    }

    fn reset(&mut self, _base: &mut ComponentBase) {
        self.frame = 0;
    }
}
