use costume_animation::InterpolationMode;

use super::{ComponentBase, ComponentHooks};
use crate::render::{DrawCommand, RenderContext};

/// `PRTC`: a particle emitter. Keys set the emission rate, blended linearly;
/// a rate of zero emits nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParticleEmitterComponent {
    rate: f32,
}

impl ParticleEmitterComponent {
    #[must_use]
    pub fn rate(&self) -> f32 {
        self.rate
    }
}

impl ComponentHooks for ParticleEmitterComponent {
    fn interpolation(&self) -> InterpolationMode {
        InterpolationMode::Linear
    }

    fn set_key(&mut self, _base: &mut ComponentBase, value: f32) {
        self.rate = value.max(0.0);
    }

    fn draw(&self, base: &ComponentBase, ctx: &mut RenderContext<'_>) {
        if self.rate > 0.0 {
            ctx.submit(DrawCommand::EmitParticles {
                component: ctx.component,
                emitter: base.name.clone(),
                rate: self.rate,
                world: *base.world_matrix(),
            });
        }
    }

    fn reset(&mut self, _base: &mut ComponentBase) {
        self.rate = 0.0;
    }
}
