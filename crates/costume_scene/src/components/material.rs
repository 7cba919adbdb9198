use super::{ComponentBase, ComponentHooks};
use crate::render::{DrawCommand, RenderContext};

/// `MAT `: a material texture. Keys select the animation frame; the texture
/// itself can be swapped at runtime with `set_map_name`.
#[derive(Debug, Clone)]
pub struct MaterialComponent {
    loaded_name: String,
    map_name: String,
    frame: usize,
}

impl MaterialComponent {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            map_name: name.clone(),
            loaded_name: name,
            frame: 0,
        }
    }

    /// Texture currently selected.
    #[must_use]
    pub fn map_name(&self) -> &str {
        &self.map_name
    }

    #[must_use]
    pub fn frame(&self) -> usize {
        self.frame
    }
}

impl ComponentHooks for MaterialComponent {
    fn set_key(&mut self, _base: &mut ComponentBase, value: f32) {
        self.frame = value.round().max(0.0) as usize;
    }

    fn set_map_name(&mut self, _base: &mut ComponentBase, name: &str) {
        name.clone_into(&mut self.map_name);
    }

    fn setup_texture(&self, base: &ComponentBase, ctx: &mut RenderContext<'_>) {
        if let Some(colormap) = ctx.colormap {
            let reused = base.reuses_colormap(colormap);
            let colormap = colormap.name.clone();
            ctx.submit(DrawCommand::BindColormap {
                component: ctx.component,
                colormap,
                reused,
            });
        }
        ctx.submit(DrawCommand::SelectTexture {
            component: ctx.component,
            material: self.map_name.clone(),
            frame: self.frame,
        });
    }

    fn reset(&mut self, _base: &mut ComponentBase) {
        self.frame = 0;
        self.map_name.clone_from(&self.loaded_name);
    }
}
