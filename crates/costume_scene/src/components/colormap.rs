use super::{ComponentBase, ComponentHooks, InitContext};

/// `CMAP`: resolves a colormap by name at load time and installs it as the
/// parent component's override. Carries no per-frame state.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColormapComponent;

impl ComponentHooks for ColormapComponent {
    fn init(&mut self, base: &mut ComponentBase, ctx: &mut InitContext<'_>) {
        match ctx.resolve_colormap(&base.name) {
            Some(colormap) => ctx.parent_colormap = Some(colormap),
            None => log::warn!("Colormap `{}` not found, parent keeps inheriting", base.name),
        }
    }
}
