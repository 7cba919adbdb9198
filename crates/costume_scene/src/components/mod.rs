//! Component Variants
//!
//! Every component of a costume carries the same [`ComponentBase`] (tag, name,
//! visibility, transform, colormap override) plus one variant from the closed
//! set in [`ComponentKind`], selected by the component's tag.
//!
//! Variants implement [`ComponentHooks`]. All hooks default to no-ops; a
//! variant overrides the subset that matters for its visual kind.

mod colormap;
mod joint;
mod material;
mod mesh;
mod model;
mod particles;
mod sprite;

use std::sync::Arc;

use glam::Affine3A;
use smallvec::SmallVec;

use costume_animation::InterpolationMode;
use costume_assets::{ColormapRef, ModelData, ResourceProvider};
use costume_core::{CostumeError, Result, Tag};

use crate::render::RenderContext;
use crate::transform::Transform;

pub use colormap::ColormapComponent;
pub use joint::JointComponent;
pub use material::MaterialComponent;
pub use mesh::MeshComponent;
pub use model::{ModelComponent, ModelNode};
pub use particles::ParticleEmitterComponent;
pub use sprite::SpriteComponent;

/// State shared by every component variant.
#[derive(Debug, Clone)]
pub struct ComponentBase {
    pub tag: Tag,
    /// Resource name from the costume description.
    pub name: String,
    /// Own visibility flag. Effective visibility also depends on ancestors.
    pub visible: bool,
    pub transform: Transform,
    /// Colormap override; `None` inherits from the parent chain.
    pub colormap: Option<ColormapRef>,
    /// Colormap the adopted component of the previous costume resolved.
    pub previous_colormap: Option<ColormapRef>,
    /// Last value a chore wrote into this component.
    pub applied_key: Option<f32>,
}

impl ComponentBase {
    #[must_use]
    pub fn new(tag: Tag, name: impl Into<String>) -> Self {
        Self {
            tag,
            name: name.into(),
            visible: true,
            transform: Transform::new(),
            colormap: None,
            previous_colormap: None,
            applied_key: None,
        }
    }

    /// World matrix computed by the last hierarchy update.
    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        self.transform.world_matrix()
    }

    /// Whether `colormap` is the one the previous costume already used here.
    #[must_use]
    pub fn reuses_colormap(&self, colormap: &ColormapRef) -> bool {
        self.previous_colormap
            .as_ref()
            .is_some_and(|previous| Arc::ptr_eq(previous, colormap))
    }

    fn reset(&mut self) {
        self.visible = true;
        self.applied_key = None;
        self.transform = Transform::new();
    }
}

/// What a component inherits from its counterpart in the previous costume.
#[derive(Debug, Clone, Default)]
pub struct Adoption {
    /// The previous component's resolved colormap.
    pub colormap: Option<ColormapRef>,
    /// Model data held by the previous component, if it was a model.
    pub model: Option<Arc<ModelData>>,
}

/// Everything `init` may consult while a costume is being built.
pub struct InitContext<'a> {
    pub resources: &'a dyn ResourceProvider,
    /// Colormaps held by the previous costume; name lookups try these first.
    pub previous_colormaps: &'a [ColormapRef],
    pub adoption: Option<&'a Adoption>,
    /// Set by a hook to install a colormap override on the parent component.
    pub parent_colormap: Option<ColormapRef>,
}

impl InitContext<'_> {
    /// Resolves a colormap by name, preferring ones the previous costume holds.
    #[must_use]
    pub fn resolve_colormap(&self, name: &str) -> Option<ColormapRef> {
        self.previous_colormaps
            .iter()
            .find(|c| c.name == name)
            .cloned()
            .or_else(|| self.resources.colormap(name))
    }
}

/// Per-variant behaviour. Each hook is called from exactly one place per frame.
pub trait ComponentHooks {
    /// How chore values are interpolated for this component.
    fn interpolation(&self) -> InterpolationMode {
        InterpolationMode::Step
    }

    /// Called once, in load order, after the whole tree exists.
    fn init(&mut self, _base: &mut ComponentBase, _ctx: &mut InitContext<'_>) {}

    /// Receives a value evaluated by a chore.
    fn set_key(&mut self, _base: &mut ComponentBase, _value: f32) {}

    fn set_map_name(&mut self, _base: &mut ComponentBase, _name: &str) {}

    /// Called after the component's world matrix was recomputed.
    fn set_matrix(&mut self, _base: &mut ComponentBase) {}

    /// Per-frame update, after chores and before matrices.
    fn update(&mut self, _base: &mut ComponentBase) {}

    fn setup_texture(&self, _base: &ComponentBase, _ctx: &mut RenderContext<'_>) {}

    fn draw(&self, _base: &ComponentBase, _ctx: &mut RenderContext<'_>) {}

    /// Returns the variant to its loaded state.
    fn reset(&mut self, _base: &mut ComponentBase) {}
}

/// The closed set of component variants.
#[derive(Debug, Clone)]
pub enum ComponentKind {
    Model(ModelComponent),
    Joint(JointComponent),
    Mesh(MeshComponent),
    Material(MaterialComponent),
    Colormap(ColormapComponent),
    Sprite(SpriteComponent),
    ParticleEmitter(ParticleEmitterComponent),
}

impl ComponentKind {
    /// Picks the variant for a tag.
    pub fn from_tag(tag: Tag, name: &str) -> Result<Self> {
        let kind = match tag {
            Tag::MMDL | Tag::MODEL => Self::Model(ModelComponent::new(name)),
            Tag::BONE => Self::Joint(JointComponent::default()),
            Tag::MESH => Self::Mesh(MeshComponent),
            Tag::MATERIAL => Self::Material(MaterialComponent::new(name)),
            Tag::CMAP => Self::Colormap(ColormapComponent::default()),
            Tag::SPRITE => Self::Sprite(SpriteComponent::default()),
            Tag::PARTICLES => Self::ParticleEmitter(ParticleEmitterComponent::default()),
            other => {
                return Err(CostumeError::malformed(
                    0,
                    format!("unknown component tag {other} for `{name}`"),
                ));
            }
        };
        Ok(kind)
    }

    #[must_use]
    pub fn hooks(&self) -> &dyn ComponentHooks {
        match self {
            Self::Model(c) => c,
            Self::Joint(c) => c,
            Self::Mesh(c) => c,
            Self::Material(c) => c,
            Self::Colormap(c) => c,
            Self::Sprite(c) => c,
            Self::ParticleEmitter(c) => c,
        }
    }

    pub fn hooks_mut(&mut self) -> &mut dyn ComponentHooks {
        match self {
            Self::Model(c) => c,
            Self::Joint(c) => c,
            Self::Mesh(c) => c,
            Self::Material(c) => c,
            Self::Colormap(c) => c,
            Self::Sprite(c) => c,
            Self::ParticleEmitter(c) => c,
        }
    }

    #[must_use]
    pub fn as_model(&self) -> Option<&ModelComponent> {
        match self {
            Self::Model(model) => Some(model),
            _ => None,
        }
    }

    pub fn as_model_mut(&mut self) -> Option<&mut ModelComponent> {
        match self {
            Self::Model(model) => Some(model),
            _ => None,
        }
    }
}

/// One node of the component tree.
#[derive(Debug, Clone)]
pub struct Component {
    pub base: ComponentBase,
    pub kind: ComponentKind,
    pub(crate) parent: Option<usize>,
    pub(crate) children: SmallVec<[usize; 4]>,
}

impl Component {
    #[must_use]
    pub fn new(base: ComponentBase, kind: ComponentKind) -> Self {
        Self {
            base,
            kind,
            parent: None,
            children: SmallVec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn tag(&self) -> Tag {
        self.base.tag
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.base.name
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[usize] {
        &self.children
    }

    #[inline]
    #[must_use]
    pub fn applied_key(&self) -> Option<f32> {
        self.base.applied_key
    }

    // === Hook dispatch ===

    pub(crate) fn init(&mut self, ctx: &mut InitContext<'_>) {
        self.kind.hooks_mut().init(&mut self.base, ctx);
    }

    pub(crate) fn set_key(&mut self, value: f32) {
        self.base.applied_key = Some(value);
        self.kind.hooks_mut().set_key(&mut self.base, value);
    }

    pub(crate) fn set_map_name(&mut self, name: &str) {
        self.kind.hooks_mut().set_map_name(&mut self.base, name);
    }

    pub(crate) fn set_matrix(&mut self) {
        self.kind.hooks_mut().set_matrix(&mut self.base);
    }

    pub(crate) fn update(&mut self) {
        self.kind.hooks_mut().update(&mut self.base);
    }

    pub(crate) fn setup_texture(&self, ctx: &mut RenderContext<'_>) {
        self.kind.hooks().setup_texture(&self.base, ctx);
    }

    pub(crate) fn draw(&self, ctx: &mut RenderContext<'_>) {
        self.kind.hooks().draw(&self.base, ctx);
    }

    pub(crate) fn reset(&mut self) {
        self.base.reset();
        self.kind.hooks_mut().reset(&mut self.base);
    }
}
