//! Render Seam
//!
//! The costume never talks to a GPU. During `setup_textures` and `draw` each
//! component emits [`DrawCommand`]s into a [`RenderBackend`]; the host turns
//! them into texture uploads and draw calls.
//!
//! [`DrawList`] is a recording backend that keeps every command in order.

use glam::Affine3A;

use costume_assets::ColormapRef;

/// One unit of work emitted by a component.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Texture setup: the palette a component's textures are decoded with.
    BindColormap {
        component: usize,
        colormap: String,
        /// The same colormap the adopted component of the previous costume
        /// resolved, so textures decoded with it can be kept.
        reused: bool,
    },
    /// Texture setup: material texture and animation frame.
    SelectTexture {
        component: usize,
        material: String,
        frame: usize,
    },
    DrawModel {
        component: usize,
        model: String,
        /// World matrices of the model's nodes, in node order.
        nodes: Vec<Affine3A>,
    },
    DrawSprite {
        component: usize,
        sprite: String,
        frame: usize,
        world: Affine3A,
    },
    EmitParticles {
        component: usize,
        emitter: String,
        rate: f32,
        world: Affine3A,
    },
}

impl DrawCommand {
    /// Component that emitted the command.
    #[must_use]
    pub fn component(&self) -> usize {
        match self {
            Self::BindColormap { component, .. }
            | Self::SelectTexture { component, .. }
            | Self::DrawModel { component, .. }
            | Self::DrawSprite { component, .. }
            | Self::EmitParticles { component, .. } => *component,
        }
    }
}

/// Receiver of draw commands.
pub trait RenderBackend {
    fn submit(&mut self, command: DrawCommand);
}

/// Per-component context handed to the `setup_texture` and `draw` hooks.
pub struct RenderContext<'a> {
    /// Index of the component being visited.
    pub component: usize,
    /// Resolved colormap (own override, nearest ancestor's, or costume default).
    pub colormap: Option<&'a ColormapRef>,
    pub backend: &'a mut dyn RenderBackend,
}

impl RenderContext<'_> {
    #[inline]
    pub fn submit(&mut self, command: DrawCommand) {
        self.backend.submit(command);
    }
}

/// Records commands in submission order.
#[derive(Debug, Default, Clone)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Clears the list, keeping its allocation for the next frame.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Components that emitted at least one command, in first-seen order.
    #[must_use]
    pub fn components(&self) -> Vec<usize> {
        let mut seen = Vec::new();
        for command in &self.commands {
            let id = command.component();
            if !seen.contains(&id) {
                seen.push(id);
            }
        }
        seen
    }
}

impl RenderBackend for DrawList {
    fn submit(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}
