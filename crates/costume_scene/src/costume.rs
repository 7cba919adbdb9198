//! Costume Coordinator
//!
//! A [`Costume`] owns a component tree and a chore table and is the single
//! entry point a game driver talks to. Per frame the driver calls
//! [`Costume::update`], then [`Costume::setup_textures`], then [`Costume::draw`].
//!
//! ```rust,ignore
//! let mut costume = Costume::load("manny.cos", &bytes, None, &library)?;
//! costume.play_chore(0)?;
//! costume.update(33.0);
//! costume.setup_textures(&mut backend);
//! costume.draw(&mut backend);
//! ```

use std::sync::Arc;

use glam::{EulerRot, Vec3};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use costume_animation::{Chore, ChoreTrack, KeyframeTrack};
use costume_assets::{ColormapRef, CostumeDesc, ResourceProvider, parse_costume};
use costume_core::{CostumeError, CostumeSettings, Result, Tag};

use crate::components::{Adoption, Component, ComponentBase, ComponentKind, InitContext, ModelNode};
use crate::head::Head;
use crate::render::RenderBackend;
use crate::transform::Transform;
use crate::tree::ComponentTree;

pub struct Costume {
    filename: String,
    tree: ComponentTree,
    chores: Vec<Chore>,
    /// Costume-wide default colormap, the end of every colormap chain.
    colormap: Option<ColormapRef>,
    head: Option<Head>,
    look_target: Option<Vec3>,
    /// Position and orientation every root component composes with.
    root: Transform,
    settings: CostumeSettings,
}

impl std::fmt::Debug for Costume {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Costume")
            .field("filename", &self.filename)
            .field("components", &self.tree.len())
            .field("chores", &self.chores.len())
            .field("colormap", &self.colormap.as_ref().map(|c| c.name.as_str()))
            .finish_non_exhaustive()
    }
}

impl Costume {
    // ========================================================================
    // Loading
    // ========================================================================

    /// Parses a costume resource and builds the costume with default settings.
    pub fn load(
        filename: &str,
        data: &[u8],
        previous: Option<&Costume>,
        resources: &dyn ResourceProvider,
    ) -> Result<Self> {
        Self::load_with_settings(filename, data, previous, resources, CostumeSettings::default())
    }

    pub fn load_with_settings(
        filename: &str,
        data: &[u8],
        previous: Option<&Costume>,
        resources: &dyn ResourceProvider,
        settings: CostumeSettings,
    ) -> Result<Self> {
        let desc = parse_costume(data)?;
        Self::from_desc(filename, &desc, previous, resources, settings)
    }

    /// Builds a costume from an already parsed description.
    ///
    /// With a `previous` costume, components are matched to it by tag to reuse
    /// resolved colormaps and model data; the reference is not kept.
    pub fn from_desc(
        filename: &str,
        desc: &CostumeDesc,
        previous: Option<&Costume>,
        resources: &dyn ResourceProvider,
        settings: CostumeSettings,
    ) -> Result<Self> {
        desc.validate()?;

        let colormap = previous
            .and_then(|p| p.colormap.clone())
            .or_else(|| resources.colormap(&settings.default_colormap));
        if colormap.is_none() {
            log::warn!(
                "Default colormap `{}` not found for costume `{filename}`",
                settings.default_colormap
            );
        }

        // 1. Tree, in load order
        let mut tree = ComponentTree::new();
        for component in &desc.components {
            let kind = ComponentKind::from_tag(component.tag, &component.name)?;
            let base = ComponentBase::new(component.tag, component.name.clone());
            tree.push(Component::new(base, kind), component.parent)?;
        }

        // 2. Adoption and init hooks
        let adoptions = previous.map(|p| p.adoptions(desc)).unwrap_or_default();
        let previous_colormaps = previous.map(Costume::held_colormaps).unwrap_or_default();
        let mut ctx = InitContext {
            resources,
            previous_colormaps: &previous_colormaps,
            adoption: None,
            parent_colormap: None,
        };
        let mut adopted = 0;
        for id in 0..tree.len() {
            let adoption = adoptions.get(id).and_then(Option::as_ref);
            if let Some(adoption) = adoption {
                if let Some(component) = tree.get_mut(id) {
                    component.base.previous_colormap.clone_from(&adoption.colormap);
                }
                adopted += 1;
            }
            ctx.adoption = adoption;
            tree.init_component(id, &mut ctx);
        }

        // 3. Chores
        let chores: Vec<Chore> = desc
            .chores
            .iter()
            .map(|chore| {
                let tracks = chore
                    .tracks
                    .iter()
                    .map(|track| {
                        let (times, values) = track.keys.iter().map(|k| (k.time, k.value)).unzip();
                        ChoreTrack::new(track.component, KeyframeTrack::new(times, values))
                    })
                    .collect();
                Chore::new(chore.name.clone(), chore.length, tracks)
            })
            .collect();

        log::debug!(
            "Loaded costume `{filename}`: {} components ({adopted} adopted), {} chores",
            tree.len(),
            chores.len()
        );

        Ok(Self {
            filename: filename.to_string(),
            tree,
            chores,
            colormap,
            head: None,
            look_target: None,
            root: Transform::new(),
            settings,
        })
    }

    /// Matches each component of `desc` to one of ours with the same tag:
    /// same name first, else the k-th component carrying that tag.
    fn adoptions(&self, desc: &CostumeDesc) -> Vec<Option<Adoption>> {
        let mut by_tag: FxHashMap<Tag, SmallVec<[usize; 4]>> = FxHashMap::default();
        for (id, component) in self.tree.iter() {
            by_tag.entry(component.tag()).or_default().push(id);
        }

        let mut occurrence: FxHashMap<Tag, usize> = FxHashMap::default();
        desc.components
            .iter()
            .map(|component| {
                let k = occurrence.entry(component.tag).or_insert(0);
                let nth = *k;
                *k += 1;

                let candidates = by_tag.get(&component.tag)?;
                let index = candidates
                    .iter()
                    .copied()
                    .find(|&id| self.tree.get(id).is_some_and(|c| c.name() == component.name))
                    .or_else(|| candidates.get(nth).copied())?;

                let previous = self.tree.get(index)?;
                Some(Adoption {
                    colormap: self.tree.cmap(index, self.colormap.as_ref()).cloned(),
                    model: previous.kind.as_model().and_then(|m| m.data().cloned()),
                })
            })
            .collect()
    }

    /// Every distinct colormap this costume holds: its default and overrides.
    fn held_colormaps(&self) -> Vec<ColormapRef> {
        let mut held: Vec<ColormapRef> = Vec::new();
        let overrides = self.tree.iter().filter_map(|(_, c)| c.base.colormap.as_ref());
        for colormap in self.colormap.iter().chain(overrides) {
            if !held.iter().any(|h| Arc::ptr_eq(h, colormap)) {
                held.push(Arc::clone(colormap));
            }
        }
        held
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    #[must_use]
    pub fn settings(&self) -> &CostumeSettings {
        &self.settings
    }

    #[must_use]
    pub fn tree(&self) -> &ComponentTree {
        &self.tree
    }

    #[must_use]
    pub fn chores(&self) -> &[Chore] {
        &self.chores
    }

    #[must_use]
    pub fn chore(&self, index: usize) -> Option<&Chore> {
        self.chores.get(index)
    }

    /// Index of the first chore with exactly this name.
    #[must_use]
    pub fn find_chore(&self, name: &str) -> Option<usize> {
        self.chores.iter().position(|c| c.name() == name)
    }

    /// Nodes of the main model (the first `MMDL` component).
    #[must_use]
    pub fn model_nodes(&self) -> Option<&[ModelNode]> {
        self.tree.main_model().map(|m| m.nodes())
    }

    // ========================================================================
    // Chore commands
    // ========================================================================

    fn chore_mut(&mut self, index: usize) -> Result<(&mut Chore, &mut ComponentTree)> {
        let len = self.chores.len();
        let chore = self
            .chores
            .get_mut(index)
            .ok_or(CostumeError::out_of_range("chore", index, len))?;
        Ok((chore, &mut self.tree))
    }

    pub fn play_chore(&mut self, index: usize) -> Result<()> {
        let (chore, tree) = self.chore_mut(index)?;
        chore.play(tree);
        Ok(())
    }

    pub fn play_chore_looping(&mut self, index: usize) -> Result<()> {
        let (chore, tree) = self.chore_mut(index)?;
        chore.play_looping(tree);
        Ok(())
    }

    pub fn set_chore_last_frame(&mut self, index: usize) -> Result<()> {
        let (chore, tree) = self.chore_mut(index)?;
        chore.set_last_frame(tree);
        Ok(())
    }

    /// Switches a playing chore between one-shot and looping.
    pub fn set_chore_looping(&mut self, index: usize, looping: bool) -> Result<()> {
        self.chore_mut(index)?.0.set_looping(looping);
        Ok(())
    }

    pub fn stop_chore(&mut self, index: usize) -> Result<()> {
        self.chore_mut(index)?.0.stop();
        Ok(())
    }

    pub fn stop_chores(&mut self) {
        for chore in &mut self.chores {
            chore.stop();
        }
    }

    /// Stops every chore and returns all components to their loaded state.
    pub fn reset(&mut self) {
        self.stop_chores();
        self.tree.reset();
    }

    // ========================================================================
    // Chore queries
    // ========================================================================

    /// Whether a chore with this name is playing. Unknown names are not an error.
    #[must_use]
    pub fn is_choring_named(&self, name: &str, exclude_looping: bool) -> bool {
        self.chores
            .iter()
            .any(|c| c.name() == name && c.is_choring(exclude_looping))
    }

    pub fn is_choring_index(&self, index: usize, exclude_looping: bool) -> Result<bool> {
        self.chores
            .get(index)
            .map(|c| c.is_choring(exclude_looping))
            .ok_or(CostumeError::out_of_range("chore", index, self.chores.len()))
    }

    #[must_use]
    pub fn is_any_choring(&self, exclude_looping: bool) -> bool {
        self.chores.iter().any(|c| c.is_choring(exclude_looping))
    }

    // ========================================================================
    // Colormaps
    // ========================================================================

    /// Costume-wide default colormap.
    #[must_use]
    pub fn colormap(&self) -> Option<&ColormapRef> {
        self.colormap.as_ref()
    }

    /// Replaces the default colormap. Component overrides are untouched; an
    /// unknown name leaves the current default in place.
    pub fn set_colormap(&mut self, name: &str, resources: &dyn ResourceProvider) -> Result<()> {
        match resources.colormap(name) {
            Some(colormap) => {
                self.colormap = Some(colormap);
                Ok(())
            }
            None => {
                log::warn!("Colormap `{name}` not found, costume `{}` keeps its colormap", self.filename);
                Err(CostumeError::UnknownColormap(name.to_string()))
            }
        }
    }

    /// Colormap a component resolves through its ancestors and the default.
    #[must_use]
    pub fn component_colormap(&self, id: usize) -> Option<&ColormapRef> {
        self.tree.cmap(id, self.colormap.as_ref())
    }

    // ========================================================================
    // Components
    // ========================================================================

    pub fn set_component_parent(&mut self, id: usize, parent: Option<usize>) -> Result<()> {
        self.tree.set_parent(id, parent)
    }

    pub fn set_component_visible(&mut self, id: usize, visible: bool) -> Result<()> {
        self.tree.try_get_mut(id)?.base.visible = visible;
        Ok(())
    }

    pub fn set_component_map_name(&mut self, id: usize, name: &str) -> Result<()> {
        self.tree.set_map_name(id, name)
    }

    /// Effective visibility, including ancestors.
    pub fn is_component_visible(&self, id: usize) -> Result<bool> {
        self.tree.try_get(id)?;
        Ok(self.tree.is_visible(id))
    }

    // ========================================================================
    // Head & placement
    // ========================================================================

    /// Configures the look-at overlay. Takes effect on the next `update`.
    pub fn set_head(
        &mut self,
        joint1: usize,
        joint2: usize,
        joint3: usize,
        max_roll: f32,
        max_pitch: f32,
        max_yaw: f32,
    ) {
        self.head = Some(Head::new(joint1, joint2, joint3, max_roll, max_pitch, max_yaw));
    }

    pub fn clear_head(&mut self) {
        self.head = None;
    }

    #[must_use]
    pub fn head(&self) -> Option<&Head> {
        self.head.as_ref()
    }

    /// World-space point the head turns toward; `None` makes the overlay inert.
    pub fn set_look_target(&mut self, target: Option<Vec3>) {
        self.look_target = target;
    }

    #[must_use]
    pub fn look_target(&self) -> Option<Vec3> {
        self.look_target
    }

    /// Places the costume. Angles are in degrees.
    pub fn set_pos_rotate(&mut self, pos: Vec3, pitch: f32, yaw: f32, roll: f32) {
        self.root.position = pos;
        self.root.set_rotation_euler_with_order(
            yaw.to_radians(),
            pitch.to_radians(),
            roll.to_radians(),
            EulerRot::YXZ,
        );
    }

    // ========================================================================
    // Frame
    // ========================================================================

    /// Advances the costume by `dt` resource time units.
    pub fn update(&mut self, dt: f32) {
        let dt = self.settings.clamp_frame_delta(dt);

        // 1. Chores write keys into components
        for chore in &mut self.chores {
            chore.update(dt, &mut self.tree);
        }

        // 2. Component hooks
        self.tree.update_components();

        // 3. Matrices, parents before children
        let root_changed = self.root.update_local_matrix();
        self.tree.update_matrices(self.root.local_matrix(), root_changed);

        // 4. Head overlay on top of the chore-driven pose
        if let (Some(head), Some(target)) = (self.head, self.look_target)
            && let Some(model) = self.tree.main_model_mut()
        {
            head.apply(model, target);
        }
    }

    pub fn setup_textures(&self, backend: &mut dyn RenderBackend) {
        self.tree.setup_textures(self.colormap.as_ref(), backend);
    }

    pub fn draw(&self, backend: &mut dyn RenderBackend) {
        self.tree.draw(self.colormap.as_ref(), backend);
    }
}
