//! Character costume runtime.
//!
//! A costume is a tree of visual and skeletal components driven by keyframed
//! clips ("chores"), with colormaps inherited down the tree and an optional
//! head look-at pass on top of the animated pose.
//!
//! ```rust,ignore
//! use costume::prelude::*;
//!
//! let library = ResourceLibrary::new().with_colormap(Colormap::greyscale("item.cmp"));
//! let mut costume = Costume::load("walk.cos", data, None, &library)?;
//! let walk = costume.find_chore("walk").unwrap();
//! costume.play_chore_looping(walk)?;
//!
//! let mut frame = DrawList::new();
//! costume.update(33.0);
//! costume.setup_textures(&mut frame);
//! costume.draw(&mut frame);
//! ```

pub use costume_animation as animation;
pub use costume_assets as assets;
pub use costume_core as common;
pub use costume_scene as scene;

pub use glam;

pub use costume_animation::{Chore, InterpolationMode, KeyTarget, KeyframeTrack, PlaybackState};
pub use costume_assets::{
    ChoreDesc, Colormap, ColormapCache, ColormapRef, ComponentDesc, CostumeDesc, ModelData,
    ModelNodeDesc, ResourceLibrary, ResourceProvider, TrackDesc, parse_costume,
};
pub use costume_core::{CostumeError, CostumeSettings, DEFAULT_COLORMAP, Result, Tag};
pub use costume_scene::{
    ComponentKind, ComponentTree, Costume, DrawCommand, DrawList, Head, ModelNode, RenderBackend,
    Transform,
};

/// Everything a game driver usually needs.
pub mod prelude {
    pub use crate::{
        ChoreDesc, Colormap, ComponentDesc, Costume, CostumeDesc, CostumeError, CostumeSettings,
        DrawCommand, DrawList, ModelData, ModelNodeDesc, PlaybackState, RenderBackend,
        ResourceLibrary, ResourceProvider, Tag, TrackDesc,
    };
}
