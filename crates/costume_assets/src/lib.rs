//! Resource contracts and readers for the costume engine.
//!
//! The costume core never loads files itself. It consumes:
//! - [`CostumeDesc`]: the parsed component/chore tables ([`reader::parse_costume`])
//! - [`ResourceProvider`]: colormap and model lookups by name
//!
//! [`ResourceLibrary`] and [`ColormapCache`] are in-memory implementations
//! suitable for tools, tests and small games.

pub mod colormap;
pub mod desc;
pub mod model;
pub mod provider;
pub mod reader;
pub mod storage;

pub use colormap::{Colormap, ColormapRef};
pub use desc::{ChoreDesc, ComponentDesc, CostumeDesc, TrackDesc, TrackKey};
pub use model::{ModelData, ModelNodeDesc};
pub use provider::{ResourceLibrary, ResourceProvider};
pub use reader::parse_costume;
pub use storage::{ColormapCache, ColormapHandle};
