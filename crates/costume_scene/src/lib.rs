//! Component trees and the costume coordinator.
//!
//! - [`ComponentTree`]: arena of components with index links, inherited
//!   visibility and colormap chains
//! - [`components`]: the closed set of component variants and their hooks
//! - [`transform_system`]: top-down world matrix propagation
//! - [`Head`]: look-at overlay for the main model's joint chain
//! - [`Costume`]: loading, chore playback, per-frame update and draw

pub mod components;
pub mod costume;
pub mod head;
pub mod render;
pub mod transform;
pub mod transform_system;
pub mod tree;

pub use components::{
    Adoption, Component, ComponentBase, ComponentHooks, ComponentKind, InitContext, ModelComponent,
    ModelNode,
};
pub use costume::Costume;
pub use head::{Head, LookAngles};
pub use render::{DrawCommand, DrawList, RenderBackend, RenderContext};
pub use transform::Transform;
pub use tree::ComponentTree;
