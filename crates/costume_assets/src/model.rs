use glam::{Quat, Vec3};

/// One joint of a model hierarchy as delivered by the model loader.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelNodeDesc {
    pub name: String,
    /// Index of the parent node; parents always precede their children.
    pub parent: Option<usize>,
    pub position: Vec3,
    pub rotation: Quat,
}

impl ModelNodeDesc {
    #[must_use]
    pub fn new(name: impl Into<String>, parent: Option<usize>, position: Vec3) -> Self {
        Self {
            name: name.into(),
            parent,
            position,
            rotation: Quat::IDENTITY,
        }
    }
}

/// Joint hierarchy of a model resource. Geometry stays with the render backend.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelData {
    pub name: String,
    pub nodes: Vec<ModelNodeDesc>,
}

impl ModelData {
    #[must_use]
    pub fn new(name: impl Into<String>, nodes: Vec<ModelNodeDesc>) -> Self {
        Self {
            name: name.into(),
            nodes,
        }
    }

    /// Index of the first node with the given name.
    #[must_use]
    pub fn find_node(&self, name: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.name == name)
    }
}
