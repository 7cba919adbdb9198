use std::sync::Arc;

/// Number of palette entries in a colormap.
pub const PALETTE_SIZE: usize = 256;

/// A named palette remapping texture indices to RGB colors.
///
/// Colormaps are shared between components and costumes; holders keep them
/// alive through [`ColormapRef`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Colormap {
    pub name: String,
    pub palette: Vec<[u8; 3]>,
}

/// Shared, reference-counted colormap handle.
pub type ColormapRef = Arc<Colormap>;

impl Colormap {
    #[must_use]
    pub fn new(name: impl Into<String>, palette: Vec<[u8; 3]>) -> Self {
        Self {
            name: name.into(),
            palette,
        }
    }

    /// Greyscale ramp, handy as a stand-in when no palette data is available.
    #[must_use]
    pub fn greyscale(name: impl Into<String>) -> Self {
        let palette = (0..PALETTE_SIZE).map(|i| [i as u8; 3]).collect();
        Self::new(name, palette)
    }

    /// Looks up a palette entry; out-of-range indices map to black.
    #[inline]
    #[must_use]
    pub fn color(&self, index: u8) -> [u8; 3] {
        self.palette.get(index as usize).copied().unwrap_or([0, 0, 0])
    }
}
