use ember_asset::Pixmap;
use std::collections::hash_map::{Entry, HashMap};

/// A square surface a filter pass renders into, exposing the rendered frame
/// as readable pixels.
pub trait RenderTarget {
    fn resolution(&self) -> u32;

    /// Drains the captures accumulated since the last call.
    fn take_captures(&mut self) -> Vec<Pixmap>;
}

/// Resolution-keyed render target cache.
///
/// The specular pass revisits each mip resolution once per face, so targets
/// are created lazily and reused for the rest of the baking run. Nothing is
/// evicted; the key space is bounded by the mip count.
pub struct TargetCache<T> {
    targets: HashMap<u32, T>,
}

impl<T> Default for TargetCache<T> {
    fn default() -> Self {
        Self {
            targets: HashMap::new(),
        }
    }
}

impl<T: RenderTarget> TargetCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn contains(&self, resolution: u32) -> bool {
        self.targets.contains_key(&resolution)
    }

    /// Returns the target for `resolution`, creating it on first use.
    pub fn acquire_with<E>(
        &mut self,
        resolution: u32,
        create: impl FnOnce() -> Result<T, E>,
    ) -> Result<&mut T, E> {
        match self.targets.entry(resolution) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => Ok(entry.insert(create()?)),
        }
    }
}
