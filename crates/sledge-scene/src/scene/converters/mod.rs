//! Converters turn map solids into scene objects.
//!
//! A [`ConverterChain`] runs every converter that supports a solid, highest
//! priority first. Each converter either builds its objects from scratch
//! ([`SceneConverter::convert`]) or patches the objects it built earlier
//! ([`SceneConverter::update`]). An update that returns `false` asks the
//! caller to rebuild the solid from scratch.

mod face;
mod selection;
mod solid;

use std::fmt::Debug;

use crate::{DisplaySettings, MapSolid, SolidId, TextureStore};

use super::registry::SceneMapObject;

pub use face::{convert_face, update_face};
pub use selection::SelectionBoundsConverter;
pub use solid::DefaultSolidConverter;

/// Read-only state shared by every converter in one pass.
#[derive(Clone, Copy)]
pub struct ConversionContext<'a> {
    pub settings: &'a DisplaySettings,
    pub textures: &'a dyn TextureStore,
}

impl<'a> ConversionContext<'a> {
    pub fn new(settings: &'a DisplaySettings, textures: &'a dyn TextureStore) -> Self {
        Self { settings, textures }
    }
}

/// Ordering of converters within a chain. Later variants run first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConverterPriority {
    DefaultLowest,
    DefaultLow,
    DefaultMedium,
    DefaultHigh,
    DefaultHighest,
    OverrideLowest,
    OverrideLow,
    OverrideMedium,
    OverrideHigh,
    OverrideHighest,
}

/// Converts one kind of map object into scene objects.
pub trait SceneConverter: Debug {
    fn priority(&self) -> ConverterPriority;

    /// Returns `true` if this converter handles the solid.
    fn supports(&self, solid: &MapSolid) -> bool;

    /// Returns `true` to skip the remaining lower-priority converters.
    fn should_stop_processing(&self, registry: &SceneMapObject, solid: &MapSolid) -> bool;

    /// Adds this converter's objects for the solid to the registry.
    fn convert(
        &self,
        registry: &mut SceneMapObject,
        ctx: &ConversionContext<'_>,
        id: SolidId,
        solid: &MapSolid,
    ) -> bool;

    /// Brings this converter's existing objects up to date. Returns `false`
    /// if they cannot be patched and the solid must be rebuilt.
    fn update(
        &self,
        registry: &mut SceneMapObject,
        ctx: &ConversionContext<'_>,
        id: SolidId,
        solid: &MapSolid,
    ) -> bool;
}

/// Converters ordered by descending priority. Converters of equal priority
/// run in registration order.
#[derive(Debug)]
pub struct ConverterChain {
    converters: Vec<Box<dyn SceneConverter>>,
}

impl ConverterChain {
    /// Creates a chain with no converters.
    pub fn empty() -> Self {
        Self {
            converters: Vec::new(),
        }
    }

    /// Adds a converter after every converter of equal or higher priority.
    pub fn register(&mut self, converter: Box<dyn SceneConverter>) {
        let priority = converter.priority();
        let index = self
            .converters
            .iter()
            .position(|c| c.priority() < priority)
            .unwrap_or(self.converters.len());
        self.converters.insert(index, converter);
    }

    /// Builder-style [`ConverterChain::register`].
    pub fn with(mut self, converter: impl SceneConverter + 'static) -> Self {
        self.register(Box::new(converter));
        self
    }

    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    /// Returns the priorities in execution order.
    pub fn priorities(&self) -> Vec<ConverterPriority> {
        self.converters.iter().map(|c| c.priority()).collect()
    }

    /// Runs every supporting converter's `convert`. Returns `false` as soon
    /// as one fails.
    pub fn convert(
        &self,
        registry: &mut SceneMapObject,
        ctx: &ConversionContext<'_>,
        id: SolidId,
        solid: &MapSolid,
    ) -> bool {
        for converter in self.converters.iter().filter(|c| c.supports(solid)) {
            if !converter.convert(registry, ctx, id, solid) {
                log::warn!("{converter:?} failed to convert solid {id:?}");
                return false;
            }
            if converter.should_stop_processing(registry, solid) {
                break;
            }
        }
        true
    }

    /// Runs every supporting converter's `update`. Returns `false` as soon
    /// as one cannot patch its objects.
    pub fn update(
        &self,
        registry: &mut SceneMapObject,
        ctx: &ConversionContext<'_>,
        id: SolidId,
        solid: &MapSolid,
    ) -> bool {
        for converter in self.converters.iter().filter(|c| c.supports(solid)) {
            if !converter.update(registry, ctx, id, solid) {
                log::trace!("{converter:?} cannot update solid {id:?} in place");
                return false;
            }
            if converter.should_stop_processing(registry, solid) {
                break;
            }
        }
        true
    }
}

impl Default for ConverterChain {
    /// The selection box converter followed by the default solid converter.
    fn default() -> Self {
        Self::empty()
            .with(DefaultSolidConverter)
            .with(SelectionBoundsConverter::default())
    }
}
