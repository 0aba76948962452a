//! Texture lookup used during material derivation.

use std::collections::HashMap;

bitflags::bitflags! {
    /// Properties of a loaded texture.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct TextureFlags: u8 {
        /// The texture has transparent texels and must be blended.
        const TRANSPARENT = 0b0000_0001;
    }
}

/// A texture known to the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureItem {
    name: String,
    flags: TextureFlags,
}

impl TextureItem {
    /// Creates a texture entry.
    pub fn new(name: impl Into<String>, flags: TextureFlags) -> Self {
        Self {
            name: name.into(),
            flags,
        }
    }

    /// Returns the texture name as it was registered.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the texture's flags.
    #[inline]
    pub fn flags(&self) -> TextureFlags {
        self.flags
    }

    /// Returns `true` if the texture is flagged transparent.
    #[inline]
    pub fn is_transparent(&self) -> bool {
        self.flags.contains(TextureFlags::TRANSPARENT)
    }
}

/// Source of textures for material derivation.
///
/// The scene layer only reads from the store; loading and caching pixels is
/// the renderer's business.
pub trait TextureStore {
    /// Finds a texture by name. Returns `None` if no texture resolves.
    fn lookup(&self, name: &str) -> Option<&TextureItem>;
}

/// An in-memory [`TextureStore`] with case-insensitive names.
#[derive(Debug, Clone, Default)]
pub struct TextureCollection {
    items: HashMap<String, TextureItem>,
}

impl TextureCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a texture, replacing any texture with the same name.
    pub fn insert(&mut self, item: TextureItem) -> Option<TextureItem> {
        self.items.insert(item.name.to_lowercase(), item)
    }

    /// Builder-style [`TextureCollection::insert`].
    pub fn with(mut self, item: TextureItem) -> Self {
        self.insert(item);
        self
    }

    /// Returns the number of textures.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the collection holds no textures.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl TextureStore for TextureCollection {
    fn lookup(&self, name: &str) -> Option<&TextureItem> {
        self.items.get(&name.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case() {
        let textures = TextureCollection::new().with(TextureItem::new("Brick01", TextureFlags::empty()));
        let item = textures.lookup("BRICK01").unwrap();
        assert_eq!(item.name(), "Brick01");
        assert!(!item.is_transparent());
        assert!(textures.lookup("missing").is_none());
    }

    #[test]
    fn insert_replaces_same_name() {
        let mut textures = TextureCollection::new();
        assert!(textures.insert(TextureItem::new("glass", TextureFlags::empty())).is_none());
        let old = textures.insert(TextureItem::new("GLASS", TextureFlags::TRANSPARENT));
        assert!(old.is_some());
        assert_eq!(textures.len(), 1);
        assert!(textures.lookup("glass").unwrap().is_transparent());
    }
}
