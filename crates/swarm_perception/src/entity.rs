//! Entity identifiers, categories and layer masks

use core::fmt;
use serde::{Deserialize, Serialize};

/// Handle of a sensed entity (agent or obstacle)
///
/// Generational index: the lower 32 bits are the slot index, the upper 32 bits
/// the generation, so a stale handle never aliases a reused slot.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId {
    bits: u64,
}

impl EntityId {
    /// Create a new ID from index and generation
    #[inline]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self {
            bits: (generation as u64) << 32 | index as u64,
        }
    }

    /// Create a null/invalid ID
    #[inline]
    pub const fn null() -> Self {
        Self { bits: u64::MAX }
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        self.bits == u64::MAX
    }

    #[inline]
    pub const fn index(&self) -> u32 {
        self.bits as u32
    }

    #[inline]
    pub const fn generation(&self) -> u32 {
        (self.bits >> 32) as u32
    }

    #[inline]
    pub const fn to_bits(&self) -> u64 {
        self.bits
    }

    #[inline]
    pub const fn from_bits(bits: u64) -> Self {
        Self { bits }
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "Entity(null)")
        } else {
            write!(f, "Entity({}v{})", self.index(), self.generation())
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "null")
        } else {
            write!(f, "{}v{}", self.index(), self.generation())
        }
    }
}

/// Allocates entity ids, recycling freed slots with a bumped generation
#[derive(Debug, Default)]
pub struct EntityAllocator {
    generations: Vec<u32>,
    free: Vec<u32>,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh id
    pub fn allocate(&mut self) -> EntityId {
        if let Some(index) = self.free.pop() {
            EntityId::new(index, self.generations[index as usize])
        } else {
            let index = self.generations.len() as u32;
            self.generations.push(0);
            EntityId::new(index, 0)
        }
    }

    /// Release an id. Returns false if it was already stale.
    pub fn release(&mut self, id: EntityId) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        let slot = &mut self.generations[id.index() as usize];
        *slot = slot.wrapping_add(1);
        self.free.push(id.index());
        true
    }

    /// Whether the id refers to a live allocation
    pub fn is_alive(&self, id: EntityId) -> bool {
        !id.is_null()
            && self
                .generations
                .get(id.index() as usize)
                .is_some_and(|&generation| generation == id.generation())
            && !self.free.contains(&id.index())
    }
}

/// Category tag used by sensor filters (e.g. "boid", "predator", "wall")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Category {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Which categories a sensor accepts
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CategoryFilter {
    /// Match every category
    #[default]
    Any,
    /// Match a single category
    Only(Category),
}

impl CategoryFilter {
    /// Filter from a tag name; an empty name matches everything
    pub fn tag(name: &str) -> Self {
        if name.is_empty() {
            Self::Any
        } else {
            Self::Only(Category::new(name))
        }
    }

    #[inline]
    pub fn matches(&self, category: &Category) -> bool {
        match self {
            Self::Any => true,
            Self::Only(wanted) => wanted == category,
        }
    }
}

/// Bitmask of layers, checked by the world query before any hit is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    /// Every layer
    pub const ALL: Self = Self(u32::MAX);
    /// No layer
    pub const NONE: Self = Self(0);

    /// Mask containing a single layer index (0..32)
    #[inline]
    pub const fn layer(index: u8) -> Self {
        Self(1u32 << (index % 32))
    }

    #[inline]
    pub const fn with(self, index: u8) -> Self {
        Self(self.0 | Self::layer(index).0)
    }

    #[inline]
    pub const fn intersects(self, other: LayerMask) -> bool {
        self.0 & other.0 != 0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::ALL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        let id = EntityId::new(42, 7);
        assert_eq!(id.index(), 42);
        assert_eq!(id.generation(), 7);
        assert!(!id.is_null());
        assert!(EntityId::null().is_null());
    }

    #[test]
    fn test_allocator_recycles_with_new_generation() {
        let mut alloc = EntityAllocator::new();
        let a = alloc.allocate();
        let b = alloc.allocate();
        assert_ne!(a, b);

        assert!(alloc.release(a));
        assert!(!alloc.release(a));
        assert!(!alloc.is_alive(a));

        let c = alloc.allocate();
        assert_eq!(c.index(), a.index());
        assert_eq!(c.generation(), a.generation() + 1);
        assert!(alloc.is_alive(c));
        assert!(alloc.is_alive(b));
    }

    #[test]
    fn test_category_filter() {
        let boid = Category::from("boid");
        assert!(CategoryFilter::Any.matches(&boid));
        assert!(CategoryFilter::tag("").matches(&boid));
        assert!(CategoryFilter::tag("boid").matches(&boid));
        assert!(!CategoryFilter::tag("predator").matches(&boid));
    }

    #[test]
    fn test_layer_mask() {
        let mask = LayerMask::layer(2).with(5);
        assert!(mask.intersects(LayerMask::layer(5)));
        assert!(!mask.intersects(LayerMask::layer(1)));
        assert!(LayerMask::ALL.intersects(mask));
        assert!(!LayerMask::NONE.intersects(mask));
    }
}
