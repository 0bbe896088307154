#![forbid(unsafe_code)]

//! Read-only view of the host's control tree.
//!
//! The host owns a tree of on-screen regions (panels, item grids, the
//! minimap). The gesture runtime never mutates it; it only asks whether a
//! point falls inside a visible region and, for item grids, which item sits
//! under the point.
//!
//! Regions are addressed by a stable [`RegionId`] through a [`RegionSource`].
//! A region that is not currently loaded simply resolves to `None`.
//!
//! # Visibility
//!
//! Each region reports two flags:
//!
//! - *self-hidden*: the region itself is hidden. Cheap and safe to read from
//!   any context.
//! - *effectively-hidden*: the region or any ancestor is hidden. Only valid on
//!   the host's authoritative context, where the ancestor chain is stable.

use std::fmt;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Stable identity of a top-level region known to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(transparent))]
pub struct RegionId(pub u32);

/// Identifier attached to item regions (e.g. the item in an inventory slot).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemTag(pub i32);

/// The independently enumerable child collections of a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildKind {
    /// Children nested by the region's own layout.
    Nested,
    /// Children declared statically by the host's interface definitions.
    Static,
    /// Children created at runtime (item slots, list rows).
    Dynamic,
}

impl ChildKind {
    /// Every child collection, in traversal order.
    pub const ALL: [Self; 3] = [Self::Nested, Self::Static, Self::Dynamic];

    /// Stable label for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nested => "nested",
            Self::Static => "static",
            Self::Dynamic => "dynamic",
        }
    }
}

/// A child collection could not be read right now.
///
/// Hosts rebuild parts of their tree between frames, so a collection can be
/// briefly unavailable. Callers treat it as empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionAccessError {
    /// The collection is being rebuilt.
    Unavailable(ChildKind),
}

impl fmt::Display for RegionAccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(kind) => write!(f, "{} children unavailable", kind.as_str()),
        }
    }
}

impl std::error::Error for RegionAccessError {}

/// One node of the host's region tree.
pub trait Region {
    /// Whether `point` lies within the region's bounds.
    fn contains(&self, point: Point) -> bool;

    /// Whether the region itself is hidden.
    fn is_self_hidden(&self) -> bool;

    /// Whether the region or any of its ancestors is hidden.
    fn is_effectively_hidden(&self) -> bool;

    /// Item identifier, if this region displays an item.
    fn tag(&self) -> Option<ItemTag> {
        None
    }

    /// Children in the given collection.
    fn children(&self, kind: ChildKind) -> Result<Vec<&dyn Region>, RegionAccessError>;
}

/// Resolves region ids to live regions.
pub trait RegionSource {
    /// The region with `id`, or `None` if it is not loaded.
    fn region(&self, id: RegionId) -> Option<&dyn Region>;
}

/// How far a [`RegionSet`] lookup descends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum Traversal {
    /// Test each listed region and, recursively, all of its children.
    #[default]
    Subtree,
    /// Test only the listed regions themselves.
    RootOnly,
}

/// A named group of regions that share a gesture meaning.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct RegionSet {
    /// Label used in logs.
    pub name: String,
    /// Top-level regions in the set.
    pub ids: Vec<RegionId>,
    /// Whether lookups descend into children.
    pub traversal: Traversal,
}

impl RegionSet {
    /// Create a set that searches whole subtrees.
    #[must_use]
    pub fn new(name: impl Into<String>, ids: impl IntoIterator<Item = RegionId>) -> Self {
        Self {
            name: name.into(),
            ids: ids.into_iter().collect(),
            traversal: Traversal::Subtree,
        }
    }

    /// Create an empty set.
    #[must_use]
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }

    /// Change how lookups descend.
    #[must_use]
    pub fn with_traversal(mut self, traversal: Traversal) -> Self {
        self.traversal = traversal;
        self
    }

    /// Whether the set lists no regions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// The region sets the gesture classifier consults.
///
/// Each set is configured independently; a region may appear in several.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct RegionCatalog {
    /// Latency-critical toggles that receive the raw press with no gesture
    /// processing at all.
    pub quick: RegionSet,
    /// Grids whose item slots are dragged directly.
    pub item_containers: RegionSet,
    /// Minimap areas, where drags zoom instead of rotating.
    pub minimap: RegionSet,
    /// Scrollable content, where vertical drags become wheel ticks.
    pub scrollable: RegionSet,
    /// Controls that must see an ordinary press and drag.
    pub blocking: RegionSet,
}

impl Default for RegionCatalog {
    fn default() -> Self {
        Self {
            quick: RegionSet::empty("quick"),
            item_containers: RegionSet::empty("item_containers"),
            minimap: RegionSet::empty("minimap"),
            scrollable: RegionSet::empty("scrollable"),
            blocking: RegionSet::empty("blocking"),
        }
    }
}
