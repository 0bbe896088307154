#![forbid(unsafe_code)]

//! In-memory region tree.
//!
//! Trees are described with [`RegionSpec`] builders and frozen into a
//! [`RegionTree`]. The shape is fixed once built, but visibility and child
//! availability stay switchable through named handles, so a test can hide a
//! panel or make its item slots transiently unreadable mid-gesture.
//!
//! ```rust,ignore
//! let tree = RegionTree::build([
//!     (RegionId(1), RegionSpec::new(Rect::new(0, 0, 200, 300)).named("inventory")
//!         .dynamic(RegionSpec::new(Rect::new(0, 0, 40, 40)).tagged(4151))),
//! ]);
//! tree.set_hidden("inventory", true);
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use touchmouse_core::{
    ChildKind, ItemTag, Point, Rect, Region, RegionAccessError, RegionId, RegionSource,
};

/// Builder for one region and its subtree.
#[derive(Debug, Clone)]
pub struct RegionSpec {
    name: Option<String>,
    bounds: Rect,
    hidden: bool,
    tag: Option<ItemTag>,
    unavailable: bool,
    children: Vec<(ChildKind, RegionSpec)>,
}

impl RegionSpec {
    /// A visible, untagged region.
    #[must_use]
    pub fn new(bounds: Rect) -> Self {
        Self {
            name: None,
            bounds,
            hidden: false,
            tag: None,
            unavailable: false,
            children: Vec::new(),
        }
    }

    /// Name the region so its flags can be switched later.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Start hidden.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Attach an item tag.
    #[must_use]
    pub fn tagged(mut self, tag: i32) -> Self {
        self.tag = Some(ItemTag(tag));
        self
    }

    /// Start with dynamic children unreadable.
    #[must_use]
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    /// Add a child to the given collection.
    #[must_use]
    pub fn child(mut self, kind: ChildKind, child: RegionSpec) -> Self {
        self.children.push((kind, child));
        self
    }

    /// Add a layout-nested child.
    #[must_use]
    pub fn nested(self, child: RegionSpec) -> Self {
        self.child(ChildKind::Nested, child)
    }

    /// Add a statically declared child.
    #[must_use]
    pub fn static_child(self, child: RegionSpec) -> Self {
        self.child(ChildKind::Static, child)
    }

    /// Add a runtime-created child.
    #[must_use]
    pub fn dynamic(self, child: RegionSpec) -> Self {
        self.child(ChildKind::Dynamic, child)
    }
}

#[derive(Debug, Clone)]
struct Flags {
    hidden: Arc<AtomicBool>,
    unavailable: Arc<AtomicBool>,
}

/// A frozen region node.
#[derive(Debug)]
pub struct RegionNode {
    bounds: Rect,
    tag: Option<ItemTag>,
    flags: Flags,
    ancestors: Vec<Arc<AtomicBool>>,
    nested: Vec<RegionNode>,
    statics: Vec<RegionNode>,
    dynamic: Vec<RegionNode>,
}

impl RegionNode {
    fn freeze(
        spec: RegionSpec,
        ancestors: Vec<Arc<AtomicBool>>,
        names: &mut HashMap<String, Flags>,
    ) -> Self {
        let flags = Flags {
            hidden: Arc::new(AtomicBool::new(spec.hidden)),
            unavailable: Arc::new(AtomicBool::new(spec.unavailable)),
        };
        if let Some(name) = spec.name {
            names.insert(name, flags.clone());
        }

        let mut below = ancestors.clone();
        below.push(Arc::clone(&flags.hidden));

        let mut node = Self {
            bounds: spec.bounds,
            tag: spec.tag,
            flags,
            ancestors,
            nested: Vec::new(),
            statics: Vec::new(),
            dynamic: Vec::new(),
        };
        for (kind, child) in spec.children {
            let child = Self::freeze(child, below.clone(), names);
            match kind {
                ChildKind::Nested => node.nested.push(child),
                ChildKind::Static => node.statics.push(child),
                ChildKind::Dynamic => node.dynamic.push(child),
            }
        }
        node
    }
}

impl Region for RegionNode {
    fn contains(&self, point: Point) -> bool {
        self.bounds.contains(point)
    }

    fn is_self_hidden(&self) -> bool {
        self.flags.hidden.load(Ordering::Acquire)
    }

    fn is_effectively_hidden(&self) -> bool {
        self.is_self_hidden() || self.ancestors.iter().any(|h| h.load(Ordering::Acquire))
    }

    fn tag(&self) -> Option<ItemTag> {
        self.tag
    }

    fn children(&self, kind: ChildKind) -> Result<Vec<&dyn Region>, RegionAccessError> {
        let list = match kind {
            ChildKind::Nested => &self.nested,
            ChildKind::Static => &self.statics,
            ChildKind::Dynamic => {
                if self.flags.unavailable.load(Ordering::Acquire) {
                    return Err(RegionAccessError::Unavailable(kind));
                }
                &self.dynamic
            }
        };
        Ok(list.iter().map(|n| n as &dyn Region).collect())
    }
}

/// A complete region tree addressed by [`RegionId`].
#[derive(Debug, Default)]
pub struct RegionTree {
    roots: HashMap<RegionId, RegionNode>,
    names: HashMap<String, Flags>,
}

impl RegionTree {
    /// Freeze `roots` into a tree.
    #[must_use]
    pub fn build(roots: impl IntoIterator<Item = (RegionId, RegionSpec)>) -> Self {
        let mut names = HashMap::new();
        let roots = roots
            .into_iter()
            .map(|(id, spec)| (id, RegionNode::freeze(spec, Vec::new(), &mut names)))
            .collect();
        Self { roots, names }
    }

    /// Show or hide the named region. Returns `false` if no region has that
    /// name.
    pub fn set_hidden(&self, name: &str, hidden: bool) -> bool {
        self.names
            .get(name)
            .map(|f| f.hidden.store(hidden, Ordering::Release))
            .is_some()
    }

    /// Make the named region's dynamic children unreadable, or readable
    /// again. Returns `false` if no region has that name.
    pub fn set_unavailable(&self, name: &str, unavailable: bool) -> bool {
        self.names
            .get(name)
            .map(|f| f.unavailable.store(unavailable, Ordering::Release))
            .is_some()
    }
}

impl RegionSource for RegionTree {
    fn region(&self, id: RegionId) -> Option<&dyn Region> {
        self.roots.get(&id).map(|n| n as &dyn Region)
    }
}
