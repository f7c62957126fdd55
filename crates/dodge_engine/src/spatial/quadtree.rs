//! Quadtree spatial partitioning structure
//!
//! Divides a fixed playfield into hierarchical buckets for fast overlap
//! queries. A leaf splits into 4 quadrants when it holds more entries than
//! the configured threshold. Entries that straddle a split line stay in the
//! parent node.
//!
//! Entry storage lives in a slot-map arena owned by the tree. Callers keep
//! an [`EntryKey`] and move the entry through [`Quadtree::update_position`].

use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::foundation::collections::EntryKey;
use crate::foundation::math::Rectangle;

/// Configuration for quadtree behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadtreeConfig {
    /// Maximum entries per leaf before subdivision
    pub max_entries_per_node: usize,

    /// Maximum subdivision depth
    pub max_depth: u32,

    /// Minimum node edge length (prevents excessive subdivision)
    pub min_node_size: f32,
}

impl Default for QuadtreeConfig {
    fn default() -> Self {
        Self {
            max_entries_per_node: 3,
            max_depth: 8,
            min_node_size: 1.0,
        }
    }
}

/// Entry stored in the quadtree arena
#[derive(Debug, Clone, Copy)]
pub struct QuadtreeEntry<T> {
    /// Current bounds of the entry
    pub rect: Rectangle,

    /// Back-reference to whoever created the entry
    pub owner: T,

    /// Whether the entry currently sits in a node (origin inside the plane)
    indexed: bool,
}

impl<T> QuadtreeEntry<T> {
    /// Whether queries can currently find this entry
    pub const fn is_indexed(&self) -> bool {
        self.indexed
    }
}

/// Single node in the quadtree hierarchy
#[derive(Debug, Clone)]
pub struct QuadtreeNode {
    /// World-space bounds of this node
    pub bounds: Rectangle,

    /// Entries stored directly in this node
    pub entries: Vec<EntryKey>,

    /// Child nodes (4 quadrants), None if this is a leaf
    pub children: Option<Box<[QuadtreeNode; 4]>>,

    /// Depth in the tree (0 = root)
    pub depth: u32,
}

impl QuadtreeNode {
    /// Create a new leaf node
    pub const fn new(bounds: Rectangle, depth: u32) -> Self {
        Self {
            bounds,
            entries: Vec::new(),
            children: None,
            depth,
        }
    }

    /// Check if this node is a leaf (has no children)
    pub const fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    fn can_subdivide(&self, config: &QuadtreeConfig) -> bool {
        self.depth < config.max_depth
            && self.bounds.width * 0.5 >= config.min_node_size
            && self.bounds.height * 0.5 >= config.min_node_size
    }

    /// Split this leaf into 4 children and push its entries down where they fit
    fn subdivide<T>(
        &mut self,
        arena: &SlotMap<EntryKey, QuadtreeEntry<T>>,
        config: &QuadtreeConfig,
    ) {
        if self.children.is_some() {
            return;
        }

        let depth = self.depth + 1;
        self.children = Some(Box::new(
            self.bounds.quadrants().map(|bounds| Self::new(bounds, depth)),
        ));

        log::trace!(
            "Quadtree node at ({}, {}) depth {} subdivided",
            self.bounds.x,
            self.bounds.y,
            self.depth
        );

        let pending = std::mem::take(&mut self.entries);
        for key in pending {
            if let Some(entry) = arena.get(key) {
                self.insert(key, entry.rect, arena, config);
            }
        }
    }

    /// Insert an entry into this node or the deepest child that fully contains it
    fn insert<T>(
        &mut self,
        key: EntryKey,
        rect: Rectangle,
        arena: &SlotMap<EntryKey, QuadtreeEntry<T>>,
        config: &QuadtreeConfig,
    ) {
        if let Some(children) = self.children.as_mut() {
            match children.iter_mut().find(|child| child.bounds.contains_rect(&rect)) {
                Some(child) => child.insert(key, rect, arena, config),
                None => self.entries.push(key),
            }
            return;
        }

        if self.entries.len() >= config.max_entries_per_node && self.can_subdivide(config) {
            self.subdivide(arena, config);
            self.insert(key, rect, arena, config);
        } else {
            self.entries.push(key);
        }
    }

    /// Remove an entry, following the same descent `insert` used for `rect`
    fn detach(&mut self, key: EntryKey, rect: &Rectangle) -> bool {
        if let Some(children) = self.children.as_mut() {
            if let Some(child) = children.iter_mut().find(|child| child.bounds.contains_rect(rect)) {
                return child.detach(key, rect);
            }
        }

        if let Some(index) = self.entries.iter().position(|&k| k == key) {
            self.entries.swap_remove(index);
            true
        } else {
            false
        }
    }

    /// Collect entries of every node whose bounds touch `rect`
    fn query(&self, rect: &Rectangle, results: &mut Vec<EntryKey>) {
        // Root entries may stick out of the plane, so the root never culls itself
        if self.depth > 0 && !self.bounds.touches(rect) {
            return;
        }

        results.extend_from_slice(&self.entries);

        if let Some(children) = self.children.as_ref() {
            for child in children.iter() {
                child.query(rect, results);
            }
        }
    }

    /// Get all leaf nodes (for visualization)
    pub fn get_all_leaves<'a>(&'a self, leaves: &mut Vec<&'a Self>) {
        if let Some(children) = self.children.as_ref() {
            for child in children.iter() {
                child.get_all_leaves(leaves);
            }
        } else {
            leaves.push(self);
        }
    }

    /// Count this node and all descendants
    pub fn count_nodes(&self) -> usize {
        1 + self
            .children
            .as_ref()
            .map_or(0, |children| children.iter().map(Self::count_nodes).sum())
    }

    /// Deepest depth reached below this node
    pub fn max_depth(&self) -> u32 {
        self.children.as_ref().map_or(self.depth, |children| {
            children.iter().map(Self::max_depth).max().unwrap_or(self.depth)
        })
    }

    /// Count entries in this node and all children
    pub fn count_entries(&self) -> usize {
        self.entries.len()
            + self
                .children
                .as_ref()
                .map_or(0, |children| children.iter().map(Self::count_entries).sum())
    }
}

/// Quadtree spatial index over a fixed plane
///
/// Queries are conservative: they return every entry stored in a bucket that
/// touches the query rectangle, so callers must still run an exact test.
#[derive(Debug, Clone)]
pub struct Quadtree<T> {
    /// Root node covering the whole plane
    root: QuadtreeNode,

    /// Entry storage, stable across moves
    entries: SlotMap<EntryKey, QuadtreeEntry<T>>,

    /// Configuration
    config: QuadtreeConfig,
}

impl<T: Copy> Quadtree<T> {
    /// Create a new quadtree covering `bounds`
    pub fn new(bounds: Rectangle, config: QuadtreeConfig) -> Self {
        Self {
            root: QuadtreeNode::new(bounds, 0),
            entries: SlotMap::with_key(),
            config,
        }
    }

    /// Bounds of the indexed plane
    pub const fn bounds(&self) -> &Rectangle {
        &self.root.bounds
    }

    /// Configuration in use
    pub const fn config(&self) -> &QuadtreeConfig {
        &self.config
    }

    /// Root node (for visualization)
    pub const fn root(&self) -> &QuadtreeNode {
        &self.root
    }

    /// Insert an entry and return its handle
    ///
    /// An entry whose origin lies outside the plane gets a handle but is not
    /// placed in any node until [`Self::update_position`] brings it back in.
    pub fn insert(&mut self, rect: Rectangle, owner: T) -> EntryKey {
        let key = self.entries.insert(QuadtreeEntry {
            rect,
            owner,
            indexed: false,
        });
        self.place(key, rect);
        key
    }

    fn place(&mut self, key: EntryKey, rect: Rectangle) {
        let inside = self.root.bounds.contains_point(rect.origin());
        if inside {
            self.root.insert(key, rect, &self.entries, &self.config);
        } else {
            log::debug!(
                "Quadtree entry at ({}, {}) is outside the plane and will not be indexed",
                rect.x,
                rect.y
            );
        }

        if let Some(entry) = self.entries.get_mut(key) {
            entry.indexed = inside;
        }
    }

    fn unplace(&mut self, key: EntryKey) {
        let Some(entry) = self.entries.get(key) else {
            return;
        };
        if !entry.indexed {
            return;
        }

        let rect = entry.rect;
        if !self.root.detach(key, &rect) {
            log::warn!("Quadtree entry {:?} was not found where it was placed", key);
        }
        if let Some(entry) = self.entries.get_mut(key) {
            entry.indexed = false;
        }
    }

    /// Move an existing entry so its top-left corner sits at `(x, y)`
    ///
    /// Returns `false` if the handle is unknown.
    pub fn update_position(&mut self, key: EntryKey, x: f32, y: f32) -> bool {
        let Some(entry) = self.entries.get(key) else {
            return false;
        };

        let rect = Rectangle::new(x, y, entry.rect.width, entry.rect.height);
        self.unplace(key);
        if let Some(entry) = self.entries.get_mut(key) {
            entry.rect = rect;
        }
        self.place(key, rect);
        true
    }

    /// Remove an entry and return its owner
    pub fn remove(&mut self, key: EntryKey) -> Option<T> {
        self.unplace(key);
        self.entries.remove(key).map(|entry| entry.owner)
    }

    /// Look up an entry
    pub fn get(&self, key: EntryKey) -> Option<&QuadtreeEntry<T>> {
        self.entries.get(key)
    }

    /// Candidates that may overlap the given entry, the entry itself included
    pub fn query_overlapping(&self, key: EntryKey) -> Vec<EntryKey> {
        self.entries
            .get(key)
            .map(|entry| self.query_rect(&entry.rect))
            .unwrap_or_default()
    }

    /// Candidates that may overlap `rect`
    pub fn query_rect(&self, rect: &Rectangle) -> Vec<EntryKey> {
        let mut results = Vec::new();
        self.root.query(rect, &mut results);
        results
    }

    /// Owners of the candidates that may overlap `rect`
    pub fn query_owners(&self, rect: &Rectangle) -> Vec<T> {
        self.query_rect(rect)
            .into_iter()
            .filter_map(|key| self.entries.get(key).map(|entry| entry.owner))
            .collect()
    }

    /// Number of live entries, indexed or not
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Number of entries reachable by queries
    pub fn indexed_count(&self) -> usize {
        self.root.count_entries()
    }

    /// Total node count
    pub fn node_count(&self) -> usize {
        self.root.count_nodes()
    }

    /// Deepest subdivision level
    pub fn depth(&self) -> u32 {
        self.root.max_depth()
    }

    /// Get all leaf nodes (for visualization)
    pub fn get_all_leaves(&self) -> Vec<&QuadtreeNode> {
        let mut leaves = Vec::new();
        self.root.get_all_leaves(&mut leaves);
        leaves
    }

    /// Iterate over all live entries
    pub fn iter(&self) -> impl Iterator<Item = (EntryKey, &QuadtreeEntry<T>)> {
        self.entries.iter()
    }

    /// Clear the quadtree
    pub fn clear(&mut self) {
        self.root = QuadtreeNode::new(self.root.bounds, 0);
        self.entries.clear();
    }
}
