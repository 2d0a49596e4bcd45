//! Hierarchical spatial index for broad-phase queries
//!
//! The tree is rebuilt from scratch whenever its body set changes. Nodes live
//! in a flat arena and refer to bodies by index into the slice the tree was
//! built from, so a parent and its children share the same body indices
//! without copying bodies.
//!
//! Subdivision happens on a fixed grid: the root covers the smallest square
//! centered on the origin whose half-extent is a power of the branch factor,
//! and every level splits its segment into `branch × branch` equal cells.
//! Bodies are bucketed by their *position*, so a body belongs to exactly one
//! child at each level.

use glam::Vec2;

use super::body::Spatial;
use super::boundary::Boundary;

/// Absolute floor for a sub-cell step
const MIN_SEGMENT_STEP: f32 = 1e-6;

/// One node of the index
#[derive(Debug, Clone)]
pub struct SpatialNode {
    /// Union of the boundaries of this node's bodies
    pub boundary: Boundary,
    /// Grid cell this node is responsible for
    pub segment: Boundary,
    items: Vec<usize>,
    children: Vec<usize>,
}

impl SpatialNode {
    /// Indices of the bodies under this node
    pub fn items(&self) -> &[usize] {
        &self.items
    }

    /// Arena ids of the child nodes
    pub fn children(&self) -> &[usize] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    position: Vec2,
    boundary: Boundary,
}

/// Bounding-box tree over a snapshot of bodies
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    entries: Vec<Entry>,
    nodes: Vec<SpatialNode>,
    branch_factor: usize,
    leaf_capacity: usize,
}

impl SpatialIndex {
    /// Index `items`, splitting any node with more than `leaf_capacity`
    /// bodies into `branch_factor × branch_factor` children.
    pub fn build<T: Spatial>(items: &[T], branch_factor: usize, leaf_capacity: usize) -> Self {
        assert!(branch_factor >= 2, "branch factor must be at least 2");

        let entries: Vec<Entry> = items
            .iter()
            .map(|item| Entry {
                position: item.position(),
                boundary: item.boundary(),
            })
            .collect();

        let boundary = Boundary::union_of(entries.iter().map(|e| e.boundary));
        let root = SpatialNode {
            boundary,
            segment: level_boundary(&boundary, branch_factor),
            items: (0..entries.len()).collect(),
            children: Vec::new(),
        };

        let mut index = Self {
            entries,
            nodes: vec![root],
            branch_factor,
            leaf_capacity,
        };
        index.subdivide_all();
        index
    }

    fn subdivide_all(&mut self) {
        let mut work = vec![0usize];
        let mut buckets: Vec<Vec<usize>> = Vec::new();

        while let Some(id) = work.pop() {
            if self.nodes[id].items.len() <= self.leaf_capacity {
                continue;
            }
            let Some(cells) = split_segment(&self.nodes[id].segment, self.branch_factor) else {
                continue;
            };

            buckets.clear();
            buckets.resize_with(cells.len(), Vec::new);
            for &item in &self.nodes[id].items {
                let position = self.entries[item].position;
                if let Some(slot) = cells.iter().position(|cell| cell.includes(position)) {
                    buckets[slot].push(item);
                }
            }

            for (cell, items) in cells.into_iter().zip(buckets.drain(..)) {
                if items.is_empty() {
                    continue;
                }
                let boundary = Boundary::union_of(items.iter().map(|&i| self.entries[i].boundary));
                let child = self.nodes.len();
                self.nodes.push(SpatialNode {
                    boundary,
                    segment: cell,
                    items,
                    children: Vec::new(),
                });
                self.nodes[id].children.push(child);
                work.push(child);
            }
        }
    }

    pub fn root(&self) -> &SpatialNode {
        &self.nodes[0]
    }

    pub fn node(&self, id: usize) -> &SpatialNode {
        &self.nodes[id]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of indexed bodies
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn branch_factor(&self) -> usize {
        self.branch_factor
    }

    pub fn leaf_capacity(&self) -> usize {
        self.leaf_capacity
    }

    /// Indices of all bodies whose position lies inside `boundary`
    /// (half-open, see [`Boundary::includes`]).
    pub fn query(&self, boundary: &Boundary) -> Vec<usize> {
        let mut out = Vec::new();
        self.query_into(boundary, &mut out);
        out
    }

    /// Like [`SpatialIndex::query`], appending to `out`
    pub fn query_into(&self, boundary: &Boundary, out: &mut Vec<usize>) {
        let first = out.len();
        let mut stack = vec![0usize];

        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            if node.is_leaf() || boundary.contains(&node.segment) {
                out.extend_from_slice(&node.items);
                continue;
            }
            stack.extend(
                node.children
                    .iter()
                    .copied()
                    .filter(|&c| self.nodes[c].segment.overlaps(boundary)),
            );
        }

        let mut kept = first;
        for i in first..out.len() {
            let item = out[i];
            if boundary.includes(self.entries[item].position) {
                out[kept] = item;
                kept += 1;
            }
        }
        out.truncate(kept);
    }

    /// Bodies from `items` (the slice the index was built from) positioned
    /// inside `boundary`
    pub fn query_items<'a, T>(
        &self,
        items: &'a [T],
        boundary: &Boundary,
    ) -> impl Iterator<Item = &'a T> + use<'a, T> {
        debug_assert_eq!(items.len(), self.entries.len(), "index built from another slice");
        self.query(boundary).into_iter().map(move |i| &items[i])
    }

    /// Indices of all bodies whose boundary overlaps `boundary`
    ///
    /// Prunes by each node's tight boundary; used as the collision
    /// broad-phase. Children are visited in creation order, so results come
    /// out depth-first in a stable order.
    pub fn overlapping(&self, boundary: &Boundary) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack = vec![0usize];

        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            if node.items.is_empty() || !node.boundary.overlaps(boundary) {
                continue;
            }
            if node.is_leaf() {
                out.extend(
                    node.items
                        .iter()
                        .copied()
                        .filter(|&i| self.entries[i].boundary.overlaps(boundary)),
                );
            } else {
                stack.extend(node.children.iter().rev());
            }
        }

        out
    }

    /// Deepest level in the tree (root is 0)
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(0usize, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            stack.extend(self.nodes[id].children.iter().map(|&c| (c, depth + 1)));
        }
        deepest
    }
}

/// Smallest origin-centered square with a power-of-`branch` half-extent that
/// covers `boundary`
fn level_boundary(boundary: &Boundary, branch: usize) -> Boundary {
    let max_dim = boundary.max_extent();
    if !(max_dim > 0.0) || !max_dim.is_finite() {
        return Boundary::empty();
    }

    let base = branch as f32;
    let level = (max_dim.ln() / base.ln()).ceil() as i32;
    let mut dim = base.powi(level);
    if dim < max_dim {
        dim *= base;
    }
    Boundary::new(-dim, dim, -dim, dim)
}

/// Split a segment into `branch × branch` cells
///
/// Cell edges are computed from the segment origin so neighbouring cells share
/// exactly the same edge value; the last row and column are pushed just past
/// the segment edge so positions on it are still covered. Returns None once
/// the step is too small to separate positions.
fn split_segment(segment: &Boundary, branch: usize) -> Option<Vec<Boundary>> {
    let step_x = segment.width() / branch as f32;
    let step_y = segment.height() / branch as f32;
    let min_step = (segment.max_extent() * f32::EPSILON).max(MIN_SEGMENT_STEP);
    if !(step_x > min_step && step_y > min_step) {
        return None;
    }

    let edge = |start: f32, end: f32, step: f32, i: usize| {
        if i == branch {
            pad_edge(end)
        } else {
            start + i as f32 * step
        }
    };

    let mut cells = Vec::with_capacity(branch * branch);
    for i in 0..branch {
        let left = edge(segment.left, segment.right, step_x, i);
        let right = edge(segment.left, segment.right, step_x, i + 1);
        for j in 0..branch {
            cells.push(Boundary {
                left,
                right,
                top: edge(segment.top, segment.bottom, step_y, j),
                bottom: edge(segment.top, segment.bottom, step_y, j + 1),
            });
        }
    }
    Some(cells)
}

/// Nudge an edge outward by at least one ulp
#[inline]
fn pad_edge(v: f32) -> f32 {
    v + (v.abs() * f32::EPSILON).max(MIN_SEGMENT_STEP)
}
