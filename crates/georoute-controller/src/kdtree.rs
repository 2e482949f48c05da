//! Spatial Index
//!
//! An immutable 2-dimensional k-d tree over the online node set, queried for
//! nearest neighbors by squared Euclidean distance on the raw (lat, lon)
//! pair. Construction is pure: `build` walks its input once and never
//! touches a previously published index. Ties are broken by insertion order
//! so results are deterministic for a given snapshot.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::geo::GeoPoint;
use crate::node::EdgeNode;

struct KdBranch {
    node: EdgeNode,
    /// Insertion index, the tie-break key.
    seq: usize,
    left: Option<Box<KdBranch>>,
    right: Option<Box<KdBranch>>,
}

/// An immutable nearest-neighbor index over edge nodes.
pub struct SpatialIndex {
    root: Option<Box<KdBranch>>,
    len: usize,
}

/// Splitting axis alternates by depth: even depths cut on latitude, odd on
/// longitude.
fn axis_key(location: &GeoPoint, depth: usize) -> f64 {
    if depth % 2 == 0 {
        location.lat
    } else {
        location.lon
    }
}

impl SpatialIndex {
    /// An index with no nodes; every query returns empty.
    pub fn empty() -> Self {
        Self { root: None, len: 0 }
    }

    /// Builds a balanced index by median split on alternating axes.
    pub fn build(nodes: &[EdgeNode]) -> Self {
        let entries: Vec<(EdgeNode, usize)> =
            nodes.iter().cloned().zip(0..).collect();
        let len = entries.len();
        Self {
            root: Self::build_branch(entries, 0),
            len,
        }
    }

    fn build_branch(mut entries: Vec<(EdgeNode, usize)>, depth: usize) -> Option<Box<KdBranch>> {
        if entries.is_empty() {
            return None;
        }

        entries.sort_by(|(a, a_seq), (b, b_seq)| {
            axis_key(&a.location, depth)
                .partial_cmp(&axis_key(&b.location, depth))
                .unwrap_or(Ordering::Equal)
                .then(a_seq.cmp(b_seq))
        });

        let median = entries.len() / 2;
        let right = entries.split_off(median + 1);
        let (node, seq) = entries.pop()?;

        Some(Box::new(KdBranch {
            node,
            seq,
            left: Self::build_branch(entries, depth + 1),
            right: Self::build_branch(right, depth + 1),
        }))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns up to `k` nodes nearest to `point`, nearest first.
    ///
    /// Equidistant nodes rank by insertion order. An empty index yields an
    /// empty vec; the caller decides what "no online nodes" means.
    pub fn nearest(&self, point: GeoPoint, k: usize) -> Vec<EdgeNode> {
        if k == 0 {
            return Vec::new();
        }

        let mut heap: BinaryHeap<Candidate> = BinaryHeap::new();
        if let Some(root) = &self.root {
            Self::search(root, &point, k, 0, &mut heap);
        }

        heap.into_sorted_vec().into_iter().map(|c| c.node).collect()
    }

    fn search(
        branch: &KdBranch,
        point: &GeoPoint,
        k: usize,
        depth: usize,
        heap: &mut BinaryHeap<Candidate>,
    ) {
        heap.push(Candidate {
            distance: branch.node.location.squared_distance(point),
            seq: branch.seq,
            node: branch.node.clone(),
        });
        if heap.len() > k {
            heap.pop();
        }

        let diff = axis_key(point, depth) - axis_key(&branch.node.location, depth);
        let (near, far) = if diff < 0.0 {
            (&branch.left, &branch.right)
        } else {
            (&branch.right, &branch.left)
        };

        if let Some(subtree) = near {
            Self::search(subtree, point, k, depth + 1, heap);
        }

        // The far side can only matter if the splitting plane is no farther
        // than the current worst candidate (<= so equal-distance ties on the
        // far side are still found).
        let worst = heap.peek().map(|c| c.distance).unwrap_or(f64::INFINITY);
        if heap.len() < k || diff * diff <= worst {
            if let Some(subtree) = far {
                Self::search(subtree, point, k, depth + 1, heap);
            }
        }
    }
}

/// A search candidate ordered so `BinaryHeap` acts as a max-heap on
/// (distance, seq): the farthest candidate pops first when the heap exceeds
/// k, and `into_sorted_vec` yields nearest-first with deterministic ties.
struct Candidate {
    distance: f64,
    seq: usize,
    node: EdgeNode,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.distance == other.distance && self.seq == other.seq
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .partial_cmp(&other.distance)
            .unwrap_or(Ordering::Equal)
            .then(self.seq.cmp(&other.seq))
    }
}
