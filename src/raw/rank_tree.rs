use core::borrow::Borrow;
use core::cmp::Ordering;
use core::iter::FusedIterator;

use smallvec::SmallVec;

use super::arena::{Arena, Handle};
use super::node::{Node, is_balanced, is_single};

/// Ancestors an in-order walk has yet to yield, nearest on top.
type Spine = SmallVec<[Handle; 32]>;

/// Weight-balanced order-statistic tree over a set of ordered keys.
///
/// Insert, remove, select-by-rank and rank-of are all O(log n). The tree
/// enforces the (3, 2) weight-balance parameters with weight = size + 1.
pub(crate) struct RawRankTree<K> {
    nodes: Arena<Node<K>>,
    root: Option<Handle>,
}

impl<K> RawRankTree<K> {
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub(crate) fn len(&self) -> usize {
        self.size(self.root)
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    #[inline]
    fn size(&self, node: Option<Handle>) -> usize {
        node.map_or(0, |handle| self.nodes.get(handle).size())
    }

    #[inline]
    fn weight(&self, node: Option<Handle>) -> usize {
        self.size(node) + 1
    }

    fn update_size(&mut self, handle: Handle) {
        let node = self.nodes.get(handle);
        let size = self.size(node.left()) + self.size(node.right()) + 1;
        self.nodes.get_mut(handle).set_size(size);
    }

    fn rotate_left(&mut self, handle: Handle) -> Handle {
        let pivot = self.nodes.get(handle).right().expect("`RawRankTree::rotate_left()` - no right child!");
        let inner = self.nodes.get(pivot).left();
        self.nodes.get_mut(handle).set_right(inner);
        self.nodes.get_mut(pivot).set_left(Some(handle));
        self.update_size(handle);
        self.update_size(pivot);
        pivot
    }

    fn rotate_right(&mut self, handle: Handle) -> Handle {
        let pivot = self.nodes.get(handle).left().expect("`RawRankTree::rotate_right()` - no left child!");
        let inner = self.nodes.get(pivot).right();
        self.nodes.get_mut(handle).set_left(inner);
        self.nodes.get_mut(pivot).set_right(Some(handle));
        self.update_size(handle);
        self.update_size(pivot);
        pivot
    }

    /// Restores balance at `handle` after one of its subtrees gained or lost a
    /// single key. Returns the handle now rooting the subtree.
    fn balance(&mut self, handle: Handle) -> Handle {
        let node = self.nodes.get(handle);
        let (left, right) = (node.left(), node.right());
        let (left_weight, right_weight) = (self.weight(left), self.weight(right));

        if !is_balanced(left_weight, right_weight) {
            let heavy = right.expect("`RawRankTree::balance()` - right-heavy node has no right child!");
            let child = self.nodes.get(heavy);
            if !is_single(self.weight(child.left()), self.weight(child.right())) {
                let rotated = self.rotate_right(heavy);
                self.nodes.get_mut(handle).set_right(Some(rotated));
            }
            self.rotate_left(handle)
        } else if !is_balanced(right_weight, left_weight) {
            let heavy = left.expect("`RawRankTree::balance()` - left-heavy node has no left child!");
            let child = self.nodes.get(heavy);
            if !is_single(self.weight(child.right()), self.weight(child.left())) {
                let rotated = self.rotate_left(heavy);
                self.nodes.get_mut(handle).set_left(Some(rotated));
            }
            self.rotate_right(handle)
        } else {
            handle
        }
    }

    /// Unlinks the leftmost node below `handle` without freeing it.
    /// Returns the rebalanced remainder and the detached node.
    fn detach_min(&mut self, handle: Handle) -> (Option<Handle>, Handle) {
        let node = self.nodes.get(handle);
        match node.left() {
            None => (node.right(), handle),
            Some(left) => {
                let (rest, min) = self.detach_min(left);
                self.nodes.get_mut(handle).set_left(rest);
                self.update_size(handle);
                (Some(self.balance(handle)), min)
            }
        }
    }

    fn detach_max(&mut self, handle: Handle) -> (Option<Handle>, Handle) {
        let node = self.nodes.get(handle);
        match node.right() {
            None => (node.left(), handle),
            Some(right) => {
                let (rest, max) = self.detach_max(right);
                self.nodes.get_mut(handle).set_right(rest);
                self.update_size(handle);
                (Some(self.balance(handle)), max)
            }
        }
    }

    /// Returns the key at zero-based position `rank` in sorted order.
    pub(crate) fn get_by_rank(&self, rank: usize) -> Option<&K> {
        let mut current = self.root;
        let mut remaining = rank;

        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            let left = self.size(node.left());
            match remaining.cmp(&left) {
                Ordering::Less => current = node.left(),
                Ordering::Equal => return Some(node.key()),
                Ordering::Greater => {
                    remaining -= left + 1;
                    current = node.right();
                }
            }
        }
        None
    }

    /// Iterates the keys whose ranks fall in `start..end`, clipped to the tree.
    pub(crate) fn range(&self, start: usize, end: usize) -> Iter<'_, K> {
        let end = end.min(self.len());
        let mut iter = Iter {
            tree: self,
            front: Spine::new(),
            back: Spine::new(),
            remaining: end.saturating_sub(start),
        };
        if iter.remaining == 0 {
            return iter;
        }

        // Front spine: the node at `start` plus every ancestor it sits left of.
        let mut current = self.root;
        let mut remaining = start;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            let left = self.size(node.left());
            match remaining.cmp(&left) {
                Ordering::Less => {
                    iter.front.push(handle);
                    current = node.left();
                }
                Ordering::Equal => {
                    iter.front.push(handle);
                    break;
                }
                Ordering::Greater => {
                    remaining -= left + 1;
                    current = node.right();
                }
            }
        }

        // Back spine: the node at `end - 1` plus every ancestor it sits right of.
        let mut current = self.root;
        let mut remaining = end - 1;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            let left = self.size(node.left());
            match remaining.cmp(&left) {
                Ordering::Less => current = node.left(),
                Ordering::Equal => {
                    iter.back.push(handle);
                    break;
                }
                Ordering::Greater => {
                    iter.back.push(handle);
                    remaining -= left + 1;
                    current = node.right();
                }
            }
        }

        iter
    }
}

impl<K: Ord> RawRankTree<K> {
    /// Inserts `key`, returning false if it was already present.
    pub(crate) fn insert(&mut self, key: K) -> bool {
        let (root, inserted) = self.insert_at(self.root, key);
        self.root = Some(root);
        inserted
    }

    fn insert_at(&mut self, node: Option<Handle>, key: K) -> (Handle, bool) {
        let Some(handle) = node else {
            return (self.nodes.alloc(Node::leaf(key)), true);
        };

        let current = self.nodes.get(handle);
        let (child, is_left) = match key.cmp(current.key()) {
            Ordering::Equal => return (handle, false),
            Ordering::Less => (current.left(), true),
            Ordering::Greater => (current.right(), false),
        };

        let (child, inserted) = self.insert_at(child, key);
        let current = self.nodes.get_mut(handle);
        if is_left {
            current.set_left(Some(child));
        } else {
            current.set_right(Some(child));
        }
        if !inserted {
            return (handle, false);
        }

        self.update_size(handle);
        (self.balance(handle), true)
    }

    /// Removes `key`, returning the stored key if it was present.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let (root, removed) = self.remove_at(self.root, key);
        self.root = root;
        removed
    }

    fn remove_at<Q>(&mut self, node: Option<Handle>, key: &Q) -> (Option<Handle>, Option<K>)
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let Some(handle) = node else {
            return (None, None);
        };

        let current = self.nodes.get(handle);
        let (left, right) = (current.left(), current.right());
        match key.cmp(current.key().borrow()) {
            Ordering::Less => {
                let (child, removed) = self.remove_at(left, key);
                if removed.is_none() {
                    return (Some(handle), None);
                }
                self.nodes.get_mut(handle).set_left(child);
                self.update_size(handle);
                (Some(self.balance(handle)), removed)
            }
            Ordering::Greater => {
                let (child, removed) = self.remove_at(right, key);
                if removed.is_none() {
                    return (Some(handle), None);
                }
                self.nodes.get_mut(handle).set_right(child);
                self.update_size(handle);
                (Some(self.balance(handle)), removed)
            }
            Ordering::Equal => {
                let replacement = match (left, right) {
                    (None, only) | (only, None) => only,
                    (Some(left), Some(right)) => {
                        // Hoist the neighbour from the heavier side into this slot.
                        let hoisted = if self.nodes.get(left).size() > self.nodes.get(right).size() {
                            let (rest, max) = self.detach_max(left);
                            let node = self.nodes.get_mut(max);
                            node.set_left(rest);
                            node.set_right(Some(right));
                            max
                        } else {
                            let (rest, min) = self.detach_min(right);
                            let node = self.nodes.get_mut(min);
                            node.set_left(Some(left));
                            node.set_right(rest);
                            min
                        };
                        self.update_size(hoisted);
                        Some(self.balance(hoisted))
                    }
                };
                (replacement, Some(self.nodes.take(handle).into_key()))
            }
        }
    }

    /// Returns the zero-based rank of `key`, or `None` if it is absent.
    pub(crate) fn rank_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        let mut rank = 0;

        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            match key.cmp(node.key().borrow()) {
                Ordering::Less => current = node.left(),
                Ordering::Equal => return Some(rank + self.size(node.left())),
                Ordering::Greater => {
                    rank += self.size(node.left()) + 1;
                    current = node.right();
                }
            }
        }
        None
    }
}

/// In-order iterator over a rank window of a [`RawRankTree`].
pub(crate) struct Iter<'a, K> {
    tree: &'a RawRankTree<K>,
    front: Spine,
    back: Spine,
    remaining: usize,
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let tree: &'a RawRankTree<K> = self.tree;
        let nodes = &tree.nodes;
        let node: &'a Node<K> = nodes.get(self.front.pop()?);
        let mut current = node.right();
        while let Some(handle) = current {
            self.front.push(handle);
            current = nodes.get(handle).left();
        }
        self.remaining -= 1;
        Some(node.key())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K> DoubleEndedIterator for Iter<'a, K> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let tree: &'a RawRankTree<K> = self.tree;
        let nodes = &tree.nodes;
        let node: &'a Node<K> = nodes.get(self.back.pop()?);
        let mut current = node.left();
        while let Some(handle) = current {
            self.back.push(handle);
            current = nodes.get(handle).right();
        }
        self.remaining -= 1;
        Some(node.key())
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}

impl<K> FusedIterator for Iter<'_, K> {}
