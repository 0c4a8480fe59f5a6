use super::arena::Handle;

/// Left/right weight ratio beyond which a subtree is rebalanced.
pub(crate) const DELTA: usize = 3;
/// Inner/outer grandchild weight ratio that selects a double rotation.
pub(crate) const GAMMA: usize = 2;

/// A node of the weight-balanced tree.
///
/// Every node carries the number of keys in the subtree it roots, which is
/// both the balance measure and the order-statistic augmentation.
pub(crate) struct Node<K> {
    key: K,
    left: Option<Handle>,
    right: Option<Handle>,
    size: usize,
}

impl<K> Node<K> {
    pub(crate) const fn leaf(key: K) -> Self {
        Self {
            key,
            left: None,
            right: None,
            size: 1,
        }
    }

    #[inline]
    pub(crate) const fn key(&self) -> &K {
        &self.key
    }

    pub(crate) fn into_key(self) -> K {
        self.key
    }

    #[inline]
    pub(crate) const fn left(&self) -> Option<Handle> {
        self.left
    }

    #[inline]
    pub(crate) const fn right(&self) -> Option<Handle> {
        self.right
    }

    pub(crate) fn set_left(&mut self, left: Option<Handle>) {
        self.left = left;
    }

    pub(crate) fn set_right(&mut self, right: Option<Handle>) {
        self.right = right;
    }

    /// Number of keys in the subtree rooted here, this node included.
    #[inline]
    pub(crate) const fn size(&self) -> usize {
        self.size
    }

    pub(crate) fn set_size(&mut self, size: usize) {
        self.size = size;
    }
}

/// Returns true if a subtree of weight `heavy` may sit beside one of weight
/// `light` without rotation. Weights are subtree sizes plus one.
#[inline]
pub(crate) const fn is_balanced(light: usize, heavy: usize) -> bool {
    DELTA * light >= heavy
}

/// Returns true if rebalancing should use a single rotation, given the
/// weights of the heavy child's inner and outer grandchildren.
#[inline]
pub(crate) const fn is_single(inner: usize, outer: usize) -> bool {
    inner < GAMMA * outer
}
