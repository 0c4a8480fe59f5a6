mod arena;
mod node;
mod rank_tree;

pub(crate) use rank_tree::{Iter, RawRankTree};
