use std::collections::VecDeque;
use std::iter::Iterator;

use super::TreeNode;
use machlearn::{Float, Label};

/// Level-order (BFT) iterator of nodes in a decision tree
pub struct NodeIter<'a, F, L: Ord> {
    queue: VecDeque<&'a TreeNode<F, L>>,
}

impl<'a, F, L: Ord> NodeIter<'a, F, L> {
    pub fn new(root: &'a TreeNode<F, L>) -> Self {
        let mut queue = VecDeque::new();
        queue.push_back(root);

        NodeIter { queue }
    }
}

impl<'a, F: Float, L: Label> Iterator for NodeIter<'a, F, L> {
    type Item = &'a TreeNode<F, L>;

    fn next(&mut self) -> Option<Self::Item> {
        self.queue.pop_front().map(|node| {
            node.children()
                .into_iter()
                .filter_map(|x| x.as_deref())
                .for_each(|child| self.queue.push_back(child));

            node
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::DecisionTree;
    use machlearn::prelude::*;
    use ndarray::array;

    #[test]
    fn nodes_are_visited_level_by_level() -> crate::Result<()> {
        let dataset = Dataset::new(
            array![[1.], [2.], [3.], [4.], [5.], [6.], [7.]],
            array![0, 1, 1, 1, 0, 0, 1],
        );
        let tree = DecisionTree::params().fit(&dataset)?;

        let depths = tree.iter_nodes().map(|node| node.depth()).collect::<Vec<_>>();
        let mut sorted = depths.clone();
        sorted.sort_unstable();

        assert_eq!(depths, sorted);
        assert_eq!(depths[0], 0);
        assert_eq!(depths.len(), 2 * tree.num_leaves() - 1);

        Ok(())
    }
}
