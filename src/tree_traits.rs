/*
Rendering of the vessel forest as a termtree.
The hierarchy is a forest, so all roots hang below one synthetic label node.
 */
use termtree::Tree;
use tracing::instrument;

use crate::domain::{NodeHandle, VesselHierarchy};

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for VesselHierarchy {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        fn label(hierarchy: &VesselHierarchy, handle: NodeHandle) -> String {
            hierarchy
                .segment(handle)
                .map(|segment| segment.name().to_string())
                .unwrap_or_default()
        }

        fn build_tree(hierarchy: &VesselHierarchy, handle: NodeHandle, parent_tree: &mut Tree<String>) {
            for child in hierarchy.children(handle) {
                let mut child_tree = Tree::new(label(hierarchy, child));
                build_tree(hierarchy, child, &mut child_tree);
                parent_tree.push(child_tree);
            }
        }

        if self.is_empty() {
            return Tree::new("No vessels".to_string());
        }

        let mut forest = Tree::new(format!("Vessels ({})", self.len()));
        for root in self.roots() {
            let mut root_tree = Tree::new(label(self, root));
            build_tree(self, root, &mut root_tree);
            forest.push(root_tree);
        }
        forest
    }
}
