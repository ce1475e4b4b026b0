use crate::rule::RulePipeline;
use crate::tree::Node;

/// Rewrite a tree with a rule pipeline, pre-order.
///
/// Every node is visited exactly once: the full pipeline is applied to the
/// node first, then the walk descends into the (possibly replaced) node's
/// children. Subtrees in which nothing changed keep their identity, so an
/// untouched tree comes back as the exact root that went in.
pub fn rewrite_tree(root: &Node, pipeline: &RulePipeline) -> Node {
    let node = pipeline.apply(root);

    if node.is_leaf() {
        return node;
    }

    let mut new_children = Vec::with_capacity(node.child_count());
    let mut changed = false;
    for child in node.children() {
        let rewritten = rewrite_tree(child, pipeline);
        if !Node::same(&rewritten, child) {
            changed = true;
        }
        new_children.push(rewritten);
    }

    if changed {
        node.with_children(new_children)
    } else {
        node
    }
}
