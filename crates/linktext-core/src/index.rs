use std::collections::HashMap;

use crate::syntax::{Node, NodeId, SyntaxTree};

/// Per-document lookup from node type to the nodes of that type.
///
/// Built once when a document is checked and handed to every query, so
/// repeated lookups never rescan the tree.
#[derive(Debug)]
pub struct TypeIndex<'t> {
    tree: &'t SyntaxTree,
    by_type: HashMap<&'t str, Vec<NodeId>>,
}

impl<'t> TypeIndex<'t> {
    pub fn new(tree: &'t SyntaxTree) -> Self {
        let mut by_type: HashMap<&'t str, Vec<NodeId>> = HashMap::new();
        for node in tree.nodes() {
            by_type.entry(node.kind()).or_default().push(node.id());
        }
        Self { tree, by_type }
    }

    /// Nodes whose type is any of `types`, in document order.
    pub fn query_by_types(&self, types: &[&str]) -> Vec<Node<'t>> {
        let mut ids: Vec<NodeId> = Vec::new();
        for kind in types {
            if let Some(found) = self.by_type.get(*kind) {
                ids.extend_from_slice(found);
            }
        }
        if types.len() > 1 {
            ids.sort_unstable();
            ids.dedup();
        }
        let tree = self.tree;
        ids.into_iter().filter_map(|id| tree.node(id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::TypeIndex;
    use crate::syntax::{SyntaxTree, TreeError};

    #[test]
    fn queries_merge_types_in_document_order() -> Result<(), TreeError> {
        let json = r#"{"type": "paragraph", "children": [
            {"type": "label", "text": "a"},
            {"type": "link", "children": [{"type": "label", "text": "b"}]},
            {"type": "labelText", "text": "c"}
        ]}"#;
        let tree = SyntaxTree::from_json(json)?;
        let index = TypeIndex::new(&tree);

        let texts: Vec<&str> = index
            .query_by_types(&["labelText", "label"])
            .into_iter()
            .map(|node| node.text())
            .collect();
        assert_eq!(texts, ["a", "b", "c"]);
        assert_eq!(index.query_by_types(&["label", "label"]).len(), 2);
        assert!(index.query_by_types(&["heading"]).is_empty());
        assert!(index.query_by_types(&[]).is_empty());
        Ok(())
    }
}
