use std::fmt;

use serde::Deserialize;
use thiserror::Error;

use crate::source_map::{Position, SourceMap};
use crate::span::{Span, SpanError};

pub const LINK: &str = "link";
pub const LABEL: &str = "label";
pub const LABEL_TEXT: &str = "labelText";

/// Index of a node in its tree. Ids follow document (pre-)order.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NodeId(pub u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct NodeData {
    /// Node type tag as produced by the parser. Empty when the input had none.
    pub kind: String,
    pub text: String,
    pub start: Position,
    pub children: Vec<NodeId>,
}

/// A parsed document owned top-down.
///
/// Parent lookups go through a side table built once on construction, so the
/// node storage itself stays acyclic.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SyntaxTree {
    nodes: Vec<NodeData>,
    parents: Vec<Option<NodeId>>,
}

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("invalid syntax tree json: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Span(#[from] SpanError),
    #[error("node `{kind}` at {start}..{end} escapes its parent or overlaps a sibling")]
    Nesting {
        kind: String,
        start: usize,
        end: usize,
    },
    #[error("no open node to finish")]
    Unbalanced,
    #[error("{0} node(s) left open")]
    Unfinished(usize),
    #[error("tree exceeds {} nodes", u32::MAX)]
    TooLarge,
}

impl SyntaxTree {
    fn from_parts(nodes: Vec<NodeData>) -> Self {
        let mut parents = vec![None; nodes.len()];
        for (idx, node) in nodes.iter().enumerate() {
            for child in &node.children {
                if let Some(slot) = parents.get_mut(child.index()) {
                    *slot = Some(NodeId(idx as u32));
                }
            }
        }
        Self { nodes, parents }
    }

    /// Loads a token tree serialized as nested JSON objects with `type`,
    /// `text`, `startLine`, `startColumn` and `children`. The top level may be
    /// a single node or an array of nodes. Other keys, `endLine` and
    /// `endColumn` included, are ignored.
    ///
    /// Nesting is bounded by `serde_json`'s recursion limit of 128 open
    /// objects and arrays, about 64 levels of nodes. Deeper trees fail with
    /// [`TreeError::Json`].
    pub fn from_json(json: &str) -> Result<Self, TreeError> {
        let top: TokenTree = serde_json::from_str(json)?;
        let tokens = match top {
            TokenTree::One(token) => vec![token],
            TokenTree::Many(tokens) => tokens,
        };

        let mut nodes = Vec::new();
        for token in tokens {
            push_token(&mut nodes, token)?;
        }
        Ok(Self::from_parts(nodes))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<Node<'_>> {
        (id.index() < self.nodes.len()).then_some(Node { tree: self, id })
    }

    /// All nodes in document order.
    pub fn nodes(&self) -> impl Iterator<Item = Node<'_>> + '_ {
        (0..self.nodes.len()).map(move |idx| Node {
            tree: self,
            id: NodeId(idx as u32),
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TokenTree {
    Many(Vec<Token>),
    One(Token),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Token {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    text: String,
    #[serde(default)]
    start_line: usize,
    #[serde(default)]
    start_column: usize,
    #[serde(default)]
    children: Vec<Token>,
}

fn push_token(nodes: &mut Vec<NodeData>, token: Token) -> Result<NodeId, TreeError> {
    let id = next_id(nodes)?;
    nodes.push(NodeData {
        kind: token.kind.unwrap_or_default(),
        text: token.text,
        start: Position::new(token.start_line, token.start_column),
        children: Vec::with_capacity(token.children.len()),
    });
    for child in token.children {
        let child_id = push_token(nodes, child)?;
        nodes[id.index()].children.push(child_id);
    }
    Ok(id)
}

fn next_id(nodes: &[NodeData]) -> Result<NodeId, TreeError> {
    u32::try_from(nodes.len())
        .map(NodeId)
        .map_err(|_| TreeError::TooLarge)
}

/// Borrowed view of one node.
#[derive(Clone, Copy)]
pub struct Node<'t> {
    tree: &'t SyntaxTree,
    id: NodeId,
}

impl<'t> Node<'t> {
    pub fn id(self) -> NodeId {
        self.id
    }

    fn data(self) -> &'t NodeData {
        &self.tree.nodes[self.id.index()]
    }

    pub fn kind(self) -> &'t str {
        &self.data().kind
    }

    pub fn text(self) -> &'t str {
        &self.data().text
    }

    pub fn start(self) -> Position {
        self.data().start
    }

    pub fn start_line(self) -> usize {
        self.data().start.line
    }

    pub fn start_column(self) -> usize {
        self.data().start.column
    }

    pub fn parent(self) -> Option<Node<'t>> {
        let tree = self.tree;
        tree.parents
            .get(self.id.index())
            .copied()
            .flatten()
            .map(|id| Node { tree, id })
    }

    pub fn children(self) -> impl Iterator<Item = Node<'t>> + 't {
        let tree = self.tree;
        self.data()
            .children
            .iter()
            .map(move |&id| Node { tree, id })
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for Node<'_> {}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .field("start", &self.start())
            .field("text", &self.text())
            .finish()
    }
}

/// Builds a [`SyntaxTree`] over a source string from byte offsets.
///
/// Nodes are opened and closed in document order; positions and text are
/// taken from the source.
#[derive(Debug)]
pub struct TreeBuilder<'s> {
    source: &'s str,
    map: SourceMap<'s>,
    nodes: Vec<NodeData>,
    open: Vec<OpenNode>,
    // End of the last finished top-level node.
    root_end: usize,
}

#[derive(Debug)]
struct OpenNode {
    id: NodeId,
    start: usize,
    last_child_end: usize,
}

impl<'s> TreeBuilder<'s> {
    pub fn new(source: &'s str) -> Self {
        Self {
            source,
            map: SourceMap::new(source),
            nodes: Vec::new(),
            open: Vec::new(),
            root_end: 0,
        }
    }

    pub fn start_node(&mut self, kind: &str, start: usize) -> Result<NodeId, TreeError> {
        let floor = match self.open.last() {
            Some(parent) => parent.last_child_end.max(parent.start),
            None => self.root_end,
        };
        if start < floor || start > self.source.len() {
            return Err(TreeError::Nesting {
                kind: kind.to_string(),
                start,
                end: start,
            });
        }

        let id = next_id(&self.nodes)?;
        self.nodes.push(NodeData {
            kind: kind.to_string(),
            text: String::new(),
            start: self.map.position(start),
            children: Vec::new(),
        });
        if let Some(parent) = self.open.last() {
            self.nodes[parent.id.index()].children.push(id);
        }
        self.open.push(OpenNode {
            id,
            start,
            last_child_end: start,
        });
        Ok(id)
    }

    /// Closes the innermost open node at `end`.
    ///
    /// On error the node stays open, so the call can be retried with a
    /// corrected offset.
    pub fn finish_node(&mut self, end: usize) -> Result<NodeId, TreeError> {
        let node = self.open.last().ok_or(TreeError::Unbalanced)?;
        let id = node.id;
        let span = Span::new(node.start, end)?;
        if end < node.last_child_end {
            return Err(TreeError::Nesting {
                kind: self.nodes[id.index()].kind.clone(),
                start: span.start,
                end: span.end,
            });
        }
        let text = span.slice(self.source)?.to_string();

        self.open.pop();
        self.nodes[id.index()].text = text;
        match self.open.last_mut() {
            Some(parent) => parent.last_child_end = end,
            None => self.root_end = end,
        }
        Ok(id)
    }

    /// Adds a childless node covering `span`.
    pub fn token(&mut self, kind: &str, span: Span) -> Result<NodeId, TreeError> {
        self.start_node(kind, span.start)?;
        self.finish_node(span.end)
    }

    pub fn finish(self) -> Result<SyntaxTree, TreeError> {
        if !self.open.is_empty() {
            return Err(TreeError::Unfinished(self.open.len()));
        }
        Ok(SyntaxTree::from_parts(self.nodes))
    }
}
