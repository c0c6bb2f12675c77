//! Arena-backed selection tree.
//!
//! Nodes live in a single `Vec` and refer to each other by [`NodeId`].
//! Every node stores its parent's index; the root is always index 0 and is
//! the only node without a name.

use indexmap::IndexMap;

use crate::query::argument::ArgumentValue;

/// Index of a node within its [`QueryTree`].
///
/// Ids are only meaningful for the tree that issued them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// The root node of every tree.
    pub const ROOT: Self = Self(0);

    /// Returns the arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// What a selection node stands for.
///
/// Nodes are deduplicated by `(name, kind)`: entering the same field twice
/// with the same kind returns the existing node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A selection without schema information. Rendered by name when it
    /// has no children.
    Field,
    /// A selection of a composite schema type. Needs at least one rendered
    /// child, otherwise it is a ghost and is omitted.
    Typed(String),
}

/// A child entry of a node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Child {
    /// A nested selection node.
    Node(NodeId),
    /// A raw leaf token, emitted verbatim.
    Token(String),
}

/// A single selection in the tree.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    name: Option<String>,
    parent: Option<NodeId>,
    kind: NodeKind,
    arguments: IndexMap<String, ArgumentValue>,
    children: Vec<Child>,
}

impl Node {
    fn new(name: Option<String>, parent: Option<NodeId>, kind: NodeKind) -> Self {
        Self {
            name,
            parent,
            kind,
            arguments: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Field name; `None` only for the root.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Parent index; `None` only for the root.
    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[must_use]
    pub const fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Schema type of a typed node.
    #[must_use]
    pub fn schema_type(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Typed(type_name) => Some(type_name),
            NodeKind::Field => None,
        }
    }

    /// Arguments in insertion order.
    #[must_use]
    pub const fn arguments(&self) -> &IndexMap<String, ArgumentValue> {
        &self.arguments
    }

    #[must_use]
    pub fn children(&self) -> &[Child] {
        &self.children
    }
}

/// A mutable selection tree.
///
/// # Example
///
/// ```rust
/// use rcsb_query::query::{NodeId, QueryTree, VariableTypes};
///
/// let mut tree = QueryTree::new();
/// let entry = tree.enter(NodeId::ROOT, "entry", [("entry_id", "4HHB")]);
/// tree.add_token(entry, "rcsb_id");
///
/// assert_eq!(
///     tree.render(entry, "structure", &VariableTypes::default()),
///     "query structure {\n  entry(entry_id: \"4HHB\") {\n    rcsb_id\n  }\n}"
/// );
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct QueryTree {
    nodes: Vec<Node>,
}

impl Default for QueryTree {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryTree {
    /// Creates a tree with an untyped root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(None, None, NodeKind::Field)],
        }
    }

    /// Creates a tree whose root is typed with the schema's query root.
    #[must_use]
    pub fn with_root_type(type_name: impl Into<String>) -> Self {
        Self {
            nodes: vec![Node::new(None, None, NodeKind::Typed(type_name.into()))],
        }
    }

    /// Returns the number of nodes, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: a tree has at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns a node by id.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this tree.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Returns a node by id, or `None` if the id is out of range.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Returns the child nodes of `id`, skipping raw tokens.
    pub fn child_nodes(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.node(id).children.iter().filter_map(|child| match child {
            Child::Node(child) => Some(*child),
            Child::Token(_) => None,
        })
    }

    /// Enters an untyped child selection of `at`.
    ///
    /// If `at` already has a [`NodeKind::Field`] child named `name`, its
    /// arguments are merged with `args` (last write wins per key) and it is
    /// returned. Otherwise a new child is appended.
    pub fn enter<I, K, V>(&mut self, at: NodeId, name: &str, args: I) -> NodeId
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ArgumentValue>,
    {
        self.enter_kind(at, name, NodeKind::Field, args)
    }

    /// Enters a child selection of `at` typed with a composite schema type.
    ///
    /// Deduplicates like [`enter`](Self::enter), keyed by name and type.
    pub fn enter_typed<I, K, V>(&mut self, at: NodeId, name: &str, type_name: &str, args: I) -> NodeId
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ArgumentValue>,
    {
        self.enter_kind(at, name, NodeKind::Typed(type_name.to_string()), args)
    }

    fn enter_kind<I, K, V>(&mut self, at: NodeId, name: &str, kind: NodeKind, args: I) -> NodeId
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ArgumentValue>,
    {
        let existing = self.child_nodes(at).find(|&child| {
            let node = self.node(child);
            node.name.as_deref() == Some(name) && node.kind == kind
        });

        let id = existing.unwrap_or_else(|| {
            let id = NodeId(self.nodes.len());
            let is_field = kind == NodeKind::Field;
            self.nodes.push(Node::new(Some(name.to_string()), Some(at), kind));

            // A field node takes over the slot of a same-named leaf token
            let children = &mut self.nodes[at.0].children;
            let token = children
                .iter()
                .position(|child| matches!(child, Child::Token(t) if t == name));
            match token {
                Some(position) if is_field => children[position] = Child::Node(id),
                _ => children.push(Child::Node(id)),
            }
            id
        });

        self.merge_arguments(id, args);
        id
    }

    /// Merges arguments into an existing node (last write wins per key).
    pub fn merge_arguments<I, K, V>(&mut self, id: NodeId, args: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ArgumentValue>,
    {
        let arguments = &mut self.nodes[id.0].arguments;
        for (key, value) in args {
            arguments.insert(key.into(), value.into());
        }
    }

    /// Appends a raw leaf token to `at`, unless an identical token or an
    /// untyped field node of the same name is already present.
    pub fn add_token(&mut self, at: NodeId, token: &str) {
        let selected = self.node(at).children.iter().any(|child| match child {
            Child::Token(t) => t == token,
            Child::Node(id) => {
                let node = self.node(*id);
                node.kind == NodeKind::Field && node.name.as_deref() == Some(token)
            }
        });
        if !selected {
            self.nodes[at.0].children.push(Child::Token(token.to_string()));
        }
    }

    /// Returns `true` if `id` renders to a non-empty selection.
    ///
    /// A childless untyped node is a leaf and counts as selected. A typed
    /// node counts only if something beneath it is selected.
    #[must_use]
    pub fn has_selection(&self, id: NodeId) -> bool {
        let node = self.node(id);
        if node.children.is_empty() {
            return node.kind == NodeKind::Field;
        }
        node.children.iter().any(|child| match child {
            Child::Token(_) => true,
            Child::Node(child) => self.has_selection(*child),
        })
    }

    /// Returns the parent of `at`, or `at` itself at the root.
    #[must_use]
    pub fn end(&self, at: NodeId) -> NodeId {
        self.node(at).parent.unwrap_or(at)
    }

    /// Follows parent indices up from `at` to the root.
    #[must_use]
    pub fn root_of(&self, at: NodeId) -> NodeId {
        let mut current = at;
        while let Some(parent) = self.node(current).parent {
            current = parent;
        }
        current
    }

    /// Copies the subtree rooted at `at` into a new, independent tree.
    ///
    /// Copying the root copies the whole tree. Copying any other node puts
    /// the copy under a fresh root of the same kind as this tree's root.
    /// Returns the new tree and the id of the copied node within it.
    #[must_use]
    pub fn clone_subtree(&self, at: NodeId) -> (Self, NodeId) {
        let root = self.root_of(at);
        let mut nodes = Vec::with_capacity(self.nodes.len());

        if at == root {
            let id = self.copy_node(at, None, &mut nodes);
            return (Self { nodes }, id);
        }

        nodes.push(Node::new(None, None, self.node(root).kind.clone()));
        let id = self.copy_node(at, Some(NodeId::ROOT), &mut nodes);
        nodes[0].children.push(Child::Node(id));
        (Self { nodes }, id)
    }

    fn copy_node(&self, src: NodeId, parent: Option<NodeId>, out: &mut Vec<Node>) -> NodeId {
        let source = self.node(src);
        let id = NodeId(out.len());
        out.push(Node {
            name: source.name.clone(),
            parent,
            kind: source.kind.clone(),
            arguments: source.arguments.clone(),
            children: Vec::with_capacity(source.children.len()),
        });

        let children: Vec<Child> = source
            .children
            .iter()
            .map(|child| match child {
                Child::Token(token) => Child::Token(token.clone()),
                Child::Node(child) => Child::Node(self.copy_node(*child, Some(id), out)),
            })
            .collect();
        out[id.0].children = children;
        id
    }
}
