//! Rendering a [`QueryTree`] to GraphQL query text.

use crate::query::tree::{Child, NodeId, NodeKind, QueryTree};
use crate::query::variables::VariableTypes;

const INDENT: usize = 2;

impl QueryTree {
    /// Renders the whole tree containing `from` as a named query document.
    ///
    /// The header declares every variable bound on the root's rendered
    /// immediate children, sorted by name, and is omitted when there are
    /// none. Typed nodes whose selection renders empty are pruned.
    ///
    /// Output is deterministic: rendering an unmodified tree twice yields
    /// identical text.
    #[must_use]
    pub fn render(&self, from: NodeId, query_name: &str, types: &VariableTypes) -> String {
        let root = self.root_of(from);
        let variables = self.variables(root, types);

        let mut out = format!("query {query_name}");
        if !variables.is_empty() {
            let declarations: Vec<String> = variables
                .iter()
                .map(|(name, type_string)| format!("${name}: {type_string}"))
                .collect();
            out.push_str(&format!("({})", declarations.join(", ")));
        }
        out.push_str(" {\n");

        for line in self.render_children(root, INDENT) {
            out.push_str(&line);
            out.push('\n');
        }
        out.push('}');
        out
    }

    fn render_children(&self, id: NodeId, indent: usize) -> Vec<String> {
        self.node(id)
            .children()
            .iter()
            .filter_map(|child| match child {
                Child::Token(token) => Some(format!("{:indent$}{token}", "")),
                Child::Node(child) => self.render_node(*child, indent),
            })
            .collect()
    }

    /// Renders one node, or `None` if it is a ghost.
    fn render_node(&self, id: NodeId, indent: usize) -> Option<String> {
        let node = self.node(id);

        let mut head = format!("{:indent$}{}", "", node.name().unwrap_or_default());
        if !node.arguments().is_empty() {
            let arguments: Vec<String> = node
                .arguments()
                .iter()
                .map(|(key, value)| format!("{key}: {value}"))
                .collect();
            head.push_str(&format!("({})", arguments.join(", ")));
        }

        if node.children().is_empty() {
            return match node.kind() {
                NodeKind::Field => Some(head),
                NodeKind::Typed(_) => None,
            };
        }

        let body = self.render_children(id, indent + INDENT);
        if body.is_empty() {
            return None;
        }
        Some(format!(
            "{head} {{\n{}\n{:indent$}}}",
            body.join("\n"),
            ""
        ))
    }
}
