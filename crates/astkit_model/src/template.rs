//! Text rendering for nodes.
//!
//! A node type may carry a template with `%(name)s` placeholders; rendering
//! a node substitutes each placeholder with the rendered value of that
//! field. Child nodes render through their own templates, sequence fields
//! join their elements with `", "` unless a [`SeqTemplate`] says otherwise,
//! and a node whose type has no template renders as an opaque
//! `<TypeName field, other>` form.

use std::fmt;
use std::sync::Arc;

use crate::node::{FieldSlot, Node};
use crate::typed_list::TypedList;
use crate::typed_map::TypedMap;
use crate::value::Value;

/// A node type's rendering template.
#[derive(Clone)]
pub enum Template {
    /// Fixed template text.
    Text(Arc<str>),
    /// A function producing template text from the node's current state,
    /// re-evaluated on every render. Its result goes through placeholder
    /// expansion like fixed text does.
    Dynamic(fn(&Node) -> String),
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// Per-position prefixes for rendering a sequence field.
///
/// Element `i` is preceded by the `i`-th prefix. Elements beyond the last
/// prefix use the fill, or the last prefix when no fill is set.
#[derive(Clone, Debug, Default)]
pub struct SeqTemplate {
    prefixes: Vec<Arc<str>>,
    fill: Option<Arc<str>>,
}

impl SeqTemplate {
    /// Creates a sequence template from its prefixes.
    pub fn new(prefixes: impl IntoIterator<Item = impl Into<Arc<str>>>) -> Self {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
            fill: None,
        }
    }

    /// Sets the prefix used by elements past the last declared one.
    #[must_use]
    pub fn with_fill(mut self, fill: impl Into<Arc<str>>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    fn prefix(&self, i: usize) -> &str {
        if let Some(prefix) = self.prefixes.get(i) {
            prefix
        } else if let Some(fill) = &self.fill {
            fill
        } else {
            self.prefixes.last().map_or("", |p| p)
        }
    }
}

pub(crate) fn render(node: &Node) -> String {
    match node.node_type().template() {
        Some(Template::Text(text)) => expand(text, node),
        Some(Template::Dynamic(func)) => expand(&func(node), node),
        None => opaque(node),
    }
}

fn opaque(node: &Node) -> String {
    let names: Vec<&str> = node.node_type().field_names().collect();
    if names.is_empty() {
        format!("<{}>", node.type_name())
    } else {
        format!("<{} {}>", node.type_name(), names.join(", "))
    }
}

/// Expands `%(name)s` placeholders. `%%` is a literal percent; any other
/// `%`-form, and any placeholder naming a field the node does not have, is
/// emitted verbatim.
fn expand(template: &str, node: &Node) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(i) = rest.find('%') {
        out.push_str(&rest[..i]);
        let tail = &rest[i..];
        if let Some(after) = tail.strip_prefix("%%") {
            out.push('%');
            rest = after;
            continue;
        }
        if let Some(inner) = tail.strip_prefix("%(") {
            if let Some(close) = inner.find(')') {
                let name = &inner[..close];
                if let Some(after) = inner[close + 1..].strip_prefix('s') {
                    match render_field(node, name) {
                        Some(piece) => out.push_str(&piece),
                        None => {
                            out.push_str("%(");
                            out.push_str(name);
                            out.push_str(")s");
                        }
                    }
                    rest = after;
                    continue;
                }
            }
        }
        out.push('%');
        rest = &tail[1..];
    }
    out.push_str(rest);
    out
}

fn render_field(node: &Node, name: &str) -> Option<String> {
    if let Some(slot) = node.get(name) {
        Some(match slot {
            FieldSlot::Value(value) => render_value(value),
            FieldSlot::List(list) => render_list(node, name, list),
            FieldSlot::Map(map) => render_map(map),
        })
    } else {
        node.extra(name).map(render_value)
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn render_list(node: &Node, name: &str, list: &TypedList) -> String {
    let pieces: Vec<String> = list.iter().map(render_value).collect();
    match node.node_type().seq_template(name) {
        Some(template) => {
            let mut out = String::new();
            for (i, piece) in pieces.iter().enumerate() {
                out.push_str(template.prefix(i));
                out.push_str(piece);
            }
            out
        }
        None => pieces.join(", "),
    }
}

fn render_map(map: &TypedMap) -> String {
    let mut out = String::new();
    for (i, (key, value)) in map.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(key);
        out.push_str(": ");
        out.push_str(&render_value(value));
    }
    out
}
