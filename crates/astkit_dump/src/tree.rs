//! Indented text outlines of node trees.
//!
//! One line per field, two spaces per level, `- ` bullets for sequence
//! elements. Schema order is preserved and extra attributes are skipped,
//! so the outline mirrors what the JSON dump would contain.

use astkit_model::{FieldSlot, Node, Value};

/// Renders a node tree as an indented outline, one line per field.
#[must_use]
pub fn dump(node: &Node) -> String {
    let mut dumper = TreeDumper::default();
    dumper.node(node, 0);
    dumper.out
}

#[derive(Default)]
struct TreeDumper {
    out: String,
}

impl TreeDumper {
    fn line(&mut self, level: usize, text: &str) {
        for _ in 0..level {
            self.out.push_str("  ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn node(&mut self, node: &Node, level: usize) {
        self.line(level, node.type_name());
        for (name, slot) in node.fields() {
            self.slot(name, slot, level + 1);
        }
    }

    fn slot(&mut self, name: &str, slot: &FieldSlot, level: usize) {
        match slot {
            FieldSlot::Value(Value::Node(child)) => {
                self.line(level, &format!("{name}:"));
                self.node(child, level + 1);
            }
            FieldSlot::Value(value) => self.line(level, &format!("{name}: {value:?}")),
            FieldSlot::List(list) if list.is_empty() => {
                self.line(level, &format!("{name}: []"));
            }
            FieldSlot::List(list) => {
                self.line(level, &format!("{name}:"));
                for item in list.iter() {
                    self.item(item, level + 1);
                }
            }
            FieldSlot::Map(map) if map.is_empty() => {
                self.line(level, &format!("{name}: {{}}"));
            }
            FieldSlot::Map(map) => {
                self.line(level, &format!("{name}:"));
                for (key, value) in map.iter() {
                    match value {
                        Value::Node(child) => {
                            self.line(level + 1, &format!("{key}:"));
                            self.node(child, level + 2);
                        }
                        other => self.line(level + 1, &format!("{key}: {other:?}")),
                    }
                }
            }
        }
    }

    fn item(&mut self, item: &Value, level: usize) {
        match item {
            Value::Node(child) => {
                self.line(level, &format!("- {}", child.type_name()));
                for (name, slot) in child.fields() {
                    self.slot(name, slot, level + 2);
                }
            }
            other => self.line(level, &format!("- {other:?}")),
        }
    }
}
