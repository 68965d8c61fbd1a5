use std::fmt::{self};

use itertools::Itertools;

use crate::{Node, RowArray};

impl Node {
    /// Display the node and all of its descendants, one line per node.
    pub fn tree_display<'a>(&'a self, name: &'a str) -> impl fmt::Display + 'a {
        TreeDisplayWrapper { name, node: self }
    }
}

struct TreeDisplayWrapper<'a> {
    name: &'a str,
    node: &'a Node,
}

impl fmt::Display for TreeDisplayWrapper<'_> {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut node_fmt = TreeFormatter {
            fmt,
            indent: "".to_string(),
        };
        node_fmt.format(self.name, self.node)
    }
}

pub struct TreeFormatter<'a, 'b: 'a> {
    fmt: &'a mut fmt::Formatter<'b>,
    indent: String,
}

impl<'a, 'b: 'a> TreeFormatter<'a, 'b> {
    fn format(&mut self, name: &str, node: &Node) -> fmt::Result {
        write!(self, "{}: {}", name, node.kind())?;
        if let Some(len) = node.len() {
            write!(self.fmt, " rows={len}")?;
        }
        if let Node::Leaf(leaf) = node {
            write!(self.fmt, " {}", describe(leaf.data()))?;
        }
        if !node.attrs().is_empty() {
            write!(
                self.fmt,
                " {{{}}}",
                node.attrs()
                    .iter()
                    .map(|(k, v)| format!("{k}={v}"))
                    .join(", ")
            )?;
        }
        writeln!(self.fmt)?;

        self.indent(|i| {
            for (child_name, child) in node.children() {
                i.format(child_name, child)?;
            }
            Ok(())
        })
    }

    fn indent<F>(&mut self, indented: F) -> fmt::Result
    where
        F: FnOnce(&mut TreeFormatter) -> fmt::Result,
    {
        let original_ident = self.indent.clone();
        self.indent += "  ";
        let res = indented(self);
        self.indent = original_ident;
        res
    }

    fn write_fmt(&mut self, fmt: fmt::Arguments<'_>) -> fmt::Result {
        write!(self.fmt, "{}{}", self.indent, fmt)
    }
}

fn describe(array: &RowArray) -> String {
    match array {
        RowArray::Flat(flat) if flat.width() == 1 => format!("{}", flat.values().ptype()),
        RowArray::Flat(flat) => format!("{}[{}]", flat.values().ptype(), flat.width()),
        RowArray::Jagged(jagged) => format!("[{}]", describe(jagged.flattened())),
        RowArray::Encoded(_) => "encoded".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use crate::{Attributes, Leaf, Node, RowArray, Struct, Values};

    #[test]
    fn tree_lists_children() {
        let mut attrs = Attributes::new();
        attrs.insert("units".to_string(), "keV".to_string());
        let energy = Leaf::array(RowArray::from(Values::from(vec![1.0f32, 2.0])), attrs).unwrap();
        let node = Node::from(Struct::new(
            vec![("energy".into(), energy.into())],
            Attributes::new(),
        ));

        let rendered = node.tree_display("ch1").to_string();
        assert_eq!(rendered, "ch1: Struct\n  energy: Array rows=2 f32 {units=keV}\n");
    }
}
