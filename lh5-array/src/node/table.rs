use lh5_error::{Lh5Result, lh5_bail};

use crate::Node;
use crate::node::{Attributes, FieldName};

/// Named columns sharing one row count.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    len: usize,
    columns: Vec<(FieldName, Node)>,
    attrs: Attributes,
}

impl Table {
    /// Create a table. Its row count is taken from the row-indexed columns, which must agree;
    /// a table without row-indexed columns has no rows.
    pub fn try_new(columns: Vec<(FieldName, Node)>, attrs: Attributes) -> Lh5Result<Self> {
        let mut len = None;
        for (name, column) in &columns {
            let Some(column_len) = column.len() else {
                continue;
            };
            match len {
                None => len = Some(column_len),
                Some(expected) if expected != column_len => lh5_bail!(
                    "table column {} has {} rows, expected {}",
                    name,
                    column_len,
                    expected
                ),
                Some(_) => {}
            }
        }
        Ok(Self {
            len: len.unwrap_or(0),
            columns,
            attrs,
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn columns(&self) -> &[(FieldName, Node)] {
        &self.columns
    }

    pub fn attrs(&self) -> &Attributes {
        &self.attrs
    }

    pub fn into_parts(self) -> (Vec<(FieldName, Node)>, Attributes) {
        (self.columns, self.attrs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Leaf, RowArray, Values};

    fn column(len: usize) -> Node {
        Leaf::array(
            RowArray::from(Values::from(vec![0.5f32; len])),
            Attributes::new(),
        )
        .unwrap()
        .into()
    }

    #[test]
    fn columns_must_agree() {
        assert!(
            Table::try_new(
                vec![("a".into(), column(3)), ("b".into(), column(4))],
                Attributes::new()
            )
            .is_err()
        );
        let table = Table::try_new(
            vec![("a".into(), column(3)), ("b".into(), column(3))],
            Attributes::new(),
        )
        .unwrap();
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn empty_table_has_no_rows() {
        let table = Table::try_new(Vec::new(), Attributes::new()).unwrap();
        assert!(table.is_empty());
    }
}
