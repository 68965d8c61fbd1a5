use std::fs;
use std::path::Path;

use lh5_array::{
    Attributes, FieldName, Leaf, LeafKind, Node, RowArray, Scalar, ScalarValue, Struct, Table,
    WaveformTable,
};
use lh5_dtype::{DATATYPE_ATTR, Kind, classify, struct_fields};
use lh5_error::{ContextExt, Lh5Result, lh5_bail, lh5_err};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::objects::Objects;
use crate::{RowCount, Store, WriteMode, form_datatype};

/// A [`Store`] keeping each file as a JSON document.
///
/// Every object is stored with its attributes, including a `datatype` descriptor, and either a
/// scalar `value`, a row array `data` or an ordered list of child `fields`. Files are read whole
/// and rewritten whole on every write.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonStore;

impl JsonStore {
    pub fn new() -> Self {
        Self
    }

    fn load(&self, path: &Path) -> Lh5Result<Objects> {
        if !path.exists() {
            lh5_bail!(NotFound: "{}", path.display());
        }
        let text = fs::read_to_string(path)?;
        let document: RawFile = serde_json::from_str(&text)?;
        let entries = document
            .objects
            .into_iter()
            .map(|field| {
                let node = materialize(&field.name, field.object)?;
                Ok((field.name, node))
            })
            .collect::<Lh5Result<Vec<_>>>()
            .context(|| format!("reading {}", path.display()))?;
        Ok(Objects::new(entries))
    }

    fn save(&self, path: &Path, objects: Objects) -> Lh5Result<()> {
        let document = RawFile {
            objects: objects
                .into_entries()
                .iter()
                .map(|(name, node)| RawField {
                    name: name.clone(),
                    object: RawObject::from_node(node),
                })
                .collect(),
        };
        fs::write(path, serde_json::to_string_pretty(&document)?)?;
        debug!("wrote {}", path.display());
        Ok(())
    }
}

impl Store for JsonStore {
    fn list(&self, source: &Path, recursive: bool) -> Lh5Result<Vec<String>> {
        Ok(self.load(source)?.list(recursive))
    }

    fn read(
        &self,
        name: &str,
        source: &Path,
        start_row: usize,
        n_rows: RowCount,
    ) -> Lh5Result<Node> {
        self.load(source)?.read(name, source, start_row, n_rows)
    }

    fn write(
        &mut self,
        node: &Node,
        name: &str,
        destination: &Path,
        mode: WriteMode,
    ) -> Lh5Result<()> {
        let exists = destination.exists();
        let mut objects = match mode {
            WriteMode::OverwriteFile => Objects::default(),
            WriteMode::WriteSafe if !exists => Objects::default(),
            WriteMode::Append if !exists => {
                lh5_bail!(NotFound: "{} (cannot append)", destination.display())
            }
            WriteMode::WriteSafe | WriteMode::Append => self.load(destination)?,
        };
        objects.write(node, name, destination, mode, exists)?;
        self.save(destination, objects)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct RawFile {
    objects: Vec<RawField>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawField {
    name: String,
    object: RawObject,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RawObject {
    #[serde(default)]
    attrs: Attributes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<ScalarValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<RowArray>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    fields: Vec<RawField>,
}

impl RawObject {
    fn from_node(node: &Node) -> Self {
        let mut attrs = node.attrs().clone();
        attrs.insert(DATATYPE_ATTR.to_string(), form_datatype(node));
        let mut raw = RawObject {
            attrs,
            ..Default::default()
        };
        match node {
            Node::Scalar(scalar) => raw.value = Some(scalar.value().clone()),
            Node::Leaf(leaf) => raw.data = Some(leaf.data().clone()),
            Node::Struct(_) | Node::Table(_) | Node::WaveformTable(_) => {
                raw.fields = node
                    .children()
                    .into_iter()
                    .map(|(name, child)| RawField {
                        name: name.to_string(),
                        object: RawObject::from_node(child),
                    })
                    .collect()
            }
        }
        raw
    }
}

/// Turn a stored object into a [`Node`], deciding its kind from the `datatype` attribute.
fn materialize(path: &str, raw: RawObject) -> Lh5Result<Node> {
    let Some(descriptor) = raw.attrs.get(DATATYPE_ATTR) else {
        lh5_bail!("{} has no {} attribute", path, DATATYPE_ATTR);
    };
    let kind = classify(descriptor)?;
    match kind {
        Kind::Scalar => {
            let value = raw
                .value
                .ok_or_else(|| lh5_err!("scalar {} has no value", path))?;
            Ok(Scalar::new(value, raw.attrs).into())
        }
        kind if kind.is_composite() => {
            let names: Vec<String> = struct_fields(descriptor)?
                .into_iter()
                .map(str::to_string)
                .collect();
            let mut stored = raw.fields;
            let mut fields = Vec::with_capacity(names.len());
            for name in names {
                let Some(idx) = stored.iter().position(|f| f.name == name) else {
                    lh5_bail!(NotFound: "{}/{}", path, name);
                };
                let field = stored.remove(idx);
                let child = materialize(&format!("{path}/{name}"), field.object)?;
                fields.push((FieldName::from(name.as_str()), child));
            }
            for extra in stored {
                warn!("{}/{} is not listed in the datatype of {}", path, extra.name, path);
            }
            if kind == Kind::Struct || kind == Kind::Histogram {
                Ok(Struct::new(fields, raw.attrs).into())
            } else {
                table_or_waveform(fields, raw.attrs)
            }
        }
        leaf => {
            let data = raw
                .data
                .ok_or_else(|| lh5_err!("array {} has no data", path))?;
            data.validate()?;
            Ok(Leaf::try_new(LeafKind::try_from(leaf)?, data, raw.attrs)?.into())
        }
    }
}

fn table_or_waveform(fields: Vec<(FieldName, Node)>, attrs: Attributes) -> Lh5Result<Node> {
    let is_waveform = fields.len() == WaveformTable::FIELDS.len()
        && WaveformTable::FIELDS
            .iter()
            .all(|name| fields.iter().any(|(n, _)| n.as_ref() == *name));
    if !is_waveform {
        return Ok(Table::try_new(fields, attrs)?.into());
    }
    let take = |name: &str| -> Lh5Result<Node> {
        fields
            .iter()
            .find_map(|(n, child)| (n.as_ref() == name).then(|| child.clone()))
            .ok_or_else(|| lh5_err!(NotFound: "waveform field {}", name))
    };
    let (t0, dt, values) = (take("t0")?, take("dt")?, take("values")?);
    Ok(WaveformTable::try_new(t0, dt, values, attrs)?.into())
}
