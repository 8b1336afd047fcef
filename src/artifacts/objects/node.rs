//! IPLD node codec
//!
//! Objects travel as IPLD-shaped nodes: a JSON map with the reserved key
//! `@type` naming the object kind and links encoded as `{"/": "<CID>"}`.
//! The canonical byte form sorts map keys, so the encoding (and therefore
//! the CID) is a deterministic function of the object's content.
//!
//! Instead of inspecting fields reflectively, the codec consults an explicit
//! per-type schema table mapping each field to one of four link kinds:
//!
//! - `direct`: the field holds a single link
//! - `array`: the field holds an ordered list of links
//! - `map`: the node's non-reserved keys are child links keyed by name
//!   (used by trees)
//! - `value`: the field holds a plain scalar
//!
//! Failure modes are `UnknownType`, `MissingField` and `MalformedLink`.

use crate::artifacts::core::PandoError;
use crate::artifacts::objects::cid::Cid;
use crate::artifacts::objects::file::FileNode;
use crate::artifacts::objects::object::{Object, ObjectKind};
use crate::artifacts::objects::snapshot::Snapshot;
use crate::artifacts::objects::tree::{Link, Tree};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

/// Reserved key carrying the object kind tag.
pub const TYPE_KEY: &str = "@type";

/// Keys that can never name a tree child.
pub const RESERVED_KEYS: [&str; 2] = [TYPE_KEY, "path"];

/// How a schema field relates to links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Direct,
    Array,
    Map,
    Value,
}

/// Schema table consulted by the codec, field name to link kind.
///
/// The `Map` kind has no field name of its own: it covers every non-reserved
/// key of the node.
pub fn schema(kind: ObjectKind) -> &'static [(&'static str, LinkKind)] {
    match kind {
        ObjectKind::Snapshot => &[
            ("author", LinkKind::Value),
            ("message", LinkKind::Value),
            ("timestamp", LinkKind::Value),
            ("tree", LinkKind::Direct),
            ("parents", LinkKind::Array),
        ],
        ObjectKind::Tree => &[("path", LinkKind::Value), ("", LinkKind::Map)],
        ObjectKind::File => &[("path", LinkKind::Value), ("link", LinkKind::Direct)],
    }
}

/// Resolves the kind of a linked object, used when decoding tree children
/// (the wire form of a tree child is a bare link with no kind tag).
pub type KindResolver<'r> = dyn FnMut(&Cid) -> anyhow::Result<ObjectKind> + 'r;

/// Encode a link as `{"/": "<CID>"}`.
pub fn link_value(cid: &Cid) -> Value {
    json!({ "/": cid.as_ref() })
}

fn parse_link(value: &Value, field: &str) -> anyhow::Result<Cid> {
    let malformed = || PandoError::MalformedLink(field.to_string());

    let map = value.as_object().ok_or_else(malformed)?;
    if map.len() != 1 {
        return Err(malformed().into());
    }
    let raw = map.get("/").and_then(Value::as_str).ok_or_else(malformed)?;
    Cid::try_parse(raw).map_err(|_| malformed().into())
}

/// Encode an object into its IPLD node form.
pub fn encode(object: &Object) -> Value {
    let mut node = Map::new();
    node.insert(TYPE_KEY.to_string(), json!(object.kind().as_str()));

    match object {
        Object::Snapshot(snapshot) => {
            node.insert("author".into(), json!(snapshot.author));
            node.insert("message".into(), json!(snapshot.message));
            node.insert("timestamp".into(), json!(snapshot.timestamp));
            node.insert("tree".into(), link_value(&snapshot.tree));
            node.insert(
                "parents".into(),
                Value::Array(snapshot.parents.iter().map(link_value).collect()),
            );
        }
        Object::Tree(tree) => {
            node.insert("path".into(), json!(tree.path));
            for (name, link) in &tree.children {
                node.insert(name.clone(), link_value(&link.cid));
            }
        }
        Object::File(file) => {
            node.insert("path".into(), json!(file.path));
            node.insert("link".into(), link_value(&file.link));
        }
    }

    Value::Object(node)
}

/// Canonical bytes of a node: JSON with sorted map keys.
///
/// `serde_json`'s map is ordered by key, so serializing is already
/// canonical; permuting child insertion order cannot change the bytes.
pub fn canonical_bytes(node: &Value) -> anyhow::Result<Vec<u8>> {
    Ok(serde_json::to_vec(node)?)
}

/// Validate a node against the schema table of its kind: every schema field
/// must be present and carry a well-formed link (or list of links).
fn validate_schema(node: &Value, kind: ObjectKind) -> anyhow::Result<()> {
    for (field, link_kind) in schema(kind).iter().copied() {
        match link_kind {
            LinkKind::Map => {
                // covers the non-reserved keys; their links are checked
                // when the children are decoded
            }
            LinkKind::Value => {
                required_field(node, kind, field)?;
            }
            LinkKind::Direct => {
                parse_link(required_field(node, kind, field)?, field)?;
            }
            LinkKind::Array => {
                let links = required_field(node, kind, field)?
                    .as_array()
                    .ok_or_else(|| PandoError::MalformedLink(field.to_string()))?;
                for link in links {
                    parse_link(link, field)?;
                }
            }
        }
    }
    Ok(())
}

/// Decode a node back into a typed [`Object`].
///
/// `resolve_kind` is consulted only for tree children, whose links carry no
/// kind tag on the wire; `@type` of the linked object settles it.
pub fn decode(node: &Value, resolve_kind: &mut KindResolver<'_>) -> anyhow::Result<Object> {
    let kind = node_kind(node)?;
    validate_schema(node, kind)?;

    match kind {
        ObjectKind::Snapshot => {
            let author = required_str(node, kind, "author")?;
            let message = required_str(node, kind, "message")?;
            let timestamp = required_field(node, kind, "timestamp")?
                .as_i64()
                .ok_or(PandoError::MissingField {
                    kind: kind.as_str(),
                    field: "timestamp",
                })?;
            let tree = parse_link(required_field(node, kind, "tree")?, "tree")?;
            let parents = required_field(node, kind, "parents")?
                .as_array()
                .ok_or_else(|| PandoError::MalformedLink("parents".to_string()))?
                .iter()
                .map(|value| parse_link(value, "parents"))
                .collect::<anyhow::Result<Vec<_>>>()?;

            Ok(Object::Snapshot(Snapshot::new(
                author, message, timestamp, tree, parents,
            )))
        }
        ObjectKind::Tree => {
            let path = required_str(node, kind, "path")?;
            let map = node.as_object().expect("kind check implies a map");

            let mut children = BTreeMap::new();
            for (name, value) in map {
                if RESERVED_KEYS.contains(&name.as_str()) {
                    continue;
                }
                let cid = parse_link(value, name)?;
                let child_kind = resolve_kind(&cid)?;
                children.insert(name.clone(), Link::new(cid, child_kind));
            }

            Ok(Object::Tree(Tree { path, children }))
        }
        ObjectKind::File => {
            let path = required_str(node, kind, "path")?;
            let link = parse_link(required_field(node, kind, "link")?, "link")?;

            Ok(Object::File(FileNode::new(path, link)))
        }
    }
}

/// Read just the `@type` tag of a node.
pub fn node_kind(node: &Value) -> anyhow::Result<ObjectKind> {
    let tag = node
        .as_object()
        .and_then(|map| map.get(TYPE_KEY))
        .and_then(Value::as_str)
        .ok_or(PandoError::MissingField {
            kind: "node",
            field: TYPE_KEY,
        })?;

    ObjectKind::try_parse(tag)
}

fn required_field<'n>(
    node: &'n Value,
    kind: ObjectKind,
    field: &'static str,
) -> anyhow::Result<&'n Value> {
    node.get(field).ok_or_else(|| {
        PandoError::MissingField {
            kind: kind.as_str(),
            field,
        }
        .into()
    })
}

fn required_str(node: &Value, kind: ObjectKind, field: &'static str) -> anyhow::Result<String> {
    Ok(required_field(node, kind, field)?
        .as_str()
        .ok_or(PandoError::MissingField {
            kind: kind.as_str(),
            field,
        })?
        .to_string())
}
