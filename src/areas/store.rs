//! Content-addressable object store
//!
//! The store is the sole mutator of durable object storage. Blocks live
//! under `.pando/ipfs/ab/cdef…` (sharded by the first two CID characters),
//! zlib-compressed, written atomically via temp-file + rename. `put` is
//! idempotent: identical bytes always map to the identical CID and an
//! existing block is never rewritten.
//!
//! Two flavors of content share the namespace:
//!
//! - raw blocks: file contents, hashed as-is
//! - nodes: snapshots/trees/files in canonical IPLD encoding
//!
//! Every read re-hashes the decompressed content against the requested CID,
//! so a damaged block surfaces as `CorruptObject` instead of silently
//! propagating.

use crate::artifacts::core::PandoError;
use crate::artifacts::objects::cid::Cid;
use crate::artifacts::objects::file::FileNode;
use crate::artifacts::objects::node;
use crate::artifacts::objects::object::{Object, ObjectKind};
use crate::artifacts::objects::snapshot::Snapshot;
use crate::artifacts::objects::tree::{Tree, join_path};
use anyhow::Context;
use bytes::Bytes;
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Directory holding pin markers.
const PINS_DIR: &str = "pins";

#[derive(Debug)]
pub struct Store {
    /// Backing directory (typically `.pando/ipfs`).
    path: Box<Path>,
}

impl Store {
    pub fn new(path: Box<Path>) -> Self {
        Store { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn block_path(&self, cid: &Cid) -> PathBuf {
        self.path.join(cid.to_path())
    }

    /// Store raw bytes and return their CID. Same bytes, same CID.
    pub fn put_block(&self, bytes: &[u8]) -> anyhow::Result<Cid> {
        let cid = Cid::for_bytes(bytes);
        self.write_block(&cid, bytes)?;
        Ok(cid)
    }

    /// Encode an object canonically, store the encoding, return its CID.
    pub fn put_object(&self, object: &Object) -> anyhow::Result<Cid> {
        let bytes = node::canonical_bytes(&node::encode(object))?;
        self.put_block(&bytes)
    }

    pub fn put_snapshot(&self, snapshot: &Snapshot) -> anyhow::Result<Cid> {
        self.put_object(&Object::Snapshot(snapshot.clone()))
    }

    pub fn put_tree(&self, tree: &Tree) -> anyhow::Result<Cid> {
        self.put_object(&Object::Tree(tree.clone()))
    }

    pub fn put_file(&self, file: &FileNode) -> anyhow::Result<Cid> {
        self.put_object(&Object::File(file.clone()))
    }

    pub fn has(&self, cid: &Cid) -> bool {
        self.block_path(cid).exists()
    }

    /// Materialize raw file content.
    ///
    /// `cache_only` restricts the read to locally cached blocks; this
    /// adapter is purely local, so every block it holds is cache.
    pub fn download(&self, cid: &Cid, _cache_only: bool) -> anyhow::Result<Bytes> {
        self.read_block(cid)
    }

    /// Decode a stored node into its IPLD value form.
    pub fn get_node(&self, cid: &Cid) -> anyhow::Result<Value> {
        let bytes = self.read_block(cid)?;
        serde_json::from_slice(&bytes)
            .map_err(|_| PandoError::CorruptObject(cid.clone()).into())
    }

    /// Partial read: fetch the node and navigate a dotted selector path
    /// (e.g. `tree`, `@type`) without touching any linked object.
    pub fn get(&self, cid: &Cid, selector: Option<&str>) -> anyhow::Result<Value> {
        let node = self.get_node(cid)?;

        match selector {
            None => Ok(node),
            Some(selector) => {
                let mut cursor = &node;
                for segment in selector.split('.') {
                    cursor = cursor.get(segment).ok_or(PandoError::MissingField {
                        kind: "node",
                        field: "selector",
                    })?;
                }
                Ok(cursor.clone())
            }
        }
    }

    /// Kind tag of a stored node, via a cheap `@type` selector read.
    pub fn kind_of(&self, cid: &Cid) -> anyhow::Result<ObjectKind> {
        let tag = self.get(cid, Some(node::TYPE_KEY))?;
        let tag = tag.as_str().ok_or_else(|| PandoError::CorruptObject(cid.clone()))?;
        ObjectKind::try_parse(tag)
    }

    /// Decode a stored node into a typed object, resolving tree child kinds
    /// through further `@type` reads.
    pub fn get_object(&self, cid: &Cid) -> anyhow::Result<Object> {
        let value = self.get_node(cid)?;
        node::decode(&value, &mut |child| self.kind_of(child))
    }

    pub fn get_snapshot(&self, cid: &Cid) -> anyhow::Result<Snapshot> {
        self.get_object(cid)?
            .into_snapshot()
            .with_context(|| format!("object {cid} is not a snapshot"))
    }

    pub fn get_tree(&self, cid: &Cid) -> anyhow::Result<Tree> {
        self.get_object(cid)?
            .into_tree()
            .with_context(|| format!("object {cid} is not a tree"))
    }

    pub fn get_file(&self, cid: &Cid) -> anyhow::Result<FileNode> {
        self.get_object(cid)?
            .into_file()
            .with_context(|| format!("object {cid} is not a file"))
    }

    /// Load a tree by optional CID, with `None` standing for the empty tree.
    pub fn tree_or_empty(&self, cid: Option<&Cid>, path: &str) -> anyhow::Result<Tree> {
        match cid {
            Some(cid) => self.get_tree(cid),
            None => Ok(Tree::empty(path)),
        }
    }

    /// Flatten a tree into `path → raw block CID` for every file below it.
    pub fn flatten_tree(&self, tree: &Tree) -> anyhow::Result<BTreeMap<PathBuf, Cid>> {
        let mut files = BTreeMap::new();
        self.collect_files(tree, &mut files)?;
        Ok(files)
    }

    fn collect_files(
        &self,
        tree: &Tree,
        files: &mut BTreeMap<PathBuf, Cid>,
    ) -> anyhow::Result<()> {
        for (name, link) in &tree.children {
            match link.kind {
                ObjectKind::File => {
                    let file = self.get_file(&link.cid)?;
                    let path = join_path(&tree.path, name);
                    files.insert(PathBuf::from(path), file.link);
                }
                ObjectKind::Tree => {
                    let subtree = self.get_tree(&link.cid)?;
                    self.collect_files(&subtree, files)?;
                }
                ObjectKind::Snapshot => {
                    return Err(PandoError::CorruptObject(link.cid.clone()).into());
                }
            }
        }
        Ok(())
    }

    /// Mark a CID for retention.
    pub fn pin(&self, cid: &Cid) -> anyhow::Result<()> {
        let pin_path = self.path.join(PINS_DIR).join(cid.as_ref());
        std::fs::create_dir_all(pin_path.parent().expect("pins dir has a parent"))?;
        std::fs::write(pin_path, [])?;
        Ok(())
    }

    pub fn unpin(&self, cid: &Cid) -> anyhow::Result<()> {
        let pin_path = self.path.join(PINS_DIR).join(cid.as_ref());
        if pin_path.exists() {
            std::fs::remove_file(pin_path)?;
        }
        Ok(())
    }

    fn read_block(&self, cid: &Cid) -> anyhow::Result<Bytes> {
        let block_path = self.block_path(cid);
        if !block_path.exists() {
            return Err(PandoError::MissingObject(cid.clone()).into());
        }

        let compressed = std::fs::read(&block_path)
            .with_context(|| format!("unable to read block {}", block_path.display()))?;
        let bytes = Self::decompress(&compressed)
            .map_err(|_| PandoError::CorruptObject(cid.clone()))?;

        if &Cid::for_bytes(&bytes) != cid {
            return Err(PandoError::CorruptObject(cid.clone()).into());
        }

        Ok(bytes)
    }

    fn write_block(&self, cid: &Cid, bytes: &[u8]) -> anyhow::Result<()> {
        let block_path = self.block_path(cid);
        if block_path.exists() {
            return Ok(());
        }

        let block_dir = block_path
            .parent()
            .context("block path has no parent directory")?;
        std::fs::create_dir_all(block_dir)
            .with_context(|| format!("unable to create block directory {}", block_dir.display()))?;

        let temp_path = block_dir.join(format!("tmp-blk-{}", rand::random::<u32>()));
        let compressed = Self::compress(bytes)?;

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .with_context(|| format!("unable to open block file {}", temp_path.display()))?;
        file.write_all(&compressed)
            .with_context(|| format!("unable to write block file {}", temp_path.display()))?;

        // rename makes the publish atomic
        std::fs::rename(&temp_path, &block_path)
            .with_context(|| format!("unable to publish block {}", block_path.display()))?;

        Ok(())
    }

    fn compress(data: &[u8]) -> anyhow::Result<Vec<u8>> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(data).context("unable to compress block")?;
        encoder.finish().context("unable to finish compressing block")
    }

    fn decompress(data: &[u8]) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(data);
        let mut decompressed = Vec::new();
        decoder
            .read_to_end(&mut decompressed)
            .context("unable to decompress block")?;
        Ok(decompressed.into())
    }
}
