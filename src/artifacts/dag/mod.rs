//! Snapshot DAG traversal and lowest-common-ancestor discovery
//!
//! The snapshot graph is acyclic by construction: a parent's CID is fixed
//! before any child can reference it, so no snapshot can reach itself.
//!
//! ## LCA algorithm
//!
//! Two phases:
//!
//! 1. Mark every ancestor reachable from the source and from the target
//!    (breadth-first over `parents`, deduplicated). Snapshots holding both
//!    marks are common ancestors.
//! 2. Filter redundant candidates: a common ancestor that is a strict
//!    ancestor of another common ancestor cannot be lowest. Any survivor is
//!    a valid answer; the pick is made deterministic by ordering on
//!    (timestamp, CID).
//!
//! Disjoint histories yield no common ancestor; the merge engine treats
//! that as merging against the empty tree.

use crate::artifacts::core::PandoError;
use crate::artifacts::objects::cid::Cid;
use crate::areas::store::Store;
use bitflags::bitflags;
use std::collections::{HashMap, HashSet, VecDeque};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct VisitState: u8 {
        const FROM_SOURCE = 0b01;
        const FROM_TARGET = 0b10;
        const FROM_BOTH = Self::FROM_SOURCE.bits() | Self::FROM_TARGET.bits();
    }
}

/// Just enough of a snapshot for graph traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlimSnapshot {
    pub cid: Cid,
    pub parents: Vec<Cid>,
    pub timestamp: i64,
}

/// Load a [`SlimSnapshot`] with selector reads (no tree resolution).
pub fn slim(store: &Store, cid: &Cid) -> anyhow::Result<SlimSnapshot> {
    let parents = parents(store, cid)?;
    let timestamp = store
        .get(cid, Some("timestamp"))?
        .as_i64()
        .unwrap_or_default();

    Ok(SlimSnapshot {
        cid: cid.clone(),
        parents,
        timestamp,
    })
}

/// Parent CIDs of a snapshot, via a partial read.
pub fn parents(store: &Store, cid: &Cid) -> anyhow::Result<Vec<Cid>> {
    let raw = store.get(cid, Some("parents"))?;
    raw.as_array()
        .map(|links| {
            links
                .iter()
                .map(|link| {
                    link.get("/")
                        .and_then(serde_json::Value::as_str)
                        .ok_or_else(|| PandoError::MalformedLink("parents".to_string()).into())
                        .and_then(Cid::try_parse)
                })
                .collect()
        })
        .unwrap_or_else(|| Ok(Vec::new()))
}

/// Lazy, deduplicated breadth-first walk over the strict ancestors of a
/// snapshot (the start itself is not yielded).
pub struct Ancestors<'s> {
    store: &'s Store,
    queue: VecDeque<Cid>,
    seen: HashSet<Cid>,
}

impl<'s> Ancestors<'s> {
    pub fn of(store: &'s Store, cid: &Cid) -> anyhow::Result<Self> {
        let mut seen = HashSet::new();
        seen.insert(cid.clone());

        Ok(Ancestors {
            store,
            queue: parents(store, cid)?.into(),
            seen,
        })
    }
}

impl Iterator for Ancestors<'_> {
    type Item = anyhow::Result<Cid>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let cid = self.queue.pop_front()?;
            if !self.seen.insert(cid.clone()) {
                continue;
            }

            match parents(self.store, &cid) {
                Ok(parents) => {
                    self.queue.extend(parents);
                    return Some(Ok(cid));
                }
                Err(err) => return Some(Err(err)),
            }
        }
    }
}

/// Finds the lowest common ancestor of two snapshots.
///
/// Generic over the loader so the algorithm can run against the store or an
/// in-memory graph in tests.
pub struct LcaFinder<Loader>
where
    Loader: Fn(&Cid) -> anyhow::Result<SlimSnapshot>,
{
    loader: Loader,
}

impl<Loader> LcaFinder<Loader>
where
    Loader: Fn(&Cid) -> anyhow::Result<SlimSnapshot>,
{
    pub fn new(loader: Loader) -> Self {
        LcaFinder { loader }
    }

    pub fn find(&self, source: &Cid, target: &Cid) -> anyhow::Result<Option<Cid>> {
        let mut states = HashMap::new();
        self.mark(source, VisitState::FROM_SOURCE, &mut states)?;
        self.mark(target, VisitState::FROM_TARGET, &mut states)?;

        let common: HashSet<Cid> = states
            .into_iter()
            .filter(|(_, state)| state.contains(VisitState::FROM_BOTH))
            .map(|(cid, _)| cid)
            .collect();

        if common.is_empty() {
            return Ok(None);
        }

        let redundant = self.redundant_candidates(&common)?;

        let mut best: Option<SlimSnapshot> = None;
        for cid in common.difference(&redundant) {
            let slim = (self.loader)(cid)?;
            let better = match &best {
                None => true,
                Some(current) => {
                    (slim.timestamp, &slim.cid) > (current.timestamp, &current.cid)
                }
            };
            if better {
                best = Some(slim);
            }
        }

        Ok(best.map(|slim| slim.cid))
    }

    /// Mark `start` and every ancestor of it with `flag`.
    fn mark(
        &self,
        start: &Cid,
        flag: VisitState,
        states: &mut HashMap<Cid, VisitState>,
    ) -> anyhow::Result<()> {
        let mut queue = VecDeque::from([start.clone()]);

        while let Some(cid) = queue.pop_front() {
            let state = states.entry(cid.clone()).or_insert(VisitState::empty());
            if state.contains(flag) {
                continue;
            }
            *state |= flag;

            queue.extend((self.loader)(&cid)?.parents);
        }

        Ok(())
    }

    /// A common ancestor that is a strict ancestor of another common
    /// ancestor is redundant.
    fn redundant_candidates(&self, common: &HashSet<Cid>) -> anyhow::Result<HashSet<Cid>> {
        let mut redundant = HashSet::new();

        for candidate in common {
            let mut queue: VecDeque<Cid> = (self.loader)(candidate)?.parents.into();
            let mut seen = HashSet::new();

            while let Some(cid) = queue.pop_front() {
                if !seen.insert(cid.clone()) {
                    continue;
                }
                if common.contains(&cid) {
                    redundant.insert(cid.clone());
                }
                queue.extend((self.loader)(&cid)?.parents);
            }
        }

        Ok(redundant)
    }
}
