///! In-memory NEO database
///!
///! Owns both record collections and the linkage index. Built once from the
///! readers' output and read-only afterwards.

use neo_common::{CloseApproach, NearEarthObject};
use std::collections::HashMap;
use std::ops::Deref;
use tracing::{info, warn};

use crate::linkage::{ApproachId, Linkage, NeoId, dedup_by_designation};

/// Linked collection of NEOs and close approaches
pub struct NeoDatabase {
    /// NEOs in input order, designations unique
    neos: Vec<NearEarthObject>,

    /// Close approaches in input order
    approaches: Vec<CloseApproach>,

    /// Designation index and NEO ↔ approach relation
    linkage: Linkage,

    /// Name index for NEOs with a name
    by_name: HashMap<String, NeoId>,
}

impl NeoDatabase {
    /// Link `neos` and `approaches` and build the lookup indices.
    ///
    /// NEOs with a blank designation and later records with an already-seen
    /// designation are dropped. Approaches whose designation matches no NEO
    /// are kept, unlinked.
    pub fn new(mut neos: Vec<NearEarthObject>, approaches: Vec<CloseApproach>) -> Self {
        let before = neos.len();
        neos.retain(|neo| !neo.designation().trim().is_empty());
        if neos.len() < before {
            warn!("Dropped {} NEOs with a blank designation", before - neos.len());
        }

        let duplicates = dedup_by_designation(&mut neos);
        if duplicates > 0 {
            warn!("Dropped {} NEOs with duplicate designations", duplicates);
        }

        let linkage = Linkage::build(&neos, &approaches);

        let mut by_name = HashMap::new();
        for (index, neo) in neos.iter().enumerate() {
            if let Some(name) = neo.name() {
                by_name
                    .entry(name.to_string())
                    .or_insert(NeoId::from_index(index));
            }
        }

        let db = Self {
            neos,
            approaches,
            linkage,
            by_name,
        };

        info!("NEO database ready: {}", db.stats());
        db
    }

    /// Exact, case-sensitive designation lookup
    pub fn get_neo_by_designation(&self, designation: &str) -> Option<NeoView<'_>> {
        self.linkage.neo_id(designation).map(|id| self.neo(id))
    }

    /// Exact, case-sensitive name lookup; unnamed NEOs are never found
    pub fn get_neo_by_name(&self, name: &str) -> Option<NeoView<'_>> {
        if name.is_empty() {
            return None;
        }
        self.by_name.get(name).map(|&id| self.neo(id))
    }

    /// All NEOs in storage order
    pub fn neos(&self) -> impl ExactSizeIterator<Item = NeoView<'_>> + '_ {
        (0..self.neos.len()).map(move |index| self.neo(NeoId::from_index(index)))
    }

    /// All close approaches in storage order
    pub fn approaches(&self) -> impl ExactSizeIterator<Item = ApproachView<'_>> + '_ {
        (0..self.approaches.len()).map(move |index| self.approach(ApproachId::from_index(index)))
    }

    pub fn neo_count(&self) -> usize {
        self.neos.len()
    }

    pub fn approach_count(&self) -> usize {
        self.approaches.len()
    }

    pub fn stats(&self) -> DatabaseStats {
        DatabaseStats {
            total_neos: self.neos.len(),
            total_approaches: self.approaches.len(),
            orphan_approaches: self.linkage.orphan_count(),
            neos_with_approaches: self.linkage.linked_neo_count(),
        }
    }

    fn neo(&self, id: NeoId) -> NeoView<'_> {
        NeoView { db: self, id }
    }

    fn approach(&self, id: ApproachId) -> ApproachView<'_> {
        ApproachView { db: self, id }
    }
}

/// Borrowed handle to a NEO in the database
#[derive(Clone, Copy)]
pub struct NeoView<'a> {
    db: &'a NeoDatabase,
    id: NeoId,
}

impl<'a> NeoView<'a> {
    pub fn id(self) -> NeoId {
        self.id
    }

    pub fn record(self) -> &'a NearEarthObject {
        &self.db.neos[self.id.index()]
    }

    /// Close approaches of this NEO, in input order
    pub fn approaches(self) -> impl ExactSizeIterator<Item = ApproachView<'a>> {
        let db = self.db;
        db.linkage
            .approaches_of(self.id)
            .iter()
            .map(move |&id| db.approach(id))
    }
}

impl Deref for NeoView<'_> {
    type Target = NearEarthObject;

    fn deref(&self) -> &NearEarthObject {
        self.record()
    }
}

impl PartialEq for NeoView<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.record() == other.record()
    }
}

impl PartialEq<NearEarthObject> for NeoView<'_> {
    fn eq(&self, other: &NearEarthObject) -> bool {
        self.record() == other
    }
}

impl std::fmt::Debug for NeoView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NeoView")
            .field("id", &self.id)
            .field("neo", self.record())
            .finish()
    }
}

impl std::fmt::Display for NeoView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.record())
    }
}

/// Borrowed handle to a close approach in the database
#[derive(Clone, Copy)]
pub struct ApproachView<'a> {
    db: &'a NeoDatabase,
    id: ApproachId,
}

impl<'a> ApproachView<'a> {
    pub fn id(self) -> ApproachId {
        self.id
    }

    pub fn record(self) -> &'a CloseApproach {
        &self.db.approaches[self.id.index()]
    }

    /// The approaching NEO, or None for an orphan approach
    pub fn neo(self) -> Option<NeoView<'a>> {
        self.db.linkage.neo_of(self.id).map(|id| self.db.neo(id))
    }
}

impl Deref for ApproachView<'_> {
    type Target = CloseApproach;

    fn deref(&self) -> &CloseApproach {
        self.record()
    }
}

impl PartialEq for ApproachView<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.db, other.db) && self.id == other.id
    }
}

impl std::fmt::Debug for ApproachView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApproachView")
            .field("id", &self.id)
            .field("approach", self.record())
            .finish()
    }
}

impl std::fmt::Display for ApproachView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.neo() {
            Some(neo) => write!(f, "{}", self.record().describe_as(&neo.fullname())),
            None => write!(f, "{}", self.record()),
        }
    }
}

/// Database statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseStats {
    pub total_neos: usize,
    pub total_approaches: usize,
    pub orphan_approaches: usize,
    pub neos_with_approaches: usize,
}

impl std::fmt::Display for DatabaseStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "NEOs: {}, Approaches: {}, Orphan approaches: {}, NEOs with approaches: {}",
            self.total_neos,
            self.total_approaches,
            self.orphan_approaches,
            self.neos_with_approaches
        )
    }
}
