///! Linkage index between NEOs and their close approaches
///!
///! Records are stored in plain vectors owned by the database. The linkage
///! index relates them by position, so neither record type holds a pointer
///! to the other:
///! - designation → NEO (primary index, also the join table)
///! - approach → NEO (back-reference, absent for orphans)
///! - NEO → approaches (in input order)

use neo_common::{CloseApproach, NearEarthObject};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Position of a NEO in the database's NEO collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NeoId(usize);

/// Position of an approach in the database's approach collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ApproachId(usize);

impl NeoId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl ApproachId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// Bidirectional association between NEOs and approaches, built once.
#[derive(Debug, Clone, Default)]
pub struct Linkage {
    by_designation: HashMap<String, NeoId>,
    neo_of: Vec<Option<NeoId>>,
    approaches_of: Vec<Vec<ApproachId>>,
    orphans: usize,
}

impl Linkage {
    /// Link `approaches` to `neos` by designation in O(N + M).
    ///
    /// `neos` must not contain duplicate designations (see [`dedup_by_designation`]);
    /// if it does, the first occurrence owns the designation.
    pub fn build(neos: &[NearEarthObject], approaches: &[CloseApproach]) -> Self {
        let mut by_designation = HashMap::with_capacity(neos.len());
        for (index, neo) in neos.iter().enumerate() {
            by_designation
                .entry(neo.designation().to_string())
                .or_insert(NeoId(index));
        }

        let mut neo_of = Vec::with_capacity(approaches.len());
        let mut approaches_of = vec![Vec::new(); neos.len()];
        let mut orphans = 0;

        for (index, approach) in approaches.iter().enumerate() {
            match by_designation.get(approach.designation()) {
                Some(&neo_id) => {
                    approaches_of[neo_id.0].push(ApproachId(index));
                    neo_of.push(Some(neo_id));
                }
                None => {
                    orphans += 1;
                    neo_of.push(None);
                }
            }
        }

        debug!(
            "Linked {} approaches to {} NEOs, {} orphans",
            approaches.len() - orphans,
            neos.len(),
            orphans
        );

        Self {
            by_designation,
            neo_of,
            approaches_of,
            orphans,
        }
    }

    /// Look up a NEO by exact designation
    pub fn neo_id(&self, designation: &str) -> Option<NeoId> {
        self.by_designation.get(designation).copied()
    }

    /// The NEO an approach belongs to, if it resolved
    pub fn neo_of(&self, approach: ApproachId) -> Option<NeoId> {
        self.neo_of.get(approach.0).copied().flatten()
    }

    /// Approaches of a NEO, in input order
    pub fn approaches_of(&self, neo: NeoId) -> &[ApproachId] {
        self.approaches_of
            .get(neo.0)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of approaches whose designation matched no NEO
    pub fn orphan_count(&self) -> usize {
        self.orphans
    }

    /// Number of NEOs with at least one approach
    pub fn linked_neo_count(&self) -> usize {
        self.approaches_of.iter().filter(|a| !a.is_empty()).count()
    }
}

/// Drop NEOs whose designation was already seen, keeping the first.
///
/// Returns the number of records dropped.
pub fn dedup_by_designation(neos: &mut Vec<NearEarthObject>) -> usize {
    let before = neos.len();
    let mut seen = HashSet::with_capacity(neos.len());

    neos.retain(|neo| {
        if seen.insert(neo.designation().to_string()) {
            true
        } else {
            warn!("Dropping duplicate NEO designation '{}'", neo.designation());
            false
        }
    });

    before - neos.len()
}
