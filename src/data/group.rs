use std::collections::HashMap;

use super::model::NormalizedRecord;
use super::stats::DispersionStats;

// ---------------------------------------------------------------------------
// PartGroups – records partitioned by identifier
// ---------------------------------------------------------------------------

/// Records partitioned by exact `part_id`, identifiers in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct PartGroups {
    groups: Vec<(String, Vec<NormalizedRecord>)>,
    index: HashMap<String, usize>,
}

impl PartGroups {
    pub fn get(&self, part_id: &str) -> Option<&[NormalizedRecord]> {
        self.index
            .get(part_id)
            .map(|&i| self.groups[i].1.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[NormalizedRecord])> {
        self.groups.iter().map(|(id, m)| (id.as_str(), m.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Single pass partition. Keys are compared case-sensitively with no
/// trimming; members keep their input order.
pub fn group_by_identifier(records: &[NormalizedRecord]) -> PartGroups {
    let mut out = PartGroups::default();
    for record in records {
        match out.index.get(&record.part_id) {
            Some(&i) => out.groups[i].1.push(record.clone()),
            None => {
                out.index.insert(record.part_id.clone(), out.groups.len());
                out.groups.push((record.part_id.clone(), vec![record.clone()]));
            }
        }
    }
    out
}

// ---------------------------------------------------------------------------
// PartGroup – one identifier with its dispersion
// ---------------------------------------------------------------------------

/// A part with all its rows. `stats` is present only with two or more members.
#[derive(Debug, Clone, PartialEq)]
pub struct PartGroup {
    pub part_id: String,
    pub members: Vec<NormalizedRecord>,
    pub stats: Option<DispersionStats>,
}

impl PartGroup {
    pub fn new<F>(part_id: &str, members: &[NormalizedRecord], metric: F) -> Self
    where
        F: Fn(&NormalizedRecord) -> f64,
    {
        let stats = if members.len() >= 2 {
            DispersionStats::compute(members, metric)
        } else {
            None
        };
        Self {
            part_id: part_id.to_string(),
            members: members.to_vec(),
            stats,
        }
    }

    /// Member locations joined for display, in member order.
    pub fn joined_locations(&self) -> String {
        self.members
            .iter()
            .map(|m| m.location.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Every group, with stats computed where defined.
pub fn part_groups<F>(groups: &PartGroups, metric: F) -> Vec<PartGroup>
where
    F: Fn(&NormalizedRecord) -> f64 + Copy,
{
    groups
        .iter()
        .map(|(id, members)| PartGroup::new(id, members, metric))
        .collect()
}

/// Parts that occur in two or more rows.
pub fn duplicates_only<F>(groups: &PartGroups, metric: F) -> Vec<PartGroup>
where
    F: Fn(&NormalizedRecord) -> f64 + Copy,
{
    groups
        .iter()
        .filter(|(_, members)| members.len() >= 2)
        .map(|(id, members)| PartGroup::new(id, members, metric))
        .collect()
}
