//! Group partitioning by protected attribute
//!
//! Groups come out in order of first appearance in the dataset, so every
//! downstream mapping has a deterministic order independent of hashing.

use crate::dataset::Record;
use std::collections::HashMap;

/// Records sharing one protected-attribute value (borrowed, not copied)
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSubset<'a> {
    pub name: &'a str,
    pub records: Vec<&'a Record>,
}

impl<'a> GroupSubset<'a> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Raw scores in record order
    pub fn scores(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.score).collect()
    }

    /// Number of records labelled high risk
    pub fn high_risk_count(&self) -> usize {
        self.records.iter().filter(|r| r.high_risk).count()
    }
}

/// Split records into one subset per distinct group value
pub fn partition(records: &[Record]) -> Vec<GroupSubset<'_>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<GroupSubset<'_>> = Vec::new();

    for record in records {
        let slot = *index.entry(record.group.as_str()).or_insert_with(|| {
            groups.push(GroupSubset {
                name: record.group.as_str(),
                records: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].records.push(record);
    }

    groups
}

/// Groups ordered by descending size
///
/// The sort is stable, so groups of equal size keep their first-appearance
/// order. This is the tie-break for "the two largest groups".
pub fn by_descending_size<'s, 'a>(groups: &'s [GroupSubset<'a>]) -> Vec<&'s GroupSubset<'a>> {
    let mut sorted: Vec<&GroupSubset<'a>> = groups.iter().collect();
    sorted.sort_by(|a, b| b.len().cmp(&a.len()));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(group: &str, score: f64) -> Record {
        Record::new(group, false, score, 7.0)
    }

    #[test]
    fn test_partition_first_appearance_order() {
        let records = vec![
            record("Caucasian", 3.0),
            record("African-American", 8.0),
            record("Caucasian", 9.0),
            record("Hispanic", 1.0),
        ];
        let groups = partition(&records);

        let names: Vec<&str> = groups.iter().map(|g| g.name).collect();
        assert_eq!(names, vec!["Caucasian", "African-American", "Hispanic"]);
        assert_eq!(groups[0].len(), 2);
        assert_eq!(groups[0].scores(), vec![3.0, 9.0]);
        assert_eq!(groups[0].high_risk_count(), 1);
    }

    #[test]
    fn test_partition_preserves_record_identity() {
        let records = vec![record("A", 1.0), record("B", 2.0)];
        let groups = partition(&records);
        assert!(std::ptr::eq(groups[1].records[0], &records[1]));
    }

    #[test]
    fn test_partition_empty() {
        assert!(partition(&[]).is_empty());
    }

    #[test]
    fn test_descending_size_tie_break() {
        let records = vec![
            record("A", 1.0),
            record("B", 1.0),
            record("C", 1.0),
            record("C", 1.0),
            record("B", 1.0),
        ];
        let groups = partition(&records);
        let sorted = by_descending_size(&groups);
        let names: Vec<&str> = sorted.iter().map(|g| g.name).collect();
        // B and C tie at 2; B appeared first
        assert_eq!(names, vec!["B", "C", "A"]);
    }
}
