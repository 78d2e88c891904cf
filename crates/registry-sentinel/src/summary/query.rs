use super::domain::{AnomalyFlag, GroupKey, SummaryRecord, ValueField};
use super::loader::SummarySnapshot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Matching mode for pincode search. Exact is the default; contains opts in
/// to substring containment against the normalized pincode text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PincodeMatch {
    #[default]
    Exact,
    Contains,
}

/// Result of a pincode search. A miss is an ordinary value; it is never an
/// error and never confused with a match carrying empty fields.
#[derive(Debug, PartialEq)]
pub enum PincodeLookup<'a> {
    Found(Vec<&'a SummaryRecord>),
    NotFound,
}

impl<'a> PincodeLookup<'a> {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn records(&self) -> &[&'a SummaryRecord] {
        match self {
            Self::Found(records) => records,
            Self::NotFound => &[],
        }
    }
}

/// One ranked bar of a grouped aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupTally {
    pub group: String,
    pub value: u64,
}

impl SummarySnapshot {
    /// Rows carrying the given flag, in original table order. The anomalous
    /// and normal subsets partition the snapshot.
    pub fn filter_by_anomaly(&self, flag: AnomalyFlag) -> Vec<&SummaryRecord> {
        self.records()
            .iter()
            .filter(|record| record.flag == flag)
            .collect()
    }

    pub fn lookup_by_pincode(&self, query: &str, mode: PincodeMatch) -> PincodeLookup<'_> {
        let query = query.trim();
        if query.is_empty() {
            return PincodeLookup::NotFound;
        }

        let matches: Vec<&SummaryRecord> = self
            .records()
            .iter()
            .filter(|record| match mode {
                PincodeMatch::Exact => record.pincode == query,
                PincodeMatch::Contains => record.pincode.contains(query),
            })
            .collect();

        if matches.is_empty() {
            PincodeLookup::NotFound
        } else {
            PincodeLookup::Found(matches)
        }
    }
}

/// Row count per group value. BTreeMap keeps group order deterministic.
pub fn count_by_group(rows: &[&SummaryRecord], key: GroupKey) -> BTreeMap<String, u64> {
    let mut tallies = BTreeMap::new();
    for record in rows {
        *tallies.entry(key.value(record).to_string()).or_insert(0) += 1;
    }
    tallies
}

/// Sum of a numeric field per group value.
pub fn sum_by_group(
    rows: &[&SummaryRecord],
    key: GroupKey,
    field: ValueField,
) -> BTreeMap<String, u64> {
    let mut tallies = BTreeMap::new();
    for record in rows {
        *tallies.entry(key.value(record).to_string()).or_insert(0) += field.value(record);
    }
    tallies
}

/// Top-N projection of a grouped aggregate: value descending, ties broken by
/// group key ascending so chart order is reproducible.
pub fn rank_groups(tallies: &BTreeMap<String, u64>, limit: usize) -> Vec<GroupTally> {
    let mut ranked: Vec<GroupTally> = tallies
        .iter()
        .map(|(group, value)| GroupTally {
            group: group.clone(),
            value: *value,
        })
        .collect();

    ranked.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.group.cmp(&b.group)));
    ranked.truncate(limit);
    ranked
}

/// The priority audit list: anomalous rows ordered by update volume
/// descending, ties broken by pincode ascending.
pub fn rank_priority_audit<'a>(
    rows: &[&'a SummaryRecord],
    limit: usize,
) -> Vec<&'a SummaryRecord> {
    let mut ranked = rows.to_vec();
    ranked.sort_by(|a, b| {
        b.total_updates
            .cmp(&a.total_updates)
            .then_with(|| a.pincode.cmp(&b.pincode))
    });
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sample_snapshot() -> SummarySnapshot {
        let csv = "state,district,pincode,total_updates,is_anomaly\n\
                   Delhi,New Delhi,110001,500,-1\n\
                   Delhi,Central Delhi,110002,300,-1\n\
                   West Bengal,Kolkata,700102,410,1\n\
                   West Bengal,Kolkata,7001020,410,1\n\
                   Bihar,Patna,800001,90,1\n";
        SummarySnapshot::from_reader(Cursor::new(csv)).expect("sample loads")
    }

    #[test]
    fn anomaly_filters_partition_the_table() {
        let snapshot = sample_snapshot();
        let anomalous = snapshot.filter_by_anomaly(AnomalyFlag::Anomalous);
        let safe = snapshot.filter_by_anomaly(AnomalyFlag::Normal);

        assert_eq!(anomalous.len(), 2);
        assert_eq!(safe.len(), 3);
        assert_eq!(anomalous.len() + safe.len(), snapshot.len());

        let anomalous_pincodes: Vec<&str> = anomalous.iter().map(|r| r.pincode.as_str()).collect();
        assert_eq!(anomalous_pincodes, ["110001", "110002"]);
    }

    #[test]
    fn group_counts_split_and_recombine() {
        let snapshot = sample_snapshot();
        let all: Vec<&_> = snapshot.records().iter().collect();
        let anomalous = snapshot.filter_by_anomaly(AnomalyFlag::Anomalous);
        let safe = snapshot.filter_by_anomaly(AnomalyFlag::Normal);

        let full = count_by_group(&all, GroupKey::State);
        let flagged = count_by_group(&anomalous, GroupKey::State);
        let normal = count_by_group(&safe, GroupKey::State);

        for (state, count) in &full {
            let split = flagged.get(state).copied().unwrap_or(0)
                + normal.get(state).copied().unwrap_or(0);
            assert_eq!(*count, split, "state {state} counts must recombine");
        }
    }

    #[test]
    fn sums_accumulate_the_requested_field() {
        let snapshot = sample_snapshot();
        let safe = snapshot.filter_by_anomaly(AnomalyFlag::Normal);
        let sums = sum_by_group(&safe, GroupKey::State, ValueField::TotalUpdates);

        assert_eq!(sums.get("West Bengal"), Some(&820));
        assert_eq!(sums.get("Bihar"), Some(&90));
    }

    #[test]
    fn ranked_groups_break_ties_by_key() {
        let mut tallies = BTreeMap::new();
        tallies.insert("Punjab".to_string(), 4);
        tallies.insert("Assam".to_string(), 4);
        tallies.insert("Goa".to_string(), 9);

        let ranked = rank_groups(&tallies, 10);
        let order: Vec<&str> = ranked.iter().map(|t| t.group.as_str()).collect();
        assert_eq!(order, ["Goa", "Assam", "Punjab"]);

        assert_eq!(rank_groups(&tallies, 1).len(), 1);
        assert!(rank_groups(&tallies, 0).is_empty());
    }

    #[test]
    fn priority_audit_orders_by_volume_then_pincode() {
        let snapshot = sample_snapshot();
        let anomalous = snapshot.filter_by_anomaly(AnomalyFlag::Anomalous);

        let ranked = rank_priority_audit(&anomalous, 25);
        let pincodes: Vec<&str> = ranked.iter().map(|r| r.pincode.as_str()).collect();
        assert_eq!(pincodes, ["110001", "110002"]);

        assert_eq!(rank_priority_audit(&anomalous, 1)[0].pincode, "110001");
        assert!(rank_priority_audit(&anomalous, 0).is_empty());
    }

    #[test]
    fn priority_audit_is_idempotent_under_resorting() {
        let snapshot = sample_snapshot();
        let anomalous = snapshot.filter_by_anomaly(AnomalyFlag::Anomalous);

        let once = rank_priority_audit(&anomalous, 25);
        let twice = rank_priority_audit(&once, 25);
        assert_eq!(once, twice);
    }

    #[test]
    fn ties_in_update_volume_rank_by_pincode() {
        let snapshot = sample_snapshot();
        let safe = snapshot.filter_by_anomaly(AnomalyFlag::Normal);

        let ranked = rank_priority_audit(&safe, 2);
        let pincodes: Vec<&str> = ranked.iter().map(|r| r.pincode.as_str()).collect();
        assert_eq!(pincodes, ["700102", "7001020"]);
    }

    #[test]
    fn exact_lookup_excludes_superstrings() {
        let snapshot = sample_snapshot();

        let exact = snapshot.lookup_by_pincode("700102", PincodeMatch::Exact);
        assert_eq!(exact.records().len(), 1);
        assert_eq!(exact.records()[0].pincode, "700102");

        let contains = snapshot.lookup_by_pincode("700102", PincodeMatch::Contains);
        let pincodes: Vec<&str> = contains.records().iter().map(|r| r.pincode.as_str()).collect();
        assert_eq!(pincodes, ["700102", "7001020"]);
    }

    #[test]
    fn lookup_miss_is_a_value_not_an_error() {
        let snapshot = sample_snapshot();
        let miss = snapshot.lookup_by_pincode("999999", PincodeMatch::Exact);
        assert_eq!(miss, PincodeLookup::NotFound);
        assert!(!miss.is_found());
        assert!(miss.records().is_empty());

        assert_eq!(
            snapshot.lookup_by_pincode("  ", PincodeMatch::Contains),
            PincodeLookup::NotFound
        );
    }
}
