//! Cross-Partition Aggregation
//!
//! Pure single-pass computations over partition-tagged records. Nothing
//! is cached; callers recompute per request. BTreeMaps keep the JSON
//! output deterministically ordered.

use std::collections::BTreeMap;

use crate::domain::record::TaggedRecord;

/// Count of records by severity, per server
pub fn severity_by_server(records: &[TaggedRecord]) -> BTreeMap<String, BTreeMap<String, u64>> {
    let mut out: BTreeMap<String, BTreeMap<String, u64>> = BTreeMap::new();
    for tagged in records {
        *out.entry(tagged.server.clone())
            .or_default()
            .entry(tagged.record.log_level.as_str().to_string())
            .or_default() += 1;
    }
    out
}

/// Count of records by HTTP method, per server
pub fn methods_by_server(records: &[TaggedRecord]) -> BTreeMap<String, BTreeMap<String, u64>> {
    let mut out: BTreeMap<String, BTreeMap<String, u64>> = BTreeMap::new();
    for tagged in records {
        *out.entry(tagged.server.clone())
            .or_default()
            .entry(tagged.record.method.clone())
            .or_default() += 1;
    }
    out
}

/// Mean response time in milliseconds per (server, path)
pub fn mean_response_times(records: &[TaggedRecord]) -> BTreeMap<String, BTreeMap<String, f64>> {
    let mut sums: BTreeMap<String, BTreeMap<String, (i64, u64)>> = BTreeMap::new();
    for tagged in records {
        let (sum, count) = sums
            .entry(tagged.server.clone())
            .or_default()
            .entry(tagged.record.path.clone())
            .or_insert((0, 0));
        *sum += tagged.record.response_time_ms;
        *count += 1;
    }

    sums.into_iter()
        .map(|(server, paths)| {
            let means = paths
                .into_iter()
                .map(|(path, (sum, count))| (path, sum as f64 / count as f64))
                .collect();
            (server, means)
        })
        .collect()
}

/// Total record count per server
pub fn counts_by_server(records: &[TaggedRecord]) -> BTreeMap<String, u64> {
    let mut out: BTreeMap<String, u64> = BTreeMap::new();
    for tagged in records {
        *out.entry(tagged.server.clone()).or_default() += 1;
    }
    out
}
