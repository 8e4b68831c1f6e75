use crate::model::Record;
use std::cmp::{Ordering, Reverse};

/// Where a query matched. Lower ranks sort first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Tier {
    Name,
    Content,
}

/// Case-insensitive substring search over `records`.
///
/// Name matches always outrank content matches; inside a tier the newest
/// record comes first. Header-less records have no creation time and sort
/// after dated ones, ties broken by path so the order is stable.
pub fn rank(records: Vec<Record>, query: &str, limit: usize) -> Vec<Record> {
    let query = query.to_lowercase();

    let mut matches: Vec<(Tier, Record)> = records
        .into_iter()
        .filter_map(|record| {
            let tier = if record.name().to_lowercase().contains(&query) {
                Tier::Name
            } else if record.content.to_lowercase().contains(&query) {
                Tier::Content
            } else {
                return None;
            };
            Some((tier, record))
        })
        .collect();

    matches.sort_by(|(tier_a, a), (tier_b, b)| match tier_a.cmp(tier_b) {
        Ordering::Equal => Reverse(a.created_at())
            .cmp(&Reverse(b.created_at()))
            .then_with(|| a.path.cmp(&b.path)),
        ord => ord,
    });

    matches
        .into_iter()
        .take(limit)
        .map(|(_, record)| record)
        .collect()
}
