//! Singleton recruiter: the second pass over every record, run exactly
//! once after phase 1 has completed and the `PatternSet` is frozen. Reads
//! that slipped past both scanners but contain a single known repeat are
//! recovered here. No QC is applied — membership in the frozen pattern set
//! is treated as authority.

use log::error;

use crate::index::{PatternSet, ReadIndex, SeenReadIds};
use crate::pattern::MultiPattern;
use crate::read_holder::ReadHolder;
use crate::record::Record;

/// Scan every record in `records` once. Publishes a single-interval
/// `ReadHolder` into `index` for any record whose id is not already in
/// `seen` and that contains one of `patterns`' strings, recording its id in
/// `seen` as it goes. If `patterns` is empty, logs and returns `0` without
/// touching anything, per the "no patterns for recruiter" error case.
/// Returns the number of reads newly published.
pub fn recruit(records: &[Record], patterns: &PatternSet, seen: &mut SeenReadIds, index: &mut ReadIndex) -> usize {
    if patterns.is_empty() {
        error!("singleton recruiter: pattern set is empty, skipping phase 2");
        return 0;
    }
    let Some(searcher) = MultiPattern::new(patterns.patterns().to_vec()) else {
        error!("singleton recruiter: pattern set contains only empty patterns, skipping phase 2");
        return 0;
    };

    let mut published = 0usize;
    for record in records {
        if seen.contains(&record.id) {
            continue;
        }

        // Build the holder first so the search runs against the same
        // normalized (upper-cased, non-ACGT-folded-to-N) sequence the
        // patterns were interned from; searching the raw record would miss
        // every lowercase read.
        let mut holder = ReadHolder::new(
            record.id.clone(),
            record.seq.clone(),
            record.comment.clone(),
            record.quality.clone(),
        );

        let Some((matched, start)) = searcher.search(&holder.seq) else {
            continue;
        };

        let l = holder.seq_len();
        let end = (start + matched.len()).min(l);
        if start >= end {
            continue;
        }

        holder.start_stops_add(start, end);
        holder.repeat_len = end - start;

        if holder.validate().is_err() {
            error!("singleton recruiter: {} failed invariant validation, dropping", record.id);
            continue;
        }

        seen.insert(record.id.clone());
        index.insert(holder);
        published += 1;
    }
    published
}
