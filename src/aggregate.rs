//! Per-language running totals.

use std::collections::BTreeMap;

use crate::classify::FileStats;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AggregateStats {
    pub files: u64,
    pub total: u64,
    pub empty: u64,
    pub comment: u64,
    pub code: u64,
}

impl AggregateStats {
    fn add_file(&mut self, stats: FileStats) {
        self.files += 1;
        self.total += stats.total;
        self.empty += stats.empty;
        self.comment += stats.comment;
        self.code += stats.code;
    }

    fn merge(&mut self, other: &AggregateStats) {
        self.files += other.files;
        self.total += other.total;
        self.empty += other.empty;
        self.comment += other.comment;
        self.code += other.code;
    }
}

/// Language name to totals. Iteration is ordered by language name.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Aggregate {
    languages: BTreeMap<&'static str, AggregateStats>,
}

impl Aggregate {
    pub fn fold(&mut self, language: &'static str, stats: FileStats) {
        self.languages.entry(language).or_default().add_file(stats);
    }

    #[cfg(test)]
    pub fn get(&self, language: &str) -> Option<&AggregateStats> {
        self.languages.get(language)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &AggregateStats)> + '_ {
        self.languages.iter().map(|(name, stats)| (*name, stats))
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    pub fn grand_total(&self) -> AggregateStats {
        self.languages
            .values()
            .fold(AggregateStats::default(), |mut acc, stats| {
                acc.merge(stats);
                acc
            })
    }
}
