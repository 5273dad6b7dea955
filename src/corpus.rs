use crate::metrics::Metrics;
use crate::model::{CourseRecord, RawCourse};
use crate::platform;
use crate::scoring::ScoringTable;
use rayon::prelude::*;
use serde::Serialize;

/// Courses rating at least this many stars land on the advanced track.
const ADVANCED_TRACK_MIN_STARS: u8 = 4;

/// The in-memory course table. Built once at startup, read-only afterwards,
/// so concurrent ranking against it needs no locking.
#[derive(Debug, Default)]
pub struct Corpus {
    records: Vec<CourseRecord>,
    table_version: &'static str,
}

impl Corpus {
    /// Scores and platform-normalizes already-parsed rows into the corpus.
    /// Rows without a title are dropped and counted; an explicit source
    /// label wins over URL-derived platform detection.
    pub fn build(rows: Vec<RawCourse>, table: &ScoringTable, metrics: &Metrics) -> Self {
        let records: Vec<CourseRecord> = rows
            .into_par_iter()
            .filter_map(|row| {
                let Some(title) = row.title else {
                    metrics.record_course_skipped();
                    return None;
                };

                let star_rating = table.score_title(Some(&title));
                let platform = match &row.source {
                    Some(source) => source.clone(),
                    None => platform::normalize_platform(row.url.as_deref()),
                };
                let url = row.url.unwrap_or_else(|| "#".to_string());

                let mut record = CourseRecord::new(title, url, platform, star_rating);
                if let Some(subscribers) = row.subscribers {
                    record = record.with_subscribers(subscribers);
                }
                if let Some(price) = row.price {
                    record = record.with_price(price);
                }
                Some(record)
            })
            .collect();

        Self {
            records,
            table_version: table.version(),
        }
    }

    pub fn records(&self) -> &[CourseRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub const fn table_version(&self) -> &'static str {
        self.table_version
    }

    /// Free courses, best-rated first.
    pub fn free_courses(&self, limit: usize) -> Vec<&CourseRecord> {
        let mut free: Vec<&CourseRecord> = self.records.iter().filter(|r| r.is_free()).collect();
        free.sort_by(|a, b| {
            b.star_rating()
                .cmp(&a.star_rating())
                .then_with(|| a.title().cmp(b.title()))
        });
        free.truncate(limit);
        free
    }

    /// The learning-path split: a foundation track and an advanced track,
    /// separated by star rating alone.
    pub fn learning_paths(&self) -> LearningPaths<'_> {
        let (advanced, foundation) = self
            .records
            .iter()
            .partition(|r| r.star_rating() >= ADVANCED_TRACK_MIN_STARS);
        LearningPaths { foundation, advanced }
    }

    #[cfg(test)]
    pub(crate) fn from_records(records: Vec<CourseRecord>) -> Self {
        Self {
            records,
            table_version: "test",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LearningPaths<'a> {
    foundation: Vec<&'a CourseRecord>,
    advanced: Vec<&'a CourseRecord>,
}

impl<'a> LearningPaths<'a> {
    pub fn foundation(&self) -> &[&'a CourseRecord] {
        &self.foundation
    }

    pub fn advanced(&self) -> &[&'a CourseRecord] {
        &self.advanced
    }
}
