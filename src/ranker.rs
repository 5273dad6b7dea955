use crate::corpus::Corpus;
use crate::model::{CourseRecord, Level};
use serde::Serialize;
use std::cmp::Ordering;

pub const WEIGHT_RELEVANCE: f64 = 0.4;
pub const WEIGHT_QUALITY: f64 = 0.5;
pub const WEIGHT_LEVEL: f64 = 0.3;

/// Quality score assigned to every record when the filtered subset has no
/// rating spread (including a subset of one), where min-max is undefined.
const FLAT_QUALITY_SCORE: f64 = 0.5;

const BEGINNER_KEYWORDS: &[&str] = &[
    "beginner",
    "novice",
    "from scratch",
    "introduction",
    "basic",
    "zero",
    "principiantes",
    "desde cero",
    "introducción",
    "básico",
    "intro",
    "cero",
];

const INTERMEDIATE_KEYWORDS: &[&str] = &[
    "intermediate",
    "masterclass",
    "complete",
    "advanced",
    "total",
    "intermedio",
    "completo",
    "avanzado",
];

/// A course with its per-query scores. Derived per request, never written
/// back into the corpus.
#[derive(Debug, Clone, Serialize)]
pub struct RankedCourse {
    #[serde(flatten)]
    course: CourseRecord,
    relevance_score: f64,
    quality_score: f64,
    level_score: f64,
    final_score: f64,
}

impl RankedCourse {
    pub fn course(&self) -> &CourseRecord {
        &self.course
    }

    #[allow(dead_code)]
    pub const fn relevance_score(&self) -> f64 {
        self.relevance_score
    }

    #[allow(dead_code)]
    pub const fn quality_score(&self) -> f64 {
        self.quality_score
    }

    #[allow(dead_code)]
    pub const fn level_score(&self) -> f64 {
        self.level_score
    }

    pub const fn final_score(&self) -> f64 {
        self.final_score
    }
}

/// Ranks the corpus for a query with optional level and platform filters.
///
/// An empty or whitespace query returns nothing rather than an unranked
/// table dump. Relevance rewards titles the query occupies a large fraction
/// of; quality is the star rating min-max normalized over the filtered
/// subset, so it is relative to the current result set, not global; a
/// requested level adds a fixed reward when the title carries one of that
/// level's keywords. Ordering is deterministic: final score descending,
/// then stars descending, then title.
pub fn rank(
    corpus: &Corpus,
    query: &str,
    level: Option<Level>,
    platform: Option<&str>,
    limit: usize,
) -> Vec<RankedCourse> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    let filtered: Vec<&CourseRecord> = corpus
        .records()
        .iter()
        .filter(|r| r.title_lower().contains(&query))
        .filter(|r| platform.is_none_or(|p| r.platform().eq_ignore_ascii_case(p)))
        .collect();

    if filtered.is_empty() {
        return Vec::new();
    }

    let (min_star, max_star) = filtered.iter().fold((u8::MAX, u8::MIN), |(lo, hi), r| {
        (lo.min(r.star_rating()), hi.max(r.star_rating()))
    });
    let star_spread = f64::from(max_star - min_star);
    let query_chars = query.chars().count() as f64;

    let mut ranked: Vec<RankedCourse> = filtered
        .into_iter()
        .map(|record| {
            let title_chars = record.title_lower().chars().count();
            let relevance_score = if title_chars == 0 {
                0.0
            } else {
                query_chars / title_chars as f64
            };

            let quality_score = if star_spread == 0.0 {
                FLAT_QUALITY_SCORE
            } else {
                f64::from(record.star_rating() - min_star) / star_spread
            };

            let level_score = match level {
                Some(level) if matches_level(record.title_lower(), level) => 1.0,
                _ => 0.0,
            };

            let final_score = WEIGHT_RELEVANCE * relevance_score
                + WEIGHT_QUALITY * quality_score
                + WEIGHT_LEVEL * level_score;

            RankedCourse {
                course: record.clone(),
                relevance_score,
                quality_score,
                level_score,
                final_score,
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.final_score
            .partial_cmp(&a.final_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.course.star_rating().cmp(&a.course.star_rating()))
            .then_with(|| a.course.title().cmp(b.course.title()))
    });
    ranked.truncate(limit);
    ranked
}

/// Interest + level recommendation: the same ranking with a mandatory level.
pub fn recommend(corpus: &Corpus, interest: &str, level: Level, limit: usize) -> Vec<RankedCourse> {
    rank(corpus, interest, Some(level), None, limit)
}

fn matches_level(title_lower: &str, level: Level) -> bool {
    let keywords = match level {
        Level::Beginner => BEGINNER_KEYWORDS,
        Level::Intermediate => INTERMEDIATE_KEYWORDS,
    };
    keywords.iter().any(|keyword| title_lower.contains(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(title: &str, stars: u8) -> CourseRecord {
        CourseRecord::new(title.to_string(), "#".to_string(), "Udemy".to_string(), stars)
    }

    fn corpus(records: Vec<CourseRecord>) -> Corpus {
        Corpus::from_records(records)
    }

    #[test]
    fn masterclass_outranks_beginner_course() {
        let corpus = corpus(vec![
            course("Python Masterclass 2025", 5),
            course("Python for Beginners", 2),
        ]);

        let ranked = rank(&corpus, "python", None, None, 10);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].course().title(), "Python Masterclass 2025");
    }

    #[test]
    fn empty_corpus_yields_empty_result() {
        let ranked = rank(&corpus(vec![]), "java", None, None, 10);
        assert!(ranked.is_empty());
    }

    #[test]
    fn empty_query_yields_empty_result() {
        let corpus = corpus(vec![course("Curso de Java", 3)]);
        assert!(rank(&corpus, "", None, None, 10).is_empty());
        assert!(rank(&corpus, "   ", None, None, 10).is_empty());
    }

    #[test]
    fn results_only_contain_the_query_substring() {
        let corpus = corpus(vec![
            course("Curso de Java", 3),
            course("JavaScript Masterclass", 4),
            course("Curso de Excel", 3),
        ]);

        let ranked = rank(&corpus, "java", None, None, 10);

        assert_eq!(ranked.len(), 2);
        assert!(
            ranked
                .iter()
                .all(|r| r.course().title_lower().contains("java"))
        );
    }

    #[test]
    fn limit_is_respected() {
        let records = (0..20).map(|i| course(&format!("python {i}"), 3)).collect();
        let ranked = rank(&corpus(records), "python", None, None, 7);
        assert_eq!(ranked.len(), 7);
    }

    #[test]
    fn adjacent_results_are_sorted_descending() {
        let records = vec![
            course("Python Masterclass 2025", 5),
            course("Python para principiantes desde cero", 1),
            course("Curso completo de Python y Django", 4),
            course("Python", 3),
        ];
        let ranked = rank(&corpus(records), "python", None, None, 10);

        for pair in ranked.windows(2) {
            assert!(pair[0].final_score() >= pair[1].final_score());
        }
    }

    #[test]
    fn ranking_is_idempotent() {
        let records = vec![
            course("Python Masterclass 2025", 5),
            course("Python para principiantes", 2),
            course("Curso de Python total", 4),
        ];
        let corpus = corpus(records);

        let first = rank(&corpus, "python", Some(Level::Beginner), None, 10);
        let second = rank(&corpus, "python", Some(Level::Beginner), None, 10);

        let titles = |r: &[RankedCourse]| {
            r.iter().map(|c| c.course().title().to_string()).collect::<Vec<_>>()
        };
        assert_eq!(titles(&first), titles(&second));
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.final_score(), b.final_score());
        }
    }

    #[test]
    fn single_match_gets_flat_quality() {
        let corpus = corpus(vec![course("Curso de Kubernetes", 4), course("Otro curso", 1)]);
        let ranked = rank(&corpus, "kubernetes", None, None, 10);

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].quality_score(), FLAT_QUALITY_SCORE);
    }

    #[test]
    fn uniform_ratings_get_flat_quality() {
        let corpus = corpus(vec![course("Python a", 3), course("Python b", 3)]);
        let ranked = rank(&corpus, "python", None, None, 10);
        assert!(ranked.iter().all(|r| r.quality_score() == FLAT_QUALITY_SCORE));
    }

    #[test]
    fn quality_is_normalized_over_the_filtered_subset() {
        let corpus = corpus(vec![
            course("Python alto", 5),
            course("Python medio", 3),
            course("Python bajo", 1),
            // Outside the subset, must not affect min-max:
            course("Excel", 2),
        ]);
        let ranked = rank(&corpus, "python", None, None, 10);

        assert_eq!(ranked[0].quality_score(), 1.0);
        assert_eq!(ranked[1].quality_score(), 0.5);
        assert_eq!(ranked[2].quality_score(), 0.0);
    }

    #[test]
    fn requested_level_rewards_matching_titles() {
        let corpus = corpus(vec![
            course("Python avanzado", 3),
            course("Python para principiantes", 3),
        ]);

        let ranked = rank(&corpus, "python", Some(Level::Beginner), None, 10);

        assert_eq!(ranked[0].course().title(), "Python para principiantes");
        assert_eq!(ranked[0].level_score(), 1.0);
        assert_eq!(ranked[1].level_score(), 0.0);
    }

    #[test]
    fn no_level_means_zero_level_score() {
        let corpus = corpus(vec![course("Python para principiantes", 3)]);
        let ranked = rank(&corpus, "python", None, None, 10);
        assert_eq!(ranked[0].level_score(), 0.0);
    }

    #[test]
    fn platform_filter_is_case_insensitive() {
        let coursera =
            CourseRecord::new("Curso de Python".to_string(), "#".to_string(), "Coursera".to_string(), 3);
        let corpus = corpus(vec![course("Python Masterclass", 4), coursera]);

        let ranked = rank(&corpus, "python", None, Some("coursera"), 10);

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].course().platform(), "Coursera");
    }

    #[test]
    fn ties_break_by_stars_then_title() {
        // Same title length and no level: identical relevance, quality from
        // stars. Force a full tie with uniform stars, then check title order.
        let corpus = corpus(vec![
            course("python bb", 3),
            course("python aa", 3),
        ]);
        let ranked = rank(&corpus, "python", None, None, 10);

        assert_eq!(ranked[0].course().title(), "python aa");
        assert_eq!(ranked[1].course().title(), "python bb");
    }

    #[test]
    fn recommend_is_rank_with_a_level() {
        let corpus = corpus(vec![
            course("Excel desde cero", 3),
            course("Excel masterclass completo", 3),
        ]);

        let beginner = recommend(&corpus, "excel", Level::Beginner, 10);
        assert_eq!(beginner[0].course().title(), "Excel desde cero");

        let intermediate = recommend(&corpus, "excel", Level::Intermediate, 10);
        assert_eq!(intermediate[0].course().title(), "Excel masterclass completo");
    }
}
