use crate::error::{AppError, Result};
use aho_corasick::AhoCorasick;
use rayon::ThreadPoolBuildError;

/// Raw score every title starts from before keyword weights apply.
const BASELINE_SCORE: i64 = 1500;

const STAR_MIN: u8 = 1;
const STAR_MAX: u8 = 5;

/// Keyword weights for the `2025-final` table, organized by topic category.
/// Keys are lowercase and matched as substrings of the case-folded title.
const FINAL_2025_KEYWORDS: &[(&str, i64)] = &[
    // Course-type modifiers
    ("complete", 15_000),
    ("masterclass", 20_000),
    ("bootcamp", 18_000),
    ("total", 12_000),
    ("cero a experto", 15_000),
    ("de a a z", 12_000),
    // Recency bonus
    ("2025", 5_000),
    ("2024", 3_000),
    // Programming and web development
    ("python", 8_000),
    ("javascript", 8_000),
    ("java", 7_000),
    ("c#", 6_000),
    ("html", 5_000),
    ("css", 5_000),
    ("sql", 7_000),
    ("react", 9_000),
    ("angular", 8_500),
    ("vue", 8_000),
    ("node.js", 7_500),
    ("django", 7_000),
    ("flask", 6_500),
    // Data and AI
    ("data science", 10_000),
    ("machine learning", 12_000),
    ("inteligencia artificial", 12_000),
    ("ia", 12_000),
    ("excel", 6_000),
    ("power bi", 8_000),
    ("tableau", 8_000),
    // Business
    ("marketing", 7_000),
    ("seo", 5_000),
    // Cloud, DevOps and security
    ("hacking", 9_000),
    ("ciberseguridad", 10_000),
    ("cybersecurity", 10_000),
    ("aws", 9_000),
    ("azure", 8_500),
    ("docker", 7_000),
    ("kubernetes", 7_500),
    ("git", 4_000),
    // Design
    ("diseño gráfico", 6_000),
    ("photoshop", 5_000),
    ("illustrator", 5_000),
    ("figma", 6_000),
    // Level modifiers
    ("introduction", -2_000),
    ("introducción", -2_000),
    ("básico", -3_000),
    ("principiantes", -4_000),
    ("cero", -3_000),
    ("intro", -2_000),
    ("guía", -1_000),
];

/// Keyword→weight mapping bundled with the star thresholds it was tuned
/// against. The two are versioned as one unit: editing either on its own
/// silently re-skews the rating distribution.
#[derive(Debug)]
pub struct ScoringTable {
    version: &'static str,
    weights: Vec<i64>,
    matcher: AhoCorasick,
    /// Strict lower bounds for 5, 4, 3 and 2 stars, descending.
    thresholds: [i64; 4],
}

impl ScoringTable {
    pub fn new(version: &'static str, entries: &[(&str, i64)], thresholds: [i64; 4]) -> Result<Self> {
        let patterns: Vec<&str> = entries.iter().map(|(keyword, _)| *keyword).collect();
        let matcher = AhoCorasick::new(&patterns)
            .map_err(|e| AppError::ScoringError(format!("failed to build keyword automaton: {e}")))?;

        Ok(Self {
            version,
            weights: entries.iter().map(|(_, weight)| *weight).collect(),
            matcher,
            thresholds,
        })
    }

    /// The authoritative table: final-variant keywords with the
    /// 40000/25000/10000/3000 threshold set.
    pub fn final_2025() -> Result<Self> {
        Self::new("2025-final", FINAL_2025_KEYWORDS, [40_000, 25_000, 10_000, 3_000])
    }

    pub const fn version(&self) -> &'static str {
        self.version
    }

    /// Star rating for a title. A missing title is not an error, it simply
    /// rates minimal.
    pub fn score_title(&self, title: Option<&str>) -> u8 {
        match title {
            Some(title) => self.score_folded(&title.to_lowercase()),
            None => STAR_MIN,
        }
    }

    /// Scores an already case-folded title. Every distinct keyword occurring
    /// anywhere in the title contributes its weight once; overlapping
    /// keywords all count ("cero" inside "cero a experto" included), so
    /// matching iterates overlapping hits rather than leftmost ones.
    pub(crate) fn score_folded(&self, title_lower: &str) -> u8 {
        let mut matched = vec![false; self.weights.len()];
        for hit in self.matcher.find_overlapping_iter(title_lower) {
            matched[hit.pattern().as_usize()] = true;
        }

        let raw_score = BASELINE_SCORE
            + matched
                .iter()
                .zip(&self.weights)
                .filter(|(hit, _)| **hit)
                .map(|(_, weight)| *weight)
                .sum::<i64>();

        self.stars(raw_score)
    }

    fn stars(&self, raw_score: i64) -> u8 {
        let [five, four, three, two] = self.thresholds;
        if raw_score > five {
            STAR_MAX
        } else if raw_score > four {
            4
        } else if raw_score > three {
            3
        } else if raw_score > two {
            2
        } else {
            STAR_MIN
        }
    }
}

pub fn init_rayon_pool(num_threads: usize) -> std::result::Result<(), ThreadPoolBuildError> {
    rayon::ThreadPoolBuilder::new().num_threads(num_threads).build_global()
}
