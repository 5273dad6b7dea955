use crate::config::CONFIG;
use crate::error::{AppError, Result};
use crate::metrics::Metrics;
use crate::model::{CsvCourseRow, RawCourse};
use csv::StringRecord;
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Hand-picked free courses carried alongside the CSV exports. These rows
/// bring their own source label, which no URL derivation would produce.
const CURATED_COURSES: &[(&str, &str, &str)] = &[
    (
        "Curso de Python desde cero",
        "https://www.youtube.com/watch?v=chPhlsHoEPo",
        "YouTube",
    ),
    (
        "Responsive Web Design",
        "https://www.freecodecamp.org/learn/2022/responsive-web-design/",
        "freeCodeCamp",
    ),
    (
        "JavaScript Algorithms and Data Structures",
        "https://www.freecodecamp.org/learn/javascript-algorithms-and-data-structures/",
        "freeCodeCamp",
    ),
    (
        "Curso de introducción al Marketing Digital",
        "https://learndigital.withgoogle.com/activate/course/marketing-digital",
        "Google Actívate",
    ),
    (
        "Machine Learning Specialization",
        "https://www.coursera.org/specializations/machine-learning-introduction",
        "Coursera/edX",
    ),
    (
        "CS50: Introduction to Computer Science",
        "https://www.edx.org/learn/computer-science/harvard-university-cs50-s-introduction-to-computer-science",
        "Coursera/edX",
    ),
    (
        "Curso completo de Excel",
        "https://www.youtube.com/watch?v=cV8NZw52rbI",
        "YouTube",
    ),
];

pub struct Loader {
    cancel_token: CancellationToken,
    metrics: Metrics,
}

impl Loader {
    pub fn new(cancel_token: CancellationToken, metrics: Metrics) -> Self {
        Self { cancel_token, metrics }
    }

    /// Reads all configured CSV exports concurrently. Each source yields its
    /// own list of per-row results, so a bad row or a bad file degrades that
    /// source instead of aborting the whole load.
    pub async fn load_csv_sources(&self, paths: &[PathBuf]) -> Vec<(String, Vec<Result<RawCourse>>)> {
        info!(source_count = paths.len(), "Loading CSV course sources");

        let futures = paths.iter().map(|path| {
            let path = path.clone();
            let cancel_token = self.cancel_token.clone();
            let metrics = self.metrics.clone();

            async move {
                let label = path.display().to_string();
                if cancel_token.is_cancelled() {
                    return (label, vec![Err(AppError::ShutdownError)]);
                }

                metrics.record_source_read();
                match tokio::task::spawn_blocking(move || read_csv_file(&path)).await {
                    Ok(rows) => {
                        info!(source = %label, row_count = rows.len(), "Read CSV source");
                        (label, rows)
                    }
                    Err(e) => {
                        let err = AppError::parse_error(&label, format!("CSV task panicked: {e}"));
                        (label, vec![Err(err)])
                    }
                }
            }
        });

        stream::iter(futures)
            .buffer_unordered(CONFIG.sources.max_concurrent_files)
            .collect::<Vec<_>>()
            .await
    }

    /// The built-in curated list. All entries are free.
    pub fn curated_courses(&self) -> (String, Vec<Result<RawCourse>>) {
        self.metrics.record_source_read();
        let rows = CURATED_COURSES
            .iter()
            .map(|&(title, url, source)| {
                Ok(RawCourse {
                    title: Some(title.to_string()),
                    url: Some(url.to_string()),
                    source: Some(source.to_string()),
                    subscribers: None,
                    price: Some(0.0),
                })
            })
            .collect();
        ("curated".to_string(), rows)
    }
}

/// Parses one CSV export. The files come from different tools and are not
/// reliably UTF-8, so headers and rows are decoded lossily.
pub(crate) fn read_csv_file(path: &Path) -> Vec<Result<RawCourse>> {
    let origin = path.display().to_string();

    let mut reader = match csv::ReaderBuilder::new().flexible(true).from_path(path) {
        Ok(reader) => reader,
        Err(e) => return vec![Err(AppError::source_error(&origin, e))],
    };

    let headers = match reader.byte_headers() {
        Ok(headers) => StringRecord::from_byte_record_lossy(headers.clone()),
        Err(e) => return vec![Err(AppError::parse_error(&origin, e))],
    };

    reader
        .into_byte_records()
        .map(|record| {
            record
                .map_err(|e| AppError::parse_error(&origin, e))
                .and_then(|record| {
                    StringRecord::from_byte_record_lossy(record)
                        .deserialize::<CsvCourseRow>(Some(&headers))
                        .map(CsvCourseRow::into_raw)
                        .map_err(|e| AppError::parse_error(&origin, e))
                })
        })
        .collect()
}
