use crate::error::{AppError, Result};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::path::PathBuf;

use ::config::{Config as ConfigBuilder, Environment, File};

#[derive(Debug, Deserialize, Clone)]
pub struct SourcesConfig {
    pub csv_files: Vec<PathBuf>,
    pub include_curated: bool,
    pub max_concurrent_files: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RankerConfig {
    pub result_limit: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnalyzerConfig {
    pub rayon_threads: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub sources: SourcesConfig,
    pub ranker: RankerConfig,
    pub analyzer: AnalyzerConfig,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config = ConfigBuilder::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("APP"))
            .build()
            .map_err(|e| AppError::ConfigError(e.to_string()))?;

        let cfg: Self = config
            .try_deserialize()
            .map_err(|e| AppError::ConfigError(e.to_string()))?;

        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        if self.sources.max_concurrent_files == 0 {
            return Err(AppError::ConfigError(
                "sources.max_concurrent_files must be > 0".into(),
            ));
        }
        if self.ranker.result_limit == 0 {
            return Err(AppError::ConfigError("ranker.result_limit must be > 0".into()));
        }
        if self.analyzer.rayon_threads == 0 {
            return Err(AppError::ConfigError(
                "analyzer.rayon_threads must be > 0".into(),
            ));
        }
        Ok(())
    }
}

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    Config::load().unwrap_or_else(|_| {
        eprintln!("Failed to load config, using defaults");
        Config::default()
    })
});

impl Default for Config {
    fn default() -> Self {
        Self {
            sources: SourcesConfig {
                csv_files: vec![
                    PathBuf::from("data/udemy_online_education_courses_dataset.csv"),
                    PathBuf::from("data/courses_2.csv"),
                ],
                include_curated: true,
                max_concurrent_files: 4,
            },
            ranker: RankerConfig { result_limit: 10 },
            analyzer: AnalyzerConfig {
                rayon_threads: num_cpus::get(), // dynamic
            },
        }
    }
}
