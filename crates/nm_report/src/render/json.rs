use nm_core::Result;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use super::{output_path, ChartRenderer};
use crate::chart::{KeywordChart, TrendChart};

/// Exports chart series as pretty JSON for external plotting tools.
#[derive(Debug, Clone)]
pub struct JsonRenderer {
    dir: PathBuf,
}

impl JsonRenderer {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn write<T: Serialize>(&self, prefix: &str, value: &T) -> Result<PathBuf> {
        let path = output_path(&self.dir, prefix, "json")?;
        write_json(&path, value)?;
        info!("📊 Chart data written to {}", path.display());
        Ok(path)
    }
}

fn write_json<T: ?Sized + Serialize>(path: &Path, value: &T) -> Result<()> {
    fs::write(path, serde_json::to_vec_pretty(value)?)?;
    Ok(())
}

impl ChartRenderer for JsonRenderer {
    fn name(&self) -> &str {
        "json"
    }

    fn render_trend(&self, chart: &TrendChart) -> Result<PathBuf> {
        self.write("trend", chart)
    }

    fn render_keywords(&self, chart: &KeywordChart) -> Result<PathBuf> {
        self.write("keywords", chart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{DailyStat, KeywordSentiment};
    use chrono::NaiveDate;
    use tempfile::tempdir;

    #[test]
    fn test_trend_json_reads_back() {
        let temp_dir = tempdir().unwrap();
        let renderer = JsonRenderer::new(temp_dir.path().to_path_buf());
        let chart = TrendChart {
            keyword: Some("난민".to_string()),
            days: vec![DailyStat {
                date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
                count: 4,
                mean_sentiment: -0.125,
            }],
        };

        let path = renderer.render_trend(&chart).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"2025-03-01\""));
        let parsed: TrendChart = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, chart);
    }

    #[test]
    fn test_keywords_json() {
        let temp_dir = tempdir().unwrap();
        let renderer = JsonRenderer::new(temp_dir.path().join("out"));
        let chart = KeywordChart {
            bars: vec![KeywordSentiment {
                keyword: "지원".to_string(),
                mean_sentiment: 0.4,
                articles: 2,
            }],
        };
        let path = renderer.render_keywords(&chart).unwrap();
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("keywords_"));
        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["bars"][0]["keyword"], "지원");
    }
}
