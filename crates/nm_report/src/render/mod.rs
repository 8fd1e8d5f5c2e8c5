use chrono::Local;
use nm_core::{Error, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use crate::chart::{KeywordChart, TrendChart};

pub mod json;
pub mod svg;

pub use json::JsonRenderer;
pub use svg::SvgRenderer;

/// Writes a chart to disk and returns the file it wrote.
pub trait ChartRenderer: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;
    fn render_trend(&self, chart: &TrendChart) -> Result<PathBuf>;
    fn render_keywords(&self, chart: &KeywordChart) -> Result<PathBuf>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartFormat {
    #[default]
    Svg,
    Json,
}

impl fmt::Display for ChartFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartFormat::Svg => f.write_str("svg"),
            ChartFormat::Json => f.write_str("json"),
        }
    }
}

impl FromStr for ChartFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "svg" => Ok(ChartFormat::Svg),
            "json" => Ok(ChartFormat::Json),
            other => Err(Error::Config(format!("Unknown chart format: {}", other))),
        }
    }
}

pub fn create_renderer(format: ChartFormat, dir: PathBuf) -> Arc<dyn ChartRenderer> {
    match format {
        ChartFormat::Svg => Arc::new(SvgRenderer::new(dir)),
        ChartFormat::Json => Arc::new(JsonRenderer::new(dir)),
    }
}

/// `<dir>/<prefix>_<YYYYmmdd_HHMMSS_mmm>.<ext>`, creating `dir` if needed.
/// A `_<n>` suffix is added while the name is taken.
pub(crate) fn output_path(dir: &Path, prefix: &str, extension: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let stamp = Local::now().format("%Y%m%d_%H%M%S_%3f").to_string();
    let mut path = dir.join(format!("{}_{}.{}", prefix, stamp, extension));
    let mut n = 1;
    while path.exists() {
        path = dir.join(format!("{}_{}_{}.{}", prefix, stamp, n, extension));
        n += 1;
    }
    Ok(path)
}
