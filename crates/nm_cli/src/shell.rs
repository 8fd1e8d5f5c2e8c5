//! Interactive run: ask for a search phrase and refinement, fetch and ingest,
//! print a summary, then optionally chart what is stored.

use nm_collect::{Fetcher, IngestPipeline, IngestReport, QueryChoice, QueryExpansion};
use nm_core::{Error, RecencyWindow, Result};
use nm_report::{ChartRenderer, Reporter};
use std::io::{BufRead, Write};
use std::sync::Arc;
use tracing::info;

/// Line-oriented prompts over any reader and writer.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn say(&mut self, line: &str) -> Result<()> {
        writeln!(self.output, "{}", line)?;
        Ok(())
    }

    /// One trimmed line, or `None` once input is exhausted
    pub fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn ask_required(&mut self, prompt: &str) -> Result<String> {
        self.ask(prompt)?
            .ok_or_else(|| Error::Config("Input ended before a value was entered".to_string()))
    }

    /// Re-prompts until the line is non-empty
    pub fn ask_non_empty(&mut self, prompt: &str) -> Result<String> {
        loop {
            let answer = self.ask_required(prompt)?;
            if !answer.is_empty() {
                return Ok(answer);
            }
            self.say("Please enter a value.")?;
        }
    }

    /// Re-prompts until `parse` accepts the line
    pub fn ask_parsed<T>(&mut self, prompt: &str, parse: impl Fn(&str) -> Option<T>) -> Result<T> {
        loop {
            let answer = self.ask_required(prompt)?;
            match parse(&answer) {
                Some(value) => return Ok(value),
                None => self.say("Invalid choice, try again.")?,
            }
        }
    }

    pub fn confirm(&mut self, prompt: &str) -> Result<bool> {
        self.ask_parsed(prompt, |answer| match answer.to_lowercase().as_str() {
            "y" | "yes" => Some(true),
            "n" | "no" => Some(false),
            _ => None,
        })
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportMode {
    Trend,
    KeywordSentiment,
}

impl std::fmt::Display for ReportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportMode::Trend => f.write_str("trend"),
            ReportMode::KeywordSentiment => f.write_str("keyword sentiment"),
        }
    }
}

/// Everything one interactive run needs.
pub struct Session {
    pub fetcher: Fetcher,
    pub pipeline: IngestPipeline,
    pub reporter: Reporter,
    pub renderer: Arc<dyn ChartRenderer>,
    pub expansion: QueryExpansion,
    pub max_results: usize,
    pub window: RecencyWindow,
}

pub fn summary_lines(report: &IngestReport) -> Vec<String> {
    let label = report.label();
    let mut lines = vec![
        format!("Articles found: {}", report.fetched),
        format!("New articles saved: {}", report.inserted),
        format!("Average sentiment: {:.4} ({})", report.average_sentiment, label),
    ];
    if report.failed() > 0 {
        lines.push(format!("Articles skipped after errors: {}", report.failed()));
    }
    if report.top_keywords.is_empty() {
        lines.push("Top keywords: none".to_string());
    } else {
        let keywords = report
            .top_keywords
            .iter()
            .map(|k| format!("{} ({})", k.keyword, k.count))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("Top keywords: {}", keywords));
    }
    lines
}

impl Session {
    async fn choose_query<R: BufRead, W: Write>(&self, prompter: &mut Prompter<R, W>, base: &str) -> Result<String> {
        prompter.say("Refine the search:")?;
        for (number, label) in QueryChoice::menu() {
            prompter.say(&format!("  {}. {}", number, label))?;
        }
        let choice = prompter.ask_parsed("Choice: ", |s| s.parse::<QueryChoice>().ok())?;

        match choice {
            QueryChoice::Refined(refinement) => refinement.build(base),
            QueryChoice::ProbeExpanded => {
                let candidates = self.expansion.expand(base);
                let ranked = self.fetcher.probe(&candidates, self.window).await;
                prompter.say("Expanded query results:")?;
                for (query, count) in ranked.iter().take(5) {
                    prompter.say(&format!("  {} -> {}", query, count))?;
                }
                match ranked.into_iter().find(|(_, count)| *count > 0) {
                    Some((query, _)) => {
                        prompter.say(&format!("Using: {}", query))?;
                        Ok(query)
                    }
                    None => {
                        prompter.say("No expanded query found results; using the base phrase.")?;
                        Ok(base.to_string())
                    }
                }
            }
        }
    }

    async fn visualize<R: BufRead, W: Write>(&self, prompter: &mut Prompter<R, W>) -> Result<()> {
        prompter.say("  1. Daily trend")?;
        prompter.say("  2. Keyword sentiment")?;
        let mode = prompter.ask_parsed("Chart: ", |s| match s {
            "1" => Some(ReportMode::Trend),
            "2" => Some(ReportMode::KeywordSentiment),
            _ => None,
        })?;
        info!("📊 Building {} chart", mode);

        let written = match mode {
            ReportMode::Trend => {
                let keyword = prompter.ask("Title keyword (blank for all): ")?.unwrap_or_default();
                let keyword = (!keyword.is_empty()).then_some(keyword);
                match self.reporter.trend(keyword.as_deref()).await? {
                    Some(chart) => Some(self.renderer.render_trend(&chart)?),
                    None => None,
                }
            }
            ReportMode::KeywordSentiment => match self.reporter.keyword_sentiment().await? {
                Some(chart) => Some(self.renderer.render_keywords(&chart)?),
                None => None,
            },
        };

        match written {
            Some(path) => prompter.say(&format!("Chart saved to {}", path.display())),
            None => prompter.say("No data to visualize."),
        }
    }

    pub async fn run<R: BufRead, W: Write>(&self, prompter: &mut Prompter<R, W>) -> Result<()> {
        let base = prompter.ask_non_empty("Search phrase: ")?;
        let query = self.choose_query(prompter, &base).await?;
        info!("🔍 Final query: {}", query);

        let fetched = self.fetcher.fetch(&query, self.max_results, self.window).await;
        if fetched.is_empty() {
            prompter.say(&format!("No results found for {} (after {} attempts).", query, fetched.attempts))?;
        } else {
            let report = self.pipeline.ingest(&query, fetched.hits).await?;
            for line in summary_lines(&report) {
                prompter.say(&line)?;
            }
        }

        if prompter.confirm("Visualize stored articles? (y/n): ")? {
            self.visualize(prompter).await?;
        }
        Ok(())
    }
}
