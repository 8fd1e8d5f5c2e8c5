//! Search string construction.
//!
//! A base phrase is either used as-is or conjoined with one of the thematic
//! OR-groups. [`QueryExpansion`] generates alternative phrasings that can be
//! probed against a provider to find the one with the most hits.

use nm_core::{Error, Result};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refinement {
    BaseOnly,
    Partnership,
    Policy,
    Crisis,
    Fundraising,
}

impl Refinement {
    pub const ALL: [Refinement; 5] = [
        Refinement::BaseOnly,
        Refinement::Partnership,
        Refinement::Policy,
        Refinement::Crisis,
        Refinement::Fundraising,
    ];

    pub fn terms(&self) -> &'static [&'static str] {
        match self {
            Refinement::BaseOnly => &[],
            Refinement::Partnership => &["기업", "협약", "파트너십", "MOU", "후원", "기부"],
            Refinement::Policy => &["정책", "법률", "제도", "권리", "정부"],
            Refinement::Crisis => &["우크라이나", "가자지구", "아프가니스탄", "난민촌", "긴급구호", "분쟁"],
            Refinement::Fundraising => &["캠페인", "홍보대사", "모금", "후원자", "기금", "콘서트"],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Refinement::BaseOnly => "Base phrase only",
            Refinement::Partnership => "Partnerships and corporate giving",
            Refinement::Policy => "Policy and rights",
            Refinement::Crisis => "Crisis and emergency relief",
            Refinement::Fundraising => "Campaigns and fundraising",
        }
    }

    /// Final search string for `base`
    pub fn build(&self, base: &str) -> Result<String> {
        let base = base.trim();
        if base.is_empty() {
            return Err(Error::Config("Search phrase must not be empty".to_string()));
        }
        let terms = self.terms();
        if terms.is_empty() {
            return Ok(base.to_string());
        }
        Ok(format!("\"{}\" AND ({})", base, terms.join(" OR ")))
    }
}

/// One entry of the refinement menu, as typed by the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryChoice {
    Refined(Refinement),
    /// Probe the expanded candidates and keep the one with the most hits
    ProbeExpanded,
}

impl QueryChoice {
    pub const PROBE_MENU_NUMBER: usize = Refinement::ALL.len() + 1;

    pub fn menu() -> Vec<(usize, String)> {
        let mut entries: Vec<(usize, String)> = Refinement::ALL
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let terms = r.terms();
                let label = if terms.is_empty() {
                    r.label().to_string()
                } else {
                    format!("{} ({})", r.label(), terms.join(", "))
                };
                (i + 1, label)
            })
            .collect();
        entries.push((Self::PROBE_MENU_NUMBER, "Try expanded queries and use the best one".to_string()));
        entries
    }
}

impl FromStr for QueryChoice {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let number: usize = s
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("Not a menu number: {:?}", s.trim())))?;
        match number {
            n if (1..=Refinement::ALL.len()).contains(&n) => Ok(QueryChoice::Refined(Refinement::ALL[n - 1])),
            n if n == Self::PROBE_MENU_NUMBER => Ok(QueryChoice::ProbeExpanded),
            n => Err(Error::Config(format!("Menu number out of range: {}", n))),
        }
    }
}

impl fmt::Display for Refinement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Aliases and related-term groups used to generate candidate queries.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryExpansion {
    pub aliases: Vec<String>,
    pub related: Vec<Vec<String>>,
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Default for QueryExpansion {
    fn default() -> Self {
        Self {
            aliases: owned(&["유엔난민기구", "UNHCR", "유엔 난민기구", "유엔난민청"]),
            related: vec![
                owned(&["난민", "피난민", "이주민"]),
                owned(&["지원", "원조", "구호", "도움"]),
                owned(&["갈등", "분쟁", "위기", "전쟁"]),
                owned(&["인도적", "인권", "보호"]),
            ],
        }
    }
}

impl QueryExpansion {
    /// Ordered candidate queries for `base`, without duplicates
    pub fn expand(&self, base: &str) -> Vec<String> {
        let base = base.trim();
        if base.is_empty() {
            return Vec::new();
        }
        let plain = base.replace('"', "");
        let plain = plain.trim();
        let lowered = plain.to_lowercase();

        let mut candidates = vec![base.to_string(), plain.to_string()];

        for alias in &self.aliases {
            if lowered.contains(&alias.to_lowercase()) {
                continue;
            }
            candidates.push(format!("{} {}", plain, alias));
            candidates.push(format!("{} {}", alias, plain));
        }

        for group in &self.related {
            for term in group.iter().take(2) {
                candidates.push(format!("{} {}", plain, term));
            }
        }

        candidates.push(format!("\"{}\" 난민", plain));
        candidates.push(format!("\"{}\" 지원", plain));
        candidates.push(format!("{} 뉴스", plain));
        candidates.push(format!("{} 최신", plain));

        let mut words = plain.split_whitespace();
        if let (Some(first), Some(_)) = (words.next(), words.next()) {
            candidates.push(first.to_string());
        }

        let mut seen = HashSet::new();
        candidates.retain(|c| !c.is_empty() && seen.insert(c.clone()));
        candidates
    }

    /// Every refinement term, alias and related term, in menu order and
    /// without duplicates. The keyword tokenizer keeps these whole.
    pub fn vocabulary(&self) -> Vec<String> {
        let mut words: Vec<String> = Refinement::ALL
            .iter()
            .flat_map(|r| r.terms().iter().map(|t| t.to_string()))
            .chain(self.aliases.iter().cloned())
            .chain(self.related.iter().flatten().cloned())
            .collect();
        let mut seen = HashSet::new();
        words.retain(|w| seen.insert(w.clone()));
        words
    }
}
