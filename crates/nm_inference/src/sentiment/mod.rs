//! Rule-based sentiment scoring over an English valence lexicon.
//!
//! Scores follow the VADER conventions: each lexicon word contributes a
//! valence adjusted for boosters, negation, capitalization, a contrastive
//! "but" and trailing punctuation; the sum is squashed into [-1, 1] as the
//! compound score.

use nm_core::{Error, Result, SentimentModel, SentimentScores};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;
use tracing::debug;

const DEFAULT_LEXICON: &str = include_str!("../../data/lexicon.tsv");

const B_INCR: f64 = 0.293;
const B_DECR: f64 = -0.293;
const C_INCR: f64 = 0.733;
const N_SCALAR: f64 = -0.74;
const ALPHA: f64 = 15.0;

const NEGATIONS: &[&str] = &[
    "aint", "arent", "cannot", "cant", "couldnt", "darent", "didnt", "doesnt", "dont", "hadnt",
    "hasnt", "havent", "isnt", "mightnt", "mustnt", "neither", "never", "no", "nobody", "none",
    "nope", "nor", "not", "nothing", "nowhere", "shouldnt", "wasnt", "werent", "without", "wont",
    "wouldnt",
];

const BOOSTERS_UP: &[&str] = &[
    "absolutely", "amazingly", "completely", "considerably", "deeply", "enormously", "entirely",
    "especially", "exceptionally", "extremely", "greatly", "highly", "hugely", "incredibly",
    "intensely", "largely", "majorly", "more", "most", "particularly", "purely", "quite", "really",
    "remarkably", "so", "substantially", "thoroughly", "totally", "tremendously", "truly",
    "unbelievably", "very",
];

const BOOSTERS_DOWN: &[&str] = &[
    "almost", "barely", "hardly", "less", "little", "marginally", "occasionally", "partly",
    "scarcely", "slightly", "somewhat",
];

pub struct LexiconSentiment {
    lexicon: HashMap<String, f64>,
    boosters: HashMap<&'static str, f64>,
    negations: HashSet<&'static str>,
}

impl fmt::Debug for LexiconSentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LexiconSentiment")
            .field("lexicon_size", &self.lexicon.len())
            .finish()
    }
}

impl Default for LexiconSentiment {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconSentiment {
    /// Analyzer backed by the embedded lexicon
    pub fn new() -> Self {
        Self::from_lexicon(DEFAULT_LEXICON)
    }

    /// Build from `token<TAB>valence[<TAB>...]` lines. Blank lines, `#`
    /// comments and malformed lines are skipped.
    pub fn from_lexicon(text: &str) -> Self {
        let mut lexicon = HashMap::new();
        for line in text.lines() {
            let line = line.trim_end();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut fields = line.split('\t');
            let (Some(token), Some(value)) = (fields.next(), fields.next()) else {
                debug!(line, "Skipping malformed lexicon line");
                continue;
            };
            match value.trim().parse::<f64>() {
                Ok(valence) => {
                    lexicon.insert(token.trim().to_lowercase(), valence);
                }
                Err(_) => debug!(line, "Skipping lexicon line with invalid valence"),
            }
        }

        let mut boosters = HashMap::new();
        for word in BOOSTERS_UP {
            boosters.insert(*word, B_INCR);
        }
        for word in BOOSTERS_DOWN {
            boosters.insert(*word, B_DECR);
        }

        Self {
            lexicon,
            boosters,
            negations: NEGATIONS.iter().copied().collect(),
        }
    }

    /// Load a lexicon file in the same format as the embedded one
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let analyzer = Self::from_lexicon(&text);
        if analyzer.lexicon.is_empty() {
            return Err(Error::Config(format!("Lexicon {} has no usable entries", path.display())));
        }
        Ok(analyzer)
    }

    pub fn len(&self) -> usize {
        self.lexicon.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lexicon.is_empty()
    }

    fn is_negated(&self, word: &str) -> bool {
        let word = word.to_lowercase();
        word.contains("n't") || self.negations.contains(word.replace('\'', "").as_str())
    }

    fn booster_scalar(&self, word: &str, valence: f64, is_cap_diff: bool) -> f64 {
        let Some(&base) = self.boosters.get(word.to_lowercase().as_str()) else {
            return 0.0;
        };
        let mut scalar = if valence < 0.0 { -base } else { base };
        if is_cap_diff && is_shouting(word) {
            scalar += if valence > 0.0 { C_INCR } else { -C_INCR };
        }
        scalar
    }

    fn word_valence(&self, words: &[&str], i: usize, is_cap_diff: bool) -> f64 {
        let word = words[i];
        let lower = word.to_lowercase();

        if self.boosters.contains_key(lower.as_str()) {
            return 0.0;
        }
        if lower == "kind" && words.get(i + 1).map(|w| w.eq_ignore_ascii_case("of")).unwrap_or(false) {
            return 0.0;
        }
        let Some(&base) = self.lexicon.get(&lower) else {
            return 0.0;
        };

        let mut valence = base;
        if is_cap_diff && is_shouting(word) {
            valence += if valence > 0.0 { C_INCR } else { -C_INCR };
        }

        for distance in 1..=3usize {
            if i < distance {
                break;
            }
            let previous = words[i - distance];
            if !self.lexicon.contains_key(&previous.to_lowercase()) {
                let mut scalar = self.booster_scalar(previous, valence, is_cap_diff);
                if distance == 2 {
                    scalar *= 0.95;
                } else if distance == 3 {
                    scalar *= 0.9;
                }
                valence += scalar;
                if self.is_negated(previous) {
                    valence *= N_SCALAR;
                }
            }
        }
        valence
    }
}

fn is_shouting(word: &str) -> bool {
    word.chars().any(char::is_alphabetic) && !word.chars().any(char::is_lowercase)
}

fn normalize(score: f64) -> f64 {
    (score / (score * score + ALPHA).sqrt()).clamp(-1.0, 1.0)
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

fn punctuation_emphasis(text: &str) -> f64 {
    let exclamations = text.matches('!').count().min(4) as f64 * 0.292;
    let questions = text.matches('?').count();
    let question_emphasis = match questions {
        0 | 1 => 0.0,
        2 | 3 => questions as f64 * 0.18,
        _ => 0.96,
    };
    exclamations + question_emphasis
}

impl SentimentModel for LexiconSentiment {
    fn name(&self) -> &str {
        "lexicon"
    }

    fn polarity_scores(&self, text: &str) -> SentimentScores {
        let words: Vec<&str> = text
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\''))
            .filter(|w| w.chars().count() > 1)
            .collect();
        if words.is_empty() {
            return SentimentScores::default();
        }

        let shouting = words.iter().filter(|w| is_shouting(w)).count();
        let is_cap_diff = shouting > 0 && shouting < words.len();

        let mut sentiments: Vec<f64> = (0..words.len())
            .map(|i| self.word_valence(&words, i, is_cap_diff))
            .collect();

        if let Some(pivot) = words.iter().position(|w| w.eq_ignore_ascii_case("but")) {
            for (i, s) in sentiments.iter_mut().enumerate() {
                if i < pivot {
                    *s *= 0.5;
                } else if i > pivot {
                    *s *= 1.5;
                }
            }
        }

        let emphasis = punctuation_emphasis(text);
        let mut sum: f64 = sentiments.iter().sum();
        if sum > 0.0 {
            sum += emphasis;
        } else if sum < 0.0 {
            sum -= emphasis;
        }
        let compound = normalize(sum);

        let mut pos_sum = 0.0;
        let mut neg_sum = 0.0;
        let mut neu_count = 0.0;
        for s in &sentiments {
            if *s > 0.0 {
                pos_sum += s + 1.0;
            } else if *s < 0.0 {
                neg_sum += s - 1.0;
            } else {
                neu_count += 1.0;
            }
        }
        if pos_sum > neg_sum.abs() {
            pos_sum += emphasis;
        } else if pos_sum < neg_sum.abs() {
            neg_sum -= emphasis;
        }

        let total = pos_sum + neg_sum.abs() + neu_count;
        if total == 0.0 {
            return SentimentScores::default();
        }

        SentimentScores {
            neg: round_to((neg_sum / total).abs(), 3),
            neu: round_to(neu_count / total, 3),
            pos: round_to(pos_sum / total, 3),
            compound: round_to(compound, 4),
        }
    }
}
