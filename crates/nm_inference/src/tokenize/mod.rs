//! Lightweight Korean tokenizer.
//!
//! Words come from Unicode word segmentation. Hangul words are tagged by
//! their endings: predicate endings mark verbs and adjectives, everything
//! else is treated as a noun with its trailing particle removed.
//!
//! Ending rules misfire on nouns such as 우크라이나 (particle 이나), 캐나다
//! (ending 다) or 제한 (modifier 한). Words in the known-noun set, with or
//! without a trailing particle, bypass those rules.

use nm_core::{PartOfSpeech, Token, Tokenizer};
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

/// Longest first, so "에서는" wins over "는".
const PARTICLES: &[&str] = &[
    "에서는", "으로는", "에게서", "으로써", "이라는", "에서", "에게", "으로", "부터", "까지",
    "처럼", "보다", "이나", "이며", "이고", "과의", "와의", "에는", "에도", "라는", "의", "은",
    "는", "이", "가", "을", "를", "에", "도", "만", "로", "와", "과", "나", "랑",
];

const PREDICATE_ENDINGS: &[&str] = &[
    "습니다", "합니다", "스러운", "하는", "되는", "있는", "없는", "하고", "하며", "해서", "하여",
    "했던", "하던", "됐고", "되어", "돼", "다",
];

/// Modifier endings ("심각한", "좋은").
const MODIFIER_ENDINGS: &[char] = &['한', '된', '운', '은', '는'];

/// Nouns the ending rules would otherwise split or mistag.
const KNOWN_NOUNS: &[&str] = &[
    "우크라이나", "아프가니스탄", "가자지구", "시리아", "미얀마", "예멘", "수단", "캐나다",
    "인도네시아", "말레이시아", "아시아", "아프리카", "러시아", "바다", "인도주의", "민주주의",
    "어린이", "전문가", "봉사자", "개인", "원인", "제한", "승인", "군인", "시인", "확인", "피해", "나이",
    "사이", "자유", "회의", "국가", "의회", "여가", "평가", "대가",
];

const FUNCTION_WORDS: &[&str] = &[
    "그리고", "하지만", "그러나", "또한", "또는", "이번", "지난", "관련", "대한", "위해", "통해",
    "따라", "등의", "및", "더욱", "매우", "모든", "이후", "이전", "가운데", "오늘", "지금",
];

#[derive(Debug, Clone)]
pub struct KoreanTokenizer {
    function_words: HashSet<&'static str>,
    nouns: HashSet<String>,
}

impl Default for KoreanTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

fn is_hangul(c: char) -> bool {
    ('\u{AC00}'..='\u{D7A3}').contains(&c) || ('\u{3131}'..='\u{318E}').contains(&c)
}

fn is_numeric_word(word: &str) -> bool {
    word.chars().any(|c| c.is_ascii_digit())
        && word.chars().all(|c| c.is_ascii_digit() || c == ',' || c == '.')
}

fn strip_suffix_keeping<'a>(word: &'a str, suffix: &str, min_chars: usize) -> Option<&'a str> {
    let stem = word.strip_suffix(suffix)?;
    (stem.chars().count() >= min_chars).then_some(stem)
}

impl KoreanTokenizer {
    pub fn new() -> Self {
        Self {
            function_words: FUNCTION_WORDS.iter().copied().collect(),
            nouns: KNOWN_NOUNS.iter().map(|n| n.to_string()).collect(),
        }
    }

    /// Add nouns that must survive intact, such as the terms a monitor
    /// searches for. Non-Hangul entries are ignored.
    pub fn with_nouns<I, S>(mut self, nouns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.nouns.extend(
            nouns
                .into_iter()
                .map(|n| n.as_ref().trim().to_string())
                .filter(|n| n.chars().any(is_hangul) && !n.contains(char::is_whitespace)),
        );
        self
    }

    /// `word` itself, or `word` minus one particle, when that is a known noun
    fn known_noun<'a>(&self, word: &'a str) -> Option<&'a str> {
        if self.nouns.contains(word) {
            return Some(word);
        }
        PARTICLES
            .iter()
            .filter_map(|p| word.strip_suffix(p))
            .find(|stem| self.nouns.contains(*stem))
    }

    fn classify(&self, word: &str) -> Token {
        if is_numeric_word(word) {
            return Token::new(word, PartOfSpeech::Number);
        }
        if !word.chars().any(is_hangul) {
            let pos = if word.chars().any(char::is_alphabetic) {
                PartOfSpeech::Foreign
            } else {
                PartOfSpeech::Other
            };
            return Token::new(word, pos);
        }
        if self.function_words.contains(word) {
            return Token::new(word, PartOfSpeech::Other);
        }
        if let Some(noun) = self.known_noun(word) {
            return Token::new(noun, PartOfSpeech::Noun);
        }
        if PREDICATE_ENDINGS.iter().any(|e| word.ends_with(e)) && word.chars().count() > 1 {
            return Token::new(word, PartOfSpeech::Verb);
        }

        let chars: Vec<char> = word.chars().collect();
        if let Some(last) = chars.last() {
            // 은/는 after a stem of two or more syllables is a topic particle
            if chars.len() >= 2 && MODIFIER_ENDINGS.contains(last) {
                let is_particle = matches!(last, '은' | '는')
                    && strip_suffix_keeping(word, &last.to_string(), 2).is_some();
                if !is_particle && (*last == '한' || *last == '된' || *last == '운' || chars.len() == 2) {
                    return Token::new(word, PartOfSpeech::Adjective);
                }
            }
        }

        let stem = PARTICLES
            .iter()
            .find_map(|p| strip_suffix_keeping(word, p, 2))
            .unwrap_or(word);
        if self.function_words.contains(stem) {
            return Token::new(stem, PartOfSpeech::Other);
        }
        Token::new(stem, PartOfSpeech::Noun)
    }
}

impl Tokenizer for KoreanTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        text.unicode_words().map(|w| self.classify(w)).collect()
    }
}
