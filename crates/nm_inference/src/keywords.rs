use nm_core::{KeywordCount, Tokenizer};
use std::collections::HashMap;
use std::sync::Arc;

pub const DEFAULT_KEYWORD_LIMIT: usize = 10;

/// Ranks the nouns of a text by frequency.
#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    tokenizer: Arc<dyn Tokenizer>,
    min_chars: usize,
    drop_numeric: bool,
    limit: usize,
}

impl KeywordExtractor {
    pub fn new(tokenizer: Arc<dyn Tokenizer>) -> Self {
        Self {
            tokenizer,
            min_chars: 2,
            drop_numeric: true,
            limit: DEFAULT_KEYWORD_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn keep_numeric(mut self) -> Self {
        self.drop_numeric = false;
        self
    }

    fn accepts(&self, noun: &str) -> bool {
        if noun.chars().count() < self.min_chars {
            return false;
        }
        !(self.drop_numeric && noun.chars().all(|c| c.is_numeric()))
    }

    /// Most frequent nouns, highest count first. Equal counts keep the order
    /// in which the words first appeared.
    pub fn top_keywords(&self, text: &str) -> Vec<KeywordCount> {
        let mut order: Vec<String> = Vec::new();
        let mut counts: HashMap<String, usize> = HashMap::new();

        for noun in self.tokenizer.nouns(text) {
            if !self.accepts(&noun) {
                continue;
            }
            let count = counts.entry(noun.clone()).or_insert(0);
            if *count == 0 {
                order.push(noun);
            }
            *count += 1;
        }

        let mut ranked: Vec<KeywordCount> = order
            .into_iter()
            .map(|keyword| {
                let count = counts.get(&keyword).copied().unwrap_or_default();
                KeywordCount { keyword, count }
            })
            .collect();
        // sort_by is stable
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked.truncate(self.limit);
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenize::KoreanTokenizer;
    use nm_core::{PartOfSpeech, Token};

    fn extractor() -> KeywordExtractor {
        KeywordExtractor::new(Arc::new(KoreanTokenizer::new()))
    }

    fn words(counts: &[KeywordCount]) -> Vec<&str> {
        counts.iter().map(|k| k.keyword.as_str()).collect()
    }

    #[test]
    fn test_ranks_by_frequency() {
        let top = extractor().top_keywords("난민 지원 확대. 난민 캠프에 지원 물자. 난민 보호");
        assert_eq!(words(&top[..3]), vec!["난민", "지원", "확대"]);
        assert_eq!(top[0].count, 3);
        assert_eq!(top[1].count, 2);
    }

    #[test]
    fn test_place_names_rank_whole() {
        let top = extractor().top_keywords("우크라이나 난민 우크라이나에서 어린이 지원, 캐나다 정부의 어린이 보호");
        assert_eq!(words(&top[..3]), vec!["우크라이나", "어린이", "난민"]);
        assert!(words(&top).contains(&"캐나다"));
        assert!(!words(&top).contains(&"우크라"));
    }

    #[test]
    fn test_ties_keep_first_occurrence_order() {
        let top = extractor().top_keywords("위기 구호 정책 정책 구호 위기");
        assert_eq!(words(&top), vec!["위기", "구호", "정책"]);
    }

    #[test]
    fn test_short_and_numeric_tokens_are_dropped() {
        #[derive(Debug)]
        struct Fixed;
        impl Tokenizer for Fixed {
            fn tokenize(&self, _text: &str) -> Vec<Token> {
                vec![
                    Token::new("물", PartOfSpeech::Noun),
                    Token::new("2025", PartOfSpeech::Noun),
                    Token::new("구호", PartOfSpeech::Noun),
                ]
            }
        }

        let top = KeywordExtractor::new(Arc::new(Fixed)).top_keywords("ignored");
        assert_eq!(words(&top), vec!["구호"]);
        let top = KeywordExtractor::new(Arc::new(Fixed)).keep_numeric().top_keywords("ignored");
        assert_eq!(words(&top), vec!["2025", "구호"]);
        assert!(top.iter().all(|k| k.keyword.chars().count() >= 2));
    }

    #[test]
    fn test_limit_and_empty_input() {
        let text = "가나 다라 마바 사아 자차 카타 파하 거너 더러 머버 서어";
        assert_eq!(extractor().top_keywords(text).len(), DEFAULT_KEYWORD_LIMIT);
        assert_eq!(extractor().with_limit(3).top_keywords(text).len(), 3);
        assert!(extractor().top_keywords("").is_empty());
    }
}
