//! Normalizer: lowercases, strips punctuation and stopwords, and tokenizes raw text.

use serde::{Deserialize, Serialize};

/// Symbols kept inside a token by default, so "c++", "c#" and "node.js" survive.
pub const DEFAULT_PRESERVED_SYMBOLS: &str = "+#.-";

/// Symbols that only make sense between two other characters. A trailing "." is
/// sentence punctuation, not part of a skill name.
const EDGE_TRIMMED: &[char] = &['.', '-'];

const STOP_WORDS: &[&str] = &[
    "a", "about", "an", "and", "are", "as", "at", "be", "but", "by", "can", "do", "for", "from",
    "had", "has", "have", "he", "her", "his", "how", "i", "if", "in", "into", "is", "it", "its",
    "me", "my", "no", "not", "of", "on", "or", "our", "so", "than", "that", "the", "their",
    "them", "then", "there", "these", "they", "this", "to", "us", "was", "we", "were", "what",
    "when", "which", "who", "will", "with", "would", "you", "your",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizerConfig {
    pub preserved_symbols: Vec<char>,
    pub remove_stopwords: bool,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            preserved_symbols: DEFAULT_PRESERVED_SYMBOLS.chars().collect(),
            remove_stopwords: true,
        }
    }
}

impl NormalizerConfig {
    /// Strict alphanumeric tokenization: no symbols survive, stopwords kept.
    pub fn plain() -> Self {
        Self {
            preserved_symbols: Vec::new(),
            remove_stopwords: false,
        }
    }
}

/// Normalizes `text` into a token sequence.
///
/// Blank input yields an empty sequence. Feeding the joined output back in
/// yields the same tokens.
pub fn normalize(text: &str, config: &NormalizerConfig) -> Vec<String> {
    let lowered = text.to_lowercase();

    let cleaned: String = lowered
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() || config.preserved_symbols.contains(&c) {
                c
            } else {
                ' '
            }
        })
        .collect();

    cleaned
        .split_whitespace()
        .map(|word| word.trim_matches(EDGE_TRIMMED))
        .filter(|word| !word.is_empty())
        .filter(|word| !(config.remove_stopwords && is_stop_word(word)))
        .map(String::from)
        .collect()
}

fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.binary_search(&word).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_words_are_sorted_for_binary_search() {
        let mut sorted = STOP_WORDS.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, STOP_WORDS);
    }

    #[test]
    fn test_lowercases_and_strips_punctuation() {
        let tokens = normalize("Requires Python, SQL, and Power BI!", &NormalizerConfig::default());
        assert_eq!(tokens, vec!["requires", "python", "sql", "power", "bi"]);
    }

    #[test]
    fn test_keeps_stopwords_when_disabled() {
        let tokens = normalize("Python and SQL", &NormalizerConfig::plain());
        assert_eq!(tokens, vec!["python", "and", "sql"]);
    }

    #[test]
    fn test_preserves_symbols_inside_tokens() {
        let tokens = normalize("C++, C#, Node.js and CI/CD.", &NormalizerConfig::default());
        assert_eq!(tokens, vec!["c++", "c#", "node.js", "ci", "cd"]);
    }

    #[test]
    fn test_trailing_sentence_period_is_trimmed() {
        let tokens = normalize("I know SQL.", &NormalizerConfig::default());
        assert_eq!(tokens, vec!["know", "sql"]);
    }

    #[test]
    fn test_plain_config_drops_all_symbols() {
        let tokens = normalize("Node.js", &NormalizerConfig::plain());
        assert_eq!(tokens, vec!["node", "js"]);
    }

    #[test]
    fn test_empty_and_blank_input_yield_no_tokens() {
        let config = NormalizerConfig::default();
        assert!(normalize("", &config).is_empty());
        assert!(normalize("   \n\t ", &config).is_empty());
        assert!(normalize("!!! ... ---", &config).is_empty());
    }

    #[test]
    fn test_normalizing_normalized_text_is_stable() {
        let inputs = [
            "Senior Engineer: Python, SQL & Power BI (5+ yrs).",
            "Experience with C++ / Node.js -- and .NET",
            "THE quick, brown fox; jumps over... the lazy dog",
            "-- leading - and trailing -",
        ];
        for config in [NormalizerConfig::default(), NormalizerConfig::plain()] {
            for input in inputs {
                let once = normalize(input, &config);
                let twice = normalize(&once.join(" "), &config);
                assert_eq!(once, twice, "unstable for {input:?}");
            }
        }
    }

    #[test]
    fn test_unicode_letters_survive() {
        let tokens = normalize("Análisis de Datos", &NormalizerConfig::plain());
        assert_eq!(tokens, vec!["análisis", "de", "datos"]);
    }
}
