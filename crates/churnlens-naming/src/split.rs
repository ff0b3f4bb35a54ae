//! Splitting identifiers into lowercase words.

/// Splits an identifier into words.
pub trait NameSplitter: Send + Sync {
    fn split(&self, name: &str) -> Vec<String>;
}

/// Splits on `_ - . /`, lower-to-upper transitions, the end of an acronym
/// (`HTTPServer` → `http`, `server`) and letter/digit boundaries. Words are
/// lowercased.
///
/// ```
/// use churnlens_naming::{NameSplitter, WordSplitter};
///
/// assert_eq!(WordSplitter.split("getHTTPResponse2"), ["get", "http", "response", "2"]);
/// assert_eq!(WordSplitter.split("MAX_RETRY_COUNT"), ["max", "retry", "count"]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct WordSplitter;

impl NameSplitter for WordSplitter {
    fn split(&self, name: &str) -> Vec<String> {
        let chars: Vec<char> = name.chars().collect();
        let mut words = Vec::new();
        let mut word: Vec<char> = Vec::new();

        let flush = |word: &mut Vec<char>, words: &mut Vec<String>| {
            if !word.is_empty() {
                words.push(word.iter().collect::<String>().to_lowercase());
                word.clear();
            }
        };

        for (i, &ch) in chars.iter().enumerate() {
            if matches!(ch, '_' | '-' | '.' | '/') {
                flush(&mut word, &mut words);
                continue;
            }
            if i > 0 {
                let prev = chars[i - 1];
                if prev.is_lowercase() && ch.is_uppercase() {
                    flush(&mut word, &mut words);
                }
                // end of an acronym: the last capital starts the next word
                if i > 1 && prev.is_uppercase() && ch.is_lowercase() && chars[i - 2].is_uppercase() {
                    if let Some(last) = word.pop() {
                        flush(&mut word, &mut words);
                        word.push(last);
                    }
                }
                let letter_digit = (prev.is_alphabetic() && ch.is_numeric())
                    || (prev.is_numeric() && ch.is_alphabetic());
                if letter_digit {
                    flush(&mut word, &mut words);
                }
            }
            word.push(ch);
        }
        flush(&mut word, &mut words);
        words
    }
}
