//! Two-pass text correction.
//!
//! Pass one corrects isolated words against an embedded dictionary using
//! Jaro-Winkler similarity, passing whitespace spans through verbatim; pass
//! two normalizes punctuation spacing and sentence capitalization without
//! adding or removing newlines, so line structure recognized upstream
//! survives for table reconstruction downstream. When pass two trips its
//! sanity guard the pass-one text is kept.

mod dictionaries;

use crate::config::CorrectionConfig;
use crate::error::{Result, ScanweaveError};
use std::collections::HashSet;
use strsim::jaro_winkler;
use tracing::{debug, warn};

/// Dictionary-backed corrector for one language.
pub struct Corrector {
    words: &'static [&'static str],
    index: HashSet<&'static str>,
    threshold: f64,
    min_token_length: usize,
}

impl Corrector {
    /// Build a corrector for the given recognition language.
    ///
    /// Spanish codes (`spa`, `es`, and '+'-joined lists starting with
    /// either) select the Spanish dictionary; everything else selects
    /// English.
    pub fn for_language(language: &str, config: &CorrectionConfig) -> Self {
        let words = if language.starts_with("spa") || language.starts_with("es") {
            dictionaries::SPANISH
        } else {
            dictionaries::ENGLISH
        };
        Self {
            words,
            index: words.iter().copied().collect(),
            threshold: config.similarity_threshold,
            min_token_length: config.min_token_length,
        }
    }

    /// Run both correction passes.
    pub fn correct(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return text.to_string();
        }

        let corrected = self.correct_words(text);
        match self.normalize_phrases(&corrected) {
            Ok(normalized) => normalized,
            Err(e) => {
                warn!("phrase normalization rejected, keeping word pass: {}", e);
                corrected
            }
        }
    }

    /// Pass one: correct isolated words, leaving whitespace spans untouched.
    fn correct_words(&self, text: &str) -> String {
        let mut result = String::with_capacity(text.len());
        let mut word = String::new();

        for ch in text.chars() {
            if ch.is_whitespace() {
                if !word.is_empty() {
                    result.push_str(&self.correct_word(&word));
                    word.clear();
                }
                result.push(ch);
            } else {
                word.push(ch);
            }
        }
        if !word.is_empty() {
            result.push_str(&self.correct_word(&word));
        }

        result
    }

    /// Correct one token, or return it unchanged.
    ///
    /// Tokens carrying digits or punctuation, short tokens and known words
    /// are never touched. Replacements keep a leading capital.
    fn correct_word(&self, word: &str) -> String {
        if word.chars().any(char::is_numeric) {
            return word.to_string();
        }
        if word.chars().any(|c| !c.is_alphanumeric()) {
            return word.to_string();
        }
        if word.chars().count() <= self.min_token_length {
            return word.to_string();
        }

        let lower = word.to_lowercase();
        if self.index.contains(lower.as_str()) {
            return word.to_string();
        }

        match self.find_correction(&lower) {
            Some(correction) => {
                debug!("corrected '{}' -> '{}'", word, correction);
                if word.chars().next().is_some_and(char::is_uppercase) {
                    let mut capitalized = String::with_capacity(correction.len());
                    let mut chars = correction.chars();
                    if let Some(first) = chars.next() {
                        capitalized.extend(first.to_uppercase());
                        capitalized.push_str(chars.as_str());
                    }
                    capitalized
                } else {
                    correction.to_string()
                }
            }
            None => word.to_string(),
        }
    }

    /// Best dictionary candidate at or above the similarity threshold.
    fn find_correction(&self, lower: &str) -> Option<&'static str> {
        let mut best: Option<(&'static str, f64)> = None;

        for candidate in self.words {
            let similarity = jaro_winkler(lower, candidate);
            if similarity < self.threshold {
                continue;
            }
            match best {
                Some((_, best_score)) if similarity <= best_score => {}
                _ => best = Some((candidate, similarity)),
            }
        }

        best.map(|(candidate, _)| candidate)
    }

    /// Pass two: punctuation spacing and sentence capitalization.
    ///
    /// Newlines are never added or removed, and a token carrying a digit
    /// keeps its original casing. An output that empties or halves the
    /// input is rejected so the caller can keep pass one.
    fn normalize_phrases(&self, text: &str) -> Result<String> {
        let chars: Vec<char> = text.chars().collect();
        let mut result = String::with_capacity(text.len());
        let mut capitalize_next = true;

        for (i, &ch) in chars.iter().enumerate() {
            match ch {
                ',' | ';' | ':' | '.' | '!' | '?' => {
                    while result.ends_with(' ') || result.ends_with('\t') {
                        result.pop();
                    }
                    result.push(ch);

                    let between_digits = i > 0
                        && chars[i - 1].is_numeric()
                        && chars.get(i + 1).is_some_and(|c| c.is_numeric());
                    if matches!(ch, '.' | '!' | '?') && !between_digits {
                        capitalize_next = true;
                    }
                    if chars.get(i + 1).is_some_and(|c| c.is_alphabetic()) {
                        result.push(' ');
                    }
                }
                _ if ch.is_alphabetic() && capitalize_next => {
                    capitalize_next = false;
                    if token_has_digit(&chars, i) {
                        result.push(ch);
                    } else {
                        result.extend(ch.to_uppercase());
                    }
                }
                _ => result.push(ch),
            }
        }

        if result.trim().is_empty() && !text.trim().is_empty() {
            return Err(ScanweaveError::correction("normalization emptied the text"));
        }
        if result.chars().count() * 2 < chars.len() {
            return Err(ScanweaveError::correction("normalization dropped too much text"));
        }

        Ok(result)
    }
}

/// Whether the whitespace-delimited token around `index` carries a digit.
///
/// Sentence capitalization leaves such tokens exactly as recognized.
fn token_has_digit(chars: &[char], index: usize) -> bool {
    let start = chars[..index]
        .iter()
        .rposition(|c| c.is_whitespace())
        .map_or(0, |found| found + 1);
    let end = chars[index..]
        .iter()
        .position(|c| c.is_whitespace())
        .map_or(chars.len(), |found| index + found);
    chars[start..end].iter().any(|c| c.is_numeric())
}
