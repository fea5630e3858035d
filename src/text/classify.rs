use regex::Regex;

use crate::config::{ContextualKeyword, IngredientRules, InstructionRules};
use crate::error::ExtractError;
use crate::model::{RejectReason, Verdict};

/// Decides whether a normalized line belongs to a list field
pub trait Classifier: Send + Sync {
    fn classify(&self, text: &str) -> Verdict;
}

fn alternation(words: &[String]) -> String {
    words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|")
}

fn char_class(chars: &[String]) -> String {
    chars.iter().map(|c| regex::escape(c)).collect()
}

fn first_contained<'w>(haystack: &str, words: &'w [String]) -> Option<&'w String> {
    words
        .iter()
        .find(|w| !w.is_empty() && haystack.contains(&w.to_lowercase()))
}

pub struct IngredientClassifier {
    rejection_words: Vec<String>,
    section_labels: Vec<String>,
    min_length: usize,
    max_length: usize,
    patterns: Vec<Regex>,
}

impl IngredientClassifier {
    pub fn new(rules: &IngredientRules, bullet_chars: &[String]) -> Result<Self, ExtractError> {
        let units = alternation(&rules.measurement_units);
        let glyphs = char_class(&rules.fraction_glyphs);
        let bullets = char_class(bullet_chars);

        let mut patterns = vec![
            // "1 cup", "2 tablespoons"
            Regex::new(&format!(r"(?i)\d+\s+(?:{units})\b"))?,
            Regex::new(r"\d+/\d+")?,
            // "2 large eggs"
            Regex::new(r"^\d+\s+")?,
        ];
        if !glyphs.is_empty() {
            patterns.push(Regex::new(&format!(r"(?i)[{glyphs}]\s*(?:{units})\b"))?);
        }
        if !bullets.is_empty() {
            patterns.push(Regex::new(&format!(r"^[{bullets}]\s*\d+"))?);
            if !glyphs.is_empty() {
                patterns.push(Regex::new(&format!(r"^[{bullets}]\s*[{glyphs}]"))?);
            }
        }
        if !rules.foodstuff_words.is_empty() {
            patterns.push(Regex::new(&format!(
                "(?i){}",
                alternation(&rules.foodstuff_words)
            ))?);
        }

        Ok(Self {
            rejection_words: rules.rejection_words.clone(),
            section_labels: rules.section_labels.iter().map(|l| l.to_lowercase()).collect(),
            min_length: rules.min_length,
            max_length: rules.max_length,
            patterns,
        })
    }

    fn is_section_label(&self, text: &str) -> bool {
        let lower = text.trim().to_lowercase();
        let label = lower.strip_suffix(':').unwrap_or(&lower).trim_end();
        self.section_labels.iter().any(|l| l == label)
    }
}

impl Classifier for IngredientClassifier {
    fn classify(&self, text: &str) -> Verdict {
        let text = text.trim();
        if text.is_empty() {
            return Verdict::Reject(RejectReason::Empty);
        }

        let lower = text.to_lowercase();
        if let Some(word) = first_contained(&lower, &self.rejection_words) {
            return Verdict::Reject(RejectReason::Keyword(word.clone()));
        }

        let length = text.chars().count();
        if length < self.min_length {
            return Verdict::Reject(RejectReason::TooShort);
        }
        if length > self.max_length {
            return Verdict::Reject(RejectReason::TooLong);
        }
        if text.contains(['.', '!', '?']) {
            return Verdict::Reject(RejectReason::SentenceTerminal);
        }

        if self.patterns.iter().any(|p| p.is_match(text)) || self.is_section_label(text) {
            Verdict::Accept
        } else {
            Verdict::Reject(RejectReason::NoSignal)
        }
    }
}

pub struct InstructionClassifier {
    non_instruction_words: Vec<String>,
    contextual_keywords: Vec<ContextualKeyword>,
    advertisement_words: Vec<String>,
    bare_ad: Regex,
    action_words: Vec<String>,
    cooking_verbs: Option<Regex>,
    measurements: Regex,
    min_length: usize,
    min_words: usize,
    accept_min_length: usize,
    accept_max_length: usize,
}

impl InstructionClassifier {
    pub fn new(rules: &InstructionRules) -> Result<Self, ExtractError> {
        let cooking_verbs = if rules.cooking_verbs.is_empty() {
            None
        } else {
            Some(Regex::new(&format!(
                "(?i)(?:{})",
                alternation(&rules.cooking_verbs)
            ))?)
        };
        let measurements = if rules.measurement_units.is_empty() {
            Regex::new(r"\d+/\d+")?
        } else {
            Regex::new(&format!(
                r"(?i)\d+/\d+|\d+\s+(?:{})",
                alternation(&rules.measurement_units)
            ))?
        };

        Ok(Self {
            non_instruction_words: rules.non_instruction_words.clone(),
            contextual_keywords: rules.contextual_keywords.clone(),
            advertisement_words: rules.advertisement_words.clone(),
            bare_ad: Regex::new(r"\bad\b")?,
            action_words: rules.action_words.clone(),
            cooking_verbs,
            measurements,
            min_length: rules.min_length,
            min_words: rules.min_words,
            accept_min_length: rules.accept_min_length,
            accept_max_length: rules.accept_max_length,
        })
    }

    fn has_signal(&self, text: &str, lower: &str) -> bool {
        first_contained(lower, &self.action_words).is_some()
            || self
                .cooking_verbs
                .as_ref()
                .is_some_and(|verbs| verbs.is_match(text))
            || self.measurements.is_match(text)
            || text.contains(['.', ':'])
    }
}

/// Whether a contextual keyword rules the line out
fn blocked_by(keyword: &ContextualKeyword, text: &str, lower: &str) -> bool {
    let key = keyword.keyword.to_lowercase();
    if key.is_empty() || !lower.contains(&key) {
        return false;
    }
    if first_contained(lower, &keyword.allow_phrases).is_some() {
        return false;
    }
    if keyword.block_bare {
        let bare = text.trim().to_lowercase();
        let bare = bare.strip_suffix(':').unwrap_or(&bare).trim_end();
        if bare == key {
            return true;
        }
    }
    first_contained(lower, &keyword.block_phrases).is_some()
}

impl Classifier for InstructionClassifier {
    fn classify(&self, text: &str) -> Verdict {
        let text = text.trim();
        if text.is_empty() {
            return Verdict::Reject(RejectReason::Empty);
        }

        let lower = text.to_lowercase();
        if let Some(word) = first_contained(&lower, &self.non_instruction_words) {
            return Verdict::Reject(RejectReason::Keyword(word.clone()));
        }
        if let Some(keyword) = self
            .contextual_keywords
            .iter()
            .find(|k| blocked_by(k, text, &lower))
        {
            return Verdict::Reject(RejectReason::Keyword(keyword.keyword.clone()));
        }
        if first_contained(&lower, &self.advertisement_words).is_some()
            || self.bare_ad.is_match(&lower)
        {
            return Verdict::Reject(RejectReason::Advertisement);
        }

        let length = text.chars().count();
        if length < self.min_length {
            return Verdict::Reject(RejectReason::TooShort);
        }
        if text.split_whitespace().count() < self.min_words {
            return Verdict::Reject(RejectReason::TooFewWords);
        }
        if length < self.accept_min_length {
            return Verdict::Reject(RejectReason::TooShort);
        }
        if length > self.accept_max_length {
            return Verdict::Reject(RejectReason::TooLong);
        }

        if self.has_signal(text, &lower) {
            Verdict::Accept
        } else {
            Verdict::Reject(RejectReason::NoSignal)
        }
    }
}
