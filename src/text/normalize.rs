use regex::Regex;

use crate::error::ExtractError;
use crate::model::ListField;

/// Vulgar fraction glyphs and their ASCII spelling
pub const FRACTIONS: [(char, &str); 18] = [
    ('½', "1/2"),
    ('⅓', "1/3"),
    ('⅔', "2/3"),
    ('¼', "1/4"),
    ('¾', "3/4"),
    ('⅕', "1/5"),
    ('⅖', "2/5"),
    ('⅗', "3/5"),
    ('⅘', "4/5"),
    ('⅙', "1/6"),
    ('⅚', "5/6"),
    ('⅐', "1/7"),
    ('⅛', "1/8"),
    ('⅜', "3/8"),
    ('⅝', "5/8"),
    ('⅞', "7/8"),
    ('⅑', "1/9"),
    ('⅒', "1/10"),
];

/// Cleans raw candidate text before classification.
///
/// The steps run in a fixed order: prefix stripping, bullet stripping,
/// fraction replacement, whitespace collapsing, trailing punctuation
/// (instructions only) and finally counter artifacts left behind by
/// list numbering that was captured as text.
pub struct Normalizer {
    step_prefix: Regex,
    ordinal_prefix: Regex,
    bullet_prefix: Option<Regex>,
    trailing_punctuation: Regex,
    counter_artifact: Regex,
    bare_counter: Regex,
}

impl Normalizer {
    pub fn new(bullet_chars: &[String]) -> Result<Self, ExtractError> {
        let bullets: String = bullet_chars.iter().map(|b| regex::escape(b)).collect();
        let bullet_prefix = if bullets.is_empty() {
            None
        } else {
            Some(Regex::new(&format!(r"^[{bullets}]+\s*"))?)
        };

        Ok(Self {
            step_prefix: Regex::new(r"(?i)^step\s+\d+\s*[:.]?\s*")?,
            // "1." or "2)" followed by a space, so decimals like "1.5 cups" survive
            ordinal_prefix: Regex::new(r"^\d+[.)](?:\s+|$)")?,
            bullet_prefix,
            trailing_punctuation: Regex::new(r"\s*[.!?]$")?,
            counter_artifact: Regex::new(r"^\d+\.\s*\d+\.(?:\s+|$)")?,
            bare_counter: Regex::new(r"^\d+\.?(?:\s*\d+\.?)?$")?,
        })
    }

    /// Normalize one line for the given list field
    pub fn normalize(&self, raw: &str, field: ListField) -> String {
        let mut text = raw.trim().to_string();

        text = self.strip_prefix(&text);
        if let Some(bullets) = &self.bullet_prefix {
            text = bullets.replace(&text, "").into_owned();
        }
        text = replace_fractions(&text);
        text = collapse(&text);

        if field == ListField::Instructions {
            text = self.trailing_punctuation.replace(&text, "").into_owned();
        }

        text = self.counter_artifact.replace(&text, "").into_owned();
        // "2. 1. Mix" keeps its second counter through the prefix pass
        text = self.ordinal_prefix.replace(&text, "").into_owned();
        if self.bare_counter.is_match(&text) {
            text.clear();
        }

        collapse(&text)
    }

    fn strip_prefix(&self, text: &str) -> String {
        if self.step_prefix.is_match(text) {
            return self.step_prefix.replace(text, "").into_owned();
        }
        self.ordinal_prefix.replace(text, "").into_owned()
    }
}

/// Replace every vulgar fraction glyph with its ASCII form
pub fn replace_fractions(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match FRACTIONS.iter().find(|(glyph, _)| *glyph == c) {
            Some((_, ascii)) => out.push_str(ascii),
            None => out.push(c),
        }
    }
    out
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
