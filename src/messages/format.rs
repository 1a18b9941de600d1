/// Text formatter: turns a raw template into the announced string.
///
/// Placeholders are substituted first, then the markup rules run in a fixed
/// order over the whole (possibly multi-line) text, one pass per rule:
///
///   1. `\TEXT/`   upper-case
///   2. `/text\`   lower-case
///   3. `/Text/`   title-case
///   4. `^X^Y c`   proper-noun guard: if the letter `c` is upper-case the
///                 output is `Y c` (X dropped), otherwise `X Y c`
///
/// The guard is a heuristic: an upper-case letter after it is taken to start
/// a proper noun ("^the ^Ferumbras" -> "Ferumbras", "^the ^dragon" -> "the dragon").
///
/// Pure: no state, no randomness.
use super::{
    condition::{self, Condition},
    MessageError, Result,
};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static UPPER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\\(.+?)/").expect("valid upper-case regex"));
static LOWER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)/(.+?)\\").expect("valid lower-case regex"));
static TITLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)/(.+?)/").expect("valid title-case regex"));
static PROPER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\^(.+?)\^(.*?)([a-zA-Z])").expect("valid proper-noun regex"));

pub fn format(template: &str, condition: &Condition) -> Result<String> {
    let text = substitute(template, condition)?;
    Ok(apply_markup(&text))
}

/// Resolves every `{placeholder}` against the condition.
pub fn substitute(template: &str, condition: &Condition) -> Result<String> {
    let mut out  = String::with_capacity(template.len() + 32);
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after.find('}').ok_or_else(|| MessageError::UnclosedPlaceholder {
            offset: template.len() - rest.len() + open,
        })?;
        out.push_str(&resolve(&after[..close], condition)?);
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

fn resolve(name: &str, c: &Condition) -> Result<String> {
    let pronouns = condition::pronouns(c);
    Ok(match name {
        "name"           => condition::character(c).name.clone(),
        "level"          => condition::level(c).to_string(),
        "killer"         => condition::killer(c)?.to_owned(),
        "killer_article" => condition::killer_article(c)?.to_owned(),
        "levels_lost"    => condition::levels_lost(c)?.to_string(),
        "he_she"         => pronouns.he_she.to_owned(),
        "his_her"        => pronouns.his_her.to_owned(),
        "him_her"        => pronouns.him_her.to_owned(),
        other => return Err(MessageError::UnknownPlaceholder { name: other.to_owned() }),
    })
}

/// Applies the four markup rules, in order, to already-substituted text.
pub fn apply_markup(text: &str) -> String {
    let text = UPPER.replace_all(text, |caps: &Captures| caps[1].to_uppercase());
    let text = LOWER.replace_all(&text, |caps: &Captures| caps[1].to_lowercase());
    let text = TITLE.replace_all(&text, |caps: &Captures| title_case(&caps[1]));
    let text = PROPER.replace_all(&text, |caps: &Captures| {
        let next = &caps[3];
        if next.chars().all(char::is_uppercase) {
            format!("{}{}", &caps[2], next)
        } else {
            format!("{}{}{}", &caps[1], &caps[2], next)
        }
    });
    text.into_owned()
}

/// Upper-cases the first letter of each whitespace-separated word and
/// lower-cases the rest, so "he's" becomes "He's".
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut word_start = true;
    for ch in text.chars() {
        if word_start {
            out.extend(ch.to_uppercase());
        } else {
            out.extend(ch.to_lowercase());
        }
        word_start = ch.is_whitespace();
    }
    out
}

/// Upper-cases the first character of a finished announcement.
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None        => String::new(),
    }
}
