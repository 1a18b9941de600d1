/// Template pools: static, ordered candidate sets for one announcement kind.
///
/// Each entry carries a relative weight, the raw template text and an optional
/// predicate deciding whether the entry applies to a condition. Pool order
/// never changes selection odds; it only fixes the walk order used by the
/// selector, which makes boundary draws deterministic.
///
/// A pool must keep at least one predicate-free entry so every condition has
/// a fallback. `TemplatePool::new` refuses to build a pool without one.
use super::{condition::Condition, MessageError, Result};
use std::fmt;

/// A business rule attached to a template entry.
pub trait Predicate: Send + Sync {
    fn evaluate(&self, condition: &Condition) -> Result<bool>;
}

impl<F> Predicate for F
where
    F: Fn(&Condition) -> Result<bool> + Send + Sync,
{
    fn evaluate(&self, condition: &Condition) -> Result<bool> {
        self(condition)
    }
}

pub struct TemplateEntry {
    pub weight:    u32,
    pub text:      &'static str,
    pub predicate: Option<Box<dyn Predicate>>,
}

impl TemplateEntry {
    /// An entry that applies to every condition.
    pub fn always(weight: u32, text: &'static str) -> Self {
        Self { weight, text, predicate: None }
    }

    pub fn when<F>(weight: u32, text: &'static str, predicate: F) -> Self
    where
        F: Fn(&Condition) -> Result<bool> + Send + Sync + 'static,
    {
        Self { weight, text, predicate: Some(Box::new(predicate)) }
    }

    /// `true` when the entry has no predicate or its predicate holds.
    pub fn applies_to(&self, condition: &Condition) -> Result<bool> {
        match &self.predicate {
            None            => Ok(true),
            Some(predicate) => predicate.evaluate(condition),
        }
    }
}

impl fmt::Debug for TemplateEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateEntry")
            .field("weight", &self.weight)
            .field("text", &self.text)
            .field("filtered", &self.predicate.is_some())
            .finish()
    }
}

#[derive(Debug)]
pub struct TemplatePool {
    name:    &'static str,
    entries: Vec<TemplateEntry>,
}

impl TemplatePool {
    pub fn new(name: &'static str, entries: Vec<TemplateEntry>) -> Result<Self> {
        let invalid = |reason: &str| MessageError::InvalidPool {
            pool:   name.to_owned(),
            reason: reason.to_owned(),
        };
        if entries.is_empty() {
            return Err(invalid("no entries"));
        }
        if let Some(entry) = entries.iter().find(|e| e.weight == 0) {
            return Err(invalid(&format!("zero weight on \"{}\"", entry.text)));
        }
        if entries.iter().all(|e| e.predicate.is_some()) {
            return Err(invalid("no unfiltered fallback entry"));
        }
        Ok(Self { name, entries })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn entries(&self) -> &[TemplateEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Summed weight of the entries that apply to any condition.
    pub fn fallback_weight(&self) -> u64 {
        self.entries
            .iter()
            .filter(|e| e.predicate.is_none())
            .map(|e| u64::from(e.weight))
            .sum()
    }
}
