//! Type & Rule Engine.
//!
//! A `TypeDescriptor` is the declarative constraint set for one property:
//! its value kind, whether it is required, kind-specific bounds, and an
//! ordered list of custom rules. Validation is a first-class result (an
//! ordered list of human-readable failure descriptions) because property
//! values are expected to fail routinely during interactive editing and
//! must be displayed inline, not thrown.
//!
//! Evaluation order is fixed:
//! 1. `Required` when the value is absent (or out-of-kind, which is treated
//!    identically) and the descriptor is required; this short-circuits all
//!    remaining checks. An absent value on an optional descriptor is valid.
//! 2. Bound violations, min then max, each checked independently.
//! 3. Custom rule descriptions in declaration order.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Storage format for Date-kind values inside property bags.
pub const DATE_STORAGE_FORMAT: &str = "%Y-%m-%d";

/// Display format for date bounds, fixed so failure strings are stable.
const DATE_DISPLAY_FORMAT: &str = "%-d %B %Y";

const REQUIRED: &str = "Required";
const OPTIONAL: &str = "Optional";

/// Value kinds a property can be declared as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Kind {
    Date,
    TrueFalse,
    Number,
    Text,
}

/// Kind-specific bound for the ordered kinds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    Date(NaiveDate),
    Number(f64),
}

/// A custom validation rule: a predicate over the candidate value plus the
/// description shown when the predicate fails.
pub struct Rule {
    description: String,
    predicate: Box<dyn Fn(&Value) -> bool + Send + Sync>,
}

impl Rule {
    pub fn new(
        description: impl Into<String>,
        predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            description: description.into(),
            predicate: Box::new(predicate),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Options for a Date descriptor.
#[derive(Debug, Clone, Default)]
pub struct DateOptions {
    pub required: bool,
    pub min: Option<NaiveDate>,
    pub max: Option<NaiveDate>,
    pub description: Option<String>,
}

/// Options for a Number descriptor.
#[derive(Debug, Clone, Default)]
pub struct NumberOptions {
    pub required: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub description: Option<String>,
}

/// Options for the unordered kinds (TrueFalse, Text).
#[derive(Debug, Clone, Default)]
pub struct FlagOptions {
    pub required: bool,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TextOptions {
    pub required: bool,
    pub description: Option<String>,
}

/// Declarative constraint set for one property.
#[derive(Debug)]
pub struct TypeDescriptor {
    kind: Kind,
    required: bool,
    min: Option<Bound>,
    max: Option<Bound>,
    description: Option<String>,
    rules: Vec<Rule>,
}

/// A candidate value coerced to the descriptor's kind. Coercion failure is
/// indistinguishable from absence for validation purposes.
enum KindValue {
    Date(NaiveDate),
    Number(f64),
    Flag(bool),
    Text(String),
}

impl TypeDescriptor {
    pub fn date(options: DateOptions, rules: Vec<Rule>) -> Self {
        Self {
            kind: Kind::Date,
            required: options.required,
            min: options.min.map(Bound::Date),
            max: options.max.map(Bound::Date),
            description: options.description,
            rules,
        }
    }

    pub fn number(options: NumberOptions, rules: Vec<Rule>) -> Self {
        Self {
            kind: Kind::Number,
            required: options.required,
            min: options.min.map(Bound::Number),
            max: options.max.map(Bound::Number),
            description: options.description,
            rules,
        }
    }

    pub fn true_false(options: FlagOptions, rules: Vec<Rule>) -> Self {
        Self {
            kind: Kind::TrueFalse,
            required: options.required,
            min: None,
            max: None,
            description: options.description,
            rules,
        }
    }

    pub fn text(options: TextOptions, rules: Vec<Rule>) -> Self {
        Self {
            kind: Kind::Text,
            required: options.required,
            min: None,
            max: None,
            description: options.description,
            rules,
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn required(&self) -> bool {
        self.required
    }

    pub fn min(&self) -> Option<&Bound> {
        self.min.as_ref()
    }

    pub fn max(&self) -> Option<&Bound> {
        self.max.as_ref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Validate a candidate value. `None` means the value satisfies every
    /// applicable check; otherwise the failures are returned in the fixed
    /// order documented on the module.
    pub fn validate(&self, value: &Value) -> Option<Vec<String>> {
        let Some(present) = self.coerce(value) else {
            if self.required {
                return Some(vec![REQUIRED.to_string()]);
            }
            return None;
        };

        let mut failures = Vec::new();
        if let Some(min) = &self.min {
            if violates_min(&present, min) {
                failures.push(describe_min(min));
            }
        }
        if let Some(max) = &self.max {
            if violates_max(&present, max) {
                failures.push(describe_max(max));
            }
        }
        for rule in &self.rules {
            if !(rule.predicate)(value) {
                failures.push(rule.description.clone());
            }
        }

        if failures.is_empty() {
            None
        } else {
            Some(failures)
        }
    }

    /// Static summary of every rule this descriptor would ever apply, in
    /// evaluation order: `Required`/`Optional`, then min, then max, then
    /// each custom rule. Independent of any particular value.
    pub fn rule_descriptions(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(3 + self.rules.len());
        out.push(if self.required { REQUIRED } else { OPTIONAL }.to_string());
        if let Some(min) = &self.min {
            out.push(describe_min(min));
        }
        if let Some(max) = &self.max {
            out.push(describe_max(max));
        }
        out.extend(self.rules.iter().map(|r| r.description.clone()));
        out
    }

    fn coerce(&self, value: &Value) -> Option<KindValue> {
        if value.is_null() {
            return None;
        }
        match self.kind {
            Kind::Date => value
                .as_str()
                .and_then(|s| NaiveDate::parse_from_str(s, DATE_STORAGE_FORMAT).ok())
                .map(KindValue::Date),
            Kind::Number => value.as_f64().map(KindValue::Number),
            Kind::TrueFalse => value.as_bool().map(KindValue::Flag),
            Kind::Text => value.as_str().map(|s| KindValue::Text(s.to_string())),
        }
    }
}

fn violates_min(value: &KindValue, min: &Bound) -> bool {
    match (value, min) {
        (KindValue::Date(v), Bound::Date(b)) => v < b,
        (KindValue::Number(v), Bound::Number(b)) => v < b,
        _ => false,
    }
}

fn violates_max(value: &KindValue, max: &Bound) -> bool {
    match (value, max) {
        (KindValue::Date(v), Bound::Date(b)) => v > b,
        (KindValue::Number(v), Bound::Number(b)) => v > b,
        _ => false,
    }
}

fn describe_min(bound: &Bound) -> String {
    match bound {
        Bound::Date(d) => format!("Earliest {}", d.format(DATE_DISPLAY_FORMAT)),
        Bound::Number(n) => format!("Minimum {}", n),
    }
}

fn describe_max(bound: &Bound) -> String {
    match bound {
        Bound::Date(d) => format!("Latest {}", d.format(DATE_DISPLAY_FORMAT)),
        Bound::Number(n) => format!("Maximum {}", n),
    }
}
