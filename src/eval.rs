//! Property Evaluator.
//!
//! A property input is either a literal value or a zero-argument producer
//! evaluated on demand. Evaluation performs the single case analysis once,
//! uniformly: producers are invoked, literals pass through. A failing
//! producer never aborts evaluation of sibling properties and never
//! propagates out of the evaluator. The failure is recorded per property
//! and the resolved value is substituted with `Null`, so every input name
//! appears in the output.

use crate::error::PropertyError;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

type Producer = Box<dyn Fn() -> Result<Value, PropertyError> + Send + Sync>;

/// Literal-or-deferred input for one property.
pub enum PropertyInput {
    Value(Value),
    Producer(Producer),
}

impl PropertyInput {
    pub fn value(value: impl Into<Value>) -> Self {
        Self::Value(value.into())
    }

    pub fn producer(
        producer: impl Fn() -> Result<Value, PropertyError> + Send + Sync + 'static,
    ) -> Self {
        Self::Producer(Box::new(producer))
    }
}

impl fmt::Debug for PropertyInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Producer(_) => f.write_str("Producer(..)"),
        }
    }
}

/// Outcome of evaluating a property map: every input name is present in
/// `properties`; names whose producer failed additionally appear in
/// `errors` with `Null` as their resolved value.
#[derive(Debug, Default)]
pub struct EvaluatedProperties {
    pub properties: BTreeMap<String, Value>,
    pub errors: BTreeMap<String, PropertyError>,
}

impl EvaluatedProperties {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Evaluate every input independently. Producer failures are caught at
/// single-property granularity.
pub fn evaluate(inputs: BTreeMap<String, PropertyInput>) -> EvaluatedProperties {
    let mut out = EvaluatedProperties::default();
    for (name, input) in inputs {
        match input {
            PropertyInput::Value(value) => {
                out.properties.insert(name, value);
            }
            PropertyInput::Producer(producer) => match producer() {
                Ok(value) => {
                    out.properties.insert(name, value);
                }
                Err(error) => {
                    out.properties.insert(name.clone(), Value::Null);
                    out.errors.insert(name, error);
                }
            },
        }
    }
    out
}
