//! Per-kind property schemas and property checking.
//!
//! Each element kind declares the properties it understands as a list of
//! [`PropertySpec`]s (name plus [`TypeDescriptor`]). Checking validates the
//! literal values in a node's bag against those descriptors before they
//! reach generation or runtime. Expression values are only checked for
//! presence/shape: a blank expression counts as absent, anything else is
//! accepted as-is. Expression content is never parsed here.

use crate::model::{Element, PropertyValue};
use crate::notify::{Notification, NotificationBus};
use crate::types::{FlagOptions, NumberOptions, TextOptions, TypeDescriptor};
use serde_json::Value;

/// One declared property of an element kind.
#[derive(Debug)]
pub struct PropertySpec {
    pub name: &'static str,
    pub descriptor: TypeDescriptor,
}

/// Ordered validation failures for one property of one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyFailure {
    pub property: String,
    pub failures: Vec<String>,
}

/// The property schema for an element kind. Exhaustive over the closed
/// variant set; adding a kind forces a schema decision here.
pub fn schema_for(element: &Element) -> Vec<PropertySpec> {
    match element {
        Element::Text(_) => vec![
            PropertySpec {
                name: "text",
                descriptor: TypeDescriptor::text(
                    TextOptions {
                        required: true,
                        description: Some("Text shown by the element".to_string()),
                    },
                    vec![],
                ),
            },
            PropertySpec {
                name: "visible",
                descriptor: TypeDescriptor::true_false(FlagOptions::default(), vec![]),
            },
        ],
        Element::Button(_) => vec![
            PropertySpec {
                name: "label",
                descriptor: TypeDescriptor::text(
                    TextOptions {
                        required: true,
                        description: Some("Button caption".to_string()),
                    },
                    vec![],
                ),
            },
            PropertySpec {
                name: "enabled",
                descriptor: TypeDescriptor::true_false(FlagOptions::default(), vec![]),
            },
        ],
        Element::Image(_) => vec![
            PropertySpec {
                name: "source",
                descriptor: TypeDescriptor::text(
                    TextOptions {
                        required: true,
                        description: Some("Image location".to_string()),
                    },
                    vec![],
                ),
            },
            PropertySpec {
                name: "width",
                descriptor: TypeDescriptor::number(
                    NumberOptions {
                        min: Some(0.0),
                        ..Default::default()
                    },
                    vec![],
                ),
            },
            PropertySpec {
                name: "height",
                descriptor: TypeDescriptor::number(
                    NumberOptions {
                        min: Some(0.0),
                        ..Default::default()
                    },
                    vec![],
                ),
            },
        ],
    }
}

/// Validate every declared property of `element` against its bag. A missing
/// bag entry is absent; a literal goes through the descriptor; an expression
/// is absent when blank and otherwise accepted verbatim.
pub fn check_element(element: &Element) -> Vec<PropertyFailure> {
    let bag = element.properties();
    schema_for(element)
        .iter()
        .filter_map(|spec| {
            let failures = match bag.get(spec.name) {
                None => spec.descriptor.validate(&Value::Null),
                Some(PropertyValue::Literal(value)) => spec.descriptor.validate(value),
                Some(PropertyValue::Expression(code)) => {
                    if code.trim().is_empty() {
                        spec.descriptor.validate(&Value::Null)
                    } else {
                        None
                    }
                }
            };
            failures.map(|failures| PropertyFailure {
                property: spec.name.to_string(),
                failures,
            })
        })
        .collect()
}

/// Check `element` and publish one notification per failing property.
/// Returns the number of notifications published.
pub fn report_failures(element: &Element, bus: &NotificationBus) -> usize {
    let failures = check_element(element);
    if !failures.is_empty() {
        tracing::debug!(
            element = element.id(),
            count = failures.len(),
            "property validation failures"
        );
    }
    for failure in &failures {
        bus.publish(&Notification {
            source: element.id().to_string(),
            property: Some(failure.property.clone()),
            messages: failure.failures.clone(),
        });
    }
    failures.len()
}
