//! # Atelier Core
//!
//! Headless core of the Atelier app builder: the declarative object model,
//! the property/type validation subsystem, and the generator that compiles
//! an application tree into runnable JavaScript artifacts. The visual
//! editor, storage, bundler, and the runtime that executes generated output
//! are external collaborators: they build and own the tree; this crate
//! only reads it.
//!
//! ## Ground rules
//!
//! 1. **The tree is data.** `Application` → `Page`s → `Element`s is a pure
//!    data structure: construction validates nothing, evaluates nothing.
//!    Node identity is `id`; id uniqueness is the builder's obligation,
//!    checkable via `Application::verify_unique_ids`.
//! 2. **Ordering is meaning.** Child order is significant and preserved
//!    through edits, serialization, and generation. Reordering siblings
//!    reorders the output and changes nothing else.
//! 3. **Expressions are opaque.** A property expression is a string in the
//!    target language's syntax. It is carried and emitted verbatim, never
//!    parsed or type-checked. A malformed expression fails where it runs,
//!    not here.
//! 4. **Validation is a value, not an error.** `TypeDescriptor::validate`
//!    returns an ordered list of human-readable failure descriptions for
//!    inline display; property evaluation catches producer failures per
//!    property. The only `Err` in this crate is a generation contract
//!    violation (empty node id/name).
//! 5. **Everything is synchronous and pure.** Validation, evaluation, and
//!    generation are pure functions over their inputs; concurrent
//!    invocations over one tree need no locking.

mod codegen;
mod error;
mod eval;
mod model;
mod notify;
mod sanitize;
mod schema;
mod types;

pub use codegen::{generate, Artifact};
pub use error::{GenerateError, ModelError, PropertyError};
pub use eval::{evaluate, EvaluatedProperties, PropertyInput};
pub use model::{
    Application, ButtonElement, Element, ImageElement, NodeRef, Page, PropertyBag, PropertyValue,
    TextElement,
};
pub use notify::{Notification, NotificationBus};
pub use sanitize::sanitize_identifier;
pub use schema::{check_element, report_failures, schema_for, PropertyFailure, PropertySpec};
pub use types::{
    Bound, DateOptions, FlagOptions, Kind, NumberOptions, Rule, TextOptions, TypeDescriptor,
    DATE_STORAGE_FORMAT,
};
