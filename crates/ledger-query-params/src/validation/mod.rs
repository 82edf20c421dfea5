//! # Validation Layer
//!
//! Declarative per-field validation without runtime reflection.
//!
//! ```text
//! RawQueryParams ──► QueryBinder::bind::<T>() ──► T (validated)
//!                          │
//!                          ├── T::fields()      ordered FieldSpec table
//!                          └── ValidationRegistry (frozen, shared)
//! ```

pub mod binder;
pub mod registry;
pub mod rules;
pub mod shape;

pub use binder::QueryBinder;
pub use registry::{ContextPredicate, FieldLookup, FieldPredicate, ValidationRegistry, ValidationRule};
pub use shape::{FieldSpec, QueryShape, RawQueryParams, RuleRef};
