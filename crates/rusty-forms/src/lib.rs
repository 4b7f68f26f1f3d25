//! # rusty-forms
//!
//! A small reactive form model with cross-field validation.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rusty_forms::{FormControl, FormGroup};
//! use rusty_forms::validation::{email, required, required_if_all_equal};
//! use serde_json::json;
//!
//! let mut form = FormGroup::builder()
//!     .control("canProvideEmail", FormControl::plain(false))
//!     .control(
//!         "email",
//!         FormControl::new("", [email(), required_if_all_equal([("canProvideEmail", json!(true))])]),
//!     )
//!     .build()?;
//!
//! assert!(form.is_valid());
//! form.set_value("canProvideEmail", true)?;
//! assert!(form.errors("email").is_some());
//! ```
//!
//! ## How requiredness stays current
//!
//! Validators do not hold state. When a conditional validator runs inside a
//! group it asks, through its [`FieldContext`](validation::FieldContext), to
//! observe the siblings it reads. The group records those requests in its
//! [`DependencyRegistry`], once per (field, sibling) pair, and revalidates the
//! field whenever one of them changes.
//!
//! A control validated before it has a group leaves a pending recheck. The
//! group queues it on attachment and drains the queue either automatically
//! (`recheck.auto_flush`, the default) or on [`FormGroup::flush_pending`].

pub mod config;
pub mod control;
pub mod error;
pub mod group;
pub mod registry;

pub use config::FormConfig;
pub use control::FormControl;
pub use error::{FormError, FormResult};
pub use group::{FieldId, FormGroup, FormGroupBuilder, RevalidateOptions, SubscriptionId};
pub use registry::DependencyRegistry;

// Re-export the validator set
pub use rusty_forms_validation as validation;
pub use rusty_forms_validation::{ValidationErrors, ValidatorFn};
