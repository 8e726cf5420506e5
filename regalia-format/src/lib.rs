//! Field kinds and value formatting for Regalia
//!
//! This crate decides how a single attribute value is displayed:
//!
//! - [`FieldKindRegistry`]: per-model declarations of money, percent and date
//!   attributes, inherited along the model's parent chain
//! - [`ValueFormatter`]: the `strfval` dispatcher turning a [`Value`] into
//!   locale-aware text
//! - [`number`], [`money`], [`date`]: the rendering primitives behind it
//! - [`FormatConfig`]: process-wide defaults loaded with figment
//!
//! ```
//! use std::sync::Arc;
//! use regalia_common::{Catalog, PlainRecord, Value};
//! use regalia_format::{FieldKindRegistry, FormatConfig, FormatOptions, ModelDef, ValueFormatter};
//!
//! let registry = FieldKindRegistry::new()
//!     .with_model(ModelDef::new("Product").percent_fields(&["tax"]))
//!     .unwrap();
//! let formatter = ValueFormatter::new(
//!     Arc::new(registry),
//!     Arc::new(Catalog::new("en")),
//!     FormatConfig::default(),
//! );
//! let product = PlainRecord::new("Product").with("tax", 19);
//! let text = formatter.strfval(Some(&product), "tax", None, &FormatOptions::default());
//! assert_eq!(text.as_deref(), Some("19%"));
//! ```
//!
//! [`Value`]: regalia_common::Value

pub mod config;
pub mod date;
pub mod error;
pub mod formatter;
pub mod money;
pub mod number;
pub mod registry;

pub use config::FormatConfig;
pub use date::{date_format_options, DATE_FORMATS};
pub use error::{FormatError, FormatResult};
pub use formatter::{DateFormat, FormatOptions, ValueFormatter};
pub use money::{money_selects, money_symbols};
pub use number::auto_precision;
pub use registry::{ColumnDef, FieldKind, FieldKindRegistry, ModelDef};
