//! Shared building blocks for Regalia
//!
//! `regalia-common` holds everything the rendering crates need from their
//! surroundings, expressed as plain Rust interfaces:
//!
//! - **HTML emission**: [`html`] writes tags with ordered, escaped attributes
//! - **Translations**: [`Translator`] lookups with fallback chains, and the
//!   YAML backed [`Catalog`]
//! - **Model access**: the [`Record`] trait and the tagged [`Value`]
//! - **Errors**: [`RegaliaError`] with [`Severity`] classification

pub mod error;
pub mod html;
pub mod i18n;
pub mod logging;
pub mod model;

pub use error::{ErrorSeverity, RegaliaError, Result, Severity};
pub use html::{Attributes, ClassList};
pub use i18n::{humanize, Catalog, Translator};
pub use logging::Pretty;
pub use model::{CurrencyFormat, PlainRecord, Record, Value};
