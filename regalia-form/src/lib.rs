//! Form builders for Regalia
//!
//! A [`FormBuilder`] renders labeled inputs for one object. Where a field ends
//! up depends on the builder's [`RenderContext`]:
//!
//! - plain sections wrap it according to the [`FormStyle`], either
//!   `dt`/`dd` pairs or `label` plus input inside a `div`
//! - [`FormBuilder::bundle`] collects several inputs under one caption
//! - [`FormBuilder::table`] turns fields into cells and collects the column
//!   headers from the first row
//!
//! [`form_for`] and [`fields_for`] are the entry points; associated records
//! are rendered with [`FormBuilder::render_nested_form`].

pub mod builder;
pub mod choices;
pub mod context;
pub mod fields;
pub mod helper;
pub mod nested;
pub mod options;
pub mod wrapper;

pub use builder::{sanitize_id, FieldDescriptor, FormBuilder, MetadataKind, SectionOptions};
pub use choices::{ChoiceSet, OptionGroup, SelectOption};
pub use context::{Align, ColumnHeader, RenderContext, RenderMode};
pub use helper::{
    dl_fields_for, dl_form_for, extra_tags_for_form, fields_for, form_for, labeled_fields_for,
    labeled_form_for, make_select, make_select_with, token_tag, FormMethod, FormSettings,
};
pub use nested::NestedFormOptions;
pub use options::{FieldName, FieldOptions, Info};
pub use wrapper::{FormStyle, InputKind, WrapOptions};
