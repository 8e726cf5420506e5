//! Field-kind registry
//!
//! Models are registered once, at model-definition time, with a [`ModelDef`]
//! that names the model's parent and declares which attributes hold money,
//! percentages or dates. Every query walks the parent chain, so a subclass
//! sees the union of its own declarations and those of all its ancestors.
//!
//! The registry is append-only. Build it up front, then share it read-only
//! (typically behind an `Arc`) with every formatter and builder.

use std::collections::HashMap;

use convert_case::{Case, Casing};
use indexmap::{IndexMap, IndexSet};
use regalia_common::{RegaliaError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Formatting kind a model attribute can be declared as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKind {
    Money,
    Percent,
    Date,
}

/// Column metadata used to size text inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// Registration record of one model class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Segment used in translation keys, `client_address` for `ClientAddress`
    pub i18n_key: String,
    /// Qualifier used in default sort fields
    pub table_name: String,
    #[serde(default)]
    pub money_fields: IndexSet<String>,
    #[serde(default)]
    pub percent_fields: IndexSet<String>,
    #[serde(default)]
    pub date_fields: IndexSet<String>,
    /// Enumerated values per attribute, in declaration order
    #[serde(default)]
    pub enums: IndexMap<String, Vec<String>>,
    #[serde(default)]
    pub columns: IndexMap<String, ColumnDef>,
    /// Associations rendered through nested attribute forms
    #[serde(default)]
    pub nested_attributes: IndexSet<String>,
}

impl ModelDef {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let i18n_key = name.to_case(Case::Snake);
        Self {
            table_name: format!("{i18n_key}s"),
            i18n_key,
            name,
            parent: None,
            money_fields: IndexSet::new(),
            percent_fields: IndexSet::new(),
            date_fields: IndexSet::new(),
            enums: IndexMap::new(),
            columns: IndexMap::new(),
            nested_attributes: IndexSet::new(),
        }
    }

    pub fn parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = table_name.into();
        self
    }

    pub fn money_fields(mut self, fields: &[&str]) -> Self {
        self.fields_mut(FieldKind::Money)
            .extend(fields.iter().map(|f| f.to_string()));
        self
    }

    pub fn percent_fields(mut self, fields: &[&str]) -> Self {
        self.fields_mut(FieldKind::Percent)
            .extend(fields.iter().map(|f| f.to_string()));
        self
    }

    pub fn date_fields(mut self, fields: &[&str]) -> Self {
        self.fields_mut(FieldKind::Date)
            .extend(fields.iter().map(|f| f.to_string()));
        self
    }

    /// Declare the finite set of symbolic values an attribute may hold.
    pub fn enum_field(mut self, field: &str, values: &[&str]) -> Self {
        self.enums.insert(
            field.to_string(),
            values.iter().map(|v| v.to_string()).collect(),
        );
        self
    }

    pub fn column(mut self, field: &str, limit: u32) -> Self {
        self.columns
            .insert(field.to_string(), ColumnDef { limit: Some(limit) });
        self
    }

    pub fn accepts_nested_attributes_for(mut self, association: &str) -> Self {
        self.nested_attributes.insert(association.to_string());
        self
    }

    /// Fields declared with `kind` on this model only (no ancestors).
    pub fn fields(&self, kind: FieldKind) -> &IndexSet<String> {
        match kind {
            FieldKind::Money => &self.money_fields,
            FieldKind::Percent => &self.percent_fields,
            FieldKind::Date => &self.date_fields,
        }
    }

    fn fields_mut(&mut self, kind: FieldKind) -> &mut IndexSet<String> {
        match kind {
            FieldKind::Money => &mut self.money_fields,
            FieldKind::Percent => &mut self.percent_fields,
            FieldKind::Date => &mut self.date_fields,
        }
    }
}

/// Registry of model declarations keyed by model name.
#[derive(Debug, Clone, Default)]
pub struct FieldKindRegistry {
    models: Vec<ModelDef>,
    name_index: HashMap<String, usize>,
}

impl FieldKindRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model. Its parent, if any, must already be registered and a
    /// name can only be registered once.
    pub fn register(&mut self, def: ModelDef) -> Result<()> {
        if self.name_index.contains_key(&def.name) {
            return Err(RegaliaError::argument(
                "register",
                format!("model {} is already registered", def.name),
            ));
        }
        if let Some(parent) = &def.parent {
            if !self.name_index.contains_key(parent) {
                return Err(RegaliaError::UnknownModel {
                    name: parent.clone(),
                });
            }
        }

        debug!(
            model = %def.name,
            parent = ?def.parent,
            money = def.money_fields.len(),
            percent = def.percent_fields.len(),
            date = def.date_fields.len(),
            "registered model"
        );

        let idx = self.models.len();
        self.name_index.insert(def.name.clone(), idx);
        self.models.push(def);
        Ok(())
    }

    /// Builder-style registration for setup code.
    pub fn with_model(mut self, def: ModelDef) -> Result<Self> {
        self.register(def)?;
        Ok(self)
    }

    /// Append field names of `kind` to an already registered model.
    pub fn declare(&mut self, model: &str, kind: FieldKind, fields: &[&str]) -> Result<()> {
        let idx = *self
            .name_index
            .get(model)
            .ok_or_else(|| RegaliaError::UnknownModel {
                name: model.to_string(),
            })?;
        debug!(model, ?kind, ?fields, "declared field kind");
        self.models[idx]
            .fields_mut(kind)
            .extend(fields.iter().map(|f| f.to_string()));
        Ok(())
    }

    pub fn model(&self, name: &str) -> Option<&ModelDef> {
        self.name_index.get(name).map(|&i| &self.models[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.name_index.contains_key(name)
    }

    /// The model followed by its parent, grandparent, ... Empty for unknown names.
    pub fn ancestors(&self, name: &str) -> Vec<&ModelDef> {
        let mut chain = Vec::new();
        let mut current = self.model(name);
        while let Some(def) = current {
            chain.push(def);
            current = def.parent.as_deref().and_then(|p| self.model(p));
        }
        chain
    }

    /// Whether `field` is declared with `kind` on `model` or any ancestor.
    /// Unknown models have no declared fields.
    pub fn is_kind(&self, model: &str, kind: FieldKind, field: &str) -> bool {
        self.ancestors(model)
            .iter()
            .any(|def| def.fields(kind).contains(field))
    }

    /// Union of the fields declared with `kind` along the ancestor chain.
    pub fn fields_of_kind(&self, model: &str, kind: FieldKind) -> IndexSet<String> {
        self.ancestors(model)
            .iter()
            .flat_map(|def| def.fields(kind).iter().cloned())
            .collect()
    }

    /// Enumerated values of `field`, nearest declaration wins.
    pub fn enum_values(&self, model: &str, field: &str) -> Option<&[String]> {
        self.ancestors(model)
            .into_iter()
            .find_map(|def| def.enums.get(field))
            .map(Vec::as_slice)
    }

    pub fn column(&self, model: &str, field: &str) -> Option<&ColumnDef> {
        self.ancestors(model)
            .into_iter()
            .find_map(|def| def.columns.get(field))
    }

    pub fn accepts_nested_attributes(&self, model: &str, association: &str) -> bool {
        self.ancestors(model)
            .iter()
            .any(|def| def.nested_attributes.contains(association))
    }

    /// Translation key segments of the model and its ancestors. Unknown models
    /// fall back to the snake-cased name.
    pub fn i18n_keys(&self, model: &str) -> Vec<String> {
        let chain = self.ancestors(model);
        if chain.is_empty() {
            vec![model.to_case(Case::Snake)]
        } else {
            chain.iter().map(|def| def.i18n_key.clone()).collect()
        }
    }

    pub fn table_name(&self, model: &str) -> String {
        self.model(model)
            .map(|def| def.table_name.clone())
            .unwrap_or_else(|| format!("{}s", model.to_case(Case::Snake)))
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> FieldKindRegistry {
        FieldKindRegistry::new()
            .with_model(
                ModelDef::new("Document")
                    .money_fields(&["total", "net_total"])
                    .percent_fields(&["discount"])
                    .date_fields(&["date"])
                    .enum_field("status", &["draft", "open", "closed"])
                    .column("title", 100),
            )
            .unwrap()
            .with_model(ModelDef::new("Invoice").parent("Document"))
            .unwrap()
            .with_model(
                ModelDef::new("CreditNote")
                    .parent("Invoice")
                    .money_fields(&["refund"])
                    .enum_field("status", &["draft", "refunded"]),
            )
            .unwrap()
    }

    #[test]
    fn test_model_def_derives_keys() {
        let def = ModelDef::new("LineItem");
        assert_eq!(def.i18n_key, "line_item");
        assert_eq!(def.table_name, "line_items");
    }

    #[test]
    fn test_is_kind_on_declaring_class() {
        let registry = registry();
        assert!(registry.is_kind("Document", FieldKind::Money, "total"));
        assert!(registry.is_kind("Document", FieldKind::Percent, "discount"));
        assert!(registry.is_kind("Document", FieldKind::Date, "date"));
        assert!(!registry.is_kind("Document", FieldKind::Money, "discount"));
    }

    #[test]
    fn test_is_kind_inherited_by_subclass_without_declarations() {
        let registry = registry();
        assert!(registry.is_kind("Invoice", FieldKind::Money, "total"));
        assert!(registry.is_kind("CreditNote", FieldKind::Money, "total"));
        assert!(registry.is_kind("CreditNote", FieldKind::Date, "date"));
    }

    #[test]
    fn test_subclass_declarations_do_not_leak_upwards() {
        let registry = registry();
        assert!(registry.is_kind("CreditNote", FieldKind::Money, "refund"));
        assert!(!registry.is_kind("Invoice", FieldKind::Money, "refund"));
        assert!(!registry.is_kind("Document", FieldKind::Money, "refund"));
    }

    #[test]
    fn test_unknown_model_is_never_a_kind() {
        assert!(!registry().is_kind("Ghost", FieldKind::Money, "total"));
    }

    #[test]
    fn test_declare_appends() {
        let mut registry = registry();
        registry
            .declare("Invoice", FieldKind::Money, &["shipping"])
            .unwrap();
        assert!(registry.is_kind("Invoice", FieldKind::Money, "shipping"));
        assert!(registry.is_kind("Invoice", FieldKind::Money, "total"));
        assert!(registry.is_kind("CreditNote", FieldKind::Money, "shipping"));

        let err = registry
            .declare("Ghost", FieldKind::Money, &["total"])
            .unwrap_err();
        assert!(matches!(err, RegaliaError::UnknownModel { .. }));
    }

    #[test]
    fn test_register_requires_known_parent_and_unique_name() {
        let mut registry = registry();
        let err = registry
            .register(ModelDef::new("Orphan").parent("Missing"))
            .unwrap_err();
        assert!(matches!(err, RegaliaError::UnknownModel { name } if name == "Missing"));

        let err = registry.register(ModelDef::new("Invoice")).unwrap_err();
        assert!(err.is_argument());
    }

    #[test]
    fn test_ancestor_chain_and_lookups() {
        let registry = registry();
        let names: Vec<&str> = registry
            .ancestors("CreditNote")
            .iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(names, vec!["CreditNote", "Invoice", "Document"]);
        assert_eq!(
            registry.i18n_keys("CreditNote"),
            vec!["credit_note", "invoice", "document"]
        );
        assert_eq!(registry.i18n_keys("ClientAddress"), vec!["client_address"]);

        // nearest declaration wins
        assert_eq!(
            registry.enum_values("CreditNote", "status").unwrap(),
            &["draft".to_string(), "refunded".to_string()]
        );
        assert_eq!(registry.enum_values("Invoice", "status").unwrap().len(), 3);
        assert_eq!(registry.column("Invoice", "title").unwrap().limit, Some(100));

        let money = registry.fields_of_kind("CreditNote", FieldKind::Money);
        assert_eq!(
            money.into_iter().collect::<Vec<_>>(),
            vec!["refund", "total", "net_total"]
        );
    }
}
