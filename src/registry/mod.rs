//! Explicit table of which fields get which mask, and the routine that binds
//! masks to the fields a page exposes.

mod config;
mod selector;

pub use config::{
    ConfigError, CurrencyConfig, CustomMaskConfig, MaskConfig, RegistryConfig, RuleConfig,
};
pub use selector::{AttrFilter, AttrOp, CompoundSelector, FieldSelector, SelectorParseError};

use crate::field::MaskedField;
use crate::mask::Mask;
use indexmap::IndexMap;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Rules reproducing the page this crate was built for.
const BUILTIN_RULES: &str = include_str!("builtin.yaml");

/// A form field as the binding shim discovered it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub tag: String,
    #[serde(default)]
    pub attrs: IndexMap<String, String>,
    #[serde(default)]
    pub value: String,
}

impl FieldDescriptor {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn input() -> Self {
        Self::new("input")
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn with_id(self, id: impl Into<String>) -> Self {
        self.with_attr("id", id)
    }

    pub fn with_name(self, name: impl Into<String>) -> Self {
        self.with_attr("name", name)
    }

    pub fn with_type(self, input_type: impl Into<String>) -> Self {
        self.with_attr("type", input_type)
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    pub fn name(&self) -> Option<&str> {
        self.attr("name")
    }

    /// Key the field is stored under once attached: id, then name.
    fn key(&self, position: usize) -> String {
        self.id()
            .or_else(|| self.name())
            .map(str::to_string)
            .unwrap_or_else(|| format!("field-{position}"))
    }
}

#[derive(Debug, Clone)]
pub struct FieldRule {
    pub name: String,
    pub selector: FieldSelector,
    pub mask: Mask,
}

#[derive(Debug, Clone, Default)]
pub struct MaskRegistry {
    rules: Vec<FieldRule>,
}

impl MaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// CNPJ, phone, currency, CPF, CEP, plate and year rules of the order
    /// form, in page order.
    pub fn builtin() -> Self {
        Self::from_yaml(BUILTIN_RULES).expect("builtin registry config is valid")
    }

    pub fn from_yaml(source: &str) -> Result<Self, ConfigError> {
        let config: RegistryConfig = serde_yaml::from_str(source)?;
        Self::from_config(&config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(source.as_str())
    }

    pub fn from_config(config: &RegistryConfig) -> Result<Self, ConfigError> {
        let mut registry = Self::new();
        for rule in &config.fields {
            if registry.rules.iter().any(|existing| existing.name == rule.name) {
                return Err(ConfigError::rule(rule.name.as_str(), "duplicate rule name"));
            }
            let selector = FieldSelector::parse(rule.selector.as_str())
                .map_err(|err| ConfigError::selector(rule.name.as_str(), err))?;
            let mask = rule.mask.build(rule.name.as_str())?;
            registry.push(rule.name.clone(), selector, mask);
        }
        Ok(registry)
    }

    pub fn with_rule(
        mut self,
        name: impl Into<String>,
        selector: &str,
        mask: Mask,
    ) -> Result<Self, SelectorParseError> {
        let selector = FieldSelector::parse(selector)?;
        self.push(name, selector, mask);
        Ok(self)
    }

    pub fn push(&mut self, name: impl Into<String>, selector: FieldSelector, mask: Mask) {
        self.rules.push(FieldRule {
            name: name.into(),
            selector,
            mask,
        });
    }

    pub fn rules(&self) -> &[FieldRule] {
        self.rules.as_slice()
    }

    /// First rule whose selector matches the field.
    pub fn rule_for(&self, field: &FieldDescriptor) -> Option<&FieldRule> {
        self.rules.iter().find(|rule| rule.selector.matches(field))
    }

    /// Binds a mask to every field a rule matches and applies the mask to
    /// the field's current value.
    pub fn attach<I>(&self, fields: I) -> AttachedForm
    where
        I: IntoIterator<Item = FieldDescriptor>,
    {
        let mut counts: IndexMap<&str, usize> = self
            .rules
            .iter()
            .map(|rule| (rule.name.as_str(), 0usize))
            .collect();
        let mut attached: IndexMap<String, AttachedField> = IndexMap::new();

        for (position, descriptor) in fields.into_iter().enumerate() {
            let Some(rule) = self.rule_for(&descriptor) else {
                debug!("no mask for field {:?}", descriptor.key(position));
                continue;
            };
            if let Some(count) = counts.get_mut(rule.name.as_str()) {
                *count += 1;
            }

            let mut key = descriptor.key(position);
            if attached.contains_key(key.as_str()) {
                let mut suffix = position;
                while attached.contains_key(format!("{key}-{suffix}").as_str()) {
                    suffix += 1;
                }
                debug!("field key {key:?} is taken, using {key}-{suffix}");
                key = format!("{key}-{suffix}");
            }
            let converted_from_number =
                rule.mask.is_currency() && descriptor.attr("type") == Some("number");
            if converted_from_number {
                debug!("field {key:?} switched from type=number to text for currency masking");
            }

            let field = MaskedField::new(key.clone(), rule.mask.clone())
                .with_value(descriptor.value.as_str());
            attached.insert(
                key,
                AttachedField {
                    rule: rule.name.clone(),
                    converted_from_number,
                    descriptor,
                    field,
                },
            );
        }

        info!("masks attached:");
        for (rule, count) in &counts {
            info!("  - {rule}: {count} field(s)");
        }

        AttachedForm { fields: attached }
    }
}

#[derive(Debug, Clone)]
pub struct AttachedField {
    pub rule: String,
    /// The field was a numeric input and must be rendered as text now.
    pub converted_from_number: bool,
    pub descriptor: FieldDescriptor,
    pub field: MaskedField,
}

/// The masked fields of one form, keyed by field id (or name).
#[derive(Debug, Clone, Default)]
pub struct AttachedForm {
    fields: IndexMap<String, AttachedField>,
}

impl AttachedForm {
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttachedField> {
        self.fields.values()
    }

    pub fn get(&self, key: &str) -> Option<&AttachedField> {
        self.fields.get(key)
    }

    pub fn field(&self, key: &str) -> Option<&MaskedField> {
        self.fields.get(key).map(|attached| &attached.field)
    }

    pub fn field_mut(&mut self, key: &str) -> Option<&mut MaskedField> {
        self.fields.get_mut(key).map(|attached| &mut attached.field)
    }

    pub fn field_at_mut(&mut self, index: usize) -> Option<&mut MaskedField> {
        self.fields
            .get_index_mut(index)
            .map(|(_, attached)| &mut attached.field)
    }

    pub fn get_unmasked_value(&self, key: &str) -> Option<String> {
        self.field(key).map(MaskedField::unmasked_value)
    }

    /// `0.0` for fields whose text is not a number; `None` only for unknown
    /// keys.
    pub fn get_currency_value(&self, key: &str) -> Option<f64> {
        self.field(key).map(MaskedField::currency_value)
    }

    /// Canonical values for submission, in field order.
    pub fn unmasked_values(&self) -> IndexMap<String, String> {
        self.fields
            .iter()
            .map(|(key, attached)| (key.clone(), attached.field.unmasked_value()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldDescriptor, MaskRegistry};
    use crate::mask::presets;

    fn page_fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::input().with_id("id_cnpj").with_name("cnpj"),
            FieldDescriptor::input().with_id("id_telefone").with_name("telefone"),
            FieldDescriptor::input()
                .with_id("id_valor_unitario")
                .with_name("valor_unitario")
                .with_type("number")
                .with_attr("step", "0.01")
                .with_value("1234.5"),
            FieldDescriptor::input().with_id("id_nome").with_name("nome"),
            FieldDescriptor::input().with_name("placa_veiculo").with_value("abc1d23"),
            FieldDescriptor::input().with_id("id_ano").with_name("ano").with_value("2024"),
        ]
    }

    #[test]
    fn builtin_rules_follow_page_order() {
        let registry = MaskRegistry::builtin();
        let names: Vec<&str> = registry.rules().iter().map(|rule| rule.name.as_str()).collect();
        assert_eq!(names, ["cnpj", "telefone", "moeda", "cpf", "cep", "placa", "ano"]);
    }

    #[test]
    fn attach_binds_matching_fields_only() {
        let form = MaskRegistry::builtin().attach(page_fields());
        assert_eq!(form.len(), 5);
        assert!(form.field("id_nome").is_none());

        let keys: Vec<&str> = form.keys().collect();
        assert_eq!(
            keys,
            ["id_cnpj", "id_telefone", "id_valor_unitario", "placa_veiculo", "id_ano"]
        );
    }

    #[test]
    fn attach_applies_initial_values() {
        let form = MaskRegistry::builtin().attach(page_fields());

        let money = form.get("id_valor_unitario").expect("currency field");
        assert_eq!(money.rule, "moeda");
        assert!(money.converted_from_number);
        assert_eq!(money.field.text(), "R$ 1.234,50");
        assert_eq!(form.get_currency_value("id_valor_unitario"), Some(1234.5));

        assert_eq!(form.field("placa_veiculo").expect("plate").text(), "ABC1D23");
        assert_eq!(form.get_unmasked_value("id_ano").as_deref(), Some("2024"));
        assert_eq!(form.get_unmasked_value("missing"), None);
    }

    #[test]
    fn fields_are_edited_independently() {
        let mut form = MaskRegistry::builtin().attach(page_fields());
        let update = form
            .field_mut("id_cnpj")
            .expect("cnpj")
            .on_paste("12.345.678/0001-95", 18);
        assert_eq!(update.text, "12.345.678/0001-95");
        assert_eq!(form.field("id_telefone").expect("phone").text(), "");

        let values = form.unmasked_values();
        assert_eq!(values.get("id_cnpj").map(String::as_str), Some("12345678000195"));
        assert_eq!(values.get("id_telefone").map(String::as_str), Some(""));
    }

    #[test]
    fn first_matching_rule_wins() {
        let registry = MaskRegistry::new()
            .with_rule("year", r#"input[name*="ano"]"#, presets::year())
            .expect("rule")
            .with_rule("cep", r#"input[name*="cep"]"#, presets::cep())
            .expect("rule");
        let field = FieldDescriptor::input().with_name("cep_ano");
        assert_eq!(registry.rule_for(&field).map(|rule| rule.name.as_str()), Some("year"));
    }

    #[test]
    fn same_named_fields_are_all_kept() {
        let form = MaskRegistry::builtin().attach([
            FieldDescriptor::input().with_name("valor").with_value("10"),
            FieldDescriptor::input().with_name("valor").with_value("20"),
        ]);
        assert_eq!(form.len(), 2);
        let keys: Vec<&str> = form.keys().collect();
        assert_eq!(keys, ["valor", "valor-1"]);
        assert_eq!(form.get_currency_value("valor"), Some(10.0));
        assert_eq!(form.get_currency_value("valor-1"), Some(20.0));
    }

    #[test]
    fn unnamed_fields_get_positional_keys() {
        let registry = MaskRegistry::new()
            .with_rule("cep", "input[data-mask=cep]", presets::cep())
            .expect("rule");
        let form = registry.attach([FieldDescriptor::input().with_attr("data-mask", "cep")]);
        assert!(form.field("field-0").is_some());
    }

    #[test]
    fn duplicate_rule_names_are_rejected() {
        let yaml = r#"
fields:
  - { name: a, selector: '#a', mask: cpf }
  - { name: a, selector: '#b', mask: cep }
"#;
        assert!(MaskRegistry::from_yaml(yaml).is_err());
    }

    #[test]
    fn bad_selector_names_the_rule() {
        let yaml = r#"
fields:
  - { name: broken, selector: 'input[name', mask: cpf }
"#;
        let err = MaskRegistry::from_yaml(yaml).expect_err("selector");
        assert!(err.to_string().starts_with("rule `broken`"));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = MaskRegistry::load("/nonexistent/fieldmask.yaml").expect_err("io");
        assert!(err.to_string().contains("/nonexistent/fieldmask.yaml"));
    }
}
