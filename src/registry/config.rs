use super::selector::SelectorParseError;
use crate::mask::presets::Preset;
use crate::mask::{CurrencyFormat, Mask, MaskParseError, PatternSet};
use serde::Deserialize;
use std::fmt;
use std::io;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    #[serde(default)]
    pub fields: Vec<RuleConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    pub name: String,
    pub selector: String,
    pub mask: MaskConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MaskConfig {
    Preset(Preset),
    Custom(CustomMaskConfig),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomMaskConfig {
    #[serde(default)]
    pub preset: Option<Preset>,
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub currency: Option<CurrencyConfig>,
    #[serde(default)]
    pub placeholder: Option<char>,
    #[serde(default)]
    pub uppercase: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CurrencyConfig {
    #[serde(default = "default_symbol")]
    pub symbol: String,
    #[serde(default = "default_thousands")]
    pub thousands: char,
    #[serde(default = "default_radix")]
    pub radix: char,
    #[serde(default = "default_scale")]
    pub scale: u32,
    #[serde(default = "default_max")]
    pub max: f64,
}

fn default_symbol() -> String {
    "R$ ".to_string()
}

fn default_thousands() -> char {
    '.'
}

fn default_radix() -> char {
    ','
}

fn default_scale() -> u32 {
    2
}

fn default_max() -> f64 {
    999_999_999.99
}

impl MaskConfig {
    pub fn build(&self, rule: &str) -> Result<Mask, ConfigError> {
        match self {
            Self::Preset(preset) => Ok(preset.mask()),
            Self::Custom(custom) => custom.build(rule),
        }
    }
}

impl CustomMaskConfig {
    fn build(&self, rule: &str) -> Result<Mask, ConfigError> {
        let sources = [
            self.preset.is_some(),
            !self.patterns.is_empty(),
            self.currency.is_some(),
        ]
        .into_iter()
        .filter(|set| *set)
        .count();
        if sources != 1 {
            return Err(ConfigError::rule(
                rule,
                "mask needs exactly one of `preset`, `patterns` or `currency`",
            ));
        }

        if let Some(currency) = &self.currency {
            if self.placeholder.is_some() || self.uppercase {
                return Err(ConfigError::rule(
                    rule,
                    "`placeholder` and `uppercase` do not apply to currency masks",
                ));
            }
            let format = CurrencyFormat::new(
                currency.symbol.clone(),
                currency.thousands,
                currency.radix,
                currency.scale,
                currency.max,
            )
            .map_err(|err| ConfigError::mask(rule, err))?;
            return Ok(Mask::Currency(format));
        }

        let set = match self.preset {
            Some(preset) => preset
                .pattern_set()
                .map_err(|err| ConfigError::mask(rule, err))?
                .ok_or_else(|| {
                    ConfigError::rule(rule, "the currency preset takes no pattern options")
                })?,
            None => PatternSet::parse(self.patterns.as_slice())
                .map_err(|err| ConfigError::mask(rule, err))?,
        };

        let set = if self.uppercase { set.uppercased() } else { set };
        let set = match self.placeholder {
            Some(placeholder) => set
                .with_placeholder(placeholder)
                .map_err(|err| ConfigError::mask(rule, err))?,
            None => set,
        };
        Ok(Mask::Pattern(set))
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: io::Error },
    Yaml(serde_yaml::Error),
    Selector { rule: String, source: SelectorParseError },
    Mask { rule: String, source: MaskParseError },
    Rule { rule: String, message: String },
}

impl ConfigError {
    pub(super) fn selector(rule: &str, source: SelectorParseError) -> Self {
        Self::Selector {
            rule: rule.to_string(),
            source,
        }
    }

    fn mask(rule: &str, source: MaskParseError) -> Self {
        Self::Mask {
            rule: rule.to_string(),
            source,
        }
    }

    pub(super) fn rule(rule: &str, message: impl Into<String>) -> Self {
        Self::Rule {
            rule: rule.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read {}: {source}", path.display()),
            Self::Yaml(err) => write!(f, "invalid registry config: {err}"),
            Self::Selector { rule, source } => write!(f, "rule `{rule}`: {source}"),
            Self::Mask { rule, source } => write!(f, "rule `{rule}`: {source}"),
            Self::Rule { rule, message } => write!(f, "rule `{rule}`: {message}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Yaml(err) => Some(err),
            Self::Selector { source, .. } => Some(source),
            Self::Mask { source, .. } => Some(source),
            Self::Rule { .. } => None,
        }
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Yaml(err)
    }
}
