//! `${name}` placeholders substituted into raw resource text before it is
//! parsed as YAML.

use std::collections::BTreeMap;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateVarError {
    #[error("invalid template variable '{0}': expected NAME=VALUE")]
    MissingSeparator(String),
}

/// A single `NAME=VALUE` assignment from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateVar {
    pub name: String,
    pub value: String,
}

impl FromStr for TemplateVar {
    type Err = TemplateVarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, value) = s
            .split_once('=')
            .ok_or_else(|| TemplateVarError::MissingSeparator(s.to_string()))?;
        Ok(Self {
            name: name.to_string(),
            value: value.to_string(),
        })
    }
}

/// clap value parser for `NAME=VALUE` arguments.
pub fn parse_template_var(s: &str) -> Result<TemplateVar, TemplateVarError> {
    s.parse()
}

/// Substitution table. A later assignment to the same name replaces an
/// earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateVars(BTreeMap<String, String>);

impl TemplateVars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Replace every `${name}` with its value as plain text.
    ///
    /// Placeholders without a matching variable are left untouched.
    pub fn apply(&self, text: &str) -> String {
        self.0.iter().fold(text.to_string(), |acc, (name, value)| {
            acc.replace(&format!("${{{}}}", name), value)
        })
    }
}

impl FromIterator<TemplateVar> for TemplateVars {
    fn from_iter<I: IntoIterator<Item = TemplateVar>>(iter: I) -> Self {
        let mut vars = Self::new();
        for var in iter {
            vars.insert(var.name, var.value);
        }
        vars
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for TemplateVars {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut vars = Self::new();
        for (name, value) in iter {
            vars.insert(name, value);
        }
        vars
    }
}
