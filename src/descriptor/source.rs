//! Where incoming resources come from and how their text is turned into
//! [`Resource`] entries.
//!
//! A source holds one or more YAML documents. Each document is either a
//! single resource or a mapping with a `resources` sequence, which is
//! flattened one level.

use std::fmt;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_yaml::Value;
use thiserror::Error;

use super::resource::Resource;
use super::template::TemplateVars;

const RESOURCES_KEY: &str = "resources";

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to parse document {document}")]
    Parse {
        document: usize,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("document {document}: `resources` must be a sequence")]
    InvalidResources { document: usize },
    #[error("document {document}: resource {index} is not a mapping")]
    InvalidResource { document: usize, index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceSource {
    File(PathBuf),
    Stdin,
    /// Text already in memory, labelled for messages.
    Inline { label: String, text: String },
}

impl ResourceSource {
    pub fn read_to_string(&self) -> Result<String> {
        match self {
            ResourceSource::File(path) => fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display())),
            ResourceSource::Stdin => {
                let mut text = String::new();
                io::stdin()
                    .read_to_string(&mut text)
                    .context("failed to read resources from stdin")?;
                Ok(text)
            }
            ResourceSource::Inline { text, .. } => Ok(text.clone()),
        }
    }

    /// Read the source, substitute template variables and parse every
    /// resource it contains.
    pub fn resources(&self, vars: &TemplateVars) -> Result<Vec<Resource>> {
        let text = vars.apply(&self.read_to_string()?);
        parse_resources(&text)
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("invalid resources in {}", self))
    }
}

impl fmt::Display for ResourceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceSource::File(path) => write!(f, "{}", path.display()),
            ResourceSource::Stdin => f.write_str("stdin"),
            ResourceSource::Inline { label, .. } => f.write_str(label),
        }
    }
}

/// Lazily parse resources from YAML text, document by document.
///
/// Empty documents are skipped.
pub fn parse_resources(text: &str) -> impl Iterator<Item = Result<Resource, SourceError>> + '_ {
    serde_yaml::Deserializer::from_str(text)
        .enumerate()
        .flat_map(|(document, de)| match Value::deserialize(de) {
            Ok(value) => expand_document(document, value),
            Err(source) => vec![Err(SourceError::Parse { document, source })],
        })
}

fn expand_document(document: usize, value: Value) -> Vec<Result<Resource, SourceError>> {
    match value {
        Value::Null => Vec::new(),
        Value::Mapping(mut mapping) => match mapping.remove(RESOURCES_KEY) {
            Some(Value::Sequence(entries)) => entries
                .into_iter()
                .enumerate()
                .map(|(index, entry)| match entry {
                    Value::Mapping(fields) => Ok(Resource::new(fields)),
                    _ => Err(SourceError::InvalidResource { document, index }),
                })
                .collect(),
            Some(Value::Null) => Vec::new(),
            Some(_) => vec![Err(SourceError::InvalidResources { document })],
            None => vec![Ok(Resource::new(mapping))],
        },
        _ => vec![Err(SourceError::InvalidResource { document, index: 0 })],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(resources: &[Resource]) -> Vec<&str> {
        resources
            .iter()
            .map(|r| r.get("name").and_then(Value::as_str).unwrap_or(""))
            .collect()
    }

    fn parse(text: &str) -> Vec<Resource> {
        parse_resources(text).collect::<Result<_, _>>().unwrap()
    }

    #[test]
    fn single_resource_document() {
        let resources = parse("name: a\nversion: '1'\ntype: t1\n");
        assert_eq!(names(&resources), ["a"]);
    }

    #[test]
    fn flattens_resources_key() {
        let resources = parse("resources:\n- name: a\n  type: t1\n- name: b\n  type: t1\n");
        assert_eq!(names(&resources), ["a", "b"]);
    }

    #[test]
    fn mixes_documents() {
        let text = "\
name: a
type: t1
---
resources:
- name: b
- name: c
---
name: d
---
";
        assert_eq!(names(&parse(text)), ["a", "b", "c", "d"]);
    }

    #[test]
    fn flattens_only_one_level() {
        let text = "resources:\n- name: outer\n  resources:\n  - name: inner\n";
        let resources = parse(text);
        assert_eq!(names(&resources), ["outer"]);
        assert!(resources[0].get("resources").is_some());
    }

    #[test]
    fn empty_text_yields_nothing() {
        assert!(parse("").is_empty());
        assert!(parse("---\n").is_empty());
    }

    #[test]
    fn rejects_non_mapping_entries() {
        let err = parse_resources("resources:\n- name: a\n- just-a-string\n")
            .collect::<Result<Vec<_>, _>>()
            .unwrap_err();
        assert!(matches!(
            err,
            SourceError::InvalidResource {
                document: 0,
                index: 1
            }
        ));
    }

    #[test]
    fn rejects_scalar_resources_key() {
        let err = parse_resources("resources: nope\n")
            .collect::<Result<Vec<_>, _>>()
            .unwrap_err();
        assert!(matches!(err, SourceError::InvalidResources { document: 0 }));
    }

    #[test]
    fn reports_malformed_yaml() {
        let err = parse_resources("name: a\n---\nname: [unclosed\n")
            .collect::<Result<Vec<_>, _>>()
            .unwrap_err();
        assert!(matches!(err, SourceError::Parse { .. }));
    }

    #[test]
    fn substitutes_before_parsing() {
        let source = ResourceSource::Inline {
            label: "inline".to_string(),
            text: "name: ${NAME}\nversion: ${VERSION}\ntype: t1\n".to_string(),
        };
        let vars: TemplateVars = [("NAME", "bar"), ("VERSION", "'2.0'")]
            .into_iter()
            .collect();
        let resources = source.resources(&vars).unwrap();
        assert_eq!(names(&resources), ["bar"]);
        assert_eq!(
            resources[0].get("version"),
            Some(&Value::String("2.0".to_string()))
        );
    }

    #[test]
    fn describes_sources() {
        assert_eq!(ResourceSource::Stdin.to_string(), "stdin");
        assert_eq!(
            ResourceSource::File(PathBuf::from("res.yaml")).to_string(),
            "res.yaml"
        );
    }
}
