pub mod merge;
pub mod resource;
pub mod source;
pub mod template;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_yaml::{Mapping, Value};
use thiserror::Error;

use crate::descriptor::resource::Resource;

pub use merge::{add_resources, merge_resources, AddResourcesRequest, MergeReport};
pub use resource::ResourceIdentity;
pub use source::ResourceSource;
pub use template::{TemplateVar, TemplateVars};

/// Filename of the descriptor inside a component archive directory.
pub const DESCRIPTOR_FILE: &str = "component-descriptor.yaml";

const COMPONENT_KEY: &str = "component";
const RESOURCES_KEY: &str = "resources";

#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("no component descriptor at {}", path.display())]
    Missing { path: PathBuf },
    #[error("component descriptor has no `component` mapping")]
    MissingComponent,
    #[error("`component.resources` must be a sequence")]
    InvalidResources,
    #[error("`component.resources[{index}]` is not a mapping")]
    InvalidResource { index: usize },
}

/// Path of the descriptor file for an archive directory.
pub fn descriptor_path(archive_dir: &Path) -> PathBuf {
    archive_dir.join(DESCRIPTOR_FILE)
}

/// A component descriptor document.
///
/// The document is kept as an untyped mapping so that everything except
/// `component.resources` is written back exactly as it was read, key order
/// included. Values are plain YAML, never tagged representations.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentDescriptor {
    document: Mapping,
    resources: Vec<Resource>,
}

impl ComponentDescriptor {
    pub fn from_yaml(text: &str) -> Result<Self> {
        let document: Mapping =
            serde_yaml::from_str(text).context("failed to parse component descriptor")?;
        let component = document
            .get(COMPONENT_KEY)
            .and_then(Value::as_mapping)
            .ok_or(DescriptorError::MissingComponent)?;

        let resources = match component.get(RESOURCES_KEY) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Sequence(entries)) => entries
                .iter()
                .enumerate()
                .map(|(index, entry)| match entry {
                    Value::Mapping(fields) => Ok(Resource::new(fields.clone())),
                    _ => Err(DescriptorError::InvalidResource { index }),
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => return Err(DescriptorError::InvalidResources.into()),
        };

        Ok(Self {
            document,
            resources,
        })
    }

    /// Load the descriptor of an archive directory.
    ///
    /// A missing file is reported as [`DescriptorError::Missing`].
    pub fn load(archive_dir: &Path) -> Result<Self> {
        let path = descriptor_path(archive_dir);
        if !path.is_file() {
            return Err(DescriptorError::Missing { path }.into());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_yaml(&contents).with_context(|| format!("invalid {}", path.display()))
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn resources_mut(&mut self) -> &mut Vec<Resource> {
        &mut self.resources
    }

    pub fn to_yaml(&self) -> Result<String> {
        let mut document = self.document.clone();
        let resources = self
            .resources
            .iter()
            .map(|r| Value::Mapping(r.fields().clone()))
            .collect();

        // `insert` keeps the position of an existing key.
        document
            .get_mut(COMPONENT_KEY)
            .and_then(Value::as_mapping_mut)
            .ok_or(DescriptorError::MissingComponent)?
            .insert(Value::from(RESOURCES_KEY), Value::Sequence(resources));

        serde_yaml::to_string(&document).context("failed to serialize component descriptor")
    }

    /// Write the descriptor back into an archive directory.
    pub fn save(&self, archive_dir: &Path) -> Result<()> {
        let path = descriptor_path(archive_dir);
        let contents = self.to_yaml()?;
        fs::write(&path, contents)
            .with_context(|| format!("failed to write {}", path.display()))
    }
}
