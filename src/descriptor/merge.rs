use std::path::{Path, PathBuf};

use anyhow::Result;

use super::resource::{Resource, ResourceIdentity};
use super::source::ResourceSource;
use super::template::TemplateVars;
use super::{descriptor_path, ComponentDescriptor};

/// Outcome of merging a batch of resources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Resource count before the merge.
    pub before: usize,
    /// Resource count after the merge.
    pub after: usize,
    /// Incoming resources that displaced at least one entry with the same
    /// identity.
    pub replaced: usize,
    /// Identities of the incoming resources, in processing order.
    pub processed: Vec<ResourceIdentity>,
}

impl MergeReport {
    /// Resource count after the merge minus the count before it.
    ///
    /// Overwrites do not count. Negative when the descriptor held duplicate
    /// identities that the merge collapsed.
    pub fn delta(&self) -> isize {
        self.after as isize - self.before as isize
    }
}

/// Merge `incoming` into `existing` by identity.
///
/// An existing entry with the same identity as an incoming one is removed and
/// the incoming entry is appended, so the last occurrence wins and ends up at
/// the tail. Untouched entries keep their relative order.
pub fn merge_resources<I>(existing: &mut Vec<Resource>, incoming: I) -> MergeReport
where
    I: IntoIterator<Item = Resource>,
{
    let before = existing.len();
    let mut replaced = 0;
    let mut processed = Vec::new();

    for resource in incoming {
        let identity = resource.identity();
        let len = existing.len();
        existing.retain(|current| current.identity() != identity);
        if existing.len() < len {
            replaced += 1;
        }
        existing.push(resource);
        processed.push(identity);
    }

    MergeReport {
        before,
        after: existing.len(),
        replaced,
        processed,
    }
}

/// One `resources add` invocation against a component archive.
#[derive(Debug, Clone)]
pub struct AddResourcesRequest {
    pub archive_dir: PathBuf,
    /// Read in order; later sources win on identity clashes.
    pub sources: Vec<ResourceSource>,
    pub vars: TemplateVars,
}

impl AddResourcesRequest {
    pub fn new(archive_dir: impl Into<PathBuf>) -> Self {
        Self {
            archive_dir: archive_dir.into(),
            sources: Vec::new(),
            vars: TemplateVars::new(),
        }
    }

    pub fn source(mut self, source: ResourceSource) -> Self {
        self.sources.push(source);
        self
    }

    pub fn vars(mut self, vars: TemplateVars) -> Self {
        self.vars = vars;
        self
    }

    pub fn descriptor_path(&self) -> PathBuf {
        descriptor_path(&self.archive_dir)
    }
}

/// Read every source, merge its resources into the archive's descriptor and
/// write the descriptor back.
///
/// The descriptor must already exist. Nothing is written unless every source
/// parses. There is no locking: concurrent runs against the same archive can
/// lose updates.
pub fn add_resources(request: &AddResourcesRequest) -> Result<MergeReport> {
    let archive_dir: &Path = &request.archive_dir;
    let mut descriptor = ComponentDescriptor::load(archive_dir)?;

    let mut incoming = Vec::new();
    for source in &request.sources {
        incoming.extend(source.resources(&request.vars)?);
    }

    let report = merge_resources(descriptor.resources_mut(), incoming);
    descriptor.save(archive_dir)?;

    Ok(report)
}
