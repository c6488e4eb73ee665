//! Decides whether an invocation is handled here or forwarded to the legacy
//! program.
//!
//! Only `<archive> <resources> add ...` is handled locally. Every other shape,
//! including one that is too short to tell, is forwarded with its arguments
//! untouched.

use std::ffi::OsString;

pub const ARCHIVE_ALIASES: &[&str] = &["component-archive", "archive", "ca"];
pub const RESOURCES_ALIASES: &[&str] = &["resources", "resource", "res", "r"];
pub const ADD_ACTION: &str = "add";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Handle `resources add` locally.
    AddResources,
    /// Hand the full argument vector (program name included) to the legacy
    /// program.
    Delegate(Vec<OsString>),
}

/// Route an argument vector whose first element is the program name.
pub fn route(args: &[OsString], force_legacy: bool) -> Route {
    if !force_legacy && is_add_resources(args) {
        Route::AddResources
    } else {
        Route::Delegate(args.to_vec())
    }
}

fn is_add_resources(args: &[OsString]) -> bool {
    let word = |index: usize| args.get(index).and_then(|arg| arg.to_str());

    match (word(1), word(2), word(3)) {
        (Some(archive), Some(resources), Some(action)) => {
            ARCHIVE_ALIASES.contains(&archive)
                && RESOURCES_ALIASES.contains(&resources)
                && action == ADD_ACTION
        }
        _ => false,
    }
}
