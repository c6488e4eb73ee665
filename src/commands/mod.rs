pub mod component_archive;
