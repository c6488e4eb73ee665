pub mod commands;
pub mod config;
pub mod descriptor;
pub mod legacy;
pub mod router;
