//! CLI subcommands

pub mod browse;
pub mod list;
pub mod routes;
pub mod show;
