//! kstatus library
//!
//! Loads every resource of an OpenShift project into a relationship graph,
//! groups the graph into what belongs together, and renders a short status
//! report with diagnostics. The binary is a thin wrapper; everything is
//! usable as a library for testing.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod describe;
pub mod graph;
pub mod graphview;
pub mod kube;
pub mod loader;
pub mod models;

// Re-export commonly used types for convenience
pub use describe::{ReportOptions, StatusDescriber, render_report};
pub use graph::ResourceGraph;
pub use loader::{ListError, LoadError, ResourceLister};
pub use models::{ResourceKind, ResourceObject};
