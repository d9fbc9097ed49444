//! # Core Module
//!
//! Stateless building blocks shared by the engine and the workflows.
//!
//! - **Scalar lists** ([`list`]) - Splitting and typing of comma-separated option values
//! - **Models** ([`models`]) - Restraints, stages, the resolved protocol and the system builder settings
//! - **File I/O** ([`io`]) - INI input reading and job-control text writing

pub mod io;
pub mod list;
pub mod models;
