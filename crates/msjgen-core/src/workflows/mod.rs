//! # Workflows Module
//!
//! High-level procedures that take an input file all the way to a working directory full
//! of Desmond job files.
//!
//! ## Overview
//!
//! Workflows are the entry points for front-ends. They read the input, validate every
//! section at once, and only then touch the file system, so a rejected input never leaves
//! a half-written run behind.
//!
//! ## Architecture
//!
//! - **Preparation Workflow** ([`prepare`]) - Input loading and validation, working
//!   directory creation, and emission of the preparation and production job files.
//!
//! ## Key Capabilities
//!
//! - **All-or-nothing validation** across `[settings]`, `[build_geometry]` and `[protocol]`
//! - **Split phases** so the structure charge can be queried between directory creation
//!   and job-file emission
//! - **Progress reporting** of every phase and every written file

pub mod prepare;
