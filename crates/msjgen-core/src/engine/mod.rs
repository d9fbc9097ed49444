//! # Engine Module
//!
//! This module turns the raw sections of an input file into a validated protocol, ready
//! to be serialized into Desmond job files.
//!
//! ## Overview
//!
//! Input values arrive as flat, comma-separated strings keyed by stage. The engine owns the
//! option namespace and its defaults, expands restraint declarations into per-restraint
//! records, broadcasts per-stage scalars, and collects every problem it finds so that a
//! rejected input is reported in full.
//!
//! ## Architecture
//!
//! - **Options** ([`options`]) - Section namespaces, defaults and unknown-key detection
//! - **Resolution** ([`resolve`]) - Single-stage, multi-stage and scalar broadcast resolvers
//! - **Validation** ([`validator`]) - Builds an immutable protocol or the full error list
//! - **Configuration** ([`config`]) - Run settings and system builder settings
//! - **Progress Monitoring** ([`progress`]) - Progress events for front-ends
//! - **Error Handling** ([`error`]) - Arity, broadcast, unknown-option and value errors
//!
//! ## Key Capabilities
//!
//! - **Arity checking** of atom, force and constant lists against declared counts
//! - **Broadcasting** of single values across restraints and additional stages
//! - **Parallel stage resolution** with errors aggregated in stage order
//! - **Deterministic output** once the velocity seed is fixed

pub mod config;
pub mod error;
pub(crate) mod fields;
pub mod options;
pub mod progress;
pub mod resolve;
pub mod validator;
