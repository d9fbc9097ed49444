//! # msjgen Core Library
//!
//! Turns the compact, human-edited configuration of a multi-stage Desmond molecular-dynamics
//! protocol (five equilibration stages, any number of additional stages and a production
//! stage) into a fully resolved, validated set of per-stage parameters, and serializes that
//! set into the job-control files consumed by `multisim`.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer layout so that the error-prone part, turning flat
//! comma-separated lists into per-restraint records, stays small, pure and testable.
//!
//! - **[`core`]: The Foundation.** Stateless building blocks: the scalar-list parser, the
//!   data models (restraint kinds and their arity table, stage identifiers, the resolved
//!   protocol) and the readers/writers for the INI input and the `.msj`/`.cfg`/`.sh` outputs.
//!
//! - **[`engine`]: The Logic Core.** The option namespace with its defaults, the single-stage,
//!   multi-stage and broadcast resolvers, and the validator that builds an immutable
//!   [`core::models::protocol::ProtocolConfiguration`] or rejects the input with every error found.
//!
//! - **[`workflows`]: The Public API.** End-to-end procedures, such as writing every job
//!   file of a run into a fresh working directory.

pub mod core;
pub mod engine;
pub mod workflows;
