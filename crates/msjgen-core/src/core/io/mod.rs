//! Reading of the INI input and writing of the job-control files.
//!
//! Readers implement [`traits::ConfigFile`]; every generated file implements
//! [`traits::JobFile`] and only borrows the validated data it renders.

mod block;
pub mod cfg;
pub mod ini;
pub mod msj;
pub mod names;
pub mod shell;
pub mod traits;
