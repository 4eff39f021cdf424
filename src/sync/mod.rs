//! Incremental synchronization engine.
//!
//! Control flow of one run:
//! [`flatten::prepare`] builds the working set, [`translate::translate_working_set`]
//! fills in one target locale, [`merge::merge`] folds it into the database and
//! [`export::export_locale`] renders the output bundle.

pub mod batch;
pub mod check;
pub mod compress;
pub mod export;
pub mod flatten;
pub mod merge;
pub mod prompt;
pub mod tokens;
pub mod translate;
