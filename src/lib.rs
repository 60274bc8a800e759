//! Compiles mailbox search predicates into operations against the metadata store and the
//! full-text index

#[macro_use]
extern crate slog;

pub mod error;
pub mod settings;
pub mod mailbox;
pub mod analysis;
pub mod operation;
pub mod literal;
pub mod phrase;
pub mod predicate;
pub mod builtin;
pub mod decode;
