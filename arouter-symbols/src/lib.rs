//! Declaration snapshots and type-graph classification for the ARouter
//! code generator.
//!
//! The symbol resolver of the host build serializes every annotated
//! declaration (plus the library declarations needed to walk supertype
//! chains) into a [`SymbolSnapshot`]. This crate loads those snapshots,
//! exposes them through the [`SymbolSource`] trait and answers the
//! "what does this class implement first?" question via [`Classifier`].

pub mod classify;
pub mod error;
pub mod parse;
pub mod search;
pub mod table;
pub mod types;
pub mod utils;

pub use classify::*;
pub use error::*;
pub use search::*;
pub use table::*;
pub use types::*;
