//! Qt Linguist `.ts` catalog loading and message resolution for a desktop
//! front-end.
//!
//! The host talks to [`protocol::Core`] over line-delimited JSON; embedders
//! can use [`CatalogStore`] and [`Resolver`] directly.

pub mod error;
pub mod logging;
pub mod model;
pub mod parsers;
pub mod protocol;
pub mod services;

pub use error::{CatalogError, ConfigError, StoreError};
pub use model::catalog::{Catalog, CatalogStats};
pub use model::entry::{EntryStatus, Location, MessageKey, TranslationEntry};
pub use services::resolver::Resolver;
pub use services::store::{CatalogStore, LoadOutcome};
