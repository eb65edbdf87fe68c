//! Card system: definitions, instances, and the catalog.
//!
//! ## Key Types
//!
//! - `CardId`: zero-padded card identifier, normalized at every ingress
//! - `CardType`: attack, defense, trap, tactical, loot, infected
//! - `CardDefinition`: static card data (type, tags, stats, effect text)
//! - `CardInstance`: a card in a zone, with its face-down flag
//! - `CardCatalog`: definition lookup plus cached effect plans

pub mod definition;
pub mod instance;
pub mod registry;

pub use definition::{CardDefinition, CardId, CardType, CARD_ID_WIDTH};
pub use instance::CardInstance;
pub use registry::CardCatalog;
