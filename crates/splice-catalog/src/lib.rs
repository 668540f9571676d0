pub mod builder;
pub mod compose;
pub mod error;
pub mod index;
pub mod layout;
pub mod matcher;
pub mod plasmid;
pub mod schema;

pub use builder::{build_catalog, build_entry, EntryReport, SequenceCache, SequenceSource, SkipReason};
pub use error::CatalogError;
pub use index::{CatalogEntry, KitSelection, MinifiedIndex};
pub use layout::Layout;
pub use matcher::{Assignment, MatchError, PartMatch, PartMatcher};
pub use plasmid::CatalogPlasmid;
pub use schema::{Overhang, Part, SchemaError, Syntax, SyntaxDocument, ValidationError, Violation};
