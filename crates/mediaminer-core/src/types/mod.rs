pub mod identity;
pub mod record;
pub mod topic;

pub use identity::{ExternalId, GuessedIdentity};
pub use record::{ArtistRef, MetadataRecord};
pub use topic::{TopicRecord, TopicValue};
