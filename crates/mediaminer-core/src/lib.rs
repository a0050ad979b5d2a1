//! # Mediaminer Core
//!
//! Pure building blocks of the video metadata miner: guessing an identity
//! from a filename, reading knowledge-base topic records, extracting a
//! metadata record and turning it into a retract/assert update batch.
//!
//! ## Quick Start
//!
//! ```rust
//! use mediaminer_core::guess::IdentityGuesser;
//!
//! let guesser = IdentityGuesser::new().unwrap();
//! let identity = guesser.guess_filename("Show.Name.S01E02.Title.mkv");
//!
//! assert!(identity.is_episodic());
//! assert_eq!(identity.title, "Show Name Title");
//! assert_eq!((identity.season, identity.episode), (1, 2));
//! ```
pub mod error;
pub mod extract;
pub mod guess;
pub mod types;
pub mod update;

// Re-export primary API
pub use error::{ErrorKind, MinerError, Result};
pub use extract::{MetadataExtractor, extract};
pub use guess::{IdentityGuesser, Tokenizer, file_stem_from_uri};
pub use types::{ArtistRef, ExternalId, GuessedIdentity, MetadataRecord, TopicRecord, TopicValue};
pub use update::{Object, Statement, UpdateBatch, UpdateScope};
