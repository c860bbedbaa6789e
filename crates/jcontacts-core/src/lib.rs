//! Core models and persistence for jcontacts.
//!
//! This crate provides the contact data model, ordering, the XML document
//! codec and the store that owns the live document. Frontends build on top
//! of [`ContactStore`].

pub mod codec;
pub mod error;
pub mod jobs;
pub mod models;
pub mod ordering;
pub mod print;
pub mod store;
pub mod template;
pub mod updates;

pub use error::{CodecError, ParseBirthdayError, PrintError, UpdateError};
pub use models::{Birthday, Contact, SortBy, Theme, TimeOfDay, UserData, UserSettings};
pub use store::{default_data_path, ContactStore};
