pub mod build;
pub mod cache;
pub mod card_url;
pub mod config;
pub mod contact;
pub mod payload;
pub mod profile;
pub mod selector;
pub mod tag_capacity;
pub mod tag_writer;
pub mod vcard;

pub(crate) mod logging;

pub use tapcard_ndef as ndef;

pub use cache::{CardCache, EncodedCard};
pub use card_url::{CardUrl, ProfileId};
pub use contact::{Contact, ContactError};
pub use payload::PayloadBundle;
pub use profile::CardProfile;
pub use selector::{Framing, PayloadSelector, SelectError, select_payload};
pub use tag_capacity::TagCapacity;

uniffi::setup_scaffolding!();
