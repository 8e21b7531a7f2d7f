use std::sync::Arc;

use tapcard_util::sha256_fields;

use crate::{card_url::CardUrl, contact::Contact};

/// The contact being shared together with the link to its hosted profile
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct CardProfile {
    pub contact: Contact,
    pub card_url: Arc<CardUrl>,
}

impl CardProfile {
    pub fn new(contact: Contact, card_url: CardUrl) -> Self {
        Self { contact, card_url: Arc::new(card_url) }
    }

    /// Changes whenever anything written to a tag would change
    pub fn fingerprint(&self) -> String {
        let contact = self.contact.fingerprint();
        sha256_fields([contact.as_bytes(), self.card_url.as_bytes()])
    }
}

#[uniffi::export]
fn card_profile_fingerprint(profile: CardProfile) -> String {
    profile.fingerprint()
}
