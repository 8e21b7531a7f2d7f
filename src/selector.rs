//! Decide what goes on a tag of a given capacity
//!
//! The full contact is preferred whenever it fits next to the card url, a bare url is preferred
//! over nothing, and if even the url does not fit the bundle is rejected. The same inputs always
//! produce the same bundle.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use tapcard_ndef::{
    payload::abbreviate_uri,
    record::{URI_RECORD_TYPE, VCARD_MIME_TYPE},
    writer,
};

use crate::{
    cache::EncodedCard,
    contact::ContactError,
    payload::PayloadBundle,
    profile::CardProfile,
    tag_capacity::TagCapacity,
    vcard,
};

/// How the bytes around each record are counted against the tag capacity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, uniffi::Enum)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum Framing {
    /// Exactly what the NDEF encoder writes: record headers, url prefix abbreviation and the
    /// message TLV
    #[default]
    Encoded,

    /// A fixed number of bytes per record, as reported by the platform's NDEF writer
    PerRecord { bytes: u32 },
}

impl Framing {
    /// Bytes needed for the vCard record and the url record together
    pub fn dual_size(self, vcard: &[u8], url: &[u8]) -> usize {
        match self {
            Self::Encoded => encoded_size(vcard_record_len(vcard) + url_record_len(url)),
            Self::PerRecord { bytes } => vcard.len() + url.len() + 2 * bytes as usize,
        }
    }

    /// Bytes needed for the url record alone
    pub fn url_only_size(self, url: &[u8]) -> usize {
        match self {
            Self::Encoded => encoded_size(url_record_len(url)),
            Self::PerRecord { bytes } => url.len() + bytes as usize,
        }
    }
}

/// A message too long for the TLV length field never fits, whatever the capacity
fn encoded_size(message_len: usize) -> usize {
    if message_len > writer::MAX_TLV_MESSAGE_LENGTH {
        return usize::MAX;
    }

    writer::tlv_len(message_len)
}

fn vcard_record_len(vcard: &[u8]) -> usize {
    writer::record_len(VCARD_MIME_TYPE.len(), vcard.len())
}

fn url_record_len(url: &[u8]) -> usize {
    let url = String::from_utf8_lossy(url);
    let (_code, rest) = abbreviate_uri(&url);

    // identifier code + rest
    writer::record_len(URI_RECORD_TYPE.len(), 1 + rest.len())
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error, uniffi::Error)]
#[uniffi::export(Display)]
pub enum SelectError {
    #[error("invalid contact: {0}")]
    InvalidContact(#[from] ContactError),

    #[error("invalid tag capacity: {0} bytes")]
    InvalidCapacity(i64),
}

type Result<T, E = SelectError> = std::result::Result<T, E>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, uniffi::Object)]
pub struct PayloadSelector {
    framing: Framing,
}

impl PayloadSelector {
    /// Selector using the framing from the current config
    pub fn from_config() -> Self {
        Self::new(crate::config::current().framing)
    }

    pub fn framing(&self) -> Framing {
        self.framing
    }

    /// Pick the richest payload for the profile that fits in `capacity_bytes`
    pub fn select(
        &self,
        profile: &CardProfile,
        capacity_bytes: i64,
    ) -> Result<PayloadBundle, SelectError> {
        profile.contact.validate()?;
        let capacity = validate_capacity(capacity_bytes)?;

        let vcard = vcard::serialize(&profile.contact)?;
        let url = profile.card_url.as_bytes().to_vec();

        Ok(self.decide(vcard, url, capacity))
    }

    /// Same decision as [`Self::select`] on bytes encoded ahead of time
    pub fn select_encoded(
        &self,
        card: &EncodedCard,
        capacity_bytes: i64,
    ) -> Result<PayloadBundle, SelectError> {
        if card.vcard.is_empty() {
            return Err(SelectError::InvalidContact(ContactError::MissingName));
        }

        let capacity = validate_capacity(capacity_bytes)?;
        Ok(self.decide(card.vcard.clone(), card.url.clone(), capacity))
    }

    fn decide(&self, vcard: Vec<u8>, url: Vec<u8>, capacity: u32) -> PayloadBundle {
        let capacity_bytes = capacity as usize;

        let dual_size = self.framing.dual_size(&vcard, &url);
        if dual_size <= capacity_bytes {
            debug!("card fits with vcard, {dual_size} of {capacity} bytes");
            return PayloadBundle::Dual { vcard, url };
        }

        let url_only_size = self.framing.url_only_size(&url);
        if url_only_size <= capacity_bytes {
            debug!("vcard needs {dual_size} bytes, writing url only ({url_only_size} of {capacity})");
            return PayloadBundle::UrlOnly { url };
        }

        warn!("tag too small, url alone needs {url_only_size} bytes, tag has {capacity}");
        PayloadBundle::rejected(capacity, url_only_size)
    }
}

fn validate_capacity(capacity_bytes: i64) -> Result<u32> {
    if capacity_bytes <= 0 {
        warn!("tag reported a capacity of {capacity_bytes} bytes");
        return Err(SelectError::InvalidCapacity(capacity_bytes));
    }

    Ok(u32::try_from(capacity_bytes).unwrap_or(u32::MAX))
}

/// Select with the framing from the current config
pub fn select_payload(
    profile: &CardProfile,
    capacity_bytes: i64,
) -> Result<PayloadBundle, SelectError> {
    PayloadSelector::from_config().select(profile, capacity_bytes)
}

#[uniffi::export]
impl PayloadSelector {
    #[uniffi::constructor]
    pub fn new(framing: Framing) -> Self {
        Self { framing }
    }

    pub fn select_payload(
        &self,
        profile: CardProfile,
        capacity_bytes: i64,
    ) -> Result<PayloadBundle, SelectError> {
        self.select(&profile, capacity_bytes)
    }

    pub fn select_for_tag(
        &self,
        profile: CardProfile,
        tag: TagCapacity,
    ) -> Result<PayloadBundle, SelectError> {
        self.select(&profile, tag.bytes() as i64)
    }

    pub fn select_encoded_payload(
        &self,
        card: EncodedCard,
        capacity_bytes: i64,
    ) -> Result<PayloadBundle, SelectError> {
        self.select_encoded(&card, capacity_bytes)
    }
}

mod ffi {
    use super::*;

    #[uniffi::export]
    fn select_payload(
        profile: CardProfile,
        capacity_bytes: i64,
    ) -> Result<PayloadBundle, SelectError> {
        super::select_payload(&profile, capacity_bytes)
    }
}
