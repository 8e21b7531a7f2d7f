//! Hand selected payloads to the platform's NFC stack
//!
//! The radio write itself happens on the platform side, behind [`TagWriter`]. This module only
//! decides what to hand over and keeps writer failures apart from selection failures.

use std::sync::Arc;

use tracing::{debug, warn};

use tapcard_ndef::record::NdefRecord;

use crate::{
    cache::{CardCache, EncodedCard},
    payload::{PayloadBundle, PayloadKind},
    profile::CardProfile,
    selector::{Framing, PayloadSelector, SelectError},
    tag_capacity::TagCapacity,
};

/// Implemented by the platform, writes one NDEF message made of `records` to the tag in range
#[uniffi::export(callback_interface)]
pub trait TagWriter: Send + Sync + std::fmt::Debug + 'static {
    fn write_ndef_records(&self, records: Vec<NdefRecord>) -> Result<(), TagWriteError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error, uniffi::Error)]
#[uniffi::export(Display)]
pub enum TagWriteError {
    #[error("tag io error: {0}")]
    Io(String),

    #[error("tag is not NDEF formatted or not supported: {0}")]
    Unsupported(String),

    #[error("tag is read only")]
    ReadOnly,

    #[error("unexpected platform error: {0}")]
    Platform(String),
}

impl From<uniffi::UnexpectedUniFFICallbackError> for TagWriteError {
    fn from(error: uniffi::UnexpectedUniFFICallbackError) -> Self {
        Self::Platform(error.reason)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error, uniffi::Error)]
#[uniffi::export(Display)]
pub enum CardWriteError {
    #[error(transparent)]
    Select(#[from] SelectError),

    #[error("unable to write tag: {0}")]
    Tag(#[from] TagWriteError),
}

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Enum)]
pub enum WriteOutcome {
    /// The records were handed to the platform and it reported success
    Written { kind: PayloadKind, fingerprint: String, bytes_written: u32 },

    /// Nothing was written, the card url alone does not fit
    TooSmall {
        capacity_bytes: u32,
        required_bytes: u32,
        /// Smallest known tag the url would fit on
        suggested_tag: Option<TagCapacity>,
    },
}

impl WriteOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written { .. })
    }
}

#[derive(Debug, uniffi::Object)]
pub struct CardWriter {
    writer: Box<dyn TagWriter>,
    selector: PayloadSelector,
    cache: Arc<CardCache>,
}

impl CardWriter {
    pub fn with_parts(
        writer: Box<dyn TagWriter>,
        selector: PayloadSelector,
        cache: Arc<CardCache>,
    ) -> Self {
        Self { writer, selector, cache }
    }

    pub fn cache(&self) -> &CardCache {
        &self.cache
    }

    /// Encode (or reuse) the profile's bytes and pick a bundle for the capacity
    pub fn prepare(
        &self,
        profile: &CardProfile,
        capacity_bytes: i64,
    ) -> Result<(Arc<EncodedCard>, PayloadBundle), SelectError> {
        profile.contact.validate()?;
        let card = self.cache.get_or_encode(profile)?;
        let bundle = self.selector.select_encoded(&card, capacity_bytes)?;

        Ok((card, bundle))
    }

    pub fn write_profile(
        &self,
        profile: &CardProfile,
        capacity_bytes: i64,
    ) -> Result<WriteOutcome, CardWriteError> {
        let (card, bundle) = self.prepare(profile, capacity_bytes)?;

        let kind = bundle.kind();
        let bytes_written = match &bundle {
            PayloadBundle::Rejected { capacity_bytes, required_bytes, .. } => {
                let suggested_tag = TagCapacity::smallest_fitting(*required_bytes as usize);
                return Ok(WriteOutcome::TooSmall {
                    capacity_bytes: *capacity_bytes,
                    required_bytes: *required_bytes,
                    suggested_tag,
                });
            }
            PayloadBundle::Dual { .. } => self.selector.framing().dual_size(&card.vcard, &card.url),
            PayloadBundle::UrlOnly { .. } => self.selector.framing().url_only_size(&card.url),
        };

        let records = bundle.records();
        debug!("writing {} record(s), {kind:?}, {bytes_written} bytes", records.len());

        self.writer.write_ndef_records(records).inspect_err(|error| {
            warn!("tag write failed: {error}");
        })?;

        Ok(WriteOutcome::Written {
            kind,
            fingerprint: card.fingerprint.clone(),
            bytes_written: u32::try_from(bytes_written).unwrap_or(u32::MAX),
        })
    }
}

#[uniffi::export]
impl CardWriter {
    /// Writer using the framing and cache size from the current config
    #[uniffi::constructor]
    pub fn new(writer: Box<dyn TagWriter>) -> Self {
        Self::with_parts(writer, PayloadSelector::from_config(), Arc::new(CardCache::from_config()))
    }

    #[uniffi::constructor]
    pub fn with_framing(writer: Box<dyn TagWriter>, framing: Framing, cache_capacity: u32) -> Self {
        let cache = Arc::new(CardCache::new(cache_capacity as usize));
        Self::with_parts(writer, PayloadSelector::new(framing), cache)
    }

    /// The bundle that would be written, without touching the tag
    pub fn preview(
        &self,
        profile: CardProfile,
        capacity_bytes: i64,
    ) -> Result<PayloadBundle, SelectError> {
        let (_card, bundle) = self.prepare(&profile, capacity_bytes)?;
        Ok(bundle)
    }

    pub fn write(
        &self,
        profile: CardProfile,
        capacity_bytes: i64,
    ) -> Result<WriteOutcome, CardWriteError> {
        self.write_profile(&profile, capacity_bytes)
    }

    pub fn write_to_tag(
        &self,
        profile: CardProfile,
        tag: TagCapacity,
    ) -> Result<WriteOutcome, CardWriteError> {
        self.write_profile(&profile, tag.bytes() as i64)
    }

    /// Forget the cached bytes for a profile, returns true if there were any
    pub fn invalidate(&self, profile: CardProfile) -> bool {
        self.cache.invalidate(&profile.fingerprint())
    }

    pub fn clear_cache(&self) {
        self.cache.clear()
    }

    pub fn cached_cards(&self) -> Vec<EncodedCard> {
        self.cache.cards().into_iter().map(Arc::unwrap_or_clone).collect()
    }
}
