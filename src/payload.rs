use tapcard_ndef::{EncodeError, record::NdefRecord, writer};

/// Reason given when even the card url alone does not fit
pub const REJECTED_REASON: &str = "capacity too small for any payload";

/// What to write to a tag, computed fresh for every tag since capacity differs per tag
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Enum)]
pub enum PayloadBundle {
    /// vCard record followed by the card url record
    Dual { vcard: Vec<u8>, url: Vec<u8> },

    /// Only the card url record, the vCard did not fit
    UrlOnly { url: Vec<u8> },

    /// Nothing fits, the caller must tell the user the tag is too small
    Rejected { reason: String, capacity_bytes: u32, required_bytes: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, uniffi::Enum, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum PayloadKind {
    Dual,
    UrlOnly,
    Rejected,
}

impl PayloadBundle {
    pub fn rejected(capacity_bytes: u32, required_bytes: usize) -> Self {
        Self::Rejected {
            reason: REJECTED_REASON.to_string(),
            capacity_bytes,
            required_bytes: u32::try_from(required_bytes).unwrap_or(u32::MAX),
        }
    }

    pub fn kind(&self) -> PayloadKind {
        match self {
            Self::Dual { .. } => PayloadKind::Dual,
            Self::UrlOnly { .. } => PayloadKind::UrlOnly,
            Self::Rejected { .. } => PayloadKind::Rejected,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    pub fn url(&self) -> Option<&[u8]> {
        match self {
            Self::Dual { url, .. } | Self::UrlOnly { url } => Some(url),
            Self::Rejected { .. } => None,
        }
    }

    pub fn vcard(&self) -> Option<&[u8]> {
        match self {
            Self::Dual { vcard, .. } => Some(vcard),
            Self::UrlOnly { .. } | Self::Rejected { .. } => None,
        }
    }

    /// Records in the order they are written, empty when rejected
    pub fn records(&self) -> Vec<NdefRecord> {
        let url_record = |url: &[u8]| NdefRecord::uri(String::from_utf8_lossy(url));

        match self {
            Self::Dual { vcard, url } => vec![NdefRecord::vcard(vcard.clone()), url_record(url)],
            Self::UrlOnly { url } => vec![url_record(url)],
            Self::Rejected { .. } => Vec::new(),
        }
    }

    /// The NDEF message TLV to write to a type 2 tag, `None` when rejected
    pub fn ndef_message(&self) -> Result<Option<Vec<u8>>, EncodeError> {
        let records = self.records();
        if records.is_empty() {
            return Ok(None);
        }

        writer::encode_tlv(&records).map(Some)
    }
}

mod ffi {
    use super::*;

    #[uniffi::export]
    fn payload_bundle_kind(bundle: PayloadBundle) -> PayloadKind {
        bundle.kind()
    }

    #[uniffi::export]
    fn payload_bundle_records(bundle: PayloadBundle) -> Vec<NdefRecord> {
        bundle.records()
    }

    #[uniffi::export]
    fn payload_bundle_ndef_message(bundle: PayloadBundle) -> Result<Option<Vec<u8>>, EncodeError> {
        bundle.ndef_message()
    }
}
