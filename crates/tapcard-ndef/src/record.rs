use crate::{
    header::NdefHeader,
    ndef_type::NdefType,
    payload::{NdefPayload, TextPayload, TextPayloadFormat},
    writer,
};

/// Record type for an NFC Forum well known URI record
pub const URI_RECORD_TYPE: &[u8] = b"U";

/// Record type for an NFC Forum well known text record
pub const TEXT_RECORD_TYPE: &[u8] = b"T";

/// MIME type recognised by address books for vCard records
pub const VCARD_MIME_TYPE: &[u8] = b"text/x-vcard";

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct NdefRecord {
    pub header: NdefHeader,
    pub type_: Vec<u8>,
    pub id: Option<Vec<u8>>,
    pub payload: NdefPayload,
}

impl NdefRecord {
    /// Build a record, header lengths are computed from the payload
    ///
    /// Message begin and end flags are left unset, they are fixed up when the record is placed in a message
    pub fn new(type_name_format: NdefType, type_: Vec<u8>, payload: NdefPayload) -> Self {
        let payload_length = writer::payload_bytes_len(&payload);

        let header = NdefHeader {
            message_begin: false,
            message_end: false,
            chunked: false,
            short_record: payload_length <= u8::MAX as usize,
            has_id_length: false,
            type_name_format,
            type_length: type_.len().min(u8::MAX as usize) as u8,
            payload_length: payload_length.min(u32::MAX as usize) as u32,
            id_length: None,
        };

        Self { header, type_, id: None, payload }
    }

    pub fn mime(mime_type: &[u8], data: Vec<u8>) -> Self {
        Self::new(NdefType::Mime, mime_type.to_vec(), NdefPayload::Data(data))
    }

    pub fn vcard(vcard: Vec<u8>) -> Self {
        Self::mime(VCARD_MIME_TYPE, vcard)
    }

    pub fn uri(uri: impl Into<String>) -> Self {
        Self::new(NdefType::WellKnown, URI_RECORD_TYPE.to_vec(), NdefPayload::Uri(uri.into()))
    }

    pub fn text(language: impl Into<String>, text: impl Into<String>) -> Self {
        let payload = NdefPayload::Text(TextPayload {
            format: TextPayloadFormat::Utf8,
            language: language.into(),
            text: text.into(),
        });

        Self::new(NdefType::WellKnown, TEXT_RECORD_TYPE.to_vec(), payload)
    }

    /// Number of bytes this record takes inside an NDEF message
    pub fn encoded_len(&self) -> usize {
        let id_len = self.id.as_ref().map_or(0, Vec::len);
        self.header.encoded_len() + self.type_.len() + id_len + self.header.payload_length as usize
    }

    /// Number of bytes of framing around the payload the caller handed in
    ///
    /// For URI records the payload handed in is the full URI, so a well known prefix makes this
    /// smaller than the header itself
    pub fn framing_overhead(&self) -> isize {
        let handed_in = match &self.payload {
            NdefPayload::Uri(uri) => uri.len(),
            _ => self.header.payload_length as usize,
        };

        self.encoded_len() as isize - handed_in as isize
    }

    pub fn is_uri(&self) -> bool {
        self.header.type_name_format == NdefType::WellKnown && self.type_ == URI_RECORD_TYPE
    }

    pub fn is_vcard(&self) -> bool {
        self.header.type_name_format == NdefType::Mime
            && self.type_.eq_ignore_ascii_case(VCARD_MIME_TYPE)
    }
}

// only used for uniffi
mod ffi {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, uniffi::Object)]
    pub struct NdefRecordReader {
        record: NdefRecord,
    }

    #[uniffi::export]
    impl NdefRecordReader {
        #[uniffi::constructor]
        pub fn new(record: NdefRecord) -> Self {
            Self { record }
        }

        pub fn type_(&self) -> Option<String> {
            String::from_utf8(self.record.type_.clone()).ok()
        }

        pub fn id(&self) -> Option<String> {
            let id = self.record.id.as_ref()?;
            String::from_utf8(id.clone()).ok()
        }

        pub fn payload_string(&self) -> Option<String> {
            self.record.payload.as_text().map(ToString::to_string)
        }

        pub fn is_uri(&self) -> bool {
            self.record.is_uri()
        }

        pub fn is_vcard(&self) -> bool {
            self.record.is_vcard()
        }
    }
}
