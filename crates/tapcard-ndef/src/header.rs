use crate::ndef_type::NdefType;

const MESSAGE_BEGIN: u8 = 0x80;
const MESSAGE_END: u8 = 0x40;
const CHUNKED: u8 = 0x20;
const SHORT_RECORD: u8 = 0x10;
const HAS_ID_LENGTH: u8 = 0x08;

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct NdefHeader {
    pub message_begin: bool,
    pub message_end: bool,
    pub chunked: bool,
    pub short_record: bool,
    pub has_id_length: bool,
    pub type_name_format: NdefType,
    pub type_length: u8,
    pub payload_length: u32,
    pub id_length: Option<u8>,
}

impl NdefHeader {
    /// The flags byte, first byte of every record
    pub fn flags_byte(&self) -> u8 {
        let mut byte = self.type_name_format.tnf();

        if self.message_begin {
            byte |= MESSAGE_BEGIN;
        }
        if self.message_end {
            byte |= MESSAGE_END;
        }
        if self.chunked {
            byte |= CHUNKED;
        }
        if self.short_record {
            byte |= SHORT_RECORD;
        }
        if self.has_id_length {
            byte |= HAS_ID_LENGTH;
        }

        byte
    }

    /// Number of bytes the header takes on the wire, not including type, id or payload
    pub fn encoded_len(&self) -> usize {
        let payload_length_len = if self.short_record { 1 } else { 4 };
        let id_length_len = if self.has_id_length { 1 } else { 0 };

        // flags + type length + payload length + id length
        1 + 1 + payload_length_len + id_length_len
    }
}
