use crate::{DecodeError, EncodeError, record::NdefRecord, writer};

/// Encode records into the bytes written to a type 2 tag
#[uniffi::export]
pub fn encode_ndef_tlv(records: Vec<NdefRecord>) -> Result<Vec<u8>, EncodeError> {
    writer::encode_tlv(&records)
}

/// Encode records into a bare NDEF message, for platform APIs that add the TLV themselves
#[uniffi::export]
pub fn encode_ndef_message(records: Vec<NdefRecord>) -> Result<Vec<u8>, EncodeError> {
    writer::encode_message(&records)
}

#[uniffi::export]
pub fn decode_ndef_tlv(data: Vec<u8>) -> Result<Vec<NdefRecord>, DecodeError> {
    crate::decode_tlv(&data)
}

#[uniffi::export]
pub fn decode_ndef_message(data: Vec<u8>) -> Result<Vec<NdefRecord>, DecodeError> {
    crate::decode_message(&data)
}

/// Bytes the records take on a tag once wrapped in a TLV
#[uniffi::export]
pub fn ndef_tlv_len(records: Vec<NdefRecord>) -> u32 {
    writer::encoded_tlv_len(&records) as u32
}
