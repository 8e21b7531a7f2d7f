use crate::{
    payload::{NdefPayload, TextPayload, TextPayloadFormat, abbreviate_uri},
    record::NdefRecord,
};

/// TLV tag for an NDEF message on a type 2 tag
pub const NDEF_MESSAGE_TLV: u8 = 0x03;

/// TLV that marks the end of the tag's data area
pub const TERMINATOR_TLV: u8 = 0xFE;

/// Length byte that switches the TLV to a 3 byte length
pub const THREE_BYTE_LENGTH_FORMAT: u8 = 0xFF;

/// Largest message a TLV length field can describe
pub const MAX_TLV_MESSAGE_LENGTH: usize = 0xFFFE;

/// Text records store the language code length in 6 bits
const MAX_LANGUAGE_CODE_LENGTH: usize = 0x3F;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, uniffi::Error)]
pub enum EncodeError {
    #[error("record type is {0} bytes, max is 255")]
    TypeTooLong(u32),

    #[error("record id is {0} bytes, max is 255")]
    IdTooLong(u32),

    #[error("payload is too large to encode in a record")]
    PayloadTooLarge,

    #[error("language code is {0} bytes, max is 63")]
    LanguageCodeTooLong(u32),

    #[error("message is {0} bytes, too large for an NDEF TLV")]
    MessageTooLarge(u32),

    #[error("a message needs at least one record")]
    EmptyMessage,
}

type Result<T, E = EncodeError> = std::result::Result<T, E>;

/// Encode the records as one NDEF message, message begin and end flags are set from position
pub fn encode_message(records: &[NdefRecord]) -> Result<Vec<u8>> {
    if records.is_empty() {
        return Err(EncodeError::EmptyMessage);
    }

    let last = records.len() - 1;
    let capacity = records.iter().map(NdefRecord::encoded_len).sum();
    let mut out = Vec::with_capacity(capacity);

    for (index, record) in records.iter().enumerate() {
        encode_record(record, index == 0, index == last, &mut out)?;
    }

    Ok(out)
}

/// Wrap an encoded message in the NDEF message TLV followed by the terminator TLV
pub fn wrap_tlv(message: &[u8]) -> Result<Vec<u8>> {
    if message.len() > MAX_TLV_MESSAGE_LENGTH {
        return Err(EncodeError::MessageTooLarge(message.len() as u32));
    }

    let mut out = Vec::with_capacity(tlv_len(message.len()));
    out.push(NDEF_MESSAGE_TLV);

    if message.len() < THREE_BYTE_LENGTH_FORMAT as usize {
        out.push(message.len() as u8);
    } else {
        out.push(THREE_BYTE_LENGTH_FORMAT);
        out.extend_from_slice(&(message.len() as u16).to_be_bytes());
    }

    out.extend_from_slice(message);
    out.push(TERMINATOR_TLV);

    Ok(out)
}

/// Encode the records and wrap them for writing to a tag
pub fn encode_tlv(records: &[NdefRecord]) -> Result<Vec<u8>> {
    let message = encode_message(records)?;
    wrap_tlv(&message)
}

/// Bytes a message of `message_len` takes on a tag once wrapped in its TLV and terminator
pub fn tlv_len(message_len: usize) -> usize {
    let length_field = if message_len < THREE_BYTE_LENGTH_FORMAT as usize { 1 } else { 3 };
    1 + length_field + message_len + 1
}

/// Bytes the records take on a tag, TLV wrapper included
pub fn encoded_tlv_len(records: &[NdefRecord]) -> usize {
    let message_len = records.iter().map(NdefRecord::encoded_len).sum();
    tlv_len(message_len)
}

/// Bytes a record without an id takes in a message
pub fn record_len(type_len: usize, payload_len: usize) -> usize {
    let payload_length_len = if payload_len <= u8::MAX as usize { 1 } else { 4 };

    // flags + type length + payload length + type + payload
    1 + 1 + payload_length_len + type_len + payload_len
}

pub fn encode_record(
    record: &NdefRecord,
    message_begin: bool,
    message_end: bool,
    out: &mut Vec<u8>,
) -> Result<()> {
    let type_length =
        u8::try_from(record.type_.len()).map_err(|_| EncodeError::TypeTooLong(record.type_.len() as u32))?;

    let id_length = match &record.id {
        Some(id) => Some(u8::try_from(id.len()).map_err(|_| EncodeError::IdTooLong(id.len() as u32))?),
        None => None,
    };

    let payload = payload_bytes(&record.payload)?;
    let payload_length = u32::try_from(payload.len()).map_err(|_| EncodeError::PayloadTooLarge)?;

    let mut header = record.header.clone();
    header.message_begin = message_begin;
    header.message_end = message_end;
    header.chunked = false;
    header.short_record = payload_length <= u8::MAX as u32;
    header.has_id_length = id_length.is_some();
    header.type_length = type_length;
    header.payload_length = payload_length;
    header.id_length = id_length;

    out.push(header.flags_byte());
    out.push(type_length);

    if header.short_record {
        out.push(payload_length as u8);
    } else {
        out.extend_from_slice(&payload_length.to_be_bytes());
    }

    if let Some(id_length) = id_length {
        out.push(id_length);
    }

    out.extend_from_slice(&record.type_);

    if let Some(id) = &record.id {
        out.extend_from_slice(id);
    }

    out.extend_from_slice(&payload);

    Ok(())
}

/// The payload exactly as it is written after the record header
pub fn payload_bytes(payload: &NdefPayload) -> Result<Vec<u8>> {
    match payload {
        NdefPayload::Data(data) => Ok(data.clone()),
        NdefPayload::Uri(uri) => {
            let (code, rest) = abbreviate_uri(uri);
            let mut out = Vec::with_capacity(1 + rest.len());
            out.push(code);
            out.extend_from_slice(rest.as_bytes());
            Ok(out)
        }
        NdefPayload::Text(text) => text_payload_bytes(text),
    }
}

/// Length of [`payload_bytes`] without allocating it
pub fn payload_bytes_len(payload: &NdefPayload) -> usize {
    match payload {
        NdefPayload::Data(data) => data.len(),
        NdefPayload::Uri(uri) => 1 + abbreviate_uri(uri).1.len(),
        NdefPayload::Text(text) => {
            let text_len = match text.format {
                TextPayloadFormat::Utf8 => text.text.len(),
                TextPayloadFormat::Utf16 => text.text.encode_utf16().count() * 2,
            };

            1 + text.language.len() + text_len
        }
    }
}

fn text_payload_bytes(text: &TextPayload) -> Result<Vec<u8>> {
    let language = text.language.as_bytes();
    if language.len() > MAX_LANGUAGE_CODE_LENGTH {
        return Err(EncodeError::LanguageCodeTooLong(language.len() as u32));
    }

    let mut status = language.len() as u8;
    if text.format == TextPayloadFormat::Utf16 {
        status |= 0x80;
    }

    let mut out = vec![status];
    out.extend_from_slice(language);

    match text.format {
        TextPayloadFormat::Utf8 => out.extend_from_slice(text.text.as_bytes()),
        TextPayloadFormat::Utf16 => {
            text.text.encode_utf16().for_each(|unit| out.extend_from_slice(&unit.to_be_bytes()))
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_encode_single_uri_record() {
        let record = NdefRecord::uri("https://example.com");
        let message = encode_message(&[record]).unwrap();

        let mut expected = vec![0xD1, 0x01, 0x0C, b'U', 0x04];
        expected.extend_from_slice(b"example.com");

        assert_eq!(message, expected);
    }

    #[test]
    fn test_encode_sets_begin_and_end_by_position() {
        let records = [NdefRecord::vcard(b"BEGIN:VCARD".to_vec()), NdefRecord::uri("https://a.b")];
        let message = encode_message(&records).unwrap();

        // first record: MB, SR, MIME
        assert_eq!(message[0], 0x92);
        assert_eq!(message[1], 12);
        assert_eq!(message[2], 11);
        assert_eq!(&message[3..15], b"text/x-vcard");

        // second record: ME, SR, well known
        let second = 3 + 12 + 11;
        assert_eq!(message[second], 0x51);
        assert_eq!(message.len(), records.iter().map(NdefRecord::encoded_len).sum::<usize>());
    }

    #[test]
    fn test_encode_long_record_uses_four_byte_length() {
        let record = NdefRecord::vcard(vec![b'x'; 300]);
        let message = encode_message(&[record]).unwrap();

        assert_eq!(message[0], 0xC2);
        assert_eq!(&message[2..6], &300_u32.to_be_bytes());
        assert_eq!(message.len(), 6 + 12 + 300);
    }

    #[test]
    fn test_wrap_tlv_short_and_long_length() {
        let short = wrap_tlv(&[0xAA; 10]).unwrap();
        assert_eq!(&short[..2], &[0x03, 10]);
        assert_eq!(short.last(), Some(&TERMINATOR_TLV));
        assert_eq!(short.len(), tlv_len(10));

        let long = wrap_tlv(&[0xAA; 300]).unwrap();
        assert_eq!(&long[..4], &[0x03, 0xFF, 0x01, 0x2C]);
        assert_eq!(long.len(), tlv_len(300));
        assert_eq!(long.len(), 300 + 5);
    }

    #[test]
    fn test_wrap_tlv_boundary_at_255() {
        assert_eq!(tlv_len(254), 254 + 3);
        assert_eq!(tlv_len(255), 255 + 5);
    }

    #[test]
    fn test_empty_message_is_an_error() {
        assert_eq!(encode_message(&[]), Err(EncodeError::EmptyMessage));
    }

    #[test]
    fn test_text_payload_bytes() {
        let record = NdefRecord::text("en", "hi");
        let payload = payload_bytes(&record.payload).unwrap();

        assert_eq!(payload, vec![0x02, b'e', b'n', b'h', b'i']);
        assert_eq!(payload.len(), payload_bytes_len(&record.payload));
    }

    #[test]
    fn test_utf16_text_payload_len_matches_bytes() {
        let payload = NdefPayload::Text(TextPayload {
            format: TextPayloadFormat::Utf16,
            language: "fr".to_string(),
            text: "été".to_string(),
        });

        let bytes = payload_bytes(&payload).unwrap();
        assert_eq!(bytes[0], 0x82);
        assert_eq!(bytes.len(), payload_bytes_len(&payload));
        assert_eq!(bytes.len(), 1 + 2 + 6);
    }

    #[test]
    fn test_language_code_too_long() {
        let record = NdefRecord::text("x".repeat(64), "hi");
        assert_eq!(payload_bytes(&record.payload), Err(EncodeError::LanguageCodeTooLong(64)));
    }

    #[test]
    fn test_record_len_matches_encoded_len() {
        let short = NdefRecord::vcard(vec![b'v'; 255]);
        assert_eq!(record_len(12, 255), short.encoded_len());

        let long = NdefRecord::vcard(vec![b'v'; 256]);
        assert_eq!(record_len(12, 256), long.encoded_len());
    }

    #[test]
    fn test_encoded_tlv_len_matches_encoding() {
        let records = [NdefRecord::vcard(vec![b'v'; 120]), NdefRecord::uri("https://tapcard.app/share/x")];
        let encoded = encode_tlv(&records).unwrap();
        assert_eq!(encoded.len(), encoded_tlv_len(&records));
    }
}
