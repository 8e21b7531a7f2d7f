pub mod stream;

use stream::Stream;
use winnow::{
    ModalResult, Parser,
    binary::{
        be_u8, be_u16, be_u32,
        bits::{bits, bool as take_bool, take as take_bits},
    },
    error::{ContextError, ErrMode},
    token::{any, literal, take, take_while},
};

use crate::{
    header::NdefHeader,
    ndef_type::NdefType,
    payload::{NdefPayload, TextPayload, TextPayloadFormat, expand_uri},
    record::{NdefRecord, TEXT_RECORD_TYPE, URI_RECORD_TYPE},
    writer::{NDEF_MESSAGE_TLV, THREE_BYTE_LENGTH_FORMAT},
};

const NULL_TLV: u8 = 0x00;

/// Parse an NDEF message TLV, as read from the data area of a type 2 tag
///
/// Leading NULL TLVs are skipped, the message must be complete inside the TLV length
pub fn parse_ndef_tlv(input: &mut Stream<'_>) -> ModalResult<Vec<NdefRecord>> {
    let _ = take_while(0.., NULL_TLV).parse_next(input)?;
    let _ = literal([NDEF_MESSAGE_TLV]).parse_next(input)?;

    let length = parse_tlv_length(input)?;
    let message = take(length as usize).parse_next(input)?;

    let mut message = stream::new(message);
    parse_ndef_message(&mut message).map_err(|error| match error {
        // the TLV said the message was complete, running out of bytes means it lied
        ErrMode::Incomplete(_) => ErrMode::Cut(ContextError::new()),
        error => error,
    })
}

/// Parse records until one with the message end flag set
pub fn parse_ndef_message(input: &mut Stream<'_>) -> ModalResult<Vec<NdefRecord>> {
    let mut records = Vec::new();

    loop {
        let record = parse_ndef_record.parse_next(input)?;
        let message_end = record.header.message_end;
        records.push(record);

        if message_end {
            break;
        }
    }

    Ok(records)
}

pub fn parse_ndef_record(input: &mut Stream<'_>) -> ModalResult<NdefRecord> {
    let header = parse_header.parse_next(input)?;
    let type_ = parse_type(input, header.type_length)?;
    let id = parse_id(input, header.id_length)?;
    let payload = parse_payload(input, &header, &type_)?;

    Ok(NdefRecord { header, type_, id, payload })
}

// private
fn parse_tlv_length(input: &mut Stream<'_>) -> ModalResult<u16> {
    let length_indicator = be_u8.parse_next(input)?;

    if length_indicator == THREE_BYTE_LENGTH_FORMAT {
        be_u16.parse_next(input)
    } else {
        Ok(length_indicator as u16)
    }
}

fn parse_header_byte(input: &mut Stream<'_>) -> ModalResult<(bool, bool, bool, bool, bool, u8)> {
    bits::<_, _, ErrMode<ContextError>, _, _>((
        take_bool,
        take_bool,
        take_bool,
        take_bool,
        take_bool,
        take_bits(3_u8),
    ))
    .parse_next(input)
}

fn parse_header(input: &mut Stream<'_>) -> ModalResult<NdefHeader> {
    let (message_begin, message_end, chunked, short_record, has_id_length, type_name_format) =
        parse_header_byte(input)?;

    let type_length = be_u8.parse_next(input)?;

    let payload_length = if short_record {
        any.map(|x: u8| x as u32).parse_next(input)?
    } else {
        be_u32.parse_next(input)?
    };

    let id_length = if has_id_length { Some(any.parse_next(input)?) } else { None };

    Ok(NdefHeader {
        message_begin,
        message_end,
        chunked,
        short_record,
        has_id_length,
        type_name_format: NdefType::from_tnf(type_name_format),
        type_length,
        payload_length,
        id_length,
    })
}

fn parse_type(input: &mut Stream<'_>, type_length: u8) -> ModalResult<Vec<u8>> {
    take(type_length as usize).map(|s: &[u8]| s.to_vec()).parse_next(input)
}

fn parse_id(input: &mut Stream<'_>, id_length: Option<u8>) -> ModalResult<Option<Vec<u8>>> {
    if let Some(id_len) = id_length {
        take(id_len as usize).map(|s: &[u8]| Some(s.to_vec())).parse_next(input)
    } else {
        Ok(None)
    }
}

fn parse_payload(
    input: &mut Stream<'_>,
    header: &NdefHeader,
    type_: &[u8],
) -> ModalResult<NdefPayload> {
    let well_known = header.type_name_format == NdefType::WellKnown;

    if well_known && type_ == TEXT_RECORD_TYPE {
        return parse_text_payload(input, header.payload_length).map(NdefPayload::Text);
    }

    if well_known && type_ == URI_RECORD_TYPE {
        return parse_uri_payload(input, header.payload_length).map(NdefPayload::Uri);
    }

    take(header.payload_length as usize)
        .map(|s: &[u8]| NdefPayload::Data(s.to_vec()))
        .parse_next(input)
}

fn parse_text_payload(input: &mut Stream<'_>, payload_length: u32) -> ModalResult<TextPayload> {
    if payload_length == 0 {
        return Err(ErrMode::Cut(ContextError::new()));
    }

    // utf16 flag, reserved bit, 6 bits of language code length
    let (is_utf16, _reserved, language_code_length): (bool, bool, u8) =
        bits::<_, _, ErrMode<ContextError>, _, _>((take_bool, take_bool, take_bits(6_u8)))
            .parse_next(input)?;

    let remaining_length = payload_length
        .checked_sub(language_code_length as u32 + 1)
        .ok_or_else(|| ErrMode::Cut(ContextError::new()))?;

    let language_code = take(language_code_length as usize).parse_next(input)?;
    let text = take(remaining_length as usize).parse_next(input)?;

    let parsed_text = if is_utf16 {
        String::from_utf16_lossy(
            &text
                .chunks_exact(2)
                .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
                .collect::<Vec<u16>>(),
        )
    } else {
        String::from_utf8_lossy(text).to_string()
    };

    Ok(TextPayload {
        format: if is_utf16 { TextPayloadFormat::Utf16 } else { TextPayloadFormat::Utf8 },
        language: String::from_utf8_lossy(language_code).to_string(),
        text: parsed_text,
    })
}

fn parse_uri_payload(input: &mut Stream<'_>, payload_length: u32) -> ModalResult<String> {
    if payload_length == 0 {
        return Ok(String::new());
    }

    let code = any.parse_next(input)?;
    let rest = take((payload_length - 1) as usize).parse_next(input)?;

    Ok(expand_uri(code, &String::from_utf8_lossy(rest)))
}
