use parser::stream::{self, StreamExt as _};
use record::NdefRecord;
use tracing::debug;
use winnow::error::{ErrMode, Needed};

uniffi::setup_scaffolding!();

pub mod ffi;
pub mod header;
pub mod ndef_type;
pub mod parser;
pub mod payload;
pub mod record;
pub mod writer;

pub use writer::EncodeError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, uniffi::Error)]
pub enum DecodeError {
    #[error("Not enough data to parse the NDEF message")]
    NotEnoughData { needed: Option<u32> },

    #[error("Error parsing the NDEF message: {0}")]
    ParsingError(String),
}

impl From<ErrMode<winnow::error::ContextError>> for DecodeError {
    fn from(error: ErrMode<winnow::error::ContextError>) -> Self {
        match error {
            ErrMode::Incomplete(Needed::Size(needed)) => {
                Self::NotEnoughData { needed: Some(needed.get() as u32) }
            }
            ErrMode::Incomplete(Needed::Unknown) => Self::NotEnoughData { needed: None },
            error => Self::ParsingError(error.to_string()),
        }
    }
}

/// Decode a bare NDEF message, the bytes a platform NDEF API hands back
pub fn decode_message(bytes: &[u8]) -> Result<Vec<NdefRecord>, DecodeError> {
    let mut stream = stream::new(bytes);
    let records = parser::parse_ndef_message(&mut stream)?;

    if !stream.is_empty() {
        debug!("{} bytes left over after the NDEF message", stream.len());
    }

    Ok(records)
}

/// Decode an NDEF message TLV, the raw data area of a type 2 tag
pub fn decode_tlv(bytes: &[u8]) -> Result<Vec<NdefRecord>, DecodeError> {
    let mut stream = stream::new(bytes);
    let records = parser::parse_ndef_tlv(&mut stream)?;

    match stream.remaining().first() {
        Some(&writer::TERMINATOR_TLV) | None => {}
        Some(byte) => debug!("unexpected TLV {byte:#04x} after the NDEF message"),
    }

    Ok(records)
}
