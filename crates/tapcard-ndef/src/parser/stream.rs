use winnow::{Bytes, Partial};

/// Partial input, running out of bytes is `Incomplete` rather than an error
pub type Stream<'i> = Partial<&'i Bytes>;

pub fn new(bytes: &[u8]) -> Stream<'_> {
    Partial::new(Bytes::new(bytes))
}

pub trait StreamExt {
    /// Bytes not consumed yet
    fn remaining(&self) -> &[u8];

    fn len(&self) -> usize {
        self.remaining().len()
    }

    fn is_empty(&self) -> bool {
        self.remaining().is_empty()
    }
}

impl StreamExt for Stream<'_> {
    fn remaining(&self) -> &[u8] {
        self.as_ref()
    }
}
