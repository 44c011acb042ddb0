use crate::HeaderError;
use num_enum::{IntoPrimitive, TryFromPrimitive};

#[doc = r#"
The file format stored in the header.

Format 2 (a set of independent single-track sequences) is not supported;
reading such a file fails with [`HeaderError::UnsupportedFormat`].
"#]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum Format {
    /// Format 0: a single track holding all channels
    SingleMultiChannel = 0,
    /// Format 1: several tracks played together
    #[default]
    Simultaneous = 1,
}

impl Format {
    /// Decode the header's format field
    ///
    /// # Errors
    /// [`HeaderError::UnsupportedFormat`] for anything but 0 or 1
    pub fn from_header_value(value: u16) -> Result<Self, HeaderError> {
        Self::try_from(value).map_err(|e| HeaderError::UnsupportedFormat(e.number))
    }
}

#[test]
fn format_two_is_rejected() {
    use pretty_assertions::assert_eq;
    assert_eq!(Format::from_header_value(0), Ok(Format::SingleMultiChannel));
    assert_eq!(u16::from(Format::Simultaneous), 1);
    assert_eq!(Format::default(), Format::Simultaneous);
    assert_eq!(
        Format::from_header_value(2),
        Err(HeaderError::UnsupportedFormat(2))
    );
}
