use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use seamgrid_core::TileDiff;
use thiserror::Error;

const TRANSFER_DOMAIN: &str = "tiles";
const TRANSFER_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded diff payload.
pub(crate) const TRANSFER_HEADER: &str = "tiles:v1";
/// Delimiter used to separate the prefix, block dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Tile diff together with the dimensions of the block it applies to.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct TileTransfer {
    /// Number of columns in the baseline block.
    pub(crate) width: u32,
    /// Number of rows in the baseline block.
    pub(crate) height: u32,
    /// Changes relative to the baseline block.
    pub(crate) diff: TileDiff,
}

/// Errors that can occur while encoding or decoding tile transfer strings.
#[derive(Debug, Error)]
pub(crate) enum TransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("tile transfer string was empty")]
    EmptyPayload,
    /// The prefix segment was missing.
    #[error("tile transfer string is missing the prefix")]
    MissingPrefix,
    /// The version segment was missing.
    #[error("tile transfer string is missing the version")]
    MissingVersion,
    /// The block dimensions were missing.
    #[error("tile transfer string is missing the block dimensions")]
    MissingDimensions,
    /// The payload segment was missing.
    #[error("tile transfer string is missing the payload")]
    MissingPayload,
    /// The prefix segment named another domain.
    #[error("tile transfer prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The version segment named an unsupported version.
    #[error("tile transfer version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The block dimensions could not be parsed.
    #[error("could not parse block dimensions '{0}'")]
    InvalidDimensions(String),
    /// The base64 payload could not be decoded.
    #[error("could not decode tile transfer payload: {0}")]
    InvalidEncoding(#[source] base64::DecodeError),
    /// The diff could not be converted to or from JSON.
    #[error("could not process tile transfer payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
}

impl TileTransfer {
    /// Encodes the transfer into a single-line string.
    pub(crate) fn encode(&self) -> Result<String, TransferError> {
        let json = serde_json::to_vec(&self.diff).map_err(TransferError::InvalidPayload)?;
        let encoded = STANDARD_NO_PAD.encode(json);
        Ok(format!(
            "{TRANSFER_HEADER}{FIELD_DELIMITER}{}x{}{FIELD_DELIMITER}{encoded}",
            self.width, self.height
        ))
    }

    /// Decodes a transfer from its string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, TransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(TransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(TransferError::MissingPrefix)?;
        let version = parts.next().ok_or(TransferError::MissingVersion)?;
        let dimensions = parts.next().ok_or(TransferError::MissingDimensions)?;
        let payload = parts.next().ok_or(TransferError::MissingPayload)?;

        if domain != TRANSFER_DOMAIN {
            return Err(TransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != TRANSFER_VERSION {
            return Err(TransferError::UnsupportedVersion(version.to_owned()));
        }

        let (width, height) = parse_dimensions(dimensions)?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(TransferError::InvalidEncoding)?;
        let diff: TileDiff = serde_json::from_slice(&bytes).map_err(TransferError::InvalidPayload)?;

        Ok(Self {
            width,
            height,
            diff,
        })
    }
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), TransferError> {
    let invalid = || TransferError::InvalidDimensions(dimensions.to_owned());
    let (width, height) = dimensions.split_once(['x', 'X']).ok_or_else(invalid)?;

    let width = width.trim().parse::<u32>().map_err(|_| invalid())?;
    let height = height.trim().parse::<u32>().map_err(|_| invalid())?;

    if width == 0 || height == 0 {
        return Err(invalid());
    }

    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoded_string_carries_header_and_dimensions() {
        let mut diff = TileDiff::new();
        diff.record(3, "tiles/brick");
        diff.record(9, "");
        let transfer = TileTransfer {
            width: 4,
            height: 3,
            diff,
        };

        let encoded = transfer.encode().expect("diff serialises");
        assert!(encoded.starts_with(&format!("{TRANSFER_HEADER}:4x3:")));

        let decoded = TileTransfer::decode(&format!("  {encoded}\n")).expect("transfer decodes");
        assert_eq!(decoded, transfer);
    }

    #[test]
    fn rejects_foreign_prefixes_and_versions() {
        assert!(matches!(
            TileTransfer::decode("grid:v1:4x3:e30"),
            Err(TransferError::InvalidPrefix(prefix)) if prefix == "grid"
        ));
        assert!(matches!(
            TileTransfer::decode("tiles:v2:4x3:e30"),
            Err(TransferError::UnsupportedVersion(version)) if version == "v2"
        ));
        assert!(matches!(
            TileTransfer::decode("   "),
            Err(TransferError::EmptyPayload)
        ));
    }

    #[test]
    fn rejects_malformed_dimensions() {
        for dimensions in ["4", "0x3", "ax3", "4x-1"] {
            let value = format!("tiles:v1:{dimensions}:e30");
            assert!(matches!(
                TileTransfer::decode(&value),
                Err(TransferError::InvalidDimensions(_))
            ));
        }
    }

    #[test]
    fn rejects_payloads_that_are_not_diffs() {
        assert!(matches!(
            TileTransfer::decode("tiles:v1:4x3:!!!"),
            Err(TransferError::InvalidEncoding(_))
        ));
        assert!(matches!(
            TileTransfer::decode("tiles:v1:4x3:bm90IGpzb24"),
            Err(TransferError::InvalidPayload(_))
        ));
    }
}
