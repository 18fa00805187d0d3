use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use glam::DVec3;
use log::warn;
use thiserror::Error;

use crate::position::Position;

/// Separator between the format tag and each encoded field.
pub const DELIMITER: char = '_';

/// Encoding schemes an address token can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressFormat {
    /// Integral sector components followed by an index.
    Coordinate,
}

impl AddressFormat {
    pub const ALL: [AddressFormat; 1] = [AddressFormat::Coordinate];

    pub fn tag(self) -> &'static str {
        match self {
            AddressFormat::Coordinate => "coordinate",
        }
    }

    fn detect(token: &str) -> Option<(AddressFormat, &str)> {
        Self::ALL.into_iter().find_map(|format| {
            token
                .strip_prefix(format.tag())
                .and_then(|rest| rest.strip_prefix(DELIMITER))
                .map(|rest| (format, rest))
        })
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum AddressError {
    #[error("address token is empty")]
    Empty,
    #[error("unrecognised address format in {0:?}")]
    UnknownFormat(String),
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },
    #[error("field {field} is not an integer: {source}")]
    InvalidField {
        field: usize,
        #[source]
        source: ParseIntError,
    },
    #[error("field {field} is not in canonical form: {raw:?}")]
    NonCanonicalField { field: usize, raw: String },
    #[error("sector of {0} does not fit a 64-bit address")]
    SectorOutOfRange(Position),
}

/// A sector-granularity position paired with an index, as stored in an
/// address token.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Address {
    pub position: Position,
    pub index: i32,
}

impl Address {
    pub fn new(position: Position, index: i32) -> Self {
        Address { position, index }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z] = self.position.sector_index();
        let d = DELIMITER;
        write!(
            f,
            "{}{d}{x}{d}{y}{d}{z}{d}{}",
            AddressFormat::Coordinate.tag(),
            self.index
        )
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        try_decode(token)
    }
}

/// Encodes the sector of `position` and `index` as a `coordinate` token.
///
/// The local part is not stored; decoding yields a position at the sector
/// corner. Sector components outside the `i64` range saturate, so such a token
/// does not decode back to `position`. Use [`try_encode`] to reject them.
pub fn encode(position: &Position, index: i32) -> String {
    Address::new(*position, index).to_string()
}

/// Like [`encode`], but fails instead of saturating out-of-range sectors.
pub fn try_encode(position: &Position, index: i32) -> Result<String, AddressError> {
    if !position.sector_in_index_range() {
        return Err(AddressError::SectorOutOfRange(*position));
    }
    Ok(encode(position, index))
}

/// Strict decoding of an address token.
pub fn try_decode(token: &str) -> Result<Address, AddressError> {
    if token.is_empty() {
        return Err(AddressError::Empty);
    }
    let (format, body) =
        AddressFormat::detect(token).ok_or_else(|| AddressError::UnknownFormat(token.to_string()))?;

    match format {
        AddressFormat::Coordinate => decode_coordinate(body),
    }
}

fn decode_coordinate(body: &str) -> Result<Address, AddressError> {
    let fields: Vec<&str> = body.split(DELIMITER).collect();
    let [x, y, z, index] = fields.as_slice() else {
        return Err(AddressError::FieldCount {
            expected: 4,
            found: fields.len(),
        });
    };

    let component = |field: usize, raw: &str| parse_field::<i64>(field, raw).map(|v| v as f64);
    let sector = DVec3::new(component(0, *x)?, component(1, *y)?, component(2, *z)?);
    let index = parse_field::<i32>(3, index)?;

    Ok(Address::new(Position::from_sector(sector), index))
}

/// Parses one integer field, accepting only the form `encode` writes: no sign
/// prefix, leading zeros or negative zero.
fn parse_field<T>(field: usize, raw: &str) -> Result<T, AddressError>
where
    T: FromStr<Err = ParseIntError> + ToString,
{
    let value = raw
        .parse::<T>()
        .map_err(|source| AddressError::InvalidField { field, source })?;
    if value.to_string() != raw {
        return Err(AddressError::NonCanonicalField {
            field,
            raw: raw.to_string(),
        });
    }
    Ok(value)
}

/// Lenient decoding for callers that treat a bad token as "no value".
///
/// Malformed tokens are logged and mapped to `None`; an empty token is `None`
/// without a log line.
pub fn decode(token: &str) -> Option<(Position, i32)> {
    match try_decode(token) {
        Ok(address) => Some((address.position, address.index)),
        Err(AddressError::Empty) => None,
        Err(err) => {
            warn!("Ignoring address token {token:?}: {err}");
            None
        }
    }
}
