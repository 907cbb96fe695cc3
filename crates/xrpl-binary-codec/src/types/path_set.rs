//! Payment paths.
//!
//! Each step starts with a type byte whose bits say which of account,
//! currency and issuer follow (20 bytes each, in that order). `0xFF`
//! separates paths and `0x00` ends the set.

use super::{AccountId, Currency, SerializedType};
use crate::errors::BinaryCodecError;
use crate::parser::BinaryParser;
use serde_json::{Map, Value};

const TYPE_ACCOUNT: u8 = 0x01;
const TYPE_CURRENCY: u8 = 0x10;
const TYPE_ISSUER: u8 = 0x20;
const PATH_SEPARATOR: u8 = 0xFF;
const PATHSET_END: u8 = 0x00;

/// One hop of a payment path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PathStep {
    /// Account to ripple through.
    pub account: Option<AccountId>,
    /// Currency to convert into.
    pub currency: Option<Currency>,
    /// Issuer of that currency.
    pub issuer: Option<AccountId>,
}

impl PathStep {
    fn type_byte(&self) -> u8 {
        let mut kind = 0;
        if self.account.is_some() {
            kind |= TYPE_ACCOUNT;
        }
        if self.currency.is_some() {
            kind |= TYPE_CURRENCY;
        }
        if self.issuer.is_some() {
            kind |= TYPE_ISSUER;
        }
        kind
    }

    fn from_value(value: &Value) -> Result<Self, BinaryCodecError> {
        let map = value.as_object().ok_or(BinaryCodecError::InvalidValueType {
            type_name: PathSet::NAME,
            expected: "path steps as objects",
        })?;
        let step = PathStep {
            account: map.get("account").map(AccountId::from_value).transpose()?,
            currency: map.get("currency").map(Currency::from_value).transpose()?,
            issuer: map.get("issuer").map(AccountId::from_value).transpose()?,
        };
        if step.type_byte() == 0 {
            return Err(BinaryCodecError::format(
                PathSet::NAME,
                "a path step needs an account, currency or issuer",
            ));
        }
        Ok(step)
    }

    fn read(kind: u8, parser: &mut BinaryParser<'_>) -> Result<Self, BinaryCodecError> {
        if kind & !(TYPE_ACCOUNT | TYPE_CURRENCY | TYPE_ISSUER) != 0 {
            return Err(BinaryCodecError::format(
                PathSet::NAME,
                format!("unknown path step type 0x{kind:02X}"),
            ));
        }
        let mut step = PathStep::default();
        if kind & TYPE_ACCOUNT != 0 {
            step.account = Some(AccountId::new(parser.read_array()?));
        }
        if kind & TYPE_CURRENCY != 0 {
            step.currency = Some(Currency::new(parser.read_array()?));
        }
        if kind & TYPE_ISSUER != 0 {
            step.issuer = Some(AccountId::new(parser.read_array()?));
        }
        Ok(step)
    }

    fn write(&self, out: &mut Vec<u8>) {
        out.push(self.type_byte());
        if let Some(account) = &self.account {
            out.extend_from_slice(account.as_bytes());
        }
        if let Some(currency) = &self.currency {
            out.extend_from_slice(currency.as_bytes());
        }
        if let Some(issuer) = &self.issuer {
            out.extend_from_slice(issuer.as_bytes());
        }
    }

    fn to_json(&self) -> Value {
        let mut out = Map::new();
        if let Some(account) = &self.account {
            out.insert("account".into(), account.to_json());
        }
        if let Some(currency) = &self.currency {
            out.insert("currency".into(), currency.to_json());
        }
        if let Some(issuer) = &self.issuer {
            out.insert("issuer".into(), issuer.to_json());
        }
        Value::Object(out)
    }
}

/// Set of alternative payment paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathSet {
    paths: Vec<Vec<PathStep>>,
    bytes: Vec<u8>,
}

impl PathSet {
    /// Builds a path set from parsed paths. Every path needs at least one step.
    pub fn new(paths: Vec<Vec<PathStep>>) -> Result<Self, BinaryCodecError> {
        let mut bytes = Vec::new();
        for (i, path) in paths.iter().enumerate() {
            if path.is_empty() {
                return Err(BinaryCodecError::format(Self::NAME, "empty path"));
            }
            if i > 0 {
                bytes.push(PATH_SEPARATOR);
            }
            for step in path {
                step.write(&mut bytes);
            }
        }
        bytes.push(PATHSET_END);
        Ok(Self { paths, bytes })
    }

    /// Paths in wire order.
    pub fn paths(&self) -> &[Vec<PathStep>] {
        &self.paths
    }
}

impl SerializedType for PathSet {
    const NAME: &'static str = "PathSet";

    fn from_value(value: &Value) -> Result<Self, BinaryCodecError> {
        let expected = BinaryCodecError::InvalidValueType {
            type_name: Self::NAME,
            expected: "an array of arrays of path steps",
        };
        let Some(paths) = value.as_array() else {
            return Err(expected);
        };
        let mut parsed = Vec::with_capacity(paths.len());
        for path in paths {
            let Some(steps) = path.as_array() else {
                return Err(expected);
            };
            parsed.push(
                steps
                    .iter()
                    .map(PathStep::from_value)
                    .collect::<Result<Vec<_>, _>>()?,
            );
        }
        Self::new(parsed)
    }

    fn from_parser(
        parser: &mut BinaryParser<'_>,
        _length_hint: Option<usize>,
    ) -> Result<Self, BinaryCodecError> {
        let mut paths = Vec::new();
        let mut current = Vec::new();
        loop {
            match parser.read_u8()? {
                PATHSET_END => {
                    if !current.is_empty() {
                        paths.push(current);
                    } else if !paths.is_empty() {
                        return Err(BinaryCodecError::format(Self::NAME, "empty path"));
                    }
                    break;
                }
                PATH_SEPARATOR => {
                    if current.is_empty() {
                        return Err(BinaryCodecError::format(Self::NAME, "empty path"));
                    }
                    paths.push(std::mem::take(&mut current));
                }
                kind => current.push(PathStep::read(kind, parser)?),
            }
        }
        Self::new(paths)
    }

    fn to_json(&self) -> Value {
        Value::Array(
            self.paths
                .iter()
                .map(|path| Value::Array(path.iter().map(PathStep::to_json).collect()))
                .collect(),
        )
    }

    fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}
