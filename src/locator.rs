//! Parsing and rewriting of size-encoded image locators.
//!
//! Every image locator ends in a `_WIDTHxHEIGHT` suffix naming the resolution
//! the store should render:
//!
//! - `https://cdn.example/photo_640x480` → 640x480
//! - `/images/001-dawn_1280x963` → 1280x963
//! - `https://cdn.example/photo.jpg` → no suffix, [`ParseError::MissingSuffix`]
//!
//! The suffix is anchored at the very end of the string. Query strings and
//! fragments are not stripped first, so `photo_640x480?v=2` does not parse.
//!
//! The store side uses the same grammar: a rendered thumbnail of store key
//! `k` is saved under [`dimension_key`]`(k, dims)`, and store keys themselves
//! are restricted by [`check_store_key`].

use crate::types::Dimensions;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

// `[0-9]` rather than `\d`: the regex crate's `\d` matches any Unicode digit.
static DIMENSION_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_([0-9]+)x([0-9]+)$").expect("dimension suffix pattern is valid"));

static STORE_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9a-zA-Z_\-]+$").expect("store key pattern is valid"));

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("could not parse image dimensions: no _WIDTHxHEIGHT suffix in {0:?}")]
    MissingSuffix(String),
    #[error("could not parse image dimensions: value out of range in {0:?}")]
    OutOfRange(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid store key {0:?}: only ASCII letters, digits, '_' and '-' are allowed")]
pub struct InvalidStoreKey(pub String);

/// Extract the `(width, height)` encoded at the end of a locator.
pub fn parse_dimensions(locator: &str) -> Result<Dimensions, ParseError> {
    let caps = DIMENSION_SUFFIX
        .captures(locator)
        .ok_or_else(|| ParseError::MissingSuffix(locator.to_string()))?;
    let number = |i: usize| {
        caps[i]
            .parse::<u32>()
            .map_err(|_| ParseError::OutOfRange(locator.to_string()))
    };
    Ok(Dimensions::new(number(1)?, number(2)?))
}

/// Replace the trailing `_WIDTHxHEIGHT` suffix with `dims`.
///
/// Fails the same way [`parse_dimensions`] does when there is no suffix to
/// replace, so a caller never mistakes an untouched locator for a rewritten one.
pub fn replace_dimensions(locator: &str, dims: Dimensions) -> Result<String, ParseError> {
    let found = DIMENSION_SUFFIX
        .find(locator)
        .ok_or_else(|| ParseError::MissingSuffix(locator.to_string()))?;
    Ok(format!("{}_{}", &locator[..found.start()], dims))
}

/// Store key of a rendered variant: `key_WIDTHxHEIGHT`.
pub fn dimension_key(key: &str, dims: Dimensions) -> String {
    format!("{key}_{dims}")
}

/// Reject store keys that could escape the store's namespace or break the
/// suffix grammar once a dimension suffix is appended.
pub fn check_store_key(key: &str) -> Result<(), InvalidStoreKey> {
    if STORE_KEY.is_match(key) {
        Ok(())
    } else {
        Err(InvalidStoreKey(key.to_string()))
    }
}
