//! Request signing
//!
//! Every request carries an `sn` parameter computed from the other request
//! parameters and the client's secret key:
//!
//! 1. collect the request parameters, excluding `sn`
//! 2. sort them by key
//! 3. form-encode each value (`application/x-www-form-urlencoded`, space as
//!    `+`) and join as `key=value` pairs with `&`
//! 4. append `&sk=` and the raw secret key
//! 5. MD5 over the UTF-8 bytes, rendered as lowercase hex
//!
//! [`SigningParams`] keeps its entries in a `BTreeMap`, so step 2 cannot be
//! skipped and the result does not depend on insertion order.
//!
//! # Example
//!
//! ```
//! use doctask::signature::{sign, SigningParams};
//!
//! let mut params = SigningParams::new();
//! params.insert("taskId", "T1");
//! params.insert("clientId", "abc");
//!
//! let sn = sign(&params, "s3cret");
//! assert_eq!(sn.as_str().len(), 32);
//! ```

use std::collections::BTreeMap;

use url::form_urlencoded;

use crate::error::{Error, Result};

/// Name of the query parameter that carries the signature
pub const SIGNATURE_PARAM: &str = "sn";

/// Key under which the secret is appended to the canonical query
const SECRET_PARAM: &str = "sk";

/// Parameters covered by a request signature, ordered by key
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SigningParams {
    entries: BTreeMap<String, String>,
}

impl SigningParams {
    /// Create an empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter
    ///
    /// Empty values are not signed: the service treats an empty optional
    /// parameter as absent, so it must not appear in the canonical string.
    /// For caller-supplied keys use [`SigningParams::try_insert`].
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let value = value.into();
        if !value.is_empty() {
            self.entries.insert(key.into(), value);
        }
        self
    }

    /// Add an optional parameter; `None` and empty values are omitted
    pub fn insert_opt(&mut self, key: impl Into<String>, value: Option<&str>) -> &mut Self {
        if let Some(value) = value {
            self.insert(key, value);
        }
        self
    }

    /// Add a caller-supplied parameter, rejecting the keys the signature scheme reserves
    pub fn try_insert(&mut self, key: &str, value: impl Into<String>) -> Result<&mut Self> {
        if key == SIGNATURE_PARAM || key == SECRET_PARAM {
            return Err(Error::validation(format!(
                "'{}' is reserved by the signature scheme and cannot be signed",
                key
            )));
        }
        Ok(self.insert(key, value))
    }

    /// Value of a parameter, if present
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Number of signed parameters
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no parameters are present
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the parameters in signing order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The sorted, form-encoded query string the digest is computed over, without the secret
    pub fn canonical_query(&self) -> String {
        self.entries
            .iter()
            .map(|(key, value)| format!("{}={}", key, form_encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

fn form_encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SigningParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

/// A request signature: 32 lowercase hex characters
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Signature(String);

impl Signature {
    /// Borrow the signature as sent on the wire
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute the signature for a parameter set
pub fn sign(params: &SigningParams, secret_key: &str) -> Signature {
    let mut input = params.canonical_query();
    input.push('&');
    input.push_str(SECRET_PARAM);
    input.push('=');
    input.push_str(secret_key);

    let digest = md5::compute(input.as_bytes());
    Signature(format!("{:x}", digest))
}
