use std::fmt;

use serde::Deserialize;

/// Name of the request parameter carrying the API key.
pub const AUTH_PARAM: &str = "auth";

#[derive(Clone, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
/// The API key used to authenticate every request.
///
/// The key is never printed; `Debug` and `Display` show a redacted form.
pub struct ApiKey(String);

impl ApiKey {
    /// Creates a new `ApiKey`.
    pub fn new(key: &str) -> ApiKey {
        ApiKey(key.to_string())
    }

    /// Returns the raw key, for placing into request parameters.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey({})", self)
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("********")
    }
}

impl From<String> for ApiKey {
    fn from(value: String) -> Self {
        ApiKey(value)
    }
}
