//! Destination URL derivation from a shared-access-signature URL.
//!
//! The SAS URL is split at the first literal `/?`: the part up to and including
//! the `/` is the host prefix, the part after `?` is the query string, which is
//! the credential. Neither `Display` nor `Debug` ever prints the query.

use std::fmt;

use crate::error::DeployError;
use crate::redact::{Redactor, MASK};

const HOST_BOUNDARY: &str = "/?";

#[derive(Clone, PartialEq, Eq)]
pub struct Destination {
    host_prefix: String,
    container: String,
    query: String,
}

impl Destination {
    /// Derives `<host-prefix><container>?<query>` from `sas_url`.
    pub fn derive(sas_url: &str, container: &str) -> Result<Self, DeployError> {
        let Some(end_of_host) = sas_url.find(HOST_BOUNDARY) else {
            return Err(DeployError::InvalidSasUrl {
                masked_url: mask_query(sas_url),
            });
        };
        Ok(Self {
            host_prefix: sas_url[..=end_of_host].to_string(),
            container: container.to_string(),
            query: sas_url[end_of_host + HOST_BOUNDARY.len()..].to_string(),
        })
    }

    pub fn host_prefix(&self) -> &str {
        &self.host_prefix
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    /// The secret part of the SAS URL.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Container URL, with credentials.
    pub fn url(&self) -> String {
        format!("{}{}?{}", self.host_prefix, self.container, self.query)
    }

    /// URL of one object one directory below the container root, with credentials.
    pub fn object_url(&self, dir: &str, file: &str) -> String {
        format!(
            "{}{}/{}/{}?{}",
            self.host_prefix, self.container, dir, file, self.query
        )
    }

    /// Redactor that masks this destination's query string.
    pub fn redactor(&self) -> Redactor {
        Redactor::new().with_secret(self.query.clone())
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}?{}", self.host_prefix, self.container, MASK)
    }
}

impl fmt::Debug for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Destination")
            .field("host_prefix", &self.host_prefix)
            .field("container", &self.container)
            .field("query", &MASK)
            .finish()
    }
}

/// Redactor for a raw SAS URL, usable before it has been validated. A URL
/// without the `/?` boundary yields an empty redactor; such a URL never gets
/// past validation.
pub fn redactor_for(sas_url: &str) -> Redactor {
    match sas_url.find(HOST_BOUNDARY) {
        Some(i) => Redactor::new().with_secret(&sas_url[i + HOST_BOUNDARY.len()..]),
        None => Redactor::new(),
    }
}

/// Hides anything after the first `?` so a malformed SAS URL can be echoed in errors.
fn mask_query(url: &str) -> String {
    match url.find('?') {
        Some(i) => format!("{}?{}", &url[..i], MASK),
        None => url.to_string(),
    }
}
