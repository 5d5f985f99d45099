// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Box credentials and log redaction.

use std::fmt;

/// Placeholder substituted for the box id in logged URLs.
pub const REDACTED_BOX_PLACEHOLDER: &str = "XXXXXXXXXXXXXX";

/// OpenSenseMap box id and its secret access token.
///
/// Neither value is ever printed in full: `Debug` shows the redacted box id
/// and hides the key.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    box_id: String,
    auth_key: String,
}

impl Credentials {
    /// Create credentials from the box id and its auth key.
    pub fn new(box_id: impl Into<String>, auth_key: impl Into<String>) -> Self {
        Self {
            box_id: box_id.into(),
            auth_key: auth_key.into(),
        }
    }

    /// Unredacted box id, for building request URLs only.
    pub fn box_id(&self) -> &str {
        &self.box_id
    }

    /// Secret sent verbatim in the `Authorization` header.
    pub fn auth_key(&self) -> &str {
        &self.auth_key
    }

    /// Box id safe for logs.
    pub fn redacted_box_id(&self) -> String {
        redact_identifier(&self.box_id)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("box_id", &self.redacted_box_id())
            .field("auth_key", &"***")
            .finish()
    }
}

/// Keep the first 2 and last 4 characters of an identifier.
///
/// Identifiers too short to hide anything are fully masked.
pub fn redact_identifier(id: &str) -> String {
    let chars: Vec<char> = id.chars().collect();
    if chars.len() <= 6 {
        return "x".repeat(8);
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}xxxxxxxx{}", head, tail)
}
