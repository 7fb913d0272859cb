//! Composite signatures attached to signed requests.
//!
//! Verification lives outside this workspace; the signatures are carried
//! through and persisted alongside the records they attest to.

use serde::{Deserialize, Serialize};

/// One account-key signature over a request payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeSignature {
    pub addr: String,
    pub key_id: u32,
    pub signature: String,
}
