//! # Resolution Results

use shared_types::{ChainAddress, SigningScheme, UserAlias, UserProfile};
use std::collections::BTreeSet;

/// One entry whose signature verified against a registered key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSigner {
    pub address: ChainAddress,
    /// Normalized key.
    pub public_key: String,
}

/// Identity behind a signed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub alias: UserAlias,
    /// Profile of the first verified signer; all profiles of an alias share
    /// roles and quorum.
    pub profile: UserProfile,
    /// Scheme the request was verified with.
    pub signing: SigningScheme,
    /// Verified signers, in request order.
    pub signers: Vec<ResolvedSigner>,
    /// Number of signature entries on the request, registered or not.
    pub entry_count: usize,
}

impl ResolvedIdentity {
    /// Addresses that validly co-signed.
    pub fn signed_by(&self) -> BTreeSet<ChainAddress> {
        self.signers.iter().map(|s| s.address.clone()).collect()
    }
}
