//! Placeholder verifier
//!
//! Matches signatures to keys by naming convention only. It provides no
//! security whatsoever and exists so scripts can be simulated without key
//! material.
//!
//! A marker starting with `SIG` is a signature and one starting with
//! `PUBKEY` or `PK` is a public key. After the marker prefix is removed the
//! remaining suffixes must be equal: `SIGNATURE` pairs with `PUBKEY`, `SIG7`
//! with `PK7`.

use crate::bytecode::instruction::{Instruction, PUBKEY_MARKER, SIGNATURE_MARKER};

use super::verifier::{KeyClass, SignatureVerifier};

const SIGNATURE_PREFIXES: [&str; 2] = [SIGNATURE_MARKER, "SIG"];
const PUBKEY_PREFIXES: [&str; 2] = [PUBKEY_MARKER, "PK"];

/// Naming-convention verifier used by default
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderVerifier;

impl PlaceholderVerifier {
    pub fn new() -> Self {
        PlaceholderVerifier
    }
}

fn strip_any<'a>(text: &'a str, prefixes: &[&str]) -> Option<&'a str> {
    prefixes.iter().find_map(|prefix| text.strip_prefix(prefix))
}

impl SignatureVerifier for PlaceholderVerifier {
    fn classify(&self, value: &Instruction) -> KeyClass {
        match value.as_marker() {
            Some(text) if strip_any(text, &SIGNATURE_PREFIXES).is_some() => KeyClass::Signature,
            Some(text) if strip_any(text, &PUBKEY_PREFIXES).is_some() => KeyClass::Pubkey,
            _ => KeyClass::Neither,
        }
    }

    fn verify(&self, signature: &Instruction, pubkey: &Instruction) -> bool {
        let sig = signature.as_marker().and_then(|t| strip_any(t, &SIGNATURE_PREFIXES));
        let key = pubkey.as_marker().and_then(|t| strip_any(t, &PUBKEY_PREFIXES));

        match (sig, key) {
            (Some(sig), Some(key)) => sig == key,
            _ => false,
        }
    }
}
