//! Signature verification capability
//!
//! The interpreter never checks signatures itself. CHECKSIG and
//! CHECKMULTISIG ask a [`SignatureVerifier`] supplied by the host, so a real
//! cryptographic verifier can replace the placeholder one without touching
//! the interpreter.

use crate::bytecode::instruction::Instruction;

/// What a stack value looks like to the verifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyClass {
    Signature,
    Pubkey,
    Neither,
}

pub trait SignatureVerifier {
    /// Classify a stack value as a signature, a public key, or neither
    fn classify(&self, value: &Instruction) -> KeyClass;

    /// Whether `signature` was produced by the key `pubkey`
    fn verify(&self, signature: &Instruction, pubkey: &Instruction) -> bool;

    fn is_signature(&self, value: &Instruction) -> bool {
        self.classify(value) == KeyClass::Signature
    }

    fn is_pubkey(&self, value: &Instruction) -> bool {
        self.classify(value) == KeyClass::Pubkey
    }
}

impl<V: SignatureVerifier + ?Sized> SignatureVerifier for &V {
    fn classify(&self, value: &Instruction) -> KeyClass {
        (**self).classify(value)
    }

    fn verify(&self, signature: &Instruction, pubkey: &Instruction) -> bool {
        (**self).verify(signature, pubkey)
    }
}
