pub mod placeholder;
pub mod verifier;

pub use placeholder::PlaceholderVerifier;
pub use verifier::{KeyClass, SignatureVerifier};
