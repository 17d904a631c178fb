//! Script Instruction Representation
//!
//! An instruction is either a literal pushed as-is or a reference into the
//! opcode catalog. Both render as the token that produced them.

use std::fmt;

use serde::Serialize;

use super::opcode::Opcode;

/// Reserved placeholder literal for a signature
pub const SIGNATURE_MARKER: &str = "SIGNATURE";

/// Reserved placeholder literal for a public key
pub const PUBKEY_MARKER: &str = "PUBKEY";

/// Literal data value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),

    /// Placeholder text such as a signature or public-key marker
    Marker(String),
}

/// A single script instruction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Instruction {
    Literal(Value),
    Opcode(Opcode),
}

impl Instruction {
    pub fn int(n: i64) -> Self {
        Instruction::Literal(Value::Int(n))
    }

    pub fn marker(text: impl Into<String>) -> Self {
        Instruction::Literal(Value::Marker(text.into()))
    }

    /// Numeric reading of the instruction.
    ///
    /// Integer literals and the small-integer constant opcodes are numeric;
    /// markers and every other opcode are not.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Instruction::Literal(Value::Int(n)) => Some(*n),
            Instruction::Literal(Value::Marker(_)) => None,
            Instruction::Opcode(op) => op.small_int(),
        }
    }

    /// Marker text, if this is a placeholder literal
    pub fn as_marker(&self) -> Option<&str> {
        match self {
            Instruction::Literal(Value::Marker(text)) => Some(text),
            _ => None,
        }
    }

    /// False only for the canonical zero encodings: literal `0` and `OP_0`
    pub fn is_truthy(&self) -> bool {
        !matches!(
            self,
            Instruction::Literal(Value::Int(0)) | Instruction::Opcode(Opcode::Op0)
        )
    }
}

impl From<Opcode> for Instruction {
    fn from(op: Opcode) -> Self {
        Instruction::Opcode(op)
    }
}

impl From<i64> for Instruction {
    fn from(n: i64) -> Self {
        Instruction::int(n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Marker(text) => f.write_str(text),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Literal(value) => value.fmt(f),
            Instruction::Opcode(op) => op.fmt(f),
        }
    }
}

/// Renders a sequence of instructions as `[a, b, c]`
pub struct Listing<'a>(pub &'a [Instruction]);

impl fmt::Display for Listing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, instruction) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", instruction)?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness_follows_canonical_zero() {
        assert!(!Instruction::int(0).is_truthy());
        assert!(!Instruction::Opcode(Opcode::Op0).is_truthy());
        assert!(Instruction::int(-1).is_truthy());
        assert!(Instruction::marker(SIGNATURE_MARKER).is_truthy());
        assert!(Instruction::Opcode(Opcode::Nop).is_truthy());
    }

    #[test]
    fn small_int_opcodes_read_as_numbers() {
        assert_eq!(Instruction::Opcode(Opcode::Op16).as_int(), Some(16));
        assert_eq!(Instruction::Opcode(Opcode::Op1Negate).as_int(), Some(-1));
        assert_eq!(Instruction::Opcode(Opcode::Dup).as_int(), None);
        assert_eq!(Instruction::marker(PUBKEY_MARKER).as_int(), None);
    }

    #[test]
    fn listing_renders_tokens() {
        let script = vec![
            Instruction::int(1),
            Instruction::marker(PUBKEY_MARKER),
            Instruction::Opcode(Opcode::CheckSig),
        ];
        assert_eq!(Listing(&script).to_string(), "[1, PUBKEY, OP_CHECKSIG]");
        assert_eq!(Listing(&[]).to_string(), "[]");
    }

    #[test]
    fn serializes_untagged() {
        let script = vec![
            Instruction::int(7),
            Instruction::marker(SIGNATURE_MARKER),
            Instruction::Opcode(Opcode::Add),
        ];
        let json = serde_json::to_string(&script).unwrap();
        assert_eq!(json, r#"[7,"SIGNATURE","OP_ADD"]"#);
    }
}
