//! Script Tokenizer
//!
//! Turns a whitespace-delimited script into a typed instruction sequence.
//! The whole input is parsed before anything executes.

use tracing::trace;

use crate::bytecode::instruction::{Instruction, PUBKEY_MARKER, SIGNATURE_MARKER};
use crate::bytecode::opcode::Opcode;
use crate::error::{SimError, SimResult};

/// Script tokenizer
pub struct Tokenizer;

impl Tokenizer {
    /// Parse a raw script string
    pub fn parse(raw: &str) -> SimResult<Vec<Instruction>> {
        let script = raw
            .split_whitespace()
            .enumerate()
            .map(|(position, token)| Self::parse_token(token, position))
            .collect::<SimResult<Vec<_>>>()?;

        trace!(instructions = script.len(), "tokenized script");
        Ok(script)
    }

    /// Classify a single token: opcode, reserved marker, then integer
    fn parse_token(token: &str, position: usize) -> SimResult<Instruction> {
        if let Some(op) = Opcode::from_name(token) {
            return Ok(Instruction::Opcode(op));
        }

        if token == SIGNATURE_MARKER || token == PUBKEY_MARKER {
            return Ok(Instruction::marker(token));
        }

        token
            .parse::<i64>()
            .map(Instruction::int)
            .map_err(|_| SimError::UnknownToken {
                token: token.to_string(),
                position,
            })
    }
}

/// Parse a raw script string into instructions
pub fn tokenize(raw: &str) -> SimResult<Vec<Instruction>> {
    Tokenizer::parse(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_add() {
        let script = tokenize("1 1 OP_ADD").unwrap();
        assert_eq!(
            script,
            vec![Instruction::int(1), Instruction::int(1), Instruction::Opcode(Opcode::Add)]
        );
    }

    #[test]
    fn parses_p2pkh_shape() {
        let script = tokenize("SIGNATURE PUBKEY OP_DUP OP_HASH160 PUBKEY OP_EQUALVERIFY OP_CHECKSIG").unwrap();
        assert_eq!(
            script,
            vec![
                Instruction::marker("SIGNATURE"),
                Instruction::marker("PUBKEY"),
                Instruction::Opcode(Opcode::Dup),
                Instruction::Opcode(Opcode::Hash160),
                Instruction::marker("PUBKEY"),
                Instruction::Opcode(Opcode::EqualVerify),
                Instruction::Opcode(Opcode::CheckSig),
            ]
        );
    }

    #[test]
    fn accepts_any_whitespace() {
        let script = tokenize("  -5\t\n 0  OP_NOP\r\n").unwrap();
        assert_eq!(
            script,
            vec![Instruction::int(-5), Instruction::int(0), Instruction::Opcode(Opcode::Nop)]
        );
    }

    #[test]
    fn empty_input_is_empty_script() {
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize("   ").unwrap().is_empty());
    }

    #[test]
    fn rejects_unknown_token_with_position() {
        let err = tokenize("1 OP_ADD op_add").unwrap_err();
        assert_eq!(
            err,
            SimError::UnknownToken { token: "op_add".to_string(), position: 2 }
        );
    }

    #[test]
    fn rejects_unreserved_markers() {
        assert!(tokenize("SIG1").is_err());
        assert!(tokenize("signature").is_err());
    }

    #[test]
    fn rejects_out_of_range_integers() {
        assert!(tokenize("99999999999999999999").is_err());
        assert!(tokenize("1.5").is_err());
    }
}
