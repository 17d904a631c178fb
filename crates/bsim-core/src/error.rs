//! BSIM Error Types
//!
//! Two classes of error exist and they never mix:
//!
//! - [`SimError`] is returned to the caller before execution starts
//!   (the script could not be turned into instructions).
//! - [`ScriptFailure`] is the reason a single step failed while running.
//!   The interpreter records it as the final, failed step of the trace;
//!   it is never propagated out of a simulation.

use thiserror::Error;

use crate::bytecode::opcode::Opcode;
use crate::bytecode::instruction::Instruction;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// Token is neither an opcode, a reserved marker nor an integer
    #[error("unknown token `{token}` at position {position}: not an opcode, reserved literal or integer")]
    UnknownToken { token: String, position: usize },

    #[error("script has {len} instructions, limit is {max}")]
    ScriptTooLong { len: usize, max: usize },
}

pub type SimResult<T> = Result<T, SimError>;

/// Reason an opcode step failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptFailure {
    #[error("{0} is disabled")]
    Disabled(Opcode),

    #[error("{opcode} requires {required} arguments but was given {available}")]
    InsufficientArguments {
        opcode: Opcode,
        required: usize,
        available: usize,
    },

    #[error("{opcode} expected a numeric operand but found <{found}>")]
    NotNumeric { opcode: Opcode, found: Instruction },

    #[error("{opcode} overflowed the numeric range")]
    NumericOverflow { opcode: Opcode },

    #[error("Performed {operation}; <{index}> out of bounds [0, {size})")]
    IndexOutOfBounds {
        operation: &'static str,
        index: i64,
        size: usize,
    },

    #[error("{detail}; Verify failed")]
    VerifyFailed { detail: String },

    #[error("Performed {operation}; {reason}; Checkmultisig failed")]
    Multisig {
        operation: &'static str,
        reason: String,
    },

    #[error("{0} ran past the bottom of the stack")]
    StackUnderflow(Opcode),
}
