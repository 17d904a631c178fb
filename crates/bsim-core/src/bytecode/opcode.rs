//! Opcode Catalog
//!
//! Static table of every recognized script operation. Each entry records the
//! canonical mnemonic, its category, the minimum stack depth required before
//! it may run, and whether it is permanently disabled.
//!
//! The table is compile-time data: it is never mutated and is shared by
//! reference across every simulation. Disabled opcodes stay in the table so
//! they can be recognized and rejected with a specific message.

use std::collections::HashMap;
use std::fmt;

use lazy_static::lazy_static;
use serde::{Serialize, Serializer};

/// Script opcodes, in catalog order.
///
/// The discriminant of each variant is its index into [`CATALOG`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Opcode {
    // Constants
    Op0,
    PushData1,
    PushData2,
    PushData4,
    Op1Negate,
    Reserved,
    Op1,
    Op2,
    Op3,
    Op4,
    Op5,
    Op6,
    Op7,
    Op8,
    Op9,
    Op10,
    Op11,
    Op12,
    Op13,
    Op14,
    Op15,
    Op16,

    // Flow control
    Nop,
    Ver,
    If,
    NotIf,
    VerIf,
    VerNotIf,
    Else,
    EndIf,
    Verify,
    Return,

    // Stack
    ToAltStack,
    FromAltStack,
    Op2Drop,
    Op2Dup,
    Op3Dup,
    Op2Over,
    Op2Rot,
    Op2Swap,
    IfDup,
    Depth,
    Drop,
    Dup,
    Nip,
    Over,
    Pick,
    Roll,
    Rot,
    Swap,
    Tuck,

    // Splice
    Cat,
    SubStr,
    Left,
    Right,
    Size,

    // Bitwise logic
    Invert,
    And,
    Or,
    Xor,
    Equal,
    EqualVerify,

    // Arithmetic
    Reserved1,
    Reserved2,
    Op1Add,
    Op1Sub,
    Op2Mul,
    Op2Div,
    Negate,
    Abs,
    Not,
    Op0NotEqual,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    LShift,
    RShift,
    BoolAnd,
    BoolOr,
    NumEqual,
    NumEqualVerify,
    NumNotEqual,
    LessThan,
    GreaterThan,
    LessThanOrEqual,
    GreaterThanOrEqual,
    Min,
    Max,
    Within,

    // Crypto
    Ripemd160,
    Sha1,
    Sha256,
    Hash160,
    Hash256,
    CodeSeparator,
    CheckSig,
    CheckSigVerify,
    CheckMultiSig,
    CheckMultiSigVerify,

    // Locktime
    CheckLockTimeVerify,
    CheckSequenceVerify,
}

/// Opcode category, as grouped in the Bitcoin Script reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Constants,
    FlowControl,
    Stack,
    Splice,
    BitwiseLogic,
    Arithmetic,
    Crypto,
    Locktime,
}

/// One row of the opcode catalog.
#[derive(Debug, PartialEq, Eq)]
pub struct OpcodeEntry {
    pub opcode: Opcode,
    pub name: &'static str,
    pub category: Category,
    /// Minimum stack depth required before the opcode may run
    pub arg_count: usize,
    /// Permanently forbidden; always fails when executed
    pub disabled: bool,
}

const fn op(opcode: Opcode, name: &'static str, category: Category, arg_count: usize) -> OpcodeEntry {
    OpcodeEntry { opcode, name, category, arg_count, disabled: false }
}

const fn off(opcode: Opcode, name: &'static str, category: Category, arg_count: usize) -> OpcodeEntry {
    OpcodeEntry { opcode, name, category, arg_count, disabled: true }
}

use Category::*;

/// The opcode catalog. Indexed by `Opcode as usize`.
pub static CATALOG: [OpcodeEntry; 103] = [
    op(Opcode::Op0, "OP_0", Constants, 0),
    op(Opcode::PushData1, "OP_PUSHDATA1", Constants, 0),
    op(Opcode::PushData2, "OP_PUSHDATA2", Constants, 0),
    op(Opcode::PushData4, "OP_PUSHDATA4", Constants, 0),
    op(Opcode::Op1Negate, "OP_1NEGATE", Constants, 0),
    op(Opcode::Reserved, "OP_RESERVED", Constants, 0),
    op(Opcode::Op1, "OP_1", Constants, 0),
    op(Opcode::Op2, "OP_2", Constants, 0),
    op(Opcode::Op3, "OP_3", Constants, 0),
    op(Opcode::Op4, "OP_4", Constants, 0),
    op(Opcode::Op5, "OP_5", Constants, 0),
    op(Opcode::Op6, "OP_6", Constants, 0),
    op(Opcode::Op7, "OP_7", Constants, 0),
    op(Opcode::Op8, "OP_8", Constants, 0),
    op(Opcode::Op9, "OP_9", Constants, 0),
    op(Opcode::Op10, "OP_10", Constants, 0),
    op(Opcode::Op11, "OP_11", Constants, 0),
    op(Opcode::Op12, "OP_12", Constants, 0),
    op(Opcode::Op13, "OP_13", Constants, 0),
    op(Opcode::Op14, "OP_14", Constants, 0),
    op(Opcode::Op15, "OP_15", Constants, 0),
    op(Opcode::Op16, "OP_16", Constants, 0),

    op(Opcode::Nop, "OP_NOP", FlowControl, 0),
    op(Opcode::Ver, "OP_VER", FlowControl, 0),
    op(Opcode::If, "OP_IF", FlowControl, 1),
    op(Opcode::NotIf, "OP_NOTIF", FlowControl, 1),
    op(Opcode::VerIf, "OP_VERIF", FlowControl, 0),
    op(Opcode::VerNotIf, "OP_VERNOTIF", FlowControl, 0),
    op(Opcode::Else, "OP_ELSE", FlowControl, 0),
    op(Opcode::EndIf, "OP_ENDIF", FlowControl, 0),
    op(Opcode::Verify, "OP_VERIFY", FlowControl, 1),
    op(Opcode::Return, "OP_RETURN", FlowControl, 0),

    op(Opcode::ToAltStack, "OP_TOALTSTACK", Stack, 1),
    op(Opcode::FromAltStack, "OP_FROMALTSTACK", Stack, 0),
    op(Opcode::Op2Drop, "OP_2DROP", Stack, 2),
    op(Opcode::Op2Dup, "OP_2DUP", Stack, 2),
    op(Opcode::Op3Dup, "OP_3DUP", Stack, 3),
    op(Opcode::Op2Over, "OP_2OVER", Stack, 4),
    op(Opcode::Op2Rot, "OP_2ROT", Stack, 6),
    op(Opcode::Op2Swap, "OP_2SWAP", Stack, 4),
    op(Opcode::IfDup, "OP_IFDUP", Stack, 1),
    op(Opcode::Depth, "OP_DEPTH", Stack, 0),
    op(Opcode::Drop, "OP_DROP", Stack, 1),
    op(Opcode::Dup, "OP_DUP", Stack, 1),
    op(Opcode::Nip, "OP_NIP", Stack, 2),
    op(Opcode::Over, "OP_OVER", Stack, 2),
    op(Opcode::Pick, "OP_PICK", Stack, 1),
    op(Opcode::Roll, "OP_ROLL", Stack, 1),
    op(Opcode::Rot, "OP_ROT", Stack, 3),
    op(Opcode::Swap, "OP_SWAP", Stack, 2),
    op(Opcode::Tuck, "OP_TUCK", Stack, 2),

    off(Opcode::Cat, "OP_CAT", Splice, 2),
    off(Opcode::SubStr, "OP_SUBSTR", Splice, 3),
    off(Opcode::Left, "OP_LEFT", Splice, 2),
    off(Opcode::Right, "OP_RIGHT", Splice, 2),
    op(Opcode::Size, "OP_SIZE", Splice, 1),

    off(Opcode::Invert, "OP_INVERT", BitwiseLogic, 1),
    off(Opcode::And, "OP_AND", BitwiseLogic, 2),
    off(Opcode::Or, "OP_OR", BitwiseLogic, 2),
    off(Opcode::Xor, "OP_XOR", BitwiseLogic, 2),
    op(Opcode::Equal, "OP_EQUAL", BitwiseLogic, 2),
    op(Opcode::EqualVerify, "OP_EQUALVERIFY", BitwiseLogic, 2),

    op(Opcode::Reserved1, "OP_RESERVED1", Arithmetic, 0),
    op(Opcode::Reserved2, "OP_RESERVED2", Arithmetic, 0),
    op(Opcode::Op1Add, "OP_1ADD", Arithmetic, 1),
    op(Opcode::Op1Sub, "OP_1SUB", Arithmetic, 1),
    off(Opcode::Op2Mul, "OP_2MUL", Arithmetic, 1),
    off(Opcode::Op2Div, "OP_2DIV", Arithmetic, 1),
    op(Opcode::Negate, "OP_NEGATE", Arithmetic, 1),
    op(Opcode::Abs, "OP_ABS", Arithmetic, 1),
    op(Opcode::Not, "OP_NOT", Arithmetic, 1),
    op(Opcode::Op0NotEqual, "OP_0NOTEQUAL", Arithmetic, 1),
    op(Opcode::Add, "OP_ADD", Arithmetic, 2),
    op(Opcode::Sub, "OP_SUB", Arithmetic, 2),
    off(Opcode::Mul, "OP_MUL", Arithmetic, 2),
    off(Opcode::Div, "OP_DIV", Arithmetic, 2),
    off(Opcode::Mod, "OP_MOD", Arithmetic, 2),
    off(Opcode::LShift, "OP_LSHIFT", Arithmetic, 2),
    off(Opcode::RShift, "OP_RSHIFT", Arithmetic, 2),
    op(Opcode::BoolAnd, "OP_BOOLAND", Arithmetic, 2),
    op(Opcode::BoolOr, "OP_BOOLOR", Arithmetic, 2),
    op(Opcode::NumEqual, "OP_NUMEQUAL", Arithmetic, 2),
    op(Opcode::NumEqualVerify, "OP_NUMEQUALVERIFY", Arithmetic, 2),
    op(Opcode::NumNotEqual, "OP_NUMNOTEQUAL", Arithmetic, 2),
    op(Opcode::LessThan, "OP_LESSTHAN", Arithmetic, 2),
    op(Opcode::GreaterThan, "OP_GREATERTHAN", Arithmetic, 2),
    op(Opcode::LessThanOrEqual, "OP_LESSTHANOREQUAL", Arithmetic, 2),
    op(Opcode::GreaterThanOrEqual, "OP_GREATERTHANOREQUAL", Arithmetic, 2),
    op(Opcode::Min, "OP_MIN", Arithmetic, 2),
    op(Opcode::Max, "OP_MAX", Arithmetic, 2),
    op(Opcode::Within, "OP_WITHIN", Arithmetic, 3),

    op(Opcode::Ripemd160, "OP_RIPEMD160", Crypto, 1),
    op(Opcode::Sha1, "OP_SHA1", Crypto, 1),
    op(Opcode::Sha256, "OP_SHA256", Crypto, 1),
    op(Opcode::Hash160, "OP_HASH160", Crypto, 1),
    op(Opcode::Hash256, "OP_HASH256", Crypto, 1),
    op(Opcode::CodeSeparator, "OP_CODESEPARATOR", Crypto, 0),
    op(Opcode::CheckSig, "OP_CHECKSIG", Crypto, 2),
    op(Opcode::CheckSigVerify, "OP_CHECKSIGVERIFY", Crypto, 2),
    op(Opcode::CheckMultiSig, "OP_CHECKMULTISIG", Crypto, 1),
    op(Opcode::CheckMultiSigVerify, "OP_CHECKMULTISIGVERIFY", Crypto, 1),

    op(Opcode::CheckLockTimeVerify, "OP_CHECKLOCKTIMEVERIFY", Locktime, 1),
    op(Opcode::CheckSequenceVerify, "OP_CHECKSEQUENCEVERIFY", Locktime, 1),
];

/// Opcodes that pop one number and push one number
pub const UNARY_ARITHMETIC: &[Opcode] = &[
    Opcode::Op1Add,
    Opcode::Op1Sub,
    Opcode::Negate,
    Opcode::Abs,
    Opcode::Not,
    Opcode::Op0NotEqual,
];

/// Opcodes that pop two numbers and push one number
pub const BINARY_ARITHMETIC: &[Opcode] = &[
    Opcode::Add,
    Opcode::Sub,
    Opcode::BoolAnd,
    Opcode::BoolOr,
    Opcode::NumEqual,
    Opcode::NumEqualVerify,
    Opcode::NumNotEqual,
    Opcode::LessThan,
    Opcode::GreaterThan,
    Opcode::LessThanOrEqual,
    Opcode::GreaterThanOrEqual,
    Opcode::Min,
    Opcode::Max,
];

/// Opcodes that rearrange the stack
pub const STACK_MANIPULATION: &[Opcode] = &[
    Opcode::Depth,
    Opcode::Dup,
    Opcode::Drop,
    Opcode::Op2Drop,
    Opcode::Op2Dup,
    Opcode::Op2Over,
    Opcode::Op2Rot,
    Opcode::Op2Swap,
    Opcode::Op3Dup,
    Opcode::IfDup,
    Opcode::Nip,
    Opcode::Over,
    Opcode::Pick,
    Opcode::Roll,
    Opcode::Rot,
    Opcode::Swap,
    Opcode::Tuck,
];

pub const EQUALITY: &[Opcode] = &[Opcode::Equal, Opcode::EqualVerify];

pub const SIGNATURE: &[Opcode] = &[
    Opcode::CheckSig,
    Opcode::CheckSigVerify,
    Opcode::CheckMultiSig,
    Opcode::CheckMultiSigVerify,
];

/// Handler family an opcode dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    UnaryArithmetic,
    BinaryArithmetic,
    StackManipulation,
    Equality,
    Verify,
    Within,
    Signature,
}

lazy_static! {
    static ref BY_NAME: HashMap<&'static str, Opcode> =
        CATALOG.iter().map(|entry| (entry.name, entry.opcode)).collect();
}

/// Look up a catalog entry by its canonical name (exact, case-sensitive).
pub fn lookup(name: &str) -> Option<&'static OpcodeEntry> {
    Opcode::from_name(name).map(Opcode::entry)
}

impl Opcode {
    /// Resolve a mnemonic such as `OP_DUP`
    pub fn from_name(name: &str) -> Option<Self> {
        BY_NAME.get(name).copied()
    }

    /// The catalog row for this opcode
    pub fn entry(self) -> &'static OpcodeEntry {
        &CATALOG[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.entry().name
    }

    /// Mnemonic without the `OP_` prefix, as used in trace messages
    pub fn operation(self) -> &'static str {
        let name = self.name();
        name.strip_prefix("OP_").unwrap_or(name)
    }

    pub fn category(self) -> Category {
        self.entry().category
    }

    pub fn arg_count(self) -> usize {
        self.entry().arg_count
    }

    pub fn is_disabled(self) -> bool {
        self.entry().disabled
    }

    /// Numeric value of the small-integer constant opcodes
    pub fn small_int(self) -> Option<i64> {
        match self {
            Opcode::Op0 => Some(0),
            Opcode::Op1Negate => Some(-1),
            Opcode::Op1 => Some(1),
            Opcode::Op2 => Some(2),
            Opcode::Op3 => Some(3),
            Opcode::Op4 => Some(4),
            Opcode::Op5 => Some(5),
            Opcode::Op6 => Some(6),
            Opcode::Op7 => Some(7),
            Opcode::Op8 => Some(8),
            Opcode::Op9 => Some(9),
            Opcode::Op10 => Some(10),
            Opcode::Op11 => Some(11),
            Opcode::Op12 => Some(12),
            Opcode::Op13 => Some(13),
            Opcode::Op14 => Some(14),
            Opcode::Op15 => Some(15),
            Opcode::Op16 => Some(16),
            _ => None,
        }
    }

    /// Handler family, or `None` for opcodes without implemented semantics
    pub fn family(self) -> Option<Family> {
        if UNARY_ARITHMETIC.contains(&self) {
            Some(Family::UnaryArithmetic)
        } else if BINARY_ARITHMETIC.contains(&self) {
            Some(Family::BinaryArithmetic)
        } else if STACK_MANIPULATION.contains(&self) {
            Some(Family::StackManipulation)
        } else if EQUALITY.contains(&self) {
            Some(Family::Equality)
        } else if SIGNATURE.contains(&self) {
            Some(Family::Signature)
        } else {
            match self {
                Opcode::Verify => Some(Family::Verify),
                Opcode::Within => Some(Family::Within),
                _ => None,
            }
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Opcode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}
