pub mod instruction;
pub mod opcode;

pub use instruction::{Instruction, Value};
pub use opcode::{Category, Opcode, OpcodeEntry, CATALOG};
