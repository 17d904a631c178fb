//! Bitcoin Script Simulator - Core Library
//!
//! Public API surface for the simulator core: the opcode catalog, the
//! tokenizer and the stepwise interpreter.

pub mod error;
pub mod config;
pub mod bytecode;
pub mod vm;
pub mod loader;
pub mod capability;

// Re-export commonly used types
pub use error::{ScriptFailure, SimError, SimResult};
pub use config::SimConfig;
pub use bytecode::{Instruction, Opcode, Value};
pub use capability::{PlaceholderVerifier, SignatureVerifier};
pub use loader::tokenize;
pub use vm::{ExecState, Execution, Interpreter, Simulation, SimulationStep, StepKind};

/// Execute an already tokenized script with the default configuration
pub fn simulate(script: Vec<Instruction>) -> Simulation {
	Interpreter::new().simulate(script)
}

/// Tokenize and execute a raw script with the default configuration
pub fn run(raw: &str) -> SimResult<Simulation> {
	Interpreter::new().run(raw)
}
