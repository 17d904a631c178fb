pub mod arith;
pub mod equality;
pub mod signature;
pub mod stack;
pub mod stack_ops;
pub mod step;
pub mod vm;

pub use stack::Stack;
pub use step::{Simulation, SimulationStep, StepKind};
pub use vm::{ExecState, Execution, Interpreter};
