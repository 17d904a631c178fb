//! Stepwise Interpreter
//!
//! [`Execution`] is the state machine for a single run: it owns the
//! remaining script and the stack, consumes exactly one instruction per
//! step and records a [`SimulationStep`] for each. It stops at the first
//! failed step.
//!
//! [`Interpreter`] holds what is shared between runs (configuration and the
//! signature verifier) and drives executions to completion.

use std::collections::VecDeque;

use tracing::{debug, info, warn};

use crate::bytecode::instruction::Instruction;
use crate::bytecode::opcode::{Family, Opcode};
use crate::capability::placeholder::PlaceholderVerifier;
use crate::capability::verifier::SignatureVerifier;
use crate::config::SimConfig;
use crate::error::{ScriptFailure, SimError, SimResult};
use crate::loader::tokenizer::Tokenizer;

use super::stack::Stack;
use super::step::{Simulation, SimulationStep, StepKind};
use super::{arith, equality, signature, stack_ops};

/// Execution state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecState {
    /// Instructions remain and nothing has failed
    Running,
    /// Script exhausted without failure
    Succeeded,
    /// A step failed; remaining instructions will not run
    Failed,
}

/// Result of executing one opcode
enum Dispatch {
    Executed(String),
    /// No semantics implemented; the opcode was pushed unchanged
    Passthrough(String),
}

/// A single run over one script
pub struct Execution<'v, V: SignatureVerifier + ?Sized> {
    script: VecDeque<Instruction>,
    stack: Stack,
    steps: Vec<SimulationStep>,
    verifier: &'v V,
}

impl<'v, V: SignatureVerifier + ?Sized> Execution<'v, V> {
    /// Start a run and record the initial setup step
    pub fn new(script: Vec<Instruction>, verifier: &'v V) -> Self {
        let script: VecDeque<Instruction> = script.into();
        let setup = SimulationStep::new(
            StepKind::Setup,
            script.iter().cloned().collect(),
            Vec::new(),
            "Initial setup".to_string(),
        );

        Execution {
            script,
            stack: Stack::new(),
            steps: vec![setup],
            verifier,
        }
    }

    pub fn state(&self) -> ExecState {
        if self.steps.last().map_or(false, |s| s.failed) {
            ExecState::Failed
        } else if self.script.is_empty() {
            ExecState::Succeeded
        } else {
            ExecState::Running
        }
    }

    /// Steps recorded so far
    pub fn steps(&self) -> &[SimulationStep] {
        &self.steps
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    /// Instructions not yet executed, next first
    pub fn remaining(&self) -> impl Iterator<Item = &Instruction> {
        self.script.iter()
    }

    /// Execute the next instruction.
    ///
    /// Returns the recorded step, or `None` once the run has finished.
    pub fn step(&mut self) -> Option<&SimulationStep> {
        if self.state() != ExecState::Running {
            return None;
        }

        let instruction = self.script.pop_front()?;
        let index = self.steps.len();

        let (kind, message) = match &instruction {
            Instruction::Literal(value) => {
                self.stack.push(instruction.clone());
                (StepKind::Push, format!("Pushed <{}> to stack", value))
            }
            Instruction::Opcode(op) => match self.process_opcode(*op) {
                Ok(Dispatch::Executed(msg)) => (StepKind::Executed, msg),
                Ok(Dispatch::Passthrough(msg)) => (StepKind::Unimplemented, msg),
                Err(failure) => (StepKind::Failed, failure.to_string()),
            },
        };

        debug!(step = index, %instruction, ?kind, depth = self.stack.len(), "{}", message);

        let step = SimulationStep::new(
            kind,
            self.script.iter().cloned().collect(),
            self.stack.snapshot(),
            message,
        );
        self.steps.push(step);
        self.steps.last()
    }

    /// Run to completion and compute the verdict
    pub fn finish(mut self) -> Simulation {
        while self.step().is_some() {}

        let valid = match self.state() {
            ExecState::Failed => false,
            _ => Self::validate(&self.stack),
        };
        info!(steps = self.steps.len(), valid, "simulation finished");

        Simulation {
            steps: self.steps,
            valid,
        }
    }

    /// Valid iff the stack is non-empty and its top is not the canonical zero.
    /// Elements beneath the top are not inspected.
    fn validate(stack: &Stack) -> bool {
        stack.top().map_or(false, Instruction::is_truthy)
    }

    fn process_opcode(&mut self, op: Opcode) -> Result<Dispatch, ScriptFailure> {
        if op.is_disabled() {
            return Err(ScriptFailure::Disabled(op));
        }

        let required = op.arg_count();
        if required > self.stack.len() {
            return Err(ScriptFailure::InsufficientArguments {
                opcode: op,
                required,
                available: self.stack.len(),
            });
        }

        let stack = &mut self.stack;
        let msg = match op.family() {
            Some(Family::UnaryArithmetic) => arith::unary(op, stack)?,
            Some(Family::BinaryArithmetic) => arith::binary(op, stack)?,
            Some(Family::Within) => arith::within(op, stack)?,
            Some(Family::StackManipulation) => stack_ops::execute(op, stack)?,
            Some(Family::Equality) => equality::equal(op, stack)?,
            Some(Family::Verify) => equality::verify(op, stack)?,
            Some(Family::Signature) => signature::execute(op, stack, self.verifier)?,
            None => {
                stack.push(Instruction::Opcode(op));
                return Ok(Dispatch::Passthrough(format!(
                    "Logic for {} not implemented yet; {} pushed to stack",
                    op, op
                )));
            }
        };

        Ok(Dispatch::Executed(msg))
    }
}

/// Script interpreter
pub struct Interpreter<V = PlaceholderVerifier> {
    config: SimConfig,
    verifier: V,
}

impl Interpreter<PlaceholderVerifier> {
    /// Interpreter with default limits and the placeholder verifier
    pub fn new() -> Self {
        Self::with_verifier(SimConfig::default(), PlaceholderVerifier)
    }
}

impl Default for Interpreter<PlaceholderVerifier> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: SignatureVerifier> Interpreter<V> {
    pub fn with_verifier(config: SimConfig, verifier: V) -> Self {
        Interpreter { config, verifier }
    }

    /// Begin a step-by-step run
    pub fn start(&self, script: Vec<Instruction>) -> Execution<'_, V> {
        Execution::new(script, &self.verifier)
    }

    /// Execute a script to completion
    pub fn simulate(&self, script: Vec<Instruction>) -> Simulation {
        self.start(script).finish()
    }

    /// Tokenize and execute a raw script
    pub fn run(&self, raw: &str) -> SimResult<Simulation> {
        let script = Tokenizer::parse(raw)?;

        if script.len() > self.config.max_script_len {
            warn!(
                len = script.len(),
                max = self.config.max_script_len,
                "script rejected: too long"
            );
            return Err(SimError::ScriptTooLong {
                len: script.len(),
                max: self.config.max_script_len,
            });
        }

        Ok(self.simulate(script))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ops(raw: &str) -> Vec<Instruction> {
        Tokenizer::parse(raw).unwrap()
    }

    #[test]
    fn setup_step_holds_full_script() {
        let interpreter = Interpreter::new();
        let exec = interpreter.start(ops("1 2 OP_ADD"));
        assert_eq!(exec.state(), ExecState::Running);
        assert_eq!(exec.steps().len(), 1);
        assert_eq!(exec.steps()[0].kind, StepKind::Setup);
        assert_eq!(exec.steps()[0].script.len(), 3);
        assert!(exec.steps()[0].stack.is_empty());
    }

    #[test]
    fn stepping_consumes_one_instruction_at_a_time() {
        let interpreter = Interpreter::new();
        let mut exec = interpreter.start(ops("1 2 OP_ADD"));

        let step = exec.step().unwrap();
        assert_eq!(step.kind, StepKind::Push);
        assert_eq!(step.script.len(), 2);

        exec.step().unwrap();
        let step = exec.step().unwrap();
        assert_eq!(step.message, "Performed ADD on <2> and <1>; Pushed <3> to stack");
        assert_eq!(step.stack, vec![Instruction::int(3)]);

        assert_eq!(exec.state(), ExecState::Succeeded);
        assert!(exec.step().is_none());
    }

    #[test]
    fn failure_halts_execution() {
        let interpreter = Interpreter::new();
        let mut exec = interpreter.start(ops("OP_DROP 1 2"));
        let step = exec.step().unwrap();
        assert!(step.failed);
        assert_eq!(step.message, "OP_DROP requires 1 arguments but was given 0");
        assert_eq!(exec.state(), ExecState::Failed);
        assert!(exec.step().is_none());
        assert_eq!(exec.remaining().count(), 2);
    }

    #[test]
    fn disabled_check_precedes_arity() {
        let sim = Interpreter::new().simulate(ops("OP_MUL"));
        let last = sim.failure().unwrap();
        assert_eq!(last.message, "OP_MUL is disabled");
    }

    #[test]
    fn unimplemented_opcode_passes_through() {
        let sim = Interpreter::new().simulate(ops("OP_NOP"));
        let last = sim.steps.last().unwrap();
        assert_eq!(last.kind, StepKind::Unimplemented);
        assert!(!last.failed);
        assert_eq!(last.stack, vec![Instruction::Opcode(Opcode::Nop)]);
        assert_eq!(last.message, "Logic for OP_NOP not implemented yet; OP_NOP pushed to stack");
        assert!(sim.valid);
    }

    #[test]
    fn op_0_on_top_is_invalid() {
        assert!(!Interpreter::new().simulate(ops("OP_0")).valid);
        assert!(Interpreter::new().simulate(ops("OP_1")).valid);
    }

    #[test]
    fn leftover_elements_beneath_top_are_tolerated() {
        assert!(Interpreter::new().simulate(ops("0 0 7")).valid);
        assert!(!Interpreter::new().simulate(ops("7 7 0")).valid);
    }

    #[test]
    fn empty_script_is_invalid() {
        let sim = Interpreter::new().simulate(Vec::new());
        assert_eq!(sim.steps.len(), 1);
        assert!(!sim.valid);
    }

    #[test]
    fn run_enforces_length_limit() {
        let interpreter = Interpreter::with_verifier(
            SimConfig::new().with_max_script_len(2),
            PlaceholderVerifier,
        );
        assert_eq!(
            interpreter.run("1 1 OP_ADD").unwrap_err(),
            SimError::ScriptTooLong { len: 3, max: 2 }
        );
        assert!(interpreter.run("1 1").is_ok());
    }

    struct RejectAll;

    impl SignatureVerifier for RejectAll {
        fn classify(&self, _: &Instruction) -> crate::capability::verifier::KeyClass {
            crate::capability::verifier::KeyClass::Neither
        }

        fn verify(&self, _: &Instruction, _: &Instruction) -> bool {
            false
        }
    }

    #[test]
    fn verifier_is_swappable() {
        let strict = Interpreter::with_verifier(SimConfig::default(), RejectAll);
        let sim = strict.run("SIGNATURE PUBKEY OP_CHECKSIG").unwrap();
        assert_eq!(sim.final_stack(), &[Instruction::int(0)]);
        assert!(!sim.valid);
    }
}
