//! Simulation trace records

use std::fmt;

use serde::Serialize;

use crate::bytecode::instruction::{Instruction, Listing};

/// What a step did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Synthetic first step, before any instruction runs
    Setup,
    /// A literal was pushed
    Push,
    /// An opcode ran its handler
    Executed,
    /// The opcode has no implemented semantics and was pushed unchanged
    Unimplemented,
    /// The step failed; execution stopped here
    Failed,
}

/// Snapshot taken after one instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationStep {
    /// Instructions still to execute, next first
    pub script: Vec<Instruction>,
    /// Stack contents, top first
    pub stack: Vec<Instruction>,
    pub message: String,
    pub failed: bool,
    pub kind: StepKind,
}

impl SimulationStep {
    pub(crate) fn new(
        kind: StepKind,
        script: Vec<Instruction>,
        stack: Vec<Instruction>,
        message: String,
    ) -> Self {
        SimulationStep {
            script,
            stack,
            message,
            failed: kind == StepKind::Failed,
            kind,
        }
    }
}

/// Complete trace of one run plus its verdict
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Simulation {
    pub steps: Vec<SimulationStep>,
    pub valid: bool,
}

impl Simulation {
    /// The step that failed, if any. It is always the last one.
    pub fn failure(&self) -> Option<&SimulationStep> {
        self.steps.last().filter(|step| step.failed)
    }

    /// Stack left by the last step
    pub fn final_stack(&self) -> &[Instruction] {
        self.steps.last().map(|s| s.stack.as_slice()).unwrap_or(&[])
    }
}

impl fmt::Display for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            writeln!(f, "Step {}:", i)?;
            writeln!(f, "Message: {}", step.message)?;
            writeln!(f, "Script: {}", Listing(&step.script))?;
            writeln!(f, "Stack: {}", Listing(&step.stack))?;
            writeln!(f, "Passed: {}", !step.failed)?;
            writeln!(f)?;
        }
        let verdict = if self.valid { "Valid" } else { "Invalid" };
        write!(f, "{} script", verdict)
    }
}
