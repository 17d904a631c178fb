//! Equality and verification handlers

use crate::bytecode::instruction::Instruction;
use crate::bytecode::opcode::Opcode;
use crate::error::ScriptFailure;

use super::stack::Stack;

/// EQUAL / EQUALVERIFY: compare the top two elements structurally
pub fn equal(op: Opcode, stack: &mut Stack) -> Result<String, ScriptFailure> {
    let first = stack.pop_operand(op)?;
    let second = stack.pop_operand(op)?;
    let performed = format!("Performed {}", op.operation());

    if first != second {
        // the 0 stays in the snapshot of a failed EQUALVERIFY
        stack.push(Instruction::int(0));
        let detail = format!(
            "{}; <{}> is not equal to <{}>; Pushed <0> to stack",
            performed, first, second
        );
        if op == Opcode::EqualVerify {
            return Err(ScriptFailure::VerifyFailed { detail });
        }
        return Ok(detail);
    }

    stack.push(Instruction::int(1));
    let mut msg = format!(
        "{}; <{}> is equal to <{}>; Pushed <1> to stack",
        performed, first, second
    );
    if op == Opcode::EqualVerify {
        msg.push_str("; Verify passed");
    }
    Ok(msg)
}

/// VERIFY: pop the top and fail unless it is truthy
pub fn verify(op: Opcode, stack: &mut Stack) -> Result<String, ScriptFailure> {
    let top = stack.pop_operand(op)?;
    let detail = format!("Performed {} on <{}>", op.operation(), top);

    if top.is_truthy() {
        Ok(format!("{}; Verify passed", detail))
    } else {
        Err(ScriptFailure::VerifyFailed { detail })
    }
}
