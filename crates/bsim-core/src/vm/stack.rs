//! Script Stack
//!
//! Ordered sequence of instructions addressed from the top: position 0 is
//! the top, position 1 the element beneath it, and so on.

use crate::bytecode::instruction::Instruction;
use crate::bytecode::opcode::Opcode;
use crate::error::ScriptFailure;

/// Execution stack. The last element of the backing vector is the top.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stack {
    items: Vec<Instruction>,
}

impl Stack {
    pub fn new() -> Self {
        Stack { items: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Push onto the top
    pub fn push(&mut self, item: Instruction) {
        self.items.push(item);
    }

    /// Remove the top
    pub fn pop(&mut self) -> Option<Instruction> {
        self.items.pop()
    }

    /// Element at `depth` positions below the top
    pub fn peek(&self, depth: usize) -> Option<&Instruction> {
        self.index_of(depth).map(|i| &self.items[i])
    }

    pub fn top(&self) -> Option<&Instruction> {
        self.items.last()
    }

    /// Remove and return the element at `depth`
    pub fn remove(&mut self, depth: usize) -> Option<Instruction> {
        self.index_of(depth).map(|i| self.items.remove(i))
    }

    /// Insert so the new element ends up at `depth`.
    ///
    /// `depth == len()` places it at the bottom. Returns false if `depth` is
    /// past the bottom.
    pub fn insert(&mut self, depth: usize, item: Instruction) -> bool {
        if depth > self.items.len() {
            return false;
        }
        let index = self.items.len() - depth;
        self.items.insert(index, item);
        true
    }

    /// Exchange the elements at two depths
    pub fn swap(&mut self, a: usize, b: usize) -> bool {
        match (self.index_of(a), self.index_of(b)) {
            (Some(a), Some(b)) => {
                self.items.swap(a, b);
                true
            }
            _ => false,
        }
    }

    /// Contents from the top down
    pub fn iter(&self) -> impl Iterator<Item = &Instruction> {
        self.items.iter().rev()
    }

    /// Copy of the contents, top first
    pub fn snapshot(&self) -> Vec<Instruction> {
        self.iter().cloned().collect()
    }

    fn index_of(&self, depth: usize) -> Option<usize> {
        self.items.len().checked_sub(depth + 1)
    }

    // Operand access on behalf of an opcode. Underflow is reported against it.

    pub(crate) fn pop_operand(&mut self, op: Opcode) -> Result<Instruction, ScriptFailure> {
        self.pop().ok_or(ScriptFailure::StackUnderflow(op))
    }

    pub(crate) fn pop_number(&mut self, op: Opcode) -> Result<i64, ScriptFailure> {
        let item = self.pop_operand(op)?;
        item.as_int()
            .ok_or(ScriptFailure::NotNumeric { opcode: op, found: item })
    }

    pub(crate) fn operand_at(&self, depth: usize, op: Opcode) -> Result<Instruction, ScriptFailure> {
        self.peek(depth)
            .cloned()
            .ok_or(ScriptFailure::StackUnderflow(op))
    }
}

impl FromIterator<Instruction> for Stack {
    /// Build a stack from items listed top first
    fn from_iter<I: IntoIterator<Item = Instruction>>(iter: I) -> Self {
        let mut items: Vec<Instruction> = iter.into_iter().collect();
        items.reverse();
        Stack { items }
    }
}
