//! Signature handlers
//!
//! CHECKSIG and CHECKMULTISIG defer all key handling to the host's
//! [`SignatureVerifier`]. Multisig pairing is any-to-any: every
//! (signature, pubkey) pair is tried, and a verifying pair of values is
//! counted at most once however often it appears on the stack.

use std::collections::HashSet;

use tracing::trace;

use crate::bytecode::instruction::Instruction;
use crate::bytecode::opcode::Opcode;
use crate::capability::verifier::SignatureVerifier;
use crate::error::ScriptFailure;

use super::stack::Stack;

pub fn execute<V>(op: Opcode, stack: &mut Stack, verifier: &V) -> Result<String, ScriptFailure>
where
    V: SignatureVerifier + ?Sized,
{
    match op {
        Opcode::CheckSig | Opcode::CheckSigVerify => check_sig(op, stack, verifier),
        Opcode::CheckMultiSig | Opcode::CheckMultiSigVerify => check_multisig(op, stack, verifier),
        _ => unreachable!("{} is not a signature opcode", op),
    }
}

fn check_sig<V>(op: Opcode, stack: &mut Stack, verifier: &V) -> Result<String, ScriptFailure>
where
    V: SignatureVerifier + ?Sized,
{
    let pubkey = stack.pop_operand(op)?;
    let signature = stack.pop_operand(op)?;
    let passed = verifier.verify(&signature, &pubkey);
    trace!(%op, %pubkey, %signature, passed, "checksig");

    let detail = format!(
        "Performed {}; Checksig on pubkey <{}> {} with signature <{}>",
        op.operation(),
        pubkey,
        if passed { "passed" } else { "failed" },
        signature
    );

    finish(op, stack, passed, detail, Opcode::CheckSigVerify)
}

fn check_multisig<V>(op: Opcode, stack: &mut Stack, verifier: &V) -> Result<String, ScriptFailure>
where
    V: SignatureVerifier + ?Sized,
{
    let operation = op.operation();
    let fail = |reason: String| ScriptFailure::Multisig { operation, reason };

    let key_count = stack.pop_number(op)?;
    let key_count = match usize::try_from(key_count) {
        Ok(k) if k <= stack.len() => k,
        _ => {
            return Err(fail(format!(
                "Too many pubkeys required, needed <{}>, stack size <{}>",
                key_count,
                stack.len()
            )))
        }
    };

    let mut pubkeys: Vec<Instruction> = Vec::with_capacity(key_count);
    for _ in 0..key_count {
        let pubkey = stack.pop_operand(op)?;
        if !verifier.is_pubkey(&pubkey) {
            return Err(fail(format!(
                "Not enough pubkeys, needed <{}>, received <{}>",
                key_count,
                pubkeys.len()
            )));
        }
        pubkeys.push(pubkey);
    }

    if stack.is_empty() {
        return Err(fail("No signature count on stack".to_string()));
    }
    let sig_count = stack.pop_number(op)?;
    let sig_count = match usize::try_from(sig_count) {
        Ok(m) if m <= key_count && m <= stack.len() => m,
        _ => {
            return Err(fail(format!(
                "Too many signatures required, needed <{}> of <{}> pubkeys, stack size <{}>",
                sig_count,
                key_count,
                stack.len()
            )))
        }
    };

    let mut signatures: Vec<Instruction> = Vec::with_capacity(sig_count);
    for _ in 0..sig_count {
        let signature = stack.pop_operand(op)?;
        if !verifier.is_signature(&signature) {
            return Err(fail(format!(
                "Not enough signatures, needed <{}>, received <{}>",
                sig_count,
                signatures.len()
            )));
        }
        signatures.push(signature);
    }

    let verified = count_verified_pairs(&signatures, &pubkeys, verifier);
    let passed = verified >= sig_count;
    trace!(%op, key_count, sig_count, verified, passed, "checkmultisig");

    let detail = format!(
        "Performed {}; {} distinct verified pairs, {} required, from {} signatures and {} pubkeys; Checkmultisig {}",
        operation,
        verified,
        sig_count,
        signatures.len(),
        pubkeys.len(),
        if passed { "passed" } else { "failed" }
    );

    finish(op, stack, passed, detail, Opcode::CheckMultiSigVerify)
}

/// Number of distinct (signature, pubkey) value pairs that verify
fn count_verified_pairs<V>(signatures: &[Instruction], pubkeys: &[Instruction], verifier: &V) -> usize
where
    V: SignatureVerifier + ?Sized,
{
    signatures
        .iter()
        .flat_map(|sig| pubkeys.iter().map(move |pk| (sig, pk)))
        .filter(|(sig, pk)| verifier.verify(sig, pk))
        .collect::<HashSet<(&Instruction, &Instruction)>>()
        .len()
}

/// Push the result flag, or fail the step for a VERIFY variant that did not pass
fn finish(
    op: Opcode,
    stack: &mut Stack,
    passed: bool,
    detail: String,
    verify_variant: Opcode,
) -> Result<String, ScriptFailure> {
    if op == verify_variant && !passed {
        return Err(ScriptFailure::VerifyFailed { detail });
    }

    let flag = passed as i64;
    stack.push(Instruction::int(flag));

    let mut msg = format!("{}; Pushed <{}> to stack", detail, flag);
    if op == verify_variant {
        msg.push_str("; Verify passed");
    }
    Ok(msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::placeholder::PlaceholderVerifier;

    /// Stack from items listed top first
    fn stack_of(items: Vec<Instruction>) -> Stack {
        items.into_iter().collect()
    }

    fn m(text: &str) -> Instruction {
        Instruction::marker(text)
    }

    #[test]
    fn checksig_pushes_verdict() {
        let mut stack = stack_of(vec![m("PUBKEY"), m("SIGNATURE")]);
        execute(Opcode::CheckSig, &mut stack, &PlaceholderVerifier).unwrap();
        assert_eq!(stack.snapshot(), vec![Instruction::int(1)]);

        let mut stack = stack_of(vec![m("PK1"), m("SIG2")]);
        let msg = execute(Opcode::CheckSig, &mut stack, &PlaceholderVerifier).unwrap();
        assert_eq!(stack.snapshot(), vec![Instruction::int(0)]);
        assert_eq!(
            msg,
            "Performed CHECKSIG; Checksig on pubkey <PK1> failed with signature <SIG2>; Pushed <0> to stack"
        );
    }

    #[test]
    fn checksigverify_fails_on_mismatch() {
        let mut stack = stack_of(vec![m("PK1"), m("SIG2")]);
        let err = execute(Opcode::CheckSigVerify, &mut stack, &PlaceholderVerifier).unwrap_err();
        assert!(matches!(err, ScriptFailure::VerifyFailed { .. }));
        assert!(stack.is_empty());
    }

    #[test]
    fn multisig_two_of_three() {
        // k=3 on top, then three keys, then m=2, then two signatures
        let mut stack = stack_of(vec![
            Instruction::int(3),
            m("PK1"),
            m("PK2"),
            m("PK3"),
            Instruction::int(2),
            m("SIG3"),
            m("SIG1"),
        ]);
        execute(Opcode::CheckMultiSig, &mut stack, &PlaceholderVerifier).unwrap();
        assert_eq!(stack.snapshot(), vec![Instruction::int(1)]);
    }

    #[test]
    fn multisig_counts_any_to_any_pairs() {
        // one matching pair is not enough for m=2
        let mut stack = stack_of(vec![
            Instruction::int(2),
            m("PK1"),
            m("PK9"),
            Instruction::int(2),
            m("SIG1"),
            m("SIG7"),
        ]);
        execute(Opcode::CheckMultiSig, &mut stack, &PlaceholderVerifier).unwrap();
        assert_eq!(stack.snapshot(), vec![Instruction::int(0)]);

        // keys in any order still pair up
        let mut stack = stack_of(vec![
            Instruction::int(2),
            m("PK1"),
            m("PK2"),
            Instruction::int(2),
            m("SIG1"),
            m("SIG2"),
        ]);
        execute(Opcode::CheckMultiSig, &mut stack, &PlaceholderVerifier).unwrap();
        assert_eq!(stack.snapshot(), vec![Instruction::int(1)]);
    }

    #[test]
    fn repeated_values_count_as_one_pair() {
        let mut stack = stack_of(vec![
            Instruction::int(2),
            m("PUBKEY"),
            m("PUBKEY"),
            Instruction::int(2),
            m("SIGNATURE"),
            m("SIGNATURE"),
        ]);
        let msg = execute(Opcode::CheckMultiSig, &mut stack, &PlaceholderVerifier).unwrap();
        assert_eq!(stack.snapshot(), vec![Instruction::int(0)]);
        assert_eq!(
            msg,
            "Performed CHECKMULTISIG; 1 distinct verified pairs, 2 required, from 2 signatures \
             and 2 pubkeys; Checkmultisig failed; Pushed <0> to stack"
        );
    }

    #[test]
    fn message_reports_distinct_pairs_not_raw_matches() {
        // six raw matches, one distinct pair
        let mut stack = stack_of(vec![
            Instruction::int(3),
            m("PK1"),
            m("PK1"),
            m("PK1"),
            Instruction::int(2),
            m("SIG1"),
            m("SIG1"),
        ]);
        let msg = execute(Opcode::CheckMultiSig, &mut stack, &PlaceholderVerifier).unwrap();
        assert!(msg.starts_with("Performed CHECKMULTISIG; 1 distinct verified pairs, 2 required"), "{}", msg);
        assert_eq!(stack.snapshot(), vec![Instruction::int(0)]);
    }

    #[test]
    fn multisig_rejects_more_signatures_than_keys() {
        let mut stack = stack_of(vec![
            Instruction::int(1),
            m("PK1"),
            Instruction::int(2),
            m("SIG1"),
            m("SIG1"),
        ]);
        let err = execute(Opcode::CheckMultiSig, &mut stack, &PlaceholderVerifier).unwrap_err();
        assert!(matches!(err, ScriptFailure::Multisig { .. }));
    }

    #[test]
    fn multisig_rejects_key_count_beyond_stack() {
        let mut stack = stack_of(vec![Instruction::int(5), m("PK1")]);
        let err = execute(Opcode::CheckMultiSig, &mut stack, &PlaceholderVerifier).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Performed CHECKMULTISIG; Too many pubkeys required, needed <5>, stack size <1>; Checkmultisig failed"
        );
    }

    #[test]
    fn multisig_rejects_non_key_values() {
        let mut stack = stack_of(vec![
            Instruction::int(2),
            m("PK1"),
            Instruction::int(4),
            Instruction::int(1),
            m("SIG1"),
        ]);
        let err = execute(Opcode::CheckMultiSig, &mut stack, &PlaceholderVerifier).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Performed CHECKMULTISIG; Not enough pubkeys, needed <2>, received <1>; Checkmultisig failed"
        );

        let mut stack = stack_of(vec![
            Instruction::int(1),
            m("PK1"),
            Instruction::int(1),
            m("PK1"),
        ]);
        let err = execute(Opcode::CheckMultiSig, &mut stack, &PlaceholderVerifier).unwrap_err();
        assert!(err.to_string().contains("Not enough signatures"));
    }

    #[test]
    fn multisig_requires_signature_count() {
        let mut stack = stack_of(vec![Instruction::int(1), m("PK1")]);
        let err = execute(Opcode::CheckMultiSig, &mut stack, &PlaceholderVerifier).unwrap_err();
        assert!(err.to_string().contains("No signature count"));
    }

    #[test]
    fn multisigverify_fails_when_short() {
        let mut stack = stack_of(vec![
            Instruction::int(1),
            m("PK1"),
            Instruction::int(1),
            m("SIG2"),
        ]);
        let err = execute(Opcode::CheckMultiSigVerify, &mut stack, &PlaceholderVerifier).unwrap_err();
        assert!(matches!(err, ScriptFailure::VerifyFailed { .. }));
    }
}
