//! Property coverage: determinism, input chunking, and decoder robustness.

#![allow(clippy::pedantic, clippy::nursery)]

use intcode_core::{
    Decoder, Machine, MachineConfig, MachineError, Opcode, Profile, Status, StepOutcome,
};
use proptest::prelude::*;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

/// Reads a value, writes it back out, loops forever.
const ECHO_LOOP: [i64; 7] = [3, 100, 4, 100, 1105, 1, 0];

/// Reads two values and outputs their sum.
const READ_TWO_SUM: [i64; 16] = [3, 13, 3, 14, 1, 13, 14, 15, 4, 15, 99, 0, 0, 0, 0, 0];

const STEP_LIMIT: usize = 2_000;

#[derive(Debug, PartialEq, Eq)]
enum Bounded {
    Stopped(StepOutcome),
    Faulted(MachineError),
    LimitReached,
}

fn run_bounded(machine: &mut Machine) -> (Bounded, Vec<i64>) {
    let mut result = Bounded::LimitReached;
    for _ in 0..STEP_LIMIT {
        match machine.step() {
            Ok(StepOutcome::Retired) => {}
            Ok(stop) => {
                result = Bounded::Stopped(stop);
                break;
            }
            Err(fault) => {
                result = Bounded::Faulted(fault);
                break;
            }
        }
    }
    (result, machine.take_output().into_values())
}

proptest! {
    #[test]
    fn property_decode_never_panics_and_respects_low_digits(raw in any::<i64>()) {
        for profile in [Profile::Complete, Profile::Basic] {
            match Decoder::decode(raw, 0, profile) {
                Ok(instr) => {
                    prop_assert!(raw >= 0);
                    prop_assert_eq!(instr.opcode.as_i64(), raw % 100);
                    prop_assert!(instr.width() <= 4);
                }
                Err(MachineError::MalformedProgram { raw: reported, .. }) => {
                    prop_assert_eq!(reported, raw);
                    prop_assert!(raw < 0 || Opcode::from_i64(raw % 100)
                        .map_or(true, |op| !op.is_supported_by(profile)));
                }
                Err(MachineError::InvalidAddressingMode { .. } | MachineError::ImmediateWrite { .. }) => {}
                Err(other) => prop_assert!(false, "unexpected decode fault {other:?}"),
            }
        }
    }

    #[test]
    fn property_execution_is_deterministic(
        cells in prop::collection::vec(-4_i64..120, 1..40),
        input in prop::collection::vec(-50_i64..50, 0..6),
    ) {
        let config = MachineConfig { profile: Profile::Basic, ..MachineConfig::default() };

        let mut first = Machine::with_config(cells.clone(), config);
        first.reset(input.clone()).expect("numeric input accepted");
        let first_run = run_bounded(&mut first);

        let mut second = Machine::with_config(cells, config);
        second.reset(input).expect("numeric input accepted");
        let second_run = run_bounded(&mut second);

        prop_assert_eq!(first_run, second_run);
        prop_assert_eq!(first.memory(), second.memory());
        prop_assert_eq!(first.instruction_pointer(), second.instruction_pointer());
    }

    #[test]
    fn property_input_chunking_is_unobservable(
        chunks in prop::collection::vec(prop::collection::vec(any::<i64>(), 0..5), 1..6),
    ) {
        let all: Vec<i64> = chunks.iter().flatten().copied().collect();

        let mut batched = Machine::new(ECHO_LOOP);
        let whole = batched.start(all.clone()).expect("echo runs");
        prop_assert_eq!(whole.status, Status::NeedsInput);

        let mut chunked = Machine::new(ECHO_LOOP);
        let mut produced = chunked.start(()).expect("echo boots").output.into_values();
        for chunk in chunks {
            let outcome = chunked.resume(chunk).expect("echo runs");
            prop_assert_eq!(outcome.status, Status::NeedsInput);
            produced.extend(outcome.output.into_values());
        }

        prop_assert_eq!(whole.output.values(), all.as_slice());
        prop_assert_eq!(produced, all);
        prop_assert_eq!(batched.memory(), chunked.memory());
    }

    #[test]
    fn property_start_then_resume_matches_start_with_both(
        a in -1_000_000_000_i64..1_000_000_000,
        b in -1_000_000_000_i64..1_000_000_000,
    ) {
        let mut batched = Machine::new(READ_TWO_SUM);
        let whole = batched.start([a, b]).expect("runs");

        let mut split = Machine::new(READ_TWO_SUM);
        let first = split.start(a).expect("runs");
        prop_assert_eq!(first.status, Status::NeedsInput);
        let second = split.resume(b).expect("runs");

        prop_assert_eq!(whole.status, Status::Halted);
        prop_assert_eq!(second.status, Status::Halted);
        prop_assert_eq!(whole.output.values(), &[a + b]);
        prop_assert_eq!(second.output.values(), &[a + b]);
        prop_assert_eq!(batched.memory(), split.memory());
    }

    #[test]
    fn property_far_writes_leave_gap_zeroed(address in 5_i64..20_000, value in any::<i64>()) {
        let mut machine = Machine::new([1101, 0, value, address, 99]);
        let outcome = machine.start(()).expect("runs");
        prop_assert_eq!(outcome.status, Status::Halted);

        let index = usize::try_from(address).expect("non-negative");
        prop_assert_eq!(machine.read(index), value);
        prop_assert_eq!(machine.memory().len(), index + 1);
        prop_assert!(machine.memory()[5..index].iter().all(|cell| *cell == 0));
    }
}
