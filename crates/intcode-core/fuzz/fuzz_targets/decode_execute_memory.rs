#![no_main]

use intcode_core::{
    disassemble, resolve_address, Decoder, Machine, MachineConfig, Profile, StepOutcome,
};
use libfuzzer_sys::fuzz_target;

const STEP_LIMIT: usize = 10_000;
// Relative-base walks can push growable memory arbitrarily far.
const MEMORY_LIMIT: usize = 1 << 20;

fn within_limits(machine: &Machine) -> bool {
    machine.memory().len() <= MEMORY_LIMIT
        && machine.relative_base().unsigned_abs() <= MEMORY_LIMIT as u64
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 8 {
        return;
    }

    let raw = i64::from_be_bytes([
        data[0], data[1], data[2], data[3], data[4], data[5], data[6], data[7],
    ]);
    for profile in [Profile::Complete, Profile::Basic] {
        let _ = Decoder::decode(raw, 0, profile);
    }
    let _ = resolve_address(raw);

    // Addresses this far out can never be allocated, so growth must fault
    // rather than abort.
    if raw >= 1 << 61 {
        let mut machine = Machine::new([4, raw, 99]);
        assert!(machine.start(()).is_err());
    }

    // Small cells keep the program in a region where opcodes and modes are
    // dense.
    let cells: Vec<i64> = data[8..]
        .chunks(2)
        .map(|pair| i64::from(i16::from_be_bytes([pair[0], *pair.get(1).unwrap_or(&0)])))
        .collect();
    let _ = disassemble(&cells, Profile::Complete);

    for profile in [Profile::Basic, Profile::Complete] {
        let config = MachineConfig {
            profile,
            ascii: true,
        };
        let mut machine = Machine::with_config(cells.clone(), config);
        if machine.reset(vec![1, 0, -1]).is_err() {
            return;
        }
        for _ in 0..STEP_LIMIT {
            match machine.step() {
                Ok(StepOutcome::Retired) if within_limits(&machine) => {}
                Ok(_) | Err(_) => break,
            }
        }
        let _ = machine.take_output();
    }
});
