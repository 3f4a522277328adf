/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use i8080_core::opcode::lookup;
use i8080_core::{disassemble_at, Config, NullBus, Proc8080, StepStatus};

fn session_for(opcode: u8) -> Proc8080 {
    let config = Config::default().with_stack_pointer(0xff00);
    let mut proc8080 = Proc8080::with_config(config, NullBus);
    proc8080.load_image(&[opcode, 0x34, 0x12]).unwrap();
    proc8080
}

#[test]
fn engine_and_disassembler_agree_on_lengths() {
    for opcode in 0..=0xffu8 {
        let window = [opcode, 0x34, 0x12];
        let listed = disassemble_at(&window, 0).unwrap();

        let mut proc8080 = session_for(opcode);
        let step = proc8080.step().unwrap();

        assert_eq!(step.opcode, opcode);
        assert_eq!(
            step.length, listed.length,
            "opcode {:02x} ({}) runs as {} bytes", opcode, listed.text, step.length
        );
        assert_eq!(lookup(opcode).length(), step.length);
    }
}

#[test]
fn only_unmapped_opcodes_are_invalid() {
    let mut invalid = Vec::new();
    for opcode in 0..=0xffu8 {
        let status = session_for(opcode).step().unwrap().status;
        let text = disassemble_at(&[opcode, 0x34, 0x12], 0).unwrap().text;
        if status == StepStatus::InvalidOpcode {
            assert!(text.starts_with("DB "), "{:02x} is listed as {}", opcode, text);
            invalid.push(opcode);
        } else {
            assert!(!text.starts_with("DB "), "{:02x} is listed as {}", opcode, text);
        }
    }
    assert_eq!(invalid, [0x08, 0x10, 0x18, 0x20, 0x28, 0x30, 0x38, 0xcb, 0xd9, 0xdd, 0xed, 0xfd]);
}
