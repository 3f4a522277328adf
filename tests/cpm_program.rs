/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use i8080_core::opcode::{Instruction, Op, Reg16};
use i8080_core::{InterceptableProc8080, NullBus, Proc8080, StepStatus};

const BDOS: u16 = 0x0005;
const CONSOLE_OUTPUT: u8 = 2;
const PRINT_STRING: u8 = 9;

/// Loads a CP/M transient program at 0x0100 behind a `JMP $0100` at the reset vector.
fn cpm_session(program: &[u8]) -> Proc8080 {
    let mut proc8080 = Proc8080::new(NullBus);
    proc8080.load_image_at(0x0100, program).unwrap();
    proc8080.load_image_at(0x0000, &[0xc3, 0x00, 0x01]).unwrap();
    proc8080
}

/// Runs `proc8080` until `HLT`, answering BDOS calls. Returns the console output.
fn run_with_bdos(proc8080: Proc8080) -> (Proc8080, String) {
    let mut console = String::new();
    let bdos = |cpu: &Proc8080, instruction: &Instruction| {
        if instruction.op() != Op::Call(None) || instruction.word() != BDOS {
            return false;
        }
        let registers = cpu.registers();
        match registers.c {
            CONSOLE_OUTPUT => console.push(char::from(registers.e)),
            PRINT_STRING => {
                let start = registers.pair(Reg16::D) as usize;
                console.extend(
                    cpu.memory()[start..]
                        .iter()
                        .take_while(|byte| **byte != b'$')
                        .map(|byte| char::from(*byte)),
                );
            }
            function => panic!("unsupported BDOS function {}", function),
        }
        true
    };

    let mut cpm = InterceptableProc8080::from_8080(proc8080, bdos);
    for _ in 0..1000 {
        if cpm.step().unwrap().status == StepStatus::Halted {
            let proc8080 = cpm.into_inner();
            return (proc8080, console);
        }
    }
    panic!("program did not halt");
}

#[test]
fn print_computed_string() {
    let program = [
        0x31, 0x00, 0x04,   // LXI SP,$0400
        0x3e, 0x02,         // MVI A,$02
        0xc6, 0x05,         // ADI $05
        0xc6, 0x30,         // ADI '0'
        0x32, 0x1b, 0x01,   // STA $011b
        0x11, 0x15, 0x01,   // LXI D,$0115
        0x0e, PRINT_STRING, // MVI C,$09
        0xcd, 0x05, 0x00,   // CALL $0005
        0x76,               // HLT
        b'C', b'O', b'U', b'N', b'T', b'=', b'?', b'$',
    ];

    let (proc8080, console) = run_with_bdos(cpm_session(&program));
    assert_eq!(console, "COUNT=7");
    assert_eq!(proc8080.registers().pc, 0x0115);
    assert_eq!(proc8080.registers().sp, 0x0400);
}

#[test]
fn print_characters_in_a_loop() {
    let program = [
        0x31, 0x00, 0x04,     // LXI SP,$0400
        0x06, 0x0a,           // MVI B,$0a
        0x1e, b'0',           // MVI E,'0'
        0x0e, CONSOLE_OUTPUT, // loop: MVI C,$02
        0xc5,                 // PUSH B
        0xd5,                 // PUSH D
        0xcd, 0x05, 0x00,     // CALL $0005
        0xd1,                 // POP D
        0xc1,                 // POP B
        0x1c,                 // INR E
        0x05,                 // DCR B
        0xc2, 0x07, 0x01,     // JNZ loop
        0x76,                 // HLT
    ];

    let (proc8080, console) = run_with_bdos(cpm_session(&program));
    assert_eq!(console, "0123456789");
    assert_eq!(proc8080.registers().b, 0);
    assert_eq!(proc8080.registers().e, b':');
    assert!(proc8080.flags().zero);
}

#[test]
fn subroutine_calls_nest() {
    let program = [
        0x31, 0x00, 0x04, // LXI SP,$0400
        0x21, 0x00, 0x00, // LXI H,$0000
        0xcd, 0x0b, 0x01, // CALL outer
        0x76,             // HLT
        0x00,
        0xcd, 0x10, 0x01, // outer: CALL inner
        0x23,             // INX H
        0xc9,             // RET
        0x23,             // inner: INX H
        0x23,             // INX H
        0xc9,             // RET
    ];

    let (proc8080, console) = run_with_bdos(cpm_session(&program));
    assert!(console.is_empty());
    assert_eq!(proc8080.registers().hl(), 3);
    assert_eq!(proc8080.registers().sp, 0x0400);
    assert_eq!(proc8080.registers().pc, 0x010a);
}
