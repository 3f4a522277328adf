/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser};
use i8080_core::config::{parse_address, DEFAULT_STACK_POINTER};
use i8080_core::opcode::Instruction;
use i8080_core::{Config, InterceptableProc8080, NullBus, Proc8080, Snapshot, StepStatus};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "emulator")]
#[command(about = "Runs a raw Intel 8080 image", long_about = None)]
struct Args {
    /// Path to the raw image
    rom: PathBuf,

    /// Address where the image is loaded and execution starts
    #[arg(long, default_value = "0", value_parser = parse_address)]
    load_address: u16,

    /// Initial stack pointer
    #[arg(long, default_value_t = DEFAULT_STACK_POINTER, value_parser = parse_address)]
    stack_pointer: u16,

    /// Maximum number of instructions to execute
    #[arg(long, default_value_t = 1_000_000)]
    steps: u64,

    /// Print each instruction before it executes
    #[arg(long, action = ArgAction::SetTrue)]
    trace: bool,

    /// Print the registers when execution stops
    #[arg(long, action = ArgAction::SetTrue)]
    dump_registers: bool,

    /// Keep running once the program counter leaves the image
    #[arg(long, action = ArgAction::SetTrue)]
    keep_running: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let bytes = fs::read(&args.rom)
        .with_context(|| format!("failed to read image {}", args.rom.display()))?;

    let config = Config::default()
        .with_stack_pointer(args.stack_pointer)
        .with_stop_at_image_end(!args.keep_running);
    let mut proc8080 = Proc8080::with_config(config, NullBus);
    if (1..3).contains(&args.load_address) {
        bail!("load address {:#06x} overlaps the entry jump at 0x0000", args.load_address);
    }
    proc8080.load_image_at(args.load_address, &bytes)?;
    if args.load_address != 0 {
        // JMP to the image
        let [low, high] = args.load_address.to_le_bytes();
        proc8080.load_image_at(0, &[0xc3, low, high])?;
    }

    let proc8080 = if args.trace {
        trace_run(proc8080, args.steps)?
    } else {
        let summary = proc8080.run(args.steps)?;
        info!(steps = summary.steps, reason = ?summary.reason, "execution stopped");
        proc8080
    };

    if args.dump_registers {
        print!("{}", dump(&proc8080.snapshot()));
    }
    Ok(())
}

/// Same stop conditions as `Proc8080::run`, printing every instruction on the way.
fn trace_run(proc8080: Proc8080, budget: u64) -> Result<Proc8080> {
    let image_end = proc8080.image_end().unwrap_or(0);
    let stop_at_image_end = proc8080.config().stop_at_image_end;
    let mut traced = InterceptableProc8080::from_8080(proc8080, |cpu: &Proc8080, instruction: &Instruction| {
        println!("{:04x}  {}", cpu.registers().pc, instruction);
        false
    });

    let mut steps = 0;
    while steps < budget {
        if stop_at_image_end && traced.registers().pc as usize >= image_end {
            break;
        }
        let step = traced.step()?;
        steps += 1;
        if step.status == StepStatus::Halted {
            break;
        }
    }
    info!(steps, "execution stopped");
    Ok(traced.into_inner())
}

fn dump(snapshot: &Snapshot) -> String {
    let registers = &snapshot.registers;
    let mut out = String::new();
    for (name, value) in [
        ("A", registers.a),
        ("B", registers.b),
        ("C", registers.c),
        ("D", registers.d),
        ("E", registers.e),
        ("H", registers.h),
        ("L", registers.l),
    ] {
        let _ = writeln!(out, "{name}: {value:02x}");
    }
    let _ = writeln!(out, "PC: {:04x}", registers.pc);
    let _ = writeln!(out, "SP: {:04x}", registers.sp);
    out
}
