use std::env;
use std::fs;
use std::process::ExitCode;

use robots::diagnostics;
use robots_vm::VirtualMachine;

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("usage: robots-vm <image-file>");
        return ExitCode::FAILURE;
    }

    let bytecode = match fs::read(&args[1]) {
        Ok(bytecode) => bytecode,
        Err(err) => {
            diagnostics::error(format!("reading {}: {err}", args[1]));
            return ExitCode::FAILURE;
        }
    };

    let mut vm = match VirtualMachine::load(&bytecode) {
        Ok(vm) => vm,
        Err(err) => {
            diagnostics::error(err);
            return ExitCode::FAILURE;
        }
    };

    diagnostics::info(format!("loaded {} bytes, {} processes", bytecode.len(), vm.processes().len()));
    let faults = vm.run();

    for process in vm.processes() {
        diagnostics::info(process);
    }
    for fault in &faults {
        diagnostics::error(fault);
    }

    diagnostics::info(format!("done after {} ticks", vm.ticks()));
    if faults.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
