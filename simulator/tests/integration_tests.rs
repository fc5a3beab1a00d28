use robots::compile;
use robots_vm::VirtualMachine;

/// Scenario 1: halt immediately, one process, empty stack.
#[test]
fn halt_immediately() {
    let image = compile("E@").unwrap();
    let mut vm = VirtualMachine::load(&image).unwrap();
    let faults = vm.run();
    assert!(faults.is_empty());
    assert_eq!(vm.processes().len(), 1);
    assert!(!vm.processes()[0].is_running());
    assert_eq!(vm.processes()[0].stack.peek(), None);
}

/// Scenario 2: push-then-halt leaves the digit's value on the stack.
#[test]
fn push_then_halt() {
    let image = compile("E 3@").unwrap();
    let mut vm = VirtualMachine::load(&image).unwrap();
    vm.run();
    assert_eq!(vm.processes()[0].stack.peek(), Some(3));
}

/// Scenario 3: a turning path still reaches a halt with an empty stack.
#[test]
fn turn_and_halt() {
    let image = compile("E>@").unwrap();
    let mut vm = VirtualMachine::load(&image).unwrap();
    let faults = vm.run();
    assert!(faults.is_empty());
    assert!(!vm.processes()[0].is_running());
    assert_eq!(vm.processes()[0].stack.peek(), None);
}

/// Scenario 4: a zero on the stack takes the conditional's zero branch;
/// a nonzero value takes the other. Both halt independently.
#[test]
fn conditional_branches_on_stack_top() {
    // E pushes a literal, turns south into a COND flanked by halts on
    // both sides: east is the zero branch, west is the non-zero branch.
    let zero_image = compile("E0v  \n@@_@@").unwrap();
    let mut vm = VirtualMachine::load(&zero_image).unwrap();
    let faults = vm.run();
    assert!(faults.is_empty());
    assert!(!vm.processes()[0].is_running());

    let nonzero_image = compile("E1v  \n@@_@@").unwrap();
    let mut vm = VirtualMachine::load(&nonzero_image).unwrap();
    let faults = vm.run();
    assert!(faults.is_empty());
    assert!(!vm.processes()[0].is_running());
}

/// Scenario 5: two disjoint processes both halt; the live set ends empty.
#[test]
fn two_processes_both_halt() {
    let image = compile("E@\n@W").unwrap();
    let mut vm = VirtualMachine::load(&image).unwrap();
    assert_eq!(vm.processes().len(), 2);
    let faults = vm.run();
    assert!(faults.is_empty());
    assert!(vm.processes().iter().all(|p| !p.is_running()));
}

/// Scenario 6: read a byte via LOAD, then write it back unchanged via
/// STORE, round-tripping an 8-bit pattern through 8 memory cells.
#[test]
fn read_write_byte_round_trips() {
    // Row 0: the 8-bit pattern 1 0 1 0 1 0 1 0 (== 0xAA) at x=0..7.
    // Row 1: E walks east over four literal digit cells (x=0,y=0,dx=1,dy=0),
    // LOADs, then over the same four literals again, then STOREs, then halts.
    let grid = "10101010    \nE0010?0010#@";
    let image = compile(grid).unwrap();
    let mut vm = VirtualMachine::load(&image).unwrap();
    let faults = vm.run();
    assert!(faults.is_empty());
    assert!(!vm.processes()[0].is_running());
    assert!(vm.processes()[0].stack.peek().is_none());
}
