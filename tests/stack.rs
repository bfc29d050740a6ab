use gcvm::error::ErrorType;
use gcvm::vm::stack::Stack;
use gcvm::{Vm, VmConfig};

fn small_vm(stack_max: usize) -> Vm {
    Vm::new(VmConfig {
        stack_max,
        ..VmConfig::quiet()
    })
}

#[test]
pub fn test_push_beyond_capacity_overflows() {
    let mut vm = small_vm(2);
    assert!(vm.push_int(1).is_ok());
    assert!(vm.push_int(2).is_ok());

    let result = vm.push_int(3);
    assert!(result.is_err(), "Third push should overflow");
    assert_eq!(result.unwrap_err().err_type, ErrorType::StackOverflow(2));
    assert_eq!(vm.stack().len(), 2);
    assert_eq!(vm.heap().count(), 2, "Overflow must not leave an allocation behind");
}

#[test]
pub fn test_pop_empty_underflows() {
    let mut vm = small_vm(4);
    let result = vm.pop();
    assert!(result.is_err(), "Pop of empty stack should fail");
    assert_eq!(result.unwrap_err().err_type, ErrorType::StackUnderflow);
}

#[test]
pub fn test_pop_after_draining_underflows() {
    let mut vm = small_vm(4);
    vm.push_int(1).unwrap();
    assert!(vm.pop().is_ok());
    assert_eq!(vm.pop().unwrap_err().err_type, ErrorType::StackUnderflow);
}

#[test]
pub fn test_pair_with_one_operand_leaves_state_untouched() {
    let mut vm = small_vm(4);
    let only = vm.push_int(1).unwrap();

    let result = vm.push_pair();
    assert_eq!(result.unwrap_err().err_type, ErrorType::StackUnderflow);
    assert_eq!(vm.stack().roots(), &[only]);
    assert_eq!(vm.heap().count(), 1);
}

#[test]
pub fn test_dup_overflows_and_underflows() {
    let mut vm = small_vm(1);
    assert_eq!(vm.dup().unwrap_err().err_type, ErrorType::StackUnderflow);

    vm.push_int(1).unwrap();
    assert_eq!(vm.dup().unwrap_err().err_type, ErrorType::StackOverflow(1));
}

#[test]
pub fn test_set_first_on_scalar_keeps_stack() {
    let mut vm = small_vm(4);
    vm.push_int(1).unwrap();
    vm.push_int(2).unwrap();

    let result = vm.set_first();
    assert_eq!(result.unwrap_err().err_type, ErrorType::TypeError("Scalar"));
    assert_eq!(vm.stack().len(), 2);
}

#[test]
pub fn test_stack_peek_and_clear() {
    let mut vm = small_vm(4);
    let a = vm.push_int(1).unwrap();
    let b = vm.push_int(2).unwrap();
    assert_eq!(vm.stack().peek(0).unwrap(), b);
    assert_eq!(vm.stack().peek(1).unwrap(), a);
    assert_eq!(
        vm.stack().peek(2).unwrap_err().err_type,
        ErrorType::StackUnderflow
    );

    vm.clear_roots();
    assert!(vm.stack().is_empty());
    assert_eq!(vm.collect().collected, 2);
}

#[test]
pub fn test_zero_capacity_stack_rejects_everything() {
    let mut stack = Stack::new(0);
    assert_eq!(stack.capacity(), 0);
    assert_eq!(stack.pop().unwrap_err().err_type, ErrorType::StackUnderflow);
    assert!(stack.is_empty());
}
