use gcvm::error::ErrorType;
use gcvm::{Vm, VmConfig};

fn quiet_vm() -> Vm {
    Vm::new(VmConfig::quiet())
}

#[test]
pub fn test_end_to_end_scenario() {
    let mut vm = quiet_vm();

    vm.push_int(1).unwrap();
    vm.push_int(2).unwrap();
    vm.push_pair().unwrap();
    assert_eq!(vm.stack().len(), 1);
    assert_eq!(vm.heap().count(), 3);

    vm.push_int(3).unwrap();
    vm.push_int(4).unwrap();
    vm.push_pair().unwrap();
    assert_eq!(vm.stack().len(), 2);
    assert_eq!(vm.heap().count(), 6);

    let c = vm.push_pair().unwrap();
    assert_eq!(vm.stack().len(), 1);
    assert_eq!(vm.heap().count(), 7);
    assert_eq!(vm.render(c).unwrap(), "((1,2),(3,4))");

    vm.push_int(5).unwrap();
    vm.push_int(7).unwrap();
    assert_eq!(vm.stack().len(), 3);
    assert_eq!(vm.heap().count(), 9);

    let stats = vm.collect();
    assert_eq!(stats.collected, 0);
    assert_eq!(stats.remaining, 9);
    assert_eq!(stats.to_string(), "Collected 0 objects, 9 remaining.");

    for _ in 0..3 {
        vm.pop().unwrap();
    }
    let stats = vm.collect();
    assert_eq!(stats.collected, 9);
    assert_eq!(stats.remaining, 0);
    assert_eq!(stats.to_string(), "Collected 9 objects, 0 remaining.");
}

#[test]
pub fn test_object_two_hops_from_root_survives() {
    let mut vm = quiet_vm();
    let deep = vm.push_int(1).unwrap();
    vm.push_int(2).unwrap();
    vm.push_pair().unwrap();
    vm.push_int(3).unwrap();
    let outer = vm.push_pair().unwrap();

    let stats = vm.collect();
    assert_eq!(stats.remaining, 5);
    assert!(vm.heap().contains(deep));
    assert_eq!(vm.render(outer).unwrap(), "((1,2),3)");

    vm.pop().unwrap();
    let stats = vm.collect();
    assert_eq!(stats.collected, 5);
    assert!(!vm.heap().contains(deep));
}

#[test]
pub fn test_unrooted_self_cycle_is_reclaimed() {
    let mut vm = quiet_vm();
    vm.push_int(1).unwrap();
    vm.push_int(2).unwrap();
    let cell = vm.push_pair().unwrap();
    vm.dup().unwrap();
    vm.set_first().unwrap();
    assert_eq!(vm.stack().len(), 1);
    assert_eq!(vm.render(cell).unwrap(), "(...,2)");

    vm.pop().unwrap();
    let stats = vm.collect();
    assert_eq!(stats.collected, 3);
    assert_eq!(stats.remaining, 0);
}

#[test]
pub fn test_unrooted_mutual_cycle_is_reclaimed() {
    let mut vm = quiet_vm();
    vm.push_int(1).unwrap();
    vm.push_int(2).unwrap();
    let a = vm.push_pair().unwrap();
    vm.dup().unwrap();
    vm.push_int(3).unwrap();
    let b = vm.push_pair().unwrap();
    vm.set_first().unwrap();
    assert_eq!(vm.render(a).unwrap(), "((...,3),2)");
    assert_eq!(vm.render(b).unwrap(), "((...,2),3)");

    // scalar 1 lost its only referrer when A's first member became B
    let stats = vm.collect();
    assert_eq!(stats.collected, 1);
    assert_eq!(stats.remaining, 4);

    vm.pop().unwrap();
    let stats = vm.collect();
    assert_eq!(stats.collected, 4);
    assert!(vm.heap().is_empty());
}

#[test]
pub fn test_count_matches_list_and_marks_are_clear_after_collect() {
    let mut vm = quiet_vm();
    for i in 0..6 {
        vm.push_int(i).unwrap();
    }
    vm.push_pair().unwrap();
    vm.pop().unwrap();
    vm.pop().unwrap();

    let stats = vm.collect();
    assert_eq!(stats.remaining, 3);
    assert_eq!(vm.heap().iter().count(), vm.heap().count());
    assert!(vm.heap().iter().all(|(_, obj)| !obj.marked()));
}

#[test]
pub fn test_repeated_collect_is_noop() {
    let mut vm = quiet_vm();
    vm.push_int(1).unwrap();
    vm.push_int(2).unwrap();
    vm.pop().unwrap();

    let first = vm.collect();
    let second = vm.collect();
    assert_eq!(first.collected, 1);
    assert_eq!(second.collected, 0);
    assert_eq!(first.remaining, second.remaining);
    assert_eq!(first.threshold, second.threshold);
}

#[test]
pub fn test_threshold_growth_defers_next_collection() {
    let mut vm = quiet_vm();
    for i in 1..=4 {
        vm.push_int(i).unwrap();
    }
    vm.collect();
    assert_eq!(vm.heap().threshold(), 8);

    // one object becomes garbage; it must linger until the threshold is hit
    vm.pop().unwrap();
    for i in 5..=8 {
        vm.push_int(i).unwrap();
    }
    assert_eq!(vm.heap().count(), 8);
    assert_eq!(vm.heap().threshold(), 8);

    vm.push_int(9).unwrap();
    assert_eq!(vm.heap().count(), 8);
    assert_eq!(vm.heap().threshold(), 14);
}

#[test]
pub fn test_allocation_collects_at_initial_threshold() {
    let mut vm = quiet_vm();
    for i in 0..10 {
        vm.push_int(i).unwrap();
        vm.pop().unwrap();
    }
    assert_eq!(vm.heap().count(), 10);

    vm.push_int(10).unwrap();
    assert_eq!(vm.heap().count(), 1);
    assert_eq!(vm.heap().threshold(), 0);

    vm.push_int(11).unwrap();
    assert_eq!(vm.heap().count(), 2);
    assert_eq!(vm.heap().threshold(), 2);
}

#[test]
pub fn test_min_threshold_from_config() {
    let mut vm = Vm::new(VmConfig {
        min_threshold: 4,
        ..VmConfig::quiet()
    });
    vm.push_int(1).unwrap();
    vm.pop().unwrap();

    vm.collect();
    assert_eq!(vm.heap().threshold(), 4);
}

#[test]
pub fn test_pair_operands_survive_collection_during_pairing() {
    let mut vm = Vm::new(VmConfig {
        initial_threshold: 3,
        ..VmConfig::quiet()
    });
    vm.push_int(1).unwrap();
    vm.push_int(2).unwrap();
    vm.push_int(3).unwrap();
    vm.pop().unwrap();
    assert!(vm.heap().should_collect());

    let cell = vm.push_pair().unwrap();
    assert_eq!(vm.heap().count(), 3);
    assert_eq!(vm.heap().threshold(), 4);
    assert_eq!(vm.render(cell).unwrap(), "(1,2)");
}

#[test]
pub fn test_shutdown_releases_everything() {
    let mut vm = quiet_vm();
    vm.push_int(1).unwrap();
    vm.push_int(2).unwrap();
    vm.push_pair().unwrap();

    let stats = vm.shutdown();
    assert_eq!(stats.collected, 3);
    assert_eq!(stats.remaining, 0);
}

#[test]
pub fn test_reclaimed_handle_is_rejected_after_slot_reuse() {
    let mut vm = quiet_vm();
    let stale = vm.push_int(1).unwrap();
    vm.pop().unwrap();
    vm.collect();

    let fresh = vm.push_int(42).unwrap();
    assert_eq!(fresh.index(), stale.index());
    assert_eq!(vm.render(fresh).unwrap(), "42");

    let result = vm.render(stale);
    assert!(result.is_err(), "Reclaimed handle must not read the new occupant");
    assert_eq!(result.unwrap_err().err_type, ErrorType::ReferenceError);

    let result = vm.push(stale);
    assert_eq!(result.unwrap_err().err_type, ErrorType::ReferenceError);
    assert_eq!(vm.stack().len(), 1);

    assert!(vm.print_object(stale).is_err());
}
