//! Sequence builtins: `range`, `min` and `max`

use core_types::{Value, VmResult};
use interpreter::{Args, NativeFn, Vm};
use std::cmp::Ordering;

pub(crate) const NATIVES: [(&str, NativeFn); 3] = [("range", range), ("min", min), ("max", max)];

/// Integers of `range(stop)` / `range(start, stop[, step])`.
///
/// A zero step, or any other argument count, yields no items.
pub fn range_items(start: i64, stop: i64, step: i64) -> Vec<f64> {
    let mut items = Vec::new();
    if step == 0 {
        return items;
    }
    let mut i = start;
    while (step > 0 && i < stop) || (step < 0 && i > stop) {
        items.push(i as f64);
        match i.checked_add(step) {
            Some(next) => i = next,
            None => break,
        }
    }
    items
}

fn range(vm: &mut Vm, params: Value) -> VmResult<Value> {
    let mut args = Args::new(vm, "range", params)?;
    let (start, stop, step) = match args.len() {
        1 => (0, args.number()? as i64, 1),
        2 | 3 => {
            let start = args.number()? as i64;
            let stop = args.number()? as i64;
            let step = match args.value_or(Value::Number(1.0)) {
                Value::Number(n) => n as i64,
                _ => 1,
            };
            (start, stop, step)
        }
        _ => (0, 0, 0),
    };
    let items: Vec<Value> = range_items(start, stop, step)
        .into_iter()
        .map(Value::Number)
        .collect();
    vm.list(&items)
}

/// Picks the parameter that `keep` prefers over every other one.
fn extreme(vm: &mut Vm, name: &'static str, params: Value, keep: Ordering) -> VmResult<Value> {
    let mut args = Args::new(vm, name, params)?;
    let mut best = args.value()?;
    for v in args.rest() {
        if vm.compare(v, best)? == keep {
            best = v;
        }
    }
    Ok(best)
}

fn min(vm: &mut Vm, params: Value) -> VmResult<Value> {
    extreme(vm, "min", params, Ordering::Less)
}

fn max(vm: &mut Vm, params: Value) -> VmResult<Value> {
    extreme(vm, "max", params, Ordering::Greater)
}
