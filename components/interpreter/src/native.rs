//! Argument access for host functions
//!
//! Natives receive their parameters as one list value. [`Args`] pulls them
//! off in order with the type checks every builtin needs.

use crate::vm::Vm;
use core_types::{GcRef, StrView, Value, VmError, VmResult};

/// Positional parameters of one native call.
///
/// # Example
///
/// ```
/// use interpreter::{Args, Vm, VmConfig};
/// use core_types::Value;
///
/// let mut vm = Vm::new(VmConfig::default()).unwrap();
/// let params = vm.list(&[Value::Number(2.0)]).unwrap();
/// let mut args = Args::new(&vm, "double", params).unwrap();
/// assert_eq!(args.number().unwrap(), 2.0);
/// assert!(args.value().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Args {
    name: &'static str,
    items: Vec<Value>,
    next: usize,
}

impl Args {
    /// Reads the parameter list of the native called `name`.
    pub fn new(vm: &Vm, name: &'static str, params: Value) -> VmResult<Self> {
        let items = match params {
            Value::List(r) => vm.heap().list_items(r)?.to_vec(),
            Value::None => Vec::new(),
            other => {
                return Err(VmError::type_error(format!(
                    "{}() parameters must be a list, got {}",
                    name,
                    other.tag()
                )))
            }
        };
        Ok(Args {
            name,
            items,
            next: 0,
        })
    }

    /// Parameters not yet consumed.
    pub fn len(&self) -> usize {
        self.items.len() - self.next
    }

    /// Returns true when every parameter has been consumed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn expected(&self, what: &str, got: Value) -> VmError {
        VmError::type_error(format!("{}() expected {}, got {}", self.name, what, got.tag()))
    }

    /// Next parameter of any type.
    pub fn value(&mut self) -> VmResult<Value> {
        let v = self.items.get(self.next).copied().ok_or_else(|| {
            VmError::type_error(format!("{}() missing argument {}", self.name, self.next + 1))
        })?;
        self.next += 1;
        Ok(v)
    }

    /// Next parameter, or `default` when exhausted.
    pub fn value_or(&mut self, default: Value) -> Value {
        self.value().unwrap_or(default)
    }

    /// Next parameter as a number.
    pub fn number(&mut self) -> VmResult<f64> {
        match self.value()? {
            Value::Number(n) => Ok(n),
            other => Err(self.expected("number", other)),
        }
    }

    /// Next parameter as a string view.
    pub fn string(&mut self) -> VmResult<StrView> {
        match self.value()? {
            Value::Str(s) => Ok(s),
            other => Err(self.expected("string", other)),
        }
    }

    /// Next parameter as a list handle.
    pub fn list(&mut self) -> VmResult<GcRef> {
        match self.value()? {
            Value::List(r) => Ok(r),
            other => Err(self.expected("list", other)),
        }
    }

    /// Next parameter as a dict value, kind preserved.
    pub fn dict(&mut self) -> VmResult<Value> {
        match self.value()? {
            v @ Value::Dict(..) => Ok(v),
            other => Err(self.expected("dict", other)),
        }
    }

    /// Every parameter not yet consumed.
    pub fn rest(&mut self) -> Vec<Value> {
        let rest = self.items[self.next..].to_vec();
        self.next = self.items.len();
        rest
    }
}
