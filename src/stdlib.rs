/// Built-in functions. There is no native-function `Value` variant, so
/// these are dispatched by name from the call-expression evaluator
/// whenever the name isn't shadowed by a bound value.
use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{EvalError, EvalResult};
use crate::value::{Array, Value};

pub fn is_builtin_name(name: &str) -> bool {
    matches!(name, "print" | "range")
}

/// `print(a, b, ...)`: writes each argument's display form to stdout,
/// space-separated, followed by a newline, in source (left-to-right) order.
/// Returns `None`.
pub fn print(args: &[Value]) -> Value {
    let rendered: Vec<String> = args.iter().map(Value::to_display_string).collect();
    println!("{}", rendered.join(" "));
    Value::None
}

/// `range(n)` or `range(start, end)`: an array of consecutive ints,
/// `end` exclusive.
pub fn range(args: &[Value]) -> EvalResult<Value> {
    let (start, end) = match args {
        [Value::Int(end)] => (0, *end),
        [Value::Int(start), Value::Int(end)] => (*start, *end),
        _ => {
            return Err(EvalError::BuiltinArity {
                name: "range".to_string(),
                expected: "1 or 2 int arguments".to_string(),
                found: args.len(),
            })
        }
    };
    let elements = (start..end).map(Value::Int).collect();
    Ok(Value::Array(Rc::new(RefCell::new(Array::new(elements)))))
}

pub fn call(name: &str, args: &[Value]) -> EvalResult<Value> {
    match name {
        "print" => Ok(print(args)),
        "range" => range(args),
        _ => Err(EvalError::UnknownBuiltin(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_one_arg_starts_at_zero() {
        let result = range(&[Value::Int(3)]).unwrap();
        match result {
            Value::Array(arr) => {
                let arr = arr.borrow();
                assert_eq!(arr.len(), 3);
                assert_eq!(arr.get(0), Some(&Value::Int(0)));
                assert_eq!(arr.get(2), Some(&Value::Int(2)));
            }
            _ => panic!("expected array"),
        }
    }

    #[test]
    fn range_two_args_respects_start() {
        let result = range(&[Value::Int(2), Value::Int(5)]).unwrap();
        match result {
            Value::Array(arr) => {
                let arr = arr.borrow();
                assert_eq!(arr.as_slice(), &[Value::Int(2), Value::Int(3), Value::Int(4)]);
            }
            _ => panic!("expected array"),
        }
    }

    #[test]
    fn range_rejects_bad_arity() {
        let err = range(&[]).unwrap_err();
        assert!(matches!(err, EvalError::BuiltinArity { .. }));
    }
}
