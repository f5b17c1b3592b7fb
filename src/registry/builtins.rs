//! Standard builtins installed by [`Registry::with_builtins`].

use crate::error::{LeafError, kind_of};
use crate::registry::{Param, Registry};
use serde_json::Value;

pub fn install(r: &mut Registry) {
    r.register("identity", "first argument, unchanged", Param::None, |args, _| {
        arg(args, 0).cloned()
    });
    r.register("args", "all arguments as an array", Param::None, |args, _| {
        Ok(Value::Array(args.to_vec()))
    });
    r.register("count", "number of arguments", Param::None, |args, _| {
        Ok(Value::from(args.len()))
    });
    r.register("arg", "argument at index N: arg(N)", Param::Required, |args, p| {
        let index = param(p, "arg")?
            .as_u64()
            .ok_or_else(|| bad_param("unsigned integer", p))?;
        arg(args, index as usize).cloned()
    });
    r.register("const", "the bound parameter: const(V)", Param::Required, |_, p| {
        param(p, "const").cloned()
    });
    r.register("add", "first argument plus N: add(N)", Param::Required, |args, p| {
        let n = number_param(p, "add")?;
        let x = to_num(arg(args, 0)?)?;
        Ok(combine("add", x, n, i64::checked_add, |a, b| a + b)?.into_value())
    });
    r.register("mul", "first argument times N: mul(N)", Param::Required, |args, p| {
        let n = number_param(p, "mul")?;
        let x = to_num(arg(args, 0)?)?;
        Ok(combine("mul", x, n, i64::checked_mul, |a, b| a * b)?.into_value())
    });
    r.register("sum", "sum of all arguments", Param::None, |args, _| {
        let mut total = Num::Int(0);
        for a in args {
            total = combine("sum", total, to_num(a)?, i64::checked_add, |a, b| a + b)?;
        }
        Ok(total.into_value())
    });
    r.register("product", "product of all arguments", Param::None, |args, _| {
        let mut total = Num::Int(1);
        for a in args {
            total = combine("product", total, to_num(a)?, i64::checked_mul, |a, b| a * b)?;
        }
        Ok(total.into_value())
    });
    r.register("negate", "first argument negated", Param::None, |args, _| {
        let negated = match to_num(arg(args, 0)?)? {
            Num::Int(i) => Num::Int(
                i.checked_neg()
                    .ok_or(LeafError::NumericOverflow("negate"))?,
            ),
            Num::Float(x) => Num::Float(-x),
        };
        Ok(negated.into_value())
    });
    r.register("not", "boolean negation of the first argument", Param::None, |args, _| {
        let v = arg(args, 0)?;
        v.as_bool().map(|b| Value::Bool(!b)).ok_or(LeafError::WrongType {
            expected: "bool",
            found: kind_of(v),
        })
    });
    r.register("len", "length of a string, array or object", Param::None, |args, _| {
        let v = arg(args, 0)?;
        let n = match v {
            Value::String(s) => s.chars().count(),
            Value::Array(a) => a.len(),
            Value::Object(o) => o.len(),
            other => {
                return Err(LeafError::WrongType {
                    expected: "string, array or object",
                    found: kind_of(other),
                });
            }
        };
        Ok(Value::from(n))
    });
    r.register("upper", "first argument uppercased", Param::None, |args, _| {
        Ok(Value::String(as_str(arg(args, 0)?)?.to_uppercase()))
    });
    r.register("lower", "first argument lowercased", Param::None, |args, _| {
        Ok(Value::String(as_str(arg(args, 0)?)?.to_lowercase()))
    });
    r.register("concat", "all arguments joined as strings", Param::None, |args, _| {
        let mut out = String::new();
        for a in args {
            match a {
                Value::String(s) => out.push_str(s),
                other => out.push_str(&other.to_string()),
            }
        }
        Ok(Value::String(out))
    });
    r.register("get", "field of the first argument: get(\"key\")", Param::Required, |args, p| {
        let key = param(p, "get")?
            .as_str()
            .ok_or_else(|| bad_param("string", p))?;
        let v = arg(args, 0)?;
        let obj = v.as_object().ok_or(LeafError::WrongType {
            expected: "object",
            found: kind_of(v),
        })?;
        obj.get(key)
            .cloned()
            .ok_or_else(|| LeafError::MissingField(key.to_string()))
    });
    r.register(
        "pointer",
        "JSON pointer into the first argument: pointer(\"/a/b\")",
        Param::Required,
        |args, p| {
            let ptr = param(p, "pointer")?
                .as_str()
                .ok_or_else(|| bad_param("string", p))?;
            arg(args, 0)?
                .pointer(ptr)
                .cloned()
                .ok_or_else(|| LeafError::MissingField(ptr.to_string()))
        },
    );
}

fn arg(args: &[Value], index: usize) -> Result<&Value, LeafError> {
    args.get(index).ok_or(LeafError::MissingArgument {
        index,
        got: args.len(),
    })
}

fn param<'a>(p: Option<&'a Value>, name: &'static str) -> Result<&'a Value, LeafError> {
    p.ok_or(LeafError::MissingParameter(name))
}

fn bad_param(expected: &'static str, p: Option<&Value>) -> LeafError {
    LeafError::BadParameter {
        expected,
        found: p.map(kind_of).unwrap_or("nothing"),
    }
}

/// JSON number kept as an exact integer whenever it fits in i64.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    fn as_f64(self) -> f64 {
        match self {
            Num::Int(i) => i as f64,
            Num::Float(x) => x,
        }
    }

    /// Whole floats within the exactly representable range render as integers,
    /// so `1.5 * 2` gives `3`, not `3.0`.
    fn into_value(self) -> Value {
        const EXACT: f64 = 9_007_199_254_740_992.0; // 2^53
        match self {
            Num::Int(i) => Value::from(i),
            Num::Float(x) if x.fract() == 0.0 && x.abs() <= EXACT => Value::from(x as i64),
            Num::Float(x) => Value::from(x),
        }
    }
}

fn to_num(v: &Value) -> Result<Num, LeafError> {
    match v {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Num::Int(i))
            } else if n.is_u64() {
                // Above i64::MAX; f64 would silently round it.
                Err(LeafError::NumericOverflow("integer argument"))
            } else {
                n.as_f64()
                    .map(Num::Float)
                    .ok_or(LeafError::NumericOverflow("number argument"))
            }
        }
        other => Err(LeafError::WrongType {
            expected: "number",
            found: kind_of(other),
        }),
    }
}

fn number_param(p: Option<&Value>, name: &'static str) -> Result<Num, LeafError> {
    match param(p, name)? {
        v @ Value::Number(_) => to_num(v),
        _ => Err(bad_param("number", p)),
    }
}

/// Integer operands use the checked op; anything else goes through f64 and
/// must stay finite.
fn combine(
    op: &'static str,
    a: Num,
    b: Num,
    int: fn(i64, i64) -> Option<i64>,
    float: fn(f64, f64) -> f64,
) -> Result<Num, LeafError> {
    match (a, b) {
        (Num::Int(x), Num::Int(y)) => int(x, y)
            .map(Num::Int)
            .ok_or(LeafError::NumericOverflow(op)),
        _ => {
            let r = float(a.as_f64(), b.as_f64());
            if r.is_finite() {
                Ok(Num::Float(r))
            } else {
                Err(LeafError::NumericOverflow(op))
            }
        }
    }
}

fn as_str(v: &Value) -> Result<&str, LeafError> {
    v.as_str().ok_or(LeafError::WrongType {
        expected: "string",
        found: kind_of(v),
    })
}
