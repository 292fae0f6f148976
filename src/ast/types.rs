//! Type system definitions for the AST.
//!
//! The language has a closed set of four numeric types ordered by a fixed
//! widening priority: `i32 < i64 < f32 < f64`. Strings and pointers are plain
//! `i32` linear-memory addresses at this level.
//!
//! Unification never produces instructions; it only decides which type two
//! values meet at. Lowering between types is the emitter's job.

use std::fmt::Display;

/// Represents numeric types with different precisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumType {
    I32,
    I64,
    F32,
    F64,
}

impl NumType {
    pub const ALL: [NumType; 4] = [NumType::I32, NumType::I64, NumType::F32, NumType::F64];

    /// Widening priority, higher is wider.
    pub fn priority(self) -> u8 {
        match self {
            NumType::I32 => 0,
            NumType::I64 => 1,
            NumType::F32 => 2,
            NumType::F64 => 3,
        }
    }

    pub fn is_float(self) -> bool {
        matches!(self, NumType::F32 | NumType::F64)
    }

    pub fn is_integer(self) -> bool {
        !self.is_float()
    }

    /// The instruction-family prefix for this type.
    pub fn wat(self) -> &'static str {
        match self {
            NumType::I32 => "i32",
            NumType::I64 => "i64",
            NumType::F32 => "f32",
            NumType::F64 => "f64",
        }
    }

    /// Resolves a source-level type name.
    pub fn from_name(name: &str) -> Option<NumType> {
        match name {
            "i32" => Some(NumType::I32),
            "i64" => Some(NumType::I64),
            "f32" => Some(NumType::F32),
            "f64" => Some(NumType::F64),
            _ => None,
        }
    }

    /// The smallest signed integer type that holds `value`.
    pub fn for_int_literal(value: i64) -> NumType {
        if i32::try_from(value).is_ok() {
            NumType::I32
        } else {
            NumType::I64
        }
    }

    /// Float literals are `f32` unless the context asks for `f64`.
    pub fn for_float_literal(expected: Option<NumType>) -> NumType {
        match expected {
            Some(NumType::F64) => NumType::F64,
            _ => NumType::F32,
        }
    }
}

impl Display for NumType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.wat())
    }
}

/// Returns the wider of two types. Missing types count as `i32`.
pub fn unify(left: Option<NumType>, right: Option<NumType>) -> NumType {
    let left = left.unwrap_or(NumType::I32);
    let right = right.unwrap_or(NumType::I32);

    if right.priority() > left.priority() {
        right
    } else {
        left
    }
}

/// Unifies a value into an assignment target.
///
/// A `fixed` target (declared with a type annotation, or a parameter) only
/// accepts values that unify to exactly its declared type. Returns `None` when
/// the value would have to narrow the target.
pub fn unify_for_assignment(declared: NumType, value: NumType, fixed: bool) -> Option<NumType> {
    let widened = unify(Some(declared), Some(value));

    if fixed && widened != declared {
        None
    } else {
        Some(widened)
    }
}

/// Literal payloads, kept separate from their inferred width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiteralValue {
    Int(i64),
    Float(f64),
}

impl LiteralValue {
    /// Renders the literal for a `<type>.const` instruction.
    ///
    /// Integers print as bare decimals. Floats always keep a decimal point,
    /// so a whole `0` float renders as `0.0`.
    pub fn render(&self, ty: NumType) -> String {
        match (self, ty.is_float()) {
            (LiteralValue::Int(value), false) => value.to_string(),
            (LiteralValue::Int(value), true) => render_float(*value as f64),
            (LiteralValue::Float(value), true) => render_float(*value),
            (LiteralValue::Float(value), false) => (value.trunc() as i64).to_string(),
        }
    }
}

pub fn render_float(value: f64) -> String {
    if value.is_nan() {
        return String::from("nan");
    }
    if value.is_infinite() {
        return String::from(if value > 0.0 { "inf" } else { "-inf" });
    }

    let text = value.to_string();
    if text.contains('.') {
        text
    } else {
        format!("{}.0", text)
    }
}
