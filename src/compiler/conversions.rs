//! The numeric conversion table.
//!
//! Explicit `as` conversions and every implicit coercion the emitter inserts
//! go through [`conversion_instruction`]. Float to integer pairs are not in
//! the table; asking for one is an error.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::{
    ast::types::NumType,
    errors::errors::{Error, ErrorImpl},
    Position,
};

lazy_static! {
    static ref CONVERSIONS: HashMap<(NumType, NumType), &'static str> = {
        let mut map = HashMap::new();
        map.insert((NumType::I32, NumType::I64), "i64.extend_i32_s");
        map.insert((NumType::I64, NumType::I32), "i32.wrap_i64");
        map.insert((NumType::F32, NumType::F64), "f64.promote_f32");
        map.insert((NumType::F64, NumType::F32), "f32.demote_f64");
        map.insert((NumType::I32, NumType::F32), "f32.convert_i32_s");
        map.insert((NumType::I32, NumType::F64), "f64.convert_i32_s");
        map.insert((NumType::I64, NumType::F32), "f32.convert_i64_s");
        map.insert((NumType::I64, NumType::F64), "f64.convert_i64_s");
        map
    };
}

/// The single instruction converting `from` to `to`.
///
/// Returns `Ok(None)` for identity pairs.
///
/// # Errors
///
/// `UnsupportedConversion` for any pair outside the table.
pub fn conversion_instruction(
    from: NumType,
    to: NumType,
    position: &Position,
) -> Result<Option<&'static str>, Error> {
    if from == to {
        return Ok(None);
    }

    CONVERSIONS
        .get(&(from, to))
        .copied()
        .map(Some)
        .ok_or_else(|| {
            Error::new(
                ErrorImpl::UnsupportedConversion { from, to },
                position.clone(),
            )
        })
}
