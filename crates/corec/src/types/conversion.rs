//! The numeric conversion policy (spec §4.5.3).
//!
//! Recovered verbatim from the original implementation's
//! `type_conversions[14][14]` table in `FunctionAnalyser.cpp`, including its
//! asymmetries — this is not a re-derivation from first principles, it is
//! the literal matrix the original analyser consults on every assignment
//! and condition-check.

use crate::diag::DiagnosticId;
use crate::types::BuiltinKind;

/// One cell of the conversion matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionRule {
    /// Exact, widening, or identity conversion. No diagnostic.
    Ok,
    /// Narrowing an integer to a smaller integer type.
    IntegerPrecisionLoss,
    /// Changing signedness between integer types of matching rank.
    SignConversion,
    /// Converting a floating-point value to an integer type.
    FloatToInteger,
    /// The two types cannot be converted at all.
    Incompatible,
    /// Narrowing `f64` to `f32`.
    FloatPrecisionLoss,
}

impl ConversionRule {
    /// The diagnostic raised for this rule, or `None` for [`ConversionRule::Ok`].
    pub fn diagnostic_id(self) -> Option<DiagnosticId> {
        match self {
            ConversionRule::Ok => None,
            ConversionRule::IntegerPrecisionLoss => Some(DiagnosticId::warn_impcast_integer_precision),
            ConversionRule::SignConversion => Some(DiagnosticId::warn_impcast_integer_sign),
            ConversionRule::FloatToInteger => Some(DiagnosticId::warn_impcast_float_integer),
            ConversionRule::Incompatible => Some(DiagnosticId::err_illegal_type_conversion),
            ConversionRule::FloatPrecisionLoss => Some(DiagnosticId::warn_impcast_float_precision),
        }
    }

    pub fn is_error(self) -> bool {
        matches!(self, ConversionRule::Incompatible)
    }

    fn from_code(code: u8) -> Self {
        match code {
            0 => ConversionRule::Ok,
            1 => ConversionRule::IntegerPrecisionLoss,
            2 => ConversionRule::SignConversion,
            3 => ConversionRule::FloatToInteger,
            4 => ConversionRule::Incompatible,
            5 => ConversionRule::FloatPrecisionLoss,
            _ => unreachable!("conversion matrix only contains codes 0-5"),
        }
    }
}

// 0 = ok, 1 = loss of precision, 2 = sign-conversion, 3 = float->integer,
// 4 = incompatible, 5 = loss of FP precision.
//
// Row/column order: U8, U16, U32, U64, I8, I16, I32, I64, F32, F64, INT,
// BOOL, STRING, VOID. `INT` is treated as `I32` for width purposes (spec
// §4.5.3's open question on 64-bit targets is intentionally left as-is).
#[rustfmt::skip]
const MATRIX: [[u8; 14]; 14] = [
    // U8 ->
    [0, 0, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0, 4, 4],
    // U16 ->
    [1, 0, 0, 0, 1, 2, 0, 0, 0, 0, 0, 0, 4, 4],
    // U32 ->
    [1, 1, 0, 0, 1, 1, 2, 0, 0, 0, 2, 0, 4, 4],
    // U64 ->
    [1, 1, 1, 0, 1, 1, 1, 2, 0, 0, 1, 0, 4, 4],
    // I8 ->
    [2, 2, 2, 2, 0, 0, 0, 0, 0, 0, 0, 0, 4, 4],
    // I16 ->
    [2, 2, 2, 2, 1, 0, 0, 0, 0, 0, 0, 0, 4, 4],
    // I32 ->
    [2, 2, 2, 2, 1, 1, 0, 0, 0, 0, 0, 0, 4, 4],
    // I64 ->
    [2, 2, 2, 2, 1, 1, 1, 0, 0, 0, 1, 0, 4, 4],
    // F32 ->
    [3, 3, 3, 3, 3, 3, 3, 3, 0, 1, 3, 4, 4, 4],
    // F64 ->
    [3, 3, 3, 3, 3, 3, 3, 3, 5, 0, 3, 4, 4, 4],
    // INT -> (depends on target, for now take I32)
    [2, 2, 2, 2, 1, 1, 0, 0, 0, 0, 0, 0, 4, 4],
    // BOOL ->
    [0, 0, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0, 4, 4],
    // STRING -> (only to itself)
    [4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 0, 4],
    // VOID -> (only to itself)
    [4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 0],
];

/// Looks up the conversion rule for converting a value of builtin type
/// `from` to builtin type `to`.
///
/// Non-builtin conversions (struct-to-struct, pointer arithmetic, etc.) are
/// not modeled by this matrix at all; callers only consult it once both
/// sides have resolved to a [`BuiltinKind`] (spec §4.5.3: "non-builtin
/// conversions fall through silently in this version").
pub fn convert(from: BuiltinKind, to: BuiltinKind) -> ConversionRule {
    ConversionRule::from_code(MATRIX[from as usize][to as usize])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_conversions_are_always_ok() {
        for kind in BuiltinKind::ALL {
            assert_eq!(convert(kind, kind), ConversionRule::Ok, "{kind:?} -> {kind:?} should be Ok");
        }
    }

    #[test]
    fn s3_lossy_integer_narrowing_warns() {
        // i32 a = 300000; i8 b = a; -> warn_impcast_integer_precision
        assert_eq!(convert(BuiltinKind::I32, BuiltinKind::I8), ConversionRule::IntegerPrecisionLoss);
    }

    #[test]
    fn string_and_void_are_incompatible_with_everything_else() {
        for kind in BuiltinKind::ALL {
            if kind != BuiltinKind::Str {
                assert_eq!(convert(BuiltinKind::Str, kind), ConversionRule::Incompatible);
            }
            if kind != BuiltinKind::Void {
                assert_eq!(convert(BuiltinKind::Void, kind), ConversionRule::Incompatible);
            }
        }
    }

    #[test]
    fn incompatibility_is_symmetric_except_for_string_and_void_rows() {
        // Invariant 5 (spec §8): matrix[a][b] == Incompatible iff matrix[b][a]
        // == Incompatible, for all non-VOID pairs, with STRING/VOID excluded.
        for a in BuiltinKind::ALL {
            for b in BuiltinKind::ALL {
                if a == BuiltinKind::Str || b == BuiltinKind::Str || a == BuiltinKind::Void || b == BuiltinKind::Void {
                    continue;
                }
                assert_eq!(
                    convert(a, b).is_error(),
                    convert(b, a).is_error(),
                    "{a:?} <-> {b:?} incompatibility is not symmetric"
                );
            }
        }
    }
}
