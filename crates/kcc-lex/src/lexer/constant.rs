//! Constant recogniser: the number DFA (integer and floating constants)
//! and the character-constant value parser.
//!
//! States, per the spec: `START`, `DIGIT_SEQUENCE`, `HEX_PREFIX`,
//! `OCTAL_CONSTANT`, `DECIMAL_CONSTANT`, `HEX_CONSTANT`, `INTEGER_SUFFIX`,
//! `FRACTIONAL_CONSTANT`, `HEX_FRACTIONAL_CONSTANT`, `EXPONENT_PART`,
//! `FLOATING_CONSTANT`, `END_SUCCESS`, `END_FAIL`. Floating recognition is
//! always attempted before the octal-digit check fires, which is why
//! `0129e+0129` parses as a decimal floating constant rather than failing
//! on the `9` the way `09` does as a plain octal integer (§9 note 6).

use crate::token::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum ConstantResult {
    Integer(i64),
    Float(f64),
    CharacterConstant(i64),
    Invalid,
}

impl ConstantResult {
    pub fn into_value(self) -> Option<Value> {
        match self {
            ConstantResult::Integer(i) => Some(Value::Int(i)),
            ConstantResult::CharacterConstant(i) => Some(Value::Int(i)),
            ConstantResult::Float(f) => Some(Value::Float(f)),
            ConstantResult::Invalid => None,
        }
    }
}

/// Recognises a `PP_NUMBER`-shaped lexeme as an integer or floating
/// constant, applying suffixes.
pub fn recognise_number(text: &str) -> ConstantResult {
    if let Some(stripped) = strip_hex_prefix(text) {
        return recognise_hex(stripped);
    }
    recognise_decimal_or_octal(text)
}

fn strip_hex_prefix(text: &str) -> Option<&str> {
    if text.len() > 2 && (text.starts_with("0x") || text.starts_with("0X")) {
        Some(&text[2..])
    } else {
        None
    }
}

fn recognise_hex(body: &str) -> ConstantResult {
    let bytes = body.as_bytes();
    let mut i = 0;
    while i < bytes.len() && (bytes[i] as char).is_ascii_hexdigit() {
        i += 1;
    }
    let int_digits = i;
    let mut saw_dot = false;
    if i < bytes.len() && bytes[i] == b'.' {
        saw_dot = true;
        i += 1;
        while i < bytes.len() && (bytes[i] as char).is_ascii_hexdigit() {
            i += 1;
        }
    }
    let frac_digits_present = saw_dot && i > int_digits + 1;
    if int_digits == 0 && !frac_digits_present {
        return ConstantResult::Invalid;
    }

    let has_exponent = i < bytes.len() && (bytes[i] == b'p' || bytes[i] == b'P');
    if saw_dot || has_exponent {
        // Hex floating constant: requires a binary exponent.
        if !has_exponent {
            return ConstantResult::Invalid;
        }
        let mantissa_end = i;
        i += 1;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return ConstantResult::Invalid;
        }
        let suffix_start = i;
        if !valid_float_suffix(&body[suffix_start..]) {
            return ConstantResult::Invalid;
        }
        let mantissa = &body[..mantissa_end];
        let value = parse_hex_float(mantissa, &body[mantissa_end + 1..suffix_start]);
        return value.map(ConstantResult::Float).unwrap_or(ConstantResult::Invalid);
    }

    // Plain hex integer.
    let suffix_start = int_digits;
    if !valid_integer_suffix(&body[suffix_start..]) {
        return ConstantResult::Invalid;
    }
    match i64::from_str_radix(&body[..int_digits], 16) {
        Ok(v) => ConstantResult::Integer(v),
        Err(_) => match u64::from_str_radix(&body[..int_digits], 16) {
            Ok(v) => ConstantResult::Integer(v as i64),
            Err(_) => ConstantResult::Invalid,
        },
    }
}

fn parse_hex_float(mantissa: &str, exponent: &str) -> Option<f64> {
    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((i, f)) => (i, f),
        None => (mantissa, ""),
    };
    let mut value = 0f64;
    for c in int_part.chars() {
        value = value * 16.0 + c.to_digit(16)? as f64;
    }
    let mut scale = 1f64 / 16.0;
    for c in frac_part.chars() {
        value += c.to_digit(16)? as f64 * scale;
        scale /= 16.0;
    }
    let exp: i32 = exponent.parse().ok()?;
    Some(value * 2f64.powi(exp))
}

fn recognise_decimal_or_octal(text: &str) -> ConstantResult {
    let bytes = text.as_bytes();
    if bytes.is_empty() {
        return ConstantResult::Invalid;
    }
    let mut i = 0;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let digit_end = i;

    let mut saw_dot = false;
    if i < bytes.len() && bytes[i] == b'.' {
        saw_dot = true;
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
    }
    let frac_end = i;
    let has_exponent = i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E');

    if saw_dot || has_exponent {
        let mut exp_ok = true;
        if has_exponent {
            i += 1;
            if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
                i += 1;
            }
            let exp_start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            exp_ok = i > exp_start;
        }
        if !exp_ok {
            return ConstantResult::Invalid;
        }
        if digit_end == 0 && frac_end == 1 {
            // Lone '.' with no digits at all either side.
            return ConstantResult::Invalid;
        }
        if !valid_float_suffix(&text[i..]) {
            return ConstantResult::Invalid;
        }
        return match text[..i].trim_end_matches(['f', 'F', 'l', 'L']).parse::<f64>() {
            Ok(v) => ConstantResult::Float(v),
            Err(_) => ConstantResult::Invalid,
        };
    }

    // Pure integer: decimal or octal.
    let suffix_start = digit_end;
    if !valid_integer_suffix(&text[suffix_start..]) {
        return ConstantResult::Invalid;
    }
    let digits = &text[..digit_end];
    if digits.len() > 1 && digits.starts_with('0') {
        // Octal: every digit after the leading 0 must be 0-7.
        if digits[1..].bytes().any(|b| b > b'7') {
            return ConstantResult::Invalid;
        }
        return match i64::from_str_radix(&digits[1..], 8) {
            Ok(v) => ConstantResult::Integer(v),
            Err(_) => ConstantResult::Invalid,
        };
    }
    match digits.parse::<i64>() {
        Ok(v) => ConstantResult::Integer(v),
        Err(_) => match digits.parse::<u64>() {
            Ok(v) => ConstantResult::Integer(v as i64),
            Err(_) => ConstantResult::Invalid,
        },
    }
}

/// Accepts at most one `u`/`U` and at most one length marker among
/// `l`/`L`/`ll`/`LL`, in either order — the "simplifications" §9 allows.
fn valid_integer_suffix(suffix: &str) -> bool {
    let mut u_count = 0;
    let mut l_count = 0;
    for c in suffix.chars() {
        match c {
            'u' | 'U' => u_count += 1,
            'l' | 'L' => l_count += 1,
            _ => return false,
        }
    }
    u_count <= 1 && l_count <= 2
}

fn valid_float_suffix(suffix: &str) -> bool {
    matches!(suffix, "" | "f" | "F" | "l" | "L")
}

/// Recognises a `CHARACTER_CONSTANT`-shaped lexeme (`'...'`, optionally
/// `L`-prefixed) and folds its escape-decoded bytes into an integer value.
/// Multi-character constants fold left-to-right, matching the common
/// (implementation-defined) GCC/Clang behaviour.
pub fn recognise_character_constant(text: &str) -> ConstantResult {
    let body = text.strip_prefix('L').unwrap_or(text);
    let Some(inner) = body.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')) else {
        return ConstantResult::Invalid;
    };
    if inner.is_empty() {
        return ConstantResult::Invalid;
    }
    let mut chars = inner.chars().peekable();
    let mut value: i64 = 0;
    let mut any = false;
    while let Some(c) = chars.next() {
        let byte = if c == '\\' {
            match decode_escape(&mut chars) {
                Some(b) => b,
                None => return ConstantResult::Invalid,
            }
        } else {
            c as i64
        };
        value = (value << 8) | (byte & 0xFF);
        any = true;
    }
    if !any {
        return ConstantResult::Invalid;
    }
    ConstantResult::CharacterConstant(value)
}

/// Decodes a single escape sequence (the `\` has already been consumed),
/// shared by character constants and string literals.
pub fn decode_escape(chars: &mut std::iter::Peekable<std::str::Chars>) -> Option<i64> {
    let c = chars.next()?;
    Some(match c {
        '\'' => b'\'' as i64,
        '"' => b'"' as i64,
        '?' => b'?' as i64,
        '\\' => b'\\' as i64,
        'a' => 0x07,
        'b' => 0x08,
        'f' => 0x0C,
        'n' => b'\n' as i64,
        'r' => b'\r' as i64,
        't' => b'\t' as i64,
        'v' => 0x0B,
        'x' => {
            let mut v: i64 = 0;
            let mut any = false;
            while let Some(d) = chars.peek().and_then(|c| c.to_digit(16)) {
                v = v * 16 + d as i64;
                chars.next();
                any = true;
            }
            if !any {
                return None;
            }
            v
        }
        '0'..='7' => {
            let mut v = c.to_digit(8)? as i64;
            for _ in 0..2 {
                match chars.peek().and_then(|c| c.to_digit(8)) {
                    Some(d) => {
                        v = v * 8 + d as i64;
                        chars.next();
                    }
                    None => break,
                }
            }
            v
        }
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_integer_e1() {
        assert_eq!(recognise_number("0xDEADBEEF"), ConstantResult::Integer(0xDEADBEEFu32 as i64));
    }

    #[test]
    fn octal_rejects_digit_nine() {
        assert_eq!(recognise_number("09"), ConstantResult::Invalid);
    }

    #[test]
    fn plain_octal_is_valid() {
        assert_eq!(recognise_number("017"), ConstantResult::Integer(15));
    }

    #[test]
    fn decimal_floating_with_exponent() {
        match recognise_number("1.54334e+34") {
            ConstantResult::Float(f) => assert!((f - 1.54334e+34).abs() / 1.54334e+34 < 1e-9),
            other => panic!("expected float, got {:?}", other),
        }
    }

    #[test]
    fn nine_after_leading_zero_then_exponent_is_floating_not_octal_error() {
        // §9 note 6: try floating recognition before raising the octal error.
        match recognise_number("0129e+0129") {
            ConstantResult::Float(_) => {}
            other => panic!("expected float, got {:?}", other),
        }
    }

    #[test]
    fn integer_suffix_combinations_accepted() {
        assert_eq!(recognise_number("42UL"), ConstantResult::Integer(42));
        assert_eq!(recognise_number("42lu"), ConstantResult::Integer(42));
        assert_eq!(recognise_number("42ULL"), ConstantResult::Integer(42));
    }

    #[test]
    fn character_constant_single_char() {
        assert_eq!(recognise_character_constant("'a'"), ConstantResult::CharacterConstant(97));
    }

    #[test]
    fn character_constant_escape() {
        assert_eq!(recognise_character_constant("'\\n'"), ConstantResult::CharacterConstant(10));
    }

    #[test]
    fn character_constant_hex_escape() {
        assert_eq!(recognise_character_constant("'\\x41'"), ConstantResult::CharacterConstant(0x41));
    }

    #[test]
    fn wide_character_constant_prefix_accepted() {
        assert_eq!(recognise_character_constant("L'a'"), ConstantResult::CharacterConstant(97));
    }

    #[test]
    fn unterminated_shape_is_invalid() {
        assert_eq!(recognise_character_constant("'a"), ConstantResult::Invalid);
    }

    #[test]
    fn hex_floating_constant() {
        match recognise_number("0x1.8p3") {
            ConstantResult::Float(f) => assert!((f - 12.0).abs() < 1e-9),
            other => panic!("expected float, got {:?}", other),
        }
    }
}
