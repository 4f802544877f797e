use crate::error::EncodeError;
use crate::model::{EntityId, IdentityResolver, Value};

use super::string::encode_string;

/// Written for any unset value.
pub const NULL_TOKEN: &str = "$";

/// Written for an attribute derived in a subtype.
pub const DERIVED_TOKEN: &str = "*";

/// Fractional digits kept when a real is not a whole number.
const REAL_FRACTION_DIGITS: usize = 5;

/// Output switches for [`StepEncoder`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Write a comma after every list element, including the last:
    /// `(1,2,3,)`. Only for consumers that expect that legacy form.
    pub trailing_comma: bool,
}

/// Encodes values to STEP literals, resolving references through `R`.
#[derive(Debug)]
pub struct StepEncoder<'a, R: ?Sized> {
    resolver: &'a R,
    options: EncodeOptions,
}

impl<'a, R: IdentityResolver + ?Sized> StepEncoder<'a, R> {
    #[must_use]
    pub fn new(resolver: &'a R) -> Self {
        Self {
            resolver,
            options: EncodeOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: EncodeOptions) -> Self {
        self.options = options;
        self
    }

    /// Encodes `value`. `in_select` is set when the value fills a SELECT
    /// attribute and is passed down to every nested value.
    pub fn encode(&self, value: &Value, in_select: bool) -> Result<String, EncodeError> {
        let mut out = String::new();
        self.encode_into(&mut out, value, in_select)?;
        Ok(out)
    }

    fn encode_into(
        &self,
        out: &mut String,
        value: &Value,
        in_select: bool,
    ) -> Result<(), EncodeError> {
        match value {
            Value::Null => out.push_str(NULL_TOKEN),
            Value::Derived => out.push_str(DERIVED_TOKEN),
            Value::String(s) => out.push_str(&encode_string(s)),
            Value::Boolean(b) => out.push_str(encode_boolean(Some(*b))),
            Value::Integer(i) => out.push_str(&encode_integer(*i)),
            Value::Real(x) => out.push_str(&encode_real(*x)?),
            Value::Enum(member) => out.push_str(&encode_enum(member)),
            Value::Bytes(bytes) => out.push_str(&encode_bytes(bytes)),
            Value::Reference(id) => self.encode_reference(out, *id)?,
            Value::List(items) => {
                out.push('(');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    self.encode_into(out, item, in_select)?;
                }
                if self.options.trailing_comma && !items.is_empty() {
                    out.push(',');
                }
                out.push(')');
            }
            Value::Typed { type_name, value } => {
                if in_select {
                    out.push_str(&type_name.to_uppercase());
                    out.push('(');
                    self.encode_into(out, value, in_select)?;
                    out.push(')');
                } else {
                    self.encode_into(out, value, in_select)?;
                }
            }
            Value::Select(value) => self.encode_into(out, value, true)?,
        }
        Ok(())
    }

    fn encode_reference(&self, out: &mut String, id: EntityId) -> Result<(), EncodeError> {
        let identity = self
            .resolver
            .identity(id)
            .ok_or(EncodeError::DanglingReference { entity: id })?;

        let number = identity
            .record_number()
            .ok_or(EncodeError::UnassignedReference { entity: id })?;

        out.push_str(&number.to_string());
        Ok(())
    }
}

/// Encodes one value with default options.
pub fn encode<R: IdentityResolver + ?Sized>(
    value: &Value,
    in_select: bool,
    resolver: &R,
) -> Result<String, EncodeError> {
    StepEncoder::new(resolver).encode(value, in_select)
}

/// `.T.`, `.F.`, or `$` for an unset boolean.
#[must_use]
pub fn encode_boolean(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => ".T.",
        Some(false) => ".F.",
        None => NULL_TOKEN,
    }
}

#[must_use]
pub fn encode_enum(member: &str) -> String {
    format!(".{}.", member.to_uppercase())
}

#[must_use]
pub fn encode_integer(value: i64) -> String {
    value.to_string()
}

/// Encodes a real so it always carries a decimal point.
///
/// Whole numbers get `.0`; anything else is rounded to 5 fractional digits
/// with trailing zeros dropped.
pub fn encode_real(value: f64) -> Result<String, EncodeError> {
    if !value.is_finite() {
        return Err(EncodeError::NonFiniteReal { value });
    }

    let formatted = if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        let rounded = format!("{value:.prec$}", prec = REAL_FRACTION_DIGITS);
        let trimmed = rounded.trim_end_matches('0');
        if trimmed.ends_with('.') {
            format!("{trimmed}0")
        } else {
            trimmed.to_string()
        }
    };

    if formatted == "-0.0" {
        return Ok("0.0".to_string());
    }
    Ok(formatted)
}

/// Bracketed list of the raw byte values, e.g. `[1,2,255]`.
#[must_use]
pub fn encode_bytes(bytes: &[u8]) -> String {
    let items: Vec<String> = bytes.iter().map(u8::to_string).collect();
    format!("[{}]", items.join(","))
}
