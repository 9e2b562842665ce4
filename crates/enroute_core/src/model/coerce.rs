//! Loose value coercion shared by the normalizers.

use serde_json::Value;

/// Numeric reading of a loosely-typed field, following JavaScript `Number()`.
///
/// `None` stands for "not a number". Null, `false` and blank strings read as 0,
/// `true` as 1; non-finite results are not numbers.
pub(crate) fn loose_number(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Null => Some(0.0),
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        Value::Number(number) => number.as_f64(),
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                Some(0.0)
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        Value::Array(_) | Value::Object(_) => None,
    };
    number.filter(|number| number.is_finite())
}

/// Loose number clamped to `>= 0`; anything unusable becomes 0.
pub(crate) fn non_negative(value: Option<&Value>) -> f64 {
    loose_number(value)
        .filter(|number| *number > 0.0)
        .unwrap_or(0.0)
}

pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::{loose_number, non_negative};
    use serde_json::json;

    #[test]
    fn loose_number_follows_js_number_rules() {
        assert_eq!(loose_number(Some(&json!(12.5))), Some(12.5));
        assert_eq!(loose_number(Some(&json!(" 42 "))), Some(42.0));
        assert_eq!(loose_number(Some(&json!(""))), Some(0.0));
        assert_eq!(loose_number(Some(&json!(true))), Some(1.0));
        assert_eq!(loose_number(Some(&json!(null))), Some(0.0));
        assert_eq!(loose_number(Some(&json!("abc"))), None);
        assert_eq!(loose_number(Some(&json!("NaN"))), None);
        assert_eq!(loose_number(Some(&json!("inf"))), None);
        assert_eq!(loose_number(Some(&json!([1]))), None);
        assert_eq!(loose_number(None), None);
    }

    #[test]
    fn non_negative_drops_negatives() {
        assert_eq!(non_negative(Some(&json!(-3))), 0.0);
        assert_eq!(non_negative(Some(&json!("7"))), 7.0);
    }
}
