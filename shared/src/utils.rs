// Formatting helpers shared by the table and chart renderers.

/// Formats an optional value with a fixed number of decimals; `None` renders
/// as an empty string.
pub fn format_optional(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.decimals$}", v, decimals = decimals),
        _ => String::new(),
    }
}

/// Smallest and largest finite value over all given series.
pub fn value_range<'a, I>(series: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = &'a [Option<f64>]>,
{
    let mut range: Option<(f64, f64)> = None;
    for values in series {
        for v in values.iter().flatten().filter(|v| v.is_finite()) {
            range = Some(match range {
                Some((lo, hi)) => (lo.min(*v), hi.max(*v)),
                None => (*v, *v),
            });
        }
    }
    range
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_optional() {
        assert_eq!(format_optional(Some(2.0), 2), "2.00");
        assert_eq!(format_optional(Some(123.456), 1), "123.5");
        assert_eq!(format_optional(None, 2), "");
        assert_eq!(format_optional(Some(f64::NAN), 2), "");
    }

    #[test]
    fn test_value_range_skips_missing() {
        let a = [None, Some(3.0), Some(1.5)];
        let b = [Some(4.0), None];
        assert_eq!(value_range([&a[..], &b[..]]), Some((1.5, 4.0)));
    }

    #[test]
    fn test_value_range_empty() {
        let a: [Option<f64>; 2] = [None, None];
        assert_eq!(value_range([&a[..]]), None);
    }
}
