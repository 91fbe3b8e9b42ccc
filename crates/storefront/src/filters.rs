//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Renders a 1-5 rating as filled and hollow stars.
///
/// Usage in templates: `{{ product.rating|stars }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn stars(rating: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let filled = rating.to_string().parse::<usize>().unwrap_or(0).min(5);
    let mut out = String::new();
    for _ in 0..filled {
        out.push('★');
    }
    for _ in filled..5 {
        out.push('☆');
    }
    Ok(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_stars_renders_filled_and_hollow() {
        assert_eq!(stars::default().execute(3_u8, &()).unwrap(), "★★★☆☆");
        assert_eq!(stars::default().execute(5_u8, &()).unwrap(), "★★★★★");
        assert_eq!(stars::default().execute(1_u8, &()).unwrap(), "★☆☆☆☆");
    }

    #[test]
    fn test_stars_clamps_out_of_range_input() {
        assert_eq!(stars::default().execute(9_u8, &()).unwrap(), "★★★★★");
        assert_eq!(stars::default().execute("not a number", &()).unwrap(), "☆☆☆☆☆");
    }
}
