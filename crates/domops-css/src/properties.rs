//! CSS Property Definitions
//!
//! Lengths, inheritance and initial values for the properties the cascade
//! and layout care about. Unknown properties are carried as plain strings.

/// Length value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length {
    pub value: f64,
    pub unit: LengthUnit,
}

/// Length units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnit {
    Px,
    Em,
    Rem,
    Percent,
}

impl Length {
    pub fn px(value: f64) -> Self {
        Self { value, unit: LengthUnit::Px }
    }

    pub fn em(value: f64) -> Self {
        Self { value, unit: LengthUnit::Em }
    }

    pub fn percent(value: f64) -> Self {
        Self { value, unit: LengthUnit::Percent }
    }

    pub fn zero() -> Self {
        Self::px(0.0)
    }

    /// Parse `12px`, `1.5em`, `2rem`, `50%` or a unitless `0`
    ///
    /// `auto`, keywords and anything unparsable yield `None`.
    pub fn parse(input: &str) -> Option<Self> {
        let s = input.trim().to_ascii_lowercase();
        let (number, unit) = if let Some(n) = s.strip_suffix("px") {
            (n, LengthUnit::Px)
        } else if let Some(n) = s.strip_suffix("rem") {
            (n, LengthUnit::Rem)
        } else if let Some(n) = s.strip_suffix("em") {
            (n, LengthUnit::Em)
        } else if let Some(n) = s.strip_suffix('%') {
            (n, LengthUnit::Percent)
        } else {
            // only zero may drop its unit
            return match s.parse::<f64>() {
                Ok(v) if v == 0.0 => Some(Self::zero()),
                _ => None,
            };
        };
        let value = number.trim().parse::<f64>().ok()?;
        value.is_finite().then_some(Self { value, unit })
    }

    /// Resolve to pixels
    ///
    /// `em` resolves against `font_size`, `rem` against the 16px root size,
    /// percentages against `percent_base`.
    pub fn to_px(&self, font_size: f64, percent_base: f64) -> f64 {
        match self.unit {
            LengthUnit::Px => self.value,
            LengthUnit::Em => self.value * font_size,
            LengthUnit::Rem => self.value * ROOT_FONT_SIZE,
            LengthUnit::Percent => self.value * percent_base / 100.0,
        }
    }
}

/// Root font size used by `rem`
pub const ROOT_FONT_SIZE: f64 = 16.0;

/// Properties whose computed value flows from parent to child
const INHERITED: &[&str] = &[
    "color",
    "cursor",
    "direction",
    "font",
    "font-family",
    "font-size",
    "font-style",
    "font-weight",
    "letter-spacing",
    "line-height",
    "list-style",
    "list-style-type",
    "quotes",
    "text-align",
    "text-indent",
    "text-transform",
    "visibility",
    "white-space",
    "word-spacing",
];

pub fn is_inherited(property: &str) -> bool {
    INHERITED.contains(&property)
}

/// Initial value of a property; `""` for properties without an entry
pub fn initial_value(property: &str) -> &'static str {
    match property {
        "display" => "inline",
        "position" => "static",
        "float" | "clear" => "none",
        "visibility" => "visible",
        "overflow" | "overflow-x" | "overflow-y" => "visible",
        "width" | "height" | "top" | "right" | "bottom" | "left" => "auto",
        "min-width" | "min-height" => "0px",
        "max-width" | "max-height" => "none",
        "margin-top" | "margin-right" | "margin-bottom" | "margin-left" => "0px",
        "padding-top" | "padding-right" | "padding-bottom" | "padding-left" => "0px",
        "border-top-width" | "border-right-width" | "border-bottom-width"
        | "border-left-width" => "0px",
        "border-style" => "none",
        "box-sizing" => "content-box",
        "color" => "rgb(0, 0, 0)",
        "background-color" => "rgba(0, 0, 0, 0)",
        "opacity" => "1",
        "font-size" => "16px",
        "font-style" => "normal",
        "font-weight" => "400",
        "line-height" => "normal",
        "text-align" => "start",
        "white-space" => "normal",
        "z-index" => "auto",
        _ => "",
    }
}

/// Longhands a box shorthand expands to, in top/right/bottom/left order
pub fn box_longhands(shorthand: &str) -> Option<[&'static str; 4]> {
    match shorthand {
        "margin" => Some(["margin-top", "margin-right", "margin-bottom", "margin-left"]),
        "padding" => Some(["padding-top", "padding-right", "padding-bottom", "padding-left"]),
        "border-width" => Some([
            "border-top-width",
            "border-right-width",
            "border-bottom-width",
            "border-left-width",
        ]),
        "inset" => Some(["top", "right", "bottom", "left"]),
        _ => None,
    }
}

/// Expand a 1-4 value box shorthand into its top/right/bottom/left parts
pub fn expand_box_values(value: &str) -> Option<[String; 4]> {
    let parts: Vec<&str> = value.split_whitespace().collect();
    let [top, right, bottom, left] = match parts.as_slice() {
        [all] => [*all; 4],
        [v, h] => [*v, *h, *v, *h],
        [t, h, b] => [*t, *h, *b, *h],
        [t, r, b, l] => [*t, *r, *b, *l],
        _ => return None,
    };
    Some([top, right, bottom, left].map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_parse() {
        assert_eq!(Length::parse("12px"), Some(Length::px(12.0)));
        assert_eq!(Length::parse(" 1.5em "), Some(Length::em(1.5)));
        assert_eq!(Length::parse("50%"), Some(Length::percent(50.0)));
        assert_eq!(Length::parse("0"), Some(Length::zero()));
        assert_eq!(Length::parse("2rem").map(|l| l.unit), Some(LengthUnit::Rem));
        assert_eq!(Length::parse("auto"), None);
        assert_eq!(Length::parse("12"), None);
        assert_eq!(Length::parse("px"), None);
    }

    #[test]
    fn test_length_to_px() {
        assert_eq!(Length::px(10.0).to_px(16.0, 200.0), 10.0);
        assert_eq!(Length::em(2.0).to_px(10.0, 200.0), 20.0);
        assert_eq!(Length::percent(25.0).to_px(16.0, 200.0), 50.0);
        assert_eq!(Length { value: 1.0, unit: LengthUnit::Rem }.to_px(10.0, 0.0), 16.0);
    }

    #[test]
    fn test_expand_box_values() {
        let expand = |s| expand_box_values(s).unwrap();
        assert_eq!(expand("1px"), ["1px", "1px", "1px", "1px"]);
        assert_eq!(expand("1px 2px"), ["1px", "2px", "1px", "2px"]);
        assert_eq!(expand("1px 2px 3px"), ["1px", "2px", "3px", "2px"]);
        assert_eq!(expand("1px 2px 3px 4px"), ["1px", "2px", "3px", "4px"]);
        assert_eq!(expand_box_values(""), None);
    }

    #[test]
    fn test_inheritance_table() {
        assert!(is_inherited("color"));
        assert!(!is_inherited("display"));
        assert_eq!(initial_value("display"), "inline");
        assert_eq!(initial_value("made-up"), "");
    }
}
