//! 数量/单位解析：前导数量 (整数、小数、分数、带分数、Unicode 分数) + 可选单位，
//! 再按固定换算表得到 (magnitude, domain)。解析不到返回 None，不报错。

use crate::models::{MeasurementDomain, ParsedQuantity, Size, Unit};
use regex::Regex;
use std::sync::LazyLock;

static FRACTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)/(\d+)$").expect("valid fraction regex"));

static GLUED_UNICODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)([½¼¾⅓⅔])$").expect("valid unicode fraction regex"));

/// "12oz" / "500g" 这类数字与单位连写的记号
static GLUED_UNIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+(?:\.\d+)?)([A-Za-z]+\.?)$").expect("valid glued unit regex")
});

fn unicode_fraction(c: char) -> Option<f64> {
    match c {
        '½' => Some(0.5),
        '¼' => Some(0.25),
        '¾' => Some(0.75),
        '⅓' => Some(1.0 / 3.0),
        '⅔' => Some(2.0 / 3.0),
        _ => None,
    }
}

fn parse_decimal(tok: &str) -> Option<f64> {
    let valid = !tok.is_empty()
        && tok.chars().all(|c| c.is_ascii_digit() || c == '.')
        && tok.chars().any(|c| c.is_ascii_digit())
        && tok.matches('.').count() <= 1;
    if !valid {
        return None;
    }
    tok.parse::<f64>().ok()
}

/// 解析单个数量记号: "1" "1.5" "1/3" "½" "1½"
pub fn parse_quantity_token(tok: &str) -> Option<f64> {
    let tok = tok.trim();
    if tok.is_empty() {
        return None;
    }

    if let Some(v) = parse_decimal(tok) {
        return Some(v);
    }

    if let Some(caps) = FRACTION_RE.captures(tok) {
        let num: f64 = caps[1].parse().ok()?;
        let den: f64 = caps[2].parse().ok()?;
        if den == 0.0 {
            return None;
        }
        return Some(num / den);
    }

    let mut chars = tok.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if let Some(v) = unicode_fraction(c) {
            return Some(v);
        }
    }

    if let Some(caps) = GLUED_UNICODE_RE.captures(tok) {
        let whole: f64 = caps[1].parse().ok()?;
        let frac = caps[2].chars().next().and_then(unicode_fraction)?;
        return Some(whole + frac);
    }

    None
}

/// 纯分数记号 (带分数的第二段)
fn is_fraction_token(tok: &str) -> bool {
    FRACTION_RE.is_match(tok)
        || (tok.chars().count() == 1 && tok.chars().all(|c| unicode_fraction(c).is_some()))
}

/// 前导数量解析结果 + 消耗的记号数
#[derive(Debug, Clone, PartialEq)]
pub struct LeadingQuantity {
    pub parsed: ParsedQuantity,
    pub consumed: usize,
}

fn match_unit_at(tokens: &[&str], idx: usize) -> Option<(Unit, usize)> {
    if idx + 1 < tokens.len() {
        let pair = format!("{} {}", tokens[idx], tokens[idx + 1]);
        if let Some(unit) = Unit::from_token(&pair) {
            return Some((unit, 2));
        }
    }
    tokens
        .get(idx)
        .and_then(|t| Unit::from_token(t))
        .map(|unit| (unit, 1))
}

/// 扫描文本开头的数量与单位
pub fn scan_leading_quantity(text: &str) -> Option<LeadingQuantity> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let first = *tokens.first()?;

    let Some(mut quantity) = parse_quantity_token(first) else {
        // 连写形式 "12oz"
        let caps = GLUED_UNIT_RE.captures(first)?;
        let quantity = parse_decimal(&caps[1])?;
        let unit = Unit::from_token(&caps[2])?;
        return Some(LeadingQuantity {
            parsed: ParsedQuantity {
                quantity,
                unit: Some(unit),
            },
            consumed: 1,
        });
    };
    let mut idx = 1;

    // 带分数 "2 1/2"
    if let Some(second) = tokens.get(1) {
        if is_fraction_token(second) && !is_fraction_token(first) {
            if let Some(frac) = parse_quantity_token(second) {
                quantity += frac;
                idx = 2;
            }
        }
    }

    let (unit, consumed) = match match_unit_at(&tokens, idx) {
        Some((unit, n)) => (Some(unit), idx + n),
        None => (None, idx),
    };

    Some(LeadingQuantity {
        parsed: ParsedQuantity { quantity, unit },
        consumed,
    })
}

pub fn parse_leading_quantity(text: &str) -> Option<ParsedQuantity> {
    scan_leading_quantity(text).map(|lq| lq.parsed)
}

/// 按换算表得到可比较尺寸。无单位的裸数字按计数处理；cup/tbsp/tsp 得不到尺寸。
pub fn to_size(parsed: &ParsedQuantity) -> Option<Size> {
    if !parsed.quantity.is_finite() || parsed.quantity <= 0.0 {
        return None;
    }

    let Some(unit) = parsed.unit else {
        return Some(Size {
            magnitude: parsed.quantity,
            domain: MeasurementDomain::Count,
        });
    };

    let domain = unit.domain();
    if !domain.is_comparable() {
        return None;
    }
    let factor = unit.factor()?;
    Some(Size {
        magnitude: parsed.quantity * factor,
        domain,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment_size(text: &str) -> Option<Size> {
        parse_leading_quantity(text).and_then(|p| to_size(&p))
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn parses_plain_and_decimal_tokens() {
        assert_eq!(parse_quantity_token("3"), Some(3.0));
        assert_eq!(parse_quantity_token("1.5"), Some(1.5));
        assert_eq!(parse_quantity_token("inf"), None);
        assert_eq!(parse_quantity_token("-2"), None);
        assert_eq!(parse_quantity_token("salt"), None);
    }

    #[test]
    fn parses_fractions() {
        assert!(approx(parse_quantity_token("1/3").unwrap(), 1.0 / 3.0));
        assert_eq!(parse_quantity_token("1/0"), None);
        assert_eq!(parse_quantity_token("½"), Some(0.5));
        assert_eq!(parse_quantity_token("1½"), Some(1.5));
    }

    #[test]
    fn mixed_number_with_unit() {
        let p = parse_leading_quantity("2 1/2 cups flour").unwrap();
        assert!(approx(p.quantity, 2.5));
        assert_eq!(p.unit, Some(Unit::Cup));

        let p = parse_leading_quantity("1 3/4 cups (220 grams) flour").unwrap();
        assert!(approx(p.quantity, 1.75));
    }

    #[test]
    fn unicode_fraction_with_unit() {
        let p = parse_leading_quantity("½ teaspoon salt").unwrap();
        assert_eq!(p.quantity, 0.5);
        assert_eq!(p.unit, Some(Unit::Tsp));
    }

    #[test]
    fn two_word_fluid_ounce() {
        let lq = scan_leading_quantity("16 fl oz almond milk").unwrap();
        assert_eq!(lq.parsed.unit, Some(Unit::FlOz));
        assert_eq!(lq.consumed, 3);
    }

    #[test]
    fn glued_number_and_unit() {
        let p = parse_leading_quantity("500g butter").unwrap();
        assert_eq!(p.quantity, 500.0);
        assert_eq!(p.unit, Some(Unit::Gram));
    }

    #[test]
    fn no_leading_number_is_none() {
        assert_eq!(parse_leading_quantity("salt to taste"), None);
        assert_eq!(parse_leading_quantity(""), None);
    }

    #[test]
    fn weight_conversions() {
        let lb = fragment_size("2 lb").unwrap();
        assert_eq!(lb.domain, MeasurementDomain::WeightOz);
        assert!(approx(lb.magnitude, 32.0));

        let g = fragment_size("168 grams").unwrap();
        assert!(approx(g.magnitude, 168.0 * 0.035274));

        let kg = fragment_size("1 kg").unwrap();
        assert!(approx(kg.magnitude, 35.274));
    }

    #[test]
    fn volume_is_its_own_domain() {
        let ml = fragment_size("500 ml").unwrap();
        assert_eq!(ml.domain, MeasurementDomain::VolumeFlOz);
        assert!((ml.magnitude - 16.907).abs() < 0.01);
    }

    #[test]
    fn kitchen_measures_have_no_size() {
        assert_eq!(fragment_size("1/3 cup sugar"), None);
        assert_eq!(fragment_size("2 tbsp butter"), None);
    }

    #[test]
    fn count_units_and_bare_numbers() {
        let pack = fragment_size("6 pack").unwrap();
        assert_eq!(pack.domain, MeasurementDomain::Count);
        assert_eq!(pack.magnitude, 6.0);

        let eggs = fragment_size("3 eggs").unwrap();
        assert_eq!(eggs.domain, MeasurementDomain::Count);
        assert_eq!(eggs.magnitude, 3.0);
    }
}
