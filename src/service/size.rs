//! 从商品标题 (或单独的规格字段) 中提取可比较尺寸。
//! 多处命中时取最后一个：零售标题通常把包装规格放在末尾，如 "Brand Honey, 12 oz"。

use crate::models::{ParsedQuantity, Size, Unit};
use crate::service::quantity::to_size;
use regex::Regex;
use std::sync::LazyLock;

/// 数字 + 已知规格单位；长的别名排在前面
static SIZE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(\d+(?:\.\d+)?)\s*-?\s*(fl\.?\s*oz|fluid\s+ounces?|ounces?|oz|pounds?|lbs?|kilograms?|kg|grams?|g|milliliters?|millilitres?|ml|liters?|litres?|l|count|ct|packs?|pk|bunch(?:es)?|each|ea)\b",
    )
    .expect("valid size regex")
});

/// 文本中所有可比较尺寸，按出现顺序
pub fn sizes_in(text: &str) -> Vec<Size> {
    SIZE_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let quantity: f64 = caps[1].parse().ok()?;
            let unit = Unit::from_token(&caps[2])?;
            to_size(&ParsedQuantity {
                quantity,
                unit: Some(unit),
            })
        })
        .collect()
}

/// 标题中最后一个 "数字+单位"
pub fn parse_size(title: &str) -> Option<Size> {
    sizes_in(title).pop()
}

/// 优先使用协作方单独给出的规格文本，解析不到再看标题
pub fn parse_candidate_size(title: &str, size_text: Option<&str>) -> Option<Size> {
    size_text.and_then(parse_size).or_else(|| parse_size(title))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MeasurementDomain;

    #[test]
    fn trailing_size_in_title() {
        let s = parse_size("Great Value Clover Honey, 12 oz").unwrap();
        assert_eq!(s.domain, MeasurementDomain::WeightOz);
        assert_eq!(s.magnitude, 12.0);
    }

    #[test]
    fn last_match_wins() {
        let s = parse_size("Honey 2 pack, 16 oz").unwrap();
        assert_eq!(s.domain, MeasurementDomain::WeightOz);
        assert_eq!(s.magnitude, 16.0);
    }

    #[test]
    fn pounds_and_grams() {
        assert_eq!(parse_size("Ground Beef 2 lb").unwrap().magnitude, 32.0);
        let g = parse_size("Dark Chocolate Bar 100g").unwrap();
        assert!((g.magnitude - 3.5274).abs() < 1e-6);
    }

    #[test]
    fn fluid_ounces_stay_volume() {
        let s = parse_size("Silk Almond Milk, 64 fl oz").unwrap();
        assert_eq!(s.domain, MeasurementDomain::VolumeFlOz);
        assert_eq!(s.magnitude, 64.0);

        let l = parse_size("Olive Oil 1 L").unwrap();
        assert_eq!(l.domain, MeasurementDomain::VolumeFlOz);
    }

    #[test]
    fn count_packs() {
        let s = parse_size("Large White Eggs, 12 Count").unwrap();
        assert_eq!(s.domain, MeasurementDomain::Count);
        assert_eq!(s.magnitude, 12.0);

        let p = parse_size("Yeast 3-Pack").unwrap();
        assert_eq!(p.magnitude, 3.0);
    }

    #[test]
    fn no_size_in_title() {
        assert_eq!(parse_size("Fresh Bananas"), None);
        assert_eq!(parse_size("Vitamin B12 Gummies"), None);
    }

    #[test]
    fn size_text_preferred_over_title() {
        let s = parse_candidate_size("Honey Bear 8 oz", Some("24 oz")).unwrap();
        assert_eq!(s.magnitude, 24.0);

        let s = parse_candidate_size("Honey Bear 8 oz", Some("n/a")).unwrap();
        assert_eq!(s.magnitude, 8.0);
    }
}
