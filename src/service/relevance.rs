//! 检索词与商品标题的文本相似度，[0,1]。
//!
//! 基于词集合重叠，与词序无关：
//! - 标题按词边界完整包含检索词 -> 1.0
//! - 否则 `coverage * (0.6 + 0.4 * precision)`，coverage = 命中检索词比例，
//!   precision = 命中词占标题词比例。检索词全部命中时分数不低于 0.6，
//!   多余的品牌/营销词只影响同档位内的排序。

use deunicode::deunicode;
use std::collections::BTreeSet;

/// 检索词全部命中时的分数下限
pub const FULL_COVERAGE_FLOOR: f64 = 0.6;

/// 小写、去变音符号、按非字母数字切分，并做简单的复数折叠
pub fn tokenize(text: &str) -> Vec<String> {
    deunicode(text)
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(fold_plural)
        .collect()
}

fn fold_plural(token: &str) -> String {
    if token.len() > 3 && token.ends_with('s') && !token.ends_with("ss") {
        token[..token.len() - 1].to_string()
    } else {
        token.to_string()
    }
}

pub fn score(search_term: &str, title: &str) -> f64 {
    let query_seq = tokenize(search_term);
    if query_seq.is_empty() {
        return 0.0;
    }
    let title_seq = tokenize(title);
    if title_seq.is_empty() {
        return 0.0;
    }

    let padded_title = format!(" {} ", title_seq.join(" "));
    let padded_query = format!(" {} ", query_seq.join(" "));
    if padded_title.contains(&padded_query) {
        return 1.0;
    }

    let query: BTreeSet<&str> = query_seq.iter().map(String::as_str).collect();
    let title: BTreeSet<&str> = title_seq.iter().map(String::as_str).collect();
    let hits = query.intersection(&title).count();
    if hits == 0 {
        return 0.0;
    }

    let coverage = hits as f64 / query.len() as f64;
    let precision = hits as f64 / title.len() as f64;
    let score = coverage * (FULL_COVERAGE_FLOOR + (1.0 - FULL_COVERAGE_FLOOR) * precision);
    score.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn containment_short_circuits() {
        assert_eq!(score("honey", "Great Value Clover HONEY, 12 oz"), 1.0);
        assert_eq!(score("almond milk", "Silk Unsweetened Almond Milk"), 1.0);
    }

    #[test]
    fn containment_respects_word_boundaries() {
        assert!(score("milk", "Buttermilk Pancake Mix") < 1.0);
    }

    #[test]
    fn full_coverage_out_of_order_stays_above_floor() {
        let s = score("milk almond", "Silk Almond Unsweetened Milk, Half Gallon");
        assert!(s >= FULL_COVERAGE_FLOOR);
        assert!(s < 1.0);
    }

    #[test]
    fn partial_coverage_is_lower() {
        let full = score("organic honey", "Honey Organic Raw");
        let partial = score("organic honey", "Organic Agave Syrup");
        assert!(full > partial);
        assert!(partial > 0.0);
    }

    #[test]
    fn no_overlap_scores_zero() {
        assert_eq!(score("organic honey", "Sugar Syrup"), 0.0);
        assert_eq!(score("", "Honey"), 0.0);
        assert_eq!(score("honey", ""), 0.0);
    }

    #[test]
    fn folds_plurals_and_accents() {
        assert_eq!(score("eggs", "Large White Egg"), 1.0);
        assert_eq!(score("creme fraiche", "Crème Fraîche 8 oz"), 1.0);
    }

    #[test]
    fn score_is_bounded() {
        let s = score("a b c d e", "e d c b a z y x w v u t s r");
        assert!((0.0..=1.0).contains(&s));
    }
}
