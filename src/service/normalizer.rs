//! 清单行归一化：括号重量 > 前导数量，"X or Y" 拆分，检索词清洗。
//! 纯函数，同一输入永远得到同一输出。

use crate::models::{MeasurementDomain, NormalizedRequest};
use crate::service::quantity::{scan_leading_quantity, to_size};
use crate::service::size::sizes_in;
use regex::Regex;
use std::sync::LazyLock;

pub const DEFAULT_MAX_QUERY_WORDS: usize = 5;

static PAREN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^)]*)\)").expect("valid parenthetical regex"));
static STRAY_PAREN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[()]").expect("valid paren regex"));
static OR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+or\s+").expect("valid or regex"));

static TRAILING_MARKS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[*…]+$").expect("valid trailing marks regex"));
static LEADING_FILLER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(totally optional[:\s]*|optional[:\s]*|about\s+)").expect("valid filler regex")
});
static NOT_ADVICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bNOT\b[^,;)]*").expect("valid NOT regex"));
static PLUS_MORE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i),\s*plus\s+more\b.*$").expect("valid plus more regex"));
static TRAILING_ABOUT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+about\s+.*$").expect("valid about regex"));
static OF_CHOICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+of\s+choice\b").expect("valid of choice regex"));
static MIX_INS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bmix-?ins?\s+like\s+").expect("valid mix-ins regex"));
static SERVING_NOTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(to taste|for garnish|for serving|as needed|divided)\b")
        .expect("valid serving note regex")
});
static PREP_WORDS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b((finely|roughly|thinly|freshly)\s+)?(mashed|ripe|melted|chopped|diced|minced|sliced|crushed|fresh|dried|grated|softened|shredded)\b",
    )
    .expect("valid prep words regex")
});
static LEADING_QTY_UNIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^[½¼¾⅓⅔\d/.]+\s*(cups?|teaspoons?|tablespoons?|tbsp|tsp|fl\.?\s*oz|oz|ounces?|lbs?|pounds?|grams?|g|kg|ml|l|liters?)\s+",
    )
    .expect("valid qty unit regex")
});
static LEADING_UNIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(cups?|teaspoons?|tablespoons?|tbsp|tsp|oz|ounces?|lbs?|pounds?|grams?|g|kg|ml|l|liters?)\s+",
    )
    .expect("valid unit word regex")
});
static PUNCT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s'&-]").expect("valid punctuation regex"));
static ARTICLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(a|an|the|some)\s+").expect("valid article regex"));

/// 清单行归一化器
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    max_query_words: usize,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_QUERY_WORDS)
    }
}

impl Normalizer {
    pub fn new(max_query_words: usize) -> Self {
        Self {
            max_query_words: max_query_words.max(1),
        }
    }

    pub fn normalize(&self, raw_text: &str) -> NormalizedRequest {
        // 1. 括号内的规格优先
        let paren_size = parenthetical_size(raw_text);

        // 2. 去掉括号后再拆 "or"，避免 "(or more)" 被当成备选
        let without_parens = strip_parentheticals(raw_text);
        let (left, right) = split_or(&without_parens);

        // 3. 前导数量只在主词部分解析
        let leading = scan_leading_quantity(left);
        let (quantity, unit, rest) = match &leading {
            Some(lq) => {
                let rest = left
                    .split_whitespace()
                    .skip(lq.consumed)
                    .collect::<Vec<_>>()
                    .join(" ");
                (Some(lq.parsed.quantity), lq.parsed.unit, rest)
            }
            None => (None, None, left.to_string()),
        };

        let target = paren_size.or_else(|| leading.as_ref().and_then(|lq| to_size(&lq.parsed)));

        // 4. 清洗检索词
        let search_term = self.clean_query(&rest);
        let alternate_term = right
            .map(|r| self.clean_query(r))
            .filter(|alt| alt.chars().count() >= 3 && !alt.eq_ignore_ascii_case(&search_term));

        NormalizedRequest {
            raw_text: raw_text.to_string(),
            search_term,
            alternate_term,
            quantity,
            unit,
            target_quantity: target.map(|s| s.magnitude),
            target_domain: target.map_or(MeasurementDomain::Unknown, |s| s.domain),
        }
    }

    /// 去掉数量/单位、填充语、烹饪处理词、标点和冠词，截断到最多 N 个词
    pub fn clean_query(&self, query: &str) -> String {
        let steps: [(&Regex, &str); 12] = [
            (&*TRAILING_MARKS_RE, ""),
            (&*LEADING_FILLER_RE, ""),
            (&*NOT_ADVICE_RE, ""),
            (&*PLUS_MORE_RE, ""),
            (&*TRAILING_ABOUT_RE, ""),
            (&*OF_CHOICE_RE, ""),
            (&*MIX_INS_RE, ""),
            (&*SERVING_NOTE_RE, " "),
            (&*PREP_WORDS_RE, " "),
            (&*LEADING_QTY_UNIT_RE, ""),
            (&*LEADING_UNIT_RE, ""),
            (&*PUNCT_RE, " "),
        ];

        let cleaned = steps
            .iter()
            .fold(strip_parentheticals(query), |acc, (re, rep)| {
                let next = re.replace_all(&acc, *rep).trim().to_string();
                next
            });
        let cleaned = collapse_whitespace(&cleaned);
        let cleaned = ARTICLE_RE.replace(&cleaned, "").to_string();

        let words: Vec<&str> = cleaned
            .split_whitespace()
            .map(|w| w.trim_matches(|c| c == '-' || c == '\''))
            .filter(|w| !w.is_empty())
            .take(self.max_query_words)
            .collect();
        words.join(" ")
    }
}

/// 使用默认配置归一化一行
pub fn normalize(raw_text: &str) -> NormalizedRequest {
    Normalizer::default().normalize(raw_text)
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn strip_parentheticals(s: &str) -> String {
    let s = PAREN_RE.replace_all(s, " ");
    let s = STRAY_PAREN_RE.replace_all(&s, " ");
    collapse_whitespace(&s)
}

/// 第一个带可比较规格的括号，如 "(168 grams)"
fn parenthetical_size(raw: &str) -> Option<crate::models::Size> {
    PAREN_RE
        .captures_iter(raw)
        .find_map(|caps| sizes_in(&caps[1]).into_iter().next())
}

/// 按第一个独立的 " or " 拆分 (大小写不敏感)
fn split_or(raw: &str) -> (&str, Option<&str>) {
    match OR_RE.find(raw) {
        Some(m) => {
            let left = raw[..m.start()].trim();
            let right = raw[m.end()..].trim();
            if right.is_empty() {
                (left, None)
            } else {
                (left, Some(right))
            }
        }
        None => (raw.trim(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Unit;

    #[test]
    fn fraction_grams_and_or_split() {
        let n = normalize("1/3 cup (75 grams) melted coconut oil or extra-virgin olive oil");

        assert!((n.quantity.unwrap() - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(n.unit, Some(Unit::Cup));
        assert_eq!(n.search_term, "coconut oil");
        assert_eq!(n.alternate_term.as_deref(), Some("extra-virgin olive oil"));
        assert_eq!(n.target_domain, MeasurementDomain::WeightOz);
        assert!((n.target_quantity.unwrap() - 75.0 * 0.035274).abs() < 1e-9);
    }

    #[test]
    fn plain_or_alternation() {
        let n = normalize("almond milk or oat milk");
        assert_eq!(n.search_term, "almond milk");
        assert_eq!(n.alternate_term.as_deref(), Some("oat milk"));
        assert_eq!(n.target_quantity, None);
        assert_eq!(n.target_domain, MeasurementDomain::Unknown);
    }

    #[test]
    fn or_inside_parentheses_is_not_an_alternate() {
        let n = normalize("2 cups flour (or more)");
        assert_eq!(n.search_term, "flour");
        assert_eq!(n.alternate_term, None);
    }

    #[test]
    fn parenthetical_weight_wins() {
        let n = normalize("2 lb honey (168 grams)");
        assert_eq!(n.search_term, "honey");
        assert_eq!(n.quantity, Some(2.0));
        assert_eq!(n.unit, Some(Unit::Lb));
        assert!((n.target_quantity.unwrap() - 5.926).abs() < 0.01);
    }

    #[test]
    fn leading_weight_converts() {
        let n = normalize("2 lb ground beef");
        assert_eq!(n.search_term, "ground beef");
        assert_eq!(n.target_domain, MeasurementDomain::WeightOz);
        assert_eq!(n.target_quantity, Some(32.0));
    }

    #[test]
    fn cups_leave_target_empty() {
        let n = normalize("1 3/4 cups all-purpose flour");
        assert_eq!(n.quantity, Some(1.75));
        assert_eq!(n.unit, Some(Unit::Cup));
        assert_eq!(n.target_quantity, None);
        assert_eq!(n.search_term, "all-purpose flour");
    }

    #[test]
    fn bare_count() {
        let n = normalize("3 large eggs");
        assert_eq!(n.target_domain, MeasurementDomain::Count);
        assert_eq!(n.target_quantity, Some(3.0));
        assert_eq!(n.search_term, "large eggs");
    }

    #[test]
    fn strips_filler_prep_and_articles() {
        assert_eq!(normalize("Optional: a pinch of chopped fresh parsley").search_term, "pinch of parsley");
        assert_eq!(normalize("salt, to taste").search_term, "salt");
        assert_eq!(normalize("the ripe bananas, mashed").search_term, "bananas");
        assert_eq!(normalize("chocolate chips of choice").search_term, "chocolate chips");
    }

    #[test]
    fn caps_query_length() {
        let n = normalize("organic unsweetened vanilla flavored almond milk beverage");
        assert_eq!(n.search_term.split_whitespace().count(), DEFAULT_MAX_QUERY_WORDS);
    }

    #[test]
    fn drops_short_or_duplicate_alternate() {
        assert_eq!(normalize("butter or ghee").alternate_term.as_deref(), Some("ghee"));
        assert_eq!(normalize("milk or MILK").alternate_term, None);
        assert_eq!(normalize("tea or x").alternate_term, None);
    }

    #[test]
    fn no_quantity_means_text_only() {
        let n = normalize("vanilla extract");
        assert_eq!(n.quantity, None);
        assert_eq!(n.target_quantity, None);
        assert_eq!(n.target(), None);
    }

    #[test]
    fn normalize_is_idempotent() {
        let raw = "1 (15 oz) can black beans or kidney beans";
        let a = normalize(raw);
        let b = normalize(raw);
        assert_eq!(a, b);
        assert_eq!(a.target_quantity, Some(15.0));
        assert_eq!(a.search_term, "can black beans");
        assert_eq!(a.alternate_term.as_deref(), Some("kidney beans"));
    }
}
