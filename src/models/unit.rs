use serde::{Deserialize, Serialize};
use std::fmt;

/// 度量域：不同域之间的数值永不比较大小
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MeasurementDomain {
    /// 质量，规范单位 oz
    WeightOz,
    /// 体积，规范单位 fl oz (与质量 oz 分开，不猜密度)
    VolumeFlOz,
    /// 计数 (ct / pack / bunch / each)
    Count,
    Unknown,
}

impl MeasurementDomain {
    pub fn is_comparable(self) -> bool {
        self != MeasurementDomain::Unknown
    }
}

/// 封闭单位词表
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Cup,
    Tbsp,
    Tsp,
    Oz,
    FlOz,
    Lb,
    Gram,
    Kilogram,
    Milliliter,
    Liter,
    Count,
    Pack,
    Bunch,
    Each,
}

impl Unit {
    /// 解析单位记号 (含复数/全称别名)，大小写不敏感
    pub fn from_token(token: &str) -> Option<Unit> {
        let lower = token
            .trim()
            .trim_end_matches(['.', ',', ';', ':'])
            .to_lowercase();
        let collapsed: String = lower.split_whitespace().collect::<Vec<_>>().join(" ");

        let unit = match collapsed.as_str() {
            "cup" | "cups" | "c" => Unit::Cup,
            "tbsp" | "tbs" | "tablespoon" | "tablespoons" => Unit::Tbsp,
            "tsp" | "ts" | "teaspoon" | "teaspoons" => Unit::Tsp,
            "oz" | "ounce" | "ounces" => Unit::Oz,
            "fl oz" | "fl. oz" | "floz" | "fluid ounce" | "fluid ounces" => Unit::FlOz,
            "lb" | "lbs" | "pound" | "pounds" => Unit::Lb,
            "g" | "gram" | "grams" | "gr" => Unit::Gram,
            "kg" | "kilogram" | "kilograms" => Unit::Kilogram,
            "ml" | "milliliter" | "milliliters" | "millilitre" | "millilitres" => Unit::Milliliter,
            "l" | "liter" | "liters" | "litre" | "litres" => Unit::Liter,
            "ct" | "count" => Unit::Count,
            "pack" | "packs" | "pk" => Unit::Pack,
            "bunch" | "bunches" => Unit::Bunch,
            "each" | "ea" => Unit::Each,
            _ => return None,
        };
        Some(unit)
    }

    pub fn domain(self) -> MeasurementDomain {
        match self {
            Unit::Oz | Unit::Lb | Unit::Gram | Unit::Kilogram => MeasurementDomain::WeightOz,
            Unit::FlOz | Unit::Milliliter | Unit::Liter => MeasurementDomain::VolumeFlOz,
            Unit::Count | Unit::Pack | Unit::Bunch | Unit::Each => MeasurementDomain::Count,
            Unit::Cup | Unit::Tbsp | Unit::Tsp => MeasurementDomain::Unknown,
        }
    }

    /// 换算到所在域规范单位的系数；cup/tbsp/tsp 没有标准重量换算
    pub fn factor(self) -> Option<f64> {
        match self {
            Unit::Oz => Some(1.0),
            Unit::Lb => Some(16.0),
            Unit::Gram => Some(0.035274),
            Unit::Kilogram => Some(35.274),
            Unit::FlOz => Some(1.0),
            Unit::Milliliter => Some(1.0 / 29.5735),
            Unit::Liter => Some(33.814),
            Unit::Count | Unit::Pack | Unit::Bunch | Unit::Each => Some(1.0),
            Unit::Cup | Unit::Tbsp | Unit::Tsp => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Unit::Cup => "cup",
            Unit::Tbsp => "tbsp",
            Unit::Tsp => "tsp",
            Unit::Oz => "oz",
            Unit::FlOz => "fl oz",
            Unit::Lb => "lb",
            Unit::Gram => "g",
            Unit::Kilogram => "kg",
            Unit::Milliliter => "ml",
            Unit::Liter => "l",
            Unit::Count => "ct",
            Unit::Pack => "pack",
            Unit::Bunch => "bunch",
            Unit::Each => "each",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 原文中解析出的数量 + 可选单位 (未换算)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParsedQuantity {
    pub quantity: f64,
    pub unit: Option<Unit>,
}

/// 换算后的可比较尺寸；domain 永远不是 Unknown
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub magnitude: f64,
    pub domain: MeasurementDomain,
}

impl Size {
    /// 同域才可比较
    pub fn same_domain(&self, domain: MeasurementDomain) -> bool {
        self.domain == domain && domain.is_comparable()
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self.domain {
            MeasurementDomain::WeightOz => "oz",
            MeasurementDomain::VolumeFlOz => "fl oz",
            MeasurementDomain::Count => "ct",
            MeasurementDomain::Unknown => "?",
        };
        write!(f, "{:.2} {}", self.magnitude, unit)
    }
}
