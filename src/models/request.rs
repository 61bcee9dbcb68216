use super::unit::{MeasurementDomain, Size, Unit};
use serde::{Deserialize, Serialize};

/// 清单一行的结构化请求，创建后不可变
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRequest {
    /// 原始行，审计用
    pub raw_text: String,
    /// 主检索词 (已去掉 "or" 备选)
    pub search_term: String,
    /// "X or Y" 中的 Y
    pub alternate_term: Option<String>,
    /// 原文写法的数量/单位 (cup 等未换算单位也保留)
    pub quantity: Option<f64>,
    pub unit: Option<Unit>,
    /// 换算后的目标尺寸；有值时 domain 一定不是 Unknown
    pub target_quantity: Option<f64>,
    pub target_domain: MeasurementDomain,
}

impl NormalizedRequest {
    pub fn target(&self) -> Option<Size> {
        match self.target_quantity {
            Some(magnitude) if self.target_domain.is_comparable() => Some(Size {
                magnitude,
                domain: self.target_domain,
            }),
            _ => None,
        }
    }
}
