//! 產品識別碼

use serde::{Deserialize, Serialize};
use std::fmt;

/// 產品ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// 創建新的產品ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// 檢查產品清單無重複
pub fn ensure_unique(products: &[ProductId]) -> crate::Result<()> {
    let mut seen = std::collections::HashSet::with_capacity(products.len());
    for product in products {
        if !seen.insert(product) {
            return Err(crate::PlanError::DuplicateProduct(product.to_string()));
        }
    }
    Ok(())
}
