use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 分页查询参数
//
// 查询串里的数字是字符串，反序列化经由 RawPaginationQuery 完成
#[derive(Debug, Clone, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginationQuery {
    pub page: i64,
    pub size: i64,
}

#[derive(Deserialize)]
struct RawPaginationQuery {
    #[serde(
        default = "default_page",
        deserialize_with = "deserialize_string_to_i64"
    )]
    page: i64,
    #[serde(
        default = "default_size",
        deserialize_with = "deserialize_string_to_i64"
    )]
    size: i64,
}

impl<'de> Deserialize<'de> for PaginationQuery {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawPaginationQuery::deserialize(deserializer)?;
        Ok(Self {
            page: raw.page,
            size: raw.size,
        })
    }
}

// 分页响应信息
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginationInfo {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

// 分页列表响应
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginatedResponse<T: TS> {
    pub items: Vec<T>,
    pub pagination: PaginationInfo,
}

// 自定义反序列化函数，支持字符串到i64的转换
fn deserialize_string_to_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{Error, Unexpected, Visitor};
    use std::fmt;

    struct I64Visitor;

    impl<'de> Visitor<'de> for I64Visitor {
        type Value = i64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an integer or a string containing an integer")
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(value)
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            if value <= i64::MAX as u64 {
                Ok(value as i64)
            } else {
                Err(Error::invalid_value(Unexpected::Unsigned(value), &self))
            }
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: Error,
        {
            value
                .parse()
                .map_err(|_| Error::invalid_value(Unexpected::Str(value), &self))
        }
    }

    deserializer.deserialize_any(I64Visitor)
}

fn default_page() -> i64 {
    1
}

fn default_size() -> i64 {
    10
}

impl PaginationQuery {
    /// 页码从 1 开始，单页大小限制在 1..=100
    pub fn normalized(&self) -> (u64, u64) {
        (self.page.max(1) as u64, self.size.clamp(1, 100) as u64)
    }
}

impl PaginationInfo {
    pub fn new(page: u64, page_size: u64, total: u64, total_pages: u64) -> Self {
        Self {
            page: page as i64,
            page_size: page_size as i64,
            total: total as i64,
            total_pages: total_pages as i64,
        }
    }
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self { page: 1, size: 10 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_accepts_strings() {
        let query: PaginationQuery = serde_json::from_str(r#"{"page":"3","size":250}"#).unwrap();
        assert_eq!(query.page, 3);
        assert_eq!(query.normalized(), (3, 100));

        let query: PaginationQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.normalized(), (1, 10));
    }

    #[test]
    fn test_pagination_flattened_into_list_query() {
        #[derive(Deserialize)]
        struct ListQuery {
            #[serde(flatten)]
            pagination: PaginationQuery,
            search: Option<String>,
        }

        let query: ListQuery =
            serde_json::from_str(r#"{"page":"2","size":"20","search":"rust"}"#).unwrap();
        assert_eq!(query.pagination.normalized(), (2, 20));
        assert_eq!(query.search.as_deref(), Some("rust"));

        let query: ListQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.pagination.normalized(), (1, 10));
        assert!(serde_json::from_str::<ListQuery>(r#"{"page":"abc"}"#).is_err());
    }
}
