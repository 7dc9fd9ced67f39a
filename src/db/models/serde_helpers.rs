//! 模型层共用的 serde 辅助
//!
//! SurrealDB 的记录 ID 在 HTTP 层统一表现为 "table:key" 字符串，
//! 而从存储层读出来的是原生对象。这里把两种形态收敛到 `RecordId`，
//! 另外为存量数据中缺失或为 null 的布尔字段补默认值。

use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serializer};
use surrealdb::RecordId;

/// 两种来源都收：字符串走 parse，原生对象直接委托给 `RecordId`。
fn record_id_from_any<'de, D>(deserializer: D) -> Result<RecordId, D::Error>
where
    D: Deserializer<'de>,
{
    struct AnyId;

    impl<'de> Visitor<'de> for AnyId {
        type Value = RecordId;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("record id as \"table:key\" string or native object")
        }

        fn visit_str<E>(self, text: &str) -> Result<RecordId, E>
        where
            E: de::Error,
        {
            text.parse::<RecordId>().map_err(de::Error::custom)
        }

        fn visit_map<M>(self, entries: M) -> Result<RecordId, M::Error>
        where
            M: MapAccess<'de>,
        {
            RecordId::deserialize(de::value::MapAccessDeserializer::new(entries))
        }
    }

    deserializer.deserialize_any(AnyId)
}

/// `Option<RecordId>` 字段用：写出 "table:key"，读入兼容两种形态。
pub mod option_record_id {
    use super::*;

    pub fn serialize<S>(value: &Option<RecordId>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(id) => serializer.serialize_some(&id.to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<RecordId>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct Wire(RecordId);

        impl<'de> Deserialize<'de> for Wire {
            fn deserialize<D2>(deserializer: D2) -> Result<Self, D2::Error>
            where
                D2: Deserializer<'de>,
            {
                record_id_from_any(deserializer).map(Wire)
            }
        }

        Ok(Option::<Wire>::deserialize(deserializer)?.map(|Wire(id)| id))
    }
}

/// 字段缺失或为 null 时取 true (如 admin 的 isActive)。
pub fn default_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}

/// 字段缺失或为 null 时取 false (如 seat 的 isOccupied)。
pub fn default_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}
