use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};
use utoipa::ToSchema;

/// Administrative districts served by the directory (the 23 special wards of Tokyo).
///
/// Facilities store the ward name verbatim, e.g. `新宿区`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
    ToSchema,
)]
pub enum District {
    #[strum(serialize = "千代田区")]
    #[serde(rename = "千代田区")]
    Chiyoda,
    #[strum(serialize = "中央区")]
    #[serde(rename = "中央区")]
    Chuo,
    #[strum(serialize = "港区")]
    #[serde(rename = "港区")]
    Minato,
    #[strum(serialize = "新宿区")]
    #[serde(rename = "新宿区")]
    Shinjuku,
    #[strum(serialize = "文京区")]
    #[serde(rename = "文京区")]
    Bunkyo,
    #[strum(serialize = "台東区")]
    #[serde(rename = "台東区")]
    Taito,
    #[strum(serialize = "墨田区")]
    #[serde(rename = "墨田区")]
    Sumida,
    #[strum(serialize = "江東区")]
    #[serde(rename = "江東区")]
    Koto,
    #[strum(serialize = "品川区")]
    #[serde(rename = "品川区")]
    Shinagawa,
    #[strum(serialize = "目黒区")]
    #[serde(rename = "目黒区")]
    Meguro,
    #[strum(serialize = "大田区")]
    #[serde(rename = "大田区")]
    Ota,
    #[strum(serialize = "世田谷区")]
    #[serde(rename = "世田谷区")]
    Setagaya,
    #[strum(serialize = "渋谷区")]
    #[serde(rename = "渋谷区")]
    Shibuya,
    #[strum(serialize = "中野区")]
    #[serde(rename = "中野区")]
    Nakano,
    #[strum(serialize = "杉並区")]
    #[serde(rename = "杉並区")]
    Suginami,
    #[strum(serialize = "豊島区")]
    #[serde(rename = "豊島区")]
    Toshima,
    #[strum(serialize = "北区")]
    #[serde(rename = "北区")]
    Kita,
    #[strum(serialize = "荒川区")]
    #[serde(rename = "荒川区")]
    Arakawa,
    #[strum(serialize = "板橋区")]
    #[serde(rename = "板橋区")]
    Itabashi,
    #[strum(serialize = "練馬区")]
    #[serde(rename = "練馬区")]
    Nerima,
    #[strum(serialize = "足立区")]
    #[serde(rename = "足立区")]
    Adachi,
    #[strum(serialize = "葛飾区")]
    #[serde(rename = "葛飾区")]
    Katsushika,
    #[strum(serialize = "江戸川区")]
    #[serde(rename = "江戸川区")]
    Edogawa,
}

impl District {
    /// All districts in their official order.
    pub fn all() -> Vec<District> {
        District::iter().collect()
    }

    /// Parses a ward name, ignoring surrounding whitespace.
    pub fn parse(raw: &str) -> Option<District> {
        raw.trim().parse().ok()
    }

    pub fn name(self) -> &'static str {
        self.into()
    }
}
