//! 城市编码表
//!
//! 各平台的搜索接口使用自己的一套城市编码，这里维护常用城市的
//! 静态映射。查不到的城市按原样传入，由平台自行处理。

use phf::phf_map;

use crate::models::PlatformId;

/// 猎聘城市编码
static LIEPIN_CITY_CODES: phf::Map<&'static str, &'static str> = phf_map! {
    "北京" => "010",
    "上海" => "020",
    "广州" => "050020",
    "深圳" => "050090",
    "杭州" => "070020",
    "成都" => "280020",
    "武汉" => "170020",
    "南京" => "060020",
};

/// 智联招聘城市编码
static ZHILIAN_CITY_CODES: phf::Map<&'static str, &'static str> = phf_map! {
    "北京" => "530",
    "上海" => "538",
    "广州" => "763",
    "深圳" => "765",
    "杭州" => "653",
    "成都" => "801",
    "武汉" => "736",
    "南京" => "635",
};

/// 51job 地区编码
static JOB51_AREA_CODES: phf::Map<&'static str, &'static str> = phf_map! {
    "北京" => "010000",
    "上海" => "020000",
    "广州" => "030200",
    "深圳" => "040000",
    "杭州" => "080200",
    "成都" => "090200",
    "武汉" => "180200",
    "南京" => "070200",
};

/// 查询平台的城市编码
pub fn city_code(id: PlatformId, city: &str) -> Option<&'static str> {
    let table = match id {
        PlatformId::Liepin => &LIEPIN_CITY_CODES,
        PlatformId::Zhilian => &ZHILIAN_CITY_CODES,
        PlatformId::Job51 => &JOB51_AREA_CODES,
    };
    table.get(city).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_city_resolves_per_platform() {
        assert_eq!(city_code(PlatformId::Liepin, "上海"), Some("020"));
        assert_eq!(city_code(PlatformId::Zhilian, "上海"), Some("538"));
        assert_eq!(city_code(PlatformId::Job51, "上海"), Some("020000"));
    }

    #[test]
    fn unknown_city_is_none() {
        assert_eq!(city_code(PlatformId::Liepin, "不存在的城市"), None);
    }
}
