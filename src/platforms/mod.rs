//! 平台注册表
//!
//! 平台标识到画像的显式映射，新增平台在这里登记。

pub mod city;
pub mod job51;
pub mod liepin;
pub mod profile;
pub mod zhilian;

pub use city::city_code;
pub use profile::{
    LoginProbe, PagingMode, PlatformProfile, SearchSpec, SubmitMode, TabGreeting, TextProbe,
};

use crate::models::PlatformId;

/// 查询平台画像
pub fn profile_for(id: PlatformId) -> PlatformProfile {
    match id {
        PlatformId::Job51 => job51::profile(),
        PlatformId::Zhilian => zhilian::profile(),
        PlatformId::Liepin => liepin::profile(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_platform_has_a_profile() {
        for id in PlatformId::ALL {
            let profile = profile_for(id);
            assert_eq!(profile.id, id);
            assert!(!profile.card.candidates().is_empty());
            assert!(!profile.home_url.is_empty());
        }
    }
}
