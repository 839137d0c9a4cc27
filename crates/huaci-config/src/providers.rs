use std::env;

use serde::{Deserialize, Serialize};

fn default_iciba_url() -> String {
    "http://dict-mobile.iciba.com/interface/index.php".to_string()
}

fn default_shanbay_url() -> String {
    "https://apiv3.shanbay.com/abc/words/senses".to_string()
}

fn default_baidu_url() -> String {
    "http://api.fanyi.baidu.com/api/trans/vip/translate".to_string()
}

fn default_tencent_url() -> String {
    "https://tmt.tencentcloudapi.com".to_string()
}

fn default_eudic_url() -> String {
    "https://api.frdic.com/api/open/v1/studylist/words".to_string()
}

fn default_baidu_from() -> String {
    "en".to_string()
}

fn default_tencent_source() -> String {
    "auto".to_string()
}

fn default_target() -> String {
    "zh".to_string()
}

/// Remote endpoints and language pairs for every provider
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    #[serde(default = "default_iciba_url")]
    pub iciba_url: String,
    #[serde(default = "default_shanbay_url")]
    pub shanbay_url: String,
    #[serde(default = "default_baidu_url")]
    pub baidu_url: String,
    #[serde(default = "default_tencent_url")]
    pub tencent_url: String,
    #[serde(default = "default_eudic_url")]
    pub eudic_url: String,
    #[serde(default = "default_baidu_from")]
    pub baidu_from: String,
    #[serde(default = "default_target")]
    pub baidu_to: String,
    #[serde(default = "default_tencent_source")]
    pub tencent_source: String,
    #[serde(default = "default_target")]
    pub tencent_target: String,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            iciba_url: default_iciba_url(),
            shanbay_url: default_shanbay_url(),
            baidu_url: default_baidu_url(),
            tencent_url: default_tencent_url(),
            eudic_url: default_eudic_url(),
            baidu_from: default_baidu_from(),
            baidu_to: default_target(),
            tencent_source: default_tencent_source(),
            tencent_target: default_target(),
        }
    }
}

impl ProvidersConfig {
    /// Defaults, with endpoints overridable from the environment
    pub fn new() -> Self {
        let defaults = Self::default();
        let var = |name: &str, fallback: String| env::var(name).unwrap_or(fallback);

        Self {
            iciba_url: var("HUACI_ICIBA_URL", defaults.iciba_url),
            shanbay_url: var("HUACI_SHANBAY_URL", defaults.shanbay_url),
            baidu_url: var("HUACI_BAIDU_URL", defaults.baidu_url),
            tencent_url: var("HUACI_TENCENT_URL", defaults.tencent_url),
            eudic_url: var("HUACI_EUDIC_URL", defaults.eudic_url),
            ..defaults
        }
    }
}
