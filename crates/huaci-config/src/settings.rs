use std::sync::LazyLock;

use huaci_types::DrawKey;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ConfigError;

/// Sites where lookups are always suppressed
pub const DEFAULT_IGNORE_SITES: [&str; 2] = ["eudic.net", "shanbay.com"];

/// ASCII only; page hostnames are always ASCII or punycode
static IGNORE_SITE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9_-]+\.){1,2}[A-Za-z0-9_]+$").expect("ignore-site pattern is valid")
});

fn default_true() -> bool {
    true
}

fn default_region() -> String {
    "ap-guangzhou".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DictionaryProvider {
    #[default]
    Iciba,
    Shanbay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslateProvider {
    #[default]
    Baidu,
    Tencent,
}

/// User settings, as stored by the extension's options page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Double-click looks up a word
    #[serde(default = "default_true")]
    pub click_lookup: bool,
    /// Select with `draw_key` held translates the selection
    #[serde(default = "default_true")]
    pub draw_lookup: bool,
    pub draw_key: DrawKey,
    /// Sentence translation enabled
    pub translate: bool,
    pub ignore_sites: Vec<String>,
    pub eudic_key: String,
    pub baidu_id: String,
    pub baidu_key: String,
    pub tencent_secret_id: String,
    pub tencent_secret_key: String,
    #[serde(default = "default_region")]
    pub tencent_region: String,
    pub dictionary_provider: DictionaryProvider,
    pub translate_provider: TranslateProvider,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            click_lookup: default_true(),
            draw_lookup: default_true(),
            draw_key: DrawKey::default(),
            translate: false,
            ignore_sites: vec![],
            eudic_key: String::new(),
            baidu_id: String::new(),
            baidu_key: String::new(),
            tencent_secret_id: String::new(),
            tencent_secret_key: String::new(),
            tencent_region: default_region(),
            dictionary_provider: DictionaryProvider::default(),
            translate_provider: TranslateProvider::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaiduCredentials {
    pub app_id: String,
    pub app_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TencentCredentials {
    pub secret_id: String,
    pub secret_key: String,
    pub region: String,
}

impl Settings {
    /// Parse settings from either a plain mapping or the options page's
    /// storage layout: an array of single-key objects, each tagged with the
    /// form control `type`, merged in order.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        let merged = match value {
            Value::Array(items) => {
                let mut map = Map::new();
                for item in items {
                    let fields = match item {
                        Value::Object(fields) => fields,
                        other => {
                            return Err(ConfigError::Malformed(format!(
                                "expected an object in settings array, got {other}"
                            )));
                        }
                    };
                    for (key, value) in fields {
                        if key != "type" {
                            map.insert(key, value);
                        }
                    }
                }
                Value::Object(map)
            }
            other => other,
        };

        let settings: Settings =
            serde_json::from_value(merged).map_err(|e| ConfigError::Malformed(e.to_string()))?;
        settings.validated()
    }

    /// Trim ignore-site entries, drop blank ones and reject malformed ones.
    /// Nothing is kept from a rejected update.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        let mut sites = Vec::with_capacity(self.ignore_sites.len());
        for site in &self.ignore_sites {
            let site = site.trim();
            if site.is_empty() {
                continue;
            }
            if !IGNORE_SITE_RE.is_match(site) {
                return Err(ConfigError::InvalidIgnoreSite(site.to_string()));
            }
            sites.push(site.to_ascii_lowercase());
        }
        self.ignore_sites = sites;
        Ok(self)
    }

    /// True when `hostname` is, or is a subdomain of, a built-in or
    /// configured ignore site
    pub fn is_ignored(&self, hostname: &str) -> bool {
        let hostname = hostname.trim().trim_end_matches('.').to_ascii_lowercase();
        DEFAULT_IGNORE_SITES
            .iter()
            .copied()
            .chain(self.ignore_sites.iter().map(String::as_str))
            .any(|site| host_matches(&hostname, site))
    }

    pub fn baidu_credentials(&self) -> BaiduCredentials {
        BaiduCredentials {
            app_id: self.baidu_id.clone(),
            app_key: self.baidu_key.clone(),
        }
    }

    pub fn tencent_credentials(&self) -> TencentCredentials {
        TencentCredentials {
            secret_id: self.tencent_secret_id.clone(),
            secret_key: self.tencent_secret_key.clone(),
            region: self.tencent_region.clone(),
        }
    }

    /// Whether the configured translation provider has credentials
    pub fn translation_configured(&self) -> bool {
        match self.translate_provider {
            TranslateProvider::Baidu => !self.baidu_id.is_empty() && !self.baidu_key.is_empty(),
            TranslateProvider::Tencent => {
                !self.tencent_secret_id.is_empty() && !self.tencent_secret_key.is_empty()
            }
        }
    }
}

fn host_matches(hostname: &str, site: &str) -> bool {
    hostname == site
        || hostname
            .strip_suffix(site)
            .is_some_and(|prefix| prefix.ends_with('.'))
}
