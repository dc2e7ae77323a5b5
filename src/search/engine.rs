//! # Engine Registry
//!
//! The fixed catalogue of search destinations. Each engine carries a URL
//! template with a `{query}` placeholder; [`SearchEngine::search_url`] fills it
//! with the percent-encoded search text.
//!
//! ## Encoding
//!
//! Search text is encoded the way `encodeURIComponent` does it: ASCII letters,
//! digits and `- _ . ! ~ * ' ( )` pass through, everything else (spaces
//! included) becomes `%XX` over its UTF-8 bytes. A space is therefore always
//! `%20`, never `+`.

use std::fmt;
use std::str::FromStr;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

/// Placeholder substituted in every URL template.
pub const QUERY_PLACEHOLDER: &str = "{query}";

const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineId {
    Baidu,
    Google,
    Bing,
    Bilibili,
    Gemini,
    DuckDuckGo,
}

impl EngineId {
    /// Stable identifier, also the persisted preference value.
    pub fn as_str(self) -> &'static str {
        match self {
            EngineId::Baidu => "baidu",
            EngineId::Google => "google",
            EngineId::Bing => "bing",
            EngineId::Bilibili => "bilibili",
            EngineId::Gemini => "gemini",
            EngineId::DuckDuckGo => "duckduckgo",
        }
    }
}

impl fmt::Display for EngineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EngineId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ENGINES
            .iter()
            .map(|e| e.id)
            .find(|id| id.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown search engine: {s}"))
    }
}

/// Terminal badge standing in for the engine logo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineIcon {
    pub glyph: &'static str,
    pub rgb: (u8, u8, u8),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchEngine {
    pub id: EngineId,
    pub name: &'static str,
    pub icon: EngineIcon,
    pub url_template: &'static str,
    pub placeholder: &'static str,
}

impl SearchEngine {
    /// Build the destination URL for `text`.
    pub fn search_url(&self, text: &str) -> String {
        self.url_template
            .replace(QUERY_PLACEHOLDER, &encode_component(text))
    }
}

/// Percent-encode `text` for use inside a URL query component.
pub fn encode_component(text: &str) -> String {
    utf8_percent_encode(text, COMPONENT).to_string()
}

pub static ENGINES: [SearchEngine; 6] = [
    SearchEngine {
        id: EngineId::Baidu,
        name: "百度",
        icon: EngineIcon {
            glyph: "百",
            rgb: (41, 50, 225),
        },
        url_template: "https://www.baidu.com/s?wd={query}",
        placeholder: "百度一下，你就知道",
    },
    SearchEngine {
        id: EngineId::Google,
        name: "Google",
        icon: EngineIcon {
            glyph: "G",
            rgb: (66, 133, 244),
        },
        url_template: "https://www.google.com/search?q={query}",
        placeholder: "在 Google 上搜索...",
    },
    SearchEngine {
        id: EngineId::Bing,
        name: "Bing",
        icon: EngineIcon {
            glyph: "b",
            rgb: (0, 131, 115),
        },
        url_template: "https://www.bing.com/search?q={query}",
        placeholder: "微软 Bing 搜索...",
    },
    SearchEngine {
        id: EngineId::Bilibili,
        name: "Bilibili",
        icon: EngineIcon {
            glyph: "B",
            rgb: (251, 114, 153),
        },
        url_template: "https://search.bilibili.com/all?keyword={query}",
        placeholder: "搜索 B 站视频...",
    },
    SearchEngine {
        id: EngineId::Gemini,
        name: "Gemini",
        icon: EngineIcon {
            glyph: "✦",
            rgb: (142, 117, 178),
        },
        url_template: "https://gemini.google.com/app?q={query}",
        placeholder: "询问 Gemini AI...",
    },
    SearchEngine {
        id: EngineId::DuckDuckGo,
        name: "DuckDuckGo",
        icon: EngineIcon {
            glyph: "D",
            rgb: (222, 88, 51),
        },
        url_template: "https://duckduckgo.com/?q={query}",
        placeholder: "隐私搜索...",
    },
];

/// The engine used when no valid preference exists.
pub fn default_engine() -> &'static SearchEngine {
    &ENGINES[0]
}

pub fn engine(id: EngineId) -> &'static SearchEngine {
    ENGINES
        .iter()
        .find(|e| e.id == id)
        .unwrap_or_else(default_engine)
}

/// Look up an engine by its identifier string (case-insensitive).
pub fn engine_by_id(id: &str) -> Option<&'static SearchEngine> {
    id.parse::<EngineId>().ok().map(engine)
}

/// Resolve a stored preference, falling back to the default engine.
pub fn resolve_engine(preference: Option<&str>) -> &'static SearchEngine {
    preference.and_then(engine_by_id).unwrap_or_else(default_engine)
}
