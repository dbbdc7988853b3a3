use std::fmt;

use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Recognition speed/quality trade-off.
///
/// Both modes produce results the same way; `Accurate` additionally logs the
/// engine's progress events.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecognitionMode {
    /// Default mode.
    #[default]
    Fast,
    /// Emits engine progress events to the log.
    Accurate,
}

/// Caller-supplied recognition options.
///
/// `words`, `autocorrect` and `detect_language` are accepted for
/// compatibility and currently have no effect on recognition. The two flags
/// never fail to parse: any value that is not recognizably true reads as
/// `false`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawOptions", rename_all = "camelCase")]
pub struct RecognitionOptions {
    /// Speed/quality trade-off.
    pub mode: RecognitionMode,
    /// Language codes; only the first one is used.
    pub languages: Vec<String>,
    /// Expected words.
    pub words: Vec<String>,
    /// Whether to autocorrect recognized text.
    pub autocorrect: bool,
    /// Whether to detect the language automatically.
    pub detect_language: bool,
}

/// Wire form of [`RecognitionOptions`].
///
/// Accepts both spellings of the language detection flag.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawOptions {
    mode: RecognitionMode,
    languages: Vec<String>,
    words: Vec<String>,
    #[serde(deserialize_with = "lenient_flag")]
    autocorrect: bool,
    #[serde(rename = "detectLanguage", deserialize_with = "lenient_flag")]
    detect_language: bool,
    #[serde(rename = "detect_language", deserialize_with = "lenient_flag")]
    detect_language_snake: bool,
}

impl From<RawOptions> for RecognitionOptions {
    fn from(raw: RawOptions) -> Self {
        Self {
            mode: raw.mode,
            languages: raw.languages,
            words: raw.words,
            autocorrect: raw.autocorrect,
            detect_language: raw.detect_language || raw.detect_language_snake,
        }
    }
}

/// Reads a flag from any value without failing.
///
/// Strings `true`, `1`, `yes` and `on` (any case) are true, as are `true` and
/// non-zero numbers. Repeated values use the last one.
fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(LenientFlag)
}

struct LenientFlag;

impl<'de> Visitor<'de> for LenientFlag {
    type Value = bool;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("any value")
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<bool, E> {
        Ok(value)
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<bool, E> {
        Ok(value != 0)
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<bool, E> {
        Ok(value != 0)
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<bool, E> {
        Ok(value != 0.0)
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<bool, E> {
        Ok(is_truthy(value))
    }

    fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<bool, E> {
        Ok(std::str::from_utf8(value).is_ok_and(is_truthy))
    }

    fn visit_unit<E: de::Error>(self) -> Result<bool, E> {
        Ok(false)
    }

    fn visit_none<E: de::Error>(self) -> Result<bool, E> {
        Ok(false)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<bool, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<bool, A::Error> {
        let mut last = false;
        while let Some(value) = seq.next_element_seed(FlagSeed)? {
            last = value;
        }
        Ok(last)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<bool, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(false)
    }
}

fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    ["true", "1", "yes", "on"]
        .iter()
        .any(|truthy| value.eq_ignore_ascii_case(truthy))
}

struct FlagSeed;

impl<'de> de::DeserializeSeed<'de> for FlagSeed {
    type Value = bool;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<bool, D::Error> {
        lenient_flag(deserializer)
    }
}

impl RecognitionOptions {
    /// Language used when none is given.
    pub const DEFAULT_LANGUAGE: &'static str = "eng";

    /// Returns the language passed to the engine: the first entry of
    /// `languages`, or [`Self::DEFAULT_LANGUAGE`] if that is missing or empty.
    pub fn language(&self) -> &str {
        self.languages
            .first()
            .map(String::as_str)
            .filter(|language| !language.is_empty())
            .unwrap_or(Self::DEFAULT_LANGUAGE)
    }

    /// Returns `true` if engine progress should be logged.
    pub fn is_accurate(&self) -> bool {
        self.mode == RecognitionMode::Accurate
    }
}
