//! `variables` / `features` parameter sets for the structured query.

use serde::ser::{Error as _, SerializeMap};
use serde::{Serialize, Serializer};
use serde_json::ser::Formatter;
use std::io;

use crate::error::ScrapeError;

/// Value of one query flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Str(String),
}

/// Ordered flag map. Order is kept so the serialized text is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagMap {
    entries: Vec<(String, FlagValue)>,
}

impl FlagMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key`, replacing an existing entry in place.
    pub fn insert(&mut self, key: &str, value: FlagValue) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&FlagValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FlagValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Compact JSON object with a space after each colon and comma:
    /// `{"a": true, "b": "x"}`.
    pub fn to_spaced_json(&self) -> serde_json::Result<String> {
        let mut buf = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
        self.serialize(&mut ser)?;
        String::from_utf8(buf).map_err(serde_json::Error::custom)
    }
}

impl Serialize for FlagMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Compact output, but `", "` between members and `": "` after keys.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

const VARIABLES: &[(&str, bool)] = &[
    ("with_rux_injections", false),
    ("includePromotedContent", true),
    ("withCommunity", true),
    ("withQuickPromoteEligibilityTweetFields", true),
    ("withBirdwatchNotes", true),
    ("withDownvotePerspective", false),
    ("withReactionsMetadata", false),
    ("withReactionsPerspective", false),
    ("withVoice", true),
    ("withV2Timeline", true),
];

const FEATURES: &[(&str, bool)] = &[
    ("responsive_web_graphql_exclude_directive_enabled", true),
    ("verified_phone_label_enabled", false),
    ("responsive_web_graphql_timeline_navigation_enabled", true),
    ("responsive_web_graphql_skip_user_profile_image_extensions_enabled", false),
    ("tweetypie_unmention_optimization_enabled", true),
    ("vibe_api_enabled", false),
    ("responsive_web_edit_tweet_api_enabled", false),
    ("graphql_is_translatable_rweb_tweet_is_translatable_enabled", false),
    ("view_counts_everywhere_api_enabled", true),
    ("longform_notetweets_consumption_enabled", true),
    ("tweet_awards_web_tipping_enabled", false),
    ("freedom_of_speech_not_reach_fetch_enabled", false),
    ("standardized_nudges_misinfo", false),
    ("tweet_with_visibility_results_prefer_gql_limited_actions_policy_enabled", false),
    ("interactive_text_enabled", false),
    ("responsive_web_twitter_blue_verified_badge_is_enabled", true),
    ("responsive_web_text_conversations_enabled", false),
    ("longform_notetweets_richtext_consumption_enabled", false),
    ("responsive_web_enhance_cards_enabled", false),
    ("longform_notetweets_inline_media_enabled", true),
    ("longform_notetweets_rich_text_read_enabled", true),
    ("responsive_web_media_download_video_enabled", true),
    ("responsive_web_twitter_article_tweet_consumption_enabled", true),
    ("creator_subscriptions_tweet_preview_api_enabled", true),
];

fn from_table(table: &[(&str, bool)]) -> FlagMap {
    let mut map = FlagMap::new();
    for (k, v) in table {
        map.insert(k, FlagValue::Bool(*v));
    }
    map
}

/// Variables template with `tweetId` overlaid.
pub fn variables_for(post_id: &str) -> FlagMap {
    let mut map = from_table(VARIABLES);
    map.insert("tweetId", FlagValue::Str(post_id.to_string()));
    map
}

pub fn features() -> FlagMap {
    from_table(FEATURES)
}

/// Query URL with both maps serialized and percent-encoded (space as `%20`).
pub fn build_query_url(base: &str, post_id: &str) -> Result<String, ScrapeError> {
    let variables = variables_for(post_id)
        .to_spaced_json()
        .map_err(ScrapeError::Encode)?;
    let features = features().to_spaced_json().map_err(ScrapeError::Encode)?;
    Ok(format!(
        "{}?variables={}&features={}",
        base,
        urlencoding::encode(&variables),
        urlencoding::encode(&features)
    ))
}
