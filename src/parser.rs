//! Generation parameter text parsing.
//!
//! Automatic1111 and compatible frontends embed a single free-form text
//! blob per image:
//!
//! ```text
//! positive prompt text
//! Negative prompt: negative prompt text
//! Steps: 20, Sampler: Euler a, CFG scale: 7, Seed: 12345, Size: 512x512
//! ```
//!
//! The grammar is tolerant by design: markers are plain substring matches,
//! malformed parameter segments are dropped, and nothing here ever fails.
//!
//! Known limitation: parameter values containing the literal `", "`
//! separator (list-valued fields) are split into separate segments, the
//! same way every viewer of this format splits them.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Marker preceding the negative prompt section.
const NEGATIVE_PROMPT_MARKER: &str = "Negative prompt:";

/// Marker opening the key-value parameter block.
const STEPS_MARKER: &str = "Steps:";

/// Parameters given dedicated fields; everything else lands in `extra`.
pub const KNOWN_PARAMS: [&str; 7] = [
    "Steps",
    "Sampler",
    "CFG scale",
    "Seed",
    "Size",
    "Clip skip",
    "Model",
];

// ─── Parameter table ─────────────────────────────────────────────────────────

/// Ordered key-value table of generation parameters.
///
/// Iteration order is first-seen insertion order. Re-inserting an existing
/// key overwrites its value in place without moving it. Serializes as a
/// JSON map in table order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamTable {
    entries: Vec<(String, String)>,
}

impl ParamTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a parameter, overwriting any existing value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Remove a parameter, returning its value if it was present.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as `"key: value"` entries joined with `", "`, in table order.
    pub fn to_display_string(&self) -> String {
        self.entries
            .iter()
            .map(|(k, v)| format!("{}: {}", k, v))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Serialize for ParamTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

// ─── Parsed result ───────────────────────────────────────────────────────────

/// Structured generation metadata parsed from an embedded text blob.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedMetadata {
    /// Positive prompt text.
    pub prompt: String,

    /// Negative prompt text; empty when the image carries none.
    pub negative_prompt: String,

    /// Known parameters that were present, in known-key order.
    pub known: ParamTable,

    /// Remaining parameters, in order of appearance.
    pub extra: ParamTable,
}

impl ParsedMetadata {
    pub fn steps(&self) -> Option<&str> {
        self.known.get("Steps")
    }

    pub fn sampler(&self) -> Option<&str> {
        self.known.get("Sampler")
    }

    pub fn cfg_scale(&self) -> Option<&str> {
        self.known.get("CFG scale")
    }

    pub fn seed(&self) -> Option<&str> {
        self.known.get("Seed")
    }

    pub fn size(&self) -> Option<&str> {
        self.known.get("Size")
    }

    pub fn clip_skip(&self) -> Option<&str> {
        self.known.get("Clip skip")
    }

    pub fn model(&self) -> Option<&str> {
        self.known.get("Model")
    }

    /// Remaining parameters rendered for display, in table order.
    pub fn extra_display(&self) -> String {
        self.extra.to_display_string()
    }
}

// ─── Parser ──────────────────────────────────────────────────────────────────

/// Parser for the generation parameter text format.
///
/// The set of known parameter keys is configurable so callers with
/// different display fields share one grammar; [`KNOWN_PARAMS`] is the
/// default set.
#[derive(Debug, Clone)]
pub struct MetadataParser {
    known_keys: Vec<String>,
}

impl Default for MetadataParser {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataParser {
    pub fn new() -> Self {
        Self::with_known_params(KNOWN_PARAMS)
    }

    pub fn with_known_params<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            known_keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a metadata text blob. Total over all inputs; never fails.
    pub fn parse(&self, text: &str) -> ParsedMetadata {
        let clean: String = text.chars().filter(|&c| c != '\0').collect();
        let clean = clean.trim();

        let (prompt, negative_prompt, params_block) = segment(clean);

        let mut params = ParamTable::new();
        if !params_block.is_empty() {
            parse_param_block(params_block, &mut params);
        }

        let mut known = ParamTable::new();
        for key in &self.known_keys {
            if let Some(value) = params.remove(key) {
                known.insert(key.clone(), value);
            }
        }

        ParsedMetadata {
            prompt: prompt.to_owned(),
            negative_prompt: negative_prompt.to_owned(),
            known,
            extra: params,
        }
    }
}

/// Parse a metadata text blob with the default known-parameter set.
pub fn parse(text: &str) -> ParsedMetadata {
    MetadataParser::new().parse(text)
}

/// Split cleaned text into (prompt, negative prompt, parameter block).
fn segment(clean: &str) -> (&str, &str, &str) {
    let neg_idx = clean.find(NEGATIVE_PROMPT_MARKER);
    let steps_idx = clean.find(STEPS_MARKER);

    // Out-of-order markers ("Steps:" inside the prompt text, before the
    // negative marker) would slice an inverted range; treat Steps as absent.
    let steps_idx = match (neg_idx, steps_idx) {
        (Some(n), Some(s)) if s < n => None,
        (_, s) => s,
    };

    match (neg_idx, steps_idx) {
        (Some(n), Some(s)) => {
            let prompt = clean[..n].trim();
            let negative = clean[n + NEGATIVE_PROMPT_MARKER.len()..s].trim();
            let params = clean[s..].trim();
            (prompt, negative, params)
        }
        (Some(n), None) => {
            let prompt = clean[..n].trim();
            let negative = clean[n + NEGATIVE_PROMPT_MARKER.len()..].trim();
            (prompt, negative, "")
        }
        (None, Some(s)) => (clean[..s].trim(), "", clean[s..].trim()),
        (None, None) => (clean, "", ""),
    }
}

/// Tokenize a parameter block into the table.
///
/// Segments are separated by `", "`; within a segment the key ends at the
/// FIRST `": "` so values may themselves contain the separator (e.g.
/// nested size ratios). Segments with no separator or an empty key are
/// dropped.
fn parse_param_block(block: &str, params: &mut ParamTable) {
    for segment in block.split(", ") {
        let Some((key, value)) = segment.split_once(": ") else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        params.insert(key, value.trim());
    }
}
