use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, percent_encode};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// Form encoding: everything but `A-Z a-z 0-9 - _ .` is escaped, space becomes `+`.
const FORM: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

/// Same as [`FORM`] but leaves structural brackets of a parameter name intact.
const FORM_NAME: &AsciiSet = &FORM.remove(b'[').remove(b']');

/// Deepest bracket suffix accepted on a parameter name. Deeper pairs are dropped.
pub const MAX_NESTING_DEPTH: usize = 64;

/// A decoded query parameter value.
///
/// Leaf values keep the exact decoded bytes, which need not be UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    /// `name=value`
    Value(Vec<u8>),

    /// `name=a&name=b`: a plain name assigned more than once, in source order.
    Repeated(Vec<Vec<u8>>),

    /// `name[]=a&name[]=b`
    List(Vec<QueryValue>),

    /// `name[key]=value`
    Map(QueryMap),
}

impl QueryValue {
    /// The leaf value, if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes().and_then(|v| std::str::from_utf8(v).ok())
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            QueryValue::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&QueryMap> {
        match self {
            QueryValue::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[QueryValue]> {
        match self {
            QueryValue::List(items) => Some(items),
            _ => None,
        }
    }

    fn from_segments(segments: &[Segment], value: Vec<u8>) -> QueryValue {
        match segments.split_first() {
            None => QueryValue::Value(value),
            Some((Segment::Append, rest)) => {
                QueryValue::List(vec![QueryValue::from_segments(rest, value)])
            }
            Some((Segment::Key(key), rest)) => {
                let mut map = QueryMap::new();
                map.insert(key.clone(), QueryValue::from_segments(rest, value));
                QueryValue::Map(map)
            }
        }
    }

    /// Merges one more assignment into an existing value. A shape conflict
    /// (scalar vs. container) is resolved by the later assignment.
    fn assign(&mut self, segments: &[Segment], value: Vec<u8>) {
        match segments.split_first() {
            None => {
                if let QueryValue::Repeated(values) = self {
                    values.push(value);
                    return;
                }
                if let QueryValue::Value(existing) = self {
                    let first = std::mem::take(existing);
                    *self = QueryValue::Repeated(vec![first, value]);
                    return;
                }
                *self = QueryValue::Value(value);
            }
            Some((Segment::Append, rest)) => {
                if let QueryValue::List(items) = self {
                    items.push(QueryValue::from_segments(rest, value));
                    return;
                }
                *self = QueryValue::from_segments(segments, value);
            }
            Some((Segment::Key(key), rest)) => {
                if let QueryValue::Map(map) = self {
                    map.assign(key.clone(), rest, value);
                    return;
                }
                *self = QueryValue::from_segments(segments, value);
            }
        }
    }
}

/// Ordered parameter name to value map, in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryMap {
    entries: Vec<(String, QueryValue)>,
}

impl QueryMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut QueryValue> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Inserts or replaces a value; a replaced key keeps its position.
    pub fn insert(&mut self, key: String, value: QueryValue) {
        match self.get_mut(&key) {
            Some(existing) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rewrites every top-level key, merging keys that map to the same result.
    pub(crate) fn map_keys(self, mut f: impl FnMut(String) -> String) -> QueryMap {
        let mut out = QueryMap::new();
        for (key, value) in self.entries {
            out.insert(f(key), value);
        }
        out
    }

    fn assign(&mut self, key: String, segments: &[Segment], value: Vec<u8>) {
        match self.get_mut(&key) {
            Some(slot) => slot.assign(segments, value),
            None => self
                .entries
                .push((key, QueryValue::from_segments(segments, value))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// `[]`
    Append,
    /// `[key]`
    Key(String),
}

/// Percent-decodes one form component to raw bytes: `+` is a space and
/// malformed escapes are kept as-is.
pub fn decode_bytes(input: &str) -> Vec<u8> {
    let spaced = input.replace('+', " ");
    percent_decode_str(&spaced).collect()
}

/// Like [`decode_bytes`], with invalid UTF-8 replaced.
pub fn decode_component(input: &str) -> String {
    String::from_utf8_lossy(&decode_bytes(input)).into_owned()
}

/// Form-encodes raw bytes.
pub fn encode_bytes(input: &[u8]) -> String {
    percent_encode(input, FORM).to_string().replace("%20", "+")
}

/// Form-encodes one component (names or values).
pub fn encode_component(input: &str) -> String {
    encode_bytes(input.as_bytes())
}

/// Form-encodes a parameter name but keeps its `[`/`]` literal so nested
/// key syntax stays visible.
pub fn encode_name(input: &str) -> String {
    percent_encode(input.as_bytes(), FORM_NAME)
        .to_string()
        .replace("%20", "+")
}

/// Decodes a form-encoded query string into nested parameters.
///
/// Bracket suffixes build structure: `a[b]=1` nests a map, `a[]=1` appends
/// to a list. Pairs without a name or nested deeper than
/// [`MAX_NESTING_DEPTH`] are dropped, a pair without `=` has an empty value.
pub fn decode_nested(query: &str) -> QueryMap {
    let mut params = QueryMap::new();

    for part in query.split('&') {
        if part.is_empty() {
            continue;
        }

        let (raw_key, raw_value) = part.split_once('=').unwrap_or((part, ""));

        let Some((name, segments)) = parse_key(raw_key) else {
            continue;
        };

        params.assign(name, &segments, decode_bytes(raw_value));
    }

    params
}

/// Splits a raw key into its leading name and bracket suffix. A `[` without
/// a matching `]` is part of the name.
pub(crate) fn split_name(raw_key: &str) -> (&str, &str) {
    match raw_key.find('[') {
        Some(open) if raw_key[open..].contains(']') => raw_key.split_at(open),
        _ => (raw_key, ""),
    }
}

fn parse_key(raw_key: &str) -> Option<(String, Vec<Segment>)> {
    let (raw_name, mut rest) = split_name(raw_key);

    let name = decode_component(raw_name);
    if name.is_empty() {
        return None;
    }

    let mut segments = Vec::new();

    // Anything after the last complete `[...]` group is ignored.
    while let Some(inner) = rest.strip_prefix('[') {
        let Some(close) = inner.find(']') else {
            break;
        };

        if segments.len() == MAX_NESTING_DEPTH {
            return None;
        }

        let segment = &inner[..close];
        segments.push(if segment.is_empty() {
            Segment::Append
        } else {
            Segment::Key(decode_component(segment))
        });

        rest = &inner[close + 1..];
    }

    Some((name, segments))
}

/// Serializes nested parameters into a canonical form-encoded query string.
pub fn encode_nested(params: &QueryMap) -> String {
    let mut pairs = Vec::new();
    for (name, value) in params.iter() {
        push_pairs(&mut pairs, encode_component(name), value);
    }
    pairs.join("&")
}

fn push_pairs(pairs: &mut Vec<String>, prefix: String, value: &QueryValue) {
    match value {
        QueryValue::Value(v) => pairs.push(format!("{prefix}={}", encode_bytes(v))),
        QueryValue::Repeated(values) => {
            for v in values {
                pairs.push(format!("{prefix}={}", encode_bytes(v)));
            }
        }
        QueryValue::List(items) => {
            for item in items {
                push_pairs(pairs, format!("{prefix}[]"), item);
            }
        }
        QueryValue::Map(map) => {
            for (key, item) in map.iter() {
                push_pairs(pairs, format!("{prefix}[{}]", encode_component(key)), item);
            }
        }
    }
}

impl Serialize for QueryValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            QueryValue::Value(v) => serializer.serialize_str(&String::from_utf8_lossy(v)),
            QueryValue::Repeated(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for v in values {
                    seq.serialize_element(&String::from_utf8_lossy(v))?;
                }
                seq.end()
            }
            QueryValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            QueryValue::Map(map) => map.serialize(serializer),
        }
    }
}

impl Serialize for QueryMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
