//! Raw entity spans produced by extraction models.
//!
//! Backends deliver spans in two incompatible JSON shapes. Both are captured by
//! [`EntityPayload`] and flattened into [`RawEntity`] values by
//! [`EntityPayload::into_entities`] before any classification runs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::patterns::{char_find, char_len};

/// One tagged span of the input text. Offsets are character offsets, `end`
/// exclusive; `None` when the model gave no usable position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntity {
    #[serde(rename = "type")]
    pub entity_type: String,
    pub span: String,
    pub start: Option<usize>,
    pub end: Option<usize>,
}

impl RawEntity {
    #[must_use]
    pub fn new(entity_type: impl Into<String>, span: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            entity_type: entity_type.into(),
            span: span.into(),
            start: Some(start),
            end: Some(end),
        }
    }

    /// Ordering key; spans without a position sort first.
    #[must_use]
    pub fn sort_key(&self) -> usize {
        self.start.unwrap_or(0)
    }

    #[must_use]
    pub fn range(&self) -> Option<(usize, usize)> {
        self.start.zip(self.end)
    }
}

/// Sort spans by their start offset (stable).
pub fn sort_by_start(entities: &mut [RawEntity]) {
    entities.sort_by_key(RawEntity::sort_key);
}

/// Span in the `output` list shape.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaggedSpan {
    #[serde(rename = "type", default)]
    pub entity_type: String,
    #[serde(default)]
    pub span: String,
    #[serde(default)]
    pub offset: Vec<i64>,
    #[serde(default)]
    pub start: Option<i64>,
    #[serde(default)]
    pub end: Option<i64>,
}

/// Span in the category-keyed shape.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategorySpan {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub span: Option<String>,
    #[serde(default)]
    pub start: Option<i64>,
    #[serde(default)]
    pub end: Option<i64>,
}

/// The two wire shapes models return entities in.
#[derive(Debug, Clone)]
pub enum EntityPayload {
    /// `{"output": [[{type, span, offset}], ...]}` or the flat
    /// `{"output": [{type, span, start, end}, ...]}`.
    Nested(Vec<TaggedSpan>),
    /// `{"人物": [{"text", "start", "end"}], "地理位置": [...]}`.
    ByCategory(Vec<(String, Vec<CategorySpan>)>),
}

impl EntityPayload {
    /// Classify a raw `entities` object. Items that do not deserialize are
    /// skipped; anything that is not an object yields an empty payload.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::Nested(Vec::new());
        };

        if let Some(output) = obj.get("output") {
            let spans = output
                .as_array()
                .map(|items| {
                    items
                        .iter()
                        .filter_map(|item| match item {
                            Value::Array(inner) => inner.first(),
                            Value::Object(_) => Some(item),
                            _ => None,
                        })
                        .filter_map(|item| serde_json::from_value(item.clone()).ok())
                        .collect()
                })
                .unwrap_or_default();
            return Self::Nested(spans);
        }

        let groups = obj
            .iter()
            .filter_map(|(category, entities)| {
                let list = entities.as_array()?;
                let spans = list
                    .iter()
                    .filter(|e| e.is_object())
                    .filter_map(|e| serde_json::from_value(e.clone()).ok())
                    .collect();
                Some((category.clone(), spans))
            })
            .collect();
        Self::ByCategory(groups)
    }

    /// Flatten into canonical entities. Missing offsets are recovered by
    /// locating the span in `text`.
    #[must_use]
    pub fn into_entities(self, text: &str) -> Vec<RawEntity> {
        match self {
            Self::Nested(spans) => spans
                .into_iter()
                .map(|s| {
                    let (start, end) = match s.offset.as_slice() {
                        [from, to, ..] => (to_offset(*from), to_offset(*to)),
                        _ if s.start.is_some() || s.end.is_some() => {
                            (s.start.and_then(to_offset), s.end.and_then(to_offset))
                        }
                        _ => locate(text, &s.span),
                    };
                    RawEntity {
                        entity_type: s.entity_type,
                        span: s.span,
                        start,
                        end,
                    }
                })
                .collect(),
            Self::ByCategory(groups) => groups
                .into_iter()
                .flat_map(|(category, spans)| {
                    spans.into_iter().filter_map(move |s| {
                        let span = s.text.filter(|t| !t.is_empty()).or(s.span)?;
                        if span.is_empty() {
                            return None;
                        }
                        Some(RawEntity {
                            entity_type: category.clone(),
                            span,
                            start: s.start.and_then(to_offset),
                            end: s.end.and_then(to_offset),
                        })
                    })
                })
                .collect(),
        }
    }
}

fn to_offset(raw: i64) -> Option<usize> {
    usize::try_from(raw).ok()
}

fn locate(text: &str, span: &str) -> (Option<usize>, Option<usize>) {
    char_find(text, span).map_or((None, None), |start| {
        (Some(start), Some(start + char_len(span)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_singleton_lists() {
        let value = json!({
            "output": [
                [{"type": "人物", "span": "黄大大", "offset": [20, 23]}],
                [{"type": "地理位置", "span": "广东省", "offset": [0, 3]}],
                []
            ]
        });
        let entities = EntityPayload::from_value(&value).into_entities("");
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0], RawEntity::new("人物", "黄大大", 20, 23));
        assert_eq!(entities[1].range(), Some((0, 3)));
    }

    #[test]
    fn nested_without_offset_locates_span() {
        let value = json!({"output": [[{"type": "地理位置", "span": "深圳市"}]]});
        let entities = EntityPayload::from_value(&value).into_entities("广东省深圳市龙岗区");
        assert_eq!(entities[0].range(), Some((3, 6)));

        let missing = EntityPayload::from_value(&value).into_entities("北京市");
        assert_eq!(missing[0].range(), None);
    }

    #[test]
    fn flat_output_uses_start_end() {
        let value = json!({"output": [{"type": "PB", "start": 0, "end": 3, "span": "浙江省", "prob": 0.9}]});
        let entities = EntityPayload::from_value(&value).into_entities("");
        assert_eq!(entities, vec![RawEntity::new("PB", "浙江省", 0, 3)]);
    }

    #[test]
    fn by_category_shape() {
        let value = json!({
            "人物": [{"text": "张三", "start": 0, "end": 2}, {"text": ""}],
            "地理位置": [{"span": "广东省", "start": 3, "end": 6}],
            "note": "ignored"
        });
        let mut entities = EntityPayload::from_value(&value).into_entities("");
        sort_by_start(&mut entities);
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].entity_type, "人物");
        assert_eq!(entities[1].span, "广东省");
    }

    #[test]
    fn negative_offsets_become_none() {
        let value = json!({"人物": [{"text": "张三", "start": -1, "end": -1}]});
        let entities = EntityPayload::from_value(&value).into_entities("");
        assert_eq!(entities[0].range(), None);
        assert_eq!(entities[0].sort_key(), 0);
    }

    #[test]
    fn non_object_payload_is_empty() {
        assert!(EntityPayload::from_value(&json!([1, 2])).into_entities("").is_empty());
    }
}
