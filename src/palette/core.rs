use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{GridError, Result};
use crate::model::{Card, CardId, CardPayload, CardWidth, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidthClass {
    Full,
    #[default]
    Half,
}

/// One palette entry: `{ id, type, title, icon, defaultData }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub width: WidthClass,
    #[serde(default)]
    pub default_data: Value,
}

impl Template {
    pub fn is_full_width(&self) -> bool {
        matches!(self.width, WidthClass::Full)
    }

    /// Build a card from this template. `span` is ignored for full-width
    /// templates.
    pub fn instantiate(&self, id: CardId, span: Span) -> Card {
        let width = match self.width {
            WidthClass::Full => CardWidth::Full,
            WidthClass::Half => CardWidth::Half(span),
        };
        Card {
            id,
            title: self.title.clone(),
            width,
            payload: CardPayload::decode(&self.kind, self.default_data.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Palette {
    templates: Vec<Template>,
}

impl Palette {
    pub fn new(templates: Vec<Template>) -> Result<Self> {
        let mut seen = HashSet::new();
        for template in &templates {
            if template.id.is_empty() {
                return Err(GridError::InvalidConfig(
                    "palette template with empty id".to_string(),
                ));
            }
            if !seen.insert(template.id.as_str()) {
                return Err(GridError::InvalidConfig(format!(
                    "duplicate palette template `{}`",
                    template.id
                )));
            }
        }
        Ok(Self { templates })
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let templates: Vec<Template> = serde_json::from_str(raw)?;
        Self::new(templates)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Catalog shipped with the staff dashboard.
    pub fn builtin() -> Self {
        let entry = |id: &str, kind: &str, title: &str, icon: &str, width: WidthClass, data: Value| {
            Template {
                id: id.to_string(),
                kind: kind.to_string(),
                title: title.to_string(),
                icon: icon.to_string(),
                width,
                default_data: data,
            }
        };
        Self {
            templates: vec![
                entry(
                    "stat",
                    "stat",
                    "Key metric",
                    "trending-up",
                    WidthClass::Half,
                    json!({ "label": "Active members", "value": "0" }),
                ),
                entry(
                    "chart",
                    "chart",
                    "Trend chart",
                    "bar-chart",
                    WidthClass::Half,
                    json!({ "labels": ["Jan", "Feb", "Mar"], "values": [0.0, 0.0, 0.0] }),
                ),
                entry(
                    "note",
                    "text",
                    "Note",
                    "file-text",
                    WidthClass::Half,
                    json!({ "body": "" }),
                ),
                entry(
                    "contacts",
                    "contacts",
                    "Contact list",
                    "users",
                    WidthClass::Half,
                    json!({ "contacts": [] }),
                ),
                entry(
                    "activity",
                    "activity",
                    "Activity feed",
                    "activity",
                    WidthClass::Full,
                    json!({ "limit": 20 }),
                ),
            ],
        }
    }

    pub fn get(&self, id: &str) -> Option<&Template> {
        self.templates.iter().find(|template| template.id == id)
    }

    pub fn require(&self, id: &str) -> Result<&Template> {
        self.get(id)
            .ok_or_else(|| GridError::UnknownTemplate(id.to_string()))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Template> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_catalog_json() {
        let palette = Palette::from_json_str(
            r#"[
                { "id": "kpi", "type": "stat", "title": "KPI", "icon": "hash",
                  "defaultData": { "label": "Visits", "value": "12" } },
                { "id": "wide", "type": "map", "title": "Map", "width": "full" }
            ]"#,
        )
        .unwrap();

        assert_eq!(palette.len(), 2);
        let kpi = palette.require("kpi").unwrap();
        assert_eq!(kpi.width, WidthClass::Half);
        assert!(palette.require("wide").unwrap().is_full_width());
        assert!(matches!(
            palette.require("nope"),
            Err(GridError::UnknownTemplate(id)) if id == "nope"
        ));
    }

    #[test]
    fn duplicate_template_ids_are_rejected() {
        let raw = r#"[
            { "id": "x", "type": "text", "title": "One" },
            { "id": "x", "type": "text", "title": "Two" }
        ]"#;
        assert!(matches!(
            Palette::from_json_str(raw),
            Err(GridError::InvalidConfig(_))
        ));
    }

    #[test]
    fn instantiate_seeds_payload_and_width() {
        let palette = Palette::builtin();
        let card = palette
            .require("stat")
            .unwrap()
            .instantiate(CardId::from("stat-1"), Span::clamped(4));
        assert_eq!(card.kind(), "stat");
        assert_eq!(card.title, "Key metric");
        assert_eq!(card.span().map(Span::get), Some(4));

        let banner = palette
            .require("activity")
            .unwrap()
            .instantiate(CardId::from("activity-1"), Span::clamped(4));
        assert_eq!(banner.width, CardWidth::Full);
        assert!(matches!(banner.payload, CardPayload::Opaque { .. }));
    }
}
