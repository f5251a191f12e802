//! Notion `POST /v1/pages` request and response bodies.

use mono2notion_core::CanonicalRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatePageRequest {
    pub parent: Parent,
    pub properties: PageProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parent {
    pub database_id: String,
}

/// Database columns, named as they appear in the Notion table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageProperties {
    #[serde(rename = "Title")]
    pub title: TitleProperty,
    #[serde(rename = "Amount (UAH)")]
    pub amount_primary: NumberProperty,
    #[serde(rename = "Amount (EUR)")]
    pub amount_secondary: NumberProperty,
    #[serde(rename = "Exchange")]
    pub exchange: NumberProperty,
    #[serde(rename = "Date")]
    pub date: DateProperty,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleProperty {
    pub title: Vec<RichText>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RichText {
    pub text: TextContent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextContent {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumberProperty {
    pub number: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateProperty {
    pub date: DateRange,
}

/// `end` is always sent, as `null` for a point in time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateRange {
    pub start: String,
    pub end: Option<String>,
}

impl CreatePageRequest {
    pub fn for_record(database_id: &str, record: &CanonicalRecord) -> Self {
        Self {
            parent: Parent {
                database_id: database_id.to_string(),
            },
            properties: PageProperties {
                title: TitleProperty {
                    title: vec![RichText {
                        text: TextContent {
                            content: record.title.clone(),
                        },
                    }],
                },
                amount_primary: NumberProperty {
                    number: record.amount_primary,
                },
                amount_secondary: NumberProperty {
                    number: record.amount_secondary,
                },
                exchange: NumberProperty {
                    number: record.exchange_rate,
                },
                date: DateProperty {
                    date: DateRange {
                        start: record.timestamp.clone(),
                        end: None,
                    },
                },
            },
        }
    }
}

/// The fields we read back from a created page
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreatedPage {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
}
