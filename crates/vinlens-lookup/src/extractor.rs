use crate::error::ExtractionError;
use indexmap::IndexMap;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use std::sync::OnceLock;
use vinlens_provider::FieldRule;

type Result<T> = std::result::Result<T, ExtractionError>;

/// Field name → extracted value, in rule order.
pub type ExtractionResult = IndexMap<String, FieldValue>;

/// One row of an equipment table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EquipmentItem {
    pub code: String,
    pub description: String,
}

/// Value produced by a single field rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
    Map(IndexMap<String, String>),
    Table(Vec<EquipmentItem>),
}

/// Parse a response body and apply every rule.
///
/// All-or-nothing: the first failing rule fails the whole extraction.
pub fn extract_page(body: &str, rules: &[FieldRule]) -> Result<ExtractionResult> {
    if body.trim().is_empty() {
        return Err(ExtractionError::EmptyDocument);
    }

    let document = Html::parse_document(body);
    extract_all(&document, rules)
}

pub fn extract_all(document: &Html, rules: &[FieldRule]) -> Result<ExtractionResult> {
    rules
        .iter()
        .map(|rule| Ok((rule.field().to_string(), extract_field(document, rule)?)))
        .collect()
}

pub fn extract_field(document: &Html, rule: &FieldRule) -> Result<FieldValue> {
    match rule {
        FieldRule::ScalarByLabel { field, label } => scalar_by_label(document, field, label),
        FieldRule::ScalarBySelector { field, selector } => {
            scalar_by_selector(document, field, selector)
        }
        FieldRule::ListBySelector { selector, .. } => {
            Ok(FieldValue::List(select_texts(document, selector)?))
        }
        FieldRule::PairedList {
            field,
            key_selector,
            value_selector,
        } => paired_list(document, field, key_selector, value_selector),
        FieldRule::TableRows {
            field,
            table_selector,
        } => table_rows(document, field, table_selector).map(FieldValue::Table),
    }
}

/// Trimmed text content; internal whitespace is left as-is.
fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| ExtractionError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

fn scalar_by_label(document: &Html, field: &str, label: &str) -> Result<FieldValue> {
    let label = label.trim();

    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|element| element_text(element) == label)
        .find_map(|element| element.next_siblings().find_map(ElementRef::wrap))
        .map(|cell| FieldValue::Text(element_text(&cell)))
        .ok_or_else(|| ExtractionError::FieldNotFound {
            field: field.to_string(),
            target: format!("label '{label}'"),
        })
}

fn scalar_by_selector(document: &Html, field: &str, selector: &str) -> Result<FieldValue> {
    let parsed = parse_selector(selector)?;

    document
        .select(&parsed)
        .next()
        .map(|element| FieldValue::Text(element_text(&element)))
        .ok_or_else(|| ExtractionError::FieldNotFound {
            field: field.to_string(),
            target: format!("selector '{selector}'"),
        })
}

/// Texts of all matches; no match is an empty list, not an error.
fn select_texts(document: &Html, selector: &str) -> Result<Vec<String>> {
    let parsed = parse_selector(selector)?;
    Ok(document
        .select(&parsed)
        .map(|element| element_text(&element))
        .collect())
}

fn paired_list(
    document: &Html,
    field: &str,
    key_selector: &str,
    value_selector: &str,
) -> Result<FieldValue> {
    let keys = select_texts(document, key_selector)?;
    let values = select_texts(document, value_selector)?;

    if keys.len() != values.len() {
        return Err(ExtractionError::MismatchedPairLength {
            field: field.to_string(),
            keys: keys.len(),
            values: values.len(),
        });
    }

    Ok(FieldValue::Map(keys.into_iter().zip(values).collect()))
}

fn table_rows(document: &Html, field: &str, table_selector: &str) -> Result<Vec<EquipmentItem>> {
    static ROW: OnceLock<Selector> = OnceLock::new();
    static CELL: OnceLock<Selector> = OnceLock::new();
    let row_selector = ROW.get_or_init(|| Selector::parse("tr").expect("valid selector"));
    let cell_selector = CELL.get_or_init(|| Selector::parse("td").expect("valid selector"));

    let parsed = parse_selector(table_selector)?;
    let table = document
        .select(&parsed)
        .next()
        .ok_or_else(|| ExtractionError::TableNotFound {
            field: field.to_string(),
            selector: table_selector.to_string(),
        })?;

    Ok(table
        .select(row_selector)
        .filter_map(|row| {
            let mut cells = row.select(cell_selector);
            let code = cells.next()?;
            let description = cells.next()?;
            Some(EquipmentItem {
                code: element_text(&code),
                description: element_text(&description),
            })
        })
        .collect())
}
