use crate::Result;
use crate::component::alert::unwrap_without_alert;
use crate::component::status::{DEFAULT_EMPTY_MESSAGE, show_empty_state};
use crate::format::format_number;
use crate::utils::{clear_element, create_element_with_class, get_document, set_attribute};
use serde_json::{Map, Value};
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::wasm_bindgen;
use web_sys::{Document, Element};

pub type Row = Map<String, Value>;

const MISSING_CELL: &str = "-";
const DEFAULT_STAT_ICON: &str = "chart-bar";
const DEFAULT_STAT_COLOR: &str = "primary";
const DEFAULT_PROGRESS_MAX: f64 = 100.0;

/// Columns to display: the requested ones, or the keys of the first row.
pub fn table_columns(rows: &[Row], columns: Option<Vec<String>>) -> Vec<String> {
    columns.unwrap_or_else(|| {
        rows.first()
            .map(|row| row.keys().cloned().collect())
            .unwrap_or_default()
    })
}

pub fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => MISSING_CELL.to_owned(),
        Some(Value::String(text)) if text.is_empty() => MISSING_CELL.to_owned(),
        Some(Value::String(text)) => text.clone(),
        Some(value) => value.to_string(),
    }
}

pub fn render_data_table(
    document: &Document,
    container: &Element,
    rows: &[Row],
    columns: Option<Vec<String>>,
) -> Result<()> {
    if rows.is_empty() {
        return show_empty_state(document, container, DEFAULT_EMPTY_MESSAGE);
    }

    let columns = table_columns(rows, columns);
    clear_element(container);
    let wrapper =
        create_element_with_class(document, "div", Some(container), None, "table-responsive")?;
    let table = create_element_with_class(
        document,
        "table",
        Some(&wrapper),
        None,
        "table table-striped table-hover",
    )?;

    let head = create_element_with_class(document, "thead", Some(&table), None, "")?;
    let head_row = create_element_with_class(document, "tr", Some(&head), None, "")?;
    for column in &columns {
        create_element_with_class(document, "th", Some(&head_row), Some(column), "")?;
    }

    let body = create_element_with_class(document, "tbody", Some(&table), None, "")?;
    for row in rows {
        let row_element = create_element_with_class(document, "tr", Some(&body), None, "")?;
        for column in &columns {
            let text = cell_text(row.get(column));
            create_element_with_class(document, "td", Some(&row_element), Some(&text), "")?;
        }
    }

    Ok(())
}

/// Render `rows`, an array of plain objects, as a table inside `container_id`.
#[wasm_bindgen]
pub fn create_data_table(container_id: &str, rows: JsValue, columns: Option<Vec<String>>) {
    unwrap_without_alert(get_document().and_then(|document| {
        let Some(container) = document.get_element_by_id(container_id) else {
            return Ok(());
        };
        let rows: Vec<Row> = if rows.is_null() || rows.is_undefined() {
            vec![]
        } else {
            serde_wasm_bindgen::from_value(rows)?
        };
        render_data_table(&document, &container, &rows, columns)
    }));
}

#[wasm_bindgen]
pub fn create_stat_card(
    container_id: &str,
    title: &str,
    value: &str,
    icon: Option<String>,
    color: Option<String>,
) {
    unwrap_without_alert(get_document().and_then(|document| {
        let Some(container) = document.get_element_by_id(container_id) else {
            return Ok(());
        };
        let icon = icon.as_deref().unwrap_or(DEFAULT_STAT_ICON);
        let color = color.as_deref().unwrap_or(DEFAULT_STAT_COLOR);

        clear_element(&container);
        let card = create_element_with_class(
            &document,
            "div",
            Some(&container),
            None,
            &format!("stat-card bg-{color}"),
        )?;
        create_element_with_class(
            &document,
            "i",
            Some(&card),
            None,
            &format!("fas fa-{icon} fa-2x mb-3"),
        )?;
        create_element_with_class(&document, "h3", Some(&card), Some(value), "")?;
        create_element_with_class(&document, "p", Some(&card), Some(title), "")?;
        Ok(())
    }));
}

/// Share of `max` reached by `value`, in percent. A null `max` counts as nothing reached.
pub fn progress_percentage(value: f64, max: f64) -> f64 {
    if max == 0.0 {
        return 0.0;
    }
    value / max * 100.0
}

pub fn progress_color(percentage: f64) -> &'static str {
    if percentage >= 80.0 {
        "success"
    } else if percentage >= 60.0 {
        "warning"
    } else {
        "danger"
    }
}

#[wasm_bindgen]
pub fn create_progress_bar(
    container_id: &str,
    value: f64,
    max: Option<f64>,
    label: Option<String>,
) {
    unwrap_without_alert(get_document().and_then(|document| {
        let Some(container) = document.get_element_by_id(container_id) else {
            return Ok(());
        };
        let max = max.unwrap_or(DEFAULT_PROGRESS_MAX);
        let percentage = progress_percentage(value, max);

        clear_element(&container);
        let progress =
            create_element_with_class(&document, "div", Some(&container), None, "progress mb-2")?;
        let bar = create_element_with_class(
            &document,
            "div",
            Some(&progress),
            None,
            &format!("progress-bar bg-{}", progress_color(percentage)),
        )?;
        set_attribute(&bar, "role", "progressbar")?;
        set_attribute(&bar, "style", &format!("width: {percentage}%"))?;

        let legend = create_element_with_class(
            &document,
            "div",
            Some(&container),
            None,
            "d-flex justify-content-between",
        )?;
        create_element_with_class(&document, "span", Some(&legend), label.as_deref(), "")?;
        let counts = format!(
            "{}/{}",
            format_number(value, None),
            format_number(max, None)
        );
        create_element_with_class(&document, "span", Some(&legend), Some(&counts), "")?;
        Ok(())
    }));
}
