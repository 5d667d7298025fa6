//! Markup for the events table fragment and its host page.
//!
//! Rendering is a pure function of its inputs. All event text is escaped
//! before it is placed into markup.

use url::form_urlencoded;

use crate::columns::{all_columns, Column, ColumnId, ColumnSelection, COLUMN_FLAG_ON};
use crate::filter::{
    format_instant, FilterSet, NAME_FILTER, SEVERITY_FILTER, SOURCE_FILTER, TIMESTAMP_FILTER,
    TIMESTAMP_VALUE, TIMESTAMP_VALUE_END,
};
use crate::model::Event;
use crate::paging::Paging;
use crate::request::PAGE_PARAM;

/// Path the pagination controls request.
pub const EVENTS_PATH: &str = "/events";

/// Element the fragment replaces.
pub const TABLE_TARGET: &str = "#events-table";

const CELL_CLASS: &str = "py-3 px-6 text-left whitespace-nowrap overflow-hidden text-ellipsis";
const BUTTON_CLASS: &str = "bg-blue-500 hover:bg-blue-700 text-white font-bold py-2 px-4 rounded mr-2";

/// Renders the table, its header and the pagination controls.
pub fn render_fragment(
    selection: &ColumnSelection,
    events: &[Event],
    paging: &Paging,
    filters: &FilterSet,
) -> String {
    let mut html = String::with_capacity(512 + events.len() * 256);

    html.push_str(r#"<table class="w-full bg-white shadow-md rounded mb-4">"#);
    html.push_str(r#"<thead><tr class="bg-gray-200 text-gray-600 uppercase text-sm leading-normal">"#);
    for column in selection.iter() {
        html.push_str(&format!(
            r#"<th class="{CELL_CLASS}">{}</th>"#,
            escape_html(column.name)
        ));
    }
    html.push_str("</tr></thead>");

    html.push_str(r#"<tbody class="text-gray-600 text-sm font-light">"#);
    for event in events {
        html.push_str(r#"<tr class="border-b border-gray-200 hover:bg-gray-100">"#);
        for column in selection.iter() {
            html.push_str(&format!(
                r#"<td class="{CELL_CLASS}">{}</td>"#,
                escape_html(&cell_value(event, column))
            ));
        }
        html.push_str("</tr>");
    }
    if events.is_empty() && paging.total_pages == 0 {
        html.push_str(&format!(
            r#"<tr><td class="{CELL_CLASS}" colspan="{}">No events found</td></tr>"#,
            selection.len()
        ));
    }
    html.push_str("</tbody></table>");

    if paging.total_pages > 0 || paging.has_previous {
        render_pagination(&mut html, selection, paging, filters);
    }

    html
}

fn render_pagination(
    html: &mut String,
    selection: &ColumnSelection,
    paging: &Paging,
    filters: &FilterSet,
) {
    html.push_str(r#"<div class="flex justify-between items-center mt-4">"#);
    if paging.total_pages > 0 {
        html.push_str(&format!(
            "<div>Showing page {} of {}</div>",
            paging.page, paging.total_pages
        ));
    } else {
        html.push_str("<div></div>");
    }

    html.push_str("<div>");
    if paging.has_previous {
        push_control(html, "Previous", paging.page - 1, selection, filters);
    }
    if paging.has_next {
        push_control(html, "Next", paging.page.saturating_add(1), selection, filters);
    }
    html.push_str("</div></div>");
}

fn push_control(
    html: &mut String,
    label: &str,
    target_page: u64,
    selection: &ColumnSelection,
    filters: &FilterSet,
) {
    html.push_str(&format!(
        r#"<button class="{BUTTON_CLASS}" hx-get="{}" hx-target="{TABLE_TARGET}" hx-swap="innerHTML">{label}</button>"#,
        escape_html(&control_url(target_page, selection, filters))
    ));
}

/// URL that reproduces the current selection and filters on `target_page`.
pub fn control_url(target_page: u64, selection: &ColumnSelection, filters: &FilterSet) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query.append_pair(PAGE_PARAM, &target_page.to_string());
    for column in selection.optional() {
        query.append_pair(&column.flag_name(), COLUMN_FLAG_ON);
    }
    for (key, value) in filters.to_params() {
        query.append_pair(key, &value);
    }
    format!("{EVENTS_PATH}?{}", query.finish())
}

/// Textual value of one cell.
pub fn cell_value(event: &Event, column: &Column) -> String {
    match column.id {
        ColumnId::Id => event.id.to_string(),
        ColumnId::Timestamp => format_instant(event.timestamp),
        ColumnId::Name => event.name.clone(),
        ColumnId::Description => event.description.clone(),
        ColumnId::Source => event.source.clone(),
        ColumnId::Severity => event.severity.clone(),
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Host page: column toggles, filter inputs and the table container.
pub fn render_index() -> String {
    let mut html = String::from(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Event Log</title>
<script src="https://unpkg.com/htmx.org@1.9.12"></script>
<script src="https://cdn.tailwindcss.com"></script>
</head>
<body class="bg-gray-100 p-8">
<h1 class="text-2xl font-bold mb-4">Event Log</h1>
"#,
    );

    html.push_str(&format!(
        r#"<form id="controls" class="mb-4 space-y-2" hx-get="/filter" hx-target="{TABLE_TARGET}" hx-swap="innerHTML" hx-trigger="change, submit">"#
    ));

    html.push_str(r#"<div class="flex gap-4">"#);
    for column in all_columns().iter().filter(|column| !column.show_by_default) {
        let flag = column.flag_name();
        html.push_str(&format!(
            r#"<label><input type="checkbox" name="{flag}" value="{COLUMN_FLAG_ON}"> {}</label>"#,
            escape_html(column.name)
        ));
    }
    html.push_str("</div>");

    html.push_str(&format!(
        r##"<div class="flex gap-4">
<select name="{TIMESTAMP_FILTER}"><option value="">Any time</option><option value="before">Before</option><option value="after">After</option><option value="between">Between</option></select>
<input type="datetime-local" name="{TIMESTAMP_VALUE}">
<input type="datetime-local" name="{TIMESTAMP_VALUE_END}">
<input type="text" name="{SOURCE_FILTER}" placeholder="Sources (comma separated)">
<input type="text" name="{SEVERITY_FILTER}" placeholder="Severity">
<input type="text" name="{NAME_FILTER}" placeholder="Names (comma separated)">
</div>
</form>
<div id="events-table" hx-get="{EVENTS_PATH}" hx-trigger="load" hx-include="#controls"></div>
</body>
</html>
"##
    ));

    html
}
