use std::sync::Arc;
use std::time::Duration;

use dioxus::prelude::*;
use rfd::FileDialog;

use crate::domain::entities::table::Table;
use crate::domain::entities::value::DataType;
use crate::infra::http::client::HttpBackend;
use crate::ui::state::app_state::AppState;
use crate::usecase::ports::backend::EnrichmentBackend;
use crate::usecase::ports::clock::SystemClock;
use crate::usecase::services::enrichment_service::{
    merge_results, EnrichmentKind, EnrichmentRequest, EnrichmentWorkflow, StepEvent,
};
use crate::usecase::services::export_service::{default_export_name, ExportService};
use crate::usecase::services::import_service::ImportService;
use crate::NONE_OPTION_VALUE;

const STEP_TICK: Duration = Duration::from_millis(25);

fn data_type_from_key(key: &str) -> DataType {
    match key {
        "number" => DataType::Number,
        "boolean" => DataType::Boolean,
        "date" => DataType::Date,
        _ => DataType::String,
    }
}

/// Runs the workflow to a terminal state in the background, feeding signals
/// the UI renders. One loop serves exactly one `begin`.
fn drive_enrichment(
    mut workflow: Signal<Option<EnrichmentWorkflow>>,
    mut table: Signal<Table>,
    mut status: Signal<String>,
    mut progress: Signal<f64>,
    mut enriching: Signal<bool>,
    mut drawer_open: Signal<bool>,
    target_column: String,
) {
    spawn(async move {
        loop {
            let event = match workflow.write().as_mut() {
                Some(active) => active.step(),
                None => break,
            };
            let delay = match &event {
                StepEvent::Waiting { remaining } => *remaining,
                _ => STEP_TICK,
            };
            match event {
                StepEvent::Uploaded { job_id } => {
                    *status.write() = format!("Snapshot uploaded (job {job_id})");
                }
                StepEvent::Started { job_id } => {
                    *status.write() = format!("Enrichment job {job_id} running");
                }
                StepEvent::Waiting { .. } => {}
                StepEvent::Progress { percent } => {
                    progress.set(percent);
                }
                StepEvent::Finished { request, results } => {
                    let (merged, outcome) = merge_results(
                        &table(),
                        &request.key_column,
                        &request.target_column,
                        &results,
                    );
                    let row_count = merged.row_count();
                    table.set(merged.with_enriching(&request.target_column, false));
                    progress.set(100.0);
                    enriching.set(false);
                    *status.write() = format!("Enriched {} of {row_count} rows", outcome.matched);
                    workflow.set(None);
                    break;
                }
                StepEvent::CancelledByServer => {
                    table.set(table().with_enriching(&target_column, false));
                    enriching.set(false);
                    drawer_open.set(false);
                    *status.write() = "Enrichment was cancelled".to_string();
                    workflow.set(None);
                    break;
                }
                StepEvent::Aborted { message } => {
                    table.set(table().with_enriching(&target_column, false));
                    enriching.set(false);
                    drawer_open.set(false);
                    *status.write() = format!("Enrichment failed: {message}");
                    workflow.set(None);
                    break;
                }
                StepEvent::Settled => {
                    table.set(table().with_enriching(&target_column, false));
                    enriching.set(false);
                    workflow.set(None);
                    break;
                }
            }
            tokio::time::sleep(delay).await;
        }
    });
}

#[component]
pub fn App() -> Element {
    let AppState {
        mut config,
        mut token_input,
        mut table,
        mut file_name,
        mut busy,
        mut status,
        mut show_add_column,
        mut new_column_name,
        mut new_column_type,
        mut show_enrich,
        mut enrich_key_column,
        mut enrich_target_column,
        mut enrich_kind,
        mut editing_column,
        mut editing_column_value,
        mut workflow,
        mut enriching,
        mut progress,
        mut drawer_open,
        mut show_jobs,
        mut jobs,
    } = AppState::new();

    let signed_in = config().is_signed_in();
    let table_snapshot = table();
    let populated_columns = table_snapshot.populated_columns();
    let empty_columns = table_snapshot.empty_columns();
    let editing_column_snapshot = editing_column();
    let current_progress = progress();
    let progress_label = format!("{current_progress:.0}");
    let row_count = table_snapshot.row_count();
    let column_count = table_snapshot.column_count();
    let jobs_snapshot = jobs();

    if !signed_in {
        return rsx! {
            div {
                style: "font-family: sans-serif; min-height: 100vh; background: #fff; display: flex; align-items: center; justify-content: center;",
                div {
                    style: "border: 2px dashed #bbb; border-radius: 12px; padding: 32px; min-width: 420px; text-align: center;",
                    h2 { "ampledata" }
                    p { "Sign in to enrich your data. Paste the API token issued by your identity provider." }
                    input {
                        style: "width: 90%; padding: 6px 8px; border: 1px solid #bbb; border-radius: 6px;",
                        r#type: "password",
                        placeholder: "API token",
                        value: token_input(),
                        oninput: move |event| token_input.set(event.value()),
                    }
                    div { style: "margin-top: 12px;",
                        button {
                            style: "border: 1px solid #4c6ef5; background: #eef4ff; padding: 6px 14px; border-radius: 6px; cursor: pointer;",
                            disabled: token_input().trim().is_empty(),
                            onclick: move |_| {
                                let mut next = config();
                                next.token = Some(token_input().trim().to_string());
                                match next.save() {
                                    Ok(()) => {
                                        config.set(next);
                                        token_input.set(String::new());
                                        *status.write() = "Signed in".to_string();
                                    }
                                    Err(err) => {
                                        *status.write() = format!("Could not save token: {err}");
                                    }
                                }
                            },
                            "Sign In"
                        }
                    }
                    p { style: "color: #888; font-size: 13px;", " {status}" }
                }
            }
        };
    }

    rsx! {
        div {
            style: "font-family: sans-serif; padding: 12px; background: #fff; min-height: 100vh; overflow: auto;",

            div {
                style: "display: flex; gap: 8px; align-items: center; margin-bottom: 12px; position: sticky; top: 0; background: #fff; z-index: 900; padding: 8px 0;",
                h2 { style: "margin: 0 16px 0 0;", "ampledata" }

                button {
                    disabled: busy(),
                    onclick: move |_| {
                        let Some(file_path) = FileDialog::new()
                            .add_filter("Data files", &["csv", "json", "txt"])
                            .add_filter("All files", &["*"])
                            .pick_file() else {
                            *status.write() = "Import cancelled".to_string();
                            return;
                        };
                        *busy.write() = true;
                        match ImportService::new().import_path(&file_path) {
                            Ok(imported) => {
                                let rows = imported.table.row_count();
                                let columns = imported.table.column_count();
                                table.set(imported.table);
                                file_name.set(Some(imported.file_name));
                                *status.write() =
                                    format!("Loaded {rows} rows \u{d7} {columns} columns");
                            }
                            Err(err) => {
                                *status.write() = format!("Import failed: {err}");
                            }
                        }
                        *busy.write() = false;
                    },
                    "Open File"
                }

                button {
                    disabled: busy() || table_snapshot.is_empty(),
                    onclick: move |_| {
                        let Some(path) = FileDialog::new()
                            .set_file_name(default_export_name(file_name().as_deref()))
                            .save_file() else {
                            *status.write() = "Export cancelled".to_string();
                            return;
                        };
                        *busy.write() = true;
                        match ExportService::new().write_to(&table(), &path) {
                            Ok(()) => {
                                *status.write() = format!("Exported to {}", path.display());
                            }
                            Err(err) => {
                                *status.write() = format!("Export failed: {err}");
                            }
                        }
                        *busy.write() = false;
                    },
                    "Export CSV"
                }

                button {
                    disabled: busy(),
                    onclick: move |_| {
                        let backend = HttpBackend::new(&config());
                        match backend.list_jobs(0, 20) {
                            Ok(list) => {
                                jobs.set(list.jobs);
                                show_jobs.set(true);
                            }
                            Err(err) => {
                                *status.write() = format!("Could not load jobs: {err}");
                            }
                        }
                    },
                    "Jobs"
                }

                button {
                    onclick: move |_| {
                        let mut next = config();
                        next.token = None;
                        if let Err(err) = next.save() {
                            *status.write() = format!("Could not clear token: {err}");
                            return;
                        }
                        config.set(next);
                        *status.write() = "Signed out".to_string();
                    },
                    "Sign Out"
                }

                span { " {status}" }
            }

            if table_snapshot.is_empty() {
                div {
                    style: "display: flex; align-items: center; justify-content: center; min-height: 60vh;",
                    div {
                        style: "border: 2px dashed #bbb; border-radius: 12px; padding: 48px; text-align: center; min-width: 420px;",
                        h3 { "Upload your data" }
                        p { style: "color: #666;", "Open a CSV or JSON file to start editing and enriching." }
                        p { style: "color: #888; font-size: 13px;", "CSV \u{b7} JSON \u{b7} TXT" }
                    }
                }
            } else {
                div {
                    style: "display: flex; gap: 8px; align-items: center; margin-bottom: 12px;",
                    span {
                        style: "color: #666; font-size: 14px;",
                        "{row_count} rows \u{d7} {column_count} columns"
                    }
                    button {
                        disabled: busy(),
                        onclick: move |_| {
                            table.set(table().with_row());
                            *status.write() = "Row added".to_string();
                        },
                        "Add Row"
                    }
                    button {
                        disabled: busy(),
                        onclick: move |_| {
                            new_column_name.set(String::new());
                            new_column_type.set("string".to_string());
                            show_add_column.set(true);
                        },
                        "Add Column"
                    }
                    button {
                        disabled: busy()
                            || enriching()
                            || empty_columns.is_empty()
                            || populated_columns.is_empty(),
                        onclick: move |_| {
                            enrich_key_column.set(None);
                            enrich_target_column.set(None);
                            enrich_kind.set(None);
                            show_enrich.set(true);
                        },
                        "Enrich Data"
                    }
                    if enriching() {
                        button {
                            onclick: move |_| drawer_open.set(true),
                            "Show Progress"
                        }
                    }
                }

                div {
                    style: "overflow-x: auto; border: 1px solid #ddd; border-radius: 8px;",
                    table { style: "border-collapse: collapse; width: 100%; background: #fff;",
                        thead {
                            tr {
                                {table_snapshot.columns.iter().map(|column| {
                                    let name = column.name.clone();
                                    let name_for_edit = name.clone();
                                    let name_for_save = name.clone();
                                    let name_for_remove = name.clone();
                                    let is_editing = editing_column_snapshot.as_deref() == Some(name.as_str());
                                    let marker = if column.is_enriching { " \u{2726}" } else { "" };
                                    rsx!(
                                        th {
                                            style: "border-bottom: 1px solid #ddd; background: #f7f7f7; padding: 6px 8px; text-align: left; white-space: nowrap;",
                                            if is_editing {
                                                input {
                                                    value: editing_column_value(),
                                                    oninput: move |event| editing_column_value.set(event.value()),
                                                    onkeydown: move |event| {
                                                        if event.key() == Key::Enter {
                                                            table.set(table().with_renamed_column(
                                                                &name_for_save,
                                                                &editing_column_value(),
                                                            ));
                                                            editing_column.set(None);
                                                            editing_column_value.set(String::new());
                                                        } else if event.key() == Key::Escape {
                                                            editing_column.set(None);
                                                            editing_column_value.set(String::new());
                                                        }
                                                    },
                                                }
                                            } else {
                                                span {
                                                    style: "cursor: pointer; font-weight: 600;",
                                                    ondoubleclick: move |_| {
                                                        editing_column.set(Some(name_for_edit.clone()));
                                                        editing_column_value.set(name_for_edit.clone());
                                                    },
                                                    "{name}{marker}"
                                                }
                                                button {
                                                    style: "margin-left: 6px; border: none; background: transparent; color: #999; cursor: pointer;",
                                                    onclick: move |_| {
                                                        table.set(table().without_column(&name_for_remove));
                                                        *status.write() = format!("Removed column {name_for_remove}");
                                                    },
                                                    "\u{2715}"
                                                }
                                            }
                                        }
                                    )
                                })}
                                th { style: "border-bottom: 1px solid #ddd; background: #f7f7f7; width: 32px;", "" }
                            }
                        }
                        tbody {
                            {table_snapshot.rows.iter().enumerate().map(|(row_idx, row)| {
                                let cells = table_snapshot.columns.iter().map(|column| {
                                    let column_name = column.name.clone();
                                    let value = row.get(&column_name).display();
                                    let locked = column.is_enriching;
                                    rsx!(
                                        td {
                                            style: "border-bottom: 1px solid #eee; padding: 2px 4px;",
                                            input {
                                                style: "border: none; background: transparent; width: 100%; padding: 4px;",
                                                disabled: locked,
                                                value: "{value}",
                                                placeholder: "\u{2014}",
                                                oninput: move |event| {
                                                    match table().with_cell(row_idx, &column_name, &event.value()) {
                                                        Ok(next) => table.set(next),
                                                        Err(err) => {
                                                            *status.write() = format!("Edit failed: {err}");
                                                        }
                                                    }
                                                },
                                            }
                                        }
                                    )
                                }).collect::<Vec<_>>();
                                rsx!(
                                    tr {
                                        {cells.into_iter()}
                                        td {
                                            style: "border-bottom: 1px solid #eee; text-align: center;",
                                            button {
                                                style: "border: none; background: transparent; color: #999; cursor: pointer;",
                                                onclick: move |_| {
                                                    match table().without_row(row_idx) {
                                                        Ok(next) => table.set(next),
                                                        Err(err) => {
                                                            *status.write() = format!("Remove failed: {err}");
                                                        }
                                                    }
                                                },
                                                "\u{2715}"
                                            }
                                        }
                                    }
                                )
                            })}
                        }
                    }
                }
            }

            if show_add_column() {
                div {
                    style: "position: fixed; inset: 0; background: rgba(0,0,0,0.35); display: flex; align-items: center; justify-content: center; z-index: 1100;",
                    div {
                        style: "background: #fff; padding: 16px; border: 1px solid #999; border-radius: 8px; min-width: 320px;",
                        div { style: "margin-bottom: 8px; font-weight: 600;", "Add New Column" }
                        div { style: "display: grid; grid-template-columns: 100px 1fr; gap: 6px; align-items: center;",
                            label { "Name" }
                            input {
                                placeholder: "e.g., Email, Phone, Company",
                                value: new_column_name(),
                                oninput: move |event| new_column_name.set(event.value()),
                            }
                            label { "Data type" }
                            select {
                                value: new_column_type(),
                                onchange: move |event| new_column_type.set(event.value()),
                                option { value: "string", "String" }
                                option { value: "number", "Number" }
                                option { value: "boolean", "Boolean" }
                                option { value: "date", "Date" }
                            }
                        }
                        div { style: "display: flex; gap: 8px; margin-top: 12px;",
                            button {
                                disabled: new_column_name().trim().is_empty(),
                                onclick: move |_| {
                                    let data_type = data_type_from_key(&new_column_type());
                                    table.set(table().with_column(&new_column_name(), data_type));
                                    show_add_column.set(false);
                                    new_column_name.set(String::new());
                                },
                                "Add Column"
                            }
                            button {
                                onclick: move |_| show_add_column.set(false),
                                "Cancel"
                            }
                        }
                    }
                }
            }

            if show_enrich() {
                div {
                    style: "position: fixed; inset: 0; background: rgba(0,0,0,0.35); display: flex; align-items: center; justify-content: center; z-index: 1100;",
                    div {
                        style: "background: #fff; padding: 16px; border: 1px solid #999; border-radius: 8px; min-width: 360px;",
                        div { style: "margin-bottom: 4px; font-weight: 600;", "Enrich Data" }
                        div { style: "margin-bottom: 8px; color: #666; font-size: 13px;", "Select a column and data type to enrich" }
                        div { style: "display: grid; grid-template-columns: 140px 1fr; gap: 6px; align-items: center;",
                            label { "Key Column" }
                            select {
                                value: enrich_key_column().unwrap_or_else(|| NONE_OPTION_VALUE.to_string()),
                                onchange: move |event| {
                                    let value = event.value();
                                    enrich_key_column.set((value != NONE_OPTION_VALUE).then_some(value));
                                },
                                option { value: "{NONE_OPTION_VALUE}", "Select key column" }
                                for name in populated_columns.clone() {
                                    option { value: "{name}", "{name}" }
                                }
                            }
                            label { "Column to Enrich" }
                            select {
                                value: enrich_target_column().unwrap_or_else(|| NONE_OPTION_VALUE.to_string()),
                                onchange: move |event| {
                                    let value = event.value();
                                    enrich_target_column.set((value != NONE_OPTION_VALUE).then_some(value));
                                },
                                option { value: "{NONE_OPTION_VALUE}", "Select column" }
                                for name in empty_columns.clone() {
                                    option { value: "{name}", "{name}" }
                                }
                            }
                            label { "Data Type" }
                            select {
                                value: enrich_kind().unwrap_or_else(|| NONE_OPTION_VALUE.to_string()),
                                onchange: move |event| {
                                    let value = event.value();
                                    enrich_kind.set((value != NONE_OPTION_VALUE).then_some(value));
                                },
                                option { value: "{NONE_OPTION_VALUE}", "Select data type" }
                                {EnrichmentKind::ALL.iter().map(|kind| {
                                    let key = kind.key();
                                    let label = kind.label();
                                    rsx!(
                                        option { value: "{key}", "{label}" }
                                    )
                                })}
                            }
                        }
                        div { style: "display: flex; gap: 8px; margin-top: 12px;",
                            button {
                                disabled: enrich_key_column().is_none()
                                    || enrich_target_column().is_none()
                                    || enrich_kind().is_none(),
                                onclick: move |_| {
                                    let (Some(key_column), Some(target_column), Some(kind_key)) = (
                                        enrich_key_column(),
                                        enrich_target_column(),
                                        enrich_kind(),
                                    ) else {
                                        return;
                                    };
                                    let Some(kind) = EnrichmentKind::from_key(&kind_key) else {
                                        return;
                                    };
                                    let request = EnrichmentRequest {
                                        key_column,
                                        target_column: target_column.clone(),
                                        kind,
                                    };
                                    let backend = Arc::new(HttpBackend::new(&config()));
                                    let mut flow =
                                        EnrichmentWorkflow::new(backend, Arc::new(SystemClock));
                                    match flow.begin(&table(), request) {
                                        Ok(()) => {
                                            table.set(table().with_enriching(&target_column, true));
                                            enriching.set(true);
                                            progress.set(0.0);
                                            drawer_open.set(true);
                                            show_enrich.set(false);
                                            workflow.set(Some(flow));
                                            drive_enrichment(
                                                workflow,
                                                table,
                                                status,
                                                progress,
                                                enriching,
                                                drawer_open,
                                                target_column,
                                            );
                                        }
                                        Err(err) => {
                                            *status.write() =
                                                format!("Could not start enrichment: {err}");
                                        }
                                    }
                                },
                                "Start Enrichment"
                            }
                            button {
                                onclick: move |_| show_enrich.set(false),
                                "Cancel"
                            }
                        }
                    }
                }
            }

            if drawer_open() {
                div {
                    style: "position: fixed; top: 0; right: 0; bottom: 0; width: 320px; background: #fff; border-left: 1px solid #ccc; box-shadow: -8px 0 24px rgba(0,0,0,0.1); z-index: 1000; padding: 16px;",
                    div { style: "font-weight: 600; margin-bottom: 8px;", "Enrichment Progress" }
                    div {
                        style: "background: #eee; border-radius: 6px; height: 12px; overflow: hidden; margin-bottom: 8px;",
                        div {
                            style: "background: #4c6ef5; height: 100%; width: {current_progress}%;",
                        }
                    }
                    div { style: "color: #666; font-size: 14px; margin-bottom: 12px;",
                        "{progress_label}% of {row_count} rows"
                    }
                    div { style: "display: flex; gap: 8px;",
                        if enriching() {
                            button {
                                onclick: move |_| {
                                    let cancel_result = match workflow.write().as_mut() {
                                        Some(active) => Some(active.cancel()),
                                        None => None,
                                    };
                                    let enriching_columns: Vec<String> = table()
                                        .columns
                                        .iter()
                                        .filter(|column| column.is_enriching)
                                        .map(|column| column.name.clone())
                                        .collect();
                                    let mut next = table();
                                    for name in enriching_columns {
                                        next = next.with_enriching(&name, false);
                                    }
                                    table.set(next);
                                    enriching.set(false);
                                    drawer_open.set(false);
                                    match cancel_result {
                                        Some(Ok(message)) => {
                                            *status.write() = message;
                                        }
                                        Some(Err(err)) => {
                                            *status.write() =
                                                format!("Cancel request failed: {err}");
                                        }
                                        None => {}
                                    }
                                },
                                "Cancel Job"
                            }
                        }
                        button {
                            onclick: move |_| drawer_open.set(false),
                            "Close"
                        }
                    }
                }
            }

            if show_jobs() {
                div {
                    style: "position: fixed; inset: 0; background: rgba(0,0,0,0.35); display: flex; align-items: center; justify-content: center; z-index: 1100;",
                    div {
                        style: "background: #fff; padding: 16px; border: 1px solid #999; border-radius: 8px; min-width: 480px; max-height: 70vh; overflow: auto;",
                        div { style: "margin-bottom: 8px; font-weight: 600;", "Recent Jobs" }
                        if jobs_snapshot.is_empty() {
                            p { style: "color: #666;", "No jobs yet." }
                        } else {
                            table { style: "border-collapse: collapse; width: 100%;",
                                thead {
                                    tr {
                                        th { style: "text-align: left; border-bottom: 1px solid #ddd; padding: 4px 8px;", "Job" }
                                        th { style: "text-align: left; border-bottom: 1px solid #ddd; padding: 4px 8px;", "Status" }
                                        th { style: "text-align: right; border-bottom: 1px solid #ddd; padding: 4px 8px;", "Rows" }
                                        th { style: "text-align: left; border-bottom: 1px solid #ddd; padding: 4px 8px;", "Created" }
                                    }
                                }
                                tbody {
                                    {jobs_snapshot.iter().map(|job| {
                                        let created = job.created_at.format("%Y-%m-%d %H:%M").to_string();
                                        rsx!(
                                            tr {
                                                td { style: "border-bottom: 1px solid #eee; padding: 4px 8px; font-family: monospace; font-size: 12px;", "{job.job_id}" }
                                                td { style: "border-bottom: 1px solid #eee; padding: 4px 8px;", "{job.status}" }
                                                td { style: "border-bottom: 1px solid #eee; padding: 4px 8px; text-align: right;", "{job.total_rows}" }
                                                td { style: "border-bottom: 1px solid #eee; padding: 4px 8px;", "{created}" }
                                            }
                                        )
                                    })}
                                }
                            }
                        }
                        div { style: "margin-top: 12px;",
                            button {
                                onclick: move |_| show_jobs.set(false),
                                "Close"
                            }
                        }
                    }
                }
            }
        }
    }
}
