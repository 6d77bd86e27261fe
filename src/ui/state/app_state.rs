use dioxus::prelude::{use_signal, Signal};

use crate::domain::entities::job::JobSummary;
use crate::domain::entities::table::Table;
use crate::infra::config::ApiConfig;
use crate::usecase::services::enrichment_service::EnrichmentWorkflow;

pub struct AppState {
    pub config: Signal<ApiConfig>,
    pub token_input: Signal<String>,
    pub table: Signal<Table>,
    pub file_name: Signal<Option<String>>,
    pub busy: Signal<bool>,
    pub status: Signal<String>,
    pub show_add_column: Signal<bool>,
    pub new_column_name: Signal<String>,
    pub new_column_type: Signal<String>,
    pub show_enrich: Signal<bool>,
    pub enrich_key_column: Signal<Option<String>>,
    pub enrich_target_column: Signal<Option<String>>,
    pub enrich_kind: Signal<Option<String>>,
    pub editing_column: Signal<Option<String>>,
    pub editing_column_value: Signal<String>,
    pub workflow: Signal<Option<EnrichmentWorkflow>>,
    pub enriching: Signal<bool>,
    pub progress: Signal<f64>,
    pub drawer_open: Signal<bool>,
    pub show_jobs: Signal<bool>,
    pub jobs: Signal<Vec<JobSummary>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            config: use_signal(ApiConfig::load),
            token_input: use_signal(String::new),
            table: use_signal(Table::default),
            file_name: use_signal(|| None::<String>),
            busy: use_signal(|| false),
            status: use_signal(|| "Ready".to_string()),
            show_add_column: use_signal(|| false),
            new_column_name: use_signal(String::new),
            new_column_type: use_signal(|| "string".to_string()),
            show_enrich: use_signal(|| false),
            enrich_key_column: use_signal(|| None::<String>),
            enrich_target_column: use_signal(|| None::<String>),
            enrich_kind: use_signal(|| None::<String>),
            editing_column: use_signal(|| None::<String>),
            editing_column_value: use_signal(String::new),
            workflow: use_signal(|| None::<EnrichmentWorkflow>),
            enriching: use_signal(|| false),
            progress: use_signal(|| 0.0_f64),
            drawer_open: use_signal(|| false),
            show_jobs: use_signal(|| false),
            jobs: use_signal(Vec::<JobSummary>::new),
        }
    }
}
