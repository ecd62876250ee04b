use dioxus::prelude::*;

#[derive(Clone, Debug, PartialEq)]
pub enum ExportStatus {
    Idle,
    Working(&'static str),
    Done(String),
    Error(String),
}

#[component]
pub fn StatusLine(status: Signal<ExportStatus>) -> Element {
    let feedback = match &status() {
        ExportStatus::Idle => None,
        ExportStatus::Working(label) => Some(("dashboard__status".to_string(), format!("{label}…"))),
        ExportStatus::Done(message) => Some((
            "dashboard__status dashboard__status--success".to_string(),
            format!("✅ {message}"),
        )),
        ExportStatus::Error(err) => Some((
            "dashboard__status dashboard__status--error".to_string(),
            format!("⚠️ {err}"),
        )),
    };

    rsx! {
        if let Some((class_name, message)) = feedback {
            p { class: "{class_name}", role: "status", "{message}" }
        }
    }
}
