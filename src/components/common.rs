use dioxus::prelude::*;
use crate::backend::NotificationLevel;

#[component]
pub fn Toaster() -> Element {
    let mut app_state = use_context::<crate::components::AppState>();
    let toasts = app_state.toasts.read().clone();

    rsx! {
        div { class: "toaster",
            for toast in toasts {
                {
                    let id = toast.id;
                    let level_class = match toast.notification.level {
                        NotificationLevel::Success => "toast toast-success",
                        NotificationLevel::Error => "toast toast-error",
                    };
                    rsx! {
                        div {
                            key: "{id}",
                            class: "{level_class} animate-fade-in",
                            onclick: move |_| app_state.dismiss_toast(id),
                            p { class: "toast-title", "{toast.notification.title}" }
                            p { class: "toast-description", "{toast.notification.description}" }
                        }
                    }
                }
            }
        }
    }
}

#[component]
pub fn StatCard(title: String, value: String, caption: String, icon: String, accent: Option<bool>) -> Element {
    let value_class = if accent.unwrap_or(false) { "stat-value text-accent" } else { "stat-value" };

    rsx! {
        div { class: "card stat-card",
            div { class: "stat-header",
                span { class: "label", "{title}" }
                span { class: "stat-icon", "{icon}" }
            }
            div { class: "{value_class}", "{value}" }
            p { class: "stat-caption", "{caption}" }
        }
    }
}

#[component]
pub fn ProgressBar(percent: f64) -> Element {
    let width = percent.clamp(0.0, 100.0);

    rsx! {
        div { class: "progress",
            div { class: "progress-fill", style: "width: {width}%" }
        }
    }
}

#[component]
pub fn EmptyState(icon: String, title: String, hint: String) -> Element {
    rsx! {
        div { class: "empty-state",
            div { class: "empty-state-icon", "{icon}" }
            p { class: "empty-state-text", "{title}" }
            p { class: "empty-state-hint", "{hint}" }
        }
    }
}
