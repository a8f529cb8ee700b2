use dioxus::prelude::*;
use crate::backend::summary::{format_gb, DashboardSummary};
use crate::backend::types::TransactionKind;
use crate::backend::AppCmd;
use crate::components::common::{EmptyState, ProgressBar, StatCard};

#[component]
pub fn DashboardComponent() -> Element {
    let app_state = use_context::<crate::components::AppState>();
    let cmd_tx = use_context::<tokio::sync::mpsc::UnboundedSender<AppCmd>>();

    use_hook(move || {
        if let Err(e) = cmd_tx.send(AppCmd::FetchState) {
            tracing::error!("Failed to send FetchState command: {:?}", e);
        }
    });

    let stats = app_state.stats.read().clone();
    let files = app_state.files.read();
    let transactions = app_state.transactions.read();
    let summary = DashboardSummary::derive(&stats, &files, &transactions);
    drop(files);
    drop(transactions);

    let allocated = format_gb(stats.total_allocated);
    let used = format_gb(stats.total_used);
    let provider_caption = if stats.is_provider { "Active Provider" } else { "Not providing storage" };

    rsx! {
        div { class: "page-container py-8 animate-fade-in",
            div { class: "page-header mb-8",
                h1 { class: "page-title", "Dashboard" }
                p { class: "text-secondary", "Monitor your storage activity and earnings" }
            }

            div { class: "grid grid-4 mb-8",
                div { class: "card stat-card",
                    div { class: "stat-header",
                        span { class: "label", "Total Storage" }
                        span { class: "stat-icon", "💾" }
                    }
                    div { class: "stat-value", "{allocated}" }
                    p { class: "stat-caption", "{used} used" }
                    ProgressBar { percent: summary.used_percent }
                }
                StatCard {
                    title: "Files Stored",
                    value: "{summary.file_count}",
                    caption: "Across {stats.network_nodes} nodes",
                    icon: "☁",
                }
                StatCard {
                    title: "Points Earned",
                    value: "{stats.points_earned}",
                    caption: "SNT tokens",
                    icon: "🪙",
                    accent: true,
                }
                StatCard {
                    title: "Provider Earnings",
                    value: "{stats.provider_earnings}",
                    caption: "{provider_caption}",
                    icon: "📈",
                    accent: true,
                }
            }

            div { class: "grid grid-2",
                div { class: "panel",
                    div { class: "panel-header",
                        h2 { class: "panel-title", "Recent Files" }
                        p { class: "panel-subtitle", "Your recently uploaded files" }
                    }
                    if summary.recent_files.is_empty() {
                        EmptyState {
                            icon: "☁",
                            title: "No files uploaded yet",
                            hint: "Upload your first file to get started",
                        }
                    } else {
                        div { class: "list",
                            for file in summary.recent_files.iter() {
                                div { key: "{file.id}", class: "list-row",
                                    div {
                                        p { class: "list-title", "{file.name}" }
                                        p { class: "list-meta", "{format_gb(file.size)} • {file.shards} shards" }
                                    }
                                    span { class: "check", "✔" }
                                }
                            }
                        }
                    }
                }

                div { class: "panel",
                    div { class: "panel-header",
                        h2 { class: "panel-title", "Recent Activity" }
                        p { class: "panel-subtitle", "Your latest transactions" }
                    }
                    if summary.recent_transactions.is_empty() {
                        EmptyState {
                            icon: "🪙",
                            title: "No activity yet",
                            hint: "Start uploading or providing storage",
                        }
                    } else {
                        table { class: "table",
                            thead {
                                tr {
                                    th { "Type" }
                                    th { "Description" }
                                    th { class: "text-right", "Points" }
                                }
                            }
                            tbody {
                                for tx in summary.recent_transactions.iter() {
                                    tr { key: "{tx.id}",
                                        td {
                                            span {
                                                class: if tx.kind == TransactionKind::Reward { "badge badge-primary" } else { "badge" },
                                                "{tx.kind.label()}"
                                            }
                                        }
                                        td { "{tx.description}" }
                                        td { class: "text-right text-accent", "+{tx.amount}" }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
