use dioxus::prelude::*;
use crate::backend::config::{AppConfig, GIB};
use crate::backend::provider::{estimated_monthly_earnings, initial_slider_gb, utilization_level, utilization_percent};
use crate::backend::AppCmd;
use crate::components::common::EmptyState;

#[component]
pub fn ProviderComponent() -> Element {
    let app_state = use_context::<crate::components::AppState>();
    let cmd_tx = use_context::<tokio::sync::mpsc::UnboundedSender<AppCmd>>();
    let config = use_context::<AppConfig>();

    let stats = app_state.stats.read().clone();
    let mut allocated_gb = use_signal(|| initial_slider_gb(&stats));

    let gb = allocated_gb();
    let earnings = estimated_monthly_earnings(gb, &config);
    let utilization = utilization_percent(&stats);
    let level = utilization_level(utilization).label();
    let used_gb = format!("{:.2}", stats.total_used as f64 / GIB as f64);
    let utilization_text = format!("{:.1}", utilization);
    let current_gb = stats.total_allocated / GIB;

    let send = move |cmd: AppCmd| {
        if let Err(e) = cmd_tx.send(cmd) {
            tracing::error!("Failed to send provider command: {:?}", e);
        }
    };
    let activate = {
        let send = send.clone();
        move |_| send(AppCmd::ActivateProvider { gb: allocated_gb() })
    };
    let update = {
        let send = send.clone();
        move |_| send(AppCmd::UpdateAllocation { gb: allocated_gb() })
    };
    let deactivate = move |_| send(AppCmd::DeactivateProvider);

    rsx! {
        div { class: "page-container py-8 animate-fade-in",
            div { class: "page-header mb-8",
                h1 { class: "page-title", "Become a Provider" }
                p { class: "text-secondary", "Earn points by sharing your storage space with the network" }
            }

            div { class: "grid grid-2",
                div { class: "panel",
                    div { class: "panel-header",
                        h2 { class: "panel-title", "Provider Setup" }
                        p { class: "panel-subtitle", "Allocate storage space and start earning passive income" }
                    }

                    div { class: "slider-row",
                        label { class: "label", "Storage Allocation" }
                        span { class: "slider-value", "{gb} GB" }
                    }
                    input {
                        class: "slider",
                        r#type: "range",
                        min: "{config.min_allocation_gb}",
                        max: "{config.max_allocation_gb}",
                        step: "1",
                        value: "{gb}",
                        oninput: move |e| {
                            if let Ok(v) = e.value().parse::<u64>() {
                                allocated_gb.set(v);
                            }
                        },
                    }
                    div { class: "slider-bounds",
                        span { "{config.min_allocation_gb} GB" }
                        span { "{config.max_allocation_gb} GB" }
                    }

                    div { class: "earnings-box",
                        span { class: "text-secondary", "Estimated Monthly Earnings" }
                        span { class: "earnings-value", "{earnings} SNT" }
                        p { class: "earnings-note", "Based on current network rates" }
                    }

                    if !stats.is_provider {
                        button { class: "btn btn-primary w-full", onclick: activate, "Activate as Provider" }
                    } else {
                        div { class: "button-stack",
                            button { class: "btn btn-secondary w-full", onclick: update, "Update Allocation" }
                            button { class: "btn btn-danger w-full", onclick: deactivate, "Deactivate Provider" }
                        }
                    }

                    div { class: "info-box",
                        p { class: "info-title", "Provider Benefits" }
                        ul {
                            li { "Earn {earnings} SNT points monthly" }
                            li { "Bonus rewards for 99%+ uptime" }
                            li { "Priority file upload speeds" }
                            li { "Access to provider-exclusive features" }
                        }
                    }
                }

                div { class: "panel",
                    div { class: "panel-header",
                        h2 { class: "panel-title", "Provider Stats" }
                        p { class: "panel-subtitle",
                            if stats.is_provider { "Your contribution to the network" } else { "Statistics available after activation" }
                        }
                    }

                    if stats.is_provider {
                        div { class: "stat-row",
                            p { class: "label", "Total Allocated" }
                            p { class: "stat-value", "{current_gb} GB" }
                        }
                        div { class: "stat-row",
                            div {
                                p { class: "label", "Storage Used" }
                                p { class: "stat-value", "{used_gb} GB" }
                                p { class: "stat-caption", "{utilization_text}% utilized" }
                            }
                            span { class: "badge", "{level}" }
                        }
                        div { class: "stat-row stat-row-accent",
                            p { class: "label", "Provider Earnings" }
                            p { class: "stat-value text-accent", "{stats.provider_earnings}" }
                            p { class: "stat-caption", "Total SNT earned" }
                        }
                        div { class: "achievement",
                            p { class: "achievement-title", "Achievement Unlocked!" }
                            p { class: "font-bold", "Storage Provider" }
                            p { class: "text-secondary",
                                "You're now contributing to the decentralized storage network. Keep your node online to maximize earnings!"
                            }
                        }
                    } else {
                        EmptyState {
                            icon: "🔗",
                            title: "Not yet a provider",
                            hint: "Activate to start earning rewards",
                        }
                    }
                }
            }
        }
    }
}
