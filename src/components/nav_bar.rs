use dioxus::prelude::*;
use crate::backend::summary::format_points;
use crate::components::common::Toaster;
use crate::Route;

#[component]
pub fn NavComponent() -> Element {
    let app_state = use_context::<crate::components::AppState>();
    let stats = app_state.stats.read().clone();
    let points = format_points(stats.points_earned);

    rsx! {
        div { class: "min-h-screen flex flex-col",
            Toaster {}
            nav { class: "nav-bar",
                div { class: "page-container",
                    // Logo section
                    div { class: "nav-logo",
                        div { class: "logo-icon" }
                        div {
                            span { class: "logo-text", "StorageNet" }
                            p { class: "logo-subtitle", "Decentralized Storage Network" }
                        }
                    }

                    div { class: "nav-status",
                        div { class: "nav-nodes",
                            span { class: "pulse-dot" }
                            span { "{stats.network_nodes} Nodes Online" }
                        }
                        div { class: "nav-points",
                            span { class: "nav-points-value", "{points}" }
                            span { class: "nav-points-unit", "SNT" }
                        }
                    }
                }
            }

            div { class: "fixed-header-spacer" }

            div { class: "page-container",
                div { class: "nav-links",
                    Link {
                        to: Route::DashboardComponent {},
                        class: "nav-link",
                        active_class: "active",
                        "Dashboard"
                    }
                    Link {
                        to: Route::UploadComponent {},
                        class: "nav-link",
                        active_class: "active",
                        "Upload"
                    }
                    Link {
                        to: Route::NetworkComponent {},
                        class: "nav-link",
                        active_class: "active",
                        "Network"
                    }
                    Link {
                        to: Route::ProviderComponent {},
                        class: "nav-link",
                        active_class: "active",
                        "Earn"
                    }
                }
            }

            div { class: "flex-1",
                Outlet::<Route> {}
            }
        }
    }
}
