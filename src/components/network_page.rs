use dioxus::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;
use crate::backend::config::AppConfig;
use crate::backend::network::{layout_key, user_node_count, NetworkField};
use crate::backend::summary::plural;
use crate::backend::upload::sleep;

const MAP_WIDTH: f64 = 800.0;
const MAP_HEIGHT: f64 = 500.0;
const NETWORK_HEALTH: &str = "99.8%";

#[component]
pub fn NetworkComponent() -> Element {
    let app_state = use_context::<crate::components::AppState>();
    let config = use_context::<AppConfig>();

    let mut field = use_signal(|| NetworkField {
        width: MAP_WIDTH,
        height: MAP_HEIGHT,
        link_distance: config.link_distance,
        nodes: vec![],
    });
    let mut hovered = use_signal(|| None::<usize>);

    // Only a change in node count or stored shards rebuilds the field
    let layout = use_memo(move || layout_key(&app_state.stats.read(), &app_state.files.read()));
    let config_gen = config.clone();
    use_effect(move || {
        let _ = layout();
        let stats = app_state.stats.peek();
        let files = app_state.files.peek();
        let mut rng = StdRng::from_entropy();
        field.set(NetworkField::generate(&stats, &files, MAP_WIDTH, MAP_HEIGHT, &config_gen, &mut rng));
        hovered.set(None);
    });

    // Animation loop; dropped with the component
    let frame = Duration::from_millis(config.frame_interval_ms);
    use_future(move || async move {
        let mut rng = StdRng::from_entropy();
        loop {
            sleep(frame).await;
            field.write().step(&mut rng);
        }
    });

    let on_move = move |e: MouseEvent| {
        let point = e.element_coordinates();
        let hit = field.read().hit_test(point.x, point.y).map(|n| n.id);
        if hovered() != hit {
            hovered.set(hit);
        }
    };

    let files_empty = app_state.files.read().is_empty();
    let network_nodes = app_state.stats.read().network_nodes;
    let your_nodes = user_node_count(&app_state.files.read(), &config);

    let current = field.read();
    let links = current.links();
    let tooltip = hovered().and_then(|id| current.node(id).cloned());

    rsx! {
        div { class: "page-container py-8 animate-fade-in",
            div { class: "page-header mb-8",
                h1 { class: "page-title", "Network Visualization" }
                p { class: "text-secondary", "Live view of the decentralized storage network" }
            }

            div { class: "grid grid-3 mb-8",
                div { class: "card stat-card",
                    span { class: "label", "Network Nodes" }
                    div { class: "stat-value", "{network_nodes}" }
                    p { class: "stat-caption", "Active globally" }
                }
                div { class: "card stat-card",
                    span { class: "label", "Your Nodes" }
                    div { class: "stat-value text-accent", "{your_nodes}" }
                    p { class: "stat-caption", "Storing your data" }
                }
                div { class: "card stat-card",
                    span { class: "label", "Network Health" }
                    div { class: "stat-value text-success", "{NETWORK_HEALTH}" }
                    span { class: "badge", "● Excellent" }
                }
            }

            div { class: "panel",
                div { class: "panel-header",
                    h2 { class: "panel-title", "Network Map" }
                    p { class: "panel-subtitle",
                        span { class: "legend legend-plain", "● Network Nodes" }
                        span { class: "legend legend-data", "● Your Data Nodes" }
                    }
                }

                div { class: "network-map",
                    svg {
                        class: "network-canvas",
                        width: "{MAP_WIDTH}",
                        height: "{MAP_HEIGHT}",
                        "viewBox": "0 0 {MAP_WIDTH} {MAP_HEIGHT}",
                        onmousemove: on_move,
                        onmouseleave: move |_| hovered.set(None),

                        defs {
                            radialGradient { id: "data-glow",
                                stop { offset: "0%", "stop-color": "rgb(232, 73, 175)", "stop-opacity": "0.3" }
                                stop { offset: "100%", "stop-color": "rgb(232, 73, 175)", "stop-opacity": "0" }
                            }
                        }

                        for link in links.iter() {
                            {
                                let a = &current.nodes[link.from];
                                let b = &current.nodes[link.to];
                                rsx! {
                                    line {
                                        class: "net-shape",
                                        x1: "{a.x}",
                                        y1: "{a.y}",
                                        x2: "{b.x}",
                                        y2: "{b.y}",
                                        stroke: "rgba(72, 118, 255, 0.1)",
                                        "stroke-width": "1",
                                        opacity: "{link.opacity}",
                                    }
                                }
                            }
                        }

                        for node in current.nodes.iter() {
                            if node.has_user_data {
                                circle {
                                    class: "net-shape",
                                    cx: "{node.x}",
                                    cy: "{node.y}",
                                    r: "{node.radius * 3.0}",
                                    fill: "url(#data-glow)",
                                }
                                circle {
                                    class: "net-shape",
                                    cx: "{node.x}",
                                    cy: "{node.y}",
                                    r: "{node.radius}",
                                    fill: "rgb(232, 73, 175)",
                                }
                                circle {
                                    class: "net-shape",
                                    cx: "{node.x}",
                                    cy: "{node.y}",
                                    r: "{node.radius * 2.0}",
                                    fill: "none",
                                    stroke: "rgba(232, 73, 175, 0.5)",
                                    "stroke-width": "2",
                                }
                            } else {
                                circle {
                                    class: "net-shape",
                                    cx: "{node.x}",
                                    cy: "{node.y}",
                                    r: "{node.radius}",
                                    fill: "rgba(72, 118, 255, 0.6)",
                                }
                            }
                        }
                    }

                    if let Some(node) = tooltip {
                        div {
                            class: "tooltip",
                            style: "left: {node.x + 20.0}px; top: {node.y - 40.0}px;",
                            p { class: "font-bold", "Node #{node.id}" }
                            if node.has_user_data {
                                p { class: "text-secondary", "Storing {plural(node.file_shards, \"shard\")}" }
                            }
                        }
                    }

                    if files_empty {
                        div { class: "map-overlay",
                            p { class: "font-bold", "Upload files to see your data distribution" }
                            p { class: "text-secondary", "Your files will be distributed across the network" }
                        }
                    }
                }
            }
        }
    }
}
