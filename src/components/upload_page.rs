use dioxus::prelude::*;
use crate::backend::summary::{format_bytes, format_date};
use crate::backend::AppCmd;
use crate::components::common::{EmptyState, ProgressBar};

#[derive(Debug, Clone, PartialEq)]
struct SelectedFile {
    name: String,
    size: u64,
}

#[component]
pub fn UploadComponent() -> Element {
    let app_state = use_context::<crate::components::AppState>();
    let cmd_tx = use_context::<tokio::sync::mpsc::UnboundedSender<AppCmd>>();

    let mut selected = use_signal(|| None::<SelectedFile>);
    let upload = app_state.upload.read().clone();
    let uploading = upload.is_some();
    let network_nodes = app_state.stats.read().network_nodes;
    let files = app_state.files.read().clone();
    let last_code = app_state.last_code.read().clone();

    // Clear the picked file once its upload has been committed or cancelled
    let mut was_uploading = use_signal(|| false);
    use_effect(move || {
        let busy = app_state.upload.read().is_some();
        if *was_uploading.peek() && !busy {
            selected.set(None);
        }
        was_uploading.set(busy);
    });

    let on_select = move |evt: Event<FormData>| {
        if let Some(file) = evt.files().into_iter().next() {
            selected.set(Some(SelectedFile { name: file.name(), size: file.size() }));
        }
    };

    let on_upload = {
        let cmd_tx = cmd_tx.clone();
        move |_| {
            if let Some(file) = selected() {
                if let Err(e) = cmd_tx.send(AppCmd::Upload { name: file.name, size: file.size }) {
                    tracing::error!("Failed to send Upload command: {:?}", e);
                }
            }
        }
    };

    let (pick_title, pick_hint) = match selected() {
        Some(file) => (file.name.clone(), format_bytes(file.size)),
        None => ("Click to select a file".to_string(), "Any file type supported".to_string()),
    };
    let file_count = files.len();
    let file_word = if file_count == 1 { "file" } else { "files" };

    rsx! {
        div { class: "page-container py-8 animate-fade-in",
            div { class: "page-header mb-8",
                h1 { class: "page-title", "Upload Files" }
                p { class: "text-secondary", "Distribute your files across the decentralized network" }
            }

            div { class: "grid grid-2",
                div { class: "panel",
                    div { class: "panel-header",
                        h2 { class: "panel-title", "Upload to Network" }
                        p { class: "panel-subtitle", "Your files will be encrypted, sharded, and distributed across multiple nodes" }
                    }

                    label { class: "dropzone",
                        input {
                            class: "hidden",
                            r#type: "file",
                            disabled: uploading,
                            onchange: on_select,
                        }
                        div { class: "dropzone-icon", "☁" }
                        p { class: "dropzone-title", "{pick_title}" }
                        p { class: "dropzone-hint", "{pick_hint}" }
                    }

                    if let Some(status) = upload {
                        div { class: "upload-progress",
                            div { class: "upload-progress-header",
                                span { class: "text-secondary", "Uploading {status.name}..." }
                                span { class: "font-bold", "{status.progress}%" }
                            }
                            ProgressBar { percent: status.progress as f64 }
                            ul { class: "upload-steps",
                                li { "Encrypting file data" }
                                li { "Creating file shards" }
                                li { "Distributing across network nodes" }
                            }
                        }
                    }

                    if let Some(code) = last_code {
                        div { class: "code-row",
                            span { class: "text-secondary", "Last retrieval code:" }
                            code { class: "code", "{code}" }
                        }
                    }

                    button {
                        class: "btn btn-primary w-full",
                        disabled: selected().is_none() || uploading,
                        onclick: on_upload,
                        if uploading { "Uploading..." } else { "Upload to Network" }
                    }

                    div { class: "info-box",
                        p { class: "info-title", "How it works" }
                        ul {
                            li { "Files are encrypted with AES-256 encryption" }
                            li { "Split into multiple shards for redundancy" }
                            li { "Distributed across {network_nodes}+ global nodes" }
                            li { "Earn points for every MB uploaded" }
                        }
                    }
                }

                div { class: "panel",
                    div { class: "panel-header",
                        h2 { class: "panel-title", "Your Files" }
                        p { class: "panel-subtitle", "{file_count} {file_word} stored on the network" }
                    }
                    if files.is_empty() {
                        EmptyState {
                            icon: "📄",
                            title: "No files yet",
                            hint: "Upload your first file to get started",
                        }
                    } else {
                        div { class: "list scroll",
                            for file in files.iter() {
                                div { key: "{file.id}", class: "file-card",
                                    div { class: "list-row",
                                        div {
                                            p { class: "list-title", "{file.name}" }
                                            p { class: "list-meta",
                                                "{format_bytes(file.size)} • {file.shards} shards • {format_date(file.uploaded_at)}"
                                            }
                                        }
                                        span { class: "check", "✔" }
                                    }
                                    div { class: "code-row",
                                        span { class: "text-secondary", "Retrieval Code:" }
                                        code { class: "code", "{file.retrieval_code}" }
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
