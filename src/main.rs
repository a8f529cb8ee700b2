mod backend;
mod components;

use components::dashboard_page::DashboardComponent;
use components::nav_bar::NavComponent;
use components::network_page::NetworkComponent;
use components::provider_page::ProviderComponent;
use components::upload_page::UploadComponent;
use components::AppState;

use backend::config::AppConfig;
use backend::store::{StateDefaults, StateStore, Store};
use backend::{AppCmd, AppEvent};
use dioxus::prelude::*;
use tokio::sync::mpsc;

#[derive(Routable, Clone, PartialEq)]
enum Route {
    #[layout(NavComponent)]
    #[route("/")]
    DashboardComponent {},
    #[route("/upload")]
    UploadComponent {},
    #[route("/network")]
    NetworkComponent {},
    #[route("/earn")]
    ProviderComponent {},
}

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    {
        use tracing_subscriber::EnvFilter;
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
            .init();
    }

    let config = load_config();
    dioxus::LaunchBuilder::new().with_context(config).launch(App);
}

#[cfg(not(target_arch = "wasm32"))]
fn load_config() -> AppConfig {
    match AppConfig::load(AppConfig::FILE_NAME) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Ignoring {}: {}", AppConfig::FILE_NAME, e);
            AppConfig::default()
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn load_config() -> AppConfig {
    AppConfig::default()
}

fn open_store(config: &AppConfig) -> Option<Store> {
    match Store::new(&config.db_path) {
        Ok(store) => Some(store),
        Err(e) => {
            tracing::error!("Failed to open store at {}: {}; falling back to memory", config.db_path, e);
            match Store::new_in_memory() {
                Ok(store) => Some(store),
                Err(e) => {
                    tracing::error!("In-memory store unavailable: {}", e);
                    None
                }
            }
        }
    }
}

#[component]
fn App() -> Element {
    let config = use_context::<AppConfig>();
    let defaults = StateDefaults::new(config.default_network_nodes);
    let app_state = AppState::new(defaults.stats.clone());
    use_context_provider(|| app_state);

    let cmd_tx = use_hook(|| {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<AppCmd>();
        let (event_tx, mut event_rx) = mpsc::unbounded_channel::<AppEvent>();

        if let Some(store) = open_store(&config) {
            #[cfg(target_arch = "wasm32")]
            let hydrate_store = store.clone();
            let state = StateStore::new(store, defaults.clone());
            let backend_config = config.clone();
            let init_tx = cmd_tx.clone();
            spawn(async move {
                #[cfg(target_arch = "wasm32")]
                components::local_storage::hydrate(&hydrate_store).await;

                let _ = init_tx.send(AppCmd::Init);
                backend::init(state, backend_config, cmd_rx, event_tx).await;
            });
        }

        let mut app_state = app_state;
        spawn(async move {
            while let Some(event) = event_rx.recv().await {
                app_state.apply(event);
            }
        });

        cmd_tx
    });
    use_context_provider(|| cmd_tx);

    rsx! {
        document::Stylesheet {href: asset!("/assets/main.css")}
        Router::<Route> {}
    }
}
