//! Browser persistence: the wasm store is a plain map, so its contents are
//! read from localStorage before the backend starts and written back after
//! every state change.

#[cfg(target_arch = "wasm32")]
use dioxus::prelude::*;
#[cfg(target_arch = "wasm32")]
use crate::backend::store::{Snapshot, Store};
use crate::backend::store::{FILES_KEY, STATS_KEY, TRANSACTIONS_KEY};

#[cfg(target_arch = "wasm32")]
const KEYS: [&str; 3] = [FILES_KEY, STATS_KEY, TRANSACTIONS_KEY];

fn js_string(value: &str) -> String {
    // A JSON string literal is also a valid JS string literal
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

fn get_item_script(key: &str) -> String {
    format!("return localStorage.getItem({});", js_string(key))
}

/// Resolves to `true` once stored; a throwing `setItem` (quota) fails the eval.
fn set_item_script(key: &str, json: &str) -> String {
    format!("localStorage.setItem({}, {}); return true;", js_string(key), js_string(json))
}

#[cfg(target_arch = "wasm32")]
pub async fn hydrate(store: &Store) {
    for key in KEYS {
        match document::eval(&get_item_script(key)).join::<Option<String>>().await {
            Ok(Some(raw)) => {
                if let Err(e) = store.put_raw(key, &raw) {
                    tracing::error!("Failed to hydrate {}: {}", key, e);
                }
            }
            Ok(None) => tracing::debug!("No saved value for {}", key),
            Err(e) => tracing::warn!("localStorage read for {} failed: {:?}", key, e),
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub fn persist(snapshot: &Snapshot) {
    let values = [
        (FILES_KEY, serde_json::to_string(&snapshot.files)),
        (STATS_KEY, serde_json::to_string(&snapshot.stats)),
        (TRANSACTIONS_KEY, serde_json::to_string(&snapshot.transactions)),
    ];
    for (key, value) in values {
        match value {
            Ok(json) => {
                let script = set_item_script(key, &json);
                spawn(async move {
                    if let Err(e) = document::eval(&script).join::<bool>().await {
                        tracing::warn!("localStorage write for {} failed: {:?}", key, e);
                    }
                });
            }
            Err(e) => tracing::error!("Failed to serialize {}: {}", key, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_script_escapes_and_reports_back() {
        let script = set_item_script(STATS_KEY, r#"{"name":"it's \"x\""}"#);
        assert!(script.starts_with("localStorage.setItem(\"storage-stats\", "));
        assert!(script.contains(r#""{\"name\":\"it's \\\"x\\\"\"}""#));
        assert!(script.ends_with("return true;"));
    }

    #[test]
    fn test_get_script_returns_item() {
        assert_eq!(get_item_script(FILES_KEY), "return localStorage.getItem(\"storage-files\");");
        assert_eq!(get_item_script(TRANSACTIONS_KEY), "return localStorage.getItem(\"transactions\");");
    }
}
