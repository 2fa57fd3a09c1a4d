use leptos::prelude::*;

use crate::types::RuntimeConfig;

/// Hands the client the base URLs it talks to; values live in server env so a
/// deploy can repoint the backend without rebuilding the wasm bundle.
#[server(GetRuntimeConfig, "/api")]
pub async fn get_runtime_config() -> Result<RuntimeConfig, ServerFnError> {
    #[cfg(feature = "ssr")]
    {
        use crate::state::AppState;

        let state =
            use_context::<AppState>().ok_or_else(|| ServerFnError::new("App state not found"))?;

        Ok(state.runtime.clone())
    }
}
