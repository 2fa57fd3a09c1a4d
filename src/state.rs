use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(feature = "ssr")] {
        use axum::extract::FromRef;
        use leptos::prelude::LeptosOptions;
        use log::warn;

        use crate::types::RuntimeConfig;

        #[derive(FromRef, Clone)]
        pub struct AppState {
            pub leptos_options: LeptosOptions,
            pub runtime: RuntimeConfig,
        }

        impl AppState {
            pub fn from_env(leptos_options: LeptosOptions) -> Self {
                let api_url = std::env::var("BACKEND_URL")
                    .unwrap_or_else(|_| "http://127.0.0.1:8000".to_string());
                let sign_in_url = std::env::var("SIGN_IN_URL").unwrap_or_else(|_| {
                    warn!("SIGN_IN_URL not set; the sign-in button will go nowhere");
                    String::new()
                });

                Self {
                    leptos_options,
                    runtime: RuntimeConfig {
                        api_url,
                        sign_in_url,
                    },
                }
            }
        }
    }
}
