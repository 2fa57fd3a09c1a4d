use leptos::prelude::*;
use leptos_meta::{provide_meta_context, MetaTags, Stylesheet, Title};
use leptos_router::{
    components::{Route, Router, Routes},
    StaticSegment,
};

use crate::auth::context::{use_auth, AuthProvider};
use crate::components::auth_nav::AuthNav;
use crate::components::chat::ChatWindow;
use crate::server_fn::get_runtime_config;

pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8" />
                <meta name="viewport" content="width=device-width, initial-scale=1" />
                <AutoReload options=options.clone() />
                <HydrationScripts options />
                <MetaTags />
            </head>
            <body>
                <App />
            </body>
        </html>
    }
}

#[component]
pub fn App() -> impl IntoView {
    // Provides context that manages stylesheets, titles, meta tags, etc.
    provide_meta_context();

    view! {
        // injects a stylesheet into the document <head>
        // id=leptos means cargo-leptos will hot-reload this stylesheet
        <Stylesheet id="leptos" href="/pkg/mindpalace.css" />
        <Title text="AI Mind Palace" />
        <AuthProvider>
            <Router>
                <main>
                    <Routes fallback=|| "Page not found.".into_view()>
                        <Route path=StaticSegment("") view=Home />
                    </Routes>
                </main>
            </Router>
        </AuthProvider>
    }
}

#[component]
fn Home() -> impl IntoView {
    let auth = use_auth();

    // The sign-in page lives on the auth provider, not this app; runtime
    // config tells us where to send people.
    let sign_in_url = Resource::new(
        || (),
        |_| async {
            get_runtime_config()
                .await
                .map(|config| config.sign_in_url)
                .unwrap_or_default()
        },
    );

    view! {
        <div class="flex h-screen flex-col bg-stone-950 text-stone-100">
            <header class="flex items-center justify-between border-b border-stone-800 px-4 py-3">
                <div class="flex items-center space-x-3">
                    <img src="/logo.svg" alt="Logo" class="h-8 w-8 rounded" />
                    <span class="text-lg font-semibold text-amber-50">"AI Mind Palace"</span>
                </div>
                <Show when=move || auth.is_authenticated.get()>
                    <AuthNav />
                </Show>
            </header>
            {move || {
                if auth.is_loading.get() {
                    view! { <div class="flex-1"></div> }.into_any()
                } else if auth.is_authenticated.get() {
                    view! { <ChatWindow /> }.into_any()
                } else {
                    view! {
                        <div class="flex flex-1 items-center justify-center">
                            <a
                                href=move || sign_in_url.get().unwrap_or_default()
                                class="rounded-md bg-amber-700 px-6 py-3 font-medium text-white hover:bg-amber-600 transition-colors"
                            >
                                "Log In"
                            </a>
                        </div>
                    }
                        .into_any()
                }
            }}
        </div>
    }
}
