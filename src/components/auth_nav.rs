use leptos::prelude::*;

use crate::auth::context::use_auth;
use crate::auth::Logout;

/// Avatar button plus a small account dropdown for the signed-in header.
#[component]
pub fn AuthNav() -> impl IntoView {
    let auth = use_auth();
    let (menu_open, set_menu_open) = signal(false);

    let logout_action = ServerAction::<Logout>::new();

    Effect::new(move |_| {
        if logout_action.value().get().is_some() {
            set_menu_open(false);
            auth.refresh_auth();
        }
    });

    let avatar = move || auth.current_user.get().and_then(|u| u.avatar_url);
    let initial = move || {
        auth.current_user
            .get()
            .map(|u| u.initial())
            .unwrap_or_else(|| "?".to_string())
    };
    let label = move || {
        auth.current_user
            .get()
            .map(|u| u.label().to_string())
            .unwrap_or_default()
    };
    let email = move || auth.current_user.get().and_then(|u| u.email);

    view! {
        <div class="relative">
            <button
                class="flex h-9 w-9 items-center justify-center overflow-hidden rounded-full bg-amber-600 text-sm font-semibold text-white"
                on:click=move |_| set_menu_open(!menu_open.get_untracked())
            >
                {move || {
                    avatar()
                        .map(|src| {
                            view! { <img src=src alt="User avatar" class="h-full w-full object-cover"/> }
                                .into_any()
                        })
                        .unwrap_or_else(|| view! { <span>{initial()}</span> }.into_any())
                }}

            </button>
            <Show when=move || menu_open.get()>
                <div class="absolute right-0 top-11 z-20 w-56 rounded-md border border-stone-700 bg-stone-900 py-2 shadow-lg">
                    <div class="px-4 py-1 text-sm font-medium text-stone-100">{label}</div>
                    {move || {
                        email()
                            .map(|e| {
                                view! { <div class="px-4 pb-2 text-xs text-stone-400">{e}</div> }
                            })
                    }}
                    <button
                        class="mt-1 w-full border-t border-stone-700 px-4 pt-2 text-left text-sm text-stone-300 hover:text-red-400 transition-colors"
                        on:click=move |_| {
                            logout_action.dispatch(Logout {});
                        }
                    >

                        "Sign out"
                    </button>
                </div>
            </Show>
        </div>
    }
}
