use leptos::{prelude::*, task::spawn_local};
use log::warn;

use crate::auth::{get_current_user, verify_session};
use crate::models::users::UserView;

/// Read side of the auth state. Components get this via `use_auth()`;
/// `refresh` lets anything that changed the session (sign-out, a 401) force a
/// re-check against the server.
#[derive(Clone, Copy)]
pub struct AuthContext {
    pub is_authenticated: ReadSignal<bool>,
    pub current_user: ReadSignal<Option<UserView>>,
    pub is_loading: ReadSignal<bool>,
    pub refresh: WriteSignal<u32>,
}

impl AuthContext {
    pub fn refresh_auth(&self) {
        self.refresh.update(|v| *v = v.wrapping_add(1));
    }
}

pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthProvider must wrap the app")
}

#[component]
pub fn AuthProvider(children: Children) -> impl IntoView {
    let (is_authenticated, set_is_authenticated) = signal(false);
    let (current_user, set_current_user) = signal(None::<UserView>);
    let (is_loading, set_is_loading) = signal(true);
    let (revision, set_revision) = signal(0u32);

    provide_context(AuthContext {
        is_authenticated,
        current_user,
        is_loading,
        refresh: set_revision,
    });

    Effect::new(move |_| {
        revision.get();
        spawn_local(async move {
            set_is_loading(true);

            match verify_session().await {
                Ok(true) => {
                    set_is_authenticated(true);
                    match get_current_user().await {
                        Ok(user) => set_current_user(user),
                        Err(e) => {
                            warn!("session valid but profile lookup failed: {e}");
                            set_current_user(None);
                        }
                    }
                }
                Ok(false) => {
                    set_is_authenticated(false);
                    set_current_user(None);
                }
                Err(e) => {
                    warn!("session check failed: {e}");
                    set_is_authenticated(false);
                    set_current_user(None);
                }
            }

            set_is_loading(false);
        });
    });

    view! { {children()} }
}
