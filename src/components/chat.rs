use leptos::{prelude::*, task::spawn_local};
use leptos_icons::Icon;
use log::error;

use crate::api::{ApiError, ChatApi, InvokeRequest};
use crate::auth::get_token;
use crate::components::messagelist::MessageList;
use crate::components::threadlist::ThreadList;
use crate::components::toast::{Toast, ToastHandle, ToastKind};
use crate::models::conversations::{ConversationMetadata, Session};
use crate::server_fn::get_runtime_config;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_PROVIDER: &str = "gemini";
pub const DEFAULT_TEMPERATURE: f64 = 0.3;

/// Models the backend accepts, grouped by provider.
const MODEL_CATALOG: &[(&str, &[&str])] = &[
    (
        "gemini",
        &[
            "gemini-2.5-flash",
            "gemini-2.5-flash-lite",
            "gemini-2.0-flash",
            "gemini-2.0-flash-lite",
            "gemini-1.5-flash",
            "gemini-1.5-flash-8b",
            "gemini-1.5-pro",
        ],
    ),
    (
        "openai",
        &["gpt-4.1", "gpt-4.1-mini", "gpt-4o", "gpt-4o-mini", "gpt-5-nano"],
    ),
    ("groq", &["llama-3.3-70b-versatile", "llama-3.1-8b-instant"]),
];

fn provider_for_model(model: &str) -> &'static str {
    if model.starts_with("gemini") {
        "gemini"
    } else if model.starts_with("gpt") {
        "openai"
    } else {
        "groq"
    }
}

/// User-facing line for a failed send: expired or missing credentials get the
/// sign-in nudge, everything else the generic failure.
fn invoke_failure_toast(error: &ApiError) -> &'static str {
    if error.is_unauthorized() {
        "Unauthorized access. Please log in again."
    } else {
        "An error occurred while processing your request."
    }
}

async fn fetch_conversation_list(api: &ChatApi) -> Result<Vec<ConversationMetadata>, ApiError> {
    let token = get_token().await?;
    api.fetch_conversations(&token).await
}

/// Pulls the conversation list into the session. Failures surface as a toast
/// and leave the current list alone; the loading flag clears either way.
async fn load_conversations(
    api: ChatApi,
    set_session: WriteSignal<Session>,
    set_loading: WriteSignal<bool>,
    toast: ToastHandle,
) {
    match fetch_conversation_list(&api).await {
        Ok(conversations) => {
            set_session.update(|s| s.set_conversations(conversations));
        }
        Err(e) => {
            error!("failed to fetch conversations: {e}");
            toast.error("Failed to fetch conversations");
        }
    }
    set_loading(false);
}

#[component]
pub fn ChatWindow() -> impl IntoView {
    let (session, set_session) = signal(Session::new());
    let (input, set_input) = signal(String::new());
    let (sidebar_open, set_sidebar_open) = signal(true);

    let (loading_conversations, set_loading_conversations) = signal(true);
    let (loading_messages, set_loading_messages) = signal(false);

    let (pending_delete, set_pending_delete) = signal::<Option<ConversationMetadata>>(None);

    let (model, set_model) = signal(DEFAULT_MODEL.to_string());

    let (toast_message, set_toast_message) = signal(String::new());
    let (toast_kind, set_toast_kind) = signal(ToastKind::Error);
    let (toast_visible, set_toast_visible) = signal(false);
    let toast = ToastHandle::new(set_toast_message, set_toast_kind, set_toast_visible);

    // Base URL of the conversation backend, once runtime config arrives.
    let (api_url, set_api_url) = signal::<Option<String>>(None);

    Effect::new(move |_| {
        spawn_local(async move {
            match get_runtime_config().await {
                Ok(config) => {
                    set_api_url(Some(config.api_url.clone()));
                    let client = ChatApi::new(config.api_url);
                    load_conversations(client, set_session, set_loading_conversations, toast)
                        .await;
                }
                Err(e) => {
                    error!("runtime config lookup failed: {e}");
                    toast.error("Failed to fetch conversations");
                    set_loading_conversations(false);
                }
            }
        });
    });

    let open_conversation = move |thread_id: String| {
        let Some(base) = api_url.get_untracked() else {
            toast.error("Failed to fetch conversations");
            return;
        };
        set_session.update(|s| s.select_thread(&thread_id));
        set_loading_messages(true);
        spawn_local(async move {
            let client = ChatApi::new(base);
            let loaded = async {
                let token = get_token().await?;
                client.fetch_thread(&token, &thread_id).await
            }
            .await;
            match loaded {
                Ok(messages) => set_session.update(|s| s.load_messages(messages)),
                Err(e) => {
                    error!("failed to fetch thread {thread_id}: {e}");
                    set_session.update(|s| s.clear_selection());
                    toast.error("Failed to fetch conversations");
                }
            }
            set_loading_messages(false);
        });
    };

    let handle_send = move || {
        let Some(base) = api_url.get_untracked() else {
            // before the optimistic append, so the draft stays in the composer
            toast.error("An error occurred while processing your request.");
            return;
        };
        let text = input.get_untracked();
        let mut accepted = false;
        set_session.update(|s| accepted = s.begin_exchange(&text));
        if !accepted {
            return;
        }
        set_input(String::new());

        let request = InvokeRequest {
            user_query: text,
            provider: provider_for_model(&model.get_untracked()).to_string(),
            model: model.get_untracked(),
            temperature: DEFAULT_TEMPERATURE,
            thread_id: session.with_untracked(|s| s.thread_id.clone()),
        };

        spawn_local(async move {
            let client = ChatApi::new(base);
            let outcome = async {
                let token = get_token().await?;
                client.invoke(&token, &request).await
            }
            .await;

            match outcome {
                Ok(reply) => {
                    let current = session.with_untracked(|s| s.thread_id.clone());
                    let fresh_thread = reply
                        .thread_id
                        .filter(|id| current.as_deref() != Some(id.as_str()));
                    if let Some(thread_id) = fresh_thread {
                        // The backend opened a new thread for us; refresh the
                        // sidebar before switching over so the new entry shows up.
                        load_conversations(
                            client.clone(),
                            set_session,
                            set_loading_conversations,
                            toast,
                        )
                        .await;
                        set_session.update(|s| s.adopt_thread(thread_id));
                    }
                    set_session.update(|s| s.resolve_reply(reply.response));
                }
                Err(e) => {
                    error!("invoke failed: {e}");
                    toast.error(invoke_failure_toast(&e));
                    set_session.update(|s| s.revert_exchange());
                }
            }
        });
    };

    let handle_new_conversation = move || {
        set_session.update(|s| s.start_new());
    };

    let handle_delete = move |conversation: ConversationMetadata| {
        let Some(base) = api_url.get_untracked() else {
            toast.error("Failed to delete conversations");
            set_pending_delete(None);
            return;
        };
        let thread_id = conversation.thread_id;
        spawn_local(async move {
            let client = ChatApi::new(base);
            let outcome = async {
                let token = get_token().await?;
                client.delete_conversation(&token, &thread_id).await
            }
            .await;

            match outcome {
                Ok(()) => {
                    toast.success("Conversation deleted successfully");
                    set_session.update(|s| {
                        s.apply_deletion(&thread_id);
                    });
                }
                Err(e) => {
                    error!("failed to delete conversation {thread_id}: {e}");
                    toast.error("Failed to delete conversations");
                }
            }
            set_pending_delete(None);
        });
    };

    view! {
        <div class="flex h-full min-h-0 flex-1 overflow-hidden bg-stone-950 text-stone-100">
            <Show
                when=move || !loading_conversations.get()
                fallback=|| {
                    view! {
                        <div class="flex flex-1 items-center justify-center">
                            <div class="h-24 w-24 animate-spin rounded-full border-4 border-amber-100/30 border-t-amber-100"></div>
                        </div>
                    }
                }
            >

                <ThreadList
                    session=session
                    open=sidebar_open
                    set_open=set_sidebar_open
                    on_select=open_conversation
                    on_new=move |_| handle_new_conversation()
                    on_delete=move |conversation| set_pending_delete(Some(conversation))
                />
                <div class="flex min-w-0 flex-1 flex-col">
                    {move || {
                        let show_empty = session.with(|s| s.messages.is_empty())
                            && !loading_messages.get();
                        if show_empty {
                            view! {
                                <div class="flex flex-1 flex-col items-center justify-center gap-6 px-4">
                                    <Icon
                                        icon=icondata_io::IoChatbubblesOutline
                                        width="48"
                                        height="48"
                                    />
                                    <p class="text-2xl text-amber-50">"What's your query?"</p>
                                    <div class="w-full max-w-2xl">
                                        <Composer
                                            input=input
                                            set_input=set_input
                                            on_send=move |_| handle_send()
                                        />
                                    </div>
                                    <ModelPicker model=model set_model=set_model/>
                                </div>
                            }
                                .into_any()
                        } else {
                            view! {
                                <div class="flex min-h-0 flex-1 flex-col">
                                    <div class="min-h-0 flex-1 overflow-y-auto">
                                        <MessageList session=session/>
                                    </div>
                                    <div class="space-y-2 px-4 pb-4">
                                        <Composer
                                            input=input
                                            set_input=set_input
                                            on_send=move |_| handle_send()
                                        />
                                        <div class="flex items-center justify-between">
                                            <ModelPicker model=model set_model=set_model/>
                                            <p class="flex-1 text-center text-xs text-stone-500">
                                                "Powered by OpenAI. AI can make mistakes."
                                            </p>
                                            <div class="w-[120px]"></div>
                                        </div>
                                    </div>
                                </div>
                            }
                                .into_any()
                        }
                    }}

                </div>
            </Show>
            {move || {
                pending_delete
                    .get()
                    .map(|conversation| {
                        let confirm = conversation.clone();
                        view! {
                            <div class="fixed inset-0 z-40 flex items-center justify-center bg-black/60">
                                <div class="w-full max-w-md rounded-lg border border-stone-700 bg-stone-900 p-6 shadow-xl">
                                    <div class="mb-3 text-lg font-semibold text-stone-100">
                                        "Delete Chat?"
                                    </div>
                                    <p class="mb-6 text-sm text-stone-300">
                                        "This will delete conversation "
                                        <strong>{conversation.title.clone()}</strong>
                                        ", but any saved memories or tasks will be retained."
                                    </p>
                                    <div class="flex justify-end gap-3">
                                        <button
                                            class="rounded-md px-4 py-2 text-sm text-stone-300 hover:bg-stone-800 transition-colors"
                                            on:click=move |_| set_pending_delete(None)
                                        >
                                            "Cancel"
                                        </button>
                                        <button
                                            class="rounded-md bg-red-700 px-4 py-2 text-sm text-white hover:bg-red-600 transition-colors"
                                            on:click=move |_| handle_delete(confirm.clone())
                                        >
                                            "Delete"
                                        </button>
                                    </div>
                                </div>
                            </div>
                        }
                    })
            }}
            <Toast
                message=toast_message
                kind=toast_kind
                visible=toast_visible
                on_close=move |_| toast.dismiss()
            />
        </div>
    }
}

#[component]
fn Composer(
    input: ReadSignal<String>,
    set_input: WriteSignal<String>,
    #[prop(into)] on_send: Callback<()>,
) -> impl IntoView {
    view! {
        <div class="flex w-full items-center gap-2">
            <input
                class="flex-1 rounded-full border border-stone-700 bg-stone-800 px-4 py-3 text-stone-100 placeholder-stone-500 focus:border-amber-200/60 focus:outline-none"
                placeholder="Type a message..."
                prop:value=input
                on:input=move |ev| set_input(event_target_value(&ev))
                on:keydown=move |ev| {
                    if ev.key() == "Enter" {
                        on_send.run(());
                    }
                }
            />

            <button
                class="rounded-full bg-amber-700 p-3 hover:bg-amber-600 transition-colors"
                on:click=move |_| on_send.run(())
            >
                <svg
                    xmlns="http://www.w3.org/2000/svg"
                    height="24px"
                    viewBox="0 -960 960 960"
                    width="24px"
                    fill="#FFFBDE"
                >
                    <path d="M120-160v-640l760 320-760 320Zm80-120 474-200-474-200v140l240 60-240 60v140Zm0 0v-400 400Z"></path>
                </svg>
            </button>
        </div>
    }
}

#[component]
fn ModelPicker(model: ReadSignal<String>, set_model: WriteSignal<String>) -> impl IntoView {
    view! {
        <div class="flex items-center gap-2 text-stone-400">
            <Icon icon=icondata_bs::BsStars width="14" height="14"/>
            <select
                class="text-xs px-3 py-2 rounded-md text-stone-300 bg-stone-800 border border-stone-700 hover:border-stone-500 focus:border-amber-200/60 focus:outline-none transition duration-200 ease-in-out"
                on:change=move |ev| set_model(event_target_value(&ev))
                prop:value=move || model.get()
            >
                {MODEL_CATALOG
                    .iter()
                    .map(|(provider, models)| {
                        view! {
                            <optgroup label=*provider>
                                {models
                                    .iter()
                                    .map(|m| view! { <option value=*m>{*m}</option> })
                                    .collect_view()}
                            </optgroup>
                        }
                    })
                    .collect_view()}
            </select>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_tracks_model_family() {
        assert_eq!(provider_for_model("gemini-2.0-flash"), "gemini");
        assert_eq!(provider_for_model("gpt-4o-mini"), "openai");
        assert_eq!(provider_for_model("llama-3.3-70b-versatile"), "groq");
    }

    #[test]
    fn catalog_groups_agree_with_provider_derivation() {
        for (provider, models) in MODEL_CATALOG {
            for model in *models {
                assert_eq!(provider_for_model(model), *provider);
            }
        }
    }

    #[test]
    fn default_model_is_in_the_catalog() {
        assert!(
            MODEL_CATALOG
                .iter()
                .any(|(_, models)| models.contains(&DEFAULT_MODEL))
        );
        assert_eq!(provider_for_model(DEFAULT_MODEL), DEFAULT_PROVIDER);
    }

    #[test]
    fn invoke_failure_wording_depends_on_authorization() {
        assert_eq!(
            invoke_failure_toast(&ApiError::Unauthorized),
            "Unauthorized access. Please log in again."
        );
        assert_eq!(
            invoke_failure_toast(&ApiError::Status(500)),
            "An error occurred while processing your request."
        );
        assert_eq!(
            invoke_failure_toast(&ApiError::Api("invoke returned no result".to_string())),
            "An error occurred while processing your request."
        );
    }
}
