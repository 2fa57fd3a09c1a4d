use leptos::prelude::*;
use leptos_icons::Icon;

use crate::models::conversations::{ConversationMetadata, Session};

#[component]
pub fn ThreadList(
    session: ReadSignal<Session>,
    open: ReadSignal<bool>,
    set_open: WriteSignal<bool>,
    #[prop(into)] on_select: Callback<String>,
    #[prop(into)] on_new: Callback<()>,
    #[prop(into)] on_delete: Callback<ConversationMetadata>,
) -> impl IntoView {
    view! {
        <div class=move || {
            format!(
                "flex h-full flex-col bg-stone-900 border-r border-stone-800 transition-all duration-200 {}",
                if open.get() { "w-64" } else { "w-14" },
            )
        }>
            <div class="flex items-center gap-1 p-2">
                <button
                    class="rounded-md p-2 hover:bg-stone-800 transition-colors"
                    on:click=move |_| set_open(!open.get_untracked())
                >
                    <svg
                        xmlns="http://www.w3.org/2000/svg"
                        height="20px"
                        viewBox="120 -840 720 720"
                        width="20px"
                    >
                        <path
                            d="M200-120q-33 0-56.5-23.5T120-200v-560q0-33 23.5-56.5T200-840h560q33 0 56.5 23.5T840-760v560q0 33-23.5 56.5T760-120H200Zm120-80v-560H200v560h120Zm80 0h360v-560H400v560Zm-80 0H200h120Z"
                            fill="#FFFBDE"
                        ></path>
                    </svg>
                </button>
                <button
                    class="rounded-md p-2 hover:bg-stone-800 transition-colors"
                    on:click=move |_| on_new.run(())
                >
                    <svg
                        xmlns="http://www.w3.org/2000/svg"
                        height="20px"
                        viewBox="120 -921 800 801"
                        width="20px"
                    >
                        <path
                            d="M200-120q-33 0-56.5-23.5T120-200v-560q0-33 23.5-56.5T200-840h357l-80 80H200v560h560v-278l80-80v358q0 33-23.5 56.5T760-120H200Zm280-360ZM360-360v-170l367-367q12-12 27-18t30-6q16 0 30.5 6t26.5 18l56 57q11 12 17 26.5t6 29.5q0 15-5.5 29.5T897-728L530-360H360Zm481-424-56-56 56 56ZM440-440h56l232-232-28-28-29-28-231 231v57Zm260-260-29-28 29 28 28 28-28-28Z"
                            fill="#FFFBDE"
                        ></path>
                    </svg>
                </button>
            </div>
            <Show when=move || open.get()>
                <div class="px-3 pb-2 text-xs font-semibold uppercase tracking-wide text-stone-400">
                    "Chats"
                </div>
                <ul class="flex-1 space-y-1 overflow-y-auto px-2 pb-4">
                    {move || {
                        session
                            .with(|s| {
                                s.conversations
                                    .iter()
                                    .map(|c| (c.clone(), s.is_active(&c.thread_id)))
                                    .collect::<Vec<_>>()
                            })
                            .into_iter()
                            .map(|(conversation, active)| {
                                view! {
                                    <ConversationRow
                                        conversation=conversation
                                        active=active
                                        on_select=on_select
                                        on_delete=on_delete
                                    />
                                }
                            })
                            .collect_view()
                    }}
                </ul>
            </Show>
        </div>
    }
}

#[component]
fn ConversationRow(
    conversation: ConversationMetadata,
    active: bool,
    on_select: Callback<String>,
    on_delete: Callback<ConversationMetadata>,
) -> impl IntoView {
    let select_id = conversation.thread_id.clone();
    let delete_meta = conversation.clone();

    view! {
        <li
            class=format!(
                "group flex cursor-pointer items-center justify-between rounded-md px-3 py-2 text-sm transition-colors {}",
                if active {
                    "bg-stone-700 text-amber-100"
                } else {
                    "text-stone-300 hover:bg-stone-800"
                },
            )

            on:click=move |_| on_select.run(select_id.clone())
        >
            <p class="truncate">{conversation.title}</p>
            <button
                class="ml-2 shrink-0 text-stone-500 opacity-0 transition-opacity hover:text-red-400 group-hover:opacity-100"
                on:click=move |ev| {
                    ev.stop_propagation();
                    on_delete.run(delete_meta.clone());
                }
            >

                <Icon icon=icondata_bs::BsTrash3 width="16" height="16"/>
            </button>
        </li>
    }
}
