use leptos::prelude::*;

use crate::components::markdown::MarkdownRenderer;
use crate::models::conversations::{Message, Role, Session};

/// What the auto-scroll keys on: the thread and its transcript. Sidebar-only
/// session updates leave this value unchanged, so a conversation-list refresh
/// does not move the scroll position.
fn transcript_snapshot(session: &Session) -> (Option<String>, Vec<Message>) {
    (session.thread_id.clone(), session.messages.clone())
}

#[component]
pub fn MessageList(session: ReadSignal<Session>) -> impl IntoView {
    let anchor = NodeRef::<leptos::html::Div>::new();
    let transcript = Memo::new(move |_| session.with(transcript_snapshot));

    // Keep the newest message in view whenever the transcript changes.
    Effect::new(move |_| {
        transcript.track();
        if let Some(el) = anchor.get() {
            el.scroll_into_view();
        }
    });

    view! {
        <div class="flex flex-col space-y-4 px-4 py-6">
            {move || {
                session
                    .with(|s| s.messages.clone())
                    .into_iter()
                    .map(|message| view! { <MessageBubble message=message/> })
                    .collect_view()
            }} <div node_ref=anchor></div>
        </div>
    }
}

#[component]
fn MessageBubble(message: Message) -> impl IntoView {
    match message.role {
        Role::User => view! {
            <div class="flex justify-end">
                <div class="max-w-[80%] rounded-2xl rounded-br-sm bg-amber-100 px-4 py-3 text-stone-900 shadow-sm whitespace-pre-wrap break-words">
                    {message.content}
                </div>
            </div>
        }
        .into_any(),
        Role::Ai => view! {
            <div class="flex justify-start">
                <div class="max-w-[85%] rounded-2xl rounded-bl-sm bg-stone-800 px-4 py-3 text-stone-100 shadow-sm">
                    <MarkdownRenderer content=message.content/>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::conversations::ConversationMetadata;

    #[test]
    fn sidebar_refresh_leaves_the_scroll_key_alone() {
        let mut session = Session::new();
        session.begin_exchange("hello");
        let before = transcript_snapshot(&session);

        session.set_conversations(vec![ConversationMetadata {
            date: "2025-06-01T12:00:00".to_string(),
            thread_id: "t1".to_string(),
            title: "Trip".to_string(),
        }]);

        assert_eq!(before, transcript_snapshot(&session));
    }

    #[test]
    fn transcript_changes_move_the_scroll_key() {
        let mut session = Session::new();
        let empty = transcript_snapshot(&session);

        session.begin_exchange("hello");
        let pending = transcript_snapshot(&session);
        assert_ne!(empty, pending);

        session.resolve_reply("hi there".to_string());
        let resolved = transcript_snapshot(&session);
        assert_ne!(pending, resolved);

        session.select_thread("thread-1");
        assert_ne!(transcript_snapshot(&session), empty);
    }
}
