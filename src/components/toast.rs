use leptos::prelude::*;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ToastKind {
    #[default]
    Error,
    Success,
}

impl ToastKind {
    fn accent_classes(&self) -> &'static str {
        match self {
            ToastKind::Error => "border-red-500/70 text-red-200",
            ToastKind::Success => "border-emerald-500/70 text-emerald-200",
        }
    }
}

/// Identifies one showing of the toast. Every show advances the generation,
/// so a dismiss timer armed for an earlier toast no longer matches and leaves
/// the current one on screen for its full 3 s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct ToastGeneration(u32);

impl ToastGeneration {
    fn advance(&mut self) -> ToastGeneration {
        self.0 = self.0.wrapping_add(1);
        *self
    }
}

/// Write side of the single notification slot. ChatWindow owns the signals
/// and hands copies of this to whatever needs to raise a toast; a new toast
/// replaces the one on screen and re-arms the 3 s auto-dismiss.
#[derive(Clone, Copy)]
pub struct ToastHandle {
    message: WriteSignal<String>,
    kind: WriteSignal<ToastKind>,
    visible: WriteSignal<bool>,
    generation: RwSignal<ToastGeneration>,
}

impl ToastHandle {
    pub fn new(
        message: WriteSignal<String>,
        kind: WriteSignal<ToastKind>,
        visible: WriteSignal<bool>,
    ) -> Self {
        ToastHandle {
            message,
            kind,
            visible,
            generation: RwSignal::new(ToastGeneration::default()),
        }
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(ToastKind::Error, message.into());
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(ToastKind::Success, message.into());
    }

    pub fn dismiss(&self) {
        self.visible.set(false);
    }

    fn show(&self, kind: ToastKind, message: String) {
        self.message.set(message);
        self.kind.set(kind);
        self.visible.set(true);

        let mut armed = ToastGeneration::default();
        self.generation.update(|g| armed = g.advance());

        let visible = self.visible;
        let generation = self.generation;
        set_timeout(
            move || {
                // a replacement toast re-armed the clock; stale timers stand down
                if generation.get_untracked() == armed {
                    visible.set(false);
                }
            },
            Duration::from_secs(3),
        );
    }
}

#[component]
pub fn Toast(
    message: ReadSignal<String>,
    kind: ReadSignal<ToastKind>,
    visible: ReadSignal<bool>,
    #[prop(into)] on_close: Callback<()>,
) -> impl IntoView {
    let opacity_class = move || {
        if visible.get() {
            "opacity-100"
        } else {
            "opacity-0 pointer-events-none"
        }
    };

    view! {
        <div class=move || {
            format!(
                "{} {} fixed top-4 right-4 z-50 max-w-sm bg-stone-900 border-l-4 px-4 py-3 rounded shadow-lg transition-opacity duration-300",
                opacity_class(),
                kind.get().accent_classes(),
            )
        }>
            {message}
            <button
                class="ml-3 text-stone-400 hover:text-stone-200"
                on:click=move |_| on_close.run(())
            >
                "×"
            </button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_replacement_toast_orphans_the_earlier_timer() {
        let mut generation = ToastGeneration::default();
        let first = generation.advance();
        let second = generation.advance();

        // the timer armed for the first toast no longer matches
        assert_ne!(generation, first);
        // the live timer still does
        assert_eq!(generation, second);
    }

    #[test]
    fn the_generation_wraps_instead_of_panicking() {
        let mut generation = ToastGeneration(u32::MAX);
        let armed = generation.advance();

        assert_eq!(generation, armed);
    }
}
