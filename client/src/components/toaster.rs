//! Toast renderer for the notice queue.
//!
//! Each notice is shown until dismissed or until `AUTO_DISMISS_MS` passes.

use leptos::prelude::*;

use crate::state::notices::{Notice, NoticeState};

#[cfg(feature = "csr")]
const AUTO_DISMISS_MS: u32 = 5_000;

#[component]
pub fn Toaster() -> impl IntoView {
    let notices = expect_context::<RwSignal<NoticeState>>();

    view! {
        <div class="toaster" role="status" aria-live="polite">
            <For each=move || notices.get().items key=|notice| notice.id let:notice>
                <Toast notice=notice notices=notices/>
            </For>
        </div>
    }
}

#[component]
fn Toast(notice: Notice, notices: RwSignal<NoticeState>) -> impl IntoView {
    let id = notice.id;

    #[cfg(feature = "csr")]
    leptos::task::spawn_local(async move {
        gloo_timers::future::TimeoutFuture::new(AUTO_DISMISS_MS).await;
        notices.update(|state| state.dismiss(id));
    });

    view! {
        <div class=format!("toast {}", notice.kind.class())>
            <div class="toast__body">
                <p class="toast__title">{notice.title}</p>
                <p class="toast__description">{notice.description}</p>
            </div>
            <button class="toast__close" title="Cerrar" on:click=move |_| notices.update(|state| state.dismiss(id))>
                "×"
            </button>
        </div>
    }
}
