//! Read-only table used by the resource listing pages.

use leptos::prelude::*;

#[component]
pub fn DataTable(
    headers: &'static [&'static str],
    #[prop(into)] rows: Signal<Vec<Vec<String>>>,
    #[prop(into)] loading: Signal<bool>,
    empty: &'static str,
) -> impl IntoView {
    view! {
        <Show when=move || !loading.get() fallback=|| view! { <p class="page-loading">"Cargando..."</p> }>
            <Show when=move || !rows.get().is_empty() fallback=move || view! { <p class="data-table__empty">{empty}</p> }>
                <table class="data-table">
                    <thead>
                        <tr>{headers.iter().map(|header| view! { <th>{*header}</th> }).collect_view()}</tr>
                    </thead>
                    <tbody>
                        {move || {
                            rows.get()
                                .into_iter()
                                .map(|row| {
                                    view! {
                                        <tr>{row.into_iter().map(|cell| view! { <td>{cell}</td> }).collect_view()}</tr>
                                    }
                                })
                                .collect_view()
                        }}
                    </tbody>
                </table>
            </Show>
        </Show>
    }
}
