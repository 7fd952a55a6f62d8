//! NFT search by id.
//!
//! The lookup fires `SEARCH_DEBOUNCE_MS` after the last keystroke; typing
//! again before then supersedes the pending lookup.

use std::rc::Rc;

use leptos::{ev, prelude::*};
use leptos_icons::Icon;
use wasm_bindgen_futures::spawn_local;

use crate::app::AppContext;
use crate::components::icons as ic;
use crate::config::SEARCH_DEBOUNCE_MS;
use crate::core::Debounced;
use crate::core::error::FetchError;
use crate::models::NftDetail;
use crate::utils::Timer;

stylance::import_crate_style!(css, "src/components/search/search.module.css");

#[component]
pub fn Search() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided at root");

    let (query, set_query) = signal(String::new());
    let (result, set_result) = signal::<Option<NftDetail>>(None);
    let (error, set_error) = signal::<Option<String>>(None);
    let (searching, set_searching) = signal(false);

    let lookup = StoredValue::new_local(ctx.services.with_value(|s| {
        let indexer = s.indexer.clone();
        Debounced::new(
            Rc::clone(&s.timer) as Rc<dyn Timer>,
            SEARCH_DEBOUNCE_MS,
            move |id: String| {
                let indexer = indexer.clone();
                async move { indexer.fetch_detail(&id).await }
            },
        )
    }));

    let on_input = move |ev: ev::Event| {
        let id = event_target_value(&ev);
        set_query.set(id.clone());
        set_error.set(None);

        if id.trim().is_empty() {
            let _ = lookup.try_with_value(Debounced::cancel);
            set_result.set(None);
            set_searching.set(false);
            return;
        }

        let Some(pending) = lookup.try_with_value(|d| d.call(id.clone())) else {
            return;
        };
        set_searching.set(true);
        spawn_local(async move {
            // None: superseded by a later keystroke, which owns the spinner.
            let Some(outcome) = pending.await else {
                return;
            };
            // A lookup already in flight can finish after a newer one.
            if !is_current(&query.get_untracked(), &id) {
                return;
            }
            set_searching.set(false);
            match outcome {
                Ok(detail) => set_result.set(detail),
                Err(FetchError::HttpError(404)) => {
                    set_result.set(None);
                    set_error.set(Some("No NFT with that id.".to_string()));
                }
                Err(e) => {
                    set_result.set(None);
                    set_error.set(Some(e.to_string()));
                }
            }
        });
    };

    view! {
        <section class=css::search>
            <label class=css::field>
                <Icon icon=ic::SEARCH />
                <input
                    class=css::input
                    type="search"
                    placeholder="Look up an NFT by id"
                    prop:value=query
                    on:input=on_input
                />
            </label>

            <Show when=move || searching.get()>
                <p class=css::hint>"Searching..."</p>
            </Show>
            <Show when=move || error.with(Option::is_some)>
                <p class=css::error role="alert">{move || error.get().unwrap_or_default()}</p>
            </Show>

            {move || result.get().map(|detail| view! { <DetailCard detail=detail /> })}
        </section>
    }
}

/// Whether a lookup for `requested` still matches what the input shows.
fn is_current(query: &str, requested: &str) -> bool {
    query.trim() == requested.trim()
}

#[component]
fn DetailCard(detail: NftDetail) -> impl IntoView {
    let NftDetail {
        summary,
        collection,
        royalty,
        owner,
        mutable,
        burnt,
        external_url,
        symbol,
        token_standard,
        compression,
    } = detail;

    let flags = [
        (mutable, "mutable"),
        (burnt, "burnt"),
        (compression.compressed, "compressed"),
        (royalty.locked, "royalty locked"),
    ]
    .into_iter()
    .filter(|(on, _)| *on)
    .map(|(_, label)| label)
    .collect::<Vec<_>>()
    .join(" · ");

    view! {
        <article class=css::detail>
            <img class=css::image src=summary.image_url alt=summary.title.clone() />
            <h3 class=css::title>{summary.title}</h3>
            <p class=css::description>{summary.description}</p>
            <dl class=css::facts>
                <dt>"Collection"</dt>
                <dd title=collection.address>{collection.name}</dd>
                <dt>"Symbol"</dt>
                <dd>{symbol}</dd>
                <dt>"Standard"</dt>
                <dd>{token_standard}</dd>
                <dt>"Owner"</dt>
                <dd class=css::mono>{owner}</dd>
                <dt>"Royalty"</dt>
                <dd>{format!("{} ({})", royalty.display_percent(), royalty.model)}</dd>
            </dl>
            {(!flags.is_empty()).then(|| view! { <p class=css::hint>{flags}</p> })}
            {external_url.map(|url| view! {
                <a class=css::link href=url target="_blank" rel="noopener noreferrer">
                    "Website " <Icon icon=ic::EXTERNAL_LINK />
                </a>
            })}
        </article>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_late_lookup_for_older_query_is_stale() {
        assert!(!is_current("F9Lw3ki3", "F9Lw"));
        assert!(!is_current("", "F9Lw"));
    }

    #[test]
    fn test_lookup_for_current_query_applies() {
        assert!(is_current("F9Lw3ki3", "F9Lw3ki3"));
        assert!(is_current("F9Lw3ki3 ", "F9Lw3ki3"));
    }
}
