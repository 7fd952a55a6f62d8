//! NFT gallery component.
//!
//! Lists the assets owned by the selected account through the NFT cache.
//! The refresh button bypasses the cache and is throttled to one request
//! per `REFRESH_THROTTLE_MS`.

use std::rc::Rc;

use leptos::{ev, prelude::*};
use leptos_icons::Icon;
use wasm_bindgen_futures::spawn_local;

use crate::app::AppContext;
use crate::components::icons as ic;
use crate::config::REFRESH_THROTTLE_MS;
use crate::core::Throttled;
use crate::core::error::FetchError;
use crate::models::{Address, NftSummary};
use crate::utils::Clock;

stylance::import_crate_style!(css, "src/components/gallery/gallery.module.css");

type Listing = (Address, Result<Vec<NftSummary>, FetchError>);

#[component]
pub fn Gallery() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided at root");
    let wallet = ctx.wallet;

    let (items, set_items) = signal(Vec::<NftSummary>::new());
    let (loading, set_loading) = signal(false);
    let (error, set_error) = signal::<Option<String>>(None);

    // Results for an account that is no longer selected are dropped.
    let apply = move |(owner, result): Listing| {
        if wallet.active_address_untracked().as_ref() != Some(&owner) {
            return;
        }
        set_loading.set(false);
        match result {
            Ok(list) => set_items.set(list),
            Err(e) => {
                log::warn!("failed to load assets for {}: {}", owner, e);
                set_error.set(Some(e.to_string()));
            }
        }
    };

    let refresh = StoredValue::new_local(ctx.services.with_value(|s| {
        let cache = Rc::clone(&s.nft_cache);
        Throttled::new(
            Rc::clone(&s.timer) as Rc<dyn Clock>,
            REFRESH_THROTTLE_MS,
            move |owner: Address| {
                let cache = Rc::clone(&cache);
                async move {
                    let result = cache.refetch(owner.as_str()).await;
                    (owner, result)
                }
            },
        )
    }));

    // Load from cache whenever the selected account changes
    Effect::new(move |_| {
        set_error.set(None);
        let Some(owner) = wallet.active_address() else {
            set_items.set(Vec::new());
            set_loading.set(false);
            return;
        };
        let Some(cache) = ctx.services.try_with_value(|s| Rc::clone(&s.nft_cache)) else {
            return;
        };
        set_loading.set(true);
        spawn_local(async move {
            let result = cache.fetch(owner.as_str()).await;
            apply((owner, result));
        });
    });

    let on_refresh = move |_: ev::MouseEvent| {
        let Some(owner) = wallet.active_address_untracked() else {
            return;
        };
        match refresh.try_with_value(|t| t.call(owner)).flatten() {
            Some(listing) => {
                set_loading.set(true);
                set_error.set(None);
                spawn_local(async move { apply(listing.await) });
            }
            None => log::debug!("refresh throttled"),
        }
    };

    let has_owner = move || wallet.selected.with(|s| s.is_some());

    view! {
        <section class=css::gallery>
            <div class=css::toolbar>
                <h2 class=css::title>"Your NFTs"</h2>
                <button
                    class=css::refresh
                    title="Refresh from the indexer"
                    disabled=move || !has_owner() || loading.get()
                    on:click=on_refresh
                >
                    <Icon icon=ic::REFRESH />
                </button>
            </div>

            <Show when=move || error.with(Option::is_some)>
                <p class=css::error role="alert">{move || error.get().unwrap_or_default()}</p>
            </Show>

            {move || {
                if !has_owner() {
                    view! { <p class=css::empty>"Connect a wallet or track an address to see its NFTs."</p> }.into_any()
                } else if loading.get() && items.with(Vec::is_empty) {
                    view! { <p class=css::empty>"Loading..."</p> }.into_any()
                } else if items.with(Vec::is_empty) {
                    view! { <p class=css::empty>"No NFTs found for this address."</p> }.into_any()
                } else {
                    view! {
                        <div class=css::grid>
                            <For
                                each=move || items.get()
                                key=|nft| nft.id.clone()
                                children=move |nft| view! { <NftCard nft=nft /> }
                            />
                        </div>
                    }.into_any()
                }
            }}

            <FavoriteList />
        </section>
    }
}

#[component]
fn NftCard(nft: NftSummary) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let favorites = ctx.favorites;

    let id = nft.id.clone();
    let is_favorite = Memo::new(move |_| favorites.with(|f| f.contains(&id)));
    let toggle = {
        let nft = nft.clone();
        move |_: ev::MouseEvent| {
            favorites.update(|f| {
                f.toggle(&nft);
            });
        }
    };

    view! {
        <article class=css::card>
            <img class=css::image src=nft.image_url.clone() alt=nft.title.clone() loading="lazy" />
            <div class=css::cardBody>
                <h3 class=css::cardTitle>{nft.title.clone()}</h3>
                <p class=css::cardText>{nft.description.clone()}</p>
                <ul class=css::attributes>
                    {nft.attributes
                        .iter()
                        .map(|a| view! {
                            <li><span>{a.trait_type.clone()}</span>" "{a.value.clone()}</li>
                        })
                        .collect_view()}
                </ul>
            </div>
            <button
                class=css::favorite
                title=move || if is_favorite.get() { "Remove from favorites" } else { "Add to favorites" }
                on:click=toggle
            >
                {move || if is_favorite.get() {
                    view! { <Icon icon=ic::STAR_FILLED /> }.into_any()
                } else {
                    view! { <Icon icon=ic::STAR /> }.into_any()
                }}
            </button>
        </article>
    }
}

#[component]
fn FavoriteList() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let favorites = ctx.favorites;

    view! {
        <Show when=move || favorites.with(|f| !f.is_empty())>
            <h2 class=css::title>"Favorites"</h2>
            <ul class=css::favorites>
                <For
                    each=move || favorites.with(|f| f.items().to_vec())
                    key=|nft| nft.id.clone()
                    children=move |nft| {
                        let id = nft.id.clone();
                        view! {
                            <li>
                                <span>{nft.title}</span>
                                <button
                                    class=css::iconButton
                                    title="Remove from favorites"
                                    on:click=move |_| favorites.update(|f| {
                                        f.remove(&id);
                                    })
                                >
                                    <Icon icon=ic::TRASH />
                                </button>
                            </li>
                        }
                    }
                />
            </ul>
        </Show>
    }
}
