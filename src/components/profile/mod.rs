//! Profile card for the selected account.
//!
//! Shows the stored profile and an editor that creates it on first save.

use leptos::{ev, prelude::*};
use leptos_icons::Icon;
use wasm_bindgen_futures::spawn_local;

use crate::app::AppContext;
use crate::components::icons as ic;
use crate::models::{Address, Profile, ProfileDraft};

stylance::import_crate_style!(css, "src/components/profile/profile.module.css");

#[component]
pub fn ProfileCard() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided at root");
    let wallet = ctx.wallet;

    let (profile, set_profile) = signal::<Option<Profile>>(None);
    let (loading, set_loading) = signal(false);
    let (error, set_error) = signal::<Option<String>>(None);
    let (editing, set_editing) = signal(false);
    let (username, set_username) = signal(String::new());
    let (bio, set_bio) = signal(String::new());

    let client = move || ctx.services.try_with_value(|s| s.profiles.clone());

    // Reload whenever the selected account changes
    Effect::new(move |_| {
        set_profile.set(None);
        set_error.set(None);
        set_editing.set(false);
        let (Some(owner), Some(client)) = (wallet.active_address(), client()) else {
            return;
        };
        set_loading.set(true);
        spawn_local(async move {
            let result = client.get(&owner).await;
            if wallet.active_address_untracked().as_ref() != Some(&owner) {
                return;
            }
            set_loading.set(false);
            match result {
                Ok(found) => set_profile.set(found),
                Err(e) => set_error.set(Some(e.to_string())),
            }
        });
    });

    let start_editing = move |_: ev::MouseEvent| {
        let current = profile.get_untracked();
        set_username.set(current.as_ref().map(|p| p.username.clone()).unwrap_or_default());
        set_bio.set(current.and_then(|p| p.bio).unwrap_or_default());
        set_error.set(None);
        set_editing.set(true);
    };

    let save = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let (Some(owner), Some(client)) = (wallet.active_address_untracked(), client()) else {
            return;
        };
        let draft = ProfileDraft::new(username.get_untracked(), bio.get_untracked());
        let exists = profile.with_untracked(Option::is_some);
        set_loading.set(true);
        spawn_local(async move {
            let result = if exists {
                client.update(&owner, &draft).await
            } else {
                client.create(&owner, &draft).await
            };
            set_loading.set(false);
            match result {
                Ok(saved) => {
                    set_profile.set(Some(saved));
                    set_editing.set(false);
                    set_error.set(None);
                }
                Err(e) => set_error.set(Some(e.to_string())),
            }
        });
    };

    let delete = move |_: ev::MouseEvent| {
        let (Some(owner), Some(client)) = (wallet.active_address_untracked(), client()) else {
            return;
        };
        set_loading.set(true);
        spawn_local(async move {
            let result = client.delete(&owner).await;
            set_loading.set(false);
            match result {
                Ok(()) => set_profile.set(None),
                Err(e) => set_error.set(Some(e.to_string())),
            }
        });
    };

    view! {
        <section class=css::card>
            <h2 class=css::heading>
                <Icon icon=ic::USER />
                "Profile"
            </h2>

            {move || {
                let Some(owner) = wallet.active_address() else {
                    return view! { <p class=css::muted>"No wallet selected."</p> }.into_any();
                };
                if loading.get() {
                    return view! { <p class=css::muted>"Loading..."</p> }.into_any();
                }
                if editing.get() {
                    return view! {
                        <form class=css::form on:submit=save>
                            <input
                                class=css::input
                                placeholder="Username"
                                prop:value=username
                                on:input=move |ev| set_username.set(event_target_value(&ev))
                            />
                            <textarea
                                class=css::input
                                placeholder="Bio"
                                prop:value=bio
                                on:input=move |ev| set_bio.set(event_target_value(&ev))
                            />
                            <div class=css::actions>
                                <button class=css::button type="submit">"Save"</button>
                                <button
                                    class=css::button
                                    type="button"
                                    on:click=move |_| set_editing.set(false)
                                >
                                    "Cancel"
                                </button>
                            </div>
                        </form>
                    }.into_any();
                }
                view! { <ProfileView owner=owner profile=profile.get() on_edit=start_editing on_delete=delete /> }.into_any()
            }}

            <Show when=move || error.with(Option::is_some)>
                <p class=css::error role="alert">{move || error.get().unwrap_or_default()}</p>
            </Show>
        </section>
    }
}

#[component]
fn ProfileView(
    owner: Address,
    profile: Option<Profile>,
    on_edit: impl Fn(ev::MouseEvent) + 'static,
    on_delete: impl Fn(ev::MouseEvent) + 'static,
) -> impl IntoView {
    match profile {
        Some(profile) => view! {
            <div class=css::body>
                <strong class=css::username>{profile.username}</strong>
                {profile.bio.map(|bio| view! { <p class=css::bio>{bio}</p> })}
                <span class=css::muted title=owner.to_string()>{owner.short()}</span>
                <div class=css::actions>
                    <button class=css::button on:click=on_edit>
                        <Icon icon=ic::EDIT />
                        "Edit"
                    </button>
                    <button class=css::danger on:click=on_delete>
                        <Icon icon=ic::TRASH />
                        "Delete"
                    </button>
                </div>
            </div>
        }
        .into_any(),
        None => view! {
            <div class=css::body>
                <p class=css::muted>"No profile for " {owner.short()} " yet."</p>
                <div class=css::actions>
                    <button class=css::button on:click=on_edit>"Create profile"</button>
                </div>
            </div>
        }
        .into_any(),
    }
}
