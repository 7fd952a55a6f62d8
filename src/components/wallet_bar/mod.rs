//! Wallet bar component.
//!
//! Connect and disconnect buttons per provider, the manual-address field,
//! an account picker for wallets reporting several accounts, and the last
//! wallet error.

use leptos::{ev, prelude::*};
use leptos_icons::Icon;

use crate::app::AppContext;
use crate::components::icons as ic;
use crate::models::{ProviderKind, WalletKind};

stylance::import_crate_style!(css, "src/components/wallet_bar/wallet_bar.module.css");

#[component]
pub fn WalletBar() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided at root");
    let wallet = ctx.wallet;

    let session_name = Signal::derive(move || {
        wallet.selected.with(|s| match s {
            Some(sel) => match &sel.account {
                Some(account) => format!("{} · {}", sel.wallet, account.short()),
                None => sel.wallet.to_string(),
            },
            None => "guest".to_string(),
        })
    });

    view! {
        <div class=css::bar>
            <span class=css::session>
                <Icon icon=ic::WALLET />
                <span class=css::sessionName>{session_name}</span>
            </span>

            <div class=css::providers>
                {ProviderKind::ALL
                    .into_iter()
                    .map(|kind| view! { <ProviderButton kind=kind /> })
                    .collect_view()}
            </div>

            <AccountPicker />
            <ManualEntry />

            <Show when=move || wallet.error.with(Option::is_some)>
                <p class=css::error role="alert">
                    {move || wallet.error.get().unwrap_or_default()}
                </p>
            </Show>
        </div>
    }
}

#[component]
fn ProviderButton(kind: ProviderKind) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let wallet = ctx.wallet;
    let name = WalletKind::Provider(kind);

    let entry = Memo::new(move |_| {
        wallet
            .wallets
            .with(|ws| ws.iter().find(|w| w.name == name).cloned())
    });
    let is_connected = move || entry.with(|e| e.as_ref().is_some_and(|e| e.is_connected));
    let is_detected = move || entry.with(Option::is_some);
    let is_pending = move || wallet.pending.get() == Some(kind);

    let on_click = move |_: ev::MouseEvent| {
        if is_connected() {
            ctx.disconnect(kind);
        } else {
            ctx.connect(kind);
        }
    };

    let label = move || {
        if is_pending() {
            format!("Connecting {}...", kind)
        } else if is_connected() {
            format!("Disconnect {}", kind)
        } else if is_detected() {
            format!("Connect {}", kind)
        } else {
            format!("{} (not installed)", kind)
        }
    };

    view! {
        <button
            class=move || if is_connected() { css::connected } else { css::button }
            disabled=move || wallet.pending.with(Option::is_some)
            on:click=on_click
            title=move || entry.with(|e| e.as_ref().map(|e| e.display_name()).unwrap_or_default())
        >
            {move || if is_connected() {
                view! { <Icon icon=ic::DISCONNECT /> }.into_any()
            } else {
                view! { <Icon icon=ic::CONNECT /> }.into_any()
            }}
            <span>{label}</span>
        </button>
    }
}

/// Only shown when the selected wallet reported more than one account.
#[component]
fn AccountPicker() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let wallet = ctx.wallet;

    let connected = Memo::new(move |_| {
        wallet
            .wallets
            .with(|ws| ws.iter().find(|w| w.is_connected).cloned())
    });
    let has_choice = move || connected.with(|c| c.as_ref().is_some_and(|c| c.accounts.len() > 1));

    let on_change = move |ev: ev::Event| {
        if let Some(entry) = connected.get_untracked() {
            ctx.select_account(entry.name, &event_target_value(&ev));
        }
    };

    view! {
        <Show when=has_choice>
            <label class=css::accounts>
                "Account"
                <select on:change=on_change>
                    {move || connected.get().map(|entry| {
                        let current = entry.address.clone();
                        entry
                            .accounts
                            .into_iter()
                            .map(|account| {
                                let selected = current.as_ref() == Some(&account);
                                view! {
                                    <option value=account.to_string() selected=selected>
                                        {account.short()}
                                    </option>
                                }
                            })
                            .collect_view()
                    })}
                </select>
            </label>
        </Show>
    }
}

#[component]
fn ManualEntry() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let manual = ctx.wallet.manual_address;
    let (draft, set_draft) = signal(String::new());

    let submit = move || {
        if ctx.add_manual_entry(&draft.get_untracked()) {
            set_draft.set(String::new());
        }
    };

    view! {
        <div class=css::manual>
            {move || match manual.get() {
                Some(address) => view! {
                    <span class=css::manualAddress title=address.to_string()>
                        "Manual: " {address.short()}
                    </span>
                    <button
                        class=css::iconButton
                        title="Stop tracking"
                        on:click=move |_| ctx.remove_manual_entry()
                    >
                        <Icon icon=ic::TRASH />
                    </button>
                }.into_any(),
                None => view! {
                    <input
                        class=css::input
                        type="text"
                        placeholder="Track a wallet address"
                        prop:value=draft
                        on:input=move |ev| set_draft.set(event_target_value(&ev))
                        on:keydown=move |ev: ev::KeyboardEvent| {
                            if ev.key() == "Enter" {
                                submit();
                            }
                        }
                    />
                    <button class=css::button on:click=move |_| submit()>"Track"</button>
                }.into_any(),
            }}
        </div>
    }
}
