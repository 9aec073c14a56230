use std::rc::Rc;

use yew::prelude::*;

mod betslip;
mod brand;
mod calc;
mod components;
mod config;
mod error;
mod export;
mod format;
mod share;
mod toast;

use betslip::Betslip;
use components::{BetslipForm, BetslipPreview};
use config::AppConfig;
use toast::{Notifier, ToastStack, Toasts};

#[function_component(App)]
fn app() -> Html {
    let config = use_memo((), |_| AppConfig::load());
    let betslip = {
        let config = config.clone();
        use_state(move || Rc::new(config.blank_betslip()))
    };
    let toasts = use_reducer(Toasts::default);
    let notifier = Notifier::new(toasts.dispatcher(), config.toast_duration_ms);

    // Adding a second selection moves an untouched Single to the matching multiple.
    let on_change = {
        let betslip = betslip.clone();
        Callback::from(move |next: Betslip| {
            let previous_len = betslip.selections.len();
            betslip.set(Rc::new(next.settle_bet_type(previous_len)));
        })
    };

    let slip = (*betslip).clone();
    let title = format!("{} Betslip Generator", slip.bookmaker_name());

    html! {
        <ContextProvider<Rc<AppConfig>> context={config.clone()}>
            <div class="container">
                <header class={slip.bookmaker.style().theme_class()}>
                    <h1>{title}</h1>
                    <div class="pill">{"Create and share betslip images"}</div>
                </header>

                <div class="grid">
                    <BetslipForm betslip={slip.clone()} {on_change} />
                    <BetslipPreview betslip={slip} notifier={notifier.clone()} />
                </div>

                <footer>
                    {"For entertainment purposes only. Generated betslips are not real wagers."}
                </footer>
            </div>
            <ToastStack toasts={Rc::new((*toasts).clone())} {notifier} />
        </ContextProvider<Rc<AppConfig>>>
    }
}

fn main() {
    yew::Renderer::<App>::new().render();
}
