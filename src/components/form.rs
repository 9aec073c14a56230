use std::rc::Rc;

use yew::prelude::*;
use yew::TargetCast;
use web_sys::{HtmlInputElement, HtmlSelectElement};

use crate::betslip::{
    self, BetType, Betslip, Market, SelectionEdit, FALLBACK_ODDS, FALLBACK_STAKE, MIN_ODDS,
};
use crate::brand::Bookmaker;
use crate::config::AppConfig;
use crate::format::{Currency, OddsFormat};

#[derive(Clone, Copy, PartialEq)]
enum Tab {
    Matches,
    Stake,
    Details,
}

impl Tab {
    fn all() -> &'static [(Self, &'static str)] {
        &[(Tab::Matches, "Matches"), (Tab::Stake, "Stake"), (Tab::Details, "Details")]
    }

    fn next(self) -> (Tab, &'static str) {
        match self {
            Tab::Matches => (Tab::Stake, "Next: Stake"),
            Tab::Stake => (Tab::Details, "Next: Details"),
            Tab::Details => (Tab::Matches, "Back to Matches"),
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct BetslipFormProps {
    pub betslip: Rc<Betslip>,
    pub on_change: Callback<Betslip>,
}

fn input_value<E: TargetCast>(e: E) -> String {
    e.target_unchecked_into::<HtmlInputElement>().value()
}

fn selected<E: TargetCast>(e: E) -> usize {
    let idx = e.target_unchecked_into::<HtmlSelectElement>().selected_index();
    usize::try_from(idx).unwrap_or(0)
}

/// Callback that derives the next betslip from the current one.
fn updater<E: 'static>(props: &BetslipFormProps, f: impl Fn(&Betslip, E) -> Betslip + 'static) -> Callback<E> {
    let slip = props.betslip.clone();
    let on_change = props.on_change.clone();
    Callback::from(move |e: E| on_change.emit(f(&*slip, e)))
}

#[function_component(BetslipForm)]
pub fn betslip_form(props: &BetslipFormProps) -> Html {
    let config = use_context::<Rc<AppConfig>>().unwrap_or_default();
    let tab = use_state(|| Tab::Matches);
    let slip = &props.betslip;

    let on_reset = {
        let config = config.clone();
        let on_change = props.on_change.clone();
        Callback::from(move |_: MouseEvent| on_change.emit(config.blank_betslip()))
    };
    let on_bookmaker = {
        let default_currency = config.default_currency;
        updater(props, move |s, e: Event| {
            let bookmaker = Bookmaker::all().get(selected(e)).copied().unwrap_or(Bookmaker::Bet365);
            s.with_bookmaker(bookmaker, default_currency)
        })
    };
    let on_custom_name = updater(props, |s, e: InputEvent| s.with_custom_bookmaker_name(input_value(e)));
    let on_add = updater(props, |s, _: MouseEvent| s.add_selection());
    let on_currency = updater(props, |s, e: Event| {
        s.with_currency(Currency::all().get(selected(e)).copied().unwrap_or(Currency::DEFAULT))
    });
    let on_stake = updater(props, |s, e: Event| {
        s.with_stake(betslip::parse_stake(&input_value(e)).unwrap_or(FALLBACK_STAKE))
    });
    let on_bet_type = updater(props, |s, e: Event| {
        s.with_bet_type(BetType::all().get(selected(e)).copied().unwrap_or(BetType::Single))
    });
    let on_receipt = updater(props, |s, e: InputEvent| s.with_receipt_number(input_value(e)));
    let on_placed_at = updater(props, |s, e: Event| match betslip::parse_datetime_input(&input_value(e)) {
        Some(at) => s.with_placed_at(at),
        None => s.clone(),
    });
    let on_odds_format = updater(props, |s, e: Event| {
        let format = OddsFormat::all().get(selected(e)).map(|(f, _)| *f).unwrap_or(OddsFormat::Decimal);
        s.with_odds_format(format)
    });
    let on_next = {
        let tab = tab.clone();
        Callback::from(move |_: MouseEvent| tab.set(tab.next().0))
    };

    let multiple = slip.selections.len() > 1;

    let selections = slip.selections.iter().enumerate().map(|(i, sel)| {
        let id = sel.id.clone();
        let edit = |make: fn(String) -> SelectionEdit| {
            let id = id.clone();
            updater(props, move |s, e: InputEvent| s.edit_selection(&id, make(input_value(e))))
        };
        let on_home = edit(SelectionEdit::HomeTeam);
        let on_away = edit(SelectionEdit::AwayTeam);
        let on_pick = edit(SelectionEdit::Pick);
        let on_custom_market = edit(SelectionEdit::CustomMarket);
        let on_market = {
            let id = id.clone();
            updater(props, move |s, e: Event| {
                let market = Market::all().get(selected(e)).copied().unwrap_or(Market::MatchResult);
                s.edit_selection(&id, SelectionEdit::Market(market))
            })
        };
        let on_odds = {
            let id = id.clone();
            updater(props, move |s, e: Event| {
                let odds = betslip::parse_odds(&input_value(e)).unwrap_or(FALLBACK_ODDS);
                s.edit_selection(&id, SelectionEdit::Odds(odds))
            })
        };
        let on_date = {
            let id = id.clone();
            updater(props, move |s, e: Event| match betslip::parse_datetime_input(&input_value(e)) {
                Some(at) => s.edit_selection(&id, SelectionEdit::EventDate(at)),
                None => s.clone(),
            })
        };
        let on_remove = {
            let id = id.clone();
            updater(props, move |s, _: MouseEvent| match s.try_remove_selection(&id) {
                Ok(next) => next,
                Err(err) => {
                    gloo::console::warn!(format!("not removing selection: {}", err));
                    s.clone()
                }
            })
        };

        html! {
            <div key={id.clone()} class="selection-card">
                <div class="row-line">
                    <h3>{format!("Selection {}", i + 1)}</h3>
                    { if multiple {
                        html!{ <button onclick={on_remove} class="danger small" aria-label="Remove selection">{"Remove"}</button> }
                    } else { html!{} }}
                </div>
                <div class="row">
                    <div class="input-group">
                        <label>{"Home Team"}</label>
                        <input value={sel.home_team.clone()} oninput={on_home} aria-label="Home team" />
                    </div>
                    <div class="input-group">
                        <label>{"Away Team"}</label>
                        <input value={sel.away_team.clone()} oninput={on_away} aria-label="Away team" />
                    </div>
                </div>
                <div class="input-group">
                    <label>{"Market"}</label>
                    <select onchange={on_market} aria-label="Market">
                        { for Market::all().iter().map(|m| html!{
                            <option selected={*m == sel.market}>{ m.label() }</option>
                        })}
                    </select>
                </div>
                { if sel.market == Market::Custom {
                    html!{
                        <div class="input-group">
                            <label>{"Custom Market Text"}</label>
                            <input
                                placeholder="Enter your custom market text"
                                value={sel.custom_market.clone().unwrap_or_default()}
                                oninput={on_custom_market}
                                aria-label="Custom market text" />
                        </div>
                    }
                } else { html!{} }}
                <div class="row">
                    <div class="input-group">
                        <label>{"Selection"}</label>
                        <input value={sel.pick.clone()} oninput={on_pick} aria-label="Selection" />
                    </div>
                    <div class="input-group">
                        <label>{"Odds (Decimal)"}</label>
                        <input
                            type="number"
                            step="0.01"
                            min={MIN_ODDS.to_string()}
                            value={format!("{:.2}", sel.odds)}
                            onchange={on_odds}
                            aria-label="Decimal odds" />
                    </div>
                </div>
                <div class="input-group">
                    <label>{"Event Date & Time"}</label>
                    <input
                        type="datetime-local"
                        value={betslip::datetime_input_value(&sel.event_date)}
                        onchange={on_date}
                        aria-label="Event date and time" />
                </div>
            </div>
        }
    });

    html! {
        <div class="card">
            <h2>
                <span>{"Create Betslip"}</span>
                <button onclick={on_reset} aria-label="Reset betslip">{"Reset"}</button>
            </h2>

            <div class="row">
                <div class="input-group">
                    <label>{"Bookmaker"}</label>
                    <select onchange={on_bookmaker} aria-label="Bookmaker">
                        { for Bookmaker::all().iter().map(|b| html!{
                            <option selected={*b == slip.bookmaker}>{ b.label() }</option>
                        })}
                    </select>
                </div>
                { if slip.bookmaker == Bookmaker::Custom {
                    html!{
                        <div class="input-group">
                            <label>{"Bookmaker Name"}</label>
                            <input
                                placeholder="Enter bookmaker name"
                                value={slip.custom_bookmaker_name.clone().unwrap_or_default()}
                                oninput={on_custom_name}
                                aria-label="Bookmaker name" />
                        </div>
                    }
                } else { html!{} }}
            </div>

            <div class="tabs" role="tablist">
                { for Tab::all().iter().map(|(t, name)| {
                    let tab_set = tab.clone();
                    let t = *t;
                    html!{
                        <button
                            role="tab"
                            class={if *tab == t { "tab active" } else { "tab" }}
                            onclick={Callback::from(move |_: MouseEvent| tab_set.set(t))}>
                            { *name }
                        </button>
                    }
                })}
            </div>

            { match *tab {
                Tab::Matches => html!{
                    <div>
                        { for selections }
                        <button onclick={on_add} style="width: 100%;" aria-label="Add selection">{"Add Selection"}</button>
                    </div>
                },
                Tab::Stake => html!{
                    <div>
                        <div class="input-group">
                            <label>{"Stake Amount"}</label>
                            <div class="row">
                                <select onchange={on_currency} aria-label="Currency">
                                    { for Currency::all().iter().map(|c| html!{
                                        <option selected={*c == slip.currency}>{ format!("{} ({})", c.code(), c.symbol()) }</option>
                                    })}
                                </select>
                                <input
                                    type="number"
                                    min="0"
                                    step="0.1"
                                    value={format!("{:.2}", slip.stake)}
                                    onchange={on_stake}
                                    aria-label="Stake" />
                            </div>
                        </div>
                        <div class="input-group">
                            <label>{"Bet Type"}</label>
                            <select onchange={on_bet_type} aria-label="Bet type">
                                { for BetType::all().iter().map(|b| html!{
                                    <option selected={*b == slip.bet_type}>{ b.label() }</option>
                                })}
                            </select>
                        </div>
                    </div>
                },
                Tab::Details => html!{
                    <div>
                        <div class="input-group">
                            <label>{"Receipt Number"}</label>
                            <input value={slip.receipt_number.clone()} oninput={on_receipt} aria-label="Receipt number" />
                        </div>
                        <div class="input-group">
                            <label>{"Date Placed"}</label>
                            <input
                                type="datetime-local"
                                value={betslip::datetime_input_value(&slip.placed_at)}
                                onchange={on_placed_at}
                                aria-label="Date placed" />
                        </div>
                        <div class="input-group">
                            <label>{"Odds Format"}</label>
                            <select onchange={on_odds_format} aria-label="Odds format">
                                { for OddsFormat::all().iter().map(|(f, name)| html!{
                                    <option selected={*f == slip.odds_format}>{ *name }</option>
                                })}
                            </select>
                        </div>
                    </div>
                },
            }}

            <div class="row" style="justify-content: flex-end;">
                <button onclick={on_next}>{ tab.next().1 }</button>
            </div>
        </div>
    }
}
