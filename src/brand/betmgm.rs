use yew::prelude::*;

use super::{BrandStyle, Clock, Receipt};
use crate::betslip::Betslip;

pub struct BetMgm;

impl BrandStyle for BetMgm {
    fn label(&self) -> &'static str {
        "BetMGM"
    }

    fn theme_class(&self) -> &'static str {
        "brand-betmgm"
    }

    fn receipt(&self, slip: &Betslip) -> Receipt {
        Receipt::project(slip, Clock::American, "@")
    }

    fn view(&self, r: &Receipt, target_id: &str) -> Html {
        html! {
            <div id={target_id.to_string()} class="betslip mgm">
                <div class="mgm-header">
                    <span class="brand">{&r.brand}</span>
                    <span class="mgm-type">{&r.bet_type}</span>
                </div>

                <div class="mgm-content">
                    { for r.rows.iter().map(|row| html! {
                        <div key={row.key.clone()} class="mgm-leg">
                            <div class="row-line">
                                <span class="pick">{&row.pick}</span>
                                <strong class="mgm-odds">{&row.odds}</strong>
                            </div>
                            <div class="muted small">{&row.market}</div>
                            <div class="matchup small">{&row.matchup}</div>
                            <div class="muted small">{&row.kickoff}</div>
                        </div>
                    })}

                    <div class="mgm-summary">
                        <div class="row-line"><span>{"Wager"}</span><span>{&r.stake}</span></div>
                        { if let Some(total) = &r.total_odds {
                            html!{ <div class="row-line"><span>{"Odds"}</span><span>{total}</span></div> }
                        } else { html!{} }}
                        <div class="row-line returns">
                            <span>{"Payout"}</span>
                            <strong>{&r.returns}</strong>
                        </div>
                    </div>

                    <div class="mgm-meta muted small">
                        <span>{format!("Bet ID {}", r.receipt_number)}</span>
                        <span>{format!("{} {}", r.placed_date, r.placed_time)}</span>
                    </div>
                </div>

                <div class="betslip-footer">
                    <p>{"This is a simulated betslip for entertainment purposes only."}</p>
                    <p>{&r.disclaimer}</p>
                </div>
            </div>
        }
    }
}
