use yew::prelude::*;

use super::{BrandStyle, Clock, Receipt};
use crate::betslip::Betslip;

pub struct DraftKings;

impl BrandStyle for DraftKings {
    fn label(&self) -> &'static str {
        "DraftKings"
    }

    fn theme_class(&self) -> &'static str {
        "brand-draftkings"
    }

    fn receipt(&self, slip: &Betslip) -> Receipt {
        Receipt::project(slip, Clock::European, "vs")
    }

    fn view(&self, r: &Receipt, target_id: &str) -> Html {
        html! {
            <div id={target_id.to_string()} class="betslip dk">
                <div class="dk-header">
                    <span class="brand">{&r.brand}</span>
                    <div class="receipt-no">
                        <span class="caption">{"Ticket #"}</span>
                        <span class="mono">{&r.receipt_number}</span>
                    </div>
                </div>

                <div class="dk-content">
                    <div class="dk-info">
                        <span>{format!("Created: {} {}", r.placed_date, r.placed_time)}</span>
                        <div class="dk-chip">{&r.bet_type}</div>
                    </div>

                    { for r.rows.iter().map(|row| html! {
                        <div key={row.key.clone()} class="dk-selection">
                            <div class="row-line">
                                <span class="matchup">{&row.matchup}</span>
                                <span class="muted small">{&row.kickoff}</span>
                            </div>
                            <div class="row-line">
                                <div>
                                    <span class="muted small">{&row.market}</span>
                                    <div class="pick">{&row.pick}</div>
                                </div>
                                <div class="dk-odds">{&row.odds}</div>
                            </div>
                        </div>
                    })}

                    <div class="dk-details">
                        <div class="row-line"><span>{"Wager"}</span><span>{&r.stake}</span></div>
                        { if let Some(total) = &r.total_odds {
                            html!{ <div class="row-line"><span>{"Total Odds"}</span><span>{total}</span></div> }
                        } else { html!{} }}
                        <div class="row-line returns">
                            <span>{"Potential Payout"}</span>
                            <strong class="pick">{&r.returns}</strong>
                        </div>
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
