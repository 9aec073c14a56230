use yew::prelude::*;

use super::{BrandStyle, Clock, Receipt};
use crate::betslip::Betslip;

pub struct Bet365;

impl BrandStyle for Bet365 {
    fn label(&self) -> &'static str {
        "bet365"
    }

    fn theme_class(&self) -> &'static str {
        "brand-bet365"
    }

    fn receipt(&self, slip: &Betslip) -> Receipt {
        Receipt::project(slip, Clock::European, "v")
    }

    fn view(&self, r: &Receipt, target_id: &str) -> Html {
        html! {
            <div id={target_id.to_string()} class="betslip bet365">
                <div class="betslip-header">
                    <span class="brand">{&r.brand}</span>
                    <div class="receipt-no">
                        <span class="caption">{"Receipt"}</span>
                        <span class="mono">{&r.receipt_number}</span>
                    </div>
                </div>

                <div class="betslip-content">
                    <div class="placed">
                        <span>{format!("Placed: {}", r.placed_date)}</span>
                        <span>{&r.placed_time}</span>
                    </div>
                    <div class="chip">{&r.bet_type}</div>
                    <div class="section-divider"></div>

                    { for r.rows.iter().map(|row| html! {
                        <div key={row.key.clone()} class="match-item">
                            <div class="row-line">
                                <span class="muted">{&row.kickoff}</span>
                                <strong>{&row.odds}</strong>
                            </div>
                            <div class="matchup">{&row.matchup}</div>
                            <div class="row-line small">
                                <span class="muted">{&row.market}</span>
                                <span class="pick">{&row.pick}</span>
                            </div>
                        </div>
                    })}

                    <div class="section-divider"></div>
                    <div class="summary">
                        <div class="row-line"><span>{"Stake"}</span><span>{&r.stake}</span></div>
                        { if let Some(total) = &r.total_odds {
                            html!{ <div class="row-line"><span>{"Total Odds"}</span><span>{total}</span></div> }
                        } else { html!{} }}
                        <div class="row-line returns">
                            <span>{"Potential Returns"}</span>
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
