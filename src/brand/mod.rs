//! Bookmaker-styled receipts.
//!
//! A [`Betslip`] is first projected into a [`Receipt`] of display strings, then a
//! [`BrandStyle`] turns that into markup. Adding a brand means adding one
//! `BrandStyle` implementation and one [`Bookmaker`] variant.

mod bet365;
mod betmgm;
mod custom;
mod draftkings;

use chrono::NaiveDateTime;
use serde::Deserialize;
use yew::Html;

use crate::betslip::Betslip;
use crate::calc::{calculate_returns, calculate_total_odds};
use crate::format::{self, format_odds};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bookmaker {
    Bet365,
    DraftKings,
    BetMgm,
    Custom,
}

impl Bookmaker {
    pub fn all() -> &'static [Bookmaker] {
        &[Bookmaker::Bet365, Bookmaker::DraftKings, Bookmaker::BetMgm, Bookmaker::Custom]
    }

    pub fn label(self) -> &'static str {
        self.style().label()
    }

    pub fn style(self) -> &'static dyn BrandStyle {
        match self {
            Bookmaker::Bet365 => &bet365::Bet365,
            Bookmaker::DraftKings => &draftkings::DraftKings,
            Bookmaker::BetMgm => &betmgm::BetMgm,
            Bookmaker::Custom => &custom::Custom,
        }
    }
}

/// How a brand writes dates and times on its slips.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Clock {
    /// `07/03/2026 19:45`
    European,
    /// `3/7/26 7:45 PM`
    American,
}

impl Clock {
    pub fn date(self, at: &NaiveDateTime) -> String {
        match self {
            Clock::European => format::format_date(at),
            Clock::American => format::format_date_us(at),
        }
    }

    pub fn time(self, at: &NaiveDateTime) -> String {
        match self {
            Clock::European => format::format_time(at),
            Clock::American => format::format_time_us(at),
        }
    }

    pub fn stamp(self, at: &NaiveDateTime) -> String {
        format!("{} {}", self.date(at), self.time(at))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReceiptRow {
    pub key: String,
    pub kickoff: String,
    pub odds: String,
    pub matchup: String,
    pub market: String,
    pub pick: String,
}

/// Everything a brand needs to draw, already formatted.
#[derive(Clone, Debug, PartialEq)]
pub struct Receipt {
    pub brand: String,
    pub receipt_number: String,
    pub placed_date: String,
    pub placed_time: String,
    pub bet_type: String,
    pub rows: Vec<ReceiptRow>,
    pub stake: String,
    /// Only present for multiples.
    pub total_odds: Option<String>,
    pub returns: String,
    pub disclaimer: String,
}

impl Receipt {
    pub fn project(slip: &Betslip, clock: Clock, versus: &str) -> Receipt {
        let total_odds = calculate_total_odds(&slip.selections);
        let returns = calculate_returns(slip.stake, total_odds);
        let brand = slip.bookmaker_name();
        let rows = slip
            .selections
            .iter()
            .map(|s| ReceiptRow {
                key: s.id.clone(),
                kickoff: clock.stamp(&s.event_date),
                odds: format_odds(s.odds, slip.odds_format),
                matchup: format!("{} {} {}", s.home_team, versus, s.away_team),
                market: s.market_display_text().to_string(),
                pick: s.pick.clone(),
            })
            .collect();

        Receipt {
            disclaimer: format!("Not affiliated with {}.", brand),
            brand,
            receipt_number: slip.receipt_number.clone(),
            placed_date: clock.date(&slip.placed_at),
            placed_time: clock.time(&slip.placed_at),
            bet_type: slip.bet_type.label().to_string(),
            rows,
            stake: slip.currency.format(slip.stake),
            total_odds: (slip.selections.len() > 1).then(|| format_odds(total_odds, slip.odds_format)),
            returns: slip.currency.format(returns),
        }
    }
}

/// One visual presentation of a betslip. Implementations are read-only.
pub trait BrandStyle {
    fn label(&self) -> &'static str;

    /// Page chrome class for the app header while this brand is selected.
    fn theme_class(&self) -> &'static str;

    fn receipt(&self, slip: &Betslip) -> Receipt;

    /// Root element must carry `id={target_id}` so the exporter can find it.
    fn view(&self, receipt: &Receipt, target_id: &str) -> Html;

    fn render(&self, slip: &Betslip, target_id: &str) -> Html {
        self.view(&self.receipt(slip), target_id)
    }
}
