use chrono::{Local, NaiveDateTime, Timelike};
use uuid::Uuid;

use crate::brand::Bookmaker;
use crate::error::{BetslipError, ParseError};
use crate::format::{self, Currency, OddsFormat};

pub const DEFAULT_STAKE: f64 = 10.0;
pub const DEFAULT_ODDS: f64 = 2.5;
pub const MIN_ODDS: f64 = 1.01;
pub const MIN_STAKE: f64 = 0.0;

/// Substituted when the odds field cannot be parsed.
pub const FALLBACK_ODDS: f64 = MIN_ODDS;
/// Substituted when the stake field cannot be parsed.
pub const FALLBACK_STAKE: f64 = 0.0;

/// `datetime-local` input format.
pub const DATETIME_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Market {
    MatchResult,
    BothTeamsToScore,
    OverUnderGoals,
    CorrectScore,
    FirstGoalscorer,
    Custom,
}

impl Market {
    pub fn all() -> &'static [Market] {
        &[
            Market::MatchResult,
            Market::BothTeamsToScore,
            Market::OverUnderGoals,
            Market::CorrectScore,
            Market::FirstGoalscorer,
            Market::Custom,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            Market::MatchResult => "Match Result",
            Market::BothTeamsToScore => "Both Teams to Score",
            Market::OverUnderGoals => "Over/Under 2.5 Goals",
            Market::CorrectScore => "Correct Score",
            Market::FirstGoalscorer => "First Goalscorer",
            Market::Custom => "Custom",
        }
    }

    pub fn from_label(label: &str) -> Option<Market> {
        Self::all().iter().copied().find(|m| m.label() == label)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BetType {
    Single,
    Double,
    Treble,
    Accumulator,
}

impl BetType {
    pub fn all() -> &'static [BetType] {
        &[BetType::Single, BetType::Double, BetType::Treble, BetType::Accumulator]
    }

    pub fn tag(self) -> &'static str {
        match self {
            BetType::Single => "single",
            BetType::Double => "double",
            BetType::Treble => "treble",
            BetType::Accumulator => "accumulator",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BetType::Single => "Single",
            BetType::Double => "Double",
            BetType::Treble => "Treble",
            BetType::Accumulator => "Accumulator",
        }
    }

    pub fn from_tag(tag: &str) -> Option<BetType> {
        Self::all().iter().copied().find(|b| b.tag() == tag)
    }

    /// The bet type a slip with `count` selections would naturally be.
    pub fn for_count(count: usize) -> BetType {
        match count {
            0 | 1 => BetType::Single,
            2 => BetType::Double,
            3 => BetType::Treble,
            _ => BetType::Accumulator,
        }
    }
}

/// One wagered outcome.
#[derive(Clone, Debug, PartialEq)]
pub struct Selection {
    pub id: String,
    pub home_team: String,
    pub away_team: String,
    pub market: Market,
    /// Only read when `market` is [`Market::Custom`].
    pub custom_market: Option<String>,
    pub pick: String,
    pub odds: f64,
    pub event_date: NaiveDateTime,
}

/// A single field change coming from the form.
#[derive(Clone, Debug, PartialEq)]
pub enum SelectionEdit {
    HomeTeam(String),
    AwayTeam(String),
    Market(Market),
    CustomMarket(String),
    Pick(String),
    Odds(f64),
    EventDate(NaiveDateTime),
}

impl Selection {
    pub fn blank() -> Self {
        Selection {
            id: Uuid::new_v4().to_string(),
            home_team: "Manchester United".into(),
            away_team: "Liverpool".into(),
            market: Market::MatchResult,
            custom_market: None,
            pick: "Manchester United".into(),
            odds: DEFAULT_ODDS,
            event_date: now(),
        }
    }

    pub fn apply(self, edit: SelectionEdit) -> Self {
        match edit {
            SelectionEdit::HomeTeam(home_team) => Selection { home_team, ..self },
            SelectionEdit::AwayTeam(away_team) => Selection { away_team, ..self },
            SelectionEdit::Market(market) => Selection { market, ..self },
            SelectionEdit::CustomMarket(text) => Selection { custom_market: Some(text), ..self },
            SelectionEdit::Pick(pick) => Selection { pick, ..self },
            SelectionEdit::Odds(odds) => Selection { odds, ..self },
            SelectionEdit::EventDate(event_date) => Selection { event_date, ..self },
        }
    }

    pub fn market_display_text(&self) -> &str {
        match (self.market, self.custom_market.as_deref()) {
            (Market::Custom, Some(text)) if !text.is_empty() => text,
            (market, _) => market.label(),
        }
    }
}

pub fn get_market_display_text(selection: &Selection) -> &str {
    selection.market_display_text()
}

/// The whole receipt. Every change produces a new value.
#[derive(Clone, Debug, PartialEq)]
pub struct Betslip {
    pub selections: Vec<Selection>,
    pub stake: f64,
    pub bet_type: BetType,
    /// Set once the user picks a bet type by hand; stops the automatic nudge.
    pub bet_type_pinned: bool,
    pub placed_at: NaiveDateTime,
    pub receipt_number: String,
    pub bookmaker: Bookmaker,
    pub custom_bookmaker_name: Option<String>,
    pub currency: Currency,
    pub odds_format: OddsFormat,
}

impl Betslip {
    pub fn blank() -> Self {
        Betslip {
            selections: vec![Selection::blank()],
            stake: DEFAULT_STAKE,
            bet_type: BetType::Single,
            bet_type_pinned: false,
            placed_at: now(),
            receipt_number: format::generate_receipt_number(),
            bookmaker: Bookmaker::Bet365,
            custom_bookmaker_name: None,
            currency: Currency::DEFAULT,
            odds_format: OddsFormat::Decimal,
        }
    }

    pub fn add_selection(&self) -> Betslip {
        let mut selections = self.selections.clone();
        selections.push(Selection::blank());
        Betslip { selections, ..self.clone() }
    }

    /// Plain filter: removing the last selection yields an empty slip.
    /// The form goes through [`Betslip::try_remove_selection`] instead.
    pub fn remove_selection(&self, id: &str) -> Betslip {
        let selections = self
            .selections
            .iter()
            .filter(|s| s.id != id)
            .cloned()
            .collect();
        Betslip { selections, ..self.clone() }
    }

    pub fn try_remove_selection(&self, id: &str) -> Result<Betslip, BetslipError> {
        if !self.selections.iter().any(|s| s.id == id) {
            return Err(BetslipError::UnknownSelection(id.to_string()));
        }
        if self.selections.len() <= 1 {
            return Err(BetslipError::LastSelection);
        }
        Ok(self.remove_selection(id))
    }

    pub fn edit_selection(&self, id: &str, edit: SelectionEdit) -> Betslip {
        let selections = self
            .selections
            .iter()
            .map(|s| if s.id == id { s.clone().apply(edit.clone()) } else { s.clone() })
            .collect();
        Betslip { selections, ..self.clone() }
    }

    pub fn with_stake(&self, stake: f64) -> Betslip {
        Betslip { stake, ..self.clone() }
    }

    /// Manual choice; pins the bet type against the automatic nudge.
    pub fn with_bet_type(&self, bet_type: BetType) -> Betslip {
        Betslip { bet_type, bet_type_pinned: true, ..self.clone() }
    }

    /// Switching brand resets the currency to `default_currency`.
    pub fn with_bookmaker(&self, bookmaker: Bookmaker, default_currency: Currency) -> Betslip {
        Betslip { bookmaker, currency: default_currency, ..self.clone() }
    }

    pub fn with_custom_bookmaker_name(&self, name: String) -> Betslip {
        let custom_bookmaker_name = if name.is_empty() { None } else { Some(name) };
        Betslip { custom_bookmaker_name, ..self.clone() }
    }

    pub fn with_currency(&self, currency: Currency) -> Betslip {
        Betslip { currency, ..self.clone() }
    }

    pub fn with_odds_format(&self, odds_format: OddsFormat) -> Betslip {
        Betslip { odds_format, ..self.clone() }
    }

    pub fn with_receipt_number(&self, receipt_number: String) -> Betslip {
        Betslip { receipt_number, ..self.clone() }
    }

    pub fn with_placed_at(&self, placed_at: NaiveDateTime) -> Betslip {
        Betslip { placed_at, ..self.clone() }
    }

    /// Reacts to a change in selection count: a slip still on an unpinned
    /// `single` moves up to double/treble/accumulator. Never downgrades.
    pub fn settle_bet_type(self, previous_len: usize) -> Betslip {
        let len = self.selections.len();
        if len == previous_len || len <= 1 || self.bet_type_pinned || self.bet_type != BetType::Single {
            return self;
        }
        Betslip { bet_type: BetType::for_count(len), ..self }
    }

    pub fn bookmaker_name(&self) -> String {
        match (self.bookmaker, self.custom_bookmaker_name.as_deref()) {
            (Bookmaker::Custom, Some(name)) if !name.trim().is_empty() => name.trim().to_string(),
            (bookmaker, _) => bookmaker.label().to_string(),
        }
    }

    pub fn export_filename(&self) -> String {
        format!("{}-{}.png", format::slug(&self.bookmaker_name()), self.receipt_number)
    }

    pub fn share_title(&self) -> String {
        format!("My {} Betslip", self.bookmaker_name())
    }
}

pub fn create_blank_betslip() -> Betslip {
    Betslip::blank()
}

pub fn create_blank_selection() -> Selection {
    Selection::blank()
}

/// Local wall-clock time, truncated to the minute.
pub fn now() -> NaiveDateTime {
    let at = Local::now().naive_local();
    at.with_second(0).and_then(|t| t.with_nanosecond(0)).unwrap_or(at)
}

pub fn parse_number(input: &str, minimum: f64) -> Result<f64, ParseError> {
    let cleaned = input.trim().replace(',', "");
    if cleaned.is_empty() {
        return Err(ParseError::Empty);
    }
    let value = cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParseError::NotANumber(input.to_string()))?;
    if value < minimum {
        return Err(ParseError::BelowMinimum { value, minimum });
    }
    Ok(value)
}

pub fn parse_odds(input: &str) -> Result<f64, ParseError> {
    parse_number(input, MIN_ODDS)
}

pub fn parse_stake(input: &str) -> Result<f64, ParseError> {
    parse_number(input, MIN_STAKE)
}

pub fn parse_datetime_input(input: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(input.trim(), DATETIME_INPUT_FORMAT).ok()
}

pub fn datetime_input_value(at: &NaiveDateTime) -> String {
    at.format(DATETIME_INPUT_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn last_id(slip: &Betslip) -> String {
        slip.selections.last().unwrap().id.clone()
    }

    #[test]
    fn blank_slip_has_one_selection_and_defaults() {
        let slip = create_blank_betslip();
        assert_eq!(slip.selections.len(), 1);
        assert_eq!(slip.stake, 10.0);
        assert_eq!(slip.bet_type, BetType::Single);
        assert_eq!(slip.currency, Currency::Gbp);
        assert_eq!(slip.odds_format, OddsFormat::Decimal);
        assert_eq!(slip.receipt_number.len(), 8);
        assert_eq!(slip.selections[0].market, Market::MatchResult);
        assert_eq!(slip.selections[0].odds, 2.5);
    }

    #[test]
    fn blank_selections_get_distinct_ids() {
        let a = create_blank_selection();
        let b = create_blank_selection();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn add_then_remove_restores_the_slip() {
        let original = create_blank_betslip();
        let grown = original.add_selection();
        assert_eq!(original.selections.len(), 1);
        assert_eq!(grown.selections.len(), 2);
        let back = grown.remove_selection(&last_id(&grown));
        assert_eq!(back, original);
    }

    #[test]
    fn pure_remove_can_empty_the_slip() {
        let slip = create_blank_betslip();
        let id = slip.selections[0].id.clone();
        assert!(slip.remove_selection(&id).selections.is_empty());
    }

    #[test]
    fn guarded_remove_refuses_the_last_selection() {
        let slip = create_blank_betslip();
        let id = slip.selections[0].id.clone();
        assert_eq!(slip.try_remove_selection(&id), Err(BetslipError::LastSelection));
        assert_eq!(
            slip.try_remove_selection("nope"),
            Err(BetslipError::UnknownSelection("nope".into()))
        );
        let two = slip.add_selection();
        assert_eq!(two.try_remove_selection(&id).unwrap().selections.len(), 1);
    }

    #[test]
    fn market_text_prefers_custom_text() {
        let base = Selection::blank();
        assert_eq!(get_market_display_text(&base), "Match Result");

        let custom = base.clone().apply(SelectionEdit::Market(Market::Custom));
        assert_eq!(get_market_display_text(&custom), "Custom");

        let empty = custom.clone().apply(SelectionEdit::CustomMarket(String::new()));
        assert_eq!(get_market_display_text(&empty), "Custom");

        let named = custom.apply(SelectionEdit::CustomMarket("Anytime Hat-trick".into()));
        assert_eq!(get_market_display_text(&named), "Anytime Hat-trick");

        let back = named.apply(SelectionEdit::Market(Market::CorrectScore));
        assert_eq!(get_market_display_text(&back), "Correct Score");
    }

    #[test]
    fn two_adds_nudge_single_to_treble_once() {
        let start = create_blank_betslip();
        let three = start.add_selection().add_selection();
        let settled = three.settle_bet_type(start.selections.len());
        assert_eq!(settled.bet_type, BetType::Treble);

        let id = settled.selections[1].id.clone();
        let edited = settled.edit_selection(&id, SelectionEdit::Odds(4.0));
        let len = edited.selections.len();
        let edited = edited.settle_bet_type(len);
        assert_eq!(edited.bet_type, BetType::Treble);
        assert_eq!(edited.selections[1].odds, 4.0);
    }

    #[test]
    fn nudge_steps_up_one_add_at_a_time() {
        let one = create_blank_betslip();
        let two = one.add_selection().settle_bet_type(1);
        assert_eq!(two.bet_type, BetType::Double);
        // No longer single, so a third selection leaves it alone.
        let three = two.add_selection().settle_bet_type(2);
        assert_eq!(three.bet_type, BetType::Double);
    }

    #[test]
    fn nudge_never_downgrades_or_overrides_a_manual_choice() {
        let four = create_blank_betslip()
            .add_selection()
            .add_selection()
            .add_selection()
            .settle_bet_type(1);
        assert_eq!(four.bet_type, BetType::Accumulator);

        let id = last_id(&four);
        let three = four.remove_selection(&id).settle_bet_type(4);
        assert_eq!(three.bet_type, BetType::Accumulator);

        let pinned = create_blank_betslip().with_bet_type(BetType::Single);
        let grown = pinned.add_selection().settle_bet_type(1);
        assert_eq!(grown.bet_type, BetType::Single);
    }

    #[test]
    fn setters_do_not_touch_the_input() {
        let slip = create_blank_betslip();
        let changed = slip
            .with_stake(25.0)
            .with_currency(Currency::Eur)
            .with_odds_format(OddsFormat::American)
            .with_receipt_number("ABCD1234".into());
        assert_eq!(slip.stake, 10.0);
        assert_eq!(changed.stake, 25.0);
        assert_eq!(changed.currency, Currency::Eur);
        assert_eq!(changed.odds_format, OddsFormat::American);
        assert_eq!(changed.receipt_number, "ABCD1234");
    }

    #[test]
    fn switching_bookmaker_resets_currency() {
        let slip = create_blank_betslip().with_currency(Currency::Usd);
        let dk = slip.with_bookmaker(Bookmaker::DraftKings, Currency::Gbp);
        assert_eq!(dk.bookmaker, Bookmaker::DraftKings);
        assert_eq!(dk.currency, Currency::Gbp);
    }

    #[test]
    fn names_feed_filename_and_share_title() {
        let slip = create_blank_betslip().with_receipt_number("K7Q2ZP0A".into());
        assert_eq!(slip.export_filename(), "bet365-K7Q2ZP0A.png");
        assert_eq!(slip.share_title(), "My bet365 Betslip");

        let custom = slip
            .with_bookmaker(Bookmaker::Custom, Currency::Gbp)
            .with_custom_bookmaker_name("Lucky Seven".into());
        assert_eq!(custom.export_filename(), "lucky-seven-K7Q2ZP0A.png");
        assert_eq!(custom.share_title(), "My Lucky Seven Betslip");

        let unnamed = custom.with_custom_bookmaker_name(String::new());
        assert_eq!(unnamed.bookmaker_name(), "Custom");
    }

    #[test]
    fn numeric_parsing_reports_why_it_failed() {
        assert_eq!(parse_odds("2.75"), Ok(2.75));
        assert_eq!(parse_odds(" 3 "), Ok(3.0));
        assert_eq!(parse_odds(""), Err(ParseError::Empty));
        assert_eq!(parse_odds("abc"), Err(ParseError::NotANumber("abc".into())));
        assert_eq!(
            parse_odds("1.0"),
            Err(ParseError::BelowMinimum { value: 1.0, minimum: MIN_ODDS })
        );
        assert_eq!(parse_odds("nan"), Err(ParseError::NotANumber("nan".into())));
        assert_eq!(parse_stake("1,000.50"), Ok(1000.5));
        assert_eq!(parse_stake("oops").unwrap_or(FALLBACK_STAKE), 0.0);
        assert_eq!(parse_odds("x").unwrap_or(FALLBACK_ODDS), 1.01);
    }

    #[test]
    fn datetime_inputs_round_trip() {
        let at = parse_datetime_input("2026-03-07T19:45").unwrap();
        assert_eq!(datetime_input_value(&at), "2026-03-07T19:45");
        assert!(parse_datetime_input("tomorrow").is_none());
    }
}
