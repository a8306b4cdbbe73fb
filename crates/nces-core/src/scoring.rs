//! Picking one candidate among same-named schools using location hints.

use crate::listing::CandidateRow;
use crate::models::LocationHints;

/// How specific a match is. Lower is more specific and preferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchPriority {
    /// City, state and zip all match; ends the search immediately.
    Exact = 1,
    CityState = 2,
    Zip = 3,
    City = 4,
    State = 5,
}

/// The single comparison rule selected by which hints were supplied.
///
/// Rules are tried in precedence order: all three, city and state, zip,
/// city, state. A zip with a city but no state therefore selects the zip
/// rule. State and zip without a city, or no hints at all, select
/// [`MatchRule::Unmatchable`], under which no row can match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule<'h> {
    Exact {
        city: &'h str,
        state: &'h str,
        zip: &'h str,
    },
    CityState {
        city: &'h str,
        state: &'h str,
    },
    Zip(&'h str),
    City(&'h str),
    State(&'h str),
    Unmatchable,
}

impl<'h> MatchRule<'h> {
    pub fn from_hints(hints: &'h LocationHints) -> Self {
        let city = hints.city.as_deref();
        let state = hints.state.as_deref();
        let zip = hints.zip.as_deref();

        match (city, state, zip) {
            (Some(city), Some(state), Some(zip)) => MatchRule::Exact { city, state, zip },
            (Some(city), Some(state), None) => MatchRule::CityState { city, state },
            (_, None, Some(zip)) => MatchRule::Zip(zip),
            (Some(city), None, None) => MatchRule::City(city),
            (None, Some(state), None) => MatchRule::State(state),
            _ => MatchRule::Unmatchable,
        }
    }

    /// Priority this rule assigns to `row`, or `None` if the row does not match.
    pub fn evaluate(&self, row: &CandidateRow) -> Option<MatchPriority> {
        let addr = &row.address;
        let hit = match self {
            MatchRule::Exact { city, state, zip } => {
                addr.city_matches(city) && addr.state_matches(state) && addr.zip_matches(zip)
            }
            MatchRule::CityState { city, state } => {
                addr.city_matches(city) && addr.state_matches(state)
            }
            MatchRule::Zip(zip) => addr.zip_matches(zip),
            MatchRule::City(city) => addr.city_matches(city),
            MatchRule::State(state) => addr.state_matches(state),
            MatchRule::Unmatchable => false,
        };
        if hit { self.priority() } else { None }
    }

    fn priority(&self) -> Option<MatchPriority> {
        match self {
            MatchRule::Exact { .. } => Some(MatchPriority::Exact),
            MatchRule::CityState { .. } => Some(MatchPriority::CityState),
            MatchRule::Zip(_) => Some(MatchPriority::Zip),
            MatchRule::City(_) => Some(MatchPriority::City),
            MatchRule::State(_) => Some(MatchPriority::State),
            MatchRule::Unmatchable => None,
        }
    }
}

/// Result of scanning one listing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSelection<'r> {
    /// All three hints matched; no further rows or pages are looked at.
    Exact(&'r CandidateRow),
    /// Best partial match on the page, if any.
    Best(Option<(MatchPriority, &'r CandidateRow)>),
}

impl<'r> PageSelection<'r> {
    pub fn winner(self) -> Option<&'r CandidateRow> {
        match self {
            PageSelection::Exact(row) => Some(row),
            PageSelection::Best(best) => best.map(|(_, row)| row),
        }
    }
}

/// Scan rows in order, keeping the best-so-far match.
///
/// A later row only replaces the current best when its priority is strictly
/// better.
pub fn select_candidate<'r>(rows: &'r [CandidateRow], hints: &LocationHints) -> PageSelection<'r> {
    let rule = MatchRule::from_hints(hints);
    let mut best: Option<(MatchPriority, &CandidateRow)> = None;

    for row in rows {
        let Some(priority) = rule.evaluate(row) else {
            continue;
        };
        if priority == MatchPriority::Exact {
            return PageSelection::Exact(row);
        }
        if best.is_none_or(|(current, _)| priority < current) {
            best = Some((priority, row));
        }
    }

    PageSelection::Best(best)
}
