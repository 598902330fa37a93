//! Textual form of user intents.
//!
//! Rendering shells and scripted replays name intents with short words:
//! `known`, `unknown`, `select:<id>`, `confirm`, `back`, `answer:<id>`,
//! `accept`, `explore`.

use crate::{Error, Intent};
use std::fmt;
use std::str::FromStr;

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::ChooseKnown => f.write_str("known"),
            Intent::ChooseUnknown => f.write_str("unknown"),
            Intent::SelectMedication(id) => write!(f, "select:{}", id),
            Intent::ConfirmSelection => f.write_str("confirm"),
            Intent::Back => f.write_str("back"),
            Intent::Answer(id) => write!(f, "answer:{}", id),
            Intent::AcceptProtocol => f.write_str("accept"),
            Intent::ExploreAll => f.write_str("explore"),
        }
    }
}

impl FromStr for Intent {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (verb, arg) = match s.split_once(':') {
            Some((verb, arg)) => (verb.trim(), Some(arg.trim())),
            None => (s, None),
        };

        let intent = match (verb.to_lowercase().as_str(), arg) {
            ("known", None) => Intent::ChooseKnown,
            ("unknown", None) => Intent::ChooseUnknown,
            ("confirm", None) => Intent::ConfirmSelection,
            ("back", None) => Intent::Back,
            ("accept", None) => Intent::AcceptProtocol,
            ("explore", None) => Intent::ExploreAll,
            ("select", Some(id)) if !id.is_empty() => Intent::SelectMedication(id.to_string()),
            ("answer", Some(id)) if !id.is_empty() => Intent::Answer(id.to_string()),
            _ => return Err(Error::Parse(format!("unrecognized intent '{}'", s))),
        };

        Ok(intent)
    }
}
