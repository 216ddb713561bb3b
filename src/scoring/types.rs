use serde::{Deserialize, Serialize};

/// EPPO datatype code of a name record.
///
/// Only the codes relevant to scoring are distinguished; anything else
/// collapses into [`Datatype::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Datatype {
    /// Animal/fungal pest or disease (the preferred record type).
    Gaf,
    /// Special form (forma specialis).
    Sft,
    /// Plant.
    Pfl,
    /// Special plant taxon.
    Spt,
    /// Animal.
    Gai,
    /// Site.
    Sit,
    /// Any other datatype code.
    Other,
}

impl Datatype {
    /// Parses an EPPO datatype code (case-insensitive).
    pub fn from_code(code: &str) -> Self {
        match code.to_ascii_uppercase().as_str() {
            "GAF" => Datatype::Gaf,
            "SFT" => Datatype::Sft,
            "PFL" => Datatype::Pfl,
            "SPT" => Datatype::Spt,
            "GAI" => Datatype::Gai,
            "SIT" => Datatype::Sit,
            _ => Datatype::Other,
        }
    }

    /// Returns the canonical code string.
    pub fn as_code(&self) -> &'static str {
        match self {
            Datatype::Gaf => "GAF",
            Datatype::Sft => "SFT",
            Datatype::Pfl => "PFL",
            Datatype::Spt => "SPT",
            Datatype::Gai => "GAI",
            Datatype::Sit => "SIT",
            Datatype::Other => "OTHER",
        }
    }
}

impl std::fmt::Display for Datatype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_code())
    }
}

/// A raw name row as returned by a [`CandidateStore`](crate::retrieval::CandidateStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCandidate {
    /// Six-character EPPO code identifying the taxon.
    pub eppocode: String,
    /// Datatype of this name record.
    pub datatype: Datatype,
    /// Full name text of the record.
    pub fullname: String,
}

impl RawCandidate {
    /// Creates a raw candidate row.
    pub fn new(
        eppocode: impl Into<String>,
        datatype: Datatype,
        fullname: impl Into<String>,
    ) -> Self {
        Self {
            eppocode: eppocode.into(),
            datatype,
            fullname: fullname.into(),
        }
    }
}

/// A candidate annotated with its composite similarity score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    /// Six-character EPPO code.
    pub eppocode: String,
    /// Datatype of the scored name variant.
    pub datatype: Datatype,
    /// The name variant that produced this score.
    pub fullname: String,
    /// Composite score in `[0, score_cap]`.
    pub score: f32,
    /// Raw count of tokens shared between the name and the query.
    pub token_overlap: usize,
    /// Whether the name's leading token matched a query host term.
    pub host_match: bool,
}

/// Tunable coefficients of the composite score.
///
/// Kept in one place so weights can be retuned without touching the scoring
/// logic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Bonus when the candidate name leads with a query host term.
    pub host_bonus: f32,
    /// Multiplier on the location-term overlap ratio.
    pub location_multiplier: f32,
    /// Bonus for the preferred datatype ([`Datatype::Gaf`]).
    pub datatype_primary: f32,
    /// Bonus for the secondary datatype ([`Datatype::Sft`]).
    pub datatype_secondary: f32,
    /// Upper cap on the composite score.
    pub score_cap: f32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            host_bonus: 0.2,
            location_multiplier: 0.3,
            datatype_primary: 0.15,
            datatype_secondary: 0.05,
            score_cap: 1.5,
        }
    }
}

impl ScoreWeights {
    /// Returns the datatype bonus for `datatype`.
    pub fn datatype_bonus(&self, datatype: Datatype) -> f32 {
        match datatype {
            Datatype::Gaf => self.datatype_primary,
            Datatype::Sft => self.datatype_secondary,
            _ => 0.0,
        }
    }
}
