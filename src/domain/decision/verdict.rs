//! Verdict scoring contract.
//!
//! The model is told to score five dimensions and pick an outcome using a
//! fixed rubric. [`VerdictReport`] reads those scores back out of the reply
//! and recomputes the outcome locally with [`apply_rubric`], so a model that
//! ignores its own rubric cannot change the verdict.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

use super::ConversationError;

/// Scores below this count as low.
pub const LOW_SCORE_THRESHOLD: u8 = 4;

/// Risk above this counts as high.
pub const HIGH_RISK_THRESHOLD: u8 = 7;

/// Backup strength at or above this counts as strong.
pub const STRONG_BACKUP_THRESHOLD: u8 = 6;

/// Every dimension must reach this for a good verdict.
pub const GOOD_THRESHOLD: u8 = 6;

/// Highest possible score.
pub const MAX_SCORE: u8 = 10;

static SCORE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?im)^[\s>*#•-]*(financial feasibility|risk level|practicality|backup(?:\s*/\s*fallback)? strength|timeline realism)\s*\**\s*:\s*\**\s*(\d{1,2})\s*/\s*10\b",
    )
    .expect("score line pattern is valid")
});

static VERDICT_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[\s>*#•-]*decision verdict\s*\**\s*:").expect("verdict header pattern is valid")
});

/// One of the five scored dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    FinancialFeasibility,
    RiskLevel,
    Practicality,
    BackupStrength,
    TimelineRealism,
}

impl Dimension {
    /// All dimensions in report order.
    pub const ALL: [Dimension; 5] = [
        Dimension::FinancialFeasibility,
        Dimension::RiskLevel,
        Dimension::Practicality,
        Dimension::BackupStrength,
        Dimension::TimelineRealism,
    ];

    /// Label used in the report's Scores section.
    pub fn label(&self) -> &'static str {
        match self {
            Dimension::FinancialFeasibility => "Financial feasibility",
            Dimension::RiskLevel => "Risk level",
            Dimension::Practicality => "Practicality",
            Dimension::BackupStrength => "Backup strength",
            Dimension::TimelineRealism => "Timeline realism",
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        let label = label.to_ascii_lowercase();
        if label.starts_with("financial") {
            Some(Dimension::FinancialFeasibility)
        } else if label.starts_with("risk") {
            Some(Dimension::RiskLevel)
        } else if label.starts_with("practicality") {
            Some(Dimension::Practicality)
        } else if label.starts_with("backup") {
            Some(Dimension::BackupStrength)
        } else if label.starts_with("timeline") {
            Some(Dimension::TimelineRealism)
        } else {
            None
        }
    }

    fn index(&self) -> usize {
        match self {
            Dimension::FinancialFeasibility => 0,
            Dimension::RiskLevel => 1,
            Dimension::Practicality => 2,
            Dimension::BackupStrength => 3,
            Dimension::TimelineRealism => 4,
        }
    }
}

/// Five 0–10 scores, one per [`Dimension`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreCard {
    scores: [u8; 5],
}

impl ScoreCard {
    /// Builds a card from scores in [`Dimension::ALL`] order.
    pub fn new(scores: [u8; 5]) -> Result<Self, ValidationError> {
        for (dimension, score) in Dimension::ALL.iter().zip(scores) {
            if score > MAX_SCORE {
                return Err(ValidationError::out_of_range(
                    dimension.label(),
                    0,
                    MAX_SCORE as i32,
                    score as i32,
                ));
            }
        }
        Ok(Self { scores })
    }

    /// Reads `<Dimension>: X/10` lines out of model text.
    ///
    /// The first occurrence of each dimension wins. Fails unless all five
    /// are present and within range.
    pub fn parse(text: &str) -> Result<Self, ConversationError> {
        let mut found: [Option<u8>; 5] = [None; 5];
        for caps in SCORE_LINE.captures_iter(text) {
            let Some(dimension) = Dimension::from_label(&caps[1]) else {
                continue;
            };
            let slot = &mut found[dimension.index()];
            if slot.is_none() {
                *slot = caps[2].parse::<u8>().ok().filter(|s| *s <= MAX_SCORE);
            }
        }

        let present = found.iter().flatten().count();
        match found {
            [Some(a), Some(b), Some(c), Some(d), Some(e)] => Ok(Self {
                scores: [a, b, c, d, e],
            }),
            _ => Err(ConversationError::MalformedModelOutput {
                expected: Dimension::ALL.len(),
                found: present,
            }),
        }
    }

    pub fn get(&self, dimension: Dimension) -> u8 {
        self.scores[dimension.index()]
    }

    /// Outcome the rubric assigns to these scores.
    pub fn outcome(&self) -> VerdictOutcome {
        apply_rubric(self)
    }
}

/// Categorical verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerdictOutcome {
    Good,
    NotGood,
    ConditionallyGood,
}

impl VerdictOutcome {
    /// Label as written in the report.
    pub fn label(&self) -> &'static str {
        match self {
            VerdictOutcome::Good => "Good",
            VerdictOutcome::NotGood => "Not Good",
            VerdictOutcome::ConditionallyGood => "Conditionally Good",
        }
    }

    /// Recognizes an outcome in free text, most specific wording first.
    pub fn detect(text: &str) -> Option<Self> {
        let normalized = text.to_ascii_lowercase().replace(['_', '-'], " ");
        if normalized.contains("conditionally good") {
            Some(VerdictOutcome::ConditionallyGood)
        } else if normalized.contains("not good") {
            Some(VerdictOutcome::NotGood)
        } else if normalized.contains("good") {
            Some(VerdictOutcome::Good)
        } else {
            None
        }
    }
}

impl fmt::Display for VerdictOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Applies the scoring rubric, first matching rule wins:
///
/// 1. financial feasibility below 4 is not good;
/// 2. risk above 7 without a strong backup is not good;
/// 3. two or more dimensions below 4 is not good;
/// 4. every dimension at 6 or more is good;
/// 5. anything else is conditionally good.
pub fn apply_rubric(card: &ScoreCard) -> VerdictOutcome {
    let financial = card.get(Dimension::FinancialFeasibility);
    let risk = card.get(Dimension::RiskLevel);
    let backup = card.get(Dimension::BackupStrength);
    let low = card.scores.iter().filter(|s| **s < LOW_SCORE_THRESHOLD).count();

    if financial < LOW_SCORE_THRESHOLD {
        VerdictOutcome::NotGood
    } else if risk > HIGH_RISK_THRESHOLD && backup < STRONG_BACKUP_THRESHOLD {
        VerdictOutcome::NotGood
    } else if low >= 2 {
        VerdictOutcome::NotGood
    } else if card.scores.iter().all(|s| *s >= GOOD_THRESHOLD) {
        VerdictOutcome::Good
    } else {
        VerdictOutcome::ConditionallyGood
    }
}

/// Position of the outcome label inside the raw report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VerdictLine {
    /// `Decision Verdict: Good` on one line.
    Inline(usize),
    /// Header line followed by the label on a later line.
    Following(usize),
}

/// The model's verdict text plus what could be read out of it.
#[derive(Debug, Clone, PartialEq)]
pub struct VerdictReport {
    raw: String,
    scores: Option<ScoreCard>,
    stated: Option<VerdictOutcome>,
    verdict_line: Option<VerdictLine>,
}

impl VerdictReport {
    /// Interprets a raw model reply. Never fails; missing pieces stay `None`.
    pub fn from_model_output(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let scores = ScoreCard::parse(&raw).ok();
        let (verdict_line, stated) = match locate_verdict(&raw) {
            Some((line, outcome)) => (Some(line), outcome),
            None => (None, None),
        };
        Self {
            raw,
            scores,
            stated,
            verdict_line,
        }
    }

    /// Model text exactly as returned.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn scores(&self) -> Option<&ScoreCard> {
        self.scores.as_ref()
    }

    /// Outcome the model wrote.
    pub fn stated_outcome(&self) -> Option<VerdictOutcome> {
        self.stated
    }

    /// Outcome the rubric assigns to the parsed scores.
    pub fn computed_outcome(&self) -> Option<VerdictOutcome> {
        self.scores.as_ref().map(ScoreCard::outcome)
    }

    /// Rubric outcome when scores parsed, otherwise the model's own.
    pub fn outcome(&self) -> Option<VerdictOutcome> {
        self.computed_outcome().or(self.stated)
    }

    /// True when the rubric disagrees with what the model wrote.
    pub fn overrides_model(&self) -> bool {
        match self.computed_outcome() {
            Some(computed) => self.stated != Some(computed),
            None => false,
        }
    }

    /// Report text with the verdict line rewritten to the rubric outcome.
    ///
    /// Returns the raw text unchanged when there is nothing to correct or no
    /// verdict line to correct.
    pub fn render(&self) -> String {
        let (Some(outcome), Some(location)) = (self.computed_outcome(), self.verdict_line) else {
            return self.raw.clone();
        };
        if !self.overrides_model() {
            return self.raw.clone();
        }

        let target = match location {
            VerdictLine::Inline(idx) | VerdictLine::Following(idx) => idx,
        };
        let mut out = String::with_capacity(self.raw.len() + outcome.label().len());
        // split_inclusive indexes lines exactly like `lines()` and keeps endings
        for (idx, segment) in self.raw.split_inclusive('\n').enumerate() {
            if idx != target {
                out.push_str(segment);
                continue;
            }
            let line = segment.trim_end_matches(['\n', '\r']);
            let ending = &segment[line.len()..];
            out.push_str(&rewrite_line(line, location, outcome));
            out.push_str(ending);
        }
        out
    }
}

fn rewrite_line(line: &str, location: VerdictLine, outcome: VerdictOutcome) -> String {
    match location {
        VerdictLine::Inline(_) => match VERDICT_HEADER.find(line) {
            Some(m) => {
                let closing = line[m.end()..].chars().take_while(|c| *c == '*').count();
                format!("{} {}", &line[..m.end() + closing], outcome.label())
            }
            None => line.to_string(),
        },
        VerdictLine::Following(_) => {
            let indent: String = line.chars().take_while(|c| c.is_whitespace()).collect();
            format!("{}{}", indent, outcome.label())
        }
    }
}

fn locate_verdict(raw: &str) -> Option<(VerdictLine, Option<VerdictOutcome>)> {
    let lines: Vec<&str> = raw.lines().collect();
    let header_idx = lines.iter().position(|l| VERDICT_HEADER.is_match(l))?;

    let header = lines[header_idx];
    let rest = VERDICT_HEADER
        .find(header)
        .map(|m| header[m.end()..].trim_matches(|c: char| c.is_whitespace() || c == '*'))
        .unwrap_or_default();
    if !rest.is_empty() {
        return Some((VerdictLine::Inline(header_idx), VerdictOutcome::detect(rest)));
    }

    // a label on a later line counts only if it reads as an outcome,
    // otherwise the next section header would be taken for it
    let following = lines
        .iter()
        .enumerate()
        .skip(header_idx + 1)
        .find(|(_, l)| !l.trim().is_empty())
        .and_then(|(idx, l)| VerdictOutcome::detect(l).map(|o| (idx, o)));
    match following {
        Some((idx, outcome)) => Some((VerdictLine::Following(idx), Some(outcome))),
        None => Some((VerdictLine::Inline(header_idx), None)),
    }
}
