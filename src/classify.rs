//! Keyword heuristics that sort records into Advice / Edge Case / Guidance.
//!
//! A [`Classifier`] is built from three keyword families and a
//! [`ClassifierConfig`]. The families are compiled once; labelling is then a
//! pure function of the record text.

use crate::dataset::Record;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("invalid {family} pattern: {source}")]
    BadPattern {
        family: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("cannot read keyword file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed keyword file {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Label {
    Advice,
    #[serde(rename = "Edge Case")]
    EdgeCase,
    Guidance,
    Unsure,
}

impl Label {
    pub const ALL: [Label; 4] = [Label::Advice, Label::EdgeCase, Label::Guidance, Label::Unsure];

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Advice => "Advice",
            Label::EdgeCase => "Edge Case",
            Label::Guidance => "Guidance",
            Label::Unsure => "Unsure",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = String;

    // Accepts "Edge Case", "edge-case", "edge_case", "EDGECASE", ...
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "advice" => Ok(Label::Advice),
            "edgecase" => Ok(Label::EdgeCase),
            "guidance" => Ok(Label::Guidance),
            "unsure" => Ok(Label::Unsure),
            _ => Err(format!(
                "unknown label {s:?} (expected Advice, Edge Case, Guidance or Unsure)"
            )),
        }
    }
}

/// Which fields make up the text that gets classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSource {
    InstructionOutput,
    InstructionInput,
}

impl TextSource {
    pub fn text(&self, record: &Record) -> String {
        let second = match self {
            TextSource::InstructionOutput => &record.output,
            TextSource::InstructionInput => &record.input,
        };
        format!("{} {}", record.instruction, second).to_lowercase()
    }
}

/// How the entries of one keyword family are tested against the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Literal keyword that must start and end on a word boundary.
    WordBoundary,
    /// Plain substring containment.
    Substring,
    /// Entries are regular expressions.
    Pattern,
}

/// The three booleans every label is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Signals {
    pub has_instrument: bool,
    pub has_action: bool,
    pub has_personal: bool,
}

/// Decision boundary mapping [`Signals`] to a [`Label`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionRule {
    /// Advice / Edge Case / Guidance with an Unsure fallback.
    FourWay,
    /// Advice / Edge Case / Guidance; everything unmatched is Guidance.
    ThreeWay,
}

impl DecisionRule {
    pub fn decide(&self, s: Signals) -> Label {
        match self {
            DecisionRule::FourWay => {
                if s.has_instrument && (s.has_action || s.has_personal) {
                    Label::Advice
                } else if s.has_personal && !s.has_instrument {
                    Label::EdgeCase
                } else if !s.has_personal && !s.has_action {
                    Label::Guidance
                } else {
                    Label::Unsure
                }
            }
            DecisionRule::ThreeWay => {
                if (s.has_personal || s.has_action) && s.has_instrument {
                    Label::Advice
                } else if s.has_personal && !(s.has_instrument || s.has_action) {
                    Label::EdgeCase
                } else {
                    Label::Guidance
                }
            }
        }
    }

    pub fn labels(&self) -> &'static [Label] {
        match self {
            DecisionRule::FourWay => &Label::ALL,
            DecisionRule::ThreeWay => &[Label::Advice, Label::EdgeCase, Label::Guidance],
        }
    }
}

/// Keyword and pattern lists. Any family missing from a JSON override file
/// is empty and never matches.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeywordFamilies {
    #[serde(default)]
    pub instruments: Vec<String>,
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default)]
    pub personalization: Vec<String>,
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl KeywordFamilies {
    /// Full lists used to build the validation golden set.
    pub fn golden_set() -> Self {
        Self {
            instruments: owned(&[
                "apple", "aapl", "tesla", "tsla", "bitcoin", "btc", "eth", "stock", "share",
                "dividend", "401k", "ira", "roth", "pension", "etf", "mutual fund", "index fund",
                "s&p 500", "insurance", "annuity", "bond", "treasury", "security", "option",
                "future", "derivative", "mortgage", "real estate", "property", "refinance",
                "equity",
            ]),
            actions: owned(&[
                r"\bbuy\b", r"\bsell\b", r"\bhold\b", r"\binvest\b", r"\bshort\b",
                r"\bswitch\b", r"\ballocate\b", r"\bbalance\b", r"\bchurn\b",
                r"\bconsider\b", r"\byou should\b", r"\boptimal\b", r"\bbest choice\b",
            ]),
            personalization: owned(&[
                "i am", "my age", "my goal", "my salary", "my income", "risk tolerance",
                "retirement", "years old", "have $", "my portfolio", "my debt", "spouse",
                "children", "dependents",
            ]),
        }
    }

    /// Narrower lists from the logbook categorisation pass.
    pub fn logbook() -> Self {
        Self {
            instruments: owned(&[
                "apple", "aapl", "tesla", "tsla", "bitcoin", "btc", "eth", "401k", "ira",
                "pension", "etf", "security", "bond",
            ]),
            actions: owned(&[
                r"\bbuy\b", r"\bsell\b", r"\bhold\b", r"\binvest in\b", r"\bdivest from\b",
                r"\bswitch to\b", r"\ballocate\b", r"\bshort\b",
            ]),
            personalization: owned(&[
                "i am", "my age", "my goal", "my salary", "risk tolerance", "retirement",
                "my house", "given you are",
            ]),
        }
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ClassifierError> {
        let shown = path.display().to_string();
        let file = File::open(path).map_err(|source| ClassifierError::Io {
            path: shown.clone(),
            source,
        })?;
        serde_json::from_reader(BufReader::new(file))
            .map_err(|source| ClassifierError::Json { path: shown, source })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifierConfig {
    pub text_source: TextSource,
    pub rule: DecisionRule,
    pub instrument_mode: MatchMode,
    pub action_mode: MatchMode,
    pub personal_mode: MatchMode,
}

impl ClassifierConfig {
    pub fn golden_set() -> Self {
        Self {
            text_source: TextSource::InstructionOutput,
            rule: DecisionRule::FourWay,
            instrument_mode: MatchMode::WordBoundary,
            action_mode: MatchMode::Pattern,
            personal_mode: MatchMode::Substring,
        }
    }

    pub fn logbook() -> Self {
        Self {
            text_source: TextSource::InstructionInput,
            rule: DecisionRule::ThreeWay,
            ..Self::golden_set()
        }
    }
}

#[derive(Debug, Clone)]
enum Matcher {
    Never,
    Regex(Regex),
    Substrings(Vec<String>),
}

impl Matcher {
    fn build(family: &'static str, entries: &[String], mode: MatchMode) -> Result<Self, ClassifierError> {
        if entries.is_empty() {
            return Ok(Matcher::Never);
        }
        let source = match mode {
            MatchMode::Substring => {
                return Ok(Matcher::Substrings(
                    entries.iter().map(|e| e.to_lowercase()).collect(),
                ))
            }
            MatchMode::WordBoundary => {
                let alts: Vec<String> = entries
                    .iter()
                    .map(|e| regex::escape(&e.to_lowercase()))
                    .collect();
                format!(r"\b(?:{})\b", alts.join("|"))
            }
            MatchMode::Pattern => entries
                .iter()
                .map(|p| format!("(?:{p})"))
                .collect::<Vec<_>>()
                .join("|"),
        };
        RegexBuilder::new(&source)
            .case_insensitive(true)
            .build()
            .map(Matcher::Regex)
            .map_err(|source| ClassifierError::BadPattern { family, source })
    }

    fn is_match(&self, text: &str) -> bool {
        match self {
            Matcher::Never => false,
            Matcher::Regex(re) => re.is_match(text),
            Matcher::Substrings(words) => words.iter().any(|w| text.contains(w.as_str())),
        }
    }
}

/// A record together with the label it was assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledRecord {
    pub record: Record,
    pub label: Label,
    pub signals: Signals,
}

#[derive(Debug, Clone)]
pub struct Classifier {
    config: ClassifierConfig,
    instruments: Matcher,
    actions: Matcher,
    personal: Matcher,
}

impl Classifier {
    pub fn new(families: &KeywordFamilies, config: ClassifierConfig) -> Result<Self, ClassifierError> {
        Ok(Self {
            config,
            instruments: Matcher::build("instrument", &families.instruments, config.instrument_mode)?,
            actions: Matcher::build("action", &families.actions, config.action_mode)?,
            personal: Matcher::build("personalization", &families.personalization, config.personal_mode)?,
        })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// `text` is lowercased here, so callers may pass raw text.
    pub fn signals(&self, text: &str) -> Signals {
        let text = text.to_lowercase();
        Signals {
            has_instrument: self.instruments.is_match(&text),
            has_action: self.actions.is_match(&text),
            has_personal: self.personal.is_match(&text),
        }
    }

    pub fn label_text(&self, text: &str) -> Label {
        self.config.rule.decide(self.signals(text))
    }

    pub fn label(&self, record: &Record) -> Label {
        self.label_text(&self.config.text_source.text(record))
    }

    pub fn classify(&self, record: Record) -> LabeledRecord {
        let signals = self.signals(&self.config.text_source.text(&record));
        LabeledRecord {
            label: self.config.rule.decide(signals),
            record,
            signals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn golden() -> Classifier {
        Classifier::new(&KeywordFamilies::golden_set(), ClassifierConfig::golden_set()).unwrap()
    }

    fn sig(i: bool, a: bool, p: bool) -> Signals {
        Signals { has_instrument: i, has_action: a, has_personal: p }
    }

    #[test]
    fn four_way_truth_table() {
        let r = DecisionRule::FourWay;
        assert_eq!(r.decide(sig(true, true, false)), Label::Advice);
        assert_eq!(r.decide(sig(true, false, true)), Label::Advice);
        assert_eq!(r.decide(sig(false, true, true)), Label::EdgeCase);
        assert_eq!(r.decide(sig(false, false, true)), Label::EdgeCase);
        assert_eq!(r.decide(sig(true, false, false)), Label::Guidance);
        assert_eq!(r.decide(sig(false, false, false)), Label::Guidance);
        assert_eq!(r.decide(sig(false, true, false)), Label::Unsure);
    }

    #[test]
    fn three_way_never_unsure() {
        let r = DecisionRule::ThreeWay;
        for bits in 0..8u8 {
            let s = sig(bits & 1 != 0, bits & 2 != 0, bits & 4 != 0);
            assert_ne!(r.decide(s), Label::Unsure, "{s:?}");
        }
        // Personal with an action but no instrument: Edge Case under four-way only.
        assert_eq!(r.decide(sig(false, true, true)), Label::Guidance);
        assert_eq!(DecisionRule::FourWay.decide(sig(false, true, true)), Label::EdgeCase);
    }

    #[test]
    fn word_boundary_keywords() {
        let c = golden();
        assert!(!c.signals("a pirate ship").has_instrument);
        assert!(c.signals("Max out your IRA contributions").has_instrument);
        assert!(c.signals("tracking the S&P 500 closely").has_instrument);
        assert!(!c.signals("shareholders meeting").has_instrument);
    }

    #[test]
    fn action_patterns_respect_boundaries() {
        let c = golden();
        assert!(c.signals("you could buy later").has_action);
        assert!(!c.signals("the buyer walked away").has_action);
        assert!(c.signals("You Should rebalance").has_action);
    }

    #[test]
    fn personalization_is_substring() {
        let c = golden();
        assert!(c.signals("When I have $500 spare").has_personal);
        assert!(c.signals("planning for early retirement").has_personal);
        assert!(!c.signals("what is inflation").has_personal);
    }

    #[test]
    fn uppercase_patterns_still_match() {
        let families = KeywordFamilies {
            actions: vec![r"\bBuy\b".to_string()],
            instruments: vec!["IRA".to_string()],
            ..KeywordFamilies::default()
        };
        let c = Classifier::new(&families, ClassifierConfig::golden_set()).unwrap();
        let s = c.signals("Should I BUY now for my ira?");
        assert!(s.has_action);
        assert!(s.has_instrument);
        assert!(!c.signals("the buyer").has_action);
    }

    #[test]
    fn personalization_matches_inside_words() {
        // Substring mode: "my goal" must still catch "my goals", at the
        // cost of "my age" firing on "my agent".
        let c = golden();
        assert!(c.signals("reaching my goals early").has_personal);
        assert!(c.signals("My agent says hi").has_personal);
    }

    #[test]
    fn empty_family_never_matches() {
        let families = KeywordFamilies {
            instruments: vec![],
            ..KeywordFamilies::golden_set()
        };
        let c = Classifier::new(&families, ClassifierConfig::golden_set()).unwrap();
        assert!(!c.signals("").has_instrument);
        assert!(!c.signals("stock bond etf").has_instrument);
    }

    #[test]
    fn bad_pattern_is_reported() {
        let families = KeywordFamilies {
            actions: vec!["(unclosed".to_string()],
            ..KeywordFamilies::default()
        };
        let err = Classifier::new(&families, ClassifierConfig::golden_set()).unwrap_err();
        assert!(matches!(err, ClassifierError::BadPattern { family: "action", .. }));
    }

    #[test]
    fn text_source_selects_fields() {
        let rec = Record::new("Should I buy", "my retirement", "bonds are fine");
        assert_eq!(TextSource::InstructionOutput.text(&rec), "should i buy bonds are fine");
        assert_eq!(TextSource::InstructionInput.text(&rec), "should i buy my retirement");
    }

    #[test]
    fn label_parsing_and_display() {
        assert_eq!("Edge Case".parse::<Label>().unwrap(), Label::EdgeCase);
        assert_eq!("edge-case".parse::<Label>().unwrap(), Label::EdgeCase);
        assert_eq!("GUIDANCE".parse::<Label>().unwrap(), Label::Guidance);
        assert!("maybe".parse::<Label>().is_err());
        assert_eq!(Label::EdgeCase.to_string(), "Edge Case");
        assert_eq!(serde_json::to_string(&Label::EdgeCase).unwrap(), "\"Edge Case\"");
    }
}
