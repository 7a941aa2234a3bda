//! The closed Old German vocabulary and its Python spellings.
//!
//! Only identifier tokens whose text is a key of this table are ever rewritten.

use std::fmt;

use indexmap::IndexMap;
use once_cell::sync::OnceCell;

use crate::diagnostics::{Diagnostic, DiagnosticKind};

/// Control flow, declarations, exception handling, and literal keywords.
pub const KEYWORDS: &[(&str, &str)] = &[
    // imports and aliases
    ("importiert", "import"),
    ("von", "from"),
    ("als", "as"),
    // functions and classes
    ("defn", "def"),
    ("klasse", "class"),
    // control flow
    ("sofern", "if"),
    ("sofernschier", "elif"),
    ("sonst", "else"),
    ("solang", "while"),
    ("fuerwahr", "for"),
    ("inwendig", "in"),
    ("gibzurueck", "return"),
    ("brechet", "break"),
    ("fahrefort", "continue"),
    ("bestehe", "pass"),
    // boolean operators
    ("und", "and"),
    ("oder", "or"),
    ("nichten", "not"),
    ("ist", "is"),
    ("mittels", "with"),
    // scope
    ("allumfassend", "global"),
    ("nichtlokal", "nonlocal"),
    ("behauptet", "assert"),
    ("tilget", "del"),
    // async
    ("erwarte", "await"),
    ("gleichlaufend", "async"),
    // exceptions
    ("probiert", "try"),
    ("ausser", "except"),
    ("endlich", "finally"),
    ("werfet", "raise"),
    ("alsfehler", "as"),
    // literals
    ("Wahrlich", "True"),
    ("Falschlich", "False"),
    ("Nichts", "None"),
    ("ertrag", "yield"),
    ("anonym", "lambda"),
];

/// Renamed standard functions.
pub const BUILTINS: &[(&str, &str)] = &[
    ("verkuendet", "print"),
    ("laenge", "len"),
    ("bereich", "range"),
    ("aufzaehlung", "enumerate"),
    ("reissverschluss", "zip"),
    ("zuordnung", "map"),
    ("sieb", "filter"),
    ("eingabe", "input"),
    ("ganzzahl", "int"),
    ("gleitkomma", "float"),
    ("zeichenkette", "str"),
    ("liste", "list"),
    ("woerterbuch", "dict"),
    ("menge", "set"),
    ("tupel", "tuple"),
    ("sortiert", "sorted"),
    ("umgekehrt", "reversed"),
    ("absolut", "abs"),
    ("summe", "sum"),
    ("minimum", "min"),
    ("maximum", "max"),
    ("beliebig", "any"),
    ("saemtlich", "all"),
    ("typ", "type"),
    ("isinstance_von", "isinstance"),
    ("oeffne", "open"),
    ("naechstes", "next"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Group {
    Keyword,
    Builtin,
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Group::Keyword => f.write_str("keyword"),
            Group::Builtin => f.write_str("builtin"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VocabularyEntry {
    pub surface: &'static str,
    pub host: &'static str,
    pub group: Group,
}

#[derive(Debug, Clone)]
pub struct Vocabulary {
    entries: IndexMap<&'static str, VocabularyEntry>,
}

static STANDARD: OnceCell<Vocabulary> = OnceCell::new();

impl Vocabulary {
    /// Merges a keyword group and a builtin group into one lookup table.
    ///
    /// A surface key claimed twice, within or across groups, is a
    /// `SubstitutionAmbiguity` diagnostic rather than a silent override.
    pub fn from_groups(
        keywords: &[(&'static str, &'static str)],
        builtins: &[(&'static str, &'static str)],
    ) -> Result<Self, Diagnostic> {
        let mut entries = IndexMap::with_capacity(keywords.len() + builtins.len());
        let groups = [(Group::Keyword, keywords), (Group::Builtin, builtins)];
        for (group, pairs) in groups {
            for &(surface, host) in pairs {
                let entry = VocabularyEntry {
                    surface,
                    host,
                    group,
                };
                if let Some(existing) = entries.insert(surface, entry) {
                    return Err(Diagnostic::new(
                        DiagnosticKind::Ambiguity,
                        format!("surface token `{surface}` is defined more than once"),
                    )
                    .with_note(format!(
                        "{} group maps it to `{}`",
                        existing.group, existing.host
                    ))
                    .with_note(format!("{group} group maps it to `{host}`")));
                }
            }
        }
        Ok(Self { entries })
    }

    /// The process-wide table built from [`KEYWORDS`] and [`BUILTINS`].
    pub fn standard() -> Result<&'static Vocabulary, Diagnostic> {
        STANDARD.get_or_try_init(|| Vocabulary::from_groups(KEYWORDS, BUILTINS))
    }

    pub fn lookup(&self, surface: &str) -> Option<&'static str> {
        self.entries.get(surface).map(|entry| entry.host)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every entry across both groups, sorted by surface token.
    pub fn entries(&self) -> Vec<VocabularyEntry> {
        let mut entries: Vec<_> = self.entries.values().copied().collect();
        entries.sort_by(|a, b| a.surface.cmp(b.surface));
        entries
    }

    /// The entries of one group, sorted by surface token.
    pub fn group(&self, group: Group) -> Vec<VocabularyEntry> {
        let mut entries: Vec<_> = self
            .entries
            .values()
            .filter(|entry| entry.group == group)
            .copied()
            .collect();
        entries.sort_by(|a, b| a.surface.cmp(b.surface));
        entries
    }
}
