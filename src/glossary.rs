/*!
 * Glossary storage and term substitution for terminology consistency.
 *
 * The glossary is a fixed English → Dutch terminology table enforced on
 * every translation. Substitution is literal, case-sensitive string
 * replacement applied longest-source-term-first, so a multi-word term is
 * rewritten as a whole before any of its constituent words could be
 * matched by a shorter entry.
 */

use std::collections::BTreeMap;

use once_cell::sync::Lazy;

/// Built-in professional glossary of English → Dutch medical/clinical terms.
///
/// Treated as configuration data: loaded once at start-up, never mutated.
static BUILTIN_TERMS: &[(&str, &str)] = &[
    // Product and treatment terms
    ("CAMZYOS®", "CAMZYOS®"),
    ("Mavacamten", "Mavacamten"),
    (
        "First-in-class cardiac myosin inhibitor",
        "Eerste-in-zijn-klasse cardiale myosineremmer",
    ),
    ("Targeted mechanism of action", "Gericht werkingsmechanisme"),
    // Medical/clinical conditions
    (
        "HCM – Hypertrophic Cardiomyopathy",
        "HCM – Hypertrofische Cardiomyopathie",
    ),
    (
        "Symptomatic obstructive hypertrophic cardiomyopathy",
        "Symptomatische obstructieve hypertrofische cardiomyopathie",
    ),
    ("Cardiac conditions", "Hartaandoeningen"),
    // Clinical trial references
    ("EXPLORER-HCM", "EXPLORER-HCM"),
    ("Clinical trial", "Klinische studie"),
    ("Treatment duration – 30 weeks", "Behandelduur – 30 weken"),
    ("Patient-reported outcomes", "Patiëntgerapporteerde uitkomsten"),
    (
        "Primary and secondary endpoints",
        "Primaire en secundaire eindpunten",
    ),
    // Clinical benefits / efficacy terms
    ("Efficacy", "Doeltreffendheid"),
    ("Clinical benefits", "Klinische voordelen"),
    ("Symptom management", "Symptoombeheer"),
    ("Quality of life", "Levenskwaliteit"),
    ("Functional capacity", "Functionele capaciteit"),
    ("Functional status", "Functionele status"),
    ("Therapeutic outcomes", "Therapeutische uitkomsten"),
    ("Improvement scores", "Verbeteringsscores"),
    (
        "Enhanced therapeutic outcomes",
        "Verbeterde therapeutische uitkomsten",
    ),
    (
        "Sustained relief from symptoms",
        "Aanhoudende verlichting van symptomen",
    ),
    (
        "Rapid decline in LVOT gradients",
        "Snelle afname van LVUT-gradiënten",
    ),
    ("Effective management", "Effectief beheer"),
    // Cardiac function metrics
    (
        "LVOT – Left Ventricular Outflow Tract",
        "LVUT – Linkerventrikel-uitstroomtractus",
    ),
    (
        "LVEF – Left Ventricular Ejection Fraction",
        "LVEF – Linkerventrikel ejectiefractie",
    ),
    (
        "Left ventricular systolic function",
        "Systolische functie van de linkerventrikel",
    ),
    (
        "Mean global left ventricular systolic function",
        "Gemiddelde globale systolische functie van de linkerventrikel",
    ),
    (
        "Left ventricular obstruction",
        "Obstructie van de linkerventrikel",
    ),
    // Safety and tolerability terms
    ("Safety profile", "Veiligheidsprofiel"),
    ("Comparable to placebo", "Vergelijkbaar met placebo"),
    ("Favorable safety profile", "Gunstig veiligheidsprofiel"),
    (
        "No unexpected safety concerns",
        "Geen onverwachte veiligheidsproblemen",
    ),
    ("Adverse events", "Bijwerkingen"),
    ("Serious adverse events", "Ernstige bijwerkingen"),
    ("Tolerability", "Verdraagbaarheid"),
    ("Modest reductions in LVEF", "Bescheiden dalingen in LVEF"),
    (
        "No discontinuation due to LVEF",
        "Geen behandelingsstop vanwege LVEF",
    ),
    // Comparators and controls
    ("Placebo", "Placebo"),
    ("Mavacamten vs. Placebo group", "Mavacamten versus placebogroep"),
    ("Superiority over placebo", "Superieur ten opzichte van placebo"),
    // Communication terms
    ("Subject line", "Onderwerpregel"),
    ("Preheader", "Preheader"),
    ("Click here for the VPI", "Klik hier voor de VPI"),
    ("Feel free to reach out", "Neem gerust contact op"),
];

/// Shared instance of the built-in glossary, built once per process.
pub static BUILTIN: Lazy<Glossary> = Lazy::new(Glossary::builtin);

/// Immutable terminology table with ordered substitution.
///
/// Entries are stored pre-sorted by descending source-term length
/// (character count, so `®` counts as one), longest first. Equal-length
/// sources order lexicographically so substitution is deterministic
/// regardless of how the table was declared.
#[derive(Debug, Clone)]
pub struct Glossary {
    /// (source, target) pairs sorted for longest-match-first substitution
    entries: Vec<(String, String)>,
}

impl Glossary {
    /// Build a glossary from (source, target) pairs.
    ///
    /// Duplicate source terms keep the last mapping given.
    pub fn from_pairs<I, S, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        let map: BTreeMap<String, String> = pairs
            .into_iter()
            .map(|(s, t)| (s.into(), t.into()))
            .collect();

        let mut entries: Vec<(String, String)> = map.into_iter().collect();
        entries.sort_by(|a, b| {
            let len_a = a.0.chars().count();
            let len_b = b.0.chars().count();
            len_b.cmp(&len_a).then_with(|| a.0.cmp(&b.0))
        });

        Self { entries }
    }

    /// Build the built-in English → Dutch glossary.
    pub fn builtin() -> Self {
        Self::from_pairs(BUILTIN_TERMS.iter().copied())
    }

    /// Create an empty glossary (substitution becomes a no-op).
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Number of entries in the glossary.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the glossary has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up the target term for an exact source term.
    pub fn target_for(&self, source: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(s, _)| s == source)
            .map(|(_, t)| t.as_str())
    }

    /// Iterate over (source, target) pairs in substitution order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(s, t)| (s.as_str(), t.as_str()))
    }

    /// Snapshot of the glossary as a plain map, in substitution order.
    ///
    /// Used for the evaluator payload so the model can cross-check
    /// terminology against the full table.
    pub fn as_map(&self) -> BTreeMap<String, String> {
        self.entries.iter().cloned().collect()
    }

    /// Replace every glossary source term in `text` with its target term.
    ///
    /// Replacements run sequentially over the progressively mutated text,
    /// longest source term first. A replacement made for a longer term can
    /// consume substrings a shorter term would otherwise have matched, and
    /// already-substituted target text is itself eligible for matching by
    /// later, shorter rules. Whole-term sequential replacement, not a
    /// tokenizer; callers downstream depend on this exact ordering.
    pub fn apply(&self, text: &str) -> String {
        self.entries
            .iter()
            .fold(text.to_string(), |acc, (source, target)| {
                acc.replace(source.as_str(), target)
            })
    }
}

impl Default for Glossary {
    fn default() -> Self {
        Self::builtin()
    }
}
