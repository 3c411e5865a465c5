//! Recognition of the two-endpoint connector shorthand (`-o`, `*-*`, ...).

/// Terminal marker kind at a connector endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// A filled circle (`*`).
    Filled,
    /// An open circle (`o`).
    Open,
}

impl MarkerKind {
    /// The node-kind name used when synthesizing a terminal node.
    pub fn node_kind(self) -> &'static str {
        match self {
            MarkerKind::Filled => "circ",
            MarkerKind::Open => "ocirc",
        }
    }
}

/// Endpoint markers requested by a special connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connector {
    pub start: Option<MarkerKind>,
    pub end: Option<MarkerKind>,
}

/// The fixed shorthand vocabulary. Patterns are mutually exclusive, so
/// table order is irrelevant.
const SHORTHAND: &[(&str, Option<MarkerKind>, Option<MarkerKind>)] = &[
    ("-o", None, Some(MarkerKind::Open)),
    ("o-", Some(MarkerKind::Open), None),
    ("o-o", Some(MarkerKind::Open), Some(MarkerKind::Open)),
    ("*-*", Some(MarkerKind::Filled), Some(MarkerKind::Filled)),
    ("*-o", Some(MarkerKind::Filled), Some(MarkerKind::Open)),
    ("o-*", Some(MarkerKind::Open), Some(MarkerKind::Filled)),
];

/// Classify an options string as a special connector.
///
/// The trimmed string, optionally prefixed with `short,`, must exactly match
/// one of the six shorthand forms. Anything else is not special and is
/// handled by the regular option parsing.
pub fn classify(options: &str) -> Option<Connector> {
    let trimmed = options.trim();
    let body = match trimmed.strip_prefix("short,") {
        Some(rest) => rest.trim_start(),
        None => trimmed,
    };

    SHORTHAND
        .iter()
        .find(|(pattern, _, _)| *pattern == body)
        .map(|&(_, start, end)| Connector { start, end })
}
