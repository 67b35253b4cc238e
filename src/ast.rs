/// An ordered sequence of rules. Stages run in this order, each feeding the next.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RuleSet {
    pub rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// A rule in the ssed language.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// `s/<pattern>/<replacement>` (first match) or `g/<pattern>/<replacement>` (all matches)
    Substitute {
        pattern: String,
        replacement: String,
        global: bool,
    },
    /// `s:<line>:<text>` - replace the whole content of one line
    LineSubstitute { line: i64, text: String },
    /// `p/<pattern>/` or `print/<pattern>/` - keep matching lines
    PrintByPattern { pattern: String },
    /// `p:<spec>` or `print:<spec>` - keep lines by position
    PrintByIndex(LineSpec),
    /// `print` - identity
    PrintAll,
    /// `sort`, `reverse`, `join`
    Document(DocumentOp),
    /// `if/<pattern>/ { ... }`
    If { pattern: String, then: RuleSet },
    /// `between/<start>/<end>/ { ... }`
    Between {
        start: String,
        end: String,
        inner: RuleSet,
    },
    /// `status:<code> { ... } [else { ... }]`
    Status {
        code: String,
        then: RuleSet,
        otherwise: RuleSet,
    },
    /// Stand-in for a rule-string that could not be parsed.
    NoOp,
}

/// Line selector for `p:<spec>`. Positions are 1-based; negative counts from the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSpec {
    /// A single line, e.g. `3` or `-1`
    Index(i64),
    /// An inclusive range, e.g. `2-4`
    Range(i64, i64),
}

impl LineSpec {
    /// Resolve to 0-based indices against a sequence of `len` lines.
    ///
    /// Out-of-range positions are dropped rather than reported.
    pub fn resolve(&self, len: usize) -> Vec<usize> {
        match *self {
            LineSpec::Index(n) => resolve_position(n, len).into_iter().collect(),
            LineSpec::Range(a, b) => {
                let len_i = len as i64;
                let start = a.max(1);
                let end = b.min(len_i);
                if start > end {
                    return Vec::new();
                }
                (start..=end).map(|n| (n - 1) as usize).collect()
            }
        }
    }
}

/// Resolve a 1-based (or negative, from the end) position to a 0-based index.
pub fn resolve_position(n: i64, len: usize) -> Option<usize> {
    let len = len as i64;
    let actual = if n < 0 { len + n } else { n - 1 };
    if n == 0 || actual < 0 || actual >= len {
        None
    } else {
        Some(actual as usize)
    }
}

/// Whole-document operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentOp {
    Sort,
    Reverse,
    Join,
}
