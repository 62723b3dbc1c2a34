use serde::{Deserialize, Serialize};

/// Tri-state classification outcome.
///
/// There is no meaningful ordering between variants. On the wire a verdict is the
/// integer from [`Verdict::to_int`]:
///
/// | Verdict | Integer |
/// |---------|---------|
/// | `Yes`   | `1`     |
/// | `Maybe` | `0`     |
/// | `No`    | `-1`    |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Yes,
    Maybe,
    No,
}

impl Verdict {
    #[inline]
    pub fn to_int(self) -> i8 {
        match self {
            Verdict::Yes => 1,
            Verdict::Maybe => 0,
            Verdict::No => -1,
        }
    }

    /// `true` for `Yes` and `No`; a chain stops at the first decisive verdict.
    #[inline]
    pub fn is_decisive(self) -> bool {
        !matches!(self, Verdict::Maybe)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Yes => "YES",
            Verdict::Maybe => "MAYBE",
            Verdict::No => "NO",
        }
    }
}

impl TryFrom<i8> for Verdict {
    type Error = i8;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Verdict::Yes),
            0 => Ok(Verdict::Maybe),
            -1 => Ok(Verdict::No),
            other => Err(other),
        }
    }
}

impl From<Verdict> for i8 {
    fn from(verdict: Verdict) -> Self {
        verdict.to_int()
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
