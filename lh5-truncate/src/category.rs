use std::fmt::{Display, Formatter};
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;

use lh5_error::{Lh5Error, Lh5Expect, Lh5Result, lh5_bail};
use regex::Regex;
use serde::Serialize;

/// The processing tier of a file, which fixes how its rows are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileCategory {
    /// Event-level data.
    Evt,
    /// The coincidence map itself.
    Tcm,
    /// Any other event-ordered file.
    AnyEvt,
    /// Raw digitizer data.
    Raw,
    /// Digital signal processing output.
    Dsp,
    /// Hit-level data.
    Hit,
    /// Any other hit-ordered file.
    AnyHit,
}

/// How the rows of a file relate to events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowOrdering {
    /// Row `i` of every object belongs to event `i`.
    Event,
    /// Rows are per channel and map to events through a coincidence map.
    Hit,
}

static TIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"tier_([a-z0-9-]+)\.[A-Za-z0-9]+$").lh5_expect("tier file name regex is valid")
});

impl FileCategory {
    pub const ALL: [FileCategory; 7] = [
        FileCategory::Evt,
        FileCategory::Tcm,
        FileCategory::AnyEvt,
        FileCategory::Raw,
        FileCategory::Dsp,
        FileCategory::Hit,
        FileCategory::AnyHit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::Evt => "evt",
            FileCategory::Tcm => "tcm",
            FileCategory::AnyEvt => "any-evt",
            FileCategory::Raw => "raw",
            FileCategory::Dsp => "dsp",
            FileCategory::Hit => "hit",
            FileCategory::AnyHit => "any-hit",
        }
    }

    pub fn ordering(&self) -> RowOrdering {
        match self {
            FileCategory::Evt | FileCategory::Tcm | FileCategory::AnyEvt => RowOrdering::Event,
            FileCategory::Raw | FileCategory::Dsp | FileCategory::Hit | FileCategory::AnyHit => {
                RowOrdering::Hit
            }
        }
    }

    /// Deduce the category from a `tier_<category>.<ext>` file name.
    pub fn infer(path: &Path) -> Lh5Result<Self> {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default();
        let Some(captures) = TIER.captures(&name) else {
            lh5_bail!(
                UnknownFileCategory: "cannot deduce the file category from {}: pass any-hit or any-evt explicitly",
                path.display()
            );
        };
        captures
            .get(1)
            .map_or("", |m| m.as_str())
            .parse()
    }
}

impl FromStr for FileCategory {
    type Err = Lh5Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match FileCategory::ALL.iter().find(|c| c.as_str() == s) {
            Some(category) => Ok(*category),
            None => lh5_bail!(
                UnknownFileCategory: "unknown file category '{}': impossible to tell if it is hit- or event-ordered, use any-hit or any-evt",
                s
            ),
        }
    }
}

impl Display for FileCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("l200-p03-r000-phy-tier_raw.lh5", FileCategory::Raw, RowOrdering::Hit)]
    #[case("/data/tier_dsp.lh5", FileCategory::Dsp, RowOrdering::Hit)]
    #[case("tier_hit.json", FileCategory::Hit, RowOrdering::Hit)]
    #[case("tier_evt.lh5", FileCategory::Evt, RowOrdering::Event)]
    #[case("run/tier_tcm.lh5", FileCategory::Tcm, RowOrdering::Event)]
    fn infers_from_file_name(
        #[case] path: &str,
        #[case] expected: FileCategory,
        #[case] ordering: RowOrdering,
    ) {
        let category = FileCategory::infer(Path::new(path)).unwrap();
        assert_eq!(category, expected);
        assert_eq!(category.ordering(), ordering);
    }

    #[rstest]
    #[case("data.lh5")]
    #[case("tier_pht.lh5")]
    #[case("tier_raw/other.lh5")]
    fn unknown_categories(#[case] path: &str) {
        let err = FileCategory::infer(Path::new(path)).unwrap_err();
        assert!(matches!(err, Lh5Error::UnknownFileCategory(..)));
        assert!(err.to_string().contains("any-hit"), "{err}");
    }

    #[test]
    fn parses_every_category() {
        for category in FileCategory::ALL {
            assert_eq!(category.as_str().parse::<FileCategory>().unwrap(), category);
        }
        assert!("EVT".parse::<FileCategory>().is_err());
    }
}
