//! The fixed set of triage labels.
//!
//! Label strings must match the prompt text exactly; the model is asked to
//! echo one of them back verbatim.

use std::fmt;
use std::str::FromStr;

/// One of the five triage outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    SkyClarys,
    FaMechanisms,
    OtherCompounds,
    GeneralFa,
    Irrelevant,
}

/// Parse failure for a string outside the fixed label set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLabel(pub String);

impl fmt::Display for UnknownLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown label: {:?}", self.0)
    }
}

impl std::error::Error for UnknownLabel {}

impl Label {
    /// All labels in prompt order.
    pub const ALL: [Label; 5] = [
        Label::SkyClarys,
        Label::FaMechanisms,
        Label::OtherCompounds,
        Label::GeneralFa,
        Label::Irrelevant,
    ];

    /// The exact label string used in the prompt and expected in model output.
    pub fn as_str(self) -> &'static str {
        match self {
            Label::SkyClarys => "SkyClarys/Omaveloxolone",
            Label::FaMechanisms => "FA Mechanisms (Iron/Ferroptosis/ROS)",
            Label::OtherCompounds => "Other Drugs/Compounds Targeting Iron/Ferroptosis/ROS",
            Label::GeneralFa => "General FA (Genetics/Clinical)",
            Label::Irrelevant => "Irrelevant",
        }
    }

    /// Definition as given to the model.
    pub fn definition(self) -> &'static str {
        match self {
            Label::SkyClarys => {
                "Abstracts mentioning omaveloxolone (SkyClarys), bardoxolone methyl, or related analogs."
            }
            Label::FaMechanisms => {
                "Abstracts about FA biology including frataxin deficiency, iron overload, mitochondrial dysfunction, oxidative stress, ROS, lipid peroxidation, ferroptosis, GPX4."
            }
            Label::OtherCompounds => {
                "Abstracts about non-omaveloxolone drugs or compounds that modulate ferroptosis, GPX4, iron chelation, lipid peroxidation, or mitochondrial antioxidant pathways, even if studied in other diseases or models (exclude NRF2/KEAP1 activators)."
            }
            Label::GeneralFa => {
                "Abstracts about FA genetics, prevalence, natural history, or clinical scales, without mechanistic or therapeutic depth."
            }
            Label::Irrelevant => "Everything else.",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = UnknownLabel;

    /// Exact match only: no trimming, no case folding.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Label::ALL
            .into_iter()
            .find(|label| label.as_str() == s)
            .ok_or_else(|| UnknownLabel(s.to_string()))
    }
}
