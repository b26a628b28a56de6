use serde::{Deserialize, Serialize};

pub const CAUSES: &[&str] = &[
    "Animal Welfare",
    "Arts & Culture",
    "Children & Youth",
    "Community Development",
    "Disaster Response",
    "Education",
    "Environment",
    "Health & Medicine",
    "Homelessness & Housing",
    "Hunger",
    "Seniors",
    "Veterans",
];

pub const SKILLS: &[&str] = &[
    "Accounting",
    "Administrative",
    "Carpentry",
    "Coaching",
    "Construction",
    "Cooking",
    "Counseling",
    "Data Entry",
    "Driving",
    "Event Planning",
    "exampleSkill",
    "First Aid",
    "Fundraising",
    "Graphic Design",
    "Legal",
    "Marketing",
    "Medical",
    "Photography",
    "Public Speaking",
    "Software Development",
    "Teaching",
    "Translation",
    "Tutoring",
    "Writing",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeRange {
    #[serde(rename = "13-19")]
    Teen,
    #[serde(rename = "20-29")]
    Twenties,
    #[serde(rename = "30-39")]
    Thirties,
    #[serde(rename = "40-49")]
    Forties,
    #[serde(rename = "50-59")]
    Fifties,
    #[serde(rename = "60-69")]
    Sixties,
    #[serde(rename = "70+")]
    SeventyPlus,
}

impl AgeRange {
    /// Wire labels, in the same order as the variants.
    pub const LABELS: &'static [&'static str] =
        &["13-19", "20-29", "30-39", "40-49", "50-59", "60-69", "70+"];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_match_serde_names() {
        for label in AgeRange::LABELS {
            let parsed: AgeRange = serde_json::from_value(serde_json::json!(label)).unwrap();
            assert_eq!(serde_json::to_value(parsed).unwrap(), *label);
        }
    }
}
