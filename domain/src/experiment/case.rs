//! Predefined thought-experiment scenarios

use serde::Serialize;

/// Case id for a free-form scenario supplied by the caller
pub const CUSTOM_CASE_ID: &str = "custom";

/// A predefined binary thought experiment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThoughtCase {
    pub id: &'static str,
    pub title: &'static str,
    pub scenario_text: &'static str,
    pub option_a: &'static str,
    pub option_b: &'static str,
}

const CASES: &[ThoughtCase] = &[
    ThoughtCase {
        id: "trolley",
        title: "トロッコ問題（標準）",
        scenario_text: "暴走するトロッコが5人に向かっている。あなたはレバーで進路を切り替えられる。",
        option_a: "レバーを引く（5人救う/1人犠牲）",
        option_b: "何もしない（5人犠牲）",
    },
    ThoughtCase {
        id: "theseus",
        title: "テセウスの船（短文）",
        scenario_text: "部品をすべて交換した船と、元の部品で組み直した船がある。どちらが本物か？",
        option_a: "同じ船",
        option_b: "別の船",
    },
    ThoughtCase {
        id: CUSTOM_CASE_ID,
        title: "カスタム",
        scenario_text: "",
        option_a: "",
        option_b: "",
    },
];

impl ThoughtCase {
    /// All cases, including the custom placeholder
    pub fn all() -> &'static [ThoughtCase] {
        CASES
    }

    /// Look up a case by id
    pub fn find(id: &str) -> Option<&'static ThoughtCase> {
        CASES.iter().find(|c| c.id == id)
    }

    /// Whether the scenario text comes from the caller rather than the catalog
    pub fn is_custom(&self) -> bool {
        self.id == CUSTOM_CASE_ID
    }
}
