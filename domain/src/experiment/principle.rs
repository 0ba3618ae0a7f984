//! Ethical decision principles

use serde::{Deserialize, Serialize};

/// A named ethical framework the model is asked to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Principle {
    None,
    Utilitarian,
    Deontology,
    Care,
    Risk,
    Fairness,
    SelfDetermination,
}

impl Principle {
    pub const ALL: [Principle; 7] = [
        Principle::None,
        Principle::Utilitarian,
        Principle::Deontology,
        Principle::Care,
        Principle::Risk,
        Principle::Fairness,
        Principle::SelfDetermination,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Principle::None => "none",
            Principle::Utilitarian => "utilitarian",
            Principle::Deontology => "deontology",
            Principle::Care => "care",
            Principle::Risk => "risk",
            Principle::Fairness => "fairness",
            Principle::SelfDetermination => "self_determination",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Principle::None => "なし（AIデフォルト）",
            Principle::Utilitarian => "功利主義（期待値最大化）",
            Principle::Deontology => "義務論（ルール・権利優先）",
            Principle::Care => "ケアの倫理（関係性重視）",
            Principle::Risk => "リスク回避（最悪ケース回避）",
            Principle::Fairness => "公平性（平等な扱い）",
            Principle::SelfDetermination => "自己決定（本人の意思尊重）",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Principle::None => "モデルの標準的な判断に任せる",
            Principle::Utilitarian => "救える利益（人数×確率など）が最大の選択を優先",
            Principle::Deontology => "禁止事項や権利侵害を避け、手段の正しさを優先",
            Principle::Care => "当事者同士の関係や弱い立場の人への配慮を優先",
            Principle::Risk => "取り返しのつかない最悪の結果を避ける選択を優先",
            Principle::Fairness => "誰かを特別扱いせず、等しく扱う選択を優先",
            Principle::SelfDetermination => "当事者本人の意思や同意を最も尊重",
        }
    }
}

impl std::fmt::Display for Principle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl std::str::FromStr for Principle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Principle::ALL
            .into_iter()
            .find(|p| p.id() == s)
            .ok_or_else(|| format!("unknown principle: {}", s))
    }
}
