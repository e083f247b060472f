//! Health tips reference data.

use serde::{Deserialize, Serialize};
use std::fmt;

/// General wellness tips. Also the fallback when the tips store is unavailable.
pub const GENERAL_TIPS: &[&str] = &[
    "Drink at least 8 glasses of water daily",
    "Get 7-9 hours of sleep each night",
    "Exercise for at least 30 minutes daily",
    "Eat 5 servings of fruits and vegetables daily",
    "Practice stress management techniques",
    "Wash hands frequently to prevent infections",
    "Maintain good posture throughout the day",
    "Take regular breaks from screen time",
    "Practice deep breathing exercises",
    "Schedule regular health checkups",
];

/// Nutrition tips.
pub const NUTRITION_TIPS: &[&str] = &[
    "Choose whole grains over refined grains",
    "Limit processed and sugary foods",
    "Include protein in every meal",
    "Cook meals at home when possible",
    "Read nutrition labels carefully",
];

/// Mental health tips.
pub const MENTAL_HEALTH_TIPS: &[&str] = &[
    "Practice mindfulness and meditation",
    "Stay connected with friends and family",
    "Engage in hobbies you enjoy",
    "Seek professional help when needed",
    "Maintain a positive outlook",
];

/// Condition-specific tips keyed by condition pattern.
pub const CONDITION_TIPS: &[(&str, &[&str])] = &[
    (
        "common_cold",
        &[
            "Rest and keep warm while your body fights the cold",
            "Sip warm fluids such as tea with honey to soothe your throat",
            "Use saline nasal spray to relieve congestion",
        ],
    ),
    (
        "flu",
        &[
            "Stay home and rest until the fever has been gone for 24 hours",
            "Keep hydrated with water, broth and electrolyte drinks",
            "Consider a yearly flu vaccination",
        ],
    ),
    (
        "pneumonia",
        &[
            "Seek medical care promptly if breathing becomes difficult",
            "Finish the full course of any prescribed medication",
        ],
    ),
    (
        "gastroenteritis",
        &[
            "Replace lost fluids with small, frequent sips of oral rehydration solution",
            "Return to bland foods such as rice and toast gradually",
        ],
    ),
    (
        "migraine",
        &[
            "Rest in a dark, quiet room during an attack",
            "Keep a headache diary to identify your triggers",
        ],
    ),
    (
        "allergic_reaction",
        &[
            "Avoid known allergens and read ingredient labels",
            "Seek emergency care if your throat or face starts to swell",
        ],
    ),
    (
        "urinary_tract_infection",
        &[
            "Drink plenty of water to help flush out bacteria",
            "Avoid caffeine and alcohol until symptoms clear",
            "Do not delay urination when you feel the urge",
        ],
    ),
    (
        "infection",
        &[
            "Watch for a rising fever and contact a doctor if it persists",
            "Wash hands often to avoid spreading infection",
        ],
    ),
    (
        "arthritis",
        &[
            "Keep joints moving with gentle, low-impact exercise",
            "Apply warm or cold packs to ease joint pain",
            "Maintain a healthy weight to reduce joint stress",
        ],
    ),
    (
        "anxiety_disorder",
        &[
            "Practice slow breathing when you feel anxious",
            "Limit caffeine, which can worsen anxiety",
        ],
    ),
    (
        "depression",
        &[
            "Keep a regular daily routine, including sleep and meals",
            "Reach out to someone you trust about how you feel",
        ],
    ),
    (
        "diabetes",
        &[
            "Monitor your blood sugar as advised by your doctor",
            "Choose high-fibre, low-glycaemic foods",
            "Check your feet daily for cuts or sores",
        ],
    ),
    (
        "hypertension",
        &[
            "Reduce salt in your diet",
            "Check your blood pressure regularly",
        ],
    ),
    (
        "hypotension",
        &[
            "Stand up slowly to avoid dizziness",
            "Drink enough fluids throughout the day",
        ],
    ),
    (
        "anemia",
        &[
            "Eat iron-rich foods such as leafy greens, beans and lean meat",
            "Pair iron-rich foods with vitamin C to improve absorption",
        ],
    ),
    (
        "heart_disease",
        &[
            "Call emergency services for chest pain that does not go away",
            "Follow a heart-healthy diet low in saturated fat",
        ],
    ),
    (
        "acid_reflux",
        &[
            "Avoid eating within 3 hours of bedtime",
            "Eat smaller meals and limit spicy or fatty foods",
        ],
    ),
    (
        "insomnia",
        &[
            "Go to bed and wake up at the same time every day",
            "Avoid screens for an hour before bed",
        ],
    ),
];

/// Category of a health tip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TipCategory {
    /// General wellness.
    #[default]
    General,
    /// Diet and nutrition.
    Nutrition,
    /// Mental wellbeing.
    MentalHealth,
    /// Tied to a specific condition.
    Condition,
}

impl TipCategory {
    /// Returns all categories.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::General,
            Self::Nutrition,
            Self::MentalHealth,
            Self::Condition,
        ]
    }

    /// Returns the category as stored.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Nutrition => "nutrition",
            Self::MentalHealth => "mental_health",
            Self::Condition => "condition",
        }
    }

    /// Parses a category from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "general" => Some(Self::General),
            "nutrition" => Some(Self::Nutrition),
            "mental_health" | "mental-health" | "mentalhealth" => Some(Self::MentalHealth),
            "condition" => Some(Self::Condition),
            _ => None,
        }
    }
}

impl fmt::Display for TipCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A health tip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tip {
    /// Tip category.
    pub category: TipCategory,
    /// Associated condition pattern, for condition-specific tips.
    pub condition: Option<String>,
    /// Tip text.
    pub text: String,
}

impl Tip {
    /// Creates a category tip.
    #[must_use]
    pub fn new(category: TipCategory, text: impl Into<String>) -> Self {
        Self {
            category,
            condition: None,
            text: text.into(),
        }
    }

    /// Creates a condition-specific tip.
    #[must_use]
    pub fn for_condition(condition: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            category: TipCategory::Condition,
            condition: Some(condition.into()),
            text: text.into(),
        }
    }

    /// Returns every built-in tip, in seeding order.
    #[must_use]
    pub fn builtin() -> Vec<Self> {
        let categories = [
            (TipCategory::General, GENERAL_TIPS),
            (TipCategory::Nutrition, NUTRITION_TIPS),
            (TipCategory::MentalHealth, MENTAL_HEALTH_TIPS),
        ];
        categories
            .iter()
            .flat_map(|(category, texts)| texts.iter().map(move |text| Self::new(*category, *text)))
            .chain(CONDITION_TIPS.iter().flat_map(|(condition, texts)| {
                texts.iter().map(move |text| Self::for_condition(*condition, *text))
            }))
            .collect()
    }
}
