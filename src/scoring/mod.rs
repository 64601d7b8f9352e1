//! Deterministic reduction of an oracle judgment to a 0-100 EcoScore.
//!
//! Every signal has a capped contribution so that no single category (say,
//! an oracle listing twenty certifications) can dominate the total:
//!
//! | signal                  | per item | cap |
//! |-------------------------|----------|-----|
//! | sustainability certs    | +20      | 40  |
//! | eco-friendly keywords   | +5       | 20  |
//! | material score          | as given | 35  |
//! | shipping weight         | 10/7/3/0 | 10  |
//! | eco warnings            | -5       | 15  |
//!
//! The weights are product decisions, not derived constants.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::oracle::OracleJudgment;

pub const CERT_POINTS_EACH: u32 = 20;
pub const CERT_POINTS_CAP: u32 = 40;
pub const KEYWORD_POINTS_EACH: u32 = 5;
pub const KEYWORD_POINTS_CAP: u32 = 20;
pub const MATERIAL_POINTS_CAP: u32 = 35;
pub const WARNING_PENALTY_EACH: u32 = 5;
pub const WARNING_PENALTY_CAP: u32 = 15;
pub const MAX_SCORE: u8 = 100;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoreError {
    #[error("judgment is missing material_score")]
    MissingMaterialScore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShippingWeight {
    Light,
    Medium,
    Heavy,
    Unrecognized,
}

impl ShippingWeight {
    /// Case-insensitive; anything outside the three known categories is
    /// `Unrecognized` rather than an error.
    pub fn parse(category: &str) -> Self {
        match category.trim().to_ascii_lowercase().as_str() {
            "light" => Self::Light,
            "medium" => Self::Medium,
            "heavy" => Self::Heavy,
            _ => Self::Unrecognized,
        }
    }

    pub fn points(self) -> u32 {
        match self {
            Self::Light => 10,
            Self::Medium => 7,
            Self::Heavy => 3,
            Self::Unrecognized => 0,
        }
    }
}

/// Capped contribution of each signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ScoreBreakdown {
    pub certifications: u32,
    pub keywords: u32,
    pub materials: u32,
    pub shipping: u32,
    pub warning_penalty: u32,
}

impl ScoreBreakdown {
    pub fn from_judgment(judgment: &OracleJudgment) -> Result<Self, ScoreError> {
        let material_score = judgment
            .material_score
            .ok_or(ScoreError::MissingMaterialScore)?;

        Ok(Self {
            certifications: capped(judgment.sustain_certs.len(), CERT_POINTS_EACH, CERT_POINTS_CAP),
            keywords: capped(
                judgment.eco_friendly_keywords.len(),
                KEYWORD_POINTS_EACH,
                KEYWORD_POINTS_CAP,
            ),
            materials: material_points(material_score),
            shipping: ShippingWeight::parse(&judgment.shipping_weight_category).points(),
            warning_penalty: capped(
                judgment.eco_warnings.len(),
                WARNING_PENALTY_EACH,
                WARNING_PENALTY_CAP,
            ),
        })
    }

    /// Sum of contributions minus the penalty, clamped to [0, 100].
    pub fn total(&self) -> u8 {
        let gains = self.certifications + self.keywords + self.materials + self.shipping;
        let raw = gains.saturating_sub(self.warning_penalty);
        raw.min(MAX_SCORE as u32) as u8
    }
}

/// What the caller gets back: the score plus the judgment fields for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EcoScoreResult {
    pub score: u8,
    pub detected_materials: Vec<String>,
    pub sustain_certs: Vec<String>,
    pub shipping_weight_category: String,
    pub eco_friendly_keywords: Vec<String>,
    pub eco_warnings: Vec<String>,
    pub explanation: String,
}

/// Score a judgment. Pure: same judgment in, same score out.
pub fn score(judgment: &OracleJudgment) -> Result<u8, ScoreError> {
    Ok(ScoreBreakdown::from_judgment(judgment)?.total())
}

/// Score a judgment and carry its display fields into the result.
pub fn evaluate(judgment: OracleJudgment) -> Result<EcoScoreResult, ScoreError> {
    let score = score(&judgment)?;

    Ok(EcoScoreResult {
        score,
        detected_materials: judgment.detected_materials,
        sustain_certs: judgment.sustain_certs,
        shipping_weight_category: judgment.shipping_weight_category,
        eco_friendly_keywords: judgment.eco_friendly_keywords,
        eco_warnings: judgment.eco_warnings,
        explanation: judgment.explanation,
    })
}

fn capped(count: usize, each: u32, cap: u32) -> u32 {
    // Anything past cap/each items is already at the cap.
    let count = count.min(cap as usize) as u32;
    (count * each).min(cap)
}

fn material_points(material_score: f64) -> u32 {
    // NaN falls through clamp unchanged; treat it as no material credit.
    if material_score.is_nan() {
        return 0;
    }
    material_score.clamp(0.0, MATERIAL_POINTS_CAP as f64).round() as u32
}
