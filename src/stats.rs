//! Rating aggregation.
//!
//! One pure function computes per-dimension averages for any review type, so
//! course pages, lecturer pages and the dashboard agree on the numbers.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;
use std::ops::RangeInclusive;

use crate::constants::NOT_ENOUGH_REVIEWS;

/// A rating dimension of some review type.
pub trait RatingField: Copy + Eq + Hash + Debug {
    /// Wire name of the dimension.
    fn key(&self) -> &'static str;

    /// Whether the dimension contributes to the composite "overall" score.
    fn in_overall(&self) -> bool;
}

/// Scores a reviewer can give; anything else means the dimension was not rated.
pub const RATING_RANGE: RangeInclusive<u8> = 1..=5;

/// A review that carries a score for each dimension in `F`.
pub trait Rated<F: RatingField> {
    /// Score for `field`, 0 when the review does not rate it.
    fn rating(&self, field: F) -> u8;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CourseRatingField {
    Interest,
    Difficulty,
    Workload,
    TeachingQuality,
    Recommendation,
}

impl CourseRatingField {
    pub const ALL: [CourseRatingField; 5] = [
        CourseRatingField::Interest,
        CourseRatingField::Difficulty,
        CourseRatingField::Workload,
        CourseRatingField::TeachingQuality,
        CourseRatingField::Recommendation,
    ];
}

impl RatingField for CourseRatingField {
    fn key(&self) -> &'static str {
        match self {
            CourseRatingField::Interest => "interest",
            CourseRatingField::Difficulty => "difficulty",
            CourseRatingField::Workload => "workload",
            CourseRatingField::TeachingQuality => "teachingQuality",
            CourseRatingField::Recommendation => "recommendation",
        }
    }

    // Difficulty and recommendation are shown on their own
    fn in_overall(&self) -> bool {
        matches!(
            self,
            CourseRatingField::Interest | CourseRatingField::Workload | CourseRatingField::TeachingQuality
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LecturerRatingField {
    Clarity,
    Responsiveness,
    Availability,
    Organization,
    Knowledge,
}

impl LecturerRatingField {
    pub const ALL: [LecturerRatingField; 5] = [
        LecturerRatingField::Clarity,
        LecturerRatingField::Responsiveness,
        LecturerRatingField::Availability,
        LecturerRatingField::Organization,
        LecturerRatingField::Knowledge,
    ];
}

impl RatingField for LecturerRatingField {
    fn key(&self) -> &'static str {
        match self {
            LecturerRatingField::Clarity => "clarity",
            LecturerRatingField::Responsiveness => "responsiveness",
            LecturerRatingField::Availability => "availability",
            LecturerRatingField::Organization => "organization",
            LecturerRatingField::Knowledge => "knowledge",
        }
    }

    fn in_overall(&self) -> bool {
        true
    }
}

/// Averages over a non-empty set of reviews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingStats<F> {
    /// Number of reviews aggregated
    pub count: usize,
    /// Mean of each requested dimension, rounded to one decimal
    pub averages: Vec<(F, f64)>,
    /// Mean of the requested dimensions that count toward overall, rounded to one decimal
    pub overall: Option<f64>,
}

impl<F: RatingField> RatingStats<F> {
    pub fn average(&self, field: F) -> Option<f64> {
        self.averages
            .iter()
            .find(|(candidate, _)| *candidate == field)
            .map(|(_, average)| *average)
    }
}

pub type CourseStats = RatingStats<CourseRatingField>;
pub type LecturerStats = RatingStats<LecturerRatingField>;

/// Aggregate `fields` over `reviews`.
///
/// Each dimension is averaged over the reviews that rate it; a dimension no
/// review rates is left out. Returns `None` when there is nothing to average,
/// so callers render the "not enough reviews" state instead of a NaN.
pub fn aggregate_ratings<F, R>(reviews: &[R], fields: &[F]) -> Option<RatingStats<F>>
where
    F: RatingField,
    R: Rated<F>,
{
    if reviews.is_empty() || fields.is_empty() {
        return None;
    }

    let raw_means: Vec<(F, f64)> = fields
        .iter()
        .filter_map(|&field| {
            let scores: Vec<u32> = reviews
                .iter()
                .map(|review| review.rating(field))
                .filter(|score| RATING_RANGE.contains(score))
                .map(u32::from)
                .collect();
            if scores.is_empty() {
                return None;
            }
            Some((field, f64::from(scores.iter().sum::<u32>()) / scores.len() as f64))
        })
        .collect();
    if raw_means.is_empty() {
        return None;
    }

    let overall_means: Vec<f64> = raw_means
        .iter()
        .filter(|(field, _)| field.in_overall())
        .map(|(_, mean)| *mean)
        .collect();
    let overall = if overall_means.is_empty() {
        None
    } else {
        Some(round_one_decimal(
            overall_means.iter().sum::<f64>() / overall_means.len() as f64,
        ))
    };

    Some(RatingStats {
        count: reviews.len(),
        averages: raw_means
            .into_iter()
            .map(|(field, mean)| (field, round_one_decimal(mean)))
            .collect(),
        overall,
    })
}

/// All five course dimensions.
pub fn course_stats<R: Rated<CourseRatingField>>(reviews: &[R]) -> Option<CourseStats> {
    aggregate_ratings(reviews, &CourseRatingField::ALL)
}

/// All five lecturer dimensions.
pub fn lecturer_stats<R: Rated<LecturerRatingField>>(reviews: &[R]) -> Option<LecturerStats> {
    aggregate_ratings(reviews, &LecturerRatingField::ALL)
}

pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Render an average, or the "not enough reviews" label when there is none.
pub fn display_average(average: Option<f64>) -> String {
    match average {
        Some(value) => format!("{value:.1}"),
        None => NOT_ENOUGH_REVIEWS.to_string(),
    }
}
