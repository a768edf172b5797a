//! Shared value types for the health diary domain.
//!
//! Unlike the newtype identifiers in [`crate::identifiers`], these types carry
//! values with invariants (health scores are in `[0, 100]`, timestamps are
//! UTC) and participate in domain computations.
//!
//! Field names match the JSON exchanged with the collaborators and with
//! gateway callers, so every type here serialises directly onto the wire.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{ClassificationCode, ComplaintId, OwnerId};

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly. Displays and serialises as RFC 3339 with a `Z` suffix, with
/// fractional seconds as microseconds when present (`.250000Z`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Offset-less layouts the storage service has been seen to emit. They are
    /// read as UTC.
    const NAIVE_FORMATS: [&'static str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    /// Returns the current UTC time as a [`Timestamp`].
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a [`Timestamp`] from a [`DateTime<Utc>`].
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Parses a stored creation timestamp.
    ///
    /// Accepts RFC 3339 (`Z` or a numeric offset) and ISO 8601 without an
    /// offset, which is taken to be UTC. Returns `None` for anything else,
    /// including the empty string.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(Self(dt.with_timezone(&Utc)));
        }
        Self::NAIVE_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .map(|naive| Self(Utc.from_utc_datetime(&naive)))
    }

    /// Returns the instant `days` whole days before this one.
    pub fn days_before(self, days: i64) -> Self {
        Self(self.0 - chrono::Duration::days(days))
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let precision = if self.0.timestamp_subsec_nanos() == 0 {
            SecondsFormat::Secs
        } else {
            SecondsFormat::Micros
        };
        write!(f, "{}", self.0.to_rfc3339_opts(precision, true))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ---------------------------------------------------------------------------
// Lenient decoding of collaborator fields
//
// Records coming back from the collaborators are loosely validated. A field
// of the wrong shape degrades to "absent" instead of failing the whole body.
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrOther {
    Text(String),
    Other(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrOther {
    Number(f64),
    Other(IgnoredAny),
}

/// Strings are kept verbatim; null, numbers and anything else become `None`.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<TextOrOther>::deserialize(deserializer)? {
        Some(TextOrOther::Text(text)) => Some(text),
        Some(TextOrOther::Other(_)) | None => None,
    })
}

/// Empty or non-string codes are treated as no code.
fn lenient_code<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<ClassificationCode>, D::Error> {
    Ok(lenient_text(deserializer)?.and_then(ClassificationCode::new))
}

/// Any number is accepted as-is; null or a non-number reads as zero.
fn lenient_confidence<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Confidence, D::Error> {
    Ok(match Option::<NumberOrOther>::deserialize(deserializer)? {
        Some(NumberOrOther::Number(value)) => Confidence(value),
        Some(NumberOrOther::Other(_)) | None => Confidence::default(),
    })
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Classifier confidence, nominally in `[0.0, 1.0]`.
///
/// Carried through unchanged; nothing downstream scores on it. Values built
/// in code go through [`Confidence::new`]; values decoded from the classifier
/// are taken as sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Confidence(f64);

impl Confidence {
    /// Creates a [`Confidence`], returning `None` if `value` is outside
    /// the valid range `[0.0, 1.0]`.
    #[must_use]
    pub fn new(value: f64) -> Option<Self> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Returns the confidence as an `f64`.
    pub fn as_f64(self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Output of one call to the classification service.
///
/// Produced once per complaint and never mutated. Only the two codes survive
/// into the stored record; see [`NewComplaint::classified`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Primary-care (ICPC-2) code, if the classifier produced one.
    #[serde(default, deserialize_with = "lenient_code")]
    pub icpc_code: Option<ClassificationCode>,
    /// Diagnosis (ICD-10) code, if the classifier produced one.
    #[serde(default, deserialize_with = "lenient_code")]
    pub icd_code: Option<ClassificationCode>,
    #[serde(default, deserialize_with = "lenient_confidence")]
    pub icpc_confidence: Confidence,
    #[serde(default, deserialize_with = "lenient_confidence")]
    pub icd_confidence: Confidence,
}

// ---------------------------------------------------------------------------
// Complaints
// ---------------------------------------------------------------------------

/// A complaint as submitted by a gateway caller.
///
/// The text is forwarded as-is; an empty body is not rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplaintRequest {
    pub user_id: OwnerId,
    pub text: String,
}

/// The record handed to storage once classification has succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComplaint {
    pub user_id: OwnerId,
    pub text: String,
    pub icpc_code: Option<ClassificationCode>,
    pub icd_code: Option<ClassificationCode>,
}

impl NewComplaint {
    /// Combines a caller's request with the classifier's verdict.
    ///
    /// Confidences are dropped here; null codes are kept as null.
    pub fn classified(request: ComplaintRequest, classification: ClassificationResult) -> Self {
        Self {
            user_id: request.user_id,
            text: request.text,
            icpc_code: classification.icpc_code,
            icd_code: classification.icd_code,
        }
    }
}

/// A complaint as returned by storage. Read-only to the gateway.
///
/// `created_at` is kept as the raw text storage sent (`None` when it sent
/// null, a non-string, or nothing). Aggregation parses it with
/// [`Timestamp::parse`] and skips the record's time-based contributions if
/// that fails. Empty or non-string codes decode as no code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Complaint {
    pub id: ComplaintId,
    pub user_id: OwnerId,
    pub text: String,
    #[serde(default, deserialize_with = "lenient_code")]
    pub icpc_code: Option<ClassificationCode>,
    #[serde(default, deserialize_with = "lenient_code")]
    pub icd_code: Option<ClassificationCode>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub created_at: Option<String>,
}

impl Complaint {
    /// Parsed creation time, or `None` when storage sent something unreadable.
    pub fn created_at(&self) -> Option<Timestamp> {
        self.created_at.as_deref().and_then(Timestamp::parse)
    }
}

// ---------------------------------------------------------------------------
// Health indicators
// ---------------------------------------------------------------------------

/// Health score in `[0, 100]`: 100 minus the number of recent complaints,
/// floored at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HealthScore(u8);

impl HealthScore {
    /// Score of an owner with no complaints inside the window.
    pub const MAX: Self = Self(100);

    /// Derives the score from the number of complaints inside the window.
    pub fn from_windowed_count(count: usize) -> Self {
        let remaining = usize::from(Self::MAX.0).saturating_sub(count);
        // remaining <= 100, so the narrowing cannot truncate.
        Self(remaining as u8)
    }

    /// Returns the score as an integer in `[0, 100]`.
    pub fn as_u8(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for HealthScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Derived per-request summary of an owner's complaint history. Never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthIndicators {
    pub user_id: OwnerId,
    /// Every record storage returned, readable timestamp or not.
    pub total_complaints: usize,
    pub health_score: HealthScore,
    /// Latest readable creation time, `None` when no record had one.
    pub last_complaint_date: Option<Timestamp>,
}
