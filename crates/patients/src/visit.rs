use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use uks_core::{Entity, RecordId};

/// Visit identifier (`pasien.id`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisitId(pub RecordId);

impl VisitId {
    pub const fn new(id: i64) -> Self {
        Self(RecordId::new(id))
    }
}

impl core::fmt::Display for VisitId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// One patient visit to the clinic, as echoed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitRecord {
    pub id: VisitId,
    #[serde(rename = "nama")]
    pub name: String,
    /// Class for students (`Kelas 10A`), job title for staff (`Guru Matematika`).
    #[serde(rename = "kelas_jabatan")]
    pub class_or_role: String,
    #[serde(rename = "tanggal_kunjungan")]
    pub visit_date: NaiveDate,
    #[serde(rename = "waktu_kunjungan", with = "clock_time")]
    pub visit_time: NaiveTime,
    #[serde(rename = "keluhan")]
    pub complaint: String,
    #[serde(rename = "diagnosa", default)]
    pub diagnosis: Option<String>,
    #[serde(rename = "obat_diberikan", default)]
    pub medicine_given: Option<String>,
    #[serde(default, with = "uks_core::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Badge kind derived from the class/role label.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleKind {
    Teacher,
    Staff,
    Student,
    Other,
}

impl RoleKind {
    pub fn classify(label: &str) -> Self {
        let label = label.to_lowercase();
        if label.contains("guru") {
            RoleKind::Teacher
        } else if label.contains("staff") {
            RoleKind::Staff
        } else if label.contains("kelas") {
            RoleKind::Student
        } else {
            RoleKind::Other
        }
    }
}

impl VisitRecord {
    /// Students are recorded with a class label ("Kelas ..."); everyone else
    /// counts as teacher/staff in the daily report.
    pub fn is_student(&self) -> bool {
        self.class_or_role.to_lowercase().contains("kelas")
    }

    pub fn role_kind(&self) -> RoleKind {
        RoleKind::classify(&self.class_or_role)
    }

    pub fn is_on(&self, date: NaiveDate) -> bool {
        self.visit_date == date
    }

    pub fn from_payload(id: VisitId, payload: VisitPayload, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: payload.name,
            class_or_role: payload.class_or_role,
            visit_date: payload.visit_date,
            visit_time: payload.visit_time,
            complaint: payload.complaint,
            diagnosis: payload.diagnosis,
            medicine_given: payload.medicine_given,
            created_at: Some(now),
        }
    }
}

impl Entity for VisitRecord {
    type Id = VisitId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Validated body for `POST /pasien`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitPayload {
    #[serde(rename = "nama")]
    pub name: String,
    #[serde(rename = "kelas_jabatan")]
    pub class_or_role: String,
    #[serde(rename = "tanggal_kunjungan")]
    pub visit_date: NaiveDate,
    #[serde(rename = "waktu_kunjungan", with = "clock_time")]
    pub visit_time: NaiveTime,
    #[serde(rename = "keluhan")]
    pub complaint: String,
    #[serde(rename = "diagnosa", default)]
    pub diagnosis: Option<String>,
    #[serde(rename = "obat_diberikan", default)]
    pub medicine_given: Option<String>,
}

/// `HH:MM` wall-clock time; seconds are accepted on input and dropped on output.
pub(crate) mod clock_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn parse(raw: &str) -> Option<NaiveTime> {
        let raw = raw.trim();
        NaiveTime::parse_from_str(raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
            .ok()
    }

    pub fn serialize<S>(value: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid visit time: {raw}")))
    }
}

pub use clock_time::parse as parse_visit_time;

#[cfg(test)]
pub(crate) fn sample(id: i64, name: &str, role: &str, date: &str, time: &str) -> VisitRecord {
    VisitRecord {
        id: VisitId::new(id),
        name: name.to_string(),
        class_or_role: role.to_string(),
        visit_date: date.parse().unwrap(),
        visit_time: parse_visit_time(time).unwrap(),
        complaint: "Sakit kepala".to_string(),
        diagnosis: None,
        medicine_given: None,
        created_at: None,
    }
}
