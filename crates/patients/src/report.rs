//! Printable daily visit report.

use core::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::view::{dash_if_blank, hhmm};
use crate::visit::VisitRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    /// 1-based position in time order.
    pub number: usize,
    pub time: String,
    pub name: String,
    pub class_or_role: String,
    pub complaint: String,
    pub diagnosis: String,
    pub medicine_given: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub date: NaiveDate,
    pub printed_at: DateTime<Utc>,
    pub total: usize,
    pub students: usize,
    pub staff: usize,
    pub entries: Vec<ReportEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DailyReport {
    Empty { date: NaiveDate },
    Summary(ReportSummary),
}

impl DailyReport {
    /// Build the report for `date` from the visit cache.
    ///
    /// Only exact date matches count. An empty day short-circuits to
    /// `DailyReport::Empty` before any sorting or counting.
    pub fn generate(visits: &[VisitRecord], date: NaiveDate, printed_at: DateTime<Utc>) -> Self {
        let mut day: Vec<&VisitRecord> = visits.iter().filter(|v| v.is_on(date)).collect();
        if day.is_empty() {
            return DailyReport::Empty { date };
        }

        day.sort_by(|a, b| a.visit_time.cmp(&b.visit_time).then(a.id.cmp(&b.id)));

        let total = day.len();
        let students = day.iter().filter(|v| v.is_student()).count();

        let entries = day
            .iter()
            .enumerate()
            .map(|(idx, v)| ReportEntry {
                number: idx + 1,
                time: hhmm(v.visit_time),
                name: v.name.clone(),
                class_or_role: v.class_or_role.clone(),
                complaint: v.complaint.clone(),
                diagnosis: dash_if_blank(v.diagnosis.as_deref()),
                medicine_given: dash_if_blank(v.medicine_given.as_deref()),
            })
            .collect();

        DailyReport::Summary(ReportSummary {
            date,
            printed_at,
            total,
            students,
            staff: total - students,
            entries,
        })
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            DailyReport::Empty { date } => *date,
            DailyReport::Summary(s) => s.date,
        }
    }

    pub fn total(&self) -> usize {
        match self {
            DailyReport::Empty { .. } => 0,
            DailyReport::Summary(s) => s.total,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, DailyReport::Empty { .. })
    }
}

impl fmt::Display for DailyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DailyReport::Empty { date } => write!(f, "No patient visits on {date}"),
            DailyReport::Summary(s) => fmt::Display::fmt(s, f),
        }
    }
}

impl fmt::Display for ReportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "UKS Daily Patient Report")?;
        writeln!(f, "Date: {}", self.date)?;
        writeln!(f, "School Health Unit")?;
        writeln!(f)?;
        writeln!(f, "Total visits: {}", self.total)?;
        writeln!(f, "Students: {}", self.students)?;
        writeln!(f, "Teachers/Staff: {}", self.staff)?;
        writeln!(f)?;
        writeln!(
            f,
            "No | Time | Name | Class/Role | Complaint | Diagnosis | Medicine Given"
        )?;
        for e in &self.entries {
            writeln!(
                f,
                "{} | {} | {} | {} | {} | {} | {}",
                e.number, e.time, e.name, e.class_or_role, e.complaint, e.diagnosis, e.medicine_given
            )?;
        }
        writeln!(f)?;
        writeln!(f, "UKS Officer: _________________")?;
        write!(
            f,
            "Printed at: {}",
            self.printed_at.format("%Y-%m-%d %H:%M:%S UTC")
        )
    }
}
