//! Patient and demand models.
//!
//! The demand table records, for each patient, how many weekly sessions
//! of each service they need. Table order (patients, then services within
//! a patient) is the order in which allocation serves requirements.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ServiceType;

/// A patient receiving sessions.
///
/// Ordered by id; that order is the fixed patient order used when
/// scanning a grid slot.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Patient(String);

impl Patient {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Patient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Patient {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Required weekly session count for one service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemandRequirement {
    pub service: ServiceType,
    pub sessions: u32,
}

/// All requirements of one patient, in table order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientDemand {
    pub patient: Patient,
    #[serde(default)]
    pub requirements: Vec<DemandRequirement>,
}

/// Patient → service → required session count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DemandTable {
    patients: Vec<PatientDemand>,
}

impl DemandTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a requirement (builder form of [`set_required`](Self::set_required)).
    pub fn with_requirement(
        mut self,
        patient: impl Into<Patient>,
        service: ServiceType,
        sessions: u32,
    ) -> Self {
        self.set_required(patient.into(), service, sessions);
        self
    }

    /// Registers a patient with no requirements yet.
    pub fn with_patient(mut self, patient: impl Into<Patient>) -> Self {
        self.patient_entry(patient.into());
        self
    }

    /// Sets the session count for `(patient, service)`.
    ///
    /// New patients and services are appended, so first insertion fixes
    /// table order.
    pub fn set_required(&mut self, patient: Patient, service: ServiceType, sessions: u32) {
        let entry = self.patient_entry(patient);
        match entry.requirements.iter_mut().find(|r| r.service == service) {
            Some(req) => req.sessions = sessions,
            None => entry.requirements.push(DemandRequirement { service, sessions }),
        }
    }

    /// Sets a session count from raw form input.
    ///
    /// Anything that does not parse as a non-negative integer counts as 0.
    ///
    /// # Returns
    /// The stored count.
    pub fn set_from_input(&mut self, patient: Patient, service: ServiceType, raw: &str) -> u32 {
        let sessions = raw.trim().parse::<u32>().unwrap_or(0);
        self.set_required(patient, service, sessions);
        sessions
    }

    /// Required sessions for `(patient, service)`; 0 when absent.
    pub fn required(&self, patient: &Patient, service: ServiceType) -> u32 {
        self.patients
            .iter()
            .find(|p| &p.patient == patient)
            .and_then(|p| p.requirements.iter().find(|r| r.service == service))
            .map(|r| r.sessions)
            .unwrap_or(0)
    }

    /// Patients in table order.
    pub fn patients(&self) -> impl Iterator<Item = &Patient> {
        self.patients.iter().map(|p| &p.patient)
    }

    /// `(patient, service, sessions)` triples in table order.
    pub fn entries(&self) -> impl Iterator<Item = (&Patient, ServiceType, u32)> {
        self.patients.iter().flat_map(|p| {
            p.requirements
                .iter()
                .map(move |r| (&p.patient, r.service, r.sessions))
        })
    }

    /// Sum of every requirement.
    pub fn total_required(&self) -> u32 {
        self.entries().map(|(_, _, n)| n).sum()
    }

    /// Sum of one patient's requirements.
    pub fn total_for(&self, patient: &Patient) -> u32 {
        self.entries()
            .filter(|(p, _, _)| *p == patient)
            .map(|(_, _, n)| n)
            .sum()
    }

    fn patient_entry(&mut self, patient: Patient) -> &mut PatientDemand {
        let pos = match self.patients.iter().position(|p| p.patient == patient) {
            Some(pos) => pos,
            None => {
                self.patients.push(PatientDemand {
                    patient,
                    requirements: Vec::new(),
                });
                self.patients.len() - 1
            }
        };
        &mut self.patients[pos]
    }
}
