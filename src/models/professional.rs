//! Professional and availability catalog models.
//!
//! A professional is the person who delivers sessions. The catalog holds
//! every professional with their display name, color and weekly
//! availability, in insertion order.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::WeeklyAvailability;

/// A professional who can be assigned sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Professional {
    /// Unique identifier (referenced by the role table).
    pub id: String,
    /// Display name. Assignments and conflicts cite this name.
    pub name: String,
    /// Display color (`#RRGGBB`).
    pub color: String,
    /// Weekly availability template.
    #[serde(default)]
    pub availability: WeeklyAvailability,
}

/// Rejected catalog edit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// No professional with this id.
    #[error("unknown professional '{0}'")]
    UnknownProfessional(String),
    /// A required field was left blank.
    #[error("{0} must not be empty")]
    MissingField(&'static str),
}

impl Professional {
    /// Creates a professional with no availability.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: super::service::FALLBACK_COLOR.to_string(),
            availability: WeeklyAvailability::new(),
        }
    }

    /// Sets the color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Sets the availability template.
    pub fn with_availability(mut self, availability: WeeklyAvailability) -> Self {
        self.availability = availability;
        self
    }
}

/// Professional → weekly availability, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AvailabilityCatalog {
    professionals: Vec<Professional>,
}

impl AvailabilityCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a professional, replacing any existing entry with the same id.
    pub fn with_professional(mut self, professional: Professional) -> Self {
        self.upsert(professional);
        self
    }

    /// Inserts or replaces by id. Replacement keeps the original position.
    pub fn upsert(&mut self, professional: Professional) {
        match self.professionals.iter_mut().find(|p| p.id == professional.id) {
            Some(slot) => *slot = professional,
            None => self.professionals.push(professional),
        }
    }

    /// Looks up a professional by id.
    pub fn get(&self, id: &str) -> Option<&Professional> {
        self.professionals.iter().find(|p| p.id == id)
    }

    /// Looks up a professional by display name.
    pub fn find_by_name(&self, name: &str) -> Option<&Professional> {
        self.professionals.iter().find(|p| p.name == name)
    }

    /// Iterates professionals in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Professional> {
        self.professionals.iter()
    }

    pub fn len(&self) -> usize {
        self.professionals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.professionals.is_empty()
    }

    /// Renames a professional.
    pub fn rename(&mut self, id: &str, name: impl Into<String>) -> Result<(), ConfigError> {
        self.get_mut(id)?.name = name.into();
        Ok(())
    }

    /// Changes a professional's color.
    pub fn recolor(&mut self, id: &str, color: impl Into<String>) -> Result<(), ConfigError> {
        self.get_mut(id)?.color = color.into();
        Ok(())
    }

    /// Replaces a professional's availability.
    pub fn set_availability(
        &mut self,
        id: &str,
        availability: WeeklyAvailability,
    ) -> Result<(), ConfigError> {
        self.get_mut(id)?.availability = availability;
        Ok(())
    }

    /// Removes a professional and returns it.
    pub fn remove(&mut self, id: &str) -> Result<Professional, ConfigError> {
        let pos = self
            .professionals
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| ConfigError::UnknownProfessional(id.to_string()))?;
        Ok(self.professionals.remove(pos))
    }

    /// Registers a new professional available every weekday hour.
    ///
    /// The id is the specialty lower-cased with whitespace removed,
    /// suffixed with a number when that id is already taken.
    ///
    /// # Returns
    /// The generated id.
    pub fn add_professional(
        &mut self,
        name: &str,
        specialty: &str,
        color: &str,
    ) -> Result<String, ConfigError> {
        if name.trim().is_empty() {
            return Err(ConfigError::MissingField("name"));
        }
        let base: String = specialty
            .to_lowercase()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        if base.is_empty() {
            return Err(ConfigError::MissingField("specialty"));
        }

        let mut id = base.clone();
        let mut suffix = 2;
        while self.get(&id).is_some() {
            id = format!("{base}{suffix}");
            suffix += 1;
        }

        self.professionals.push(
            Professional::new(id.clone(), name.trim())
                .with_color(color)
                .with_availability(WeeklyAvailability::full_week()),
        );
        Ok(id)
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Professional, ConfigError> {
        self.professionals
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ConfigError::UnknownProfessional(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Day, TimeSlot};

    fn sample_catalog() -> AvailabilityCatalog {
        AvailabilityCatalog::new()
            .with_professional(
                Professional::new("physio", "Mylena").with_color("#10B981").with_availability(
                    WeeklyAvailability::new().with_day(Day::Monday, vec![TimeSlot::H08]),
                ),
            )
            .with_professional(Professional::new("psych", "Ana Luiza"))
    }

    #[test]
    fn test_lookup() {
        let c = sample_catalog();
        assert_eq!(c.len(), 2);
        assert_eq!(c.get("physio").unwrap().name, "Mylena");
        assert_eq!(c.find_by_name("Ana Luiza").unwrap().id, "psych");
        assert!(c.get("nobody").is_none());
    }

    #[test]
    fn test_upsert_keeps_position() {
        let mut c = sample_catalog();
        c.upsert(Professional::new("physio", "Renamed"));
        let ids: Vec<_> = c.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["physio", "psych"]);
        assert_eq!(c.get("physio").unwrap().name, "Renamed");
    }

    #[test]
    fn test_rename_recolor_remove() {
        let mut c = sample_catalog();
        c.rename("psych", "Ana").unwrap();
        c.recolor("psych", "#EC4899").unwrap();
        assert_eq!(c.get("psych").unwrap().name, "Ana");
        assert_eq!(c.get("psych").unwrap().color, "#EC4899");

        let removed = c.remove("physio").unwrap();
        assert_eq!(removed.name, "Mylena");
        assert_eq!(c.len(), 1);

        assert_eq!(
            c.rename("physio", "x"),
            Err(ConfigError::UnknownProfessional("physio".into()))
        );
    }

    #[test]
    fn test_add_professional() {
        let mut c = sample_catalog();
        let id = c.add_professional("Bia", "Speech Therapy", "#6366F1").unwrap();
        assert_eq!(id, "speechtherapy");
        let p = c.get(&id).unwrap();
        assert_eq!(p.name, "Bia");
        assert_eq!(p.availability.slot_count(), 20);

        let id2 = c.add_professional("Caio", "speech therapy", "#6366F1").unwrap();
        assert_eq!(id2, "speechtherapy2");
    }

    #[test]
    fn test_add_professional_requires_fields() {
        let mut c = AvailabilityCatalog::new();
        assert_eq!(
            c.add_professional("  ", "Psychology", "#000000"),
            Err(ConfigError::MissingField("name"))
        );
        assert_eq!(
            c.add_professional("Ana", " ", "#000000"),
            Err(ConfigError::MissingField("specialty"))
        );
        assert!(c.is_empty());
    }
}
