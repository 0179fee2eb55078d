//! Service → professional role table.
//!
//! Each service type is delivered by exactly one professional, named by
//! catalog id. The table is plain data so it can be swapped in tests or
//! loaded from configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ServiceType;

/// Fixed mapping from service type to the id of its professional.
///
/// A service without an entry is simply not schedulable; allocation
/// skips it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleAssignment {
    roles: BTreeMap<ServiceType, String>,
}

impl RoleAssignment {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps `service` to `professional_id`, replacing any previous entry.
    pub fn with_role(mut self, service: ServiceType, professional_id: impl Into<String>) -> Self {
        self.assign(service, professional_id);
        self
    }

    /// Maps `service` to `professional_id`.
    pub fn assign(&mut self, service: ServiceType, professional_id: impl Into<String>) {
        self.roles.insert(service, professional_id.into());
    }

    /// Removes the entry for `service`.
    pub fn unassign(&mut self, service: ServiceType) -> Option<String> {
        self.roles.remove(&service)
    }

    /// Professional id responsible for `service`.
    pub fn professional_for(&self, service: ServiceType) -> Option<&str> {
        self.roles.get(&service).map(String::as_str)
    }

    /// Services delivered by `professional_id`.
    pub fn services_of<'a>(&'a self, professional_id: &'a str) -> impl Iterator<Item = ServiceType> + 'a {
        self.roles
            .iter()
            .filter(move |(_, id)| id.as_str() == professional_id)
            .map(|(service, _)| *service)
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let roles = RoleAssignment::new()
            .with_role(ServiceType::Psychology, "psych")
            .with_role(ServiceType::Physiotherapy, "physio");

        assert_eq!(roles.professional_for(ServiceType::Psychology), Some("psych"));
        assert_eq!(roles.professional_for(ServiceType::Psychopedagogy), None);
        assert_eq!(roles.len(), 2);
    }

    #[test]
    fn test_reassign_and_unassign() {
        let mut roles = RoleAssignment::new().with_role(ServiceType::Psychology, "a");
        roles.assign(ServiceType::Psychology, "b");
        assert_eq!(roles.professional_for(ServiceType::Psychology), Some("b"));
        assert_eq!(roles.unassign(ServiceType::Psychology), Some("b".to_string()));
        assert!(roles.is_empty());
    }

    #[test]
    fn test_services_of() {
        let roles = RoleAssignment::new()
            .with_role(ServiceType::Psychology, "x")
            .with_role(ServiceType::AttendantTherapy, "x")
            .with_role(ServiceType::Physiotherapy, "y");
        let services: Vec<_> = roles.services_of("x").collect();
        assert_eq!(
            services,
            vec![ServiceType::Psychology, ServiceType::AttendantTherapy]
        );
    }
}
