use serde::{Deserialize, Serialize};

use crate::domain::types::{CrewId, CrewName, PersonName, UserId};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Crew {
    pub id: CrewId,
    pub name: CrewName,
    pub supervisor_id: UserId,
    pub supervisor_name: PersonName,
    pub active: bool,
    pub members: Vec<PersonName>,
}

impl Crew {
    /// Returns a copy with `updates` applied; identity and active flag are kept.
    pub fn updated(&self, updates: &UpdateCrew) -> Self {
        Self {
            id: self.id.clone(),
            name: updates.name.clone(),
            supervisor_id: updates.supervisor_id.clone(),
            supervisor_name: updates.supervisor_name.clone(),
            active: self.active,
            members: dedup_members(updates.members.clone()),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewCrew {
    pub name: CrewName,
    pub supervisor_id: UserId,
    pub supervisor_name: PersonName,
    pub members: Vec<PersonName>,
}

impl NewCrew {
    pub fn into_crew(self) -> Crew {
        Crew {
            id: CrewId::generate(),
            name: self.name,
            supervisor_id: self.supervisor_id,
            supervisor_name: self.supervisor_name,
            active: true,
            members: dedup_members(self.members),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct UpdateCrew {
    pub name: CrewName,
    pub supervisor_id: UserId,
    pub supervisor_name: PersonName,
    pub members: Vec<PersonName>,
}

/// Drops repeated member names, keeping the first occurrence.
fn dedup_members(members: Vec<PersonName>) -> Vec<PersonName> {
    let mut result: Vec<PersonName> = Vec::with_capacity(members.len());
    for member in members {
        if !result.contains(&member) {
            result.push(member);
        }
    }
    result
}
