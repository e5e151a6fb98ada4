//! Journeys and the per-session journey store.
//!
//! A journey is the partially-filled answer set of one wizard instance. Each flow type keeps its
//! journeys in a [`JourneyMap`] keyed by [`JourneyId`]; the map lives inside the user's session
//! and is handed to step controllers explicitly.
//!
//! ## Eviction
//!
//! Users routinely abandon wizards half way through. Rather than letting abandoned journeys pile
//! up until the session expires, each map keeps at most `capacity` journeys and evicts the least
//! recently touched one when a new journey pushes it over the cap.

pub mod contact;
pub mod relationship;
pub mod restriction;

pub use contact::{
    AddContactJourney, ContactMode, ContactNames, DateOfBirthAnswer, EmailEntry,
    ExistingContactSummary, IdentityEntry, PhoneNumberEntry, RelationshipAnswers,
};
pub use relationship::ChangeRelationshipTypeJourney;
pub use restriction::{AddRestrictionJourney, RestrictionAnswers, RestrictionClass};

use chrono::{DateTime, Utc};
use contacts_uuid::JourneyId;
use std::collections::HashMap;

/// Common behaviour of every journey type.
pub trait Journey: Clone {
    /// Human-readable flow name used in logs and errors.
    const FLOW: &'static str;

    fn id(&self) -> JourneyId;

    fn last_touched(&self) -> DateTime<Utc>;

    fn touch(&mut self, now: DateTime<Utc>);
}

/// Keyed store of in-progress journeys of one type.
#[derive(Debug, Clone)]
pub struct JourneyMap<J> {
    capacity: usize,
    journeys: HashMap<JourneyId, J>,
}

impl<J: Journey> JourneyMap<J> {
    /// Creates an empty map holding at most `capacity` journeys (minimum 1).
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            journeys: HashMap::new(),
        }
    }

    pub fn get(&self, id: &JourneyId) -> Option<&J> {
        self.journeys.get(id)
    }

    pub fn get_mut(&mut self, id: &JourneyId) -> Option<&mut J> {
        self.journeys.get_mut(id)
    }

    /// Inserts or replaces a journey, then evicts the least recently touched journeys until the
    /// map is within capacity. The journey just stored is never evicted.
    ///
    /// # Returns
    ///
    /// The journeys that were evicted, oldest first.
    pub fn put(&mut self, journey: J) -> Vec<J> {
        let kept = journey.id();
        self.journeys.insert(kept, journey);

        let mut evicted = Vec::new();
        while self.journeys.len() > self.capacity {
            let oldest = self
                .journeys
                .values()
                .filter(|j| j.id() != kept)
                .min_by_key(|j| j.last_touched())
                .map(|j| j.id());
            let Some(oldest) = oldest else { break };
            if let Some(removed) = self.journeys.remove(&oldest) {
                tracing::debug!(
                    flow = J::FLOW,
                    journey_id = %oldest,
                    "evicting least recently used journey"
                );
                evicted.push(removed);
            }
        }
        evicted
    }

    pub fn delete(&mut self, id: &JourneyId) -> Option<J> {
        self.journeys.remove(id)
    }

    pub fn len(&self) -> usize {
        self.journeys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.journeys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use contacts_types::PrisonerNumber;

    fn at(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    fn journey(minutes: i64) -> AddContactJourney {
        AddContactJourney::new(PrisonerNumber::parse("A1234BC").unwrap(), at(minutes))
    }

    #[test]
    fn test_get_put_delete() {
        let mut map = JourneyMap::new(5);
        let j = journey(0);
        let id = j.id();

        assert!(map.put(j).is_empty());
        assert!(map.get(&id).is_some());
        assert_eq!(map.len(), 1);

        assert!(map.delete(&id).is_some());
        assert!(map.get(&id).is_none());
        assert!(map.is_empty());
    }

    #[test]
    fn test_put_replaces_existing_journey() {
        let mut map = JourneyMap::new(5);
        let mut j = journey(0);
        map.put(j.clone());

        j.is_checking_answers = true;
        map.put(j.clone());

        assert_eq!(map.len(), 1);
        assert!(map.get(&j.id()).unwrap().is_checking_answers);
    }

    #[test]
    fn test_put_evicts_least_recently_touched() {
        let mut map = JourneyMap::new(2);
        let oldest = journey(0);
        let middle = journey(5);
        let newest = journey(10);

        map.put(middle.clone());
        map.put(oldest.clone());
        let evicted = map.put(newest.clone());

        assert_eq!(evicted.len(), 1);
        assert_eq!(evicted[0].id(), oldest.id());
        assert!(map.get(&middle.id()).is_some());
        assert!(map.get(&newest.id()).is_some());
    }

    #[test]
    fn test_put_never_evicts_the_journey_just_stored() {
        let mut map = JourneyMap::new(1);
        let recent = journey(30);
        let stale = journey(0);

        map.put(recent.clone());
        let evicted = map.put(stale.clone());

        assert_eq!(evicted[0].id(), recent.id());
        assert!(map.get(&stale.id()).is_some());
    }
}
