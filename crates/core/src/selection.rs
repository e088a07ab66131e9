use std::collections::HashSet;

use crate::models::{Place, PlaceId};
use crate::policy::CategoryPolicy;

/// Two-pass greedy selection under a time budget.
///
/// The coverage pass runs to completion before the fill pass starts; merging
/// them would let early multi-instance places crowd out later categories.
pub struct SelectionEngine<'a> {
    policy: &'a CategoryPolicy,
}

impl<'a> SelectionEngine<'a> {
    pub fn new(policy: &'a CategoryPolicy) -> Self {
        Self { policy }
    }

    pub fn select(&self, candidates: &[Place], requested: &[String], budget_hours: f64) -> Vec<Place> {
        let mut selection = Selection::new(budget_hours);

        for category in requested {
            let pick = candidates.iter().find(|place| {
                &place.category == category && !selection.contains(place) && selection.fits(place)
            });
            if let Some(place) = pick {
                selection.add(place);
            }
        }

        for place in candidates {
            if selection.exhausted() {
                break;
            }
            if selection.contains(place) || selection.has_name(&place.name) {
                continue;
            }
            if self.policy.is_single_instance(&place.category) {
                continue;
            }
            if selection.fits(place) {
                selection.add(place);
            }
        }

        selection.places
    }
}

struct Selection {
    budget_hours: f64,
    used_hours: f64,
    ids: HashSet<PlaceId>,
    names: HashSet<String>,
    places: Vec<Place>,
}

impl Selection {
    fn new(budget_hours: f64) -> Self {
        Self {
            budget_hours,
            used_hours: 0.0,
            ids: HashSet::new(),
            names: HashSet::new(),
            places: Vec::new(),
        }
    }

    fn contains(&self, place: &Place) -> bool {
        self.ids.contains(&place.id)
    }

    fn has_name(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    fn fits(&self, place: &Place) -> bool {
        self.used_hours + place.estimated_duration_hours <= self.budget_hours
    }

    fn exhausted(&self) -> bool {
        self.used_hours >= self.budget_hours
    }

    fn add(&mut self, place: &Place) {
        self.used_hours += place.estimated_duration_hours;
        self.ids.insert(place.id);
        self.names.insert(place.name.clone());
        self.places.push(place.clone());
    }
}
