use std::collections::VecDeque;

use crate::config::MealWindow;
use crate::geo::DistanceMetric;
use crate::models::Place;
use crate::policy::CategoryPolicy;

/// Orders a selection into a walkable day.
///
/// Non-food stops follow a greedy nearest-neighbor tour from the first
/// non-food place. This is an approximation and makes no claim of producing
/// the shortest route. One food stop is spliced in when the running clock
/// first enters the meal window; remaining food stops close the day.
pub struct RouteSequencer<'a, D> {
    policy: &'a CategoryPolicy,
    meal: &'a MealWindow,
    metric: &'a D,
}

impl<'a, D> RouteSequencer<'a, D>
where
    D: DistanceMetric,
{
    pub fn new(policy: &'a CategoryPolicy, meal: &'a MealWindow, metric: &'a D) -> Self {
        Self {
            policy,
            meal,
            metric,
        }
    }

    pub fn sequence(&self, selected: Vec<Place>, start_hour: u8) -> Vec<Place> {
        let (food, non_food): (Vec<Place>, Vec<Place>) = selected
            .into_iter()
            .partition(|place| self.policy.is_food(&place.category));
        let mut food = VecDeque::from(food);

        let tour = nearest_neighbor_tour(non_food, self.metric);
        let meal_hour = self.meal.meal_hour(start_hour);

        let mut itinerary = Vec::with_capacity(tour.len() + food.len());
        let mut clock = i32::from(start_hour);
        let mut meal_served = false;

        for stop in tour {
            if !meal_served && self.meal.contains(meal_hour, clock) {
                if let Some(meal) = food.pop_front() {
                    itinerary.push(meal);
                }
                meal_served = true;
            }
            clock += stop.estimated_duration_hours.round() as i32;
            itinerary.push(stop);
        }

        itinerary.extend(food);
        itinerary
    }
}

/// Greedy tour: from the first place, repeatedly hop to the closest unvisited
/// one. Equal distances go to the earlier place.
pub fn nearest_neighbor_tour<D>(places: Vec<Place>, metric: &D) -> Vec<Place>
where
    D: DistanceMetric + ?Sized,
{
    let mut remaining = places;
    if remaining.is_empty() {
        return remaining;
    }

    let mut tour = Vec::with_capacity(remaining.len());
    tour.push(remaining.remove(0));

    while !remaining.is_empty() {
        let Some(current) = tour.last() else {
            break;
        };
        let mut best = 0;
        let mut best_distance = f64::INFINITY;
        for (idx, candidate) in remaining.iter().enumerate() {
            let distance = metric.distance_km(current.location, candidate.location);
            if distance < best_distance {
                best = idx;
                best_distance = distance;
            }
        }
        tour.push(remaining.remove(best));
    }

    tour
}
