//! Built-in demo catalog: thirteen Indian destinations and a handful of
//! feedback events so a fresh install has something to recommend.

use crate::types::{interest_set, ItineraryDay, NewTrip, TravelType, TripId};

/// Static description of one demo trip
struct DemoTrip {
    id: u64,
    destination: &'static str,
    budget: f64,
    days: u32,
    travel_type: TravelType,
    popularity: f64,
    interests: &'static [&'static str],
    highlights: &'static [&'static str],
}

/// Static description of one demo feedback event
pub struct DemoFeedback {
    pub trip_id: TripId,
    pub rating: u8,
    pub liked: bool,
    pub comment: &'static str,
}

const DEMO_TRIPS: &[DemoTrip] = &[
    DemoTrip {
        id: 1,
        destination: "Manali",
        budget: 25000.0,
        days: 7,
        travel_type: TravelType::Leisure,
        popularity: 0.90,
        interests: &["mountains", "snow", "nature"],
        highlights: &["Hadimba Temple", "Solang Valley", "Old Manali cafes", "Rohtang Pass"],
    },
    DemoTrip {
        id: 2,
        destination: "Shimla",
        budget: 20000.0,
        days: 5,
        travel_type: TravelType::Leisure,
        popularity: 0.75,
        interests: &["mountains", "colonial", "shopping"],
        highlights: &["The Ridge", "Kufri", "Mall Road"],
    },
    DemoTrip {
        id: 3,
        destination: "Goa",
        budget: 30000.0,
        days: 6,
        travel_type: TravelType::Leisure,
        popularity: 0.95,
        interests: &["beach", "food", "nightlife"],
        highlights: &["Baga Beach", "Old Goa churches", "Anjuna flea market", "Palolem"],
    },
    DemoTrip {
        id: 4,
        destination: "Udaipur",
        budget: 22000.0,
        days: 4,
        travel_type: TravelType::Leisure,
        popularity: 0.80,
        interests: &["heritage", "lakes", "culture"],
        highlights: &["City Palace", "Lake Pichola", "Sajjangarh"],
    },
    DemoTrip {
        id: 5,
        destination: "Jaipur",
        budget: 18000.0,
        days: 3,
        travel_type: TravelType::Leisure,
        popularity: 0.85,
        interests: &["heritage", "culture", "shopping"],
        highlights: &["Amber Fort", "Hawa Mahal"],
    },
    DemoTrip {
        id: 6,
        destination: "Coorg",
        budget: 24000.0,
        days: 5,
        travel_type: TravelType::Leisure,
        popularity: 0.70,
        interests: &["nature", "coffee", "waterfalls"],
        highlights: &["Abbey Falls", "coffee estates", "Dubare elephant camp"],
    },
    DemoTrip {
        id: 7,
        destination: "Darjeeling",
        budget: 26000.0,
        days: 6,
        travel_type: TravelType::Leisure,
        popularity: 0.72,
        interests: &["mountains", "tea", "nature"],
        highlights: &["Tiger Hill sunrise", "toy train", "tea gardens", "Batasia Loop"],
    },
    DemoTrip {
        id: 8,
        destination: "Rishikesh",
        budget: 18000.0,
        days: 4,
        travel_type: TravelType::Adventure,
        popularity: 0.88,
        interests: &["rafting", "yoga", "camping"],
        highlights: &["river rafting", "Laxman Jhula", "Ganga aarti"],
    },
    DemoTrip {
        id: 9,
        destination: "Bir Billing",
        budget: 20000.0,
        days: 4,
        travel_type: TravelType::Adventure,
        popularity: 0.78,
        interests: &["paragliding", "mountains", "camping"],
        highlights: &["tandem paragliding", "Tibetan colony", "monastery walk"],
    },
    DemoTrip {
        id: 10,
        destination: "Spiti Valley",
        budget: 42000.0,
        days: 9,
        travel_type: TravelType::Adventure,
        popularity: 0.74,
        interests: &["mountains", "road trip", "monasteries"],
        highlights: &["Key Monastery", "Chandratal Lake", "Kibber", "Langza fossils"],
    },
    DemoTrip {
        id: 11,
        destination: "Ladakh",
        budget: 48000.0,
        days: 10,
        travel_type: TravelType::Adventure,
        popularity: 0.92,
        interests: &["mountains", "road trip", "biking"],
        highlights: &["Pangong Tso", "Khardung La", "Nubra Valley", "Leh Palace"],
    },
    DemoTrip {
        id: 12,
        destination: "Meghalaya",
        budget: 35000.0,
        days: 8,
        travel_type: TravelType::Adventure,
        popularity: 0.68,
        interests: &["trekking", "waterfalls", "caves"],
        highlights: &["living root bridges", "Nohkalikai Falls", "Mawsmai Cave", "Dawki river"],
    },
    DemoTrip {
        id: 13,
        destination: "Andaman",
        budget: 55000.0,
        days: 7,
        travel_type: TravelType::Adventure,
        popularity: 0.86,
        interests: &["beach", "scuba", "islands"],
        highlights: &["Havelock scuba dive", "Radhanagar Beach", "Cellular Jail", "Neil Island"],
    },
];

const DEMO_FEEDBACK: &[(u64, u8, bool, &str)] = &[
    (1, 5, true, "Amazing views and weather"),
    (3, 4, true, "Great beaches and food"),
    (4, 4, true, "Beautiful and peaceful"),
    (6, 5, true, "Very relaxing experience"),
    (8, 5, true, "Perfect for adventure sports"),
    (9, 4, true, "Paragliding was awesome"),
    (11, 5, true, "Once in a lifetime experience"),
    (2, 2, false, "Too crowded during season"),
];

/// The demo trips, with fixed ids 1 through 13
pub fn demo_trips() -> Vec<NewTrip> {
    DEMO_TRIPS
        .iter()
        .map(|t| NewTrip {
            id: Some(TripId(t.id)),
            destination: t.destination.to_string(),
            budget: t.budget,
            days: t.days,
            travel_type: t.travel_type,
            interests: interest_set(t.interests),
            base_popularity: t.popularity,
            itinerary: itinerary(t.destination, t.days, t.highlights),
        })
        .collect()
}

/// Feedback events recorded against the demo trips
pub fn demo_feedback() -> Vec<DemoFeedback> {
    DEMO_FEEDBACK
        .iter()
        .map(|&(id, rating, liked, comment)| DemoFeedback {
            trip_id: TripId(id),
            rating,
            liked,
            comment,
        })
        .collect()
}

/// Arrival day, one highlight per middle day (cycling), departure day
fn itinerary(destination: &str, days: u32, highlights: &[&str]) -> Vec<ItineraryDay> {
    (1..=days)
        .map(|day| {
            if day == 1 {
                ItineraryDay {
                    day,
                    morning: format!("Arrive in {}", destination),
                    afternoon: "Check in and rest".to_string(),
                    evening: "Local market walk".to_string(),
                }
            } else if day == days {
                ItineraryDay {
                    day,
                    morning: "Leisurely breakfast".to_string(),
                    afternoon: "Souvenir shopping".to_string(),
                    evening: format!("Depart {}", destination),
                }
            } else {
                let highlight = highlights
                    .get((day as usize - 2) % highlights.len().max(1))
                    .copied()
                    .unwrap_or("local sightseeing");
                ItineraryDay {
                    day,
                    morning: format!("Visit {}", highlight),
                    afternoon: "Explore nearby attractions".to_string(),
                    evening: "Relax and try local food".to_string(),
                }
            }
        })
        .collect()
}
