//! Salt Lake City delivery-day fixture: 27 locations (0 is the hub),
//! their road distances in miles, and a 40-parcel manifest.

#![allow(dead_code)]

use u_dispatch::distance::DistanceMatrix;
use u_dispatch::models::{Location, LocationTable, ManifestEntry, SimTime};
use u_dispatch::simulation::{AddressCorrection, Scenario};

pub const HUB: usize = 0;
pub const COUNCIL_HALL: usize = 12;
pub const JUVENILE_COURT: usize = 19;

const LOCATIONS: [(&str, &str, &str); 27] = [
    ("Western Governors University", "4001 South 700 East, Salt Lake City, UT", "84107"),
    ("International Peace Gardens", "1060 Dalton Ave S", "84104"),
    ("Sugar House Park", "1330 2100 S", "84106"),
    ("Taylorsville-Bennion Heritage City Gov Off", "1488 4800 S", "84123"),
    ("Salt Lake City Division of Health Services", "177 W Price Ave", "84115"),
    ("South Salt Lake Public Works", "195 W Oakland Ave", "84115"),
    ("Salt Lake City Streets and Sanitation", "2010 W 500 S", "84104"),
    ("Deker Lake", "2300 Parkway Blvd", "84119"),
    ("Salt Lake City Ottinger Hall", "233 Canyon Rd", "84103"),
    ("Columbus Library", "2530 S 500 E", "84106"),
    ("Taylorsville City Hall", "2600 Taylorsville Blvd", "84118"),
    ("South Salt Lake Police", "2835 Main St", "84115"),
    ("Council Hall", "300 State St", "84103"),
    ("Redwood Park", "3060 Lester St", "84119"),
    ("Salt Lake County Mental Health", "3148 S 1100 W", "84119"),
    ("Salt Lake County/United Police Dept", "3365 S 900 W", "84119"),
    ("West Valley Prosecutor", "3575 W Valley Central Station bus Loop", "84119"),
    ("Housing Auth. of Salt Lake County", "3595 Main St", "84115"),
    ("Utah DMV Administrative Office", "380 W 2880 S", "84115"),
    ("Third District Juvenile Court", "410 S State St", "84111"),
    ("Cottonwood Regional Softball Complex", "4300 S 1300 E", "84117"),
    ("Holiday City Office", "4580 S 2300 E", "84117"),
    ("Murray City Museum", "5025 State St", "84107"),
    ("Valley Regional Softball Complex", "5100 South 2700 West", "84118"),
    ("City Center of Rock Springs", "5383 South 900 East #104", "84117"),
    ("Rice Terrace Pavilion Park", "600 E 900 South", "84105"),
    ("Wheeler Historic Farm", "6351 South 900 East", "84121"),
];

pub fn locations() -> LocationTable {
    LocationTable::new(
        LOCATIONS
            .iter()
            .enumerate()
            .map(|(id, &(name, address, zip))| Location::new(id, name, address, zip))
            .collect(),
    )
}

pub fn distances() -> DistanceMatrix {
    let rows: Vec<Vec<f64>> = vec![
        vec![0.0],
        vec![7.2, 0.0],
        vec![3.8, 7.1, 0.0],
        vec![11.0, 6.4, 9.2, 0.0],
        vec![2.2, 6.0, 4.4, 5.6, 0.0],
        vec![3.5, 4.8, 2.8, 6.9, 1.9, 0.0],
        vec![10.9, 1.6, 8.6, 8.6, 7.9, 6.3, 0.0],
        vec![8.6, 2.8, 6.3, 4.0, 5.1, 4.3, 4.0, 0.0],
        vec![7.6, 4.8, 5.3, 11.1, 7.5, 4.5, 4.2, 7.7, 0.0],
        vec![2.8, 6.3, 1.6, 7.3, 2.6, 1.5, 8.0, 9.3, 4.8, 0.0],
        vec![6.4, 7.3, 10.4, 1.0, 6.5, 8.7, 8.6, 4.6, 11.9, 9.4, 0.0],
        vec![3.2, 5.3, 3.0, 6.4, 1.5, 0.8, 6.9, 4.8, 4.7, 1.1, 7.3, 0.0],
        vec![7.6, 4.8, 5.3, 11.1, 7.5, 4.5, 4.2, 7.7, 0.6, 5.1, 12.0, 4.7, 0.0],
        vec![5.2, 3.0, 6.5, 3.9, 3.2, 3.9, 4.2, 1.6, 7.6, 4.6, 4.9, 3.5, 7.3, 0.0],
        vec![4.4, 4.6, 5.6, 4.3, 2.4, 3.0, 8.0, 3.3, 7.8, 3.7, 5.2, 2.6, 7.8, 1.3, 0.0],
        vec![3.7, 4.5, 5.8, 4.4, 2.7, 3.8, 5.8, 3.4, 6.6, 4.0, 5.4, 2.9, 6.6, 1.5, 0.6, 0.0],
        vec![7.6, 7.4, 5.7, 7.2, 1.4, 5.7, 7.2, 3.1, 7.2, 6.7, 8.1, 6.3, 7.2, 4.0, 6.4, 5.6, 0.0],
        vec![2.0, 6.0, 4.1, 5.3, 0.5, 1.9, 7.7, 5.1, 5.9, 2.3, 6.2, 1.2, 5.9, 3.2, 2.4, 1.6, 7.1, 0.0],
        vec![3.6, 5.0, 3.6, 6.0, 1.7, 1.1, 6.6, 4.6, 5.4, 1.8, 6.9, 1.0, 5.4, 3.0, 2.2, 1.7, 6.1, 1.6, 0.0],
        vec![6.5, 4.8, 4.3, 10.6, 6.5, 3.5, 3.2, 6.7, 1.0, 4.1, 11.5, 3.7, 1.0, 6.9, 6.8, 6.4, 7.2, 4.9, 4.4, 0.0],
        vec![1.9, 9.5, 3.3, 5.9, 3.2, 4.9, 11.2, 8.1, 8.5, 3.8, 6.9, 4.1, 8.5, 6.2, 5.3, 4.9, 10.6, 3.0, 4.6, 7.5, 0.0],
        vec![3.4, 10.9, 5.0, 7.4, 5.2, 6.9, 12.7, 10.4, 10.3, 5.8, 8.3, 6.2, 10.3, 8.2, 7.4, 6.9, 12.0, 5.0, 6.6, 9.3, 2.0, 0.0],
        vec![2.4, 8.3, 6.1, 4.7, 2.5, 4.2, 10.0, 7.8, 7.8, 4.3, 4.1, 3.4, 7.8, 5.5, 4.6, 4.2, 9.4, 2.3, 3.9, 6.8, 2.9, 4.4, 0.0],
        vec![6.4, 6.9, 9.7, 0.6, 6.0, 9.0, 8.2, 4.2, 11.5, 7.8, 0.4, 6.9, 11.5, 4.4, 4.8, 5.6, 7.5, 5.5, 6.5, 11.4, 6.4, 7.9, 4.5, 0.0],
        vec![2.4, 10.0, 6.1, 6.4, 4.2, 5.9, 11.7, 9.5, 9.5, 4.8, 4.9, 5.2, 9.5, 7.2, 6.3, 5.9, 11.1, 4.0, 5.6, 8.5, 2.8, 3.4, 1.7, 5.4, 0.0],
        vec![5.0, 4.4, 2.8, 10.1, 5.4, 3.5, 5.1, 6.2, 2.8, 3.2, 11.0, 3.7, 2.8, 6.4, 6.5, 5.7, 6.2, 5.1, 4.3, 1.8, 6.0, 7.9, 6.8, 10.6, 7.0, 0.0],
        vec![3.6, 13.0, 7.4, 10.1, 5.5, 7.2, 14.2, 10.7, 14.1, 6.0, 6.8, 6.4, 14.1, 10.5, 8.8, 8.4, 13.6, 5.2, 6.9, 13.1, 4.1, 4.7, 3.1, 7.8, 1.3, 8.3, 0.0],
    ];
    DistanceMatrix::from_lower_triangle(&rows).expect("valid dataset")
}

const TRUCK_2: &str = "Can only be on truck 2";
const DELAYED: &str = "Delayed on flight---will not arrive to depot until 9:05 am";

/// Parcels whose notes say they reach the hub at 9:05.
pub const DELAYED_PARCELS: [usize; 4] = [6, 25, 28, 32];

/// Parcels that may only travel on vehicle 2.
pub const TRUCK_2_PARCELS: [usize; 4] = [3, 18, 36, 38];

/// Parcels tied together by "must be delivered with" notes.
pub const LINKED_PARCELS: [usize; 6] = [13, 14, 15, 16, 19, 20];

pub fn manifest() -> Vec<ManifestEntry> {
    let e = |id: usize, address: &str, city: &str, zip: &str, deadline: &str, mass: f64| {
        ManifestEntry::new(id, address, city, zip, deadline, mass)
    };
    vec![
        e(1, "195 W Oakland Ave", "Salt Lake City", "84115", "10:30 AM", 21.0),
        e(2, "2530 S 500 E", "Salt Lake City", "84106", "EOD", 44.0),
        e(3, "233 Canyon Rd", "Salt Lake City", "84103", "EOD", 2.0).with_note(TRUCK_2),
        e(4, "380 W 2880 S", "Salt Lake City", "84115", "EOD", 4.0),
        e(5, "410 S State St", "Salt Lake City", "84111", "EOD", 5.0),
        e(6, "3060 Lester St", "West Valley City", "84119", "10:30 AM", 88.0).with_note(DELAYED),
        e(7, "1330 2100 S", "Salt Lake City", "84106", "EOD", 8.0),
        e(8, "300 State St", "Salt Lake City", "84103", "EOD", 9.0),
        e(9, "300 State St", "Salt Lake City", "84103", "EOD", 2.0).with_note("Wrong address listed"),
        e(10, "600 E 900 South", "Salt Lake City", "84105", "EOD", 1.0),
        e(11, "2600 Taylorsville Blvd", "Salt Lake City", "84118", "EOD", 1.0),
        e(12, "3575 W Valley Central Station bus Loop", "West Valley City", "84119", "EOD", 1.0),
        e(13, "2010 W 500 S", "Salt Lake City", "84104", "10:30 AM", 2.0),
        e(14, "4300 S 1300 E", "Millcreek", "84117", "10:30 AM", 88.0).with_note("Must be delivered with 15, 19"),
        e(15, "4580 S 2300 E", "Holladay", "84117", "9:00 AM", 4.0),
        e(16, "4580 S 2300 E", "Holladay", "84117", "10:30 AM", 88.0).with_note("Must be delivered with 13, 19"),
        e(17, "3148 S 1100 W", "Salt Lake City", "84119", "EOD", 2.0),
        e(18, "1488 4800 S", "Salt Lake City", "84123", "EOD", 6.0).with_note(TRUCK_2),
        e(19, "177 W Price Ave", "Salt Lake City", "84115", "EOD", 37.0),
        e(20, "3595 Main St", "Salt Lake City", "84115", "10:30 AM", 37.0).with_note("Must be delivered with 13, 15"),
        e(21, "3595 Main St", "Salt Lake City", "84115", "EOD", 3.0),
        e(22, "6351 South 900 East", "Murray", "84121", "EOD", 2.0),
        e(23, "5100 South 2700 West", "Salt Lake City", "84118", "EOD", 5.0),
        e(24, "5025 State St", "Murray", "84107", "EOD", 7.0),
        e(25, "5383 South 900 East #104", "Salt Lake City", "84117", "10:30 AM", 7.0).with_note(DELAYED),
        e(26, "5383 South 900 East #104", "Salt Lake City", "84117", "EOD", 25.0),
        e(27, "1060 Dalton Ave S", "Salt Lake City", "84104", "EOD", 5.0),
        e(28, "2835 Main St", "Salt Lake City", "84115", "EOD", 7.0).with_note(DELAYED),
        e(29, "1330 2100 S", "Salt Lake City", "84106", "10:30 AM", 2.0),
        e(30, "300 State St", "Salt Lake City", "84103", "10:30 AM", 1.0),
        e(31, "3365 S 900 W", "Salt Lake City", "84119", "10:30 AM", 1.0),
        e(32, "3365 S 900 W", "Salt Lake City", "84119", "EOD", 1.0).with_note(DELAYED),
        e(33, "2530 S 500 E", "Salt Lake City", "84106", "EOD", 1.0),
        e(34, "4580 S 2300 E", "Holladay", "84117", "10:30 AM", 2.0),
        e(35, "1060 Dalton Ave S", "Salt Lake City", "84104", "EOD", 88.0),
        e(36, "2300 Parkway Blvd", "West Valley City", "84119", "EOD", 88.0).with_note(TRUCK_2),
        e(37, "410 S State St", "Salt Lake City", "84111", "10:30 AM", 2.0),
        e(38, "410 S State St", "Salt Lake City", "84111", "EOD", 9.0).with_note(TRUCK_2),
        e(39, "2010 W 500 S", "Salt Lake City", "84104", "EOD", 9.0),
        e(40, "380 W 2880 S", "Salt Lake City", "84115", "10:30 AM", 45.0),
    ]
}

/// Parcel 9's address correction, known at 10:20.
pub fn parcel_9_correction() -> AddressCorrection {
    AddressCorrection::new(9, SimTime::from_hm(10, 20), "410 S State St", "84111")
}

/// The full day: dataset, manifest and the parcel 9 correction.
pub fn scenario() -> Scenario {
    Scenario::new(locations(), distances(), manifest()).with_correction(parcel_9_correction())
}
