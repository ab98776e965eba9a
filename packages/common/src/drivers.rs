/// The 2025 grid, team by team. Drives the pick lists for podium and
/// driver-of-the-day fields.
pub const TEAMS: &[(&str, &[&str])] = &[
    ("Red Bull Racing", &["Max Verstappen", "Liam Lawson"]),
    ("Ferrari", &["Charles Leclerc", "Lewis Hamilton"]),
    ("Mercedes", &["Andrea Kimi Antonelli", "George Russell"]),
    ("McLaren", &["Lando Norris", "Oscar Piastri"]),
    ("Aston Martin", &["Fernando Alonso", "Lance Stroll"]),
    ("Alpine", &["Jack Doohan", "Pierre Gasly"]),
    ("Williams", &["Alexander Albon", "Carlos Sainz Jr."]),
    ("Racing Bulls", &["Isack Hadjar", "Yuki Tsunoda"]),
    ("Kick Sauber", &["Gabriel Bortoleto", "Nico Hülkenberg"]),
    ("Haas", &["Esteban Ocon", "Oliver Bearman"]),
];

/// Every driver on the grid, in team order.
pub fn all_drivers() -> Vec<&'static str> {
    TEAMS
        .iter()
        .flat_map(|(_, drivers)| drivers.iter().copied())
        .collect()
}

/// Whether a name appears on the current grid.
pub fn is_on_grid(name: &str) -> bool {
    TEAMS
        .iter()
        .any(|(_, drivers)| drivers.iter().any(|d| *d == name))
}
