//! Settings placeholder screen

/// Static settings entries; none of them persist anything yet.
const OPTIONS: [(&str, &str); 6] = [
    ("Measurement Units", "Configure your preferred units"),
    ("Data Sync", "Manage data synchronization"),
    ("Notifications", "Set up alerts and reminders"),
    ("Account", "Manage your profile"),
    ("Help & Support", "Get assistance"),
    ("About", "App information and credits"),
];

/// Render the settings screen stub.
pub fn render() -> String {
    let mut out = String::from("== Settings ==\n");
    for (title, description) in OPTIONS {
        out.push_str(&format!("{title:<20} {description}\n"));
    }
    out
}
