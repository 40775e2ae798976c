//! Map placeholder screen

/// Render the map screen stub.
pub fn render() -> String {
    let mut out = String::from("== Field Map ==\n");
    out.push_str("Map view coming soon!\n");
    out.push_str("This screen will display geographical data and sampling locations.\n");
    out
}
