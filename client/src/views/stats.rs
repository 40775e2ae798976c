//! Readings dashboard

use shared::LoadState;

/// Render the soil stats screen for the current state.
pub fn render(state: &LoadState) -> String {
    let mut out = String::from("== Soil Health Monitor ==\n");

    match state {
        LoadState::Loading => {
            out.push_str("Loading Data\n\n");
            out.push_str("Loading Soil Data\n");
            out.push_str("Please wait while we connect to the sensor...\n");
        }
        LoadState::Error { message } => {
            out.push_str("Connection Error\n\n");
            out.push_str(message);
            out.push('\n');
        }
        LoadState::Ready {
            reading,
            fetched_at,
        } => {
            out.push_str("Current Readings\n\n");
            out.push_str(&format!(
                "Predicted Carbon Content  {}%\n",
                reading.carbon_content
            ));
            out.push_str("Optimal Range: 3.0-5.0%\n\n");
            out.push_str(&format!("pH Level                  {} pH\n", reading.ph));
            out.push_str(&format!(
                "Electrical Conductivity   {} \u{b5}S/cm\n",
                reading.electrical_conductivity
            ));
            out.push_str(&format!("Phosphorus                {} mg/kg\n", reading.phosphorus));
            out.push_str(&format!("Nitrogen                  {} mg/kg\n", reading.nitrogen));
            out.push_str(&format!("Potassium                 {} mg/kg\n", reading.potassium));
            out.push_str(&format!("Elevation                 {} m\n", reading.elevation));
            out.push_str(&format!(
                "\nLast updated {}\n",
                fetched_at.format("%H:%M:%S UTC")
            ));
        }
    }

    out
}
