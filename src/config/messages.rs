//! User-facing bot texts. Placeholders: `{start}`, `{end}`, `{hours}`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Messages {
    pub start_prompt: String,
    pub clock_in_button: String,
    pub clock_out_button: String,
    pub clocked_in: String,
    pub clocked_out: String,
    pub total_hours: String,
    pub not_clocked_in: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            start_prompt: "Press to clock in".to_string(),
            clock_in_button: "Clock in".to_string(),
            clock_out_button: "Clock out".to_string(),
            clocked_in: "Clocked in at {start}".to_string(),
            clocked_out: "Clocked out at {end}".to_string(),
            total_hours: "Total hours: {hours}".to_string(),
            not_clocked_in: "Error: no clock-in recorded".to_string(),
        }
    }
}

impl Messages {
    pub fn render_clock_in(&self, start: &str) -> String {
        self.clocked_in.replace("{start}", start)
    }

    pub fn render_clock_out(&self, start: &str, end: &str, hours: f64) -> String {
        format!(
            "{}\n{}\n{}",
            self.render_clock_in(start),
            self.clocked_out.replace("{end}", end),
            self.total_hours
                .replace("{hours}", &crate::utils::time::format_hours(hours))
        )
    }
}
