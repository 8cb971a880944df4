use crate::api::HarvestStatus;
use ratatui::prelude::{Color, Modifier, Style};

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Money amount as shown in the table and totals, e.g. `€1.50`, `€-3.00`
pub fn format_money(amount: f64) -> String {
  format!("€{:.2}", amount)
}

/// Style of the status cell for each harvest state
pub fn harvest_style(status: HarvestStatus) -> Style {
  match status {
    HarvestStatus::DueToday => Style::default()
      .fg(Color::Yellow)
      .add_modifier(Modifier::BOLD),
    HarvestStatus::Past => Style::default().fg(Color::Red),
    HarvestStatus::Upcoming => Style::default().fg(Color::Green),
  }
}

/// Red for a loss, green for a gain
pub fn margin_color(margin: f64) -> Color {
  if margin < 0.0 {
    Color::Red
  } else if margin > 0.0 {
    Color::Green
  } else {
    Color::White
  }
}
