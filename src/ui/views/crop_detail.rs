use crate::api::Crop;
use crate::ui::renderfns::{format_money, harvest_style, margin_color};
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

/// Read-only view of one crop, including its notes
pub struct CropDetailView {
  crop: Crop,
}

impl CropDetailView {
  pub fn new(crop: Crop) -> Self {
    Self { crop }
  }

  fn field<'a>(label: &'a str, value: Span<'a>) -> Line<'a> {
    Line::from(vec![
      Span::styled(format!("{:<14}", label), Style::default().fg(Color::DarkGray)),
      value,
    ])
  }

  fn render_detail(&self, frame: &mut Frame, area: Rect) {
    let crop = &self.crop;
    let block = Block::default()
      .title(format!(" {} ", crop.name))
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(9), // Fields
        Constraint::Length(1), // Separator
        Constraint::Min(1),    // Notes
      ])
      .split(inner);

    let margin = crop.margin();
    let zone = if crop.zone.is_empty() { "-" } else { crop.zone.as_str() };
    let fields = vec![
      Self::field("Zona:", Span::raw(zone)),
      Self::field("Siembra:", Span::raw(crop.planted_on.as_str())),
      Self::field("Cosecha:", Span::raw(crop.harvest_on.as_str())),
      Self::field(
        "Estado:",
        Span::styled(
          crop.days_remaining.as_str(),
          harvest_style(crop.harvest_status()),
        ),
      ),
      Self::field("Compra:", Span::raw(format_money(crop.purchase_price))),
      Self::field("Venta:", Span::raw(format_money(crop.sale_price))),
      Self::field(
        "Margen:",
        Span::styled(
          format_money(margin),
          Style::default().fg(margin_color(margin)).bold(),
        ),
      ),
      Self::field("Aviso:", Span::raw(format!("{} días antes", crop.alert_days))),
    ];
    frame.render_widget(Paragraph::new(fields), chunks[0]);

    let sep = Paragraph::new("─".repeat(chunks[1].width as usize))
      .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(sep, chunks[1]);

    let notes = if crop.notes.is_empty() {
      Paragraph::new("Sin notas").style(Style::default().fg(Color::DarkGray))
    } else {
      Paragraph::new(crop.notes.as_str()).wrap(Wrap { trim: true })
    };
    frame.render_widget(notes, chunks[2]);
  }
}

impl View for CropDetailView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Char('q') | KeyCode::Esc => ViewAction::Pop,
      _ => ViewAction::None,
    }
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    self.render_detail(frame, area);
  }

  fn breadcrumb_label(&self) -> String {
    self.crop.name.clone()
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![ShortcutInfo::new("q", "volver").with_priority(90)]
  }
}
