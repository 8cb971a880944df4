use super::confirm::centered;
use super::KeyResult;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
  Info,
  Error,
}

/// Blocking message box; must be dismissed before anything else reacts
#[derive(Debug, Clone, Default)]
pub struct Notice {
  current: Option<(String, NoticeKind)>,
}

impl Notice {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_active(&self) -> bool {
    self.current.is_some()
  }

  #[cfg(test)]
  pub fn message(&self) -> Option<&str> {
    self.current.as_ref().map(|(m, _)| m.as_str())
  }

  /// Show a message, replacing any notice still open
  pub fn show(&mut self, message: impl Into<String>, kind: NoticeKind) {
    self.current = Some((message.into(), kind));
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<()> {
    if self.current.is_none() {
      return KeyResult::NotHandled;
    }
    match key.code {
      KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => {
        self.current = None;
        KeyResult::Event(())
      }
      _ => KeyResult::Handled,
    }
  }

  pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
    let Some((message, kind)) = &self.current else {
      return;
    };

    let (title, color) = match kind {
      NoticeKind::Info => (" Aviso ", Color::Green),
      NoticeKind::Error => (" Error ", Color::Red),
    };

    let overlay_area = centered(area, 64, 6);
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(color))
      .title(title);

    let lines = vec![
      Line::raw(message.as_str()),
      Line::raw(""),
      Line::from(vec![
        Span::styled("<Enter>", Style::default().fg(Color::Cyan)),
        Span::styled(" aceptar", Style::default().fg(Color::DarkGray)),
      ]),
    ];

    let paragraph = Paragraph::new(lines)
      .block(block)
      .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, overlay_area);
  }
}
