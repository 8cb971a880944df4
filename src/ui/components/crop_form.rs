use super::input::{InputResult, TextInput};
use super::KeyResult;
use crate::api::{Crop, CropPayload};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

const ADD_LABEL: &str = "Añadir Cultivo";
const DEFAULT_PRICE: &str = "0.00";
const DEFAULT_ALERT_DAYS: &str = "7";

pub const MISSING_FIELDS_MESSAGE: &str =
  "Por favor, rellena el nombre, la fecha de siembra y la fecha de cosecha.";

/// Form fields in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
  Name,
  Zone,
  PlantedOn,
  HarvestOn,
  PurchasePrice,
  SalePrice,
  AlertDays,
  Notes,
}

impl FormField {
  pub const ALL: [FormField; 8] = [
    FormField::Name,
    FormField::Zone,
    FormField::PlantedOn,
    FormField::HarvestOn,
    FormField::PurchasePrice,
    FormField::SalePrice,
    FormField::AlertDays,
    FormField::Notes,
  ];

  pub fn label(self) -> &'static str {
    match self {
      FormField::Name => "Nombre",
      FormField::Zone => "Zona",
      FormField::PlantedOn => "Siembra",
      FormField::HarvestOn => "Cosecha",
      FormField::PurchasePrice => "P. compra",
      FormField::SalePrice => "P. venta",
      FormField::AlertDays => "Alerta (d)",
      FormField::Notes => "Notas",
    }
  }

  fn hint(self) -> Option<&'static str> {
    match self {
      FormField::PlantedOn | FormField::HarvestOn => Some("AAAA-MM-DD"),
      _ => None,
    }
  }

  fn index(self) -> usize {
    self as usize
  }
}

/// Whether submitting creates a crop or updates an existing one
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormMode {
  #[default]
  Add,
  /// Editing the crop stored under `original_name`
  Editing { original_name: String },
}

/// A validated form, ready to send
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
  Create(CropPayload),
  Update {
    original_name: String,
    payload: CropPayload,
  },
}

/// Events emitted by the form that parent needs to handle
#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
  /// Enter pressed with the required fields present
  Submit(Submission),
  /// Enter pressed with a required field empty; nothing was sent
  Invalid(&'static str),
  /// Esc pressed, focus goes back to the table (contents kept)
  Blur,
}

/// Add/edit form for a crop.
///
/// All mode transitions go through `enter_edit` and `reset`.
#[derive(Debug, Clone)]
pub struct CropForm {
  inputs: [TextInput; 8],
  focus: FormField,
  mode: FormMode,
}

impl Default for CropForm {
  fn default() -> Self {
    Self::new()
  }
}

impl CropForm {
  pub fn new() -> Self {
    let mut form = Self {
      inputs: Default::default(),
      focus: FormField::Name,
      mode: FormMode::Add,
    };
    form.reset();
    form
  }

  /// Name captured when edit mode was entered
  pub fn original_name(&self) -> Option<&str> {
    match &self.mode {
      FormMode::Add => None,
      FormMode::Editing { original_name } => Some(original_name),
    }
  }

  pub fn is_editing(&self) -> bool {
    matches!(self.mode, FormMode::Editing { .. })
  }

  pub fn value(&self, field: FormField) -> &str {
    self.inputs[field.index()].value()
  }

  pub fn set_value(&mut self, field: FormField, value: &str) {
    self.inputs[field.index()].set_value(value);
  }

  pub fn submit_label(&self) -> String {
    match self.original_name() {
      None => ADD_LABEL.to_string(),
      Some(name) => format!("Guardar Cambios de {}", name),
    }
  }

  /// Load `crop` into the form and switch to edit mode
  pub fn enter_edit(&mut self, crop: &Crop) {
    self.set_value(FormField::Name, &crop.name);
    self.set_value(FormField::Zone, &crop.zone);
    self.set_value(FormField::PlantedOn, &crop.planted_on);
    self.set_value(FormField::HarvestOn, &crop.harvest_on);
    self.set_value(
      FormField::PurchasePrice,
      &format!("{:.2}", crop.purchase_price),
    );
    self.set_value(FormField::SalePrice, &format!("{:.2}", crop.sale_price));
    self.set_value(FormField::AlertDays, &crop.alert_days.to_string());
    self.set_value(FormField::Notes, &crop.notes);

    self.mode = FormMode::Editing {
      original_name: crop.name.clone(),
    };
    self.focus = FormField::Name;
  }

  /// Clear everything and return to add mode with the default numbers
  pub fn reset(&mut self) {
    for input in self.inputs.iter_mut() {
      input.clear();
    }
    self.set_value(FormField::PurchasePrice, DEFAULT_PRICE);
    self.set_value(FormField::SalePrice, DEFAULT_PRICE);
    self.set_value(FormField::AlertDays, DEFAULT_ALERT_DAYS);
    self.mode = FormMode::Add;
    self.focus = FormField::Name;
  }

  /// Current values, trimmed, with lenient number parsing
  pub fn payload(&self) -> CropPayload {
    CropPayload {
      name: self.value(FormField::Name).trim().to_string(),
      zone: self.value(FormField::Zone).trim().to_string(),
      planted_on: self.value(FormField::PlantedOn).trim().to_string(),
      harvest_on: self.value(FormField::HarvestOn).trim().to_string(),
      purchase_price: parse_price(self.value(FormField::PurchasePrice)),
      sale_price: parse_price(self.value(FormField::SalePrice)),
      alert_days: parse_days(self.value(FormField::AlertDays)),
      notes: self.value(FormField::Notes).trim().to_string(),
    }
  }

  /// Validate the required fields and build the request for the current mode
  pub fn submission(&self) -> Result<Submission, &'static str> {
    let payload = self.payload();
    if payload.name.is_empty() || payload.planted_on.is_empty() || payload.harvest_on.is_empty() {
      return Err(MISSING_FIELDS_MESSAGE);
    }

    Ok(match &self.mode {
      FormMode::Add => Submission::Create(payload),
      FormMode::Editing { original_name } => Submission::Update {
        original_name: original_name.clone(),
        payload,
      },
    })
  }

  fn move_focus(&mut self, delta: i32) {
    let len = FormField::ALL.len() as i32;
    let idx = (self.focus.index() as i32 + delta).rem_euclid(len) as usize;
    self.focus = FormField::ALL[idx];
  }

  /// Handle a key while the form has focus
  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<FormEvent> {
    match key.code {
      KeyCode::Tab | KeyCode::Down => {
        self.move_focus(1);
        return KeyResult::Handled;
      }
      KeyCode::BackTab | KeyCode::Up => {
        self.move_focus(-1);
        return KeyResult::Handled;
      }
      KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
        self.reset();
        return KeyResult::Handled;
      }
      _ => {}
    }

    match self.inputs[self.focus.index()].handle_key(key) {
      InputResult::Submitted(_) => match self.submission() {
        Ok(submission) => KeyResult::Event(FormEvent::Submit(submission)),
        Err(message) => KeyResult::Event(FormEvent::Invalid(message)),
      },
      InputResult::Cancelled => KeyResult::Event(FormEvent::Blur),
      InputResult::Consumed => KeyResult::Handled,
      InputResult::NotHandled => KeyResult::NotHandled,
    }
  }

  pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
    let (title, border) = if self.is_editing() {
      (" Editar cultivo ", Color::Yellow)
    } else {
      (" Nuevo cultivo ", Color::Blue)
    };
    let block = Block::default()
      .title(title)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(if focused { border } else { Color::DarkGray }));

    let mut lines: Vec<Line> = FormField::ALL
      .iter()
      .map(|&field| {
        let is_focused = focused && field == self.focus;
        let label_style = if is_focused {
          Style::default().fg(Color::Cyan).bold()
        } else {
          Style::default().fg(Color::DarkGray)
        };
        let mut spans = vec![Span::styled(format!("{:<11}", field.label()), label_style)];
        let input = &self.inputs[field.index()];
        if input.is_empty() && !is_focused {
          if let Some(hint) = field.hint() {
            spans.push(Span::styled(hint, Style::default().fg(Color::DarkGray).italic()));
          }
        } else {
          spans.extend(input.spans(is_focused));
        }
        Line::from(spans)
      })
      .collect();

    // Submit "button": edit affordance when editing
    let button_style = if self.is_editing() {
      Style::default().fg(Color::Black).bg(Color::Yellow).bold()
    } else {
      Style::default().fg(Color::Black).bg(Color::Green).bold()
    };
    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
      Span::styled(format!(" {} ", self.submit_label()), button_style),
      Span::raw(" "),
      Span::styled("<Enter>", Style::default().fg(Color::Cyan)),
    ]));
    lines.push(Line::from(vec![
      Span::styled(" Limpiar / Cancelar Edición ", Style::default().fg(Color::Red)),
      Span::styled("<Ctrl-R>", Style::default().fg(Color::Cyan)),
    ]));

    frame.render_widget(Paragraph::new(lines).block(block), area);
  }
}

/// Price from user text, read from the leading number ("2.50€" is 2.5,
/// "3,5" is 3). No leading number or a non-finite one counts as 0.
pub fn parse_price(text: &str) -> f64 {
  numeric_prefix(text.trim(), true)
    .parse::<f64>()
    .ok()
    .filter(|v| v.is_finite())
    .unwrap_or(0.0)
}

/// Alert threshold from the leading integer of user text ("10 días" is 10,
/// "1.5" is 1). Negative values and text without a number count as 0.
pub fn parse_days(text: &str) -> u32 {
  numeric_prefix(text.trim(), false)
    .parse::<i64>()
    .map(|n| n.clamp(0, i64::from(u32::MAX)) as u32)
    .unwrap_or(0)
}

/// Longest prefix of `text` that reads as a number: an optional sign and
/// digits, plus a decimal part and exponent when `fractional`.
fn numeric_prefix(text: &str, fractional: bool) -> &str {
  let bytes = text.as_bytes();
  let digits_from = |start: usize| {
    start
      + bytes[start..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count()
  };

  let sign = usize::from(matches!(bytes.first(), Some(&(b'+' | b'-'))));
  let mut end = digits_from(sign);
  let mut has_digits = end > sign;

  if fractional && bytes.get(end) == Some(&b'.') {
    let frac_end = digits_from(end + 1);
    if has_digits || frac_end > end + 1 {
      has_digits = true;
      end = frac_end;
    }
  }
  if !has_digits {
    return "";
  }

  if fractional && matches!(bytes.get(end), Some(&(b'e' | b'E'))) {
    let mut exp = end + 1;
    if matches!(bytes.get(exp), Some(&(b'+' | b'-'))) {
      exp += 1;
    }
    let exp_end = digits_from(exp);
    if exp_end > exp {
      end = exp_end;
    }
  }

  // Only ASCII bytes were consumed, so `end` is a char boundary
  &text[..end]
}
