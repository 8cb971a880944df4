use crate::api::{ApiError, Crop, CropApi};
use crate::filter::{filter_crops, normalize_query};
use crate::store::DataStore;
use crate::sync::{feedback, MutationKind, SyncLayer, SyncOutcome};
use crate::ui::components::{
  ConfirmDialog, ConfirmEvent, CropForm, FormEvent, KeyResult, Notice, NoticeKind, SearchEvent,
  SearchInput, Submission,
};
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::{format_money, harvest_style, margin_color, truncate};
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crate::ui::views::CropDetailView;
use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap};
use std::sync::Arc;
use tracing::{debug, error};

const EMPTY_MESSAGE: &str = "No se encontraron cultivos que coincidan con la búsqueda.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
  Table,
  Form,
}

/// Main view: crop table, add/edit form, search and dialogs
pub struct CropListView {
  sync: SyncLayer,
  store: DataStore,
  api_url: String,
  /// Set when the last load failed; cleared by the next successful one
  load_error: Option<String>,

  // Table state. `rows` holds the names of the rendered rows in order, so
  // the selection always resolves against what is on screen.
  table_state: TableState,
  rows: Vec<String>,
  focus: Focus,

  // Components
  search: SearchInput,
  form: CropForm,
  confirm: ConfirmDialog<String>,
  notice: Notice,
}

impl CropListView {
  pub fn new(api: Arc<dyn CropApi>, api_url: String) -> Self {
    let mut sync = SyncLayer::new(api);

    // Start fetching immediately
    sync.load_all();

    Self {
      sync,
      store: DataStore::new(),
      api_url,
      load_error: None,
      table_state: TableState::default(),
      rows: Vec::new(),
      focus: Focus::Table,
      search: SearchInput::new(),
      form: CropForm::new(),
      confirm: ConfirmDialog::new(),
      notice: Notice::new(),
    }
  }

  /// Recompute the rendered rows from the store and the current query
  fn refresh_rows(&mut self) {
    self.rows = filter_crops(self.store.crops(), self.search.query())
      .into_iter()
      .map(|c| c.name.clone())
      .collect();
    ensure_valid_selection(&mut self.table_state, self.rows.len());
  }

  /// Snapshot of the crop on the selected row
  fn selected_crop(&self) -> Option<Crop> {
    let idx = self.table_state.selected()?;
    let name = self.rows.get(idx)?;
    self.store.find(name).cloned()
  }

  fn move_selection(&mut self, delta: i32) {
    let len = self.rows.len();
    if len == 0 {
      return;
    }
    let current = self.table_state.selected().unwrap_or(0) as i32;
    let next = (current + delta).rem_euclid(len as i32) as usize;
    self.table_state.select(Some(next));
  }

  fn apply(&mut self, outcome: SyncOutcome) {
    match outcome {
      SyncOutcome::Loaded(Ok(crops)) => {
        self.store.replace(crops);
        self.load_error = None;
        self.refresh_rows();
      }
      SyncOutcome::Loaded(Err(e)) => {
        error!(error = %e, url = %self.api_url, "Error loading crops");
        self.load_error = Some(load_error_text(&e, &self.api_url));
      }
      SyncOutcome::Mutated { kind, result } => {
        let (message, is_error) = feedback(kind, &result);
        if result.is_ok() && matches!(kind, MutationKind::Create | MutationKind::Update) {
          self.form.reset();
          self.focus = Focus::Table;
        }
        let notice_kind = if is_error {
          NoticeKind::Error
        } else {
          NoticeKind::Info
        };
        self.notice.show(message, notice_kind);
      }
    }
  }

  fn submit(&mut self, submission: Submission) {
    match submission {
      Submission::Create(payload) => self.sync.create(payload),
      Submission::Update {
        original_name,
        payload,
      } => self.sync.update(original_name, payload),
    }
  }

  fn handle_form_key(&mut self, key: KeyEvent) {
    match self.form.handle_key(key) {
      KeyResult::Event(FormEvent::Submit(submission)) => self.submit(submission),
      KeyResult::Event(FormEvent::Invalid(message)) => {
        self.notice.show(message, NoticeKind::Error);
      }
      KeyResult::Event(FormEvent::Blur) => self.focus = Focus::Table,
      KeyResult::Handled | KeyResult::NotHandled => {}
    }
  }

  fn render_table(&mut self, frame: &mut Frame, area: Rect) {
    let total = self.store.crops().len();
    let query = normalize_query(self.search.query());
    let title = if !self.store.is_loaded() && self.sync.is_loading() {
      " Cultivos (cargando...) ".to_string()
    } else if query.is_empty() {
      format!(" Cultivos ({}) ", total)
    } else {
      format!(" Cultivos ({}/{}) [/{}] ", self.rows.len(), total, query)
    };

    let border = if self.focus == Focus::Table {
      Color::Blue
    } else {
      Color::DarkGray
    };
    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(border));

    if let Some(err) = &self.load_error {
      let paragraph = Paragraph::new(err.as_str())
        .block(block)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::Red));
      frame.render_widget(paragraph, area);
      return;
    }

    if !self.store.is_loaded() {
      let paragraph = Paragraph::new("Cargando datos de la API...")
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    }

    if self.rows.is_empty() {
      let row = Row::new(vec![Cell::from(Line::from(EMPTY_MESSAGE).centered())]);
      let table = Table::new(vec![row], [Constraint::Percentage(100)])
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(table, area);
      return;
    }

    let rows: Vec<Row> = self
      .rows
      .iter()
      .filter_map(|name| self.store.find(name))
      .map(crop_row)
      .collect();

    let header = Row::new(vec![
      "Nombre", "Zona", "Siembra", "Cosecha", "Faltan", "Margen", "",
    ])
    .style(Style::default().fg(Color::Yellow).bold());

    let widths = [
      Constraint::Min(12),
      Constraint::Length(12),
      Constraint::Length(10),
      Constraint::Length(10),
      Constraint::Min(14),
      Constraint::Length(10),
      Constraint::Length(7),
    ];

    let table = Table::new(rows, widths)
      .header(header)
      .block(block)
      .row_highlight_style(
        Style::default()
          .bg(Color::DarkGray)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol("> ");

    frame.render_stateful_widget(table, area, &mut self.table_state);
  }

  fn render_summary(&self, frame: &mut Frame, area: Rect) {
    if !self.store.is_loaded() || area.height == 0 {
      return;
    }

    let totals = self.store.totals();
    let margin = totals.margin();
    let totals_line = Line::from(vec![
      Span::styled(" Compra total: ", Style::default().fg(Color::DarkGray)),
      Span::raw(format_money(totals.purchase)),
      Span::styled("   Venta total: ", Style::default().fg(Color::DarkGray)),
      Span::raw(format_money(totals.sale)),
      Span::styled("   Margen: ", Style::default().fg(Color::DarkGray)),
      Span::styled(
        format_money(margin),
        Style::default().fg(margin_color(margin)).bold(),
      ),
    ]);

    let pending = self.store.pending_harvests();
    let reminder_line = if pending.is_empty() {
      Line::styled(
        " Todo al día. Ninguna cosecha lista hoy.",
        Style::default().fg(Color::Green),
      )
    } else {
      Line::styled(
        format!(" ¡ATENCIÓN! Cosecha pendiente: {}", pending.join(", ")),
        Style::default().fg(Color::Yellow).bold(),
      )
    };

    frame.render_widget(Paragraph::new(vec![totals_line, reminder_line]), area);
  }
}

/// One table row for a crop
fn crop_row(crop: &Crop) -> Row<'static> {
  let margin = crop.margin();
  Row::new(vec![
    Cell::from(truncate(&crop.name, 24)).style(Style::default().fg(Color::Cyan)),
    Cell::from(truncate(&crop.zone, 12)),
    Cell::from(crop.planted_on.clone()),
    Cell::from(crop.harvest_on.clone()),
    Cell::from(crop.days_remaining.clone()).style(harvest_style(crop.harvest_status())),
    Cell::from(format_money(margin)).style(Style::default().fg(margin_color(margin))),
    Cell::from("[e][d]").style(Style::default().fg(Color::DarkGray)),
  ])
}

/// Persistent message shown in place of the table after a failed load
fn load_error_text(err: &ApiError, api_url: &str) -> String {
  match err {
    ApiError::Connectivity(_) => format!(
      "ERROR: No se pudo conectar con el servidor. Asegúrate de que esté corriendo en {}. \
       Pulsa 'r' para reintentar.",
      api_url
    ),
    ApiError::Rejected { status, message } => format!(
      "ERROR {}: {}. Pulsa 'r' para reintentar.",
      status,
      message
        .as_deref()
        .unwrap_or("el servidor no devolvió la lista de cultivos")
    ),
  }
}

impl View for CropListView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    // Modal overlays first: nothing else reacts while they are open
    if !matches!(self.notice.handle_key(key), KeyResult::NotHandled) {
      return ViewAction::None;
    }

    match self.confirm.handle_key(key) {
      KeyResult::Event(ConfirmEvent::Accepted(name)) => {
        self.sync.delete(name);
        return ViewAction::None;
      }
      KeyResult::Event(ConfirmEvent::Declined) => {
        debug!("Delete declined");
        return ViewAction::None;
      }
      KeyResult::Handled => return ViewAction::None,
      KeyResult::NotHandled => {}
    }

    if self.focus == Focus::Form {
      self.handle_form_key(key);
      return ViewAction::None;
    }

    match self.search.handle_key(key) {
      KeyResult::Event(SearchEvent::Changed(_)) => {
        self.refresh_rows();
        return ViewAction::None;
      }
      KeyResult::Event(SearchEvent::Submitted) | KeyResult::Handled => return ViewAction::None,
      KeyResult::NotHandled => {}
    }

    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.move_selection(1),
      KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1),
      KeyCode::Enter => {
        if let Some(crop) = self.selected_crop() {
          return ViewAction::Push(Box::new(CropDetailView::new(crop)));
        }
      }
      KeyCode::Char('e') => {
        if let Some(crop) = self.selected_crop() {
          debug!(name = %crop.name, "Editing crop");
          self.form.enter_edit(&crop);
          self.focus = Focus::Form;
        }
      }
      KeyCode::Char('d') => {
        if let Some(crop) = self.selected_crop() {
          self.confirm.show(
            format!(
              "¿Estás seguro de que deseas eliminar el cultivo: {}?",
              crop.name
            ),
            crop.name,
          );
        }
      }
      KeyCode::Char('a') | KeyCode::Tab => self.focus = Focus::Form,
      KeyCode::Char('r') => self.sync.load_all(),
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let columns = Layout::default()
      .direction(Direction::Horizontal)
      .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
      .split(area);

    let left = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Min(3),    // Table
        Constraint::Length(2), // Totals + harvest reminder
      ])
      .split(columns[0]);

    self.render_table(frame, left[0]);
    self.render_summary(frame, left[1]);
    self
      .form
      .render(frame, columns[1], self.focus == Focus::Form);

    self.search.render_overlay(frame, left[0]);
    self.confirm.render_overlay(frame, area);
    self.notice.render_overlay(frame, area);
  }

  fn breadcrumb_label(&self) -> String {
    "Cultivos".to_string()
  }

  fn tick(&mut self) {
    for outcome in self.sync.poll() {
      self.apply(outcome);
    }
  }

  fn loaded_at(&self) -> Option<DateTime<Local>> {
    self.store.loaded_at()
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    if self.notice.is_active() {
      return vec![ShortcutInfo::new("Enter", "aceptar")];
    }
    if self.confirm.is_active() {
      return vec![
        ShortcutInfo::new("s", "sí").with_priority(10),
        ShortcutInfo::new("n", "no").with_priority(20),
      ];
    }
    if self.search.is_active() {
      return vec![
        ShortcutInfo::new("Enter", "aplicar").with_priority(10),
        ShortcutInfo::new("Esc", "limpiar").with_priority(20),
      ];
    }

    match self.focus {
      Focus::Table => vec![
        ShortcutInfo::new("/", "buscar").with_priority(10),
        ShortcutInfo::new("a", "formulario").with_priority(20),
        ShortcutInfo::new("e", "editar").with_priority(30),
        ShortcutInfo::new("d", "eliminar").with_priority(40),
        ShortcutInfo::new("r", "recargar").with_priority(50),
        ShortcutInfo::new("q", "salir").with_priority(90),
      ],
      Focus::Form => vec![
        ShortcutInfo::new("Tab", "campo").with_priority(10),
        ShortcutInfo::new("Enter", "guardar").with_priority(20),
        ShortcutInfo::new("Ctrl-R", "limpiar").with_priority(30),
        ShortcutInfo::new("Esc", "tabla").with_priority(40),
      ],
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::fake::{crop, Call, FakeApi};
  use crate::api::{ApiMessage, CropPayload};
  use crate::ui::components::FormField;
  use crossterm::event::KeyModifiers;
  use ratatui::backend::TestBackend;
  use std::time::Duration;

  const URL: &str = "http://127.0.0.1:5000/api/v1/cultivos";

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn press(view: &mut CropListView, code: KeyCode) -> ViewAction {
    view.handle_key(key(code))
  }

  fn type_str(view: &mut CropListView, s: &str) {
    for c in s.chars() {
      press(view, KeyCode::Char(c));
    }
  }

  /// Let spawned requests finish and feed their outcomes to the view
  async fn settle(view: &mut CropListView) {
    for _ in 0..10 {
      tokio::time::sleep(Duration::from_millis(5)).await;
      view.tick();
    }
  }

  fn sample() -> Vec<Crop> {
    let mut garlic = crop("Ajo", 0.5, 1.0);
    garlic.days_remaining = "¡COSECHA HOY!".to_string();
    vec![crop("Tomate", 2.5, 4.0), garlic, crop("Pimiento", 4.0, 1.0)]
  }

  async fn loaded_view(crops: Vec<Crop>) -> (FakeApi, CropListView) {
    let api = FakeApi::new(crops);
    let mut view = CropListView::new(Arc::new(api.clone()), URL.to_string());
    settle(&mut view).await;
    (api, view)
  }

  fn render_text(view: &mut CropListView) -> String {
    let mut terminal = Terminal::new(TestBackend::new(140, 30)).unwrap();
    terminal.draw(|f| view.render(f, f.area())).unwrap();
    let buffer = terminal.backend().buffer();
    buffer
      .content
      .chunks(buffer.area.width as usize)
      .map(|line| line.iter().map(|cell| cell.symbol()).collect::<String>())
      .collect::<Vec<_>>()
      .join("\n")
  }

  #[tokio::test]
  async fn test_initial_load_renders_rows_in_server_order() {
    let (api, mut view) = loaded_view(sample()).await;

    assert_eq!(api.list_calls(), 1);
    assert_eq!(view.rows, vec!["Tomate", "Ajo", "Pimiento"]);

    let text = render_text(&mut view);
    assert!(text.contains("Tomate"));
    assert!(text.contains("€1.50"));
    assert!(text.contains("€-3.00"));
    assert!(text.contains("Cosecha pendiente: Ajo"));
  }

  #[tokio::test]
  async fn test_empty_store_renders_info_row() {
    let (_api, mut view) = loaded_view(Vec::new()).await;
    let text = render_text(&mut view);
    assert!(text.contains("No se encontraron cultivos"));
    assert!(text.contains("Todo al día"));
  }

  #[tokio::test]
  async fn test_load_failure_is_persistent_error() {
    let api = FakeApi::new(Vec::new());
    api.fail_list(ApiError::Connectivity("connection refused".to_string()));
    let mut view = CropListView::new(Arc::new(api.clone()), URL.to_string());
    settle(&mut view).await;

    let text = render_text(&mut view);
    assert!(text.contains("ERROR: No se pudo conectar con el servidor"));
    // Single attempt, no retry
    settle(&mut view).await;
    assert_eq!(api.list_calls(), 1);
    assert!(view.load_error.is_some());
  }

  #[tokio::test]
  async fn test_filter_is_local_and_reversible() {
    let (api, mut view) = loaded_view(sample()).await;

    press(&mut view, KeyCode::Char('/'));
    type_str(&mut view, "PIM");
    assert_eq!(view.rows, vec!["Pimiento"]);

    press(&mut view, KeyCode::Esc);
    assert_eq!(view.rows, vec!["Tomate", "Ajo", "Pimiento"]);
    assert_eq!(view.store.crops().len(), 3);

    settle(&mut view).await;
    assert_eq!(api.list_calls(), 1);
  }

  #[tokio::test]
  async fn test_filter_survives_reload() {
    let (_api, mut view) = loaded_view(sample()).await;
    press(&mut view, KeyCode::Char('/'));
    type_str(&mut view, "ajo");
    press(&mut view, KeyCode::Enter);

    press(&mut view, KeyCode::Char('r'));
    settle(&mut view).await;
    assert_eq!(view.rows, vec!["Ajo"]);
  }

  #[tokio::test]
  async fn test_selection_resolves_against_filtered_rows() {
    let (_api, mut view) = loaded_view(sample()).await;
    press(&mut view, KeyCode::Char('/'));
    type_str(&mut view, "pim");
    press(&mut view, KeyCode::Enter);

    press(&mut view, KeyCode::Char('e'));
    assert_eq!(view.form.original_name(), Some("Pimiento"));
  }

  #[tokio::test]
  async fn test_unchanged_edit_puts_to_original_name_then_reloads() {
    let (api, mut view) = loaded_view(sample()).await;

    press(&mut view, KeyCode::Char('e'));
    assert_eq!(view.focus, Focus::Form);
    assert_eq!(view.form.submit_label(), "Guardar Cambios de Tomate");

    press(&mut view, KeyCode::Enter);
    settle(&mut view).await;

    assert_eq!(
      api.calls(),
      vec![
        Call::List,
        Call::Update(
          "Tomate".to_string(),
          CropPayload::from(&crop("Tomate", 2.5, 4.0))
        ),
        Call::List,
      ]
    );
    assert_eq!(view.notice.message(), Some("Cultivo actualizado."));
    assert!(!view.form.is_editing());
    assert_eq!(view.focus, Focus::Table);
  }

  #[tokio::test]
  async fn test_create_uses_server_message() {
    let (api, mut view) = loaded_view(Vec::new()).await;
    api.respond_to_mutations(Ok(ApiMessage {
      message: Some("Cultivo 'Ajo' añadido correctamente.".to_string()),
      error: None,
    }));

    press(&mut view, KeyCode::Char('a'));
    view.form.set_value(FormField::Name, "Ajo");
    view.form.set_value(FormField::PlantedOn, "2026-10-01");
    view.form.set_value(FormField::HarvestOn, "2027-05-01");
    press(&mut view, KeyCode::Enter);
    settle(&mut view).await;

    let calls = api.calls();
    assert_eq!(calls.len(), 3);
    match &calls[1] {
      Call::Create(payload) => {
        assert_eq!(payload.name, "Ajo");
        assert_eq!(payload.purchase_price, 0.0);
        assert_eq!(payload.alert_days, 7);
      }
      other => panic!("expected create, got {:?}", other),
    }
    assert_eq!(calls[2], Call::List);
    assert_eq!(
      view.notice.message(),
      Some("Cultivo 'Ajo' añadido correctamente.")
    );
    assert_eq!(view.form.value(FormField::Name), "");
  }

  #[tokio::test]
  async fn test_failed_update_keeps_form_input() {
    let (api, mut view) = loaded_view(sample()).await;
    api.respond_to_mutations(Err(ApiError::Rejected {
      status: 400,
      message: Some("Formato de fecha inválido.".to_string()),
    }));

    press(&mut view, KeyCode::Char('e'));
    view.form.set_value(FormField::HarvestOn, "15/06/2026");
    press(&mut view, KeyCode::Enter);
    settle(&mut view).await;

    assert_eq!(
      view.notice.message(),
      Some("Error 400: Formato de fecha inválido.")
    );
    assert_eq!(view.form.original_name(), Some("Tomate"));
    assert_eq!(view.form.value(FormField::HarvestOn), "15/06/2026");
    assert_eq!(api.list_calls(), 1);
  }

  #[tokio::test]
  async fn test_missing_required_fields_sends_nothing() {
    let (api, mut view) = loaded_view(sample()).await;

    press(&mut view, KeyCode::Char('a'));
    type_str(&mut view, "Ajo");
    press(&mut view, KeyCode::Enter);
    settle(&mut view).await;

    assert_eq!(api.calls(), vec![Call::List]);
    assert_eq!(
      view.notice.message(),
      Some("Por favor, rellena el nombre, la fecha de siembra y la fecha de cosecha.")
    );
    // Input kept for correction
    assert_eq!(view.form.value(FormField::Name), "Ajo");
  }

  #[tokio::test]
  async fn test_delete_requires_confirmation() {
    let (api, mut view) = loaded_view(sample()).await;

    press(&mut view, KeyCode::Char('d'));
    assert!(view.confirm.is_active());
    press(&mut view, KeyCode::Char('n'));
    settle(&mut view).await;
    assert_eq!(api.calls(), vec![Call::List]);

    press(&mut view, KeyCode::Char('j'));
    press(&mut view, KeyCode::Char('d'));
    press(&mut view, KeyCode::Char('s'));
    settle(&mut view).await;

    assert_eq!(
      api.calls(),
      vec![Call::List, Call::Delete("Ajo".to_string()), Call::List]
    );
    assert_eq!(view.notice.message(), Some("Cultivo eliminado."));
  }

  #[tokio::test]
  async fn test_notice_blocks_other_keys() {
    let (api, mut view) = loaded_view(sample()).await;
    view.notice.show("Aviso", NoticeKind::Info);

    press(&mut view, KeyCode::Char('d'));
    assert!(!view.confirm.is_active());

    press(&mut view, KeyCode::Enter);
    assert!(!view.notice.is_active());
    assert_eq!(api.calls(), vec![Call::List]);
  }

  #[tokio::test]
  async fn test_cancel_edit_restores_add_mode() {
    let (_api, mut view) = loaded_view(sample()).await;

    press(&mut view, KeyCode::Char('e'));
    view.handle_key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL));

    assert_eq!(view.form.submit_label(), "Añadir Cultivo");
    assert_eq!(view.form.original_name(), None);
  }

  #[tokio::test]
  async fn test_enter_opens_detail_and_q_pops() {
    let (_api, mut view) = loaded_view(sample()).await;
    assert!(matches!(
      press(&mut view, KeyCode::Enter),
      ViewAction::Push(_)
    ));
    assert!(matches!(press(&mut view, KeyCode::Char('q')), ViewAction::Pop));
  }
}
