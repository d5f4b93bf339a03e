use std::sync::Arc;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::layout::Rect;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use url::{Url, form_urlencoded};

use crate::dataset::Dataset;
use crate::deck::Selection;
use crate::enhance::Enhancer;
use crate::source::{self, DataSource};

const PLACEHOLDER_IMAGE_BASE: &str = "https://placehold.co/250x180/e0cffc/7e3aed";

#[derive(Debug)]
pub enum AppEvent {
    DatasetLoaded(Dataset),
    PromptExpanded { serial: u64, prompt: Option<String> },
    ActionsGenerated { serial: u64, actions: Option<Vec<String>> },
}

pub struct App {
    dataset: Dataset,
    selection: Selection,
    rng: StdRng,
    enhancer: Arc<dyn Enhancer>,
    runtime: Handle,
    events_tx: UnboundedSender<AppEvent>,
    events_rx: UnboundedReceiver<AppEvent>,

    pub(crate) show_help: bool,
    pub(crate) help_scroll: u16,
    pub(crate) status_message: Option<String>,

    // UI areas for mouse support
    pub(crate) card_area: Rect,
    pub(crate) expand_btn: Rect,
    pub(crate) more_actions_btn: Rect,
    pub(crate) image_btn: Rect,
    pub(crate) shuffle_btn: Rect,
}

impl App {
    pub fn new(enhancer: Arc<dyn Enhancer>, runtime: Handle, seed: Option<u64>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            dataset: Dataset::empty(),
            selection: Selection::default(),
            rng,
            enhancer,
            runtime,
            events_tx,
            events_rx,
            show_help: false,
            help_scroll: 0,
            status_message: None,
            card_area: Rect::default(),
            expand_btn: Rect::default(),
            more_actions_btn: Rect::default(),
            image_btn: Rect::default(),
            shuffle_btn: Rect::default(),
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    // The dataset arrives later as `AppEvent::DatasetLoaded`.
    pub fn start_loading(&self, source: DataSource) {
        let tx = self.events_tx.clone();
        self.runtime.spawn(async move {
            let dataset = source::load_dataset(&source).await;
            let _ = tx.send(AppEvent::DatasetLoaded(dataset));
        });
    }

    pub fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply(event);
        }
    }

    // `false` once no sender is left.
    pub async fn process_next_event(&mut self) -> bool {
        match self.events_rx.recv().await {
            Some(event) => {
                self.apply(event);
                true
            }
            None => false,
        }
    }

    pub fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::DatasetLoaded(dataset) => {
                self.dataset = dataset;
                self.shuffle();
            }
            AppEvent::PromptExpanded { serial, prompt } => {
                self.selection = self.selection.finish_expanding(serial, prompt);
            }
            AppEvent::ActionsGenerated { serial, actions } => {
                self.selection = self.selection.finish_generating(serial, actions);
            }
        }
    }

    pub fn shuffle(&mut self) {
        self.selection = self.selection.select_next(&self.dataset, &mut self.rng);
        self.status_message = None;
        if let Some(card) = self.selection.card() {
            tracing::debug!(concept = card.concept(), "new card");
        }
    }

    pub fn flip(&mut self) {
        self.selection = self.selection.toggle_flip();
    }

    pub fn request_expand_prompt(&mut self) {
        let Some(next) = self.selection.start_expanding() else {
            return;
        };
        let Some(prompt) = next.card().map(|c| c.prompt().to_string()) else {
            return;
        };
        let serial = next.serial();
        self.selection = next;

        let enhancer = Arc::clone(&self.enhancer);
        let tx = self.events_tx.clone();
        self.runtime.spawn(async move {
            let prompt = match enhancer.expand_prompt(&prompt).await {
                Ok(expanded) => Some(expanded),
                Err(e) => {
                    tracing::error!(error = %e, "prompt expansion failed");
                    None
                }
            };
            let _ = tx.send(AppEvent::PromptExpanded { serial, prompt });
        });
    }

    pub fn request_more_actions(&mut self) {
        let Some(next) = self.selection.start_generating() else {
            return;
        };
        let Some((prompt, existing)) = next
            .card()
            .map(|c| (c.prompt().to_string(), c.actions()))
        else {
            return;
        };
        let serial = next.serial();
        self.selection = next;

        let enhancer = Arc::clone(&self.enhancer);
        let tx = self.events_tx.clone();
        self.runtime.spawn(async move {
            let actions = match enhancer.more_actions(&prompt, &existing).await {
                Ok(actions) => Some(actions),
                Err(e) => {
                    tracing::error!(error = %e, "action generation failed");
                    None
                }
            };
            let _ = tx.send(AppEvent::ActionsGenerated { serial, actions });
        });
    }

    pub fn image_url(&self) -> Option<Url> {
        let card = self.selection.card()?;
        match placeholder_image_url(card.concept()) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!(error = %e, "could not build image link");
                None
            }
        }
    }

    pub fn open_image(&mut self) {
        let Some(url) = self.image_url() else {
            return;
        };
        if let Err(e) = open::that(url.as_str()) {
            tracing::warn!(%url, error = %e, "could not open image link");
            self.status_message = Some("Could not open the image link".to_string());
        }
    }
}

pub fn placeholder_image_url(concept: &str) -> std::result::Result<Url, url::ParseError> {
    Url::parse(&format!("{PLACEHOLDER_IMAGE_BASE}?text={}", encode_component(concept)))
}

// URI component escaping: spaces become %20 and `!'()~` stay literal.
fn encode_component(text: &str) -> String {
    let mut encoded = form_urlencoded::byte_serialize(text.as_bytes())
        .collect::<String>()
        .replace('+', "%20");
    let literals = [("%21", "!"), ("%27", "'"), ("%28", "("), ("%29", ")"), ("%7E", "~")];
    for (escaped, literal) in literals {
        encoded = encoded.replace(escaped, literal);
    }
    encoded
}

fn inside_rect(mouse: MouseEvent, rect: Rect) -> bool {
    mouse.row >= rect.y
        && mouse.row < rect.y + rect.height
        && mouse.column >= rect.x
        && mouse.column < rect.x + rect.width
}

/// Returns `true` when the app should quit.
pub fn handle_key(app: &mut App, key: KeyEvent) -> Result<bool> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(true);
    }

    if app.show_help {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('?') => {
                app.show_help = false;
                app.help_scroll = 0;
            }
            KeyCode::Up => {
                app.help_scroll = app.help_scroll.saturating_sub(1);
            }
            KeyCode::Down => {
                app.help_scroll = app.help_scroll.saturating_add(1);
            }
            KeyCode::Char('q') => return Ok(true),
            _ => {}
        }
        return Ok(false);
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
        KeyCode::Char(' ') | KeyCode::Enter => app.flip(),
        KeyCode::Char('n') | KeyCode::Char('s') | KeyCode::Tab => app.shuffle(),
        KeyCode::Char('e') if app.selection.is_flipped() => app.request_expand_prompt(),
        KeyCode::Char('m') if app.selection.is_flipped() => app.request_more_actions(),
        KeyCode::Char('o') => app.open_image(),
        KeyCode::Char('?') => app.show_help = true,
        _ => {}
    }
    Ok(false)
}

pub fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.show_help {
        match mouse.kind {
            MouseEventKind::ScrollUp => {
                app.help_scroll = app.help_scroll.saturating_sub(3);
            }
            MouseEventKind::ScrollDown => {
                app.help_scroll = app.help_scroll.saturating_add(3);
            }
            _ => {}
        }
        return;
    }

    if !matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
        return;
    }

    // Buttons sit on top of the card, so they are checked first.
    if app.selection.is_flipped() && inside_rect(mouse, app.expand_btn) {
        app.request_expand_prompt();
    } else if app.selection.is_flipped() && inside_rect(mouse, app.more_actions_btn) {
        app.request_more_actions();
    } else if inside_rect(mouse, app.card_area) {
        app.flip();
    } else if inside_rect(mouse, app.image_btn) {
        app.open_image();
    } else if inside_rect(mouse, app.shuffle_btn) {
        app.shuffle();
    }
}
