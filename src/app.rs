use std::sync::Arc;
use std::time::Duration;

use iced::task;
use iced::widget::{column, container, mouse_area};
use iced::window;
use iced::{event, keyboard, mouse, Color, Element, Fill, Padding, Size, Subscription, Task, Theme};

use crate::config::Config;
use crate::navigation::{self, Destination};
use crate::search::{Effect, Event, Region, SearchWidget, TimerKind, TimerToken, Visibility, WidgetConfig};
use crate::service::{self, SearchError, SearchService};
use crate::ui::{category_bar, result_list, search_input, theme};

/// A delayed task running on the iced executor, abortable by token
struct RunningTimer {
    token: TimerToken,
    handle: task::Handle,
}

pub struct State {
    config: Config,
    /// `None` when the configured backend could not be built; lookups then fail softly
    service: Option<Arc<dyn SearchService>>,
    widget: SearchWidget,
    selected: usize,

    /// Current window ID
    window_id: Option<window::Id>,
    debounce_timer: Option<RunningTimer>,
    inactivity_timer: Option<RunningTimer>,
    /// Pointer is over the category bar or the input row
    header_hovered: bool,
    /// Pointer is over the result panel
    panel_hovered: bool,
}

#[derive(Debug, Clone)]
pub enum Message {
    WindowOpened(window::Id),
    WindowClosed(window::Id),
    QueryChanged(String),
    Execute,
    Open(usize),
    OpenCategory(usize),
    KeyEvent(keyboard::Event),
    MousePressed,
    HeaderHovered(bool),
    PanelHovered(bool),
    /// Timer fires and fetch completions routed back into the widget
    Widget(Event),
}

impl State {
    pub fn new(config: Config) -> (Self, Task<Message>) {
        let service = match service::from_config(&config.search) {
            Ok(service) => {
                tracing::info!("Search backend: {}", service.name());
                Some(service)
            }
            Err(e) => {
                tracing::error!("Search is unavailable: {}", e);
                None
            }
        };

        let (_id, open_task) = window::open(window::Settings {
            size: Size::new(config.window.width, config.window.height),
            position: window::Position::Centered,
            decorations: false,
            transparent: true,
            level: window::Level::AlwaysOnTop,
            resizable: false,
            exit_on_close_request: true,
            ..window::Settings::default()
        });

        let state = Self {
            widget: SearchWidget::new(WidgetConfig::from(&config.search)),
            config,
            service,
            selected: 0,
            window_id: None,
            debounce_timer: None,
            inactivity_timer: None,
            header_hovered: false,
            panel_hovered: false,
        };

        (state, open_task.map(Message::WindowOpened))
    }

    pub fn title(&self, _window: window::Id) -> String {
        String::from("Scout")
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::WindowOpened(id) => {
                self.window_id = Some(id);
                Task::batch([
                    window::gain_focus(id),
                    iced::widget::operation::focus(search_input::SEARCH_INPUT_ID),
                ])
            }
            Message::WindowClosed(id) => {
                if self.window_id != Some(id) {
                    return Task::none();
                }
                self.window_id = None;
                let unmount = self.dispatch(Event::Unmount);
                tracing::info!("Window closed, exiting");
                Task::batch([unmount, iced::exit()])
            }
            Message::QueryChanged(query) => {
                self.selected = 0;
                self.dispatch(Event::QueryTyped(query))
            }
            Message::Execute => self.open_result(self.selected),
            Message::Open(index) => {
                self.selected = index;
                self.open_result(index)
            }
            Message::OpenCategory(index) => {
                if let Some(category) = self.config.category.get(index) {
                    navigation::open(&self.config.navigation, &category.link);
                }
                Task::none()
            }
            Message::KeyEvent(kb_event) => self.on_key(kb_event),
            Message::MousePressed => self.dispatch(Event::PointerDown(self.pointer_region())),
            Message::HeaderHovered(hovered) => {
                self.header_hovered = hovered;
                Task::none()
            }
            Message::PanelHovered(hovered) => {
                self.panel_hovered = hovered;
                if hovered {
                    self.dispatch(Event::PointerEnteredPanel)
                } else {
                    self.dispatch(Event::PointerLeftPanel)
                }
            }
            Message::Widget(event) => {
                match &event {
                    Event::DebounceElapsed(token) => {
                        release(&mut self.debounce_timer, *token);
                    }
                    Event::InactivityElapsed(token) => {
                        release(&mut self.inactivity_timer, *token);
                    }
                    _ => {}
                }
                self.dispatch(event)
            }
        }
    }

    pub fn view(&self, _window: window::Id) -> Element<'_, Message> {
        let header = mouse_area(
            column![
                category_bar::view(&self.config.category),
                search_input::view(
                    self.widget.query(),
                    self.widget.completion_hint(),
                    self.widget.is_fetching(),
                ),
            ]
            .spacing(12),
        )
        .on_enter(Message::HeaderHovered(true))
        .on_exit(Message::HeaderHovered(false));

        let mut content = column![header].spacing(12).padding(Padding::new(16.0));

        if self.widget.visibility() == Visibility::Visible {
            let panel = mouse_area(result_list::view(
                self.widget.displayed_results(),
                self.selected,
            ))
            .on_enter(Message::PanelHovered(true))
            .on_exit(Message::PanelHovered(false));
            content = content.push(panel);
        }

        let main = container(content)
            .width(Fill)
            .height(Fill)
            .style(theme::main_container);

        container(main).width(Fill).height(Fill).into()
    }

    pub fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            window::close_events().map(Message::WindowClosed),
            event::listen_with(|event, status, _window| match event {
                iced::Event::Keyboard(kb_event) => match &kb_event {
                    keyboard::Event::KeyPressed {
                        key:
                            keyboard::Key::Named(
                                keyboard::key::Named::Escape | keyboard::key::Named::Tab,
                            ),
                        ..
                    } => Some(Message::KeyEvent(kb_event)),
                    _ if matches!(status, event::Status::Ignored) => {
                        Some(Message::KeyEvent(kb_event))
                    }
                    _ => None,
                },
                iced::Event::Mouse(mouse::Event::ButtonPressed(_)) => Some(Message::MousePressed),
                _ => None,
            }),
        ])
    }

    pub fn theme(&self, _window: window::Id) -> Theme {
        Theme::Dark
    }

    pub fn style(&self, theme: &Theme) -> iced::theme::Style {
        let _ = theme;
        iced::theme::Style {
            background_color: Color::TRANSPARENT,
            text_color: Color::WHITE,
        }
    }

    fn on_key(&mut self, kb_event: keyboard::Event) -> Task<Message> {
        let keyboard::Event::KeyPressed {
            key: keyboard::Key::Named(named),
            ..
        } = kb_event
        else {
            return Task::none();
        };

        match named {
            keyboard::key::Named::Escape => self.dispatch(Event::Clear),
            keyboard::key::Named::Tab => {
                if self.widget.suggestion().is_empty() {
                    return Task::none();
                }
                self.selected = 0;
                let accept = self.dispatch(Event::AcceptSuggestion);
                Task::batch([
                    accept,
                    iced::widget::operation::focus(search_input::SEARCH_INPUT_ID),
                ])
            }
            keyboard::key::Named::ArrowUp => {
                self.selected = self.selected.saturating_sub(1);
                Task::none()
            }
            keyboard::key::Named::ArrowDown => {
                if self.selected + 1 < self.widget.displayed_results().len() {
                    self.selected += 1;
                }
                Task::none()
            }
            _ => Task::none(),
        }
    }

    /// The category bar counts as part of the input region
    fn pointer_region(&self) -> Region {
        if self.panel_hovered {
            Region::Panel
        } else if self.header_hovered {
            Region::Input
        } else {
            Region::Outside
        }
    }

    fn open_result(&mut self, index: usize) -> Task<Message> {
        let Some(record) = self.widget.displayed_results().get(index) else {
            return Task::none();
        };
        let destination = Destination::for_record(record, &self.config.navigation.path_prefix);
        navigation::open(&self.config.navigation, &destination.href());
        self.dispatch(Event::Clear)
    }

    // ---- Widget plumbing ----

    /// Feed one event to the widget and turn its effects into tasks.
    fn dispatch(&mut self, event: Event) -> Task<Message> {
        let mut effects = self.widget.handle(event);

        // A panel that disappears under the pointer never reports an exit
        if self.panel_hovered && self.widget.visibility() == Visibility::Hidden {
            self.panel_hovered = false;
            effects.extend(self.widget.handle(Event::PointerLeftPanel));
        }
        if self.widget.visibility() == Visibility::Hidden {
            self.selected = 0;
        }

        let tasks: Vec<Task<Message>> = effects
            .into_iter()
            .map(|effect| self.apply(effect))
            .collect();
        Task::batch(tasks)
    }

    fn apply(&mut self, effect: Effect) -> Task<Message> {
        match effect {
            Effect::Schedule { kind, token, after } => {
                let (task, handle) = delayed(kind, token, after).abortable();
                let slot = self.timer_slot(kind);
                if let Some(previous) = slot.replace(RunningTimer { token, handle }) {
                    previous.handle.abort();
                }
                task
            }
            Effect::Cancel { kind, token } => {
                let slot = self.timer_slot(kind);
                if slot.as_ref().is_some_and(|t| t.token == token) {
                    if let Some(timer) = slot.take() {
                        timer.handle.abort();
                    }
                }
                Task::none()
            }
            Effect::Fetch { token, query } => match &self.service {
                Some(service) => Task::perform(service.search(&query), move |outcome| {
                    Message::Widget(Event::FetchCompleted { token, outcome })
                }),
                None => Task::done(Message::Widget(Event::FetchCompleted {
                    token,
                    outcome: Err(SearchError::NotConfigured("no search backend".into())),
                })),
            },
        }
    }

    fn timer_slot(&mut self, kind: TimerKind) -> &mut Option<RunningTimer> {
        match kind {
            TimerKind::Debounce => &mut self.debounce_timer,
            TimerKind::Inactivity => &mut self.inactivity_timer,
        }
    }
}

impl Drop for State {
    fn drop(&mut self) {
        for timer in [self.debounce_timer.take(), self.inactivity_timer.take()]
            .into_iter()
            .flatten()
        {
            timer.handle.abort();
        }
    }
}

/// Sleep on the runtime, then deliver the elapsed event for `kind`.
fn delayed(kind: TimerKind, token: TimerToken, after: Duration) -> Task<Message> {
    Task::perform(
        async move { tokio::time::sleep(after).await },
        move |_| {
            Message::Widget(match kind {
                TimerKind::Debounce => Event::DebounceElapsed(token),
                TimerKind::Inactivity => Event::InactivityElapsed(token),
            })
        },
    )
}

/// Forget a timer that fired on its own.
fn release(slot: &mut Option<RunningTimer>, token: TimerToken) {
    if slot.as_ref().is_some_and(|t| t.token == token) {
        slot.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::record::fixtures::topic;
    use crate::service::SearchResponse;

    fn state_with_results() -> State {
        let (mut state, _) = State::new(Config::default());
        let effects = state.widget.handle(Event::QueryTyped("sonic".into()));
        let token = effects
            .iter()
            .find_map(|e| match e {
                Effect::Schedule { token, .. } => Some(*token),
                _ => None,
            })
            .unwrap();
        state.widget.handle(Event::DebounceElapsed(token));
        state.widget.handle(Event::FetchCompleted {
            token,
            outcome: Ok(SearchResponse::ok(vec![topic(1, "SONiC Networking")])),
        });
        assert_eq!(state.widget.visibility(), Visibility::Visible);
        state
    }

    #[test]
    fn click_on_category_bar_keeps_results() {
        let mut state = state_with_results();
        let _ = state.update(Message::HeaderHovered(true));
        assert_eq!(state.pointer_region(), Region::Input);
        let _ = state.update(Message::MousePressed);
        assert_eq!(state.widget.visibility(), Visibility::Visible);
    }

    #[test]
    fn click_outside_header_and_panel_dismisses() {
        let mut state = state_with_results();
        let _ = state.update(Message::HeaderHovered(true));
        let _ = state.update(Message::HeaderHovered(false));
        assert_eq!(state.pointer_region(), Region::Outside);
        let _ = state.update(Message::MousePressed);
        assert_eq!(state.widget.visibility(), Visibility::Hidden);
    }
}
