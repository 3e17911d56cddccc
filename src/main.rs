//! skywatch - current conditions, alerts and forecast for a location

use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend, layout::Rect};
use skywatch::action::Action;
use skywatch::api::WeatherApiClient;
use skywatch::components::{Component, WeatherDisplay, WeatherDisplayProps};
use skywatch::config::AppConfig;
use skywatch::effect::Effect;
use skywatch::reducer::reducer;
use skywatch::state::{AppState, FailurePolicy, LOADING_ANIM_TICK_MS, Theme};
use skywatch::telemetry;
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

/// Weather lookup TUI backed by WeatherAPI.com
#[derive(Parser, Debug)]
#[command(name = "skywatch")]
#[command(about = "Current conditions, alerts and a short forecast in the terminal")]
struct Args {
    /// Location to search on start-up (city, postcode, "lat,lon", ...)
    #[arg(long, short)]
    location: Option<String>,

    /// How a network failure in one lookup affects the others
    #[arg(long, value_enum)]
    policy: Option<FailurePolicy>,

    /// Forecast days to request (1-14)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=14))]
    days: Option<u8>,

    /// Start with the dark theme
    #[arg(long)]
    dark: bool,

    /// Config file (defaults to ./skywatch.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Append tracing output to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum SkywatchComponentId {
    Display,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum SkywatchContext {
    Main,
}

impl EventRoutingState<SkywatchComponentId, SkywatchContext> for AppState {
    fn focused(&self) -> Option<SkywatchComponentId> {
        Some(SkywatchComponentId::Display)
    }

    fn modal(&self) -> Option<SkywatchComponentId> {
        None
    }

    fn binding_context(&self, _id: SkywatchComponentId) -> SkywatchContext {
        SkywatchContext::Main
    }

    fn default_context(&self) -> SkywatchContext {
        SkywatchContext::Main
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args {
        location,
        policy,
        days,
        dark,
        config: config_path,
        log_file,
        debug: debug_args,
    } = Args::parse();

    let mut config = match AppConfig::load(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: could not load configuration.");
            eprintln!("Details: {}", e);
            std::process::exit(1);
        }
    };
    if location.is_some() {
        config.location = location;
    }
    if let Some(policy) = policy {
        config.failure_policy = policy;
    }
    if let Some(days) = days {
        config.forecast_days = days;
    }
    if dark {
        config.dark_mode = true;
    }
    if log_file.is_some() {
        config.log_file = log_file;
    }

    telemetry::init(config.log_file.as_deref())?;

    let client = match WeatherApiClient::from_config(&config) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Set SKYWATCH_API_KEY or add api_key to skywatch.toml.");
            std::process::exit(1);
        }
    };

    let debug = DebugSession::new(debug_args);

    // Export JSON schemas if requested
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let startup_query = config.location.clone().unwrap_or_default();
    let initial_search = Some(startup_query.clone())
        .filter(|q| !q.trim().is_empty())
        .map(Action::SearchSubmit);

    let state = debug
        .load_state_or_else_async({
            let config = config.clone();
            move || async move {
                let mut state = AppState::new(startup_query);
                state.policy = config.failure_policy;
                state.forecast_days = config.forecast_days;
                if config.dark_mode {
                    state.theme = Theme::Dark;
                }
                Ok::<AppState, io::Error>(state)
            }
        })
        .await
        .map_err(debug_error)?;

    tracing::info!(
        policy = ?state.policy,
        days = state.forecast_days,
        "starting skywatch"
    );

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;

    let (middleware, action_recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(
        &mut terminal,
        &debug,
        store,
        client,
        initial_search,
        replay_actions,
    )
    .await;

    // ===== Cleanup =====
    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug
        .save_actions(action_recorder.as_ref())
        .map_err(debug_error)?;

    Ok(())
}

struct SkywatchUi {
    display: WeatherDisplay,
}

impl SkywatchUi {
    fn new() -> Self {
        Self {
            display: WeatherDisplay::new(),
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<SkywatchComponentId>,
    ) {
        event_ctx.set_component_area(SkywatchComponentId::Display, area);

        let props = WeatherDisplayProps {
            state,
            is_focused: render_ctx.is_focused(),
        };
        self.display.render(frame, area, props);
    }

    fn handle_display_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = WeatherDisplayProps {
            state,
            is_focused: true,
        };
        let actions: Vec<_> = self
            .display
            .handle_event(event, props)
            .into_iter()
            .collect();
        if actions.is_empty() {
            HandlerResponse::ignored()
        } else {
            HandlerResponse {
                actions,
                consumed: true,
                needs_render: false,
            }
        }
    }
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    client: Arc<WeatherApiClient>,
    initial_search: Option<Action>,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(SkywatchUi::new()));
    let mut bus: EventBus<AppState, Action, SkywatchComponentId, SkywatchContext> =
        EventBus::new();
    let keybindings: Keybindings<SkywatchContext> = Keybindings::new();

    let ui_display = Rc::clone(&ui);
    bus.register(SkywatchComponentId::Display, move |event, state| {
        ui_display
            .borrow_mut()
            .handle_display_event(&event.kind, state)
    });

    // Re-render on terminal resize (no action needed, just redraw)
    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(_, _) => HandlerResponse::ignored().with_render(),
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            initial_search,
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }

                runtime.subscriptions().interval(
                    "tick",
                    Duration::from_millis(LOADING_ANIM_TICK_MS),
                    || Action::Tick,
                );
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            move |effect, ctx| handle_effect(effect, ctx, Arc::clone(&client)),
        )
        .await
}

/// Handle effects by spawning one task per lookup
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>, client: Arc<WeatherApiClient>) {
    match effect {
        Effect::FetchConditions { generation, query } => {
            ctx.tasks().spawn(TaskKey::new("conditions"), async move {
                match client.current(&query).await {
                    Ok(conditions) => Action::ConditionsDidLoad {
                        generation,
                        conditions,
                    },
                    Err(e) => {
                        tracing::warn!(%e, "current conditions lookup failed");
                        Action::ConditionsDidError {
                            generation,
                            failure: e.into_failure(),
                        }
                    }
                }
            });
        }
        Effect::FetchAlerts { generation, query } => {
            ctx.tasks().spawn(TaskKey::new("alerts"), async move {
                match client.alerts(&query).await {
                    Ok(alerts) => Action::AlertsDidLoad { generation, alerts },
                    Err(e) => {
                        tracing::warn!(%e, "alerts lookup failed");
                        Action::AlertsDidError {
                            generation,
                            failure: e.into_failure(),
                        }
                    }
                }
            });
        }
        Effect::FetchForecast {
            generation,
            query,
            days,
        } => {
            ctx.tasks().spawn(TaskKey::new("forecast"), async move {
                match client.forecast(&query, days).await {
                    Ok(days) => Action::ForecastDidLoad { generation, days },
                    Err(e) => {
                        tracing::warn!(%e, "forecast lookup failed");
                        Action::ForecastDidError {
                            generation,
                            failure: e.into_failure(),
                        }
                    }
                }
            });
        }
    }
}
