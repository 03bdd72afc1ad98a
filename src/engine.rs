//! Session-keyed navigation engine.
//!
//! Every caller interaction is either `dial`, which (re)starts a session at
//! the root menu, or `submit`, which moves one session through its state
//! machine:
//!
//! - awaiting input: the text goes to the pending input node's handler
//! - `"0"`: back one level, or end the session at the root
//! - an option code: descend, run an action, or show an input prompt
//!
//! Each session lives behind its own async mutex, so calls for one session id
//! run one at a time while different sessions proceed independently. Failures
//! never escape as errors: they become a terminating [`Response`].

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use futures::FutureExt;
use log::{debug, error, info, warn};
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::error::EngineError;
use crate::locale::{Locale, Phrase};
use crate::menu::{Handler, MenuCatalog, MenuNode, NodeKind};
use crate::render;
use crate::session::{AwaitingInput, SessionState};

/// Universal back/exit token.
pub const BACK_TOKEN: &str = "0";

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// What the caller shows after every engine call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub text: String,
    /// The session is gone after this response.
    pub is_end: bool,
    /// Menu currently displayed; absent once the session has ended.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub menu_id: Option<String>,
    /// The next submission is free text for an input node.
    pub requires_input: bool,
}

impl Response {
    fn menu(text: String, menu_id: &str) -> Self {
        Self {
            text,
            is_end: false,
            menu_id: Some(menu_id.to_string()),
            requires_input: false,
        }
    }

    fn prompt(text: String, menu_id: &str) -> Self {
        Self {
            requires_input: true,
            ..Self::menu(text, menu_id)
        }
    }

    fn end(text: &str) -> Self {
        Self {
            text: text.to_string(),
            is_end: true,
            menu_id: None,
            requires_input: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// A session with no call for this long is expired.
    pub idle_timeout: Duration,
    /// How often the reaper task sweeps idle sessions.
    pub sweep_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(90),
            sweep_interval: Duration::from_secs(15),
        }
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

type Slot = Arc<Mutex<SessionState>>;

pub struct MenuEngine {
    catalog: Arc<MenuCatalog>,
    sessions: DashMap<String, Slot>,
    config: EngineConfig,
}

impl MenuEngine {
    pub fn new(catalog: Arc<MenuCatalog>, config: EngineConfig) -> Self {
        Self {
            catalog,
            sessions: DashMap::new(),
            config,
        }
    }

    pub fn catalog(&self) -> &MenuCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Number of live sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Start (or restart) `session_id` at the root menu.
    ///
    /// The dialed code is only logged: the catalog root is the single entry
    /// point.
    pub fn dial(&self, session_id: &str, code: &str, locale: Locale) -> Response {
        let slot = Arc::new(Mutex::new(SessionState::new()));
        if self.sessions.insert(session_id.to_string(), slot).is_some() {
            info!("Session {session_id} re-dialed {code}, state reset ({locale})");
        } else {
            info!("Session {session_id} dialed {code} ({locale})");
        }
        let root = self.catalog.root();
        Response::menu(render::menu(root, true, locale), &root.id)
    }

    /// Feed one submission into `session_id`.
    pub async fn submit(&self, session_id: &str, input: &str, locale: Locale) -> Response {
        let Some(slot) = self.sessions.get(session_id).map(|s| Arc::clone(s.value())) else {
            warn!("Submit for unknown session {session_id}");
            return Response::end(Phrase::SessionExpired.text(locale));
        };

        let mut state = slot.lock().await;
        // A call queued behind `end` or a re-dial must not touch the old state.
        let current = self
            .sessions
            .get(session_id)
            .is_some_and(|s| Arc::ptr_eq(s.value(), &slot));
        if !current || state.terminated || state.is_idle(self.config.idle_timeout) {
            info!("Session {session_id} expired");
            state.terminated = true;
            drop(state);
            self.evict(session_id, &slot);
            return Response::end(Phrase::SessionExpired.text(locale));
        }
        state.touch();

        let response = match self.step(&mut state, input, locale).await {
            Ok(response) => response,
            Err(err) => {
                error!("Session {session_id} terminated: {err}");
                Response::end(Phrase::ServiceError.text(locale))
            }
        };

        if response.is_end {
            state.terminated = true;
            drop(state);
            self.evict(session_id, &slot);
            info!("Session {session_id} ended");
        } else {
            state.touch();
        }

        debug!(
            "Session {session_id} response: {}",
            serde_json::to_string(&response).unwrap_or_default()
        );
        response
    }

    /// Drop `session_id` without a response, e.g. when the caller hangs up.
    pub fn end(&self, session_id: &str) -> bool {
        let removed = self.sessions.remove(session_id).is_some();
        if removed {
            info!("Session {session_id} closed by caller");
        }
        removed
    }

    /// Evict idle sessions that have no call in flight. Returns how many
    /// were removed.
    pub fn sweep_idle(&self) -> usize {
        let timeout = self.config.idle_timeout;
        let mut evicted = 0;
        self.sessions.retain(|id, slot| match slot.try_lock() {
            Ok(mut state) if state.terminated || state.is_idle(timeout) => {
                state.terminated = true;
                evicted += 1;
                debug!("Evicting idle session {id}");
                false
            }
            _ => true,
        });
        if evicted > 0 {
            info!("Evicted {evicted} idle session(s)");
        }
        evicted
    }

    /// Sweep idle sessions every `sweep_interval` until the engine is dropped.
    pub fn spawn_reaper(self: &Arc<Self>) -> JoinHandle<()> {
        let weak = Arc::downgrade(self);
        let period = self.config.sweep_interval;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(engine) = weak.upgrade() else {
                    debug!("Engine dropped, reaper stopping");
                    break;
                };
                engine.sweep_idle();
            }
        })
    }

    /// Remove `slot` from the map unless a newer dial already replaced it.
    fn evict(&self, session_id: &str, slot: &Slot) {
        self.sessions
            .remove_if(session_id, |_, current| Arc::ptr_eq(current, slot));
    }

    async fn step(
        &self,
        state: &mut SessionState,
        input: &str,
        locale: Locale,
    ) -> Result<Response, EngineError> {
        if let Some(awaiting) = state.awaiting_input.take() {
            let menu = self.catalog.resolve_menu(&state.path)?;
            let handler = match menu.find_child(&awaiting.item_id) {
                Some(MenuNode {
                    kind: NodeKind::Input(handler),
                    ..
                }) if menu.id == awaiting.menu_id => handler,
                _ => {
                    return Err(EngineError::InputItemMissing {
                        menu: awaiting.menu_id,
                        item: awaiting.item_id,
                    })
                }
            };
            debug!("Routing captured input to '{}'", awaiting.item_id);
            let text = invoke(&awaiting.item_id, handler, Some(input)).await?;
            return Ok(Response::menu(render::result(&text, locale), &menu.id));
        }

        if input == BACK_TOKEN {
            if state.path.pop().is_none() {
                return Ok(Response::end(Phrase::SessionEnded.text(locale)));
            }
            let menu = self.catalog.resolve_menu(&state.path)?;
            debug!("Back to '{}'", menu.id);
            return Ok(Response::menu(
                render::menu(menu, state.at_root(), locale),
                &menu.id,
            ));
        }

        let menu = self.catalog.resolve_menu(&state.path)?;
        let Some(item) = menu.find_option(input) else {
            warn!("No option '{input}' in menu '{}'", menu.id);
            return Ok(Response::menu(
                render::invalid_choice(menu, state.at_root(), locale),
                &menu.id,
            ));
        };

        match &item.kind {
            NodeKind::Menu(_) => {
                debug!("Transition: {} -> {}", menu.id, item.id);
                state.path.push(item.id.clone());
                Ok(Response::menu(render::menu(item, false, locale), &item.id))
            }
            NodeKind::Action(handler) => {
                debug!("Running action '{}'", item.id);
                let text = invoke(&item.id, handler, None).await?;
                Ok(Response::menu(render::result(&text, locale), &menu.id))
            }
            NodeKind::Input(handler) => {
                debug!("Prompting for input '{}'", item.id);
                let prompt = invoke(&item.id, handler, None).await?;
                state.awaiting_input = Some(AwaitingInput {
                    menu_id: menu.id.clone(),
                    item_id: item.id.clone(),
                });
                Ok(Response::prompt(prompt, &menu.id))
            }
        }
    }
}

/// Run a handler, turning both its error and a panic into `EngineError::Handler`.
async fn invoke(node: &str, handler: &Handler, arg: Option<&str>) -> Result<String, EngineError> {
    let outcome = match AssertUnwindSafe(handler.call(arg)).catch_unwind().await {
        Ok(result) => result,
        Err(_) => Err(anyhow::anyhow!("handler panicked")),
    };
    outcome.map_err(|source| EngineError::Handler {
        node: node.to_string(),
        source,
    })
}
