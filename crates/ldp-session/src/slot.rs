//! Session slot
//!
//! Holds at most one live [`SessionController`]. The slot is an explicit
//! object owned by whoever registers the commands, not process-global
//! state, so independent slots can coexist in tests.

use tokio::sync::mpsc;

use ldp_panel::{PanelEvent, PanelEventReceiver};

use crate::controller::{EventOutcome, HostServices, SessionController};
use crate::Result;

pub struct SessionSlot {
    services: HostServices,
    current: Option<SessionController>,
    events_tx: mpsc::UnboundedSender<PanelEvent>,
    events_rx: PanelEventReceiver,
}

impl SessionSlot {
    pub fn new(services: HostServices) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Self {
            services,
            current: None,
            events_tx,
            events_rx,
        }
    }

    pub fn services(&self) -> &HostServices {
        &self.services
    }

    /// The live session, created (without prompting) if there is none.
    pub fn acquire(&mut self) -> &mut SessionController {
        let services = &self.services;
        let events_tx = &self.events_tx;
        self.current
            .get_or_insert_with(|| SessionController::new(services.clone(), events_tx.clone()))
    }

    pub fn get(&self) -> Option<&SessionController> {
        self.current.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut SessionController> {
        self.current.as_mut()
    }

    pub fn is_live(&self) -> bool {
        self.current.is_some()
    }

    /// Close the panel if open and release the session.
    pub fn dispose(&mut self) {
        if let Some(mut controller) = self.current.take() {
            controller.dispose();
        }
    }

    /// Wait for the next panel event.
    pub async fn next_event(&mut self) -> Option<PanelEvent> {
        self.events_rx.recv().await
    }

    /// Route one panel event to the live session.
    pub async fn dispatch(&mut self, event: PanelEvent) -> Result<EventOutcome> {
        let Some(controller) = self.current.as_mut() else {
            tracing::debug!(panel_id = %event.panel_id, "Panel event with no live session");
            return Ok(EventOutcome::Ignored);
        };

        let outcome = controller.handle_event(event).await?;
        if outcome == EventOutcome::Released {
            if let Some(controller) = self.current.take() {
                tracing::info!(session_id = %controller.id(), "Released preview session");
            }
        }

        Ok(outcome)
    }

    /// Dispatch every queued panel event. Returns how many were handled.
    ///
    /// A failing event is logged and does not stop the drain.
    pub async fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            let panel_id = event.panel_id.clone();
            match self.dispatch(event).await {
                Ok(EventOutcome::Handled) => handled += 1,
                Ok(_) => {}
                Err(e) => {
                    tracing::error!(panel_id = %panel_id, error = %e, "Panel event failed");
                }
            }
        }
        handled
    }
}
