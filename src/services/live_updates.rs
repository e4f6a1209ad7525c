//! Notificaciones de cambios en vivo
//!
//! Cada mutación publica un evento con su departamento. Los suscriptores
//! (stream SSE de instantáneas) no reciben el dato en el evento: vuelven a
//! leer la instantánea del departamento, que es la única fuente de verdad.

use futures::stream::{self, Stream};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::debug;
use uuid::Uuid;

/// Eventos almacenados en el canal antes de que un suscriptor lento pierda
/// mensajes. `broadcast` redondea la capacidad a potencia de dos.
const EVENT_BUFFER_SIZE: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Vehicle,
    Driver,
    Maintenance,
    Document,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveEvent {
    pub kind: ChangeKind,
    pub department: String,
    pub entity_id: Uuid,
}

impl LiveEvent {
    pub fn new(kind: ChangeKind, department: impl Into<String>, entity_id: Uuid) -> Self {
        Self {
            kind,
            department: department.into(),
            entity_id,
        }
    }
}

/// Motivo por el que un suscriptor debe refrescar su instantánea
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Refresh {
    Changed(LiveEvent),
    /// El suscriptor perdió eventos; se resincroniza con una instantánea nueva
    Lagged(u64),
}

#[derive(Clone)]
pub struct LiveEventBroadcaster {
    tx: broadcast::Sender<LiveEvent>,
}

impl LiveEventBroadcaster {
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(EVENT_BUFFER_SIZE);
        Self { tx }
    }

    /// Publicar un evento. Sin suscriptores, el evento se descarta.
    pub fn publish(&self, event: LiveEvent) {
        match self.tx.send(event) {
            Ok(receivers) => debug!(receivers, "Evento en vivo publicado"),
            Err(_) => debug!("Evento en vivo sin suscriptores"),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LiveEvent> {
        self.tx.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Stream de refrescos para un departamento.
    ///
    /// Termina cuando el canal se cierra. Soltar el stream cancela la
    /// suscripción.
    pub fn department_refreshes(&self, department: String) -> impl Stream<Item = Refresh> + Send + 'static {
        let rx = self.subscribe();
        stream::unfold((rx, department), |(mut rx, department)| async move {
            loop {
                match rx.recv().await {
                    Ok(event) if event.department == department => {
                        return Some((Refresh::Changed(event), (rx, department)));
                    }
                    Ok(_) => continue,
                    Err(RecvError::Lagged(skipped)) => {
                        return Some((Refresh::Lagged(skipped), (rx, department)));
                    }
                    Err(RecvError::Closed) => return None,
                }
            }
        })
    }
}

impl Default for LiveEventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}
