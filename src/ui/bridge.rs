//! Stdio Surface Bridge
//!
//! Connects the session core to one editor surface over newline-delimited
//! JSON: requests come in on the reader, updates go out on the writer. The
//! bridge also backs the renewal prompt; `showModal` goes out and the
//! matching `modalResponse` resolves it. The read loop never blocks on a
//! prompt, so the answer can travel back through the same loop that asked.

use async_trait::async_trait;
use log::{debug, info, warn};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::{broadcast, mpsc, oneshot};

use crate::error::Result;
use crate::session::{
    NoticeLevel, RenewalCoordinator, RenewalPrompt, SessionContext, SessionEvent, SessionWindow,
};

use super::protocol::{ModalKind, UiRequest, UiUpdate};

/// Contact text shown by the `showInfo` command
pub const CONTACT_INFO: &str = "Contact help@revature.com for any issues related to the CDE.";

const HARD_LIMIT_MESSAGE: &str =
    "Your session has exceeded its maximum lifetime. The IDE will shut down soon.";

const SOFT_WARNING_MESSAGE: &str =
    "Your session is about to expire. Would you like to add more time?";

/// Modal prompt presented over the surface protocol.
///
/// One `showModal` out, one `modalResponse` back, correlated by the modal
/// id. The renewal coordinator already guarantees a single prompt at a
/// time; an answer naming a prompt the coordinator abandoned matches no
/// waiter and is dropped, so it can never resolve a newer prompt.
pub struct BridgePrompt {
    out: mpsc::UnboundedSender<UiUpdate>,
    pending: Mutex<Option<(u64, oneshot::Sender<bool>)>>,
    next_id: AtomicU64,
}

impl BridgePrompt {
    pub fn new(out: mpsc::UnboundedSender<UiUpdate>) -> Self {
        Self {
            out,
            pending: Mutex::new(None),
            next_id: AtomicU64::new(0),
        }
    }

    /// Reserve an id for the next modal.
    pub fn next_modal_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn install(&self) -> (u64, oneshot::Receiver<bool>) {
        let modal_id = self.next_modal_id();
        let (tx, rx) = oneshot::channel();
        // A sender still parked here belongs to a prompt the coordinator
        // timed out; replacing it is the cleanup.
        *self.pending.lock() = Some((modal_id, tx));
        (modal_id, rx)
    }

    /// Route a surface answer to the prompt it names. Returns false when the
    /// named prompt is not the one waiting.
    pub fn resolve(&self, modal_id: u64, accepted: bool) -> bool {
        let mut pending = self.pending.lock();
        match pending.take() {
            Some((id, tx)) if id == modal_id => tx.send(accepted).is_ok(),
            stale => {
                *pending = stale;
                false
            }
        }
    }
}

#[async_trait]
impl RenewalPrompt for BridgePrompt {
    async fn acknowledge_shutdown(&self, _window: SessionWindow) {
        let (modal_id, rx) = self.install();
        let _ = self.out.send(UiUpdate::ShowModal {
            modal_id,
            kind: ModalKind::HardLimit,
            message: HARD_LIMIT_MESSAGE.to_string(),
            action: None,
        });
        // Any answer acknowledges; a dropped channel counts too.
        let _ = rx.await;
    }

    async fn offer_extension(&self, _minutes_remaining: i64, add_minutes: u32) -> bool {
        let (modal_id, rx) = self.install();
        let _ = self.out.send(UiUpdate::ShowModal {
            modal_id,
            kind: ModalKind::SoftWarning,
            message: SOFT_WARNING_MESSAGE.to_string(),
            action: Some(format!("Add {} Minutes", add_minutes)),
        });
        rx.await.unwrap_or(false)
    }
}

/// Newline-delimited JSON bridge between the session core and one surface
pub struct UiBridge {
    ctx: Arc<SessionContext>,
    coordinator: Arc<RenewalCoordinator>,
    prompt: Arc<BridgePrompt>,
    out_tx: mpsc::UnboundedSender<UiUpdate>,
    out_rx: mpsc::UnboundedReceiver<UiUpdate>,
}

impl UiBridge {
    pub fn new(
        ctx: Arc<SessionContext>,
        coordinator: Arc<RenewalCoordinator>,
        prompt: Arc<BridgePrompt>,
        out_tx: mpsc::UnboundedSender<UiUpdate>,
        out_rx: mpsc::UnboundedReceiver<UiUpdate>,
    ) -> Self {
        Self {
            ctx,
            coordinator,
            prompt,
            out_tx,
            out_rx,
        }
    }

    /// Drive the bridge until the surface hangs up (EOF on `reader`) or a
    /// write fails.
    pub async fn run<R, W>(self, reader: R, writer: W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let UiBridge {
            ctx,
            coordinator,
            prompt,
            out_tx,
            mut out_rx,
        } = self;

        let mut lines = BufReader::new(reader).lines();
        let mut writer = writer;
        let mut events = ctx.events().subscribe();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    match line? {
                        Some(line) => {
                            let line = line.trim();
                            if !line.is_empty() {
                                Self::dispatch(&ctx, &coordinator, &prompt, &out_tx, line);
                            }
                        }
                        None => {
                            info!("Surface closed its end; bridge shutting down");
                            break;
                        }
                    }
                }
                Some(update) = out_rx.recv() => {
                    Self::write_update(&mut writer, &update).await?;
                }
                event = events.recv() => {
                    match event {
                        Ok(event) => {
                            if let Some(update) = Self::update_for(event) {
                                Self::write_update(&mut writer, &update).await?;
                            }
                        }
                        Err(broadcast::error::RecvError::Lagged(missed)) => {
                            warn!("Surface lagged behind; {} events dropped", missed);
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }
            }
        }

        Ok(())
    }

    /// Handle one surface request. Synchronous on purpose: anything slow is
    /// spawned so the read loop stays free to carry the reply traffic.
    fn dispatch(
        ctx: &Arc<SessionContext>,
        coordinator: &Arc<RenewalCoordinator>,
        prompt: &BridgePrompt,
        out_tx: &mpsc::UnboundedSender<UiUpdate>,
        line: &str,
    ) {
        let request: UiRequest = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                warn!("Ignoring malformed surface message: {}", e);
                return;
            }
        };
        debug!("Surface request: {:?}", request);

        match request {
            UiRequest::GetSessionEndTime => {
                if let Some(end) = ctx.store().session_end() {
                    let _ = out_tx.send(UiUpdate::UpdateSessionEndTime {
                        session_end_time: end,
                        expiry_notification_time: ctx.policy().threshold_minutes,
                    });
                } else {
                    debug!("No session window yet; countdown reply withheld");
                }
            }
            UiRequest::AddTime => {
                let coordinator = Arc::clone(coordinator);
                tokio::spawn(async move {
                    coordinator.trigger().await;
                });
            }
            UiRequest::OpenDevServer { port } => {
                let client = Arc::clone(ctx.client());
                let out = out_tx.clone();
                tokio::spawn(async move {
                    match client.dev_server(port).await {
                        Ok(link) => {
                            let _ = out.send(UiUpdate::OpenExternal {
                                url: link.destination_url,
                            });
                        }
                        Err(e) => {
                            warn!("Error opening dev server on port {}: {}", port, e);
                            let _ = out.send(UiUpdate::ShowNotification {
                                level: NoticeLevel::Error,
                                message: format!("Failed to open dev server on port {}.", port),
                            });
                        }
                    }
                });
            }
            UiRequest::ShowInfo => {
                let _ = out_tx.send(UiUpdate::ShowModal {
                    modal_id: prompt.next_modal_id(),
                    kind: ModalKind::Info,
                    message: CONTACT_INFO.to_string(),
                    action: None,
                });
            }
            UiRequest::ModalResponse { modal_id, accepted } => {
                if !prompt.resolve(modal_id, accepted) {
                    debug!("Dropping modal response {} with no prompt waiting", modal_id);
                }
            }
        }
    }

    fn update_for(event: SessionEvent) -> Option<UiUpdate> {
        match event {
            SessionEvent::TimeChanged {
                window,
                threshold_minutes,
            } => Some(UiUpdate::UpdateSessionEndTime {
                session_end_time: window.end,
                expiry_notification_time: threshold_minutes,
            }),
            SessionEvent::Extended { added_minutes, .. } => Some(UiUpdate::ShowNotification {
                level: NoticeLevel::Info,
                message: format!("Successfully added {} minutes to your session.", added_minutes),
            }),
            SessionEvent::ExtendFailed { .. } => Some(UiUpdate::ShowNotification {
                level: NoticeLevel::Error,
                message: "Failed to add time to your session.".to_string(),
            }),
            SessionEvent::Notice { level, message } => {
                Some(UiUpdate::ShowNotification { level, message })
            }
        }
    }

    async fn write_update<W>(writer: &mut W, update: &UiUpdate) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let mut payload = serde_json::to_vec(update)?;
        payload.push(b'\n');
        writer.write_all(&payload).await?;
        writer.flush().await?;
        Ok(())
    }
}
