//! Voice context, speech source and text-to-speech.
//!
//! [`VoiceContext`] is the one shared view of what the microphone heard.
//! It is a cloneable handle passed to whoever needs it; screens subscribe
//! when they mount and the subscription ends when it is dropped.
//!
//! Commands are edge-triggered. A final utterance is stored as the last
//! command only if it differs from the current one, and the value is
//! cleared shortly after so the child can repeat the same command.

use crate::command::normalize;
use crate::config::RetryPolicy;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptEvent {
    /// Partial text of the segment in progress.
    Interim(String),
    /// The finished utterance.
    Final(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoiceError {
    #[error("microphone permission denied")]
    PermissionDenied,

    #[error("speech recognition is not available")]
    Unavailable,

    #[error("speech recognition failed: {0}")]
    Recognition(String),
}

impl VoiceError {
    /// Errors that no amount of restarting will fix.
    pub fn is_fatal(&self) -> bool {
        matches!(self, VoiceError::PermissionDenied | VoiceError::Unavailable)
    }
}

/// A speech recognizer.
///
/// `start` opens one recognition segment. The segment is over when the
/// returned receiver closes.
#[async_trait]
pub trait SpeechSource: Send + Sync {
    async fn start(&self) -> Result<mpsc::Receiver<TranscriptEvent>, VoiceError>;

    async fn stop(&self);
}

/// Fire-and-forget text-to-speech.
pub trait Announcer: Send + Sync {
    fn announce(&self, text: &str);
}

/// Announcer that writes to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAnnouncer;

impl Announcer for LogAnnouncer {
    fn announce(&self, text: &str) {
        info!(text, "announce");
    }
}

// ============================================================================
// Voice context
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct LastCommand {
    /// Bumped for every accepted command; guards the delayed clear.
    generation: u64,
    /// Normalized utterance, empty once cleared.
    text: String,
}

#[derive(Debug)]
struct Shared {
    transcript: watch::Sender<String>,
    last_command: watch::Sender<LastCommand>,
    listening: watch::Sender<bool>,
    clear_after: Duration,
}

/// Shared handle to the live transcript and the last voice command.
#[derive(Debug, Clone)]
pub struct VoiceContext {
    shared: Arc<Shared>,
}

impl VoiceContext {
    /// A context whose commands are cleared `clear_after` after arriving.
    pub fn new(clear_after: Duration) -> Self {
        Self {
            shared: Arc::new(Shared {
                transcript: watch::Sender::new(String::new()),
                last_command: watch::Sender::new(LastCommand::default()),
                listening: watch::Sender::new(false),
                clear_after,
            }),
        }
    }

    /// Feed one recognizer event.
    ///
    /// Clearing is scheduled on the current tokio runtime; outside a
    /// runtime the command simply stays until replaced.
    pub fn publish(&self, event: TranscriptEvent) {
        let text = match event {
            TranscriptEvent::Interim(text) => {
                self.shared.transcript.send_replace(text);
                return;
            }
            TranscriptEvent::Final(text) => text,
        };
        self.shared.transcript.send_replace(text.clone());

        let command = normalize(&text);
        if command.is_empty() {
            return;
        }
        let mut generation = 0;
        let changed = self.shared.last_command.send_if_modified(|last| {
            if last.text == command {
                return false;
            }
            last.generation += 1;
            last.text = command.clone();
            generation = last.generation;
            true
        });
        if !changed {
            debug!(command = %command, "repeated command ignored");
            return;
        }

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let shared = Arc::clone(&self.shared);
        handle.spawn(async move {
            tokio::time::sleep(shared.clear_after).await;
            shared.last_command.send_if_modified(|last| {
                if last.generation != generation || last.text.is_empty() {
                    return false;
                }
                last.text.clear();
                true
            });
        });
    }

    /// The most recent command, if it has not been cleared yet.
    pub fn last_command(&self) -> Option<String> {
        let last = self.shared.last_command.borrow();
        (!last.text.is_empty()).then(|| last.text.clone())
    }

    pub fn transcript(&self) -> String {
        self.shared.transcript.borrow().clone()
    }

    pub fn is_listening(&self) -> bool {
        *self.shared.listening.borrow()
    }

    pub fn set_listening(&self, listening: bool) {
        self.shared.listening.send_replace(listening);
    }

    /// Receive commands published from now on.
    pub fn subscribe_commands(&self) -> CommandSubscription {
        CommandSubscription {
            rx: self.shared.last_command.subscribe(),
        }
    }

    /// Follow the live transcript, interim text included.
    pub fn subscribe_transcript(&self) -> watch::Receiver<String> {
        self.shared.transcript.subscribe()
    }

    /// Number of live command subscriptions.
    pub fn command_subscribers(&self) -> usize {
        self.shared.last_command.receiver_count()
    }
}

/// A live subscription to voice commands. Dropping it unsubscribes.
#[derive(Debug)]
pub struct CommandSubscription {
    rx: watch::Receiver<LastCommand>,
}

impl CommandSubscription {
    /// Wait for the next new command. `None` once the context is gone.
    pub async fn next_command(&mut self) -> Option<String> {
        loop {
            self.rx.changed().await.ok()?;
            let last = self.rx.borrow_and_update();
            if !last.text.is_empty() {
                return Some(last.text.clone());
            }
        }
    }
}

// ============================================================================
// Listener
// ============================================================================

/// Why the listener task stopped on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenerExit {
    /// Voice input is unusable; on-screen controls only from here on.
    Disabled(VoiceError),
    /// Too many restarts in a row without hearing anything.
    GaveUp { attempts: usize },
}

/// Keeps a speech source running and feeds a [`VoiceContext`].
pub struct VoiceEngine {
    source: Arc<dyn SpeechSource>,
    context: VoiceContext,
    policy: RetryPolicy,
    task: Option<JoinHandle<ListenerExit>>,
}

impl VoiceEngine {
    pub fn new(source: Arc<dyn SpeechSource>, context: VoiceContext, policy: RetryPolicy) -> Self {
        Self {
            source,
            context,
            policy,
            task: None,
        }
    }

    pub fn context(&self) -> &VoiceContext {
        &self.context
    }

    /// Spawn the listener unless one is already running.
    pub fn start_listening(&mut self) {
        if self.task.as_ref().is_some_and(|t| !t.is_finished()) {
            return;
        }
        let source = Arc::clone(&self.source);
        let context = self.context.clone();
        let policy = self.policy;
        self.task = Some(tokio::spawn(listen(source, context, policy)));
    }

    pub async fn stop_listening(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.source.stop().await;
        self.context.set_listening(false);
    }

    /// Wait for the listener to stop on its own.
    pub async fn join(&mut self) -> Option<ListenerExit> {
        let task = self.task.take()?;
        task.await.ok()
    }
}

async fn listen(
    source: Arc<dyn SpeechSource>,
    context: VoiceContext,
    policy: RetryPolicy,
) -> ListenerExit {
    let mut attempts = 0;
    loop {
        match source.start().await {
            Ok(mut events) => {
                attempts = 0;
                context.set_listening(true);
                while let Some(event) = events.recv().await {
                    context.publish(event);
                }
                debug!("recognition segment ended");
                tokio::time::sleep(policy.delay(1)).await;
                continue;
            }
            Err(e) if e.is_fatal() => {
                warn!(error = %e, "voice input disabled");
                context.set_listening(false);
                return ListenerExit::Disabled(e);
            }
            Err(e) => debug!(error = %e, "recognition failed to start"),
        }

        attempts += 1;
        if attempts > policy.max_attempts {
            warn!(attempts = policy.max_attempts, "speech recognition keeps stopping, giving up");
            context.set_listening(false);
            return ListenerExit::GaveUp {
                attempts: policy.max_attempts,
            };
        }
        tokio::time::sleep(policy.delay(attempts)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_without_runtime() {
        let context = VoiceContext::new(Duration::from_secs(2));
        context.publish(TranscriptEvent::Interim("küp o".into()));
        assert_eq!(context.transcript(), "küp o");
        assert_eq!(context.last_command(), None);

        context.publish(TranscriptEvent::Final("  Küp   Oyunu ".into()));
        assert_eq!(context.transcript(), "  Küp   Oyunu ");
        assert_eq!(context.last_command().as_deref(), Some("küp oyunu"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeat_fires_once_until_cleared() {
        let context = VoiceContext::new(Duration::from_secs(2));
        let mut commands = context.subscribe_commands();

        context.publish(TranscriptEvent::Final("geri".into()));
        assert_eq!(commands.next_command().await.as_deref(), Some("geri"));

        context.publish(TranscriptEvent::Final("Geri".into()));
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!commands.rx.has_changed().unwrap());

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(context.last_command(), None);

        context.publish(TranscriptEvent::Final("geri".into()));
        assert_eq!(commands.next_command().await.as_deref(), Some("geri"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_command_survives_older_clear() {
        let context = VoiceContext::new(Duration::from_secs(2));
        context.publish(TranscriptEvent::Final("oyuna".into()));
        tokio::time::sleep(Duration::from_millis(1500)).await;
        context.publish(TranscriptEvent::Final("küp".into()));
        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(context.last_command().as_deref(), Some("küp"));
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(context.last_command(), None);
    }

    #[test]
    fn test_dropping_subscription_unsubscribes() {
        let context = VoiceContext::new(Duration::ZERO);
        let a = context.subscribe_commands();
        let b = context.subscribe_commands();
        assert_eq!(context.command_subscribers(), 2);
        drop(a);
        assert_eq!(context.command_subscribers(), 1);
        drop(b);
        assert_eq!(context.command_subscribers(), 0);
    }

    #[test]
    fn test_fatal_errors() {
        assert!(VoiceError::PermissionDenied.is_fatal());
        assert!(VoiceError::Unavailable.is_fatal());
        assert!(!VoiceError::Recognition("network".into()).is_fatal());
    }
}
