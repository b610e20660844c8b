//! Live consumer hand-off.
//!
//! After a package is written the [`Notifier`] asks a running game to load
//! it by sending `run;<absolute path>` over a local channel. If nothing is
//! listening it starts a new game process with the same directive instead.
//! Exactly one of the two happens per call.

mod channel;
mod launcher;

pub use channel::{ConsumerChannel, SocketChannel};
pub use launcher::{ConsumerLauncher, ProcessLauncher};

use crate::bundler::{ConsumerSettings, ErrorExt, Result};
use path_absolutize::Absolutize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Command prefix understood by the consumer.
pub const RUN_COMMAND: &str = "run";

/// A `run;<path>` instruction for the consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunDirective {
    path: PathBuf,
}

impl RunDirective {
    /// Creates a directive for `package`, made absolute against the current
    /// directory.
    pub fn for_package(package: &Path) -> Result<Self> {
        let path = package
            .absolutize()
            .fs_context("resolving package path", package)?
            .into_owned();
        Ok(Self { path })
    }

    /// Parses a directive line as sent over the channel.
    pub fn parse(line: &str) -> Option<Self> {
        let (command, path) = line.trim_end_matches(['\r', '\n']).split_once(';')?;
        (command == RUN_COMMAND && !path.is_empty()).then(|| Self {
            path: PathBuf::from(path),
        })
    }

    /// Absolute package path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for RunDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{}", RUN_COMMAND, self.path.display())
    }
}

/// Result of a notify call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// A running consumer accepted the directive.
    Delivered,
    /// No consumer was reachable; a new one was started.
    Spawned,
}

impl fmt::Display for NotifyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delivered => f.write_str("delivered to running consumer"),
            Self::Spawned => f.write_str("started new consumer"),
        }
    }
}

/// Delivers packages to a live consumer, launching one when needed.
#[derive(Debug)]
pub struct Notifier<C, L> {
    channel: C,
    launcher: L,
}

impl Notifier<SocketChannel, ProcessLauncher> {
    /// Creates the socket + process notifier described by `settings`.
    pub fn from_settings(settings: &ConsumerSettings) -> Self {
        Self::new(
            SocketChannel::new(&settings.endpoint, settings.timeout),
            ProcessLauncher::from_settings(settings.launcher.as_ref()),
        )
    }
}

impl<C, L> Notifier<C, L>
where
    C: ConsumerChannel,
    L: ConsumerLauncher,
{
    /// Creates a notifier from a channel and a fallback launcher.
    pub fn new(channel: C, launcher: L) -> Self {
        Self { channel, launcher }
    }

    /// Tells a consumer to load the package at `package`.
    ///
    /// Channel failures are logged and answered with the launcher; they
    /// never propagate.
    ///
    /// # Errors
    ///
    /// Only when the path cannot be resolved or the launcher fails.
    pub async fn notify(&self, package: &Path) -> Result<NotifyOutcome> {
        let directive = RunDirective::for_package(package)?;
        let message = directive.to_string();

        match self.channel.send(&message).await {
            Ok(()) => {
                log::info!("Sent `{}` to running consumer", message);
                Ok(NotifyOutcome::Delivered)
            }
            Err(e) => {
                log::warn!("{}; launching a new consumer", e);
                self.launcher.launch(&directive)?;
                Ok(NotifyOutcome::Spawned)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::{ChannelError, Error};
    use std::io;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingChannel {
        accept: bool,
        sent: Mutex<Vec<String>>,
    }

    impl ConsumerChannel for RecordingChannel {
        async fn send(&self, message: &str) -> std::result::Result<(), ChannelError> {
            self.sent.lock().unwrap().push(message.to_string());
            if self.accept {
                Ok(())
            } else {
                Err(ChannelError::TimedOut {
                    endpoint: PathBuf::from("/tmp/tub.sock"),
                    timeout: Duration::from_millis(1),
                })
            }
        }
    }

    #[derive(Default)]
    struct RecordingLauncher {
        fail: bool,
        launched: Mutex<Vec<RunDirective>>,
    }

    impl ConsumerLauncher for RecordingLauncher {
        fn launch(&self, directive: &RunDirective) -> Result<()> {
            self.launched.lock().unwrap().push(directive.clone());
            if self.fail {
                Err(Error::Launch {
                    program: "game".into(),
                    error: io::Error::from(io::ErrorKind::NotFound),
                })
            } else {
                Ok(())
            }
        }
    }

    #[tokio::test]
    async fn accepted_message_spawns_nothing() {
        let notifier = Notifier::new(
            RecordingChannel {
                accept: true,
                ..Default::default()
            },
            RecordingLauncher::default(),
        );

        let package = Path::new("/maps/harbor.tub");
        let outcome = notifier.notify(package).await.unwrap();

        assert_eq!(outcome, NotifyOutcome::Delivered);
        let expected = RunDirective::for_package(package).unwrap().to_string();
        assert!(expected.starts_with("run;"));
        assert_eq!(*notifier.channel.sent.lock().unwrap(), [expected]);
        assert!(notifier.launcher.launched.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unreachable_channel_spawns_exactly_once() {
        let notifier = Notifier::new(RecordingChannel::default(), RecordingLauncher::default());

        let package = Path::new("/maps/harbor.tub");
        let outcome = notifier.notify(package).await.unwrap();

        assert_eq!(outcome, NotifyOutcome::Spawned);
        assert_eq!(notifier.channel.sent.lock().unwrap().len(), 1);
        let launched = notifier.launcher.launched.lock().unwrap();
        assert_eq!(*launched, [RunDirective::for_package(package).unwrap()]);
    }

    #[tokio::test]
    async fn launcher_failure_propagates() {
        let notifier = Notifier::new(
            RecordingChannel::default(),
            RecordingLauncher {
                fail: true,
                ..Default::default()
            },
        );
        assert!(matches!(
            notifier.notify(Path::new("/maps/harbor.tub")).await,
            Err(Error::Launch { .. })
        ));
    }

    #[test]
    fn relative_paths_become_absolute() {
        let directive = RunDirective::for_package(Path::new("maps/harbor.tub")).unwrap();
        assert!(directive.path().is_absolute());
        assert!(directive.path().ends_with("maps/harbor.tub"));
    }

    #[test]
    fn parses_directive_lines() {
        let directive = RunDirective::parse("run;/maps/harbor.tub\n").unwrap();
        assert_eq!(directive.path(), Path::new("/maps/harbor.tub"));
        assert!(RunDirective::parse("quit;/maps/harbor.tub").is_none());
        assert!(RunDirective::parse("run;").is_none());
        assert!(RunDirective::parse("run").is_none());
    }
}
