use mmwire_frame::{DecoderConfig, FrameDecoder};
use mmwire_notify::{Dispatcher, NotificationSink, Severity};
use serde::Serialize;
use tracing::{debug, warn};

use crate::command::Command;
use crate::error::Result;
use crate::transport::Transport;

/// Configuration for [`ApiClient`].
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Decoder settings applied to every streamed response.
    pub decoder: DecoderConfig,
}

/// Outcome of one command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Frames decoded from the response.
    pub frames: usize,
    /// Notifications delivered to the sink.
    pub delivered: usize,
    /// Frames skipped because their channel has no severity.
    pub ignored: usize,
}

/// Runs typed commands against a [`Transport`].
pub struct ApiClient<T> {
    transport: T,
    config: ClientConfig,
}

impl<T: Transport> ApiClient<T> {
    /// Create a client with default configuration.
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, ClientConfig::default())
    }

    /// Create a client with explicit configuration.
    pub fn with_config(transport: T, config: ClientConfig) -> Self {
        Self { transport, config }
    }

    /// Run a command, reporting its output to `sink`.
    ///
    /// Streamed commands decode their response as it arrives, so
    /// notifications reach the sink before the request completes. A decode
    /// error aborts the stream; notifications already delivered stay
    /// delivered.
    pub fn run<S>(&mut self, command: &Command, sink: &mut S) -> Result<RunSummary>
    where
        S: NotificationSink + ?Sized,
    {
        let request = command.request()?;
        debug!(path = %request.path, streamed = request.is_streamed(), "running command");

        if !request.is_streamed() {
            let body = self.transport.post(&request)?;
            let text = String::from_utf8_lossy(&body);
            let text = text.trim();
            let delivered = if text.is_empty() || text == "null" {
                0
            } else {
                sink.notify(text, Severity::Info);
                1
            };
            return Ok(RunSummary {
                frames: 0,
                delivered,
                ignored: 0,
            });
        }

        let mut dispatcher =
            Dispatcher::new(|message: &str, severity: Severity| sink.notify(message, severity));
        let mut decoder = FrameDecoder::with_config(self.config.decoder.clone());
        let mut frames = 0usize;
        let streamed = self.transport.stream(&request, &mut |chunk: &[u8]| {
            frames += decoder.feed(chunk, false, &mut dispatcher)?;
            Ok(())
        });
        if let Err(err) = streamed {
            warn!(path = %request.path, error = %err, "stream aborted");
            return Err(err);
        }
        frames += decoder.finish(&mut dispatcher)?;

        Ok(RunSummary {
            frames,
            delivered: dispatcher.delivered(),
            ignored: dispatcher.ignored(),
        })
    }

    /// Borrow the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Consume the client and return the transport.
    pub fn into_transport(self) -> T {
        self.transport
    }
}

#[cfg(test)]
mod tests {
    use mmwire_frame::FrameError;
    use mmwire_notify::{Notification, NotificationLog};

    use super::*;
    use crate::command::{CommandKind, Request, ResponseFormat};
    use crate::error::ApiError;
    use crate::transport::{ChunkHandler, ReplayTransport};

    fn update_info() -> Command {
        Command::new(CommandKind::UpdateMachineInfo, Some("db1")).unwrap()
    }

    fn messages(log: &NotificationLog) -> Vec<(Severity, &str)> {
        log.entries()
            .iter()
            .map(|entry| (entry.severity, entry.message.as_str()))
            .collect()
    }

    #[test]
    fn streamed_command_dispatches_every_frame() {
        let body = "N0000000aconnectingW00000008slow cpuX00000003rawE00000007no disk";
        for chunk_size in [1, 2, 5, 9, 10, 64] {
            let transport = ReplayTransport::new(body).with_chunk_size(chunk_size);
            let mut client = ApiClient::new(transport);
            let mut log = NotificationLog::new();

            let summary = client.run(&update_info(), &mut log).unwrap();

            assert_eq!(
                summary,
                RunSummary {
                    frames: 4,
                    delivered: 3,
                    ignored: 1
                }
            );
            assert_eq!(
                messages(&log),
                vec![
                    (Severity::Info, "connecting"),
                    (Severity::Warning, "slow cpu"),
                    (Severity::Error, "no disk"),
                ]
            );
            let requests = client.transport().requests();
            assert_eq!(requests.len(), 1);
            assert_eq!(requests[0].path, "/api.txt/update-machine-info");
        }
    }

    #[test]
    fn truncated_stream_is_an_error_after_partial_delivery() {
        let body = "N00000002okE0000000aabcd";
        let transport = ReplayTransport::new(body).with_chunk_size(3);
        let mut client = ApiClient::new(transport);
        let mut log = NotificationLog::new();

        let err = client.run(&update_info(), &mut log).unwrap_err();

        assert!(matches!(
            err,
            ApiError::Frame(FrameError::Truncated {
                expected: 10,
                available: 4
            })
        ));
        assert_eq!(messages(&log), vec![(Severity::Info, "ok")]);
    }

    #[test]
    fn malformed_header_aborts_stream() {
        let body = "N0000000zoops N00000002ok";
        let transport = ReplayTransport::new(body).with_chunk_size(4);
        let mut client = ApiClient::new(transport);
        let mut log = NotificationLog::new();

        let err = client.run(&update_info(), &mut log).unwrap_err();

        assert!(matches!(err, ApiError::Frame(FrameError::InvalidLength { .. })));
        assert!(log.entries().is_empty());
    }

    #[test]
    fn payload_limit_from_config() {
        let config = ClientConfig {
            decoder: DecoderConfig {
                max_payload_size: 8,
                ..DecoderConfig::default()
            },
        };
        let mut client = ApiClient::with_config(ReplayTransport::new("N00000010"), config);
        let err = client
            .run(&update_info(), &mut NotificationLog::new())
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Frame(FrameError::PayloadTooLarge { size: 16, max: 8 })
        ));
    }

    #[test]
    fn json_command_reports_body() {
        let mut client = ApiClient::new(ReplayTransport::new("{\"ok\":true}\n"));
        let mut log = NotificationLog::new();
        let command = Command::new(CommandKind::Backup, Some("web")).unwrap();

        let summary = client.run(&command, &mut log).unwrap();

        assert_eq!(summary.delivered, 1);
        assert_eq!(
            log.entries(),
            &[Notification {
                severity: Severity::Info,
                message: "{\"ok\":true}".into()
            }]
        );
        let request = &client.transport().requests()[0];
        assert_eq!(request.path, "/api.json/backup/web");
        assert_eq!(request.format, ResponseFormat::Json);
    }

    #[test]
    fn json_null_body_is_silent() {
        let mut client = ApiClient::new(ReplayTransport::new("null"));
        let mut log = NotificationLog::new();
        let command = Command::new(CommandKind::SshKeyGen, None).unwrap();

        let summary = client.run(&command, &mut log).unwrap();

        assert_eq!(summary, RunSummary::default());
        assert!(log.entries().is_empty());
    }

    #[test]
    fn invalid_command_never_reaches_transport() {
        let mut client = ApiClient::new(ReplayTransport::new(""));
        let command = Command::Deploy {
            deploy: String::new(),
        };

        let err = client
            .run(&command, &mut NotificationLog::new())
            .unwrap_err();

        assert!(matches!(err, ApiError::MissingTarget { .. }));
        assert!(client.into_transport().requests().is_empty());
    }

    #[test]
    fn transport_failure_propagates() {
        struct Unreachable;

        impl Transport for Unreachable {
            fn post(&mut self, request: &Request) -> Result<Vec<u8>> {
                Err(ApiError::Transport(format!("{}: unreachable", request.path)))
            }

            fn stream(
                &mut self,
                request: &Request,
                _on_chunk: &mut ChunkHandler<'_>,
            ) -> Result<()> {
                Err(ApiError::Transport(format!("{}: unreachable", request.path)))
            }
        }

        let mut client = ApiClient::new(Unreachable);
        let err = client
            .run(&update_info(), &mut NotificationLog::new())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "transport error: /api.txt/update-machine-info: unreachable"
        );
    }

    #[test]
    fn closure_sink_sees_notifications_in_order() {
        let mut seen = Vec::new();
        let transport = ReplayTransport::new("W00000001aN00000001b").with_chunk_size(1);
        let mut client = ApiClient::new(transport);
        let mut sink =
            |message: &str, severity: Severity| seen.push(format!("{severity}:{message}"));

        client.run(&update_info(), &mut sink).unwrap();

        assert_eq!(seen, vec!["warning:a", "info:b"]);
    }
}
