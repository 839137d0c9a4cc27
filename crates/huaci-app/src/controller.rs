use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::events::{Inbound, Outbound, event_loop};
use crate::io::{MAX_INBOUND_FRAME_LEN, reader_io, writer_io};
use crate::state::AppState;

/// Centralized channel management
pub struct ChannelSet {
    pub inbound: (AsyncSender<Inbound>, AsyncReceiver<Inbound>),
    pub outbound: (AsyncSender<Outbound>, AsyncReceiver<Outbound>),
}

impl ChannelSet {
    pub fn new(reply_capacity: usize) -> Self {
        Self {
            inbound: kanal::bounded_async(64),
            outbound: kanal::bounded_async(reply_capacity),
        }
    }
}

/// Application controller for task spawning and lifecycle
pub struct AppController {
    channels: ChannelSet,
    state: Arc<AppState>,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            channels: ChannelSet::new(state.config.reply_capacity),
            state,
            cancel_token: CancellationToken::new(),
        }
    }

    /// Reader, dispatcher and writer over the given byte streams
    pub fn spawn_tasks<R, W>(&self, reader: R, writer: W) -> JoinSet<anyhow::Result<()>>
    where
        R: AsyncRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let mut tasks = JoinSet::new();

        tasks.spawn(reader_io(
            reader,
            MAX_INBOUND_FRAME_LEN,
            self.channels.inbound.0.clone(),
            self.channels.outbound.0.clone(),
            // end of input shuts the whole host down
            self.cancel_token.clone(),
        ));

        tasks.spawn(event_loop(
            self.state.clone(),
            self.channels.inbound.1.clone(),
            self.channels.outbound.0.clone(),
            self.cancel_token.child_token(),
        ));

        tasks.spawn(writer_io(
            writer,
            self.channels.outbound.1.clone(),
            self.cancel_token.child_token(),
        ));

        tasks
    }

    pub fn cancelled(&self) -> tokio_util::sync::WaitForCancellationFuture<'_> {
        self.cancel_token.cancelled()
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
