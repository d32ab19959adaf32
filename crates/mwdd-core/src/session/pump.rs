use mwdd_runtime::AttachedStream;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::task::JoinHandle;

/// Relays bytes between the local terminal and the attached remote stream.
///
/// The two directions are independent tasks: a failure on one side does not
/// stop the other. The pump is never joined; when the session ends the tasks
/// wind down as their streams close.
pub struct StreamPump {
    _input: JoinHandle<()>,
    _output: JoinHandle<()>,
}

impl StreamPump {
    pub fn start<I, O>(stream: AttachedStream, local_in: I, local_out: O) -> Self
    where
        I: AsyncRead + Send + Unpin + 'static,
        O: AsyncWrite + Send + Unpin + 'static,
    {
        let AttachedStream { input, output } = stream;
        Self {
            _input: tokio::spawn(async move {
                if let Err(e) = relay(local_in, input).await {
                    tracing::warn!("Input relay ended: {}", e);
                }
            }),
            _output: tokio::spawn(async move {
                if let Err(e) = relay(output, local_out).await {
                    tracing::warn!("Output relay ended: {}", e);
                }
            }),
        }
    }
}

/// Copy until EOF, flushing after every chunk so single keystrokes and
/// partial lines reach the other side immediately
async fn relay<R, W>(mut reader: R, mut writer: W) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = [0u8; 8192];
    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            return Ok(());
        }
        writer.write_all(&buf[..n]).await?;
        writer.flush().await?;
    }
}
