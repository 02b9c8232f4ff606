//! Blocking libssh2 plumbing. Everything here runs on the blocking pool.

use std::io::{self, Read};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use netrun_common::error::DeviceError;
use netrun_common::inventory::Host;
use ssh2::{ErrorCode, KeyboardInteractivePrompt, Prompt, Session};
use tracing::debug;

/// `LIBSSH2_ERROR_TIMEOUT`
const LIBSSH2_TIMEOUT: i32 = -9;

/// Answers every keyboard-interactive prompt with the password.
struct PasswordPrompt<'a> {
    password: &'a str,
}

impl KeyboardInteractivePrompt for PasswordPrompt<'_> {
    fn prompt<'b>(
        &mut self,
        _username: &str,
        _instructions: &str,
        prompts: &[Prompt<'b>],
    ) -> Vec<String> {
        prompts.iter().map(|_| self.password.to_string()).collect()
    }
}

/// Opens and authenticates a session. Both the TCP socket and libssh2 use
/// the host timeout, so a silent device surfaces as [`DeviceError::Timeout`].
pub fn connect(host: &Host) -> Result<Session, DeviceError> {
    let username: &str = host
        .username
        .as_deref()
        .ok_or_else(|| DeviceError::Authentication("no username configured".to_string()))?;
    let password: &str = host
        .password
        .as_ref()
        .map(|p| p.expose())
        .ok_or_else(|| DeviceError::Authentication("no password configured".to_string()))?;

    let addr: SocketAddr = resolve(&host.hostname, host.port)?;
    debug!("{}: connecting to {addr}", host.name);

    let tcp: TcpStream = TcpStream::connect_timeout(&addr, host.timeout).map_err(|e| match e.kind() {
        io::ErrorKind::TimedOut => DeviceError::Timeout(format!("connecting to {addr}")),
        _ => DeviceError::Unreachable(format!("{addr}: {e}")),
    })?;
    bound_socket(&tcp, host.timeout)?;

    let mut session: Session = Session::new().map_err(|e| session_error("creating session", e))?;
    session.set_tcp_stream(tcp);
    session.set_timeout(timeout_millis(host.timeout));
    session
        .handshake()
        .map_err(|e| session_error("SSH handshake", e))?;

    if session.userauth_password(username, password).is_ok() && session.authenticated() {
        return Ok(session);
    }

    // IOS images with AAA often only offer keyboard-interactive
    let mut prompter = PasswordPrompt { password };
    let _ = session.userauth_keyboard_interactive(username, &mut prompter);

    if session.authenticated() {
        Ok(session)
    } else {
        Err(DeviceError::Authentication(format!(
            "all methods exhausted for user '{username}'"
        )))
    }
}

/// Runs one command on its own exec channel and returns the output.
pub fn run_command(session: &Session, command: &str) -> Result<String, DeviceError> {
    let mut channel = session
        .channel_session()
        .map_err(|e| session_error("opening channel", e))?;

    channel
        .exec(command)
        .map_err(|e| session_error("executing command", e))?;

    let mut output = String::new();
    channel.read_to_string(&mut output).map_err(|e| match e.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => {
            DeviceError::Timeout(format!("waiting for output of '{command}'"))
        }
        _ => DeviceError::Session(format!("reading output: {e}")),
    })?;

    let _ = channel.wait_close();
    Ok(output)
}

/// Applies `timeout` to both directions of the socket.
fn bound_socket(tcp: &TcpStream, timeout: Duration) -> Result<(), DeviceError> {
    let bound = |e: io::Error| DeviceError::Session(format!("setting socket timeout: {e}"));
    tcp.set_read_timeout(Some(timeout)).map_err(bound)?;
    tcp.set_write_timeout(Some(timeout)).map_err(bound)
}

fn resolve(hostname: &str, port: u16) -> Result<SocketAddr, DeviceError> {
    (hostname, port)
        .to_socket_addrs()
        .map_err(|e| DeviceError::Unreachable(format!("{hostname}: {e}")))?
        .next()
        .ok_or_else(|| DeviceError::Unreachable(format!("{hostname}: no address found")))
}

fn session_error(context: &str, e: ssh2::Error) -> DeviceError {
    match e.code() {
        ErrorCode::Session(LIBSSH2_TIMEOUT) => DeviceError::Timeout(context.to_string()),
        _ => DeviceError::Session(format!("{context}: {e}")),
    }
}

fn timeout_millis(timeout: Duration) -> u32 {
    u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX)
}
